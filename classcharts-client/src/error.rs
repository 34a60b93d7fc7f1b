//! Error types for the ClassCharts client

use thiserror::Error;

/// Errors that can occur when using the ClassCharts clients
#[derive(Error, Debug)]
pub enum ClassChartsError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// A payload could not be mapped into a typed record
    #[error("Failed to map {entity}: {source}")]
    Mapping {
        /// The record (or response part) being built
        entity: &'static str,
        /// The underlying decoding error, naming the offending field
        #[source]
        source: serde_json::Error,
    },

    /// Login did not yield a usable session credential
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Client initialization failed
    #[error("Client initialization failed: {0}")]
    ClientInit(String),
}

impl ClassChartsError {
    pub(crate) fn mapping(entity: &'static str) -> impl FnOnce(serde_json::Error) -> Self {
        move |source| ClassChartsError::Mapping { entity, source }
    }
}
