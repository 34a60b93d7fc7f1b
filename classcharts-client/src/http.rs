//! Request plumbing shared by both clients

use crate::error::ClassChartsError;
use chrono::NaiveDate;
use reqwest::blocking::{Client, ClientBuilder, Response};
use reqwest::header::CONTENT_TYPE;
use serde_json::{Map, Value};

pub(crate) const DEFAULT_BASE_URL: &str = "https://www.classcharts.com";

pub(crate) const DEFAULT_USER_AGENT: &str =
    concat!("classcharts-client/", env!("CARGO_PKG_VERSION"));

pub(crate) fn default_base_url() -> Result<reqwest::Url, ClassChartsError> {
    reqwest::Url::parse(DEFAULT_BASE_URL).map_err(|e| ClassChartsError::ClientInit(e.to_string()))
}

/// Default HTTP client configuration
pub(crate) fn client_builder(user_agent: &str) -> ClientBuilder {
    Client::builder().use_rustls_tls().user_agent(user_agent)
}

/// Build a client that never follows redirects.
///
/// The login response is a redirect that carries the credential cookie itself.
pub(crate) fn build_client(builder: ClientBuilder) -> Result<Client, ClassChartsError> {
    builder
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .map_err(|e| ClassChartsError::ClientInit(e.to_string()))
}

/// Replace the path of `base` with `segments`
pub(crate) fn endpoint(base: &reqwest::Url, segments: &[&str]) -> Result<reqwest::Url, ClassChartsError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ClassChartsError::ClientInit("Cannot modify base URL path".to_string()))?
        .clear()
        .extend(segments);
    Ok(url)
}

/// Dates go over the wire as `YYYY-MM-DD`
pub(crate) fn form_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Read a JSON body.
///
/// A response that is not `application/json` yields an empty object, so the mapper
/// reports the first field it cannot find.
pub(crate) fn read_json(response: Response) -> Result<Value, ClassChartsError> {
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let mime = content_type.split(';').next().unwrap_or_default().trim();

    if !mime.eq_ignore_ascii_case("application/json") {
        tracing::warn!(
            url = %response.url(),
            status = %response.status(),
            content_type = %content_type,
            "Unexpected content type, substituting an empty object"
        );
        return Ok(Value::Object(Map::new()));
    }

    let body = response.text()?;
    serde_json::from_str(&body).map_err(ClassChartsError::mapping("response body"))
}
