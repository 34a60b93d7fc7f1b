//! Unauthenticated access to a school's public homework page

use crate::error::ClassChartsError;
use crate::http;
use crate::models::{self, PublicHomework};
use chrono::{Datelike, NaiveDate, TimeDelta};
use reqwest::blocking::Client;

/// Token the public homework page embeds in every request
const PUBLIC_CSRF_TOKEN: &str = "a893725f23c7eb94f8a0e3a82e2a5ceb";

/// The Monday-to-Sunday week containing `date`
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use classcharts_client::week_window;
///
/// let wednesday = NaiveDate::from_ymd_opt(2021, 3, 3).unwrap();
/// let (monday, sunday) = week_window(wednesday);
/// assert_eq!(monday, NaiveDate::from_ymd_opt(2021, 3, 1).unwrap());
/// assert_eq!(sunday, NaiveDate::from_ymd_opt(2021, 3, 7).unwrap());
/// ```
pub fn week_window(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let monday = date - TimeDelta::days(i64::from(date.weekday().num_days_from_monday()));
    (monday, monday + TimeDelta::days(6))
}

/// Client for a school's public homework listing
///
/// Needs no login, only the school's public hash (the identifier in its public
/// homework page URL).
///
/// # Example
///
/// ```no_run
/// use chrono::NaiveDate;
/// use classcharts_client::HomeworkClient;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HomeworkClient::new("a1b2c3")?;
/// let today = NaiveDate::from_ymd_opt(2021, 3, 3).unwrap();
///
/// for homework in client.fetch(today, 10)? {
///     println!("{} (due {})", homework.title, homework.due_date);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct HomeworkClient {
    client: Client,
    base_url: reqwest::Url,
    school: String,
}

impl HomeworkClient {
    /// Create a client for the school identified by `school`
    pub fn new(school: impl Into<String>) -> Result<Self, ClassChartsError> {
        Self::builder(school).build()
    }

    pub fn builder(school: impl Into<String>) -> HomeworkClientBuilder {
        HomeworkClientBuilder::new(school)
    }

    /// Homework for `year` in the week containing `date`
    ///
    /// # Errors
    ///
    /// * `ClassChartsError::Request` - Network error
    /// * `ClassChartsError::Mapping` - The response was missing `data` or an entry was malformed
    pub fn fetch(&self, date: NaiveDate, year: u32) -> Result<Vec<PublicHomework>, ClassChartsError> {
        let (from, to) = week_window(date);
        let year = year.to_string();
        let from = http::form_date(from);
        let to = http::form_date(to);
        let form = [
            ("lesson_name", ""),
            ("year", year.as_str()),
            ("subject", ""),
            ("teacher", ""),
            ("from", from.as_str()),
            ("to", to.as_str()),
            ("hash", self.school.as_str()),
            ("homework_display_date", "issue_date"),
            ("csrf", PUBLIC_CSRF_TOKEN),
        ];

        let url = http::endpoint(&self.base_url, &["apipublic", "homework"])?;
        tracing::debug!(%url, school = %self.school, %year, %from, %to, "Fetching public homework");
        let response = self.client.post(url).form(&form).send()?;
        let payload = http::read_json(response)?;
        models::decode_list("public homework", payload)
    }
}

/// Builder for configuring a [`HomeworkClient`]
#[derive(Debug)]
pub struct HomeworkClientBuilder {
    school: String,
    base_url: Option<reqwest::Url>,
    client_builder: Option<reqwest::blocking::ClientBuilder>,
}

impl HomeworkClientBuilder {
    pub fn new(school: impl Into<String>) -> Self {
        Self {
            school: school.into(),
            base_url: None,
            client_builder: None,
        }
    }

    /// Set a custom base URL, e.g. a mock server
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn base_url(mut self, url: impl reqwest::IntoUrl) -> Result<Self, ClassChartsError> {
        self.base_url = Some(url.into_url()?);
        Ok(self)
    }

    /// Set a custom HTTP client builder (timeouts, proxies, etc.)
    ///
    /// Redirects stay disabled regardless of the provided configuration.
    pub fn client_builder(mut self, builder: reqwest::blocking::ClientBuilder) -> Self {
        self.client_builder = Some(builder);
        self
    }

    pub fn build(self) -> Result<HomeworkClient, ClassChartsError> {
        let base_url = match self.base_url {
            Some(url) => url,
            None => http::default_base_url()?,
        };
        let builder = self
            .client_builder
            .unwrap_or_else(|| http::client_builder(http::DEFAULT_USER_AGENT));

        Ok(HomeworkClient {
            client: http::build_client(builder)?,
            base_url,
            school: self.school,
        })
    }
}
