//! Authenticated student session client

use crate::error::ClassChartsError;
use crate::http;
use crate::models::{
    self, ActivityPoint, Announcement, Attendance, Detention, DisplayDate, Homework, PingResponse,
    StudentProfile, Timetable,
};
use chrono::{Local, NaiveDate, TimeDelta};
use percent_encoding::percent_decode_str;
use reqwest::blocking::{Client, Response};
use reqwest::header::{AUTHORIZATION, HeaderValue};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use zeroize::{Zeroize, Zeroizing};

/// Cookie set by a successful login
const CREDENTIALS_COOKIE: &str = "student_session_credentials";

/// Range used when a query is given no explicit start
const DEFAULT_RANGE_DAYS: i64 = 31;

/// An established session: the HTTP client (and its cookie store) plus the session id
struct Session {
    http: Client,
    id: Zeroizing<String>,
}

/// Decoded credentials cookie
#[derive(Deserialize)]
struct Credentials {
    session_id: String,
}

/// Client for one student's ClassCharts account
///
/// The client logs in lazily: the first query made without a session logs in,
/// pings, and then runs. Every query takes `&mut self` because it may refresh the
/// session, so one client is driven from one place at a time.
///
/// # Example
///
/// ```no_run
/// use chrono::NaiveDate;
/// use classcharts_client::StudentClient;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dob = NaiveDate::from_ymd_opt(2005, 2, 23).unwrap();
/// let mut client = StudentClient::new("ABCD1234", dob)?;
///
/// let attendance = client.attendance(None, None)?;
/// println!("Attendance: {}%", attendance.percentage);
///
/// client.logout()?;
/// # Ok(())
/// # }
/// ```
pub struct StudentClient {
    code: Zeroizing<String>,
    date_of_birth: NaiveDate,
    base_url: reqwest::Url,
    user_agent: String,
    session: Option<Session>,
    profile: Option<StudentProfile>,
}

impl fmt::Debug for StudentClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StudentClient")
            .field("base_url", &self.base_url.as_str())
            .field("logged_in", &self.session.is_some())
            .field("profile", &self.profile)
            .finish_non_exhaustive()
    }
}

impl StudentClient {
    /// Create a client for the given login code and date of birth
    ///
    /// # Errors
    ///
    /// Returns `ClassChartsError::ClientInit` if the default base URL cannot be used.
    pub fn new(code: impl Into<String>, date_of_birth: NaiveDate) -> Result<Self, ClassChartsError> {
        Self::builder(code, date_of_birth).build()
    }

    /// Create a builder for configuring the client
    ///
    /// # Example
    ///
    /// ```no_run
    /// use chrono::NaiveDate;
    /// use classcharts_client::StudentClient;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let dob = NaiveDate::from_ymd_opt(2005, 2, 23).unwrap();
    /// let client = StudentClient::builder("ABCD1234", dob)
    ///     .base_url("http://localhost:1234")?
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn builder(code: impl Into<String>, date_of_birth: NaiveDate) -> StudentClientBuilder {
        StudentClientBuilder::new(code, date_of_birth)
    }

    /// Profile captured by the last successful ping
    pub fn profile(&self) -> Option<&StudentProfile> {
        self.profile.as_ref()
    }

    /// Whether a session is currently held
    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    /// Log in and load the student profile
    ///
    /// Any previous session is discarded. The login form is posted without an auth
    /// header; the session id is read from the credentials cookie of the response,
    /// after which [`ping`](Self::ping) loads the profile.
    ///
    /// # Errors
    ///
    /// * `ClassChartsError::Authentication` - The response carried no usable credentials
    /// * `ClassChartsError::Request` - Network error
    /// * `ClassChartsError::Mapping` - The ping response was malformed
    pub fn login(&mut self) -> Result<(), ClassChartsError> {
        self.session = None;
        self.profile = None;

        let http = http::build_client(
            http::client_builder(&self.user_agent).cookie_store(true),
        )?;
        let url = http::endpoint(&self.base_url, &["student", "login"])?;
        let dob = self.date_of_birth.format("%d/%m/%Y").to_string();
        let form = [
            ("_method", "POST"),
            ("code", self.code.as_str()),
            ("dob", dob.as_str()),
            ("remember_me", "1"),
            ("recaptcha-token", "no-token-available"),
        ];

        tracing::debug!(%url, "Logging in");
        let response = http.post(url).form(&form).send()?;
        let id = session_id_from_response(&response)?;
        self.session = Some(Session { http, id });

        if let Err(e) = self.refresh() {
            self.session = None;
            return Err(e);
        }
        tracing::debug!("Logged in");
        Ok(())
    }

    /// Refresh the session id and the cached profile
    ///
    /// Logs in first when there is no session.
    pub fn ping(&mut self) -> Result<&StudentProfile, ClassChartsError> {
        if self.session.is_none() {
            self.login()?;
        } else {
            self.refresh()?;
        }
        self.profile
            .as_ref()
            .ok_or_else(|| ClassChartsError::Authentication("Ping returned no profile".to_string()))
    }

    /// Invalidate the session on the server and release it locally
    ///
    /// The local session is released even when the request fails. Without a session
    /// this does nothing.
    pub fn logout(&mut self) -> Result<(), ClassChartsError> {
        self.profile = None;
        let Some(session) = self.session.take() else {
            tracing::debug!("Logout requested without a session");
            return Ok(());
        };

        let url = http::endpoint(&self.base_url, &["apiv2student", "logout"])?;
        let form: [(&str, String); 0] = [];
        send_authenticated(&session, url, &form)?;
        tracing::debug!("Logged out");
        Ok(())
    }

    /// Behaviour points between `after` and `before`
    ///
    /// Defaults to the last 31 days through today. Points come back in the order the
    /// service lists them; see [`ActivityPoint::from_payload`] for how each entry is
    /// classified.
    pub fn activity(
        &mut self,
        after: Option<NaiveDate>,
        before: Option<NaiveDate>,
    ) -> Result<Vec<ActivityPoint>, ClassChartsError> {
        let form = range_form(after, before);
        let payload = self.student_post("activity", &form)?;
        let entries: Vec<Value> = models::decode_list("activity", payload)?;

        let mut points = Vec::with_capacity(entries.len());
        for entry in &entries {
            match ActivityPoint::from_payload(entry)? {
                Some(point) => points.push(point),
                None => tracing::debug!(
                    id = ?entry.get("id"),
                    polarity = ?entry.get("polarity"),
                    "Skipping activity point without a known polarity"
                ),
            }
        }
        Ok(points)
    }

    /// Homework set or due between `after` and `before`
    ///
    /// `display_date` picks which of the two dates the range applies to. Defaults to
    /// the last 31 days through today.
    pub fn homeworks(
        &mut self,
        display_date: DisplayDate,
        after: Option<NaiveDate>,
        before: Option<NaiveDate>,
    ) -> Result<Vec<Homework>, ClassChartsError> {
        let mut form = vec![("display_date", display_date.as_str().to_string())];
        form.extend(range_form(after, before));
        let payload = self.student_post("homeworks", &form)?;
        models::decode_list("homework", payload)
    }

    /// Detentions between `after` and `before`, defaulting to the last 31 days
    pub fn detentions(
        &mut self,
        after: Option<NaiveDate>,
        before: Option<NaiveDate>,
    ) -> Result<Vec<Detention>, ClassChartsError> {
        let form = range_form(after, before);
        let payload = self.student_post("detentions", &form)?;
        models::decode_list("detention", payload)
    }

    /// Timetable for `day`, or for the service's default day when `None`
    pub fn timetable(&mut self, day: Option<NaiveDate>) -> Result<Timetable, ClassChartsError> {
        let form: Vec<_> = day.map(|day| ("date", http::form_date(day))).into_iter().collect();
        let payload = self.student_post("timetable", &form)?;
        models::decode("timetable", payload)
    }

    /// Attendance statistics; each bound is sent only when given
    pub fn attendance(
        &mut self,
        after: Option<NaiveDate>,
        before: Option<NaiveDate>,
    ) -> Result<Attendance, ClassChartsError> {
        let form: Vec<_> = [("after", after), ("before", before)]
            .into_iter()
            .filter_map(|(key, date)| date.map(|date| (key, http::form_date(date))))
            .collect();
        let payload = self.student_post("attendance", &form)?;
        models::decode("attendance", payload)
    }

    /// Announcements published to the student
    pub fn announcements(&mut self) -> Result<Vec<Announcement>, ClassChartsError> {
        let payload = self.student_post("announcements", &[])?;
        models::decode_list("announcement", payload)
    }

    /// Post to `apiv2student/{endpoint}/{student id}`, logging in first if needed
    fn student_post(
        &mut self,
        endpoint: &str,
        form: &[(&str, String)],
    ) -> Result<Value, ClassChartsError> {
        if self.session.is_none() {
            tracing::debug!(endpoint, "No session, logging in first");
            self.login()?;
        }
        let student_id = self
            .profile
            .as_ref()
            .map(|profile| profile.id.to_string())
            .ok_or_else(|| ClassChartsError::Authentication("No student profile loaded".to_string()))?;

        self.post(&["apiv2student", endpoint, &student_id], form)
    }

    /// Ping with the current session, storing the new session id and profile
    fn refresh(&mut self) -> Result<(), ClassChartsError> {
        let form = [("include_data", "true".to_string())];
        let payload = self.post(&["apiv2student", "ping"], &form)?;
        let ping: PingResponse = models::decode("ping response", payload)?;

        if let Some(session) = self.session.as_mut() {
            session.id = Zeroizing::new(ping.meta.session_id);
        }
        self.profile = Some(ping.data.user);
        Ok(())
    }

    /// Authenticated POST with the current session, returning the JSON body
    fn post(&self, segments: &[&str], form: &[(&str, String)]) -> Result<Value, ClassChartsError> {
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| ClassChartsError::Authentication("Not logged in".to_string()))?;
        let url = http::endpoint(&self.base_url, segments)?;
        let response = send_authenticated(session, url, form)?;
        http::read_json(response)
    }
}

/// Create the `Authorization` header ClassCharts expects: `Basic <session id>` verbatim
///
/// The header is marked sensitive and the temporary string is zeroized.
fn create_auth_header(session_id: &str) -> Result<HeaderValue, ClassChartsError> {
    let mut auth_string = format!("Basic {}", session_id);
    let header_value = HeaderValue::from_str(&auth_string)
        .map_err(|_| ClassChartsError::Authentication("Invalid session id format".to_string()));
    auth_string.zeroize();

    let mut sensitive_header = header_value?;
    sensitive_header.set_sensitive(true);
    Ok(sensitive_header)
}

fn send_authenticated<F: serde::Serialize + ?Sized>(
    session: &Session,
    url: reqwest::Url,
    form: &F,
) -> Result<Response, ClassChartsError> {
    tracing::debug!(%url, "POST");
    let response = session
        .http
        .post(url)
        .header(AUTHORIZATION, create_auth_header(&session.id)?)
        .form(form)
        .send()?;
    Ok(response)
}

/// `from`/`to` fields, defaulting to the last 31 days through today
fn range_form(after: Option<NaiveDate>, before: Option<NaiveDate>) -> Vec<(&'static str, String)> {
    let today = Local::now().date_naive();
    let from = after.unwrap_or(today - TimeDelta::days(DEFAULT_RANGE_DAYS));
    let to = before.unwrap_or(today);
    vec![("from", http::form_date(from)), ("to", http::form_date(to))]
}

/// Pull the session id out of the login response's credentials cookie
fn session_id_from_response(response: &Response) -> Result<Zeroizing<String>, ClassChartsError> {
    let cookie = response
        .cookies()
        .find(|cookie| cookie.name() == CREDENTIALS_COOKIE)
        .ok_or_else(|| {
            ClassChartsError::Authentication(format!(
                "Login response did not set the {CREDENTIALS_COOKIE} cookie"
            ))
        })?;
    parse_credentials(cookie.value())
}

/// Decode the URL-encoded JSON credentials cookie value
fn parse_credentials(raw: &str) -> Result<Zeroizing<String>, ClassChartsError> {
    let decoded = percent_decode_str(raw)
        .decode_utf8()
        .map(|text| Zeroizing::new(text.into_owned()))
        .map_err(|_| ClassChartsError::Authentication("Credentials cookie is not UTF-8".to_string()))?;

    let credentials: Credentials = serde_json::from_str(&decoded).map_err(|e| {
        ClassChartsError::Authentication(format!("Credentials cookie is malformed: {e}"))
    })?;
    if credentials.session_id.is_empty() {
        return Err(ClassChartsError::Authentication(
            "Credentials cookie has an empty session id".to_string(),
        ));
    }
    Ok(Zeroizing::new(credentials.session_id))
}

/// Builder for configuring a [`StudentClient`]
///
/// # Example
///
/// ```no_run
/// use chrono::NaiveDate;
/// use classcharts_client::StudentClient;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dob = NaiveDate::from_ymd_opt(2005, 2, 23).unwrap();
/// let client = StudentClient::builder("ABCD1234", dob)
///     .user_agent("my-dashboard/1.0")
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct StudentClientBuilder {
    code: Zeroizing<String>,
    date_of_birth: NaiveDate,
    base_url: Option<reqwest::Url>,
    user_agent: Option<String>,
}

impl StudentClientBuilder {
    /// Create a new builder with default settings
    pub fn new(code: impl Into<String>, date_of_birth: NaiveDate) -> Self {
        Self {
            code: Zeroizing::new(code.into()),
            date_of_birth,
            base_url: None,
            user_agent: None,
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

    /// Set the `User-Agent` sent with every request
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build the client. No request is made until the first call.
    pub fn build(self) -> Result<StudentClient, ClassChartsError> {
        let base_url = match self.base_url {
            Some(url) => url,
            None => http::default_base_url()?,
        };

        Ok(StudentClient {
            code: self.code,
            date_of_birth: self.date_of_birth,
            base_url,
            user_agent: self
                .user_agent
                .unwrap_or_else(|| http::DEFAULT_USER_AGENT.to_string()),
            session: None,
            profile: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Mock, ServerGuard};
    use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
    use serde_json::json;

    const CODE: &str = "TVWZNW7R";
    const LOGIN_SESSION: &str = "login-session";
    const PING_SESSION: &str = "ping-session";

    fn dob() -> NaiveDate {
        NaiveDate::from_ymd_opt(2005, 2, 23).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn client_for(server: &ServerGuard) -> StudentClient {
        StudentClient::builder(CODE, dob())
            .base_url(server.url())
            .unwrap()
            .build()
            .unwrap()
    }

    fn credentials_cookie(session_id: &str) -> String {
        let json = format!(r#"{{"session_id":"{session_id}","remember":true}}"#);
        format!(
            "{CREDENTIALS_COOKIE}={}; path=/; HttpOnly",
            utf8_percent_encode(&json, NON_ALPHANUMERIC)
        )
    }

    fn mock_login(server: &mut ServerGuard, expect: usize) -> Mock {
        server
            .mock("POST", "/student/login")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("_method".into(), "POST".into()),
                Matcher::UrlEncoded("code".into(), CODE.into()),
                Matcher::UrlEncoded("dob".into(), "23/02/2005".into()),
                Matcher::UrlEncoded("remember_me".into(), "1".into()),
                Matcher::UrlEncoded("recaptcha-token".into(), "no-token-available".into()),
            ]))
            .with_status(302)
            .with_header("location", "/student/account")
            .with_header("set-cookie", &credentials_cookie(LOGIN_SESSION))
            .expect(expect)
            .create()
    }

    fn mock_ping(server: &mut ServerGuard, expect: usize) -> Mock {
        let body = json!({
            "success": 1,
            "data": {"user": {
                "id": 42,
                "name": "Alex Example",
                "first_name": "Alex",
                "last_name": "Example",
                "is_disabled": false,
                "announcements_count": 2,
                "display_behaviour": true,
                "display_attendance": true
            }},
            "meta": {"session_id": PING_SESSION}
        });
        server
            .mock("POST", "/apiv2student/ping")
            .match_header("authorization", format!("Basic {LOGIN_SESSION}").as_str())
            .match_body(Matcher::UrlEncoded("include_data".into(), "true".into()))
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .expect(expect)
            .create()
    }

    fn mock_endpoint(server: &mut ServerGuard, path: &str, body: &Matcher, response: Value) -> Mock {
        server
            .mock("POST", path)
            .match_header("authorization", format!("Basic {PING_SESSION}").as_str())
            .match_body(body.clone())
            .with_header("content-type", "application/json")
            .with_body(response.to_string())
            .create()
    }

    fn attendance_body() -> Value {
        json!({
            "success": 1,
            "data": {
                "2021-03-01": {
                    "Registration": {"code": "/", "status": "present", "late_minutes": 0},
                    "Maths": {"code": "L", "status": "late", "late_minutes": "4"}
                }
            },
            "meta": {
                "percentage": "87",
                "percentage_singe_august": "90",
                "dates": ["2021-03-01"],
                "sessions": ["AM", "PM"],
                "start_date": "2021-03-01T00:00:00+00:00",
                "end_date": "2021-03-07T00:00:00+00:00"
            }
        })
    }

    #[test]
    fn test_login_loads_profile() {
        let mut server = mockito::Server::new();
        let login = mock_login(&mut server, 1);
        let ping = mock_ping(&mut server, 1);

        let mut client = client_for(&server);
        assert!(!client.is_logged_in());
        client.login().unwrap();

        assert!(client.is_logged_in());
        let profile = client.profile().unwrap();
        assert_eq!(profile.id, 42);
        assert_eq!(profile.name, "Alex Example");
        assert_eq!(profile.announcements_count, 2);
        assert!(profile.features.contains_key("display_behaviour"));
        assert!(!profile.features.contains_key("first_name"));

        login.assert();
        ping.assert();
    }

    #[test]
    fn test_login_without_cookie_is_authentication_error() {
        let mut server = mockito::Server::new();
        let login = server
            .mock("POST", "/student/login")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<html><body>Invalid code</body></html>")
            .create();
        let ping = mock_ping(&mut server, 0);

        let mut client = client_for(&server);
        let err = client.login().unwrap_err();

        assert!(matches!(err, ClassChartsError::Authentication(_)), "{err:?}");
        assert!(!client.is_logged_in());
        login.assert();
        ping.assert();
    }

    #[test]
    fn test_parse_credentials() {
        let encoded = "%7B%22session_id%22%3A%22abc123%22%7D";
        assert_eq!(parse_credentials(encoded).unwrap().as_str(), "abc123");

        assert!(matches!(
            parse_credentials("%7B%7D"),
            Err(ClassChartsError::Authentication(_))
        ));
        assert!(matches!(
            parse_credentials("%7B%22session_id%22%3A%22%22%7D"),
            Err(ClassChartsError::Authentication(_))
        ));
        assert!(matches!(
            parse_credentials("not-json"),
            Err(ClassChartsError::Authentication(_))
        ));
    }

    #[test]
    fn test_auth_header_is_verbatim_and_sensitive() {
        let header = create_auth_header("abc123").unwrap();
        assert_eq!(header.to_str().unwrap(), "Basic abc123");
        assert!(header.is_sensitive());
        assert!(create_auth_header("bad\nid").is_err());
    }

    #[test]
    fn test_lazy_login_before_attendance() {
        let mut server = mockito::Server::new();
        let login = mock_login(&mut server, 1);
        let ping = mock_ping(&mut server, 1);
        let attendance = mock_endpoint(
            &mut server,
            "/apiv2student/attendance/42",
            &Matcher::Exact(String::new()),
            attendance_body(),
        );

        let mut client = client_for(&server);
        let result = client.attendance(None, None).unwrap();

        assert_eq!(result.percentage, 87);
        assert_eq!(result.days.len(), 1);
        assert!(result.days.contains_key(&date(2021, 3, 1)));
        login.assert();
        ping.assert();
        attendance.assert();
    }

    #[test]
    fn test_attendance_sends_only_given_bounds() {
        let mut server = mockito::Server::new();
        let _login = mock_login(&mut server, 1);
        let _ping = mock_ping(&mut server, 1);
        let attendance = mock_endpoint(
            &mut server,
            "/apiv2student/attendance/42",
            &Matcher::Exact("after=2021-03-01".to_string()),
            attendance_body(),
        );

        let mut client = client_for(&server);
        client.attendance(Some(date(2021, 3, 1)), None).unwrap();
        attendance.assert();
    }

    #[test]
    fn test_activity_dispatch_and_order() {
        let mut server = mockito::Server::new();
        let _login = mock_login(&mut server, 1);
        let _ping = mock_ping(&mut server, 1);

        let point = |id: u64, kind: &str, polarity: &str| {
            json!({
                "id": id,
                "type": kind,
                "polarity": polarity,
                "score": 1,
                "reason": "Reason",
                "timestamp": "2021-01-20 10:05:00",
                "lesson_name": "Maths",
                "teacher_name": "Mr T Baker",
                "note": null,
                "detention_date": "2021-01-22",
                "detention_time": "15:30",
                "detention_location": null,
                "detention_type": null
            })
        };
        let body = json!({"success": 1, "data": [
            point(1, "behaviour", "positive"),
            point(2, "detention", "positive"),
            point(3, "behaviour", "blank"),
            point(4, "behaviour", "negative"),
        ]});
        let activity = mock_endpoint(
            &mut server,
            "/apiv2student/activity/42",
            &Matcher::AllOf(vec![
                Matcher::UrlEncoded("from".into(), "2021-01-01".into()),
                Matcher::UrlEncoded("to".into(), "2021-01-31".into()),
            ]),
            body,
        );

        let mut client = client_for(&server);
        let points = client
            .activity(Some(date(2021, 1, 1)), Some(date(2021, 1, 31)))
            .unwrap();

        let ids: Vec<u64> = points.iter().map(|point| point.details().id).collect();
        assert_eq!(ids, [1, 2, 4]);
        assert!(matches!(points[0], ActivityPoint::Positive(_)));
        assert!(matches!(points[1], ActivityPoint::Detention { .. }));
        assert!(matches!(points[2], ActivityPoint::Negative(_)));
        activity.assert();
    }

    #[test]
    fn test_homeworks_pass_display_date() {
        let mut server = mockito::Server::new();
        let _login = mock_login(&mut server, 1);
        let _ping = mock_ping(&mut server, 1);
        let body = json!({"success": 1, "data": [{
            "lesson": "10B/En1",
            "subject": "English",
            "teacher": "Ms R Patel",
            "id": 9001,
            "title": "Essay",
            "description": "<p>Write it</p>",
            "issue_date": "2021-02-01",
            "due_date": "2021-02-08",
            "completion_time_value": null,
            "completion_time_unit": null,
            "validated_attachments": [],
            "status": {"id": 1, "ticked": "no", "attachments": []}
        }]});
        let homeworks = mock_endpoint(
            &mut server,
            "/apiv2student/homeworks/42",
            &Matcher::AllOf(vec![
                Matcher::UrlEncoded("display_date".into(), "issue_date".into()),
                Matcher::UrlEncoded("from".into(), "2021-02-01".into()),
                Matcher::UrlEncoded("to".into(), "2021-02-07".into()),
            ]),
            body,
        );

        let mut client = client_for(&server);
        let result = client
            .homeworks(DisplayDate::Issue, Some(date(2021, 2, 1)), Some(date(2021, 2, 7)))
            .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].description, "Write it");
        assert_eq!(result[0].completion_time.value, 0);
        homeworks.assert();
    }

    #[test]
    fn test_detentions() {
        let mut server = mockito::Server::new();
        let _login = mock_login(&mut server, 1);
        let _ping = mock_ping(&mut server, 1);
        let body = json!({"success": 1, "data": [{
            "id": 314,
            "attended": "yes",
            "date": "2021-05-12T00:00:00+00:00",
            "time": "15:20",
            "length": 30,
            "location": null,
            "lesson": {"name": "8C/Sc1", "subject": null},
            "teacher": {"title": "Dr", "first_name": "Helen", "last_name": "Okafor"},
            "lesson_pupil_behaviour": {"reason": "Homework missing"},
            "detention_type": {"name": "Lunch"}
        }]});
        let detentions = mock_endpoint(
            &mut server,
            "/apiv2student/detentions/42",
            &Matcher::AllOf(vec![
                Matcher::UrlEncoded("from".into(), "2021-05-01".into()),
                Matcher::UrlEncoded("to".into(), "2021-05-31".into()),
            ]),
            body,
        );

        let mut client = client_for(&server);
        let result = client
            .detentions(Some(date(2021, 5, 1)), Some(date(2021, 5, 31)))
            .unwrap();

        assert_eq!(result.len(), 1);
        assert!(result[0].attended);
        assert_eq!(result[0].date.format("%Y-%m-%d %H:%M").to_string(), "2021-05-12 15:20");
        assert_eq!(result[0].detention_type, "Lunch");
        detentions.assert();
    }

    #[test]
    fn test_timetable_with_and_without_day() {
        let mut server = mockito::Server::new();
        let _login = mock_login(&mut server, 1);
        let _ping = mock_ping(&mut server, 1);
        let body = json!({
            "success": 1,
            "data": [{
                "lesson_name": "7A/Hi1",
                "subject_name": "History",
                "teacher_name": "Mr D Evans",
                "room_name": "H2",
                "date": "2021-06-07",
                "period_name": "P1",
                "period_number": "1",
                "start_time": "2021-06-07T09:00:00+01:00",
                "end_time": "2021-06-07T10:00:00+01:00",
                "note": "",
                "key": 1
            }],
            "meta": {
                "dates": ["2021-06-07"],
                "start_time": "2021-06-07T09:00:00+01:00",
                "end_time": "2021-06-07T10:00:00+01:00"
            }
        });
        let with_day = mock_endpoint(
            &mut server,
            "/apiv2student/timetable/42",
            &Matcher::Exact("date=2021-06-07".to_string()),
            body.clone(),
        );
        let without_day = mock_endpoint(
            &mut server,
            "/apiv2student/timetable/42",
            &Matcher::Exact(String::new()),
            body,
        );

        let mut client = client_for(&server);
        let timetable = client.timetable(Some(date(2021, 6, 7))).unwrap();
        assert_eq!(timetable.lessons.len(), 1);
        assert_eq!(timetable.date, date(2021, 6, 7));
        client.timetable(None).unwrap();

        with_day.assert();
        without_day.assert();
    }

    #[test]
    fn test_announcements() {
        let mut server = mockito::Server::new();
        let _login = mock_login(&mut server, 1);
        let _ping = mock_ping(&mut server, 1);
        let body = json!({"success": 1, "data": [{
            "id": 5,
            "title": "Trip",
            "description": "<p>Coach leaves at 8</p>",
            "state": "viewed",
            "timestamp": "2021-07-01 08:30:00",
            "school_name": "Example Academy"
        }]});
        let announcements = mock_endpoint(
            &mut server,
            "/apiv2student/announcements/42",
            &Matcher::Exact(String::new()),
            body,
        );

        let mut client = client_for(&server);
        let result = client.announcements().unwrap();
        assert_eq!(result[0].description, "Coach leaves at 8");
        assert!(result[0].viewed);
        announcements.assert();
    }

    #[test]
    fn test_non_json_response_becomes_mapping_error() {
        let mut server = mockito::Server::new();
        let _login = mock_login(&mut server, 1);
        let _ping = mock_ping(&mut server, 1);
        let _detentions = server
            .mock("POST", "/apiv2student/detentions/42")
            .with_header("content-type", "text/html")
            .with_body("<html>Oops</html>")
            .create();

        let mut client = client_for(&server);
        let err = client.detentions(None, None).unwrap_err();
        match err {
            ClassChartsError::Mapping { entity, source } => {
                assert_eq!(entity, "detention");
                assert!(source.to_string().contains("missing field `data`"));
            }
            other => panic!("Expected Mapping error, got {other:?}"),
        }
    }

    #[test]
    fn test_ping_refreshes_profile() {
        let mut server = mockito::Server::new();
        let _login = mock_login(&mut server, 1);
        let _ping = mock_ping(&mut server, 1);
        let refresh = server
            .mock("POST", "/apiv2student/ping")
            .match_header("authorization", format!("Basic {PING_SESSION}").as_str())
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "data": {"user": {"id": 42, "name": "Alex Renamed", "is_disabled": true, "announcements_count": 0}},
                    "meta": {"session_id": PING_SESSION}
                })
                .to_string(),
            )
            .expect(1)
            .create();

        let mut client = client_for(&server);
        client.login().unwrap();
        let profile = client.ping().unwrap();

        assert_eq!(profile.name, "Alex Renamed");
        assert!(profile.account_disabled);
        refresh.assert();
    }

    #[test]
    fn test_logout_releases_session_and_relogs_lazily() {
        let mut server = mockito::Server::new();
        let login = mock_login(&mut server, 2);
        let ping = mock_ping(&mut server, 2);
        let logout = server
            .mock("POST", "/apiv2student/logout")
            .match_header("authorization", format!("Basic {PING_SESSION}").as_str())
            .with_header("content-type", "application/json")
            .with_body(r#"{"success": 1}"#)
            .expect(1)
            .create();
        let _attendance = mock_endpoint(
            &mut server,
            "/apiv2student/attendance/42",
            &Matcher::Exact(String::new()),
            attendance_body(),
        );

        let mut client = client_for(&server);
        client.login().unwrap();
        client.logout().unwrap();

        assert!(!client.is_logged_in());
        assert!(client.profile().is_none());

        client.attendance(None, None).unwrap();
        assert!(client.is_logged_in());

        login.assert();
        ping.assert();
        logout.assert();
    }

    #[test]
    fn test_logout_without_session_is_noop() {
        let mut server = mockito::Server::new();
        let logout = server.mock("POST", "/apiv2student/logout").expect(0).create();

        let mut client = client_for(&server);
        client.logout().unwrap();
        logout.assert();
    }

    #[test]
    fn test_logout_failure_still_releases_session() {
        let mut server = mockito::Server::new();
        let _login = mock_login(&mut server, 1);
        let _ping = mock_ping(&mut server, 1);

        let mut client = client_for(&server);
        client.login().unwrap();

        // Point the client somewhere nothing listens
        client.base_url = reqwest::Url::parse("http://127.0.0.1:9").unwrap();
        assert!(client.logout().is_err());
        assert!(!client.is_logged_in());
    }

    #[test]
    fn test_end_to_end_session() {
        let mut server = mockito::Server::new();
        let _login = mock_login(&mut server, 1);
        let _ping = mock_ping(&mut server, 1);
        let repeat_ping = server
            .mock("POST", "/apiv2student/ping")
            .match_header("authorization", format!("Basic {PING_SESSION}").as_str())
            .match_body(Matcher::UrlEncoded("include_data".into(), "true".into()))
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "data": {"user": {"id": 42, "name": "Alex Example", "is_disabled": false, "announcements_count": 2}},
                    "meta": {"session_id": PING_SESSION}
                })
                .to_string(),
            )
            .expect(1)
            .create();
        let _attendance = mock_endpoint(
            &mut server,
            "/apiv2student/attendance/42",
            &Matcher::Exact(String::new()),
            attendance_body(),
        );
        let _logout = server
            .mock("POST", "/apiv2student/logout")
            .with_header("content-type", "application/json")
            .with_body(r#"{"success": 1}"#)
            .create();

        let mut client = client_for(&server);
        client.login().unwrap();
        assert!(!client.ping().unwrap().name.is_empty());

        let attendance = client.attendance(None, None).unwrap();
        assert!((0..=100).contains(&attendance.percentage));

        client.logout().unwrap();
        assert!(!client.is_logged_in());
        assert!(client.profile().is_none());
        repeat_ping.assert();
    }

    #[test]
    fn test_invalid_base_url() {
        let result = StudentClient::builder(CODE, dob()).base_url("not a valid url");
        assert!(result.is_err());
    }

    #[test]
    fn test_default_base_url() {
        let client = StudentClient::new(CODE, dob()).unwrap();
        assert_eq!(client.base_url.as_str(), "https://www.classcharts.com/");
    }

    #[test]
    fn test_debug_hides_code() {
        let client = StudentClient::new(CODE, dob()).unwrap();
        assert!(!format!("{client:?}").contains(CODE));
    }
}
