//! ClassCharts Client Library
//!
//! This library talks to ClassCharts, the school behaviour and homework platform,
//! on behalf of a student, and reads a school's public homework listing.
//!
//! # Features
//!
//! - Student login with the access code and date of birth, renewed lazily
//! - Behaviour activity, homework, detentions, timetable, attendance and announcements
//! - Public homework for a school and year group, no login needed
//! - HTML in titles and descriptions reduced to plain text
//! - Secure TLS using rustls (no OpenSSL dependencies)
//! - Blocking synchronous API
//! - Well-typed errors using thiserror
//!
//! # Example
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use classcharts_client::{ActivityPoint, StudentClient};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dob = NaiveDate::from_ymd_opt(2005, 2, 23).unwrap();
//! let mut client = StudentClient::new("ABCD1234", dob)?;
//!
//! // The first query logs in
//! for point in client.activity(None, None)? {
//!     match point {
//!         ActivityPoint::Positive(p) => println!("+{} {}", p.score, p.reason),
//!         ActivityPoint::Negative(p) => println!("{} {}", p.score, p.reason),
//!         ActivityPoint::Detention { point, detention } => {
//!             println!("Detention on {} for {}", detention.date.date(), point.reason)
//!         }
//!     }
//! }
//!
//! client.logout()?;
//! # Ok(())
//! # }
//! ```

mod client;
mod de;
mod error;
mod http;
pub mod models;
mod public;
pub mod sanitize;

pub use client::{StudentClient, StudentClientBuilder};
pub use error::ClassChartsError;
pub use models::{
    ActivityPoint, Announcement, Attendance, Detention, DisplayDate, Homework, PublicHomework,
    StudentProfile, Timetable,
};
pub use public::{HomeworkClient, HomeworkClientBuilder, week_window};
pub use sanitize::sanitize;
