//! Basic usage example for the ClassCharts client
//!
//! This example demonstrates how to:
//! - Create a student client with default settings
//! - Log in and read the student profile
//! - Fetch attendance and this week's homework
//! - Read a school's public homework without logging in
//!
//! Note: This example needs a real student access code and date of birth, read from
//! `CLASSCHARTS_CODE` and `CLASSCHARTS_DOB` (YYYY-MM-DD). Set `CLASSCHARTS_SCHOOL`
//! to a school's public homework hash to try the public client too.

use chrono::{Local, NaiveDate};
use classcharts_client::{DisplayDate, HomeworkClient, StudentClient, week_window};
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let code = std::env::var("CLASSCHARTS_CODE").expect("CLASSCHARTS_CODE environment variable not set");
    let dob = std::env::var("CLASSCHARTS_DOB").expect("CLASSCHARTS_DOB environment variable not set");
    let dob = NaiveDate::parse_from_str(&dob, "%Y-%m-%d")?;

    println!("=== Student Client ===");
    let mut client = StudentClient::new(code, dob)?;

    let profile = client.ping()?;
    println!("✓ Logged in as {} (id {})", profile.name, profile.id);

    let attendance = client.attendance(None, None)?;
    println!(
        "Attendance: {}% ({}% since August)",
        attendance.percentage, attendance.percentage_since_august
    );

    let (monday, sunday) = week_window(Local::now().date_naive());
    println!("\nHomework due {monday} to {sunday}:");
    for homework in client.homeworks(DisplayDate::Due, Some(monday), Some(sunday))? {
        let done = if homework.status.ticked { "✓" } else { " " };
        println!("[{done}] {} - {} ({})", homework.due_date, homework.title, homework.lesson);
    }

    client.logout()?;
    println!("\n✓ Logged out");

    if let Ok(school) = std::env::var("CLASSCHARTS_SCHOOL") {
        println!("\n=== Public Homework ===");
        let public = HomeworkClient::builder(school)
            .client_builder(
                reqwest::blocking::Client::builder()
                    .timeout(Duration::from_secs(30))
                    .use_rustls_tls(),
            )
            .build()?;

        match public.fetch(Local::now().date_naive(), 10) {
            Ok(list) => {
                for homework in list {
                    println!("{} - {} ({})", homework.due_date.date(), homework.title, homework.teacher.name);
                }
            }
            Err(e) => println!("✗ Failed to fetch public homework: {}", e),
        }
    }

    Ok(())
}
