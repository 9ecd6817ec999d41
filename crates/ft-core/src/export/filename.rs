//! Export file naming: `<prefix>-<YYYY-MM-DD>.<ext>`

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// Prefix used when none (or an unusable one) is configured
pub const DEFAULT_PREFIX: &str = "empresas-report";

/// Build the download filename for an export generated on `date`
pub fn export_filename(prefix: &str, date: NaiveDate, extension: &str) -> String {
    format!(
        "{}-{}.{}",
        sanitize_prefix(prefix),
        date.format("%Y-%m-%d"),
        extension
    )
}

/// Date stamped on an export made now. Always the UTC calendar date, so
/// the name does not depend on the machine's time zone.
pub fn export_date() -> NaiveDate {
    export_date_at(&Utc::now())
}

/// UTC calendar date of `now`
pub fn export_date_at<Tz: TimeZone>(now: &DateTime<Tz>) -> NaiveDate {
    now.with_timezone(&Utc).date_naive()
}

/// Reduce a prefix to lowercase ASCII letters and single hyphens
pub fn sanitize_prefix(prefix: &str) -> String {
    let mut out = String::with_capacity(prefix.len());
    for c in prefix.chars() {
        if c.is_ascii_alphabetic() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    let trimmed = out.trim_matches('-');
    if trimmed.is_empty() {
        DEFAULT_PREFIX.to_string()
    } else {
        trimmed.to_string()
    }
}
