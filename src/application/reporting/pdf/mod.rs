//! A4 report documents rendered with `printpdf`.
//!
//! Renderers are synchronous; HTTP handlers run them on the blocking pool.

pub mod admin_summary;
pub mod canvas;
pub mod daily;
pub mod member_list;
pub mod weekly;

use chrono::{DateTime, Utc};

use crate::shared::time::format_date_fr;

pub const HEADER_TITLE: &str = "MEGA-DATA ÉGLISE";

pub fn footer_date(now: DateTime<Utc>) -> String {
    format_date_fr(now.date_naive())
}

/// Replace everything but ASCII letters and digits with `_`, for filenames.
pub fn safe_component(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
