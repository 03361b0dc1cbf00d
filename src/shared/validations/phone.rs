//! Ivorian phone number checks.
//!
//! Accepted shapes: an optional `+225`, `+2250` or `0` prefix followed by
//! 8 to 10 digits. Whitespace is ignored.

const PREFIXES: [&str; 4] = ["", "+225", "+2250", "0"];

fn strip_spaces(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}

fn is_digit_run(s: &str) -> bool {
    (8..=10).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
}

pub fn is_valid_phone(raw: &str) -> bool {
    let compact = strip_spaces(raw);
    PREFIXES.iter().any(|prefix| {
        compact
            .strip_prefix(prefix)
            .is_some_and(is_digit_run)
    })
}

/// Store numbers in the local form: `+225`/`225` country prefix becomes `0`.
pub fn normalize_phone(raw: &str) -> String {
    let compact = strip_spaces(raw);
    let local = compact
        .strip_prefix("+225")
        .or_else(|| compact.strip_prefix("225").filter(|rest| rest.len() >= 8));

    match local {
        Some(rest) if rest.starts_with('0') => rest.to_string(),
        Some(rest) => format!("0{}", rest),
        None => compact,
    }
}
