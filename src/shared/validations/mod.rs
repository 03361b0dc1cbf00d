pub mod phone;

pub use phone::{is_valid_phone, normalize_phone};

/// Trim every field and report the ones left empty.
pub fn missing_fields<'a>(fields: &[(&'a str, Option<&str>)]) -> Vec<&'a str> {
    fields
        .iter()
        .filter(|(_, value)| value.map_or(true, |v| v.trim().is_empty()))
        .map(|(name, _)| *name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_reports_absent_and_blank_values() {
        let missing = missing_fields(&[
            ("nom", Some("Kouassi")),
            ("prenom", Some("   ")),
            ("numero", None),
        ]);
        assert_eq!(missing, vec!["prenom", "numero"]);
    }
}
