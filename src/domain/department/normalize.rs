//! Department name reconciliation.
//!
//! Service names reach the system through free-text forms ("COM",
//! "La communication", "communication ") and older rows, so every
//! comparison goes through a *department key*: lowercase, accent-folded,
//! punctuation-free, leading articles removed.

/// One of the organization's departments with the spellings that map to it.
#[derive(Debug, PartialEq, Eq)]
pub struct CanonicalDepartment {
    pub nom: &'static str,
    pub nom_court: &'static str,
    aliases: &'static [&'static str],
}

impl CanonicalDepartment {
    fn matches_key(&self, key: &str) -> bool {
        self.aliases.contains(&key)
            || department_key(self.nom) == key
            || department_key(self.nom_court) == key
    }

    /// `28:19` → `2819`; used for per-department environment variables.
    pub fn env_code(&self) -> String {
        self.nom_court.replace(':', "").to_uppercase()
    }
}

pub const DEPARTMENTS: [CanonicalDepartment; 10] = [
    CanonicalDepartment {
        nom: "Groupe de louange et d'adoration (GLA)",
        nom_court: "GLA",
        aliases: &[
            "groupe de louange",
            "groupe de louange et d'adoration",
            "louange",
        ],
    },
    CanonicalDepartment {
        nom: "Voir et Entendre",
        nom_court: "VE",
        aliases: &["voir et entendre"],
    },
    CanonicalDepartment {
        nom: "Communication",
        nom_court: "COM",
        aliases: &[],
    },
    CanonicalDepartment {
        nom: "28:19",
        nom_court: "28:19",
        aliases: &["2819", "28 19"],
    },
    CanonicalDepartment {
        nom: "Suivi",
        nom_court: "SUIVI",
        aliases: &[],
    },
    CanonicalDepartment {
        nom: "Service d'ordre",
        nom_court: "SO",
        aliases: &["ordre", "service ordre", "service d ordre"],
    },
    CanonicalDepartment {
        nom: "Protocole",
        nom_court: "PO",
        aliases: &["protocol"],
    },
    CanonicalDepartment {
        nom: "Logistique",
        nom_court: "LO",
        aliases: &["logistic"],
    },
    CanonicalDepartment {
        nom: "Service Book",
        nom_court: "SB",
        aliases: &["book"],
    },
    CanonicalDepartment {
        nom: "Gestion de culte",
        nom_court: "GC",
        aliases: &["gestion du culte", "culte"],
    },
];

const ARTICLES: [&str; 7] = ["de la ", "les ", "le ", "la ", "l'", "du ", "des "];
const SERVICE_PREFIXES: [&str; 5] = [
    "service de la ",
    "service des ",
    "service du ",
    "service de ",
    "service d'",
];

fn fold_char(c: char, out: &mut String) {
    match c {
        'à' | 'â' | 'ä' | 'á' => out.push('a'),
        'é' | 'è' | 'ê' | 'ë' => out.push('e'),
        'î' | 'ï' | 'í' => out.push('i'),
        'ô' | 'ö' | 'ó' => out.push('o'),
        'ù' | 'û' | 'ü' | 'ú' => out.push('u'),
        'ç' => out.push('c'),
        'ÿ' => out.push('y'),
        'ñ' => out.push('n'),
        'œ' => out.push_str("oe"),
        'æ' => out.push_str("ae"),
        '\u{2019}' | '\u{2018}' | '\u{02BC}' | '`' | '´' | '\'' => out.push('\''),
        c if c.is_ascii_alphanumeric() || c == ':' => out.push(c),
        _ => out.push(' '),
    }
}

fn strip_article(key: &str) -> &str {
    ARTICLES
        .iter()
        .find_map(|article| key.strip_prefix(article))
        .filter(|rest| !rest.is_empty())
        .unwrap_or(key)
}

/// Comparison key of a department name.
pub fn department_key(input: &str) -> String {
    let mut folded = String::with_capacity(input.len());
    for c in input.to_lowercase().chars() {
        fold_char(c, &mut folded);
    }
    let collapsed = folded.split_whitespace().collect::<Vec<_>>().join(" ");
    strip_article(&collapsed).to_string()
}

fn lookup_key(key: &str) -> Option<&'static CanonicalDepartment> {
    DEPARTMENTS.iter().find(|d| d.matches_key(key))
}

/// Canonical department matching a free-text name, if any.
pub fn find_department(input: &str) -> Option<&'static CanonicalDepartment> {
    let key = department_key(input);
    if key.is_empty() {
        return None;
    }
    if let Some(found) = lookup_key(&key) {
        return Some(found);
    }
    SERVICE_PREFIXES
        .iter()
        .find_map(|prefix| key.strip_prefix(prefix))
        .and_then(|rest| lookup_key(strip_article(rest)))
}

/// Canonical full name for known departments, trimmed input otherwise.
pub fn normalize_service_name(input: Option<&str>) -> Option<String> {
    let trimmed = input.map(str::trim).filter(|s| !s.is_empty())?;
    Some(match find_department(trimmed) {
        Some(department) => department.nom.to_string(),
        None => trimmed.to_string(),
    })
}

/// Whether two free-text names designate the same department.
pub fn same_department(a: &str, b: &str) -> bool {
    match (
        normalize_service_name(Some(a)),
        normalize_service_name(Some(b)),
    ) {
        (Some(x), Some(y)) => department_key(&x) == department_key(&y),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(s: &str) -> Option<String> {
        normalize_service_name(Some(s))
    }

    #[test]
    fn communication_variants_collapse() {
        for input in ["La communication", "COM", "communication ", "Communication", "Com"] {
            assert_eq!(norm(input).as_deref(), Some("Communication"), "{input}");
        }
    }

    #[test]
    fn twenty_eight_nineteen_variants() {
        for input in ["28 19", "2819", "28:19", " 28:19 "] {
            assert_eq!(norm(input).as_deref(), Some("28:19"), "{input}");
        }
    }

    #[test]
    fn gla_full_name_and_code() {
        let gla = "Groupe de louange et d'adoration (GLA)";
        assert_eq!(norm(gla).as_deref(), Some(gla));
        assert_eq!(norm("gla").as_deref(), Some(gla));
        assert_eq!(norm("Groupe de Louange").as_deref(), Some(gla));
        assert_eq!(norm("Groupe de louange et d’adoration").as_deref(), Some(gla));
    }

    #[test]
    fn articles_accents_and_service_prefix() {
        assert_eq!(norm("le Protocole").as_deref(), Some("Protocole"));
        assert_eq!(norm("LOGISTIQUE").as_deref(), Some("Logistique"));
        assert_eq!(norm("Service d’ordre").as_deref(), Some("Service d'ordre"));
        assert_eq!(norm("service de communication").as_deref(), Some("Communication"));
        assert_eq!(norm("Service du protocole").as_deref(), Some("Protocole"));
        assert_eq!(norm("Gestion du culte").as_deref(), Some("Gestion de culte"));
        assert_eq!(norm("Service Book").as_deref(), Some("Service Book"));
    }

    #[test]
    fn empty_and_unknown_names() {
        assert_eq!(normalize_service_name(None), None);
        assert_eq!(norm(""), None);
        assert_eq!(norm("   "), None);
        assert_eq!(norm("  Chorale des Jeunes ").as_deref(), Some("Chorale des Jeunes"));
        assert_eq!(norm("service technique").as_deref(), Some("service technique"));
    }

    #[test]
    fn key_folds_case_accents_and_punctuation() {
        assert_eq!(department_key("  Éveil   Spirituel! "), "eveil spirituel");
        assert_eq!(department_key("L'Accueil"), "accueil");
        assert_eq!(department_key("Les Œuvres"), "oeuvres");
        assert_eq!(department_key("28:19"), "28:19");
    }

    #[test]
    fn same_department_matching() {
        assert!(same_department("COM", "La communication"));
        assert!(same_department("2819", "28:19"));
        assert!(same_department("Accueil", "l'accueil"));
        assert!(same_department("Éveil", "eveil"));
        assert!(!same_department("Communication", "Protocole"));
        assert!(!same_department("", ""));
        assert!(!same_department("COM", ""));
    }

    #[test]
    fn env_codes_drop_colons() {
        let codes: Vec<String> = DEPARTMENTS.iter().map(|d| d.env_code()).collect();
        assert!(codes.contains(&"2819".to_string()));
        assert!(codes.contains(&"SUIVI".to_string()));
        assert_eq!(codes.len(), 10);
    }
}
