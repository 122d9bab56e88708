//! Application-level constants and lookup tables.
//!
//! Everything here is data the rest of the crate treats as fixed: supported
//! languages, industry presets, quiz option sets, and provider defaults.

pub const APP_NAME: &str = "Tailboard";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default `RUST_LOG`-style filter when the embedder sets none.
pub fn default_log_filter() -> &'static str {
    "info,tailboard=debug"
}

/// Maximum characters of extracted document text interpolated into a
/// generation prompt. Text beyond this is cut and marked as continued.
pub const MAX_DOCUMENT_CHARS: usize = 20_000;

/// Marker appended when document text is truncated to the prompt budget.
pub const TRUNCATION_MARKER: &str = "\n[... document text continues]";

/// Question counts offered by the training authoring UI.
pub const QUESTION_COUNT_CHOICES: [usize; 4] = [3, 5, 7, 10];

/// Passing-score thresholds offered by the training authoring UI.
pub const PASSING_SCORE_CHOICES: [u8; 4] = [70, 80, 90, 100];

/// Default passing score when a draft does not configure one.
pub const DEFAULT_PASSING_SCORE: u8 = 80;

/// Default question count when a draft does not configure one.
pub const DEFAULT_QUESTION_COUNT: usize = 5;

/// Supported interface/content languages: (code, display name).
pub const LANGUAGES: [(&str, &str); 10] = [
    ("en", "English"),
    ("es", "Español"),
    ("fr", "Français"),
    ("pt", "Português"),
    ("de", "Deutsch"),
    ("it", "Italiano"),
    ("zh", "中文"),
    ("ja", "日本語"),
    ("ko", "한국어"),
    ("ar", "العربية"),
];

/// Display name for a language code; unknown codes fall back to English.
pub fn language_name(code: &str) -> &'static str {
    LANGUAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
        .unwrap_or("English")
}

pub const INDUSTRIES: [&str; 10] = [
    "Manufacturing",
    "Food & Beverage",
    "Pharmaceutical",
    "Automotive",
    "Aerospace",
    "Chemical",
    "Construction",
    "Energy",
    "Healthcare",
    "Technology",
];

pub const COMPANY_SIZES: [&str; 5] = [
    "1-50 employees",
    "51-200 employees",
    "201-1000 employees",
    "1001-5000 employees",
    "5000+ employees",
];

/// Preset departments, safety requirements and default onboarding trainings
/// suggested for an industry during company setup.
pub struct IndustryDefaults {
    pub departments: &'static [&'static str],
    pub safety_requirements: &'static [&'static str],
    pub default_trainings: &'static [&'static str],
}

/// Suggested configuration for a given industry. Industries without a
/// dedicated preset get the Manufacturing defaults.
pub fn industry_defaults(industry: &str) -> IndustryDefaults {
    match industry {
        "Food & Beverage" => IndustryDefaults {
            departments: &[
                "Production",
                "Quality Assurance",
                "Sanitation",
                "Warehouse",
                "Maintenance",
            ],
            safety_requirements: &["SQF Food Safety", "HACCP", "FDA Regulations", "GMP"],
            default_trainings: &[
                "Food Safety Fundamentals",
                "HACCP Principles",
                "Sanitation Procedures",
            ],
        },
        "Healthcare" => IndustryDefaults {
            departments: &["Clinical", "Nursing", "Administration", "Maintenance", "Safety"],
            safety_requirements: &["OSHA Compliance", "HIPAA", "Infection Control"],
            default_trainings: &["HIPAA Training", "Infection Control", "Patient Safety"],
        },
        _ => IndustryDefaults {
            departments: &[
                "Production",
                "Maintenance",
                "Quality Assurance",
                "Safety",
                "Engineering",
            ],
            safety_requirements: &["OSHA Compliance", "ISO 45001", "Environmental Health"],
            default_trainings: &[
                "Safety Orientation",
                "Equipment Training",
                "Quality Procedures",
            ],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_name_known_code() {
        assert_eq!(language_name("es"), "Español");
        assert_eq!(language_name("de"), "Deutsch");
    }

    #[test]
    fn language_name_unknown_falls_back_to_english() {
        assert_eq!(language_name("xx"), "English");
    }

    #[test]
    fn industry_defaults_food_beverage() {
        let defaults = industry_defaults("Food & Beverage");
        assert!(defaults.safety_requirements.contains(&"HACCP"));
        assert!(defaults.departments.contains(&"Sanitation"));
    }

    #[test]
    fn unknown_industry_gets_manufacturing_defaults() {
        let defaults = industry_defaults("Circus");
        assert!(defaults.safety_requirements.contains(&"OSHA Compliance"));
        assert!(defaults.departments.contains(&"Production"));
    }

    #[test]
    fn default_passing_score_is_offered() {
        assert!(PASSING_SCORE_CHOICES.contains(&DEFAULT_PASSING_SCORE));
        assert!(QUESTION_COUNT_CHOICES.contains(&DEFAULT_QUESTION_COUNT));
    }
}
