//! Source credibility rating.
//!
//! Pure, deterministic lookup from a source name and type to a trust tier.
//! Matching is case-insensitive substring containment against fixed
//! allow-lists; first match wins and unknown sources always resolve to the
//! medium default, so rating never fails.


use crate::claim::{CredibilityLevel, SourceType};

/// Trust tier assigned to a source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CredibilityRating {
    pub score: f64,
    pub level: CredibilityLevel,
    pub is_verified_source: bool,
}

const TRUSTED_GOV: [&str; 5] = ["pib", "india.gov", "mygov", "eci", "press information bureau"];

const TRUSTED_FACTCHECK: [&str; 6] = [
    "altnews",
    "boomlive",
    "factchecker",
    "thequint",
    "factly",
    "newsmobile",
];

const TRUSTED_NEWS: [&str; 11] = [
    "the hindu",
    "times of india",
    "indian express",
    "ndtv",
    "hindustan times",
    "reuters",
    "ap",
    "bbc",
    "the wire",
    "scroll",
    "theprint",
];

/// Rates a source name/type to a trust tier.
///
/// Lookup order: government affiliation, fact-check outlet, reputable news
/// outlet, social media, medium default.
pub fn rate(source_name: &str, source_type: SourceType) -> CredibilityRating {
    let name = source_name.to_lowercase();

    if source_type == SourceType::Gov || TRUSTED_GOV.iter().any(|kw| name.contains(kw)) {
        return CredibilityRating {
            score: 0.95,
            level: CredibilityLevel::High,
            is_verified_source: true,
        };
    }

    if source_type == SourceType::Factcheck || TRUSTED_FACTCHECK.iter().any(|kw| name.contains(kw))
    {
        return CredibilityRating {
            score: 0.90,
            level: CredibilityLevel::High,
            is_verified_source: true,
        };
    }

    if TRUSTED_NEWS.iter().any(|kw| name.contains(kw)) {
        return CredibilityRating {
            score: 0.80,
            level: CredibilityLevel::MediumHigh,
            is_verified_source: true,
        };
    }

    if source_type == SourceType::Social {
        return CredibilityRating {
            score: 0.40,
            level: CredibilityLevel::Low,
            is_verified_source: false,
        };
    }

    CredibilityRating {
        score: 0.60,
        level: CredibilityLevel::Medium,
        is_verified_source: false,
    }
}
