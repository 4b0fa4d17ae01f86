//! Industry profile resolution.
//!
//! Matches business-type text and style keywords against each profile's
//! keyword set with case-insensitive token-overlap scoring. Never fails:
//! below the minimum score the "general" profile is returned.

use std::sync::LazyLock;

use regex::Regex;
use siteforge_shared::Requirements;
use tracing::debug;

use crate::registry::{IndustryProfile, ProfileRegistry};

/// Minimum score required for a specific profile; below this the
/// general profile wins.
const MIN_MATCH_SCORE: f32 = 2.0;

/// Exact token hit weight.
const TOKEN_WEIGHT: f32 = 2.0;

/// Substring hit weight (e.g., "pizzeria" containing "pizza").
const SUBSTRING_WEIGHT: f32 = 1.0;

/// Resolve the best-matching industry profile for normalized requirements.
///
/// Deterministic: the highest-scoring profile wins, ties broken by
/// registration order (first registered kept).
pub fn resolve<'a>(registry: &'a ProfileRegistry, requirements: &Requirements) -> &'a IndustryProfile {
    let haystack = format!(
        "{} {}",
        requirements.business_type,
        requirements.style_keywords.join(" ")
    )
    .to_lowercase();
    let tokens = tokenize(&haystack);

    let mut best: Option<(&IndustryProfile, f32)> = None;

    for profile in registry.all() {
        let score = score_profile(profile, &haystack, &tokens);
        match best {
            // Strictly greater keeps the earlier-registered profile on ties.
            Some((_, best_score)) if score <= best_score => {}
            _ if score > 0.0 => best = Some((profile, score)),
            _ => {}
        }
    }

    match best {
        Some((profile, score)) if score >= MIN_MATCH_SCORE => {
            debug!(profile = %profile.id, score, "industry profile matched");
            profile
        }
        _ => {
            debug!(business_type = %requirements.business_type, "no profile matched, using general");
            registry.general()
        }
    }
}

/// Score one profile against the tokenized business description.
fn score_profile(profile: &IndustryProfile, haystack: &str, tokens: &[String]) -> f32 {
    let mut score = 0.0;
    for keyword in &profile.keywords {
        if keyword.contains(' ') {
            // Multi-word keywords ("real estate") match as phrases.
            if haystack.contains(keyword.as_str()) {
                score += TOKEN_WEIGHT;
            }
        } else if tokens.iter().any(|t| t == keyword) {
            score += TOKEN_WEIGHT;
        } else if tokens.iter().any(|t| t.contains(keyword.as_str())) {
            score += SUBSTRING_WEIGHT;
        }
    }
    score
}

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z0-9]+").expect("static regex"));

/// Split text into lowercase alphanumeric tokens.
fn tokenize(text: &str) -> Vec<String> {
    WORD.find_iter(text).map(|m| m.as_str().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requirements(business_type: &str, style_keywords: &[&str]) -> Requirements {
        Requirements {
            business_name: "Test Business".into(),
            business_type: business_type.into(),
            location: None,
            audience: None,
            tone: None,
            services: vec![],
            pages: vec!["Home".into()],
            brand_colors: None,
            style_keywords: style_keywords.iter().map(|s| (*s).to_string()).collect(),
            features: vec![],
        }
    }

    #[test]
    fn restaurant_text_resolves_to_restaurant() {
        let registry = ProfileRegistry::new();
        let profile = resolve(&registry, &requirements("italian restaurant and bar", &[]));
        assert_eq!(profile.id, "restaurant");
    }

    #[test]
    fn unknown_type_falls_back_to_general() {
        let registry = ProfileRegistry::new();
        let profile = resolve(&registry, &requirements("interdimensional portal maintenance", &[]));
        assert_eq!(profile.id, "general");
    }

    #[test]
    fn empty_type_falls_back_to_general() {
        let registry = ProfileRegistry::new();
        let profile = resolve(&registry, &requirements("", &[]));
        assert_eq!(profile.id, "general");
    }

    #[test]
    fn style_keywords_contribute_to_matching() {
        let registry = ProfileRegistry::new();
        let profile = resolve(&registry, &requirements("", &["yoga", "wellness"]));
        assert_eq!(profile.id, "fitness");
    }

    #[test]
    fn multi_word_keywords_match_as_phrases() {
        let registry = ProfileRegistry::new();
        let profile = resolve(&registry, &requirements("boutique real estate brokerage", &[]));
        assert_eq!(profile.id, "real-estate");
    }

    #[test]
    fn resolution_is_deterministic() {
        let registry = ProfileRegistry::new();
        let req = requirements("family law firm", &[]);
        let first = resolve(&registry, &req).id.clone();
        for _ in 0..5 {
            assert_eq!(resolve(&registry, &req).id, first);
        }
    }
}
