//! Requirements normalization.
//!
//! Validates the incoming business profile and fills defaults so every
//! downstream stage can consume it read-only without re-checking.

use siteforge_shared::{Requirements, Result, SiteForgeError};
use tracing::debug;

/// Maximum number of pages accepted for one run.
const MAX_PAGES: usize = 12;

/// Validate and normalize caller-supplied requirements.
///
/// Fatal on an empty business name or when no usable page remains after
/// trimming. Fills defaults: pages default to `["Home"]`, tone defaults
/// to "professional", audience to a generic description. Page names are
/// trimmed and de-duplicated case-insensitively, services de-duplicated
/// by name.
pub fn normalize(raw: Requirements) -> Result<Requirements> {
    let business_name = raw.business_name.trim().to_string();
    if business_name.is_empty() {
        return Err(SiteForgeError::validation("business_name is required"));
    }

    let mut pages: Vec<String> = Vec::new();
    for page in &raw.pages {
        let trimmed = page.trim();
        if trimmed.is_empty() {
            continue;
        }
        if pages.iter().any(|p| p.eq_ignore_ascii_case(trimmed)) {
            continue;
        }
        pages.push(trimmed.to_string());
    }
    if pages.is_empty() {
        pages.push("Home".to_string());
    }
    if pages.len() > MAX_PAGES {
        return Err(SiteForgeError::validation(format!(
            "too many pages requested: {} (max {MAX_PAGES})",
            pages.len()
        )));
    }

    let mut services = Vec::new();
    for service in &raw.services {
        let name = service.name.trim();
        if name.is_empty() {
            continue;
        }
        if services
            .iter()
            .any(|s: &siteforge_shared::ServiceOffering| s.name.eq_ignore_ascii_case(name))
        {
            continue;
        }
        services.push(siteforge_shared::ServiceOffering {
            name: name.to_string(),
            description: service.description.trim().to_string(),
        });
    }

    let normalized = Requirements {
        business_name,
        business_type: raw.business_type.trim().to_lowercase(),
        location: raw.location.as_deref().map(|l| l.trim().to_string()),
        audience: Some(
            raw.audience
                .as_deref()
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .unwrap_or("local customers looking for a trusted provider")
                .to_string(),
        ),
        tone: Some(
            raw.tone
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .unwrap_or("professional")
                .to_lowercase(),
        ),
        services,
        pages,
        brand_colors: raw.brand_colors,
        style_keywords: raw
            .style_keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect(),
        features: raw
            .features
            .iter()
            .map(|f| f.trim().to_lowercase())
            .filter(|f| !f.is_empty())
            .collect(),
    };

    debug!(
        business = %normalized.business_name,
        pages = normalized.pages.len(),
        services = normalized.services.len(),
        "requirements normalized"
    );

    Ok(normalized)
}

/// Convert a page name to a URL slug ("About Us" -> "about-us").
/// The "Home" page always maps to "home".
pub fn slugify(name: &str) -> String {
    let slug: String = name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect();

    let collapsed = slug
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if collapsed.is_empty() {
        "page".to_string()
    } else {
        collapsed
    }
}
