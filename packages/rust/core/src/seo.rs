//! Deterministic SEO enrichment.
//!
//! Derives per-page metadata from already-generated content, with no
//! further generative calls: titles from the page and business name,
//! descriptions clipped from hero or about copy, keywords from services
//! and industry terms, and structured-data hints for local search.
//! Missing content degrades to business-name placeholders, never to
//! empty fields.

use siteforge_shared::{PageArtifact, Requirements, SectionKind, SeoMetadata};
use tracing::instrument;

/// Meta descriptions are clipped to this many characters.
const DESCRIPTION_MAX: usize = 160;

/// Maximum keyword hints per page.
const KEYWORDS_MAX: usize = 10;

/// Fill in SEO metadata for every assembled page.
#[instrument(skip_all, fields(pages = pages.len()))]
pub fn enrich(pages: &mut [PageArtifact], requirements: &Requirements, industry_keywords: &[String]) {
    let keywords = build_keywords(requirements, industry_keywords);
    for page in pages {
        page.seo = page_metadata(page, requirements, &keywords);
    }
}

fn page_metadata(
    page: &PageArtifact,
    requirements: &Requirements,
    keywords: &[String],
) -> SeoMetadata {
    let title = if page.slug == "home" {
        match requirements.location.as_deref() {
            Some(location) => format!("{} | {location}", requirements.business_name),
            None => requirements.business_name.clone(),
        }
    } else {
        format!("{} | {}", page.title, requirements.business_name)
    };

    let description = description_for(page, requirements);

    let structured = serde_json::json!({
        "name": requirements.business_name,
        "type": requirements.business_type,
        "location": requirements.location,
    });

    SeoMetadata {
        title,
        description,
        keywords: keywords.to_vec(),
        structured: Some(structured),
    }
}

/// Description from hero copy, else about copy, else a placeholder.
fn description_for(page: &PageArtifact, requirements: &Requirements) -> String {
    let source = page
        .sections
        .iter()
        .find(|s| s.kind == SectionKind::Hero && !s.body.trim().is_empty())
        .or_else(|| {
            page.sections
                .iter()
                .find(|s| s.kind == SectionKind::About && !s.body.trim().is_empty())
        })
        .map(|s| s.body.trim());

    match source {
        Some(body) => clip_at_word_boundary(body, DESCRIPTION_MAX),
        None => format!(
            "Learn more about {} and what we can do for you.",
            requirements.business_name
        ),
    }
}

/// Keyword hints: service names, industry terms, then the business
/// type, lowercased and de-duplicated.
fn build_keywords(requirements: &Requirements, industry_keywords: &[String]) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();
    let mut push = |value: &str| {
        let value = value.trim().to_lowercase();
        if !value.is_empty() && !keywords.contains(&value) && keywords.len() < KEYWORDS_MAX {
            keywords.push(value);
        }
    };

    for service in &requirements.services {
        push(&service.name);
    }
    for keyword in industry_keywords {
        push(keyword);
    }
    push(&requirements.business_type);
    if let Some(location) = &requirements.location {
        push(location);
    }

    keywords
}

/// Clip to `max` characters without splitting a word.
fn clip_at_word_boundary(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let clipped: String = text.chars().take(max).collect();
    match clipped.rfind(char::is_whitespace) {
        Some(idx) => clipped[..idx].trim_end().to_string(),
        None => clipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use siteforge_shared::{
        ColorTokens, ComponentVariants, FontPairing, GlobalTheme, RadiusScale, SectionContent,
        ServiceOffering, ShadowScale,
    };
    use std::sync::Arc;

    fn requirements() -> Requirements {
        Requirements {
            business_name: "Aurora Design Studio".into(),
            business_type: "design studio".into(),
            location: Some("Portland".into()),
            audience: None,
            tone: None,
            services: vec![
                ServiceOffering {
                    name: "Brand Identity".into(),
                    description: String::new(),
                },
                ServiceOffering {
                    name: "Web Design".into(),
                    description: String::new(),
                },
            ],
            pages: vec!["Home".into()],
            brand_colors: None,
            style_keywords: vec![],
            features: vec![],
        }
    }

    fn theme() -> Arc<GlobalTheme> {
        Arc::new(GlobalTheme {
            colors: ColorTokens {
                primary: "#111111".into(),
                secondary: "#222222".into(),
                accent: "#333333".into(),
                background: "#ffffff".into(),
                text: "#111111".into(),
            },
            fonts: FontPairing {
                heading: "Inter".into(),
                body: "Inter".into(),
            },
            radius: RadiusScale::Sharp,
            shadow: ShadowScale::Flat,
            variants: ComponentVariants {
                button: "solid".into(),
                card: "flat".into(),
                nav: "bar".into(),
            },
        })
    }

    fn page(slug: &str, sections: Vec<SectionContent>) -> PageArtifact {
        PageArtifact {
            id: "0".into(),
            title: "Home".into(),
            slug: slug.into(),
            sections,
            nav: vec![],
            seo: SeoMetadata {
                title: String::new(),
                description: String::new(),
                keywords: vec![],
                structured: None,
            },
            theme: theme(),
            asset_base: format!("/assets/{slug}"),
            content_hash: String::new(),
        }
    }

    fn hero(body: &str) -> SectionContent {
        SectionContent {
            kind: SectionKind::Hero,
            headline: "Design that works".into(),
            body: body.into(),
            bullets: vec![],
            images: vec![],
            from_fallback: false,
        }
    }

    #[test]
    fn description_comes_from_hero_copy() {
        let mut pages = vec![page("home", vec![hero("Thoughtful brand work for growing businesses.")])];
        enrich(&mut pages, &requirements(), &[]);
        assert_eq!(
            pages[0].seo.description,
            "Thoughtful brand work for growing businesses."
        );
    }

    #[test]
    fn long_descriptions_clip_at_a_word_boundary() {
        let long = "word ".repeat(60);
        let mut pages = vec![page("home", vec![hero(&long)])];
        enrich(&mut pages, &requirements(), &[]);
        let description = &pages[0].seo.description;
        assert!(description.chars().count() <= DESCRIPTION_MAX);
        assert!(description.ends_with("word"));
    }

    #[test]
    fn missing_content_yields_business_name_placeholder() {
        let mut pages = vec![page("home", vec![])];
        enrich(&mut pages, &requirements(), &[]);
        assert!(pages[0].seo.description.contains("Aurora Design Studio"));
        assert!(!pages[0].seo.title.is_empty());
    }

    #[test]
    fn keywords_merge_services_and_industry_terms() {
        let mut pages = vec![page("home", vec![hero("Body.")])];
        enrich(
            &mut pages,
            &requirements(),
            &["branding".to_string(), "design".to_string()],
        );
        let keywords = &pages[0].seo.keywords;
        assert!(keywords.contains(&"brand identity".to_string()));
        assert!(keywords.contains(&"branding".to_string()));
        assert!(keywords.contains(&"portland".to_string()));
        assert!(keywords.len() <= KEYWORDS_MAX);
    }

    #[test]
    fn home_title_differs_from_inner_pages() {
        let mut pages = vec![page("home", vec![hero("Body.")]), {
            let mut p = page("about", vec![hero("Body.")]);
            p.title = "About".into();
            p
        }];
        enrich(&mut pages, &requirements(), &[]);
        assert_eq!(pages[0].seo.title, "Aurora Design Studio | Portland");
        assert_eq!(pages[1].seo.title, "About | Aurora Design Studio");
    }

    #[test]
    fn structured_hints_carry_business_identity() {
        let mut pages = vec![page("home", vec![hero("Body.")])];
        enrich(&mut pages, &requirements(), &[]);
        let structured = pages[0].seo.structured.as_ref().unwrap();
        assert_eq!(structured["name"], "Aurora Design Studio");
        assert_eq!(structured["location"], "Portland");
    }
}
