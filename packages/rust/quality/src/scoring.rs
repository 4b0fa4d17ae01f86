//! Deterministic bundle scoring.
//!
//! Every category is scored 0..=10 from the assembled pages alone, with
//! no generative calls, so identical bundles always score identically.
//! Each deduction is itemized as a [`QualityIssue`], referencing the
//! implicated section as `<page_slug>/<section_kind>` where one exists.

use siteforge_shared::{
    CategoryScores, GlobalTheme, PageArtifact, QualityCategory, QualityIssue, QualityReport,
    SectionKind, Severity,
};
use tracing::debug;

/// Minimum body word count before copy reads as filler.
fn min_words(kind: SectionKind) -> usize {
    match kind {
        SectionKind::Hero
        | SectionKind::Gallery
        | SectionKind::SocialLinks
        | SectionKind::ContactForm
        | SectionKind::CallToAction => 3,
        _ => 8,
    }
}

/// Score a bundle's pages against the shared theme.
///
/// `rounds_used` on the returned report is always 0; the orchestrator
/// owns the repair count.
pub fn evaluate(pages: &[PageArtifact], theme: &GlobalTheme, threshold: f32) -> QualityReport {
    let mut issues = Vec::new();

    let scores = CategoryScores {
        visual_design: score_visual(theme, &mut issues),
        structure: score_structure(pages, &mut issues),
        content: score_content(pages, &mut issues),
        conversion: score_conversion(pages, &mut issues),
        seo: score_seo(pages, &mut issues),
        distinctiveness: score_distinctiveness(pages, &mut issues),
    };

    let meets_thresholds = QualityCategory::all()
        .iter()
        .all(|c| scores.get(*c) >= threshold);

    debug!(
        aggregate = scores.aggregate(),
        meets_thresholds,
        issues = issues.len(),
        "bundle scored"
    );

    QualityReport {
        scores,
        aggregate: scores.aggregate(),
        meets_thresholds,
        issues,
        rounds_used: 0,
    }
}

fn clamp(score: f32) -> f32 {
    score.clamp(0.0, 10.0)
}

fn issue(
    issues: &mut Vec<QualityIssue>,
    category: QualityCategory,
    severity: Severity,
    message: String,
    section: Option<String>,
    suggested_fix: &str,
) {
    issues.push(QualityIssue {
        category,
        severity,
        message,
        section,
        suggested_fix: Some(suggested_fix.to_string()),
    });
}

// ---------------------------------------------------------------------------
// Visual design: token completeness and text contrast
// ---------------------------------------------------------------------------

fn score_visual(theme: &GlobalTheme, issues: &mut Vec<QualityIssue>) -> f32 {
    let mut score = 10.0;
    let tokens = [
        ("primary", &theme.colors.primary),
        ("secondary", &theme.colors.secondary),
        ("accent", &theme.colors.accent),
        ("background", &theme.colors.background),
        ("text", &theme.colors.text),
    ];

    for (name, value) in tokens {
        if parse_hex(value).is_none() {
            score -= 2.0;
            issue(
                issues,
                QualityCategory::VisualDesign,
                Severity::Error,
                format!("theme color token `{name}` is not a valid hex color: {value:?}"),
                None,
                "supply a #rrggbb value for every color token",
            );
        }
    }

    for (name, value) in [("heading", &theme.fonts.heading), ("body", &theme.fonts.body)] {
        if value.trim().is_empty() {
            score -= 2.0;
            issue(
                issues,
                QualityCategory::VisualDesign,
                Severity::Error,
                format!("theme {name} font is empty"),
                None,
                "supply a font family for both heading and body",
            );
        }
    }

    if let (Some(bg), Some(text)) = (parse_hex(&theme.colors.background), parse_hex(&theme.colors.text))
    {
        if (luma(bg) - luma(text)).abs() < 0.45 {
            score -= 3.0;
            issue(
                issues,
                QualityCategory::VisualDesign,
                Severity::Warning,
                "low contrast between background and text colors".to_string(),
                None,
                "pick background and text colors with stronger luminance separation",
            );
        }
    }

    clamp(score)
}

/// Parse `#rrggbb` into channels.
fn parse_hex(value: &str) -> Option<[u8; 3]> {
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some([
        u8::from_str_radix(&hex[0..2], 16).ok()?,
        u8::from_str_radix(&hex[2..4], 16).ok()?,
        u8::from_str_radix(&hex[4..6], 16).ok()?,
    ])
}

/// Perceptual luma, 0.0 black to 1.0 white.
fn luma([r, g, b]: [u8; 3]) -> f32 {
    (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32) / 255.0
}

// ---------------------------------------------------------------------------
// Structure: hero first, closing CTA, section variety
// ---------------------------------------------------------------------------

fn score_structure(pages: &[PageArtifact], issues: &mut Vec<QualityIssue>) -> f32 {
    if pages.is_empty() {
        return 0.0;
    }

    let mut total = 0.0;
    for page in pages {
        let mut page_score = 10.0;

        match page.sections.first() {
            Some(first) if first.kind == SectionKind::Hero => {}
            Some(first) => {
                page_score -= 3.0;
                issue(
                    issues,
                    QualityCategory::Structure,
                    Severity::Warning,
                    format!("page `{}` does not open with a hero section", page.slug),
                    Some(format!("{}/{}", page.slug, first.kind)),
                    "move the hero section to the top of the page",
                );
            }
            None => {
                page_score = 0.0;
                issue(
                    issues,
                    QualityCategory::Structure,
                    Severity::Error,
                    format!("page `{}` has no sections", page.slug),
                    None,
                    "plan at least a hero and a call to action",
                );
            }
        }

        if let Some(last) = page.sections.last() {
            if last.kind != SectionKind::CallToAction {
                page_score -= 3.0;
                issue(
                    issues,
                    QualityCategory::Structure,
                    Severity::Warning,
                    format!("page `{}` does not close with a call to action", page.slug),
                    Some(format!("{}/{}", page.slug, last.kind)),
                    "end every page with a call to action",
                );
            }
        }

        let distinct: std::collections::HashSet<SectionKind> =
            page.sections.iter().map(|s| s.kind).collect();
        if page.sections.len() >= 3 && distinct.len() < 3 {
            page_score -= 2.0;
            issue(
                issues,
                QualityCategory::Structure,
                Severity::Warning,
                format!("page `{}` repeats the same section kinds", page.slug),
                None,
                "vary the section mix on this page",
            );
        }

        total += clamp(page_score);
    }

    total / pages.len() as f32
}

// ---------------------------------------------------------------------------
// Content: non-empty copy, word counts, fallback penalty
// ---------------------------------------------------------------------------

fn score_content(pages: &[PageArtifact], issues: &mut Vec<QualityIssue>) -> f32 {
    let mut total_sections = 0usize;
    let mut empty = 0usize;
    let mut short = 0usize;
    let mut fallback = 0usize;

    for page in pages {
        for section in &page.sections {
            total_sections += 1;
            let section_ref = format!("{}/{}", page.slug, section.kind);

            if section.headline.trim().is_empty() || section.body.trim().is_empty() {
                empty += 1;
                issue(
                    issues,
                    QualityCategory::Content,
                    Severity::Error,
                    format!("section {section_ref} has empty copy"),
                    Some(section_ref.clone()),
                    "regenerate this section",
                );
            } else if section.body.split_whitespace().count() < min_words(section.kind) {
                short += 1;
                issue(
                    issues,
                    QualityCategory::Content,
                    Severity::Warning,
                    format!("section {section_ref} copy is too short"),
                    Some(section_ref.clone()),
                    "regenerate this section with a higher word target",
                );
            }

            if section.from_fallback {
                fallback += 1;
                issue(
                    issues,
                    QualityCategory::Content,
                    Severity::Warning,
                    format!("section {section_ref} still carries template fallback copy"),
                    Some(section_ref),
                    "regenerate this section",
                );
            }
        }
    }

    if total_sections == 0 {
        return 0.0;
    }
    let n = total_sections as f32;
    clamp(
        10.0 - 8.0 * (empty as f32 / n) - 3.0 * (short as f32 / n) - 4.0 * (fallback as f32 / n),
    )
}

// ---------------------------------------------------------------------------
// Conversion: a visitor can always take the next step
// ---------------------------------------------------------------------------

fn score_conversion(pages: &[PageArtifact], issues: &mut Vec<QualityIssue>) -> f32 {
    let mut score = 10.0;

    let has_kind = |kind: SectionKind| {
        pages
            .iter()
            .any(|p| p.sections.iter().any(|s| s.kind == kind))
    };

    if !has_kind(SectionKind::CallToAction) {
        score -= 4.0;
        issue(
            issues,
            QualityCategory::Conversion,
            Severity::Error,
            "no call to action anywhere on the site".to_string(),
            None,
            "add a closing call to action to every page",
        );
    }

    if !has_kind(SectionKind::ContactForm) {
        score -= 4.0;
        issue(
            issues,
            QualityCategory::Conversion,
            Severity::Error,
            "no contact form anywhere on the site".to_string(),
            None,
            "add a contact form to the contact page",
        );
    }

    if let Some(home) = pages.first() {
        if let Some(hero) = home.sections.iter().find(|s| s.kind == SectionKind::Hero) {
            if hero.headline.split_whitespace().count() < 2 {
                score -= 2.0;
                issue(
                    issues,
                    QualityCategory::Conversion,
                    Severity::Warning,
                    format!("page `{}` hero headline is too thin to convert", home.slug),
                    Some(format!("{}/{}", home.slug, SectionKind::Hero)),
                    "regenerate the hero with a fuller headline",
                );
            }
        }
    }

    clamp(score)
}

// ---------------------------------------------------------------------------
// SEO: metadata completeness and lengths
// ---------------------------------------------------------------------------

fn score_seo(pages: &[PageArtifact], issues: &mut Vec<QualityIssue>) -> f32 {
    if pages.is_empty() {
        return 0.0;
    }

    let mut total = 0.0;
    for page in pages {
        let mut page_score = 10.0;

        if page.seo.title.trim().is_empty() {
            page_score -= 4.0;
            issue(
                issues,
                QualityCategory::Seo,
                Severity::Error,
                format!("page `{}` has no title", page.slug),
                None,
                "derive a title from the page and business name",
            );
        } else if page.seo.title.chars().count() > 70 {
            page_score -= 1.0;
            issue(
                issues,
                QualityCategory::Seo,
                Severity::Info,
                format!("page `{}` title exceeds 70 characters", page.slug),
                None,
                "shorten the title",
            );
        }

        if page.seo.description.trim().is_empty() {
            page_score -= 4.0;
            issue(
                issues,
                QualityCategory::Seo,
                Severity::Error,
                format!("page `{}` has no meta description", page.slug),
                None,
                "derive a description from the hero or about copy",
            );
        } else if page.seo.description.chars().count() > 160 {
            page_score -= 2.0;
            issue(
                issues,
                QualityCategory::Seo,
                Severity::Warning,
                format!("page `{}` description exceeds 160 characters", page.slug),
                None,
                "clip the description at a word boundary",
            );
        }

        if page.seo.keywords.is_empty() {
            page_score -= 1.0;
            issue(
                issues,
                QualityCategory::Seo,
                Severity::Info,
                format!("page `{}` has no keyword hints", page.slug),
                None,
                "derive keywords from services and industry terms",
            );
        }

        total += clamp(page_score);
    }

    total / pages.len() as f32
}

// ---------------------------------------------------------------------------
// Distinctiveness: cross-page copy duplication
// ---------------------------------------------------------------------------

fn score_distinctiveness(pages: &[PageArtifact], issues: &mut Vec<QualityIssue>) -> f32 {
    use std::collections::HashMap;

    let mut seen: HashMap<String, String> = HashMap::new();
    let mut total = 0usize;
    let mut duplicated = 0usize;

    for page in pages {
        for section in &page.sections {
            total += 1;
            let key = section.headline.trim().to_lowercase();
            if key.is_empty() {
                continue;
            }
            let section_ref = format!("{}/{}", page.slug, section.kind);
            match seen.get(&key) {
                Some(first) if first != &section_ref => {
                    duplicated += 1;
                    issue(
                        issues,
                        QualityCategory::Distinctiveness,
                        Severity::Warning,
                        format!(
                            "section {section_ref} repeats the headline of {first}"
                        ),
                        Some(section_ref),
                        "regenerate this section for distinct copy",
                    );
                }
                Some(_) => {}
                None => {
                    seen.insert(key, section_ref);
                }
            }
        }
    }

    if total == 0 {
        return 0.0;
    }
    clamp(10.0 - 12.0 * (duplicated as f32 / total as f32))
}
