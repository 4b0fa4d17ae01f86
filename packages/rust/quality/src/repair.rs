//! Repair-target selection from a quality report.
//!
//! Only copy-level shortfalls can be fixed by regeneration: content and
//! distinctiveness issues name a `<page_slug>/<section_kind>` that a
//! fresh generative pass may improve. Structural, conversion, visual,
//! and SEO deductions are deterministic properties of the plan, theme,
//! or enricher and regenerating copy would not move them.

use siteforge_shared::{QualityCategory, QualityReport, SectionKind};

/// Categories the repair loop can act on.
const REPAIRABLE: [QualityCategory; 2] =
    [QualityCategory::Content, QualityCategory::Distinctiveness];

/// Sections to regenerate, in issue order, de-duplicated.
///
/// Empty when the report already meets thresholds or when nothing that
/// failed is copy-repairable.
pub fn repair_targets(report: &QualityReport, threshold: f32) -> Vec<(String, SectionKind)> {
    if report.meets_thresholds {
        return Vec::new();
    }

    let failing: Vec<QualityCategory> = REPAIRABLE
        .into_iter()
        .filter(|c| report.scores.get(*c) < threshold)
        .collect();

    let mut targets = Vec::new();
    for issue in &report.issues {
        if !failing.contains(&issue.category) {
            continue;
        }
        let Some(section_ref) = issue.section.as_deref() else {
            continue;
        };
        let Some(target) = parse_section_ref(section_ref) else {
            continue;
        };
        if !targets.contains(&target) {
            targets.push(target);
        }
    }
    targets
}

/// Parse a `<page_slug>/<section_kind>` issue reference.
fn parse_section_ref(section_ref: &str) -> Option<(String, SectionKind)> {
    let (slug, kind) = section_ref.rsplit_once('/')?;
    Some((slug.to_string(), kind_from_slug(kind)?))
}

fn kind_from_slug(slug: &str) -> Option<SectionKind> {
    let all = [
        SectionKind::Hero,
        SectionKind::Services,
        SectionKind::About,
        SectionKind::Testimonials,
        SectionKind::Gallery,
        SectionKind::Faq,
        SectionKind::Team,
        SectionKind::Pricing,
        SectionKind::ContactForm,
        SectionKind::SocialLinks,
        SectionKind::CallToAction,
    ];
    all.into_iter().find(|k| k.as_str() == slug)
}

#[cfg(test)]
mod tests {
    use super::*;
    use siteforge_shared::{CategoryScores, QualityIssue, Severity};

    fn report(content_score: f32, issues: Vec<QualityIssue>) -> QualityReport {
        let scores = CategoryScores {
            visual_design: 10.0,
            structure: 10.0,
            content: content_score,
            conversion: 10.0,
            seo: 10.0,
            distinctiveness: 10.0,
        };
        QualityReport {
            scores,
            aggregate: scores.aggregate(),
            meets_thresholds: content_score >= 7.5,
            issues,
            rounds_used: 0,
        }
    }

    fn content_issue(section: &str) -> QualityIssue {
        QualityIssue {
            category: QualityCategory::Content,
            severity: Severity::Warning,
            message: format!("section {section} copy is too short"),
            section: Some(section.to_string()),
            suggested_fix: None,
        }
    }

    #[test]
    fn passing_report_yields_no_targets() {
        let r = report(9.0, vec![content_issue("home/hero")]);
        assert!(repair_targets(&r, 7.5).is_empty());
    }

    #[test]
    fn failing_content_issues_become_targets_in_order() {
        let r = report(
            4.0,
            vec![
                content_issue("home/hero"),
                content_issue("about/call_to_action"),
                content_issue("home/hero"),
            ],
        );
        let targets = repair_targets(&r, 7.5);
        assert_eq!(
            targets,
            vec![
                ("home".to_string(), SectionKind::Hero),
                ("about".to_string(), SectionKind::CallToAction),
            ]
        );
    }

    #[test]
    fn issues_without_section_refs_are_skipped() {
        let mut issue = content_issue("home/hero");
        issue.section = None;
        let r = report(4.0, vec![issue]);
        assert!(repair_targets(&r, 7.5).is_empty());
    }

    #[test]
    fn non_repairable_categories_are_ignored() {
        let mut issue = content_issue("home/hero");
        issue.category = QualityCategory::Structure;
        let mut r = report(9.0, vec![issue]);
        r.scores.structure = 3.0;
        r.meets_thresholds = false;
        assert!(repair_targets(&r, 7.5).is_empty());
    }

    #[test]
    fn section_refs_parse_the_issue_format() {
        assert_eq!(
            parse_section_ref("about-us/contact_form"),
            Some(("about-us".to_string(), SectionKind::ContactForm))
        );
        assert_eq!(parse_section_ref("no-slash"), None);
        assert_eq!(parse_section_ref("home/unknown"), None);
    }
}
