//! Section planning.
//!
//! Produces an ordered section list per requested page, seeded by the
//! industry profile's default recipe and adjusted by explicit feature
//! requests. Guarantees: every page starts with a hero and closes with
//! a call to action, and at least one page of the site carries a
//! contact form.

use siteforge_shared::{Requirements, SectionKind, SectionSpec};
use tracing::debug;

use crate::normalize::slugify;
use crate::registry::IndustryProfile;

/// The planned structure of one page, before content generation.
#[derive(Debug, Clone)]
pub struct PagePlan {
    /// Display title as requested (e.g., "About Us").
    pub title: String,
    /// URL slug.
    pub slug: String,
    /// Ordered sections.
    pub sections: Vec<SectionSpec>,
}

/// Recognized page archetypes used to pick a base recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageKind {
    Home,
    About,
    Services,
    Contact,
    Gallery,
    Pricing,
    Faq,
    Team,
    Other,
}

/// Plan sections for every requested page, preserving requested order.
pub fn plan_pages(profile: &IndustryProfile, requirements: &Requirements) -> Vec<PagePlan> {
    let removals = removal_requests(&requirements.features);
    let additions = addition_requests(&requirements.features);

    let kinds: Vec<PageKind> = requirements.pages.iter().map(|p| classify(p)).collect();
    let contact_page = kinds.iter().position(|k| *k == PageKind::Contact);

    let mut plans = Vec::with_capacity(requirements.pages.len());

    for (index, title) in requirements.pages.iter().enumerate() {
        let kind = kinds[index];
        let slug = slugify(title);
        let mut recipe = base_recipe(profile, kind);

        // Explicit feature additions land on the page they belong to:
        // the matching archetype page when one was requested, the first
        // page otherwise.
        for added in &additions {
            let target = preferred_page(*added, &kinds, contact_page);
            if target == index {
                recipe.push(*added);
            }
        }

        // Explicit removals ("no testimonials") apply to every page.
        recipe.retain(|kind| !removals.contains(kind));

        let sections = finalize(recipe, &slug);
        plans.push(PagePlan {
            title: title.clone(),
            slug,
            sections,
        });
    }

    // Site-level guarantee: visitors can always reach a contact form.
    if !plans.is_empty()
        && !plans
        .iter()
        .flat_map(|p| &p.sections)
        .any(|s| s.kind == SectionKind::ContactForm)
        && !removals.contains(&SectionKind::ContactForm)
    {
        let target = contact_page.unwrap_or(plans.len() - 1);
        let plan = &mut plans[target];
        let insert_at = plan.sections.len().saturating_sub(1);
        plan.sections.insert(
            insert_at,
            SectionSpec {
                page_slug: plan.slug.clone(),
                kind: SectionKind::ContactForm,
                flags: vec![],
            },
        );
    }

    debug!(
        pages = plans.len(),
        sections = plans.iter().map(|p| p.sections.len()).sum::<usize>(),
        profile = %profile.id,
        "section plan ready"
    );

    plans
}

/// De-duplicate by kind (first position wins), then enforce hero-first
/// and call-to-action-last.
fn finalize(recipe: Vec<SectionKind>, slug: &str) -> Vec<SectionSpec> {
    let mut kinds: Vec<SectionKind> = Vec::with_capacity(recipe.len());
    for kind in recipe {
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }

    if kinds.first() != Some(&SectionKind::Hero) {
        kinds.retain(|k| *k != SectionKind::Hero);
        kinds.insert(0, SectionKind::Hero);
    }
    kinds.retain(|k| *k != SectionKind::CallToAction);
    kinds.push(SectionKind::CallToAction);

    kinds
        .into_iter()
        .map(|kind| SectionSpec {
            page_slug: slug.to_string(),
            kind,
            flags: vec![],
        })
        .collect()
}

/// Base recipe for a page archetype; the home page uses the profile's own.
fn base_recipe(profile: &IndustryProfile, kind: PageKind) -> Vec<SectionKind> {
    use SectionKind::*;
    match kind {
        PageKind::Home => profile.home_recipe.clone(),
        PageKind::About => vec![Hero, About, Team, Testimonials, CallToAction],
        PageKind::Services => vec![Hero, Services, Faq, CallToAction],
        PageKind::Contact => vec![Hero, ContactForm, Faq, CallToAction],
        PageKind::Gallery => vec![Hero, Gallery, Testimonials, CallToAction],
        PageKind::Pricing => vec![Hero, Pricing, Faq, CallToAction],
        PageKind::Faq => vec![Hero, Faq, CallToAction],
        PageKind::Team => vec![Hero, Team, About, CallToAction],
        PageKind::Other => vec![Hero, About, Services, CallToAction],
    }
}

/// Classify a requested page title into an archetype.
fn classify(title: &str) -> PageKind {
    let slug = slugify(title);
    if slug == "home" || slug == "index" {
        PageKind::Home
    } else if slug.contains("about") || slug.contains("story") {
        PageKind::About
    } else if slug.contains("service") || slug.contains("menu") || slug.contains("what-we-do") {
        PageKind::Services
    } else if slug.contains("contact") || slug.contains("book") || slug.contains("quote") {
        PageKind::Contact
    } else if slug.contains("gallery") || slug.contains("portfolio") || slug.contains("work") {
        PageKind::Gallery
    } else if slug.contains("pricing") || slug.contains("plans") || slug.contains("rates") {
        PageKind::Pricing
    } else if slug.contains("faq") || slug.contains("questions") {
        PageKind::Faq
    } else if slug.contains("team") || slug.contains("staff") || slug.contains("people") {
        PageKind::Team
    } else {
        PageKind::Other
    }
}

/// Pick the page index a feature section should land on.
fn preferred_page(kind: SectionKind, kinds: &[PageKind], contact_page: Option<usize>) -> usize {
    let archetype = match kind {
        SectionKind::ContactForm => return contact_page.unwrap_or(0),
        SectionKind::Gallery => PageKind::Gallery,
        SectionKind::Pricing => PageKind::Pricing,
        SectionKind::Faq => PageKind::Faq,
        SectionKind::Team => PageKind::Team,
        _ => PageKind::Home,
    };
    kinds
        .iter()
        .position(|k| *k == archetype)
        .or_else(|| kinds.iter().position(|k| *k == PageKind::Home))
        .unwrap_or(0)
}

/// Map "no X" feature strings to section kinds to remove.
fn removal_requests(features: &[String]) -> Vec<SectionKind> {
    features
        .iter()
        .filter_map(|f| f.strip_prefix("no "))
        .filter_map(feature_kind)
        .collect()
}

/// Map feature strings to section kinds to add.
fn addition_requests(features: &[String]) -> Vec<SectionKind> {
    features
        .iter()
        .filter(|f| !f.starts_with("no "))
        .filter_map(|f| feature_kind(f))
        .collect()
}

/// Recognize a feature request as a section kind.
fn feature_kind(feature: &str) -> Option<SectionKind> {
    let f = feature.trim();
    match f {
        "contact form" | "contact" | "booking form" => Some(SectionKind::ContactForm),
        "social links" | "social media" | "socials" => Some(SectionKind::SocialLinks),
        "gallery" | "portfolio" | "photos" => Some(SectionKind::Gallery),
        "testimonials" | "reviews" => Some(SectionKind::Testimonials),
        "faq" | "faqs" => Some(SectionKind::Faq),
        "pricing" | "price list" => Some(SectionKind::Pricing),
        "team" | "staff" => Some(SectionKind::Team),
        _ => None,
    }
}
