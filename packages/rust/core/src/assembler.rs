//! Multi-page assembly.
//!
//! Merges generated section content with the single shared theme into
//! [`PageArtifact`]s: sibling navigation in requested page order, one
//! consistent asset base path scheme, and a content hash per page.
//! Pages that produced no sections are skipped and recorded, fatal only
//! when nothing at all could be assembled.

use std::sync::Arc;

use sha2::{Digest, Sha256};
use siteforge_shared::{
    GlobalTheme, NavLink, PageArtifact, Result, SeoMetadata, SiteForgeError,
};
use siteforge_content::PageContent;
use tracing::{instrument, warn};

/// Assembled pages plus the slugs that could not be assembled.
#[derive(Debug)]
pub struct AssembleResult {
    /// Pages in requested order; never empty.
    pub pages: Vec<PageArtifact>,
    /// Requested slugs skipped for lack of content.
    pub missing: Vec<String>,
}

/// Merge page content with the shared theme into final page artifacts.
#[instrument(skip_all, fields(pages = contents.len()))]
pub fn assemble(contents: &[PageContent], theme: &Arc<GlobalTheme>) -> Result<AssembleResult> {
    let mut missing = Vec::new();
    let kept: Vec<&PageContent> = contents
        .iter()
        .filter(|page| {
            if page.sections.is_empty() {
                warn!(slug = %page.slug, "skipping page with no sections");
                missing.push(page.slug.clone());
                false
            } else {
                true
            }
        })
        .collect();

    if kept.is_empty() {
        return Err(SiteForgeError::assembly(
            "no pages could be assembled from the generated content",
        ));
    }

    // Navigation reflects only the pages that made it, in order.
    let nav: Vec<NavLink> = kept
        .iter()
        .map(|page| NavLink {
            title: page.title.clone(),
            slug: page.slug.clone(),
            href: page_href(&page.slug),
        })
        .collect();

    let pages = kept
        .iter()
        .map(|page| PageArtifact {
            id: uuid::Uuid::now_v7().to_string(),
            title: page.title.clone(),
            slug: page.slug.clone(),
            sections: page.sections.clone(),
            nav: nav.clone(),
            // Filled by the enricher; assembly stays non-generative.
            seo: SeoMetadata {
                title: String::new(),
                description: String::new(),
                keywords: vec![],
                structured: None,
            },
            theme: Arc::clone(theme),
            asset_base: format!("/assets/{}", page.slug),
            content_hash: content_hash(&page.sections),
        })
        .collect();

    Ok(AssembleResult { pages, missing })
}

/// Site-root-relative href for a page slug.
pub fn page_href(slug: &str) -> String {
    if slug == "home" {
        "/".to_string()
    } else {
        format!("/{slug}")
    }
}

/// SHA-256 over the canonical JSON serialization of a page's sections.
pub fn content_hash<T: serde::Serialize>(sections: &T) -> String {
    let json = serde_json::to_vec(sections).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(&json);
    format!("{:x}", hasher.finalize())
}
