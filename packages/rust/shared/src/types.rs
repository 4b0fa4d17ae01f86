//! Core domain types for SiteForge generation runs.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current schema version for the bundle format.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// RunId
// ---------------------------------------------------------------------------

/// A UUID v7 wrapper for generation-run identifiers (time-sortable).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Generate a new time-sortable run identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RunId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

// ---------------------------------------------------------------------------
// Requirements
// ---------------------------------------------------------------------------

/// A single service the business offers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceOffering {
    /// Service name (e.g., "Brand Identity").
    pub name: String,
    /// Short description of the service.
    #[serde(default)]
    pub description: String,
}

/// Brand color overrides supplied by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrandColors {
    /// Primary brand color (hex, e.g., `#1a3c5e`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<String>,
    /// Secondary brand color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
    /// Accent brand color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
}

/// The validated business profile a generation run starts from.
///
/// Immutable once accepted by the normalizer; consumed read-only by all
/// pipeline stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Requirements {
    /// Business name (required).
    pub business_name: String,
    /// Free-form business type/industry text (e.g., "italian restaurant").
    #[serde(default)]
    pub business_type: String,
    /// Optional location string for local-business SEO hints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Target audience description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
    /// Copy tone (e.g., "warm", "professional").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
    /// Services the business offers.
    #[serde(default)]
    pub services: Vec<ServiceOffering>,
    /// Requested page names in display order (e.g., ["Home", "About"]).
    #[serde(default)]
    pub pages: Vec<String>,
    /// Brand color overrides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_colors: Option<BrandColors>,
    /// Style keywords influencing the theme (e.g., "minimal", "bold").
    #[serde(default)]
    pub style_keywords: Vec<String>,
    /// Explicit feature requests (e.g., "contact form", "social links").
    #[serde(default)]
    pub features: Vec<String>,
}

// ---------------------------------------------------------------------------
// GlobalTheme
// ---------------------------------------------------------------------------

/// Five-token color set shared by every page of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorTokens {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub text: String,
}

/// Heading/body font pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontPairing {
    pub heading: String,
    pub body: String,
}

/// Border-radius scale selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadiusScale {
    Sharp,
    Soft,
    Rounded,
}

/// Shadow depth selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShadowScale {
    Flat,
    Subtle,
    Elevated,
}

/// Component-variant choices applied uniformly across pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentVariants {
    /// Button treatment: "solid", "outline", or "pill".
    pub button: String,
    /// Card treatment: "bordered", "shadowed", or "flat".
    pub card: String,
    /// Navigation treatment: "bar", "centered", or "split".
    pub nav: String,
}

/// The single set of visual tokens shared by every page of one run.
///
/// Created exactly once per run by the style synthesizer and passed by
/// `Arc` to every downstream stage. No component after synthesis may
/// introduce new color or font values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalTheme {
    pub colors: ColorTokens,
    pub fonts: FontPairing,
    pub radius: RadiusScale,
    pub shadow: ShadowScale,
    pub variants: ComponentVariants,
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// A named content block kind within a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Hero,
    Services,
    About,
    Testimonials,
    Gallery,
    Faq,
    Team,
    Pricing,
    ContactForm,
    SocialLinks,
    CallToAction,
}

impl SectionKind {
    /// Stable slug used in prompts, logs, and issue references.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::Services => "services",
            Self::About => "about",
            Self::Testimonials => "testimonials",
            Self::Gallery => "gallery",
            Self::Faq => "faq",
            Self::Team => "team",
            Self::Pricing => "pricing",
            Self::ContactForm => "contact_form",
            Self::SocialLinks => "social_links",
            Self::CallToAction => "call_to_action",
        }
    }
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One planned section within a page, before content generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionSpec {
    /// Slug of the page this section belongs to.
    pub page_slug: String,
    /// Section kind.
    pub kind: SectionKind,
    /// Per-section feature flags (e.g., "map" on a contact form).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<String>,
}

/// An imagery instruction for one slot of a section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageDirective {
    /// Prompt for the external image capability.
    pub prompt: String,
    /// Accessibility alt text.
    pub alt: String,
    /// Target slot within the section (e.g., "background", "inline").
    pub slot: String,
}

/// Generated copy and imagery for one planned section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionContent {
    /// Section kind this content fills.
    pub kind: SectionKind,
    /// Headline copy.
    pub headline: String,
    /// Body copy.
    pub body: String,
    /// Optional bullet items (services, FAQ answers, ...).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bullets: Vec<String>,
    /// Image directives for this section.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ImageDirective>,
    /// Whether this content came from the deterministic fallback.
    #[serde(default)]
    pub from_fallback: bool,
}

// ---------------------------------------------------------------------------
// Pages and bundle
// ---------------------------------------------------------------------------

/// Cross-page navigation link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavLink {
    /// Display title.
    pub title: String,
    /// Target page slug.
    pub slug: String,
    /// Href relative to the site root (e.g., `/about`).
    pub href: String,
}

/// Per-page SEO metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeoMetadata {
    /// `<title>` content.
    pub title: String,
    /// Meta description (clipped to 160 chars).
    pub description: String,
    /// Keyword hints.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    /// Structured-data hints (business name, type, location).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structured: Option<serde_json::Value>,
}

/// One fully assembled page of the website.
#[derive(Debug, Clone, Serialize)]
pub struct PageArtifact {
    /// Unique page identifier (UUID v7).
    pub id: String,
    /// Display title (e.g., "About Us").
    pub title: String,
    /// URL slug (e.g., "about-us").
    pub slug: String,
    /// Ordered section content.
    pub sections: Vec<SectionContent>,
    /// Navigation links to sibling pages, in requested order.
    pub nav: Vec<NavLink>,
    /// SEO metadata.
    pub seo: SeoMetadata,
    /// Shared theme; identical `Arc` on every page of one run.
    pub theme: Arc<GlobalTheme>,
    /// Base path for asset references (e.g., `/assets/about-us`).
    pub asset_base: String,
    /// SHA-256 of the serialized section content.
    pub content_hash: String,
}

/// Stage timing entry recorded in bundle metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageTiming {
    /// Stage slug.
    pub stage: String,
    /// Wall-clock duration in milliseconds.
    pub elapsed_ms: u64,
}

/// Metadata record attached to a finished bundle.
#[derive(Debug, Clone, Serialize)]
pub struct BundleMeta {
    /// Schema version for forward compatibility.
    pub schema_version: u32,
    /// When the bundle was produced.
    pub created_at: DateTime<Utc>,
    /// Tool version that produced it.
    pub tool_version: String,
    /// Per-stage wall-clock timings.
    pub timings: Vec<StageTiming>,
    /// The final quality report.
    pub quality: QualityReport,
}

/// The terminal, immutable output of a successful generation run.
#[derive(Debug, Clone, Serialize)]
pub struct WebsiteBundle {
    /// Run identifier.
    pub run_id: RunId,
    /// Business name the site was generated for.
    pub business_name: String,
    /// The single shared theme record.
    pub theme: Arc<GlobalTheme>,
    /// Assembled pages; never empty in a returned bundle.
    pub pages: Vec<PageArtifact>,
    /// Requested pages that could not be assembled, by slug.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_pages: Vec<String>,
    /// Timings, versions, and the quality report.
    pub meta: BundleMeta,
}

// ---------------------------------------------------------------------------
// Quality
// ---------------------------------------------------------------------------

/// Fixed scoring categories for the quality gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityCategory {
    VisualDesign,
    Structure,
    Content,
    Conversion,
    Seo,
    Distinctiveness,
}

impl QualityCategory {
    /// All categories in scoring order.
    pub fn all() -> [QualityCategory; 6] {
        [
            Self::VisualDesign,
            Self::Structure,
            Self::Content,
            Self::Conversion,
            Self::Seo,
            Self::Distinctiveness,
        ]
    }

    /// Stable slug for logs and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VisualDesign => "visual_design",
            Self::Structure => "structure",
            Self::Content => "content",
            Self::Conversion => "conversion",
            Self::Seo => "seo",
            Self::Distinctiveness => "distinctiveness",
        }
    }
}

impl std::fmt::Display for QualityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Issue severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// One itemized quality issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityIssue {
    /// Category the issue counts against.
    pub category: QualityCategory,
    /// Severity.
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
    /// Implicated section, as `<page_slug>/<section_kind>` when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// Suggested fix, when one is known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_fix: Option<String>,
}

/// Per-category scores on a 0..=10 scale.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CategoryScores {
    pub visual_design: f32,
    pub structure: f32,
    pub content: f32,
    pub conversion: f32,
    pub seo: f32,
    pub distinctiveness: f32,
}

impl CategoryScores {
    /// Score for one category.
    pub fn get(&self, category: QualityCategory) -> f32 {
        match category {
            QualityCategory::VisualDesign => self.visual_design,
            QualityCategory::Structure => self.structure,
            QualityCategory::Content => self.content,
            QualityCategory::Conversion => self.conversion,
            QualityCategory::Seo => self.seo,
            QualityCategory::Distinctiveness => self.distinctiveness,
        }
    }

    /// Mean of all category scores.
    pub fn aggregate(&self) -> f32 {
        let sum: f32 = QualityCategory::all().iter().map(|c| self.get(*c)).sum();
        sum / QualityCategory::all().len() as f32
    }
}

/// The quality gate's verdict on a bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityReport {
    /// Per-category scores.
    pub scores: CategoryScores,
    /// Aggregate (mean) score.
    pub aggregate: f32,
    /// Whether every category met the configured threshold.
    pub meets_thresholds: bool,
    /// Itemized issues with severity and suggested fixes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<QualityIssue>,
    /// Repair rounds consumed before this report was final.
    pub rounds_used: u32,
}

// ---------------------------------------------------------------------------
// Progress events
// ---------------------------------------------------------------------------

/// Pipeline stages in execution order, plus terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Validating,
    Resolving,
    Planning,
    Theming,
    Generating,
    Assembling,
    Enriching,
    Scoring,
    Repairing,
    Complete,
    Cancelled,
    Error,
}

impl Stage {
    /// Stable slug emitted on the progress stream.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validating => "validating",
            Self::Resolving => "resolving",
            Self::Planning => "planning",
            Self::Theming => "theming",
            Self::Generating => "generating",
            Self::Assembling => "assembling",
            Self::Enriching => "enriching",
            Self::Scoring => "scoring",
            Self::Repairing => "repairing",
            Self::Complete => "complete",
            Self::Cancelled => "cancelled",
            Self::Error => "error",
        }
    }

    /// Whether this stage ends the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Cancelled | Self::Error)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error payload carried only by the terminal error event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressError {
    /// Human-readable failure description.
    pub message: String,
    /// Stage the run failed in.
    pub stage: String,
}

/// One unit of the streamed status sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// Current pipeline stage.
    pub stage: Stage,
    /// Completion percentage, monotonically non-decreasing within a run.
    pub progress: u8,
    /// Human-readable status message.
    pub message: String,
    /// Payload, populated only on the terminal completion event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    /// Error payload, populated only on the terminal error event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ProgressError>,
}
