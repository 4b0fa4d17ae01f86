//! Shared types, error model, and configuration for SiteForge.
//!
//! This crate is the foundation depended on by all other SiteForge crates.
//! It provides:
//! - [`SiteForgeError`]: the unified error type
//! - Domain types ([`Requirements`], [`GlobalTheme`], [`PageArtifact`],
//!   [`WebsiteBundle`], [`ProgressEvent`], [`QualityReport`], [`RunId`])
//! - Configuration ([`AppConfig`], [`PipelineConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, GenerationConfig, GenerativeConfig, PipelineConfig, QualityConfig,
    config_dir, config_file_path, init_config, load_config, load_config_from, validate_api_key,
};
pub use error::{Result, SiteForgeError};
pub use types::{
    BrandColors, BundleMeta, CURRENT_SCHEMA_VERSION, CategoryScores, ColorTokens,
    ComponentVariants, FontPairing, GlobalTheme, ImageDirective, NavLink, PageArtifact,
    ProgressError, ProgressEvent, QualityCategory, QualityIssue, QualityReport, RadiusScale,
    Requirements, RunId, SectionContent, SectionKind, SectionSpec, SeoMetadata, ServiceOffering,
    Severity, ShadowScale, Stage, StageTiming, WebsiteBundle,
};
