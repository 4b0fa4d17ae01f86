//! Section content generation against an external generative capability.
//!
//! The [`client`] module defines the capability contract and its HTTP
//! implementation, [`retry`] the unified backoff-and-fallback policy,
//! and [`generator`] the concurrent per-section generation pass.

pub mod client;
pub mod generator;
pub mod retry;

pub use client::{
    GenerativeClient, GenerativeKind, GenerativeRequest, GenerativeResponse, HttpGenerativeClient,
};
pub use generator::{
    GenerateOptions, GenerationOutput, PageContent, SectionProgress, SilentSectionProgress,
    generate_sections, regenerate_sections,
};
pub use retry::{Retried, RetryPolicy, retry_with_fallback};
