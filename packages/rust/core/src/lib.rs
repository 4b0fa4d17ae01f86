//! Pipeline orchestration for SiteForge.
//!
//! Wires the stage crates together: assembly ([`assembler`]), SEO
//! enrichment ([`seo`]), progress emission ([`progress`]), and the
//! end-to-end run state machine ([`pipeline`]).

pub mod assembler;
pub mod pipeline;
pub mod progress;
pub mod seo;

pub use assembler::{AssembleResult, assemble};
pub use pipeline::generate_site;
pub use progress::ProgressEmitter;
