//! Requirements normalization, industry profiles, and section planning.
//!
//! The first three pipeline stages live here:
//! - [`normalize`]: validate and default-fill the business profile
//! - [`resolve`]: pick the best-matching [`IndustryProfile`]
//! - [`plan_pages`]: produce the ordered section list per page

pub mod normalize;
pub mod planner;
pub mod registry;
pub mod resolver;

pub use normalize::{normalize, slugify};
pub use planner::{PagePlan, plan_pages};
pub use registry::{IndustryProfile, ProfileRegistry};
pub use resolver::resolve;
