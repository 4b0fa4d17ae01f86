//! Built-in industry profiles.
//!
//! A profile bundles default visual and tonal guidance keyed by
//! business-type keywords. Profiles are registered in a fixed order;
//! the resolver breaks score ties by that order, and the "general"
//! profile is the always-last fallback.

use siteforge_shared::{ColorTokens, FontPairing, SectionKind};

/// A named bundle of default visual and tonal guidance.
#[derive(Debug, Clone)]
pub struct IndustryProfile {
    /// Stable profile identifier (e.g., "restaurant").
    pub id: String,
    /// Keywords matched against business-type text.
    pub keywords: Vec<String>,
    /// Default color palette.
    pub palette: ColorTokens,
    /// Default font pairing.
    pub fonts: FontPairing,
    /// Imagery direction strings fed into image prompts.
    pub imagery: Vec<String>,
    /// Copy tone guidance fed into text prompts and fallback templates.
    pub tone_guidance: String,
    /// Default section recipe for the home page.
    pub home_recipe: Vec<SectionKind>,
}

/// Holds registered profiles in priority order.
pub struct ProfileRegistry {
    profiles: Vec<IndustryProfile>,
}

impl ProfileRegistry {
    /// Create a registry with all built-in profiles (specific first, general last).
    pub fn new() -> Self {
        Self {
            profiles: built_in_profiles(),
        }
    }

    /// All registered profiles in registration order.
    pub fn all(&self) -> &[IndustryProfile] {
        &self.profiles
    }

    /// Look up a profile by id.
    pub fn get(&self, id: &str) -> Option<&IndustryProfile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    /// The always-available fallback profile.
    pub fn general(&self) -> &IndustryProfile {
        self.profiles
            .last()
            .expect("registry always contains the general profile")
    }
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn palette(primary: &str, secondary: &str, accent: &str, background: &str, text: &str) -> ColorTokens {
    ColorTokens {
        primary: primary.into(),
        secondary: secondary.into(),
        accent: accent.into(),
        background: background.into(),
        text: text.into(),
    }
}

fn fonts(heading: &str, body: &str) -> FontPairing {
    FontPairing {
        heading: heading.into(),
        body: body.into(),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn built_in_profiles() -> Vec<IndustryProfile> {
    use SectionKind::*;

    vec![
        IndustryProfile {
            id: "restaurant".into(),
            keywords: strings(&[
                "restaurant", "cafe", "bistro", "bakery", "bar", "catering", "food", "pizzeria",
                "diner", "coffee",
            ]),
            palette: palette("#7c2d12", "#a16207", "#ea580c", "#fffbf5", "#292524"),
            fonts: fonts("Playfair Display", "Lato"),
            imagery: strings(&[
                "warm candlelit dining room",
                "close-up of an artfully plated dish",
                "chef at work in an open kitchen",
            ]),
            tone_guidance: "warm and inviting, evoking taste and atmosphere".into(),
            home_recipe: vec![Hero, About, Services, Gallery, Testimonials, CallToAction],
        },
        IndustryProfile {
            id: "law".into(),
            keywords: strings(&[
                "law", "lawyer", "attorney", "legal", "firm", "notary", "solicitor",
            ]),
            palette: palette("#1e3a5f", "#475569", "#b08d57", "#f8fafc", "#0f172a"),
            fonts: fonts("Merriweather", "Source Sans 3"),
            imagery: strings(&[
                "confident professionals in a modern office",
                "scales of justice on a mahogany desk",
                "city skyline at dusk",
            ]),
            tone_guidance: "authoritative and reassuring, plain language over jargon".into(),
            home_recipe: vec![Hero, Services, About, Team, Testimonials, CallToAction],
        },
        IndustryProfile {
            id: "fitness".into(),
            keywords: strings(&[
                "gym", "fitness", "yoga", "pilates", "crossfit", "training", "coach", "wellness",
            ]),
            palette: palette("#14532d", "#166534", "#f59e0b", "#ffffff", "#111827"),
            fonts: fonts("Montserrat", "Open Sans"),
            imagery: strings(&[
                "athlete mid-workout in dramatic lighting",
                "bright studio space with natural light",
                "group class full of energy",
            ]),
            tone_guidance: "energetic and motivating, action verbs, short sentences".into(),
            home_recipe: vec![Hero, Services, About, Pricing, Testimonials, CallToAction],
        },
        IndustryProfile {
            id: "salon".into(),
            keywords: strings(&[
                "salon", "spa", "beauty", "hair", "nails", "barber", "makeup", "skincare",
            ]),
            palette: palette("#831843", "#9d174d", "#f9a8d4", "#fdf2f8", "#374151"),
            fonts: fonts("Cormorant Garamond", "Nunito Sans"),
            imagery: strings(&[
                "serene treatment room with soft textures",
                "stylist at work, shallow depth of field",
                "flat lay of premium products",
            ]),
            tone_guidance: "pampering and personal, sensory language".into(),
            home_recipe: vec![Hero, Services, Gallery, About, Testimonials, CallToAction],
        },
        IndustryProfile {
            id: "tech".into(),
            keywords: strings(&[
                "software", "tech", "startup", "saas", "app", "development", "it", "digital",
                "agency", "consulting",
            ]),
            palette: palette("#1d4ed8", "#3730a3", "#06b6d4", "#ffffff", "#0f172a"),
            fonts: fonts("Inter", "Inter"),
            imagery: strings(&[
                "abstract gradient mesh background",
                "product interface on a laptop screen",
                "team collaborating around a whiteboard",
            ]),
            tone_guidance: "clear and confident, outcome-focused, no buzzword soup".into(),
            home_recipe: vec![Hero, Services, About, Pricing, Faq, CallToAction],
        },
        IndustryProfile {
            id: "medical".into(),
            keywords: strings(&[
                "clinic", "medical", "doctor", "dental", "dentist", "health", "therapy",
                "chiropractic", "veterinary", "vet",
            ]),
            palette: palette("#0e7490", "#155e75", "#2dd4bf", "#f0fdfa", "#134e4a"),
            fonts: fonts("Source Serif 4", "Source Sans 3"),
            imagery: strings(&[
                "welcoming reception area in soft light",
                "caring practitioner with a patient",
                "clean modern examination room",
            ]),
            tone_guidance: "calm and trustworthy, empathetic, avoids alarmism".into(),
            home_recipe: vec![Hero, Services, About, Team, Faq, CallToAction],
        },
        IndustryProfile {
            id: "real-estate".into(),
            keywords: strings(&[
                "real estate", "realtor", "property", "homes", "broker", "realty", "mortgage",
            ]),
            palette: palette("#374151", "#1f2937", "#d97706", "#f9fafb", "#111827"),
            fonts: fonts("DM Serif Display", "DM Sans"),
            imagery: strings(&[
                "sunlit living room with staging",
                "exterior of a craftsman home at golden hour",
                "agent handing over keys",
            ]),
            tone_guidance: "aspirational yet grounded, emphasizes local expertise".into(),
            home_recipe: vec![Hero, Services, Gallery, About, Testimonials, CallToAction],
        },
        IndustryProfile {
            id: "creative".into(),
            keywords: strings(&[
                "design", "studio", "photography", "art", "creative", "branding", "film", "media",
            ]),
            palette: palette("#18181b", "#3f3f46", "#e11d48", "#fafafa", "#18181b"),
            fonts: fonts("Space Grotesk", "Work Sans"),
            imagery: strings(&[
                "bold portfolio piece full-bleed",
                "studio workspace with work in progress",
                "moodboard wall with printed references",
            ]),
            tone_guidance: "distinctive and confident, lets the work speak".into(),
            home_recipe: vec![Hero, Gallery, About, Services, Testimonials, CallToAction],
        },
        IndustryProfile {
            id: "trades".into(),
            keywords: strings(&[
                "plumbing", "plumber", "electric", "electrician", "roofing", "hvac",
                "construction", "landscaping", "contractor", "repair", "cleaning",
            ]),
            palette: palette("#b45309", "#78350f", "#fbbf24", "#fffbeb", "#1c1917"),
            fonts: fonts("Oswald", "Roboto"),
            imagery: strings(&[
                "tradesperson on the job, candid",
                "before-and-after of completed work",
                "branded van in front of a home",
            ]),
            tone_guidance: "straight-talking and dependable, leads with the guarantee".into(),
            home_recipe: vec![Hero, Services, About, Testimonials, Faq, CallToAction],
        },
        // Always last: the resolver falls back here below the match threshold.
        IndustryProfile {
            id: "general".into(),
            keywords: strings(&["business", "local", "company", "services", "shop", "store"]),
            palette: palette("#334155", "#475569", "#0ea5e9", "#ffffff", "#0f172a"),
            fonts: fonts("Poppins", "Open Sans"),
            imagery: strings(&[
                "friendly storefront exterior",
                "owner greeting a customer",
                "detail shot of quality work",
            ]),
            tone_guidance: "friendly and professional, concrete over generic".into(),
            home_recipe: vec![Hero, Services, About, Testimonials, CallToAction],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_contains_general_last() {
        let registry = ProfileRegistry::new();
        assert_eq!(registry.general().id, "general");
        assert!(registry.all().len() >= 10);
    }

    #[test]
    fn profile_lookup_by_id() {
        let registry = ProfileRegistry::new();
        assert!(registry.get("restaurant").is_some());
        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn every_profile_is_complete() {
        let registry = ProfileRegistry::new();
        for profile in registry.all() {
            assert!(!profile.keywords.is_empty(), "{} has no keywords", profile.id);
            assert!(!profile.palette.primary.is_empty());
            assert!(!profile.fonts.heading.is_empty());
            assert!(!profile.imagery.is_empty());
            assert!(!profile.tone_guidance.is_empty());
            assert_eq!(
                profile.home_recipe.first(),
                Some(&SectionKind::Hero),
                "{} home recipe must start with hero",
                profile.id
            );
            assert_eq!(
                profile.home_recipe.last(),
                Some(&SectionKind::CallToAction),
                "{} home recipe must end with call to action",
                profile.id
            );
        }
    }
}
