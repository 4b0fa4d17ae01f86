//! Style synthesis.
//!
//! Derives the single [`GlobalTheme`] for a run from the industry
//! profile's defaults plus explicit brand overrides. This is the one
//! synchronization point for cross-page visual consistency: no
//! component after this step may introduce new color or font values.

use siteforge_profiles::IndustryProfile;
use siteforge_shared::{
    ComponentVariants, GlobalTheme, RadiusScale, Requirements, ShadowScale,
};
use tracing::debug;

/// Synthesize the run's global theme.
///
/// Override precedence is field-by-field: caller brand colors beat the
/// profile palette; unspecified fields inherit from the profile. Style
/// keywords adjust the radius/shadow/variant selections. Deterministic
/// for identical inputs.
pub fn synthesize(profile: &IndustryProfile, requirements: &Requirements) -> GlobalTheme {
    let mut colors = profile.palette.clone();

    if let Some(brand) = &requirements.brand_colors {
        if let Some(primary) = normalize_hex(brand.primary.as_deref()) {
            colors.primary = primary;
        }
        if let Some(secondary) = normalize_hex(brand.secondary.as_deref()) {
            colors.secondary = secondary;
        }
        if let Some(accent) = normalize_hex(brand.accent.as_deref()) {
            colors.accent = accent;
        }
    }

    let (radius, shadow, variants) = select_variants(&requirements.style_keywords);

    let theme = GlobalTheme {
        colors,
        fonts: profile.fonts.clone(),
        radius,
        shadow,
        variants,
    };

    debug!(
        profile = %profile.id,
        primary = %theme.colors.primary,
        heading_font = %theme.fonts.heading,
        "global theme synthesized"
    );

    theme
}

/// Map style keywords to radius/shadow/component-variant selections.
///
/// Later keywords win when they conflict, matching caller intent order.
fn select_variants(keywords: &[String]) -> (RadiusScale, ShadowScale, ComponentVariants) {
    let mut radius = RadiusScale::Soft;
    let mut shadow = ShadowScale::Subtle;
    let mut button = "solid";
    let mut card = "shadowed";
    let mut nav = "bar";

    for keyword in keywords {
        match keyword.as_str() {
            "minimal" | "clean" | "modern" => {
                radius = RadiusScale::Sharp;
                shadow = ShadowScale::Flat;
                button = "outline";
                card = "flat";
            }
            "bold" | "vibrant" | "playful" => {
                radius = RadiusScale::Rounded;
                shadow = ShadowScale::Elevated;
                button = "pill";
                card = "shadowed";
            }
            "elegant" | "classic" | "luxury" => {
                radius = RadiusScale::Soft;
                shadow = ShadowScale::Subtle;
                button = "solid";
                card = "bordered";
                nav = "centered";
            }
            _ => {}
        }
    }

    (
        radius,
        shadow,
        ComponentVariants {
            button: button.into(),
            card: card.into(),
            nav: nav.into(),
        },
    )
}

/// Accept `#rgb` / `#rrggbb` (case-insensitive), reject everything else.
/// Shorthand expands to six digits so the theme carries exactly one
/// canonical color form. Invalid overrides are ignored so a bad color
/// never breaks theming.
fn normalize_hex(value: Option<&str>) -> Option<String> {
    let v = value?.trim();
    let digits = v.strip_prefix('#')?;
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match digits.len() {
        3 => {
            let expanded: String = digits
                .to_lowercase()
                .chars()
                .flat_map(|c| [c, c])
                .collect();
            Some(format!("#{expanded}"))
        }
        6 => Some(format!("#{}", digits.to_lowercase())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use siteforge_profiles::ProfileRegistry;
    use siteforge_shared::BrandColors;

    fn requirements() -> Requirements {
        Requirements {
            business_name: "Aurora Design Studio".into(),
            business_type: "design studio".into(),
            location: None,
            audience: None,
            tone: Some("professional".into()),
            services: vec![],
            pages: vec!["Home".into()],
            brand_colors: None,
            style_keywords: vec![],
            features: vec![],
        }
    }

    #[test]
    fn theme_inherits_profile_palette() {
        let registry = ProfileRegistry::new();
        let profile = registry.get("tech").unwrap();
        let theme = synthesize(profile, &requirements());
        assert_eq!(theme.colors.primary, profile.palette.primary);
        assert_eq!(theme.fonts, profile.fonts);
    }

    #[test]
    fn brand_overrides_win_field_by_field() {
        let registry = ProfileRegistry::new();
        let profile = registry.get("tech").unwrap();
        let mut req = requirements();
        req.brand_colors = Some(BrandColors {
            primary: Some("#FF8800".into()),
            secondary: None,
            accent: None,
        });
        let theme = synthesize(profile, &req);
        assert_eq!(theme.colors.primary, "#ff8800");
        // Unspecified fields inherit.
        assert_eq!(theme.colors.secondary, profile.palette.secondary);
        assert_eq!(theme.colors.accent, profile.palette.accent);
    }

    #[test]
    fn invalid_hex_overrides_are_ignored() {
        let registry = ProfileRegistry::new();
        let profile = registry.general();
        let mut req = requirements();
        req.brand_colors = Some(BrandColors {
            primary: Some("bright orange".into()),
            secondary: Some("#12345".into()),
            accent: None,
        });
        let theme = synthesize(profile, &req);
        assert_eq!(theme.colors.primary, profile.palette.primary);
        assert_eq!(theme.colors.secondary, profile.palette.secondary);
    }

    #[test]
    fn style_keywords_flip_variants() {
        let registry = ProfileRegistry::new();
        let profile = registry.general();
        let mut req = requirements();
        req.style_keywords = vec!["minimal".into()];
        let theme = synthesize(profile, &req);
        assert_eq!(theme.radius, RadiusScale::Sharp);
        assert_eq!(theme.shadow, ShadowScale::Flat);
        assert_eq!(theme.variants.button, "outline");
    }

    #[test]
    fn synthesis_is_deterministic() {
        let registry = ProfileRegistry::new();
        let profile = registry.get("restaurant").unwrap();
        let mut req = requirements();
        req.style_keywords = vec!["elegant".into()];
        let first = synthesize(profile, &req);
        let second = synthesize(profile, &req);
        assert_eq!(first, second);
    }

    #[test]
    fn shorthand_hex_expands_to_six_digits() {
        assert_eq!(normalize_hex(Some("#ABC")), Some("#aabbcc".into()));
        assert_eq!(normalize_hex(Some("#a1b2c3")), Some("#a1b2c3".into()));
        assert_eq!(normalize_hex(Some("red")), None);
        assert_eq!(normalize_hex(Some("#12345")), None);
        assert_eq!(normalize_hex(None), None);
    }

    #[test]
    fn shorthand_brand_overrides_land_expanded() {
        let registry = ProfileRegistry::new();
        let profile = registry.general();
        let mut req = requirements();
        req.brand_colors = Some(BrandColors {
            primary: Some("#abc".into()),
            secondary: Some("#123".into()),
            accent: None,
        });
        let theme = synthesize(profile, &req);
        assert_eq!(theme.colors.primary, "#aabbcc");
        assert_eq!(theme.colors.secondary, "#112233");
    }
}
