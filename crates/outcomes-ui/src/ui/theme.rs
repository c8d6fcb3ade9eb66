//! Outcome theme - variant tints and status glyphs
//!
//! Every sentiment variant owns one translucent panel tint and a glyph used
//! by the plain-text renderer.

use outcomes_core::verdict::Variant;

/// RGBA color with a fractional alpha channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// CSS `rgba(...)` notation.
    pub fn css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

pub struct Theme;

impl Theme {
    // ─────────────────────────────────────────────────────────────────────
    // Verdict panel backgrounds
    // ─────────────────────────────────────────────────────────────────────

    pub const TINT_SUCCESS: Rgba = Rgba::new(25, 135, 84, 0.07);
    pub const TINT_DANGER: Rgba = Rgba::new(220, 53, 69, 0.07);
    pub const TINT_INFO: Rgba = Rgba::new(13, 202, 240, 0.12);
    pub const TINT_WARNING: Rgba = Rgba::new(255, 193, 7, 0.12);
    pub const TINT_PRIMARY: Rgba = Rgba::new(13, 110, 253, 0.07);
    pub const TINT_SECONDARY: Rgba = Rgba::new(108, 117, 125, 0.08);

    // ─────────────────────────────────────────────────────────────────────
    // Glyphs
    // ─────────────────────────────────────────────────────────────────────

    pub const GLYPH_SUCCESS: &'static str = "✓";
    pub const GLYPH_DANGER: &'static str = "✗";
    pub const GLYPH_INFO: &'static str = "…";
    pub const GLYPH_WARNING: &'static str = "!";
    pub const GLYPH_PRIMARY: &'static str = "◆";
    pub const GLYPH_SECONDARY: &'static str = "·";

    pub fn panel_tint(variant: Variant) -> Rgba {
        match variant {
            Variant::Success => Self::TINT_SUCCESS,
            Variant::Danger => Self::TINT_DANGER,
            Variant::Info => Self::TINT_INFO,
            Variant::Warning => Self::TINT_WARNING,
            Variant::Primary => Self::TINT_PRIMARY,
            Variant::Secondary => Self::TINT_SECONDARY,
        }
    }

    pub fn glyph(variant: Variant) -> &'static str {
        match variant {
            Variant::Success => Self::GLYPH_SUCCESS,
            Variant::Danger => Self::GLYPH_DANGER,
            Variant::Info => Self::GLYPH_INFO,
            Variant::Warning => Self::GLYPH_WARNING,
            Variant::Primary => Self::GLYPH_PRIMARY,
            Variant::Secondary => Self::GLYPH_SECONDARY,
        }
    }

    /// Glyph for a status badge class (`success`, `danger`, ...).
    pub fn badge_glyph(class: &str) -> &'static str {
        match class {
            "success" => Self::GLYPH_SUCCESS,
            "danger" => Self::GLYPH_DANGER,
            "info" => Self::GLYPH_INFO,
            "warning" => Self::GLYPH_WARNING,
            "primary" => Self::GLYPH_PRIMARY,
            _ => Self::GLYPH_SECONDARY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_tints() {
        assert_eq!(
            Theme::panel_tint(Variant::Success).css(),
            "rgba(25, 135, 84, 0.07)"
        );
        assert_eq!(
            Theme::panel_tint(Variant::Secondary).css(),
            "rgba(108, 117, 125, 0.08)"
        );
    }

    #[test]
    fn test_badge_glyph_falls_back() {
        assert_eq!(Theme::badge_glyph("danger"), "✗");
        assert_eq!(Theme::badge_glyph("whatever"), "·");
    }
}
