//! The fixed selection-step catalog.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One choosable option of a selection step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOption {
    pub value: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

const fn option(value: &'static str, label: &'static str, description: &'static str) -> StepOption {
    StepOption { value, label, description }
}

const VIBE_OPTIONS: [StepOption; 4] = [
    option("minimal", "Minimal", "Clean lines, whitespace, understated elegance"),
    option("bold", "Bold", "Strong contrasts, large typography, impactful presence"),
    option("playful", "Playful", "Rounded shapes, vibrant colors, friendly feel"),
    option("elegant", "Elegant", "Sophisticated aesthetics, refined details, luxurious"),
];

const PALETTE_OPTIONS: [StepOption; 4] = [
    option("soft-pastels", "Soft Pastels", "Gentle, calming, approachable tones"),
    option("vibrant-high-contrast", "Vibrant High-Contrast", "Eye-catching, energetic, memorable"),
    option("dark-mode-neon", "Dark Mode & Neon", "Modern, tech-forward, dramatic"),
    option("clean-monochrome", "Clean Monochrome", "Timeless, professional, focused"),
];

const TYPOGRAPHY_OPTIONS: [StepOption; 4] = [
    option("modern-sans-serif", "Modern Sans-Serif", "Clean, contemporary, universal appeal"),
    option("classic-serif", "Classic Serif", "Traditional, trustworthy, authoritative"),
    option("tech-monospace", "Tech/Monospace", "Technical, precise, developer-friendly"),
    option("friendly-rounded", "Friendly Rounded", "Approachable, warm, inviting"),
];

const LAYOUT_OPTIONS: [StepOption; 4] = [
    option("hero-centric", "Hero-Centric", "Big impactful hero image, visual-first approach"),
    option("content-first", "Content-First", "Text-focused, readable, informative"),
    option("split-screen", "Split Screen", "Balanced visual and text, modern feel"),
    option("visual-grid", "Visual Grid", "Gallery-style, portfolio-ready, dynamic"),
];

/// A selection step. Steps are always walked in [`SelectionStep::ALL`] order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionStep {
    Vibe,
    ColorPalette,
    Typography,
    LayoutFocus,
}

impl SelectionStep {
    /// All steps, in walk order.
    pub const ALL: [Self; 4] = [Self::Vibe, Self::ColorPalette, Self::Typography, Self::LayoutFocus];

    /// Stable identifier.
    pub fn id(self) -> &'static str {
        match self {
            Self::Vibe => "vibe",
            Self::ColorPalette => "colorPalette",
            Self::Typography => "typography",
            Self::LayoutFocus => "layoutFocus",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Vibe => "Select Your Vibe",
            Self::ColorPalette => "Choose Color Palette",
            Self::Typography => "Pick Typography Style",
            Self::LayoutFocus => "Define Layout Focus",
        }
    }

    pub fn subtitle(self) -> &'static str {
        match self {
            Self::Vibe => "Define the overall personality of your new website",
            Self::ColorPalette => "Set the color mood for your brand",
            Self::Typography => "Choose fonts that speak your brand voice",
            Self::LayoutFocus => "Choose how content is prioritized",
        }
    }

    pub fn options(self) -> &'static [StepOption] {
        match self {
            Self::Vibe => &VIBE_OPTIONS,
            Self::ColorPalette => &PALETTE_OPTIONS,
            Self::Typography => &TYPOGRAPHY_OPTIONS,
            Self::LayoutFocus => &LAYOUT_OPTIONS,
        }
    }

    /// Check whether `value` is one of this step's options.
    pub fn has_option(self, value: &str) -> bool {
        self.options().iter().any(|o| o.value == value)
    }

    /// Position in walk order.
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or_default()
    }
}

impl fmt::Display for SelectionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for SelectionStep {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|step| step.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown selection step: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walk_order_is_fixed() {
        let ids: Vec<_> = SelectionStep::ALL.iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec!["vibe", "colorPalette", "typography", "layoutFocus"]);
        assert_eq!(SelectionStep::LayoutFocus.index(), 3);
    }

    #[test]
    fn test_every_step_has_four_options() {
        for step in SelectionStep::ALL {
            assert_eq!(step.options().len(), 4, "{step}");
        }
    }

    #[test]
    fn test_has_option() {
        assert!(SelectionStep::Vibe.has_option("bold"));
        assert!(!SelectionStep::Vibe.has_option("soft-pastels"));
        assert!(SelectionStep::ColorPalette.has_option("dark-mode-neon"));
    }

    #[test]
    fn test_parse_step_id() {
        assert_eq!("colorpalette".parse::<SelectionStep>().unwrap(), SelectionStep::ColorPalette);
        assert!("spacing".parse::<SelectionStep>().is_err());
    }
}
