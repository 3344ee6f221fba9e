#![forbid(unsafe_code)]

//! Font and alignment descriptors.
//!
//! These are plain data. The host's surface maps them onto its own font
//! system; [`FontSpec::default`] stands for "the platform body font".

use bitflags::bitflags;

bitflags! {
    /// Symbolic font traits layered on top of the weight.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FontTraits: u8 {
        const ITALIC = 0b0001;
        const MONOSPACE = 0b0010;
        const ROUNDED = 0b0100;
        const CONDENSED = 0b1000;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontWeight {
    Light,
    #[default]
    Regular,
    Medium,
    Semibold,
    Bold,
}

/// A font request: point size, weight and traits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    pub size: f32,
    pub weight: FontWeight,
    pub traits: FontTraits,
}

/// Point size of the platform body font.
pub const BODY_FONT_SIZE: f32 = 17.0;

impl Default for FontSpec {
    fn default() -> Self {
        Self::system(BODY_FONT_SIZE)
    }
}

impl FontSpec {
    /// System font at `size` points, regular weight.
    #[must_use]
    pub const fn system(size: f32) -> Self {
        Self {
            size,
            weight: FontWeight::Regular,
            traits: FontTraits::empty(),
        }
    }

    /// Card title font.
    #[must_use]
    pub const fn title() -> Self {
        Self {
            size: 20.0,
            weight: FontWeight::Bold,
            traits: FontTraits::empty(),
        }
    }

    /// Emphasized body font used for action titles.
    #[must_use]
    pub const fn headline() -> Self {
        Self {
            size: BODY_FONT_SIZE,
            weight: FontWeight::Semibold,
            traits: FontTraits::empty(),
        }
    }

    /// Small font for subtitles and help text.
    #[must_use]
    pub const fn caption() -> Self {
        Self::system(12.0)
    }

    #[must_use]
    pub fn weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }

    #[must_use]
    pub fn traits(mut self, traits: FontTraits) -> Self {
        self.traits = traits;
        self
    }

    #[must_use]
    pub fn size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextAlignment {
    Leading,
    #[default]
    Center,
    Trailing,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_body_regular() {
        let font = FontSpec::default();
        assert_eq!(font.size, BODY_FONT_SIZE);
        assert_eq!(font.weight, FontWeight::Regular);
        assert!(font.traits.is_empty());
    }

    #[test]
    fn builder_chain() {
        let font = FontSpec::caption()
            .weight(FontWeight::Medium)
            .traits(FontTraits::ITALIC | FontTraits::MONOSPACE);
        assert_eq!(font.size, 12.0);
        assert_eq!(font.weight, FontWeight::Medium);
        assert!(font.traits.contains(FontTraits::ITALIC));
        assert!(!font.traits.contains(FontTraits::ROUNDED));
    }
}
