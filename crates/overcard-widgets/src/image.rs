#![forbid(unsafe_code)]

//! Image component: a named icon or asset at a fixed size.

use overcard_core::{Rgba, Size};

use crate::view::{DisplayUnit, ImageView};
use crate::{DismissRequest, Render, RenderContext};

/// How the image fills its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContentMode {
    /// Scale to fit, preserving aspect ratio.
    #[default]
    Fit,
    /// Scale to fill, preserving aspect ratio, cropping overflow.
    Fill,
    /// Stretch to the box.
    Stretch,
}

/// Whether the image is drawn as a tintable mask or with its own colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RenderingMode {
    #[default]
    Template,
    Original,
}

/// Image configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageConfig {
    /// Logical name, resolved at render time.
    pub name: String,
    /// Target size in points; both dimensions must be positive.
    pub size: Size,
    pub content_mode: ContentMode,
    pub rendering_mode: RenderingMode,
    pub tint: Option<Rgba>,
}

impl ImageConfig {
    pub fn new(name: impl Into<String>, size: Size) -> Self {
        Self {
            name: name.into(),
            size,
            content_mode: ContentMode::default(),
            rendering_mode: RenderingMode::default(),
            tint: None,
        }
    }

    #[must_use]
    pub fn content_mode(mut self, mode: ContentMode) -> Self {
        self.content_mode = mode;
        self
    }

    #[must_use]
    pub fn rendering_mode(mut self, mode: RenderingMode) -> Self {
        self.rendering_mode = mode;
        self
    }

    #[must_use]
    pub fn tint(mut self, color: Rgba) -> Self {
        self.tint = Some(color);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    config: ImageConfig,
}

impl Image {
    #[must_use]
    pub fn new(config: ImageConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &ImageConfig {
        &self.config
    }
}

impl Render for Image {
    fn render(&self, ctx: &RenderContext, _request_dismiss: DismissRequest) -> DisplayUnit {
        DisplayUnit::Image(ImageView {
            image: ctx.icons().resolve(&self.config.name),
            size: self.config.size,
            content_mode: self.config.content_mode,
            rendering_mode: self.config.rendering_mode,
            tint: self.config.tint,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icons::{DEFAULT_FALLBACK_ICON, IconResolver, ImageOrigin, NamedAssets, NoAssets};
    use crate::InteractionGate;
    use std::sync::Arc;

    fn render_with(resolver: IconResolver, image: &Image) -> ImageView {
        let ctx = RenderContext::new(Arc::new(resolver), InteractionGate::open());
        match image.render(&ctx, DismissRequest::noop()) {
            DisplayUnit::Image(view) => view,
            other => panic!("expected image view, got {other:?}"),
        }
    }

    #[test]
    fn resolves_from_system_tier() {
        let resolver = IconResolver::new(NoAssets, ["star.fill"].into_iter().collect::<NamedAssets>());
        let image = Image::new(
            ImageConfig::new("star.fill", Size::square(48.0))
                .tint(Rgba::ACCENT)
                .content_mode(ContentMode::Fill),
        );
        let view = render_with(resolver, &image);
        assert_eq!(view.image.origin, ImageOrigin::System);
        assert_eq!(view.size, Size::square(48.0));
        assert_eq!(view.tint, Some(Rgba::ACCENT));
        assert_eq!(view.content_mode, ContentMode::Fill);
    }

    #[test]
    fn missing_everywhere_still_renders_fallback() {
        let image = Image::new(ImageConfig::new("nowhere", Size::new(24.0, 24.0)));
        let view = render_with(IconResolver::default(), &image);
        assert!(view.image.is_fallback());
        assert_eq!(view.image.name, DEFAULT_FALLBACK_ICON);
        assert_eq!(view.rendering_mode, RenderingMode::Template);
    }
}
