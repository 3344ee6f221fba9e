#![forbid(unsafe_code)]

//! Icon and asset name resolution.
//!
//! A logical image name is looked up in three tiers, in order:
//!
//! 1. assets bundled with the host application,
//! 2. the platform icon set,
//! 3. the default fallback icon.
//!
//! The third tier always answers, so resolution never fails. The first two
//! are host-provided [`AssetCatalog`]s.

use std::collections::HashSet;
use std::fmt;

/// Name of the icon shown when nothing else matches.
pub const DEFAULT_FALLBACK_ICON: &str = "questionmark.circle";

/// One tier of asset lookup.
pub trait AssetCatalog: Send + Sync {
    fn contains(&self, name: &str) -> bool;
}

/// A catalog with nothing in it.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAssets;

impl AssetCatalog for NoAssets {
    fn contains(&self, _name: &str) -> bool {
        false
    }
}

/// A catalog backed by a fixed set of names.
#[derive(Debug, Clone, Default)]
pub struct NamedAssets {
    names: HashSet<String>,
}

impl NamedAssets {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for NamedAssets {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl AssetCatalog for NamedAssets {
    fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}

/// Which tier satisfied a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageOrigin {
    Bundled,
    System,
    Fallback,
}

/// The outcome of resolving a logical image name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    /// Name to load from [`origin`](Self::origin). For fallbacks this is the
    /// fallback icon name, not the requested one.
    pub name: String,
    pub origin: ImageOrigin,
    /// The name the component asked for.
    pub requested: String,
}

impl ResolvedImage {
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.origin == ImageOrigin::Fallback
    }
}

/// Three-tier icon resolver.
pub struct IconResolver {
    bundled: Box<dyn AssetCatalog>,
    system: Box<dyn AssetCatalog>,
    fallback: String,
}

impl fmt::Debug for IconResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IconResolver")
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}

impl Default for IconResolver {
    fn default() -> Self {
        Self::new(NoAssets, NoAssets)
    }
}

impl IconResolver {
    pub fn new(bundled: impl AssetCatalog + 'static, system: impl AssetCatalog + 'static) -> Self {
        Self {
            bundled: Box::new(bundled),
            system: Box::new(system),
            fallback: DEFAULT_FALLBACK_ICON.to_owned(),
        }
    }

    /// Replace the fallback icon name.
    #[must_use]
    pub fn fallback(mut self, name: impl Into<String>) -> Self {
        self.fallback = name.into();
        self
    }

    #[must_use]
    pub fn fallback_name(&self) -> &str {
        &self.fallback
    }

    /// Resolve `name`. Never fails.
    #[must_use]
    pub fn resolve(&self, name: &str) -> ResolvedImage {
        let (resolved, origin) = if self.bundled.contains(name) {
            (name, ImageOrigin::Bundled)
        } else if self.system.contains(name) {
            (name, ImageOrigin::System)
        } else {
            tracing::debug!(requested = name, fallback = %self.fallback, "icon not found, using fallback");
            (self.fallback.as_str(), ImageOrigin::Fallback)
        };
        ResolvedImage {
            name: resolved.to_owned(),
            origin,
            requested: name.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> IconResolver {
        IconResolver::new(
            ["logo", "shared"].into_iter().collect::<NamedAssets>(),
            ["checkmark", "shared"].into_iter().collect::<NamedAssets>(),
        )
    }

    #[test]
    fn bundled_wins() {
        let img = resolver().resolve("shared");
        assert_eq!(img.origin, ImageOrigin::Bundled);
        assert_eq!(img.name, "shared");
    }

    #[test]
    fn system_tier() {
        let img = resolver().resolve("checkmark");
        assert_eq!(img.origin, ImageOrigin::System);
    }

    #[test]
    fn unknown_name_falls_back() {
        let img = resolver().resolve("does-not-exist");
        assert!(img.is_fallback());
        assert_eq!(img.name, DEFAULT_FALLBACK_ICON);
        assert_eq!(img.requested, "does-not-exist");
    }

    #[test]
    fn custom_fallback() {
        let img = IconResolver::default().fallback("photo").resolve("x");
        assert_eq!(img.name, "photo");
    }

    #[test]
    fn empty_name_falls_back() {
        assert!(IconResolver::default().resolve("").is_fallback());
    }
}
