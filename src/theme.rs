//! Theme input shapes.
//!
//! A [`Theme`] bundles colors, fonts and a style source. Styles are usually
//! declared as a builder function receiving the palette, so rule bodies can
//! reference named colors and fonts; an already-resolved rule map is also
//! accepted.
//!
//! Shape violations are configuration errors raised immediately when the
//! theme is merged into a registry, never deferred to resolution time.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::fragment::{Fragment, StyleValue};

/// Resolves a platform-dependent font value from a platform tag
/// (e.g. `"ios"`, `"android"`).
pub type FontResolver = fn(&str) -> StyleValue;

/// Palette view handed to a style builder function.
#[derive(Debug, Clone, Copy)]
pub struct ThemeContext<'a> {
    /// Named colors merged so far.
    pub colors: &'a Fragment,
    /// Named fonts, already platform-resolved.
    pub fonts: &'a Fragment,
    /// The color names, in declaration order.
    pub color_names: &'a [String],
}

/// Builds rule declarations from the palette.
pub type StyleBuilderFn = Arc<dyn Fn(ThemeContext<'_>) -> BTreeMap<String, Fragment> + Send + Sync>;

/// The source of a theme's rule declarations.
#[derive(Clone)]
pub enum StyleSource {
    /// Rule declarations given directly, keyed by qualified name.
    Resolved(BTreeMap<String, Fragment>),
    /// A function producing rule declarations from the palette.
    Builder(StyleBuilderFn),
}

impl fmt::Debug for StyleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleSource::Resolved(map) => f.debug_tuple("Resolved").field(&map.len()).finish(),
            StyleSource::Builder(_) => f.write_str("Builder(..)"),
        }
    }
}

/// One theme source to merge into a [`StyleRegistry`](crate::StyleRegistry).
///
/// # Example
///
/// ```rust
/// use restyle::{StyleSource, Theme};
/// use serde_json::json;
/// use std::collections::BTreeMap;
/// use std::sync::Arc;
///
/// let theme = Theme::new()
///     .colors(json!({"base": "#2aa198", "muted": "#586e75"}))
///     .styles(StyleSource::Builder(Arc::new(|ctx| {
///         let mut rules = BTreeMap::new();
///         rules.insert(
///             "Label".to_string(),
///             json!({"color": ctx.colors["base"]}).as_object().unwrap().clone(),
///         );
///         rules
///     })));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Theme {
    /// Named colors; must be a plain mapping when present.
    pub colors: Option<StyleValue>,
    /// Named fonts with static values; must be a plain mapping when present.
    pub fonts: Option<StyleValue>,
    /// Named fonts resolved per platform at merge time.
    pub font_resolvers: BTreeMap<String, FontResolver>,
    /// Rule declarations, direct or built from the palette.
    pub styles: Option<StyleSource>,
}

impl Theme {
    /// Creates an empty theme.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the color mapping.
    pub fn colors(mut self, colors: StyleValue) -> Self {
        self.colors = Some(colors);
        self
    }

    /// Sets the static font mapping.
    pub fn fonts(mut self, fonts: StyleValue) -> Self {
        self.fonts = Some(fonts);
        self
    }

    /// Adds a platform-resolved font entry.
    pub fn font_resolver(mut self, name: &str, resolver: FontResolver) -> Self {
        self.font_resolvers.insert(name.to_string(), resolver);
        self
    }

    /// Sets the style source.
    pub fn styles(mut self, styles: StyleSource) -> Self {
        self.styles = Some(styles);
        self
    }
}
