//! Style registry: mergeable builder and compiled sheet.
//!
//! A [`StyleRegistry`] collects colors, fonts, a size scale and rule
//! declarations from one or more themes. Merging is shallow and EXISTING
//! values win over incoming ones, so a previously-configured registry is
//! never silently overwritten by a later theme merge.
//!
//! [`StyleRegistry::compile`] consumes the builder and produces an immutable
//! [`StyleSheet`] snapshot: invariant attributes are extracted out of rules
//! into a side table, declaration-context rewriters run once, and the rule
//! table is frozen. Lookups live on the snapshot only, so reading before
//! compile is impossible by construction. Components share the snapshot via
//! `Arc` with no locking.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Configuration;
use crate::error::StyleError;
use crate::fragment::{Fragment, StyleValue};
use crate::processor::{Processor, Scope};
use crate::theme::{StyleSource, Theme, ThemeContext};

/// One invariant table entry: the extracted value plus the configured
/// metadata for the matched attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvariantEntry {
    /// The rule attribute name that matched.
    pub style_prop_name: String,
    /// The value removed from the rule.
    pub value: StyleValue,
    /// Metadata from the invariant configuration.
    pub metadata: Fragment,
}

/// Mergeable builder for theme data.
#[derive(Debug, Clone)]
pub struct StyleRegistry {
    platform: String,
    colors: Fragment,
    fonts: Fragment,
    sizes: BTreeMap<String, f64>,
    styles: BTreeMap<String, Fragment>,
    invariants: BTreeMap<String, InvariantEntry>,
}

impl Default for StyleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleRegistry {
    /// Creates an empty registry with no platform tag.
    pub fn new() -> Self {
        Self::with_platform("")
    }

    /// Creates an empty registry; the platform tag is handed to font
    /// resolvers at merge time.
    pub fn with_platform(platform: &str) -> Self {
        Self {
            platform: platform.to_string(),
            colors: Fragment::new(),
            fonts: Fragment::new(),
            sizes: BTreeMap::new(),
            styles: BTreeMap::new(),
            invariants: BTreeMap::new(),
        }
    }

    /// Shallow-merges colors; existing entries win on collision.
    pub fn merge_colors(&mut self, incoming: &Fragment) {
        for (name, value) in incoming {
            self.colors.entry(name.clone()).or_insert_with(|| value.clone());
        }
    }

    /// Shallow-merges fonts; existing entries win on collision.
    pub fn merge_fonts(&mut self, incoming: &Fragment) {
        for (name, value) in incoming {
            self.fonts.entry(name.clone()).or_insert_with(|| value.clone());
        }
    }

    /// Shallow-merges rule declarations; existing rules win on collision.
    pub fn merge_styles(&mut self, incoming: &BTreeMap<String, Fragment>) {
        for (name, rule) in incoming {
            self.styles.entry(name.clone()).or_insert_with(|| rule.clone());
        }
    }

    /// Shallow-merges pre-extracted invariant entries; existing win.
    pub fn merge_style_invariants(&mut self, incoming: &BTreeMap<String, InvariantEntry>) {
        for (name, entry) in incoming {
            self.invariants
                .entry(name.clone())
                .or_insert_with(|| entry.clone());
        }
    }

    /// Installs the size scale. Falls back to the configuration scale at
    /// compile time when unset.
    pub fn set_font_sizes(&mut self, sizes: BTreeMap<String, f64>) {
        self.sizes = sizes;
    }

    /// The color names merged so far, in declaration order.
    pub fn color_names(&self) -> Vec<String> {
        self.colors.keys().cloned().collect()
    }

    /// Validates a theme's shape and fans out to the merge operations.
    ///
    /// # Errors
    ///
    /// Fails fast when `colors` or `fonts` is not a plain mapping. The
    /// typed [`StyleSource`] already guarantees the styles entry is either
    /// a builder function or an already-resolved rule map.
    pub fn add_theme(&mut self, theme: Theme) -> Result<(), StyleError> {
        if let Some(colors) = &theme.colors {
            let map = colors
                .as_object()
                .ok_or_else(|| StyleError::InvalidThemeColors {
                    found: type_name(colors),
                })?;
            self.merge_colors(map);
        }

        if let Some(fonts) = &theme.fonts {
            let map = fonts
                .as_object()
                .ok_or_else(|| StyleError::InvalidThemeFonts {
                    found: type_name(fonts),
                })?;
            self.merge_fonts(map);
        }

        // Platform-resolved fonts are pinned at merge time.
        if !theme.font_resolvers.is_empty() {
            let mut resolved = Fragment::new();
            for (name, resolver) in &theme.font_resolvers {
                resolved.insert(name.clone(), resolver(&self.platform));
            }
            self.merge_fonts(&resolved);
        }

        if let Some(source) = theme.styles {
            let rules = match source {
                StyleSource::Resolved(rules) => rules,
                StyleSource::Builder(build) => {
                    let color_names = self.color_names();
                    build(ThemeContext {
                        colors: &self.colors,
                        fonts: &self.fonts,
                        color_names: &color_names,
                    })
                }
            };
            self.merge_styles(&rules);
        }

        Ok(())
    }

    /// Finalizes the registry into an immutable, queryable sheet.
    ///
    /// For every rule attribute matching a configured invariant's target
    /// name, the value is moved out of the rule into the invariant table
    /// and removed from the rule. Declaration-context rewriters then run
    /// over each rule body exactly once.
    pub fn compile(mut self, config: &Configuration) -> StyleSheet {
        for (rule_name, rule) in &mut self.styles {
            for invariant in &config.invariants {
                if let Some(value) = rule.remove(&invariant.style_prop_name) {
                    self.invariants.insert(
                        rule_name.clone(),
                        InvariantEntry {
                            style_prop_name: invariant.style_prop_name.clone(),
                            value,
                            metadata: invariant.metadata.clone(),
                        },
                    );
                }
            }
        }

        let sizes = if self.sizes.is_empty() {
            config.sizes.clone()
        } else {
            self.sizes
        };

        let processor = Processor::collate(&config.processors);
        if !processor.is_empty(Scope::Declaration) {
            for rule in self.styles.values_mut() {
                processor.process(rule, Scope::Declaration, &self.colors, &sizes);
            }
        }

        debug!(
            rules = self.styles.len(),
            invariants = self.invariants.len(),
            "compiled style sheet"
        );

        StyleSheet {
            color_names: self.colors.keys().cloned().collect(),
            colors: self.colors,
            fonts: self.fonts,
            sizes,
            rules: self.styles,
            invariants: self.invariants,
        }
    }
}

/// Immutable compiled lookup structure, shared read-only by all component
/// instances after configure.
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    colors: Fragment,
    color_names: Vec<String>,
    fonts: Fragment,
    sizes: BTreeMap<String, f64>,
    rules: BTreeMap<String, Fragment>,
    invariants: BTreeMap<String, InvariantEntry>,
}

impl StyleSheet {
    /// Looks up a compiled rule by qualified name. Absence is not an error.
    pub fn rule(&self, name: &str) -> Option<&Fragment> {
        self.rules.get(name)
    }

    /// Looks up the invariant entry extracted from a rule, if any.
    pub fn invariant(&self, rule_name: &str) -> Option<&InvariantEntry> {
        self.invariants.get(rule_name)
    }

    /// The color palette.
    pub fn colors(&self) -> &Fragment {
        &self.colors
    }

    /// The color names, in declaration order.
    pub fn color_names(&self) -> &[String] {
        &self.color_names
    }

    /// The font table.
    pub fn fonts(&self) -> &Fragment {
        &self.fonts
    }

    /// The size scale.
    pub fn sizes(&self) -> &BTreeMap<String, f64> {
        &self.sizes
    }

    /// Substitutes a palette name with its color value; values that are not
    /// palette names pass through unchanged.
    pub fn resolve_color(&self, value: &StyleValue) -> StyleValue {
        if let Some(name) = value.as_str() {
            if let Some(color) = self.colors.get(name) {
                return color.clone();
            }
        }
        value.clone()
    }

    /// Number of compiled rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True if no rules were compiled.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn type_name(value: &StyleValue) -> String {
    match value {
        StyleValue::Null => "null",
        StyleValue::Bool(_) => "boolean",
        StyleValue::Number(_) => "number",
        StyleValue::String(_) => "string",
        StyleValue::Array(_) => "array",
        StyleValue::Object(_) => "object",
    }
    .to_string()
}
