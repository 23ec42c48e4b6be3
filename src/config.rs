//! Global configuration.
//!
//! A [`Configuration`] is consumed once by
//! [`Stylist::configure`](crate::Stylist::configure): it selects the plugin
//! set, the value
//! rewriters, the invariant extraction targets and the size scale. After
//! configure it is read-only.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::fragment::Fragment;
use crate::plugin::PluginDef;
use crate::processor::Rewrite;

/// The default size scale, keyed by CSS-like size names.
pub static DEFAULT_SIZES: Lazy<BTreeMap<String, f64>> = Lazy::new(|| {
    [
        ("xx-small", 12.0),
        ("x-small", 13.0),
        ("small", 14.0),
        ("medium", 16.0),
        ("large", 18.0),
        ("x-large", 22.0),
        ("xx-large", 26.0),
    ]
    .into_iter()
    .map(|(name, value)| (name.to_string(), value))
    .collect()
});

/// An attribute extracted out of compiled rules into a side table.
///
/// Any rule attribute whose name equals `style_prop_name` is removed from
/// the rule at compile time and tracked in the invariant table with the
/// given metadata plus the extracted value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Invariant {
    /// The rule attribute name to extract.
    pub style_prop_name: String,
    /// Metadata carried into the invariant table entry.
    pub metadata: Fragment,
}

impl Invariant {
    /// Invariant targeting one rule attribute name.
    pub fn new(style_prop_name: &str) -> Self {
        Self {
            style_prop_name: style_prop_name.to_string(),
            metadata: Fragment::new(),
        }
    }

    /// Attaches metadata to the invariant.
    pub fn metadata(mut self, metadata: Fragment) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Configuration consumed at configure time.
#[derive(Debug, Clone)]
pub struct Configuration {
    /// Default font size used when no scale entry matches.
    pub default_font_size: f64,
    /// Size scale mapping size names to numbers.
    pub sizes: BTreeMap<String, f64>,
    /// Invariant extraction targets applied at compile time.
    pub invariants: Vec<Invariant>,
    /// Enables the extended property plugins (background, color, radius,
    /// padding, margin, fontSize).
    pub extended_properties: bool,
    /// Replaces the built-in plugin set entirely when set.
    pub plugins: Option<Vec<PluginDef>>,
    /// Plugins appended after the built-in set.
    pub additional_plugins: Vec<PluginDef>,
    /// Plugin names removed from the final set.
    pub disabled_plugins: Vec<String>,
    /// Value rewriters collated into the processor.
    pub processors: Vec<Rewrite>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            default_font_size: 16.0,
            sizes: DEFAULT_SIZES.clone(),
            invariants: Vec::new(),
            extended_properties: false,
            plugins: None,
            additional_plugins: Vec::new(),
            disabled_plugins: Vec::new(),
            processors: Vec::new(),
        }
    }
}
