//! Plugin variants, validation and dispatch tables.
//!
//! Plugins extend the resolver without changing it: a **global** plugin runs
//! unconditionally on every resolution pass, a **property** plugin is bound
//! to exactly one input attribute and runs only when that attribute has a
//! defined value on the component's props or on its inherited context.
//!
//! Definitions are tagged variants validated once at registration
//! ([`PluginRegistry::register`]); nothing is shape-inspected per
//! resolution. Property attribute names must be unique across the registry.

mod builtins;
mod router;

pub use builtins::{builtin_plugins, CLASS_NAMES, PROPS_TO_STYLE, STYLE_STATE};
pub use router::PROPERTY_ROUTER;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::component::{ComponentDefinition, GroupSpec};
use crate::config::Configuration;
use crate::error::StyleError;
use crate::fragment::{Fragment, Props, StyleValue};
use crate::namespace::NamespaceContext;
use crate::processor::Processor;
use crate::registry::StyleSheet;

/// What a global plugin contributes to a pass.
#[derive(Debug, Clone, PartialEq)]
pub enum PluginOutput {
    /// Fragments appended to the group currently being resolved.
    Fragments(Vec<Fragment>),
    /// Fragments routed per style group; the resolver merges the entry for
    /// the group being resolved. This is the router's return contract —
    /// routing is expressed as data, not as a mutation of instance state.
    Routes(BTreeMap<String, Vec<Fragment>>),
}

impl PluginOutput {
    /// An output contributing nothing.
    pub fn none() -> Self {
        PluginOutput::Fragments(Vec::new())
    }
}

/// Full resolution context handed to global plugins.
pub struct GlobalArgs<'a> {
    /// Current input attributes.
    pub props: &'a Props,
    /// Inherited context from the parent, explicit and immutable.
    pub context: &'a Props,
    /// Lookup context for the group being resolved.
    pub ns: &'a NamespaceContext,
    /// The group being resolved.
    pub group: &'a GroupSpec,
    /// The component definition.
    pub definition: &'a ComponentDefinition,
    /// The compiled sheet.
    pub sheet: &'a StyleSheet,
    /// Global configuration.
    pub config: &'a Configuration,
    /// The full plugin registry, for delegation.
    pub plugins: &'a PluginRegistry,
    /// The prop-context value rewriters.
    pub processor: &'a Processor,
}

/// Context handed to property plugins for one bound attribute.
pub struct PropertyArgs<'a> {
    /// The bound attribute name.
    pub attr: &'a str,
    /// The attribute's already-rewritten value.
    pub value: &'a StyleValue,
    /// Current input attributes.
    pub props: &'a Props,
    /// Inherited context from the parent.
    pub context: &'a Props,
    /// Lookup context for the group being resolved.
    pub ns: &'a NamespaceContext,
    /// The compiled sheet.
    pub sheet: &'a StyleSheet,
    /// Global configuration.
    pub config: &'a Configuration,
}

/// A global plugin function.
pub type GlobalFn = Arc<dyn Fn(&GlobalArgs<'_>) -> PluginOutput + Send + Sync>;

/// A property plugin function; `None` contributes nothing.
pub type PropertyFn = Arc<dyn Fn(&PropertyArgs<'_>) -> Option<Vec<Fragment>> + Send + Sync>;

/// Value-shape constraint checked before a property plugin runs.
///
/// A mismatched value skips the plugin; resolution stays permissive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueConstraint {
    /// Any defined value.
    Any,
    /// A string.
    Str,
    /// A number.
    Number,
    /// An object.
    Object,
    /// An array.
    Array,
    /// A string or an array, e.g. a class list.
    StringOrArray,
    /// A string or a number, e.g. a scale name or a literal size.
    StringOrNumber,
}

impl ValueConstraint {
    /// True if the value satisfies the constraint.
    pub fn check(&self, value: &StyleValue) -> bool {
        match self {
            ValueConstraint::Any => !value.is_null(),
            ValueConstraint::Str => value.is_string(),
            ValueConstraint::Number => value.is_number(),
            ValueConstraint::Object => value.is_object(),
            ValueConstraint::Array => value.is_array(),
            ValueConstraint::StringOrArray => value.is_string() || value.is_array(),
            ValueConstraint::StringOrNumber => value.is_string() || value.is_number(),
        }
    }
}

/// A tagged plugin definition, resolved once during registration.
#[derive(Clone)]
pub enum PluginDef {
    /// Runs unconditionally every pass.
    Global {
        /// Unique-ish display name, used by the disabled-plugin list.
        name: String,
        /// The plugin function.
        func: GlobalFn,
    },
    /// Runs when its bound attribute has a defined value.
    Property {
        /// The bound input attribute name.
        attr: String,
        /// The plugin function.
        func: PropertyFn,
        /// Optional value-shape constraint.
        constraint: Option<ValueConstraint>,
    },
}

impl PluginDef {
    /// A global plugin.
    pub fn global(name: &str, func: GlobalFn) -> Self {
        PluginDef::Global {
            name: name.to_string(),
            func,
        }
    }

    /// A property plugin with no value constraint.
    pub fn property(attr: &str, func: PropertyFn) -> Self {
        PluginDef::Property {
            attr: attr.to_string(),
            func,
            constraint: None,
        }
    }

    /// A property plugin with a value-shape constraint.
    pub fn property_with(attr: &str, func: PropertyFn, constraint: ValueConstraint) -> Self {
        PluginDef::Property {
            attr: attr.to_string(),
            func,
            constraint: Some(constraint),
        }
    }

    /// Expands one function over several bound attributes.
    ///
    /// # Errors
    ///
    /// An empty attribute set is a registration error.
    pub fn properties(
        func: PropertyFn,
        attrs: &[(&str, ValueConstraint)],
    ) -> Result<Vec<PluginDef>, StyleError> {
        if attrs.is_empty() {
            return Err(StyleError::EmptyPropertySet);
        }
        Ok(attrs
            .iter()
            .map(|(attr, constraint)| PluginDef::property_with(attr, func.clone(), *constraint))
            .collect())
    }

    /// The plugin's name: the display name for globals, the bound attribute
    /// for property plugins.
    pub fn name(&self) -> &str {
        match self {
            PluginDef::Global { name, .. } => name,
            PluginDef::Property { attr, .. } => attr,
        }
    }
}

impl fmt::Debug for PluginDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginDef::Global { name, .. } => write!(f, "Global({})", name),
            PluginDef::Property {
                attr, constraint, ..
            } => write!(f, "Property({}, {:?})", attr, constraint),
        }
    }
}

/// A registered property plugin.
#[derive(Clone)]
pub struct PropertyPlugin {
    /// The bound attribute name.
    pub attr: String,
    /// The plugin function.
    pub func: PropertyFn,
    /// Optional value-shape constraint.
    pub constraint: Option<ValueConstraint>,
}

impl fmt::Debug for PropertyPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PropertyPlugin({}, {:?})", self.attr, self.constraint)
    }
}

/// Ordered plugin tables: globals in registration order, property plugins
/// keyed by bound attribute with registration order preserved.
#[derive(Clone, Default)]
pub struct PluginRegistry {
    globals: Vec<(String, GlobalFn)>,
    property_order: Vec<String>,
    property: BTreeMap<String, PropertyPlugin>,
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginRegistry")
            .field(
                "globals",
                &self
                    .globals
                    .iter()
                    .map(|(name, _)| name.as_str())
                    .collect::<Vec<_>>(),
            )
            .field("property", &self.property_order)
            .finish()
    }
}

impl PluginRegistry {
    /// Validates and registers a plugin set.
    ///
    /// Plugins named in `disabled` are dropped from the final set.
    ///
    /// # Errors
    ///
    /// - [`StyleError::InvalidPlugin`] for an empty name or attribute
    /// - [`StyleError::DuplicatePropertyPlugin`] for a repeated bound
    ///   attribute
    pub fn register(defs: Vec<PluginDef>, disabled: &[String]) -> Result<Self, StyleError> {
        let mut registry = PluginRegistry::default();

        for def in defs {
            if disabled.iter().any(|name| name == def.name()) {
                debug!(plugin = def.name(), "plugin disabled by configuration");
                continue;
            }
            match def {
                PluginDef::Global { name, func } => {
                    if name.is_empty() {
                        return Err(StyleError::InvalidPlugin {
                            reason: "global plugin with an empty name".to_string(),
                        });
                    }
                    registry.globals.push((name, func));
                }
                PluginDef::Property {
                    attr,
                    func,
                    constraint,
                } => {
                    if attr.is_empty() {
                        return Err(StyleError::InvalidPlugin {
                            reason: "property plugin with an empty attribute name".to_string(),
                        });
                    }
                    if registry.property.contains_key(&attr) {
                        return Err(StyleError::DuplicatePropertyPlugin { attr });
                    }
                    registry.property_order.push(attr.clone());
                    registry.property.insert(
                        attr.clone(),
                        PropertyPlugin {
                            attr,
                            func,
                            constraint,
                        },
                    );
                }
            }
        }

        debug!(
            globals = registry.globals.len(),
            properties = registry.property.len(),
            "registered plugins"
        );
        Ok(registry)
    }

    /// The global plugins, in registration order.
    pub fn globals(&self) -> impl Iterator<Item = (&str, &GlobalFn)> {
        self.globals.iter().map(|(name, func)| (name.as_str(), func))
    }

    /// The property plugin bound to an attribute, if any.
    pub fn property(&self, attr: &str) -> Option<&PropertyPlugin> {
        self.property.get(attr)
    }

    /// All bound property attribute names, in registration order.
    pub fn property_attrs(&self) -> &[String] {
        &self.property_order
    }
}
