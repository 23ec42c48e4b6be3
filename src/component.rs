//! Component definitions and per-instance style state.
//!
//! A host component type is registered once against a configured
//! [`Stylist`](crate::Stylist), producing an immutable
//! [`ComponentDefinition`]: its declared style groups, per-group default
//! fragments, the attribute routing table, and its capability declarations.
//! A [`ComponentInstance`] holds the live resolved style per group, replaced
//! wholesale on mount and on watched-attribute updates.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::StyleError;
use crate::fragment::{flatten, Fragment, Props, StyleValue};
use crate::namespace::NamespaceContext;
use crate::plugin::{PluginRegistry, PropertyArgs};
use crate::registry::StyleSheet;
use crate::resolver::CascadeResolver;
use crate::stylist::Stylist;

/// The reserved root style group key.
pub const STYLE: &str = "style";

/// The suffix appended to group keys to form external attribute names.
pub const STYLE_SUFFIX: &str = "Style";

/// Derives a group's external attribute name from its key.
///
/// The key is used verbatim if it is `style` or already ends in `Style`;
/// otherwise the suffix is appended (`label` → `labelStyle`).
pub fn style_property_name(key: &str) -> String {
    if key == STYLE || key.ends_with(STYLE_SUFFIX) {
        key.to_string()
    } else {
        format!("{}{}", key, STYLE_SUFFIX)
    }
}

/// What a props→state mapping resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum StateValue {
    /// A state key, looked up as a qualified state rule name.
    Key(String),
    /// A structured fragment used verbatim.
    Fragment(Fragment),
}

/// Maps current props to an optional style-group state.
pub type StateFn = Arc<dyn Fn(&Props) -> Option<StateValue> + Send + Sync>;

/// Per-attribute transform producing a fragment from a defined prop value.
pub type PropStyleFn = Arc<dyn Fn(&PropertyArgs<'_>) -> Option<Fragment> + Send + Sync>;

/// One style→prop extraction rule: remove `source` from the flattened style
/// and assign it to a sibling output, optionally renamed.
///
/// The source attribute is always deleted from the style, even when no
/// target name is configured — the value is then dropped. Documented
/// contract, not an oversight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractRule {
    /// The style attribute to remove.
    pub source: String,
    /// The sibling output name; `None` drops the value.
    pub target: Option<String>,
}

impl ExtractRule {
    /// Extraction into a sibling output of the same name.
    pub fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            target: Some(source.to_string()),
        }
    }

    /// Extraction under a different output name.
    pub fn renamed(source: &str, target: &str) -> Self {
        Self {
            source: source.to_string(),
            target: Some(target.to_string()),
        }
    }

    /// Extraction that deletes the attribute without an output.
    pub fn dropped(source: &str) -> Self {
        Self {
            source: source.to_string(),
            target: None,
        }
    }
}

/// The capability declarations a component type may carry.
///
/// Each capability may be declared statically on the type or in its style
/// options, never both.
#[derive(Clone, Default)]
pub struct Capabilities {
    /// Generic props→style mapping: attribute name → transform function,
    /// run when the attribute has a defined value.
    pub props_to_style: Option<BTreeMap<String, PropStyleFn>>,
    /// Props→style-group-state mapping.
    pub props_to_state: Option<StateFn>,
    /// Style→prop extraction rules, applied after each group's cascade.
    pub style_to_props: Option<Vec<ExtractRule>>,
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capabilities")
            .field(
                "props_to_style",
                &self.props_to_style.as_ref().map(|m| m.len()),
            )
            .field("props_to_state", &self.props_to_state.is_some())
            .field("style_to_props", &self.style_to_props)
            .finish()
    }
}

impl Capabilities {
    fn names_present(&self) -> Vec<&'static str> {
        let mut present = Vec::new();
        if self.props_to_style.is_some() {
            present.push("props_to_style");
        }
        if self.props_to_state.is_some() {
            present.push("props_to_state");
        }
        if self.style_to_props.is_some() {
            present.push("style_to_props");
        }
        present
    }
}

/// Style options produced by a per-type options function.
#[derive(Clone, Default)]
pub struct StyleOptions {
    /// Overrides the class name used in qualified rule names.
    pub class_name: Option<String>,
    /// Default fragments for the root group; must be a sequence of objects.
    pub default_styles: Option<StyleValue>,
    /// Capabilities declared via options.
    pub capabilities: Capabilities,
}

/// Per-type options function; receives the compiled sheet.
pub type StyleOptionsFn = Arc<dyn Fn(&StyleSheet) -> StyleOptions + Send + Sync>;

/// Routes one input attribute into a style group, optionally renaming the
/// resulting style attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropRoute {
    /// The input attribute name.
    pub prop: String,
    /// Rename applied when the value is copied verbatim.
    pub style_attr: Option<String>,
}

impl PropRoute {
    /// Routes an attribute under its own name.
    pub fn new(prop: &str) -> Self {
        Self {
            prop: prop.to_string(),
            style_attr: None,
        }
    }

    /// Routes an attribute under a different style attribute name.
    pub fn renamed(prop: &str, style_attr: &str) -> Self {
        Self {
            prop: prop.to_string(),
            style_attr: Some(style_attr.to_string()),
        }
    }

    /// The style attribute name the value lands under.
    pub fn style_attr(&self) -> &str {
        self.style_attr.as_deref().unwrap_or(&self.prop)
    }
}

/// Declaration of a stylable component type, consumed by
/// [`Stylist::register`](crate::Stylist::register).
#[derive(Clone, Default)]
pub struct ComponentDecl {
    /// The component type name.
    pub type_name: String,
    /// Optional namespace prefix for qualified rule names.
    pub namespace: Option<String>,
    /// Child style groups and their routed attributes, in declaration order.
    pub routes: Vec<(String, Vec<PropRoute>)>,
    /// Per-group default fragments (from the host's default props), keyed
    /// by group key.
    pub default_styles: BTreeMap<String, Vec<Fragment>>,
    /// Capabilities declared statically on the type.
    pub statics: Capabilities,
    /// Per-type options function.
    pub options: Option<StyleOptionsFn>,
}

impl fmt::Debug for ComponentDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDecl")
            .field("type_name", &self.type_name)
            .field("namespace", &self.namespace)
            .field("routes", &self.routes)
            .finish_non_exhaustive()
    }
}

impl ComponentDecl {
    /// Starts a declaration for a component type.
    pub fn new(type_name: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            ..Self::default()
        }
    }

    /// Sets the namespace prefix.
    pub fn namespace(mut self, namespace: &str) -> Self {
        self.namespace = Some(namespace.to_string());
        self
    }

    /// Declares a child style group and the attributes routed into it.
    pub fn group(mut self, key: &str, routes: Vec<PropRoute>) -> Self {
        self.routes.push((key.to_string(), routes));
        self
    }

    /// Declares default fragments for a group.
    pub fn defaults(mut self, key: &str, fragments: Vec<Fragment>) -> Self {
        self.default_styles.insert(key.to_string(), fragments);
        self
    }

    /// Declares the props→style capability statically.
    pub fn props_to_style(mut self, map: BTreeMap<String, PropStyleFn>) -> Self {
        self.statics.props_to_style = Some(map);
        self
    }

    /// Declares the props→state capability statically.
    pub fn props_to_state(mut self, func: StateFn) -> Self {
        self.statics.props_to_state = Some(func);
        self
    }

    /// Declares style→prop extraction rules statically.
    pub fn style_to_props(mut self, rules: Vec<ExtractRule>) -> Self {
        self.statics.style_to_props = Some(rules);
        self
    }

    /// Sets the per-type options function.
    pub fn options(mut self, options: StyleOptionsFn) -> Self {
        self.options = Some(options);
        self
    }
}

/// One declared style group of a component type, fixed at registration.
#[derive(Debug, Clone)]
pub struct GroupSpec {
    /// The group key, `style` for the root group.
    pub key: String,
    /// The external attribute name, e.g. `labelStyle`.
    pub attr_name: String,
    /// The child segment for qualified names; `None` for the root group.
    pub child: Option<String>,
    /// Default fragments, fixed at registration.
    pub defaults: Vec<Fragment>,
    /// Attributes routed into this group.
    pub routes: Vec<PropRoute>,
    /// The routed attributes owned by a property plugin, in plugin
    /// registration order. Computed once at registration.
    pub plugin_attrs: Vec<String>,
}

impl GroupSpec {
    /// True for the root `style` group.
    pub fn is_root(&self) -> bool {
        self.child.is_none()
    }

    /// The route for an input attribute, if listed.
    pub fn route(&self, prop: &str) -> Option<&PropRoute> {
        self.routes.iter().find(|route| route.prop == prop)
    }
}

/// An immutable registered component type.
#[derive(Debug, Clone)]
pub struct ComponentDefinition {
    /// The component type name.
    pub type_name: String,
    /// Optional namespace prefix.
    pub namespace: Option<String>,
    /// The class name used in qualified rule names.
    pub class_name: String,
    /// Merged capability declarations.
    pub capabilities: Capabilities,
    groups: Vec<GroupSpec>,
}

impl ComponentDefinition {
    /// Validates a declaration and builds the definition.
    ///
    /// The root group's routed attributes are auto-populated with every
    /// property-plugin attribute not assigned to a declared child group.
    ///
    /// # Errors
    ///
    /// - [`StyleError::ReservedStyleGroup`] when the routing table
    ///   configures the reserved `style` key
    /// - [`StyleError::DuplicateCapability`] when a capability is declared
    ///   both statically and via options
    /// - [`StyleError::InvalidDefaultStyles`] when options default styles
    ///   are not a sequence of objects
    pub fn register(
        decl: ComponentDecl,
        sheet: &StyleSheet,
        plugins: &PluginRegistry,
    ) -> Result<Self, StyleError> {
        let options = match &decl.options {
            Some(build) => build(sheet),
            None => StyleOptions::default(),
        };

        // Exactly one declaration style per capability.
        let static_names = decl.statics.names_present();
        for name in options.capabilities.names_present() {
            if static_names.contains(&name) {
                return Err(StyleError::DuplicateCapability {
                    type_name: decl.type_name.clone(),
                    capability: name.to_string(),
                });
            }
        }
        let capabilities = Capabilities {
            props_to_style: decl
                .statics
                .props_to_style
                .or(options.capabilities.props_to_style),
            props_to_state: decl
                .statics
                .props_to_state
                .or(options.capabilities.props_to_state),
            style_to_props: decl
                .statics
                .style_to_props
                .or(options.capabilities.style_to_props),
        };

        for (key, _) in &decl.routes {
            if style_property_name(key) == STYLE {
                return Err(StyleError::ReservedStyleGroup {
                    type_name: decl.type_name.clone(),
                });
            }
        }

        let mut root_defaults = decl.default_styles.get(STYLE).cloned().unwrap_or_default();
        if let Some(value) = &options.default_styles {
            let entries = value
                .as_array()
                .ok_or_else(|| StyleError::InvalidDefaultStyles {
                    type_name: decl.type_name.clone(),
                })?;
            for entry in entries {
                let fragment =
                    entry
                        .as_object()
                        .ok_or_else(|| StyleError::InvalidDefaultStyles {
                            type_name: decl.type_name.clone(),
                        })?;
                root_defaults.push(fragment.clone());
            }
        }

        // Root group first: its routed attributes are the property-plugin
        // attrs left unassigned by the child groups.
        let assigned: Vec<&str> = decl
            .routes
            .iter()
            .flat_map(|(_, routes)| routes.iter().map(|route| route.prop.as_str()))
            .collect();
        let root_routes = plugins
            .property_attrs()
            .iter()
            .filter(|attr| !assigned.contains(&attr.as_str()))
            .map(|attr| PropRoute::new(attr))
            .collect();

        let mut groups = vec![GroupSpec {
            key: STYLE.to_string(),
            attr_name: STYLE.to_string(),
            child: None,
            defaults: root_defaults,
            routes: root_routes,
            plugin_attrs: Vec::new(),
        }];

        for (key, routes) in decl.routes {
            let base = key.strip_suffix(STYLE_SUFFIX).unwrap_or(&key).to_string();
            let attr_name = style_property_name(&base);
            let defaults = decl
                .default_styles
                .get(&key)
                .or_else(|| decl.default_styles.get(&attr_name))
                .cloned()
                .unwrap_or_default();
            groups.push(GroupSpec {
                key: base.clone(),
                attr_name,
                child: Some(base),
                defaults,
                routes,
                plugin_attrs: Vec::new(),
            });
        }

        for group in &mut groups {
            group.plugin_attrs = plugins
                .property_attrs()
                .iter()
                .filter(|attr| group.route(attr).is_some())
                .cloned()
                .collect();
        }

        Ok(Self {
            class_name: options
                .class_name
                .unwrap_or_else(|| decl.type_name.clone()),
            type_name: decl.type_name,
            namespace: decl.namespace,
            capabilities,
            groups,
        })
    }

    /// The declared style groups, root group first.
    pub fn groups(&self) -> &[GroupSpec] {
        &self.groups
    }

    /// A group by its external attribute name.
    pub fn group(&self, attr_name: &str) -> Option<&GroupSpec> {
        self.groups.iter().find(|group| group.attr_name == attr_name)
    }

    /// The lookup context for one group.
    pub fn ns_for(&self, group: &GroupSpec) -> NamespaceContext {
        NamespaceContext::new(
            &self.type_name,
            Some(&self.class_name),
            self.namespace.as_deref(),
            group.child.as_deref(),
        )
    }
}

/// Live per-instance style state: one resolved style object per group plus
/// extracted sibling outputs. Recomputed, never mutated in place.
#[derive(Debug, Clone)]
pub struct ComponentInstance {
    definition: Arc<ComponentDefinition>,
    styles: BTreeMap<String, Fragment>,
    group_extracted: BTreeMap<String, Fragment>,
    extracted: Fragment,
}

impl ComponentInstance {
    /// Constructs an instance with every group initialized to its declared
    /// defaults.
    pub fn new(definition: Arc<ComponentDefinition>) -> Self {
        let styles = definition
            .groups()
            .iter()
            .map(|group| (group.attr_name.clone(), flatten(&group.defaults)))
            .collect();
        Self {
            definition,
            styles,
            group_extracted: BTreeMap::new(),
            extracted: Fragment::new(),
        }
    }

    /// The definition this instance was built from.
    pub fn definition(&self) -> &ComponentDefinition {
        &self.definition
    }

    /// The resolved style for a group's external attribute name.
    pub fn style(&self, attr_name: &str) -> Option<&Fragment> {
        self.styles.get(attr_name)
    }

    /// Sibling outputs produced by style→prop extraction, combined across
    /// groups. Rebuilt from each group's latest pass, so an output whose
    /// source attribute disappeared is gone too.
    pub fn extracted(&self) -> &Fragment {
        &self.extracted
    }

    /// Full resolution of every declared group, run once on mount.
    pub fn mount(&mut self, stylist: &Stylist, props: &Props, context: &Props) {
        let definition = self.definition.clone();
        let resolver = CascadeResolver::new(stylist, &definition, props, context);
        for group in definition.groups() {
            let (style, extracted) = resolver.resolve_group(group);
            self.styles.insert(group.attr_name.clone(), style);
            self.group_extracted.insert(group.attr_name.clone(), extracted);
        }
        self.extracted = flatten(self.group_extracted.values());
    }

    /// Partial re-resolution on a props update.
    ///
    /// A group is re-resolved only when its watched attribute — the group's
    /// own external style attribute — has old and new values that are both
    /// defined and differ. Coarse by design: a change to an attribute that
    /// merely feeds a group does not re-trigger that group.
    pub fn update(&mut self, stylist: &Stylist, old: &Props, new: &Props, context: &Props) {
        let definition = self.definition.clone();
        let resolver = CascadeResolver::new(stylist, &definition, new, context);
        for group in definition.groups() {
            let before = old.get(&group.attr_name);
            let after = new.get(&group.attr_name);
            let changed = matches!(
                (before, after),
                (Some(a), Some(b)) if !a.is_null() && !b.is_null() && a != b
            );
            if changed {
                let (style, extracted) = resolver.resolve_group(group);
                self.styles.insert(group.attr_name.clone(), style);
                self.group_extracted.insert(group.attr_name.clone(), extracted);
            }
        }
        self.extracted = flatten(self.group_extracted.values());
    }
}
