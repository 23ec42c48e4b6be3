//! Cascade-based style resolution for component trees.
//!
//! A host UI layer registers its themes and rules into a
//! [`StyleRegistry`], compiles them once into an immutable sheet, and
//! registers its component types. Each component instance then gets one
//! resolved style object per declared style group, computed by a
//! deterministic cascade:
//!
//! 1. the type's default fragments
//! 2. the compiled rule matched by qualified class name
//! 3. global plugins (state lookup, props→style transforms, attribute
//!    routing into child groups)
//! 4. property plugins bound to present input attributes
//! 5. verbatim pass-through of routed attributes no plugin claims
//! 6. the inline style override, always final
//!
//! Later fragments win per attribute; absent rules, plugins and attributes
//! contribute nothing. Errors are reserved for configuration and
//! registration; resolution itself never fails.
//!
//! # Example
//!
//! ```rust
//! use restyle::{
//!     ComponentDecl, ComponentInstance, Configuration, Props, StyleRegistry,
//!     Stylist,
//! };
//! use serde_json::json;
//! use std::collections::BTreeMap;
//!
//! let mut registry = StyleRegistry::new();
//! let mut rules = BTreeMap::new();
//! rules.insert(
//!     "Label".to_string(),
//!     json!({"color": "green"}).as_object().unwrap().clone(),
//! );
//! registry.merge_styles(&rules);
//!
//! let stylist = Stylist::configure(registry, Configuration::default()).unwrap();
//! let label = stylist.register(ComponentDecl::new("Label")).unwrap();
//!
//! let mut instance = ComponentInstance::new(label);
//! let props: Props = json!({"style": {"margin": 4}})
//!     .as_object().unwrap().clone();
//! instance.mount(&stylist, &props, &Props::new());
//!
//! let style = instance.style("style").unwrap();
//! assert_eq!(style["color"], json!("green"));
//! assert_eq!(style["margin"], json!(4));
//! ```

pub mod component;
pub mod config;
pub mod error;
pub mod fragment;
pub mod namespace;
pub mod plugin;
pub mod processor;
pub mod registry;
pub mod resolver;
pub mod stylist;
pub mod theme;

pub use component::{
    Capabilities, ComponentDecl, ComponentDefinition, ComponentInstance, ExtractRule, GroupSpec,
    PropRoute, PropStyleFn, StateFn, StateValue, StyleOptions, StyleOptionsFn,
    style_property_name, STYLE, STYLE_SUFFIX,
};
pub use config::{Configuration, Invariant, DEFAULT_SIZES};
pub use error::StyleError;
pub use fragment::{
    defined_value, flatten, fragments_from_value, is_defined, Fragment, Props, StyleValue,
};
pub use namespace::NamespaceContext;
pub use plugin::{
    builtin_plugins, GlobalArgs, GlobalFn, PluginDef, PluginOutput, PluginRegistry, PropertyArgs,
    PropertyFn, ValueConstraint, CLASS_NAMES, PROPERTY_ROUTER, PROPS_TO_STYLE, STYLE_STATE,
};
pub use processor::{Processor, Rewrite, RewriteArgs, RewriteFn, Rewritten, Scope};
pub use registry::{InvariantEntry, StyleRegistry, StyleSheet};
pub use resolver::CascadeResolver;
pub use stylist::Stylist;
pub use theme::{FontResolver, StyleBuilderFn, StyleSource, Theme, ThemeContext};
