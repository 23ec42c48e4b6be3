//! Top-level configuration facade.
//!
//! A [`Stylist`] is built once at process or theme setup: it compiles a
//! [`StyleRegistry`](crate::StyleRegistry) into an immutable sheet, registers
//! and validates the plugin set, and collates the value rewriters. Component
//! types register against it; instances read it concurrently with no
//! locking, since everything behind it is read-only after configure.

use std::sync::Arc;

use tracing::debug;

use crate::component::{ComponentDecl, ComponentDefinition};
use crate::config::Configuration;
use crate::error::StyleError;
use crate::plugin::{builtin_plugins, PluginRegistry};
use crate::processor::Processor;
use crate::registry::{StyleRegistry, StyleSheet};

/// Configured, read-only style system: compiled sheet, plugin tables and
/// rewriters.
#[derive(Debug, Clone)]
pub struct Stylist {
    sheet: Arc<StyleSheet>,
    plugins: PluginRegistry,
    processor: Processor,
    config: Configuration,
}

impl Stylist {
    /// Compiles the registry and validates the plugin set.
    ///
    /// The plugin set is the built-in set (extended property plugins
    /// included when configured) unless `config.plugins` replaces it;
    /// `config.additional_plugins` are appended after, and names in
    /// `config.disabled_plugins` are dropped.
    ///
    /// # Errors
    ///
    /// Returns plugin registration errors; see
    /// [`PluginRegistry::register`].
    pub fn configure(registry: StyleRegistry, config: Configuration) -> Result<Self, StyleError> {
        let mut defs = match &config.plugins {
            Some(defs) => defs.clone(),
            None => builtin_plugins(config.extended_properties),
        };
        defs.extend(config.additional_plugins.iter().cloned());

        let plugins = PluginRegistry::register(defs, &config.disabled_plugins)?;
        let processor = Processor::collate(&config.processors);
        let sheet = Arc::new(registry.compile(&config));

        debug!(
            rules = sheet.len(),
            properties = plugins.property_attrs().len(),
            "stylist configured"
        );

        Ok(Self {
            sheet,
            plugins,
            processor,
            config,
        })
    }

    /// Registers a component type, validating its declaration.
    ///
    /// # Errors
    ///
    /// Returns declaration errors; see
    /// [`ComponentDefinition::register`].
    pub fn register(&self, decl: ComponentDecl) -> Result<Arc<ComponentDefinition>, StyleError> {
        let definition = ComponentDefinition::register(decl, &self.sheet, &self.plugins)?;
        debug!(
            type_name = definition.type_name.as_str(),
            groups = definition.groups().len(),
            "component registered"
        );
        Ok(Arc::new(definition))
    }

    /// The compiled sheet.
    pub fn sheet(&self) -> &StyleSheet {
        &self.sheet
    }

    /// The validated plugin tables.
    pub fn plugins(&self) -> &PluginRegistry {
        &self.plugins
    }

    /// The collated value rewriters.
    pub fn processor(&self) -> &Processor {
        &self.processor
    }

    /// The configuration as given to [`Stylist::configure`].
    pub fn config(&self) -> &Configuration {
        &self.config
    }
}
