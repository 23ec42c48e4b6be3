//! Cascade resolution.
//!
//! For one style group of one component instance, fragments are gathered in
//! a fixed precedence order and flattened left-to-right:
//!
//! 1. the group's declared default fragments (type level, fixed at
//!    registration)
//! 2. the compiled rule looked up by qualified class name; absence is not
//!    an error
//! 3. every global plugin, in registration order (state lookup and routed
//!    child fragments arrive here)
//! 4. every property plugin bound to a present attribute, in the group's
//!    filtered plugin order, given the already-rewritten value
//! 5. one trailing verbatim fragment for routed-but-unclaimed attributes,
//!    renamed per the route
//! 6. the group's inline override input, appended last and so final
//!
//! A separately-invoked transform then extracts configured attributes out
//! of the flattened result into sibling outputs; the source attribute is
//! always deleted from the style.
//!
//! Resolution is synchronous, deterministic and permissive: absent rules,
//! plugins and attributes contribute no fragment, never an error.

use crate::component::{ComponentDefinition, ExtractRule, GroupSpec};
use crate::fragment::{
    defined_value, flatten, fragments_from_value, Fragment, Props,
};
use crate::plugin::{GlobalArgs, PluginOutput, PropertyArgs};
use crate::processor::Scope;
use crate::stylist::Stylist;

/// Resolves style groups for one component instance during one pass.
pub struct CascadeResolver<'a> {
    stylist: &'a Stylist,
    definition: &'a ComponentDefinition,
    props: &'a Props,
    context: &'a Props,
}

impl<'a> CascadeResolver<'a> {
    /// Binds a resolver to one pass: current props and inherited context.
    pub fn new(
        stylist: &'a Stylist,
        definition: &'a ComponentDefinition,
        props: &'a Props,
        context: &'a Props,
    ) -> Self {
        Self {
            stylist,
            definition,
            props,
            context,
        }
    }

    /// Resolves one group: the flattened cascade plus the extracted sibling
    /// outputs.
    pub fn resolve_group(&self, group: &GroupSpec) -> (Fragment, Fragment) {
        let mut style = self.resolve_cascade(group);
        let extracted = self.extract_style_props(&mut style);
        (style, extracted)
    }

    /// The ordered cascade for one group, flattened.
    pub fn resolve_cascade(&self, group: &GroupSpec) -> Fragment {
        let sheet = self.stylist.sheet();
        let ns = self.definition.ns_for(group);
        let mut fragments: Vec<Fragment> = Vec::new();

        // 1. Type-level defaults.
        fragments.extend(group.defaults.iter().cloned());

        // 2. Compiled rule by qualified class name.
        if let Some(rule) = sheet.rule(&ns.class_name()) {
            fragments.push(rule.clone());
        }

        // 3. Global plugins in registration order.
        for (_, func) in self.stylist.plugins().globals() {
            let output = func(&GlobalArgs {
                props: self.props,
                context: self.context,
                ns: &ns,
                group,
                definition: self.definition,
                sheet,
                config: self.stylist.config(),
                plugins: self.stylist.plugins(),
                processor: self.stylist.processor(),
            });
            match output {
                PluginOutput::Fragments(produced) => fragments.extend(produced),
                PluginOutput::Routes(mut routes) => {
                    if let Some(routed) = routes.remove(&group.attr_name) {
                        fragments.extend(routed);
                    }
                }
            }
        }

        // 4–5. Property plugins and verbatim pass-through. Child groups'
        // routed attributes were handled by the router at step 3.
        if group.is_root() {
            self.apply_property_plugins(group, &ns, &mut fragments);
            self.apply_verbatim(group, &mut fragments);
        }

        // 6. Inline override, final precedence.
        if let Some(inline) = self.props.get(&group.attr_name) {
            fragments.extend(fragments_from_value(inline));
        }

        flatten(&fragments)
    }

    fn apply_property_plugins(
        &self,
        group: &GroupSpec,
        ns: &crate::namespace::NamespaceContext,
        fragments: &mut Vec<Fragment>,
    ) {
        let sheet = self.stylist.sheet();
        let plugins = self.stylist.plugins();

        // The group's filtered plugin set, fixed at registration.
        for attr in &group.plugin_attrs {
            let Some(raw) = defined_value(self.props, self.context, attr) else {
                continue;
            };
            let Some(plugin) = plugins.property(attr) else {
                continue;
            };

            let value = self
                .stylist
                .processor()
                .rewrite_value(attr, raw, Scope::Props, sheet.colors(), sheet.sizes())
                .map(|rewritten| rewritten.value)
                .unwrap_or_else(|| raw.clone());

            if let Some(constraint) = &plugin.constraint {
                if !constraint.check(&value) {
                    continue;
                }
            }

            let produced = (plugin.func)(&PropertyArgs {
                attr,
                value: &value,
                props: self.props,
                context: self.context,
                ns,
                sheet,
                config: self.stylist.config(),
            });
            if let Some(produced) = produced {
                fragments.extend(produced);
            }
        }
    }

    fn apply_verbatim(&self, group: &GroupSpec, fragments: &mut Vec<Fragment>) {
        let plugins = self.stylist.plugins();
        let mut verbatim = Fragment::new();
        for route in &group.routes {
            if plugins.property(&route.prop).is_some() {
                continue;
            }
            if let Some(value) = defined_value(self.props, self.context, &route.prop) {
                verbatim.insert(route.style_attr().to_string(), value.clone());
            }
        }
        if !verbatim.is_empty() {
            fragments.push(verbatim);
        }
    }

    /// The style→prop extraction pass.
    ///
    /// For each configured source attribute present in the flattened style,
    /// removes it and assigns it (optionally renamed) to the returned
    /// sibling outputs. The source attribute is always deleted, target or
    /// not — the style object never retains it.
    pub fn extract_style_props(&self, style: &mut Fragment) -> Fragment {
        let mut outputs = Fragment::new();
        let Some(rules) = &self.definition.capabilities.style_to_props else {
            return outputs;
        };
        extract(rules, style, &mut outputs);
        outputs
    }
}

fn extract(rules: &[ExtractRule], style: &mut Fragment, outputs: &mut Fragment) {
    for rule in rules {
        if let Some(value) = style.remove(&rule.source) {
            if let Some(target) = &rule.target {
                outputs.insert(target.clone(), value);
            }
            // No target configured: the value is dropped.
        }
    }
}
