//! The property router.
//!
//! A built-in global plugin responsible for fan-out: pulling a component's
//! routed input attributes into its child style groups. Routing is pure —
//! the router returns a mapping from group name to fragment list and the
//! resolver merges the entry for the group being resolved; it never writes
//! into instance state.
//!
//! An attribute owned by a registered property plugin is delegated to that
//! plugin rather than copied raw, so a plugin-owned attribute always wins
//! over naive copying even when routed through a child mapping. A
//! plugin-owned value that fails the plugin's shape constraint is dropped
//! outright, never verbatim-copied as a fallback. Attributes without a
//! plugin are copied verbatim into one trailing fragment, renamed per the
//! route.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::fragment::{defined_value, Fragment};
use crate::plugin::{GlobalArgs, PluginDef, PluginOutput, PropertyArgs};
use crate::processor::Scope;

/// Name of the router global plugin.
pub const PROPERTY_ROUTER: &str = "property-router";

/// The router plugin definition.
pub fn property_router() -> PluginDef {
    PluginDef::global(PROPERTY_ROUTER, Arc::new(route))
}

fn route(args: &GlobalArgs<'_>) -> PluginOutput {
    // The root group's routed attributes are handled by the resolver's own
    // property-plugin and verbatim steps.
    if args.group.is_root() {
        return PluginOutput::Routes(BTreeMap::new());
    }

    let mut fragments: Vec<Fragment> = Vec::new();
    let mut verbatim = Fragment::new();

    for route in &args.group.routes {
        let Some(raw) = defined_value(args.props, args.context, &route.prop) else {
            continue;
        };

        // Props-context rewriters run first so plugins receive the
        // already-resolved value.
        let value = args
            .processor
            .rewrite_value(
                &route.prop,
                raw,
                Scope::Props,
                args.sheet.colors(),
                args.sheet.sizes(),
            )
            .map(|rewritten| rewritten.value)
            .unwrap_or_else(|| raw.clone());

        if let Some(plugin) = args.plugins.property(&route.prop) {
            if let Some(constraint) = &plugin.constraint {
                if !constraint.check(&value) {
                    debug!(
                        attr = route.prop.as_str(),
                        "routed value fails plugin constraint, skipped"
                    );
                    continue;
                }
            }
            let produced = (plugin.func)(&PropertyArgs {
                attr: &route.prop,
                value: &value,
                props: args.props,
                context: args.context,
                ns: args.ns,
                sheet: args.sheet,
                config: args.config,
            });
            if let Some(mut produced) = produced {
                fragments.append(&mut produced);
            }
        } else {
            verbatim.insert(route.style_attr().to_string(), value);
        }
    }

    if !verbatim.is_empty() {
        fragments.push(verbatim);
    }

    let mut routes = BTreeMap::new();
    routes.insert(args.group.attr_name.clone(), fragments);
    PluginOutput::Routes(routes)
}
