//! Built-in plugins.
//!
//! Three globals (state lookup, props→style transforms, the router) plus
//! the class-list property plugin. The extended property plugins map common
//! shorthand attributes (`background`, `color`, `radius`, `padding`,
//! `margin`, `fontSize`) to style fragments, substituting palette names and
//! scale entries where the value is a name.

use std::sync::Arc;

use crate::component::StateValue;
use crate::fragment::{defined_value, Fragment};
use crate::plugin::router::property_router;
use crate::plugin::{GlobalArgs, PluginDef, PluginOutput, PropertyArgs, ValueConstraint};

/// Name of the state-lookup global plugin.
pub const STYLE_STATE: &str = "style-state";

/// Name of the props→style transform global plugin.
pub const PROPS_TO_STYLE: &str = "props-to-style";

/// Bound attribute of the class-list property plugin.
pub const CLASS_NAMES: &str = "className";

/// The built-in plugin set, in registration (and therefore cascade) order.
///
/// The router runs after the state plugin so routed attribute values win
/// over state-rule fragments in child groups.
pub fn builtin_plugins(extended_properties: bool) -> Vec<PluginDef> {
    let mut plugins = vec![
        PluginDef::global(STYLE_STATE, Arc::new(style_state)),
        PluginDef::global(PROPS_TO_STYLE, Arc::new(props_to_style)),
        property_router(),
        PluginDef::property_with(
            CLASS_NAMES,
            Arc::new(class_names),
            ValueConstraint::StringOrArray,
        ),
    ];
    if extended_properties {
        plugins.extend(extended_property_plugins());
    }
    plugins
}

/// State lookup: a state key recomputes the qualified name with a state
/// suffix and looks it up; a structured value is used as a fragment
/// verbatim.
fn style_state(args: &GlobalArgs<'_>) -> PluginOutput {
    let Some(to_state) = &args.definition.capabilities.props_to_state else {
        return PluginOutput::none();
    };
    let Some(state) = to_state(args.props) else {
        return PluginOutput::none();
    };

    let fragments = match state {
        StateValue::Key(key) => {
            let rule_name = args.ns.state_class_name(&key);
            args.sheet
                .rule(&rule_name)
                .map(|rule| vec![rule.clone()])
                .unwrap_or_default()
        }
        StateValue::Fragment(fragment) => vec![fragment],
    };
    PluginOutput::Fragments(fragments)
}

/// Props→style transforms: each mapped attribute with a defined value runs
/// its transform function.
fn props_to_style(args: &GlobalArgs<'_>) -> PluginOutput {
    let Some(map) = &args.definition.capabilities.props_to_style else {
        return PluginOutput::none();
    };

    let mut fragments = Vec::new();
    for (attr, transform) in map {
        if let Some(value) = defined_value(args.props, args.context, attr) {
            let produced = transform(&PropertyArgs {
                attr,
                value,
                props: args.props,
                context: args.context,
                ns: args.ns,
                sheet: args.sheet,
                config: args.config,
            });
            if let Some(fragment) = produced {
                fragments.push(fragment);
            }
        }
    }
    PluginOutput::Fragments(fragments)
}

/// Class-list lookup: names are matched directly against the compiled rule
/// table, not namespace-qualified, and returned in the given order so later
/// names win at flatten.
fn class_names(args: &PropertyArgs<'_>) -> Option<Vec<Fragment>> {
    let names: Vec<String> = match args.value {
        serde_json::Value::String(list) => {
            list.split_whitespace().map(|s| s.to_string()).collect()
        }
        serde_json::Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str().map(|s| s.to_string()))
            .collect(),
        _ => return None,
    };

    Some(
        names
            .iter()
            .filter_map(|name| args.sheet.rule(name).cloned())
            .collect(),
    )
}

fn extended_property_plugins() -> Vec<PluginDef> {
    vec![
        PluginDef::property_with(
            "color",
            Arc::new(|args: &PropertyArgs<'_>| {
                Some(vec![single("color", args.sheet.resolve_color(args.value))])
            }),
            ValueConstraint::Str,
        ),
        PluginDef::property_with(
            "background",
            Arc::new(|args: &PropertyArgs<'_>| {
                Some(vec![single(
                    "backgroundColor",
                    args.sheet.resolve_color(args.value),
                )])
            }),
            ValueConstraint::Str,
        ),
        PluginDef::property_with(
            "radius",
            Arc::new(|args: &PropertyArgs<'_>| {
                Some(vec![single("borderRadius", args.value.clone())])
            }),
            ValueConstraint::Number,
        ),
        PluginDef::property("padding", Arc::new(|args: &PropertyArgs<'_>| {
            Some(vec![single("padding", args.value.clone())])
        })),
        PluginDef::property("margin", Arc::new(|args: &PropertyArgs<'_>| {
            Some(vec![single("margin", args.value.clone())])
        })),
        PluginDef::property_with(
            "fontSize",
            Arc::new(|args: &PropertyArgs<'_>| {
                let size = match args.value.as_str() {
                    Some(name) => serde_json::json!(args
                        .sheet
                        .sizes()
                        .get(name)
                        .copied()
                        .unwrap_or(args.config.default_font_size)),
                    None => args.value.clone(),
                };
                Some(vec![single("fontSize", size)])
            }),
            ValueConstraint::StringOrNumber,
        ),
    ]
}

fn single(name: &str, value: serde_json::Value) -> Fragment {
    let mut fragment = Fragment::new();
    fragment.insert(name.to_string(), value);
    fragment
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{ComponentDecl, ComponentDefinition};
    use crate::config::Configuration;
    use crate::fragment::Props;
    use crate::namespace::NamespaceContext;
    use crate::plugin::PluginRegistry;
    use crate::processor::Processor;
    use crate::registry::{StyleRegistry, StyleSheet};
    use serde_json::json;
    use std::collections::BTreeMap;

    fn frag(value: serde_json::Value) -> Fragment {
        value.as_object().unwrap().clone()
    }

    fn sheet_with(rules: &[(&str, serde_json::Value)]) -> StyleSheet {
        let mut registry = StyleRegistry::new();
        let mut map = BTreeMap::new();
        for (name, body) in rules {
            map.insert(name.to_string(), frag(body.clone()));
        }
        registry.merge_styles(&map);
        registry.compile(&Configuration::default())
    }

    fn property_args<'a>(
        attr: &'a str,
        value: &'a serde_json::Value,
        props: &'a Props,
        ns: &'a NamespaceContext,
        sheet: &'a StyleSheet,
        config: &'a Configuration,
        context: &'a Props,
    ) -> PropertyArgs<'a> {
        PropertyArgs {
            attr,
            value,
            props,
            context,
            ns,
            sheet,
            config,
        }
    }

    #[test]
    fn class_names_accepts_string_and_array_forms() {
        let sheet = sheet_with(&[
            ("a", json!({"color": "red"})),
            ("b", json!({"color": "blue"})),
        ]);
        let config = Configuration::default();
        let ns = NamespaceContext::new("Label", None, None, None);
        let props = Props::new();
        let context = Props::new();

        let value = json!("a b");
        let args = property_args("className", &value, &props, &ns, &sheet, &config, &context);
        let fragments = class_names(&args).unwrap();
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0]["color"], json!("red"));
        assert_eq!(fragments[1]["color"], json!("blue"));

        let value = json!(["b", "a"]);
        let args = property_args("className", &value, &props, &ns, &sheet, &config, &context);
        let fragments = class_names(&args).unwrap();
        assert_eq!(fragments[0]["color"], json!("blue"));
    }

    #[test]
    fn class_names_skips_unknown_rules() {
        let sheet = sheet_with(&[("a", json!({"color": "red"}))]);
        let config = Configuration::default();
        let ns = NamespaceContext::new("Label", None, None, None);
        let props = Props::new();
        let context = Props::new();

        let value = json!("a missing");
        let args = property_args("className", &value, &props, &ns, &sheet, &config, &context);
        assert_eq!(class_names(&args).unwrap().len(), 1);
    }

    #[test]
    fn state_key_resolves_qualified_state_rule() {
        let sheet = sheet_with(&[("Button:active", json!({"opacity": 0.5}))]);
        let config = Configuration::default();
        let plugins = PluginRegistry::default();
        let processor = Processor::default();
        let decl = ComponentDecl::new("Button")
            .props_to_state(Arc::new(|props: &Props| {
                props
                    .get("active")
                    .and_then(|v| v.as_bool())
                    .filter(|active| *active)
                    .map(|_| StateValue::Key("active".to_string()))
            }));
        let definition = ComponentDefinition::register(decl, &sheet, &plugins).unwrap();
        let group = definition.groups()[0].clone();
        let ns = definition.ns_for(&group);
        let props = frag(json!({"active": true}));
        let context = Props::new();

        let args = GlobalArgs {
            props: &props,
            context: &context,
            ns: &ns,
            group: &group,
            definition: &definition,
            sheet: &sheet,
            config: &config,
            plugins: &plugins,
            processor: &processor,
        };
        let output = style_state(&args);
        match output {
            PluginOutput::Fragments(fragments) => {
                assert_eq!(fragments.len(), 1);
                assert_eq!(fragments[0]["opacity"], json!(0.5));
            }
            other => panic!("expected fragments, got {:?}", other),
        }
    }

    #[test]
    fn structured_state_value_is_used_verbatim() {
        let sheet = StyleSheet::default();
        let config = Configuration::default();
        let plugins = PluginRegistry::default();
        let processor = Processor::default();
        let decl = ComponentDecl::new("Button").props_to_state(Arc::new(|_| {
            Some(StateValue::Fragment(
                serde_json::json!({"opacity": 0.2}).as_object().unwrap().clone(),
            ))
        }));
        let definition = ComponentDefinition::register(decl, &sheet, &plugins).unwrap();
        let group = definition.groups()[0].clone();
        let ns = definition.ns_for(&group);
        let props = Props::new();
        let context = Props::new();

        let args = GlobalArgs {
            props: &props,
            context: &context,
            ns: &ns,
            group: &group,
            definition: &definition,
            sheet: &sheet,
            config: &config,
            plugins: &plugins,
            processor: &processor,
        };
        match style_state(&args) {
            PluginOutput::Fragments(fragments) => {
                assert_eq!(fragments[0]["opacity"], json!(0.2));
            }
            other => panic!("expected fragments, got {:?}", other),
        }
    }

    #[test]
    fn extended_color_plugin_substitutes_palette_names() {
        let mut registry = StyleRegistry::new();
        registry.merge_colors(&frag(json!({"base": "#2aa198"})));
        let sheet = registry.compile(&Configuration::default());
        let config = Configuration::default();
        let ns = NamespaceContext::new("Label", None, None, None);
        let props = Props::new();
        let context = Props::new();

        let plugins = extended_property_plugins();
        let PluginDef::Property { func, .. } = &plugins[0] else {
            panic!("expected property plugin");
        };
        let value = json!("base");
        let args = property_args("color", &value, &props, &ns, &sheet, &config, &context);
        let fragments = func(&args).unwrap();
        assert_eq!(fragments[0]["color"], json!("#2aa198"));
    }

    #[test]
    fn font_size_plugin_resolves_scale_names() {
        let sheet = StyleRegistry::new().compile(&Configuration::default());
        let config = Configuration::default();
        let ns = NamespaceContext::new("Label", None, None, None);
        let props = Props::new();
        let context = Props::new();

        let plugins = extended_property_plugins();
        let PluginDef::Property { func, .. } = plugins.last().unwrap() else {
            panic!("expected property plugin");
        };

        let value = json!("large");
        let args = property_args("fontSize", &value, &props, &ns, &sheet, &config, &context);
        assert_eq!(func(&args).unwrap()[0]["fontSize"], json!(18.0));

        let value = json!(21);
        let args = property_args("fontSize", &value, &props, &ns, &sheet, &config, &context);
        assert_eq!(func(&args).unwrap()[0]["fontSize"], json!(21));

        let value = json!("unknown");
        let args = property_args("fontSize", &value, &props, &ns, &sheet, &config, &context);
        assert_eq!(func(&args).unwrap()[0]["fontSize"], json!(16.0));
    }
}
