//! End-to-end cascade behavior through the public API: configure a stylist,
//! register component types, mount instances and check the resolved style
//! objects.

use std::collections::BTreeMap;
use std::sync::Arc;

use restyle::{
    ComponentDecl, ComponentInstance, Configuration, ExtractRule, Fragment, Invariant, PropRoute,
    PropStyleFn, Props, StateValue, StyleRegistry, StyleSource, Stylist, Theme,
};
use serde_json::json;

fn frag(value: serde_json::Value) -> Fragment {
    value.as_object().unwrap().clone()
}

fn rules(entries: &[(&str, serde_json::Value)]) -> BTreeMap<String, Fragment> {
    entries
        .iter()
        .map(|(name, body)| (name.to_string(), frag(body.clone())))
        .collect()
}

fn stylist(entries: &[(&str, serde_json::Value)], config: Configuration) -> Stylist {
    let mut registry = StyleRegistry::new();
    registry.merge_styles(&rules(entries));
    Stylist::configure(registry, config).unwrap()
}

#[test]
fn default_class_and_inline_precedence() {
    let stylist = stylist(&[("Label", json!({"color": "green"}))], Configuration::default());
    let label = stylist
        .register(ComponentDecl::new("Label").defaults("style", vec![frag(json!({"color": "red"}))]))
        .unwrap();

    let mut instance = ComponentInstance::new(label);
    let props = frag(json!({"style": {"color": "blue"}}));
    instance.mount(&stylist, &props, &Props::new());

    assert_eq!(instance.style("style").unwrap()["color"], json!("blue"));
}

#[test]
fn identical_inputs_yield_identical_styles() {
    let config = Configuration {
        extended_properties: true,
        ..Configuration::default()
    };
    let stylist = stylist(
        &[
            ("Card", json!({"padding": 12, "color": "grey"})),
            ("raised", json!({"shadowRadius": 3})),
        ],
        config,
    );
    let card = stylist
        .register(ComponentDecl::new("Card").group("title", vec![PropRoute::new("titleColor")]))
        .unwrap();

    let props = frag(json!({
        "className": "raised",
        "background": "#fff",
        "titleColor": "navy",
        "style": {"margin": 6}
    }));
    let context = Props::new();

    let mut first = ComponentInstance::new(card.clone());
    first.mount(&stylist, &props, &context);
    let mut second = ComponentInstance::new(card);
    second.mount(&stylist, &props, &context);

    for attr in ["style", "titleStyle"] {
        assert_eq!(first.style(attr).unwrap(), second.style(attr).unwrap());
    }
}

#[test]
fn absent_sources_are_neutral() {
    // A rule table with an unrelated extra rule resolves identically to one
    // without it.
    let base = [("Label", json!({"margin": 4}))];
    let extra = [
        ("Label", json!({"margin": 4})),
        ("Unused", json!({"zIndex": 10})),
    ];
    let props = frag(json!({"style": {"color": "blue"}}));

    let mut resolved = Vec::new();
    for entries in [&base[..], &extra[..]] {
        let stylist = stylist(entries, Configuration::default());
        let label = stylist.register(ComponentDecl::new("Label")).unwrap();
        let mut instance = ComponentInstance::new(label);
        instance.mount(&stylist, &props, &Props::new());
        resolved.push(instance.style("style").unwrap().clone());
    }
    assert_eq!(resolved[0], resolved[1]);
    assert_eq!(resolved[0]["margin"], json!(4));
    assert_eq!(resolved[0]["color"], json!("blue"));
}

#[test]
fn registry_merge_keeps_existing_entries() {
    let mut registry = StyleRegistry::new();
    registry.merge_colors(&frag(json!({"primary": "#111"})));
    registry.merge_colors(&frag(json!({"primary": "#999", "accent": "#2aa198"})));

    let sheet = registry.compile(&Configuration::default());
    assert_eq!(sheet.colors()["primary"], json!("#111"));
    assert_eq!(sheet.colors()["accent"], json!("#2aa198"));
}

#[test]
fn invariants_are_extracted_at_compile_time() {
    let mut registry = StyleRegistry::new();
    registry.merge_styles(&rules(&[(
        "Icon",
        json!({"tintColor": "blue", "color": "red"}),
    )]));

    let config = Configuration {
        invariants: vec![Invariant::new("tintColor")],
        ..Configuration::default()
    };
    let stylist = Stylist::configure(registry, config).unwrap();

    // Extracted from the rule, reachable through the invariant table.
    let rule = stylist.sheet().rule("Icon").unwrap();
    assert!(!rule.contains_key("tintColor"));
    assert_eq!(rule["color"], json!("red"));
    let entry = stylist.sheet().invariant("Icon").unwrap();
    assert_eq!(entry.style_prop_name, "tintColor");
    assert_eq!(entry.value, json!("blue"));
}

#[test]
fn class_list_order_is_significant() {
    let stylist = stylist(
        &[
            ("muted", json!({"color": "grey", "opacity": 0.6})),
            ("warning", json!({"color": "orange"})),
        ],
        Configuration::default(),
    );
    let label = stylist.register(ComponentDecl::new("Label")).unwrap();

    let mut instance = ComponentInstance::new(label);
    let props = frag(json!({"className": "muted warning"}));
    instance.mount(&stylist, &props, &Props::new());

    let style = instance.style("style").unwrap();
    assert_eq!(style["color"], json!("orange"));
    assert_eq!(style["opacity"], json!(0.6));
}

#[test]
fn extraction_moves_attributes_to_sibling_outputs() {
    let stylist = stylist(
        &[("Field", json!({"special": "x", "color": "red"}))],
        Configuration::default(),
    );
    let field = stylist
        .register(
            ComponentDecl::new("Field")
                .style_to_props(vec![ExtractRule::renamed("special", "otherAttr")]),
        )
        .unwrap();

    let mut instance = ComponentInstance::new(field);
    instance.mount(&stylist, &Props::new(), &Props::new());

    assert!(!instance.style("style").unwrap().contains_key("special"));
    assert_eq!(instance.extracted()["otherAttr"], json!("x"));
}

#[test]
fn update_re_resolves_only_changed_groups() {
    let stylist = stylist(
        &[
            ("Panel", json!({"flex": 1})),
            ("Panel.Header", json!({"color": "grey"})),
        ],
        Configuration::default(),
    );
    let panel = stylist
        .register(ComponentDecl::new("Panel").group("header", vec![]))
        .unwrap();

    let mut instance = ComponentInstance::new(panel);
    let old = frag(json!({
        "style": {"margin": 2},
        "headerStyle": {"padding": 4}
    }));
    instance.mount(&stylist, &old, &Props::new());
    let root_before = instance.style("style").unwrap().clone();

    // Only the header attribute changes.
    let new = frag(json!({
        "style": {"margin": 2},
        "headerStyle": {"padding": 9}
    }));
    instance.update(&stylist, &old, &new, &Props::new());

    assert_eq!(instance.style("style").unwrap(), &root_before);
    assert_eq!(instance.style("headerStyle").unwrap()["padding"], json!(9));
    assert_eq!(instance.style("headerStyle").unwrap()["color"], json!("grey"));
}

#[test]
fn routed_attributes_land_in_their_child_group() {
    let config = Configuration {
        extended_properties: true,
        ..Configuration::default()
    };
    let mut registry = StyleRegistry::new();
    registry.merge_colors(&frag(json!({"base": "#073642"})));
    registry.merge_styles(&rules(&[("Panel.Body", json!({"padding": 10}))]));
    let stylist = Stylist::configure(registry, config).unwrap();

    let panel = stylist
        .register(
            ComponentDecl::new("Panel").group(
                "body",
                vec![PropRoute::new("background"), PropRoute::renamed("space", "margin")],
            ),
        )
        .unwrap();

    let mut instance = ComponentInstance::new(panel);
    let props = frag(json!({"background": "base", "space": 8}));
    instance.mount(&stylist, &props, &Props::new());

    let body = instance.style("bodyStyle").unwrap();
    assert_eq!(body["padding"], json!(10));
    assert_eq!(body["backgroundColor"], json!("#073642"));
    assert_eq!(body["margin"], json!(8));
    // Routed attributes never leak into the root group.
    let root = instance.style("style").unwrap();
    assert!(!root.contains_key("backgroundColor"));
    assert!(!root.contains_key("margin"));
}

#[test]
fn state_rules_layer_between_class_rule_and_inline() {
    let stylist = stylist(
        &[
            ("Button", json!({"color": "grey", "opacity": 1.0})),
            ("Button:disabled", json!({"opacity": 0.4})),
        ],
        Configuration::default(),
    );
    let button = stylist
        .register(ComponentDecl::new("Button").props_to_state(Arc::new(|props: &Props| {
            props
                .get("disabled")
                .and_then(|v| v.as_bool())
                .filter(|on| *on)
                .map(|_| StateValue::Key("disabled".to_string()))
        })))
        .unwrap();

    let mut instance = ComponentInstance::new(button);
    let props = frag(json!({"disabled": true, "style": {"color": "black"}}));
    instance.mount(&stylist, &props, &Props::new());

    let style = instance.style("style").unwrap();
    assert_eq!(style["opacity"], json!(0.4));
    assert_eq!(style["color"], json!("black"));
}

#[test]
fn props_to_style_transforms_run_for_defined_attributes() {
    let stylist = stylist(&[("Label", json!({"color": "black"}))], Configuration::default());

    let muted: PropStyleFn = Arc::new(|args| {
        args.value
            .as_bool()
            .filter(|on| *on)
            .map(|_| frag(json!({"opacity": 0.5})))
    });
    let mut transforms = BTreeMap::new();
    transforms.insert("muted".to_string(), muted);
    let label = stylist
        .register(ComponentDecl::new("Label").props_to_style(transforms))
        .unwrap();

    let mut instance = ComponentInstance::new(label.clone());
    instance.mount(&stylist, &frag(json!({"muted": true})), &Props::new());
    let style = instance.style("style").unwrap();
    assert_eq!(style["opacity"], json!(0.5));
    assert_eq!(style["color"], json!("black"));

    // Undefined attribute: the transform never runs.
    let mut plain = ComponentInstance::new(label);
    plain.mount(&stylist, &Props::new(), &Props::new());
    assert!(!plain.style("style").unwrap().contains_key("opacity"));
}

#[test]
fn extraction_outputs_are_replaced_not_accumulated() {
    let stylist = stylist(&[], Configuration::default());
    let field = stylist
        .register(
            ComponentDecl::new("Field")
                .style_to_props(vec![ExtractRule::renamed("special", "otherAttr")]),
        )
        .unwrap();

    let mut instance = ComponentInstance::new(field);
    let old = frag(json!({"style": {"special": "x", "color": "red"}}));
    instance.mount(&stylist, &old, &Props::new());
    assert_eq!(instance.extracted()["otherAttr"], json!("x"));

    // The re-resolved style no longer carries the source attribute, so the
    // extracted output disappears with it.
    let new = frag(json!({"style": {"color": "blue"}}));
    instance.update(&stylist, &old, &new, &Props::new());
    assert!(!instance.extracted().contains_key("otherAttr"));
}

#[test]
fn theme_palette_is_available_to_style_builders() {
    let mut registry = StyleRegistry::new();
    registry
        .add_theme(
            Theme::new()
                .colors(json!({"ink": "#002b36"}))
                .styles(StyleSource::Builder(Arc::new(|ctx| {
                    let mut styles = BTreeMap::new();
                    let mut rule = Fragment::new();
                    rule.insert("color".to_string(), ctx.colors["ink"].clone());
                    styles.insert("Label".to_string(), rule);
                    styles
                }))),
        )
        .unwrap();

    let stylist = Stylist::configure(registry, Configuration::default()).unwrap();
    assert_eq!(stylist.sheet().rule("Label").unwrap()["color"], json!("#002b36"));
}
