//! Qualified rule-name derivation.
//!
//! Compiled rules are looked up by qualified names built from a namespace
//! prefix, a class name, an optional child group name and an optional state
//! key. Four variants exist:
//!
//! - base class name: `ns.Type`
//! - state class name: `ns.Type:state`
//! - child class name: `ns.Type.Child` (child segment capitalized)
//! - child-state class name: `ns.Type.Child:state`
//!
//! Contexts are derived per style group per pass and never persisted.

/// Lookup context for one style group of one component type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceContext {
    /// The component type name, e.g. `Label`.
    pub type_name: String,
    /// The class name used in rule names; defaults to the type name.
    pub class_name: String,
    /// The child group segment for non-root groups, already capitalized.
    pub child: Option<String>,
    /// Optional namespace prefix, e.g. `com.example.text`.
    pub namespace: Option<String>,
}

impl NamespaceContext {
    /// Builds the context for one style group.
    ///
    /// `child` is the group key for non-root groups (`None` for the root
    /// `style` group); its first letter is upper-cased for the rule name.
    pub fn new(
        type_name: &str,
        class_name: Option<&str>,
        namespace: Option<&str>,
        child: Option<&str>,
    ) -> Self {
        Self {
            type_name: type_name.to_string(),
            class_name: class_name.unwrap_or(type_name).to_string(),
            child: child.map(capitalize),
            namespace: namespace
                .filter(|ns| !ns.is_empty())
                .map(|ns| ns.to_string()),
        }
    }

    /// The qualified class name for this group.
    ///
    /// `ns.Type` for the root group, `ns.Type.Child` for child groups.
    pub fn class_name(&self) -> String {
        let mut name = match &self.namespace {
            Some(ns) => format!("{}.{}", ns, self.class_name),
            None => self.class_name.clone(),
        };
        if let Some(child) = &self.child {
            name.push('.');
            name.push_str(child);
        }
        name
    }

    /// The qualified state class name: the class name plus `:state`.
    pub fn state_class_name(&self, state: &str) -> String {
        format!("{}:{}", self.class_name(), state)
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
