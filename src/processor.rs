//! Pre/post value rewriting.
//!
//! A [`Processor`] is a stateless table from attribute name to rewrite
//! function, keyed separately for declaration-context uses (rule bodies at
//! compile time) and component-attribute-context uses (input props during
//! resolution). Rewriters can replace a value in place or rename the
//! attribute; nested object values are processed recursively. With no
//! rewriters registered, processing is a no-op.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::fragment::{Fragment, StyleValue};

/// Scope a rewrite applies in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Rule declarations, rewritten once at compile time.
    Declaration,
    /// Component input attributes, rewritten during resolution.
    Props,
}

/// Arguments handed to a rewrite function.
#[derive(Debug, Clone, Copy)]
pub struct RewriteArgs<'a> {
    /// The attribute name being visited.
    pub name: &'a str,
    /// The current value.
    pub value: &'a StyleValue,
    /// The registry color palette.
    pub colors: &'a Fragment,
    /// The registry size scale.
    pub sizes: &'a BTreeMap<String, f64>,
}

/// The write-back result of a rewrite: a new value, optionally under a new
/// attribute name.
#[derive(Debug, Clone, PartialEq)]
pub struct Rewritten {
    /// Replacement attribute name; `None` keeps the visited name.
    pub name: Option<String>,
    /// Replacement value.
    pub value: StyleValue,
}

impl Rewritten {
    /// Replaces the value, keeping the attribute name.
    pub fn value(value: StyleValue) -> Self {
        Self { name: None, value }
    }

    /// Replaces the value and renames the attribute.
    pub fn renamed(name: &str, value: StyleValue) -> Self {
        Self {
            name: Some(name.to_string()),
            value,
        }
    }
}

/// A rewrite function; returning `None` leaves the attribute untouched.
pub type RewriteFn = Arc<dyn Fn(RewriteArgs<'_>) -> Option<Rewritten> + Send + Sync>;

/// One configured rewriter, bound to a declaration-context attribute name,
/// a props-context attribute name, or both.
#[derive(Clone)]
pub struct Rewrite {
    /// Attribute name matched in rule declarations.
    pub style_name: Option<String>,
    /// Attribute name matched on component props.
    pub prop_name: Option<String>,
    /// The rewrite function.
    pub func: RewriteFn,
}

impl Rewrite {
    /// Rewriter for a declaration-context attribute.
    pub fn for_style(name: &str, func: RewriteFn) -> Self {
        Self {
            style_name: Some(name.to_string()),
            prop_name: None,
            func,
        }
    }

    /// Rewriter for a component-attribute-context attribute.
    pub fn for_prop(name: &str, func: RewriteFn) -> Self {
        Self {
            style_name: None,
            prop_name: Some(name.to_string()),
            func,
        }
    }
}

impl fmt::Debug for Rewrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rewrite")
            .field("style_name", &self.style_name)
            .field("prop_name", &self.prop_name)
            .finish_non_exhaustive()
    }
}

/// Rewriter table, collated once from configuration.
#[derive(Debug, Clone, Default)]
pub struct Processor {
    styles: BTreeMap<String, RewriteEntry>,
    props: BTreeMap<String, RewriteEntry>,
}

#[derive(Clone)]
struct RewriteEntry {
    func: RewriteFn,
}

impl fmt::Debug for RewriteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RewriteEntry(..)")
    }
}

impl Processor {
    /// Builds the lookup tables from configured rewrites.
    pub fn collate(rewrites: &[Rewrite]) -> Self {
        let mut processor = Processor::default();
        for rewrite in rewrites {
            if let Some(name) = &rewrite.style_name {
                processor.styles.insert(
                    name.clone(),
                    RewriteEntry {
                        func: rewrite.func.clone(),
                    },
                );
            }
            if let Some(name) = &rewrite.prop_name {
                processor.props.insert(
                    name.clone(),
                    RewriteEntry {
                        func: rewrite.func.clone(),
                    },
                );
            }
        }
        processor
    }

    /// True if no rewriters are registered for the scope.
    pub fn is_empty(&self, scope: Scope) -> bool {
        match scope {
            Scope::Declaration => self.styles.is_empty(),
            Scope::Props => self.props.is_empty(),
        }
    }

    fn get(&self, name: &str, scope: Scope) -> Option<&RewriteEntry> {
        match scope {
            Scope::Declaration => self.styles.get(name),
            Scope::Props => self.props.get(name),
        }
    }

    /// Rewrites a single attribute value, if a rewriter is registered.
    pub fn rewrite_value(
        &self,
        name: &str,
        value: &StyleValue,
        scope: Scope,
        colors: &Fragment,
        sizes: &BTreeMap<String, f64>,
    ) -> Option<Rewritten> {
        let entry = self.get(name, scope)?;
        (entry.func)(RewriteArgs {
            name,
            value,
            colors,
            sizes,
        })
    }

    /// Walks a style object, applying registered rewriters and recursing
    /// into nested object values.
    pub fn process(
        &self,
        target: &mut Fragment,
        scope: Scope,
        colors: &Fragment,
        sizes: &BTreeMap<String, f64>,
    ) {
        if self.is_empty(scope) {
            return;
        }

        let names: Vec<String> = target.keys().cloned().collect();
        for name in names {
            let mut current = name.clone();
            if let Some(value) = target.get(&name) {
                if let Some(rewritten) = self.rewrite_value(&name, value, scope, colors, sizes) {
                    if let Some(new_name) = rewritten.name {
                        target.remove(&name);
                        current = new_name;
                    }
                    target.insert(current.clone(), rewritten.value);
                }
            }
            // Structured values such as font specs are rewritten in depth.
            if let Some(StyleValue::Object(nested)) = target.get_mut(&current) {
                self.process(nested, scope, colors, sizes);
            }
        }
    }
}
