//! Configuration and registration errors.
//!
//! Every error in this crate is a configuration or programmer error, raised
//! as early as possible: at theme merge, plugin registration, or component
//! registration time. Resolution itself never fails — an absent rule, plugin
//! or attribute simply contributes no fragment.

use thiserror::Error;

/// Error raised while configuring themes, plugins or components.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StyleError {
    /// A theme `colors` entry was not a plain mapping.
    #[error("theme colors must be a plain mapping, got {found}")]
    InvalidThemeColors { found: String },

    /// A theme `fonts` entry was not a plain mapping.
    #[error("theme fonts must be a plain mapping, got {found}")]
    InvalidThemeFonts { found: String },

    /// A plugin definition was malformed.
    #[error("invalid plugin definition: {reason}")]
    InvalidPlugin { reason: String },

    /// A multi-property plugin definition matched no attributes.
    #[error("property plugin definition with no attribute names")]
    EmptyPropertySet,

    /// Two property plugins were registered for the same input attribute.
    #[error("duplicate property plugin for attribute \"{attr}\"")]
    DuplicatePropertyPlugin { attr: String },

    /// The same capability was declared both statically on the component
    /// type and in its style options.
    #[error(
        "{type_name} declares \"{capability}\" both statically and in style \
         options; choose one declaration style"
    )]
    DuplicateCapability {
        type_name: String,
        capability: String,
    },

    /// `default_styles` in style options was not a sequence of objects.
    #[error("default styles for {type_name} must be a sequence of style objects")]
    InvalidDefaultStyles { type_name: String },

    /// The reserved `style` group was configured in the routing table.
    #[error(
        "do not configure routes for the reserved \"style\" group on \
         {type_name}; use a props-to-style mapping or the inline override \
         instead"
    )]
    ReservedStyleGroup { type_name: String },
}
