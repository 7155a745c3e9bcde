//! Error types for configuration loading, compilation, and the runtime model.
//!
//! The taxonomy mirrors how errors surface in the embedded form: configuration
//! load failures are fatal (full-page error state), step validation and
//! submission failures are recoverable values the caller shows inline.

use miette::Diagnostic;
use thiserror::Error;

// ============================================================================
// Configuration Errors
// ============================================================================

/// Errors raised while loading and normalizing a form configuration.
///
/// These are not recoverable without a corrected configuration; callers render
/// a full-page error state instead of a form.
#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("configuration is not valid JSON")]
    #[diagnostic(code(formwiz::config::parse))]
    Parse(#[from] serde_json::Error),

    #[error("invalid accent color: {value:?}")]
    #[diagnostic(
        code(formwiz::config::invalid_color),
        help("accent colors must be #rgb or #rrggbb hex values")
    )]
    InvalidColor { value: String },

    #[error("duplicate field key {key:?} in section {section:?}")]
    #[diagnostic(code(formwiz::config::duplicate_key))]
    DuplicateFieldKey { section: String, key: String },

    #[error("field {field:?} in section {section:?} declares conditional logic on itself")]
    #[diagnostic(code(formwiz::config::self_conditional))]
    SelfConditional { section: String, field: String },

    #[error("conditional logic on {field:?} references unknown field {target:?} in section {section:?}")]
    #[diagnostic(code(formwiz::config::unknown_conditional_target))]
    UnknownConditionalTarget {
        section: String,
        field: String,
        target: String,
    },

    #[error("conditional logic on {field:?} targets {target:?}, which has no discrete values")]
    #[diagnostic(
        code(formwiz::config::conditional_target_not_discrete),
        help("a controlling field needs options or a boolean-like value")
    )]
    ConditionalTargetNotDiscrete {
        section: String,
        field: String,
        target: String,
    },

    #[error("no booking types are enabled")]
    #[diagnostic(
        code(formwiz::config::no_booking_types),
        help("at least one booking type must stay enabled")
    )]
    NoBookingTypes,
}

// ============================================================================
// Compile Errors
// ============================================================================

/// Errors raised while assembling the final document.
#[derive(Error, Diagnostic, Debug)]
pub enum CompileError {
    #[error("failed to serialize the runtime payload")]
    #[diagnostic(code(formwiz::compile::payload))]
    Payload(#[from] serde_json::Error),
}

// ============================================================================
// Runtime Errors
// ============================================================================

/// A step transition was blocked by validation.
///
/// Recoverable: the session stays on the current step and the caller surfaces
/// the message inline.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum StepError {
    #[error("required fields are missing: {}", fields.join(", "))]
    #[diagnostic(code(formwiz::runtime::missing_required))]
    MissingRequired { fields: Vec<String> },

    #[error("no vehicle selected")]
    #[diagnostic(code(formwiz::runtime::no_vehicle))]
    NoVehicleSelected,
}

/// A failure reported by the external booking backend or checkout provider.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
#[diagnostic(code(formwiz::runtime::backend))]
pub struct BackendError {
    pub message: String,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> BackendError {
        BackendError {
            message: message.into(),
        }
    }
}

/// Errors from the final submission path.
///
/// All variants leave entered data intact and reset the submit affordance so
/// the user can retry with an explicit action.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("a submission is already in progress")]
    #[diagnostic(code(formwiz::runtime::submit_in_progress))]
    InProgress,

    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] StepError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Backend(#[from] BackendError),
}
