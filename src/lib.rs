//! formwiz compiles a declarative booking-form schema plus customization
//! options into a self-contained, embeddable booking wizard: markup, a
//! derived stylesheet, and a versioned client runtime with its configuration
//! payload, all in one document intended for an iframe.
//!
//! The same semantics are modeled in Rust by [`runtime::Session`], so step
//! guards, conditional visibility, and fare rules are testable without a
//! browser.
//!
//! ```
//! let html = formwiz::render_booking_form("{}", None).unwrap();
//! assert!(html.contains("fw-root"));
//! ```

pub mod config;
pub mod dom;
pub mod errors;
pub mod i18n;
pub mod log;
pub mod model;
pub mod render;
pub mod runtime;
pub mod script;

pub use config::{FormConfig, load_config};
pub use errors::{BackendError, CompileError, ConfigError, StepError, SubmitError};
pub use render::document::{
    CompileOptions, CompiledForm, compile, compile_with, padding_from_query,
};
pub use runtime::{Session, Step};
pub use script::RUNTIME_VERSION;

/// One call from a stored configuration record to a servable document.
///
/// `query` is the request query string of the public embed URL, consulted
/// only for the `padding` override.
pub fn render_booking_form(
    config_json: &str,
    query: Option<&str>,
) -> Result<String, miette::Report> {
    let cfg = config::load_config(config_json)?;
    let compiled = render::document::compile_with(
        &cfg,
        CompileOptions {
            padding: query.and_then(padding_from_query),
        },
    )?;
    Ok(compiled.into_document())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_a_document_from_an_empty_record() {
        let html = render_booking_form("{}", None).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("fw-root"));
        assert!(html.contains(RUNTIME_VERSION));
    }

    #[test]
    fn invalid_json_surfaces_a_config_error() {
        assert!(render_booking_form("{not json", None).is_err());
    }

    #[test]
    fn query_padding_is_applied() {
        let html = render_booking_form("{}", Some("?padding=2rem")).unwrap();
        assert!(html.contains("padding:2rem;"));
    }
}
