//! Final document assembly.
//!
//! The compiled output is one self-contained HTML document: inlined
//! stylesheet, inlined JSON payload, inlined runtime script. It is served the
//! same way to the builder preview and to the public embed; the only
//! per-request variation is the optional `padding` query parameter.

use std::sync::LazyLock;

use regex_lite::Regex;

use crate::config::FormConfig;
use crate::dom::{Node, el};
use crate::errors::CompileError;
use crate::render::{assemble, style};
use crate::script;

/// Outer padding when the query string does not override it.
const DEFAULT_PADDING: &str = "16px";

/// Accepted padding overrides: bare `0` or a number with a CSS length unit.
static PADDING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:0|\d+(?:\.\d+)?(?:px|em|rem|%|vw|vh))$").expect("static pattern")
});

/// Per-request compile options.
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// Already-validated padding override; use [`padding_from_query`] to
    /// derive it from a request query string.
    pub padding: Option<String>,
}

/// The compiled form, as separate parts and as one embeddable document.
#[derive(Debug, Clone)]
pub struct CompiledForm {
    pub body: String,
    pub stylesheet: String,
    pub payload: String,
    language: String,
    title: String,
    padding: String,
}

/// Compile a normalized configuration with default options.
pub fn compile(cfg: &FormConfig) -> Result<CompiledForm, CompileError> {
    compile_with(cfg, CompileOptions::default())
}

/// Compile a normalized configuration.
pub fn compile_with(
    cfg: &FormConfig,
    options: CompileOptions,
) -> Result<CompiledForm, CompileError> {
    let body = assemble(cfg).to_html();
    let stylesheet = style::compile_stylesheet(
        &cfg.customizations.layout,
        &cfg.customizations.accent_color,
    );
    let payload = script::build_payload(cfg)?;
    Ok(CompiledForm {
        body,
        stylesheet,
        payload,
        language: cfg.customizations.default_language.clone(),
        title: cfg.customizations.title.clone(),
        padding: options
            .padding
            .unwrap_or_else(|| DEFAULT_PADDING.to_string()),
    })
}

impl CompiledForm {
    /// Assemble the complete document for serving inside an iframe.
    pub fn into_document(self) -> String {
        let head = el("head")
            .child(el("meta").attr("charset", "utf-8"))
            .child(
                el("meta")
                    .attr("name", "viewport")
                    .attr("content", "width=device-width, initial-scale=1"),
            )
            .child(el("title").text(&self.title))
            .child(el("style").child(Node::Raw(self.stylesheet)));

        let body = el("body")
            .attr("style", format!("padding:{};", self.padding))
            .child(Node::Raw(self.body))
            .child(
                el("script")
                    .id("fw-config")
                    .attr("type", "application/json")
                    .child(Node::Raw(self.payload)),
            )
            .child(el("script").child(Node::Raw(script::RUNTIME_JS.to_string())));

        let html = el("html")
            .attr("lang", &self.language)
            .child(head)
            .child(body);

        format!("<!DOCTYPE html>{}", html.to_html())
    }
}

/// Validate a raw padding override. Anything that is not a plain number with
/// a CSS length unit (or bare `0`) is rejected.
pub fn padding_override(value: &str) -> Option<String> {
    let trimmed = value.trim();
    PADDING_RE.is_match(trimmed).then(|| trimmed.to_string())
}

/// Extract and validate the `padding` parameter from a query string
/// (with or without the leading `?`).
pub fn padding_from_query(query: &str) -> Option<String> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "padding")
        .and_then(|(_, value)| padding_override(&percent_decode(value)))
}

fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            if let (Some(hi), Some(lo)) = (
                bytes.get(i + 1).and_then(|b| (*b as char).to_digit(16)),
                bytes.get(i + 2).and_then(|b| (*b as char).to_digit(16)),
            ) {
                out.push((hi * 16 + lo) as u8);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
