//! The versioned client runtime module and its serialized payload.
//!
//! The runtime script is a static asset, not string-interpolated source: it
//! boots from one JSON payload embedded next to it in the document and
//! refuses to run against a payload from a different runtime version.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::FormConfig;
use crate::i18n;

/// Version stamped into both the payload and the rendered root element.
pub const RUNTIME_VERSION: &str = "1.0.0";

/// The compiled client driver, inlined into every document.
pub const RUNTIME_JS: &str = include_str!("../assets/runtime.js");

/// The only message the embedded form ever posts to its parent frame.
pub const RESIZE_MESSAGE_TYPE: &str = "form-resize";

/// Named backend interfaces the client script calls; implemented by the
/// embedding service, not by this crate.
pub const CREATE_BOOKING_ENDPOINT: &str = "/api/bookings";
pub const BEGIN_CHECKOUT_ENDPOINT: &str = "/api/checkout";

/// `{type: "form-resize", height}` as posted via `postMessage`.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct ResizeMessage {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub height: f64,
}

impl ResizeMessage {
    pub fn new(height: f64) -> ResizeMessage {
        ResizeMessage {
            kind: RESIZE_MESSAGE_TYPE,
            height,
        }
    }
}

#[derive(Serialize)]
struct Endpoints {
    create_booking: &'static str,
    begin_checkout: &'static str,
}

#[derive(Serialize)]
struct RuntimePayload<'a> {
    version: &'static str,
    config: &'a FormConfig,
    translations: BTreeMap<&'a str, BTreeMap<&'static str, &'static str>>,
    endpoints: Endpoints,
}

/// Serialize the payload the runtime boots from: the normalized configuration,
/// the UI string catalogs for the configured languages, and the endpoint
/// names. Safe for embedding in a `<script>` element.
pub fn build_payload(cfg: &FormConfig) -> Result<String, serde_json::Error> {
    let mut translations: BTreeMap<&str, BTreeMap<&'static str, &'static str>> = cfg
        .customizations
        .languages
        .iter()
        .map(|lang| (lang.as_str(), i18n::merged_catalog(lang)))
        .collect();
    // English is the fallback catalog; always ship it.
    translations
        .entry("en")
        .or_insert_with(|| i18n::merged_catalog("en"));

    let json = serde_json::to_string(&RuntimePayload {
        version: RUNTIME_VERSION,
        config: cfg,
        translations,
        endpoints: Endpoints {
            create_booking: CREATE_BOOKING_ENDPOINT,
            begin_checkout: BEGIN_CHECKOUT_ENDPOINT,
        },
    })?;
    // A literal "</script>" inside a string value would end the embedding
    // element early; escape the slash (still valid JSON).
    Ok(json.replace("</", "<\\/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;

    #[test]
    fn resize_message_shape() {
        let msg = serde_json::to_string(&ResizeMessage::new(420.0)).unwrap();
        assert_eq!(msg, r#"{"type":"form-resize","height":420.0}"#);
    }

    #[test]
    fn payload_round_trips_the_config() {
        let cfg = load_config(r#"{"customizations": {"languages": ["en", "de"]}}"#).unwrap();
        let payload = build_payload(&cfg).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(parsed["version"], RUNTIME_VERSION);
        assert_eq!(parsed["endpoints"]["create_booking"], CREATE_BOOKING_ENDPOINT);
        assert_eq!(parsed["translations"]["de"]["next"], "Weiter");

        let embedded: FormConfig = serde_json::from_value(parsed["config"].clone()).unwrap();
        assert_eq!(embedded, cfg);
    }

    #[test]
    fn payload_cannot_break_out_of_a_script_element() {
        let cfg = load_config(
            r#"{"customizations": {"title": "</script><script>alert(1)</script>"}}"#,
        )
        .unwrap();
        let payload = build_payload(&cfg).unwrap();
        assert!(!payload.contains("</script>"));
        // still valid JSON with the original value intact
        let parsed: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(
            parsed["config"]["customizations"]["title"],
            "</script><script>alert(1)</script>"
        );
    }

    #[test]
    fn runtime_asset_matches_version() {
        assert!(RUNTIME_JS.contains(RUNTIME_VERSION));
    }
}
