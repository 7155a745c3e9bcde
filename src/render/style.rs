//! Style compilation: layout settings + accent color → one stylesheet string.
//!
//! Pure function of the configuration; the same settings always produce the
//! same stylesheet. Colors use `light-dark()` so embedding pages get both
//! variants without a separate dark stylesheet.

use std::fmt::Write;

use crate::config::{ButtonPosition, ButtonSkin, ContainerStyle, LayoutSettings};
use crate::model::Color;

/// Compile the stylesheet for one form.
pub fn compile_stylesheet(layout: &LayoutSettings, accent: &Color) -> String {
    let mut css = String::with_capacity(4096);

    let _ = write!(
        css,
        ":root{{--fw-accent:{accent};--fw-accent-soft:{soft};--fw-radius:{radius}px;\
         --fw-bg:light-dark({light},{dark});--fw-text:light-dark(#1b1b1f,#ececf1);\
         --fw-muted:light-dark(#6b7280,#9ca3af);--fw-line:light-dark(#d9dce1,#3a3f4a);}}\n",
        accent = accent.as_str(),
        soft = accent.tint(0.12),
        radius = layout.corner_radius,
        light = layout.container_light.as_str(),
        dark = layout.container_dark.as_str(),
    );

    css.push_str(
        "html{color-scheme:light dark;}\n\
         html,body{margin:0;}\n\
         body{font-family:system-ui,-apple-system,'Segoe UI',sans-serif;color:var(--fw-text);}\n",
    );

    // Container
    css.push_str(
        ".fw-container{background:var(--fw-bg);border-radius:var(--fw-radius);padding:20px;",
    );
    match layout.container_style {
        ContainerStyle::Shadow => css.push_str("box-shadow:0 4px 18px rgba(0,0,0,0.12);}\n"),
        ContainerStyle::Flat => css.push_str("border:1px solid var(--fw-line);}\n"),
    }

    // Buttons: one skin applied to both primary and secondary actions
    css.push_str(
        ".fw-btn{font:inherit;cursor:pointer;padding:10px 22px;transition:background 0.15s;}\n\
         .fw-btn:disabled{opacity:0.55;cursor:default;}\n",
    );
    match layout.button_style {
        ButtonSkin::Filled => css.push_str(
            ".fw-btn{background:var(--fw-accent);color:#fff;border:none;border-radius:999px;}\n\
             .fw-btn-secondary{background:var(--fw-accent-soft);color:var(--fw-accent);}\n",
        ),
        ButtonSkin::Outline => css.push_str(
            ".fw-btn{background:transparent;color:var(--fw-accent);border:1px solid var(--fw-accent);border-radius:var(--fw-radius);}\n\
             .fw-btn-secondary{border-color:var(--fw-line);color:var(--fw-muted);}\n",
        ),
    }
    let justify = match layout.button_position {
        ButtonPosition::Left => "flex-start",
        ButtonPosition::Center => "center",
        ButtonPosition::Right => "flex-end",
    };
    let _ = write!(
        css,
        ".fw-nav{{display:flex;gap:10px;justify-content:{justify};margin-top:18px;}}\n"
    );

    // Progress indicator
    css.push_str(
        ".fw-progress{display:flex;gap:6px;list-style:none;margin:14px 0;padding:0;}\n\
         .fw-progress-step{flex:1;text-align:center;font-size:12px;color:var(--fw-muted);\
         border-top:3px solid var(--fw-line);padding-top:6px;}\n\
         .fw-progress-step.fw-active{color:var(--fw-accent);border-top-color:var(--fw-accent);}\n\
         .fw-progress-step.fw-done{border-top-color:var(--fw-accent);}\n",
    );

    // Fields
    css.push_str(
        ".fw-field{margin:12px 0;}\n\
         .fw-field label{display:block;font-size:13px;margin-bottom:4px;}\n\
         .fw-req{color:#d33;margin-left:2px;}\n\
         .fw-optional{color:var(--fw-muted);font-size:12px;}\n\
         .fw-control-row{display:flex;align-items:center;gap:6px;position:relative;}\n\
         .fw-control-row input,.fw-control-row select,.fw-control-row textarea,.fw-geocoder\
         {width:100%;box-sizing:border-box;font:inherit;color:inherit;background:transparent;\
         border:1px solid var(--fw-line);border-radius:var(--fw-radius);padding:9px 12px;}\n\
         .fw-control-row input:focus,.fw-control-row select:focus,.fw-control-row textarea:focus\
         {outline:2px solid var(--fw-accent-soft);border-color:var(--fw-accent);}\n\
         .fw-clear{border:none;background:none;color:var(--fw-muted);cursor:pointer;font-size:16px;}\n\
         .fw-geocoder{min-height:40px;}\n",
    );

    // Date/time popovers, collapsing to full width on narrow viewports
    css.push_str(
        ".fw-datetime{display:flex;gap:8px;position:relative;}\n\
         .fw-datetime button{flex:1;font:inherit;border:1px solid var(--fw-line);\
         border-radius:var(--fw-radius);background:transparent;color:inherit;padding:9px 12px;cursor:pointer;}\n\
         .fw-popover{position:absolute;top:calc(100% + 4px);left:0;z-index:10;min-width:240px;\
         background:var(--fw-bg);border:1px solid var(--fw-line);border-radius:var(--fw-radius);\
         box-shadow:0 6px 20px rgba(0,0,0,0.18);padding:10px;}\n\
         .fw-cal{display:grid;grid-template-columns:repeat(7,1fr);gap:2px;}\n\
         .fw-cal button,.fw-slots button{border:none;background:none;color:inherit;padding:6px;\
         border-radius:6px;cursor:pointer;}\n\
         .fw-cal button:hover,.fw-slots button:hover{background:var(--fw-accent-soft);}\n\
         .fw-cal button.fw-selected,.fw-slots button.fw-selected{background:var(--fw-accent);color:#fff;}\n\
         .fw-slots{max-height:200px;overflow-y:auto;display:grid;grid-template-columns:repeat(4,1fr);gap:2px;}\n\
         @media (max-width:480px){.fw-popover{position:fixed;left:8px;right:8px;top:auto;bottom:8px;min-width:0;}}\n",
    );

    // Booking type selector & language selector
    css.push_str(
        ".fw-type-selector{display:flex;flex-wrap:wrap;gap:6px;margin:10px 0;}\n\
         .fw-type-btn{font:inherit;border:1px solid var(--fw-line);background:transparent;color:inherit;\
         border-radius:999px;padding:7px 14px;cursor:pointer;}\n\
         .fw-type-btn.fw-selected{background:var(--fw-accent);border-color:var(--fw-accent);color:#fff;}\n\
         .fw-language{float:right;font:inherit;border:1px solid var(--fw-line);\
         border-radius:var(--fw-radius);padding:4px 8px;background:transparent;color:inherit;}\n",
    );

    // Vehicles, payments, extras, waypoints, summary
    css.push_str(
        ".fw-vehicles{display:grid;grid-template-columns:repeat(auto-fill,minmax(180px,1fr));gap:10px;}\n\
         .fw-vehicle-card{border:1px solid var(--fw-line);border-radius:var(--fw-radius);\
         padding:12px;cursor:pointer;}\n\
         .fw-vehicle-card.fw-selected{border-color:var(--fw-accent);background:var(--fw-accent-soft);}\n\
         .fw-vehicle-card h3{margin:0 0 4px;font-size:15px;}\n\
         .fw-vehicle-meta{color:var(--fw-muted);font-size:12px;}\n\
         .fw-payments{display:flex;gap:8px;flex-wrap:wrap;margin:10px 0;}\n\
         .fw-payment-btn{font:inherit;border:1px solid var(--fw-line);background:transparent;color:inherit;\
         border-radius:var(--fw-radius);padding:9px 16px;cursor:pointer;}\n\
         .fw-payment-btn.fw-selected{border-color:var(--fw-accent);background:var(--fw-accent-soft);}\n\
         .fw-extras{margin:12px 0;}\n\
         .fw-extra{display:flex;align-items:center;justify-content:space-between;gap:8px;padding:6px 0;}\n\
         .fw-stepper{display:flex;align-items:center;gap:8px;}\n\
         .fw-stepper button{border:1px solid var(--fw-line);background:transparent;color:inherit;\
         border-radius:6px;width:26px;height:26px;cursor:pointer;}\n\
         .fw-waypoints{margin:8px 0;}\n\
         .fw-waypoint-row{display:flex;align-items:center;gap:6px;margin:6px 0;}\n\
         .fw-summary-row{display:flex;justify-content:space-between;gap:10px;padding:7px 0;\
         border-bottom:1px solid var(--fw-line);}\n\
         .fw-summary-row .fw-edit{background:none;border:none;color:var(--fw-accent);cursor:pointer;font-size:12px;}\n\
         .fw-fare{display:flex;justify-content:space-between;font-weight:600;margin-top:14px;\
         padding:10px 12px;background:var(--fw-accent-soft);border-radius:var(--fw-radius);}\n\
         .fw-error{color:#c62828;font-size:13px;margin:8px 0;}\n\
         .fw-hourly-notes{color:var(--fw-muted);font-size:12px;margin:8px 0;}\n\
         .fw-hidden{display:none !important;}\n",
    );

    css
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;

    #[test]
    fn accent_and_tint_become_custom_properties() {
        let cfg = load_config(r##"{"customizations": {"accent_color": "#ff8800"}}"##).unwrap();
        let css = compile_stylesheet(&cfg.customizations.layout, &cfg.customizations.accent_color);
        assert!(css.contains("--fw-accent:#ff8800"));
        assert!(css.contains("--fw-accent-soft:rgba(255,136,0,0.12)"));
    }

    #[test]
    fn container_style_switches_shadow_and_flat() {
        let shadow = load_config("{}").unwrap();
        let css = compile_stylesheet(&shadow.customizations.layout, &shadow.customizations.accent_color);
        assert!(css.contains("box-shadow:0 4px 18px"));

        let flat = load_config(
            r#"{"customizations": {"layout_settings": {"container_style": "flat"}}}"#,
        )
        .unwrap();
        let css = compile_stylesheet(&flat.customizations.layout, &flat.customizations.accent_color);
        assert!(css.contains(".fw-container{background:var(--fw-bg);border-radius:var(--fw-radius);padding:20px;border:1px solid"));
    }

    #[test]
    fn button_skins_differ() {
        let filled = load_config("{}").unwrap();
        let css = compile_stylesheet(&filled.customizations.layout, &filled.customizations.accent_color);
        assert!(css.contains("border-radius:999px"));

        let outline = load_config(
            r#"{"customizations": {"layout_settings": {"button_style": "outline"}}}"#,
        )
        .unwrap();
        let css = compile_stylesheet(&outline.customizations.layout, &outline.customizations.accent_color);
        assert!(css.contains(".fw-btn{background:transparent;color:var(--fw-accent);border:1px solid var(--fw-accent)"));
    }

    #[test]
    fn light_dark_container_backgrounds() {
        let cfg = load_config(
            r##"{"customizations": {"layout_settings": {
                "container_light": "#fafafa", "container_dark": "#101418"
            }}}"##,
        )
        .unwrap();
        let css = compile_stylesheet(&cfg.customizations.layout, &cfg.customizations.accent_color);
        assert!(css.contains("light-dark(#fafafa,#101418)"));
    }

    #[test]
    fn deterministic_output() {
        let cfg = load_config("{}").unwrap();
        let a = compile_stylesheet(&cfg.customizations.layout, &cfg.customizations.accent_color);
        let b = compile_stylesheet(&cfg.customizations.layout, &cfg.customizations.accent_color);
        assert_eq!(a, b);
    }

    #[test]
    fn popovers_collapse_on_narrow_viewports() {
        let cfg = load_config("{}").unwrap();
        let css = compile_stylesheet(&cfg.customizations.layout, &cfg.customizations.accent_color);
        assert!(css.contains("@media (max-width:480px){.fw-popover{position:fixed"));
    }
}
