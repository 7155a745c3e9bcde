//! Field rendering: one [`FormField`] → a markup fragment plus the wiring the
//! runtime needs (a stable element id, a `name` equal to the field key, and
//! data attributes for conditional logic and waypoint insertion).
//!
//! Widget selection is total over [`FieldControl`]; nothing here re-derives
//! behavior from key text.

use enum_dispatch::enum_dispatch;

use crate::config::FormConfig;
use crate::dom::{Element, el};
use crate::i18n::Translator;
use crate::model::{AddressRole, FieldControl, FormField, SectionKey};

/// Context shared by every widget while one section renders.
pub struct FieldContext<'a> {
    pub cfg: &'a FormConfig,
    pub section: SectionKey,
    pub tr: Translator<'a>,
}

impl FieldContext<'_> {
    /// Deterministic element id: section + field id.
    pub fn element_id(&self, field: &FormField) -> String {
        format!("fw-{}-{}", self.section.key(), field.id)
    }
}

#[enum_dispatch]
trait Widget {
    /// Render the interactive control itself, without the label chrome.
    fn control(&self, field: &FormField, ctx: &FieldContext<'_>) -> Element;
}

#[enum_dispatch(Widget)]
enum WidgetKind {
    TextInput,
    NumberInput,
    TextAreaInput,
    SelectInput,
    DateTimeInput,
    CheckboxInput,
    RadioGroupInput,
    VehicleSelectInput,
    AddressInput,
}

fn widget_for(control: FieldControl) -> WidgetKind {
    match control {
        FieldControl::Text => TextInput.into(),
        FieldControl::Number => NumberInput.into(),
        FieldControl::TextArea => TextAreaInput.into(),
        FieldControl::Select => SelectInput.into(),
        FieldControl::DateTime => DateTimeInput.into(),
        FieldControl::Checkbox => CheckboxInput.into(),
        FieldControl::RadioGroup => RadioGroupInput.into(),
        FieldControl::VehicleSelect => VehicleSelectInput.into(),
        FieldControl::Address(role) => AddressInput { role }.into(),
    }
}

/// Whether the control gets an inline clear button (shown by the runtime
/// while the value is non-empty).
fn clearable(control: FieldControl) -> bool {
    matches!(
        control,
        FieldControl::Text | FieldControl::Number | FieldControl::TextArea
    )
}

/// Render a complete field: wrapper, label, control, clear button, and the
/// "add waypoint" affordance when this field is the configured anchor.
pub fn render_field(field: &FormField, ctx: &FieldContext<'_>) -> Element {
    let element_id = ctx.element_id(field);

    let mut wrapper = el("div")
        .class("fw-field")
        .attr("data-field-id", &field.id);
    if !field.key.is_empty() {
        wrapper = wrapper.attr("data-key", &field.key);
    }
    if field.required {
        wrapper = wrapper.attr("data-required", "1");
    }
    if let Some(rule) = &field.conditional {
        // Hidden until the runtime's first evaluation pass; all values start
        // empty, so a non-empty expected value means hidden on load.
        wrapper = wrapper
            .attr("data-when-field", &rule.field_key)
            .attr("data-when-value", &rule.value);
        if !rule.value.is_empty() {
            wrapper = wrapper.class("fw-hidden");
        }
    }

    let mut label = el("label").attr("for", &element_id).text(&field.label);
    if field.required {
        label = label.child(el("span").class("fw-req").text("*"));
    } else {
        label = label.child(
            el("span")
                .class("fw-optional")
                .text(format!(" ({})", ctx.tr.tr("optional"))),
        );
    }
    wrapper = wrapper.child(label);

    let mut row = el("div")
        .class("fw-control-row")
        .child(widget_for(field.control).control(field, ctx));
    if clearable(field.control) {
        row = row.child(
            el("button")
                .attr("type", "button")
                .class("fw-clear fw-hidden")
                .attr("data-clear-for", &element_id)
                .text("×"),
        );
    }

    let anchors_waypoints = is_waypoint_anchor(field, ctx);
    if anchors_waypoints && !field.is_address() {
        // Non-address anchors carry the affordance in their trailing icon area.
        row = row.child(waypoint_button(ctx));
    }
    wrapper = wrapper.child(row);
    if anchors_waypoints && field.is_address() {
        wrapper = wrapper.child(waypoint_button(ctx));
    }

    wrapper
}

/// The configured `display_after_field` gets the inline "add waypoint"
/// affordance, but only when waypoints apply to the active booking type.
fn is_waypoint_anchor(field: &FormField, ctx: &FieldContext<'_>) -> bool {
    let SectionKey::Booking(bt) = ctx.section else {
        return false;
    };
    ctx.cfg.waypoints_supported(bt)
        && !field.key.is_empty()
        && field.key == ctx.cfg.customizations.waypoints.display_after_field
}

fn waypoint_button(ctx: &FieldContext<'_>) -> Element {
    el("button")
        .attr("type", "button")
        .class("fw-add-waypoint")
        .attr("data-section", ctx.section.key())
        .text(format!("+ {}", ctx.tr.tr("add_waypoint")))
}

fn placeholder(field: &FormField, ctx: &FieldContext<'_>) -> String {
    ctx.tr
        .placeholder_for(&field.key, &field.label, field.placeholder.as_deref())
}

// ============================================================================
// Widgets
// ============================================================================

struct TextInput;

impl Widget for TextInput {
    fn control(&self, field: &FormField, ctx: &FieldContext<'_>) -> Element {
        el("input")
            .id(ctx.element_id(field))
            .attr("type", "text")
            .attr("name", &field.key)
            .attr("placeholder", placeholder(field, ctx))
    }
}

struct NumberInput;

impl Widget for NumberInput {
    fn control(&self, field: &FormField, ctx: &FieldContext<'_>) -> Element {
        el("input")
            .id(ctx.element_id(field))
            .attr("type", "number")
            .attr("name", &field.key)
            .attr("min", "0")
            .attr("placeholder", placeholder(field, ctx))
    }
}

struct TextAreaInput;

impl Widget for TextAreaInput {
    fn control(&self, field: &FormField, ctx: &FieldContext<'_>) -> Element {
        el("textarea")
            .id(ctx.element_id(field))
            .attr("name", &field.key)
            .attr("rows", "3")
            .attr("placeholder", placeholder(field, ctx))
    }
}

struct SelectInput;

impl Widget for SelectInput {
    fn control(&self, field: &FormField, ctx: &FieldContext<'_>) -> Element {
        let mut select = el("select")
            .id(ctx.element_id(field))
            .attr("name", &field.key)
            .child(el("option").attr("value", "").text(ctx.tr.tr("select_option")));
        for option in &field.options {
            select = select.child(
                el("option")
                    .attr("value", option)
                    .text(ctx.tr.tr(option)),
            );
        }
        select
    }
}

/// Composite date/time control: a hidden `YYYY-MM-DDTHH:mm` value behind a
/// date button and a time button, each opening a popover the runtime fills
/// (calendar grid, 30-minute slots).
struct DateTimeInput;

impl Widget for DateTimeInput {
    fn control(&self, field: &FormField, ctx: &FieldContext<'_>) -> Element {
        let element_id = ctx.element_id(field);
        el("div")
            .class("fw-datetime")
            .attr("data-input", &element_id)
            .child(
                el("input")
                    .id(&element_id)
                    .attr("type", "hidden")
                    .attr("name", &field.key),
            )
            .child(
                el("button")
                    .attr("type", "button")
                    .class("fw-date-btn")
                    .attr("data-popover", "date")
                    .text(ctx.tr.tr("date")),
            )
            .child(
                el("button")
                    .attr("type", "button")
                    .class("fw-time-btn")
                    .attr("data-popover", "time")
                    .text(ctx.tr.tr("time")),
            )
            .child(el("div").class("fw-popover fw-date-popover fw-hidden"))
            .child(el("div").class("fw-popover fw-time-popover fw-hidden"))
    }
}

struct CheckboxInput;

impl Widget for CheckboxInput {
    fn control(&self, field: &FormField, ctx: &FieldContext<'_>) -> Element {
        el("input")
            .id(ctx.element_id(field))
            .attr("type", "checkbox")
            .attr("name", &field.key)
            .attr("value", "true")
    }
}

struct RadioGroupInput;

impl Widget for RadioGroupInput {
    fn control(&self, field: &FormField, ctx: &FieldContext<'_>) -> Element {
        let mut group = el("div")
            .class("fw-radio-group")
            .id(ctx.element_id(field));
        for option in &field.options {
            group = group.child(
                el("label").class("fw-radio").child(
                    el("input")
                        .attr("type", "radio")
                        .attr("name", &field.key)
                        .attr("value", option),
                )
                .child(el("span").text(ctx.tr.tr(option))),
            );
        }
        group
    }
}

/// A select over the vehicle snapshot. Step 2's cards stay the canonical
/// vehicle selector; this exists for schemas that ask for an inline one.
struct VehicleSelectInput;

impl Widget for VehicleSelectInput {
    fn control(&self, field: &FormField, ctx: &FieldContext<'_>) -> Element {
        let mut select = el("select")
            .id(ctx.element_id(field))
            .attr("name", &field.key)
            .child(el("option").attr("value", "").text(ctx.tr.tr("select_option")));
        for vehicle in &ctx.cfg.vehicles {
            let label = if vehicle.model.is_empty() {
                vehicle.name.clone()
            } else {
                format!("{} ({})", vehicle.name, vehicle.model)
            };
            select = select.child(el("option").attr("value", &vehicle.id).text(label));
        }
        select
    }
}

/// Address fields never render a plain text box: a placeholder container
/// hosts the external geocoding widget, and a hidden input carries the value
/// the runtime writes on geocoder result/clear events.
struct AddressInput {
    role: AddressRole,
}

impl Widget for AddressInput {
    fn control(&self, field: &FormField, ctx: &FieldContext<'_>) -> Element {
        let element_id = ctx.element_id(field);
        let role = match self.role {
            AddressRole::Pickup => "pickup",
            AddressRole::Dropoff => "dropoff",
            AddressRole::Waypoint => "waypoint",
        };
        el("div")
            .class("fw-geocoder")
            .attr("data-geocoder-for", &element_id)
            .attr("data-address-role", role)
            .attr("data-placeholder", placeholder(field, ctx))
            .child(
                el("input")
                    .id(&element_id)
                    .attr("type", "hidden")
                    .attr("name", &field.key)
                    .attr("data-address-role", role),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;
    use crate::model::BookingType;

    fn ctx(cfg: &FormConfig) -> FieldContext<'_> {
        FieldContext {
            cfg,
            section: SectionKey::Booking(BookingType::Distance),
            tr: Translator::new("en"),
        }
    }

    fn field_by_key<'a>(cfg: &'a FormConfig, key: &str) -> &'a FormField {
        cfg.structure
            .field(SectionKey::Booking(BookingType::Distance), key)
            .unwrap()
    }

    #[test]
    fn address_fields_render_geocoder_and_hidden_input() {
        let cfg = load_config("{}").unwrap();
        let html = render_field(field_by_key(&cfg, "pickup_location"), &ctx(&cfg)).to_html();
        assert!(html.contains("fw-geocoder"));
        assert!(html.contains(r#"type="hidden""#));
        assert!(html.contains(r#"name="pickup_location""#));
        assert!(!html.contains(r#"type="text""#));
    }

    #[test]
    fn datetime_renders_composite_control() {
        let cfg = load_config("{}").unwrap();
        let html = render_field(field_by_key(&cfg, "pickup_date"), &ctx(&cfg)).to_html();
        assert!(html.contains("fw-date-btn"));
        assert!(html.contains("fw-time-btn"));
        assert!(html.contains("fw-date-popover"));
        assert!(html.contains(r#"type="hidden""#));
    }

    #[test]
    fn dropdown_gets_empty_first_option() {
        let cfg = load_config(
            r#"{"fields": {"distance": [
                {"key": "luggage", "type": "dropdown", "options": ["Small", "Large"]}
            ]}}"#,
        )
        .unwrap();
        let html = render_field(field_by_key(&cfg, "luggage"), &ctx(&cfg)).to_html();
        assert!(html.contains(r#"<option value="">Select an option</option>"#));
        assert!(html.contains(r#"<option value="Small">Small</option>"#));
    }

    #[test]
    fn required_marker_and_optional_suffix() {
        let cfg = load_config(
            r#"{"fields": {"distance": [
                {"key": "pickup_location", "required": true},
                {"key": "note", "type": "long-text"}
            ]}}"#,
        )
        .unwrap();
        let required = render_field(field_by_key(&cfg, "pickup_location"), &ctx(&cfg)).to_html();
        assert!(required.contains("fw-req"));
        let optional = render_field(field_by_key(&cfg, "note"), &ctx(&cfg)).to_html();
        assert!(optional.contains("(Optional)"));
    }

    #[test]
    fn conditional_fields_carry_data_attributes_and_start_hidden() {
        let cfg = load_config(
            r#"{"fields": {"distance": [
                {"key": "kind", "type": "dropdown", "options": ["a", "b"]},
                {"key": "extra", "conditional_logic": {"field_key": "kind", "value": "a"}}
            ]}}"#,
        )
        .unwrap();
        let html = render_field(field_by_key(&cfg, "extra"), &ctx(&cfg)).to_html();
        assert!(html.contains(r#"data-when-field="kind""#));
        assert!(html.contains(r#"data-when-value="a""#));
        assert!(html.contains("fw-hidden"));
    }

    #[test]
    fn waypoint_affordance_follows_anchor_field() {
        let cfg = load_config("{}").unwrap();
        // default anchor is pickup_location, an address field
        let html = render_field(field_by_key(&cfg, "pickup_location"), &ctx(&cfg)).to_html();
        assert!(html.contains("fw-add-waypoint"));
        // not on other fields
        let other = render_field(field_by_key(&cfg, "dropoff_location"), &ctx(&cfg)).to_html();
        assert!(!other.contains("fw-add-waypoint"));
    }

    #[test]
    fn clear_button_only_on_text_like_controls() {
        let cfg = load_config(
            r#"{"fields": {"distance": [
                {"key": "note", "type": "long-text"},
                {"key": "kind", "type": "dropdown", "options": ["a"]}
            ]}}"#,
        )
        .unwrap();
        assert!(render_field(field_by_key(&cfg, "note"), &ctx(&cfg))
            .to_html()
            .contains("fw-clear"));
        assert!(!render_field(field_by_key(&cfg, "kind"), &ctx(&cfg))
            .to_html()
            .contains("fw-clear"));
    }
}
