//! Configuration loading and normalization.
//!
//! The persistence layer hands us a partial record; everything downstream
//! consumes a fully-populated [`FormConfig`]. Normalization happens in exactly
//! one place: [`load_config`] / [`normalize`] merge the loaded values over
//! defaults (loaded always wins), derive each field's render control, and
//! validate the invariants that would otherwise surface as broken markup.
//!
//! No other module reads defaults. If a consumer needs a value, it takes the
//! normalized config as a parameter.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::log::{debug, warn};
use crate::model::{
    AddressRole, BookingType, Color, ConditionalRule, EnabledTypes, ExtraOption, FieldControl,
    FieldType, FlatRateRoute, FormField, FormStructure, Money, PaymentCategory, Pricing, Vehicle,
};

/// The flat-rate section's injected route dropdown claims this key; a schema
/// field using it would collide with the injected control.
pub const ROUTE_FIELD_KEY: &str = "route";

// ============================================================================
// Raw (partial) configuration
// ============================================================================

/// The configuration record as loaded: every part optional.
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct RawConfig {
    pub fields: Option<BTreeMap<String, Vec<RawField>>>,
    pub customizations: Option<RawCustomizations>,
    pub pricing: Option<RawPricing>,
    pub routes: Option<Vec<RawRoute>>,
    pub vehicles: Option<Vec<RawVehicle>>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(default)]
pub struct RawField {
    pub id: Option<String>,
    pub key: Option<String>,
    #[serde(rename = "type")]
    pub field_type: Option<FieldType>,
    pub label: Option<String>,
    pub placeholder: Option<String>,
    pub options: Option<Vec<String>>,
    pub required: Option<bool>,
    #[serde(alias = "conditionalLogic")]
    pub conditional_logic: Option<RawConditional>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(default)]
pub struct RawConditional {
    #[serde(alias = "fieldKey")]
    pub field_key: Option<String>,
    pub value: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct RawCustomizations {
    pub title: Option<String>,
    pub logo: Option<String>,
    pub languages: Option<Vec<String>>,
    #[serde(alias = "defaultLanguage")]
    pub default_language: Option<String>,
    #[serde(alias = "paymentIcons")]
    pub payment_icons: Option<Vec<String>>,
    #[serde(alias = "accentColor")]
    pub accent_color: Option<String>,
    #[serde(alias = "enabledBookingTypes")]
    pub enabled_booking_types: Option<Vec<String>>,
    #[serde(alias = "hourlyNotes")]
    pub hourly_notes: Option<Vec<String>>,
    #[serde(alias = "extraOptions")]
    pub extra_options: Option<Vec<RawExtra>>,
    #[serde(alias = "layoutSettings")]
    pub layout_settings: Option<RawLayout>,
    #[serde(alias = "componentsVisibility")]
    pub components_visibility: Option<RawVisibility>,
    #[serde(alias = "waypointButtonConfig")]
    pub waypoint_button_config: Option<RawWaypointConfig>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(default)]
pub struct RawExtra {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub enabled: Option<bool>,
    pub min: Option<u32>,
    pub max: Option<u32>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct RawLayout {
    #[serde(alias = "containerStyle")]
    pub container_style: Option<ContainerStyle>,
    #[serde(alias = "cornerRadius")]
    pub corner_radius: Option<u32>,
    #[serde(alias = "containerLight")]
    pub container_light: Option<String>,
    #[serde(alias = "containerDark")]
    pub container_dark: Option<String>,
    #[serde(alias = "buttonStyle")]
    pub button_style: Option<ButtonSkin>,
    #[serde(alias = "buttonPosition")]
    pub button_position: Option<ButtonPosition>,
    #[serde(alias = "showProgressBar")]
    pub show_progress_bar: Option<bool>,
    #[serde(alias = "showStepTitles")]
    pub show_step_titles: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct RawVisibility {
    #[serde(alias = "bookingTypeSelector")]
    pub booking_type_selector: Option<bool>,
    #[serde(alias = "languageSelector")]
    pub language_selector: Option<bool>,
    pub title: Option<bool>,
    pub logo: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct RawWaypointConfig {
    pub enabled: Option<bool>,
    #[serde(alias = "enabledForTypes")]
    pub enabled_for_types: Option<Vec<String>>,
    #[serde(alias = "displayAfterField")]
    pub display_after_field: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct RawPricing {
    #[serde(alias = "baseFare")]
    pub base_fare: Option<f64>,
    #[serde(alias = "cost_per_km", alias = "costPerKm")]
    pub per_km: Option<f64>,
    #[serde(alias = "cost_per_min", alias = "costPerMin")]
    pub per_minute: Option<f64>,
    #[serde(alias = "cost_per_hour", alias = "costPerHour")]
    pub per_hour: Option<f64>,
    pub currency: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct RawRoute {
    pub id: Option<String>,
    #[serde(alias = "routeName")]
    pub route_name: Option<String>,
    #[serde(alias = "fixedPrice")]
    pub fixed_price: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct RawVehicle {
    pub id: Option<String>,
    pub name: Option<String>,
    pub model: Option<String>,
    #[serde(alias = "ratePerKm")]
    pub rate_per_km: Option<f64>,
    #[serde(alias = "ratePerHour")]
    pub rate_per_hour: Option<f64>,
    pub passengers: Option<u32>,
    pub luggage: Option<u32>,
}

// ============================================================================
// Normalized configuration
// ============================================================================

/// Container elevation.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ContainerStyle {
    Shadow,
    Flat,
}

/// The two button skins, applied consistently to primary and secondary
/// actions.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ButtonSkin {
    Filled,
    Outline,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ButtonPosition {
    Left,
    Center,
    Right,
}

/// Visual presentation settings, independent of form content.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LayoutSettings {
    pub container_style: ContainerStyle,
    pub corner_radius: u32,
    pub container_light: Color,
    pub container_dark: Color,
    pub button_style: ButtonSkin,
    pub button_position: ButtonPosition,
    pub show_progress_bar: bool,
    pub show_step_titles: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ComponentsVisibility {
    pub booking_type_selector: bool,
    pub language_selector: bool,
    pub title: bool,
    pub logo: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WaypointButtonConfig {
    pub enabled: bool,
    pub enabled_for_types: Vec<BookingType>,
    /// Key of the field the "add waypoint" affordance and container follow.
    pub display_after_field: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Customizations {
    pub title: String,
    pub logo: Option<String>,
    pub languages: Vec<String>,
    pub default_language: String,
    pub payment_icons: Vec<String>,
    pub accent_color: Color,
    pub enabled_types: EnabledTypes,
    pub hourly_notes: Vec<String>,
    pub extra_options: Vec<ExtraOption>,
    pub layout: LayoutSettings,
    pub visibility: ComponentsVisibility,
    pub waypoints: WaypointButtonConfig,
}

/// The fully-populated, validated configuration every consumer takes as an
/// explicit parameter.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FormConfig {
    pub structure: FormStructure,
    pub customizations: Customizations,
    pub pricing: Pricing,
    pub routes: Vec<FlatRateRoute>,
    pub vehicles: Vec<Vehicle>,
}

impl FormConfig {
    /// Payment categories offered by this form, in assembly order. A category
    /// is offered iff at least one of its icon names is configured.
    pub fn offered_payment_categories(&self) -> Vec<PaymentCategory> {
        PaymentCategory::ALL
            .into_iter()
            .filter(|cat| {
                cat.icon_names()
                    .iter()
                    .any(|icon| self.customizations.payment_icons.iter().any(|i| i == icon))
            })
            .collect()
    }

    /// The pre-selected payment category: cash when offered, else the first
    /// offered one.
    pub fn initial_payment(&self) -> Option<PaymentCategory> {
        let offered = self.offered_payment_categories();
        if offered.contains(&PaymentCategory::Cash) {
            Some(PaymentCategory::Cash)
        } else {
            offered.first().copied()
        }
    }

    /// Whether waypoints are available for a booking type.
    pub fn waypoints_supported(&self, bt: BookingType) -> bool {
        let wp = &self.customizations.waypoints;
        wp.enabled && wp.enabled_for_types.contains(&bt)
    }

    pub fn vehicle(&self, id: &str) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    pub fn route(&self, id: &str) -> Option<&FlatRateRoute> {
        self.routes.iter().find(|r| r.id == id)
    }
}

// ============================================================================
// Defaults
// ============================================================================

fn def_field(key: &str, label: &str, field_type: FieldType, required: bool) -> FormField {
    FormField {
        id: key.to_string(),
        key: key.to_string(),
        field_type,
        control: derive_control(key, field_type),
        label: label.to_string(),
        placeholder: None,
        options: Vec::new(),
        required,
        conditional: None,
    }
}

fn def_dropdown(key: &str, label: &str, options: &[&str], required: bool) -> FormField {
    FormField {
        options: options.iter().map(|s| s.to_string()).collect(),
        ..def_field(key, label, FieldType::Dropdown, required)
    }
}

/// The built-in field layout used wherever the loaded record stays silent.
fn default_structure() -> FormStructure {
    use FieldType::*;

    let trip = |with_date: bool| {
        let mut fields = vec![
            def_field("pickup_location", "Pickup location", ShortText, true),
            def_field("dropoff_location", "Drop-off location", ShortText, true),
        ];
        if with_date {
            fields.push(def_field("pickup_date", "Pickup date & time", DateTime, true));
        }
        fields
    };

    let mut sections = BTreeMap::new();
    sections.insert(BookingType::Distance, trip(true));
    sections.insert(BookingType::OnDemand, trip(false));
    sections.insert(BookingType::Charter, trip(true));
    sections.insert(BookingType::EventShuttle, trip(true));
    sections.insert(
        BookingType::Hourly,
        vec![
            def_field("pickup_location", "Pickup location", ShortText, true),
            def_field("rental_hours", "Rental hours", Number, true),
            def_field("pickup_date", "Pickup date & time", DateTime, true),
        ],
    );
    sections.insert(
        BookingType::FlatRate,
        vec![def_field("pickup_date", "Pickup date & time", DateTime, true)],
    );
    sections.insert(
        BookingType::AirportTransfer,
        vec![
            def_dropdown(
                "transfer_direction",
                "Direction",
                &["To Airport", "From Airport"],
                true,
            ),
            def_field("pickup_location", "Pickup location", ShortText, true),
            def_field("dropoff_location", "Drop-off location", ShortText, true),
            def_field("pickup_date", "Pickup date & time", DateTime, true),
        ],
    );

    FormStructure {
        common: vec![
            def_field("first_name", "First name", ShortText, true),
            def_field("last_name", "Last name", ShortText, true),
            def_field("email", "Email", ShortText, true),
            def_field("phone", "Phone", ShortText, false),
        ],
        sections,
    }
}

fn default_layout() -> LayoutSettings {
    LayoutSettings {
        container_style: ContainerStyle::Shadow,
        corner_radius: 12,
        container_light: Color::parse("#ffffff").unwrap(),
        container_dark: Color::parse("#1f2430").unwrap(),
        button_style: ButtonSkin::Filled,
        button_position: ButtonPosition::Right,
        show_progress_bar: true,
        show_step_titles: true,
    }
}

fn default_pricing() -> Pricing {
    Pricing {
        base_fare: Money(5.0),
        per_km: Money(2.0),
        per_minute: Money(0.5),
        per_hour: Money(50.0),
        currency: "$".to_string(),
    }
}

// ============================================================================
// Normalization
// ============================================================================

/// Parse a JSON configuration record and normalize it over defaults.
pub fn load_config(json: &str) -> Result<FormConfig, ConfigError> {
    let raw: RawConfig = serde_json::from_str(json)?;
    normalize(raw)
}

/// Merge a partial record over defaults and validate the result.
///
/// Precedence is always loaded-over-default. Field sections replace the
/// default section wholesale (per-field merging would tangle authored and
/// built-in fields); every other substructure merges per value.
pub fn normalize(raw: RawConfig) -> Result<FormConfig, ConfigError> {
    let structure = normalize_structure(raw.fields)?;
    let customizations = normalize_customizations(raw.customizations.unwrap_or_default())?;
    let pricing = normalize_pricing(raw.pricing.unwrap_or_default());
    let routes = normalize_routes(raw.routes.unwrap_or_default());
    let vehicles = normalize_vehicles(raw.vehicles.unwrap_or_default());

    debug!(
        sections = structure.sections.len(),
        routes = routes.len(),
        vehicles = vehicles.len(),
        "configuration normalized"
    );

    Ok(FormConfig {
        structure,
        customizations,
        pricing,
        routes,
        vehicles,
    })
}

fn normalize_structure(
    raw: Option<BTreeMap<String, Vec<RawField>>>,
) -> Result<FormStructure, ConfigError> {
    let mut structure = default_structure();
    let Some(raw) = raw else {
        return Ok(structure);
    };

    for (section_name, raw_fields) in raw {
        let fields = normalize_fields(&section_name, raw_fields)?;
        if section_name == "common" {
            structure.common = fields;
        } else if let Some(bt) = BookingType::from_key(&section_name) {
            structure.sections.insert(bt, fields);
        } else {
            warn!(section = %section_name, "ignoring unknown field section");
        }
    }

    // Conditional rules can only be validated once the whole section is known.
    validate_conditionals("common", &structure.common)?;
    for (bt, fields) in &structure.sections {
        validate_conditionals(bt.key(), fields)?;
    }

    Ok(structure)
}

fn normalize_fields(
    section: &str,
    raw_fields: Vec<RawField>,
) -> Result<Vec<FormField>, ConfigError> {
    let mut fields = Vec::with_capacity(raw_fields.len());
    let mut seen_keys: Vec<String> = Vec::new();

    for (index, raw) in raw_fields.into_iter().enumerate() {
        let key = normalize_key(raw.key.as_deref().unwrap_or(""));

        if section == BookingType::FlatRate.key() && key == ROUTE_FIELD_KEY {
            warn!(section = %section, "dropping field with reserved key \"route\"");
            continue;
        }
        if !key.is_empty() {
            if seen_keys.contains(&key) {
                return Err(ConfigError::DuplicateFieldKey {
                    section: section.to_string(),
                    key,
                });
            }
            seen_keys.push(key.clone());
        }

        let field_type = raw.field_type.unwrap_or(FieldType::ShortText);
        let label = match raw.label {
            Some(label) if !label.is_empty() => label,
            _ => humanize_key(&key, index),
        };
        let id = match raw.id {
            Some(id) if !id.is_empty() => id,
            _ if !key.is_empty() => key.clone(),
            _ => format!("field_{index}"),
        };
        let conditional = raw.conditional_logic.and_then(|c| {
            let field_key = normalize_key(c.field_key.as_deref().unwrap_or(""));
            let value = c.value.unwrap_or_default();
            if field_key.is_empty() {
                None
            } else {
                Some(ConditionalRule { field_key, value })
            }
        });

        fields.push(FormField {
            control: derive_control(&key, field_type),
            id,
            key,
            field_type,
            label,
            placeholder: raw.placeholder.filter(|p| !p.is_empty()),
            options: raw.options.unwrap_or_default(),
            required: raw.required.unwrap_or(false),
            conditional,
        });
    }

    Ok(fields)
}

fn validate_conditionals(section: &str, fields: &[FormField]) -> Result<(), ConfigError> {
    for field in fields {
        let Some(rule) = &field.conditional else {
            continue;
        };
        if !field.key.is_empty() && rule.field_key == field.key {
            return Err(ConfigError::SelfConditional {
                section: section.to_string(),
                field: field.key.clone(),
            });
        }
        let Some(target) = fields.iter().find(|f| !f.key.is_empty() && f.key == rule.field_key)
        else {
            return Err(ConfigError::UnknownConditionalTarget {
                section: section.to_string(),
                field: field.label.clone(),
                target: rule.field_key.clone(),
            });
        };
        if !target.has_discrete_values() {
            return Err(ConfigError::ConditionalTargetNotDiscrete {
                section: section.to_string(),
                field: field.label.clone(),
                target: target.key.clone(),
            });
        }
    }
    Ok(())
}

/// Derive the render control. Address detection from the key happens here and
/// nowhere else; the renderer only ever sees the explicit control.
fn derive_control(key: &str, field_type: FieldType) -> FieldControl {
    if key.contains("pickup_location") {
        return FieldControl::Address(AddressRole::Pickup);
    }
    if key.contains("dropoff_location") {
        return FieldControl::Address(AddressRole::Dropoff);
    }
    if key.contains("waypoint") {
        return FieldControl::Address(AddressRole::Waypoint);
    }
    match field_type {
        FieldType::ShortText => FieldControl::Text,
        FieldType::LongText => FieldControl::TextArea,
        FieldType::Dropdown => FieldControl::Select,
        FieldType::DateTime => FieldControl::DateTime,
        FieldType::Number => FieldControl::Number,
        FieldType::Checkbox => FieldControl::Checkbox,
        FieldType::Radio => FieldControl::RadioGroup,
        FieldType::VehicleType => FieldControl::VehicleSelect,
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase().replace([' ', '-'], "_")
}

fn humanize_key(key: &str, index: usize) -> String {
    if key.is_empty() {
        return format!("Field {}", index + 1);
    }
    let mut out = String::with_capacity(key.len());
    for (i, part) in key.split('_').enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            if i == 0 {
                out.extend(first.to_uppercase());
            } else {
                out.push(first);
            }
            out.push_str(chars.as_str());
        }
    }
    out
}

fn normalize_customizations(raw: RawCustomizations) -> Result<Customizations, ConfigError> {
    let accent_color = match raw.accent_color {
        Some(value) => Color::parse(&value).ok_or(ConfigError::InvalidColor { value })?,
        None => Color::parse("#1e88e5").unwrap(),
    };

    let mut languages: Vec<String> = raw
        .languages
        .unwrap_or_default()
        .into_iter()
        .filter(|l| !l.is_empty())
        .collect();
    if languages.is_empty() {
        languages.push("en".to_string());
    }
    let default_language = match raw.default_language {
        Some(lang) if languages.contains(&lang) => lang,
        _ => languages[0].clone(),
    };

    let enabled_types = match raw.enabled_booking_types {
        None => EnabledTypes::new(BookingType::ALL.to_vec()).unwrap(),
        Some(keys) => {
            let parsed: Vec<BookingType> = keys
                .iter()
                .filter_map(|key| {
                    let bt = BookingType::from_key(key);
                    if bt.is_none() {
                        warn!(key = %key, "ignoring unknown booking type");
                    }
                    bt
                })
                .collect();
            EnabledTypes::new(parsed).ok_or(ConfigError::NoBookingTypes)?
        }
    };

    let extra_options = raw
        .extra_options
        .unwrap_or_default()
        .into_iter()
        .filter_map(|raw| {
            let name = raw.name.filter(|n| !n.is_empty())?;
            let min = raw.min.unwrap_or(0);
            let mut max = raw.max.unwrap_or(10);
            if max < min {
                warn!(extra = %name, "extra option max below min, raising to min");
                max = min;
            }
            Some(ExtraOption {
                name,
                price: Money(raw.price.unwrap_or(0.0)),
                enabled: raw.enabled.unwrap_or(true),
                min,
                max,
            })
        })
        .collect();

    Ok(Customizations {
        title: raw.title.filter(|t| !t.is_empty()).unwrap_or_else(|| "Book your ride".to_string()),
        logo: raw.logo.filter(|l| !l.is_empty()),
        languages,
        default_language,
        payment_icons: raw
            .payment_icons
            .unwrap_or_else(|| vec!["visa".into(), "mastercard".into(), "cash".into()]),
        accent_color,
        enabled_types,
        hourly_notes: raw.hourly_notes.unwrap_or_default(),
        extra_options,
        layout: normalize_layout(raw.layout_settings.unwrap_or_default()),
        visibility: normalize_visibility(raw.components_visibility.unwrap_or_default()),
        waypoints: normalize_waypoints(raw.waypoint_button_config.unwrap_or_default()),
    })
}

fn normalize_layout(raw: RawLayout) -> LayoutSettings {
    let defaults = default_layout();
    let color_or = |value: Option<String>, fallback: Color| {
        value.and_then(|v| Color::parse(&v)).unwrap_or(fallback)
    };
    LayoutSettings {
        container_style: raw.container_style.unwrap_or(defaults.container_style),
        corner_radius: raw.corner_radius.unwrap_or(defaults.corner_radius).min(40),
        container_light: color_or(raw.container_light, defaults.container_light),
        container_dark: color_or(raw.container_dark, defaults.container_dark),
        button_style: raw.button_style.unwrap_or(defaults.button_style),
        button_position: raw.button_position.unwrap_or(defaults.button_position),
        show_progress_bar: raw.show_progress_bar.unwrap_or(defaults.show_progress_bar),
        show_step_titles: raw.show_step_titles.unwrap_or(defaults.show_step_titles),
    }
}

fn normalize_visibility(raw: RawVisibility) -> ComponentsVisibility {
    ComponentsVisibility {
        booking_type_selector: raw.booking_type_selector.unwrap_or(true),
        language_selector: raw.language_selector.unwrap_or(true),
        title: raw.title.unwrap_or(true),
        logo: raw.logo.unwrap_or(true),
    }
}

fn normalize_waypoints(raw: RawWaypointConfig) -> WaypointButtonConfig {
    let enabled_for_types = match raw.enabled_for_types {
        None => vec![BookingType::Distance, BookingType::OnDemand, BookingType::Charter],
        Some(keys) => keys
            .iter()
            .filter_map(|key| BookingType::from_key(key))
            .collect(),
    };
    WaypointButtonConfig {
        enabled: raw.enabled.unwrap_or(true),
        enabled_for_types,
        display_after_field: raw
            .display_after_field
            .map(|f| normalize_key(&f))
            .filter(|f| !f.is_empty())
            .unwrap_or_else(|| "pickup_location".to_string()),
    }
}

fn normalize_pricing(raw: RawPricing) -> Pricing {
    let defaults = default_pricing();
    Pricing {
        base_fare: raw.base_fare.map(Money).unwrap_or(defaults.base_fare),
        per_km: raw.per_km.map(Money).unwrap_or(defaults.per_km),
        per_minute: raw.per_minute.map(Money).unwrap_or(defaults.per_minute),
        per_hour: raw.per_hour.map(Money).unwrap_or(defaults.per_hour),
        currency: raw.currency.filter(|c| !c.is_empty()).unwrap_or(defaults.currency),
    }
}

fn normalize_routes(raw: Vec<RawRoute>) -> Vec<FlatRateRoute> {
    raw.into_iter()
        .enumerate()
        .filter_map(|(index, raw)| {
            let route_name = raw.route_name.filter(|n| !n.is_empty())?;
            Some(FlatRateRoute {
                id: raw.id.filter(|i| !i.is_empty()).unwrap_or_else(|| format!("route_{index}")),
                route_name,
                fixed_price: Money(raw.fixed_price.unwrap_or(0.0)),
            })
        })
        .collect()
}

fn normalize_vehicles(raw: Vec<RawVehicle>) -> Vec<Vehicle> {
    raw.into_iter()
        .enumerate()
        .filter_map(|(index, raw)| {
            let name = raw.name.filter(|n| !n.is_empty())?;
            Some(Vehicle {
                id: raw.id.filter(|i| !i.is_empty()).unwrap_or_else(|| format!("vehicle_{index}")),
                name,
                model: raw.model.unwrap_or_default(),
                rate_per_km: Money(raw.rate_per_km.unwrap_or(0.0)),
                rate_per_hour: Money(raw.rate_per_hour.unwrap_or(0.0)),
                passengers: raw.passengers.unwrap_or(4),
                luggage: raw.luggage.unwrap_or(2),
            })
        })
        .collect()
}
