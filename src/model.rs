//! Core schema types: fields, sections, booking types, and the read-only
//! snapshots (pricing, routes, vehicles) supplied by the persistence layer.
//!
//! Everything here is plain data. Behavior selection is explicit: a field's
//! rendering is driven by [`FieldControl`], a closed discriminant derived once
//! during normalization, never by re-matching on key text at render time.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, AddAssign, Mul};

// ============================================================================
// Booking Types & Sections
// ============================================================================

/// The fixed booking categories, each with its own field section and fare rule.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BookingType {
    Distance,
    Hourly,
    FlatRate,
    OnDemand,
    Charter,
    AirportTransfer,
    EventShuttle,
}

impl BookingType {
    pub const ALL: [BookingType; 7] = [
        BookingType::Distance,
        BookingType::Hourly,
        BookingType::FlatRate,
        BookingType::OnDemand,
        BookingType::Charter,
        BookingType::AirportTransfer,
        BookingType::EventShuttle,
    ];

    /// The stable configuration/submission key.
    pub fn key(self) -> &'static str {
        match self {
            BookingType::Distance => "distance",
            BookingType::Hourly => "hourly",
            BookingType::FlatRate => "flat_rate",
            BookingType::OnDemand => "on_demand",
            BookingType::Charter => "charter",
            BookingType::AirportTransfer => "airport_transfer",
            BookingType::EventShuttle => "event_shuttle",
        }
    }

    pub fn from_key(key: &str) -> Option<BookingType> {
        BookingType::ALL.into_iter().find(|bt| bt.key() == key)
    }

    /// Translation key for the selector label.
    pub fn label_key(self) -> String {
        format!("booking_{}", self.key())
    }

    /// Round trips double the trip fare; hourly rentals have no return leg.
    pub fn supports_round_trip(self) -> bool {
        !matches!(self, BookingType::Hourly)
    }

    /// Types whose fare is metered from an estimated distance and duration.
    pub fn is_metered(self) -> bool {
        !matches!(self, BookingType::Hourly | BookingType::FlatRate)
    }
}

impl fmt::Display for BookingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Identifies a field section: the shared `common` section or one booking
/// type's own section.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SectionKey {
    Common,
    Booking(BookingType),
}

impl SectionKey {
    pub fn key(self) -> &'static str {
        match self {
            SectionKey::Common => "common",
            SectionKey::Booking(bt) => bt.key(),
        }
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

// ============================================================================
// Fields
// ============================================================================

/// The authorable field types.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    ShortText,
    LongText,
    Dropdown,
    DateTime,
    Number,
    Checkbox,
    Radio,
    VehicleType,
}

/// Which trip endpoint an address field feeds.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AddressRole {
    Pickup,
    Dropoff,
    Waypoint,
}

/// The closed set of render controls. Derived once from [`FieldType`] and the
/// field key during normalization; the renderer matches on this exhaustively.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FieldControl {
    Text,
    TextArea,
    Select,
    DateTime,
    Number,
    Checkbox,
    RadioGroup,
    VehicleSelect,
    Address(AddressRole),
}

/// A visibility rule: the field shows only while the controlling field's
/// current value equals `value`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ConditionalRule {
    #[serde(alias = "fieldKey")]
    pub field_key: String,
    pub value: String,
}

/// One field of a form section.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FormField {
    /// Stable identifier, used for element ids.
    pub id: String,
    /// Submission name; unique within a section. May be empty, in which case
    /// the field cannot participate in conditional or fare logic.
    pub key: String,
    pub field_type: FieldType,
    pub control: FieldControl,
    pub label: String,
    pub placeholder: Option<String>,
    pub options: Vec<String>,
    pub required: bool,
    pub conditional: Option<ConditionalRule>,
}

impl FormField {
    /// Whether this field can control conditional logic: it needs a closed
    /// value set (options) or a boolean-like value (checkbox).
    pub fn has_discrete_values(&self) -> bool {
        !self.options.is_empty() || self.field_type == FieldType::Checkbox
    }

    pub fn is_address(&self) -> bool {
        matches!(self.control, FieldControl::Address(_))
    }
}

/// The full field layout: the shared `common` section plus one section per
/// booking type. Sections not present render nothing for that type.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct FormStructure {
    pub common: Vec<FormField>,
    pub sections: BTreeMap<BookingType, Vec<FormField>>,
}

impl FormStructure {
    pub fn section(&self, key: SectionKey) -> &[FormField] {
        match key {
            SectionKey::Common => &self.common,
            SectionKey::Booking(bt) => self.sections.get(&bt).map(Vec::as_slice).unwrap_or(&[]),
        }
    }

    pub fn field(&self, section: SectionKey, key: &str) -> Option<&FormField> {
        if key.is_empty() {
            return None;
        }
        self.section(section).iter().find(|f| f.key == key)
    }
}

// ============================================================================
// Money & Colors
// ============================================================================

/// A monetary amount in the configured currency. Display always carries two
/// decimals.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[serde(transparent)]
pub struct Money(pub f64);

impl Money {
    pub const ZERO: Money = Money(0.0);

    pub fn raw(self) -> f64 {
        self.0
    }
}

impl Add for Money {
    type Output = Money;
    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Mul<f64> for Money {
    type Output = Money;
    fn mul(self, rhs: f64) -> Money {
        Money(self.0 * rhs)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// A validated hex color (`#rgb` or `#rrggbb`).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct Color(String);

impl Color {
    /// Parse and normalize to lowercase `#rrggbb`. Returns `None` for
    /// anything that is not a 3- or 6-digit hex color.
    pub fn parse(value: &str) -> Option<Color> {
        let hex = value.strip_prefix('#')?;
        let expanded = match hex.len() {
            3 => hex
                .chars()
                .flat_map(|c| [c, c])
                .collect::<String>(),
            6 => hex.to_string(),
            _ => return None,
        };
        if !expanded.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        Some(Color(format!("#{}", expanded.to_lowercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The color's RGB components.
    pub fn rgb(&self) -> (u8, u8, u8) {
        let hex = &self.0[1..];
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);
        (channel(0), channel(2), channel(4))
    }

    /// A translucent variant for hover tints and soft backgrounds.
    pub fn tint(&self, alpha: f64) -> String {
        let (r, g, b) = self.rgb();
        format!("rgba({r},{g},{b},{alpha})")
    }
}

// ============================================================================
// Snapshots from the persistence layer
// ============================================================================

/// Per-unit rates used by fare computation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Pricing {
    pub base_fare: Money,
    pub per_km: Money,
    pub per_minute: Money,
    pub per_hour: Money,
    /// Currency symbol prepended to displayed amounts.
    pub currency: String,
}

/// A predefined origin/destination pairing with a fixed price.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FlatRateRoute {
    pub id: String,
    pub route_name: String,
    pub fixed_price: Money,
}

/// A bookable vehicle with its rate surcharges and capacities.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub id: String,
    pub name: String,
    pub model: String,
    pub rate_per_km: Money,
    pub rate_per_hour: Money,
    pub passengers: u32,
    pub luggage: u32,
}

/// An optional add-on service with a per-unit price and a bounded quantity.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExtraOption {
    pub name: String,
    pub price: Money,
    pub enabled: bool,
    pub min: u32,
    pub max: u32,
}

// ============================================================================
// Payment
// ============================================================================

/// The payment categories a form can offer.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PaymentCategory {
    CreditCard,
    #[serde(rename = "paypal")]
    PayPal,
    Cash,
}

impl PaymentCategory {
    /// Assembly order of the payment buttons.
    pub const ALL: [PaymentCategory; 3] = [
        PaymentCategory::CreditCard,
        PaymentCategory::PayPal,
        PaymentCategory::Cash,
    ];

    pub fn key(self) -> &'static str {
        match self {
            PaymentCategory::CreditCard => "credit_card",
            PaymentCategory::PayPal => "paypal",
            PaymentCategory::Cash => "cash",
        }
    }

    pub fn label_key(self) -> &'static str {
        match self {
            PaymentCategory::CreditCard => "pay_credit_card",
            PaymentCategory::PayPal => "pay_paypal",
            PaymentCategory::Cash => "pay_cash",
        }
    }

    /// The icon names that make this category available: a category is
    /// offered iff at least one of these appears in the configured icon set.
    pub fn icon_names(self) -> &'static [&'static str] {
        match self {
            PaymentCategory::CreditCard => &["visa", "mastercard", "amex", "discover"],
            PaymentCategory::PayPal => &["paypal"],
            PaymentCategory::Cash => &["cash"],
        }
    }
}

/// The enabled booking types, in configured order. Never empty: disabling the
/// last remaining type is a no-op.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct EnabledTypes(Vec<BookingType>);

impl EnabledTypes {
    /// Build from an ordered list, dropping duplicates. Returns `None` when
    /// the list is empty.
    pub fn new(types: Vec<BookingType>) -> Option<EnabledTypes> {
        let mut seen = Vec::new();
        for bt in types {
            if !seen.contains(&bt) {
                seen.push(bt);
            }
        }
        if seen.is_empty() { None } else { Some(EnabledTypes(seen)) }
    }

    pub fn first(&self) -> BookingType {
        self.0[0]
    }

    pub fn contains(&self, bt: BookingType) -> bool {
        self.0.contains(&bt)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; the set cannot become empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = BookingType> + '_ {
        self.0.iter().copied()
    }

    pub fn enable(&mut self, bt: BookingType) {
        if !self.0.contains(&bt) {
            self.0.push(bt);
        }
    }

    /// Disable a type. Disabling the last remaining one is a no-op.
    pub fn disable(&mut self, bt: BookingType) {
        if self.0.len() > 1 {
            self.0.retain(|t| *t != bt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_type_keys_round_trip() {
        for bt in BookingType::ALL {
            assert_eq!(BookingType::from_key(bt.key()), Some(bt));
        }
    }

    #[test]
    fn hourly_has_no_round_trip() {
        assert!(!BookingType::Hourly.supports_round_trip());
        assert!(BookingType::Distance.supports_round_trip());
        assert!(BookingType::FlatRate.supports_round_trip());
    }

    #[test]
    fn metered_types_exclude_hourly_and_flat_rate() {
        assert!(BookingType::Distance.is_metered());
        assert!(BookingType::AirportTransfer.is_metered());
        assert!(!BookingType::Hourly.is_metered());
        assert!(!BookingType::FlatRate.is_metered());
    }

    #[test]
    fn color_parses_short_and_long_hex() {
        assert_eq!(Color::parse("#A3f").unwrap().as_str(), "#aa33ff");
        assert_eq!(Color::parse("#1E88E5").unwrap().as_str(), "#1e88e5");
        assert!(Color::parse("blue").is_none());
        assert!(Color::parse("#12345").is_none());
    }

    #[test]
    fn color_tint_uses_rgb_components() {
        let c = Color::parse("#1e88e5").unwrap();
        assert_eq!(c.rgb(), (30, 136, 229));
        assert_eq!(c.tint(0.12), "rgba(30,136,229,0.12)");
    }

    #[test]
    fn money_displays_two_decimals() {
        assert_eq!(Money(150.0).to_string(), "150.00");
        assert_eq!(Money(7.5).to_string(), "7.50");
    }

    #[test]
    fn disabling_last_enabled_type_is_a_noop() {
        let mut enabled = EnabledTypes::new(vec![BookingType::Hourly]).unwrap();
        enabled.disable(BookingType::Hourly);
        assert!(enabled.contains(BookingType::Hourly));
        assert_eq!(enabled.len(), 1);

        enabled.enable(BookingType::Distance);
        enabled.disable(BookingType::Hourly);
        assert!(!enabled.contains(BookingType::Hourly));
        assert_eq!(enabled.first(), BookingType::Distance);
    }

    #[test]
    fn field_type_uses_kebab_case_keys() {
        let ft: FieldType = serde_json::from_str("\"date-time\"").unwrap();
        assert_eq!(ft, FieldType::DateTime);
        let ft: FieldType = serde_json::from_str("\"vehicle-type\"").unwrap();
        assert_eq!(ft, FieldType::VehicleType);
    }
}
