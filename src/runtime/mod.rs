//! The booking wizard's state machine.
//!
//! [`Session`] is the authoritative model of everything the compiled client
//! script does in the browser: step transitions with validation guards,
//! conditional field visibility, fare recomputation, waypoint and extra-option
//! management, and the final payment dispatch. It holds no I/O; the embedding
//! side supplies a [`BookingBackend`] at submission time.
//!
//! State lives only for the lifetime of the session value, matching the
//! rendered document: nothing is persisted by the runtime itself.

pub mod fare;
pub mod payment;

use std::collections::BTreeMap;

use crate::config::{FormConfig, ROUTE_FIELD_KEY};
use crate::errors::{StepError, SubmitError};
use crate::log::debug;
use crate::model::{
    AddressRole, BookingType, FieldControl, FormField, PaymentCategory, SectionKey,
};

use fare::{DistanceEstimator, Fare, FareInputs, HashedEstimator};
use payment::{BookingBackend, BookingRequest, CheckoutProvider, SubmitOutcome};

/// The five wizard steps. Four are user-facing progress stages; confirmation
/// is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Step {
    TripDetails,
    Vehicle,
    PassengerPayment,
    Summary,
    Confirmation,
}

impl Step {
    /// 1-based step number as shown to the user.
    pub fn number(self) -> u8 {
        match self {
            Step::TripDetails => 1,
            Step::Vehicle => 2,
            Step::PassengerPayment => 3,
            Step::Summary => 4,
            Step::Confirmation => 5,
        }
    }

    pub fn title_key(self) -> &'static str {
        match self {
            Step::TripDetails => "step_trip_details",
            Step::Vehicle => "step_vehicle",
            Step::PassengerPayment => "step_passenger",
            Step::Summary => "step_summary",
            Step::Confirmation => "confirmation_title",
        }
    }
}

/// One line of the summary step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub label: String,
    pub value: String,
    /// Which step an "edit" affordance jumps back to, if any.
    pub edit_step: Option<Step>,
}

/// An interactive booking session over one normalized configuration.
pub struct Session<'c> {
    cfg: &'c FormConfig,
    estimator: Box<dyn DistanceEstimator>,
    step: Step,
    booking_type: BookingType,
    language: String,
    values: BTreeMap<SectionKey, BTreeMap<String, String>>,
    waypoints: BTreeMap<BookingType, Vec<String>>,
    return_waypoints: BTreeMap<BookingType, Vec<String>>,
    round_trip: bool,
    extras: BTreeMap<String, u32>,
    vehicle_id: Option<String>,
    payment: Option<PaymentCategory>,
    last_error: Option<StepError>,
    fare: Option<Fare>,
    submitting: bool,
}

impl<'c> Session<'c> {
    /// Start a session: step 1, first enabled booking type, cash-preferred
    /// payment pre-selection, default language.
    pub fn new(cfg: &'c FormConfig) -> Session<'c> {
        Session::with_estimator(cfg, Box::new(HashedEstimator))
    }

    /// Start a session with a custom distance estimator (e.g. a real routing
    /// client).
    pub fn with_estimator(
        cfg: &'c FormConfig,
        estimator: Box<dyn DistanceEstimator>,
    ) -> Session<'c> {
        Session {
            cfg,
            estimator,
            step: Step::TripDetails,
            booking_type: cfg.customizations.enabled_types.first(),
            language: cfg.customizations.default_language.clone(),
            values: BTreeMap::new(),
            waypoints: BTreeMap::new(),
            return_waypoints: BTreeMap::new(),
            round_trip: false,
            extras: BTreeMap::new(),
            vehicle_id: None,
            payment: cfg.initial_payment(),
            last_error: None,
            fare: None,
            submitting: false,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn booking_type(&self) -> BookingType {
        self.booking_type
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn fare(&self) -> Option<&Fare> {
        self.fare.as_ref()
    }

    pub fn last_error(&self) -> Option<&StepError> {
        self.last_error.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn selected_vehicle(&self) -> Option<&str> {
        self.vehicle_id.as_deref()
    }

    pub fn payment(&self) -> Option<PaymentCategory> {
        self.payment
    }

    pub fn round_trip(&self) -> bool {
        self.round_trip
    }

    pub fn value(&self, section: SectionKey, key: &str) -> Option<&str> {
        self.values
            .get(&section)
            .and_then(|m| m.get(key))
            .map(String::as_str)
    }

    pub fn waypoints(&self) -> &[String] {
        self.waypoints
            .get(&self.booking_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn return_waypoints(&self) -> &[String] {
        self.return_waypoints
            .get(&self.booking_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn extra_quantity(&self, name: &str) -> u32 {
        self.extras.get(name).copied().unwrap_or(0)
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    /// Store a field value. Geocoder clears arrive here as empty strings.
    pub fn set_value(&mut self, section: SectionKey, key: &str, value: impl Into<String>) {
        self.values
            .entry(section)
            .or_default()
            .insert(key.to_string(), value.into());
        self.refresh_fare();
    }

    pub fn set_language(&mut self, lang: &str) {
        if self.cfg.customizations.languages.iter().any(|l| l == lang) {
            self.language = lang.to_string();
        }
    }

    /// Switch the active booking type. Values entered for other types are
    /// retained so switching back restores them. Switching to a type that is
    /// not enabled is a no-op.
    pub fn set_booking_type(&mut self, bt: BookingType) {
        if !self.cfg.customizations.enabled_types.contains(bt) {
            return;
        }
        self.booking_type = bt;
        self.last_error = None;
        self.refresh_fare();
    }

    pub fn select_vehicle(&mut self, id: &str) -> bool {
        if self.cfg.vehicle(id).is_none() {
            return false;
        }
        self.vehicle_id = Some(id.to_string());
        self.refresh_fare();
        true
    }

    pub fn select_payment(&mut self, category: PaymentCategory) -> bool {
        if !self.cfg.offered_payment_categories().contains(&category) {
            return false;
        }
        self.payment = Some(category);
        true
    }

    /// Toggle the round trip. Not offered for booking types without a return
    /// leg; turning it off clears all return waypoints.
    pub fn set_round_trip(&mut self, on: bool) {
        if on && !self.booking_type.supports_round_trip() {
            return;
        }
        self.round_trip = on;
        if !on {
            self.return_waypoints.clear();
        }
        self.refresh_fare();
    }

    // ------------------------------------------------------------------
    // Waypoints
    // ------------------------------------------------------------------

    pub fn add_waypoint(&mut self, address: impl Into<String>) {
        if !self.cfg.waypoints_supported(self.booking_type) {
            return;
        }
        self.waypoints
            .entry(self.booking_type)
            .or_default()
            .push(address.into());
    }

    pub fn set_waypoint(&mut self, index: usize, address: impl Into<String>) {
        if let Some(list) = self.waypoints.get_mut(&self.booking_type) {
            if let Some(slot) = list.get_mut(index) {
                *slot = address.into();
            }
        }
    }

    pub fn remove_waypoint(&mut self, index: usize) {
        if let Some(list) = self.waypoints.get_mut(&self.booking_type) {
            if index < list.len() {
                list.remove(index);
            }
        }
    }

    /// Return-trip waypoints are only editable while the round trip is on.
    pub fn add_return_waypoint(&mut self, address: impl Into<String>) {
        if !self.round_trip || !self.cfg.waypoints_supported(self.booking_type) {
            return;
        }
        self.return_waypoints
            .entry(self.booking_type)
            .or_default()
            .push(address.into());
    }

    pub fn remove_return_waypoint(&mut self, index: usize) {
        if let Some(list) = self.return_waypoints.get_mut(&self.booking_type) {
            if index < list.len() {
                list.remove(index);
            }
        }
    }

    // ------------------------------------------------------------------
    // Extra options
    // ------------------------------------------------------------------

    /// Set an extra option's quantity, clamped to its `[min, max]`. A clamped
    /// quantity of zero with `min = 0` deselects the option entirely.
    pub fn set_extra(&mut self, name: &str, quantity: i64) {
        let Some(option) = self
            .cfg
            .customizations
            .extra_options
            .iter()
            .find(|o| o.enabled && o.name == name)
        else {
            return;
        };
        let clamped = quantity.clamp(i64::from(option.min), i64::from(option.max)) as u32;
        if clamped == 0 && option.min == 0 {
            self.extras.remove(name);
        } else {
            self.extras.insert(name.to_string(), clamped);
        }
        self.refresh_fare();
    }

    /// Step an extra option's quantity up or down.
    pub fn step_extra(&mut self, name: &str, delta: i64) {
        let current = i64::from(self.extra_quantity(name));
        self.set_extra(name, current + delta);
    }

    // ------------------------------------------------------------------
    // Conditional visibility & validation
    // ------------------------------------------------------------------

    /// A field is visible unless its conditional rule's controlling field
    /// currently holds a different value.
    pub fn is_visible(&self, section: SectionKey, field: &FormField) -> bool {
        match &field.conditional {
            None => true,
            Some(rule) => self.value(section, &rule.field_key).unwrap_or("") == rule.value,
        }
    }

    /// The fields of a section that are currently visible.
    pub fn visible_fields(&self, section: SectionKey) -> Vec<&'c FormField> {
        self.cfg
            .structure
            .section(section)
            .iter()
            .filter(|f| self.is_visible(section, f))
            .collect()
    }

    /// Required, visible fields of a section whose value is still empty.
    /// A conditionally hidden required field is not checked.
    pub fn missing_required(&self, section: SectionKey) -> Vec<String> {
        self.visible_fields(section)
            .into_iter()
            .filter(|f| f.required)
            .filter(|f| {
                let answered = !f.key.is_empty()
                    && self
                        .value(section, &f.key)
                        .is_some_and(|v| !v.trim().is_empty());
                !answered
            })
            .map(|f| if f.key.is_empty() { f.label.clone() } else { f.key.clone() })
            .collect()
    }

    fn active_section(&self) -> SectionKey {
        SectionKey::Booking(self.booking_type)
    }

    fn guard(&self, step: Step) -> Result<(), StepError> {
        match step {
            Step::TripDetails => {
                let missing = self.missing_required(self.active_section());
                if missing.is_empty() {
                    Ok(())
                } else {
                    Err(StepError::MissingRequired { fields: missing })
                }
            }
            Step::Vehicle => {
                if self.cfg.vehicles.is_empty() || self.vehicle_id.is_some() {
                    Ok(())
                } else {
                    Err(StepError::NoVehicleSelected)
                }
            }
            Step::PassengerPayment => {
                let missing = self.missing_required(SectionKey::Common);
                if missing.is_empty() {
                    Ok(())
                } else {
                    Err(StepError::MissingRequired { fields: missing })
                }
            }
            Step::Summary | Step::Confirmation => Ok(()),
        }
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    /// Advance to the next step if the current step's guard passes. From the
    /// summary onwards this is a no-op; submission goes through [`submit`].
    ///
    /// [`submit`]: Session::submit
    pub fn next(&mut self) -> Result<Step, StepError> {
        let target = match self.step {
            Step::TripDetails => Step::Vehicle,
            Step::Vehicle => Step::PassengerPayment,
            Step::PassengerPayment => Step::Summary,
            Step::Summary | Step::Confirmation => return Ok(self.step),
        };
        match self.guard(self.step) {
            Ok(()) => {
                self.step = target;
                self.last_error = None;
                Ok(target)
            }
            Err(err) => {
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Go back one step. No-op on the first step and after confirmation.
    pub fn back(&mut self) -> Step {
        self.step = match self.step {
            Step::Vehicle => Step::TripDetails,
            Step::PassengerPayment => Step::Vehicle,
            Step::Summary => Step::PassengerPayment,
            other => other,
        };
        self.last_error = None;
        self.step
    }

    /// Jump from the summary directly to one of steps 1–3. Any other
    /// combination is a no-op.
    pub fn edit(&mut self, target: Step) -> Step {
        if self.step == Step::Summary && target < Step::Summary {
            self.step = target;
            self.last_error = None;
        }
        self.step
    }

    // ------------------------------------------------------------------
    // Fare
    // ------------------------------------------------------------------

    fn address_value(&self, role: AddressRole) -> Option<&str> {
        let section = self.active_section();
        let field = self
            .cfg
            .structure
            .section(section)
            .iter()
            .find(|f| f.control == FieldControl::Address(role) && self.is_visible(section, f))?;
        self.value(section, &field.key).filter(|v| !v.trim().is_empty())
    }

    fn rental_hours(&self) -> Option<f64> {
        let raw = self.value(self.active_section(), "rental_hours")?;
        parse_leading_number(raw)
    }

    fn refresh_fare(&mut self) {
        let estimate = if self.booking_type.is_metered() {
            match (
                self.address_value(AddressRole::Pickup),
                self.address_value(AddressRole::Dropoff),
            ) {
                (Some(pickup), Some(dropoff)) => Some(self.estimator.estimate(pickup, dropoff)),
                _ => None,
            }
        } else {
            None
        };

        let route_price = if self.booking_type == BookingType::FlatRate {
            self.value(self.active_section(), ROUTE_FIELD_KEY)
                .and_then(|id| self.cfg.route(id))
                .map(|r| r.fixed_price)
        } else {
            None
        };

        let extras = self
            .extras
            .iter()
            .filter_map(|(name, qty)| {
                let option = self
                    .cfg
                    .customizations
                    .extra_options
                    .iter()
                    .find(|o| o.name == *name)?;
                Some((option.price, *qty))
            })
            .collect();

        self.fare = fare::compute(
            self.cfg,
            FareInputs {
                booking_type: self.booking_type,
                estimate,
                rental_hours: self.rental_hours(),
                route_price,
                round_trip: self.round_trip,
                vehicle: self.vehicle_id.as_deref().and_then(|id| self.cfg.vehicle(id)),
                extras,
            },
        );
        debug!(
            booking_type = %self.booking_type,
            computable = self.fare.is_some(),
            "fare refreshed"
        );
    }

    // ------------------------------------------------------------------
    // Summary & submission
    // ------------------------------------------------------------------

    /// The typed rows the summary step displays.
    pub fn summary(&self) -> Vec<SummaryRow> {
        let mut rows = Vec::new();
        let trip_section = self.active_section();

        for field in self.visible_fields(trip_section) {
            if let Some(value) = self.value(trip_section, &field.key) {
                if !value.trim().is_empty() {
                    rows.push(SummaryRow {
                        label: field.label.clone(),
                        value: value.to_string(),
                        edit_step: Some(Step::TripDetails),
                    });
                }
            }
        }
        for (index, waypoint) in self.waypoints().iter().enumerate() {
            rows.push(SummaryRow {
                label: format!("Waypoint {}", index + 1),
                value: waypoint.clone(),
                edit_step: Some(Step::TripDetails),
            });
        }
        if let Some(vehicle) = self.vehicle_id.as_deref().and_then(|id| self.cfg.vehicle(id)) {
            rows.push(SummaryRow {
                label: "Vehicle".to_string(),
                value: vehicle.name.clone(),
                edit_step: Some(Step::Vehicle),
            });
        }
        for field in self.visible_fields(SectionKey::Common) {
            if let Some(value) = self.value(SectionKey::Common, &field.key) {
                if !value.trim().is_empty() {
                    rows.push(SummaryRow {
                        label: field.label.clone(),
                        value: value.to_string(),
                        edit_step: Some(Step::PassengerPayment),
                    });
                }
            }
        }
        for (name, qty) in &self.extras {
            rows.push(SummaryRow {
                label: name.clone(),
                value: format!("× {qty}"),
                edit_step: Some(Step::TripDetails),
            });
        }
        if let Some(category) = self.payment {
            rows.push(SummaryRow {
                label: "Payment".to_string(),
                value: category.key().to_string(),
                edit_step: Some(Step::PassengerPayment),
            });
        }
        if let Some(fare) = &self.fare {
            rows.push(SummaryRow {
                label: "Total".to_string(),
                value: format!("{}{}", fare.currency, fare.total),
                edit_step: None,
            });
        }
        rows
    }

    fn booking_request(&self) -> BookingRequest {
        let mut values = BTreeMap::new();
        for section in [self.active_section(), SectionKey::Common] {
            let mut section_values = BTreeMap::new();
            for field in self.visible_fields(section) {
                if field.key.is_empty() {
                    continue;
                }
                if let Some(value) = self.value(section, &field.key) {
                    if !value.trim().is_empty() {
                        section_values.insert(field.key.clone(), value.to_string());
                    }
                }
            }
            values.insert(section.key().to_string(), section_values);
        }

        BookingRequest {
            booking_type: self.booking_type,
            values,
            waypoints: self.waypoints().to_vec(),
            return_waypoints: self.return_waypoints().to_vec(),
            round_trip: self.round_trip && self.booking_type.supports_round_trip(),
            extras: self.extras.clone(),
            vehicle_id: self.vehicle_id.clone(),
            payment: self.payment,
            fare: self.fare.as_ref().map(|f| f.total),
        }
    }

    /// Final submission from the summary step.
    ///
    /// Re-validates every guard, creates the booking, then dispatches on the
    /// payment category: cash confirms in place, card/PayPal exchange the
    /// booking for a provider redirect. Every failure leaves the entered data
    /// intact and the submit affordance actionable again.
    pub fn submit(&mut self, backend: &dyn BookingBackend) -> Result<SubmitOutcome, SubmitError> {
        if self.submitting {
            return Err(SubmitError::InProgress);
        }
        for step in [Step::TripDetails, Step::Vehicle, Step::PassengerPayment] {
            if let Err(err) = self.guard(step) {
                self.last_error = Some(err.clone());
                return Err(SubmitError::Validation(err));
            }
        }

        self.submitting = true;
        let request = self.booking_request();
        let booking = match backend.create_booking(&request) {
            Ok(id) => id,
            Err(err) => {
                self.submitting = false;
                return Err(SubmitError::Backend(err));
            }
        };

        let provider = self.payment.and_then(CheckoutProvider::for_category);
        match provider {
            None => {
                self.submitting = false;
                self.step = Step::Confirmation;
                Ok(SubmitOutcome::Confirmed(booking))
            }
            Some(provider) => {
                let amount = self.fare.as_ref().map(|f| f.total).unwrap_or_default();
                match backend.begin_checkout(&booking, amount, provider) {
                    Ok(url) => Ok(SubmitOutcome::Redirect { booking, url }),
                    Err(err) => {
                        self.submitting = false;
                        Err(SubmitError::Backend(err))
                    }
                }
            }
        }
    }
}

/// Parse a leading decimal number out of a value like `"3"`, `"3.5 h"`.
fn parse_leading_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let end = trimmed
        .char_indices()
        .take_while(|(i, c)| c.is_ascii_digit() || (*c == '.' && *i > 0))
        .map(|(i, c)| i + c.len_utf8())
        .last()?;
    trimmed[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;

    fn cfg_with_vehicles() -> FormConfig {
        load_config(
            r#"{
                "vehicles": [
                    {"id": "sedan", "name": "Sedan", "model": "Camry"},
                    {"id": "van", "name": "Van", "model": "Sprinter"}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn initial_state() {
        let cfg = load_config("{}").unwrap();
        let session = Session::new(&cfg);
        assert_eq!(session.step(), Step::TripDetails);
        assert_eq!(session.booking_type(), BookingType::Distance);
        assert_eq!(session.language(), "en");
        assert!(!session.is_submitting());
    }

    #[test]
    fn vehicle_guard_skipped_without_vehicles() {
        let cfg = load_config("{}").unwrap();
        let mut session = Session::new(&cfg);
        let section = SectionKey::Booking(BookingType::Distance);
        session.set_value(section, "pickup_location", "A");
        session.set_value(section, "dropoff_location", "B");
        session.set_value(section, "pickup_date", "2026-08-01T10:00");
        session.next().unwrap();
        assert_eq!(session.next().unwrap(), Step::PassengerPayment);
    }

    #[test]
    fn vehicle_guard_enforced_with_vehicles() {
        let cfg = cfg_with_vehicles();
        let mut session = Session::new(&cfg);
        let section = SectionKey::Booking(BookingType::Distance);
        session.set_value(section, "pickup_location", "A");
        session.set_value(section, "dropoff_location", "B");
        session.set_value(section, "pickup_date", "2026-08-01T10:00");
        session.next().unwrap();
        assert_eq!(session.next(), Err(StepError::NoVehicleSelected));
        assert!(session.select_vehicle("van"));
        assert_eq!(session.next().unwrap(), Step::PassengerPayment);
    }

    #[test]
    fn back_and_edit_transitions() {
        let cfg = load_config("{}").unwrap();
        let mut session = Session::new(&cfg);
        assert_eq!(session.back(), Step::TripDetails);

        let section = SectionKey::Booking(BookingType::Distance);
        session.set_value(section, "pickup_location", "A");
        session.set_value(section, "dropoff_location", "B");
        session.set_value(section, "pickup_date", "2026-08-01T10:00");
        session.next().unwrap();
        session.next().unwrap();
        assert_eq!(session.back(), Step::Vehicle);

        // edit() only jumps from the summary
        assert_eq!(session.edit(Step::TripDetails), Step::Vehicle);
    }

    #[test]
    fn extra_quantities_clamp_and_deselect() {
        let cfg = load_config(
            r#"{"customizations": {"extra_options": [
                {"name": "Child seat", "price": 5.0, "min": 0, "max": 2}
            ]}}"#,
        )
        .unwrap();
        let mut session = Session::new(&cfg);
        session.step_extra("Child seat", 1);
        assert_eq!(session.extra_quantity("Child seat"), 1);
        session.step_extra("Child seat", 5);
        assert_eq!(session.extra_quantity("Child seat"), 2);
        session.step_extra("Child seat", -2);
        assert_eq!(session.extra_quantity("Child seat"), 0);
        assert!(!session.extras.contains_key("Child seat"));
    }

    #[test]
    fn waypoints_are_scoped_per_booking_type() {
        let cfg = load_config("{}").unwrap();
        let mut session = Session::new(&cfg);
        session.add_waypoint("Stop 1");
        assert_eq!(session.waypoints(), ["Stop 1".to_string()]);

        session.set_booking_type(BookingType::OnDemand);
        assert!(session.waypoints().is_empty());
        session.set_booking_type(BookingType::Distance);
        assert_eq!(session.waypoints(), ["Stop 1".to_string()]);
    }

    #[test]
    fn disabling_round_trip_clears_return_waypoints() {
        let cfg = load_config("{}").unwrap();
        let mut session = Session::new(&cfg);
        session.set_round_trip(true);
        session.add_return_waypoint("Back stop");
        assert_eq!(session.return_waypoints().len(), 1);
        session.set_round_trip(false);
        assert!(session.return_waypoints().is_empty());
    }

    #[test]
    fn parse_leading_number_accepts_suffixes() {
        assert_eq!(parse_leading_number("3"), Some(3.0));
        assert_eq!(parse_leading_number("3.5 h"), Some(3.5));
        assert_eq!(parse_leading_number(" 2"), Some(2.0));
        assert_eq!(parse_leading_number("h3"), None);
        assert_eq!(parse_leading_number(""), None);
    }
}
