//! State machine behavior over realistic configurations.

use formwiz::errors::{BackendError, StepError, SubmitError};
use formwiz::model::{BookingType, PaymentCategory, SectionKey};
use formwiz::runtime::payment::{
    BookingBackend, BookingId, BookingRequest, CheckoutProvider, RedirectUrl, SubmitOutcome,
};
use formwiz::load_config;
use formwiz::model::Money;
use formwiz::runtime::{Session, Step};

/// Backend double: records nothing, fails where told to.
struct FakeBackend {
    fail_create: bool,
    fail_checkout: bool,
}

impl FakeBackend {
    fn ok() -> FakeBackend {
        FakeBackend {
            fail_create: false,
            fail_checkout: false,
        }
    }
}

impl BookingBackend for FakeBackend {
    fn create_booking(&self, _request: &BookingRequest) -> Result<BookingId, BackendError> {
        if self.fail_create {
            Err(BackendError::new("booking service unavailable"))
        } else {
            Ok(BookingId("bk_1".to_string()))
        }
    }

    fn begin_checkout(
        &self,
        _booking: &BookingId,
        _amount: Money,
        provider: CheckoutProvider,
    ) -> Result<RedirectUrl, BackendError> {
        if self.fail_checkout {
            Err(BackendError::new("checkout declined"))
        } else {
            Ok(RedirectUrl(format!("https://pay.example/{provider:?}")))
        }
    }
}

fn fill_common(session: &mut Session<'_>) {
    session.set_value(SectionKey::Common, "first_name", "Ada");
    session.set_value(SectionKey::Common, "last_name", "Lovelace");
    session.set_value(SectionKey::Common, "email", "ada@example.com");
}

fn fill_distance_trip(session: &mut Session<'_>) {
    let section = SectionKey::Booking(BookingType::Distance);
    session.set_value(section, "pickup_location", "1 Main St");
    session.set_value(section, "dropoff_location", "2 Oak Ave");
    session.set_value(section, "pickup_date", "2026-09-01T10:00");
}

fn to_summary(session: &mut Session<'_>) {
    session.next().unwrap();
    session.next().unwrap();
    session.next().unwrap();
    assert_eq!(session.step(), Step::Summary);
}

// Scenario A: an empty required dropoff blocks step 1.
#[test]
fn empty_required_dropoff_blocks_step_one() {
    let cfg = load_config("{}").unwrap();
    let mut session = Session::new(&cfg);
    let section = SectionKey::Booking(BookingType::Distance);
    session.set_value(section, "pickup_location", "1 Main St");
    session.set_value(section, "pickup_date", "2026-09-01T10:00");

    let err = session.next().unwrap_err();
    match &err {
        StepError::MissingRequired { fields } => {
            assert_eq!(fields, &vec!["dropoff_location".to_string()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(session.step(), Step::TripDetails);
    assert_eq!(session.last_error(), Some(&err));

    session.set_value(section, "dropoff_location", "2 Oak Ave");
    assert_eq!(session.next().unwrap(), Step::Vehicle);
}

// Scenario B: hourly fare is rate × hours, and round trip has no effect.
#[test]
fn hourly_fare_and_round_trip_immunity() {
    let cfg = load_config(
        r#"{
            "customizations": {"enabled_booking_types": ["hourly"]},
            "pricing": {"per_hour": 50.0}
        }"#,
    )
    .unwrap();
    let mut session = Session::new(&cfg);
    assert_eq!(session.booking_type(), BookingType::Hourly);

    let section = SectionKey::Booking(BookingType::Hourly);
    session.set_value(section, "rental_hours", "3");
    let fare = session.fare().expect("fare should be computable");
    assert_eq!(fare.total.to_string(), "150.00");

    session.set_round_trip(true);
    assert!(!session.round_trip(), "round trip is not offered for hourly");
    assert_eq!(session.fare().unwrap().total.to_string(), "150.00");
}

// Scenario C: conditional visibility removes the requirement.
#[test]
fn conditional_field_not_required_while_hidden() {
    let cfg = load_config(
        r#"{"fields": {"airport_transfer": [
            {"key": "transfer_direction", "type": "dropdown",
             "options": ["To Airport", "From Airport"], "required": true},
            {"key": "pickup_location", "required": true,
             "conditional_logic": {"field_key": "transfer_direction", "value": "To Airport"}},
            {"key": "dropoff_location", "required": true}
        ]}}"#,
    )
    .unwrap();
    let mut session = Session::new(&cfg);
    session.set_booking_type(BookingType::AirportTransfer);
    let section = SectionKey::Booking(BookingType::AirportTransfer);

    session.set_value(section, "transfer_direction", "From Airport");
    session.set_value(section, "dropoff_location", "Hotel Plaza");

    // pickup_location is hidden, so it must not block the step
    assert!(session.missing_required(section).is_empty());
    assert_eq!(session.next().unwrap(), Step::Vehicle);

    // flipping the controlling value restores the requirement
    session.back();
    session.set_value(section, "transfer_direction", "To Airport");
    assert_eq!(
        session.missing_required(section),
        vec!["pickup_location".to_string()]
    );
    assert!(session.next().is_err());
}

// Scenario D: a failing checkout call keeps the user on the summary with
// entered data intact and the submit affordance actionable.
#[test]
fn checkout_failure_preserves_data_and_allows_retry() {
    let cfg = load_config("{}").unwrap();
    let mut session = Session::new(&cfg);
    fill_distance_trip(&mut session);
    fill_common(&mut session);
    to_summary(&mut session);

    assert!(session.select_payment(PaymentCategory::CreditCard));
    let backend = FakeBackend {
        fail_create: false,
        fail_checkout: true,
    };
    let err = session.submit(&backend).unwrap_err();
    assert!(matches!(err, SubmitError::Backend(_)));
    assert_eq!(session.step(), Step::Summary);
    assert!(!session.is_submitting());
    assert_eq!(
        session.value(SectionKey::Booking(BookingType::Distance), "pickup_location"),
        Some("1 Main St")
    );

    // explicit retry against a working backend succeeds with a redirect
    match session.submit(&FakeBackend::ok()).unwrap() {
        SubmitOutcome::Redirect { url, .. } => {
            assert!(url.0.starts_with("https://pay.example/"));
        }
        other => panic!("expected redirect, got {other:?}"),
    }
}

#[test]
fn create_booking_failure_is_recoverable_too() {
    let cfg = load_config("{}").unwrap();
    let mut session = Session::new(&cfg);
    fill_distance_trip(&mut session);
    fill_common(&mut session);
    to_summary(&mut session);

    let backend = FakeBackend {
        fail_create: true,
        fail_checkout: false,
    };
    assert!(session.submit(&backend).is_err());
    assert!(!session.is_submitting());
    assert_eq!(session.submit(&FakeBackend::ok()).unwrap(),
        SubmitOutcome::Confirmed(BookingId("bk_1".to_string())));
    assert_eq!(session.step(), Step::Confirmation);
}

#[test]
fn cash_goes_straight_to_confirmation() {
    let cfg = load_config("{}").unwrap();
    let mut session = Session::new(&cfg);
    // cash is in the default icon set, so it is pre-selected
    assert_eq!(session.payment(), Some(PaymentCategory::Cash));
    fill_distance_trip(&mut session);
    fill_common(&mut session);
    to_summary(&mut session);

    match session.submit(&FakeBackend::ok()).unwrap() {
        SubmitOutcome::Confirmed(id) => assert_eq!(id.0, "bk_1"),
        other => panic!("expected confirmation, got {other:?}"),
    }
    assert_eq!(session.step(), Step::Confirmation);
}

#[test]
fn submission_revalidates_all_guards() {
    let cfg = load_config("{}").unwrap();
    let mut session = Session::new(&cfg);
    fill_distance_trip(&mut session);
    fill_common(&mut session);
    to_summary(&mut session);

    // invalidate step 1 after reaching the summary
    session.set_value(
        SectionKey::Booking(BookingType::Distance),
        "dropoff_location",
        "",
    );
    let err = session.submit(&FakeBackend::ok()).unwrap_err();
    assert!(matches!(err, SubmitError::Validation(_)));
    assert_eq!(session.step(), Step::Summary);
}

#[test]
fn fare_is_deterministic_across_sessions() {
    let cfg = load_config("{}").unwrap();
    let totals: Vec<String> = (0..3)
        .map(|_| {
            let mut session = Session::new(&cfg);
            fill_distance_trip(&mut session);
            session.fare().expect("fare computable").total.to_string()
        })
        .collect();
    assert_eq!(totals[0], totals[1]);
    assert_eq!(totals[1], totals[2]);
}

#[test]
fn round_trip_doubles_metered_and_flat_fares() {
    let cfg = load_config(
        r#"{
            "routes": [{"id": "r1", "route_name": "A - B", "fixed_price": 40.0}]
        }"#,
    )
    .unwrap();

    // metered
    let mut session = Session::new(&cfg);
    fill_distance_trip(&mut session);
    let one_way = session.fare().unwrap().total;
    session.set_round_trip(true);
    let round = session.fare().unwrap().total;
    assert!((round.raw() - 2.0 * one_way.raw()).abs() < 1e-9);

    // flat rate
    let mut session = Session::new(&cfg);
    session.set_booking_type(BookingType::FlatRate);
    session.set_value(SectionKey::Booking(BookingType::FlatRate), "route", "r1");
    assert_eq!(session.fare().unwrap().total, Money(40.0));
    session.set_round_trip(true);
    assert_eq!(session.fare().unwrap().total, Money(80.0));
}

#[test]
fn vehicle_surcharge_enters_the_fare() {
    let cfg = load_config(
        r#"{
            "pricing": {"base_fare": 0.0, "per_km": 0.0, "per_minute": 0.0, "per_hour": 10.0},
            "customizations": {"enabled_booking_types": ["hourly"]},
            "vehicles": [{"id": "van", "name": "Van", "rate_per_hour": 5.0}]
        }"#,
    )
    .unwrap();
    let mut session = Session::new(&cfg);
    session.set_value(SectionKey::Booking(BookingType::Hourly), "rental_hours", "2");
    assert_eq!(session.fare().unwrap().total, Money(20.0));
    session.select_vehicle("van");
    assert_eq!(session.fare().unwrap().total, Money(30.0));
}

#[test]
fn values_survive_a_booking_type_switch() {
    let cfg = load_config("{}").unwrap();
    let mut session = Session::new(&cfg);
    fill_distance_trip(&mut session);
    let fare_before = session.fare().cloned();

    session.set_booking_type(BookingType::Hourly);
    assert!(session.fare().is_none(), "hourly inputs are still empty");
    session.set_booking_type(BookingType::Distance);
    assert_eq!(
        session.value(SectionKey::Booking(BookingType::Distance), "pickup_location"),
        Some("1 Main St")
    );
    assert_eq!(session.fare().cloned(), fare_before);
}

#[test]
fn switching_to_disabled_type_is_a_noop() {
    let cfg = load_config(
        r#"{"customizations": {"enabled_booking_types": ["distance", "hourly"]}}"#,
    )
    .unwrap();
    let mut session = Session::new(&cfg);
    session.set_booking_type(BookingType::Charter);
    assert_eq!(session.booking_type(), BookingType::Distance);
}

#[test]
fn summary_rows_cover_the_entered_data() {
    let cfg = load_config(
        r#"{"customizations": {"extra_options": [
            {"name": "Child seat", "price": 5.0, "min": 0, "max": 2}
        ]}}"#,
    )
    .unwrap();
    let mut session = Session::new(&cfg);
    fill_distance_trip(&mut session);
    fill_common(&mut session);
    session.add_waypoint("Central Station");
    session.step_extra("Child seat", 1);
    to_summary(&mut session);

    let summary = session.summary();
    let labels: Vec<&str> = summary.iter().map(|r| r.label.as_str()).collect();
    assert!(labels.contains(&"Pickup location"));
    assert!(labels.contains(&"Waypoint 1"));
    assert!(labels.contains(&"Child seat"));
    assert!(labels.contains(&"Total"));

    // edit jumps from the summary land on the owning step
    assert_eq!(session.edit(Step::TripDetails), Step::TripDetails);
}
