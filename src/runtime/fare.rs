//! Fare computation.
//!
//! Distance and duration for metered booking types come from a
//! [`DistanceEstimator`]; the built-in [`HashedEstimator`] derives a stable
//! pseudo-estimate from the address strings so previews are deterministic
//! without a routing engine. Real routing plugs in through the same trait.

use serde::{Deserialize, Serialize};

use crate::config::FormConfig;
use crate::model::{BookingType, Money, Vehicle};

/// Estimated trip length and duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TripEstimate {
    pub km: f64,
    pub minutes: f64,
}

/// Source of distance/duration estimates for metered fares.
pub trait DistanceEstimator {
    fn estimate(&self, pickup: &str, dropoff: &str) -> TripEstimate;
}

/// Deterministic stand-in for a routing engine: an FNV-1a hash of the address
/// pair, folded into plausible ranges (2–60 km at 24–40 km/h). The same
/// addresses always produce the same estimate; the specific values carry no
/// meaning beyond that.
#[derive(Debug, Default, Clone, Copy)]
pub struct HashedEstimator;

impl DistanceEstimator for HashedEstimator {
    fn estimate(&self, pickup: &str, dropoff: &str) -> TripEstimate {
        let h = fnv1a(pickup.as_bytes(), dropoff.as_bytes());
        let km = 2.0 + (h % 5800) as f64 / 100.0;
        let kmh = 24.0 + ((h >> 16) % 1600) as f64 / 100.0;
        let minutes = km / kmh * 60.0;
        TripEstimate { km, minutes }
    }
}

fn fnv1a(a: &[u8], b: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    let mut hash = OFFSET;
    for byte in a.iter().chain(&[0x1f]).chain(b) {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}

/// An itemized fare: the trip itself, the selected vehicle's surcharge, and
/// extra options, with the grand total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fare {
    pub base: Money,
    pub vehicle: Money,
    pub extras: Money,
    pub total: Money,
    pub currency: String,
}

/// Everything the fare rules need, gathered by the session.
pub struct FareInputs<'a> {
    pub booking_type: BookingType,
    pub estimate: Option<TripEstimate>,
    pub rental_hours: Option<f64>,
    pub route_price: Option<Money>,
    pub round_trip: bool,
    pub vehicle: Option<&'a Vehicle>,
    /// `(unit price, quantity)` per selected extra option.
    pub extras: Vec<(Money, u32)>,
}

/// Apply the fare rule for the booking type. Returns `None` while required
/// inputs are missing, which suppresses the fare display.
pub fn compute(cfg: &FormConfig, inputs: FareInputs<'_>) -> Option<Fare> {
    let pricing = &cfg.pricing;

    let (mut base, mut vehicle) = match inputs.booking_type {
        BookingType::Hourly => {
            let hours = inputs.rental_hours.filter(|h| *h > 0.0)?;
            let base = pricing.per_hour * hours;
            let vehicle = inputs
                .vehicle
                .map(|v| v.rate_per_hour * hours)
                .unwrap_or(Money::ZERO);
            (base, vehicle)
        }
        BookingType::FlatRate => (inputs.route_price?, Money::ZERO),
        _ => {
            let est = inputs.estimate?;
            let base = pricing.base_fare + pricing.per_km * est.km + pricing.per_minute * est.minutes;
            let vehicle = inputs
                .vehicle
                .map(|v| v.rate_per_km * est.km)
                .unwrap_or(Money::ZERO);
            (base, vehicle)
        }
    };

    // Round trip doubles the trip cost before extras; hourly has no return leg.
    if inputs.round_trip && inputs.booking_type.supports_round_trip() {
        base = base * 2.0;
        vehicle = vehicle * 2.0;
    }

    let mut extras = Money::ZERO;
    for (price, quantity) in &inputs.extras {
        extras += *price * f64::from(*quantity);
    }

    Some(Fare {
        base,
        vehicle,
        extras,
        total: base + vehicle + extras,
        currency: pricing.currency.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;

    fn inputs(bt: BookingType) -> FareInputs<'static> {
        FareInputs {
            booking_type: bt,
            estimate: None,
            rental_hours: None,
            route_price: None,
            round_trip: false,
            vehicle: None,
            extras: Vec::new(),
        }
    }

    #[test]
    fn hashed_estimator_is_deterministic() {
        let est = HashedEstimator;
        let a = est.estimate("1 Main St", "2 Oak Ave");
        let b = est.estimate("1 Main St", "2 Oak Ave");
        assert_eq!(a, b);
        assert!(a.km >= 2.0 && a.km <= 60.0, "km out of range: {}", a.km);
        assert!(a.minutes > 0.0);
    }

    #[test]
    fn hashed_estimator_separates_fields() {
        // "ab" + "c" must not collide with "a" + "bc"
        let est = HashedEstimator;
        assert_ne!(est.estimate("ab", "c"), est.estimate("a", "bc"));
    }

    #[test]
    fn hourly_fare_is_rate_times_hours() {
        let cfg = load_config(r#"{"pricing": {"per_hour": 50.0}}"#).unwrap();
        let fare = compute(
            &cfg,
            FareInputs {
                rental_hours: Some(3.0),
                ..inputs(BookingType::Hourly)
            },
        )
        .unwrap();
        assert_eq!(fare.total.to_string(), "150.00");
    }

    #[test]
    fn hourly_needs_positive_hours() {
        let cfg = load_config("{}").unwrap();
        assert!(compute(
            &cfg,
            FareInputs {
                rental_hours: Some(0.0),
                ..inputs(BookingType::Hourly)
            }
        )
        .is_none());
        assert!(compute(&cfg, inputs(BookingType::Hourly)).is_none());
    }

    #[test]
    fn metered_fare_needs_an_estimate() {
        let cfg = load_config("{}").unwrap();
        assert!(compute(&cfg, inputs(BookingType::Distance)).is_none());
    }

    #[test]
    fn round_trip_doubles_before_extras() {
        let cfg = load_config(
            r#"{"pricing": {"base_fare": 10.0, "per_km": 1.0, "per_minute": 0.0}}"#,
        )
        .unwrap();
        let one_way = compute(
            &cfg,
            FareInputs {
                estimate: Some(TripEstimate { km: 10.0, minutes: 20.0 }),
                extras: vec![(Money(5.0), 1)],
                ..inputs(BookingType::Distance)
            },
        )
        .unwrap();
        let round = compute(
            &cfg,
            FareInputs {
                estimate: Some(TripEstimate { km: 10.0, minutes: 20.0 }),
                extras: vec![(Money(5.0), 1)],
                round_trip: true,
                ..inputs(BookingType::Distance)
            },
        )
        .unwrap();
        // base 20 -> 40, extras stay 5
        assert_eq!(one_way.total, Money(25.0));
        assert_eq!(round.total, Money(45.0));
    }

    #[test]
    fn round_trip_never_doubles_hourly() {
        let cfg = load_config(r#"{"pricing": {"per_hour": 50.0}}"#).unwrap();
        let fare = compute(
            &cfg,
            FareInputs {
                rental_hours: Some(3.0),
                round_trip: true,
                ..inputs(BookingType::Hourly)
            },
        )
        .unwrap();
        assert_eq!(fare.total, Money(150.0));
    }

    #[test]
    fn flat_rate_uses_route_price() {
        let cfg = load_config("{}").unwrap();
        let fare = compute(
            &cfg,
            FareInputs {
                route_price: Some(Money(80.0)),
                ..inputs(BookingType::FlatRate)
            },
        )
        .unwrap();
        assert_eq!(fare.total, Money(80.0));
        assert!(compute(&cfg, inputs(BookingType::FlatRate)).is_none());
    }
}
