//! Payment dispatch and the external booking backend seam.
//!
//! The crate never talks to a payment provider itself: submission goes
//! through [`BookingBackend`], implemented by the embedding service. The
//! compiled client script calls the equivalent HTTP endpoints.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::errors::BackendError;
use crate::model::{BookingType, Money, PaymentCategory};

/// Identifier of a created booking record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingId(pub String);

/// Provider URL the top-level page is redirected to for checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedirectUrl(pub String);

/// The two checkout flows that need a provider redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutProvider {
    CreditCard,
    PayPal,
}

impl CheckoutProvider {
    /// Cash settles without a provider.
    pub fn for_category(category: PaymentCategory) -> Option<CheckoutProvider> {
        match category {
            PaymentCategory::CreditCard => Some(CheckoutProvider::CreditCard),
            PaymentCategory::PayPal => Some(CheckoutProvider::PayPal),
            PaymentCategory::Cash => None,
        }
    }
}

/// Everything the backend needs to create a booking record.
#[derive(Debug, Clone, Serialize)]
pub struct BookingRequest {
    pub booking_type: BookingType,
    /// Collected values of visible, answered fields, keyed section → field.
    pub values: BTreeMap<String, BTreeMap<String, String>>,
    pub waypoints: Vec<String>,
    pub return_waypoints: Vec<String>,
    pub round_trip: bool,
    pub extras: BTreeMap<String, u32>,
    pub vehicle_id: Option<String>,
    pub payment: Option<PaymentCategory>,
    pub fare: Option<Money>,
}

/// The submission contract: create a booking, then (for card/PayPal)
/// exchange it for a provider redirect. One attempt per user action; no
/// retries happen below this trait.
pub trait BookingBackend {
    fn create_booking(&self, request: &BookingRequest) -> Result<BookingId, BackendError>;

    fn begin_checkout(
        &self,
        booking: &BookingId,
        amount: Money,
        provider: CheckoutProvider,
    ) -> Result<RedirectUrl, BackendError>;
}

/// What a successful submission leads to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Cash (or no payment configured): the wizard shows its confirmation step.
    Confirmed(BookingId),
    /// Card/PayPal: the top-level page navigates to the provider.
    Redirect { booking: BookingId, url: RedirectUrl },
}
