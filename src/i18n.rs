//! Embedded translation catalogs and key lookup with English fallback.
//!
//! Deliberately minimal: a flat key → string table per language, looked up at
//! render time. Unknown keys fall back to English, then to the key itself, so
//! a missing translation never blocks rendering.

type Catalog = &'static [(&'static str, &'static str)];

const EN: Catalog = &[
    ("select_option", "Select an option"),
    ("select_route", "Select a route"),
    ("route", "Route"),
    ("add_waypoint", "Add waypoint"),
    ("remove", "Remove"),
    ("waypoint", "Waypoint"),
    ("optional", "Optional"),
    ("next", "Next"),
    ("back", "Back"),
    ("edit", "Edit"),
    ("book_now", "Book now"),
    ("try_again", "Try again"),
    ("date", "Date"),
    ("time", "Time"),
    ("step_trip_details", "Trip details"),
    ("step_vehicle", "Vehicle"),
    ("step_passenger", "Passenger"),
    ("step_summary", "Summary"),
    ("confirmation_title", "Booking confirmed"),
    ("confirmation_message", "Thank you! Your booking has been received."),
    ("fill_required", "Please fill in all required fields."),
    ("select_vehicle", "Please select a vehicle."),
    ("submission_failed", "Something went wrong. Please try again."),
    ("fare_estimate", "Estimated fare"),
    ("round_trip", "Round trip"),
    ("extra_options", "Extra options"),
    ("notes", "Notes"),
    ("payment_method", "Payment method"),
    ("pay_cash", "Cash"),
    ("pay_credit_card", "Credit card"),
    ("pay_paypal", "PayPal"),
    ("language", "Language"),
    ("passengers", "Passengers"),
    ("luggage", "Luggage"),
    ("booking_distance", "Distance"),
    ("booking_hourly", "Hourly"),
    ("booking_flat_rate", "Flat rate"),
    ("booking_on_demand", "On demand"),
    ("booking_charter", "Charter"),
    ("booking_airport_transfer", "Airport transfer"),
    ("booking_event_shuttle", "Event shuttle"),
    ("placeholder_pickup_location", "Enter pickup address"),
    ("placeholder_dropoff_location", "Enter drop-off address"),
    ("placeholder_rental_hours", "Number of hours"),
];

const DE: Catalog = &[
    ("select_option", "Bitte auswählen"),
    ("select_route", "Route auswählen"),
    ("route", "Route"),
    ("add_waypoint", "Zwischenstopp hinzufügen"),
    ("remove", "Entfernen"),
    ("waypoint", "Zwischenstopp"),
    ("optional", "Optional"),
    ("next", "Weiter"),
    ("back", "Zurück"),
    ("edit", "Bearbeiten"),
    ("book_now", "Jetzt buchen"),
    ("try_again", "Erneut versuchen"),
    ("date", "Datum"),
    ("time", "Uhrzeit"),
    ("step_trip_details", "Fahrtdetails"),
    ("step_vehicle", "Fahrzeug"),
    ("step_passenger", "Fahrgast"),
    ("step_summary", "Übersicht"),
    ("confirmation_title", "Buchung bestätigt"),
    ("confirmation_message", "Vielen Dank! Ihre Buchung ist eingegangen."),
    ("fill_required", "Bitte füllen Sie alle Pflichtfelder aus."),
    ("select_vehicle", "Bitte wählen Sie ein Fahrzeug."),
    ("fare_estimate", "Voraussichtlicher Preis"),
    ("round_trip", "Hin- und Rückfahrt"),
    ("extra_options", "Extras"),
    ("notes", "Hinweise"),
    ("payment_method", "Zahlungsart"),
    ("pay_cash", "Barzahlung"),
    ("pay_credit_card", "Kreditkarte"),
    ("booking_distance", "Strecke"),
    ("booking_hourly", "Stundenweise"),
    ("booking_flat_rate", "Festpreis"),
    ("booking_airport_transfer", "Flughafentransfer"),
    ("placeholder_pickup_location", "Abholadresse eingeben"),
    ("placeholder_dropoff_location", "Zieladresse eingeben"),
];

const FR: Catalog = &[
    ("select_option", "Sélectionnez une option"),
    ("select_route", "Sélectionnez un trajet"),
    ("add_waypoint", "Ajouter un arrêt"),
    ("remove", "Supprimer"),
    ("optional", "Facultatif"),
    ("next", "Suivant"),
    ("back", "Retour"),
    ("edit", "Modifier"),
    ("book_now", "Réserver"),
    ("try_again", "Réessayer"),
    ("step_trip_details", "Détails du trajet"),
    ("step_vehicle", "Véhicule"),
    ("step_passenger", "Passager"),
    ("step_summary", "Récapitulatif"),
    ("confirmation_title", "Réservation confirmée"),
    ("fill_required", "Veuillez remplir tous les champs obligatoires."),
    ("fare_estimate", "Tarif estimé"),
    ("round_trip", "Aller-retour"),
    ("payment_method", "Mode de paiement"),
    ("pay_cash", "Espèces"),
    ("pay_credit_card", "Carte bancaire"),
    ("booking_distance", "Distance"),
    ("booking_hourly", "À l'heure"),
    ("booking_flat_rate", "Forfait"),
];

const ES: Catalog = &[
    ("select_option", "Seleccione una opción"),
    ("add_waypoint", "Añadir parada"),
    ("remove", "Eliminar"),
    ("optional", "Opcional"),
    ("next", "Siguiente"),
    ("back", "Atrás"),
    ("edit", "Editar"),
    ("book_now", "Reservar"),
    ("try_again", "Reintentar"),
    ("step_trip_details", "Detalles del viaje"),
    ("step_vehicle", "Vehículo"),
    ("step_passenger", "Pasajero"),
    ("step_summary", "Resumen"),
    ("confirmation_title", "Reserva confirmada"),
    ("fill_required", "Complete todos los campos obligatorios."),
    ("fare_estimate", "Tarifa estimada"),
    ("round_trip", "Ida y vuelta"),
    ("payment_method", "Forma de pago"),
    ("pay_cash", "Efectivo"),
    ("booking_distance", "Distancia"),
    ("booking_hourly", "Por horas"),
];

fn catalog(lang: &str) -> Option<Catalog> {
    match lang {
        "en" => Some(EN),
        "de" => Some(DE),
        "fr" => Some(FR),
        "es" => Some(ES),
        _ => None,
    }
}

fn lookup(lang: &str, key: &str) -> Option<&'static str> {
    catalog(lang)?
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
}

/// The complete key set for one language, English-backed: every English key
/// is present, overlaid with the language's own entries. This is what the
/// runtime payload ships per configured language.
pub fn merged_catalog(lang: &str) -> std::collections::BTreeMap<&'static str, &'static str> {
    let mut map: std::collections::BTreeMap<_, _> = EN.iter().copied().collect();
    if let Some(entries) = catalog(lang) {
        for (key, value) in entries {
            map.insert(*key, *value);
        }
    }
    map
}

/// Translates keys for one active language.
#[derive(Debug, Clone, Copy)]
pub struct Translator<'a> {
    lang: &'a str,
}

impl<'a> Translator<'a> {
    pub fn new(lang: &'a str) -> Translator<'a> {
        Translator { lang }
    }

    pub fn lang(&self) -> &'a str {
        self.lang
    }

    /// Look up a key: active language, then English, then the key itself.
    pub fn tr<'k>(&self, key: &'k str) -> &'k str {
        lookup(self.lang, key)
            .or_else(|| lookup("en", key))
            .unwrap_or(key)
    }

    /// Like [`tr`](Self::tr) but reports whether the key exists at all.
    pub fn tr_opt(&self, key: &str) -> Option<&'static str> {
        lookup(self.lang, key).or_else(|| lookup("en", key))
    }

    /// Placeholder resolution: explicit placeholder, then a
    /// `placeholder_<key>` catalog entry, then `"Enter " + lowercase(label)`.
    pub fn placeholder_for(&self, key: &str, label: &str, explicit: Option<&str>) -> String {
        if let Some(p) = explicit {
            if !p.is_empty() {
                return p.to_string();
            }
        }
        if !key.is_empty() {
            if let Some(found) = self.tr_opt(&format!("placeholder_{key}")) {
                return found.to_string();
            }
        }
        format!("Enter {}", label.to_lowercase())
    }
}
