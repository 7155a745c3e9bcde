//! Form assembly: the wizard skeleton.
//!
//! One document body carries every enabled booking type's section, the five
//! step containers, and the shared chrome (type selector, progress bar,
//! navigation). The runtime only toggles visibility; nothing is re-created
//! when the user switches booking types, so entered values survive a switch.

pub mod document;
pub mod fields;
pub mod style;

use crate::config::{FormConfig, ROUTE_FIELD_KEY};
use crate::dom::{Element, el};
use crate::i18n::Translator;
use crate::model::{BookingType, SectionKey};
use crate::runtime::Step;
use crate::script::RUNTIME_VERSION;

use fields::FieldContext;

/// Assemble the form body for one configuration, rendered in its default
/// language.
pub fn assemble(cfg: &FormConfig) -> Element {
    let tr = Translator::new(&cfg.customizations.default_language);

    let mut root = el("div")
        .id("fw-root")
        .class("fw-container")
        .attr("data-version", RUNTIME_VERSION);

    root = root.child(header(cfg, tr));
    if let Some(selector) = language_selector(cfg, tr) {
        root = root.child(selector);
    }
    root = root.child(type_selector(cfg, tr));
    if cfg.customizations.layout.show_progress_bar {
        root = root.child(progress_bar(tr));
    }

    root = root
        .child(step_trip_details(cfg, tr))
        .child(step_vehicle(cfg, tr))
        .child(step_passenger_payment(cfg, tr))
        .child(step_summary(cfg, tr))
        .child(step_confirmation(cfg, tr))
        .child(nav(tr));

    root
}

fn header(cfg: &FormConfig, _tr: Translator<'_>) -> Element {
    let c = &cfg.customizations;
    let mut header = el("header").class("fw-header");
    if c.visibility.logo {
        if let Some(logo) = &c.logo {
            header = header.child(el("img").class("fw-logo").attr("src", logo).attr("alt", ""));
        }
    }
    if c.visibility.title {
        header = header.child(el("h1").class("fw-title").text(&c.title));
    }
    header
}

fn language_selector(cfg: &FormConfig, tr: Translator<'_>) -> Option<Element> {
    let c = &cfg.customizations;
    if c.languages.len() < 2 || !c.visibility.language_selector {
        return None;
    }
    let mut select = el("select")
        .id("fw-language")
        .class("fw-language")
        .attr("aria-label", tr.tr("language"));
    for lang in &c.languages {
        let mut option = el("option").attr("value", lang).text(lang.to_uppercase());
        if *lang == c.default_language {
            option = option.flag("selected");
        }
        select = select.child(option);
    }
    Some(select)
}

/// Booking-type tabs. Always assembled (the runtime drives it); hidden when
/// only one type is enabled or the visibility flag disables it.
fn type_selector(cfg: &FormConfig, tr: Translator<'_>) -> Element {
    let c = &cfg.customizations;
    let mut selector = el("div").id("fw-type-selector").class("fw-type-selector");
    if c.enabled_types.len() < 2 || !c.visibility.booking_type_selector {
        selector = selector.class("fw-hidden");
    }
    for (index, bt) in c.enabled_types.iter().enumerate() {
        let mut btn = el("button")
            .attr("type", "button")
            .class("fw-type-btn")
            .attr("data-booking-type", bt.key())
            .text(tr.tr(&bt.label_key()));
        if index == 0 {
            btn = btn.class("fw-selected");
        }
        selector = selector.child(btn);
    }
    selector
}

/// Four user-facing progress segments; confirmation is not one of them.
fn progress_bar(tr: Translator<'_>) -> Element {
    let steps = [
        Step::TripDetails,
        Step::Vehicle,
        Step::PassengerPayment,
        Step::Summary,
    ];
    let mut bar = el("ol").id("fw-progress").class("fw-progress");
    for step in steps {
        let mut item = el("li")
            .class("fw-progress-step")
            .attr("data-step", step.number().to_string())
            .text(tr.tr(step.title_key()));
        if step == Step::TripDetails {
            item = item.class("fw-active");
        }
        bar = bar.child(item);
    }
    bar
}

fn step_container(step: Step, title: Option<&str>) -> Element {
    let mut container = el("div")
        .id(format!("fw-step-{}", step.number()))
        .class("fw-step")
        .attr("data-step", step.number().to_string());
    if step != Step::TripDetails {
        container = container.class("fw-hidden");
    }
    if let Some(title) = title {
        container = container.child(el("h2").class("fw-step-title").text(title));
    }
    container
}

fn step_title<'a>(cfg: &FormConfig, tr: Translator<'a>, step: Step) -> Option<&'a str> {
    cfg.customizations
        .layout
        .show_step_titles
        .then(|| tr.tr(step.title_key()))
}

fn step_trip_details(cfg: &FormConfig, tr: Translator<'_>) -> Element {
    let mut step = step_container(Step::TripDetails, step_title(cfg, tr, Step::TripDetails));
    for (index, bt) in cfg.customizations.enabled_types.iter().enumerate() {
        step = step.child(booking_section(cfg, tr, bt, index == 0));
    }
    if let Some(extras) = extras_cluster(cfg, tr) {
        step = step.child(extras);
    }
    step = step.child(
        el("div")
            .id("fw-fare")
            .class("fw-fare fw-hidden")
            .child(el("span").text(tr.tr("fare_estimate")))
            .child(el("span").id("fw-fare-amount")),
    );
    step.child(
        el("div")
            .id("fw-step-error")
            .class("fw-error fw-hidden"),
    )
}

/// One booking type's field group. Only the active one is visible; the rest
/// keep their values while hidden.
fn booking_section(cfg: &FormConfig, tr: Translator<'_>, bt: BookingType, active: bool) -> Element {
    let section_key = SectionKey::Booking(bt);
    let ctx = FieldContext {
        cfg,
        section: section_key,
        tr,
    };

    let mut section = el("section")
        .class("fw-section")
        .attr("data-booking-type", bt.key());
    section = if active {
        section.class("fw-active")
    } else {
        section.class("fw-hidden")
    };

    if bt == BookingType::FlatRate {
        section = section.child(flat_rate_routes(cfg, tr));
    }

    let supports_waypoints = cfg.waypoints_supported(bt);
    let anchor = &cfg.customizations.waypoints.display_after_field;
    let mut container_placed = false;

    for field in cfg.structure.section(section_key) {
        section = section.child(fields::render_field(field, &ctx));
        if supports_waypoints && !container_placed && !field.key.is_empty() && field.key == *anchor
        {
            section = section.child(waypoint_container(bt));
            container_placed = true;
        }
    }
    // The anchor field may be absent from this section; the container still
    // has to exist so the add button is never orphaned.
    if supports_waypoints && !container_placed {
        section = section.child(waypoint_container(bt));
    }

    if bt.supports_round_trip() {
        section = section.child(
            el("label")
                .class("fw-round-trip")
                .child(
                    el("input")
                        .id(format!("fw-round-trip-{}", bt.key()))
                        .attr("type", "checkbox")
                        .class("fw-round-trip-toggle")
                        .attr("data-booking-type", bt.key()),
                )
                .child(el("span").text(format!(" {}", tr.tr("round_trip")))),
        );
    }

    if bt == BookingType::Hourly {
        let mut notes = el("div").class("fw-hourly-notes");
        for note in &cfg.customizations.hourly_notes {
            notes = notes.child(el("p").text(note));
        }
        section = section.child(notes).child(
            el("div")
                .class("fw-field")
                .child(
                    el("label")
                        .attr("for", "fw-hourly-notes-input")
                        .text(tr.tr("notes"))
                        .child(
                            el("span")
                                .class("fw-optional")
                                .text(format!(" ({})", tr.tr("optional"))),
                        ),
                )
                .child(
                    el("textarea")
                        .id("fw-hourly-notes-input")
                        .attr("name", "notes")
                        .attr("rows", "2"),
                ),
        );
    }

    section
}

/// Injected ahead of the flat-rate section's fields: the route picker the
/// fare rule reads.
fn flat_rate_routes(cfg: &FormConfig, tr: Translator<'_>) -> Element {
    let mut select = el("select")
        .id("fw-flat-rate-route")
        .attr("name", ROUTE_FIELD_KEY)
        .child(el("option").attr("value", "").text(tr.tr("select_route")));
    for route in &cfg.routes {
        select = select.child(
            el("option")
                .attr("value", &route.id)
                .text(&route.route_name),
        );
    }
    el("div")
        .class("fw-field")
        .attr("data-key", ROUTE_FIELD_KEY)
        .child(
            el("label")
                .attr("for", "fw-flat-rate-route")
                .text(tr.tr("route"))
                .child(el("span").class("fw-req").text("*")),
        )
        .child(el("div").class("fw-control-row").child(select))
}

fn waypoint_container(bt: BookingType) -> Element {
    el("div")
        .id(format!("fw-waypoints-{}", bt.key()))
        .class("fw-waypoints")
        .attr("data-booking-type", bt.key())
}

fn extras_cluster(cfg: &FormConfig, tr: Translator<'_>) -> Option<Element> {
    let enabled: Vec<_> = cfg
        .customizations
        .extra_options
        .iter()
        .filter(|o| o.enabled)
        .collect();
    if enabled.is_empty() {
        return None;
    }
    let currency = &cfg.pricing.currency;
    let mut cluster = el("div")
        .id("fw-extras")
        .class("fw-extras")
        .child(el("h3").text(tr.tr("extra_options")));
    for option in enabled {
        cluster = cluster.child(
            el("div")
                .class("fw-extra")
                .attr("data-extra", &option.name)
                .attr("data-min", option.min.to_string())
                .attr("data-max", option.max.to_string())
                .child(
                    el("span").text(format!("{} ({}{})", option.name, currency, option.price)),
                )
                .child(
                    el("div")
                        .class("fw-stepper")
                        .child(
                            el("button")
                                .attr("type", "button")
                                .class("fw-extra-dec")
                                .text("−"),
                        )
                        .child(el("span").class("fw-extra-qty").text("0"))
                        .child(
                            el("button")
                                .attr("type", "button")
                                .class("fw-extra-inc")
                                .text("+"),
                        ),
                ),
        );
    }
    Some(cluster)
}

fn step_vehicle(cfg: &FormConfig, tr: Translator<'_>) -> Element {
    let mut step = step_container(Step::Vehicle, step_title(cfg, tr, Step::Vehicle));
    let currency = &cfg.pricing.currency;
    let mut grid = el("div").class("fw-vehicles");
    for vehicle in &cfg.vehicles {
        let mut card = el("div")
            .class("fw-vehicle-card")
            .attr("data-vehicle-id", &vehicle.id)
            .child(el("h3").text(&vehicle.name));
        if !vehicle.model.is_empty() {
            card = card.child(el("div").class("fw-vehicle-meta").text(&vehicle.model));
        }
        card = card.child(el("div").class("fw-vehicle-meta").text(format!(
            "{} {}, {} {}",
            vehicle.passengers,
            tr.tr("passengers"),
            vehicle.luggage,
            tr.tr("luggage"),
        )));
        if vehicle.rate_per_km.raw() > 0.0 {
            card = card.child(
                el("div")
                    .class("fw-vehicle-meta")
                    .text(format!("+{currency}{}/km", vehicle.rate_per_km)),
            );
        }
        grid = grid.child(card);
    }
    step.child(grid).child(
        el("div")
            .id("fw-vehicle-error")
            .class("fw-error fw-hidden"),
    )
}

fn step_passenger_payment(cfg: &FormConfig, tr: Translator<'_>) -> Element {
    let mut step = step_container(
        Step::PassengerPayment,
        step_title(cfg, tr, Step::PassengerPayment),
    );
    let ctx = FieldContext {
        cfg,
        section: SectionKey::Common,
        tr,
    };
    for field in &cfg.structure.common {
        step = step.child(fields::render_field(field, &ctx));
    }

    let offered = cfg.offered_payment_categories();
    if !offered.is_empty() {
        step = step.child(el("h3").text(tr.tr("payment_method")));
        let initial = cfg.initial_payment();
        let mut payments = el("div").id("fw-payments").class("fw-payments");
        for category in offered {
            let mut btn = el("button")
                .attr("type", "button")
                .class("fw-payment-btn")
                .attr("data-payment", category.key())
                .text(tr.tr(category.label_key()));
            if Some(category) == initial {
                btn = btn.class("fw-selected");
            }
            payments = payments.child(btn);
        }
        step = step.child(payments);
    }
    step.child(
        el("div")
            .id("fw-passenger-error")
            .class("fw-error fw-hidden"),
    )
}

fn step_summary(cfg: &FormConfig, tr: Translator<'_>) -> Element {
    step_container(Step::Summary, step_title(cfg, tr, Step::Summary))
        .child(el("div").id("fw-summary"))
        .child(el("div").id("fw-submit-error").class("fw-error fw-hidden"))
        .child(
            el("button")
                .attr("type", "button")
                .id("fw-submit")
                .class("fw-btn")
                .text(tr.tr("book_now")),
        )
}

fn step_confirmation(_cfg: &FormConfig, tr: Translator<'_>) -> Element {
    el("div")
        .id("fw-step-5")
        .class("fw-step fw-hidden")
        .attr("data-step", "5")
        .child(el("h2").text(tr.tr("confirmation_title")))
        .child(el("p").text(tr.tr("confirmation_message")))
}

fn nav(tr: Translator<'_>) -> Element {
    el("div")
        .class("fw-nav")
        .child(
            el("button")
                .attr("type", "button")
                .id("fw-back")
                .class("fw-btn fw-btn-secondary fw-hidden")
                .text(tr.tr("back")),
        )
        .child(
            el("button")
                .attr("type", "button")
                .id("fw-next")
                .class("fw-btn")
                .text(tr.tr("next")),
        )
}
