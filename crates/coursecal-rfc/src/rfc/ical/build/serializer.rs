//! Component tree to RFC 5545 text.

use super::escape::{escape_param_value, escape_text};
use super::fold::fold_line;
use crate::rfc::ical::core::{Component, ComponentKind, ICalendar, Property, Value, names};

/// Calendar properties in the order they are written.
const CALENDAR_ORDER: &[&str] = &[
    names::VERSION,
    names::PRODID,
    names::CALSCALE,
    names::X_WR_CALNAME,
    names::X_WR_TIMEZONE,
];

/// Event properties in the order they are written.
const EVENT_ORDER: &[&str] = &[
    names::UID,
    names::DTSTAMP,
    names::DTSTART,
    names::DTEND,
    names::RRULE,
    names::EXDATE,
    names::SUMMARY,
    names::LOCATION,
];

/// Serializes a whole calendar.
#[must_use]
pub fn serialize(ical: &ICalendar) -> String {
    serialize_component(&ical.root)
}

/// ## Summary
/// Serializes `component` and everything nested in it.
///
/// Known properties are written in a fixed order and unknown ones after them
/// in insertion order, so identical input always gives identical bytes.
/// Children keep insertion order.
#[must_use]
pub fn serialize_component(component: &Component) -> String {
    let mut out = String::new();
    write_component(&mut out, component);
    out
}

fn write_component(out: &mut String, component: &Component) {
    out.push_str(&fold_line(&format!("BEGIN:{}", component.name())));
    for prop in ordered_properties(component) {
        out.push_str(&serialize_property(prop));
    }
    for child in &component.children {
        write_component(out, child);
    }
    out.push_str(&fold_line(&format!("END:{}", component.name())));
}

/// One folded, CRLF-terminated content line.
#[must_use]
pub fn serialize_property(prop: &Property) -> String {
    let mut line = prop.name.clone();
    for param in &prop.params {
        let values: Vec<String> = param
            .values
            .iter()
            .map(|value| escape_param_value(value))
            .collect();
        line.push_str(&format!(";{}={}", param.name, values.join(",")));
    }

    line.push(':');
    match &prop.value {
        Value::Text(text) => line.push_str(&escape_text(text)),
        Value::DateTime(_) | Value::Recur(_) => line.push_str(&prop.raw_value),
    }

    fold_line(&line)
}

fn ordered_properties(component: &Component) -> Vec<&Property> {
    let order = match component.kind {
        ComponentKind::Calendar => CALENDAR_ORDER,
        ComponentKind::Event => EVENT_ORDER,
    };

    let mut props: Vec<&Property> = component.properties.iter().collect();
    // Stable, so repeated properties such as EXDATE keep their order
    props.sort_by_key(|prop| {
        order
            .iter()
            .position(|name| prop.name.eq_ignore_ascii_case(name))
            .unwrap_or(order.len())
    });
    props
}
