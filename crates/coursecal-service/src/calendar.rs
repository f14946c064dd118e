//! Conversion of assembled events into an iCalendar document.

use chrono::{DateTime, Utc};
use coursecal_core::config::CalendarConfig;
use coursecal_core::constants::UID_DOMAIN;
use coursecal_rfc::rfc::ical::build::serialize;
use coursecal_rfc::rfc::ical::core::{Component, ICalendar, Parameter, Property, names};
use uuid::Uuid;

use crate::timetable::{Assembly, EventDescriptor};

/// Calendar-level output settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarOptions {
    pub prodid: String,
    /// `X-WR-CALNAME`, omitted when `None`.
    pub name: Option<String>,
    /// `X-WR-TIMEZONE`, the civic timezone the timetable was placed in.
    pub timezone: String,
    /// Written as `DTSTAMP` on every event.
    pub dtstamp: DateTime<Utc>,
    /// `LANGUAGE` parameter on `SUMMARY` and `LOCATION`.
    pub language: Option<String>,
}

impl CalendarOptions {
    #[must_use]
    pub fn from_config(config: &CalendarConfig, dtstamp: DateTime<Utc>) -> Self {
        Self {
            prodid: config.prodid.clone(),
            name: config.name.clone(),
            timezone: config.timezone.clone(),
            dtstamp,
            language: config.language.clone(),
        }
    }
}

/// `UID` value for an event identifier.
#[must_use]
pub fn uid_value(uid: &Uuid) -> String {
    format!("{uid}@{UID_DOMAIN}")
}

/// Builds the VEVENT for one assembled event.
#[must_use]
pub fn event_component(event: &EventDescriptor, options: &CalendarOptions) -> Component {
    let mut component = Component::event();
    component.add_property(Property::text(names::UID, uid_value(&event.uid)));
    component.add_property(Property::utc_datetime(names::DTSTAMP, options.dtstamp));
    component.add_property(Property::utc_datetime(names::DTSTART, event.start));
    component.add_property(Property::utc_datetime(names::DTEND, event.end));
    component.add_property(Property::recur(
        names::RRULE,
        event.recurrence.rrule_value(),
    ));
    for exception in &event.recurrence.exception_instants {
        component.add_property(Property::utc_datetime(names::EXDATE, *exception));
    }

    component.add_property(localized_text(names::SUMMARY, &event.title, options));
    if !event.location.is_empty() {
        component.add_property(localized_text(names::LOCATION, &event.location, options));
    }

    component
}

fn localized_text(name: &str, value: &str, options: &CalendarOptions) -> Property {
    let mut prop = Property::text(name, value);
    if let Some(language) = &options.language {
        prop.set_param(Parameter::new(names::LANGUAGE, language.as_str()));
    }
    prop
}

/// ## Summary
/// Builds the calendar for an assembly, one VEVENT per event in order.
#[tracing::instrument(skip_all, fields(events = assembly.events.len()))]
#[must_use]
pub fn build_calendar(assembly: &Assembly, options: &CalendarOptions) -> ICalendar {
    let mut ical = ICalendar::new(options.prodid.as_str());
    if let Some(name) = &options.name {
        ical.add_property(Property::text(names::X_WR_CALNAME, name.as_str()));
    }
    ical.add_property(Property::text(
        names::X_WR_TIMEZONE,
        options.timezone.as_str(),
    ));

    for event in &assembly.events {
        ical.add_event(event_component(event, options));
    }

    tracing::debug!("Built calendar");
    ical
}

/// Renders an assembly as RFC 5545 text.
#[must_use]
pub fn render(assembly: &Assembly, options: &CalendarOptions) -> String {
    serialize(&build_calendar(assembly, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timetable::RecurrenceDescriptor;
    use chrono::{TimeZone, Weekday};

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn options() -> CalendarOptions {
        CalendarOptions {
            prodid: "-//Test//Test//EN".to_string(),
            name: Some("2025 春季课表".to_string()),
            timezone: "Asia/Shanghai".to_string(),
            dtstamp: utc(2025, 2, 20, 12, 0),
            language: None,
        }
    }

    fn event() -> EventDescriptor {
        EventDescriptor {
            uid: Uuid::nil(),
            title: "概率论与数理统计(B) - 刘玉婷".to_string(),
            location: "思源楼 SY207".to_string(),
            start: utc(2025, 3, 12, 2, 10),
            end: utc(2025, 3, 12, 4, 0),
            recurrence: RecurrenceDescriptor {
                weekday: Weekday::Wed,
                first_start: utc(2025, 3, 12, 2, 10),
                weekly_repeat_count: 7,
                exception_instants: vec![
                    utc(2025, 3, 19, 2, 10),
                    utc(2025, 4, 2, 2, 10),
                    utc(2025, 4, 16, 2, 10),
                ],
            },
        }
    }

    #[test]
    fn event_properties() {
        let component = event_component(&event(), &options());

        assert_eq!(
            component.get_property("UID").unwrap().raw_value,
            "00000000-0000-0000-0000-000000000000@coursecal.local"
        );
        assert_eq!(
            component
                .properties
                .iter()
                .filter(|prop| prop.name == "EXDATE")
                .count(),
            3
        );
        assert_eq!(
            component.get_property("DTSTART").unwrap().raw_value,
            "20250312T021000Z"
        );
        assert_eq!(
            component.get_property("DTEND").unwrap().raw_value,
            "20250312T040000Z"
        );
        assert_eq!(
            component.get_property("RRULE").unwrap().raw_value,
            "FREQ=WEEKLY;BYDAY=WE;COUNT=7"
        );
    }

    #[test]
    fn rendered_document() {
        let assembly = Assembly {
            events: vec![event()],
            skipped: Vec::new(),
        };
        let output = render(&assembly, &options());

        assert!(output.starts_with("BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//Test//Test//EN\r\n"));
        assert!(output.contains("X-WR-CALNAME:2025 春季课表\r\n"));
        assert!(output.contains("X-WR-TIMEZONE:Asia/Shanghai\r\n"));
        assert!(output.contains("DTSTAMP:20250220T120000Z\r\n"));
        assert!(output.contains("EXDATE:20250319T021000Z\r\n"));
        assert!(output.contains("EXDATE:20250402T021000Z\r\n"));
        assert!(output.contains("EXDATE:20250416T021000Z\r\n"));
        assert!(output.contains("SUMMARY:概率论与数理统计(B) - 刘玉婷\r\n"));
        assert!(output.contains("LOCATION:思源楼 SY207\r\n"));
        assert!(output.ends_with("END:VEVENT\r\nEND:VCALENDAR\r\n"));
    }

    #[test]
    fn text_is_escaped_and_language_tagged() {
        let mut ev = event();
        ev.title = "Seminar; part 1, intro".to_string();
        ev.location = String::new();
        let mut opts = options();
        opts.language = Some("zh-CN".to_string());
        opts.name = None;

        let output = render(
            &Assembly {
                events: vec![ev],
                skipped: Vec::new(),
            },
            &opts,
        );

        assert!(output.contains("SUMMARY;LANGUAGE=zh-CN:Seminar\\; part 1\\, intro\r\n"));
        assert!(!output.contains("LOCATION"));
        assert!(!output.contains("X-WR-CALNAME"));
    }

    #[test]
    fn long_lines_are_folded() {
        let mut ev = event();
        ev.title = "高等数学".repeat(12);
        let output = render(
            &Assembly {
                events: vec![ev.clone()],
                skipped: Vec::new(),
            },
            &options(),
        );

        for line in output.split("\r\n") {
            assert!(line.len() <= 75, "line too long: {line}");
        }
        assert!(output.replace("\r\n ", "").contains(&format!("SUMMARY:{}\r\n", ev.title)));
    }
}
