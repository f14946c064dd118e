//! VCALENDAR and VEVENT components (RFC 5545 §3.4, §3.6.1).

use coursecal_core::constants::DEFAULT_PRODID;

use super::Property;
use super::names;

/// The two component types the export writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Calendar,
    Event,
}

impl ComponentKind {
    /// Name used on `BEGIN:` and `END:` lines.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Calendar => "VCALENDAR",
            Self::Event => "VEVENT",
        }
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A component with its properties and nested components, both kept in
/// insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub kind: ComponentKind,
    pub properties: Vec<Property>,
    pub children: Vec<Component>,
}

impl Component {
    #[must_use]
    pub fn new(kind: ComponentKind) -> Self {
        Self {
            kind,
            properties: Vec::new(),
            children: Vec::new(),
        }
    }

    /// An empty VEVENT.
    #[must_use]
    pub fn event() -> Self {
        Self::new(ComponentKind::Event)
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.kind.as_str()
    }

    pub fn add_property(&mut self, prop: Property) {
        self.properties.push(prop);
    }

    /// First property called `name`, compared case-insensitively.
    #[must_use]
    pub fn get_property(&self, name: &str) -> Option<&Property> {
        self.properties
            .iter()
            .find(|prop| prop.name.eq_ignore_ascii_case(name))
    }
}

/// A VCALENDAR document.
///
/// `new` writes `VERSION:2.0`, the given `PRODID` and `CALSCALE:GREGORIAN`;
/// events are serialized in the order they were added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ICalendar {
    pub root: Component,
}

impl ICalendar {
    #[must_use]
    pub fn new(prodid: impl Into<String>) -> Self {
        let mut root = Component::new(ComponentKind::Calendar);
        root.add_property(Property::text(names::VERSION, "2.0"));
        root.add_property(Property::text(names::PRODID, prodid));
        root.add_property(Property::text(names::CALSCALE, "GREGORIAN"));
        Self { root }
    }

    /// Adds a calendar-level property such as `X-WR-CALNAME`.
    pub fn add_property(&mut self, prop: Property) {
        self.root.add_property(prop);
    }

    pub fn add_event(&mut self, event: Component) {
        self.root.children.push(event);
    }

    #[must_use]
    pub fn events(&self) -> &[Component] {
        &self.root.children
    }
}

impl Default for ICalendar {
    fn default() -> Self {
        Self::new(DEFAULT_PRODID)
    }
}
