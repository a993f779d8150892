//! Events — named, immutable time windows that counterfactuals are built around.
//!
//! Purpose
//! -------
//! Represent the external event whose effect an analyst wants to measure, and
//! a small collection type for working with several events at once.
//!
//! Key behaviors
//! -------------
//! - [`Event::new`] normalizes both boundaries to timezone-naive instants and
//!   rejects windows with `start >= end`.
//! - Events are immutable after construction; fields are private and exposed
//!   through accessors.
//! - [`EventSet`] answers overlap, range-filter, and lookup-by-name queries.
//!
//! Invariants & assumptions
//! ------------------------
//! - `start < end` for every constructed [`Event`].
//! - The event name doubles as the deterministic seed source for forecast
//!   noise, so two events with the same name reproduce the same noise path.
//!
//! Conventions
//! -----------
//! - `contains` and `overlaps` treat both boundaries as inclusive.
use std::collections::BTreeMap;

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::counterfactual::{
    core::{
        timestamps::{IntoNaiveTimestamp, parse_timestamp},
        validation::validate_event_window,
    },
    errors::{CFResult, CounterfactualError},
};

/// Event — a named window `[start, end]` with optional metadata.
///
/// Fields
/// ------
/// - `start`, `end`: timezone-naive boundaries, `start < end`.
/// - `name`: identifier used for output column naming and noise seeding.
/// - `metadata`: free-form string attributes carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EventRecord")]
pub struct Event {
    start: NaiveDateTime,
    end: NaiveDateTime,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<BTreeMap<String, String>>,
}

// Deserialization goes through `Event::new` so the window invariant holds.
#[derive(Deserialize)]
struct EventRecord {
    start: NaiveDateTime,
    end: NaiveDateTime,
    name: String,
    #[serde(default)]
    metadata: Option<BTreeMap<String, String>>,
}

impl TryFrom<EventRecord> for Event {
    type Error = CounterfactualError;

    fn try_from(record: EventRecord) -> CFResult<Self> {
        let event = Event::new(record.start, record.end, record.name)?;
        Ok(Event { metadata: record.metadata, ..event })
    }
}

impl Event {
    /// Construct a validated event.
    ///
    /// # Errors
    /// Returns [`CounterfactualError::InvalidEventWindow`] if `start >= end`
    /// after normalization.
    pub fn new(
        start: impl IntoNaiveTimestamp, end: impl IntoNaiveTimestamp, name: impl Into<String>,
    ) -> CFResult<Self> {
        let start = start.into_naive();
        let end = end.into_naive();
        let name = name.into();
        validate_event_window(&name, start, end)?;
        Ok(Event { start, end, name, metadata: None })
    }

    /// Construct an event from timestamp strings.
    ///
    /// # Errors
    /// - [`CounterfactualError::InvalidTimestamp`] if either boundary fails to parse.
    /// - [`CounterfactualError::InvalidEventWindow`] if `start >= end`.
    pub fn parse(start: &str, end: &str, name: impl Into<String>) -> CFResult<Self> {
        Event::new(parse_timestamp(start)?, parse_timestamp(end)?, name)
    }

    /// Attach metadata, consuming and returning the event.
    pub fn with_metadata(mut self, metadata: BTreeMap<String, String>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metadata(&self) -> Option<&BTreeMap<String, String>> {
        self.metadata.as_ref()
    }

    /// Length of the event window.
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Whether `timestamp` falls inside `[start, end]`.
    pub fn contains(&self, timestamp: impl IntoNaiveTimestamp) -> bool {
        let ts = timestamp.into_naive();
        self.start <= ts && ts <= self.end
    }

    /// Whether the two windows share at least one instant.
    pub fn overlaps(&self, other: &Event) -> bool {
        !(self.end < other.start || other.end < self.start)
    }
}

/// EventSet — an ordered collection of events.
///
/// Insertion order is preserved; it is also the column order of merged
/// forecast frames built from the set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventSet {
    events: Vec<Event>,
}

impl EventSet {
    pub fn new(events: Vec<Event>) -> Self {
        EventSet { events }
    }

    /// Build a set from `(start, end, name)` string triples.
    ///
    /// # Errors
    /// Propagates the first parse or window error.
    pub fn parse<'a, I>(triples: I) -> CFResult<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str, &'a str)>,
    {
        let events = triples
            .into_iter()
            .map(|(start, end, name)| Event::parse(start, end, name))
            .collect::<CFResult<Vec<_>>>()?;
        Ok(EventSet { events })
    }

    pub fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    pub fn as_slice(&self) -> &[Event] {
        &self.events
    }

    /// First event with the given name.
    pub fn get(&self, name: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.name == name)
    }

    /// All unordered pairs of overlapping events, in insertion order.
    pub fn find_overlapping(&self) -> Vec<(&Event, &Event)> {
        let mut pairs = Vec::new();
        for (i, first) in self.events.iter().enumerate() {
            for second in &self.events[i + 1..] {
                if first.overlaps(second) {
                    pairs.push((first, second));
                }
            }
        }
        pairs
    }

    /// Events intersecting `[start, end]`.
    pub fn filter_by_date_range(
        &self, start: impl IntoNaiveTimestamp, end: impl IntoNaiveTimestamp,
    ) -> Vec<&Event> {
        let start = start.into_naive();
        let end = end.into_naive();
        self.events.iter().filter(|e| e.start <= end && e.end >= start).collect()
    }
}

impl<'a> IntoIterator for &'a EventSet {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

impl FromIterator<Event> for EventSet {
    fn from_iter<T: IntoIterator<Item = Event>>(iter: T) -> Self {
        EventSet { events: iter.into_iter().collect() }
    }
}
