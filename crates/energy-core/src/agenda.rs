//! Agenda events (site visits, calls, deadlines).

use crate::{require, ValidationError};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

fn default_duration() -> Option<u32> {
    Some(60)
}

/// Fields a user fills in to schedule an event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    /// Local ISO datetime, e.g. `2026-02-27T09:00`.
    pub start: String,
    #[serde(default = "default_duration")]
    pub duration_min: Option<u32>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl EventDraft {
    pub fn new(title: impl Into<String>, start: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            start: start.into(),
            duration_min: default_duration(),
            location: None,
            project_id: None,
            notes: None,
        }
    }

    /// Title and start are required; blank optional strings are sent as null.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("title", &self.title)?;
        require("start", &self.start)?;
        Ok(())
    }

    /// Copy with blank optional fields turned into `None`.
    pub fn cleaned(&self) -> Self {
        let blank_to_none = |o: &Option<String>| o.clone().filter(|s| !s.trim().is_empty());
        Self {
            title: self.title.trim().to_string(),
            start: self.start.clone(),
            duration_min: self.duration_min,
            location: blank_to_none(&self.location),
            project_id: blank_to_none(&self.project_id),
            notes: blank_to_none(&self.notes),
        }
    }
}

/// A stored event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    #[serde(flatten)]
    pub details: EventDraft,
}

impl Event {
    /// Parsed start, if the stored string is a valid local datetime.
    pub fn start_at(&self) -> Option<NaiveDateTime> {
        parse_start(&self.details.start)
    }

    pub fn kind(&self) -> EventKind {
        EventKind::detect(&self.details.title)
    }
}

/// Parse `YYYY-MM-DDTHH:MM` with optional seconds.
pub fn parse_start(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
}

/// Category inferred from keywords in the title.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    Visit,
    Call,
    Deadline,
    Other,
}

impl EventKind {
    pub fn detect(title: &str) -> EventKind {
        let t = title.to_lowercase();
        let has = |words: &[&str]| words.iter().any(|w| t.contains(w));
        if has(&["visite", "visit", "terrain", "inspection"]) {
            EventKind::Visit
        } else if has(&["call", "appel", "reunion", "réunion", "meeting"]) {
            EventKind::Call
        } else if has(&["deadline", "limite", "rendu", "delai", "délai"]) {
            EventKind::Deadline
        } else {
            EventKind::Other
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EventKind::Visit => "Visite",
            EventKind::Call => "Call",
            EventKind::Deadline => "Deadline",
            EventKind::Other => "Autre",
        }
    }
}

/// Chronological order by parsed start; unparseable starts go last in
/// input order.
pub fn sort_chronologically(events: &[Event]) -> Vec<Event> {
    let mut sorted = events.to_vec();
    sorted.sort_by(|a, b| match (a.start_at(), b.start_at()) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(id: &str, title: &str, start: &str) -> Event {
        Event {
            id: id.into(),
            details: EventDraft::new(title, start),
        }
    }

    #[test]
    fn kind_detection() {
        assert_eq!(EventKind::detect("Visite terrain Usine"), EventKind::Visit);
        assert_eq!(EventKind::detect("Appel client"), EventKind::Call);
        assert_eq!(EventKind::detect("Réunion de lancement"), EventKind::Call);
        assert_eq!(EventKind::detect("Date limite rapport"), EventKind::Deadline);
        assert_eq!(EventKind::detect("Déjeuner"), EventKind::Other);
    }

    #[test]
    fn chronological_with_bad_dates_last() {
        let events = vec![
            ev("a", "x", "2026-03-01T09:00"),
            ev("b", "x", "someday"),
            ev("c", "x", "2026-02-27T14:30:00"),
        ];
        let ids: Vec<_> = sort_chronologically(&events)
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn draft_validation_and_cleanup() {
        assert_eq!(
            EventDraft::new("", "2026-01-01T10:00").validate(),
            Err(ValidationError::MissingField("title"))
        );
        let mut d = EventDraft::new(" Visite ", "2026-01-01T10:00");
        d.location = Some("  ".into());
        d.project_id = Some("p1".into());
        let c = d.cleaned();
        assert_eq!(c.title, "Visite");
        assert_eq!(c.location, None);
        assert_eq!(c.project_id.as_deref(), Some("p1"));
    }

    #[test]
    fn missing_duration_defaults_to_an_hour() {
        let e: Event =
            serde_json::from_str(r#"{"id":"e1","title":"Call","start":"2026-01-01T10:00"}"#)
                .unwrap();
        assert_eq!(e.details.duration_min, Some(60));
        assert_eq!(e.kind(), EventKind::Call);
    }
}
