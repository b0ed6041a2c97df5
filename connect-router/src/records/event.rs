//! Volunteer events planned by signed-in organizers.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::sync::watch;

use super::{new_id, Record, Records};
use crate::validate::{Checks, FieldError};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedEvent {
    pub id: String,
    pub name: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: String,
    pub description: String,
    /// Display name of the user who created the event.
    pub organizer: String,
}

impl Record for PlannedEvent {
    const KIND: &'static str = "event";

    fn id(&self) -> &str {
        &self.id
    }
}

/// A complete event waiting for an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
    pub name: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: String,
    pub description: String,
    pub organizer: String,
}

/// Fields an organizer may change. The id and organizer are fixed once created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventUpdate {
    pub name: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub location: Option<String>,
    pub description: Option<String>,
}

/// The event planning form as typed, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDraft {
    pub name: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub time: String,
    pub location: String,
    pub description: String,
}

impl EventDraft {
    /// Check the form against `today`, in field order.
    pub fn validate(&self, today: NaiveDate) -> Vec<FieldError> {
        self.check(today).into_errors()
    }

    fn check(&self, today: NaiveDate) -> Checks {
        let mut checks = Checks::new();
        checks.min_len("eventName", &self.name, 5, "Event name");
        if checks.required("eventDate", &self.date, "Date is required") {
            match NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT) {
                Ok(date) if date < today => checks.fail("eventDate", "Date cannot be in the past"),
                Ok(_) => {}
                Err(_) => checks.fail("eventDate", "Please enter a valid date"),
            }
        }
        if checks.required("eventTime", &self.time, "Time is required")
            && NaiveTime::parse_from_str(self.time.trim(), TIME_FORMAT).is_err()
        {
            checks.fail("eventTime", "Please enter a valid time");
        }
        checks.required("eventLocation", &self.location, "Location is required");
        checks.min_len("eventDescription", &self.description, 20, "Description");
        checks
    }

    /// Validate and convert into an event organized by `organizer`.
    pub fn into_event(self, organizer: impl Into<String>, today: NaiveDate) -> crate::Result<NewEvent> {
        self.check(today).finish()?;
        let (Ok(date), Ok(time)) = (
            NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT),
            NaiveTime::parse_from_str(self.time.trim(), TIME_FORMAT),
        ) else {
            return Err(crate::Error::InvalidForm {
                errors: vec![FieldError::new("eventDate", "Please enter a valid date")],
            });
        };
        Ok(NewEvent {
            name: self.name.trim().to_string(),
            date,
            time,
            location: self.location.trim().to_string(),
            description: self.description.trim().to_string(),
            organizer: organizer.into(),
        })
    }
}

/// Planned events, shared by every page that lists or edits them.
#[derive(Clone)]
pub struct EventStore {
    records: Records<PlannedEvent>,
}

impl Default for EventStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EventStore {
    pub fn new() -> Self {
        Self::with_events(Vec::new())
    }

    pub fn with_events(events: Vec<PlannedEvent>) -> Self {
        Self { records: Records::from_items(events) }
    }

    /// Load events from a JSON array file. A missing file yields an empty store.
    pub fn load(path: impl AsRef<Path>) -> crate::Result<Self> {
        Ok(Self { records: Records::load(path.as_ref())? })
    }

    pub fn save(&self, path: impl AsRef<Path>) -> crate::Result<()> {
        self.records.save(path.as_ref())
    }

    /// Every event, in creation order.
    pub fn list(&self) -> crate::Result<Vec<PlannedEvent>> {
        self.records.all()
    }

    pub fn by_organizer(&self, organizer: &str) -> crate::Result<Vec<PlannedEvent>> {
        self.records.filter(|event| event.organizer == organizer)
    }

    pub fn get(&self, id: &str) -> crate::Result<PlannedEvent> {
        self.records.get(id)
    }

    /// Store a new event under a fresh id. Every text field must be filled in.
    pub fn create(&self, event: NewEvent) -> crate::Result<PlannedEvent> {
        let mut checks = Checks::new();
        for (field, value) in [
            ("name", &event.name),
            ("location", &event.location),
            ("description", &event.description),
            ("organizer", &event.organizer),
        ] {
            checks.required(field, value, "All fields are required");
        }
        checks.finish()?;

        self.records.insert(PlannedEvent {
            id: new_id(),
            name: event.name,
            date: event.date,
            time: event.time,
            location: event.location,
            description: event.description,
            organizer: event.organizer,
        })
    }

    /// Apply the fields set in `update`.
    pub fn update(&self, id: &str, update: EventUpdate) -> crate::Result<PlannedEvent> {
        self.records.modify(id, |event| {
            if let Some(name) = update.name {
                event.name = name;
            }
            if let Some(date) = update.date {
                event.date = date;
            }
            if let Some(time) = update.time {
                event.time = time;
            }
            if let Some(location) = update.location {
                event.location = location;
            }
            if let Some(description) = update.description {
                event.description = description;
            }
        })
    }

    pub fn delete(&self, id: &str) -> crate::Result<()> {
        self.records.remove(id).map(|_| ())
    }

    pub fn len(&self) -> crate::Result<usize> {
        self.records.len()
    }

    pub fn is_empty(&self) -> crate::Result<bool> {
        self.len().map(|len| len == 0)
    }

    /// Notified after every change.
    pub fn subscribe(&self) -> watch::Receiver<()> {
        self.records.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn draft() -> EventDraft {
        EventDraft {
            name: "Riverside Clean-up".to_string(),
            date: "2026-11-02".to_string(),
            time: "09:30".to_string(),
            location: "Riverside Park".to_string(),
            description: "Bring gloves; we supply bags and snacks.".to_string(),
        }
    }

    fn new_event(name: &str, organizer: &str) -> NewEvent {
        NewEvent { name: name.to_string(), organizer: organizer.to_string(), ..draft().into_event("", today()).unwrap() }
    }

    #[test]
    fn test_valid_draft_becomes_event() {
        assert!(draft().validate(today()).is_empty());
        let event = draft().into_event("Vera Volunteer", today()).unwrap();
        assert_eq!(event.date, NaiveDate::from_ymd_opt(2026, 11, 2).unwrap());
        assert_eq!(event.time, NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        assert_eq!(event.organizer, "Vera Volunteer");
    }

    #[test]
    fn test_draft_validation_messages() {
        let errors = EventDraft {
            name: "Fun".to_string(),
            date: "2026-10-18".to_string(),
            time: String::new(),
            location: "  ".to_string(),
            description: "Too short".to_string(),
        }
        .validate(today());

        let messages: Vec<_> = errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            [
                "Event name must be at least 5 characters",
                "Date cannot be in the past",
                "Time is required",
                "Location is required",
                "Description must be at least 20 characters",
            ]
        );
    }

    #[test]
    fn test_today_is_not_in_the_past() {
        let d = EventDraft { date: "2026-10-19".to_string(), ..draft() };
        assert!(d.validate(today()).is_empty());
        let d = EventDraft { date: "19/10/2026".to_string(), ..draft() };
        assert_eq!(d.validate(today())[0].message, "Please enter a valid date");
    }

    #[test]
    fn test_invalid_draft_is_rejected() {
        let d = EventDraft { name: String::new(), ..draft() };
        assert!(matches!(d.into_event("Vera", today()), Err(Error::InvalidForm { errors }) if errors[0].field == "eventName"));
    }

    #[test]
    fn test_create_and_filter_by_organizer() {
        let store = EventStore::new();
        let mine = store.create(new_event("Coat Drive", "Vera")).unwrap();
        store.create(new_event("Book Swap", "Ollie")).unwrap();

        assert_eq!(store.len().unwrap(), 2);
        assert_eq!(store.get(&mine.id).unwrap(), mine);
        let vera: Vec<_> = store.by_organizer("Vera").unwrap().into_iter().map(|e| e.name).collect();
        assert_eq!(vera, ["Coat Drive"]);
    }

    #[test]
    fn test_create_requires_every_field() {
        let store = EventStore::new();
        let err = store.create(new_event("Coat Drive", "")).unwrap_err();
        assert!(matches!(err, Error::InvalidForm { errors } if errors == [FieldError::new("organizer", "All fields are required")]));
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_update_keeps_id_and_organizer() {
        let store = EventStore::new();
        let created = store.create(new_event("Coat Drive", "Vera")).unwrap();
        let update = EventUpdate { location: Some("Town Hall".to_string()), ..EventUpdate::default() };

        let updated = store.update(&created.id, update).unwrap();

        assert_eq!(updated.location, "Town Hall");
        assert_eq!(updated.name, "Coat Drive");
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.organizer, "Vera");
        assert!(store.update("missing", EventUpdate::default()).is_err());
    }

    #[test]
    fn test_update_cannot_carry_organizer() {
        let update: EventUpdate = serde_json::from_str(r#"{"name": "Renamed", "organizer": "Mallory"}"#).unwrap();
        assert_eq!(update.name.as_deref(), Some("Renamed"));
        assert_eq!(update.location, None);
    }

    #[tokio::test]
    async fn test_delete_notifies_subscribers() {
        let store = EventStore::new();
        let created = store.create(new_event("Coat Drive", "Vera")).unwrap();
        let mut changes = store.subscribe();

        store.delete(&created.id).unwrap();

        changes.changed().await.unwrap();
        assert!(store.is_empty().unwrap());
        assert!(matches!(store.delete(&created.id), Err(Error::RecordNotFound { kind: "event", .. })));
    }

    #[test]
    fn test_persistence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");
        let store = EventStore::new();
        let created = store.create(new_event("Coat Drive", "Vera")).unwrap();
        store.save(&path).unwrap();

        let reloaded = EventStore::load(&path).unwrap();
        assert_eq!(reloaded.list().unwrap(), vec![created]);
    }
}
