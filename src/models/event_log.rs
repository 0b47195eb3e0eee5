use crate::{
    models::{
        fields::Fields,
        keys::{ID, NAME, TYPED_PROPERTIES},
        EventProperties, TypedValue,
    },
    Error,
};
use serde::{de, ser::SerializeMap};

/// Instances of Event represent named occurrences in the application, optionally with typed
/// properties.
#[derive(Debug, Clone, PartialEq)]
pub struct EventLog {
    /// Unique identifier for this event, usually a UUID.
    pub id: String,

    /// Name of the event.
    pub name: String,

    /// Event specific properties.
    pub typed_properties: EventProperties,
}

impl EventLog {
    /// Create an event without properties.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        EventLog {
            id: id.into(),
            name: name.into(),
            typed_properties: EventProperties::new(),
        }
    }

    /// Replace the typed properties.
    pub fn with_typed_properties(mut self, typed_properties: EventProperties) -> Self {
        self.typed_properties = typed_properties;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.id.is_empty() {
            return Err(Error::InvalidLog("event id is empty".into()));
        }
        if self.name.is_empty() {
            return Err(Error::InvalidLog("event name is empty".into()));
        }
        for (name, value) in self.typed_properties.iter() {
            if let TypedValue::Double(v) = value {
                if !v.is_finite() {
                    return Err(Error::InvalidLog(format!(
                        "event property {} is not a finite number",
                        name
                    )));
                }
            }
        }
        Ok(())
    }

    pub(crate) fn serialize_fields<M: SerializeMap>(&self, map: &mut M) -> Result<(), M::Error> {
        map.serialize_entry(ID, &self.id)?;
        map.serialize_entry(NAME, &self.name)?;
        if !self.typed_properties.is_empty() {
            map.serialize_entry(TYPED_PROPERTIES, &self.typed_properties)?;
        }
        Ok(())
    }

    pub(crate) fn from_fields<E: de::Error>(fields: &mut Fields<E>) -> Result<Self, E> {
        Ok(EventLog {
            id: fields.take(ID)?,
            name: fields.take(NAME)?,
            typed_properties: fields.take_opt(TYPED_PROPERTIES)?.unwrap_or_default(),
        })
    }
}
