use crate::{
    models::{
        fields::Fields,
        keys::{NAME, PROPERTIES},
        Properties,
    },
    Error,
};
use serde::{de, ser::SerializeMap};

/// Page view of a screen or web page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLog {
    /// Name of the page.
    pub name: String,

    /// Collection of custom string properties.
    pub properties: Properties,
}

impl PageLog {
    /// Create a page view without properties.
    pub fn new(name: impl Into<String>) -> Self {
        PageLog {
            name: name.into(),
            properties: Properties::new(),
        }
    }

    /// Replace the properties.
    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.name.is_empty() {
            return Err(Error::InvalidLog("page name is empty".into()));
        }
        Ok(())
    }

    pub(crate) fn serialize_fields<M: SerializeMap>(&self, map: &mut M) -> Result<(), M::Error> {
        map.serialize_entry(NAME, &self.name)?;
        if !self.properties.is_empty() {
            map.serialize_entry(PROPERTIES, &self.properties)?;
        }
        Ok(())
    }

    pub(crate) fn from_fields<E: de::Error>(fields: &mut Fields<E>) -> Result<Self, E> {
        Ok(PageLog {
            name: fields.take(NAME)?,
            properties: fields.take_opt(PROPERTIES)?.unwrap_or_default(),
        })
    }
}
