use crate::{
    models::{fields::Fields, keys::SERVICES},
    Error,
};
use serde::{de, ser::SerializeMap};

/// Lists the SDK services that were started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartServiceLog {
    /// Names of the started services, e.g. "Analytics".
    pub services: Vec<String>,
}

impl StartServiceLog {
    /// Create a start service log.
    pub fn new<I, S>(services: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StartServiceLog {
            services: services.into_iter().map(Into::into).collect(),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.services.is_empty() {
            return Err(Error::InvalidLog("no services started".into()));
        }
        if self.services.iter().any(String::is_empty) {
            return Err(Error::InvalidLog("service name is empty".into()));
        }
        Ok(())
    }

    pub(crate) fn serialize_fields<M: SerializeMap>(&self, map: &mut M) -> Result<(), M::Error> {
        map.serialize_entry(SERVICES, &self.services)
    }

    pub(crate) fn from_fields<E: de::Error>(fields: &mut Fields<E>) -> Result<Self, E> {
        Ok(StartServiceLog {
            services: fields.take(SERVICES)?,
        })
    }
}
