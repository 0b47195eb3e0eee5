use crate::convert::time_from_str;
use chrono::{DateTime, Utc};
use serde::{
    de::{self, DeserializeOwned},
    Deserialize, Deserializer,
};
use serde_json::{Map, Value};
use std::marker::PhantomData;

/// Fields of a JSON object while a model is decoded from it. Fields are looked up by the wire
/// key constants and removed as they are read; unknown fields are ignored.
pub(crate) struct Fields<E> {
    map: Map<String, Value>,
    _error: PhantomData<E>,
}

impl<E: de::Error> Fields<E> {
    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Self, E>
    where
        D: Deserializer<'de, Error = E>,
    {
        Ok(Fields {
            map: Map::deserialize(deserializer)?,
            _error: PhantomData,
        })
    }

    pub(crate) fn take<T: DeserializeOwned>(&mut self, key: &'static str) -> Result<T, E> {
        match self.map.remove(key) {
            Some(value) => T::deserialize(value).map_err(|err| field_error(key, err)),
            None => Err(E::missing_field(key)),
        }
    }

    /// Like [`Fields::take`], but a missing key and `null` both decode to `None`.
    pub(crate) fn take_opt<T: DeserializeOwned>(
        &mut self,
        key: &'static str,
    ) -> Result<Option<T>, E> {
        match self.map.remove(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => T::deserialize(value)
                .map(Some)
                .map_err(|err| field_error(key, err)),
        }
    }

    pub(crate) fn take_time_opt(&mut self, key: &'static str) -> Result<Option<DateTime<Utc>>, E> {
        self.take_opt::<String>(key)?
            .map(|s| time_from_str(&s).map_err(|err| field_error(key, err)))
            .transpose()
    }
}

fn field_error<E: de::Error>(key: &str, err: impl std::fmt::Display) -> E {
    E::custom(format!("{}: {}", key, err))
}
