use crate::{
    models::{fields::Fields, keys::LOGS, Log},
    Error,
};
use serde::{
    ser::{SerializeMap, Serializer},
    Deserialize, Deserializer, Serialize,
};
use std::collections::BTreeSet;

/// Separator of the token list in [`LogContainer::target_token_header`].
const TARGET_TOKEN_SEPARATOR: &str = ",";

/// A list of logs that is sent to the ingestion service in one request.
///
/// ```
/// use appcenter_logs::{Log, LogContainer, LogKind};
///
/// let container = LogContainer::new(vec![Log::new(LogKind::StartSession)]);
/// let json = container.to_json().unwrap();
/// assert_eq!(br#"{"logs":[{"type":"startSession"}]}"#, json.as_slice());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogContainer {
    logs: Vec<Log>,
}

impl LogContainer {
    /// Create a container holding the given logs.
    pub fn new(logs: Vec<Log>) -> Self {
        LogContainer { logs }
    }

    /// Append a log.
    pub fn push(&mut self, log: Log) {
        self.logs.push(log);
    }

    /// The logs in this container.
    pub fn logs(&self) -> &[Log] {
        &self.logs
    }

    pub(crate) fn logs_mut(&mut self) -> &mut [Log] {
        &mut self.logs
    }

    /// Consume the container and return its logs.
    pub fn into_logs(self) -> Vec<Log> {
        self.logs
    }

    /// Number of logs.
    pub fn len(&self) -> usize {
        self.logs.len()
    }

    /// Whether the container holds no logs.
    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }

    /// Check that the container is not empty and that every log is valid.
    pub fn validate(&self) -> Result<(), Error> {
        if self.logs.is_empty() {
            return Err(Error::EmptyContainer);
        }
        self.logs.iter().try_for_each(Log::validate)
    }

    /// Serialize as a `{"logs": [...]}` JSON document.
    pub fn to_json(&self) -> Result<Vec<u8>, Error> {
        serde_json::to_vec(self).map_err(Error::Serialize)
    }

    /// Serialize as newline delimited JSON with one log per line.
    pub fn to_json_stream(&self) -> Result<Vec<u8>, Error> {
        let mut serialized = Vec::new();
        for (i, log) in self.logs.iter().enumerate() {
            if i > 0 {
                serialized.push(b'\n');
            }
            serde_json::to_writer(&mut serialized, log).map_err(Error::Serialize)?;
        }
        Ok(serialized)
    }

    /// Parse a `{"logs": [...]}` JSON document.
    ///
    /// Decoded logs have no transmission targets.
    pub fn from_json(json: &[u8]) -> Result<Self, Error> {
        serde_json::from_slice(json).map_err(Error::Deserialize)
    }

    /// Union of the transmission target tokens of all logs, sorted and without duplicates.
    pub fn transmission_target_tokens(&self) -> BTreeSet<&str> {
        self.logs
            .iter()
            .flat_map(|log| log.transmission_target_tokens().iter())
            .map(String::as_str)
            .collect()
    }

    /// The transmission target tokens of all logs joined with `,`, or `None` if no log in the
    /// container has a transmission target.
    pub fn target_token_header(&self) -> Option<String> {
        let tokens = self.transmission_target_tokens();
        if tokens.is_empty() {
            None
        } else {
            Some(tokens.into_iter().collect::<Vec<_>>().join(TARGET_TOKEN_SEPARATOR))
        }
    }
}

impl FromIterator<Log> for LogContainer {
    fn from_iter<I: IntoIterator<Item = Log>>(iter: I) -> Self {
        LogContainer::new(iter.into_iter().collect())
    }
}

impl Serialize for LogContainer {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(LOGS, &self.logs)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for LogContainer {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut fields = Fields::deserialize(deserializer)?;
        Ok(LogContainer::new(fields.take(LOGS)?))
    }
}
