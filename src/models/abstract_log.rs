use crate::{
    convert::time_to_string,
    models::{
        fields::Fields,
        keys::{
            DEVICE, DISTRIBUTION_GROUP_ID, EVENT_LOG_TYPE, PAGE_LOG_TYPE, SID,
            START_SERVICE_LOG_TYPE, START_SESSION_LOG_TYPE, TIMESTAMP, TYPE, USER_ID,
        },
        Device, EventLog, PageLog, StartServiceLog,
    },
    Error,
};
use chrono::{DateTime, Utc};
use serde::{
    de,
    ser::{SerializeMap, Serializer},
    Deserialize, Deserializer, Serialize,
};
use std::collections::BTreeSet;

const LOG_TYPES: &[&str] = &[
    EVENT_LOG_TYPE,
    PAGE_LOG_TYPE,
    START_SESSION_LOG_TYPE,
    START_SERVICE_LOG_TYPE,
];

/// Type specific part of a log. Determines the value of the `type` key.
#[derive(Debug, Clone, PartialEq)]
pub enum LogKind {
    /// A custom event.
    Event(EventLog),
    /// A page view.
    Page(PageLog),
    /// Marks the start of a new session.
    StartSession,
    /// Lists the SDK services that were started.
    StartService(StartServiceLog),
}

impl LogKind {
    /// Value written under the `type` key.
    pub fn type_name(&self) -> &'static str {
        match self {
            LogKind::Event(_) => EVENT_LOG_TYPE,
            LogKind::Page(_) => PAGE_LOG_TYPE,
            LogKind::StartSession => START_SESSION_LOG_TYPE,
            LogKind::StartService(_) => START_SERVICE_LOG_TYPE,
        }
    }

    fn validate(&self) -> Result<(), Error> {
        match self {
            LogKind::Event(event) => event.validate(),
            LogKind::Page(page) => page.validate(),
            LogKind::StartSession => Ok(()),
            LogKind::StartService(start_service) => start_service.validate(),
        }
    }

    fn serialize_fields<M: SerializeMap>(&self, map: &mut M) -> Result<(), M::Error> {
        match self {
            LogKind::Event(event) => event.serialize_fields(map),
            LogKind::Page(page) => page.serialize_fields(map),
            LogKind::StartSession => Ok(()),
            LogKind::StartService(start_service) => start_service.serialize_fields(map),
        }
    }
}

impl From<EventLog> for LogKind {
    fn from(event: EventLog) -> Self {
        LogKind::Event(event)
    }
}

impl From<PageLog> for LogKind {
    fn from(page: PageLog) -> Self {
        LogKind::Page(page)
    }
}

impl From<StartServiceLog> for LogKind {
    fn from(start_service: StartServiceLog) -> Self {
        LogKind::StartService(start_service)
    }
}

/// A single telemetry log.
///
/// Besides the fields that are sent, every log keeps the set of transmission target tokens it
/// should be delivered to. The set is only accessible inside this crate and is never part of the
/// serialized log.
#[derive(Debug, Clone, PartialEq)]
pub struct Log {
    pub(crate) kind: LogKind,
    pub(crate) timestamp: Option<DateTime<Utc>>,
    pub(crate) sid: Option<String>,
    pub(crate) distribution_group_id: Option<String>,
    pub(crate) user_id: Option<String>,
    pub(crate) device: Option<Device>,
    transmission_target_tokens: BTreeSet<String>,
}

impl Log {
    /// Create a new log. All envelope fields are unset and the log has no transmission targets.
    pub fn new(kind: impl Into<LogKind>) -> Self {
        Log {
            kind: kind.into(),
            timestamp: None,
            sid: None,
            distribution_group_id: None,
            user_id: None,
            device: None,
            transmission_target_tokens: BTreeSet::new(),
        }
    }

    /// Set the time the log was created.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Set the session id.
    pub fn with_sid(mut self, sid: impl Into<String>) -> Self {
        self.sid = Some(sid.into());
        self
    }

    /// Set the distribution group id.
    pub fn with_distribution_group_id(mut self, distribution_group_id: impl Into<String>) -> Self {
        self.distribution_group_id = Some(distribution_group_id.into());
        self
    }

    /// Set the user id.
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Set the device the log was emitted on.
    pub fn with_device(mut self, device: Device) -> Self {
        self.device = Some(device);
        self
    }

    /// Type specific part of the log.
    pub fn kind(&self) -> &LogKind {
        &self.kind
    }

    /// Mutable type specific part of the log.
    pub fn kind_mut(&mut self) -> &mut LogKind {
        &mut self.kind
    }

    /// Time the log was created.
    pub fn timestamp(&self) -> Option<&DateTime<Utc>> {
        self.timestamp.as_ref()
    }

    /// Session id.
    pub fn sid(&self) -> Option<&str> {
        self.sid.as_deref()
    }

    /// Distribution group id.
    pub fn distribution_group_id(&self) -> Option<&str> {
        self.distribution_group_id.as_deref()
    }

    /// User id.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Device the log was emitted on.
    pub fn device(&self) -> Option<&Device> {
        self.device.as_ref()
    }

    pub(crate) fn transmission_target_tokens(&self) -> &BTreeSet<String> {
        &self.transmission_target_tokens
    }

    pub(crate) fn set_transmission_target_tokens<I, S>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.transmission_target_tokens = tokens.into_iter().map(Into::into).collect();
    }

    /// Check that the log can be sent: it needs a timestamp and a valid device, and the type
    /// specific fields need to be valid.
    pub fn validate(&self) -> Result<(), Error> {
        if self.timestamp.is_none() {
            return Err(Error::InvalidLog(format!(
                "{} log has no timestamp",
                self.kind.type_name()
            )));
        }
        match &self.device {
            Some(device) => device.validate()?,
            None => {
                return Err(Error::InvalidLog(format!(
                    "{} log has no device",
                    self.kind.type_name()
                )))
            }
        }
        self.kind.validate()
    }
}

impl Serialize for Log {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(TYPE, self.kind.type_name())?;
        if let Some(timestamp) = &self.timestamp {
            map.serialize_entry(TIMESTAMP, &time_to_string(timestamp))?;
        }
        if let Some(sid) = &self.sid {
            map.serialize_entry(SID, sid)?;
        }
        if let Some(distribution_group_id) = &self.distribution_group_id {
            map.serialize_entry(DISTRIBUTION_GROUP_ID, distribution_group_id)?;
        }
        if let Some(user_id) = &self.user_id {
            map.serialize_entry(USER_ID, user_id)?;
        }
        if let Some(device) = &self.device {
            map.serialize_entry(DEVICE, device)?;
        }
        self.kind.serialize_fields(&mut map)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for Log {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut fields = Fields::deserialize(deserializer)?;
        let type_name: String = fields.take(TYPE)?;
        let kind = match type_name.as_str() {
            EVENT_LOG_TYPE => LogKind::Event(EventLog::from_fields(&mut fields)?),
            PAGE_LOG_TYPE => LogKind::Page(PageLog::from_fields(&mut fields)?),
            START_SESSION_LOG_TYPE => LogKind::StartSession,
            START_SERVICE_LOG_TYPE => {
                LogKind::StartService(StartServiceLog::from_fields(&mut fields)?)
            }
            other => return Err(de::Error::unknown_variant(other, LOG_TYPES)),
        };
        Ok(Log {
            kind,
            timestamp: fields.take_time_opt(TIMESTAMP)?,
            sid: fields.take_opt(SID)?,
            distribution_group_id: fields.take_opt(DISTRIBUTION_GROUP_ID)?,
            user_id: fields.take_opt(USER_ID)?,
            device: fields.take_opt(DEVICE)?,
            transmission_target_tokens: BTreeSet::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{device::tests::device, EventProperties};
    use chrono::TimeZone;
    use serde_json::json;
    use test_case::test_case;

    fn time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2017, 3, 13, 18, 5, 42).unwrap()
    }

    fn valid_log(kind: impl Into<LogKind>) -> Log {
        Log::new(kind).with_timestamp(time()).with_device(device())
    }

    #[test]
    fn new_log_has_no_transmission_targets() {
        let log = Log::new(LogKind::StartSession);
        assert!(log.transmission_target_tokens().is_empty());
    }

    #[test]
    fn transmission_targets_read_back() {
        let mut log = Log::new(LogKind::StartSession);
        log.set_transmission_target_tokens(["a", "b"]);
        let expected: BTreeSet<String> = ["a".to_string(), "b".to_string()].into();
        assert_eq!(&expected, log.transmission_target_tokens());
    }

    #[test]
    fn transmission_targets_collapse_duplicates() {
        let mut log = Log::new(LogKind::StartSession);
        log.set_transmission_target_tokens(vec!["a", "b", "a", "b", "a"]);
        assert_eq!(2, log.transmission_target_tokens().len());
    }

    #[test]
    fn transmission_targets_are_replaced() {
        let mut log = Log::new(LogKind::StartSession);
        log.set_transmission_target_tokens(["a", "b"]);
        log.set_transmission_target_tokens(["c"]);
        assert_eq!(
            vec!["c"],
            log.transmission_target_tokens()
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
        );
        log.set_transmission_target_tokens(Vec::<String>::new());
        assert!(log.transmission_target_tokens().is_empty());
    }

    #[test]
    fn transmission_targets_are_not_serialized() {
        let mut log = Log::new(LogKind::StartSession);
        log.set_transmission_target_tokens(["token"]);
        assert_eq!(
            r#"{"type":"startSession"}"#,
            serde_json::to_string(&log).unwrap()
        );
    }

    #[test]
    fn kind_mut_changes_payload() {
        let mut log = Log::new(EventLog::new("1", "Clicked"));
        if let LogKind::Event(event) = log.kind_mut() {
            event.name = "Tapped".into();
        }
        assert_eq!(&LogKind::Event(EventLog::new("1", "Tapped")), log.kind());
    }

    #[test]
    fn serialization_format() {
        let mut properties = EventProperties::new();
        properties.set("count", 3i64);
        let log = Log::new(EventLog::new("7c1f", "Clicked").with_typed_properties(properties))
            .with_timestamp(time())
            .with_sid("s1")
            .with_distribution_group_id("g1")
            .with_user_id("u1");
        let serialized = serde_json::to_string(&log).unwrap();
        let expected = "{\"type\":\"event\",\"timestamp\":\"2017-03-13T18:05:42.000Z\",\"sid\":\"s1\",\"distributionGroupId\":\"g1\",\"userId\":\"u1\",\"id\":\"7c1f\",\"name\":\"Clicked\",\"typedProperties\":[{\"type\":\"long\",\"name\":\"count\",\"value\":3}]}";
        assert_eq!(expected, serialized);
    }

    #[test_case(LogKind::StartSession, json!({"type": "startSession"}) ; "start session")]
    #[test_case(
        StartServiceLog::new(["Analytics", "Crashes"]).into(),
        json!({"type": "startService", "services": ["Analytics", "Crashes"]}) ; "start service")]
    #[test_case(
        PageLog::new("Home").with_properties([("k".to_string(), "v".to_string())].into()).into(),
        json!({"type": "page", "name": "Home", "properties": {"k": "v"}}) ; "page")]
    #[test_case(
        PageLog::new("Home").into(),
        json!({"type": "page", "name": "Home"}) ; "page without properties")]
    #[test_case(
        EventLog::new("1", "Clicked").into(),
        json!({"type": "event", "id": "1", "name": "Clicked"}) ; "event without properties")]
    fn serialization_kinds(kind: LogKind, expected: serde_json::Value) {
        assert_eq!(expected, serde_json::to_value(Log::new(kind)).unwrap());
    }

    #[test]
    fn deserialize() {
        let log: Log = serde_json::from_value(json!({
            "type": "event",
            "timestamp": "2017-03-13T18:05:42.000Z",
            "sid": "s1",
            "userId": "u1",
            "device": serde_json::to_value(device()).unwrap(),
            "id": "1",
            "name": "Clicked",
            "typedProperties": [{"type": "boolean", "name": "b", "value": true}],
            "unknown": 1,
        }))
        .unwrap();
        let mut properties = EventProperties::new();
        properties.set("b", true);
        let expected = Log::new(EventLog::new("1", "Clicked").with_typed_properties(properties))
            .with_timestamp(time())
            .with_sid("s1")
            .with_user_id("u1")
            .with_device(device());
        assert_eq!(expected, log);
        assert!(log.transmission_target_tokens().is_empty());
    }

    #[test]
    fn deserialize_null_is_absent() {
        let log: Log =
            serde_json::from_value(json!({"type": "startSession", "sid": null})).unwrap();
        assert_eq!(None, log.sid());
    }

    #[test_case(json!({"type": "crash"}) ; "unknown type")]
    #[test_case(json!({"name": "x"}) ; "missing type")]
    #[test_case(json!({"type": "event", "name": "x"}) ; "event without id")]
    #[test_case(json!({"type": "page"}) ; "page without name")]
    #[test_case(json!({"type": "startService"}) ; "start service without services")]
    #[test_case(json!({"type": "startSession", "timestamp": "noon"}) ; "invalid timestamp")]
    #[test_case(json!({"type": "startSession", "device": {}}) ; "incomplete device")]
    #[test_case(json!(["startSession"]) ; "not an object")]
    fn deserialize_fails(value: serde_json::Value) {
        serde_json::from_value::<Log>(value).unwrap_err();
    }

    #[test_case(LogKind::StartSession ; "start session")]
    #[test_case(StartServiceLog::new(["Analytics"]).into() ; "start service")]
    #[test_case(PageLog::new("Home").into() ; "page")]
    #[test_case(EventLog::new("1", "Clicked").into() ; "event")]
    fn valid(kind: LogKind) {
        valid_log(kind).validate().unwrap();
    }

    #[test]
    fn invalid_without_timestamp() {
        Log::new(LogKind::StartSession)
            .with_device(device())
            .validate()
            .unwrap_err();
    }

    #[test]
    fn invalid_without_device() {
        Log::new(LogKind::StartSession)
            .with_timestamp(time())
            .validate()
            .unwrap_err();
    }

    #[test]
    fn invalid_with_invalid_device() {
        Log::new(LogKind::StartSession)
            .with_timestamp(time())
            .with_device(Device::default())
            .validate()
            .unwrap_err();
    }

    #[test_case(EventLog::new("", "Clicked").into() ; "event without id")]
    #[test_case(EventLog::new("1", "").into() ; "event without name")]
    #[test_case(PageLog::new("").into() ; "page without name")]
    #[test_case(StartServiceLog::new(Vec::<String>::new()).into() ; "no services")]
    #[test_case(StartServiceLog::new([""]).into() ; "empty service name")]
    fn invalid_kind(kind: LogKind) {
        valid_log(kind).validate().unwrap_err();
    }

    #[test_case(f64::NAN ; "nan")]
    #[test_case(f64::INFINITY ; "infinity")]
    #[test_case(f64::NEG_INFINITY ; "negative infinity")]
    fn invalid_non_finite_double(value: f64) {
        let mut properties = EventProperties::new();
        properties.set("d", value);
        valid_log(EventLog::new("1", "Clicked").with_typed_properties(properties))
            .validate()
            .unwrap_err();
    }
}
