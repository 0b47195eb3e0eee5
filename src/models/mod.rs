mod abstract_log;
mod container;
mod device;
mod event_log;
mod fields;
pub mod keys;
mod page_log;
mod sanitize;
mod start_service_log;
mod typed_property;

pub use abstract_log::*;
pub use container::*;
pub use device::*;
pub use event_log::*;
pub use page_log::*;
pub use sanitize::Sanitize;
pub use start_service_log::*;
pub use typed_property::*;

/// Custom string properties of a page log.
pub type Properties = std::collections::BTreeMap<String, String>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use super::device::tests::device;

    #[test]
    fn serialization_format() {
        let container = LogContainer::new(vec![Log::new(LogKind::StartSession)
            .with_timestamp(Utc.with_ymd_and_hms(2020, 6, 21, 10, 40, 0).unwrap())
            .with_sid("6b1d")
            .with_device(Device {
                time_zone_offset: 0,
                ..device()
            })]);
        let serialized = String::from_utf8(container.to_json().unwrap()).unwrap();
        let expected = "{\"logs\":[{\"type\":\"startSession\",\"timestamp\":\"2020-06-21T10:40:00.000Z\",\"sid\":\"6b1d\",\"device\":{\"sdkName\":\"appcenter.ios\",\"sdkVersion\":\"1.2.0\",\"osName\":\"iOS\",\"osVersion\":\"9.3.0\",\"locale\":\"en_US\",\"timeZoneOffset\":0,\"appVersion\":\"1.1.0\",\"appBuild\":\"42\"}}]}";
        assert_eq!(expected, serialized);
    }

    #[test]
    fn sanitization() {
        let mut properties = EventProperties::new();
        properties.set("p", "v".repeat(200));
        let mut container = LogContainer::new(vec![Log::new(
            EventLog::new("1", "x".repeat(2000)).with_typed_properties(properties),
        )]);
        container.sanitize();
        match container.logs()[0].kind() {
            LogKind::Event(event) => {
                assert_eq!(256, event.name.len());
                assert_eq!(
                    Some(&TypedValue::String("v".repeat(125))),
                    event.typed_properties.get("p")
                );
            }
            _ => panic!("we should not get here"),
        }
    }
}
