use crate::{
    convert::truncate_chars,
    models::{EventLog, EventProperties, Log, LogContainer, LogKind, PageLog, Properties, TypedValue},
};
use log::{debug, warn};
use std::collections::BTreeMap;

pub(crate) const MAX_NAME_LENGTH: usize = 256;
pub(crate) const MAX_PROPERTY_COUNT: usize = 20;
pub(crate) const MAX_PROPERTY_KEY_LENGTH: usize = 125;
pub(crate) const MAX_PROPERTY_VALUE_LENGTH: usize = 125;

/// Bring data within the limits accepted by the ingestion service, dropping or truncating what
/// does not fit.
pub trait Sanitize {
    /// Sanitize in place.
    fn sanitize(&mut self);
}

/// Truncates long keys. A truncated key replaces an existing entry with the same name.
fn truncate_keys<V>(map: &mut BTreeMap<String, V>) {
    let long_keys: Vec<_> = map
        .keys()
        .filter(|k| k.chars().count() > MAX_PROPERTY_KEY_LENGTH)
        .cloned()
        .collect();
    for long_key in long_keys {
        let (mut key, value) = match map.remove_entry(&long_key) {
            Some(entry) => entry,
            None => continue,
        };
        truncate_chars(&mut key, MAX_PROPERTY_KEY_LENGTH);
        debug!("Truncated property name {}", long_key);
        if map.insert(key, value).is_some() {
            debug!(
                "Truncated property name overrides property with the same name: {}",
                long_key
            );
        }
    }
}

fn limit_count<V>(map: &mut BTreeMap<String, V>) {
    if map.len() > MAX_PROPERTY_COUNT {
        warn!(
            "Properties cannot contain more than {} items. Dropping {} properties",
            MAX_PROPERTY_COUNT,
            map.len() - MAX_PROPERTY_COUNT
        );
        while map.len() > MAX_PROPERTY_COUNT {
            map.pop_last();
        }
    }
}

impl Sanitize for Properties {
    fn sanitize(&mut self) {
        truncate_keys(self);
        limit_count(self);
        for (key, value) in self.iter_mut() {
            if truncate_chars(value, MAX_PROPERTY_VALUE_LENGTH) {
                debug!("Truncated value of property {}", key);
            }
        }
    }
}

impl Sanitize for EventProperties {
    fn sanitize(&mut self) {
        self.properties.retain(|key, value| match value {
            TypedValue::Double(v) if !v.is_finite() => {
                warn!("Dropping property {} with non finite value {}", key, v);
                false
            }
            _ => true,
        });
        truncate_keys(&mut self.properties);
        limit_count(&mut self.properties);
        for (key, value) in self.properties.iter_mut() {
            if let TypedValue::String(value) = value {
                if truncate_chars(value, MAX_PROPERTY_VALUE_LENGTH) {
                    debug!("Truncated value of property {}", key);
                }
            }
        }
    }
}

impl Sanitize for EventLog {
    fn sanitize(&mut self) {
        if truncate_chars(&mut self.name, MAX_NAME_LENGTH) {
            warn!("Event name exceeds {} characters. Truncating", MAX_NAME_LENGTH);
        }
        self.typed_properties.sanitize();
    }
}

impl Sanitize for PageLog {
    fn sanitize(&mut self) {
        if truncate_chars(&mut self.name, MAX_NAME_LENGTH) {
            warn!("Page name exceeds {} characters. Truncating", MAX_NAME_LENGTH);
        }
        self.properties.sanitize();
    }
}

impl Sanitize for Log {
    fn sanitize(&mut self) {
        match &mut self.kind {
            LogKind::Event(event) => event.sanitize(),
            LogKind::Page(page) => page.sanitize(),
            LogKind::StartSession | LogKind::StartService(_) => {}
        }
    }
}

impl Sanitize for LogContainer {
    fn sanitize(&mut self) {
        for log in self.logs_mut() {
            log.sanitize();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn sanitize_properties() {
        init_logger();
        let mut properties = Properties::from_iter(vec![
            // Long value
            ("1".repeat(1), "v".repeat(200)),
            // Long key and long value
            ("2".repeat(160), "v".repeat(200)),
            // Long key
            ("3".repeat(160), "v".repeat(1)),
            // Long key collides with and replaces other key
            ("4".repeat(125), "x".repeat(1)),
            ("4".repeat(160), "y".repeat(1)),
        ]);
        properties.sanitize();
        assert_eq!(4, properties.len());
        assert_eq!(125, properties.get("1").unwrap().len());
        assert_eq!(125, properties.get(&"2".repeat(125)).unwrap().len());
        assert_eq!(1, properties.get(&"3".repeat(125)).unwrap().len());
        assert_eq!("y", properties.get(&"4".repeat(125)).unwrap());
    }

    #[test]
    fn sanitize_properties_count() {
        init_logger();
        let mut properties: Properties = (0..25)
            .map(|i| (format!("key{:02}", i), i.to_string()))
            .collect();
        properties.sanitize();
        assert_eq!(MAX_PROPERTY_COUNT, properties.len());
        assert!(properties.contains_key("key00"));
        assert!(properties.contains_key("key19"));
        assert!(!properties.contains_key("key20"));
    }

    #[test]
    fn sanitize_event_properties() {
        init_logger();
        let mut properties = EventProperties::new();
        properties
            .set("nan", f64::NAN)
            .set("inf", f64::INFINITY)
            .set("double", 1.5)
            .set("string", "é".repeat(130))
            .set("long", 7i64)
            .set("k".repeat(130), true);
        properties.sanitize();
        assert_eq!(4, properties.len());
        assert_eq!(None, properties.get("nan"));
        assert_eq!(None, properties.get("inf"));
        assert_eq!(Some(&TypedValue::Double(1.5)), properties.get("double"));
        assert_eq!(
            Some(&TypedValue::String("é".repeat(125))),
            properties.get("string")
        );
        assert_eq!(
            Some(&TypedValue::Boolean(true)),
            properties.get(&"k".repeat(125))
        );
    }

    #[test]
    fn sanitize_event_name() {
        init_logger();
        let mut log = Log::new(EventLog::new("1", "n".repeat(300)));
        log.sanitize();
        match log.kind() {
            LogKind::Event(event) => assert_eq!(MAX_NAME_LENGTH, event.name.len()),
            _ => panic!("we should not get here"),
        }
    }

    #[test]
    fn sanitize_container() {
        init_logger();
        let mut container = LogContainer::new(vec![
            Log::new(PageLog::new("p".repeat(300))),
            Log::new(LogKind::StartSession),
        ]);
        container.sanitize();
        match container.logs()[0].kind() {
            LogKind::Page(page) => assert_eq!(MAX_NAME_LENGTH, page.name.len()),
            _ => panic!("we should not get here"),
        }
        assert_eq!(&LogKind::StartSession, container.logs()[1].kind());
    }
}
