//! Log model and JSON wire format of [App Center] analytics telemetry.
//!
//! [App Center]: https://learn.microsoft.com/en-us/appcenter/
//!
//! **Disclaimer**: This is not an official Microsoft product.
//!
//! # Usage
//!
//! Configure the values every log should carry, build logs, and encode them for the ingestion
//! service:
//!
//! ```rust
//! use appcenter_logs::{
//!     Device, EventLog, EventProperties, Log, LogContainer, Sanitize, Settings,
//! };
//!
//! # fn main() -> Result<(), appcenter_logs::Error> {
//! let device = Device {
//!     sdk_name: "appcenter.custom".into(),
//!     sdk_version: "0.1.0".into(),
//!     os_name: "Linux".into(),
//!     os_version: "6.1".into(),
//!     locale: "en_US".into(),
//!     time_zone_offset: 0,
//!     app_version: "1.0".into(),
//!     app_build: "1".into(),
//!     ..Default::default()
//! };
//! let settings = Settings::new("appsecret=0fdcec70;target=tenant-token".parse()?)
//!     .with_user_id("marry")
//!     .with_device(device);
//!
//! let mut properties = EventProperties::new();
//! properties.set("premium", true).set("items", 3i64);
//! let mut log = Log::new(EventLog::new("5b2d7d8e", "Checkout").with_typed_properties(properties));
//! settings.prepare(&mut log);
//!
//! let mut container = LogContainer::new(vec![log]);
//! container.sanitize();
//! container.validate()?;
//! let body = container.to_json()?;
//! assert_eq!(Some("tenant-token".to_string()), container.target_token_header());
//! # let _ = body;
//! # Ok(())
//! # }
//! ```
//!
//! # Wire format
//!
//! Every log is a JSON object. The keys are available as constants in [`keys`]:
//!
//! | Key                   | Content                                              |
//! | --------------------- | ---------------------------------------------------- |
//! | `type`                | `event`, `page`, `startSession` or `startService`    |
//! | `timestamp`           | ISO-8601 UTC time with milliseconds                  |
//! | `sid`                 | Session id                                           |
//! | `distributionGroupId` | Distribution group of the installed application      |
//! | `userId`              | Application specific user id                         |
//! | `device`              | [`Device`]                                           |
//!
//! Event logs add `id`, `name` and `typedProperties`. Each typed property is an object with
//! `type` (`boolean`, `dateTime`, `double`, `long` or `string`), `name` and `value`.
//!
//! Transmission target tokens are kept per log but are never part of the log JSON. A transport
//! reads them from [`LogContainer::target_token_header`].
#![doc(html_root_url = "https://docs.rs/appcenter-logs/0.1.0")]
#![deny(missing_docs, unreachable_pub, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(test, deny(warnings))]

mod config;
mod convert;
mod error;
mod models;

pub use config::{AppSecret, ParseError, Settings};
pub use error::Error;
pub use models::{
    keys, Device, EventLog, EventProperties, Log, LogContainer, LogKind, PageLog, Properties,
    Sanitize, StartServiceLog, TypedProperty, TypedValue,
};
