//! Field names and type tags of the App Center log JSON format.
//!
//! These literals are consumed by the ingestion service. Changing any of them breaks logs that
//! were already emitted.

/// Type tag of a typed property holding a boolean value.
pub const BOOLEAN_TYPED_PROPERTY_TYPE: &str = "boolean";

/// Type tag of a typed property holding a UTC date and time, serialized as ISO-8601 with
/// millisecond precision.
pub const DATE_TIME_TYPED_PROPERTY_TYPE: &str = "dateTime";

/// Type tag of a typed property holding a finite double precision number.
pub const DOUBLE_TYPED_PROPERTY_TYPE: &str = "double";

/// Type tag of a typed property holding a 64 bit signed integer.
pub const LONG_TYPED_PROPERTY_TYPE: &str = "long";

/// Type tag of a typed property holding a string.
pub const STRING_TYPED_PROPERTY_TYPE: &str = "string";

/// Device the log was emitted on.
pub const DEVICE: &str = "device";

/// Distribution group the installed application belongs to.
pub const DISTRIBUTION_GROUP_ID: &str = "distributionGroupId";

/// Session id.
pub const SID: &str = "sid";

/// Time the log was created.
pub const TIMESTAMP: &str = "timestamp";

/// Application specific user id.
pub const USER_ID: &str = "userId";

/// Discriminator of both logs and typed properties.
pub const TYPE: &str = "type";

/// Value of a typed property.
pub const TYPED_PROPERTY_VALUE: &str = "value";

/// Name of an event, a page or a typed property.
pub const NAME: &str = "name";

/// Unique id of an event log.
pub const ID: &str = "id";

/// Typed properties of an event log.
pub const TYPED_PROPERTIES: &str = "typedProperties";

/// String properties of a page log.
pub const PROPERTIES: &str = "properties";

/// Services started by a start service log.
pub const SERVICES: &str = "services";

/// List of logs in a log container.
pub const LOGS: &str = "logs";

/// Log type of an event log.
pub const EVENT_LOG_TYPE: &str = "event";

/// Log type of a page log.
pub const PAGE_LOG_TYPE: &str = "page";

/// Log type of a start session log.
pub const START_SESSION_LOG_TYPE: &str = "startSession";

/// Log type of a start service log.
pub const START_SERVICE_LOG_TYPE: &str = "startService";
