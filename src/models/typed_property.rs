use crate::{
    convert::{time_from_str, time_to_string},
    models::{
        fields::Fields,
        keys::{
            BOOLEAN_TYPED_PROPERTY_TYPE, DATE_TIME_TYPED_PROPERTY_TYPE, DOUBLE_TYPED_PROPERTY_TYPE,
            LONG_TYPED_PROPERTY_TYPE, NAME, STRING_TYPED_PROPERTY_TYPE, TYPE, TYPED_PROPERTY_VALUE,
        },
    },
};
use chrono::{DateTime, Utc};
use serde::{
    de,
    ser::{self, SerializeMap, Serializer},
    Deserialize, Deserializer, Serialize,
};
use std::collections::{btree_map, BTreeMap};

const TYPE_TAGS: &[&str] = &[
    BOOLEAN_TYPED_PROPERTY_TYPE,
    DATE_TIME_TYPED_PROPERTY_TYPE,
    DOUBLE_TYPED_PROPERTY_TYPE,
    LONG_TYPED_PROPERTY_TYPE,
    STRING_TYPED_PROPERTY_TYPE,
];

/// Value of a typed event property.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    /// Serialized with the `boolean` type tag.
    Boolean(bool),
    /// Serialized with the `dateTime` type tag as an ISO-8601 string in UTC.
    DateTime(DateTime<Utc>),
    /// Serialized with the `double` type tag. Only finite numbers can be sent.
    Double(f64),
    /// Serialized with the `long` type tag.
    Long(i64),
    /// Serialized with the `string` type tag.
    String(String),
}

impl TypedValue {
    /// The type tag written next to this value.
    pub fn type_tag(&self) -> &'static str {
        match self {
            TypedValue::Boolean(_) => BOOLEAN_TYPED_PROPERTY_TYPE,
            TypedValue::DateTime(_) => DATE_TIME_TYPED_PROPERTY_TYPE,
            TypedValue::Double(_) => DOUBLE_TYPED_PROPERTY_TYPE,
            TypedValue::Long(_) => LONG_TYPED_PROPERTY_TYPE,
            TypedValue::String(_) => STRING_TYPED_PROPERTY_TYPE,
        }
    }
}

impl From<bool> for TypedValue {
    fn from(value: bool) -> Self {
        TypedValue::Boolean(value)
    }
}

impl From<DateTime<Utc>> for TypedValue {
    fn from(value: DateTime<Utc>) -> Self {
        TypedValue::DateTime(value)
    }
}

impl From<f64> for TypedValue {
    fn from(value: f64) -> Self {
        TypedValue::Double(value)
    }
}

impl From<i64> for TypedValue {
    fn from(value: i64) -> Self {
        TypedValue::Long(value)
    }
}

impl From<String> for TypedValue {
    fn from(value: String) -> Self {
        TypedValue::String(value)
    }
}

impl From<&str> for TypedValue {
    fn from(value: &str) -> Self {
        TypedValue::String(value.into())
    }
}

/// A named, typed property as it appears in the `typedProperties` array of an event log.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedProperty {
    /// Property name.
    pub name: String,
    /// Property value. Its variant determines the type tag.
    pub value: TypedValue,
}

struct TypedPropertyRef<'a>(&'a str, &'a TypedValue);

impl Serialize for TypedPropertyRef<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let TypedPropertyRef(name, value) = *self;
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry(TYPE, value.type_tag())?;
        map.serialize_entry(NAME, name)?;
        match value {
            TypedValue::Boolean(v) => map.serialize_entry(TYPED_PROPERTY_VALUE, v)?,
            TypedValue::DateTime(v) => {
                map.serialize_entry(TYPED_PROPERTY_VALUE, &time_to_string(v))?
            }
            TypedValue::Double(v) if !v.is_finite() => {
                return Err(ser::Error::custom(format!(
                    "property {} is not a finite number: {}",
                    name, v
                )))
            }
            TypedValue::Double(v) => map.serialize_entry(TYPED_PROPERTY_VALUE, v)?,
            TypedValue::Long(v) => map.serialize_entry(TYPED_PROPERTY_VALUE, v)?,
            TypedValue::String(v) => map.serialize_entry(TYPED_PROPERTY_VALUE, v)?,
        }
        map.end()
    }
}

impl Serialize for TypedProperty {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        TypedPropertyRef(&self.name, &self.value).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TypedProperty {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut fields = Fields::deserialize(deserializer)?;
        let type_tag: String = fields.take(TYPE)?;
        let name: String = fields.take(NAME)?;
        let value = match type_tag.as_str() {
            BOOLEAN_TYPED_PROPERTY_TYPE => TypedValue::Boolean(fields.take(TYPED_PROPERTY_VALUE)?),
            DATE_TIME_TYPED_PROPERTY_TYPE => {
                let value: String = fields.take(TYPED_PROPERTY_VALUE)?;
                TypedValue::DateTime(
                    time_from_str(&value).map_err(<D::Error as de::Error>::custom)?,
                )
            }
            DOUBLE_TYPED_PROPERTY_TYPE => TypedValue::Double(fields.take(TYPED_PROPERTY_VALUE)?),
            LONG_TYPED_PROPERTY_TYPE => TypedValue::Long(fields.take(TYPED_PROPERTY_VALUE)?),
            STRING_TYPED_PROPERTY_TYPE => TypedValue::String(fields.take(TYPED_PROPERTY_VALUE)?),
            other => return Err(de::Error::unknown_variant(other, TYPE_TAGS)),
        };
        Ok(TypedProperty { name, value })
    }
}

/// Typed properties of an event, keyed by name.
///
/// Setting a property with a name that already exists replaces the previous value, whatever its
/// type was.
///
/// ```
/// use appcenter_logs::{EventProperties, TypedValue};
///
/// let mut properties = EventProperties::new();
/// properties
///     .set("premium", true)
///     .set("score", 42i64)
///     .set("premium", "yes");
/// assert_eq!(2, properties.len());
/// assert_eq!(Some(&TypedValue::String("yes".into())), properties.get("premium"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventProperties {
    pub(crate) properties: BTreeMap<String, TypedValue>,
}

impl EventProperties {
    /// Create an empty property set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property, replacing any previous property with the same name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<TypedValue>) -> &mut Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Get the value of a property.
    pub fn get(&self, name: &str) -> Option<&TypedValue> {
        self.properties.get(name)
    }

    /// Remove a property and return its value.
    pub fn remove(&mut self, name: &str) -> Option<TypedValue> {
        self.properties.remove(name)
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether there are no properties.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Iterate over the properties ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypedValue)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<TypedProperty> for EventProperties {
    fn from_iter<I: IntoIterator<Item = TypedProperty>>(iter: I) -> Self {
        EventProperties {
            properties: iter.into_iter().map(|p| (p.name, p.value)).collect(),
        }
    }
}

impl IntoIterator for EventProperties {
    type Item = TypedProperty;
    type IntoIter = std::iter::Map<
        btree_map::IntoIter<String, TypedValue>,
        fn((String, TypedValue)) -> TypedProperty,
    >;

    fn into_iter(self) -> Self::IntoIter {
        self.properties
            .into_iter()
            .map(into_typed_property as fn(_) -> _)
    }
}

fn into_typed_property((name, value): (String, TypedValue)) -> TypedProperty {
    TypedProperty { name, value }
}

impl Serialize for EventProperties {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(
            self.properties
                .iter()
                .map(|(name, value)| TypedPropertyRef(name, value)),
        )
    }
}

impl<'de> Deserialize<'de> for EventProperties {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Vec::<TypedProperty>::deserialize(deserializer)?
            .into_iter()
            .collect())
    }
}
