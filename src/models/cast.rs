//! Cast descriptors and casted values.
//!
//! A [`Cast`] describes how a raw JSON attribute becomes a richer value:
//! a primitive, a nested [`Model`], a list of casts, a [`ModelCollection`]
//! or an enum case. Model kinds declare their casts as [`Cast`] values;
//! [`Cast::parse`] accepts the textual descriptor grammar for casts added at
//! runtime.

use std::fmt;

use serde_json::{Map, Value};

use crate::clients::ClientContext;
use crate::models::enums::{EnumKind, EnumValue};
use crate::models::{Model, ModelCollection, ModelError, ModelKind};

/// How an attribute value is converted when read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Cast {
    /// Integer coercion.
    Int,
    /// Floating point coercion.
    Float,
    /// String coercion.
    Str,
    /// A nested model of the given kind.
    Model(ModelKind),
    /// A list whose elements are cast with the optional element cast.
    Array(Option<Box<Cast>>),
    /// A [`ModelCollection`] of the given kind.
    Collection(ModelKind),
    /// A case of the given enum. `None` fails at cast time.
    Enum(Option<EnumKind>),
}

impl Cast {
    /// Shorthand for `Cast::Array(Some(Box::new(element)))`.
    #[must_use]
    pub fn array_of(element: Self) -> Self {
        Self::Array(Some(Box::new(element)))
    }

    /// Parses a textual cast descriptor.
    ///
    /// Accepted forms:
    ///
    /// - a model kind name, e.g. `City`
    /// - `int`, `integer`, `float`, `double`, `real`, `string`
    /// - `array`, `array:<sub>`, `array:<sub>,<params>` (e.g. `array:enum,Weekday`)
    /// - `collection:<Kind>` or `collection:ModelCollection,<Kind>`
    /// - `enum:<EnumKind>` or bare `enum`
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidCast`] naming the unrecognized type and
    /// `owner` when the descriptor matches none of the forms above.
    ///
    /// # Example
    ///
    /// ```rust
    /// use econt_api::models::{Cast, EnumKind, ModelKind};
    ///
    /// let cast = Cast::parse("array:enum,Weekday", ModelKind::CdPayOptions).unwrap();
    /// assert_eq!(cast, Cast::array_of(Cast::Enum(Some(EnumKind::Weekday))));
    /// ```
    pub fn parse(descriptor: &str, owner: ModelKind) -> Result<Self, ModelError> {
        if let Some(kind) = ModelKind::from_name(descriptor) {
            return Ok(Self::Model(kind));
        }

        let (kind, params) = descriptor.split_once(':').unwrap_or((descriptor, ""));
        let params: Vec<&str> = if params.is_empty() {
            Vec::new()
        } else {
            params.split(',').collect()
        };
        let invalid = || ModelError::InvalidCast {
            cast: kind.to_string(),
            model: owner.name(),
        };

        match kind {
            "int" | "integer" => Ok(Self::Int),
            "float" | "double" | "real" => Ok(Self::Float),
            "string" => Ok(Self::Str),
            "array" => match params.split_first() {
                None => Ok(Self::Array(None)),
                Some((sub, rest)) => {
                    let sub = if rest.is_empty() {
                        (*sub).to_string()
                    } else {
                        format!("{sub}:{}", rest.join(","))
                    };
                    Ok(Self::array_of(Self::parse(&sub, owner)?))
                }
            },
            "collection" => {
                let element = match params.as_slice() {
                    [] => Some(ModelKind::Generic),
                    [element] => ModelKind::from_name(element),
                    ["ModelCollection", element] => ModelKind::from_name(element),
                    _ => None,
                };
                element.map(Self::Collection).ok_or_else(invalid)
            }
            "enum" => match params.first() {
                None => Ok(Self::Enum(None)),
                Some(name) => EnumKind::from_name(name)
                    .map(|kind| Self::Enum(Some(kind)))
                    .ok_or_else(invalid),
            },
            _ => Err(invalid()),
        }
    }

    /// Casts `value` of the attribute `attribute` on a model of kind `owner`.
    ///
    /// `null` stays `null` for primitive, model and enum casts. A `null`
    /// array becomes an empty list and a `null` collection an empty
    /// collection. Nested models and collections receive `client`.
    pub(crate) fn apply(
        &self,
        value: &Value,
        owner: ModelKind,
        attribute: &str,
        client: Option<&ClientContext>,
    ) -> Result<CastValue, ModelError> {
        match self {
            Self::Int => Ok(match value {
                Value::Null => CastValue::Null,
                other => CastValue::Int(to_int(other)),
            }),
            Self::Float => Ok(match value {
                Value::Null => CastValue::Null,
                other => CastValue::Float(to_float(other)),
            }),
            Self::Str => Ok(match value {
                Value::Null => CastValue::Null,
                other => CastValue::String(to_string(other)),
            }),
            Self::Model(kind) => match value {
                Value::Null => Ok(CastValue::Null),
                Value::Array(items) if items.is_empty() => {
                    let mut model = Model::new(*kind);
                    if let Some(client) = client {
                        model.set_client(client.clone());
                    }
                    Ok(CastValue::Model(model))
                }
                Value::Object(attributes) => {
                    let mut model = Model::with_attributes(*kind, attributes.clone());
                    if let Some(client) = client {
                        model.set_client(client.clone());
                    }
                    Ok(CastValue::Model(model))
                }
                _ => Err(ModelError::NotAnObject {
                    model: owner.name(),
                    attribute: attribute.to_string(),
                    target: kind.name(),
                }),
            },
            Self::Array(element) => {
                let element = match element {
                    Some(element) => element,
                    None => return Ok(CastValue::Raw(to_array(value))),
                };
                match value {
                    Value::Null => Ok(CastValue::List(Vec::new())),
                    Value::Array(items) => items
                        .iter()
                        .enumerate()
                        .map(|(index, item)| {
                            element.apply(item, owner, &index.to_string(), client)
                        })
                        .collect::<Result<Vec<_>, _>>()
                        .map(CastValue::List),
                    Value::Object(entries) => entries
                        .iter()
                        .map(|(key, item)| {
                            element
                                .apply(item, owner, key, client)
                                .map(|casted| (key.clone(), casted))
                        })
                        .collect::<Result<Vec<_>, _>>()
                        .map(CastValue::Keyed),
                    scalar => element
                        .apply(scalar, owner, "0", client)
                        .map(|casted| CastValue::List(vec![casted])),
                }
            }
            Self::Collection(kind) => {
                let items: Vec<Value> = match value {
                    Value::Null => Vec::new(),
                    Value::Array(items) => items.clone(),
                    Value::Object(entries) => entries.values().cloned().collect(),
                    _ => {
                        return Err(ModelError::NotAList {
                            key: attribute.to_string(),
                        })
                    }
                };
                let mut collection = ModelCollection::from_values(items, *kind)?;
                if let Some(client) = client {
                    collection.set_client(client.clone());
                }
                Ok(CastValue::Collection(collection))
            }
            Self::Enum(None) => Err(ModelError::MissingEnumType {
                model: owner.name(),
                attribute: attribute.to_string(),
            }),
            Self::Enum(Some(kind)) => {
                let parsed = match value {
                    Value::Null => return Ok(CastValue::Null),
                    Value::String(text) => kind.parse(text),
                    _ => None,
                };
                parsed
                    .map(CastValue::Enum)
                    .ok_or_else(|| ModelError::InvalidEnumValue {
                        model: owner.name(),
                        attribute: attribute.to_string(),
                        enum_name: kind.name(),
                        value: value.to_string(),
                    })
            }
        }
    }
}

impl fmt::Display for Cast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => f.write_str("int"),
            Self::Float => f.write_str("float"),
            Self::Str => f.write_str("string"),
            Self::Model(kind) => f.write_str(kind.name()),
            Self::Array(None) => f.write_str("array"),
            Self::Array(Some(element)) => match element.as_ref() {
                Self::Enum(Some(kind)) => write!(f, "array:enum,{}", kind.name()),
                Self::Collection(kind) => write!(f, "array:collection,{}", kind.name()),
                other => write!(f, "array:{other}"),
            },
            Self::Collection(kind) => write!(f, "collection:{}", kind.name()),
            Self::Enum(None) => f.write_str("enum"),
            Self::Enum(Some(kind)) => write!(f, "enum:{}", kind.name()),
        }
    }
}

/// The result of casting an attribute.
#[derive(Clone, Debug, PartialEq)]
pub enum CastValue {
    /// The raw value was `null`.
    Null,
    /// An integer cast.
    Int(i64),
    /// A floating point cast.
    Float(f64),
    /// A string cast.
    String(String),
    /// An uncast value, or an `array` cast without element cast.
    Raw(Value),
    /// A nested model.
    Model(Model),
    /// A list cast from a JSON array.
    List(Vec<CastValue>),
    /// A list cast from a JSON object, keeping its keys.
    Keyed(Vec<(String, CastValue)>),
    /// A collection of models.
    Collection(ModelCollection),
    /// An enum case.
    Enum(EnumValue),
}

impl CastValue {
    /// Returns `true` for [`CastValue::Null`] and a raw `null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null | Self::Raw(Value::Null))
    }

    /// Returns the integer, if this is an integer cast.
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the float, if this is a float cast.
    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the string of a string cast or a raw string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            Self::Raw(Value::String(value)) => Some(value),
            _ => None,
        }
    }

    /// Returns the raw value, if the attribute was not cast.
    #[must_use]
    pub const fn as_raw(&self) -> Option<&Value> {
        match self {
            Self::Raw(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the nested model.
    #[must_use]
    pub const fn as_model(&self) -> Option<&Model> {
        match self {
            Self::Model(model) => Some(model),
            _ => None,
        }
    }

    /// Returns the elements of a list cast.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the entries of a keyed list cast.
    #[must_use]
    pub fn as_keyed(&self) -> Option<&[(String, Self)]> {
        match self {
            Self::Keyed(entries) => Some(entries),
            _ => None,
        }
    }

    /// Returns the collection.
    #[must_use]
    pub const fn as_collection(&self) -> Option<&ModelCollection> {
        match self {
            Self::Collection(collection) => Some(collection),
            _ => None,
        }
    }

    /// Returns the enum case.
    #[must_use]
    pub const fn as_enum(&self) -> Option<EnumValue> {
        match self {
            Self::Enum(value) => Some(*value),
            _ => None,
        }
    }

    /// Converts the casted value back to JSON.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Int(value) => Value::from(*value),
            Self::Float(value) => Value::from(*value),
            Self::String(value) => Value::String(value.clone()),
            Self::Raw(value) => value.clone(),
            Self::Model(model) => model.to_value(),
            Self::List(items) => Value::Array(items.iter().map(Self::to_value).collect()),
            Self::Keyed(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(key, item)| (key.clone(), item.to_value()))
                    .collect::<Map<_, _>>(),
            ),
            Self::Collection(collection) => collection.to_value(),
            Self::Enum(value) => Value::String(value.value().to_string()),
        }
    }
}

fn to_array(value: &Value) -> Value {
    match value {
        Value::Null => Value::Array(Vec::new()),
        Value::Array(_) | Value::Object(_) => value.clone(),
        scalar => Value::Array(vec![scalar.clone()]),
    }
}

fn to_int(value: &Value) -> i64 {
    match value {
        Value::Bool(flag) => i64::from(*flag),
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(truncate))
            .unwrap_or_default(),
        Value::String(text) => {
            let prefix = numeric_prefix(text);
            prefix
                .parse::<i64>()
                .ok()
                .or_else(|| prefix.parse::<f64>().ok().map(truncate))
                .unwrap_or_default()
        }
        Value::Array(items) => i64::from(!items.is_empty()),
        Value::Object(_) => 1,
        Value::Null => 0,
    }
}

fn to_float(value: &Value) -> f64 {
    match value {
        Value::Bool(flag) => f64::from(u8::from(*flag)),
        Value::Number(number) => number.as_f64().unwrap_or_default(),
        Value::String(text) => numeric_prefix(text).parse().unwrap_or_default(),
        Value::Array(items) => f64::from(u8::from(!items.is_empty())),
        Value::Object(_) => 1.0,
        Value::Null => 0.0,
    }
}

fn to_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) | Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn truncate(value: f64) -> i64 {
    value.trunc() as i64
}

/// Returns the longest leading part of `text` that reads as a number,
/// after skipping leading whitespace.
fn numeric_prefix(text: &str) -> &str {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let digits_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut has_digits = end > digits_start;

    if bytes.get(end) == Some(&b'.') {
        let mut fraction = end + 1;
        while bytes.get(fraction).is_some_and(u8::is_ascii_digit) {
            fraction += 1;
        }
        if fraction > end + 1 || has_digits {
            has_digits = has_digits || fraction > end + 1;
            end = fraction;
        }
    }
    if !has_digits {
        return "";
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent = end + 1;
        if matches!(bytes.get(exponent), Some(b'+' | b'-')) {
            exponent += 1;
        }
        let exponent_digits = exponent;
        while bytes.get(exponent).is_some_and(u8::is_ascii_digit) {
            exponent += 1;
        }
        if exponent > exponent_digits {
            end = exponent;
        }
    }

    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::Weekday;
    use serde_json::json;

    // === Parsing ===

    #[test]
    fn test_parse_primitives() {
        let owner = ModelKind::Generic;
        assert_eq!(Cast::parse("int", owner).unwrap(), Cast::Int);
        assert_eq!(Cast::parse("integer", owner).unwrap(), Cast::Int);
        assert_eq!(Cast::parse("double", owner).unwrap(), Cast::Float);
        assert_eq!(Cast::parse("real", owner).unwrap(), Cast::Float);
        assert_eq!(Cast::parse("string", owner).unwrap(), Cast::Str);
    }

    #[test]
    fn test_parse_model_and_collection() {
        let owner = ModelKind::Generic;
        assert_eq!(
            Cast::parse("City", owner).unwrap(),
            Cast::Model(ModelKind::City)
        );
        assert_eq!(
            Cast::parse("collection:Office", owner).unwrap(),
            Cast::Collection(ModelKind::Office)
        );
        assert_eq!(
            Cast::parse("collection:ModelCollection,Office", owner).unwrap(),
            Cast::Collection(ModelKind::Office)
        );
        assert_eq!(
            Cast::parse("array:HostedFile", owner).unwrap(),
            Cast::array_of(Cast::Model(ModelKind::HostedFile))
        );
    }

    #[test]
    fn test_parse_enum_forms() {
        let owner = ModelKind::Generic;
        assert_eq!(Cast::parse("enum", owner).unwrap(), Cast::Enum(None));
        assert_eq!(
            Cast::parse("enum:DayType", owner).unwrap(),
            Cast::Enum(Some(EnumKind::DayType))
        );
    }

    #[test]
    fn test_parse_invalid_descriptor() {
        let error = Cast::parse("datetime:Y-m-d", ModelKind::City).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Invalid cast type [datetime] for model [City]."
        );
        assert!(Cast::parse("enum:Color", ModelKind::City).is_err());
        assert!(Cast::parse("collection:Nothing", ModelKind::City).is_err());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let casts = [
            Cast::Int,
            Cast::Model(ModelKind::Address),
            Cast::array_of(Cast::Enum(Some(EnumKind::Weekday))),
            Cast::Collection(ModelKind::WorkingTime),
            Cast::Enum(Some(EnumKind::ShipmentType)),
        ];
        for cast in casts {
            assert_eq!(Cast::parse(&cast.to_string(), ModelKind::Generic).unwrap(), cast);
        }
    }

    // === Applying ===

    #[test]
    fn test_primitive_casts_keep_null() {
        let owner = ModelKind::Generic;
        assert_eq!(Cast::Int.apply(&Value::Null, owner, "a", None).unwrap(), CastValue::Null);
        assert_eq!(Cast::Float.apply(&Value::Null, owner, "a", None).unwrap(), CastValue::Null);
        assert_eq!(Cast::Str.apply(&Value::Null, owner, "a", None).unwrap(), CastValue::Null);
    }

    #[test]
    fn test_numeric_coercion() {
        let owner = ModelKind::Generic;
        let int = |value: Value| Cast::Int.apply(&value, owner, "a", None).unwrap();
        let float = |value: Value| Cast::Float.apply(&value, owner, "a", None).unwrap();

        assert_eq!(int(json!("42")), CastValue::Int(42));
        assert_eq!(int(json!(" 12abc")), CastValue::Int(12));
        assert_eq!(int(json!("abc")), CastValue::Int(0));
        assert_eq!(int(json!(3.9)), CastValue::Int(3));
        assert_eq!(int(json!(true)), CastValue::Int(1));
        assert_eq!(float(json!("42.7559")), CastValue::Float(42.7559));
        assert_eq!(float(json!("1e3")), CastValue::Float(1000.0));
        assert_eq!(float(json!(7)), CastValue::Float(7.0));
    }

    #[test]
    fn test_array_cast_null_becomes_empty_list() {
        let cast = Cast::array_of(Cast::Enum(Some(EnumKind::Weekday)));
        let result = cast.apply(&Value::Null, ModelKind::CdPayOptions, "payWeekdays", None);
        assert_eq!(result.unwrap(), CastValue::List(Vec::new()));

        let raw = Cast::Array(None).apply(&json!(5), ModelKind::Generic, "a", None);
        assert_eq!(raw.unwrap(), CastValue::Raw(json!([5])));
    }

    #[test]
    fn test_array_cast_each_element() {
        let cast = Cast::array_of(Cast::Enum(Some(EnumKind::Weekday)));
        let result = cast
            .apply(&json!(["monday", "friday"]), ModelKind::CdPayOptions, "payWeekdays", None)
            .unwrap();
        assert_eq!(
            result,
            CastValue::List(vec![
                CastValue::Enum(EnumValue::Weekday(Weekday::Monday)),
                CastValue::Enum(EnumValue::Weekday(Weekday::Friday)),
            ])
        );
    }

    #[test]
    fn test_array_cast_keeps_object_keys() {
        let cast = Cast::array_of(Cast::Int);
        let result = cast
            .apply(&json!({"a": "1", "b": "2"}), ModelKind::Generic, "counts", None)
            .unwrap();
        let entries = result.as_keyed().unwrap();
        assert_eq!(entries[0], ("a".to_string(), CastValue::Int(1)));
        assert_eq!(entries[1], ("b".to_string(), CastValue::Int(2)));
    }

    #[test]
    fn test_enum_cast_errors() {
        let missing = Cast::Enum(None).apply(&json!("x"), ModelKind::Office, "kind", None);
        assert!(matches!(missing, Err(ModelError::MissingEnumType { .. })));

        let invalid = Cast::Enum(Some(EnumKind::DayType)).apply(
            &json!("weekend"),
            ModelKind::WorkingDateTime,
            "dayType",
            None,
        );
        assert!(matches!(invalid, Err(ModelError::InvalidEnumValue { .. })));
    }

    #[test]
    fn test_model_cast_requires_object() {
        let cast = Cast::Model(ModelKind::City);
        assert_eq!(
            cast.apply(&Value::Null, ModelKind::Address, "city", None).unwrap(),
            CastValue::Null
        );
        let error = cast
            .apply(&json!("Sofia"), ModelKind::Address, "city", None)
            .unwrap_err();
        assert!(matches!(error, ModelError::NotAnObject { target: "City", .. }));
    }

    #[test]
    fn test_model_cast_accepts_empty_list() {
        let cast = Cast::Model(ModelKind::City);
        let result = cast
            .apply(&json!([]), ModelKind::Address, "city", None)
            .unwrap();
        let city = result.as_model().unwrap();
        assert_eq!(city.kind(), ModelKind::City);
        assert!(city.attributes().is_empty());

        let error = cast
            .apply(&json!(["Sofia"]), ModelKind::Address, "city", None)
            .unwrap_err();
        assert!(matches!(error, ModelError::NotAnObject { .. }));
    }

    #[test]
    fn test_collection_cast_null_is_empty() {
        let cast = Cast::Collection(ModelKind::WorkingTime);
        let result = cast
            .apply(&Value::Null, ModelKind::ServiceTimes, "serviceOfficeClientsWorkTimes", None)
            .unwrap();
        let collection = result.as_collection().unwrap();
        assert!(collection.is_empty());
        assert_eq!(collection.model_kind(), Some(ModelKind::WorkingTime));
    }

    #[test]
    fn test_to_value_of_casted_values() {
        let value = CastValue::List(vec![
            CastValue::Int(1),
            CastValue::Enum(EnumValue::Weekday(Weekday::Sunday)),
            CastValue::Null,
        ]);
        assert_eq!(value.to_value(), json!([1, "sunday", null]));
    }
}
