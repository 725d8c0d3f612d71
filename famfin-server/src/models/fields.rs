//! Request body decoding
//!
//! Create payloads and changesets derive `Deserialize`. `decode` runs the
//! derived impl over a JSON object and, when it fails, re-runs it one key
//! at a time so every bad field gets its own location in the 422.

use serde::de::{self, DeserializeOwned, Deserializer, Unexpected, Visitor};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::{ValidationError, ValidationErrors};

/// Sparse update of a nullable field.
///
/// `Keep` means the key was absent from the changeset (pair with
/// `#[serde(default)]`). `Clear` is an explicit `null`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Update<T> {
    #[default]
    Keep,
    Clear,
    Set(T),
}

impl<T> Update<T> {
    /// Write this update into `slot`, leaving it untouched on `Keep`.
    pub fn apply_to(self, slot: &mut Option<T>) {
        match self {
            Self::Keep => {}
            Self::Clear => *slot = None,
            Self::Set(value) => *slot = Some(value),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Update<U> {
        match self {
            Self::Keep => Update::Keep,
            Self::Clear => Update::Clear,
            Self::Set(value) => Update::Set(f(value)),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Update<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(|value| value.map_or(Update::Clear, Update::Set))
    }
}

/// Changeset slot for a non-nullable column: absent is `None` (with
/// `#[serde(default)]`), `null` is rejected.
pub fn non_null<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Integers that also accept integral floats (`1.0`) and numeric strings
/// (`"1"`). Fractions, other strings and out-of-range values are rejected.
pub mod lax {
    use super::*;

    struct Int(i64);

    impl<'de> Deserialize<'de> for Int {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_any(IntVisitor).map(Int)
        }
    }

    struct IntVisitor;

    impl<'de> Visitor<'de> for IntVisitor {
        type Value = i64;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            f.write_str("an integer")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
            i64::try_from(v).map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
            // i64::MAX as f64 rounds up to 2^63, which is out of range
            if v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
                Ok(v as i64)
            } else {
                Err(E::invalid_value(Unexpected::Float(v), &self))
            }
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
            v.trim()
                .parse()
                .map_err(|_| E::invalid_value(Unexpected::Str(v), &self))
        }
    }

    struct Int32(i32);

    impl<'de> Deserialize<'de> for Int32 {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let Int(n) = Int::deserialize(deserializer)?;
            i32::try_from(n)
                .map(Int32)
                .map_err(|_| {
                    <D::Error as de::Error>::invalid_value(Unexpected::Signed(n), &"a 32-bit integer")
                })
        }
    }

    fn unwrap_all(items: Vec<Int32>) -> Vec<i32> {
        items.into_iter().map(|Int32(n)| n).collect()
    }

    pub fn int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        Int::deserialize(deserializer).map(|Int(n)| n)
    }

    pub fn int_list<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<i32>>, D::Error> {
        Option::<Vec<Int32>>::deserialize(deserializer).map(|items| items.map(unwrap_all))
    }

    pub fn int_list_update<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Update<Vec<i32>>, D::Error> {
        Update::<Vec<Int32>>::deserialize(deserializer).map(|items| items.map(unwrap_all))
    }
}

/// Decode a JSON object body into `T`.
///
/// On failure every present key with a bad value is reported, followed by
/// the first absent required field in declaration order.
pub fn decode<T: DeserializeOwned>(map: &Map<String, Value>) -> Result<T, ValidationErrors> {
    let whole = match serde_json::from_value::<T>(Value::Object(map.clone())) {
        Ok(decoded) => return Ok(decoded),
        Err(e) => e,
    };

    let mut errors = Vec::new();
    let mut valid = Map::new();
    for (field, value) in map {
        match field_error::<T>(field, value) {
            Some(e) => errors.push(e),
            None => {
                valid.insert(field.clone(), value.clone());
            }
        }
    }

    // A key dropped for its bad value reads as missing here; it is already reported
    if let Err(e) = serde_json::from_value::<T>(Value::Object(valid)) {
        if let Some(field) = missing_field(&e).filter(|f| !map.contains_key(f)) {
            errors.push(ValidationError::Missing { field });
        }
    }

    if errors.is_empty() {
        errors.push(ValidationError::MalformedJson {
            reason: whole.to_string(),
        });
    }
    Err(errors.into_iter().collect())
}

/// Decode `T` from a body holding only `field`; absent siblings don't count.
fn field_error<T: DeserializeOwned>(field: &str, value: &Value) -> Option<ValidationError> {
    let single = Map::from_iter([(field.to_owned(), value.clone())]);
    let err = serde_json::from_value::<T>(Value::Object(single)).err()?;
    if missing_field(&err).is_some() {
        return None;
    }

    let field = field.to_owned();
    Some(if value.is_null() {
        ValidationError::Null { field }
    } else {
        ValidationError::Invalid {
            field,
            message: err.to_string(),
        }
    })
}

fn missing_field(err: &serde_json::Error) -> Option<String> {
    let message = err.to_string();
    message
        .strip_prefix("missing field `")?
        .strip_suffix('`')
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Sample {
        #[serde(deserialize_with = "lax::int")]
        id: i64,
        name: String,
        #[serde(default)]
        note: Update<String>,
        #[serde(default, deserialize_with = "non_null")]
        label: Option<String>,
        #[serde(default, deserialize_with = "lax::int_list")]
        tags: Option<Vec<i32>>,
    }

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test body must be an object"),
        }
    }

    fn decode_sample(value: Value) -> Result<Sample, ValidationErrors> {
        decode(&object(value))
    }

    #[test]
    fn update_distinguishes_absent_from_null() {
        let absent = decode_sample(json!({ "id": 1, "name": "a" })).unwrap();
        assert_eq!(absent.note, Update::Keep);

        let cleared = decode_sample(json!({ "id": 1, "name": "a", "note": null })).unwrap();
        assert_eq!(cleared.note, Update::Clear);

        let set = decode_sample(json!({ "id": 1, "name": "a", "note": "hi" })).unwrap();
        assert_eq!(set.note, Update::Set("hi".to_owned()));
    }

    #[test]
    fn non_null_rejects_null() {
        let errors = decode_sample(json!({ "id": 1, "name": "a", "label": null })).unwrap_err();
        assert_eq!(
            errors.errors(),
            &[ValidationError::Null {
                field: "label".into()
            }]
        );
    }

    #[test]
    fn lax_integers_accept_integral_forms() {
        let sample = decode_sample(json!({ "id": "7", "name": "a", "tags": ["2", 3.0, 4] })).unwrap();
        assert_eq!(sample.id, 7);
        assert_eq!(sample.tags, Some(vec![2, 3, 4]));

        assert_eq!(decode_sample(json!({ "id": 1.0, "name": "a" })).unwrap().id, 1);
    }

    #[test]
    fn lax_integers_reject_the_rest() {
        for bad in [json!(1.5), json!("abc"), json!(true), json!(9_223_372_036_854_775_808_u64)] {
            let errors = decode_sample(json!({ "id": bad, "name": "a" })).unwrap_err();
            assert_eq!(errors.errors()[0].loc(), vec!["body", "id"], "{bad}");
        }

        let errors = decode_sample(json!({ "id": 1, "name": "a", "tags": [1, 5_000_000_000_i64] }))
            .unwrap_err();
        assert_eq!(errors.errors()[0].kind(), "int_type");
    }

    #[test]
    fn bad_list_item_is_int_type() {
        let errors = decode_sample(json!({ "id": 1, "name": "a", "tags": [1, "two"] })).unwrap_err();
        assert_eq!(errors.errors()[0].loc(), vec!["body", "tags"]);
        assert_eq!(errors.errors()[0].kind(), "int_type");
    }

    #[test]
    fn reports_bad_values_and_missing_field() {
        let errors = decode_sample(json!({ "name": 5, "label": 5, "extra": true })).unwrap_err();
        let locs: Vec<Vec<String>> = errors.errors().iter().map(ValidationError::loc).collect();

        assert_eq!(errors.errors().len(), 3);
        assert!(locs.contains(&vec!["body".into(), "name".into()]));
        assert!(locs.contains(&vec!["body".into(), "label".into()]));
        assert_eq!(
            errors.errors()[2],
            ValidationError::Missing { field: "id".into() }
        );
    }

    #[test]
    fn bad_value_is_not_also_missing() {
        let errors = decode_sample(json!({ "id": "abc", "name": "a" })).unwrap_err();
        assert_eq!(errors.errors().len(), 1);
        assert_eq!(errors.errors()[0].loc(), vec!["body", "id"]);
    }

    #[test]
    fn update_apply_to() {
        let mut slot = Some("old".to_owned());
        Update::Keep.apply_to(&mut slot);
        assert_eq!(slot.as_deref(), Some("old"));

        Update::Set("new".to_owned()).apply_to(&mut slot);
        assert_eq!(slot.as_deref(), Some("new"));

        Update::Clear.apply_to(&mut slot);
        assert_eq!(slot, None);
    }
}
