use derive_more::Display;
use derive_more::Error;
use serde_json::Value;

/// A JSON object, as found in Gerrit event payloads.
pub type JsonObject = serde_json::Map<String, Value>;

/// A value in a JSON object had the wrong type for its key.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum JsonFieldError {
    #[display(fmt = "Expected `{}` to be {}, but found {}", key, expected, found)]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl miette::Diagnostic for JsonFieldError {}

impl JsonFieldError {
    fn type_mismatch(key: &str, expected: &'static str, found: &Value) -> Self {
        Self::TypeMismatch {
            key: key.to_owned(),
            expected,
            found: json_type_name(found),
        }
    }
}

/// A Gerrit event attribute which can be hydrated from a JSON object.
pub trait GerritJsonDto {
    /// Fill in fields from the keys present in `json`.
    ///
    /// Keys which are absent leave the corresponding fields alone, so hydrating twice merges
    /// rather than resets.
    fn from_json(&mut self, json: &JsonObject) -> Result<(), JsonFieldError>;
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Get a present, non-`null` value.
fn get<'a>(json: &'a JsonObject, key: &str) -> Option<&'a Value> {
    json.get(key).filter(|value| !value.is_null())
}

/// Get a string.
///
/// Numbers and booleans are coerced to their JSON text; Gerrit has sent approval values as both
/// `"-1"` and `-1`.
pub fn get_string(json: &JsonObject, key: &str) -> Result<Option<String>, JsonFieldError> {
    match get(json, key) {
        None => Ok(None),
        Some(Value::String(string)) => Ok(Some(string.clone())),
        Some(Value::Number(number)) => Ok(Some(number.to_string())),
        Some(Value::Bool(boolean)) => Ok(Some(boolean.to_string())),
        Some(other) => Err(JsonFieldError::type_mismatch(key, "a string", other)),
    }
}

/// Get a boolean, accepting `true` and `false` either bare or as (case-insensitive) strings.
pub fn get_bool(json: &JsonObject, key: &str) -> Result<Option<bool>, JsonFieldError> {
    match get(json, key) {
        None => Ok(None),
        Some(Value::Bool(boolean)) => Ok(Some(*boolean)),
        Some(value @ Value::String(string)) => {
            if string.eq_ignore_ascii_case("true") {
                Ok(Some(true))
            } else if string.eq_ignore_ascii_case("false") {
                Ok(Some(false))
            } else {
                Err(JsonFieldError::type_mismatch(key, "a boolean", value))
            }
        }
        Some(other) => Err(JsonFieldError::type_mismatch(key, "a boolean", other)),
    }
}

pub fn get_object<'a>(
    json: &'a JsonObject,
    key: &str,
) -> Result<Option<&'a JsonObject>, JsonFieldError> {
    match get(json, key) {
        None => Ok(None),
        Some(Value::Object(object)) => Ok(Some(object)),
        Some(other) => Err(JsonFieldError::type_mismatch(key, "an object", other)),
    }
}

pub fn get_array<'a>(
    json: &'a JsonObject,
    key: &str,
) -> Result<Option<&'a Vec<Value>>, JsonFieldError> {
    match get(json, key) {
        None => Ok(None),
        Some(Value::Array(array)) => Ok(Some(array)),
        Some(other) => Err(JsonFieldError::type_mismatch(key, "an array", other)),
    }
}

/// Interpret a value as a JSON object, naming it `key` in errors.
pub fn as_object<'a>(value: &'a Value, key: &str) -> Result<&'a JsonObject, JsonFieldError> {
    value
        .as_object()
        .ok_or_else(|| JsonFieldError::type_mismatch(key, "an object", value))
}
