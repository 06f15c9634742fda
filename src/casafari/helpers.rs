use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::{de, de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;

// Nested sections come back as an object, null, or an empty list when unset
pub fn object_or_empty<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Array(items) if items.is_empty() => Ok(None),
        value @ Value::Object(_) => T::deserialize(value).map(Some).map_err(de::Error::custom),
        other => Err(de::Error::custom(format!("expected an object, got {other}"))),
    }
}

// Identifiers and postal codes can be int or String
pub fn string_or_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Number(num) => Some(num.to_string()),
        other => {
            return Err(de::Error::custom(format!(
                "expected a string or number, got {other}"
            )))
        }
    })
}

pub fn decimal<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<BigDecimal>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::Number(num) => {
            Some(BigDecimal::from_str(&num.to_string()).map_err(de::Error::custom)?)
        }
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(
            BigDecimal::from_str(s.trim())
                .map_err(|_| de::Error::custom(format!("'{s}' is not a number")))?,
        ),
        other => return Err(de::Error::custom(format!("expected a number, got {other}"))),
    })
}

pub fn integer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i32>, D::Error> {
    let value = match Value::deserialize(deserializer)? {
        Value::Null => return Ok(None),
        Value::Number(num) => match (num.as_i64(), num.as_f64()) {
            (Some(i), _) => i,
            (None, Some(f)) if f.fract() == 0.0 => f as i64,
            _ => return Err(de::Error::custom(format!("{num} is not a whole number"))),
        },
        Value::String(s) if s.trim().is_empty() => return Ok(None),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| de::Error::custom(format!("'{s}' is not a whole number")))?,
        other => return Err(de::Error::custom(format!("expected a whole number, got {other}"))),
    };

    i32::try_from(value)
        .map(Some)
        .map_err(|_| de::Error::custom(format!("{value} is out of range")))
}

// Flags arrive as bool, 0/1 or "1"
pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        value => Some(is_truthy(&value)),
    })
}

/// Loose truthiness of a JSON value, as the provider uses it for flags such
/// as `next_page`.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(num) => num.as_f64().map_or(true, |n| n != 0.0),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::{flag, is_truthy};

    #[derive(Deserialize)]
    struct Flagged {
        #[serde(default, deserialize_with = "flag")]
        active: Option<bool>,
    }

    #[test]
    fn flags_accept_numbers_and_strings() {
        let read = |v| serde_json::from_value::<Flagged>(v).unwrap().active;
        assert_eq!(read(json!({"active": 1})), Some(true));
        assert_eq!(read(json!({"active": 0})), Some(false));
        assert_eq!(read(json!({"active": "1"})), Some(true));
        assert_eq!(read(json!({"active": false})), Some(false));
        assert_eq!(read(json!({"active": null})), None);
        assert_eq!(read(json!({})), None);
    }

    #[test]
    fn truthiness() {
        assert!(is_truthy(&json!(2)));
        assert!(is_truthy(&json!("https://api/next")));
        assert!(is_truthy(&json!({"page": 2})));
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!("0")));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!([])));
    }
}
