//! Lenient deserializers for upstream JSON
//!
//! The commerce API is not strict about scalar types: ids arrive as numbers
//! or numeric strings, amounts as floats or decimal strings, and collections
//! may be `null`. These helpers normalize all of that at the edge so the
//! aggregation code only sees well-typed values.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
}

impl Scalar {
    fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Int(v) => Some(*v),
            Scalar::Float(v) if v.fract() == 0.0 && v.is_finite() => Some(*v as i64),
            Scalar::Str(s) => {
                let s = s.trim();
                s.parse::<i64>().ok().or_else(|| {
                    s.parse::<f64>()
                        .ok()
                        .filter(|v| v.fract() == 0.0 && v.is_finite())
                        .map(|v| v as i64)
                })
            }
            _ => None,
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(v) => Some(*v as f64),
            Scalar::Float(v) if v.is_finite() => Some(*v),
            Scalar::Str(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
    }

    fn into_text(self) -> Option<String> {
        match self {
            Scalar::Int(v) => Some(v.to_string()),
            Scalar::Float(v) if v.fract() == 0.0 => Some(format!("{}", v as i64)),
            Scalar::Float(v) => Some(v.to_string()),
            Scalar::Bool(v) => Some(v.to_string()),
            Scalar::Str(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
        }
    }
}

/// Required integer id (number or numeric string)
pub fn id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Scalar::deserialize(deserializer)?;
    raw.as_i64()
        .ok_or_else(|| D::Error::custom("expected an integer id"))
}

/// Optional integer id; `null`, empty and unparseable values become `None`
pub fn opt_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Scalar>::deserialize(deserializer)?;
    Ok(raw.and_then(|v| v.as_i64()))
}

/// Numeric amount; `null` and unparseable values become `0.0`
pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Scalar>::deserialize(deserializer)?;
    Ok(raw.and_then(|v| v.as_f64()).unwrap_or(0.0))
}

/// Optional text that may arrive as a number (`"0"` and `0` are both kept)
pub fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Scalar>::deserialize(deserializer)?;
    Ok(raw.and_then(Scalar::into_text))
}

/// List of integer ids, skipping entries that are not ids
pub fn id_list<'de, D>(deserializer: D) -> Result<Vec<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Scalar>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .iter()
        .filter_map(Scalar::as_i64)
        .collect())
}

/// Boolean flag that may arrive as `0`/`1` or `"true"`
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Scalar>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Scalar::Bool(v)) => v,
        Some(Scalar::Int(v)) => v != 0,
        Some(Scalar::Float(v)) => v != 0.0,
        Some(Scalar::Str(s)) => matches!(s.trim(), "1" | "true" | "TRUE" | "True"),
        None => false,
    })
}

/// Any `Default` value, with `null` mapped to the default
pub fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(deserialize_with = "id")]
        id: i64,
        #[serde(default, deserialize_with = "opt_id")]
        store_id: Option<i64>,
        #[serde(default, deserialize_with = "number")]
        qty: f64,
        #[serde(default, deserialize_with = "opt_text")]
        profile: Option<String>,
        #[serde(default, deserialize_with = "id_list")]
        categories: Vec<i64>,
        #[serde(default, deserialize_with = "flag")]
        in_stock: bool,
    }

    #[test]
    fn test_numbers_and_strings_are_accepted() {
        let probe: Probe = serde_json::from_str(
            r#"{"id":"42","store_id":3,"qty":"2.5000","profile":0,"categories":["4",7,"x"],"in_stock":1}"#,
        )
        .unwrap();

        assert_eq!(probe.id, 42);
        assert_eq!(probe.store_id, Some(3));
        assert_eq!(probe.qty, 2.5);
        assert_eq!(probe.profile.as_deref(), Some("0"));
        assert_eq!(probe.categories, vec![4, 7]);
        assert!(probe.in_stock);
    }

    #[test]
    fn test_nulls_and_missing_fields_fall_back() {
        let probe: Probe =
            serde_json::from_str(r#"{"id":1.0,"store_id":null,"qty":null,"profile":"  "}"#).unwrap();

        assert_eq!(probe.id, 1);
        assert_eq!(probe.store_id, None);
        assert_eq!(probe.qty, 0.0);
        assert_eq!(probe.profile, None);
        assert!(probe.categories.is_empty());
        assert!(!probe.in_stock);
    }

    #[test]
    fn test_non_integer_id_is_rejected() {
        let result: Result<Probe, _> = serde_json::from_str(r#"{"id":"abc"}"#);
        assert!(result.is_err());
    }
}
