//! Property values and the shapes a per-segment property can take
//!
//! A property arrives as one of three forms: a scalar applied to every
//! segment, a list indexed by segment (extended with its last value), or an
//! index mapping that targets specific segments. Style bundles are a fourth,
//! per-index form carrying a whole property set.
//!
//! Dynamic input (JSON, bindings) goes through [`PropertySpec::from_json`]
//! and [`StyleBundles::from_json`]; nothing downstream inspects raw values.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RichTextError};

/// A single property value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Number(f64),
    Str(String),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view; numeric strings such as `"20"` are accepted
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Str(s) => s.trim().parse().ok(),
            Value::Bool(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => Some(*n != 0.0),
            Value::Str(s) => match s.to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Some(true),
                "false" | "no" | "off" | "0" | "" => Some(false),
                _ => None,
            },
        }
    }

    fn from_json(value: &serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(Value::Number)
                .ok_or_else(|| RichTextError::invalid(format!("unrepresentable number {n}"))),
            serde_json::Value::String(s) => Ok(Value::Str(s.clone())),
            other => Err(RichTextError::invalid(format!(
                "expected a string, number or bool, got {other}"
            ))),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Number(value as f64)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(value as f64)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

/// Key of an index mapping: one index, or a tuple that fans out
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndexKey {
    Single(usize),
    Many(Vec<usize>),
}

impl IndexKey {
    pub fn indices(&self) -> &[usize] {
        match self {
            IndexKey::Single(i) => std::slice::from_ref(i),
            IndexKey::Many(v) => v,
        }
    }

    /// Parses `"3"`, `"0,2,4"` or `"(0, 2, 4)"`
    pub fn parse(key: &str) -> Result<Self> {
        let inner = key
            .trim()
            .trim_start_matches(['(', '['])
            .trim_end_matches([')', ']']);
        let parts: Vec<&str> = inner
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        if parts.is_empty() {
            return Err(RichTextError::invalid(format!("empty index key {key:?}")));
        }

        let mut indices = Vec::with_capacity(parts.len());
        for part in &parts {
            let idx = part
                .parse::<usize>()
                .map_err(|_| RichTextError::invalid(format!("index key {key:?} is not an integer")))?;
            indices.push(idx);
        }

        if indices.len() == 1 && !inner.contains(',') {
            Ok(IndexKey::Single(indices[0]))
        } else {
            Ok(IndexKey::Many(indices))
        }
    }

    fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => n.as_u64().map(|i| IndexKey::Single(i as usize)),
            serde_json::Value::Array(items) => items
                .iter()
                .map(|item| item.as_u64().map(|i| i as usize))
                .collect::<Option<Vec<_>>>()
                .map(IndexKey::Many),
            _ => None,
        }
    }
}

impl From<usize> for IndexKey {
    fn from(value: usize) -> Self {
        IndexKey::Single(value)
    }
}

impl From<Vec<usize>> for IndexKey {
    fn from(value: Vec<usize>) -> Self {
        IndexKey::Many(value)
    }
}

impl<const N: usize> From<[usize; N]> for IndexKey {
    fn from(value: [usize; N]) -> Self {
        IndexKey::Many(value.to_vec())
    }
}

/// The three shapes a per-segment property can take
#[derive(Debug, Clone, PartialEq)]
pub enum PropertySpec {
    /// One value for every segment
    Scalar(Value),
    /// Per-segment values, extended with the last element
    List(Vec<Value>),
    /// Targeted overrides; later entries win on the same index
    IndexMap(Vec<(IndexKey, Value)>),
}

impl PropertySpec {
    pub fn scalar(value: impl Into<Value>) -> Self {
        PropertySpec::Scalar(value.into())
    }

    pub fn list<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Self {
        PropertySpec::List(values.into_iter().map(Into::into).collect())
    }

    pub fn map<K: Into<IndexKey>, V: Into<Value>>(
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        PropertySpec::IndexMap(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// The single dispatch point for dynamic input
    ///
    /// - string, number, bool: scalar
    /// - array of `[index | [indices], value]` pairs: index mapping
    /// - any other array of scalars: list
    /// - object keyed by `"i"` or `"i,j,k"`: index mapping
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Array(items) => {
                if let Some(pairs) = pairs_from_json(items) {
                    return Ok(PropertySpec::IndexMap(pairs?));
                }
                items
                    .iter()
                    .map(Value::from_json)
                    .collect::<Result<Vec<_>>>()
                    .map(PropertySpec::List)
            },
            serde_json::Value::Object(entries) => {
                let mut out = Vec::with_capacity(entries.len());
                for (key, value) in entries {
                    out.push((IndexKey::parse(key)?, Value::from_json(value)?));
                }
                Ok(PropertySpec::IndexMap(out))
            },
            serde_json::Value::Null => Err(RichTextError::invalid(
                "property must be a scalar, a list, or a mapping",
            )),
            scalar => Value::from_json(scalar).map(PropertySpec::Scalar),
        }
    }
}

/// Recognises the list-of-pairs mapping form
///
/// Returns `None` when the array is not made entirely of index/value pairs,
/// in which case the caller treats it as a plain list.
fn pairs_from_json(items: &[serde_json::Value]) -> Option<Result<Vec<(IndexKey, Value)>>> {
    if items.is_empty() {
        return None;
    }
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let pair = item.as_array().filter(|p| p.len() == 2)?;
        let key = IndexKey::from_json(&pair[0])?;
        out.push((key, &pair[1]));
    }
    Some(
        out.into_iter()
            .map(|(k, v)| Value::from_json(v).map(|v| (k, v)))
            .collect(),
    )
}

/// Extend a list to `n` entries by repeating its last element
///
/// An empty list yields `None` everywhere; a longer list is truncated.
pub fn extend_list(values: &[Value], n: usize) -> Vec<Option<Value>> {
    match values.last() {
        None => vec![None; n],
        Some(last) => (0..n)
            .map(|i| Some(values.get(i).unwrap_or(last).clone()))
            .collect(),
    }
}

/// Expand tuple keys into one entry per index
pub fn flatten_index_map(entries: &[(IndexKey, Value)]) -> BTreeMap<usize, Value> {
    let mut flat = BTreeMap::new();
    for (key, value) in entries {
        for &idx in key.indices() {
            flat.insert(idx, value.clone());
        }
    }
    flat
}

/// Per-index full property sets, the highest-precedence override
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleBundles {
    entries: Vec<(IndexKey, Vec<(String, Value)>)>,
}

impl StyleBundles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a bundle for one index or a tuple of indices
    pub fn with<K, N, V>(mut self, key: K, props: impl IntoIterator<Item = (N, V)>) -> Self
    where
        K: Into<IndexKey>,
        N: Into<String>,
        V: Into<Value>,
    {
        self.insert(key, props);
        self
    }

    pub fn insert<K, N, V>(&mut self, key: K, props: impl IntoIterator<Item = (N, V)>)
    where
        K: Into<IndexKey>,
        N: Into<String>,
        V: Into<Value>,
    {
        let props = props
            .into_iter()
            .map(|(n, v)| (n.into(), v.into()))
            .collect();
        self.entries.push((key.into(), props));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(IndexKey, Vec<(String, Value)>)] {
        &self.entries
    }

    /// Parses `{"0": {"color": "red"}, "1,3": {"size": 20}}`
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| RichTextError::invalid("styles must be a mapping of index to properties"))?;

        let mut bundles = StyleBundles::new();
        for (key, props) in object {
            let props = props.as_object().ok_or_else(|| {
                RichTextError::invalid(format!("styles[{key}] must be a mapping of properties"))
            })?;
            let mut set = Vec::with_capacity(props.len());
            for (name, value) in props {
                set.push((name.clone(), Value::from_json(value)?));
            }
            bundles.entries.push((IndexKey::parse(key)?, set));
        }
        Ok(bundles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extend_list_repeats_last() {
        let list = vec![Value::from("red"), Value::from("blue")];
        let extended = extend_list(&list, 4);
        assert_eq!(
            extended,
            vec![
                Some(Value::from("red")),
                Some(Value::from("blue")),
                Some(Value::from("blue")),
                Some(Value::from("blue")),
            ]
        );
    }

    #[test]
    fn test_extend_list_empty_and_truncate() {
        assert_eq!(extend_list(&[], 3), vec![None, None, None]);
        let list = vec![Value::from(1.0), Value::from(2.0), Value::from(3.0)];
        assert_eq!(extend_list(&list, 2).len(), 2);
    }

    #[test]
    fn test_index_key_parse() {
        assert_eq!(IndexKey::parse("3").unwrap(), IndexKey::Single(3));
        assert_eq!(IndexKey::parse("0,2,4").unwrap(), IndexKey::Many(vec![0, 2, 4]));
        assert_eq!(IndexKey::parse("(1, 3)").unwrap(), IndexKey::Many(vec![1, 3]));
        assert_eq!(IndexKey::parse("(5,)").unwrap(), IndexKey::Many(vec![5]));
        assert!(IndexKey::parse("one").is_err());
        assert!(IndexKey::parse("()").is_err());
    }

    #[test]
    fn test_flatten_tuple_keys() {
        let flat = flatten_index_map(&[
            (IndexKey::from([0, 2, 4]), Value::from("red")),
            (IndexKey::from(2), Value::from("blue")),
        ]);
        assert_eq!(flat.len(), 3);
        assert_eq!(flat[&0], Value::from("red"));
        assert_eq!(flat[&2], Value::from("blue"));
        assert_eq!(flat[&4], Value::from("red"));
    }

    #[test]
    fn test_from_json_dispatch() {
        assert_eq!(
            PropertySpec::from_json(&json!("red")).unwrap(),
            PropertySpec::scalar("red")
        );
        assert_eq!(
            PropertySpec::from_json(&json!(["red", "blue"])).unwrap(),
            PropertySpec::list(["red", "blue"])
        );
        assert_eq!(
            PropertySpec::from_json(&json!({"1": 20, "0,2": 30})).unwrap(),
            PropertySpec::IndexMap(vec![
                (IndexKey::Many(vec![0, 2]), Value::from(30)),
                (IndexKey::Single(1), Value::from(20)),
            ])
        );
    }

    #[test]
    fn test_from_json_pairs() {
        let spec = PropertySpec::from_json(&json!([[1, "red"], [[0, 2], "blue"]])).unwrap();
        assert_eq!(
            spec,
            PropertySpec::IndexMap(vec![
                (IndexKey::Single(1), Value::from("red")),
                (IndexKey::Many(vec![0, 2]), Value::from("blue")),
            ])
        );

        // Not index pairs, and not a list of scalars either
        let spec = PropertySpec::from_json(&json!([["a", "b"]]));
        assert!(spec.is_err());
        let spec = PropertySpec::from_json(&json!([12, 14])).unwrap();
        assert_eq!(spec, PropertySpec::list([12, 14]));
    }

    #[test]
    fn test_from_json_rejects_null_and_nested() {
        assert!(PropertySpec::from_json(&json!(null)).is_err());
        assert!(PropertySpec::from_json(&json!({"x": 1})).is_err());
        assert!(PropertySpec::from_json(&json!({"0": {"nested": 1}})).is_err());
    }

    #[test]
    fn test_style_bundles_from_json() {
        let bundles = StyleBundles::from_json(&json!({
            "(0, 2, 4)": {"color": "red", "size": 20}
        }))
        .unwrap();
        assert_eq!(bundles.entries().len(), 1);
        let (key, props) = &bundles.entries()[0];
        assert_eq!(key.indices(), &[0, 2, 4]);
        assert_eq!(props.len(), 2);

        assert!(StyleBundles::from_json(&json!(["red"])).is_err());
        assert!(StyleBundles::from_json(&json!({"0": "red"})).is_err());
    }

    #[test]
    fn test_value_views() {
        assert_eq!(Value::from("20").as_f64(), Some(20.0));
        assert_eq!(Value::from(true).as_f64(), None);
        assert_eq!(Value::from(1.0).as_bool(), Some(true));
        assert_eq!(Value::from("off").as_bool(), Some(false));
        assert_eq!(Value::from("bold").as_str(), Some("bold"));
        assert_eq!(Value::from(12).to_string(), "12");
    }
}
