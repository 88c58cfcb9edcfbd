//! Property resolution: many ways to say "this segment is red"
//!
//! Every per-segment property can arrive as a scalar, a list, an index
//! mapping, under a plural name, or inside a style bundle. The resolver
//! collapses all of them into one [`ResolvedStyle`] per segment, lowest to
//! highest precedence:
//!
//! 1. Scalars
//! 2. Lists, extended with their last element
//! 3. The dedicated `colors` argument
//! 4. Plural names (`fontsizes`, ...), folded onto the singular property
//! 5. Index mappings
//! 6. Style bundles
//!
//! ```
//! use richtext_core::{PropertySpec, StyleBundles};
//! use richtext_style::{PropertyResolver, SegmentProps};
//!
//! let props = SegmentProps::new().with("fontsize", PropertySpec::scalar(10));
//! let styles = StyleBundles::new().with(2, [("color", "green"), ("size", "25")]);
//! let colors = PropertySpec::map([(1, "blue")]);
//!
//! let resolved = PropertyResolver::default()
//!     .resolve(4, Some(&colors), Some(&styles), &props)?;
//! assert_eq!(resolved[1].get("color").and_then(|v| v.as_str()), Some("blue"));
//! assert_eq!(resolved[2].get("fontsize").and_then(|v| v.as_f64()), Some(25.0));
//! # Ok::<(), richtext_core::RichTextError>(())
//! ```

use std::collections::{BTreeMap, HashMap};

use richtext_core::{
    property::{extend_list, flatten_index_map},
    style::{canonical_name, names, singular_of},
    PropertySpec, ResolvedStyle, Result, RichTextError, StyleBundles, StyleDefaults, TextStyle,
    Value,
};

/// Raw per-segment properties, in the order the caller gave them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentProps {
    entries: Vec<(String, PropertySpec)>,
}

impl SegmentProps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, spec: PropertySpec) -> Self {
        self.insert(name, spec);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, spec: PropertySpec) {
        self.entries.push((name.into(), spec));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertySpec)> {
        self.entries.iter().map(|(n, s)| (n.as_str(), s))
    }
}

/// Properties sorted by shape, ready to be applied per index
#[derive(Debug, Default)]
struct Buckets {
    scalars: BTreeMap<String, Value>,
    lists: BTreeMap<String, Vec<Option<Value>>>,
    mappings: BTreeMap<String, BTreeMap<usize, Value>>,
}

impl Buckets {
    fn absorb(&mut self, name: &str, spec: &PropertySpec, n: usize) {
        match spec {
            PropertySpec::Scalar(value) => {
                self.scalars.insert(name.to_string(), value.clone());
            },
            PropertySpec::List(values) => {
                self.lists.insert(name.to_string(), extend_list(values, n));
            },
            PropertySpec::IndexMap(entries) => {
                self.mappings
                    .entry(name.to_string())
                    .or_default()
                    .extend(flatten_index_map(entries));
            },
        }
    }
}

/// How the `colors` argument applies
#[derive(Debug, Default)]
enum ColorOverride {
    #[default]
    None,
    PerIndex(Vec<Option<Value>>),
    Mapping(BTreeMap<usize, Value>),
}

impl ColorOverride {
    fn from_spec(colors: Option<&PropertySpec>, n: usize) -> Result<Self> {
        match colors {
            None => Ok(Self::None),
            Some(PropertySpec::Scalar(value @ Value::Str(_))) => {
                Ok(Self::PerIndex(vec![Some(value.clone()); n]))
            },
            Some(PropertySpec::Scalar(other)) => Err(RichTextError::invalid(format!(
                "colors must be a string, a list, or a mapping (got {other})"
            ))),
            Some(PropertySpec::List(values)) => Ok(Self::PerIndex(extend_list(values, n))),
            Some(PropertySpec::IndexMap(entries)) => Ok(Self::Mapping(flatten_index_map(entries))),
        }
    }

    fn at(&self, i: usize) -> Option<&Value> {
        match self {
            Self::None => None,
            Self::PerIndex(values) => values.get(i).and_then(Option::as_ref),
            Self::Mapping(map) => map.get(&i),
        }
    }
}

/// Merges every form of property input into per-segment styles
#[derive(Debug, Clone, Default)]
pub struct PropertyResolver {
    defaults: StyleDefaults,
}

impl PropertyResolver {
    pub fn new(defaults: StyleDefaults) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &StyleDefaults {
        &self.defaults
    }

    /// Resolve `n` segments; the result always has exactly `n` entries
    ///
    /// Fails only when `colors` is a non-string scalar.
    pub fn resolve(
        &self,
        n: usize,
        colors: Option<&PropertySpec>,
        bundles: Option<&StyleBundles>,
        props: &SegmentProps,
    ) -> Result<Vec<ResolvedStyle>> {
        let colors = ColorOverride::from_spec(colors, n)?;

        // Singular names first, so plural forms always fold over them
        let mut buckets = Buckets::default();
        for (name, spec) in props.iter() {
            let name = canonical_name(name);
            if singular_of(name).is_none() {
                buckets.absorb(name, spec, n);
            }
        }
        for (name, spec) in props.iter() {
            if let Some(singular) = singular_of(canonical_name(name)) {
                buckets.absorb(singular, spec, n);
            }
        }

        let bundles = bundles.map(|b| flatten_bundles(b, n)).unwrap_or_default();

        let resolved = (0..n)
            .map(|i| {
                let mut style = ResolvedStyle::new();

                for (name, value) in &buckets.scalars {
                    style.set(name.clone(), value.clone());
                }

                for (name, values) in &buckets.lists {
                    match &values[i] {
                        Some(value) => style.set(name.clone(), value.clone()),
                        None => style.unset(name),
                    }
                }

                if let Some(color) = colors.at(i) {
                    style.set(names::COLOR, color.clone());
                }

                for (name, mapping) in &buckets.mappings {
                    if let Some(value) = mapping.get(&i) {
                        style.set(name.clone(), value.clone());
                    }
                }

                if let Some(bundle) = bundles.get(&i) {
                    for (name, value) in bundle {
                        style.set(name.clone(), value.clone());
                    }
                }

                style
            })
            .collect::<Vec<_>>();

        log::debug!(
            "Resolved {n} segments, at most {} properties each",
            resolved.iter().map(ResolvedStyle::len).max().unwrap_or(0)
        );
        Ok(resolved)
    }

    /// Complete a resolved style with the defaults
    pub fn materialize(&self, style: &ResolvedStyle) -> TextStyle {
        self.defaults.materialize(style)
    }
}

/// Expand bundle keys and normalise property names inside each bundle
fn flatten_bundles(bundles: &StyleBundles, n: usize) -> HashMap<usize, Vec<(String, Value)>> {
    let mut flat: HashMap<usize, Vec<(String, Value)>> = HashMap::new();
    for (key, props) in bundles.entries() {
        for &idx in key.indices() {
            if idx >= n {
                log::debug!("Style bundle for index {idx} ignored, only {n} segments");
                continue;
            }
            let entry = flat.entry(idx).or_default();
            for (name, value) in props {
                let name = canonical_name(name);
                let name = singular_of(name).unwrap_or(name);
                entry.push((name.to_string(), value.clone()));
            }
        }
    }
    flat
}
