//! Resolution driven by JSON input, the way dynamic callers hand it over

use richtext_core::{PropertySpec, ResolvedStyle, RichTextError, StyleBundles, Value};
use richtext_style::{PropertyResolver, SegmentProps};
use serde_json::json;

fn resolve(n: usize, request: serde_json::Value) -> Result<Vec<ResolvedStyle>, RichTextError> {
    let object = request.as_object().unwrap();
    let mut props = SegmentProps::new();
    let mut colors = None;
    let mut styles = None;

    for (key, value) in object {
        match key.as_str() {
            "colors" => colors = Some(PropertySpec::from_json(value)?),
            "styles" => styles = Some(StyleBundles::from_json(value)?),
            _ => props.insert(key.clone(), PropertySpec::from_json(value)?),
        }
    }

    PropertyResolver::default().resolve(n, colors.as_ref(), styles.as_ref(), &props)
}

#[test]
fn mixed_json_input_resolves_per_segment() {
    let styles = resolve(
        3,
        json!({
            "colors": ["red", "blue"],
            "styles": {"0,2": {"size": 20, "weight": "bold"}},
            "fontsizes": [12],
            "underline": true,
        }),
    )
    .unwrap();

    let color = |i: usize| styles[i].get("color").and_then(Value::as_str);
    let size = |i: usize| styles[i].get("fontsize").and_then(Value::as_f64);

    assert_eq!([color(0), color(1), color(2)], [Some("red"), Some("blue"), Some("blue")]);
    assert_eq!([size(0), size(1), size(2)], [Some(20.0), Some(12.0), Some(20.0)]);
    assert_eq!(styles[1].get("fontweight"), None);
    assert!(styles.iter().all(|s| s.get("underline") == Some(&Value::Bool(true))));

    // Only what some input named ends up in the style
    assert_eq!(styles[0].len(), 4);
    assert_eq!(styles[1].len(), 3);
}

#[test]
fn list_of_pairs_targets_indices() {
    let styles = resolve(4, json!({"colors": [[[1, 3], "green"], [0, "red"]]})).unwrap();

    let colors: Vec<Option<&str>> = styles
        .iter()
        .map(|s| s.get("color").and_then(Value::as_str))
        .collect();
    assert_eq!(colors, [Some("red"), Some("green"), None, Some("green")]);
    assert!(styles[2].is_empty());
}

#[test]
fn numeric_colors_are_rejected() {
    let err = resolve(2, json!({"colors": 42})).unwrap_err();
    assert!(matches!(err, RichTextError::InvalidArgument(_)));
}
