//! Tests for configuration parsing and range expansion.
mod common;
use batch_tester::expander::{expand_source, number_to_value};
use batch_tester::prelude::*;
use common::*;
use serde_json::json;

#[test]
fn test_discrete_list_preserves_order_and_count() {
    let snap = snapshot(vec![source(
        SAMPLER,
        r#"{"sampler_name": ["euler", "dpmpp_2m", "ddim", "uni_pc"]}"#,
    )]);
    let entries = expand(&snap).unwrap();

    assert_eq!(entries.len(), 4);
    let values: Vec<_> = entries.iter().map(|e| e.value.clone()).collect();
    assert_eq!(
        values,
        vec![json!("euler"), json!("dpmpp_2m"), json!("ddim"), json!("uni_pc")]
    );
    assert!(entries.iter().all(|e| e.parameter == "sampler_name"));
    assert!(entries.iter().all(|e| e.target.id == NodeId(SAMPLER)));
}

#[test]
fn test_discrete_list_accepts_mixed_scalars() {
    let snap = snapshot(vec![source(SAMPLER, r#"{"seed": [1, "2", true, null, 4.5]}"#)]);
    let entries = expand(&snap).unwrap();
    let values: Vec<_> = entries.into_iter().map(|e| e.value).collect();
    assert_eq!(
        values,
        vec![json!(1), json!("2"), json!(true), json!(null), json!(4.5)]
    );
}

#[test]
fn test_keys_follow_document_order() {
    let snap = snapshot(vec![source(
        SAMPLER,
        r#"{"steps": [10], "cfg": {"min": 1, "max": 2, "step": 1}, "seed": [7]}"#,
    )]);
    let entries = expand(&snap).unwrap();
    let names: Vec<_> = entries.iter().map(|e| e.parameter.as_str()).collect();
    assert_eq!(names, vec!["steps", "cfg", "cfg", "seed"]);
}

#[test]
fn test_scalar_and_null_values_are_skipped() {
    let snap = snapshot(vec![source(
        SAMPLER,
        r#"{"steps": 20, "cfg": null, "name": "x", "seed": [1, 2]}"#,
    )]);
    let entries = expand(&snap).unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.parameter == "seed"));
}

#[test]
fn test_range_values_are_integral_when_whole() {
    let snap = snapshot(vec![source(
        SAMPLER,
        r#"{"steps": {"min": 20, "max": 30, "step": 5}}"#,
    )]);
    let entries = expand(&snap).unwrap();
    let values: Vec<_> = entries.into_iter().map(|e| e.value).collect();
    assert_eq!(values, vec![json!(20), json!(25), json!(30)]);
    assert_eq!(values[0].to_string(), "20");
}

#[test]
fn test_fractional_range_values_stay_floats() {
    assert_eq!(number_to_value(7.5), json!(7.5));
    assert_eq!(number_to_value(-3.0), json!(-3));
}

#[test]
fn test_expand_range_single_point() {
    assert_eq!(expand_range(&RangeSpec::new(2.0, 2.0, 1.0)).unwrap(), vec![2.0]);
}

#[test]
fn test_expand_range_count_and_values() {
    let cases = [
        (0.0, 10.0, 1.0),
        (0.0, 10.0, 3.0),
        (-5.0, 5.0, 2.5),
        (1.0, 100.0, 7.0),
        (3.0, 4.0, 10.0),
    ];
    for (min, max, step) in cases {
        let values = expand_range(&RangeSpec::new(min, max, step)).unwrap();
        let expected_count = ((max - min) / step).floor() as usize + 1;
        assert_eq!(values.len(), expected_count, "range {min}..={max} by {step}");
        for (k, v) in values.iter().enumerate() {
            assert_eq!(*v, min + k as f64 * step);
        }
    }
}

#[test]
fn test_expand_range_keeps_endpoint_despite_float_error() {
    let values = expand_range(&RangeSpec::new(0.0, 0.3, 0.1)).unwrap();
    assert_eq!(values.len(), 4);
    assert!((values[3] - 0.3).abs() < 1e-12);
}

#[test]
fn test_expand_range_inverted() {
    let err = expand_range(&RangeSpec::new(5.0, 2.0, 1.0)).unwrap_err();
    assert!(matches!(err, RangeError::Inverted { .. }));
    assert!(err.to_string().contains("min must not exceed max"));
}

#[test]
fn test_expand_range_zero_step_is_rejected() {
    let err = expand_range(&RangeSpec::new(0.0, 10.0, 0.0)).unwrap_err();
    assert_eq!(err, RangeError::NonPositiveStep { step: 0.0 });
    assert!(err.to_string().contains("step must be positive"));
}

#[test]
fn test_expand_range_negative_step_is_rejected() {
    let err = expand_range(&RangeSpec::new(0.0, 10.0, -1.0)).unwrap_err();
    assert!(matches!(err, RangeError::NonPositiveStep { .. }));
    // Also for a single-point range, which would otherwise loop forever.
    let err = expand_range(&RangeSpec::new(2.0, 2.0, 0.0)).unwrap_err();
    assert!(matches!(err, RangeError::NonPositiveStep { .. }));
}

#[test]
fn test_expand_range_non_finite() {
    let err = expand_range(&RangeSpec::new(f64::NAN, 1.0, 1.0)).unwrap_err();
    assert_eq!(err, RangeError::NotNumeric);
    let err = expand_range(&RangeSpec::new(0.0, f64::INFINITY, 1.0)).unwrap_err();
    assert_eq!(err, RangeError::NotNumeric);
}

#[test]
fn test_expand_range_large_sweep() {
    let values = expand_range(&RangeSpec::new(0.0, 2_000_000.0, 1.0)).unwrap();
    assert_eq!(values.len(), 2_000_001);
    assert_eq!(values[1_999_999], 1_999_999.0);
}

#[test]
fn test_expand_range_unrepresentable() {
    let err = expand_range(&RangeSpec::new(-f64::MAX, f64::MAX, 1e-300)).unwrap_err();
    assert!(matches!(err, RangeError::Unrepresentable { .. }));
}

#[test]
fn test_non_numeric_range_fields() {
    for payload in [
        r#"{"cfg": {"min": "1", "max": 2, "step": 1}}"#,
        r#"{"cfg": {"min": 1, "max": 2}}"#,
        r#"{"cfg": {}}"#,
    ] {
        let err = expand(&snapshot(vec![source(SAMPLER, payload)])).unwrap_err();
        match err {
            ExpansionError::InvalidRange {
                parameter, source, ..
            } => {
                assert_eq!(parameter, "cfg");
                assert_eq!(source, RangeError::NotNumeric);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

#[test]
fn test_malformed_json_fails_whole_expansion() {
    let snap = snapshot(vec![
        source(SAMPLER, r#"{"steps": [10, 20]}"#),
        source(3, r#"{"steps": [10, "#),
    ]);
    let err = expand(&snap).unwrap_err();
    assert!(matches!(
        err,
        ExpansionError::ConfigurationParse { node: NodeId(3), .. }
    ));
}

#[test]
fn test_non_object_payload_is_rejected() {
    let err = expand_source(&source(SAMPLER, "[1, 2, 3]")).unwrap_err();
    assert!(err.to_string().contains("must be a JSON object"));
}

#[test]
fn test_multiple_sources_expand_in_snapshot_order() {
    let snap = snapshot(vec![
        source(SAMPLER, r#"{"steps": [10, 20]}"#),
        source(5, r#"{"denoise": {"min": 0.5, "max": 1.0, "step": 0.25}}"#),
    ]);
    let entries = expand(&snap).unwrap();
    let summary: Vec<_> = entries
        .iter()
        .map(|e| (e.target.id.0, e.parameter.as_str(), e.value.clone()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (1, "steps", json!(10)),
            (1, "steps", json!(20)),
            (5, "denoise", json!(0.5)),
            (5, "denoise", json!(0.75)),
            (5, "denoise", json!(1)),
        ]
    );
}

#[test]
fn test_parameter_spec_classification() {
    assert_eq!(
        ParameterSpec::from_json(&json!(["a"])).unwrap(),
        Some(ParameterSpec::DiscreteList(vec![json!("a")]))
    );
    assert_eq!(
        ParameterSpec::from_json(&json!({"min": 1, "max": 3, "step": 1})).unwrap(),
        Some(ParameterSpec::Range(RangeSpec::new(1.0, 3.0, 1.0)))
    );
    assert_eq!(ParameterSpec::from_json(&json!(42)).unwrap(), None);
    assert_eq!(ParameterSpec::from_json(&json!(null)).unwrap(), None);
}
