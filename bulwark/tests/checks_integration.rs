//! Imperative use of the built-in checks against a realistic table.

mod common;

use bulwark::checks::*;
use bulwark::prelude::*;
use common::{floats, ints, orders, strings, table};
use std::collections::BTreeMap;

#[test]
fn test_clean_orders_pass_a_chain_of_checks() {
    let orders = orders();

    let mut statuses = BTreeMap::new();
    statuses.insert(
        "status".to_string(),
        vec![Scalar::from("new"), Scalar::from("paid"), Scalar::from("shipped")],
    );
    let mut ranges = BTreeMap::new();
    ranges.insert("amount".to_string(), (Scalar::from(0), Scalar::from(1000)));
    let mut dtypes = BTreeMap::new();
    dtypes.insert("order_id".to_string(), DType::Integer);
    dtypes.insert("amount".to_string(), DType::Float);
    dtypes.insert("status".to_string(), DType::from("str"));
    dtypes.insert("gift".to_string(), DType::from("bool"));

    let checked = has_columns(&orders, ["order_id", "ts", "status"], false, true)
        .and_then(|t| is_shape(t, Shape::cols(6)))
        .and_then(|t| has_no_nans(t, Some(&["order_id", "amount"])))
        .and_then(|t| unique(t, Some(&["order_id"]), false))
        .and_then(has_unique_index)
        .and_then(|t| within_set(t, statuses))
        .and_then(|t| within_range(t, ranges))
        .and_then(|t| has_dtypes(t, dtypes))
        .and_then(|t| is_monotonic(t, Some(monotonic_ts()), None, false))
        .and_then(|t| {
            let regex = MatchesRegex::new(r"[A-Z]{2}\d{2}")
                .columns(["coupon"])
                .na("AA00");
            regex.check(t)
        })
        .unwrap();

    assert!(std::ptr::eq(checked, &orders));
    assert_eq!(checked, &common::orders());
}

fn monotonic_ts() -> BTreeMap<String, Monotonicity> {
    let mut items = BTreeMap::new();
    items.insert("ts".to_string(), (Some(true), false));
    items.insert("order_id".to_string(), (Some(true), true));
    items
}

#[test]
fn test_failures_name_the_offending_cells() {
    let orders = orders();

    let err = has_no_nones(&orders, Some(&["coupon"])).unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("Check 'has_no_nones' failed"));
    assert!(message.contains("3 offending cell(s)"));
    assert!(message.contains("(1, 'coupon'), (2, 'coupon'), (4, 'coupon')"));

    // per-column items take precedence over the global setting
    assert!(is_monotonic(&orders, Some(monotonic_ts()), Some(true), true).is_ok());
    let err = is_monotonic(&orders, None, Some(true), true).unwrap_err();
    assert!(err.to_string().contains("column 'ts' is not strictly increasing"));

    let pattern = r"[A-Z]{2}\d{2}";
    let coupon: &[&str] = &["coupon"];
    let err = matches_regex(&orders, pattern, Some(coupon), true, RegexFlags::default(), None)
        .unwrap_err();
    assert!(err.is_violation());
    // substituting missing coupons leaves only real codes to match
    assert!(
        matches_regex(&orders, pattern, Some(coupon), false, RegexFlags::default(), Some("NA00"))
            .is_ok()
    );
}

#[test]
fn test_usage_errors_are_not_violations() {
    let orders = orders();
    let cases = vec![
        has_no_nans(&orders, Some(&["nope"])).unwrap_err(),
        matches_regex(&orders, "x", Some(&["amount"]), true, RegexFlags::default(), None)
            .unwrap_err(),
        matches_regex(&orders, "[", Some(&["status"]), true, RegexFlags::default(), None)
            .unwrap_err(),
        one_to_many(&orders, "status", "missing").unwrap_err(),
        within_n_std(&orders, -3.0).unwrap_err(),
    ];
    for err in cases {
        assert!(err.is_usage_error(), "{err}");
        assert!(!err.is_violation(), "{err}");
    }
}

#[test]
fn test_has_set_within_vals_and_one_to_many() {
    let lab = table(vec![
        (
            "parameter",
            strings(vec![Some("Cu"), Some("Cu"), Some("Pb"), Some("Pb"), Some("Zn")]),
        ),
        (
            "units",
            strings(vec![
                Some("mg/L"),
                Some("mg/L"),
                Some("ug/L"),
                Some("mg/L"),
                Some("ug/L"),
            ]),
        ),
        ("res", floats(vec![Some(1.0), Some(1.5), Some(0.2), Some(0.3), Some(9.0)])),
    ]);

    let mut required = BTreeMap::new();
    required.insert(
        "parameter".to_string(),
        vec![Scalar::from("Cu"), Scalar::from("Zn")],
    );
    assert!(has_set_within_vals(&lab, required.clone()).is_ok());
    required.insert("units".to_string(), vec![Scalar::from("g/L")]);
    let err = has_set_within_vals(&lab, required).unwrap_err();
    assert!(err.to_string().contains("not in column 'units': ['g/L']"));

    let err = one_to_many(&lab, "units", "parameter").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Check 'one_to_many' failed: 'Pb' in 'parameter' has multiple values for 'units'"
    );
    // every result value belongs to a single parameter
    assert!(one_to_many(&lab, "parameter", "res").is_ok());
}

#[test]
fn test_is_same_as_after_a_round_trip() {
    let original = table(vec![
        ("a", ints(vec![1, 2, 3])),
        ("b", floats(vec![Some(0.1), Some(0.2), None])),
    ]);
    let rebuilt = Table::new(original.batch().clone());
    assert!(is_same_as(&rebuilt, &original, Comparison::default()).is_ok());

    let tweaked = table(vec![
        ("a", ints(vec![1, 2, 3])),
        ("b", floats(vec![Some(0.1), Some(0.2 + 1e-12), None])),
    ]);
    assert!(is_same_as(&tweaked, &original, Comparison::default()).is_ok());
    assert!(is_same_as(&tweaked, &original, Comparison::default().check_exact(true)).is_err());
    assert!(IsSameAs::new(original.clone())
        .check_exact(true)
        .check(&tweaked)
        .is_err());
}

#[test]
fn test_is_same_as_ignoring_dtype() {
    let ints_table = table(vec![("a", ints(vec![1, 2, 3]))]);
    let floats_table = table(vec![("a", floats(vec![Some(1.0), Some(2.0), Some(3.0)]))]);

    let err = is_same_as(&ints_table, &floats_table, Comparison::default()).unwrap_err();
    assert!(err.is_violation());
    let relaxed = Comparison::default().check_dtype(false);
    assert!(is_same_as(&ints_table, &floats_table, relaxed).is_ok());
}

#[test]
fn test_custom_check_with_args() {
    fn min_rows(table: &Table, n: usize) -> Result<usize> {
        if table.num_rows() < n {
            return Err(BulwarkError::violation(
                "min_rows",
                format!("{} rows, need {n}", table.num_rows()),
            ));
        }
        Ok(table.num_rows())
    }

    let orders = orders();
    assert!(custom_check(&orders, min_rows, 6).is_ok());
    let err = custom_check(&orders, min_rows, 7).unwrap_err();
    assert_eq!(err.to_string(), "Check 'min_rows' failed: 6 rows, need 7");
}
