use std::time::Instant;

use serde_json::{Number, Value};

use super::{PreferenceChange, PreferenceMap};

/// Compares two preference mappings and lists the keys that changed.
///
/// With no previous mapping every key of `next` is reported as added.
/// Otherwise keys are visited in `next`'s order, followed by the keys only
/// present in `previous`, so identical inputs always yield identical output.
/// Values are compared structurally; equal values produce no change. Numbers
/// compare by value, so `12` and `12.0` are equal.
pub fn diff(previous: Option<&PreferenceMap>, next: &PreferenceMap) -> Vec<PreferenceChange> {
    diff_at(previous, next, Instant::now())
}

pub(super) fn diff_at(
    previous: Option<&PreferenceMap>,
    next: &PreferenceMap,
    timestamp: Instant,
) -> Vec<PreferenceChange> {
    let Some(previous) = previous else {
        return next
            .iter()
            .map(|(key, value)| PreferenceChange::added(key, value.clone(), timestamp))
            .collect();
    };

    let mut changes = Vec::new();

    for (key, new_value) in next {
        match previous.get(key) {
            None => changes.push(PreferenceChange::added(key, new_value.clone(), timestamp)),
            Some(old_value) if !values_equal(old_value, new_value) => {
                changes.push(PreferenceChange::modified(
                    key,
                    old_value.clone(),
                    new_value.clone(),
                    timestamp,
                ));
            }
            Some(_) => {}
        }
    }

    for (key, old_value) in previous {
        if !next.contains_key(key) {
            changes.push(PreferenceChange::removed(key, old_value.clone(), timestamp));
        }
    }

    changes
}

/// Structural equality where numbers compare by value and object key order
/// is ignored.
fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => numbers_equal(l, r),
        (Value::Array(l), Value::Array(r)) => {
            l.len() == r.len() && l.iter().zip(r).all(|(l, r)| values_equal(l, r))
        }
        (Value::Object(l), Value::Object(r)) => {
            l.len() == r.len()
                && l.iter()
                    .all(|(key, l)| r.get(key).is_some_and(|r| values_equal(l, r)))
        }
        _ => left == right,
    }
}

fn numbers_equal(left: &Number, right: &Number) -> bool {
    if let (Some(l), Some(r)) = (left.as_i64(), right.as_i64()) {
        return l == r;
    }
    if let (Some(l), Some(r)) = (left.as_u64(), right.as_u64()) {
        return l == r;
    }
    if left.is_f64() || right.is_f64() {
        return left.as_f64() == right.as_f64();
    }

    // One side only fits i64 (negative), the other only u64 (above i64::MAX).
    false
}
