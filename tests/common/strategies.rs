use proptest::prelude::*;

/// Per-unit failure flags for a batch of up to 16 units
pub fn failure_pattern_strategy() -> impl Strategy<Value = Vec<bool>> {
    prop::collection::vec(any::<bool>(), 0..16)
}

/// `(index, value)` tuples covering every index of a batch exactly once
pub fn diff_args_strategy() -> impl Strategy<Value = Vec<(usize, i32)>> {
    prop::collection::vec(any::<i32>(), 0..16).prop_map(|values| {
        values.into_iter().enumerate().collect()
    })
}
