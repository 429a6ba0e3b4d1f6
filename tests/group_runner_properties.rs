mod common;

use common::strategies::*;
use proptest::prelude::*;
use reconcile_group::{
    default_group_runner, ArgValue, Args, Func, GroupRunner, ReconcileContext, ResultSlot,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn counting_funcs(pattern: &[bool], ran: &Arc<AtomicUsize>) -> Vec<Func> {
    pattern
        .iter()
        .enumerate()
        .map(|(index, &fail)| {
            let ran = Arc::clone(ran);
            Func::with_result(move |_ctx: ReconcileContext, base: usize| {
                let ran = Arc::clone(&ran);
                async move {
                    ran.fetch_add(1, Ordering::SeqCst);
                    if fail {
                        Err(anyhow::anyhow!("unit {index} failed"))
                    } else {
                        Ok(base + index)
                    }
                }
            })
        })
        .collect()
}

proptest! {
    /// Property: the aggregate error is present iff some unit failed, and names exactly those units
    #[test]
    fn aggregate_error_iff_any_unit_failed(pattern in failure_pattern_strategy()) {
        let ran = Arc::new(AtomicUsize::new(0));
        let funcs: Vec<Func> = pattern
            .iter()
            .map(|&fail| {
                let ran = Arc::clone(&ran);
                Func::unary(move |_ctx: ReconcileContext, _target: String| {
                    let ran = Arc::clone(&ran);
                    async move {
                        ran.fetch_add(1, Ordering::SeqCst);
                        if fail {
                            Err(anyhow::anyhow!("failed"))
                        } else {
                            Ok(())
                        }
                    }
                })
            })
            .collect();

        let result = tokio_test::block_on(default_group_runner().run(
            &funcs,
            &ReconcileContext::background(),
            "cluster".to_string(),
        ));

        let expected_failures: Vec<usize> = pattern
            .iter()
            .enumerate()
            .filter_map(|(index, &fail)| fail.then_some(index))
            .collect();

        prop_assert_eq!(ran.load(Ordering::SeqCst), pattern.len());
        match result {
            Ok(()) => prop_assert!(expected_failures.is_empty()),
            Err(err) => {
                prop_assert_eq!(err.failed_indices(), expected_failures);
                let prefix = format!("{} of {} units failed", err.failures().len(), pattern.len());
                let message = err.to_string();
                prop_assert!(message.starts_with(&prefix), "{:?} does not start with {:?}", message, prefix);
            }
        }
    }

    /// Property: one slot per func, slot i carries func i's outcome
    #[test]
    fn result_slots_match_input_positions(pattern in failure_pattern_strategy(), base in 0usize..1000) {
        let ran = Arc::new(AtomicUsize::new(0));
        let funcs = counting_funcs(&pattern, &ran);

        let slots: Vec<ResultSlot<usize>> = tokio_test::block_on(
            default_group_runner().run_with_results(&funcs, &ReconcileContext::background(), base),
        );

        prop_assert_eq!(slots.len(), pattern.len());
        prop_assert_eq!(ran.load(Ordering::SeqCst), pattern.len());
        for (index, (slot, &fail)) in slots.iter().zip(&pattern).enumerate() {
            prop_assert_eq!(slot.index(), index);
            if fail {
                let message = slot.error().map(ToString::to_string);
                prop_assert_eq!(message, Some(format!("unit {index} failed")));
            } else {
                prop_assert_eq!(slot.value(), Some(&(base + index)));
            }
        }
    }

    /// Property: every tuple is applied exactly once, whatever the batch size
    #[test]
    fn diff_args_applies_every_tuple(tuples in diff_args_strategy()) {
        let written = Arc::new(parking_lot::Mutex::new(vec![0i32; tuples.len()]));
        let func = {
            let written = Arc::clone(&written);
            Func::variadic(move |_ctx: ReconcileContext, index: usize, value: i32| {
                let written = Arc::clone(&written);
                async move {
                    written.lock()[index] = value;
                    Ok(())
                }
            })
        };

        let args: Vec<Args> = tuples
            .iter()
            .map(|&(index, value)| Args::from(vec![ArgValue::new(index), ArgValue::new(value)]))
            .collect();

        let result = tokio_test::block_on(default_group_runner().run_diff_args(
            &func,
            &ReconcileContext::background(),
            args,
        ));

        prop_assert!(result.is_ok());
        let expected: Vec<i32> = tuples.iter().map(|&(_, value)| value).collect();
        prop_assert_eq!(written.lock().clone(), expected);
    }
}
