use parking_lot::Mutex;
use reconcile_group::{Func, ReconcileContext};
use std::sync::Arc;

/// Stand-in for a standalone deployment
#[derive(Debug, Clone, Default)]
pub struct Standalone {
    pub name: String,
}

/// Stand-in for a clustered deployment
#[derive(Debug, Clone, Default)]
pub struct Cluster {
    pub name: String,
    pub replicas: u32,
}

/// Fixed-size array shared with the units under test
#[derive(Debug, Clone)]
pub struct Recorder {
    slots: Arc<Mutex<Vec<i32>>>,
}

impl Recorder {
    pub fn new(len: usize) -> Self {
        Self {
            slots: Arc::new(Mutex::new(vec![0; len])),
        }
    }

    pub fn set(&self, index: usize, value: i32) {
        self.slots.lock()[index] = value;
    }

    pub fn snapshot(&self) -> Vec<i32> {
        self.slots.lock().clone()
    }
}

/// `(ctx, T) -> Result<()>` that writes `value` at `index`, then optionally fails
pub fn marker<T>(recorder: &Recorder, index: usize, value: i32, fail: bool) -> Func
where
    T: Send + 'static,
{
    let recorder = recorder.clone();
    Func::unary(move |_ctx: ReconcileContext, _target: T| {
        let recorder = recorder.clone();
        async move {
            recorder.set(index, value);
            if fail {
                anyhow::bail!("test");
            }
            Ok(())
        }
    })
}

/// `(ctx, T) -> (i32, Option<Error>)` that writes `value` at `index` and returns `index`,
/// together with an error when `fail` is set
pub fn marker_with_result<T>(
    recorder: &Recorder,
    index: usize,
    value: i32,
    fail: bool,
) -> Func
where
    T: Send + 'static,
{
    let recorder = recorder.clone();
    Func::with_outcome(move |_ctx: ReconcileContext, _target: T| {
        let recorder = recorder.clone();
        async move {
            recorder.set(index, value);
            (index as i32, fail.then(|| anyhow::anyhow!("test")))
        }
    })
}
