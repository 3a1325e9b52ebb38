use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use ndarray::Array2;
use ort::{
    execution_providers::OneDNNExecutionProvider,
    session::builder::GraphOptimizationLevel,
    session::Session,
    value::Value,
};
use tracing::info;

use common::ModelConfig;

/// The one operation the rest of the service sees: a fixed-order feature
/// vector in, a binary label out. Implementations must be immutable
/// after load so concurrent submissions share them without coordination.
pub trait OutcomeModel: Send + Sync {
    fn predict(&self, features: &[f32]) -> Result<i64>;
}

// Session pool for concurrent inference. ONNX sessions need exclusive
// access to run, so we keep several and hand them out round-robin.
struct SessionPool {
    sessions: Vec<Mutex<Session>>,
    pool_size: usize,
    round_robin_counter: AtomicUsize,
}

impl SessionPool {
    fn new(sessions: Vec<Session>) -> Self {
        let pool_size = sessions.len();
        let sessions = sessions.into_iter().map(Mutex::new).collect();
        Self {
            sessions,
            pool_size,
            round_robin_counter: AtomicUsize::new(0),
        }
    }

    fn acquire(&self) -> MutexGuard<'_, Session> {
        let idx = self.round_robin_counter.fetch_add(1, Ordering::Relaxed) % self.pool_size;
        // A prediction never leaves a session in a partial state, so a
        // poisoned lock is still usable.
        self.sessions[idx]
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Owns the deserialized classifier for the process lifetime.
pub struct OnnxGateway {
    pool: SessionPool,
    input_name: String,
    output_name: String,
    num_features: usize,
}

impl OnnxGateway {
    /// Build the session pool from the artifact named in the config.
    /// Any failure here is fatal for the process; no request can be
    /// served without the classifier.
    pub fn load(config: &ModelConfig, pool_size: usize) -> Result<Self> {
        let cpu_count = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let threads_per_session = (cpu_count / pool_size).max(1);
        info!(
            "Creating session pool: {} sessions with {} threads each",
            pool_size, threads_per_session
        );

        let mut sessions = Vec::with_capacity(pool_size);
        for i in 0..pool_size {
            let session = Session::builder()?
                .with_execution_providers([OneDNNExecutionProvider::default().build()])?
                .with_optimization_level(GraphOptimizationLevel::Level3)?
                .with_intra_threads(threads_per_session)?
                .with_inter_threads(1)?
                .commit_from_file(&config.artifact)?;
            sessions.push(session);
            info!("  ✓ Session {} created with oneDNN", i + 1);
        }

        Ok(Self {
            pool: SessionPool::new(sessions),
            input_name: config.input_name.clone(),
            output_name: config.output_name.clone(),
            num_features: config.num_features,
        })
    }
}

impl OutcomeModel for OnnxGateway {
    fn predict(&self, features: &[f32]) -> Result<i64> {
        // Defensive shape check: a wrong-sized vector fails this
        // submission only, it must never reach the session.
        if features.len() != self.num_features {
            anyhow::bail!(
                "feature vector has {} elements, classifier expects {}",
                features.len(),
                self.num_features
            );
        }

        let input = Array2::from_shape_vec((1, self.num_features), features.to_vec())?;
        let input_value = Value::from_array(input)?;

        let mut session = self.pool.acquire();
        let outputs = session.run(ort::inputs![self.input_name.as_str() => input_value])?;
        let (_, labels) = outputs[self.output_name.as_str()].try_extract_tensor::<i64>()?;

        labels
            .first()
            .copied()
            .context("classifier returned an empty label tensor")
    }
}
