//! Shared rendering context.

use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;

use crate::config::PipelineConfig;
use crate::PipelineResult;

/// Worker pool and settings shared by every render.
///
/// Built once and passed by reference; nothing in it changes while a render
/// runs.
#[derive(Debug)]
pub struct RenderContext {
    pool: ThreadPool,
    config: PipelineConfig,
}

impl RenderContext {
    /// Validates `config` and builds a pool of `config.threads` workers.
    pub fn new(config: PipelineConfig) -> PipelineResult<Self> {
        config.validate()?;
        let mut builder = ThreadPoolBuilder::new().thread_name(|i| format!("brow-worker-{i}"));
        if let Some(n) = config.threads {
            builder = builder.num_threads(n);
        }
        let pool = builder.build()?;
        debug!(threads = pool.current_num_threads(), "render context ready");
        Ok(Self { pool, config })
    }

    /// Context with default settings.
    pub fn with_defaults() -> PipelineResult<Self> {
        Self::new(PipelineConfig::default())
    }

    /// Settings.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Worker count.
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Runs `op` inside the pool so nested rayon work uses its workers.
    pub fn install<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        self.pool.install(op)
    }
}
