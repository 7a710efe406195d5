//! Build completion and failure reporting.

use std::time::Instant;

use crate::error::CompileError;

/// Reports the outcome of a build task.
pub trait BuildLogger: Send + Sync {
    /// The task completed successfully.
    fn finish(&self);

    /// The task failed; returns the error to propagate, with run context attached.
    fn fail(&self, err: CompileError) -> CompileError;
}

/// `BuildLogger` emitting `tracing` events.
#[derive(Debug, Clone)]
pub struct TracingLogger {
    task: String,
    started: Instant,
}

impl TracingLogger {
    /// Start timing a task, e.g. `"compile"`.
    pub fn start(task: impl Into<String>) -> Self {
        let task = task.into();
        tracing::info!("{} started", task);
        Self {
            task,
            started: Instant::now(),
        }
    }

    pub fn task(&self) -> &str {
        &self.task
    }

    fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }
}

impl BuildLogger for TracingLogger {
    fn finish(&self) {
        tracing::info!("{} finished in {}ms", self.task, self.elapsed_ms());
    }

    fn fail(&self, err: CompileError) -> CompileError {
        let elapsed_ms = self.elapsed_ms();
        tracing::error!("{} failed after {}ms: {}", self.task, elapsed_ms, err);
        CompileError::Failed {
            task: self.task.clone(),
            elapsed_ms,
            source: Box::new(err),
        }
    }
}
