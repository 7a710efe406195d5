//! Compile, bundle and emit an app in one call.

use std::sync::Arc;
use std::time::Instant;

use facet_core::{BuildLogger, CompileOutput, CompilerContext, compile_components};

use crate::emit::{EmitOptions, EmitSummary, ModuleEmitter};
use crate::render::{Bundler, Renderer};
use crate::{Error, Result};

/// Everything a full app build produced.
#[derive(Debug, Clone)]
pub struct AppBuild {
    pub compile: CompileOutput,
    pub emit: EmitSummary,
}

/// Run the full build for `ctx`.
///
/// The compile pass reports through `logger` exactly like
/// [`compile_components`]. The transformed records are then bundled and the
/// resulting graph is emitted to `config.output_targets`.
pub async fn build_app<G: Send + Sync>(
    ctx: &CompilerContext,
    bundler: &dyn Bundler<G>,
    renderer: &dyn Renderer<G>,
    logger: &dyn BuildLogger,
) -> Result<AppBuild> {
    let compile = compile_components(ctx, logger).await?;

    let started = Instant::now();
    let graph = bundler.bundle(&compile.files).await.map_err(|e| {
        tracing::error!("Bundling {} files failed: {}", compile.files.len(), e);
        Error::Bundle(e)
    })?;

    let emitter = ModuleEmitter::new(
        Arc::clone(ctx.runtime()),
        EmitOptions::from_config(ctx.config()),
    );
    let emit = emitter
        .emit(&graph, renderer, &ctx.config().output_targets)
        .await
        .inspect_err(|e| tracing::error!("Emit failed: {}", e))?;

    tracing::info!(
        "Built {} components into {} files in {}ms",
        compile.manifest.components.len(),
        emit.written.len() + emit.shortcuts.len(),
        started.elapsed().as_millis()
    );

    Ok(AppBuild { compile, emit })
}
