//! Shared test utilities for facet-bundler tests

#![allow(dead_code)]

use async_trait::async_trait;
use facet_bundler::{Bundler, FormatOptions, OutputFormat, RenderedChunk, RenderedOutput, Renderer};
use facet_core::FileRecord;
use parking_lot::Mutex;

/// Module graph stand-in: tag names of the bundled components.
#[derive(Debug, Clone, Default)]
pub struct FakeGraph {
    pub components: Vec<String>,
}

/// Collects component tags from the transformed records.
pub struct FakeBundler;

#[async_trait]
impl Bundler<FakeGraph> for FakeBundler {
    async fn bundle(&self, files: &[FileRecord]) -> anyhow::Result<FakeGraph> {
        let mut components: Vec<String> = files
            .iter()
            .filter_map(|f| f.component_meta().map(|m| m.tag_name.clone()))
            .collect();
        components.sort();
        Ok(FakeGraph { components })
    }
}

/// Renders an `app` entry, an `index` entry and one lazy chunk per
/// component, recording every call.
#[derive(Default)]
pub struct RecordingRenderer {
    pub calls: Mutex<Vec<FormatOptions>>,
    pub fail_on: Option<OutputFormat>,
}

impl RecordingRenderer {
    pub fn failing_on(format: OutputFormat) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_on: Some(format),
        }
    }

    pub fn render_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn formats(&self) -> Vec<OutputFormat> {
        self.calls.lock().iter().map(|o| o.format).collect()
    }
}

#[async_trait]
impl Renderer<FakeGraph> for RecordingRenderer {
    async fn render(
        &self,
        graph: &FakeGraph,
        options: &FormatOptions,
    ) -> anyhow::Result<RenderedOutput> {
        self.calls.lock().push(options.clone());
        if self.fail_on == Some(options.format) {
            anyhow::bail!("cannot render {}", options.format);
        }

        let entry_name = |name: &str| options.entry_file_names.replace("[name]", name);
        let import = options
            .dynamic_import_function
            .clone()
            .unwrap_or_else(|| "import".to_string());

        let mut chunks = vec![
            RenderedChunk::entry(
                entry_name("app"),
                format!("// {}\nexport const ready = true;", options.format),
            ),
            RenderedChunk::entry(entry_name("index"), "export * from './app.mjs.js';"),
        ];
        for (i, tag) in graph.components.iter().enumerate() {
            let file_name = options
                .chunk_file_names
                .replace("[name]", tag)
                .replace("[hash]", &format!("{:04x}", i + 1));
            chunks.push(RenderedChunk::lazy(
                file_name,
                format!(
                    "import {{ h }} from '__FACET_CORE__';\nexport const load = () => {}('./{}');",
                    import, tag
                ),
            ));
        }
        Ok(RenderedOutput::new(chunks))
    }
}

pub fn graph(tags: &[&str]) -> FakeGraph {
    FakeGraph {
        components: tags.iter().map(|t| t.to_string()).collect(),
    }
}
