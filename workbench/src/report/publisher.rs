use crate::report::model::ReportModel;
use anyhow::Context;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Renders a [`ReportModel`] for the terminal or for other tools.
#[derive(Default)]
pub struct ReportPublisher;

impl ReportPublisher {
    pub fn new() -> Self {
        Self
    }

    pub fn render_text(&self, model: &ReportModel) -> String {
        let mut out = String::new();
        for step in &model.steps {
            out.push_str(&format!(
                "step {} {} -> {}",
                step.index, step.operation, step.output
            ));
            if let Some(error) = &step.error {
                out.push_str(&format!(": FAILED {}\n", error));
                continue;
            }
            if let Some((rows, cols)) = step.shape {
                out.push_str(&format!(" ({}x{})\n", rows, cols));
            } else {
                out.push('\n');
            }
            if let Some(rendered) = &step.rendered {
                out.push_str(rendered);
                out.push('\n');
            }
            if let Some(scalar) = step.scalar {
                out.push_str(&format!("{}\n", scalar));
            }
            if let Some(equal) = step.equal {
                out.push_str(&format!("equal={}\n", equal));
            }
        }
        let breakdown: Vec<String> = model
            .per_operation
            .iter()
            .map(|(operation, count)| format!("{}={}", operation, count))
            .collect();
        out.push_str(&format!(
            "processed={} errors={} [{}]\n",
            model.processed,
            model.errors,
            breakdown.join(" ")
        ));
        out
    }

    pub fn render_json(&self, model: &ReportModel) -> anyhow::Result<String> {
        serde_json::to_string_pretty(model).context("serializing workflow report")
    }

    /// Appends `report` to `path`, creating parent directories as needed.
    pub fn append_to(&self, path: &Path, report: &str) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating report directory {}", parent.display()))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening report {}", path.display()))?;
        file.write_all(report.as_bytes())
            .with_context(|| format!("writing report {}", path.display()))?;
        Ok(())
    }
}
