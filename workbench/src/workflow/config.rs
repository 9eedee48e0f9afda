use crate::generator::profile::MatrixSpec;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// One operation in a workflow. Matrix inputs are referenced by name and
/// matrix-valued outputs become available to later steps.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum StepConfig {
    Add {
        lhs: String,
        rhs: String,
        output: String,
    },
    Subtract {
        lhs: String,
        rhs: String,
        output: String,
    },
    Multiply {
        lhs: String,
        rhs: String,
        output: String,
    },
    Scale {
        input: String,
        value: f64,
        output: String,
    },
    Divide {
        input: String,
        value: f64,
        output: String,
    },
    Dot {
        lhs: String,
        rhs: String,
        output: String,
    },
    Row {
        input: String,
        index: usize,
        output: String,
    },
    Col {
        input: String,
        index: usize,
        output: String,
    },
    Identity {
        size: usize,
        output: String,
    },
    #[serde(rename = "clone")]
    Duplicate {
        input: String,
        output: String,
    },
    Equals {
        lhs: String,
        rhs: String,
        #[serde(default)]
        precision: Option<i32>,
        output: String,
    },
}

impl StepConfig {
    pub fn name(&self) -> &'static str {
        match self {
            StepConfig::Add { .. } => "add",
            StepConfig::Subtract { .. } => "subtract",
            StepConfig::Multiply { .. } => "multiply",
            StepConfig::Scale { .. } => "scale",
            StepConfig::Divide { .. } => "divide",
            StepConfig::Dot { .. } => "dot",
            StepConfig::Row { .. } => "row",
            StepConfig::Col { .. } => "col",
            StepConfig::Identity { .. } => "identity",
            StepConfig::Duplicate { .. } => "clone",
            StepConfig::Equals { .. } => "equals",
        }
    }

    pub fn output(&self) -> &str {
        match self {
            StepConfig::Add { output, .. }
            | StepConfig::Subtract { output, .. }
            | StepConfig::Multiply { output, .. }
            | StepConfig::Scale { output, .. }
            | StepConfig::Divide { output, .. }
            | StepConfig::Dot { output, .. }
            | StepConfig::Row { output, .. }
            | StepConfig::Col { output, .. }
            | StepConfig::Identity { output, .. }
            | StepConfig::Duplicate { output, .. }
            | StepConfig::Equals { output, .. } => output,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct WorkflowConfig {
    #[serde(default)]
    pub matrices: BTreeMap<String, MatrixSpec>,
    #[serde(default)]
    pub steps: Vec<StepConfig>,
    /// Record failing steps and keep going instead of aborting the run.
    #[serde(default)]
    pub continue_on_error: bool,
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const WORKFLOW: &str = "\
matrices:
  a:
    kind: rows
    values: [[1, 2], [3, 4]]
  w:
    kind: random
    rows: 2
    cols: 2
    seed: 5
steps:
  - op: add
    lhs: a
    rhs: w
    output: sum
  - op: equals
    lhs: a
    rhs: sum
    precision: 3
    output: same
continue_on_error: true
";

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(WORKFLOW.as_bytes()).unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();

        assert!(cfg.continue_on_error);
        assert_eq!(
            cfg.matrices["a"],
            MatrixSpec::Rows {
                values: vec![vec![1.0, 2.0], vec![3.0, 4.0]]
            }
        );
        assert_eq!(
            cfg.matrices["w"],
            MatrixSpec::Random {
                rows: 2,
                cols: 2,
                min: -1.0,
                max: 1.0,
                seed: Some(5)
            }
        );
        assert_eq!(cfg.steps.len(), 2);
        assert_eq!(cfg.steps[0].name(), "add");
        assert_eq!(cfg.steps[1].output(), "same");
    }

    #[test]
    fn config_load_reports_missing_file() {
        let err = WorkflowConfig::load("/nonexistent/workflow.yaml").unwrap_err();
        assert!(err.to_string().contains("reading workflow config"));
    }

    #[test]
    fn bundled_sample_workflow_parses() {
        let cfg: WorkflowConfig =
            serde_yaml::from_str(include_str!("../../workflows/sample.yaml")).unwrap();
        assert_eq!(cfg.matrices.len(), 4);
        assert_eq!(cfg.steps.len(), 6);
        assert_eq!(cfg.steps[4].name(), "divide");
    }

    #[test]
    fn unknown_operation_is_a_parse_error() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"steps:\n  - op: invert\n    input: a\n    output: b\n")
            .unwrap();
        let path = temp.into_temp_path();
        assert!(WorkflowConfig::load(&path).is_err());
    }
}
