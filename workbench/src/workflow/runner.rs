use crate::generator::profile::build_matrix;
use crate::workflow::config::{StepConfig, WorkflowConfig};
use anyhow::{anyhow, Context};
use matrixcore::telemetry::{LogManager, MetricsRecorder, MetricsSnapshot};
use matrixcore::{Matrix, MatrixMath, DEFAULT_PRECISION};
use std::collections::BTreeMap;

/// Value produced by a single workflow step.
#[derive(Debug, Clone)]
pub enum StepValue {
    Matrix(Matrix),
    Scalar(f64),
    Flag(bool),
}

#[derive(Debug, Clone)]
pub struct StepRecord {
    pub index: usize,
    pub operation: &'static str,
    pub output: String,
    /// Either the produced value or the rendered failure.
    pub outcome: Result<StepValue, String>,
}

pub struct WorkflowResult {
    pub records: Vec<StepRecord>,
    pub matrices: BTreeMap<String, Matrix>,
    pub metrics: MetricsSnapshot,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> anyhow::Result<WorkflowResult> {
        let logger = LogManager::new("workbench");
        let metrics = MetricsRecorder::new();

        let mut matrices = BTreeMap::new();
        for (name, spec) in &self.config.matrices {
            let matrix =
                build_matrix(spec).with_context(|| format!("building matrix '{}'", name))?;
            logger.record(&format!(
                "declared {} ({}x{})",
                name,
                matrix.rows(),
                matrix.cols()
            ));
            matrices.insert(name.clone(), matrix);
        }

        let mut records = Vec::with_capacity(self.config.steps.len());
        for (index, step) in self.config.steps.iter().enumerate() {
            let operation = step.name();
            match evaluate(step, &matrices) {
                Ok(value) => {
                    metrics.record(operation, true);
                    logger.record(&format!("step {} {} -> {}", index, operation, step.output()));
                    if let StepValue::Matrix(matrix) = &value {
                        matrices.insert(step.output().to_string(), matrix.clone());
                    }
                    records.push(StepRecord {
                        index,
                        operation,
                        output: step.output().to_string(),
                        outcome: Ok(value),
                    });
                }
                Err(err) => {
                    metrics.record(operation, false);
                    logger.record_failure(operation, &err);
                    if !self.config.continue_on_error {
                        return Err(err)
                            .with_context(|| format!("executing step {} ({})", index, operation));
                    }
                    records.push(StepRecord {
                        index,
                        operation,
                        output: step.output().to_string(),
                        outcome: Err(format!("{:#}", err)),
                    });
                }
            }
        }

        Ok(WorkflowResult {
            records,
            matrices,
            metrics: metrics.snapshot(),
        })
    }
}

fn lookup<'a>(matrices: &'a BTreeMap<String, Matrix>, name: &str) -> anyhow::Result<&'a Matrix> {
    matrices
        .get(name)
        .ok_or_else(|| anyhow!("unknown matrix '{}'", name))
}

fn evaluate(step: &StepConfig, matrices: &BTreeMap<String, Matrix>) -> anyhow::Result<StepValue> {
    let value = match step {
        StepConfig::Add { lhs, rhs, .. } => StepValue::Matrix(MatrixMath::add(
            lookup(matrices, lhs)?,
            lookup(matrices, rhs)?,
        )?),
        StepConfig::Subtract { lhs, rhs, .. } => StepValue::Matrix(MatrixMath::subtract(
            lookup(matrices, lhs)?,
            lookup(matrices, rhs)?,
        )?),
        StepConfig::Multiply { lhs, rhs, .. } => StepValue::Matrix(MatrixMath::multiply(
            lookup(matrices, lhs)?,
            lookup(matrices, rhs)?,
        )?),
        StepConfig::Scale { input, value, .. } => StepValue::Matrix(
            MatrixMath::multiply_scalar(lookup(matrices, input)?, *value)?,
        ),
        StepConfig::Divide { input, value, .. } => {
            StepValue::Matrix(MatrixMath::divide(lookup(matrices, input)?, *value)?)
        }
        StepConfig::Dot { lhs, rhs, .. } => StepValue::Scalar(MatrixMath::scalar(
            lookup(matrices, lhs)?,
            lookup(matrices, rhs)?,
        )?),
        StepConfig::Row { input, index, .. } => {
            StepValue::Matrix(lookup(matrices, input)?.get_row(*index)?)
        }
        StepConfig::Col { input, index, .. } => {
            StepValue::Matrix(lookup(matrices, input)?.get_col(*index)?)
        }
        StepConfig::Identity { size, .. } => StepValue::Matrix(MatrixMath::identity(*size)?),
        StepConfig::Duplicate { input, .. } => StepValue::Matrix(lookup(matrices, input)?.clone()),
        StepConfig::Equals {
            lhs,
            rhs,
            precision,
            ..
        } => StepValue::Flag(lookup(matrices, lhs)?.equals_with_precision(
            lookup(matrices, rhs)?,
            precision.unwrap_or(DEFAULT_PRECISION),
        )?),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::profile::MatrixSpec;
    use crate::generator::template::demo_workflow;

    fn rows(values: &[&[f64]]) -> MatrixSpec {
        MatrixSpec::Rows {
            values: values.iter().map(|row| row.to_vec()).collect(),
        }
    }

    #[test]
    fn runner_executes_demo_workflow() {
        let runner = Runner::new(demo_workflow(3, 42));
        let result = runner.execute().unwrap();

        assert_eq!(result.records.len(), 7);
        assert!(result.records.iter().all(|record| record.outcome.is_ok()));
        assert!(matches!(
            result.records[2].outcome,
            Ok(StepValue::Flag(true))
        ));
        assert_eq!(result.matrices["activation"].shape(), (3, 1));
        assert!(result.matrices["activation_again"].equals(&result.matrices["activation"]));
        assert_eq!(result.metrics.processed, 7);
        assert_eq!(result.metrics.errors, 0);
    }

    #[test]
    fn runner_aborts_on_first_failure_by_default() {
        let mut config = WorkflowConfig::default();
        config.matrices.insert("a".into(), rows(&[&[1.0, 2.0]]));
        config.steps.push(StepConfig::Divide {
            input: "a".into(),
            value: 0.0,
            output: "broken".into(),
        });

        let err = Runner::new(config).execute().err().unwrap();
        let message = format!("{:#}", err);
        assert!(message.contains("executing step 0 (divide)"));
        assert!(message.contains("invalid number"));
    }

    #[test]
    fn runner_records_failures_when_continuing() {
        let mut config = WorkflowConfig {
            continue_on_error: true,
            ..Default::default()
        };
        config.matrices.insert("a".into(), rows(&[&[1.0, 2.0, 3.0]]));
        config
            .matrices
            .insert("b".into(), rows(&[&[1.0, 2.0], &[3.0, 4.0]]));
        config.steps = vec![
            StepConfig::Multiply {
                lhs: "a".into(),
                rhs: "b".into(),
                output: "ab".into(),
            },
            StepConfig::Row {
                input: "b".into(),
                index: 2,
                output: "missing_row".into(),
            },
            StepConfig::Dot {
                lhs: "a".into(),
                rhs: "a".into(),
                output: "norm_sq".into(),
            },
            StepConfig::Add {
                lhs: "a".into(),
                rhs: "nope".into(),
                output: "c".into(),
            },
        ];

        let result = Runner::new(config).execute().unwrap();
        assert!(result.records[0].outcome.is_err());
        assert!(result.records[1].outcome.is_err());
        assert!(matches!(result.records[2].outcome, Ok(StepValue::Scalar(v)) if v == 14.0));
        assert!(matches!(&result.records[3].outcome, Err(msg) if msg.contains("unknown matrix")));
        assert_eq!(result.metrics.errors, 3);
        assert!(!result.matrices.contains_key("ab"));
    }

    #[test]
    fn sample_workflow_records_expected_failure() {
        let config: WorkflowConfig =
            serde_yaml::from_str(include_str!("../../workflows/sample.yaml")).unwrap();
        let result = Runner::new(config).execute().unwrap();

        assert_eq!(result.matrices["out"].shape(), (1, 1));
        assert!(matches!(result.records[2].outcome, Ok(StepValue::Scalar(v)) if v == 2.0));
        assert!(result.records[4].outcome.is_err());
        assert!(matches!(result.records[5].outcome, Ok(StepValue::Flag(true))));
        assert_eq!(result.metrics.errors, 1);
    }

    #[test]
    fn step_outputs_feed_later_steps() {
        let mut config = WorkflowConfig::default();
        config.matrices.insert("a".into(), rows(&[&[2.0, 4.0]]));
        config.steps = vec![
            StepConfig::Duplicate {
                input: "a".into(),
                output: "copy".into(),
            },
            StepConfig::Subtract {
                lhs: "copy".into(),
                rhs: "a".into(),
                output: "zero".into(),
            },
            StepConfig::Col {
                input: "zero".into(),
                index: 1,
                output: "last".into(),
            },
        ];

        let result = Runner::new(config).execute().unwrap();
        assert!(result.matrices["zero"].is_zero());
        assert_eq!(result.matrices["last"].shape(), (1, 1));
    }
}
