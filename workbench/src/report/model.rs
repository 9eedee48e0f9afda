use crate::workflow::runner::{StepValue, WorkflowResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Serializable outcome of one workflow step. Matrices travel as their
/// shape plus the row-major packed array.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepReport {
    pub index: usize,
    pub operation: String,
    pub output: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<(usize, usize)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packed: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scalar: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equal: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Grid rendering used by the text report only.
    #[serde(skip)]
    pub rendered: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ReportModel {
    pub steps: Vec<StepReport>,
    pub processed: usize,
    pub errors: usize,
    #[serde(default)]
    pub per_operation: BTreeMap<String, usize>,
}

impl ReportModel {
    pub fn from_result(result: &WorkflowResult) -> Self {
        let steps = result
            .records
            .iter()
            .map(|record| {
                let mut report = StepReport {
                    index: record.index,
                    operation: record.operation.to_string(),
                    output: record.output.clone(),
                    shape: None,
                    packed: None,
                    scalar: None,
                    equal: None,
                    error: None,
                    rendered: None,
                };
                match &record.outcome {
                    Ok(StepValue::Matrix(matrix)) => {
                        report.shape = Some(matrix.shape());
                        report.packed = Some(matrix.to_packed_array());
                        report.rendered = Some(matrix.to_string());
                    }
                    Ok(StepValue::Scalar(value)) => report.scalar = Some(*value),
                    Ok(StepValue::Flag(flag)) => report.equal = Some(*flag),
                    Err(message) => report.error = Some(message.clone()),
                }
                report
            })
            .collect();

        Self {
            steps,
            processed: result.metrics.processed,
            errors: result.metrics.errors,
            per_operation: result.metrics.per_operation.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::template::demo_workflow;
    use crate::workflow::runner::Runner;

    #[test]
    fn model_carries_packed_matrices_and_scalars() {
        let result = Runner::new(demo_workflow(2, 3)).execute().unwrap();
        let model = ReportModel::from_result(&result);

        assert_eq!(model.steps.len(), 7);
        assert_eq!(model.processed, 7);
        assert_eq!(model.per_operation.get("multiply"), Some(&2));
        let eye = &model.steps[0];
        assert_eq!(eye.shape, Some((2, 2)));
        assert_eq!(eye.packed, Some(vec![1.0, 0.0, 0.0, 1.0]));
        assert_eq!(model.steps[2].equal, Some(true));
        assert!(model.steps[6].scalar.is_some());
    }
}
