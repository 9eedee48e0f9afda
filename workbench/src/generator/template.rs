use crate::generator::profile::MatrixSpec;
use crate::workflow::config::{StepConfig, WorkflowConfig};

/// Built-in workflow: a seeded `size x size` weight matrix applied to a
/// seeded input column, plus the identity-law and dot-product checks.
pub fn demo_workflow(size: usize, seed: u64) -> WorkflowConfig {
    let mut config = WorkflowConfig::default();
    config.matrices.insert(
        "weights".into(),
        MatrixSpec::Random {
            rows: size,
            cols: size,
            min: -1.0,
            max: 1.0,
            seed: Some(seed),
        },
    );
    config.matrices.insert(
        "input".into(),
        MatrixSpec::Random {
            rows: size,
            cols: 1,
            min: 0.0,
            max: 1.0,
            seed: Some(seed.wrapping_add(1)),
        },
    );

    config.steps = vec![
        StepConfig::Identity {
            size,
            output: "eye".into(),
        },
        StepConfig::Multiply {
            lhs: "weights".into(),
            rhs: "eye".into(),
            output: "weights_eye".into(),
        },
        StepConfig::Equals {
            lhs: "weights".into(),
            rhs: "weights_eye".into(),
            precision: None,
            output: "identity_law".into(),
        },
        StepConfig::Multiply {
            lhs: "weights".into(),
            rhs: "input".into(),
            output: "activation".into(),
        },
        StepConfig::Scale {
            input: "activation".into(),
            value: 0.5,
            output: "half_activation".into(),
        },
        StepConfig::Add {
            lhs: "half_activation".into(),
            rhs: "half_activation".into(),
            output: "activation_again".into(),
        },
        StepConfig::Dot {
            lhs: "input".into(),
            rhs: "input".into(),
            output: "input_norm_sq".into(),
        },
    ];
    config
}
