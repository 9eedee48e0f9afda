use clap::Parser;
use generator::template::demo_workflow;
use log::info;
use report::{ReportModel, ReportPublisher};
use std::path::PathBuf;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod generator;
mod report;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Evaluates matrix workflows with matrixcore")]
struct Args {
    /// Load a workflow config from YAML instead of running the built-in demo
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Dimension of the demo weight matrix
    #[arg(long, default_value_t = 3)]
    size: usize,
    /// Seed for the demo's random matrices
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Print the report as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
    /// Append the rendered report to this file
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = if let Some(path) = args.workflow {
        WorkflowConfig::load(path)?
    } else {
        demo_workflow(args.size, args.seed)
    };

    let runner = Runner::new(workflow_config);
    let result = runner.execute()?;
    info!(
        "workflow finished with {} named matrices",
        result.matrices.len()
    );
    let model = ReportModel::from_result(&result);

    let publisher = ReportPublisher::new();
    let rendered = if args.json {
        publisher.render_json(&model)?
    } else {
        publisher.render_text(&model)
    };
    print!("{}", rendered);
    if !rendered.ends_with('\n') {
        println!();
    }

    if let Some(path) = args.report {
        publisher.append_to(&path, &rendered)?;
    }

    Ok(())
}
