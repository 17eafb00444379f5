use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use structopt::StructOpt;
use tracing::*;

use tandemplan::*;
use tandemplan::data::Instance;
use tandemplan::model::ModelBuilder;
use tandemplan::solve::{SolveParams, Status};
use scenarios::{ParseScenario, ReliefFmt, Scenario};

mod common;
use common::*;

#[derive(Debug, StructOpt)]
struct ClArgs {
    /// Scenario file in the relief text format
    #[structopt(parse(from_os_str))]
    scenario: PathBuf,
    /// Wall-clock budget for the solver, in seconds
    #[structopt(long, short="t", default_value="30", validator=clap_range_validator(Some(1), None))]
    time_limit: u64,
    #[structopt(flatten)]
    output: OutputOptions,
}

fn main() -> Result<()> {
    let args: ClArgs = StructOpt::from_args();
    let _g = init_logging(args.output.log.clone());
    debug!(?args);

    let raw = Scenario::parse(ReliefFmt(&args.scenario))?;
    let data = Instance::from_scenario(&raw)?;
    info!(id = %data.id, areas = data.n, tandems = data.K.len(), "instance loaded");

    let mut builder = ModelBuilder::new(&data);
    builder.post_all();
    let outcome = builder.solve(&SolveParams {
        time_limit: Some(Duration::from_secs(args.time_limit)),
    });

    println!("Status: {}", outcome.status);
    match outcome.assignment {
        Some(asn) => {
            let plan = report::extract(&data, &asn);
            output_plan(&args.output, &plan)?;
        }
        None => match outcome.status {
            Status::Unknown => println!("No verdict within the time budget."),
            _ => println!("No solution."),
        },
    }
    Ok(())
}
