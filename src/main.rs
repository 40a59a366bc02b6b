use clap::Parser;
use std::path::PathBuf;
use tracing::error;

use basic_cleaning::artifact::FsArtifactStore;
use basic_cleaning::cleaning::{run_cleaning, CleaningParams};
use basic_cleaning::config::Config;
use basic_cleaning::constants;
use basic_cleaning::logging;
use basic_cleaning::run::{RunContext, RunStatus};

#[derive(Parser)]
#[command(name = "basic-cleaning")]
#[command(about = "Cleans the listings dataset and republishes it as a new artifact version")]
#[command(version = "0.1.0")]
struct Cli {
    /// Input artifact reference, e.g. "sample.csv:latest"
    // The misspelled alias is kept for invocations written against the
    // original step.
    #[arg(long, alias = "input_artifect")]
    input_artifact: String,

    /// Name for the output artifact
    #[arg(long, alias = "output_artifect")]
    output_artifact: String,

    /// Type tag recorded on the output artifact
    #[arg(long)]
    output_type: String,

    /// Description of the output artifact
    #[arg(long)]
    output_description: String,

    /// Minimum price for dropping outliers
    #[arg(long)]
    min_price: i64,

    /// Maximum price for dropping outliers
    #[arg(long)]
    max_price: i64,

    /// Root directory of the artifact store and run logs
    #[arg(long)]
    data_root: Option<String>,

    /// Path to an alternate config file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    let data_root = config.data_root(cli.data_root.as_deref());

    let store = FsArtifactStore::open_at_root(&data_root)?;
    let run = RunContext::start(constants::JOB_TYPE, &data_root.join("runs"))?;

    let params = CleaningParams {
        input_artifact: cli.input_artifact,
        output_artifact: cli.output_artifact,
        output_type: cli.output_type,
        output_description: cli.output_description,
        min_price: cli.min_price,
        max_price: cli.max_price,
    };
    run.log_params(&params)?;

    let span = tracing::info_span!("basic_cleaning", run_id = %run.run_id());
    let _enter = span.enter();

    match run_cleaning(&store, &run, &params) {
        Ok(outcome) => {
            run.finish(
                RunStatus::Finished,
                Some(outcome.input_rows),
                Some(outcome.output_rows),
            )?;
            println!("\n📊 Cleaning results:");
            println!("   Input rows: {}", outcome.input_rows);
            println!("   Output rows: {}", outcome.output_rows);
            println!(
                "   Published: {}:v{}",
                outcome.output.name, outcome.output.version
            );
            println!("✅ Cleaning run completed successfully");
            Ok(())
        }
        Err(e) => {
            // Best effort; the original failure is what the caller needs.
            let _ = run.finish(RunStatus::Failed, None, None);
            error!("Cleaning run failed: {}", e);
            println!("❌ Cleaning run failed: {}", e);
            Err(e.into())
        }
    }
}
