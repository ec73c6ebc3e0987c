//! Housing pipeline entry point

use clap::Parser;
use housing_pipeline::cli::{
    cmd_load, cmd_predict, cmd_preprocess, cmd_run, cmd_sample, cmd_serve, cmd_show, Cli,
    Commands,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "housing_pipeline=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.pipeline_config()?;

    match cli.command {
        Some(Commands::Load) => cmd_load(config)?,
        Some(Commands::Preprocess) => cmd_preprocess(config)?,
        Some(Commands::Predict) => cmd_predict(config)?,
        Some(Commands::Sample) => cmd_sample(config)?,
        Some(Commands::Show { limit }) => cmd_show(config, limit)?,
        Some(Commands::Serve { port, host }) => cmd_serve(config, &host, port).await?,
        // Default: full batch run
        Some(Commands::Run) | None => cmd_run(config)?,
    }

    Ok(())
}
