use std::process::ExitCode;

use aircollect::{ApiToken, CollectorConfig, CollectorError, Pipeline, export, logging};
use anyhow::Result;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let message = err
                .downcast_ref::<CollectorError>()
                .map_or_else(|| format!("{err:#}"), CollectorError::user_message);
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let config = CollectorConfig::load()?;
    logging::init(&config.logging)?;

    // Checked before any request goes out
    let token = ApiToken::from_env(&config.air_quality.token_env)?;

    let mut pipeline = Pipeline::from_config(&config, token)?;
    let output = pipeline.run().await?;

    println!("\nCollected rows: {}", output.dataset.len());
    if output.summary.air_quality_failures + output.summary.weather_failures > 0 {
        println!(
            "Failed locations: {} air quality, {} weather",
            output.summary.air_quality_failures, output.summary.weather_failures
        );
    }
    println!("{}", output.dataset.preview(config.collection.preview_rows));

    export::save_csv(&output.dataset, &config.collection.output_path)?;
    println!("\nSaved → {}", config.collection.output_path);

    Ok(())
}
