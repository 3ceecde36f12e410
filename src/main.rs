use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use tracing::{error, info};

use laliga_predictor::config::{Command, Config};
use laliga_predictor::dashboard::{self, AppState};
use laliga_predictor::pipeline::{MatchInput, Pipeline};
use laliga_predictor::report::format_prediction;
use laliga_predictor::{ModelBundle, TeamCatalog};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();
    config.validate()?;

    match &config.command {
        Command::Teams => {
            if config.json {
                println!("{}", serde_json::to_string_pretty(TeamCatalog.names())?);
            } else {
                for team in TeamCatalog.names() {
                    println!("{team}");
                }
            }
        }
        Command::Predict {
            home,
            away,
            home_form,
            away_form,
            details,
        } => {
            let pipeline = load_pipeline(&config)?;
            let input = MatchInput::new(home.as_str(), away.as_str(), *home_form, *away_form);
            let run = pipeline.run_detailed(&input).map_err(|e| {
                error!("Prediction failed: {}", e);
                e
            })?;

            if config.json {
                let out = if *details {
                    serde_json::json!({
                        "prediction": run.result,
                        "features": run.features,
                        "warnings": run.warnings,
                    })
                } else {
                    serde_json::to_value(&run.result)?
                };
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                let home_name = TeamCatalog.resolve(home).unwrap_or(home.as_str());
                let away_name = TeamCatalog.resolve(away).unwrap_or(away.as_str());
                print!("{}", format_prediction(&run.result, home_name, away_name));
                if *details {
                    println!("Feature record:");
                    for (feature, value) in run.features.iter() {
                        println!("  {:<22} {:>10.4}", feature.column(), value);
                    }
                    for warning in &run.warnings {
                        println!("warning: {warning}");
                    }
                }
            }
        }
        Command::Serve { addr } => {
            let pipeline = load_pipeline(&config)?;
            let app = dashboard::router(AppState { pipeline });
            let addr: SocketAddr = addr.parse()?;
            info!("Prediction API listening on http://{}", addr);
            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}

fn load_pipeline(config: &Config) -> Result<Pipeline> {
    let bundle = ModelBundle::load(&config.models_dir, &config.artifact_prefix)?;
    Ok(Pipeline::new(bundle))
}
