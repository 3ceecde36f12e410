use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::pipeline::DEFAULT_FORM;

/// La Liga match prediction pipeline
#[derive(Parser, Debug, Clone)]
#[command(name = "laliga-predictor", version, about)]
pub struct Config {
    /// Directory holding the trained model artifacts
    #[arg(long, env = "MODELS_DIR", default_value = "models", global = true)]
    pub models_dir: PathBuf,

    /// Artifact file prefix (`<prefix>_hxg.json`, `<prefix>_res.json`, ...)
    #[arg(long, env = "ARTIFACT_PREFIX", default_value = "laliga", global = true)]
    pub artifact_prefix: String,

    /// Emit JSON instead of human-readable text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Predict a single fixture
    Predict {
        /// Home team (see `teams`)
        #[arg(long)]
        home: String,

        /// Away team (see `teams`)
        #[arg(long)]
        away: String,

        /// Home team form: average points over the last 5 matches (0.0–3.0)
        #[arg(long, default_value_t = DEFAULT_FORM)]
        home_form: f64,

        /// Away team form: average points over the last 5 matches (0.0–3.0)
        #[arg(long, default_value_t = DEFAULT_FORM)]
        away_form: f64,

        /// Also print the full feature record and encoding diagnostics
        #[arg(long)]
        details: bool,
    },
    /// List the teams the models know
    Teams,
    /// Serve the prediction API
    Serve {
        /// Listen address
        #[arg(long, env = "DASHBOARD_ADDR", default_value = "0.0.0.0:8080")]
        addr: String,
    },
}

impl Config {
    /// Whether the command needs the model artifacts.
    pub fn needs_models(&self) -> bool {
        !matches!(self.command, Command::Teams)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.artifact_prefix.trim().is_empty() {
            anyhow::bail!("artifact_prefix must not be empty");
        }
        if self.needs_models() && !self.models_dir.is_dir() {
            anyhow::bail!(
                "models directory {} does not exist. Use --models-dir or MODELS_DIR.",
                self.models_dir.display()
            );
        }
        if let Command::Serve { addr } = &self.command {
            if addr.parse::<std::net::SocketAddr>().is_err() {
                anyhow::bail!("invalid listen address {addr:?}");
            }
        }
        Ok(())
    }
}
