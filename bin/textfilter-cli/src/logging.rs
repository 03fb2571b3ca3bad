use std::path::PathBuf;

use anyhow::Result;

use config::Config;

use serde::{Deserialize, Serialize};

use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const TRACKED_CRATES: &[&str] = &["tfq", "textfilter"];

#[cfg(debug_assertions)]
const NORMAL_CRATE_LEVEL: &str = "info";

#[cfg(not(debug_assertions))]
const NORMAL_CRATE_LEVEL: &str = "warn";

#[cfg(debug_assertions)]
const DETAILED_CRATE_LEVEL: &str = "trace";

#[cfg(not(debug_assertions))]
const DETAILED_CRATE_LEVEL: &str = "debug";

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Normal,
    Detailed,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub enum LogStructure {
    Preset(LogLevel),
    Explicit(Vec<String>),
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: LogStructure,

    #[serde(default)]
    pub json: bool,
}

impl LoggingConfig {
    fn filter(&self) -> EnvFilter {
        let level = match &self.level {
            LogStructure::Explicit(directives) => return EnvFilter::new(directives.join(",")),
            LogStructure::Preset(LogLevel::Normal) => NORMAL_CRATE_LEVEL,
            LogStructure::Preset(LogLevel::Detailed) => DETAILED_CRATE_LEVEL,
        };

        let directives = TRACKED_CRATES
            .iter()
            .map(|crate_name| format!("{}={}", crate_name, level))
            .collect::<Vec<_>>();

        EnvFilter::new(directives.join(","))
    }
}

fn load_logging_config(path: &Option<PathBuf>) -> Result<LoggingConfig> {
    let mut builder = Config::builder()
        .set_default("level", "normal")?
        .set_default("json", false)?
        .add_source(config::Environment::with_prefix("TEXTFILTER_LOG"));

    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path.as_ref()));
    }

    let config: LoggingConfig = builder.build()?.try_deserialize()?;

    Ok(config)
}

/// Installs the global subscriber. Logs go to stderr, stdout is reserved for results.
pub fn init_logger(log_cfg_path: &Option<PathBuf>) -> Result<()> {
    let cfg = load_logging_config(log_cfg_path)?;
    let env_filter = cfg.filter();

    if cfg.json {
        FmtSubscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .json()
            .finish()
            .init();
    } else {
        FmtSubscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .finish()
            .init();
    }

    Ok(())
}
