use std::path::PathBuf;

use anyhow::Result;
use config::{Config, Environment, File};
use textfilter::Settings;

/// Loads engine settings from an optional file, overridden by `TEXTFILTER_*` variables.
pub fn load(path: &Option<PathBuf>) -> Result<Settings> {
    let mut loader = Config::builder()
        .set_default("haystack_key", "haystack")?
        .set_default("ignore_case", false)?
        .set_default("haystack_as_one_token", false)?
        .set_default("fault_policy", "closed")?;

    if let Some(path) = path {
        loader = loader.add_source(File::from(path.as_ref()));
    }

    loader = loader.add_source(Environment::with_prefix("TEXTFILTER").try_parsing(true));

    let settings: Settings = loader.build()?.try_deserialize()?;
    tracing::debug!(?settings, "loaded settings");

    Ok(settings)
}
