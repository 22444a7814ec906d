//! Static export command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use facade_static::Exporter;

use crate::config::ConfigFile;
use crate::site;

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub output: Option<PathBuf>,
    pub minify: Option<bool>,
    pub trailing_slash: Option<bool>,
    pub clean: Option<bool>,
}

/// Run the build command.
pub fn run(config_path: &Path, overrides: Overrides) -> Result<()> {
    tracing::info!("Exporting static site...");

    let mut config = ConfigFile::load(config_path)?.export_config();
    if let Some(output) = overrides.output {
        config.output_dir = output;
    }
    if let Some(minify) = overrides.minify {
        config.minify = minify;
    }
    if let Some(trailing_slash) = overrides.trailing_slash {
        config.trailing_slash = trailing_slash;
    }
    if let Some(clean) = overrides.clean {
        config.clean = clean;
    }

    let routes = site::routes()?;
    let result = Exporter::new(config).export(&routes)?;

    for page in &result.failed {
        tracing::error!("{}: {}", page.path, page.error);
    }

    tracing::info!(
        "Exported {} pages and {} assets in {}ms",
        result.succeeded.len(),
        result.assets,
        result.duration_ms
    );

    tracing::info!("Output: {}", result.output_dir.display());

    if !result.is_success() {
        anyhow::bail!(
            "{} of {} pages failed to export",
            result.failed.len(),
            result.failed.len() + result.succeeded.len()
        );
    }

    Ok(())
}
