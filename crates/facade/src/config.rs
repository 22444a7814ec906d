//! Configuration file loading (facade.toml).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use facade_compose::Theme;
use facade_static::ExportConfig;
use serde::Deserialize;

/// Configuration file structure.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub export: ExportSettings,
    #[serde(default)]
    pub theme: Theme,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub title: String,
    pub base_url: String,
    /// Absolute origin used for sitemap locations
    pub url: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Facade".to_string(),
            base_url: "/".to_string(),
            url: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub output: PathBuf,
    pub assets: PathBuf,
    pub trailing_slash: bool,
    pub minify: bool,
    pub clean: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            output: PathBuf::from("out"),
            assets: PathBuf::from("public"),
            trailing_slash: true,
            minify: true,
            clean: false,
        }
    }
}

impl ConfigFile {
    /// Load configuration from `path` if it exists.
    /// Returns an error if the file exists but is malformed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No {} found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Exporter settings described by this file.
    pub fn export_config(self) -> ExportConfig {
        let mut base_url = self.site.base_url;
        if !base_url.starts_with('/') && !base_url.contains("://") {
            base_url.insert(0, '/');
        }
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        ExportConfig {
            output_dir: self.export.output,
            assets_dir: self.export.assets,
            trailing_slash: self.export.trailing_slash,
            base_url,
            site_url: self.site.url,
            site_title: self.site.title,
            minify: self.export.minify,
            clean: self.export.clean,
            theme: self.theme,
        }
    }
}
