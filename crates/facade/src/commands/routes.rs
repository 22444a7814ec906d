//! Route listing command.

use std::path::Path;

use anyhow::Result;
use facade_static::Exporter;

use crate::config::ConfigFile;
use crate::site;

/// Print every route with its title and output file.
pub fn run(config_path: &Path) -> Result<()> {
    let config = ConfigFile::load(config_path)?.export_config();

    let routes = site::routes()?;
    let exporter = Exporter::new(config);
    let output_dir = &exporter.config().output_dir;

    for planned in exporter.plan(&routes)? {
        println!(
            "{:<20} {:<24} {}",
            planned.path,
            planned.page.title,
            output_dir.join(&planned.output).display()
        );
    }

    Ok(())
}
