//! Stylesheet generation and static asset resolution.

use std::fmt::Write;
use std::path::{Component, Path, PathBuf};

use facade_compose::{Breakpoint, Theme, MAX_PADDING_STEP};

/// Generated stylesheet, relative to the output assets directory.
pub const STYLESHEET: &str = "main.css";

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Generate the site stylesheet from a theme.
    pub fn generate_css(theme: &Theme) -> String {
        let mut css = format!(
            r#"/* Facade design system */

:root {{
  --font-sans: {font};
  --foreground: {foreground};
  --background: {background};
  --shade: {shade};
  --primary: {primary};
  --primary-foreground: {primary_foreground};
  --border: {border};
  --radius: {radius};
  --space: {space};
}}
"#,
            font = theme.font_family,
            foreground = theme.foreground,
            background = theme.background,
            shade = theme.shade,
            primary = theme.primary,
            primary_foreground = theme.primary_foreground,
            border = theme.border,
            radius = theme.radius,
            space = theme.space(1),
        );
        css.push_str(BASE_CSS);

        for step in 0..=MAX_PADDING_STEP {
            let _ = writeln!(
                css,
                ".box[data-padding=\"{step}\"] {{ padding: {}; }}",
                theme.space(step)
            );
        }

        for bp in Breakpoint::ALL.into_iter().skip(1) {
            let _ = write!(
                css,
                "\n@media (min-width: {}px) {{\n  .grid[data-cols-{bp}] {{\n    grid-template-columns: repeat(var(--cols-{bp}), minmax(0, 1fr));\n  }}\n}}\n",
                theme.breakpoints.min_width(bp),
            );
        }

        css
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }

    /// Path of an asset relative to the asset directory.
    ///
    /// Returns `None` for sources that would escape the directory.
    pub fn relative_path(src: &str) -> Option<PathBuf> {
        let relative = Path::new(src.trim_start_matches('/'));
        let mut clean = PathBuf::new();
        for component in relative.components() {
            match component {
                Component::Normal(part) => clean.push(part),
                Component::CurDir => {}
                _ => return None,
            }
        }
        if clean.as_os_str().is_empty() {
            None
        } else {
            Some(clean)
        }
    }

    /// Whether a copied asset would land on a generated file.
    pub fn is_reserved(relative: &Path) -> bool {
        relative == Path::new(STYLESHEET)
    }

    /// Locate an asset source on disk.
    pub fn resolve(assets_dir: &Path, src: &str) -> Option<PathBuf> {
        let path = assets_dir.join(Self::relative_path(src)?);
        path.is_file().then_some(path)
    }
}

const BASE_CSS: &str = r#"
* {
  box-sizing: border-box;
  margin: 0;
  padding: 0;
}

body {
  font-family: var(--font-sans);
  background: var(--background);
  color: var(--foreground);
  line-height: 1.5;
}

.page {
  display: flex;
  flex-direction: column;
  gap: calc(var(--space) * 4);
  padding: calc(var(--space) * 3);
  margin: 0 auto;
  max-width: 1200px;
}

.box {
  display: flex;
  flex-direction: column;
  gap: calc(var(--space) * 2);
}

.box-border {
  border: 1px solid var(--border);
}

.box-radius {
  border-radius: var(--radius);
}

.tone-shade {
  background: var(--shade);
}

.tone-inverse {
  background: var(--primary);
  color: var(--primary-foreground);
}

h1 { font-size: 2.5rem; line-height: 1.2; }
h2 { font-size: 2rem; line-height: 1.25; }
h3 { font-size: 1.5rem; }
h4 { font-size: 1.25rem; }
h5, h6 { font-size: 1rem; }

img {
  display: block;
  max-width: 100%;
  height: auto;
}

.field {
  display: flex;
  flex-direction: column;
  gap: calc(var(--space) / 2);
}

.field label {
  font-weight: 600;
}

.field input {
  font: inherit;
  padding: var(--space);
  border: 1px solid var(--border);
  border-radius: var(--radius);
}

.link {
  color: var(--primary);
  text-decoration: underline;
  text-underline-offset: 4px;
}

.tone-inverse .link {
  color: inherit;
}

.button {
  display: inline-block;
  font: inherit;
  font-weight: 600;
  padding: var(--space) calc(var(--space) * 2);
  background: var(--primary);
  color: var(--primary-foreground);
  border: none;
  border-radius: var(--radius);
  text-align: center;
  text-decoration: none;
  cursor: pointer;
}

.tone-inverse .button {
  background: var(--primary-foreground);
  color: var(--primary);
}

.button-block {
  display: block;
  width: 100%;
}

.grid {
  display: grid;
  gap: calc(var(--space) * 3);
  grid-template-columns: repeat(var(--cols-xs, 1), minmax(0, 1fr));
}

.grid-item {
  display: flex;
  flex-direction: column;
}

"#;
