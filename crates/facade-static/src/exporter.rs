//! Static export of a route table.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Component, PathBuf};
use std::time::Instant;

use rayon::prelude::*;

use facade_compose::{escape, render, InvalidNodeError, RenderOptions, Theme};

use crate::assets::{AssetPipeline, STYLESHEET};
use crate::page::Page;
use crate::routes::{RouteError, RouteTable};
use crate::templates::{Context, TemplateEngine};

/// Top-level output entries written by the exporter itself.
const RESERVED_OUTPUTS: [(&str, &str); 3] = [
    ("assets", "the asset directory"),
    ("sitemap.xml", "the sitemap"),
    ("robots.txt", "robots.txt"),
];

/// Configuration for exporting a site.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Output directory
    pub output_dir: PathBuf,

    /// Directory holding images and other static files referenced by pages
    pub assets_dir: PathBuf,

    /// Write `<path>/index.html` instead of `<path>.html`
    pub trailing_slash: bool,

    /// Base URL for the site
    pub base_url: String,

    /// Absolute origin such as `https://example.com`; enables the sitemap
    pub site_url: Option<String>,

    /// Site title
    pub site_title: String,

    /// Minify the stylesheet
    pub minify: bool,

    /// Remove the output directory before exporting
    pub clean: bool,

    /// Design tokens for the stylesheet
    pub theme: Theme,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("out"),
            assets_dir: PathBuf::from("public"),
            trailing_slash: true,
            base_url: "/".to_string(),
            site_url: None,
            site_title: "Facade".to_string(),
            minify: true,
            clean: false,
            theme: Theme::default(),
        }
    }
}

/// Result of an export.
#[derive(Debug)]
pub struct ExportResult {
    /// Pages written, in route order
    pub succeeded: Vec<ExportedPage>,

    /// Pages that could not be written, in route order
    pub failed: Vec<FailedPage>,

    /// Number of asset files copied
    pub assets: usize,

    /// Total export time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

impl ExportResult {
    /// Whether every page was written.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// A page that was written.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedPage {
    /// Route path
    pub path: String,

    /// Written HTML file
    pub output_path: PathBuf,

    /// Local assets the page references
    pub assets: Vec<String>,
}

/// A page that failed to export.
#[derive(Debug)]
pub struct FailedPage {
    /// Route path
    pub path: String,

    /// Why the page failed
    pub error: PageError,
}

/// Errors that fail a single page.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("Invalid page tree: {0}")]
    InvalidNode(#[from] InvalidNodeError),

    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    #[error("Asset {0} would overwrite the generated stylesheet")]
    ReservedAsset(String),

    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// Errors that abort the whole export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Route(#[from] RouteError),

    #[error("{first} and {second} both write {}", .output.display())]
    DuplicateOutputPath {
        output: PathBuf,
        first: String,
        second: String,
    },

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// A route with its output file.
#[derive(Debug)]
pub struct PlannedPage<'a> {
    /// Route path
    pub path: &'a str,

    /// Page registered at the path
    pub page: &'a Page,

    /// Output file relative to the output directory
    pub output: PathBuf,
}

/// Static site exporter.
pub struct Exporter {
    config: ExportConfig,
    render_options: RenderOptions,
    templates: TemplateEngine,
}

impl Exporter {
    /// Create a new exporter.
    pub fn new(config: ExportConfig) -> Self {
        let render_options = RenderOptions {
            base_url: config.base_url.clone(),
            trailing_slash: config.trailing_slash,
        };

        Self {
            config,
            render_options,
            templates: TemplateEngine::new(),
        }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Output file for a route, relative to the output directory.
    pub fn output_file(&self, route_path: &str) -> PathBuf {
        let trimmed = route_path.trim_matches('/');

        if trimmed.is_empty() {
            // / -> index.html
            PathBuf::from("index.html")
        } else if self.config.trailing_slash {
            // /sign-in-form -> sign-in-form/index.html
            PathBuf::from(trimmed).join("index.html")
        } else {
            // /sign-in-form -> sign-in-form.html
            PathBuf::from(format!("{trimmed}.html"))
        }
    }

    /// Assign an output file to every route.
    ///
    /// Fails if the root route is missing, two routes share a file, or a
    /// route lands on a file the exporter generates itself.
    pub fn plan<'a>(&self, routes: &'a RouteTable) -> Result<Vec<PlannedPage<'a>>, ExportError> {
        routes.ensure_root()?;

        let mut owners: HashMap<PathBuf, &str> = HashMap::new();
        let mut planned = Vec::with_capacity(routes.len());

        for route in routes {
            let output = self.output_file(route.path());

            if let Some(Component::Normal(top)) = output.components().next() {
                if let Some((name, owner)) = RESERVED_OUTPUTS.iter().find(|(n, _)| top == *n) {
                    return Err(ExportError::DuplicateOutputPath {
                        output: PathBuf::from(*name),
                        first: owner.to_string(),
                        second: route.path().to_string(),
                    });
                }
            }

            if let Some(first) = owners.insert(output.clone(), route.path()) {
                return Err(ExportError::DuplicateOutputPath {
                    output,
                    first: first.to_string(),
                    second: route.path().to_string(),
                });
            }

            planned.push(PlannedPage {
                path: route.path(),
                page: route.page(),
                output,
            });
        }

        Ok(planned)
    }

    /// Export every route to the output directory.
    pub fn export(&self, routes: &RouteTable) -> Result<ExportResult, ExportError> {
        let start = Instant::now();

        let planned = self.plan(routes)?;

        if self.config.clean && self.config.output_dir.exists() {
            fs::remove_dir_all(&self.config.output_dir)
                .map_err(|e| ExportError::WriteError(e.to_string()))?;
        }

        // Ensure output directory exists
        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| ExportError::WriteError(e.to_string()))?;

        // Render and write pages in parallel, keeping route order
        let results: Vec<Result<ExportedPage, PageError>> = planned
            .par_iter()
            .map(|page| self.export_page(page))
            .collect();

        let mut succeeded = Vec::new();
        let mut failed = Vec::new();

        for (page, result) in planned.iter().zip(results) {
            match result {
                Ok(exported) => {
                    tracing::debug!(
                        "Exported {} -> {}",
                        page.path,
                        exported.output_path.display()
                    );
                    succeeded.push(exported);
                }
                Err(error) => {
                    tracing::warn!("Failed to export {}: {}", page.path, error);
                    failed.push(FailedPage {
                        path: page.path.to_string(),
                        error,
                    });
                }
            }
        }

        let assets = self.copy_assets(&succeeded)?;

        self.write_stylesheet()?;

        self.generate_sitemap(&succeeded)?;

        let duration = start.elapsed();

        tracing::info!(
            "Exported {} of {} pages and {} assets",
            succeeded.len(),
            planned.len(),
            assets
        );

        Ok(ExportResult {
            succeeded,
            failed,
            assets,
            duration_ms: duration.as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Compose, render and write a single page.
    fn export_page(&self, planned: &PlannedPage<'_>) -> Result<ExportedPage, PageError> {
        let tree = planned.page.compose()?;

        let mut assets: Vec<String> = Vec::new();
        for src in tree.assets() {
            if AssetPipeline::relative_path(src).is_some_and(|r| AssetPipeline::is_reserved(&r)) {
                return Err(PageError::ReservedAsset(src.to_string()));
            }
            if AssetPipeline::resolve(&self.config.assets_dir, src).is_none() {
                return Err(PageError::AssetNotFound(src.to_string()));
            }
            if !assets.iter().any(|a| a == src) {
                assets.push(src.to_string());
            }
        }

        let context = Context {
            title: planned.page.title.clone(),
            site_title: self.config.site_title.clone(),
            description: planned.page.description.clone(),
            content: render(&tree, &self.render_options),
            base_url: self.config.base_url.clone(),
        };

        let html = self
            .templates
            .render_page("page.html", &context)
            .map_err(|e| PageError::TemplateError(e.to_string()))?;

        let output_path = self.config.output_dir.join(&planned.output);

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent).map_err(|e| PageError::WriteError(e.to_string()))?;
        }

        fs::write(&output_path, html).map_err(|e| PageError::WriteError(e.to_string()))?;

        Ok(ExportedPage {
            path: planned.path.to_string(),
            output_path,
            assets,
        })
    }

    /// Copy assets referenced by exported pages, once per file.
    fn copy_assets(&self, pages: &[ExportedPage]) -> Result<usize, ExportError> {
        let assets_out = self.config.output_dir.join("assets");

        let mut sources: BTreeMap<PathBuf, PathBuf> = BTreeMap::new();
        for src in pages.iter().flat_map(|p| &p.assets) {
            let (Some(relative), Some(source)) = (
                AssetPipeline::relative_path(src),
                AssetPipeline::resolve(&self.config.assets_dir, src),
            ) else {
                continue;
            };
            sources.entry(relative).or_insert(source);
        }

        for (relative, source) in &sources {
            let target = assets_out.join(relative);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| ExportError::WriteError(e.to_string()))?;
            }
            fs::copy(source, &target).map_err(|e| {
                ExportError::WriteError(format!("{}: {}", source.display(), e))
            })?;
        }

        Ok(sources.len())
    }

    /// Write the theme stylesheet.
    fn write_stylesheet(&self) -> Result<(), ExportError> {
        let assets_out = self.config.output_dir.join("assets");
        fs::create_dir_all(&assets_out).map_err(|e| ExportError::WriteError(e.to_string()))?;

        let css = AssetPipeline::generate_css(&self.config.theme);
        let css = if self.config.minify {
            AssetPipeline::minify_css(&css).unwrap_or_else(|e| {
                tracing::warn!("Skipping stylesheet minification: {}", e);
                css
            })
        } else {
            css
        };

        fs::write(assets_out.join(STYLESHEET), css)
            .map_err(|e| ExportError::WriteError(e.to_string()))
    }

    /// Generate robots.txt, and a sitemap when the site URL is known.
    ///
    /// Sitemap locations must be absolute, so without `site_url` only
    /// robots.txt is written.
    fn generate_sitemap(&self, pages: &[ExportedPage]) -> Result<(), ExportError> {
        let mut robots = "User-agent: *\nAllow: /\n".to_string();

        if let Some(site_url) = &self.config.site_url {
            let origin = site_url.trim_end_matches('/');

            let urls: Vec<String> = pages
                .iter()
                .map(|page| {
                    format!(
                        "  <url>\n    <loc>{}</loc>\n  </url>",
                        escape(&absolute_url(origin, &self.render_options.href(&page.path)))
                    )
                })
                .collect();

            let sitemap = format!(
                r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
{}
</urlset>"#,
                urls.join("\n")
            );

            fs::write(self.config.output_dir.join("sitemap.xml"), sitemap)
                .map_err(|e| ExportError::WriteError(e.to_string()))?;

            let sitemap_url = format!("{}sitemap.xml", self.config.base_url);
            robots.push_str(&format!("Sitemap: {}\n", absolute_url(origin, &sitemap_url)));
        } else {
            tracing::debug!("No site URL configured, skipping sitemap");
        }

        fs::write(self.config.output_dir.join("robots.txt"), robots)
            .map_err(|e| ExportError::WriteError(e.to_string()))?;

        Ok(())
    }
}

/// Prefix a site-relative URL with the origin; absolute URLs pass through.
fn absolute_url(origin: &str, url: &str) -> String {
    if url.contains("://") {
        url.to_string()
    } else {
        format!("{origin}{url}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use facade_compose::{
        container, grid, heading, image, password_input, text, Breakpoint, InvalidNodeError,
    };
    use pretty_assertions::assert_eq;
    use tempfile::{tempdir, TempDir};
    use walkdir::WalkDir;

    struct Fixture {
        _temp: TempDir,
        assets: PathBuf,
        out: PathBuf,
    }

    fn fixture() -> Fixture {
        let temp = tempdir().unwrap();
        let assets = temp.path().join("public");
        let out = temp.path().join("out");

        fs::create_dir_all(assets.join("images")).unwrap();
        fs::write(assets.join("images/hero.svg"), "<svg/>").unwrap();
        fs::write(assets.join("images/card.svg"), "<svg></svg>").unwrap();

        Fixture {
            _temp: temp,
            assets,
            out,
        }
    }

    fn exporter(fx: &Fixture, trailing_slash: bool) -> Exporter {
        Exporter::new(ExportConfig {
            output_dir: fx.out.clone(),
            assets_dir: fx.assets.clone(),
            trailing_slash,
            ..Default::default()
        })
    }

    fn site() -> RouteTable {
        let mut routes = RouteTable::new();
        routes
            .register(
                "/",
                Page::new("Home", || {
                    container()
                        .child(heading(1, "Welcome"))
                        .child(image("/images/hero.svg", "Hero"))
                        .child(text("Create account"))
                        .build()
                }),
            )
            .unwrap();
        routes
            .register(
                "/sign-in-form",
                Page::new("Login", || {
                    container()
                        .child(heading(2, "Login"))
                        .child(password_input("password", "Password"))
                        .child(image("/images/hero.svg", "Hero"))
                        .build()
                }),
            )
            .unwrap();
        routes
    }

    fn snapshot(dir: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
        WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| {
                (
                    e.path().strip_prefix(dir).unwrap().to_path_buf(),
                    fs::read(e.path()).unwrap(),
                )
            })
            .collect()
    }

    fn html_files(dir: &Path) -> Vec<PathBuf> {
        snapshot(dir)
            .into_keys()
            .filter(|p| p.extension().is_some_and(|e| e == "html"))
            .collect()
    }

    #[test]
    fn writes_one_index_per_route() {
        let fx = fixture();

        let result = exporter(&fx, true).export(&site()).unwrap();

        assert!(result.is_success());
        assert_eq!(
            html_files(&fx.out),
            vec![
                PathBuf::from("index.html"),
                PathBuf::from("sign-in-form/index.html")
            ]
        );

        let home = fs::read_to_string(fx.out.join("index.html")).unwrap();
        let login = fs::read_to_string(fx.out.join("sign-in-form/index.html")).unwrap();
        assert!(home.starts_with("<!DOCTYPE html>"));
        assert!(home.contains("Create account"));
        assert!(login.contains("<label for=\"password\">Password</label>"));
        assert!(login.contains("<title>Login | Facade</title>"));
    }

    #[test]
    fn flat_mode_writes_html_files() {
        let fx = fixture();

        exporter(&fx, false).export(&site()).unwrap();

        assert_eq!(
            html_files(&fx.out),
            vec![
                PathBuf::from("index.html"),
                PathBuf::from("sign-in-form.html")
            ]
        );
    }

    #[test]
    fn export_is_idempotent() {
        let fx = fixture();
        let exporter = exporter(&fx, true);
        let routes = site();

        exporter.export(&routes).unwrap();
        let first = snapshot(&fx.out);
        exporter.export(&routes).unwrap();
        let second = snapshot(&fx.out);

        assert_eq!(first, second);
    }

    #[test]
    fn copies_shared_assets_once() {
        let fx = fixture();

        let result = exporter(&fx, true).export(&site()).unwrap();

        assert_eq!(result.assets, 1);
        assert_eq!(
            fs::read_to_string(fx.out.join("assets/images/hero.svg")).unwrap(),
            "<svg/>"
        );
        assert!(!fx.out.join("assets/images/card.svg").exists());
        assert!(fx.out.join("assets/main.css").exists());

        let home = fs::read_to_string(fx.out.join("index.html")).unwrap();
        assert!(home.contains("src=\"/assets/images/hero.svg\""));
    }

    #[test]
    fn missing_asset_fails_only_that_page() {
        let fx = fixture();
        let mut routes = site();
        routes
            .register(
                "/gallery",
                Page::new("Gallery", || image("/missing.jpg", "Missing")),
            )
            .unwrap();

        let result = exporter(&fx, true).export(&routes).unwrap();

        assert!(!result.is_success());
        assert_eq!(result.succeeded.len(), 2);
        assert_eq!(result.failed.len(), 1);
        assert_eq!(result.failed[0].path, "/gallery");
        assert!(matches!(
            &result.failed[0].error,
            PageError::AssetNotFound(src) if src == "/missing.jpg"
        ));
        assert!(fx.out.join("sign-in-form/index.html").exists());
        assert!(!fx.out.join("gallery/index.html").exists());
    }

    #[test]
    fn invalid_tree_fails_only_that_page() {
        let fx = fixture();
        let mut routes = site();
        routes
            .register(
                "/broken",
                Page::new("Broken", || {
                    grid([(Breakpoint::Xs, 1)])
                        .child(image("/images/card.svg", ""))
                        .build()
                }),
            )
            .unwrap();

        let result = exporter(&fx, true).export(&routes).unwrap();

        assert_eq!(result.succeeded.len(), 2);
        match &result.failed[0].error {
            PageError::InvalidNode(err) => assert_eq!(
                err.root_cause(),
                &InvalidNodeError::MissingAlt("/images/card.svg".to_string())
            ),
            other => panic!("unexpected error: {other}"),
        }
        assert!(!fx.out.join("assets/images/card.svg").exists());
    }

    #[test]
    fn colliding_routes_abort_before_writing() {
        let fx = fixture();
        let mut routes = site();
        routes
            .register("/sign-in-form/", Page::new("Again", || text("x")))
            .unwrap();

        let err = exporter(&fx, true).export(&routes).unwrap_err();

        match err {
            ExportError::DuplicateOutputPath {
                output,
                first,
                second,
            } => {
                assert_eq!(output, PathBuf::from("sign-in-form/index.html"));
                assert_eq!(first, "/sign-in-form");
                assert_eq!(second, "/sign-in-form/");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!fx.out.exists());
    }

    #[test]
    fn flat_mode_detects_index_collision() {
        let fx = fixture();
        let mut routes = site();
        routes
            .register("/index", Page::new("Index", || text("x")))
            .unwrap();

        assert!(exporter(&fx, true).plan(&routes).is_ok());
        assert!(matches!(
            exporter(&fx, false).plan(&routes),
            Err(ExportError::DuplicateOutputPath { .. })
        ));
    }

    #[test]
    fn requires_root_route() {
        let fx = fixture();
        let mut routes = RouteTable::new();
        routes
            .register("/about", Page::new("About", || text("x")))
            .unwrap();

        let err = exporter(&fx, true).export(&routes).unwrap_err();

        assert!(matches!(err, ExportError::Route(RouteError::MissingRoot)));
    }

    fn reserved_route(path: &str) -> RouteTable {
        let mut routes = site();
        routes
            .register(path, Page::new("Reserved", || text("x")))
            .unwrap();
        routes
    }

    fn reserved_output(result: Result<ExportResult, ExportError>) -> PathBuf {
        match result {
            Err(ExportError::DuplicateOutputPath { output, .. }) => output,
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("export should have been rejected"),
        }
    }

    #[test]
    fn routes_cannot_shadow_generated_files() {
        for (path, reserved) in [
            ("/sitemap.xml", "sitemap.xml"),
            ("/robots.txt", "robots.txt"),
            ("/assets", "assets"),
            ("/assets/main.css", "assets"),
        ] {
            let fx = fixture();
            let result = exporter(&fx, true).export(&reserved_route(path));
            assert_eq!(reserved_output(result), PathBuf::from(reserved), "{path}");
            assert!(!fx.out.exists(), "{path}");
        }
    }

    #[test]
    fn flat_routes_cannot_shadow_generated_files() {
        for (path, reserved) in [("/assets/main", "assets"), ("/assets/images/hero", "assets")] {
            let fx = fixture();
            let result = exporter(&fx, false).export(&reserved_route(path));
            assert_eq!(reserved_output(result), PathBuf::from(reserved), "{path}");
            assert!(!fx.out.exists(), "{path}");
        }

        // Flat files gain an extension, so these names stay free.
        let fx = fixture();
        for path in ["/sitemap.xml", "/robots.txt", "/assets"] {
            assert!(exporter(&fx, false).plan(&reserved_route(path)).is_ok(), "{path}");
        }
    }

    #[test]
    fn asset_cannot_replace_stylesheet() {
        let fx = fixture();
        fs::write(fx.assets.join("main.css"), "body { color: red; }").unwrap();
        let mut routes = site();
        routes
            .register(
                "/styles",
                Page::new("Styles", || image("/main.css", "Stylesheet")),
            )
            .unwrap();

        let result = exporter(&fx, true).export(&routes).unwrap();

        assert_eq!(result.failed.len(), 1);
        assert!(matches!(
            &result.failed[0].error,
            PageError::ReservedAsset(src) if src == "/main.css"
        ));
        let css = fs::read_to_string(fx.out.join("assets/main.css")).unwrap();
        assert!(css.contains(".grid"));
        assert!(!css.contains("red"));
    }

    #[test]
    fn writes_sitemap_for_exported_pages() {
        let fx = fixture();
        let exporter = Exporter::new(ExportConfig {
            output_dir: fx.out.clone(),
            assets_dir: fx.assets.clone(),
            site_url: Some("https://example.com/".to_string()),
            ..Default::default()
        });

        exporter.export(&site()).unwrap();

        let sitemap = fs::read_to_string(fx.out.join("sitemap.xml")).unwrap();
        assert!(sitemap.contains("<loc>https://example.com/</loc>"));
        assert!(sitemap.contains("<loc>https://example.com/sign-in-form/</loc>"));
        let robots = fs::read_to_string(fx.out.join("robots.txt")).unwrap();
        assert!(robots.contains("Sitemap: https://example.com/sitemap.xml"));
    }

    #[test]
    fn sitemap_requires_site_url() {
        let fx = fixture();

        exporter(&fx, true).export(&site()).unwrap();

        assert!(!fx.out.join("sitemap.xml").exists());
        let robots = fs::read_to_string(fx.out.join("robots.txt")).unwrap();
        assert!(!robots.contains("Sitemap:"));
    }

    #[test]
    fn sitemap_locations_are_escaped() {
        let fx = fixture();
        let exporter = Exporter::new(ExportConfig {
            output_dir: fx.out.clone(),
            assets_dir: fx.assets.clone(),
            base_url: "/a&b/".to_string(),
            site_url: Some("https://example.com".to_string()),
            ..Default::default()
        });

        exporter.export(&site()).unwrap();

        let sitemap = fs::read_to_string(fx.out.join("sitemap.xml")).unwrap();
        assert!(sitemap.contains("<loc>https://example.com/a&amp;b/sign-in-form/</loc>"));
        assert!(!sitemap.contains("a&b"));
    }

    #[test]
    fn clean_removes_stale_files() {
        let fx = fixture();
        fs::create_dir_all(&fx.out).unwrap();
        fs::write(fx.out.join("stale.html"), "old").unwrap();

        let exporter = Exporter::new(ExportConfig {
            output_dir: fx.out.clone(),
            assets_dir: fx.assets.clone(),
            clean: true,
            ..Default::default()
        });
        exporter.export(&site()).unwrap();

        assert!(!fx.out.join("stale.html").exists());
        assert!(fx.out.join("index.html").exists());
    }
}
