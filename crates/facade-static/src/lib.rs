//! Static site exporter for facade sites.
//!
//! Maps URL paths to pages and writes every page as a standalone HTML
//! document, together with the stylesheet and referenced assets.

pub mod assets;
pub mod exporter;
pub mod page;
pub mod routes;
pub mod templates;

pub use exporter::{
    ExportConfig, ExportError, ExportResult, ExportedPage, Exporter, FailedPage, PageError,
    PlannedPage,
};
pub use page::{Layout, Page};
pub use routes::{Route, RouteError, RouteTable};
