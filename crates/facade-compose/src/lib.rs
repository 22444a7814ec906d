//! Page composition for facade sites.
//!
//! Pages are trees of [`PageNode`]s built through validating constructors
//! and rendered to HTML fragments without touching the filesystem.

pub mod node;
pub mod render;
pub mod theme;

pub use node::{
    block, button, button_link, container, decorative_image, grid, heading, image,
    is_local_asset, link, password_input, text, text_input, Alt, Border, BoxLayout,
    Breakpoint, Columns, ContainerBuilder, ControlKind, GridBuilder, InvalidNodeError,
    LinkVariant, NodeResult, MAX_PADDING_STEP, PageNode, Radius, Tone,
};
pub use render::{escape, render, RenderOptions};
pub use theme::{Breakpoints, Theme};
