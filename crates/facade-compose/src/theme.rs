//! Design tokens shared by rendering and the stylesheet.

use serde::Deserialize;

use crate::node::Breakpoint;

/// Design-system theme.
///
/// Passed explicitly to everything that needs styling decisions.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Body font stack
    pub font_family: String,
    /// Body text colour
    pub foreground: String,
    /// Page background
    pub background: String,
    /// Background of shaded containers
    pub shade: String,
    /// Primary action colour
    pub primary: String,
    /// Text colour on primary backgrounds
    pub primary_foreground: String,
    /// Border colour
    pub border: String,
    /// Standard corner radius
    pub radius: String,
    /// Size of one spacing step in rem
    pub spacing_unit_rem: f32,
    /// Minimum viewport width in px for each breakpoint above `xs`
    pub breakpoints: Breakpoints,
}

/// Minimum widths of the responsive breakpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Breakpoints {
    pub sm: u32,
    pub md: u32,
    pub lg: u32,
    pub xl: u32,
}

impl Breakpoints {
    /// Minimum width of a breakpoint; `xs` starts at zero.
    pub fn min_width(&self, breakpoint: Breakpoint) -> u32 {
        match breakpoint {
            Breakpoint::Xs => 0,
            Breakpoint::Sm => self.sm,
            Breakpoint::Md => self.md,
            Breakpoint::Lg => self.lg,
            Breakpoint::Xl => self.xl,
        }
    }
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self {
            sm: 576,
            md: 768,
            lg: 992,
            xl: 1200,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            font_family: "\"Public Sans\", system-ui, -apple-system, sans-serif".to_string(),
            foreground: "#313131".to_string(),
            background: "#ffffff".to_string(),
            shade: "#f5f5f5".to_string(),
            primary: "#00698f".to_string(),
            primary_foreground: "#ffffff".to_string(),
            border: "#bbbbbb".to_string(),
            radius: "0.25rem".to_string(),
            spacing_unit_rem: 0.5,
            breakpoints: Breakpoints::default(),
        }
    }
}

impl Theme {
    /// CSS length of a spacing step.
    pub fn space(&self, step: u8) -> String {
        format!("{}rem", self.spacing_unit_rem * f32::from(step))
    }
}
