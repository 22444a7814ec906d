//! Page node tree and its constructors.
//!
//! Every constructor validates its input and returns a [`NodeResult`].
//! Builders accept child results directly, so a failure deep in a page
//! surfaces as a single [`InvalidNodeError::ChildFailed`] chain at the root.

use std::collections::BTreeMap;
use std::fmt;

/// Largest padding step on the spacing scale.
pub const MAX_PADDING_STEP: u8 = 8;

/// Result of constructing a node.
pub type NodeResult = Result<PageNode, InvalidNodeError>;

/// One renderable element of a page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageNode {
    /// Layout box with ordered children
    Container {
        layout: BoxLayout,
        children: Vec<PageNode>,
    },
    /// Section heading
    Heading { level: u8, text: String },
    /// Paragraph of text
    Text { text: String },
    /// Image referenced by path
    Image { src: String, alt: Alt },
    /// Form control, rendered without behaviour
    Control {
        kind: ControlKind,
        id: String,
        label: String,
        block: bool,
    },
    /// Anchor
    Link {
        href: String,
        label: String,
        variant: LinkVariant,
    },
    /// Responsive column layout
    Grid {
        cols: Columns,
        children: Vec<PageNode>,
    },
}

impl PageNode {
    /// Local asset paths referenced by images, in document order.
    ///
    /// Remote sources are skipped. Duplicates are kept.
    pub fn assets(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_assets(&mut out);
        out
    }

    fn collect_assets<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            PageNode::Image { src, .. } if is_local_asset(src) => out.push(src),
            PageNode::Container { children, .. } | PageNode::Grid { children, .. } => {
                for child in children {
                    child.collect_assets(out);
                }
            }
            _ => {}
        }
    }

    /// Children of a container or grid; empty for leaf nodes.
    pub fn children(&self) -> &[PageNode] {
        match self {
            PageNode::Container { children, .. } | PageNode::Grid { children, .. } => children,
            _ => &[],
        }
    }
}

/// Whether an image source refers to a file in the site's asset directory.
pub fn is_local_asset(src: &str) -> bool {
    !(src.starts_with("http://")
        || src.starts_with("https://")
        || src.starts_with("//")
        || src.starts_with("data:"))
}

/// Image alternative text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alt {
    /// Descriptive text
    Text(String),
    /// Purely decorative, hidden from assistive technology
    Decorative,
}

/// Kind of form control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    TextInput,
    PasswordInput,
    Button,
}

/// Visual treatment of a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkVariant {
    #[default]
    Plain,
    /// Styled like a primary button
    Button,
}

/// Border style of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Border {
    #[default]
    None,
    Standard,
}

/// Corner radius of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Radius {
    #[default]
    None,
    Standard,
}

/// Background tone of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Body,
    Shade,
    Inverse,
}

/// Layout attributes of a container.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoxLayout {
    /// Padding as a step on the theme spacing scale
    pub padding: Option<u8>,
    pub border: Border,
    pub radius: Radius,
    /// CSS length, e.g. `300px`
    pub max_width: Option<String>,
    pub tone: Tone,
}

/// Responsive breakpoint names, smallest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Breakpoint {
    Xs,
    Sm,
    Md,
    Lg,
    Xl,
}

impl Breakpoint {
    pub const ALL: [Breakpoint; 5] = [
        Breakpoint::Xs,
        Breakpoint::Sm,
        Breakpoint::Md,
        Breakpoint::Lg,
        Breakpoint::Xl,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Breakpoint::Xs => "xs",
            Breakpoint::Sm => "sm",
            Breakpoint::Md => "md",
            Breakpoint::Lg => "lg",
            Breakpoint::Xl => "xl",
        }
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Column count per breakpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Columns(BTreeMap<Breakpoint, u8>);

impl Columns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the column count from `breakpoint` upwards.
    pub fn with(mut self, breakpoint: Breakpoint, count: u8) -> Self {
        self.0.insert(breakpoint, count);
        self
    }

    /// Declared breakpoints and counts, smallest breakpoint first.
    pub fn iter(&self) -> impl Iterator<Item = (Breakpoint, u8)> + '_ {
        self.0.iter().map(|(bp, n)| (*bp, *n))
    }

    /// Effective column count at a breakpoint.
    ///
    /// Uses the nearest declared breakpoint at or below `breakpoint`, or a
    /// single column when none is declared.
    pub fn at(&self, breakpoint: Breakpoint) -> u8 {
        self.0
            .range(..=breakpoint)
            .next_back()
            .map(|(_, n)| *n)
            .unwrap_or(1)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<const N: usize> From<[(Breakpoint, u8); N]> for Columns {
    fn from(entries: [(Breakpoint, u8); N]) -> Self {
        Self(entries.into_iter().collect())
    }
}

/// Errors raised while composing a page tree.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidNodeError {
    #[error("Heading level must be 1-6, got {0}")]
    HeadingLevel(u8),

    #[error("Image has an empty source")]
    EmptyImageSource,

    #[error("Image {0} needs alt text or must be marked decorative")]
    MissingAlt(String),

    #[error("Padding step {0} exceeds the largest step {max}", max = MAX_PADDING_STEP)]
    PaddingStep(u8),

    #[error("Grid declares no breakpoints")]
    EmptyColumns,

    #[error("Grid declares zero columns at {0}")]
    ZeroColumns(Breakpoint),

    #[error("Control {0} is missing its {1}")]
    IncompleteControl(&'static str, &'static str),

    #[error("Link {0:?} has an empty href")]
    EmptyHref(String),

    #[error("Child {index} failed to construct: {source}")]
    ChildFailed {
        index: usize,
        #[source]
        source: Box<InvalidNodeError>,
    },
}

impl InvalidNodeError {
    /// The innermost error of a `ChildFailed` chain.
    pub fn root_cause(&self) -> &InvalidNodeError {
        match self {
            InvalidNodeError::ChildFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Heading of the given level.
pub fn heading(level: u8, text: impl Into<String>) -> NodeResult {
    if !(1..=6).contains(&level) {
        return Err(InvalidNodeError::HeadingLevel(level));
    }
    Ok(PageNode::Heading {
        level,
        text: text.into(),
    })
}

/// Paragraph of text.
pub fn text(text: impl Into<String>) -> NodeResult {
    Ok(PageNode::Text { text: text.into() })
}

/// Image with descriptive alt text.
pub fn image(src: impl Into<String>, alt: impl Into<String>) -> NodeResult {
    let src = src.into();
    let alt = alt.into();
    if src.is_empty() {
        return Err(InvalidNodeError::EmptyImageSource);
    }
    if alt.trim().is_empty() {
        return Err(InvalidNodeError::MissingAlt(src));
    }
    Ok(PageNode::Image {
        src,
        alt: Alt::Text(alt),
    })
}

/// Image that carries no information.
pub fn decorative_image(src: impl Into<String>) -> NodeResult {
    let src = src.into();
    if src.is_empty() {
        return Err(InvalidNodeError::EmptyImageSource);
    }
    Ok(PageNode::Image {
        src,
        alt: Alt::Decorative,
    })
}

fn control(kind: ControlKind, id: String, label: String) -> NodeResult {
    let name = match kind {
        ControlKind::TextInput => "text-input",
        ControlKind::PasswordInput => "password-input",
        ControlKind::Button => "button",
    };
    if label.trim().is_empty() {
        return Err(InvalidNodeError::IncompleteControl(name, "label"));
    }
    if id.trim().is_empty() {
        return Err(InvalidNodeError::IncompleteControl(name, "id"));
    }
    Ok(PageNode::Control {
        kind,
        id,
        label,
        block: false,
    })
}

/// Labelled text field.
pub fn text_input(id: impl Into<String>, label: impl Into<String>) -> NodeResult {
    control(ControlKind::TextInput, id.into(), label.into())
}

/// Labelled password field.
pub fn password_input(id: impl Into<String>, label: impl Into<String>) -> NodeResult {
    control(ControlKind::PasswordInput, id.into(), label.into())
}

/// Labelled button.
pub fn button(id: impl Into<String>, label: impl Into<String>) -> NodeResult {
    control(ControlKind::Button, id.into(), label.into())
}

/// Stretch a button to the full width of its container.
///
/// Other nodes pass through unchanged.
pub fn block(node: NodeResult) -> NodeResult {
    node.map(|node| match node {
        PageNode::Control {
            kind: ControlKind::Button,
            id,
            label,
            ..
        } => PageNode::Control {
            kind: ControlKind::Button,
            id,
            label,
            block: true,
        },
        other => other,
    })
}

/// Plain link.
pub fn link(href: impl Into<String>, label: impl Into<String>) -> NodeResult {
    make_link(href.into(), label.into(), LinkVariant::Plain)
}

/// Link styled as a call-to-action button.
pub fn button_link(href: impl Into<String>, label: impl Into<String>) -> NodeResult {
    make_link(href.into(), label.into(), LinkVariant::Button)
}

fn make_link(href: String, label: String, variant: LinkVariant) -> NodeResult {
    if href.trim().is_empty() {
        return Err(InvalidNodeError::EmptyHref(label));
    }
    Ok(PageNode::Link {
        href,
        label,
        variant,
    })
}

/// Start a container.
pub fn container() -> ContainerBuilder {
    ContainerBuilder::default()
}

/// Start a grid with the given columns.
pub fn grid(cols: impl Into<Columns>) -> GridBuilder {
    GridBuilder {
        cols: cols.into(),
        children: Vec::new(),
    }
}

/// Builder for [`PageNode::Container`].
#[derive(Debug, Default)]
pub struct ContainerBuilder {
    layout: BoxLayout,
    children: Vec<NodeResult>,
}

impl ContainerBuilder {
    pub fn padding(mut self, step: u8) -> Self {
        self.layout.padding = Some(step);
        self
    }

    pub fn border(mut self, border: Border) -> Self {
        self.layout.border = border;
        self
    }

    pub fn radius(mut self, radius: Radius) -> Self {
        self.layout.radius = radius;
        self
    }

    pub fn max_width(mut self, width: impl Into<String>) -> Self {
        self.layout.max_width = Some(width.into());
        self
    }

    pub fn tone(mut self, tone: Tone) -> Self {
        self.layout.tone = tone;
        self
    }

    pub fn child(mut self, child: NodeResult) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = NodeResult>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn build(self) -> NodeResult {
        if let Some(step) = self.layout.padding.filter(|s| *s > MAX_PADDING_STEP) {
            return Err(InvalidNodeError::PaddingStep(step));
        }
        Ok(PageNode::Container {
            layout: self.layout,
            children: collect_children(self.children)?,
        })
    }
}

/// Builder for [`PageNode::Grid`].
#[derive(Debug)]
pub struct GridBuilder {
    cols: Columns,
    children: Vec<NodeResult>,
}

impl GridBuilder {
    pub fn child(mut self, child: NodeResult) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = NodeResult>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn build(self) -> NodeResult {
        if self.cols.is_empty() {
            return Err(InvalidNodeError::EmptyColumns);
        }
        if let Some((bp, _)) = self.cols.iter().find(|(_, n)| *n == 0) {
            return Err(InvalidNodeError::ZeroColumns(bp));
        }
        Ok(PageNode::Grid {
            cols: self.cols,
            children: collect_children(self.children)?,
        })
    }
}

fn collect_children(children: Vec<NodeResult>) -> Result<Vec<PageNode>, InvalidNodeError> {
    children
        .into_iter()
        .enumerate()
        .map(|(index, child)| {
            child.map_err(|e| InvalidNodeError::ChildFailed {
                index,
                source: Box::new(e),
            })
        })
        .collect()
}
