//! Syntax tree for scene scripts

use crate::geometry::Orientation;
use crate::layout::{Edge, OffsetDirection};

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// AST node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// Valid identifier (alphanumeric + underscore, starts with letter/_)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(pub String);

impl Identifier {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A parsed script
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    pub statements: Vec<Spanned<Statement>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `widget name [in parent] [at x y] [size w h]`
    Widget(WidgetDecl),
    /// `line name = widget.horizontal(percent) [toward lower|higher]`
    Line(CustomLineDecl),
    /// `anchor widget.edge to target [margin n]`
    Anchor(AnchorDecl),
    /// `margin widget.edge n`
    Margin {
        line: Spanned<LineRef>,
        value: Spanned<f64>,
    },
    /// `fill widget with other|none`
    Fill {
        widget: Spanned<Identifier>,
        target: Option<Spanned<Identifier>>,
    },
    /// `center widget in other|none`
    CenterIn {
        widget: Spanned<Identifier>,
        target: Option<Spanned<Identifier>>,
    },
    /// `margins widget n`
    Margins {
        widget: Spanned<Identifier>,
        value: Spanned<f64>,
    },
    /// `resize widget w h`
    Resize {
        widget: Spanned<Identifier>,
        width: Spanned<f64>,
        height: Spanned<f64>,
    },
    /// `move widget x y`
    Move {
        widget: Spanned<Identifier>,
        x: Spanned<f64>,
        y: Spanned<f64>,
    },
    /// `remove line_name`
    Remove(Spanned<Identifier>),
    /// `destroy widget`
    Destroy(Spanned<Identifier>),
    /// `settle`
    Settle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WidgetDecl {
    pub name: Spanned<Identifier>,
    pub parent: Option<Spanned<Identifier>>,
    pub position: Option<(Spanned<f64>, Spanned<f64>)>,
    pub size: Option<(Spanned<f64>, Spanned<f64>)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomLineDecl {
    pub name: Spanned<Identifier>,
    pub widget: Spanned<Identifier>,
    pub orientation: Orientation,
    pub percent: Spanned<f64>,
    pub direction: OffsetDirection,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnchorDecl {
    pub line: Spanned<LineRef>,
    /// `None` for `to none`
    pub target: Option<Spanned<LineRef>>,
    pub margin: Option<Spanned<f64>>,
}

/// A line named in a script
#[derive(Debug, Clone, PartialEq)]
pub enum LineRef {
    /// `widget.edge`
    Edge {
        widget: Spanned<Identifier>,
        edge: Edge,
    },
    /// A custom line declared with `line`
    Custom(Spanned<Identifier>),
}

impl std::fmt::Display for LineRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LineRef::Edge { widget, edge } => write!(f, "{}.{}", widget.node, edge),
            LineRef::Custom(name) => write!(f, "{}", name.node),
        }
    }
}
