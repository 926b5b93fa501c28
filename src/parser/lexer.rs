//! Lexer for scene scripts using logos

use logos::Logos;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
pub enum Token {
    // Statement keywords
    #[token("widget")]
    Widget,
    #[token("line")]
    Line,
    #[token("anchor")]
    Anchor,
    #[token("margin")]
    Margin,
    #[token("margins")]
    Margins,
    #[token("fill")]
    Fill,
    #[token("center")]
    Center,
    #[token("resize")]
    Resize,
    #[token("move")]
    Move,
    #[token("remove")]
    Remove,
    #[token("destroy")]
    Destroy,
    #[token("settle")]
    Settle,

    // Connectives
    #[token("in")]
    In,
    #[token("at")]
    At,
    #[token("size")]
    Size,
    #[token("to")]
    To,
    #[token("with")]
    With,
    #[token("none")]
    None,
    #[token("toward")]
    Toward,
    #[token("lower")]
    Lower,
    #[token("higher")]
    Higher,

    // Custom line orientations
    #[token("horizontal")]
    Horizontal,
    #[token("vertical")]
    Vertical,

    // Edge keywords
    #[token("left")]
    Left,
    #[token("right")]
    Right,
    #[token("top")]
    Top,
    #[token("bottom")]
    Bottom,
    #[token("horizontal_center")]
    HorizontalCenter,
    #[token("vertical_center")]
    VerticalCenter,

    // Punctuation
    #[token("-")]
    Minus,
    #[token("(")]
    ParenOpen,
    #[token(")")]
    ParenClose,
    #[token(".")]
    Dot,
    #[token("=")]
    Equals,

    // Literals - identifiers must come after keywords
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string(), priority = 1)]
    Ident(String),

    #[regex(r"[0-9]+(\.[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),

    // Comments (skip)
    #[regex(r"//[^\n]*", logos::skip)]
    LineComment,

    #[regex(r"/\*([^*]|\*[^/])*\*/", logos::skip)]
    BlockComment,
}

/// Lex input string into tokens with spans.
///
/// Unrecognised input becomes a [`LexError`] item so the parser can report it.
pub fn lex(input: &str) -> impl Iterator<Item = Result<(Token, Span), LexError>> + '_ {
    Token::lexer(input).spanned().map(|(tok, span)| match tok {
        Ok(t) => Ok((t, span)),
        Err(()) => Err(LexError { span }),
    })
}

/// Input the lexer could not turn into a token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub span: Span,
}

impl Token {
    /// Human-readable form for error messages
    pub fn describe(&self) -> String {
        match self {
            Token::Ident(s) => format!("identifier '{}'", s),
            Token::Number(n) => format!("number {}", n),
            Token::Minus => "'-'".to_string(),
            Token::ParenOpen => "'('".to_string(),
            Token::ParenClose => "')'".to_string(),
            Token::Dot => "'.'".to_string(),
            Token::Equals => "'='".to_string(),
            Token::LineComment | Token::BlockComment => "comment".to_string(),
            keyword => format!("keyword '{}'", keyword.keyword().unwrap_or("?")),
        }
    }

    /// Source text of keyword tokens
    pub fn keyword(&self) -> Option<&'static str> {
        Some(match self {
            Token::Widget => "widget",
            Token::Line => "line",
            Token::Anchor => "anchor",
            Token::Margin => "margin",
            Token::Margins => "margins",
            Token::Fill => "fill",
            Token::Center => "center",
            Token::Resize => "resize",
            Token::Move => "move",
            Token::Remove => "remove",
            Token::Destroy => "destroy",
            Token::Settle => "settle",
            Token::In => "in",
            Token::At => "at",
            Token::Size => "size",
            Token::To => "to",
            Token::With => "with",
            Token::None => "none",
            Token::Toward => "toward",
            Token::Lower => "lower",
            Token::Higher => "higher",
            Token::Horizontal => "horizontal",
            Token::Vertical => "vertical",
            Token::Left => "left",
            Token::Right => "right",
            Token::Top => "top",
            Token::Bottom => "bottom",
            Token::HorizontalCenter => "horizontal_center",
            Token::VerticalCenter => "vertical_center",
            _ => return None,
        })
    }
}
