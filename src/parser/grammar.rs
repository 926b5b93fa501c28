//! Parser implementation using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::geometry::Orientation;
use crate::layout::{Edge, OffsetDirection};
use crate::parser::ast::*;
use crate::parser::lexer::{lex, Token};
use crate::ParseError;

/// Parse a scene script into an AST
pub fn parse(input: &str) -> Result<Script, Vec<ParseError>> {
    let len = input.len();

    let mut tokens: Vec<(Token, SimpleSpan)> = Vec::new();
    let mut errors = Vec::new();
    for item in lex(input) {
        match item {
            Ok((tok, span)) => tokens.push((tok, span.into())),
            Err(err) => {
                let text = input[err.span.clone()].to_string();
                errors.push(ParseError::invalid_input(err.span, text));
            }
        }
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    // Turn the token list into a stream that chumsky can use
    let token_stream = Stream::from_iter(tokens)
        // Split (Token, SimpleSpan) into token and span parts
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    script_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| errs.into_iter().map(ParseError::from).collect())
}

/// Helper to extract span range from chumsky's MapExtra
fn span_range(e: &impl chumsky::span::Span<Offset = usize>) -> std::ops::Range<usize> {
    e.start()..e.end()
}

fn script_parser<'a, I>() -> impl Parser<'a, I, Script, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let identifier = select! {
        Token::Ident(s) => Identifier::new(s),
    }
    .map_with(|id, e| Spanned::new(id, span_range(&e.span())));

    // Numbers, including negative via Minus token
    let number = just(Token::Minus)
        .or_not()
        .then(select! { Token::Number(n) => n })
        .map_with(|(neg, n), e| {
            let value = if neg.is_some() { -n } else { n };
            Spanned::new(value, span_range(&e.span()))
        });

    let pair = number.clone().then(number.clone());

    let edge = select! {
        Token::Left => Edge::Left,
        Token::Top => Edge::Top,
        Token::Right => Edge::Right,
        Token::Bottom => Edge::Bottom,
        Token::HorizontalCenter => Edge::HorizontalCenter,
        Token::VerticalCenter => Edge::VerticalCenter,
    };

    // `widget.edge` or a bare custom line name
    let line_ref = identifier
        .clone()
        .then(just(Token::Dot).ignore_then(edge).or_not())
        .map_with(|(widget, edge), e| {
            let line = match edge {
                Some(edge) => LineRef::Edge { widget, edge },
                None => LineRef::Custom(widget),
            };
            Spanned::new(line, span_range(&e.span()))
        });

    let widget_target = choice((
        just(Token::None).map(|_| None),
        identifier.clone().map(Some),
    ));

    let line_target = choice((
        just(Token::None).map(|_| None),
        line_ref.clone().map(Some),
    ));

    let widget_decl = just(Token::Widget)
        .ignore_then(identifier.clone())
        .then(just(Token::In).ignore_then(identifier.clone()).or_not())
        .then(just(Token::At).ignore_then(pair.clone()).or_not())
        .then(just(Token::Size).ignore_then(pair.clone()).or_not())
        .map(|(((name, parent), position), size)| {
            Statement::Widget(WidgetDecl {
                name,
                parent,
                position,
                size,
            })
        });

    let orientation = select! {
        Token::Horizontal => Orientation::Horizontal,
        Token::Vertical => Orientation::Vertical,
    };

    let direction = just(Token::Toward).ignore_then(select! {
        Token::Lower => OffsetDirection::Lower,
        Token::Higher => OffsetDirection::Higher,
    });

    let line_decl = just(Token::Line)
        .ignore_then(identifier.clone())
        .then_ignore(just(Token::Equals))
        .then(identifier.clone())
        .then_ignore(just(Token::Dot))
        .then(orientation)
        .then(
            number
                .clone()
                .delimited_by(just(Token::ParenOpen), just(Token::ParenClose)),
        )
        .then(direction.or_not())
        .map(|((((name, widget), orientation), percent), direction)| {
            Statement::Line(CustomLineDecl {
                name,
                widget,
                orientation,
                percent,
                direction: direction.unwrap_or_default(),
            })
        });

    let anchor_decl = just(Token::Anchor)
        .ignore_then(line_ref.clone())
        .then_ignore(just(Token::To))
        .then(line_target)
        .then(just(Token::Margin).ignore_then(number.clone()).or_not())
        .map(|((line, target), margin)| {
            Statement::Anchor(AnchorDecl {
                line,
                target,
                margin,
            })
        });

    let margin_decl = just(Token::Margin)
        .ignore_then(line_ref.clone())
        .then(number.clone())
        .map(|(line, value)| Statement::Margin { line, value });

    let fill_decl = just(Token::Fill)
        .ignore_then(identifier.clone())
        .then_ignore(just(Token::With))
        .then(widget_target.clone())
        .map(|(widget, target)| Statement::Fill { widget, target });

    let center_decl = just(Token::Center)
        .ignore_then(identifier.clone())
        .then_ignore(just(Token::In))
        .then(widget_target.clone())
        .map(|(widget, target)| Statement::CenterIn { widget, target });

    let margins_decl = just(Token::Margins)
        .ignore_then(identifier.clone())
        .then(number.clone())
        .map(|(widget, value)| Statement::Margins { widget, value });

    let resize_decl = just(Token::Resize)
        .ignore_then(identifier.clone())
        .then(pair.clone())
        .map(|(widget, (width, height))| Statement::Resize {
            widget,
            width,
            height,
        });

    let move_decl = just(Token::Move)
        .ignore_then(identifier.clone())
        .then(pair.clone())
        .map(|(widget, (x, y))| Statement::Move { widget, x, y });

    let remove_decl = just(Token::Remove)
        .ignore_then(identifier.clone())
        .map(Statement::Remove);

    let destroy_decl = just(Token::Destroy)
        .ignore_then(identifier.clone())
        .map(Statement::Destroy);

    let settle_decl = just(Token::Settle).map(|_| Statement::Settle);

    let statement = choice((
        widget_decl,
        line_decl,
        anchor_decl,
        margin_decl,
        fill_decl,
        center_decl,
        margins_decl,
        resize_decl,
        move_decl,
        remove_decl,
        destroy_decl,
        settle_decl,
    ))
    .map_with(|s, e| Spanned::new(s, span_range(&e.span())))
    .boxed();

    statement
        .repeated()
        .collect::<Vec<_>>()
        .then_ignore(end())
        .map(|statements| Script { statements })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn single(input: &str) -> Statement {
        let script = parse(input).expect("Should parse");
        assert_eq!(script.statements.len(), 1);
        script.statements.into_iter().next().unwrap().node
    }

    #[test]
    fn test_parse_widget_full() {
        match single("widget frame in container at 10 -5 size 100 50") {
            Statement::Widget(w) => {
                assert_eq!(w.name.node.as_str(), "frame");
                assert_eq!(w.parent.unwrap().node.as_str(), "container");
                let (x, y) = w.position.unwrap();
                assert_eq!((x.node, y.node), (10.0, -5.0));
                let (width, height) = w.size.unwrap();
                assert_eq!((width.node, height.node), (100.0, 50.0));
            }
            other => panic!("Expected widget, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_widget_minimal() {
        match single("widget root") {
            Statement::Widget(w) => {
                assert!(w.parent.is_none());
                assert!(w.position.is_none());
                assert!(w.size.is_none());
            }
            other => panic!("Expected widget, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_custom_line() {
        match single("line quarter = container.horizontal(-0.25)") {
            Statement::Line(l) => {
                assert_eq!(l.name.node.as_str(), "quarter");
                assert_eq!(l.widget.node.as_str(), "container");
                assert_eq!(l.orientation, Orientation::Horizontal);
                assert_eq!(l.percent.node, -0.25);
                assert_eq!(l.direction, OffsetDirection::Auto);
            }
            other => panic!("Expected line, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_custom_line_direction() {
        match single("line edge = c.vertical(0.5) toward lower") {
            Statement::Line(l) => {
                assert_eq!(l.orientation, Orientation::Vertical);
                assert_eq!(l.direction, OffsetDirection::Lower);
            }
            other => panic!("Expected line, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_anchor_with_margin() {
        match single("anchor frame.right to container.horizontal_center margin -5") {
            Statement::Anchor(a) => {
                assert_eq!(a.line.node.to_string(), "frame.right");
                assert_eq!(
                    a.target.unwrap().node.to_string(),
                    "container.horizontal_center"
                );
                assert_eq!(a.margin.unwrap().node, -5.0);
            }
            other => panic!("Expected anchor, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_anchor_to_custom_and_none() {
        let script = parse("anchor a.bottom to quarter\nanchor a.top to none").unwrap();
        match &script.statements[0].node {
            Statement::Anchor(a) => {
                assert!(matches!(
                    a.target.as_ref().unwrap().node,
                    LineRef::Custom(_)
                ));
                assert!(a.margin.is_none());
            }
            other => panic!("Expected anchor, got {:?}", other),
        }
        match &script.statements[1].node {
            Statement::Anchor(a) => assert!(a.target.is_none()),
            other => panic!("Expected anchor, got {:?}", other),
        }
    }

    #[test]
    fn test_anchor_followed_by_margin_statement() {
        let script = parse("anchor a.left to b.left\nmargin a.left 4").unwrap();
        assert_eq!(script.statements.len(), 2);
        assert!(matches!(script.statements[1].node, Statement::Margin { .. }));
    }

    #[test]
    fn test_parse_fill_and_center() {
        let script = parse("fill a with b\nfill a with none\ncenter a in b\ncenter a in none").unwrap();
        assert_eq!(script.statements.len(), 4);
        match &script.statements[1].node {
            Statement::Fill { target, .. } => assert!(target.is_none()),
            other => panic!("Expected fill, got {:?}", other),
        }
        match &script.statements[2].node {
            Statement::CenterIn { target, .. } => {
                assert_eq!(target.as_ref().unwrap().node.as_str(), "b")
            }
            other => panic!("Expected center, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_geometry_statements() {
        let script = parse("resize c 640 480 move a 1 2 margins a 3 settle").unwrap();
        assert_eq!(script.statements.len(), 4);
        assert!(matches!(script.statements[3].node, Statement::Settle));
    }

    #[test]
    fn test_parse_remove_and_destroy() {
        let script = parse("remove quarter destroy frame").unwrap();
        assert!(matches!(script.statements[0].node, Statement::Remove(_)));
        assert!(matches!(script.statements[1].node, Statement::Destroy(_)));
    }

    #[test]
    fn test_statement_spans() {
        let script = parse("settle\nwidget a").unwrap();
        assert_eq!(script.statements[0].span, 0..6);
        assert_eq!(script.statements[1].span, 7..15);
    }

    #[test]
    fn test_syntax_error() {
        let errors = parse("anchor a.left b.left").unwrap_err();
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_invalid_character() {
        let errors = parse("widget a @").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains('@'));
    }
}
