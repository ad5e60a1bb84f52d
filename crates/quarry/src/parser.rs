//! Grammar for condition and order-by text.
//!
//! ```text
//! condition    := (disjunction | "(" disjunction ")") EOF
//! disjunction  := operand (SP "OR" SP operand)*
//! operand      := conjunction | "(" conjunction ")"
//! conjunction  := simple (SP "AND" SP simple)*
//! simple       := target SP? operator SP? value
//! target       := accessor_call | identifier
//! accessor_call:= identifier SP? "(" SP? ")"
//! value        := "'" ([^'] | "''")* "'" | digits ("." digits)?
//!
//! order_by     := "ORDER" SP "BY" SP entry (SP? "," SP? entry)* EOF
//! entry        := target (SP ("ASC" | "DESC"))?
//! ```
//!
//! `SP` is one or more plain spaces. Keywords are case-insensitive. AND
//! binds tighter than OR. Parentheses are only accepted at the two
//! grouping levels [`Condition::render`] emits, so rendered conditions
//! parse back; they cannot nest or change precedence. Accessor calls are
//! only recognised when the caller enables them.

use winnow::{
    ascii::{digit1, Caseless},
    combinator::{alt, delimited, eof, opt, preceded, repeat, separated, terminated},
    error::ContextError,
    prelude::*,
    token::{literal, none_of, one_of, take_while},
};

use crate::condition::{Comparison, Condition, Literal};
use crate::error::{ClauseKind, ParseError};
use crate::op::Operator;
use crate::ordering::{Dir, IdentifierOrder};
use crate::traits::Lookup;

type Input<'a> = &'a str;
type ParserResult<T> = winnow::Result<T>;

/// Parses condition text into a [`Condition`].
///
/// With `accessor_calls` disabled, `size()>3` is rejected rather than read
/// as a field named `size`.
///
/// ```
/// use quarry::parser::parse_condition;
///
/// let condition = parse_condition("a<2 or b>5 and b<7", false).unwrap();
/// assert_eq!(condition.to_string(), "(a<'2' OR (b>'5' AND b<'7'))");
///
/// assert!(parse_condition("a<2 and", false).is_err());
/// ```
pub fn parse_condition(text: &str, accessor_calls: bool) -> Result<Condition, ParseError> {
    let grammar = Grammar { accessor_calls };
    let result = (|i: &mut Input<'_>| grammar.condition(i)).parse(text);
    match result {
        Ok(condition) => {
            tracing::debug!(condition = text, accessor_calls, "parsed condition");
            Ok(condition)
        }
        Err(err) => {
            tracing::debug!(
                condition = text,
                offset = err.offset(),
                "failed to parse condition"
            );
            Err(ParseError::new(ClauseKind::Condition, text, err.offset()))
        }
    }
}

/// Parses an order-by clause into its keys, in priority order.
///
/// ```
/// use quarry::parser::parse_order_by;
/// use quarry::Dir;
///
/// let keys = parse_order_by("order by color, size() desc", true).unwrap();
/// assert_eq!(keys.len(), 2);
/// assert_eq!(keys[1].identifier, "size");
/// assert_eq!(keys[1].dir, Dir::Desc);
/// ```
pub fn parse_order_by(text: &str, accessor_calls: bool) -> Result<Vec<IdentifierOrder>, ParseError> {
    let grammar = Grammar { accessor_calls };
    let header = (
        literal(Caseless("order")),
        spaces1,
        literal(Caseless("by")),
        spaces1,
    );
    let entries = separated(
        1..,
        |i: &mut Input<'_>| grammar.order_entry(i),
        (spaces0, ',', spaces0),
    );
    let result: Result<Vec<IdentifierOrder>, _> = delimited(header, entries, eof).parse(text);
    match result {
        Ok(keys) => {
            tracing::debug!(order_by = text, accessor_calls, "parsed order-by clause");
            Ok(keys)
        }
        Err(err) => {
            tracing::debug!(
                order_by = text,
                offset = err.offset(),
                "failed to parse order-by clause"
            );
            Err(ParseError::new(ClauseKind::OrderBy, text, err.offset()))
        }
    }
}

/// Parser state: only the accessor-call switch.
#[derive(Debug, Clone, Copy)]
struct Grammar {
    accessor_calls: bool,
}

impl Grammar {
    fn condition(&self, input: &mut Input<'_>) -> ParserResult<Condition> {
        // The bare branch goes last so its failure offset is the one reported
        alt((
            terminated(parenthesized(|i: &mut Input<'_>| self.disjunction(i)), eof),
            terminated(|i: &mut Input<'_>| self.disjunction(i), eof),
        ))
        .parse_next(input)
    }

    fn disjunction(&self, input: &mut Input<'_>) -> ParserResult<Condition> {
        let first = self.operand(input)?;
        let rest: Vec<Condition> = repeat(
            0..,
            preceded(keyword("or"), |i: &mut Input<'_>| self.operand(i)),
        )
        .parse_next(input)?;
        Ok(group(first, rest, Condition::Or))
    }

    fn operand(&self, input: &mut Input<'_>) -> ParserResult<Condition> {
        alt((
            parenthesized(|i: &mut Input<'_>| self.conjunction(i)),
            |i: &mut Input<'_>| self.conjunction(i),
        ))
        .parse_next(input)
    }

    fn conjunction(&self, input: &mut Input<'_>) -> ParserResult<Condition> {
        let first = self.simple(input)?;
        let rest: Vec<Condition> = repeat(
            0..,
            preceded(keyword("and"), |i: &mut Input<'_>| self.simple(i)),
        )
        .parse_next(input)?;
        Ok(group(first, rest, Condition::And))
    }

    fn simple(&self, input: &mut Input<'_>) -> ParserResult<Condition> {
        let (identifier, lookup) = self.target(input)?;
        let operator = preceded(spaces0, operator).parse_next(input)?;
        let literal = preceded(spaces0, alt((quoted, number))).parse_next(input)?;
        Ok(Condition::Simple(Comparison {
            identifier: identifier.to_string(),
            lookup,
            operator,
            literal,
        }))
    }

    fn target<'a>(&self, input: &mut Input<'a>) -> ParserResult<(&'a str, Lookup)> {
        let mut field = identifier.map(|name| (name, Lookup::Field));
        if self.accessor_calls {
            alt((accessor_call.map(|name| (name, Lookup::Accessor)), field)).parse_next(input)
        } else {
            field.parse_next(input)
        }
    }

    fn order_entry(&self, input: &mut Input<'_>) -> ParserResult<IdentifierOrder> {
        let (identifier, lookup) = self.target(input)?;
        let dir = opt(preceded(
            spaces1,
            alt((
                literal(Caseless("asc")).value(Dir::Asc),
                literal(Caseless("desc")).value(Dir::Desc),
            )),
        ))
        .parse_next(input)?;
        Ok(IdentifierOrder {
            identifier: identifier.to_string(),
            lookup,
            dir: dir.unwrap_or_default(),
        })
    }
}

/// Collapses a single operand to itself, otherwise builds the group.
fn group(first: Condition, rest: Vec<Condition>, build: fn(Vec<Condition>) -> Condition) -> Condition {
    if rest.is_empty() {
        return first;
    }
    let mut children = Vec::with_capacity(rest.len() + 1);
    children.push(first);
    children.extend(rest);
    build(children)
}

fn spaces0<'a>(input: &mut Input<'a>) -> ParserResult<&'a str> {
    take_while(0.., ' ').parse_next(input)
}

fn spaces1<'a>(input: &mut Input<'a>) -> ParserResult<&'a str> {
    take_while(1.., ' ').parse_next(input)
}

/// `"(" SP? inner SP? ")"`
fn parenthesized<'a, O>(
    inner: impl Parser<Input<'a>, O, ContextError>,
) -> impl Parser<Input<'a>, O, ContextError> {
    delimited(('(', spaces0), inner, (spaces0, ')'))
}

/// `SP word SP`, case-insensitive.
fn keyword<'a>(word: &'static str) -> impl Parser<Input<'a>, (), ContextError> {
    (spaces1, literal(Caseless(word)), spaces1).void()
}

fn identifier<'a>(input: &mut Input<'a>) -> ParserResult<&'a str> {
    (one_of(is_ident_start), take_while(0.., is_ident_continue))
        .take()
        .parse_next(input)
}

fn accessor_call<'a>(input: &mut Input<'a>) -> ParserResult<&'a str> {
    terminated(identifier, (spaces0, '(', spaces0, ')')).parse_next(input)
}

fn operator(input: &mut Input<'_>) -> ParserResult<Operator> {
    alt((
        literal("<=").value(Operator::Lte),
        literal(">=").value(Operator::Gte),
        literal("=~").value(Operator::Contains),
        literal("!~").value(Operator::NotContains),
        literal("<").value(Operator::Lt),
        literal(">").value(Operator::Gt),
        literal("=").value(Operator::Eq),
    ))
    .parse_next(input)
}

fn quoted(input: &mut Input<'_>) -> ParserResult<Literal> {
    delimited(
        '\'',
        repeat::<_, _, (), _, _>(0.., alt((literal("''").void(), none_of('\'').void()))).take(),
        '\'',
    )
    .map(|raw: &str| Literal::Text(raw.replace("''", "'")))
    .parse_next(input)
}

fn number(input: &mut Input<'_>) -> ParserResult<Literal> {
    (digit1, opt(('.', digit1)))
        .take()
        .map(|raw: &str| Literal::Number(raw.to_string()))
        .parse_next(input)
}

fn is_ident_start(c: char) -> bool {
    c == '_'
        || c.is_ascii_alphabetic()
        || matches!(c,
            '\u{00C0}'..='\u{00D6}'
            | '\u{00D8}'..='\u{00F6}'
            | '\u{00F8}'..='\u{02FF}'
            | '\u{0370}'..='\u{037D}'
            | '\u{037F}'..='\u{1FFF}'
            | '\u{200C}'..='\u{200D}'
            | '\u{2070}'..='\u{218F}'
            | '\u{2C00}'..='\u{2FEF}'
            | '\u{3001}'..='\u{D7FF}'
            | '\u{F900}'..='\u{FDCF}'
            | '\u{FDF0}'..='\u{FFFD}')
}

fn is_ident_continue(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple(identifier: &str, lookup: Lookup, operator: Operator, literal: Literal) -> Condition {
        Condition::Simple(Comparison {
            identifier: identifier.into(),
            lookup,
            operator,
            literal,
        })
    }

    fn num(raw: &str) -> Literal {
        Literal::Number(raw.into())
    }

    // =========================================================================
    // Conditions
    // =========================================================================

    #[test]
    fn parses_single_comparison() {
        let c = parse_condition("a<2", false).unwrap();
        assert_eq!(c, simple("a", Lookup::Field, Operator::Lt, num("2")));
    }

    #[test]
    fn operators_match_longest_first() {
        let cases = [
            ("a<=1", Operator::Lte),
            ("a>=1", Operator::Gte),
            ("a=~'x'", Operator::Contains),
            ("a!~'x'", Operator::NotContains),
            ("a<1", Operator::Lt),
            ("a>1", Operator::Gt),
            ("a=1", Operator::Eq),
        ];
        for (text, op) in cases {
            match parse_condition(text, false).unwrap() {
                Condition::Simple(cmp) => assert_eq!(cmp.operator, op, "{text}"),
                other => panic!("expected simple condition, got {other:?}"),
            }
        }
    }

    #[test]
    fn spaces_around_operator_are_optional() {
        let tight = parse_condition("a<2", false).unwrap();
        let loose = parse_condition("a   <   2", false).unwrap();
        assert_eq!(tight, loose);
    }

    #[test]
    fn quoted_literals_unescape_doubled_quotes() {
        let cases = [
            ("a=''", ""),
            ("a=''''", "'"),
            ("a='christopher''s test'", "christopher's test"),
            ("a='x and y'", "x and y"),
        ];
        for (text, expected) in cases {
            match parse_condition(text, false).unwrap() {
                Condition::Simple(cmp) => assert_eq!(cmp.literal, Literal::Text(expected.into())),
                other => panic!("expected simple condition, got {other:?}"),
            }
        }
    }

    #[test]
    fn and_binds_tighter_than_or() {
        let c = parse_condition("a<2 or b>5 AND b<7", false).unwrap();
        assert_eq!(
            c,
            Condition::Or(vec![
                simple("a", Lookup::Field, Operator::Lt, num("2")),
                Condition::And(vec![
                    simple("b", Lookup::Field, Operator::Gt, num("5")),
                    simple("b", Lookup::Field, Operator::Lt, num("7")),
                ]),
            ])
        );
    }

    #[test]
    fn groups_are_flat() {
        match parse_condition("a=1 and b=2 and c=3", false).unwrap() {
            Condition::And(children) => assert_eq!(children.len(), 3),
            other => panic!("expected conjunction, got {other:?}"),
        }
        match parse_condition("a=1 Or b=2 oR c=3", false).unwrap() {
            Condition::Or(children) => assert_eq!(children.len(), 3),
            other => panic!("expected disjunction, got {other:?}"),
        }
    }

    #[test]
    fn accepts_rendered_grouping() {
        let text = "a<2 or b>5 and b<7";
        let tree = parse_condition(text, false).unwrap();
        let rendered = tree.render();
        assert_eq!(rendered, "(a<'2' OR (b>'5' AND b<'7'))");
        let quoted = parse_condition("a<'2' or b>'5' and b<'7'", false).unwrap();
        assert_eq!(parse_condition(&rendered, false).unwrap(), quoted);
        assert!(parse_condition("( a=1 AND b=2 )", false).is_ok());
    }

    #[test]
    fn rejects_nested_or_unbalanced_parentheses() {
        for text in ["(((a=1)))", "(a=1 OR (b=2 OR c=3))", "(a=1", "a=1)", "a=(1)", "(a=1) AND b=2"] {
            assert!(parse_condition(text, false).is_err(), "{text:?} should not parse");
        }
    }

    #[test]
    fn accessor_calls_are_opt_in() {
        assert!(parse_condition("a()<3", false).is_err());
        assert!(parse_condition("field>10 and size()=3", false).is_err());

        let c = parse_condition("size ( ) = 3", true).unwrap();
        assert_eq!(c, simple("size", Lookup::Accessor, Operator::Eq, num("3")));
    }

    #[test]
    fn bare_identifiers_still_parse_with_accessors_enabled() {
        let c = parse_condition("size=3", true).unwrap();
        assert_eq!(c, simple("size", Lookup::Field, Operator::Eq, num("3")));
    }

    #[test]
    fn unicode_identifiers() {
        assert!(parse_condition("größe>3", false).is_ok());
        assert!(parse_condition("_x9=1", false).is_ok());
        assert!(parse_condition("9x=1", false).is_err());
    }

    #[test]
    fn rejects_malformed_conditions() {
        let invalid = [
            "",
            "'a'<'d'",
            "a<d",
            "<d",
            "a>",
            "123<123",
            "a<..3",
            "a<3.",
            "a<3.3.",
            "a<2 and and a<2",
            "a<2 and or a<2",
            "a < 2 and b>3 or",
            "a<\"dog\"",
            "a<-3",
            "a<'open",
            "a<2\tand b<3",
        ];
        for text in invalid {
            assert!(parse_condition(text, true).is_err(), "{text:?} should not parse");
        }
    }

    #[test]
    fn parse_error_reports_offset() {
        let err = parse_condition("a<2 and", false).unwrap_err();
        assert_eq!(err.kind(), ClauseKind::Condition);
        assert_eq!(err.input(), "a<2 and");
        assert_eq!(err.offset(), 3);

        let err = parse_condition("a<2 or b>", false).unwrap_err();
        assert_eq!(err.offset(), 3);
    }

    // =========================================================================
    // Order-by clauses
    // =========================================================================

    #[test]
    fn order_by_defaults_to_ascending() {
        let keys = parse_order_by("order by animal", false).unwrap();
        assert_eq!(
            keys,
            vec![IdentifierOrder {
                identifier: "animal".into(),
                lookup: Lookup::Field,
                dir: Dir::Asc,
            }]
        );
    }

    #[test]
    fn order_by_multiple_keys() {
        let keys = parse_order_by("ORDER BY color DESC,animal asc , size()", true).unwrap();
        let summary: Vec<_> = keys
            .iter()
            .map(|k| (k.identifier.as_str(), k.lookup, k.dir))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("color", Lookup::Field, Dir::Desc),
                ("animal", Lookup::Field, Dir::Asc),
                ("size", Lookup::Accessor, Dir::Asc),
            ]
        );
    }

    #[test]
    fn rejects_malformed_order_by() {
        let invalid = [
            "",
            "order by",
            "orderby a",
            "order a",
            "order by a,",
            "order by a desc desc",
            "order by a ascending",
            "order by 1a",
        ];
        for text in invalid {
            let err = parse_order_by(text, true).unwrap_err();
            assert_eq!(err.kind(), ClauseKind::OrderBy, "{text:?}");
        }
        assert!(parse_order_by("order by size()", false).is_err());
    }
}
