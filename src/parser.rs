//! Filter-expression parser using nom.
//!
//! Turns textual filters like `id > 10` or `name = 'ada' and` into a
//! [`WhereExpr`] the CLI feeds into a clause accumulator. The trailing
//! connective joins the expression to the next `--where` argument.

use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while, take_while1},
    character::complete::{char, digit1, multispace0, multispace1},
    combinator::{map, opt, recognize, value},
    sequence::{pair, preceded, tuple},
    IResult,
};

use crate::error::{WeftError, WeftResult};
use crate::query::{Connective, Query};
use crate::value::Value;

/// One parsed filter expression.
#[derive(Debug, Clone, PartialEq)]
pub struct WhereExpr {
    pub field: String,
    pub operator: String,
    pub value: Value,
    pub connective: Option<Connective>,
}

impl WhereExpr {
    /// Feed this expression into a clause accumulator.
    pub fn apply(&self, query: &mut Query) {
        match self.connective {
            Some(connective) => {
                query.where_with(&self.field, &self.operator, self.value.clone(), connective)
            }
            None => query.where_(&self.field, &self.operator, self.value.clone()),
        };
    }
}

/// Parse a complete filter expression.
pub fn parse_where(input: &str) -> WeftResult<WhereExpr> {
    let input = input.trim();

    match parse_expr(input) {
        Ok(("", expr)) => Ok(expr),
        Ok((remaining, _)) => Err(WeftError::parse(
            input.len() - remaining.len(),
            format!("Unexpected trailing content: '{}'", remaining),
        )),
        Err(e) => Err(WeftError::parse(0, format!("Parse failed: {:?}", e))),
    }
}

fn parse_expr(input: &str) -> IResult<&str, WhereExpr> {
    let (input, field) = parse_identifier(input)?;
    let (input, _) = multispace0(input)?;
    let (input, operator) = parse_operator(input)?;
    let (input, _) = multispace0(input)?;
    let (input, val) = parse_value(input)?;
    let (input, connective) = opt(preceded(multispace1, parse_connective))(input)?;
    let (input, _) = multispace0(input)?;

    Ok((
        input,
        WhereExpr {
            field: field.to_string(),
            operator: operator.to_lowercase(),
            value: val,
            connective,
        },
    ))
}

/// Parse an identifier (field name).
fn parse_identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)
}

/// Parse a comparison operator from the closed set.
fn parse_operator(input: &str) -> IResult<&str, &str> {
    alt((
        tag(">="),
        tag("<="),
        tag("!="),
        tag("<>"),
        tag_no_case("like"),
        tag("="),
        tag(">"),
        tag("<"),
    ))(input)
}

fn parse_connective(input: &str) -> IResult<&str, Connective> {
    alt((
        value(Connective::And, tag_no_case("and")),
        value(Connective::Or, tag_no_case("or")),
    ))(input)
}

/// Parse a scalar value.
fn parse_value(input: &str) -> IResult<&str, Value> {
    alt((
        value(Value::Null, tag_no_case("null")),
        value(Value::Bool(true), tag("true")),
        value(Value::Bool(false), tag("false")),
        parse_number,
        parse_quoted_string,
        // Bare identifier, treated as a string
        map(parse_identifier, |s| Value::Text(s.to_string())),
    ))(input)
}

/// Parse a number (integer or float).
fn parse_number(input: &str) -> IResult<&str, Value> {
    let (input, num_str) = recognize(tuple((
        opt(char('-')),
        digit1,
        opt(pair(char('.'), digit1)),
    )))(input)?;

    if num_str.contains('.') {
        Ok((input, Value::Float(num_str.parse().unwrap_or(0.0))))
    } else {
        Ok((input, Value::Int(num_str.parse().unwrap_or(0))))
    }
}

/// Parse a quoted string.
fn parse_quoted_string(input: &str) -> IResult<&str, Value> {
    let (input, _) = char('\'')(input)?;
    let (input, content) = take_while(|c| c != '\'')(input)?;
    let (input, _) = char('\'')(input)?;

    Ok((input, Value::Text(content.to_string())))
}
