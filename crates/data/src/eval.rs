//! The expression-evaluation boundary used by applicability and switch
//! cases, with a small built-in evaluator.
//!
//! The engine only requires the [`ExpressionEvaluator`] trait; embedders may
//! bring their own expression language. [`BasicEvaluator`] covers the forms
//! case expressions actually take: literals, `{{binding}}` model references,
//! `!`, `==`/`!=` and `&&`/`||`.
use crate::error::EvalError;
use crate::model::DataModel;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{char, multispace0},
    combinator::{map, map_res},
    multi::many0,
    number::complete::double,
    sequence::{delimited, pair},
};
use serde_json::{Value, json};
use weft_binding::PathNode;

/// Evaluates expressions against the live data model. Given a list, the
/// result of the last expression is the result of the whole.
pub trait ExpressionEvaluator {
    fn evaluate(&self, expression: &str) -> Result<Value, EvalError>;

    fn evaluate_all(&self, expressions: &[String]) -> Result<Value, EvalError> {
        let mut last = Value::Null;
        for expression in expressions {
            last = self.evaluate(expression)?;
        }
        Ok(last)
    }

    fn evaluate_as_bool(&self, expression: &str) -> Result<bool, EvalError> {
        Ok(truthy(&self.evaluate(expression)?))
    }
}

/// JSON truthiness: `false`, `null`, `0` and `""` are falsy.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Equality with string/number coercion, shared by the evaluator and the
/// model's bracket-query matching.
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    if a == b {
        return true;
    }
    if let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) {
        return x == y;
    }
    comparable(a) == comparable(b)
}

fn comparable(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        // Integral floats print without the fraction so "3" == 3.0 holds.
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.fract() == 0.0 => (f as i64).to_string(),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

// --- AST ---

#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Literal(Value),
    Binding(PathNode),
    Not(Box<Expr>),
    BinaryOp {
        left: Box<Expr>,
        op: BinaryOperator,
        right: Box<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinaryOperator {
    Equals,
    NotEquals,
    And,
    Or,
}

// --- Evaluator ---

/// The built-in evaluator: reads bindings through a [`DataModel`].
pub struct BasicEvaluator<'a> {
    model: &'a dyn DataModel,
}

impl<'a> BasicEvaluator<'a> {
    pub fn new(model: &'a dyn DataModel) -> Self {
        BasicEvaluator { model }
    }

    fn eval(&self, expr: &Expr) -> Result<Value, EvalError> {
        match expr {
            Expr::Literal(value) => Ok(value.clone()),
            // An unresolvable binding reads as null, not an error.
            Expr::Binding(path) => Ok(self.model.get(path).unwrap_or(Value::Null)),
            Expr::Not(inner) => Ok(Value::Bool(!truthy(&self.eval(inner)?))),
            Expr::BinaryOp { left, op, right } => {
                let lhs = self.eval(left)?;
                match op {
                    BinaryOperator::Equals => Ok(Value::Bool(loose_eq(&lhs, &self.eval(right)?))),
                    BinaryOperator::NotEquals => {
                        Ok(Value::Bool(!loose_eq(&lhs, &self.eval(right)?)))
                    }
                    BinaryOperator::And => {
                        if !truthy(&lhs) {
                            return Ok(Value::Bool(false));
                        }
                        Ok(Value::Bool(truthy(&self.eval(right)?)))
                    }
                    BinaryOperator::Or => {
                        if truthy(&lhs) {
                            return Ok(Value::Bool(true));
                        }
                        Ok(Value::Bool(truthy(&self.eval(right)?)))
                    }
                }
            }
        }
    }
}

impl ExpressionEvaluator for BasicEvaluator<'_> {
    fn evaluate(&self, expression: &str) -> Result<Value, EvalError> {
        let expr = parse_expression(expression)?;
        self.eval(&expr)
    }
}

// --- Parser ---

fn parse_expression(input: &str) -> Result<Expr, EvalError> {
    match expression(input.trim()) {
        Ok(("", expr)) => Ok(expr),
        Ok((rem, _)) => Err(EvalError::Parse(
            input.to_string(),
            format!("Parser did not consume all input. Remainder: '{}'", rem),
        )),
        Err(e) => Err(EvalError::Parse(input.to_string(), e.to_string())),
    }
}

fn ws<'a, F, O, E>(inner: F) -> impl Parser<&'a str, Output = O, Error = E>
where
    F: Parser<&'a str, Output = O, Error = E>,
    E: nom::error::ParseError<&'a str>,
{
    delimited(multispace0, inner, multispace0)
}

fn build_binary_expr_parser<'a, F, G>(
    sub_expr_parser: F,
    op_parser: G,
) -> impl FnMut(&'a str) -> IResult<&'a str, Expr>
where
    F: Parser<&'a str, Output = Expr, Error = nom::error::Error<&'a str>> + Clone,
    G: Parser<&'a str, Output = BinaryOperator, Error = nom::error::Error<&'a str>> + Clone,
{
    move |input: &str| {
        let (input, mut left) = sub_expr_parser.clone().parse(input)?;
        let (input, remainder) =
            many0(pair(ws(op_parser.clone()), sub_expr_parser.clone())).parse(input)?;

        for (op, right) in remainder {
            left = Expr::BinaryOp {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
        Ok((input, left))
    }
}

fn expression(input: &str) -> IResult<&str, Expr> {
    or_expr(input)
}

fn or_op(input: &str) -> IResult<&str, BinaryOperator> {
    map(tag("||"), |_| BinaryOperator::Or).parse(input)
}

fn or_expr(input: &str) -> IResult<&str, Expr> {
    build_binary_expr_parser(and_expr, or_op)(input)
}

fn and_op(input: &str) -> IResult<&str, BinaryOperator> {
    map(tag("&&"), |_| BinaryOperator::And).parse(input)
}

fn and_expr(input: &str) -> IResult<&str, Expr> {
    build_binary_expr_parser(equality_expr, and_op)(input)
}

fn equality_op(input: &str) -> IResult<&str, BinaryOperator> {
    alt((
        map(tag("=="), |_| BinaryOperator::Equals),
        map(tag("!="), |_| BinaryOperator::NotEquals),
    ))
    .parse(input)
}

fn equality_expr(input: &str) -> IResult<&str, Expr> {
    build_binary_expr_parser(unary_expr, equality_op)(input)
}

fn unary_expr(input: &str) -> IResult<&str, Expr> {
    let (input, bangs) = many0(ws(char('!'))).parse(input)?;
    let (input, mut expr) = primary(input)?;
    for _ in 0..bangs.len() {
        expr = Expr::Not(Box::new(expr));
    }
    Ok((input, expr))
}

fn primary(input: &str) -> IResult<&str, Expr> {
    ws(alt((
        delimited(char('('), expression, char(')')),
        map(tag("null"), |_| Expr::Literal(Value::Null)),
        map(tag("true"), |_| Expr::Literal(json!(true))),
        map(tag("false"), |_| Expr::Literal(json!(false))),
        map(
            delimited(char('\''), take_while(|c| c != '\''), char('\'')),
            |s: &str| Expr::Literal(json!(s)),
        ),
        map(double, |n| Expr::Literal(json!(n))),
        binding_ref,
    )))
    .parse(input)
}

/// The `{{ ... }}` extent, with nested `{{ }}` pairs balanced so bindings
/// like `{{foo.{{key}}}}` are taken whole.
fn balanced_binding(input: &str) -> IResult<&str, &str> {
    let (body, _) = tag("{{").parse(input)?;
    match weft_binding::closing_brace_offset(body) {
        Some(end) => Ok((&body[end + 2..], &body[..end])),
        None => Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::TakeUntil,
        ))),
    }
}

fn binding_ref(input: &str) -> IResult<&str, Expr> {
    map_res(balanced_binding, |inner: &str| {
        weft_binding::parse(inner).map(Expr::Binding)
    })
    .parse(input)
}
