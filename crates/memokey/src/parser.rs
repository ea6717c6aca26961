//! Canonical key parser using nom
//!
//! Decodes a key produced by [`crate::derive_key`] back into its normalized
//! argument list. Objects come back with their keys in sorted order.

use nom::{
    branch::alt,
    bytes::complete::{escaped, tag},
    character::complete::{anychar, char, digit1, none_of},
    combinator::{all_consuming, map, map_res, opt, recognize, value},
    multi::separated_list0,
    sequence::{delimited, pair, separated_pair, tuple},
    IResult,
};

use crate::error::Result;
use crate::value::{Object, Value};

/// Parse a canonical key into its argument list
///
/// # Arguments
/// * `input` - Key text, e.g. `(1,"a",{"k":[true]})`
///
/// # Returns
/// * `Result<Vec<Value>>` - One value per positional argument
pub fn parse_key(input: &str) -> Result<Vec<Value>> {
    let (_, args) = all_consuming(argument_list)(input)?;
    Ok(args)
}

fn argument_list(input: &str) -> IResult<&str, Vec<Value>> {
    delimited(char('('), separated_list0(char(','), node), char(')'))(input)
}

fn node(input: &str) -> IResult<&str, Value> {
    alt((
        value(Value::Null, tag("null")),
        value(Value::Bool(true), tag("true")),
        value(Value::Bool(false), tag("false")),
        map(quoted, Value::String),
        map(array, Value::Array),
        map(object, Value::Object),
        number,
    ))(input)
}

/// JSON-quoted string; escapes are decoded by serde_json
fn quoted(input: &str) -> IResult<&str, String> {
    map_res(
        recognize(delimited(
            char('"'),
            opt(escaped(none_of("\\\""), '\\', anychar)),
            char('"'),
        )),
        |s: &str| serde_json::from_str::<String>(s),
    )(input)
}

fn array(input: &str) -> IResult<&str, Vec<Value>> {
    delimited(char('['), separated_list0(char(','), node), char(']'))(input)
}

fn object(input: &str) -> IResult<&str, Object> {
    map(
        delimited(
            char('{'),
            separated_list0(char(','), separated_pair(quoted, char(':'), node)),
            char('}'),
        ),
        |pairs: Vec<(String, Value)>| pairs.into_iter().collect::<Object>(),
    )(input)
}

fn number(input: &str) -> IResult<&str, Value> {
    alt((
        value(Value::Float(f64::NAN), tag("NaN")),
        value(Value::Float(f64::INFINITY), tag("Infinity")),
        value(Value::Float(f64::NEG_INFINITY), tag("-Infinity")),
        map_res(
            recognize(tuple((opt(char('-')), digit1, opt(pair(char('.'), digit1))))),
            number_value,
        ),
    ))(input)
}

// Integers too wide for i128 were integral floats
fn number_value(text: &str) -> std::result::Result<Value, std::num::ParseFloatError> {
    if !text.contains('.') {
        if let Ok(i) = text.parse::<i128>() {
            return Ok(Value::Int(i));
        }
    }
    text.parse::<f64>().map(Value::Float)
}
