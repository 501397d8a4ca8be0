//! Default-value literals
//!
//! Defaults arrive from the front end already evaluated. This module checks
//! them against the slot they fill and spells them in target syntax.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TypeError;
use crate::ty::{PrimitiveType, TargetTypeDecision};

/// An evaluated literal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Literal {
    /// Integer literal
    Int(i64),
    /// Floating point literal
    Float(f64),
    /// Boolean literal
    Bool(bool),
    /// Character literal
    Char(char),
    /// String literal
    #[serde(rename = "string")]
    Str(String),
    /// The null literal
    Null,
}

impl Literal {
    /// Whether this is `null`
    pub fn is_null(&self) -> bool {
        matches!(self, Literal::Null)
    }

    /// Check that the literal can be stored in a value-typed slot.
    ///
    /// `null` needs a wrapped slot. Literals stored into user value types
    /// cannot be checked here and are accepted.
    pub fn check_value_slot(&self, slot: &TargetTypeDecision) -> Result<(), TypeError> {
        let assignable = match (self, slot.value_type().as_primitive()) {
            (Literal::Null, _) => slot.is_wrapped(),
            (_, None) => true,
            (Literal::Int(value), Some(primitive)) => primitive
                .integer_range()
                .is_some_and(|(lo, hi)| *value >= lo && *value <= hi),
            (Literal::Float(value), Some(PrimitiveType::Single)) => {
                !value.is_finite() || value.abs() <= f32::MAX as f64
            }
            (Literal::Float(_), Some(primitive)) => primitive.is_floating(),
            (Literal::Bool(_), Some(primitive)) => primitive == PrimitiveType::Bool,
            // A target char is one UTF-16 code unit
            (Literal::Char(c), Some(primitive)) => {
                primitive == PrimitiveType::Char && (*c as u32) <= 0xFFFF
            }
            (Literal::Str(_), Some(_)) => false,
        };

        if assignable {
            Ok(())
        } else {
            Err(TypeError::IncompatibleLiteral {
                literal: self.to_string(),
                target: slot.to_string(),
            })
        }
    }

    /// Check that the literal can be stored in a reference-typed slot
    pub fn check_reference_slot(&self, type_name: &str) -> Result<(), TypeError> {
        match self {
            Literal::Null | Literal::Str(_) => Ok(()),
            _ => Err(TypeError::IncompatibleLiteral {
                literal: self.to_string(),
                target: type_name.to_string(),
            }),
        }
    }

    /// Spell the literal in target syntax for a slot of the given primitive
    pub fn render(&self, slot: Option<PrimitiveType>) -> String {
        match self {
            Literal::Int(value) => value.to_string(),
            Literal::Float(value) => render_float(*value, slot == Some(PrimitiveType::Single)),
            Literal::Bool(value) => value.to_string(),
            Literal::Char(c) => format!("'{}'", escape_char(*c, '\'')),
            Literal::Str(s) => {
                let mut out = String::with_capacity(s.len() + 2);
                out.push('"');
                for c in s.chars() {
                    out.push_str(&escape_char(c, '"'));
                }
                out.push('"');
                out
            }
            Literal::Null => "null".to_string(),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(None))
    }
}

fn render_float(value: f64, single: bool) -> String {
    let owner = if single { "float" } else { "double" };
    if value.is_nan() {
        return format!("{}.NaN", owner);
    }
    if value.is_infinite() {
        let side = if value > 0.0 { "Positive" } else { "Negative" };
        return format!("{}.{}Infinity", owner, side);
    }
    // Debug formatting always keeps a decimal point or an exponent
    let digits = format!("{:?}", value);
    if single {
        format!("{}f", digits)
    } else {
        digits
    }
}

fn escape_char(c: char, quote: char) -> String {
    match c {
        '\\' => "\\\\".to_string(),
        '\n' => "\\n".to_string(),
        '\r' => "\\r".to_string(),
        '\t' => "\\t".to_string(),
        '\0' => "\\0".to_string(),
        c if c == quote => format!("\\{}", c),
        c if c.is_control() => format!("\\u{:04x}", c as u32),
        c => c.to_string(),
    }
}
