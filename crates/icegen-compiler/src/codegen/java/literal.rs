//! Constant initializers.

use std::fmt::Write;

use icegen_core::{BuiltinKind, Type};

use super::Emitter;
use crate::{Error, Result};

/// Quote `value` as a Java string literal.
///
/// Printable ASCII is copied with `\` and `"` escaped; CR and LF use their
/// short escapes; every other byte becomes a `\u00XX` escape.
pub fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for byte in value.bytes() {
        match byte {
            b'\\' | b'"' => {
                out.push('\\');
                out.push(byte as char);
            }
            b'\r' => out.push_str("\\r"),
            b'\n' => out.push_str("\\n"),
            0x20..=0x7e => out.push(byte as char),
            _ => {
                let _ = write!(out, "\\u{byte:04x}");
            }
        }
    }
    out.push('"');
    out
}

fn parse_integer(text: &str) -> Option<i64> {
    let text = text.trim();
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let magnitude = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => i64::from_str_radix(hex, 16).ok()?,
        None => digits.parse().ok()?,
    };
    Some(if negative { -magnitude } else { magnitude })
}

impl Emitter<'_> {
    /// Java initializer for a constant of type `ty` written as `value`.
    pub(super) fn const_literal(&self, ty: Type, value: &str) -> Result<String> {
        let invalid = || Error::InvalidConstant {
            name: self.def.scoped(),
            value: value.to_owned(),
        };
        let integer = |min: i64, max: i64| {
            parse_integer(value)
                .filter(|v| (min..=max).contains(v))
                .ok_or_else(invalid)
        };

        match ty {
            Type::Builtin(kind) => match kind {
                BuiltinKind::Bool => match value.trim() {
                    v @ ("true" | "false") => Ok(v.to_owned()),
                    _ => Err(invalid()),
                },
                // Slice bytes are 0..=255; Java bytes are signed.
                BuiltinKind::Byte => {
                    let v = integer(0, 255)?;
                    if v > 127 {
                        Ok(format!("(byte){}", v - 256))
                    } else {
                        Ok(v.to_string())
                    }
                }
                BuiltinKind::Short => Ok(integer(i16::MIN.into(), i16::MAX.into())?.to_string()),
                BuiltinKind::Int => Ok(integer(i32::MIN.into(), i32::MAX.into())?.to_string()),
                BuiltinKind::Long => Ok(format!("{}L", integer(i64::MIN, i64::MAX)?)),
                BuiltinKind::Float => {
                    let v = value.trim();
                    v.trim_end_matches(['f', 'F'])
                        .parse::<f32>()
                        .map_err(|_| invalid())?;
                    Ok(format!("{}F", v.trim_end_matches(['f', 'F'])))
                }
                BuiltinKind::Double => {
                    let v = value.trim();
                    v.parse::<f64>().map_err(|_| invalid())?;
                    Ok(v.to_owned())
                }
                BuiltinKind::String => Ok(string_literal(value)),
                BuiltinKind::Object | BuiltinKind::ObjectProxy | BuiltinKind::LocalObject => {
                    Err(invalid())
                }
            },
            Type::Enum(id) => {
                let enumerators = &self.enum_def(id)?.enumerators;
                let name = value.rsplit(':').next().unwrap_or(value).trim();
                if !enumerators.iter().any(|e| e == name) {
                    return Err(invalid());
                }
                Ok(format!("{}.{name}", self.java_name(id, "", "")?))
            }
            Type::Proxy(_)
            | Type::Class(_)
            | Type::Struct(_)
            | Type::Sequence(_)
            | Type::Dictionary(_) => Err(invalid()),
        }
    }
}
