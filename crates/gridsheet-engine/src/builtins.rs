//! Built-in spreadsheet functions and their metadata.
//!
//! Conventions:
//! - Spreadsheet-facing built-in names are ALL CAPS (e.g. `SUM`, `UPPER`).
//! - Range functions take any mix of single references and `A1:B3` ranges.
//! - Text functions take exactly one argument.
//! - If you add a new built-in, add it to `BUILTINS` and to `call_builtin`.

use regex::Regex;
use std::sync::OnceLock;

use crate::engine::args::unquote;
use crate::engine::{CellValue, Sheet, is_label, resolve_range, resolve_reference};
use crate::error::{FormulaError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuiltinKind {
    /// Aggregates values from references and ranges.
    Range,
    /// Transforms one text argument.
    Text,
}

pub struct Builtin {
    pub name: &'static str,
    pub kind: BuiltinKind,
    pub description: &'static str,
}

pub const BUILTINS: &[Builtin] = &[
    Builtin {
        name: "SUM",
        kind: BuiltinKind::Range,
        description: "Sum of numeric-coerced values",
    },
    Builtin {
        name: "AVERAGE",
        kind: BuiltinKind::Range,
        description: "Mean of non-empty values",
    },
    Builtin {
        name: "MAX",
        kind: BuiltinKind::Range,
        description: "Largest non-empty value, 0 if none",
    },
    Builtin {
        name: "MIN",
        kind: BuiltinKind::Range,
        description: "Smallest non-empty value, 0 if none",
    },
    Builtin {
        name: "COUNT",
        kind: BuiltinKind::Range,
        description: "Count of non-empty numeric values",
    },
    Builtin {
        name: "TRIM",
        kind: BuiltinKind::Text,
        description: "Strip leading and trailing whitespace",
    },
    Builtin {
        name: "UPPER",
        kind: BuiltinKind::Text,
        description: "Convert text to upper case",
    },
    Builtin {
        name: "LOWER",
        kind: BuiltinKind::Text,
        description: "Convert text to lower case",
    },
];

pub fn lookup_builtin(name: &str) -> Option<&'static Builtin> {
    BUILTINS.iter().find(|b| b.name == name)
}

fn numeric_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[+-]?(?:Infinity|(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)")
            .expect("numeric prefix regex must compile")
    })
}

/// Parse the longest numeric prefix of `text` (leading whitespace ignored).
pub fn parse_numeric_prefix(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let m = numeric_prefix_re().find(text)?;
    let s = m.as_str();
    match s.trim_start_matches(['+', '-']) {
        "Infinity" if s.starts_with('-') => Some(f64::NEG_INFINITY),
        "Infinity" => Some(f64::INFINITY),
        _ => s.parse::<f64>().ok(),
    }
}

/// Numeric coercion: blanks and unparseable text become 0.
pub fn to_number(value: &CellValue) -> f64 {
    match value {
        CellValue::Empty => 0.0,
        CellValue::Number(n) => *n,
        CellValue::Text(s) => parse_numeric_prefix(s).unwrap_or(0.0),
    }
}

/// Whether `COUNT` treats the value as numeric.
fn is_countable(value: &CellValue) -> bool {
    match value {
        CellValue::Empty => false,
        CellValue::Number(_) => true,
        CellValue::Text(s) => !s.is_empty() && parse_numeric_prefix(s).is_some(),
    }
}

/// Collect the values named by each argument, in argument order.
fn collect_values(args: &[String], sheet: &Sheet) -> Result<Vec<CellValue>> {
    let mut values = Vec::new();
    for arg in args {
        if arg.contains(':') {
            values.extend(resolve_range(arg, sheet)?);
        } else {
            values.push(resolve_reference(arg, sheet)?);
        }
    }
    Ok(values)
}

fn non_blank_numbers(values: &[CellValue]) -> impl Iterator<Item = f64> + '_ {
    values.iter().filter(|v| !v.is_blank()).map(to_number)
}

fn text_argument(function: &str, args: &[String], sheet: &Sheet) -> Result<String> {
    if args.len() != 1 {
        return Err(FormulaError::FunctionArity {
            function: function.to_string(),
            expected: 1,
            actual: args.len(),
        });
    }
    let arg = args[0].as_str();
    if is_label(arg) {
        Ok(resolve_reference(arg, sheet)?.to_display())
    } else {
        Ok(unquote(arg).to_string())
    }
}

/// Invoke the built-in `name` with already-split arguments.
pub fn call_builtin(name: &str, args: &[String], sheet: &Sheet) -> Result<CellValue> {
    let builtin =
        lookup_builtin(name).ok_or_else(|| FormulaError::UnknownFunction(name.to_string()))?;

    let value = match builtin.kind {
        BuiltinKind::Range => {
            let values = collect_values(args, sheet)?;
            let n = match builtin.name {
                "SUM" => values.iter().map(to_number).sum::<f64>(),
                "AVERAGE" => {
                    let (sum, count) =
                        non_blank_numbers(&values).fold((0.0, 0usize), |(s, c), n| (s + n, c + 1));
                    if count > 0 { sum / count as f64 } else { 0.0 }
                }
                "MAX" => non_blank_numbers(&values).reduce(f64::max).unwrap_or(0.0),
                "MIN" => non_blank_numbers(&values).reduce(f64::min).unwrap_or(0.0),
                "COUNT" => values.iter().filter(|v| is_countable(v)).count() as f64,
                other => return Err(FormulaError::UnknownFunction(other.to_string())),
            };
            CellValue::Number(n)
        }
        BuiltinKind::Text => {
            let text = text_argument(builtin.name, args, sheet)?;
            let out = match builtin.name {
                "TRIM" => text.trim().to_string(),
                "UPPER" => text.to_uppercase(),
                "LOWER" => text.to_lowercase(),
                other => return Err(FormulaError::UnknownFunction(other.to_string())),
            };
            CellValue::Text(out)
        }
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(to_number(&CellValue::Empty), 0.0);
        assert_eq!(to_number(&CellValue::Text(String::new())), 0.0);
        assert_eq!(to_number(&CellValue::Number(2.5)), 2.5);
        assert_eq!(to_number(&"3.5".into()), 3.5);
        assert_eq!(to_number(&"  12abc".into()), 12.0);
        assert_eq!(to_number(&"-.5".into()), -0.5);
        assert_eq!(to_number(&"1e2x".into()), 100.0);
        assert_eq!(to_number(&"abc".into()), 0.0);
        assert_eq!(to_number(&"-Infinity".into()), f64::NEG_INFINITY);
        // Rust's float parser would accept these; coercion must not.
        assert_eq!(to_number(&"inf".into()), 0.0);
        assert_eq!(to_number(&"NaN".into()), 0.0);
    }

    #[test]
    fn test_countable() {
        assert!(is_countable(&CellValue::Number(0.0)));
        assert!(is_countable(&"7".into()));
        assert!(!is_countable(&"abc".into()));
        assert!(!is_countable(&"".into()));
        assert!(!is_countable(&CellValue::Empty));
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert!(lookup_builtin("SUM").is_some());
        assert!(lookup_builtin("sum").is_none());
        assert_eq!(lookup_builtin("TRIM").unwrap().kind, BuiltinKind::Text);
    }
}
