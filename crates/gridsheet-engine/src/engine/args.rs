//! Function-call recognition and argument splitting.
//!
//! A formula is a function call only when the whole text is `NAME(...)` and
//! the parenthesis opened after `NAME` closes on the last character, so
//! `SUM(A1)+SUM(B1)` is not mistaken for one call.

use regex::Regex;
use std::sync::OnceLock;

fn call_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?<name>\w+)\((?<args>.*)\)$").expect("function call regex must compile")
    })
}

/// Split `NAME(args)` into the function name and the raw argument text.
pub fn split_call(formula: &str) -> Option<(&str, &str)> {
    let caps = call_re().captures(formula)?;
    let name = caps.name("name")?.as_str();
    let args = caps.name("args")?.as_str();
    if !closes_at_end(args) {
        return None;
    }
    Some((name, args))
}

/// True if `args` never closes more parentheses than it opened, i.e. the
/// call's own `(` is matched by the final `)`.
fn closes_at_end(args: &str) -> bool {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for ch in args.chars() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => {}
            None => match ch {
                '"' | '\'' => quote = Some(ch),
                '(' => depth += 1,
                ')' => match depth.checked_sub(1) {
                    Some(d) => depth = d,
                    None => return false,
                },
                _ => {}
            },
        }
    }
    true
}

/// Split an argument list on top-level commas.
///
/// Commas inside nested parentheses or inside single/double quotes do not
/// split. Each argument is trimmed; a trailing empty argument is dropped.
pub fn split_args(args: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for ch in args.chars() {
        if let Some(q) = quote {
            if ch == q {
                quote = None;
            }
            current.push(ch);
            continue;
        }
        match ch {
            '"' | '\'' => {
                quote = Some(ch);
                current.push(ch);
            }
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            ',' if depth == 0 => {
                out.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    if !current.trim().is_empty() {
        out.push(current.trim().to_string());
    }
    out
}

/// Strip one pair of matching surrounding quotes, if present.
pub fn unquote(arg: &str) -> &str {
    for q in ['"', '\''] {
        if arg.len() >= 2 && arg.starts_with(q) && arg.ends_with(q) {
            return &arg[1..arg.len() - 1];
        }
    }
    arg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_call() {
        assert_eq!(split_call("SUM(A1:A3)"), Some(("SUM", "A1:A3")));
        assert_eq!(split_call("UPPER(\"a)b\")"), Some(("UPPER", "\"a)b\"")));
        assert_eq!(split_call("SUM(A1)+SUM(B1)"), None);
        assert_eq!(split_call("A1+B1"), None);
        assert_eq!(split_call("(1+2)"), None);
    }

    #[test]
    fn test_split_args_respects_nesting_and_quotes() {
        assert_eq!(split_args("A1, B2:C3 ,D4"), vec!["A1", "B2:C3", "D4"]);
        assert_eq!(split_args("\"a,b\", 'c,d'"), vec!["\"a,b\"", "'c,d'"]);
        assert_eq!(split_args("X(1,2),3"), vec!["X(1,2)", "3"]);
        assert_eq!(split_args("\"it's\", x"), vec!["\"it's\"", "x"]);
        assert_eq!(split_args("A1,"), vec!["A1"]);
        assert_eq!(split_args("A1,,B1"), vec!["A1", "", "B1"]);
        assert!(split_args("  ").is_empty());
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("\"  hi \""), "  hi ");
        assert_eq!(unquote("'x'"), "x");
        assert_eq!(unquote("\"x'"), "\"x'");
        assert_eq!(unquote("\""), "\"");
        assert_eq!(unquote("plain"), "plain");
    }
}
