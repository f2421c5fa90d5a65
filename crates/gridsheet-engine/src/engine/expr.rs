//! Numeric expression evaluator.
//!
//! A small recursive-descent parser over numbers, `+ - * /`, unary signs and
//! parentheses. Cell references have already been substituted by the caller,
//! so anything other than these tokens is rejected. `Infinity` and `NaN` are
//! accepted because that is how non-finite values are formatted.
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := unary (('*' | '/') unary)*
//! unary  := ('+' | '-') unary | atom
//! atom   := NUMBER | 'Infinity' | 'NaN' | '(' expr ')'
//! ```

use crate::error::{FormulaError, Result};

/// Nesting limit for parentheses and unary signs.
const MAX_DEPTH: usize = 256;

/// Evaluate an arithmetic expression to a number.
pub fn eval_arithmetic(input: &str) -> Result<f64> {
    let mut parser = ExprParser {
        input,
        bytes: input.as_bytes(),
        pos: 0,
        depth: 0,
    };
    let value = parser.parse_expr()?;
    parser.skip_whitespace();
    if parser.pos < parser.bytes.len() {
        return Err(parser.error());
    }
    Ok(value)
}

struct ExprParser<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    depth: usize,
}

impl ExprParser<'_> {
    fn error(&self) -> FormulaError {
        FormulaError::InvalidFormula(self.input.to_string())
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn peek(&mut self) -> Option<u8> {
        self.skip_whitespace();
        self.bytes.get(self.pos).copied()
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.error());
        }
        Ok(())
    }

    fn parse_expr(&mut self) -> Result<f64> {
        let mut acc = self.parse_term()?;
        while let Some(op @ (b'+' | b'-')) = self.peek() {
            self.pos += 1;
            let rhs = self.parse_term()?;
            if op == b'+' {
                acc += rhs;
            } else {
                acc -= rhs;
            }
        }
        Ok(acc)
    }

    fn parse_term(&mut self) -> Result<f64> {
        let mut acc = self.parse_unary()?;
        while let Some(op @ (b'*' | b'/')) = self.peek() {
            self.pos += 1;
            let rhs = self.parse_unary()?;
            if op == b'*' {
                acc *= rhs;
            } else {
                acc /= rhs;
            }
        }
        Ok(acc)
    }

    fn parse_unary(&mut self) -> Result<f64> {
        match self.peek() {
            Some(op @ (b'+' | b'-')) => {
                self.pos += 1;
                self.enter()?;
                let value = self.parse_unary()?;
                self.depth -= 1;
                Ok(if op == b'-' { -value } else { value })
            }
            _ => self.parse_atom(),
        }
    }

    fn parse_atom(&mut self) -> Result<f64> {
        match self.peek() {
            Some(b'(') => {
                self.pos += 1;
                self.enter()?;
                let value = self.parse_expr()?;
                self.depth -= 1;
                if self.peek() != Some(b')') {
                    return Err(self.error());
                }
                self.pos += 1;
                Ok(value)
            }
            Some(b) if b.is_ascii_digit() || b == b'.' => self.parse_number(),
            Some(b'I' | b'N') => self.parse_keyword(),
            _ => Err(self.error()),
        }
    }

    fn parse_keyword(&mut self) -> Result<f64> {
        let rest = &self.input[self.pos..];
        let (word, value) = if rest.starts_with("Infinity") {
            ("Infinity", f64::INFINITY)
        } else if rest.starts_with("NaN") {
            ("NaN", f64::NAN)
        } else {
            return Err(self.error());
        };
        self.pos += word.len();
        if self
            .bytes
            .get(self.pos)
            .is_some_and(|b| b.is_ascii_alphanumeric() || *b == b'_')
        {
            return Err(self.error());
        }
        Ok(value)
    }

    fn parse_number(&mut self) -> Result<f64> {
        let start = self.pos;
        let digits = |p: &mut Self| {
            let from = p.pos;
            while p.pos < p.bytes.len() && p.bytes[p.pos].is_ascii_digit() {
                p.pos += 1;
            }
            p.pos - from
        };

        let mut mantissa = digits(self);
        if self.bytes.get(self.pos) == Some(&b'.') {
            self.pos += 1;
            mantissa += digits(self);
        }
        if mantissa == 0 {
            return Err(self.error());
        }

        if matches!(self.bytes.get(self.pos), Some(b'e' | b'E')) {
            let before_exp = self.pos;
            self.pos += 1;
            if matches!(self.bytes.get(self.pos), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            if digits(self) == 0 {
                self.pos = before_exp;
            }
        }

        self.input[start..self.pos]
            .parse::<f64>()
            .map_err(|_| self.error())
    }
}

#[cfg(test)]
mod tests {
    use super::eval_arithmetic;
    use crate::error::FormulaError;

    #[test]
    fn test_precedence_and_associativity() {
        assert_eq!(eval_arithmetic("2+3*4").unwrap(), 14.0);
        assert_eq!(eval_arithmetic("(2+3)*4").unwrap(), 20.0);
        assert_eq!(eval_arithmetic("10-4-3").unwrap(), 3.0);
        assert_eq!(eval_arithmetic("16/4/2").unwrap(), 2.0);
        assert_eq!(eval_arithmetic(" 1.5 * 2 ").unwrap(), 3.0);
    }

    #[test]
    fn test_unary_signs() {
        assert_eq!(eval_arithmetic("-3").unwrap(), -3.0);
        assert_eq!(eval_arithmetic("2--3").unwrap(), 5.0);
        assert_eq!(eval_arithmetic("2*-3").unwrap(), -6.0);
        assert_eq!(eval_arithmetic("-(1+1)").unwrap(), -2.0);
        assert_eq!(eval_arithmetic("+.5").unwrap(), 0.5);
    }

    #[test]
    fn test_exponent_literals() {
        assert_eq!(eval_arithmetic("1e3").unwrap(), 1000.0);
        assert_eq!(eval_arithmetic("2.5E-1").unwrap(), 0.25);
    }

    #[test]
    fn test_division_by_zero_is_infinite() {
        assert!(eval_arithmetic("1/0").unwrap().is_infinite());
    }

    #[test]
    fn test_non_finite_keywords() {
        assert_eq!(eval_arithmetic("Infinity+1").unwrap(), f64::INFINITY);
        assert_eq!(eval_arithmetic("-Infinity*2").unwrap(), f64::NEG_INFINITY);
        assert!(eval_arithmetic("NaN-1").unwrap().is_nan());
        assert!(eval_arithmetic("Infinity-Infinity").unwrap().is_nan());
        for bad in ["Inf", "Infinityx", "NaNa", "nan", "infinity"] {
            assert!(
                matches!(eval_arithmetic(bad), Err(FormulaError::InvalidFormula(_))),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn test_rejects_non_arithmetic() {
        for bad in ["", "1+", "(1", "1)", "abc", "2 3", "1..2", ".", "alert(1)", "2^3", "1e"] {
            assert!(
                matches!(eval_arithmetic(bad), Err(FormulaError::InvalidFormula(_))),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn test_deep_nesting_is_rejected_not_overflowed() {
        let deep = format!("{}1{}", "(".repeat(10_000), ")".repeat(10_000));
        assert!(eval_arithmetic(&deep).is_err());
    }
}
