//! Angle expressions: decimal literals, `pi`, `+ - * /`, unary signs and parentheses.

use std::f64::consts::PI;

/// Evaluate `src` as an angle expression.
pub(crate) fn eval_angle(src: &str) -> Result<f64, String> {
    let mut parser = ExprParser {
        src: src.as_bytes(),
        pos: 0,
    };
    let value = parser.expr()?;
    parser.skip_ws();
    if parser.pos != parser.src.len() {
        return Err(format!(
            "unexpected '{}' in angle expression '{}'",
            &src[parser.pos..],
            src.trim()
        ));
    }
    Ok(value)
}

struct ExprParser<'a> {
    src: &'a [u8],
    pos: usize,
}

impl ExprParser<'_> {
    fn skip_ws(&mut self) {
        while self.pos < self.src.len() && self.src[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn peek(&mut self) -> Option<u8> {
        self.skip_ws();
        self.src.get(self.pos).copied()
    }

    fn expr(&mut self) -> Result<f64, String> {
        let mut acc = self.term()?;
        while let Some(op @ (b'+' | b'-')) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            acc = if op == b'+' { acc + rhs } else { acc - rhs };
        }
        Ok(acc)
    }

    fn term(&mut self) -> Result<f64, String> {
        let mut acc = self.factor()?;
        while let Some(op @ (b'*' | b'/')) = self.peek() {
            self.pos += 1;
            let rhs = self.factor()?;
            acc = if op == b'*' { acc * rhs } else { acc / rhs };
        }
        Ok(acc)
    }

    fn factor(&mut self) -> Result<f64, String> {
        match self.peek() {
            Some(b'-') => {
                self.pos += 1;
                Ok(-self.factor()?)
            }
            Some(b'+') => {
                self.pos += 1;
                self.factor()
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<f64, String> {
        match self.peek() {
            Some(b'(') => {
                self.pos += 1;
                let value = self.expr()?;
                match self.peek() {
                    Some(b')') => {
                        self.pos += 1;
                        Ok(value)
                    }
                    _ => Err("unbalanced parentheses in angle expression".to_string()),
                }
            }
            Some(c) if c.is_ascii_digit() || c == b'.' => self.number(),
            Some(c) if c.is_ascii_alphabetic() => {
                let start = self.pos;
                while self.pos < self.src.len() && self.src[self.pos].is_ascii_alphanumeric() {
                    self.pos += 1;
                }
                let ident = String::from_utf8_lossy(&self.src[start..self.pos]);
                match ident.as_ref() {
                    "pi" => Ok(PI),
                    other => Err(format!("unknown identifier '{}' in angle expression", other)),
                }
            }
            Some(c) => Err(format!("unexpected '{}' in angle expression", c as char)),
            None => Err("angle expression ended early".to_string()),
        }
    }

    fn number(&mut self) -> Result<f64, String> {
        let start = self.pos;
        let digits = |p: &mut Self| {
            while p.pos < p.src.len() && (p.src[p.pos].is_ascii_digit() || p.src[p.pos] == b'.') {
                p.pos += 1;
            }
        };
        digits(self);
        if matches!(self.src.get(self.pos), Some(b'e' | b'E')) {
            self.pos += 1;
            if matches!(self.src.get(self.pos), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            digits(self);
        }
        let literal = String::from_utf8_lossy(&self.src[start..self.pos]);
        literal
            .parse::<f64>()
            .map_err(|_| format!("malformed number '{}'", literal))
    }
}
