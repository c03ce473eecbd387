//! Script parsing.
//!
//! A script is plain multi-line text. Every line, blank ones included,
//! becomes one [`Line`] so that line indices match the source for
//! highlighting and blank lines still cost a pacing delay.
//!
//! Operands are read leniently: a numeric operand is parsed from the
//! longest numeric prefix of its token, and callers choose whether an
//! unreadable operand defaults to zero ([`Line::number`]) or is reported
//! as absent ([`Line::float`], [`Line::integer`]).

use serde::{Deserialize, Serialize};

/// A parsed script: one entry per source line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    lines: Vec<Line>,
}

impl Script {
    /// Parse raw script text.
    ///
    /// Splits on `\n` only; a trailing `\r` is removed by the per-line trim.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self {
            lines: raw.split('\n').map(Line::parse).collect(),
        }
    }

    /// All lines in source order.
    #[must_use]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Line at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    /// Number of lines, blank lines included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True if the script has no lines at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// True if every line is blank.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(Line::is_blank)
    }
}

/// One tokenized script line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    /// Trimmed source text, original casing.
    source: String,
    /// Whitespace-separated tokens of the upper-cased text.
    tokens: Vec<String>,
}

impl Line {
    /// Tokenize a single source line.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let source = raw.trim().to_string();
        let tokens = source
            .to_uppercase()
            .split_whitespace()
            .map(str::to_string)
            .collect();
        Self { source, tokens }
    }

    /// Trimmed source text for display.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Upper-cased tokens.
    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// True if the line holds no tokens.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Command name (token 0), upper-cased.
    #[must_use]
    pub fn command(&self) -> Option<&str> {
        self.tokens.first().map(String::as_str)
    }

    /// Raw operand token; operand 1 is the first token after the command.
    #[must_use]
    pub fn operand(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(String::as_str)
    }

    /// Numeric operand, defaulting to `0.0` when absent or unreadable.
    #[must_use]
    pub fn number(&self, index: usize) -> f64 {
        self.float(index).unwrap_or(0.0)
    }

    /// Numeric operand, `None` when absent or unreadable.
    #[must_use]
    pub fn float(&self, index: usize) -> Option<f64> {
        self.operand(index).and_then(float_prefix)
    }

    /// Integer operand, `None` when absent or unreadable.
    #[must_use]
    pub fn integer(&self, index: usize) -> Option<i64> {
        self.operand(index).and_then(integer_prefix)
    }
}

/// Parse the longest decimal floating-point prefix of `token`.
///
/// Accepts an optional sign, digits with an optional fraction, and an
/// optional exponent that only counts when followed by digits.
#[must_use]
pub fn float_prefix(token: &str) -> Option<f64> {
    let bytes = token.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }

    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    token[..end].parse().ok()
}

/// Parse the longest integer prefix of `token`.
///
/// A `0x`/`0X` prefix after the sign switches to hexadecimal; with no hex
/// digits after it there is no number.
#[must_use]
pub fn integer_prefix(token: &str) -> Option<i64> {
    let bytes = token.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let digits_start = end;

    let hex_marker = bytes.get(digits_start..digits_start + 2);
    if hex_marker.is_some_and(|p| p.eq_ignore_ascii_case(b"0x")) {
        let hex = &token[digits_start + 2..];
        let len = hex.bytes().take_while(u8::is_ascii_hexdigit).count();
        let value = i64::from_str_radix(&hex[..len], 16).ok()?;
        let negative = bytes.first() == Some(&b'-');
        return Some(if negative { -value } else { value });
    }

    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    token[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_blank_lines() {
        let script = Script::parse("ANDA 1\n\n  \nDIREITA 90\n");
        assert_eq!(script.len(), 5);
        assert!(script.lines()[1].is_blank());
        assert!(script.lines()[2].is_blank());
        assert!(script.lines()[4].is_blank());
        assert_eq!(script.lines()[3].command(), Some("DIREITA"));
    }

    #[test]
    fn test_empty_text_is_one_blank_line() {
        let script = Script::parse("");
        assert_eq!(script.len(), 1);
        assert!(script.is_blank());
    }

    #[test]
    fn test_uppercases_and_splits_whitespace_runs() {
        let line = Line::parse("  anda \t  3  ");
        assert_eq!(line.tokens(), ["ANDA", "3"]);
        assert_eq!(line.source(), "anda \t  3");
    }

    #[test]
    fn test_accented_command_uppercases() {
        let line = Line::parse("trás 2");
        assert_eq!(line.command(), Some("TRÁS"));
    }

    #[test]
    fn test_crlf_line_endings() {
        let script = Script::parse("ANDA 1\r\nANDA 2\r\n");
        assert_eq!(script.lines()[0].tokens(), ["ANDA", "1"]);
        assert_eq!(script.lines()[1].number(1), 2.0);
    }

    #[test]
    fn test_number_defaults_to_zero() {
        let line = Line::parse("ANDA");
        assert_eq!(line.number(1), 0.0);

        let line = Line::parse("ANDA muito");
        assert_eq!(line.number(1), 0.0);
    }

    #[test]
    fn test_number_reads_prefix() {
        assert_eq!(Line::parse("ANDA 2x").number(1), 2.0);
        assert_eq!(Line::parse("ANDA -1.5").number(1), -1.5);
        assert_eq!(Line::parse("ANDA .5").number(1), 0.5);
        assert_eq!(Line::parse("ANDA 1e1").number(1), 10.0);
    }

    #[test]
    fn test_float_prefix_edge_cases() {
        assert_eq!(float_prefix("3."), Some(3.0));
        assert_eq!(float_prefix("1E"), Some(1.0));
        assert_eq!(float_prefix("2E+"), Some(2.0));
        assert_eq!(float_prefix("1.5.2"), Some(1.5));
        assert_eq!(float_prefix("."), None);
        assert_eq!(float_prefix("-"), None);
        assert_eq!(float_prefix("INFINITY"), None);
        assert_eq!(float_prefix(""), None);
    }

    #[test]
    fn test_integer_prefix() {
        assert_eq!(integer_prefix("1"), Some(1));
        assert_eq!(integer_prefix("1.9"), Some(1));
        assert_eq!(integer_prefix("-2"), Some(-2));
        assert_eq!(integer_prefix("3LEDS"), Some(3));
        assert_eq!(integer_prefix("X1"), None);
        assert_eq!(integer_prefix("+"), None);
    }

    #[test]
    fn test_integer_prefix_hex() {
        assert_eq!(integer_prefix("0X1"), Some(1));
        assert_eq!(integer_prefix("0x1A"), Some(26));
        assert_eq!(integer_prefix("-0XFFG"), Some(-255));
        assert_eq!(integer_prefix("0X"), None);
        assert_eq!(integer_prefix("0XZ"), None);
        assert_eq!(integer_prefix("0"), Some(0));
    }

    #[test]
    fn test_float_absent_operand() {
        let line = Line::parse("ESPERAR");
        assert_eq!(line.float(1), None);
        assert_eq!(line.integer(2), None);
    }
}
