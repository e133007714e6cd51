use std::io::{self, BufRead, Write};
use std::str::FromStr;

use anyhow::Result;
use bigdecimal::BigDecimal;
use thiserror::Error;

use crate::models::HOURS_SCALE;

#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("{0} is not a valid number. Try again.")]
    InvalidNumber(String),
    #[error("{0} is not a valid decimal. Try again.")]
    InvalidDecimal(String),
    #[error("{0} has more than two decimal places. Try again.")]
    TooPrecise(String),
    #[error("A value is required for {0}.")]
    Required(&'static str),
}

/// Trimmed text, or `None` for a blank line.
pub fn parse_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub fn parse_int(raw: &str) -> Result<Option<i32>, InputError> {
    parse_text(raw)
        .map(|text| text.parse::<i32>().map_err(|_| InputError::InvalidNumber(text)))
        .transpose()
}

/// Largest number of digits accepted before the decimal point.
const MAX_INTEGER_DIGITS: i64 = 9;

/// Parses a decimal and sets its scale to two places. Values that would
/// need rounding are rejected rather than silently changed.
pub fn parse_decimal(raw: &str) -> Result<Option<BigDecimal>, InputError> {
    let Some(text) = parse_text(raw) else {
        return Ok(None);
    };

    let value = BigDecimal::from_str(&text)
        .map_err(|_| InputError::InvalidDecimal(text.clone()))?
        .normalized();
    let (_, scale) = value.as_bigint_and_exponent();
    if scale > HOURS_SCALE {
        return Err(InputError::TooPrecise(text));
    }

    // Rescaling a huge exponent would materialize every digit.
    if value.digits() as i64 - scale > MAX_INTEGER_DIGITS {
        return Err(InputError::InvalidDecimal(text));
    }

    Ok(Some(value.with_scale(HOURS_SCALE)))
}

pub fn required<T>(value: Option<T>, field: &'static str) -> Result<T, InputError> {
    value.ok_or(InputError::Required(field))
}

/// Line-based prompts over any reader and writer.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    /// Prints `prompt` and reads one line. End of input reads as blank.
    /// Bytes that are not UTF-8 are replaced rather than failing the read.
    pub fn string_input(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}: ")?;
        self.output.flush()?;

        let mut line = Vec::new();
        self.input.read_until(b'\n', &mut line)?;
        Ok(parse_text(&String::from_utf8_lossy(&line)))
    }

    pub fn int_input(&mut self, prompt: &str) -> Result<Option<i32>> {
        let line = self.string_input(prompt)?;
        Ok(parse_int(line.as_deref().unwrap_or_default())?)
    }

    pub fn decimal_input(&mut self, prompt: &str) -> Result<Option<BigDecimal>> {
        let line = self.string_input(prompt)?;
        Ok(parse_decimal(line.as_deref().unwrap_or_default())?)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn test_parse_text_trims_and_blanks() {
        assert_eq!(parse_text("  Shelf \n"), Some("Shelf".to_string()));
        assert_eq!(parse_text("   \n"), None);
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int(" 42\n"), Ok(Some(42)));
        assert_eq!(parse_int(""), Ok(None));
        assert_eq!(
            parse_int("four"),
            Err(InputError::InvalidNumber("four".into()))
        );
        assert_eq!(
            InputError::InvalidNumber("four".into()).to_string(),
            "four is not a valid number. Try again."
        );
    }

    #[test]
    fn test_parse_decimal_sets_scale() {
        let value = parse_decimal("7.5").unwrap().unwrap();
        assert_eq!(value.to_string(), "7.50");

        let value = parse_decimal("3.500").unwrap().unwrap();
        assert_eq!(value.to_string(), "3.50");

        assert_eq!(parse_decimal(" "), Ok(None));
    }

    #[test]
    fn test_parse_decimal_rejects_bad_input() {
        assert_eq!(
            parse_decimal("abc"),
            Err(InputError::InvalidDecimal("abc".into()))
        );
        assert_eq!(
            parse_decimal("1.234"),
            Err(InputError::TooPrecise("1.234".into()))
        );
    }

    #[test]
    fn test_parse_decimal_rejects_huge_magnitudes() {
        assert_eq!(
            parse_decimal("1e99999999"),
            Err(InputError::InvalidDecimal("1e99999999".into()))
        );
        assert_eq!(
            parse_decimal("12345678901"),
            Err(InputError::InvalidDecimal("12345678901".into()))
        );
        assert_eq!(parse_decimal("1e3").unwrap().unwrap().to_string(), "1000.00");
    }

    #[test]
    fn test_console_replaces_invalid_utf8() {
        let mut output = Vec::new();
        let mut console = Console::new(Cursor::new(b"\xff\xfeOak\n7\n".to_vec()), &mut output);

        assert_eq!(
            console.string_input("Notes").unwrap(),
            Some("\u{FFFD}\u{FFFD}Oak".to_string())
        );
        assert_eq!(console.int_input("Pick").unwrap(), Some(7));
    }

    #[test]
    fn test_required() {
        assert_eq!(required(Some(3), "difficulty"), Ok(3));
        assert_eq!(
            required::<i32>(None, "difficulty"),
            Err(InputError::Required("difficulty"))
        );
    }

    #[test]
    fn test_console_prompts_and_reads() {
        let mut output = Vec::new();
        let mut console = Console::new(Cursor::new("12\n\n"), &mut output);

        assert_eq!(console.int_input("Pick").unwrap(), Some(12));
        assert_eq!(console.string_input("Name").unwrap(), None);
        assert_eq!(console.string_input("After end").unwrap(), None);

        let printed = String::from_utf8(output).unwrap();
        assert_eq!(printed, "Pick: Name: After end: ");
    }
}
