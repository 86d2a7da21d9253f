//! Decimal digit handling for cell values
//!
//! Sheets written on Japanese systems often use full-width digits
//! (`１２`), so any Unicode decimal digit is accepted, not just ASCII.

use regex::Regex;
use std::sync::OnceLock;

static DECIMAL_DIGIT: OnceLock<Regex> = OnceLock::new();

fn is_decimal_digit(c: char) -> bool {
    let re = DECIMAL_DIGIT.get_or_init(|| Regex::new(r"^\d$").expect("digit pattern is valid"));
    let mut buf = [0u8; 4];
    re.is_match(c.encode_utf8(&mut buf))
}

/// Numeric value of a Unicode decimal digit.
///
/// Decimal digits always come in contiguous runs ordered 0 to 9, so the
/// value is the distance from the start of the run, modulo 10.
pub fn digit_value(c: char) -> Option<u32> {
    if let Some(d) = c.to_digit(10) {
        return Some(d);
    }
    if !is_decimal_digit(c) {
        return None;
    }

    let mut offset = 0;
    let mut code = c as u32;
    while let Some(prev) = code.checked_sub(1).and_then(char::from_u32) {
        if !is_decimal_digit(prev) {
            break;
        }
        offset += 1;
        code -= 1;
    }
    Some(offset % 10)
}

/// Parses a non-empty run of decimal digits; `None` on any other character
/// or on `u32` overflow
pub fn parse_decimal(s: &str) -> Option<u32> {
    if s.is_empty() {
        return None;
    }
    s.chars().try_fold(0u32, |acc, c| {
        acc.checked_mul(10)?.checked_add(digit_value(c)?)
    })
}
