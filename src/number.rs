//! Numeric token policy: parsing display strings, rendering results and
//! the four-function fold.
//!
//! Values are plain `f64`. Rendering is an explicit policy instead of
//! relying on the float's own formatting: integral values print without a
//! fractional part (exact digits, also outside the 64-bit signed range),
//! everything else prints as the shortest decimal string that round-trips.
//! A result that overflows to infinity renders as the `Error` sentinel.

use crate::symbol::Operator;

/// Display sentinel shown after a failed computation.
pub const ERROR: &str = "Error";

/// Lower bound (inclusive) of the integer rendering range, `-2^63`.
const I64_LOWER: f64 = -9_223_372_036_854_775_808.0;

/// Upper bound (exclusive) of the integer rendering range, `2^63`.
const I64_UPPER: f64 = 9_223_372_036_854_775_808.0;

/// Parses a display token into a finite number.
///
/// Returns `None` for the `Error` sentinel, for a lone `"."` that the user
/// is still typing, and for anything that is not a finite decimal numeral.
///
/// # Examples
///
/// ```
/// use calcy::number::parse_operand;
///
/// assert_eq!(parse_operand("3.5"), Some(3.5));
/// assert_eq!(parse_operand("Error"), None);
/// assert_eq!(parse_operand("."), None);
/// ```
pub fn parse_operand(token: &str) -> Option<f64> {
    // f64's parser also accepts "inf" and "NaN", which are never numerals here.
    if !token
        .bytes()
        .all(|b| b.is_ascii_digit() || b == b'.' || b == b'-')
    {
        return None;
    }
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Renders a number for the display.
///
/// Non-finite values (an overflowing product or sum) render as [`ERROR`].
///
/// # Examples
///
/// ```
/// use calcy::number::format_number;
///
/// assert_eq!(format_number(12.0), "12");
/// assert_eq!(format_number(0.5), "0.5");
/// assert_eq!(format_number(10.0 / 3.0), "3.3333333333333335");
/// ```
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return ERROR.to_string();
    }

    if value.fract() == 0.0 && (I64_LOWER..I64_UPPER).contains(&value) {
        // `as` is exact here: the value is integral and in range. -0.0 becomes 0.
        (value as i64).to_string()
    } else if value.fract() == 0.0 {
        // Display would pad the shortest digits with zeros; print every digit.
        format!("{:.0}", value)
    } else {
        // f64's Display is shortest round-trip and never uses exponent notation.
        value.to_string()
    }
}

/// Applies `op` to `lhs` and `rhs` and renders the result.
///
/// Division by zero yields the [`ERROR`] sentinel. Any operator whose
/// result overflows to infinity does too.
pub fn fold(op: Operator, lhs: f64, rhs: f64) -> String {
    let result = match op {
        Operator::Add => lhs + rhs,
        Operator::Subtract => lhs - rhs,
        Operator::Multiply => lhs * rhs,
        Operator::Divide => {
            if rhs == 0.0 {
                return ERROR.to_string();
            }
            lhs / rhs
        }
    };
    format_number(result)
}
