//! Input vocabulary: calculator buttons and keyboard keys.

use std::fmt;

/// One of the four arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// Button label, also used in transcripts and the operator readout.
    pub fn label(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "×",
            Operator::Divide => "÷",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single discrete input to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    /// A digit `0`-`9`.
    Digit(u8),

    /// The decimal point.
    Decimal,

    /// One of the four operator keys.
    Operator(Operator),

    /// `=`: resolves the pending operator and commits the calculation.
    Equals,

    /// `AC`: resets the engine to its initial state.
    AllClear,

    /// `+/-`: negates the displayed value.
    ToggleSign,

    /// `%`: divides the displayed value by 100.
    Percent,

    /// Removes the last character of the display.
    Backspace,
}

impl Symbol {
    /// Decodes a calculator button label.
    ///
    /// Returns `None` for labels outside the button vocabulary.
    ///
    /// # Examples
    ///
    /// ```
    /// use calcy::{Operator, Symbol};
    ///
    /// assert_eq!(Symbol::from_label("×"), Some(Symbol::Operator(Operator::Multiply)));
    /// assert_eq!(Symbol::from_label("AC"), Some(Symbol::AllClear));
    /// assert_eq!(Symbol::from_label("sqrt"), None);
    /// ```
    pub fn from_label(label: &str) -> Option<Symbol> {
        let label = label.trim();

        let symbol = match label {
            "." => Symbol::Decimal,
            "+" => Symbol::Operator(Operator::Add),
            "-" | "−" => Symbol::Operator(Operator::Subtract),
            "×" | "*" | "x" => Symbol::Operator(Operator::Multiply),
            "÷" | "/" => Symbol::Operator(Operator::Divide),
            "=" => Symbol::Equals,
            "+/-" | "±" => Symbol::ToggleSign,
            "%" => Symbol::Percent,
            "⌫" => Symbol::Backspace,
            _ if label.eq_ignore_ascii_case("ac") => Symbol::AllClear,
            _ if label.eq_ignore_ascii_case("backspace") => Symbol::Backspace,
            _ => return single_digit(label),
        };

        Some(symbol)
    }

    /// Decodes a keyboard key.
    ///
    /// Digits and `.` map directly, `+ - * /` map to the operators,
    /// Enter or `=` to equals, Backspace/Delete to backspace and `c`/`C`
    /// to all-clear. Every other key is ignored.
    pub fn from_key(key: char) -> Option<Symbol> {
        match key {
            '0'..='9' => Some(Symbol::Digit(key as u8 - b'0')),
            '.' => Some(Symbol::Decimal),
            '+' => Some(Symbol::Operator(Operator::Add)),
            '-' => Some(Symbol::Operator(Operator::Subtract)),
            '*' => Some(Symbol::Operator(Operator::Multiply)),
            '/' => Some(Symbol::Operator(Operator::Divide)),
            '=' | '\r' | '\n' => Some(Symbol::Equals),
            '\u{8}' | '\u{7f}' => Some(Symbol::Backspace),
            'c' | 'C' => Some(Symbol::AllClear),
            _ => None,
        }
    }

    /// The character this symbol appends to the display, if it is an entry key.
    pub(crate) fn entry_char(self) -> Option<char> {
        match self {
            Symbol::Digit(d) => char::from_digit(u32::from(d), 10),
            Symbol::Decimal => Some('.'),
            _ => None,
        }
    }
}

fn single_digit(label: &str) -> Option<Symbol> {
    let mut chars = label.chars();
    match (chars.next(), chars.next()) {
        (Some(c @ '0'..='9'), None) => Some(Symbol::Digit(c as u8 - b'0')),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_labels() {
        assert_eq!(Symbol::from_label("0"), Some(Symbol::Digit(0)));
        assert_eq!(Symbol::from_label("7"), Some(Symbol::Digit(7)));
        assert_eq!(Symbol::from_label("12"), None);
    }

    #[test]
    fn test_operator_labels_and_aliases() {
        assert_eq!(
            Symbol::from_label("÷"),
            Some(Symbol::Operator(Operator::Divide))
        );
        assert_eq!(
            Symbol::from_label("/"),
            Some(Symbol::Operator(Operator::Divide))
        );
        assert_eq!(
            Symbol::from_label("−"),
            Some(Symbol::Operator(Operator::Subtract))
        );
        assert_eq!(
            Symbol::from_label("*"),
            Some(Symbol::Operator(Operator::Multiply))
        );
    }

    #[test]
    fn test_function_labels() {
        assert_eq!(Symbol::from_label("  ac "), Some(Symbol::AllClear));
        assert_eq!(Symbol::from_label("+/-"), Some(Symbol::ToggleSign));
        assert_eq!(Symbol::from_label("%"), Some(Symbol::Percent));
        assert_eq!(Symbol::from_label("Backspace"), Some(Symbol::Backspace));
        assert_eq!(Symbol::from_label("="), Some(Symbol::Equals));
    }

    #[test]
    fn test_unknown_labels() {
        assert_eq!(Symbol::from_label(""), None);
        assert_eq!(Symbol::from_label("^"), None);
        assert_eq!(Symbol::from_label("Error"), None);
    }

    #[test]
    fn test_keyboard_table() {
        assert_eq!(Symbol::from_key('4'), Some(Symbol::Digit(4)));
        assert_eq!(
            Symbol::from_key('*'),
            Some(Symbol::Operator(Operator::Multiply))
        );
        assert_eq!(Symbol::from_key('\r'), Some(Symbol::Equals));
        assert_eq!(Symbol::from_key('\n'), Some(Symbol::Equals));
        assert_eq!(Symbol::from_key('\u{7f}'), Some(Symbol::Backspace));
        assert_eq!(Symbol::from_key('\u{8}'), Some(Symbol::Backspace));
        assert_eq!(Symbol::from_key('C'), Some(Symbol::AllClear));
        assert_eq!(Symbol::from_key('%'), None);
        assert_eq!(Symbol::from_key(' '), None);
    }

    #[test]
    fn test_operator_labels() {
        assert_eq!(Operator::Multiply.to_string(), "×");
        assert_eq!(Operator::Subtract.label(), "-");
    }
}
