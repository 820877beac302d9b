//! # Calcy
//!
//! A sequential four-function calculator engine that turns key presses into
//! a display value and records each finished calculation in a history.
//!
//! ## Design Principles
//!
//! - **Pure transitions**: `EngineState::apply` returns a new state and an
//!   optional commit; nothing else is mutated
//! - **Left-to-right evaluation**: `2 + 3 × 4` is `20`, folded at each operator
//! - **Total**: every input in every state has a valid successor; division
//!   by zero shows `Error` instead of failing
//! - **Fire-and-forget history**: commits are handed to a `HistorySink` after
//!   the transition completes
//!
//! ## Example
//!
//! ```
//! use calcy::{Calculator, HistorySource, MemoryHistory};
//!
//! let mut calc = Calculator::new(MemoryHistory::new());
//! for label in ["7", "+", "5", "="] {
//!     calc.press_label(label);
//! }
//! assert_eq!(calc.state().display(), "12");
//! assert_eq!(calc.history().recent().unwrap()[0].operation, "7 + 5");
//! ```

pub mod engine;
pub mod error;
pub mod history;
pub mod number;
pub mod symbol;

pub use engine::{Calculator, CommitEvent, EngineState};
pub use error::{CalcError, Result};
pub use history::{CsvHistory, HistoryEntry, HistorySink, HistorySource, MemoryHistory};
pub use symbol::{Operator, Symbol};
