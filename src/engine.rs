//! Core calculator state machine.
//!
//! Turns a sequence of key presses into a display value, a running total and
//! a transcript of the expression as entered. Evaluation is strictly left to
//! right: each operator press folds the operand typed so far into the running
//! total using the previously pending operator.

use crate::history::HistorySink;
use crate::number::{fold, format_number, parse_operand, ERROR};
use crate::symbol::{Operator, Symbol};
use log::{debug, warn};

/// A finished calculation, emitted once per successful `=`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitEvent {
    /// Human-readable expression, e.g. `"2 + 3 + 4"`.
    pub transcript: String,

    /// Rendered result, e.g. `"9"`.
    pub result: String,
}

/// The complete state of one calculator.
///
/// # Invariants
///
/// - `display` is never empty and never a lone `"-"`
/// - `awaiting_operand` implies `pending_operator.is_some()`
/// - `running_total` is set exactly while an operator is pending
/// - Once `display == "Error"`, the next symbol acts on a cleared state
#[derive(Debug, Clone, PartialEq)]
pub struct EngineState {
    /// Value shown to the user.
    display: String,

    /// Operator waiting for its right-hand operand.
    pending_operator: Option<Operator>,

    /// Operator most recently folded into a result.
    last_applied_operator: Option<Operator>,

    /// Left-hand side accumulated over a chain of operators.
    running_total: Option<f64>,

    /// Display value captured when the pending operator was pressed.
    pending_operand_snapshot: Option<String>,

    /// Expression text entered so far, cleared on commit.
    transcript: String,

    /// Set by `=`; the next entry key starts a fresh number.
    just_committed: bool,

    /// Set by an operator press until the first entry key of the next operand.
    awaiting_operand: bool,
}

impl EngineState {
    /// Creates the initial state: display `"0"`, nothing pending.
    pub fn new() -> Self {
        EngineState {
            display: "0".to_string(),
            pending_operator: None,
            last_applied_operator: None,
            running_total: None,
            pending_operand_snapshot: None,
            transcript: String::new(),
            just_committed: false,
            awaiting_operand: false,
        }
    }

    /// Applies one symbol, returning the successor state and the calculation
    /// committed by this symbol, if any.
    ///
    /// Total and deterministic: every `(state, symbol)` pair has exactly one
    /// successor and nothing outside the returned value changes.
    pub fn apply(&self, symbol: Symbol) -> (EngineState, Option<CommitEvent>) {
        if self.is_error() && symbol != Symbol::AllClear {
            debug!("Display shows {}, clearing before {:?}", ERROR, symbol);
            return EngineState::new().apply(symbol);
        }

        let mut next = self.clone();
        let commit = next.step(symbol);
        (next, commit)
    }

    /// Decodes a button label and applies it.
    ///
    /// Unknown labels leave the state unchanged.
    pub fn apply_label(&self, label: &str) -> (EngineState, Option<CommitEvent>) {
        match Symbol::from_label(label) {
            Some(symbol) => self.apply(symbol),
            None => {
                debug!("Ignoring unknown button label {:?}", label);
                (self.clone(), None)
            }
        }
    }

    /// The value currently shown.
    pub fn display(&self) -> &str {
        &self.display
    }

    /// The pending operator, if one is waiting for an operand.
    pub fn pending_operator(&self) -> Option<Operator> {
        self.pending_operator
    }

    /// Label of the pending operator, or `""`.
    pub fn operator_label(&self) -> &'static str {
        self.pending_operator.map(Operator::label).unwrap_or("")
    }

    /// Operator label and display as one line, e.g. `"× 5"` or `"12"`.
    pub fn readout(&self) -> String {
        match self.pending_operator {
            Some(op) => format!("{} {}", op, self.display),
            None => self.display.clone(),
        }
    }

    /// Expression text of the calculation in progress.
    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    /// The operator most recently folded into a result.
    pub fn last_applied_operator(&self) -> Option<Operator> {
        self.last_applied_operator
    }

    /// Whether the display holds a freshly committed result that may be copied.
    pub fn can_copy_result(&self) -> bool {
        self.just_committed && !self.is_error()
    }

    /// Whether the display shows the `Error` sentinel.
    pub fn is_error(&self) -> bool {
        self.display == ERROR
    }

    fn step(&mut self, symbol: Symbol) -> Option<CommitEvent> {
        match symbol {
            Symbol::Digit(_) | Symbol::Decimal => self.enter(symbol),
            Symbol::Operator(op) => self.press_operator(op),
            Symbol::Equals => return self.equals(),
            Symbol::AllClear => *self = EngineState::new(),
            Symbol::ToggleSign => self.toggle_sign(),
            Symbol::Percent => self.percent(),
            Symbol::Backspace => self.backspace(),
        }
        None
    }

    /// Handles a digit or the decimal point.
    fn enter(&mut self, symbol: Symbol) {
        let Some(ch) = symbol.entry_char() else {
            return;
        };

        if self.just_committed || self.awaiting_operand {
            self.begin_operand();
            self.just_committed = false;
            self.display = ch.to_string();
            return;
        }

        if ch == '.' && self.display.contains('.') {
            debug!("Ignoring second decimal point in {}", self.display);
            return;
        }

        match self.display.as_str() {
            "0" => self.display = ch.to_string(),
            "-0" if ch != '.' => self.display = format!("-{}", ch),
            _ => self.display.push(ch),
        }
    }

    /// Writes the deferred operator into the transcript once the operand after
    /// it actually starts, so a replaced operator never appears.
    fn begin_operand(&mut self) {
        if !self.awaiting_operand {
            return;
        }
        if let Some(op) = self.pending_operator {
            self.transcript.push_str(op.label());
            self.transcript.push(' ');
        }
        self.awaiting_operand = false;
    }

    fn press_operator(&mut self, op: Operator) {
        let Some(operand) = parse_operand(&self.display) else {
            debug!("Ignoring {} while display is {:?}", op, self.display);
            return;
        };

        if self.pending_operator.is_some() && self.awaiting_operand {
            self.pending_operator = Some(op);
            return;
        }

        self.transcript.push_str(&self.display);
        self.transcript.push(' ');

        match (self.running_total, self.pending_operator) {
            (Some(total), Some(previous)) => {
                let folded = fold(previous, total, operand);
                self.last_applied_operator = Some(previous);
                match parse_operand(&folded) {
                    Some(value) => {
                        self.running_total = Some(value);
                        self.display = folded;
                    }
                    None => {
                        self.fail();
                        return;
                    }
                }
            }
            _ => self.running_total = Some(operand),
        }

        self.pending_operator = Some(op);
        self.pending_operand_snapshot = Some(self.display.clone());
        self.awaiting_operand = true;
        self.just_committed = false;
    }

    fn equals(&mut self) -> Option<CommitEvent> {
        let Some(op) = self.pending_operator else {
            debug!("Ignoring = with no pending operator");
            return None;
        };
        let rhs = parse_operand(&self.display)?;
        let lhs = self.running_total.or_else(|| {
            self.pending_operand_snapshot
                .as_deref()
                .and_then(parse_operand)
        })?;

        self.begin_operand();
        self.transcript.push_str(&self.display);

        let result = fold(op, lhs, rhs);
        let transcript = std::mem::take(&mut self.transcript);

        self.display = result.clone();
        self.pending_operator = None;
        self.running_total = None;
        self.pending_operand_snapshot = None;
        self.last_applied_operator = Some(op);
        self.just_committed = true;

        if result == ERROR {
            debug!("{} = {}, not committing", transcript, ERROR);
            return None;
        }

        Some(CommitEvent { transcript, result })
    }

    /// Flips the sign on the text itself, so partial entries such as
    /// `"3."` or `"1.50"` keep their digits.
    fn toggle_sign(&mut self) {
        if self.display == "0" || parse_operand(&self.display).is_none() {
            return;
        }
        self.display = match self.display.strip_prefix('-') {
            Some(magnitude) => magnitude.to_string(),
            None => format!("-{}", self.display),
        };
    }

    fn percent(&mut self) {
        if let Some(value) = parse_operand(&self.display) {
            self.display = format_number(value / 100.0);
        }
    }

    fn backspace(&mut self) {
        self.display.pop();
        if matches!(self.display.as_str(), "" | "-" | "-.") {
            self.display = "0".to_string();
        }
    }

    /// Enters the error state after a failed fold mid-chain.
    fn fail(&mut self) {
        debug!("{} failed, showing {}", self.transcript.trim_end(), ERROR);
        *self = EngineState {
            display: ERROR.to_string(),
            last_applied_operator: self.last_applied_operator,
            ..EngineState::new()
        };
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::new()
    }
}

/// A calculator instance: the current state plus where commits go.
///
/// This is the single writer of its state. Commits are handed to the
/// history sink after the transition has completed; a failing sink is
/// logged and does not affect the calculator.
pub struct Calculator<H> {
    state: EngineState,
    history: H,
}

impl<H: HistorySink> Calculator<H> {
    /// Creates a calculator in the initial state.
    pub fn new(history: H) -> Self {
        Calculator {
            state: EngineState::new(),
            history,
        }
    }

    /// Current engine state, for rendering.
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// The history sink receiving commits.
    pub fn history(&self) -> &H {
        &self.history
    }

    /// Mutable access to the history sink.
    pub fn history_mut(&mut self) -> &mut H {
        &mut self.history
    }

    /// Consumes the calculator, returning its history sink.
    pub fn into_history(self) -> H {
        self.history
    }

    /// Applies a symbol and records any resulting commit.
    pub fn press(&mut self, symbol: Symbol) -> Option<CommitEvent> {
        let (next, commit) = self.state.apply(symbol);
        self.state = next;

        if let Some(commit) = &commit {
            if let Err(e) = self.history.record(commit) {
                warn!(
                    "Failed to record calculation {:?} = {}: {}",
                    commit.transcript, commit.result, e
                );
            }
        }

        commit
    }

    /// Decodes a button label and presses it. Unknown labels are ignored.
    pub fn press_label(&mut self, label: &str) -> Option<CommitEvent> {
        match Symbol::from_label(label) {
            Some(symbol) => self.press(symbol),
            None => {
                debug!("Ignoring unknown button label {:?}", label);
                None
            }
        }
    }

    /// Decodes a keyboard key and presses it. Unmapped keys are ignored.
    pub fn press_key(&mut self, key: char) -> Option<CommitEvent> {
        match Symbol::from_key(key) {
            Some(symbol) => self.press(symbol),
            None => {
                debug!("Ignoring unmapped key {:?}", key);
                None
            }
        }
    }
}
