#![allow(clippy::self_named_module_files)]

use crate::merge::Choice;
use anyhow::Result;
use std::io::IsTerminal;

pub mod line;
pub mod terminal;

pub use line::LineOperator;
pub use terminal::TerminalOperator;

/// Answer to a prompt, or the operator backing out of it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt<T> {
    Answered(T),
    Cancelled,
}

impl<T> Prompt<T> {
    /// Turn a cancellation into the [`Cancelled`] error so `?` unwinds the session
    ///
    /// # Errors
    ///
    /// Returns [`Cancelled`] when the operator backed out
    pub fn into_result(self) -> Result<T, Cancelled> {
        match self {
            Self::Answered(value) => Ok(value),
            Self::Cancelled => Err(Cancelled),
        }
    }
}

/// Marker for an operator cancellation travelling up through `anyhow`
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Operation cancelled.")]
pub struct Cancelled;

/// What the operator did in the selection prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectAction {
    /// Submitted; names in display order
    Selected(Vec<String>),
    /// Asked to edit the catalog before choosing
    EditRequested,
}

/// Interactive capabilities the sync session needs from whoever drives it
pub trait Operator {
    /// Multi-select over `choices`, pre-checked as given
    ///
    /// # Errors
    ///
    /// Returns an error only for unexpected I/O failures, never for cancellation
    fn select(&mut self, choices: &[Choice], allow_edit: bool) -> Result<Prompt<SelectAction>>;

    /// Yes/no question
    ///
    /// # Errors
    ///
    /// Returns an error only for unexpected I/O failures, never for cancellation
    fn confirm(&mut self, message: &str, default: bool) -> Result<Prompt<bool>>;
}

/// Raw-mode checkbox prompt on a terminal, line prompts otherwise
pub fn default_operator() -> Box<dyn Operator> {
    if std::io::stdin().is_terminal() && std::io::stdout().is_terminal() {
        Box::new(TerminalOperator::new())
    } else {
        Box::new(LineOperator::stdio())
    }
}

/// Keyboard help shown under the selection prompt
pub fn instruction_text(allow_edit: bool) -> &'static str {
    if allow_edit {
        "(Use arrow keys to move, <space> to select, <e> to edit, <a> to toggle, <i> to invert)"
    } else {
        "(Use arrow keys to move, <space> to select, <a> to toggle, <i> to invert)"
    }
}

/// Checked state shared by both prompt styles
#[derive(Debug, Clone)]
pub(crate) struct Checklist {
    pub(crate) checked: Vec<bool>,
}

impl Checklist {
    pub(crate) fn new(choices: &[Choice]) -> Self {
        Self { checked: choices.iter().map(|c| c.checked).collect() }
    }

    pub(crate) fn toggle(&mut self, index: usize) {
        if let Some(flag) = self.checked.get_mut(index) {
            *flag = !*flag;
        }
    }

    /// Check everything, or uncheck everything when all are already checked
    pub(crate) fn toggle_all(&mut self) {
        let target = !self.checked.iter().all(|c| *c);
        self.checked.iter_mut().for_each(|c| *c = target);
    }

    pub(crate) fn invert(&mut self) {
        self.checked.iter_mut().for_each(|c| *c = !*c);
    }

    pub(crate) fn selected(&self, choices: &[Choice]) -> Vec<String> {
        choices
            .iter()
            .zip(&self.checked)
            .filter(|(_, checked)| **checked)
            .map(|(choice, _)| choice.name.clone())
            .collect()
    }
}
