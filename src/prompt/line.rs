use super::{Checklist, Operator, Prompt, SelectAction};
use crate::merge::Choice;
use anyhow::{Context, Result};
use std::io::{BufRead, Stdout, StdinLock, Write};

/// Prompts over plain lines of text
///
/// Used when stdin is not a terminal (pipes, scripts, tests). End of input is
/// treated as a cancellation.
pub struct LineOperator<R, W> {
    input: R,
    output: W,
}

impl LineOperator<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> LineOperator<R, W> {
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Next trimmed line, or `None` at end of input
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let read = self.input.read_line(&mut line).context("Failed to read from input")?;
        Ok((read > 0).then(|| line.trim().to_string()))
    }

    fn render(&mut self, choices: &[Choice], list: &Checklist) -> Result<()> {
        for (index, (choice, checked)) in choices.iter().zip(&list.checked).enumerate() {
            let mark = if *checked { "x" } else { " " };
            writeln!(self.output, "  {:>2}) [{mark}] {}", index + 1, choice.label)?;
        }
        write!(self.output, "> ")?;
        self.output.flush()?;
        Ok(())
    }
}

impl<R: BufRead, W: Write> Operator for LineOperator<R, W> {
    fn select(&mut self, choices: &[Choice], allow_edit: bool) -> Result<Prompt<SelectAction>> {
        let mut list = Checklist::new(choices);

        writeln!(self.output, "? Select MCP servers to enable")?;
        writeln!(
            self.output,
            "(Enter numbers to toggle, <a> to toggle all, <i> to invert,{} empty line to confirm, <q> to cancel)",
            if allow_edit { " <e> to edit," } else { "" }
        )?;

        loop {
            self.render(choices, &list)?;
            let Some(line) = self.read_line()? else {
                return Ok(Prompt::Cancelled);
            };

            match line.as_str() {
                "" => return Ok(Prompt::Answered(SelectAction::Selected(list.selected(choices)))),
                "q" => return Ok(Prompt::Cancelled),
                "e" if allow_edit => return Ok(Prompt::Answered(SelectAction::EditRequested)),
                "a" => list.toggle_all(),
                "i" => list.invert(),
                other => {
                    for token in other.split(|c: char| c == ',' || c.is_whitespace()) {
                        if token.is_empty() {
                            continue;
                        }
                        match token.parse::<usize>() {
                            Ok(n) if (1..=choices.len()).contains(&n) => list.toggle(n - 1),
                            _ => writeln!(self.output, "Unknown choice: {token}")?,
                        }
                    }
                },
            }
        }
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<Prompt<bool>> {
        let hint = if default { "(Y/n)" } else { "(y/N)" };

        loop {
            write!(self.output, "? {message} {hint} ")?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                return Ok(Prompt::Cancelled);
            };

            match line.to_ascii_lowercase().as_str() {
                "" => return Ok(Prompt::Answered(default)),
                "y" | "yes" => return Ok(Prompt::Answered(true)),
                "n" | "no" => return Ok(Prompt::Answered(false)),
                _ => writeln!(self.output, "Please answer y or n.")?,
            }
        }
    }
}
