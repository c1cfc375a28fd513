use super::{instruction_text, Checklist, Operator, Prompt, SelectAction};
use crate::merge::Choice;
use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::{cursor, queue, style, terminal};
use std::io::{Stdout, Write};
use std::ops::Range;

/// Rows kept free under the list so the last `\r\n` never scrolls the screen
const RESERVED_ROWS: u16 = 2;

/// Checkbox prompt drawn on the terminal in raw mode
///
/// Ctrl+C and Ctrl+D arrive as key presses while raw mode is on, so an
/// interrupt ends the prompt as a cancellation instead of killing the process.
pub struct TerminalOperator {
    out: Stdout,
    drawn: u16,
}

impl Default for TerminalOperator {
    fn default() -> Self {
        Self::new()
    }
}

/// Restores cooked mode on every exit path
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> Result<Self> {
        terminal::enable_raw_mode().context("Failed to enable raw terminal mode")?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

enum Key {
    Up,
    Down,
    Toggle,
    ToggleAll,
    Invert,
    Edit,
    Yes,
    No,
    Submit,
    Cancel,
    Other,
}

fn classify(key: KeyEvent) -> Key {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c' | 'd') if ctrl => Key::Cancel,
        KeyCode::Esc => Key::Cancel,
        KeyCode::Up | KeyCode::Char('k') => Key::Up,
        KeyCode::Down | KeyCode::Char('j') => Key::Down,
        KeyCode::Char(' ') => Key::Toggle,
        KeyCode::Char('a') => Key::ToggleAll,
        KeyCode::Char('i') => Key::Invert,
        KeyCode::Char('e') => Key::Edit,
        KeyCode::Char('y' | 'Y') => Key::Yes,
        KeyCode::Char('n' | 'N') => Key::No,
        KeyCode::Enter => Key::Submit,
        _ => Key::Other,
    }
}

fn next_key() -> Result<Key> {
    loop {
        if let Event::Key(key) = event::read().context("Failed to read terminal event")? {
            if key.kind == KeyEventKind::Press {
                return Ok(classify(key));
            }
        }
    }
}

impl TerminalOperator {
    pub fn new() -> Self {
        Self { out: std::io::stdout(), drawn: 0 }
    }

    /// Replace the previously drawn block with `lines`
    ///
    /// Each line is assumed to fit the terminal width; wrapped lines are not counted.
    fn redraw(&mut self, lines: &[String]) -> Result<()> {
        if self.drawn > 0 {
            queue!(self.out, cursor::MoveUp(self.drawn))?;
        }
        queue!(
            self.out,
            cursor::MoveToColumn(0),
            terminal::Clear(terminal::ClearType::FromCursorDown)
        )?;
        for line in lines {
            queue!(self.out, style::Print(line), style::Print("\r\n"))?;
        }
        self.out.flush()?;
        self.drawn = u16::try_from(lines.len()).unwrap_or(u16::MAX);
        Ok(())
    }

    /// Header plus the rows of `choices` that fit in `capacity`
    fn select_lines(
        choices: &[Choice],
        list: &Checklist,
        position: usize,
        allow_edit: bool,
        capacity: usize,
    ) -> Vec<String> {
        let window = visible_window(choices.len(), position, capacity);
        let mut lines = Vec::with_capacity(window.len() + 1);

        let mut header = format!("? Select MCP servers to enable {}", instruction_text(allow_edit));
        if window.len() < choices.len() {
            header.push_str(&format!(" [{}-{} of {}]", window.start + 1, window.end, choices.len()));
        }
        lines.push(header);

        let rows = choices.iter().zip(&list.checked).enumerate();
        for (index, (choice, checked)) in rows.skip(window.start).take(window.len()) {
            let pointer = if index == position { "»" } else { " " };
            let mark = if *checked { "●" } else { "○" };
            lines.push(format!(" {pointer} {mark} {}", choice.label));
        }
        lines
    }

    fn finish(&mut self, summary: &str) -> Result<()> {
        self.redraw(&[summary.to_string()])?;
        self.drawn = 0;
        Ok(())
    }
}

/// Choice rows that fit on screen under the header
fn list_capacity() -> usize {
    let rows = terminal::size().map_or(24, |(_, rows)| rows);
    usize::from(rows.saturating_sub(RESERVED_ROWS + 1)).max(1)
}

/// Slice of `len` rows to show so that `position` stays on screen
fn visible_window(len: usize, position: usize, capacity: usize) -> Range<usize> {
    let capacity = capacity.max(1);
    if len <= capacity {
        return 0..len;
    }
    let start = (position + 1).saturating_sub(capacity).min(len - capacity);
    start..start + capacity
}

impl Operator for TerminalOperator {
    fn select(&mut self, choices: &[Choice], allow_edit: bool) -> Result<Prompt<SelectAction>> {
        if choices.is_empty() {
            return Ok(Prompt::Answered(SelectAction::Selected(Vec::new())));
        }

        let mut list = Checklist::new(choices);
        let mut position = 0_usize;
        let last = choices.len() - 1;

        let guard = RawModeGuard::enable()?;
        self.drawn = 0;

        let outcome = loop {
            let capacity = list_capacity();
            self.redraw(&Self::select_lines(choices, &list, position, allow_edit, capacity))?;

            match next_key()? {
                Key::Up => position = if position == 0 { last } else { position - 1 },
                Key::Down => position = if position == last { 0 } else { position + 1 },
                Key::Toggle => list.toggle(position),
                Key::ToggleAll => list.toggle_all(),
                Key::Invert => list.invert(),
                Key::Edit if allow_edit => break Prompt::Answered(SelectAction::EditRequested),
                Key::Submit => {
                    break Prompt::Answered(SelectAction::Selected(list.selected(choices)))
                },
                Key::Cancel => break Prompt::Cancelled,
                Key::Edit | Key::Yes | Key::No | Key::Other => {},
            }
        };

        let summary = match &outcome {
            Prompt::Answered(SelectAction::Selected(names)) => {
                format!("? Select MCP servers to enable  done ({} selected)", names.len())
            },
            Prompt::Answered(SelectAction::EditRequested) => {
                "? Select MCP servers to enable  (edit requested)".to_string()
            },
            Prompt::Cancelled => "? Select MCP servers to enable  cancelled".to_string(),
        };
        self.finish(&summary)?;
        drop(guard);

        Ok(outcome)
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<Prompt<bool>> {
        let hint = if default { "(Y/n)" } else { "(y/N)" };
        let guard = RawModeGuard::enable()?;
        self.drawn = 0;
        self.redraw(&[format!("? {message} {hint}")])?;

        let outcome = loop {
            match next_key()? {
                Key::Yes => break Prompt::Answered(true),
                Key::No => break Prompt::Answered(false),
                Key::Submit => break Prompt::Answered(default),
                Key::Cancel => break Prompt::Cancelled,
                _ => {},
            }
        };

        let answer = match outcome {
            Prompt::Answered(true) => "Yes",
            Prompt::Answered(false) => "No",
            Prompt::Cancelled => "cancelled",
        };
        self.finish(&format!("? {message} {answer}"))?;
        drop(guard);

        Ok(outcome)
    }
}
