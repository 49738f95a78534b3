//! Blocking read-and-validate prompts.
//!
//! Each primitive loops until it has a valid value, re-prompting with a
//! warning on bad input. The cancel check happens in `read_raw`, before
//! any parsing, so `/b` typed where a number is expected always cancels.

use std::ops::RangeInclusive;

use super::signal::Prompted;
use super::terminal::Console;

impl Console {
    /// Read a line whose trimmed form is non-empty. Returns it trimmed.
    pub fn read_non_empty_line(&mut self, prompt: &str) -> Prompted<String> {
        loop {
            let line = self.read_raw(prompt)?;
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                return Ok(trimmed.to_string());
            }
            self.warn("Input cannot be empty.");
        }
    }

    /// Read a line until `valid` accepts it, showing `error` otherwise.
    pub fn read_validated_line(
        &mut self,
        prompt: &str,
        valid: impl Fn(&str) -> bool,
        error: &str,
    ) -> Prompted<String> {
        loop {
            let line = self.read_raw(prompt)?;
            let trimmed = line.trim();
            if valid(trimmed) {
                return Ok(trimmed.to_string());
            }
            self.warn(error);
        }
    }

    /// Read an integer.
    pub fn read_int(&mut self, prompt: &str) -> Prompted<i64> {
        loop {
            let line = self.read_raw(prompt)?;
            match line.trim().parse::<i64>() {
                Ok(n) => return Ok(n),
                Err(_) => self.warn("Please enter a number."),
            }
        }
    }

    /// Read an integer within `range` (inclusive).
    pub fn read_int_in_range(&mut self, prompt: &str, range: RangeInclusive<i64>) -> Prompted<i64> {
        loop {
            let n = self.read_int(prompt)?;
            if range.contains(&n) {
                return Ok(n);
            }
            self.warn(format!(
                "Please enter a number between {} and {}.",
                range.start(),
                range.end()
            ));
        }
    }

    /// Ask a yes/no question. Anything but `y`/`yes` is no.
    pub fn read_confirm(&mut self, prompt: &str) -> Prompted<bool> {
        let line = self.read_raw(&format!("{} [y/N] ", prompt))?;
        let answer = line.trim();
        Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
    }

    /// Show a numbered menu and return the 0-based index of the choice.
    ///
    /// # Panics
    /// If `options` is empty: a menu without options is a caller defect.
    pub fn choose(&mut self, title: &str, options: &[&str]) -> Prompted<usize> {
        assert!(!options.is_empty(), "menu {:?} has no options", title);

        self.heading(title);
        for (i, option) in options.iter().enumerate() {
            self.item(i + 1, option);
        }
        self.hint("(/b to go back)");

        let choice = self.read_int_in_range("Choice: ", 1..=options.len() as i64)?;
        Ok(choice as usize - 1)
    }
}

// ============================================================================
// TESTS
// ============================================================================
