//! Navigation outcomes and the cooperative cancel signal.
//!
//! A screen yields a [`NavigationInstruction`]; a prompt that reads a
//! reserved cancel token yields a [`CancelSignal`] instead of a value.
//! Prompts return [`Prompted<T>`], so `?` unwinds a multi-step form up to
//! whichever caller handles the signal, without threading flags.

use std::fmt;

use super::navigator::Screen;

/// What the navigator should do after a screen finishes.
pub enum NavigationInstruction {
    /// Push a freshly constructed screen.
    NavigateTo(Box<dyn Screen>),
    /// Pop the current screen, unless it is the root.
    Back,
    /// Pop down to the root screen.
    Logout,
    /// Clear the stack and end the session.
    Exit,
}

impl NavigationInstruction {
    pub fn to(screen: impl Screen + 'static) -> Self {
        NavigationInstruction::NavigateTo(Box::new(screen))
    }

    pub fn is_back(&self) -> bool {
        matches!(self, NavigationInstruction::Back)
    }

    pub fn is_exit(&self) -> bool {
        matches!(self, NavigationInstruction::Exit)
    }
}

impl fmt::Debug for NavigationInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationInstruction::NavigateTo(screen) => {
                f.debug_tuple("NavigateTo").field(&screen.title()).finish()
            }
            NavigationInstruction::Back => f.write_str("Back"),
            NavigationInstruction::Logout => f.write_str("Logout"),
            NavigationInstruction::Exit => f.write_str("Exit"),
        }
    }
}

/// Control value raised by a prompt instead of a parsed input.
///
/// Not an error: it carries the instruction the nearest screen boundary
/// should hand to the navigator. Defaults to [`NavigationInstruction::Back`].
#[derive(Debug)]
pub struct CancelSignal {
    instruction: NavigationInstruction,
}

impl CancelSignal {
    /// The user typed a cancel token.
    pub fn back() -> Self {
        CancelSignal {
            instruction: NavigationInstruction::Back,
        }
    }

    /// The input source is exhausted; nothing more can be read.
    pub fn exit() -> Self {
        CancelSignal {
            instruction: NavigationInstruction::Exit,
        }
    }

    pub fn instruction(&self) -> &NavigationInstruction {
        &self.instruction
    }

    pub fn into_instruction(self) -> NavigationInstruction {
        self.instruction
    }

    /// Whether this is a plain user cancel (as opposed to end of input).
    pub fn is_back(&self) -> bool {
        self.instruction.is_back()
    }
}

impl Default for CancelSignal {
    fn default() -> Self {
        CancelSignal::back()
    }
}

impl From<CancelSignal> for NavigationInstruction {
    fn from(signal: CancelSignal) -> Self {
        signal.instruction
    }
}

/// Outcome of any blocking prompt: a value, or a cancel to unwind with.
pub type Prompted<T> = Result<T, CancelSignal>;

/// Absorb a user cancel so the caller can resume its own loop.
///
/// `Ok(None)` if the user backed out; any other signal (end of input,
/// logout) keeps propagating.
pub fn recover<T>(result: Prompted<T>) -> Prompted<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(signal) if signal.is_back() => Ok(None),
        Err(signal) => Err(signal),
    }
}

// ============================================================================
// TESTS
// ============================================================================
