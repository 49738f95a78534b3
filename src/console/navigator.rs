//! Stack-based screen manager.
//!
//! The navigator owns every active screen and the console. Each turn it
//! runs the top screen and applies the instruction that comes back:
//!
//! ```text
//!   NavigateTo(s) -> push s
//!   Back          -> pop, unless only the root is left
//!   Logout        -> pop down to the root, run the logout hook
//!   Exit          -> clear; the loop ends
//! ```
//!
//! `Exit` is the only way out of [`Navigator::run`].

use tracing::{debug, info};

use super::signal::{NavigationInstruction, Prompted};
use super::terminal::Console;

/// One interactive unit: a menu, a form, or a list view.
///
/// `run` blocks on the console until it can say where to go next. A cancel
/// signal returned from `run` is handed to the navigator as its carried
/// instruction, so a form can simply `?` its prompts. Screens re-fetch what
/// they show on every run; collaborator state may have changed since.
pub trait Screen {
    /// Short name for headings and logs.
    fn title(&self) -> &str;

    fn run(&mut self, console: &mut Console) -> Prompted<NavigationInstruction>;
}

pub struct Navigator {
    stack: Vec<Box<dyn Screen>>,
    on_logout: Option<Box<dyn FnMut()>>,
}

impl Navigator {
    pub fn new() -> Self {
        Navigator {
            stack: Vec::new(),
            on_logout: None,
        }
    }

    /// Run `hook` every time a `Logout` instruction is applied.
    pub fn on_logout(mut self, hook: impl FnMut() + 'static) -> Self {
        self.on_logout = Some(Box::new(hook));
        self
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Title of the active screen, if any.
    pub fn current(&self) -> Option<&str> {
        self.stack.last().map(|screen| screen.title())
    }

    /// Titles from root to top.
    pub fn trail(&self) -> Vec<&str> {
        self.stack.iter().map(|screen| screen.title()).collect()
    }

    /// Push the root screen onto an empty stack.
    pub fn start(&mut self, root: Box<dyn Screen>) {
        self.stack.clear();
        debug!(screen = root.title(), "root screen");
        self.stack.push(root);
    }

    /// Mutate the stack according to `instruction`.
    pub fn apply(&mut self, instruction: NavigationInstruction) {
        match instruction {
            NavigationInstruction::NavigateTo(screen) => {
                debug!(screen = screen.title(), depth = self.stack.len() + 1, "push");
                self.stack.push(screen);
            }
            NavigationInstruction::Back => {
                if self.stack.len() > 1 {
                    if let Some(screen) = self.stack.pop() {
                        debug!(screen = screen.title(), depth = self.stack.len(), "pop");
                    }
                } else {
                    debug!("back at root ignored");
                }
            }
            NavigationInstruction::Logout => {
                self.stack.truncate(1);
                info!("logout");
                if let Some(hook) = self.on_logout.as_mut() {
                    hook();
                }
            }
            NavigationInstruction::Exit => {
                info!(depth = self.stack.len(), "exit");
                self.stack.clear();
            }
        }
    }

    /// Drive the session from `root` until a screen asks to exit.
    pub fn run(&mut self, root: Box<dyn Screen>, console: &mut Console) {
        self.start(root);

        while let Some(screen) = self.stack.last_mut() {
            let instruction = match screen.run(console) {
                Ok(instruction) => instruction,
                Err(signal) => {
                    debug!(screen = screen.title(), "cancelled");
                    signal.into_instruction()
                }
            };
            self.apply(instruction);
        }
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Navigator::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
