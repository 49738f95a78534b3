//! Who is logged in.
//!
//! One writer, many readers: [`open`] hands out a [`Session`] that any
//! screen may clone and read, and a single [`SessionControl`] that only the
//! login screen and the navigator's logout hook hold. Everything runs on one
//! thread, so plain `Rc<RefCell<_>>` is enough.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::info;

use crate::types::Identity;

/// Read access to the current identity.
#[derive(Debug, Clone)]
pub struct Session {
    current: Rc<RefCell<Option<Identity>>>,
}

/// Write access to the current identity.
#[derive(Debug)]
pub struct SessionControl {
    current: Rc<RefCell<Option<Identity>>>,
}

/// Create an empty session and its single controller.
pub fn open() -> (Session, SessionControl) {
    let current = Rc::new(RefCell::new(None));
    (
        Session {
            current: Rc::clone(&current),
        },
        SessionControl { current },
    )
}

impl Session {
    pub fn current(&self) -> Option<Identity> {
        self.current.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.borrow().is_some()
    }
}

impl SessionControl {
    pub fn set(&self, identity: Identity) {
        info!(user = %identity.username, role = %identity.role, "login");
        *self.current.borrow_mut() = Some(identity);
    }

    pub fn clear(&self) {
        if let Some(previous) = self.current.borrow_mut().take() {
            info!(user = %previous.username, "session cleared");
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
