//! Application screens.
//!
//! Each screen is constructed by the screen that navigates to it and holds
//! only the collaborators it needs. Nothing fetched from the repository is
//! kept across runs: every `run` re-reads what it shows.

mod channels;
mod login;
mod menu;
mod projects;
mod users;

use std::rc::Rc;

use tracing::warn;

use crate::console::{Console, Prompted};
use crate::error::StoreError;
use crate::services::{Auth, Repository};
use crate::session::Session;
use crate::types::MAX_NAME_LEN;

pub use channels::{ChannelBrowser, ChannelScreen, CreateChannelForm};
pub use login::LoginScreen;
pub use menu::MainMenu;
pub use projects::{CreateProjectForm, ProjectList, ProjectScreen};
pub use users::UserBrowser;

/// Collaborators shared by every screen.
#[derive(Clone)]
pub struct Services {
    pub auth: Rc<dyn Auth>,
    pub repo: Rc<dyn Repository>,
    pub session: Session,
}

/// Log a collaborator failure and show the one-line notice for it.
fn report_failure(console: &mut Console, action: &str, error: &StoreError) {
    warn!(action, error = %error, "collaborator failure");
    console.failure(format!("Could not {}. Please try again.", action));
}

fn valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().count() <= MAX_NAME_LEN
}

/// Read a channel or project name within the length limit.
fn read_name(console: &mut Console, prompt: &str) -> Prompted<String> {
    let error = format!("Name must be 1 to {} characters.", MAX_NAME_LEN);
    console.read_validated_line(prompt, valid_name, &error)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::{Navigator, Transcript};
    use crate::session::{self, SessionControl};
    use crate::store::{Dataset, MemoryStore};

    struct Harness {
        store: Rc<MemoryStore>,
        session: Session,
        control: Rc<SessionControl>,
    }

    impl Harness {
        fn new() -> Self {
            let store = Rc::new(MemoryStore::in_memory(Dataset::sample().unwrap().0));
            let (session, control) = session::open();
            Harness {
                store,
                session,
                control: Rc::new(control),
            }
        }

        fn services(&self) -> Services {
            Services {
                auth: self.store.clone(),
                repo: self.store.clone(),
                session: self.session.clone(),
            }
        }

        /// Run a whole session from the login screen over `script`.
        fn run(&self, script: &str) -> (Navigator, Transcript) {
            let (mut console, transcript) = Console::scripted(script);
            let hook_control = Rc::clone(&self.control);
            let mut navigator = Navigator::new().on_logout(move || hook_control.clear());
            let root = LoginScreen::new(self.services(), Rc::clone(&self.control));
            navigator.run(Box::new(root), &mut console);
            (navigator, transcript)
        }
    }

    // Main menu: 1 channels, 2 create channel, 3 projects, 4 users, 5 logout, 6 exit

    #[test]
    fn bad_login_then_good_login_then_exit() {
        let harness = Harness::new();
        let (navigator, transcript) = harness.run("1\nana\nwrong\n1\nana\nana\n6\n");

        assert_eq!(navigator.depth(), 0);
        assert_eq!(transcript.count("Invalid username or password."), 1);
        assert_eq!(transcript.count("Welcome, Ana"), 1);
        assert_eq!(harness.session.current().unwrap().username, "ana");
    }

    #[test]
    fn exit_from_login_screen() {
        let harness = Harness::new();
        let (navigator, transcript) = harness.run("2\n");
        assert_eq!(navigator.depth(), 0);
        assert!(!transcript.text().contains("Main menu"));
    }

    #[test]
    fn cancel_on_login_screen_stays_on_root() {
        let harness = Harness::new();
        let (_, transcript) = harness.run("1\n/b\n/b\n2\n");
        assert_eq!(transcript.count("== confab =="), 3);
        assert!(!harness.session.is_authenticated());
    }

    #[test]
    fn logout_clears_session_and_returns_to_login() {
        let harness = Harness::new();
        let (_, transcript) = harness.run("1\nben\nben\n5\n2\n");
        assert!(!harness.session.is_authenticated());
        assert_eq!(transcript.count("== confab =="), 2);
    }

    #[test]
    fn back_from_main_menu_logs_out() {
        let harness = Harness::new();
        harness.run("1\nben\nben\n/b\n2\n");
        assert!(!harness.session.is_authenticated());
    }

    #[test]
    fn cancelled_form_creates_nothing() {
        let harness = Harness::new();
        let (_, transcript) = harness.run("1\nben\nben\n2\ndesign\n/b\n6\n");

        assert!(!harness.store.snapshot().channels.iter().any(|c| c.name == "design"));
        // back on the main menu after the cancel
        assert_eq!(transcript.count("Main menu (ben)"), 2);
    }

    #[test]
    fn completed_form_creates_channel() {
        let harness = Harness::new();
        let (_, transcript) = harness.run("1\nben\nben\n2\ndesign\n2\ny\n6\n");

        let channel = harness
            .store
            .snapshot()
            .channels
            .into_iter()
            .find(|c| c.name == "design")
            .expect("channel created");
        assert_eq!(channel.kind, crate::types::ChannelKind::Private);
        assert_eq!(transcript.count("Channel #design created."), 1);
    }

    #[test]
    fn duplicate_channel_shows_failure_and_returns() {
        let harness = Harness::new();
        let (navigator, transcript) = harness.run("1\nben\nben\n2\ngeneral\n1\ny\n6\n");
        assert_eq!(transcript.count("Could not create the channel."), 1);
        assert_eq!(transcript.count("Main menu (ben)"), 2);
        assert_eq!(navigator.depth(), 0);
    }

    #[test]
    fn message_history_pages_past_the_end_and_back() {
        let harness = Harness::new();
        // channels -> #general (id 1) -> read -> next, next, cancel
        // -> channel menu back -> browser cancel -> exit
        let script = "1\nben\nben\n1\n1\n1\nn\nn\n/b\n3\n/b\n6\n";
        let (navigator, transcript) = harness.run(script);

        assert_eq!(navigator.depth(), 0);
        assert_eq!(transcript.count("No more pages."), 1);
        assert_eq!(transcript.count("== #general messages - page 2 =="), 2);
        assert_eq!(transcript.count("Welcome to confab!"), 2);
    }

    #[test]
    fn posting_a_message_shows_it_first() {
        let harness = Harness::new();
        let script = "1\nben\nben\n1\n1\n2\nhello there\n1\n/b\n/b\n/b\n6\n";
        let (_, transcript) = harness.run(script);

        assert_eq!(transcript.count("Message posted."), 1);
        let text = transcript.text();
        let page = &text[text.find("== #general messages - page 1 ==").unwrap()..];
        let first_item = page.find("  [").unwrap();
        assert!(page[first_item..].starts_with("  [13] "));
        assert!(page.contains("<ben> hello there"));
    }

    #[test]
    fn end_of_input_mid_form_ends_session() {
        let harness = Harness::new();
        let (navigator, _) = harness.run("1\nben\nben\n2\ndesign\n");
        assert_eq!(navigator.depth(), 0);
    }

    #[test]
    fn project_picker_validates_ids() {
        let harness = Harness::new();
        // projects -> open -> bad id, then Apollo (1) -> back -> back -> exit
        let script = "1\nben\nben\n3\n1\n9\n1\n/b\n/b\n6\n";
        let (_, transcript) = harness.run(script);

        assert_eq!(transcript.count("No item with id 9 in this list."), 1);
        assert_eq!(transcript.count("== Apollo =="), 1);
        assert!(transcript.text().contains("Manager: Ana Lima"));
    }

    #[test]
    fn manager_reassigns_project() {
        let harness = Harness::new();
        // ana: projects -> open Apollo -> reassign -> admin (1) -> confirm
        let script = "1\nana\nana\n3\n1\n1\n3\n1\ny\n/b\n/b\n6\n";
        let (_, transcript) = harness.run(script);

        assert_eq!(transcript.count("Project reassigned."), 1);
        assert_eq!(harness.store.project(1).unwrap().manager_id, 1);
    }

    #[test]
    fn admin_changes_a_role_from_user_list() {
        let harness = Harness::new();
        // admin: users -> ben (3) -> role manager (2) -> confirm -> back -> exit
        let script = "1\nadmin\nadmin\n4\n3\n2\ny\n/b\n6\n";
        let (_, transcript) = harness.run(script);

        assert_eq!(transcript.count("Role updated."), 1);
        assert_eq!(
            harness.store.user(3).unwrap().role,
            crate::types::Role::Manager
        );
    }
}
