use std::rc::Rc;

use crate::console::{Console, NavigationInstruction, Prompted, Screen};
use crate::session::SessionControl;

use super::{MainMenu, Services, report_failure};

/// Entry screen and root of the stack. The only screen that logs users in.
pub struct LoginScreen {
    services: Services,
    control: Rc<SessionControl>,
}

impl LoginScreen {
    pub fn new(services: Services, control: Rc<SessionControl>) -> Self {
        LoginScreen { services, control }
    }
}

impl Screen for LoginScreen {
    fn title(&self) -> &str {
        "login"
    }

    fn run(&mut self, console: &mut Console) -> Prompted<NavigationInstruction> {
        loop {
            if console.choose("confab", &["Log in", "Exit"])? == 1 {
                return Ok(NavigationInstruction::Exit);
            }

            let username = console.read_non_empty_line("Username: ")?;
            let password = console.read_non_empty_line("Password: ")?;

            match self.services.auth.authenticate(&username, &password) {
                Ok(Some(identity)) => {
                    let name = self
                        .services
                        .repo
                        .user(identity.user_id)
                        .map(|user| user.display_name)
                        .unwrap_or_else(|_| identity.username.clone());
                    self.control.set(identity);
                    console.success(format!("Welcome, {}.", name));
                    return Ok(NavigationInstruction::to(MainMenu::new(self.services.clone())));
                }
                Ok(None) => console.failure("Invalid username or password."),
                Err(e) => report_failure(console, "log in", &e),
            }
        }
    }
}
