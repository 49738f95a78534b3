use crate::console::{Console, NavigationInstruction, PaginatedBrowser, Prompted, Screen, recover};
use crate::types::{Command, Identity, PageRequest, Role, UserSummary};

use super::{Services, report_failure};

/// User directory. Admins can change the role of whoever they pick.
pub struct UserBrowser {
    services: Services,
}

impl UserBrowser {
    pub fn new(services: Services) -> Self {
        UserBrowser { services }
    }

    fn change_role(&self, console: &mut Console, me: &Identity, user: &UserSummary) -> Prompted<()> {
        let labels = ["Admin", "Manager", "Member"];
        let Some(choice) = recover(console.choose(&format!("Change role for {}", user.username), &labels))?
        else {
            return Ok(());
        };
        let role = Role::ALL[choice];

        if !console.read_confirm(&format!("Make {} {}?", user.username, role))? {
            return Ok(());
        }

        let command = Command::ChangeRole {
            actor: me.user_id,
            user_id: user.id,
            role,
        };
        match self.services.repo.execute(&command) {
            Ok(()) => console.success("Role updated."),
            Err(e) => report_failure(console, "change the role", &e),
        }
        Ok(())
    }
}

impl Screen for UserBrowser {
    fn title(&self) -> &str {
        "users"
    }

    fn run(&mut self, console: &mut Console) -> Prompted<NavigationInstruction> {
        let Some(me) = self.services.session.current() else {
            return Ok(NavigationInstruction::Logout);
        };

        loop {
            let repo = self.services.repo.clone();
            let user = PaginatedBrowser::new("Users", me.user_id, move |req: &PageRequest| {
                repo.user_page(req)
            })
            .browse(console)?;

            console.heading(&user.display_name);
            console.line(format!("Username: {}", user.username));
            console.line(format!("Role: {}", user.role));

            if me.role == Role::Admin {
                self.change_role(console, &me, &user)?;
            }
        }
    }
}
