use crate::console::{Console, NavigationInstruction, Prompted, Screen, recover};

use super::{ChannelBrowser, CreateChannelForm, ProjectList, Services, UserBrowser};

const OPTIONS: [&str; 6] = [
    "Browse channels",
    "Create channel",
    "Projects",
    "Users",
    "Log out",
    "Exit",
];

/// Hub shown after login. Backing out of it logs out.
pub struct MainMenu {
    services: Services,
}

impl MainMenu {
    pub fn new(services: Services) -> Self {
        MainMenu { services }
    }
}

impl Screen for MainMenu {
    fn title(&self) -> &str {
        "main menu"
    }

    fn run(&mut self, console: &mut Console) -> Prompted<NavigationInstruction> {
        let Some(me) = self.services.session.current() else {
            return Ok(NavigationInstruction::Logout);
        };

        let title = format!("Main menu ({})", me.username);
        let Some(choice) = recover(console.choose(&title, &OPTIONS))? else {
            return Ok(NavigationInstruction::Logout);
        };

        let services = self.services.clone();
        Ok(match choice {
            0 => NavigationInstruction::to(ChannelBrowser::new(services)),
            1 => NavigationInstruction::to(CreateChannelForm::new(services, None)),
            2 => NavigationInstruction::to(ProjectList::new(services)),
            3 => NavigationInstruction::to(UserBrowser::new(services)),
            4 => NavigationInstruction::Logout,
            _ => NavigationInstruction::Exit,
        })
    }
}
