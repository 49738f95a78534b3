use crate::console::{Console, NavigationInstruction, PaginatedBrowser, Prompted, Screen, recover};
use crate::types::{Channel, ChannelKind, Command, Id, Identity, Message, PageRequest, Role};

use super::{Services, report_failure, read_name};

// ============================================================================
// CHANNEL BROWSER
// ============================================================================

/// Pages through the channels visible to the current user.
pub struct ChannelBrowser {
    services: Services,
}

impl ChannelBrowser {
    pub fn new(services: Services) -> Self {
        ChannelBrowser { services }
    }
}

impl Screen for ChannelBrowser {
    fn title(&self) -> &str {
        "channels"
    }

    fn run(&mut self, console: &mut Console) -> Prompted<NavigationInstruction> {
        let Some(me) = self.services.session.current() else {
            return Ok(NavigationInstruction::Logout);
        };

        let repo = self.services.repo.clone();
        let channel = PaginatedBrowser::new("Channels", me.user_id, move |req: &PageRequest| {
            repo.channel_page(req)
        })
        .browse(console)?;

        Ok(NavigationInstruction::to(ChannelScreen::new(
            self.services.clone(),
            channel.id,
        )))
    }
}

// ============================================================================
// CHANNEL SCREEN
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChannelAction {
    Read,
    Post,
    Join,
    Back,
}

impl ChannelAction {
    fn label(self) -> &'static str {
        match self {
            ChannelAction::Read => "Read messages",
            ChannelAction::Post => "Post message",
            ChannelAction::Join => "Join channel",
            ChannelAction::Back => "Back",
        }
    }
}

/// One channel: read history, post, join. Re-read from the repository on
/// every pass.
pub struct ChannelScreen {
    services: Services,
    channel_id: Id,
}

impl ChannelScreen {
    pub fn new(services: Services, channel_id: Id) -> Self {
        ChannelScreen {
            services,
            channel_id,
        }
    }

    fn actions(
        &self,
        console: &mut Console,
        me: &Identity,
        channel: &Channel,
    ) -> Vec<ChannelAction> {
        // Without a membership answer, no join is offered.
        let member = match self.services.repo.is_member(channel.id, me.user_id) {
            Ok(member) => member,
            Err(e) => {
                report_failure(console, "check membership", &e);
                true
            }
        };
        let joinable = channel.kind == ChannelKind::Public || me.role == Role::Admin;

        let mut actions = vec![ChannelAction::Read, ChannelAction::Post];
        if !member && joinable {
            actions.push(ChannelAction::Join);
        }
        actions.push(ChannelAction::Back);
        actions
    }

    fn read_messages(&self, console: &mut Console, me: &Identity, channel: &Channel) -> Prompted<()> {
        let repo = self.services.repo.clone();
        let title = format!("#{} messages", channel.name);
        let browser = PaginatedBrowser::new(title, me.user_id, move |req: &PageRequest| {
            repo.message_page(req)
        })
        .in_context(channel.id);

        if let Some(message) = recover(browser.browse(console))? {
            show_message(console, &message);
        }
        Ok(())
    }

    fn post_message(&self, console: &mut Console, me: &Identity, channel: &Channel) -> Prompted<()> {
        let Some(body) = recover(console.read_non_empty_line("Message: "))? else {
            return Ok(());
        };
        let command = Command::PostMessage {
            actor: me.user_id,
            channel_id: channel.id,
            body,
        };
        match self.services.repo.execute(&command) {
            Ok(()) => console.success("Message posted."),
            Err(e) => report_failure(console, "post the message", &e),
        }
        Ok(())
    }

    fn join(&self, console: &mut Console, me: &Identity, channel: &Channel) {
        let command = Command::JoinChannel {
            actor: me.user_id,
            channel_id: channel.id,
        };
        match self.services.repo.execute(&command) {
            Ok(()) => console.success(format!("Joined #{}.", channel.name)),
            Err(e) => report_failure(console, "join the channel", &e),
        }
    }
}

fn show_message(console: &mut Console, message: &Message) {
    console.heading(format!("Message {}", message.id));
    console.line(format!(
        "{} <{}>",
        message.sent_at.format("%Y-%m-%d %H:%M"),
        message.author
    ));
    console.line(&message.body);
}

impl Screen for ChannelScreen {
    fn title(&self) -> &str {
        "channel"
    }

    fn run(&mut self, console: &mut Console) -> Prompted<NavigationInstruction> {
        let Some(me) = self.services.session.current() else {
            return Ok(NavigationInstruction::Logout);
        };

        loop {
            let channel = match self.services.repo.channel(self.channel_id) {
                Ok(channel) => channel,
                Err(e) => {
                    report_failure(console, "load the channel", &e);
                    return Ok(NavigationInstruction::Back);
                }
            };

            let actions = self.actions(console, &me, &channel);
            let labels: Vec<&str> = actions.iter().map(|a| a.label()).collect();
            let choice = console.choose(&format!("#{}", channel.name), &labels)?;

            match actions[choice] {
                ChannelAction::Read => self.read_messages(console, &me, &channel)?,
                ChannelAction::Post => self.post_message(console, &me, &channel)?,
                ChannelAction::Join => self.join(console, &me, &channel),
                ChannelAction::Back => return Ok(NavigationInstruction::Back),
            }
        }
    }
}

// ============================================================================
// CREATE CHANNEL FORM
// ============================================================================

/// Name, kind, confirm. Optionally scoped to a project.
pub struct CreateChannelForm {
    services: Services,
    project_id: Option<Id>,
}

impl CreateChannelForm {
    pub fn new(services: Services, project_id: Option<Id>) -> Self {
        CreateChannelForm {
            services,
            project_id,
        }
    }
}

impl Screen for CreateChannelForm {
    fn title(&self) -> &str {
        "create channel"
    }

    fn run(&mut self, console: &mut Console) -> Prompted<NavigationInstruction> {
        let Some(me) = self.services.session.current() else {
            return Ok(NavigationInstruction::Logout);
        };

        console.heading("New channel");
        let name = read_name(console, "Channel name: ")?;
        let kind = match console.choose("Channel kind", &["Public", "Private"])? {
            0 => ChannelKind::Public,
            _ => ChannelKind::Private,
        };

        if !console.read_confirm(&format!("Create {} channel #{}?", kind, name))? {
            console.hint("Nothing created.");
            return Ok(NavigationInstruction::Back);
        }

        let command = Command::CreateChannel {
            actor: me.user_id,
            name: name.clone(),
            kind,
            project_id: self.project_id,
        };
        match self.services.repo.execute(&command) {
            Ok(()) => console.success(format!("Channel #{} created.", name)),
            Err(e) => report_failure(console, "create the channel", &e),
        }
        Ok(NavigationInstruction::Back)
    }
}

// ============================================================================
// TESTS
// ============================================================================
