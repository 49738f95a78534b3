use tracing::warn;

use crate::console::{
    CandidateSet, Console, NavigationInstruction, PaginatedBrowser, Prompted, Screen, recover,
};
use crate::error::StoreError;
use crate::types::{Command, Id, Identity, Listed, PageRequest, Project, Role, UserSummary};

use super::{ChannelScreen, CreateChannelForm, Services, report_failure, read_name};

fn may_manage(me: &Identity, project: &Project) -> bool {
    project.manager_id == me.user_id || me.role == Role::Admin
}

// ============================================================================
// PROJECT LIST
// ============================================================================

/// All projects, with open and (for managers) create.
pub struct ProjectList {
    services: Services,
}

impl ProjectList {
    pub fn new(services: Services) -> Self {
        ProjectList { services }
    }
}

impl Screen for ProjectList {
    fn title(&self) -> &str {
        "projects"
    }

    fn run(&mut self, console: &mut Console) -> Prompted<NavigationInstruction> {
        let Some(me) = self.services.session.current() else {
            return Ok(NavigationInstruction::Logout);
        };

        let mut options = vec!["Open a project"];
        if me.role.can_manage_projects() {
            options.push("Create project");
        }
        options.push("Back");

        loop {
            let projects = match self.services.repo.list_projects(me.user_id) {
                Ok(projects) => projects,
                Err(e) => {
                    report_failure(console, "load the projects", &e);
                    return Ok(NavigationInstruction::Back);
                }
            };

            console.heading("Projects");
            for project in &projects {
                console.item(project.id(), project.summary());
            }

            match options[console.choose("Project actions", &options)?] {
                "Open a project" => {
                    let Ok(candidates) = CandidateSet::from_records(&projects) else {
                        console.hint("No projects yet.");
                        continue;
                    };
                    let picked = console.read_id_from_candidates("Project id: ", &candidates);
                    if let Some(project_id) = recover(picked)? {
                        return Ok(NavigationInstruction::to(ProjectScreen::new(
                            self.services.clone(),
                            project_id,
                        )));
                    }
                }
                "Create project" => {
                    return Ok(NavigationInstruction::to(CreateProjectForm::new(
                        self.services.clone(),
                    )));
                }
                _ => return Ok(NavigationInstruction::Back),
            }
        }
    }
}

// ============================================================================
// PROJECT SCREEN
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProjectAction {
    Channels,
    NewChannel,
    Reassign,
    Back,
}

impl ProjectAction {
    fn label(self) -> &'static str {
        match self {
            ProjectAction::Channels => "Browse channels",
            ProjectAction::NewChannel => "New project channel",
            ProjectAction::Reassign => "Reassign manager",
            ProjectAction::Back => "Back",
        }
    }
}

/// One project. Re-fetched on every pass so a reassignment shows at once.
pub struct ProjectScreen {
    services: Services,
    project_id: Id,
}

impl ProjectScreen {
    pub fn new(services: Services, project_id: Id) -> Self {
        ProjectScreen {
            services,
            project_id,
        }
    }

    fn show(&self, console: &mut Console, project: &Project) {
        console.heading(&project.name);
        if !project.description.is_empty() {
            console.line(&project.description);
        }
        let manager = self
            .services
            .repo
            .user(project.manager_id)
            .map(|u| u.display_name)
            .unwrap_or_else(|e| {
                warn!(project = project.id, error = %e, "manager lookup failed");
                format!("user {}", project.manager_id)
            });
        console.line(format!("Manager: {}", manager));
    }

    fn browse_channels(
        &self,
        console: &mut Console,
        me: &Identity,
        project: &Project,
    ) -> Prompted<Option<NavigationInstruction>> {
        let repo = self.services.repo.clone();
        let browser = PaginatedBrowser::new(
            format!("{} channels", project.name),
            me.user_id,
            move |req: &PageRequest| repo.project_channel_page(req),
        )
        .in_context(project.id);

        let picked = recover(browser.browse(console))?;
        Ok(picked.map(|channel| {
            NavigationInstruction::to(ChannelScreen::new(self.services.clone(), channel.id))
        }))
    }

    /// Candidates are managers and admins other than the current manager.
    fn candidates(&self, project: &Project) -> Result<Vec<UserSummary>, StoreError> {
        let mut users = self.services.repo.list_users_with_role(Role::Admin)?;
        users.extend(self.services.repo.list_users_with_role(Role::Manager)?);
        users.retain(|u| u.id != project.manager_id);
        users.sort_by_key(|u| u.id);
        Ok(users)
    }

    fn reassign(&self, console: &mut Console, me: &Identity, project: &Project) -> Prompted<()> {
        let users = match self.candidates(project) {
            Ok(users) => users,
            Err(e) => {
                report_failure(console, "load the candidate managers", &e);
                return Ok(());
            }
        };
        let Ok(candidates) = CandidateSet::from_records(&users) else {
            console.hint("No other manager or admin to hand this project to.");
            return Ok(());
        };

        console.heading("New manager");
        for user in &users {
            console.item(user.id(), user.summary());
        }
        let Some(manager_id) = recover(console.read_id_from_candidates("User id: ", &candidates))? else {
            return Ok(());
        };
        if !console.read_confirm(&format!("Hand {} to user {}?", project.name, manager_id))? {
            return Ok(());
        }

        let command = Command::ReassignProject {
            actor: me.user_id,
            project_id: project.id,
            manager_id,
        };
        match self.services.repo.execute(&command) {
            Ok(()) => console.success("Project reassigned."),
            Err(e) => report_failure(console, "reassign the project", &e),
        }
        Ok(())
    }
}

impl Screen for ProjectScreen {
    fn title(&self) -> &str {
        "project"
    }

    fn run(&mut self, console: &mut Console) -> Prompted<NavigationInstruction> {
        let Some(me) = self.services.session.current() else {
            return Ok(NavigationInstruction::Logout);
        };

        loop {
            let project = match self.services.repo.project(self.project_id) {
                Ok(project) => project,
                Err(e) => {
                    report_failure(console, "load the project", &e);
                    return Ok(NavigationInstruction::Back);
                }
            };
            self.show(console, &project);

            let actions = if may_manage(&me, &project) {
                vec![
                    ProjectAction::Channels,
                    ProjectAction::NewChannel,
                    ProjectAction::Reassign,
                    ProjectAction::Back,
                ]
            } else {
                vec![ProjectAction::Channels, ProjectAction::Back]
            };
            let labels: Vec<&str> = actions.iter().map(|a| a.label()).collect();

            match actions[console.choose("Project menu", &labels)?] {
                ProjectAction::Channels => {
                    if let Some(next) = self.browse_channels(console, &me, &project)? {
                        return Ok(next);
                    }
                }
                ProjectAction::NewChannel => {
                    return Ok(NavigationInstruction::to(CreateChannelForm::new(
                        self.services.clone(),
                        Some(project.id),
                    )));
                }
                ProjectAction::Reassign => self.reassign(console, &me, &project)?,
                ProjectAction::Back => return Ok(NavigationInstruction::Back),
            }
        }
    }
}

// ============================================================================
// CREATE PROJECT FORM
// ============================================================================

pub struct CreateProjectForm {
    services: Services,
}

impl CreateProjectForm {
    pub fn new(services: Services) -> Self {
        CreateProjectForm { services }
    }
}

impl Screen for CreateProjectForm {
    fn title(&self) -> &str {
        "create project"
    }

    fn run(&mut self, console: &mut Console) -> Prompted<NavigationInstruction> {
        let Some(me) = self.services.session.current() else {
            return Ok(NavigationInstruction::Logout);
        };

        console.heading("New project");
        let name = read_name(console, "Project name: ")?;
        let description = console.read_raw("Description (optional): ")?;

        if !console.read_confirm(&format!("Create project {}?", name))? {
            console.hint("Nothing created.");
            return Ok(NavigationInstruction::Back);
        }

        let command = Command::CreateProject {
            actor: me.user_id,
            name: name.clone(),
            description: description.trim().to_string(),
        };
        match self.services.repo.execute(&command) {
            Ok(()) => console.success(format!("Project {} created.", name)),
            Err(e) => report_failure(console, "create the project", &e),
        }
        Ok(NavigationInstruction::Back)
    }
}
