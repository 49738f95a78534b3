//! JSON-file-backed store implementing [`Auth`] and [`Repository`].
//!
//! Stands in for the stored-procedure database: it answers paged queries,
//! enforces the business rules on every [`Command`], and rewrites the
//! dataset file after each successful mutation.
//!
//! Structure:
//! - Pure functions: visibility, paging, rule checks against a `Dataset`
//! - Effect functions: dataset file I/O

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::credentials::{digest_password, generate_salt, verify_password};
use crate::error::StoreError;
use crate::services::{Auth, Repository};
use crate::types::{
    Channel, ChannelKind, Command, Id, Identity, MAX_NAME_LEN, Message, PageRequest, PasswordDigest, Project,
    Role, UserSummary,
};

/// Current dataset format version.
const DATASET_VERSION: u32 = 1;

// ============================================================================
// DATASET
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: Id,
    pub username: String,
    pub display_name: String,
    pub role: Role,
    pub salt: String,
    pub digest: PasswordDigest,
}

impl UserRecord {
    /// # Errors
    /// If no salt can be drawn from the OS random source.
    pub fn new(
        id: Id,
        username: &str,
        display_name: &str,
        role: Role,
        password: &str,
    ) -> Result<Self, StoreError> {
        let salt = generate_salt()?;
        let digest = digest_password(&salt, password);
        Ok(UserRecord {
            id,
            username: username.to_string(),
            display_name: display_name.to_string(),
            role,
            salt,
            digest,
        })
    }

    fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone(),
            display_name: self.display_name.clone(),
            role: self.role,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub channel_id: Id,
    pub user_id: Id,
}

/// Everything the store knows, as written to disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub version: u32,
    #[serde(default)]
    pub users: Vec<UserRecord>,
    #[serde(default)]
    pub channels: Vec<Channel>,
    #[serde(default)]
    pub memberships: Vec<Membership>,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub projects: Vec<Project>,
}

/// Login shown to the operator after seeding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleLogin {
    pub username: String,
    pub password: String,
    pub role: Role,
}

impl Dataset {
    /// A small dataset to explore the app with, plus its logins.
    ///
    /// `#general` holds twelve messages so its history spans two pages.
    pub fn sample() -> Result<(Dataset, Vec<SampleLogin>), StoreError> {
        let people = [
            (1, "admin", "Administrator", Role::Admin),
            (2, "ana", "Ana Lima", Role::Manager),
            (3, "ben", "Ben Okafor", Role::Member),
            (4, "chloe", "Chloe Martin", Role::Member),
        ];

        let users: Vec<UserRecord> = people
            .iter()
            .map(|&(id, name, display, role)| UserRecord::new(id, name, display, role, name))
            .collect::<Result<_, _>>()?;
        let logins = people
            .iter()
            .map(|&(_, name, _, role)| SampleLogin {
                username: name.to_string(),
                password: name.to_string(),
                role,
            })
            .collect();

        let projects = vec![
            Project {
                id: 1,
                name: "Apollo".into(),
                description: "Customer portal rewrite".into(),
                manager_id: 2,
            },
            Project {
                id: 2,
                name: "Hermes".into(),
                description: "Notification delivery".into(),
                manager_id: 1,
            },
        ];

        let channel = |id, name: &str, kind, project_id, created_by| Channel {
            id,
            name: name.to_string(),
            kind,
            project_id,
            created_by,
        };
        let channels = vec![
            channel(1, "general", ChannelKind::Public, None, 1),
            channel(2, "random", ChannelKind::Public, None, 1),
            channel(3, "leads", ChannelKind::Private, None, 1),
            channel(4, "apollo-dev", ChannelKind::Public, Some(1), 2),
            channel(5, "apollo-planning", ChannelKind::Private, Some(1), 2),
        ];

        let memberships = [(1, 1), (1, 2), (1, 3), (1, 4), (2, 3), (3, 1), (3, 2), (4, 2), (4, 3), (5, 2)]
            .into_iter()
            .map(|(channel_id, user_id)| Membership { channel_id, user_id })
            .collect();

        let start = Utc::now() - Duration::hours(6);
        let lines = [
            (1, "Welcome to confab!"),
            (2, "Morning all."),
            (3, "Has anyone seen the deploy notes?"),
            (2, "They're pinned in #leads, I'll copy them over."),
            (4, "Thanks Ana."),
            (3, "Standup in ten."),
            (1, "Reminder: maintenance window tonight."),
            (4, "Is the VPN down for anyone else?"),
            (3, "Works for me."),
            (4, "Fixed it, was my config."),
            (2, "Apollo demo moved to Thursday."),
            (1, "Have a good weekend."),
        ];
        let messages = lines
            .iter()
            .enumerate()
            .map(|(i, &(author_id, body))| Message {
                id: i as Id + 1,
                channel_id: 1,
                author_id,
                author: String::new(),
                body: body.to_string(),
                sent_at: start + Duration::minutes(i as i64 * 15),
            })
            .collect();

        let dataset = Dataset {
            version: DATASET_VERSION,
            users,
            channels,
            memberships,
            messages,
            projects,
        };
        Ok((dataset, logins))
    }

    fn user_record(&self, id: Id) -> Result<&UserRecord, StoreError> {
        self.users
            .iter()
            .find(|u| u.id == id)
            .ok_or(StoreError::NotFound { entity: "user", id })
    }

    fn channel(&self, id: Id) -> Result<&Channel, StoreError> {
        self.channels
            .iter()
            .find(|c| c.id == id)
            .ok_or(StoreError::NotFound { entity: "channel", id })
    }

    fn project(&self, id: Id) -> Result<&Project, StoreError> {
        self.projects
            .iter()
            .find(|p| p.id == id)
            .ok_or(StoreError::NotFound { entity: "project", id })
    }

    fn is_member(&self, channel_id: Id, user_id: Id) -> bool {
        self.memberships
            .iter()
            .any(|m| m.channel_id == channel_id && m.user_id == user_id)
    }

    /// Public channels are visible to everyone; private ones to members.
    fn visible_to(&self, channel: &Channel, viewer: Id) -> bool {
        channel.kind == ChannelKind::Public || self.is_member(channel.id, viewer)
    }

    fn username(&self, id: Id) -> String {
        self.user_record(id)
            .map(|u| u.username.clone())
            .unwrap_or_else(|_| format!("user#{}", id))
    }
}

// ============================================================================
// PURE FUNCTIONS (Queries and rules)
// ============================================================================

/// Slice one page out of an already ordered list.
fn page_of<T>(items: Vec<T>, request: &PageRequest) -> Vec<T> {
    items
        .into_iter()
        .skip(request.offset())
        .take(request.page_size as usize)
        .collect()
}

fn next_id(ids: impl Iterator<Item = Id>) -> Id {
    ids.max().unwrap_or(0) + 1
}

fn require_context(request: &PageRequest, what: &str) -> Result<Id, StoreError> {
    request
        .context_id
        .ok_or_else(|| StoreError::rejected(format!("{} listing needs a context id", what)))
}

fn sorted_channels<'a>(channels: impl Iterator<Item = &'a Channel>) -> Vec<Channel> {
    let mut out: Vec<Channel> = channels.cloned().collect();
    out.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()).then(a.id.cmp(&b.id)));
    out
}

/// Validate a channel or project name, returning it trimmed.
fn clean_name(name: &str, taken: impl Iterator<Item = String>, what: &str) -> Result<String, StoreError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(StoreError::rejected(format!("{} name cannot be empty", what)));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(StoreError::rejected(format!(
            "{} name longer than {} characters",
            what, MAX_NAME_LEN
        )));
    }
    let lowered = name.to_lowercase();
    if taken.map(|t| t.to_lowercase()).any(|t| t == lowered) {
        return Err(StoreError::rejected(format!("{} '{}' already exists", what, name)));
    }
    Ok(name.to_string())
}

/// Apply `command` to `data`, checking every business rule first.
fn apply(data: &mut Dataset, command: &Command) -> Result<(), StoreError> {
    match command {
        Command::CreateChannel {
            actor,
            name,
            kind,
            project_id,
        } => {
            let actor_role = data.user_record(*actor)?.role;
            let name = clean_name(name, data.channels.iter().map(|c| c.name.clone()), "channel")?;
            if let Some(project_id) = project_id {
                let project = data.project(*project_id)?;
                if project.manager_id != *actor && actor_role != Role::Admin {
                    return Err(StoreError::Unauthorized(*actor));
                }
            }
            let id = next_id(data.channels.iter().map(|c| c.id));
            data.channels.push(Channel {
                id,
                name,
                kind: *kind,
                project_id: *project_id,
                created_by: *actor,
            });
            data.memberships.push(Membership {
                channel_id: id,
                user_id: *actor,
            });
        }

        Command::JoinChannel { actor, channel_id } => {
            let actor_role = data.user_record(*actor)?.role;
            let channel = data.channel(*channel_id)?;
            if channel.kind == ChannelKind::Private && actor_role != Role::Admin {
                return Err(StoreError::Unauthorized(*actor));
            }
            if data.is_member(*channel_id, *actor) {
                return Err(StoreError::rejected("already a member"));
            }
            data.memberships.push(Membership {
                channel_id: *channel_id,
                user_id: *actor,
            });
        }

        Command::PostMessage {
            actor,
            channel_id,
            body,
        } => {
            data.user_record(*actor)?;
            let body = body.trim();
            if body.is_empty() {
                return Err(StoreError::rejected("message cannot be empty"));
            }
            let kind = data.channel(*channel_id)?.kind;
            if !data.is_member(*channel_id, *actor) {
                if kind == ChannelKind::Private {
                    return Err(StoreError::Unauthorized(*actor));
                }
                data.memberships.push(Membership {
                    channel_id: *channel_id,
                    user_id: *actor,
                });
            }
            let id = next_id(data.messages.iter().map(|m| m.id));
            data.messages.push(Message {
                id,
                channel_id: *channel_id,
                author_id: *actor,
                author: String::new(),
                body: body.to_string(),
                sent_at: Utc::now(),
            });
        }

        Command::CreateProject {
            actor,
            name,
            description,
        } => {
            if !data.user_record(*actor)?.role.can_manage_projects() {
                return Err(StoreError::Unauthorized(*actor));
            }
            let name = clean_name(name, data.projects.iter().map(|p| p.name.clone()), "project")?;
            let id = next_id(data.projects.iter().map(|p| p.id));
            data.projects.push(Project {
                id,
                name,
                description: description.trim().to_string(),
                manager_id: *actor,
            });
        }

        Command::ReassignProject {
            actor,
            project_id,
            manager_id,
        } => {
            let actor_role = data.user_record(*actor)?.role;
            let project = data.project(*project_id)?;
            if project.manager_id != *actor && actor_role != Role::Admin {
                return Err(StoreError::Unauthorized(*actor));
            }
            if project.manager_id == *manager_id {
                return Err(StoreError::rejected("user already manages this project"));
            }
            if !data.user_record(*manager_id)?.role.can_manage_projects() {
                return Err(StoreError::rejected("new manager must be a manager or admin"));
            }
            if let Some(project) = data.projects.iter_mut().find(|p| p.id == *project_id) {
                project.manager_id = *manager_id;
            }
        }

        Command::ChangeRole {
            actor,
            user_id,
            role,
        } => {
            if data.user_record(*actor)?.role != Role::Admin {
                return Err(StoreError::Unauthorized(*actor));
            }
            let current = data.user_record(*user_id)?.role;
            if current == *role {
                return Err(StoreError::rejected(format!("user is already {}", role)));
            }
            let admins = data.users.iter().filter(|u| u.role == Role::Admin).count();
            if current == Role::Admin && admins == 1 {
                return Err(StoreError::rejected("cannot demote the last admin"));
            }
            let managed = data.projects.iter().any(|p| p.manager_id == *user_id);
            if managed && !role.can_manage_projects() {
                return Err(StoreError::rejected("reassign the user's projects first"));
            }
            if let Some(user) = data.users.iter_mut().find(|u| u.id == *user_id) {
                user.role = *role;
            }
        }
    }
    Ok(())
}

// ============================================================================
// EFFECT FUNCTIONS (File I/O)
// ============================================================================

/// Load a dataset from disk.
pub fn load_dataset(path: &Path) -> Result<Dataset, StoreError> {
    let contents = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Save a dataset to disk, creating parent directories as needed.
pub fn save_dataset(dataset: &Dataset, path: &Path) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let contents = serde_json::to_string_pretty(dataset).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, contents).map_err(io_err)
}

// ============================================================================
// STORE
// ============================================================================

pub struct MemoryStore {
    data: RefCell<Dataset>,
    /// Where mutations are persisted; `None` keeps everything in memory.
    path: Option<PathBuf>,
}

impl MemoryStore {
    pub fn in_memory(data: Dataset) -> Self {
        MemoryStore {
            data: RefCell::new(data),
            path: None,
        }
    }

    /// Open the dataset at `path`; later mutations are written back there.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let data = load_dataset(path)?;
        if data.version != DATASET_VERSION {
            warn!(path = %path.display(), version = data.version, "unexpected dataset version");
        }
        info!(
            path = %path.display(),
            users = data.users.len(),
            channels = data.channels.len(),
            "dataset loaded"
        );
        Ok(MemoryStore {
            data: RefCell::new(data),
            path: Some(path.to_path_buf()),
        })
    }

    /// A copy of the current dataset.
    pub fn snapshot(&self) -> Dataset {
        self.data.borrow().clone()
    }

    fn with_author(data: &Dataset, mut message: Message) -> Message {
        message.author = data.username(message.author_id);
        message
    }
}

impl Auth for MemoryStore {
    fn authenticate(&self, username: &str, password: &str) -> Result<Option<Identity>, StoreError> {
        let data = self.data.borrow();
        let Some(user) = data.users.iter().find(|u| u.username == username.trim()) else {
            debug!(username, "unknown user");
            return Ok(None);
        };
        if !verify_password(&user.salt, password, &user.digest) {
            debug!(username, "wrong password");
            return Ok(None);
        }
        Ok(Some(Identity {
            user_id: user.id,
            username: user.username.clone(),
            role: user.role,
        }))
    }
}

impl Repository for MemoryStore {
    fn channel_page(&self, request: &PageRequest) -> Result<Vec<Channel>, StoreError> {
        let data = self.data.borrow();
        let visible = data
            .channels
            .iter()
            .filter(|c| data.visible_to(c, request.viewer_id));
        Ok(page_of(sorted_channels(visible), request))
    }

    fn message_page(&self, request: &PageRequest) -> Result<Vec<Message>, StoreError> {
        let channel_id = require_context(request, "message")?;
        let data = self.data.borrow();
        if !data.visible_to(data.channel(channel_id)?, request.viewer_id) {
            return Err(StoreError::Unauthorized(request.viewer_id));
        }
        let mut messages: Vec<&Message> = data
            .messages
            .iter()
            .filter(|m| m.channel_id == channel_id)
            .collect();
        messages.sort_by(|a, b| b.sent_at.cmp(&a.sent_at).then(b.id.cmp(&a.id)));
        Ok(page_of(messages, request)
            .into_iter()
            .map(|m| Self::with_author(&data, m.clone()))
            .collect())
    }

    fn user_page(&self, request: &PageRequest) -> Result<Vec<UserSummary>, StoreError> {
        let data = self.data.borrow();
        let mut users: Vec<UserSummary> = data.users.iter().map(UserRecord::summary).collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(page_of(users, request))
    }

    fn project_channel_page(&self, request: &PageRequest) -> Result<Vec<Channel>, StoreError> {
        let project_id = require_context(request, "project channel")?;
        let data = self.data.borrow();
        data.project(project_id)?;
        let visible = data
            .channels
            .iter()
            .filter(|c| c.project_id == Some(project_id) && data.visible_to(c, request.viewer_id));
        Ok(page_of(sorted_channels(visible), request))
    }

    fn list_projects(&self, _viewer_id: Id) -> Result<Vec<Project>, StoreError> {
        let mut projects = self.data.borrow().projects.clone();
        projects.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(projects)
    }

    fn list_users_with_role(&self, role: Role) -> Result<Vec<UserSummary>, StoreError> {
        let data = self.data.borrow();
        let mut users: Vec<UserSummary> = data
            .users
            .iter()
            .filter(|u| u.role == role)
            .map(UserRecord::summary)
            .collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    fn channel(&self, channel_id: Id) -> Result<Channel, StoreError> {
        self.data.borrow().channel(channel_id).cloned()
    }

    fn project(&self, project_id: Id) -> Result<Project, StoreError> {
        self.data.borrow().project(project_id).cloned()
    }

    fn user(&self, user_id: Id) -> Result<UserSummary, StoreError> {
        self.data.borrow().user_record(user_id).map(UserRecord::summary)
    }

    fn is_member(&self, channel_id: Id, user_id: Id) -> Result<bool, StoreError> {
        let data = self.data.borrow();
        data.channel(channel_id)?;
        Ok(data.is_member(channel_id, user_id))
    }

    fn execute(&self, command: &Command) -> Result<(), StoreError> {
        let mut next = self.data.borrow().clone();
        if let Err(e) = apply(&mut next, command) {
            warn!(command = command.name(), error = %e, "command refused");
            return Err(e);
        }
        if let Some(path) = &self.path {
            save_dataset(&next, path)?;
        }
        *self.data.borrow_mut() = next;
        info!(command = command.name(), "command applied");
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PAGE_SIZE;
    use tempfile::TempDir;

    fn store() -> MemoryStore {
        MemoryStore::in_memory(Dataset::sample().unwrap().0)
    }

    fn request(viewer_id: Id, context_id: Option<Id>, page_number: u32) -> PageRequest {
        PageRequest {
            context_id,
            viewer_id,
            page_number,
            page_size: PAGE_SIZE,
        }
    }

    fn names(channels: &[Channel]) -> Vec<&str> {
        channels.iter().map(|c| c.name.as_str()).collect()
    }

    // -- auth --

    #[test]
    fn sample_logins_authenticate() {
        let store = store();
        let (_, logins) = Dataset::sample().unwrap();
        for login in logins {
            let identity = store
                .authenticate(&login.username, &login.password)
                .unwrap()
                .expect("sample login should work");
            assert_eq!(identity.role, login.role);
        }
    }

    #[test]
    fn wrong_password_and_unknown_user_yield_none() {
        let store = store();
        assert_eq!(store.authenticate("ana", "nope").unwrap(), None);
        assert_eq!(store.authenticate("nobody", "ana").unwrap(), None);
    }

    // -- queries --

    #[test]
    fn private_channels_only_visible_to_members() {
        let store = store();
        // ben is not in #leads or #apollo-planning
        let ben = store.channel_page(&request(3, None, 1)).unwrap();
        assert_eq!(names(&ben), vec!["apollo-dev", "general", "random"]);

        let ana = store.channel_page(&request(2, None, 1)).unwrap();
        assert_eq!(
            names(&ana),
            vec!["apollo-dev", "apollo-planning", "general", "leads", "random"]
        );
    }

    #[test]
    fn general_history_spans_two_pages() {
        let store = store();
        let page1 = store.message_page(&request(3, Some(1), 1)).unwrap();
        let page2 = store.message_page(&request(3, Some(1), 2)).unwrap();
        let page3 = store.message_page(&request(3, Some(1), 3)).unwrap();
        assert_eq!(page1.len(), 10);
        assert_eq!(page2.len(), 2);
        assert!(page3.is_empty());

        // newest first, authors resolved
        assert_eq!(page1[0].body, "Have a good weekend.");
        assert_eq!(page1[0].author, "admin");
        assert_eq!(page2[1].body, "Welcome to confab!");
    }

    #[test]
    fn message_page_requires_visible_channel() {
        let store = store();
        assert!(matches!(
            store.message_page(&request(3, Some(3), 1)),
            Err(StoreError::Unauthorized(3))
        ));
        assert!(matches!(
            store.message_page(&request(3, None, 1)),
            Err(StoreError::Rejected(_))
        ));
    }

    #[test]
    fn project_channels_filtered_by_project_and_visibility() {
        let store = store();
        let ben = store.project_channel_page(&request(3, Some(1), 1)).unwrap();
        assert_eq!(names(&ben), vec!["apollo-dev"]);
        let ana = store.project_channel_page(&request(2, Some(1), 1)).unwrap();
        assert_eq!(names(&ana), vec!["apollo-dev", "apollo-planning"]);
    }

    #[test]
    fn managers_listed_by_role() {
        let store = store();
        let managers = store.list_users_with_role(Role::Manager).unwrap();
        assert_eq!(managers.len(), 1);
        assert_eq!(managers[0].username, "ana");
    }

    // -- commands --

    #[test]
    fn create_channel_enforces_unique_names() {
        let store = store();
        let create = |name: &str| Command::CreateChannel {
            actor: 3,
            name: name.into(),
            kind: ChannelKind::Public,
            project_id: None,
        };
        assert!(matches!(store.execute(&create(" General ")), Err(StoreError::Rejected(_))));
        assert!(matches!(store.execute(&create("   ")), Err(StoreError::Rejected(_))));

        store.execute(&create(" design ")).unwrap();
        let created = store.snapshot().channels.into_iter().find(|c| c.name == "design").unwrap();
        assert_eq!(created.id, 6);
        assert!(store.is_member(6, 3).unwrap());
    }

    #[test]
    fn project_channel_needs_project_manager() {
        let store = store();
        let create = |actor| Command::CreateChannel {
            actor,
            name: "apollo-qa".into(),
            kind: ChannelKind::Public,
            project_id: Some(1),
        };
        assert!(matches!(store.execute(&create(3)), Err(StoreError::Unauthorized(3))));
        store.execute(&create(2)).unwrap();
    }

    #[test]
    fn posting_to_public_channel_joins_it() {
        let store = store();
        assert!(!store.is_member(2, 4).unwrap());
        store
            .execute(&Command::PostMessage {
                actor: 4,
                channel_id: 2,
                body: "hi".into(),
            })
            .unwrap();
        assert!(store.is_member(2, 4).unwrap());
        let latest = store.message_page(&request(4, Some(2), 1)).unwrap();
        assert_eq!(latest[0].body, "hi");
        assert_eq!(latest[0].author, "chloe");
    }

    #[test]
    fn posting_to_private_channel_needs_membership() {
        let store = store();
        let post = Command::PostMessage {
            actor: 3,
            channel_id: 3,
            body: "let me in".into(),
        };
        assert!(matches!(store.execute(&post), Err(StoreError::Unauthorized(3))));
    }

    #[test]
    fn join_rules() {
        let store = store();
        let join = |actor, channel_id| Command::JoinChannel { actor, channel_id };
        assert!(matches!(store.execute(&join(3, 3)), Err(StoreError::Unauthorized(3))));
        assert!(matches!(store.execute(&join(3, 1)), Err(StoreError::Rejected(_))));
        store.execute(&join(4, 2)).unwrap();
        store.execute(&join(1, 5)).unwrap();
    }

    #[test]
    fn members_cannot_create_projects() {
        let store = store();
        let create = |actor| Command::CreateProject {
            actor,
            name: "Zeus".into(),
            description: "".into(),
        };
        assert!(matches!(store.execute(&create(3)), Err(StoreError::Unauthorized(3))));
        store.execute(&create(2)).unwrap();
        assert!(matches!(store.execute(&create(1)), Err(StoreError::Rejected(_))));
    }

    #[test]
    fn reassignment_rules() {
        let store = store();
        let reassign = |actor, manager_id| Command::ReassignProject {
            actor,
            project_id: 1,
            manager_id,
        };
        // ben is neither admin nor the manager
        assert!(matches!(store.execute(&reassign(3, 1)), Err(StoreError::Unauthorized(3))));
        // new manager must hold a managing role
        assert!(matches!(store.execute(&reassign(2, 3)), Err(StoreError::Rejected(_))));
        assert!(matches!(store.execute(&reassign(2, 2)), Err(StoreError::Rejected(_))));
        store.execute(&reassign(2, 1)).unwrap();
        assert_eq!(store.project(1).unwrap().manager_id, 1);
    }

    #[test]
    fn role_change_rules() {
        let store = store();
        let change = |actor, user_id, role| Command::ChangeRole { actor, user_id, role };
        assert!(matches!(
            store.execute(&change(2, 3, Role::Manager)),
            Err(StoreError::Unauthorized(2))
        ));
        // last admin stays
        assert!(matches!(
            store.execute(&change(1, 1, Role::Member)),
            Err(StoreError::Rejected(_))
        ));
        // ana still manages Apollo
        assert!(matches!(
            store.execute(&change(1, 2, Role::Member)),
            Err(StoreError::Rejected(_))
        ));
        store.execute(&change(1, 3, Role::Manager)).unwrap();
        assert_eq!(store.user(3).unwrap().role, Role::Manager);
    }

    #[test]
    fn refused_command_leaves_data_untouched() {
        let store = store();
        let before = store.snapshot().channels.len();
        let _ = store.execute(&Command::JoinChannel {
            actor: 99,
            channel_id: 1,
        });
        assert_eq!(store.snapshot().channels.len(), before);
    }

    #[test]
    fn channel_lookup_by_id() {
        let store = store();
        assert_eq!(store.channel(4).unwrap().name, "apollo-dev");
        assert!(matches!(
            store.channel(99),
            Err(StoreError::NotFound { entity: "channel", id: 99 })
        ));
    }

    // -- persistence --

    #[test]
    fn mutations_are_written_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("data.json");
        save_dataset(&Dataset::sample().unwrap().0, &path).unwrap();

        let store = MemoryStore::open(&path).unwrap();
        store
            .execute(&Command::PostMessage {
                actor: 3,
                channel_id: 2,
                body: "persisted".into(),
            })
            .unwrap();

        let reloaded = load_dataset(&path).unwrap();
        assert!(reloaded.messages.iter().any(|m| m.body == "persisted"));
        // credentials survive the round trip
        let reopened = MemoryStore::open(&path).unwrap();
        assert!(reopened.authenticate("ben", "ben").unwrap().is_some());
    }

    #[test]
    fn open_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let result = MemoryStore::open(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(StoreError::Io { .. })));
    }

    #[test]
    fn open_garbage_is_json_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(MemoryStore::open(&path), Err(StoreError::Json { .. })));
    }
}
