//! Domain types for confab.
//!
//! Record DTOs returned by the repository, the paging request, and the
//! commands screens submit. No behavior beyond small accessors.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Entity identifier as stored by the repository.
pub type Id = i64;

/// Number of records on one page. Fixed for the whole session.
pub const PAGE_SIZE: u32 = 10;

/// Longest accepted channel or project name, in characters.
pub const MAX_NAME_LEN: usize = 40;

// ============================================================================
// PRIMITIVES
// ============================================================================

/// Salted BLAKE3 digest of a password. Serialized as lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PasswordDigest(pub [u8; 32]);

impl PasswordDigest {
    /// View as a `blake3::Hash`, whose equality is constant-time.
    pub fn as_hash(&self) -> blake3::Hash {
        blake3::Hash::from_bytes(self.0)
    }
}

impl Serialize for PasswordDigest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_hash().to_hex().as_str())
    }
}

impl<'de> Deserialize<'de> for PasswordDigest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let hex = String::deserialize(deserializer)?;
        let hash = blake3::Hash::from_hex(&hex).map_err(serde::de::Error::custom)?;
        Ok(PasswordDigest(*hash.as_bytes()))
    }
}

// ============================================================================
// ENUMS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Manager,
    Member,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Manager, Role::Member];

    /// Whether this role may own or create projects.
    pub fn can_manage_projects(self) -> bool {
        matches!(self, Role::Admin | Role::Manager)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Member => "member",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    /// Visible to everyone; posting joins automatically.
    Public,
    /// Visible to members only.
    Private,
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelKind::Public => f.write_str("public"),
            ChannelKind::Private => f.write_str("private"),
        }
    }
}

// ============================================================================
// RECORDS
// ============================================================================

/// A record that can be listed and picked by id.
pub trait Listed {
    fn id(&self) -> Id;

    /// One-line rendering used in list views.
    fn summary(&self) -> String;
}

/// The authenticated user, as held by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Id,
    pub username: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: Id,
    pub name: String,
    pub kind: ChannelKind,
    /// Set when the channel belongs to a project.
    #[serde(default)]
    pub project_id: Option<Id>,
    pub created_by: Id,
}

impl Listed for Channel {
    fn id(&self) -> Id {
        self.id
    }

    fn summary(&self) -> String {
        format!("#{} ({})", self.name, self.kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Id,
    pub channel_id: Id,
    pub author_id: Id,
    /// Author's username at read time; not stored.
    #[serde(skip)]
    pub author: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

impl Listed for Message {
    fn id(&self) -> Id {
        self.id
    }

    fn summary(&self) -> String {
        const PREVIEW: usize = 48;
        let preview: String = self.body.chars().take(PREVIEW).collect();
        let ellipsis = if self.body.chars().count() > PREVIEW { "..." } else { "" };
        format!(
            "{} <{}> {}{}",
            self.sent_at.format("%Y-%m-%d %H:%M"),
            self.author,
            preview,
            ellipsis
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: Id,
    pub name: String,
    pub description: String,
    pub manager_id: Id,
}

impl Listed for Project {
    fn id(&self) -> Id {
        self.id
    }

    fn summary(&self) -> String {
        self.name.clone()
    }
}

/// Public view of a user account (no credentials).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub id: Id,
    pub username: String,
    pub display_name: String,
    pub role: Role,
}

impl Listed for UserSummary {
    fn id(&self) -> Id {
        self.id
    }

    fn summary(&self) -> String {
        format!("{} ({}) [{}]", self.display_name, self.username, self.role)
    }
}

// ============================================================================
// PAGING
// ============================================================================

/// One page of an ordered result set, as asked of a collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Owning entity (channel for messages, project for its channels).
    pub context_id: Option<Id>,
    pub viewer_id: Id,
    /// 1-based.
    pub page_number: u32,
    pub page_size: u32,
}

impl PageRequest {
    /// Number of records preceding this page.
    pub fn offset(&self) -> usize {
        (self.page_number.saturating_sub(1) as usize) * self.page_size as usize
    }
}

// ============================================================================
// COMMANDS
// ============================================================================

/// A mutation submitted through [`crate::services::Repository::execute`].
///
/// `actor` is always the session identity; business rules are checked
/// against it by the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    CreateChannel {
        actor: Id,
        name: String,
        kind: ChannelKind,
        project_id: Option<Id>,
    },
    JoinChannel {
        actor: Id,
        channel_id: Id,
    },
    PostMessage {
        actor: Id,
        channel_id: Id,
        body: String,
    },
    CreateProject {
        actor: Id,
        name: String,
        description: String,
    },
    ReassignProject {
        actor: Id,
        project_id: Id,
        manager_id: Id,
    },
    ChangeRole {
        actor: Id,
        user_id: Id,
        role: Role,
    },
}

impl Command {
    /// Short name used in log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Command::CreateChannel { .. } => "create_channel",
            Command::JoinChannel { .. } => "join_channel",
            Command::PostMessage { .. } => "post_message",
            Command::CreateProject { .. } => "create_project",
            Command::ReassignProject { .. } => "reassign_project",
            Command::ChangeRole { .. } => "change_role",
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
