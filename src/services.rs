//! Collaborator contracts consumed by the screens.
//!
//! The navigation core never implements these; [`crate::store::MemoryStore`]
//! is the implementation shipped with the binary.

use crate::error::StoreError;
use crate::types::{Channel, Command, Id, Identity, Message, PageRequest, Project, Role, UserSummary};

pub trait Auth {
    /// `Ok(None)` for unknown user or wrong password.
    fn authenticate(&self, username: &str, password: &str) -> Result<Option<Identity>, StoreError>;
}

pub trait Repository {
    /// Channels visible to the viewer, ordered by name.
    fn channel_page(&self, request: &PageRequest) -> Result<Vec<Channel>, StoreError>;

    /// Messages in the channel named by `context_id`, newest first.
    fn message_page(&self, request: &PageRequest) -> Result<Vec<Message>, StoreError>;

    /// All users, ordered by username.
    fn user_page(&self, request: &PageRequest) -> Result<Vec<UserSummary>, StoreError>;

    /// Channels of the project named by `context_id` visible to the viewer.
    fn project_channel_page(&self, request: &PageRequest) -> Result<Vec<Channel>, StoreError>;

    /// Every project, unpaged.
    fn list_projects(&self, viewer_id: Id) -> Result<Vec<Project>, StoreError>;

    /// Users holding `role`, unpaged.
    fn list_users_with_role(&self, role: Role) -> Result<Vec<UserSummary>, StoreError>;

    fn channel(&self, channel_id: Id) -> Result<Channel, StoreError>;

    fn project(&self, project_id: Id) -> Result<Project, StoreError>;

    fn user(&self, user_id: Id) -> Result<UserSummary, StoreError>;

    /// Whether `user_id` belongs to the channel.
    fn is_member(&self, channel_id: Id, user_id: Id) -> Result<bool, StoreError>;

    /// Apply a mutation. Business rules are checked here.
    fn execute(&self, command: &Command) -> Result<(), StoreError>;
}
