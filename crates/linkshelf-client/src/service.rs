use async_trait::async_trait;

use linkshelf_shared::{Link, LinkRecord, Principal, UserProfile, UserRole};

use crate::error::Result;

/// The remote link service as seen by a single caller.
///
/// Every method is one request/response round trip with no retry. Failures
/// surface as [`crate::ClientError::Remote`] carrying the server's message;
/// not-found and permission errors are not told apart.
#[async_trait]
pub trait LinkService: Send + Sync {
    async fn add_link(&self, id: &str, link: &Link) -> Result<()>;

    async fn update_link(&self, id: &str, link: &Link) -> Result<()>;

    async fn delete_link(&self, id: &str) -> Result<()>;

    async fn get_all_links(&self) -> Result<Vec<LinkRecord>>;

    async fn get_link(&self, id: &str) -> Result<Link>;

    async fn get_caller_user_profile(&self) -> Result<Option<UserProfile>>;

    async fn save_caller_user_profile(&self, profile: &UserProfile) -> Result<()>;

    async fn get_user_profile(&self, user: &Principal) -> Result<Option<UserProfile>>;

    async fn get_caller_user_role(&self) -> Result<UserRole>;

    /// Admin only.
    async fn assign_caller_user_role(&self, user: &Principal, role: UserRole) -> Result<()>;

    async fn is_caller_admin(&self) -> Result<bool>;
}
