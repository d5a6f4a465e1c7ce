//! Port interface for the external membership lookup

use async_trait::async_trait;
use linker_domain::Result;

/// The wiki membership-lookup contract
#[async_trait]
pub trait MembershipClient: Send + Sync {
    /// Whether the given Wikidot user is currently a member of the
    /// configured site.
    async fn is_site_member(&self, wikidot_id: i64, username: &str) -> Result<bool>;
}
