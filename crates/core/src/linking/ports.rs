//! Port interfaces for the linking flow
//!
//! These traits define the boundaries between the protocol logic and the
//! infrastructure implementations (database, session store, identity
//! provider, background revalidation).

use async_trait::async_trait;
use linker_domain::{
    DiscordAccount, LinkToken, Result, SessionValue, WikidotAccount, WikidotProfile,
};

/// Persistence for Discord accounts
#[async_trait]
pub trait DiscordAccountRepository: Send + Sync {
    /// Get an account by its Discord snowflake
    async fn get(&self, discord_id: i64) -> Result<Option<DiscordAccount>>;

    /// Insert a new account
    async fn insert(&self, account: DiscordAccount) -> Result<()>;

    /// Overwrite the display fields of an existing account
    async fn update(&self, account: DiscordAccount) -> Result<()>;

    /// All known accounts, insertion order
    async fn list_all(&self) -> Result<Vec<DiscordAccount>>;
}

/// Persistence for Wikidot accounts
#[async_trait]
pub trait WikidotAccountRepository: Send + Sync {
    /// Get an account by its Wikidot user id
    async fn get(&self, wikidot_id: i64) -> Result<Option<WikidotAccount>>;

    /// Insert a new account
    async fn insert(&self, account: WikidotAccount) -> Result<()>;

    /// Overwrite an existing account (membership flag, display fields)
    async fn update(&self, account: WikidotAccount) -> Result<()>;

    /// All known accounts, insertion order
    async fn list_all(&self) -> Result<Vec<WikidotAccount>>;
}

/// Persistence for linking tokens
#[async_trait]
pub trait LinkTokenRepository: Send + Sync {
    /// Persist a freshly minted token
    async fn insert(&self, token: LinkToken) -> Result<()>;

    /// Find a token created strictly after `cutoff`.
    ///
    /// Expired and unknown tokens are indistinguishable: both return
    /// `None`.
    async fn find_created_after(&self, token: &str, cutoff: i64) -> Result<Option<LinkToken>>;
}

/// Ephemeral per-session storage for the pending-auth slot
///
/// One tagged [`SessionValue`] per opaque key; the backing store and its
/// transport are infrastructure concerns.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<SessionValue>>;

    async fn set(&self, key: &str, value: SessionValue) -> Result<()>;

    async fn delete(&self, key: &str) -> Result<()>;
}

/// The external identity provider's code-exchange contract
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchange an authorization code (plus PKCE verifier) for the
    /// provider-side identity.
    ///
    /// Non-success responses and timeouts surface as
    /// [`linker_domain::LinkerError::UpstreamExchange`].
    async fn exchange_code(&self, code: &str, code_verifier: &str) -> Result<WikidotProfile>;
}

/// Submission point for detached membership revalidation
///
/// Implementations run the refresh on their own resource scope; failures
/// are terminal for the task and never surface to the caller.
pub trait RevalidationScheduler: Send + Sync {
    fn schedule(&self, account: WikidotAccount);
}
