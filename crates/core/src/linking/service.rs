//! Linking flow service - token issue, authorize redirect, callback
//! exchange.
//!
//! The callback is a one-shot state machine: a pending-auth context in the
//! session either gets consumed or the flow fails, and the context is
//! cleared on every path out so it can never drive a second callback.

use std::sync::Arc;

use chrono::Utc;
use linker_domain::constants::LINK_TOKEN_TTL_SECS;
use linker_domain::{
    CodeChallengeMethod, DiscordAccount, DiscordProfile, LinkToken, LinkerError, PendingAuth,
    Result, SessionValue, WikidotAccount,
};
use tracing::{debug, info};
use url::Url;

use super::pkce;
use super::ports::{
    DiscordAccountRepository, IdentityProvider, LinkTokenRepository, RevalidationScheduler,
    SessionStore, WikidotAccountRepository,
};
use crate::links::service::LinkRegistry;
use crate::membership::service::MembershipService;

/// Provider-facing settings for building authorize redirects
#[derive(Debug, Clone)]
pub struct AuthorizeSettings {
    pub authorize_url: String,
    pub client_id: String,
    pub redirect_uri: String,
    pub scope: String,
}

/// Ports consumed by [`LinkingService`]
pub struct LinkingPorts {
    pub discord_accounts: Arc<dyn DiscordAccountRepository>,
    pub wikidot_accounts: Arc<dyn WikidotAccountRepository>,
    pub tokens: Arc<dyn LinkTokenRepository>,
    pub sessions: Arc<dyn SessionStore>,
    pub provider: Arc<dyn IdentityProvider>,
    pub revalidation: Arc<dyn RevalidationScheduler>,
}

/// Result of a consumed callback
#[derive(Debug, Clone)]
pub struct CallbackOutcome {
    pub discord: DiscordAccount,
    pub wikidot: WikidotAccount,
    /// `false` when the pair was already actively linked
    pub newly_linked: bool,
}

/// Result of a synchronous recheck
#[derive(Debug, Clone)]
pub struct RecheckOutcome {
    pub discord: DiscordAccount,
    pub wikidot: Vec<WikidotAccount>,
}

/// Orchestrates the identity linking protocol
pub struct LinkingService {
    ports: LinkingPorts,
    registry: Arc<LinkRegistry>,
    membership: Arc<MembershipService>,
    settings: AuthorizeSettings,
}

impl LinkingService {
    /// Create a new linking service
    pub fn new(
        ports: LinkingPorts,
        registry: Arc<LinkRegistry>,
        membership: Arc<MembershipService>,
        settings: AuthorizeSettings,
    ) -> Self {
        Self { ports, registry, membership, settings }
    }

    /// Start a linking flow for a Discord account, minting a time-boxed
    /// token bound to it.
    ///
    /// The account is created on first reference; an existing account's
    /// display fields are left untouched here (recheck refreshes them).
    pub async fn start_flow(&self, profile: &DiscordProfile) -> Result<String> {
        let account = self.lookup_or_create_discord(profile).await?;

        let token = pkce::generate_link_token();
        self.ports
            .tokens
            .insert(LinkToken {
                token: token.clone(),
                discord_id: account.discord_id,
                created_at: Utc::now().timestamp(),
            })
            .await?;

        info!(discord_id = account.discord_id, "link flow started");
        Ok(token)
    }

    /// Resolve the Discord account a token was minted for.
    ///
    /// Returns `None` for unknown and expired tokens alike; the boundary
    /// at exactly the TTL is treated as expired.
    pub async fn resolve_account_from_token(&self, token: &str) -> Result<Option<DiscordAccount>> {
        let cutoff = Utc::now().timestamp() - LINK_TOKEN_TTL_SECS;
        let Some(row) = self.ports.tokens.find_created_after(token, cutoff).await? else {
            return Ok(None);
        };
        self.ports.discord_accounts.get(row.discord_id).await
    }

    /// Build the provider authorize URL and park the PKCE context in the
    /// caller's session.
    pub async fn begin_authorization(
        &self,
        session_key: &str,
        account: &DiscordAccount,
        token: &str,
    ) -> Result<String> {
        let code_verifier = pkce::generate_code_verifier();
        let code_challenge = pkce::derive_challenge(&code_verifier, CodeChallengeMethod::S256);

        self.ports
            .sessions
            .set(
                session_key,
                SessionValue::PendingAuth(PendingAuth {
                    discord_id: account.discord_id,
                    code_verifier,
                    code_challenge_method: CodeChallengeMethod::S256,
                    state: token.to_string(),
                }),
            )
            .await?;

        let mut url = Url::parse(&self.settings.authorize_url)
            .map_err(|err| LinkerError::Config(format!("invalid authorize URL: {err}")))?;
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.settings.client_id)
            .append_pair("redirect_uri", &self.settings.redirect_uri)
            .append_pair("scope", &self.settings.scope)
            .append_pair("state", token)
            .append_pair("code_challenge", &code_challenge)
            .append_pair("code_challenge_method", CodeChallengeMethod::S256.as_str());

        debug!(discord_id = account.discord_id, "authorize redirect built");
        Ok(url.into())
    }

    /// Consume the provider callback.
    ///
    /// Every failure path clears the pending context before returning, so
    /// the same context can never serve two callbacks.
    pub async fn complete_callback(
        &self,
        session_key: &str,
        code: &str,
        state: &str,
    ) -> Result<CallbackOutcome> {
        let Some(ctx) = self
            .ports
            .sessions
            .get(session_key)
            .await?
            .and_then(|value| value.pending_auth().cloned())
        else {
            return Err(LinkerError::InvalidSession("no pending auth context".into()));
        };

        if state != ctx.state {
            self.clear_session(session_key).await?;
            return Err(LinkerError::StateMismatch("callback state does not match".into()));
        }

        let profile = match self.ports.provider.exchange_code(code, &ctx.code_verifier).await {
            Ok(profile) => profile,
            Err(err) => {
                self.clear_session(session_key).await?;
                return Err(err);
            }
        };

        // The context is spent once the owning account has been read,
        // independent of how the rest of the callback turns out.
        let discord = self.ports.discord_accounts.get(ctx.discord_id).await;
        self.clear_session(session_key).await?;

        let Some(discord) = discord? else {
            return Err(LinkerError::NotFound(format!(
                "discord account {} not found",
                ctx.discord_id
            )));
        };

        let wikidot = match self.ports.wikidot_accounts.get(profile.id).await? {
            Some(account) => account,
            None => {
                let now = Utc::now().timestamp();
                let account = WikidotAccount {
                    wikidot_id: profile.id,
                    username: profile.username.clone(),
                    unix_name: profile.unix_name.clone(),
                    is_site_member: false,
                    created_at: now,
                    updated_at: now,
                };
                self.ports.wikidot_accounts.insert(account.clone()).await?;
                account
            }
        };

        self.ports.revalidation.schedule(wikidot.clone());

        let created = self.registry.create_or_restore(discord.discord_id, wikidot.wikidot_id).await?;
        let newly_linked = created.is_some();

        info!(
            discord_id = discord.discord_id,
            wikidot_id = wikidot.wikidot_id,
            newly_linked,
            "callback consumed"
        );

        Ok(CallbackOutcome { discord, wikidot, newly_linked })
    }

    /// Refresh a Discord account's display fields and the membership flag
    /// of every actively linked Wikidot account, synchronously.
    pub async fn recheck(&self, profile: &DiscordProfile) -> Result<RecheckOutcome> {
        let Some(account) = self.ports.discord_accounts.get(profile.id).await? else {
            return Err(LinkerError::NotFound(format!("discord account {} not found", profile.id)));
        };

        let mut discord = account;
        discord.username = profile.username.clone();
        discord.avatar = profile.avatar.clone();
        discord.updated_at = Utc::now().timestamp();
        self.ports.discord_accounts.update(discord.clone()).await?;

        let mut wikidot = Vec::new();
        for link in self.registry.active_links_for(discord.discord_id).await? {
            if let Some(account) = self.ports.wikidot_accounts.get(link.wikidot_id).await? {
                wikidot.push(self.membership.refresh(&account).await?);
            }
        }

        Ok(RecheckOutcome { discord, wikidot })
    }

    async fn lookup_or_create_discord(&self, profile: &DiscordProfile) -> Result<DiscordAccount> {
        if let Some(existing) = self.ports.discord_accounts.get(profile.id).await? {
            return Ok(existing);
        }

        let now = Utc::now().timestamp();
        let account = DiscordAccount {
            discord_id: profile.id,
            username: profile.username.clone(),
            avatar: profile.avatar.clone(),
            created_at: now,
            updated_at: now,
        };
        self.ports.discord_accounts.insert(account.clone()).await?;
        Ok(account)
    }

    async fn clear_session(&self, session_key: &str) -> Result<()> {
        self.ports.sessions.set(session_key, SessionValue::Empty).await
    }
}
