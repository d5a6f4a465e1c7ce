//! Application context - dependency injection container

use std::sync::Arc;
use std::time::Duration;

use linker_core::linking::ports::{
    DiscordAccountRepository, IdentityProvider, LinkTokenRepository, RevalidationScheduler,
    SessionStore, WikidotAccountRepository,
};
use linker_core::{AuthorizeSettings, LinkRegistry, LinkingPorts, LinkingService, MembershipService};
use linker_domain::{Config, Result};
use linker_infra::database::{
    DbManager, SqliteDiscordAccountRepository, SqliteLinkRepository, SqliteLinkTokenRepository,
    SqliteWikidotAccountRepository,
};
use linker_infra::integrations::wikidot::{WikidotAuthClient, WikidotMembershipClient};
use linker_infra::session::MokaSessionStore;
use linker_infra::tasks::RevalidationQueue;

/// Application context - holds all services and dependencies
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub db: Arc<DbManager>,
    pub linking: Arc<LinkingService>,
    pub registry: Arc<LinkRegistry>,
    pub discord_accounts: Arc<dyn DiscordAccountRepository>,
    pub wikidot_accounts: Arc<dyn WikidotAccountRepository>,
    pub revalidation: Arc<RevalidationQueue>,
}

impl AppContext {
    /// Build the full dependency graph from configuration.
    ///
    /// Fails fast on an unreachable database or malformed provider
    /// settings; nothing is deferred to first use.
    pub fn new(config: Config) -> Result<Self> {
        let db = Arc::new(DbManager::new(&config.database.path, config.database.pool_size)?);
        db.run_migrations()?;

        let discord_accounts: Arc<dyn DiscordAccountRepository> =
            Arc::new(SqliteDiscordAccountRepository::new(Arc::clone(&db)));
        let wikidot_accounts: Arc<dyn WikidotAccountRepository> =
            Arc::new(SqliteWikidotAccountRepository::new(Arc::clone(&db)));
        let tokens: Arc<dyn LinkTokenRepository> =
            Arc::new(SqliteLinkTokenRepository::new(Arc::clone(&db)));
        let registry =
            Arc::new(LinkRegistry::new(Arc::new(SqliteLinkRepository::new(Arc::clone(&db)))));

        let sessions: Arc<dyn SessionStore> =
            Arc::new(MokaSessionStore::new(Duration::from_secs(config.session.ttl_secs)));

        let provider: Arc<dyn IdentityProvider> =
            Arc::new(WikidotAuthClient::new(&config.auth, config.redirect_uri())?);
        let membership_client = Arc::new(WikidotMembershipClient::new(&config.membership)?);

        let membership =
            Arc::new(MembershipService::new(Arc::clone(&wikidot_accounts), membership_client));
        let revalidation = Arc::new(RevalidationQueue::new(Arc::clone(&membership)));

        let linking = Arc::new(LinkingService::new(
            LinkingPorts {
                discord_accounts: Arc::clone(&discord_accounts),
                wikidot_accounts: Arc::clone(&wikidot_accounts),
                tokens,
                sessions,
                provider,
                revalidation: Arc::clone(&revalidation) as Arc<dyn RevalidationScheduler>,
            },
            Arc::clone(&registry),
            Arc::clone(&membership),
            AuthorizeSettings {
                authorize_url: config.auth.authorize_url(),
                client_id: config.auth.client_id.clone(),
                redirect_uri: config.redirect_uri(),
                scope: config.auth.scope.clone(),
            },
        ));

        Ok(Self {
            config: Arc::new(config),
            db,
            linking,
            registry,
            discord_accounts,
            wikidot_accounts,
            revalidation,
        })
    }
}
