//! Membership revalidation - refreshes the site-member flag on a Wikidot
//! account from the external membership service.

use std::sync::Arc;

use chrono::Utc;
use linker_domain::{Result, WikidotAccount};

use super::ports::MembershipClient;
use crate::linking::ports::WikidotAccountRepository;

/// Refreshes `is_site_member` on Wikidot accounts
///
/// Runs inline during a recheck request, or detached after a successful
/// callback (see the infra revalidation queue).
pub struct MembershipService {
    accounts: Arc<dyn WikidotAccountRepository>,
    client: Arc<dyn MembershipClient>,
}

impl MembershipService {
    /// Create a new membership service
    pub fn new(accounts: Arc<dyn WikidotAccountRepository>, client: Arc<dyn MembershipClient>) -> Self {
        Self { accounts, client }
    }

    /// Query the membership service and persist the refreshed flag.
    pub async fn refresh(&self, account: &WikidotAccount) -> Result<WikidotAccount> {
        let is_member = self.client.is_site_member(account.wikidot_id, &account.username).await?;

        let mut updated = account.clone();
        updated.is_site_member = is_member;
        updated.updated_at = Utc::now().timestamp();

        self.accounts.update(updated.clone()).await?;
        Ok(updated)
    }
}
