//! Wikidot-side integrations: the identity provider exchange and the
//! site membership lookup.

pub mod auth_client;
pub mod membership_client;

pub use auth_client::WikidotAuthClient;
pub use membership_client::WikidotMembershipClient;
