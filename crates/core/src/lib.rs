//! # Linker Core
//!
//! Protocol services and port definitions for the account linking flow.
//!
//! This crate contains:
//! - The linking flow state machine (token issue, authorize redirect,
//!   callback exchange)
//! - The link registry (idempotent create/unlink/relink)
//! - Membership revalidation logic
//! - Port traits implemented by `linker-infra`
//!
//! ## Architecture
//! - Depends only on `linker-domain`
//! - No I/O; all side effects go through ports

pub mod linking;
pub mod links;
pub mod membership;

// Re-export commonly used items
pub use linking::pkce;
pub use linking::service::{AuthorizeSettings, CallbackOutcome, LinkingPorts, LinkingService, RecheckOutcome};
pub use links::service::LinkRegistry;
pub use membership::service::MembershipService;
