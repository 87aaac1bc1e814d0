//! Outbound transactional email

use async_trait::async_trait;

/// A rendered transactional email ready for dispatch
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub to_name: String,
    pub to_email: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Transactional email collaborator
///
/// Mail dispatch is fire-and-forget relative to state changes: a failed
/// send returns `false` and is logged by the caller, it never propagates as
/// an error and never rolls back the transition that triggered it.
#[async_trait]
pub trait Notifier: Send + Sync + std::fmt::Debug {
    /// Deliver an email. Returns `true` on acceptance by the provider.
    async fn send(&self, email: OutboundEmail) -> bool;
}
