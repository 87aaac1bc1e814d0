//! Pending team invite

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::user::UserId;

/// Pending-request identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(i64);

impl RequestId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The single in-flight invite from a prospective leader to a registered
/// receiver. A receiver is named by at most one pending request at a time;
/// the row is consumed on accept, reject or superseding cancellation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingRequest {
    id: RequestId,
    sender_id: UserId,
    receiver_id: UserId,
    created_at: DateTime<Utc>,
}

impl PendingRequest {
    pub fn from_parts(
        id: RequestId,
        sender_id: UserId,
        receiver_id: UserId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            sender_id,
            receiver_id,
            created_at,
        }
    }

    pub fn id(&self) -> RequestId {
        self.id
    }

    pub fn sender_id(&self) -> UserId {
        self.sender_id
    }

    pub fn receiver_id(&self) -> UserId {
        self.receiver_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
