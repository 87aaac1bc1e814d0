//! Transactional email dispatch

pub mod brevo;
pub mod templates;

pub use brevo::BrevoNotifier;

#[cfg(test)]
pub use recording::RecordingNotifier;

#[cfg(test)]
mod recording {
    use async_trait::async_trait;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    use crate::domain::{Notifier, OutboundEmail};

    /// Test double that records every email instead of sending it
    #[derive(Debug, Default)]
    pub struct RecordingNotifier {
        sent: Arc<Mutex<Vec<OutboundEmail>>>,
        /// When false, every send reports delivery failure
        pub deliver: bool,
    }

    impl RecordingNotifier {
        pub fn new() -> Self {
            Self {
                sent: Arc::new(Mutex::new(Vec::new())),
                deliver: true,
            }
        }

        pub fn failing() -> Self {
            Self {
                sent: Arc::new(Mutex::new(Vec::new())),
                deliver: false,
            }
        }

        pub async fn sent(&self) -> Vec<OutboundEmail> {
            self.sent.lock().await.clone()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, email: OutboundEmail) -> bool {
            self.sent.lock().await.push(email);
            self.deliver
        }
    }
}
