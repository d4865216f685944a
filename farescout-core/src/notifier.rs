use async_trait::async_trait;
use farescout_shared::CandidateOffer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::{CoreError, CoreResult};

/// Outbound notification channel (email)
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends a price alert. `price_change` is the signed percent change, when known.
    async fn send_alert(
        &self,
        to: &str,
        search_name: &str,
        offer: &CandidateOffer,
        price_change: Option<i32>,
    ) -> CoreResult<()>;

    /// Confirms that a search was saved and is now monitored
    async fn send_welcome(&self, to: &str, search_name: &str) -> CoreResult<()>;
}

/// A message recorded by [`MockNotifier`]
#[derive(Debug, Clone, PartialEq)]
pub enum SentMessage {
    Alert {
        to: String,
        search_name: String,
        destination: String,
        price: i32,
        price_change: Option<i32>,
    },
    Welcome {
        to: String,
        search_name: String,
    },
}

/// In-process notifier that records what it was asked to send
#[derive(Debug, Default)]
pub struct MockNotifier {
    failing: AtomicBool,
    sent: Mutex<Vec<SentMessage>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following send fail with `DispatchFailure`
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn alerts_sent(&self) -> usize {
        self.sent()
            .iter()
            .filter(|m| matches!(m, SentMessage::Alert { .. }))
            .count()
    }

    fn record(&self, message: SentMessage) -> CoreResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(CoreError::DispatchFailure("simulated delivery failure".to_string()));
        }
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).push(message);
        Ok(())
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send_alert(
        &self,
        to: &str,
        search_name: &str,
        offer: &CandidateOffer,
        price_change: Option<i32>,
    ) -> CoreResult<()> {
        self.record(SentMessage::Alert {
            to: to.to_string(),
            search_name: search_name.to_string(),
            destination: offer.destination.clone(),
            price: offer.price,
            price_change,
        })
    }

    async fn send_welcome(&self, to: &str, search_name: &str) -> CoreResult<()> {
        self.record(SentMessage::Welcome {
            to: to.to_string(),
            search_name: search_name.to_string(),
        })
    }
}
