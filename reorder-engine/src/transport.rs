//! Transport abstraction.
//!
//! Delivers reorder requests to the authoritative store and returns its raw
//! reply. The hook never retries; a delivery failure is treated like a
//! rejection.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::HookResult;
use crate::protocol::ReorderRequest;

/// Pushes reorder requests to the server.
#[async_trait]
pub trait ReorderTransport: Send + Sync {
    /// Sends a request and waits for its reply.
    async fn push(&self, request: ReorderRequest) -> HookResult<Value>;
}

/// A scripted transport for testing.
pub mod mock {
    use super::*;
    use crate::error::HookError;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex, MutexGuard};
    use std::time::Duration;

    /// One scripted reply.
    #[derive(Debug, Clone)]
    pub enum MockReply {
        /// Reply with a value after a delay.
        Value(Value, Duration),
        /// Fail delivery after a delay.
        Fail(String, Duration),
    }

    #[derive(Debug, Default)]
    struct Inner {
        sent: Vec<ReorderRequest>,
        replies: VecDeque<MockReply>,
    }

    /// Records requests and answers from a script. With an empty script every
    /// request is accepted immediately.
    #[derive(Debug, Clone, Default)]
    pub struct MockTransport {
        inner: Arc<Mutex<Inner>>,
    }

    impl MockTransport {
        /// Creates a transport with an empty script.
        pub fn new() -> Self {
            Self::default()
        }

        /// Queues a reply.
        pub fn queue(&self, reply: MockReply) {
            self.lock().replies.push_back(reply);
        }

        /// Queues an immediate acceptance.
        pub fn accept(&self) {
            self.queue(MockReply::Value(Value::Object(Default::default()), Duration::ZERO));
        }

        /// Queues a rejection after `delay`.
        pub fn reject_after(&self, message: &str, delay: Duration) {
            self.queue(MockReply::Value(
                serde_json::json!({ "error": message }),
                delay,
            ));
        }

        /// Every request pushed so far.
        pub fn sent(&self) -> Vec<ReorderRequest> {
            self.lock().sent.clone()
        }

        fn lock(&self) -> MutexGuard<'_, Inner> {
            self.inner.lock().unwrap_or_else(|e| e.into_inner())
        }
    }

    #[async_trait]
    impl ReorderTransport for MockTransport {
        async fn push(&self, request: ReorderRequest) -> HookResult<Value> {
            let reply = {
                let mut inner = self.lock();
                inner.sent.push(request);
                inner.replies.pop_front()
            };
            match reply {
                None => Ok(Value::Object(Default::default())),
                Some(MockReply::Value(value, delay)) => {
                    tokio::time::sleep(delay).await;
                    Ok(value)
                }
                Some(MockReply::Fail(message, delay)) => {
                    tokio::time::sleep(delay).await;
                    Err(HookError::Transport(message))
                }
            }
        }
    }
}
