// Fakes compartidos por los tests: almacenamiento en memoria y un transporte
// que devuelve respuestas guionizadas en orden y registra lo enviado.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::future::Future;
use std::rc::Rc;

use async_trait::async_trait;
use serde_json::Value;

use crate::services::transport::{HttpTransport, OutgoingRequest, RawResponse, TransportError};
use crate::utils::{MemoryStore, NamespacedStorage};

pub const TEST_PREFIX: &str = "test_";

pub fn memory_storage() -> (MemoryStore, NamespacedStorage) {
    let raw = MemoryStore::new();
    let storage = NamespacedStorage::new(Rc::new(raw.clone()), TEST_PREFIX);
    (raw, storage)
}

pub fn block_on<F: Future>(future: F) -> F::Output {
    futures::executor::block_on(future)
}

#[derive(Clone, Default)]
pub struct ScriptedTransport {
    replies: Rc<RefCell<VecDeque<Result<RawResponse, TransportError>>>>,
    requests: Rc<RefCell<Vec<OutgoingRequest>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply_json(&self, status: u16, body: Value) {
        self.reply_text(status, &body.to_string());
    }

    pub fn reply_text(&self, status: u16, body: &str) {
        self.replies.borrow_mut().push_back(Ok(RawResponse {
            status,
            body: body.to_string(),
        }));
    }

    pub fn fail(&self, message: &str) {
        self.replies
            .borrow_mut()
            .push_back(Err(TransportError(message.to_string())));
    }

    pub fn requests(&self) -> Vec<OutgoingRequest> {
        self.requests.borrow().clone()
    }

    pub fn last_request(&self) -> Option<OutgoingRequest> {
        self.requests.borrow().last().cloned()
    }

    /// URLs llamadas, en orden
    pub fn urls(&self) -> Vec<String> {
        self.requests.borrow().iter().map(|r| r.url.clone()).collect()
    }
}

#[async_trait(?Send)]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: OutgoingRequest) -> Result<RawResponse, TransportError> {
        self.requests.borrow_mut().push(request);
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError("no scripted reply".to_string())))
    }
}
