//! Scripted transport and client builders shared by unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::Value;

use super::api::ApiClient;
use super::navigator::MemoryNavigator;
use super::storage::{MemoryStorage, StorageError, TokenStorage};
use super::transport::{HttpRequest, HttpResponse, HttpTransport, TransportError};

pub(crate) const TEST_BASE_URL: &str = "http://api.test/api";

/// Transport replaying queued responses and recording every request.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn reply(&self, response: HttpResponse) -> &Self {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Ok(response));
        self
    }

    pub(crate) fn reply_json(&self, status: u16, body: &Value) -> &Self {
        self.reply(HttpResponse::json(status, body))
    }

    pub(crate) fn reply_text(&self, status: u16, content_type: Option<&str>, body: &str) -> &Self {
        self.reply(HttpResponse { status, content_type: content_type.map(str::to_owned), body: body.to_owned() })
    }

    pub(crate) fn reply_error(&self, message: &str) -> &Self {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Err(TransportError::Request(message.to_owned())));
        self
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn last_request(&self) -> HttpRequest {
        self.requests().pop().expect("no request was sent")
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Request("no scripted reply".to_owned())))
    }
}

/// Storage that can be read but never written, like a full disk.
#[derive(Debug, Default)]
pub(crate) struct ReadOnlyStorage;

impl TokenStorage for ReadOnlyStorage {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Io(std::io::Error::other("disk full")))
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Ok(())
    }
}

/// A client wired to in-memory collaborators, plus handles to each.
pub(crate) struct Harness {
    pub api: ApiClient,
    pub transport: Arc<ScriptedTransport>,
    pub storage: Arc<MemoryStorage>,
    pub navigator: Arc<MemoryNavigator>,
}

impl Harness {
    pub(crate) fn new() -> Self {
        Self::with(MemoryStorage::new(), MemoryNavigator::default())
    }

    pub(crate) fn with_token(token: &str) -> Self {
        Self::with(MemoryStorage::with_token(token), MemoryNavigator::default())
    }

    pub(crate) fn with(storage: MemoryStorage, navigator: MemoryNavigator) -> Self {
        let transport = Arc::new(ScriptedTransport::default());
        let storage = Arc::new(storage);
        let navigator = Arc::new(navigator);
        let api = ApiClient::new(TEST_BASE_URL, transport.clone(), storage.clone(), navigator.clone());
        Self { api, transport, storage, navigator }
    }

    /// A client whose storage rejects every write, with its transport.
    pub(crate) fn read_only() -> (ApiClient, Arc<ScriptedTransport>) {
        let transport = Arc::new(ScriptedTransport::default());
        let api = ApiClient::new(
            TEST_BASE_URL,
            transport.clone(),
            Arc::new(ReadOnlyStorage),
            Arc::new(MemoryNavigator::default()),
        );
        (api, transport)
    }
}
