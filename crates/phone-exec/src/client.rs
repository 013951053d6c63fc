use std::time::Duration;

use phone_core::config::BackendConfig;
use phone_core::remote::BackendRequest;
use serde::de::DeserializeOwned;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

use crate::contracts::Ack;
use crate::contracts::Fetched;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("backend is offline")]
    Offline,
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("backend answered with status {0}")]
    Status(u16),
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// One JSON POST round-trip.
pub trait Transport: Send + Sync {
    fn post(&self, url: &str, body: &Value) -> Result<Value, TransportError>;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self { http })
    }
}

impl Transport for HttpTransport {
    fn post(&self, url: &str, body: &Value) -> Result<Value, TransportError> {
        let response = self.http.post(url).json(body).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }
        let text = response.text()?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Never reaches a backend; every read is served from fallbacks.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineTransport;

impl Transport for OfflineTransport {
    fn post(&self, _url: &str, _body: &Value) -> Result<Value, TransportError> {
        Err(TransportError::Offline)
    }
}

pub struct RemoteDataClient {
    transport: Box<dyn Transport>,
    base_url: String,
    source: String,
}

impl std::fmt::Debug for RemoteDataClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteDataClient")
            .field("base_url", &self.base_url)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl RemoteDataClient {
    pub fn new(transport: Box<dyn Transport>, backend: &BackendConfig) -> Self {
        Self {
            transport,
            base_url: backend.url.trim_end_matches('/').to_string(),
            source: backend.source.clone(),
        }
    }

    /// HTTP unless the config asks for offline mode.
    pub fn from_config(backend: &BackendConfig) -> Result<Self, TransportError> {
        let transport: Box<dyn Transport> = if backend.offline {
            Box::new(OfflineTransport)
        } else {
            Box::new(HttpTransport::new(Duration::from_millis(backend.timeout_ms))?)
        };
        Ok(Self::new(transport, backend))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, request: &BackendRequest) -> String {
        format!("{}{}", self.base_url, request.endpoint.path())
    }

    /// Flat body: `source` and `action` first, then the request payload.
    pub fn wire_body(&self, request: &BackendRequest) -> Value {
        let mut body = Map::new();
        body.insert("source".to_string(), Value::from(self.source.as_str()));
        body.insert("action".to_string(), Value::from(request.action.as_str()));
        for (key, value) in &request.payload {
            body.entry(key.clone()).or_insert_with(|| value.clone());
        }
        Value::Object(body)
    }

    fn exchange(&self, request: &BackendRequest) -> Result<Value, TransportError> {
        self.transport
            .post(&self.url_for(request), &self.wire_body(request))
    }

    /// Reads a dataset, folding every failure into `fallback`.
    pub fn call<T: DeserializeOwned>(
        &self,
        request: &BackendRequest,
        fallback: impl FnOnce() -> T,
    ) -> Fetched<T> {
        let decoded = self
            .exchange(request)
            .and_then(|body| serde_json::from_value::<T>(body).map_err(TransportError::from));
        match decoded {
            Ok(data) => {
                tracing::debug!(
                    endpoint = request.endpoint.label(),
                    action = request.action.as_str(),
                    "live data received"
                );
                Fetched {
                    data,
                    degraded: false,
                }
            }
            Err(err) => {
                tracing::warn!(
                    endpoint = request.endpoint.label(),
                    action = request.action.as_str(),
                    error = %err,
                    "backend read failed, serving fallback"
                );
                Fetched {
                    data: fallback(),
                    degraded: true,
                }
            }
        }
    }

    /// Fire-and-forget persist. The response body is ignored.
    pub fn send(&self, request: &BackendRequest) -> Ack {
        match self.exchange(request) {
            Ok(_) => Ack::Delivered,
            Err(err) => {
                tracing::warn!(
                    endpoint = request.endpoint.label(),
                    action = request.action.as_str(),
                    error = %err,
                    "backend write dropped"
                );
                Ack::Dropped
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use phone_core::remote::ActionTag;
    use phone_core::remote::Endpoint;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::contracts::ConversationsEnvelope;

    /// Replays canned responses in order and records what was posted.
    #[derive(Default)]
    pub(crate) struct ScriptedTransport {
        replies: Mutex<VecDeque<Result<Value, TransportError>>>,
        posted: Mutex<Vec<(String, Value)>>,
    }

    impl ScriptedTransport {
        pub(crate) fn replying(replies: Vec<Result<Value, TransportError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                posted: Mutex::new(Vec::new()),
            }
        }
    }

    impl Transport for std::sync::Arc<ScriptedTransport> {
        fn post(&self, url: &str, body: &Value) -> Result<Value, TransportError> {
            self.posted
                .lock()
                .unwrap()
                .push((url.to_string(), body.clone()));
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(TransportError::Offline))
        }
    }

    pub(crate) fn client_with(
        replies: Vec<Result<Value, TransportError>>,
    ) -> (RemoteDataClient, std::sync::Arc<ScriptedTransport>) {
        let transport = std::sync::Arc::new(ScriptedTransport::replying(replies));
        let backend = BackendConfig {
            url: "http://backend.test/".to_string(),
            ..BackendConfig::default()
        };
        let client = RemoteDataClient::new(Box::new(transport.clone()), &backend);
        (client, transport)
    }

    pub(crate) fn posted(transport: &ScriptedTransport) -> Vec<(String, Value)> {
        transport.posted.lock().unwrap().clone()
    }

    fn fallback_conversations() -> ConversationsEnvelope {
        ConversationsEnvelope {
            conversations: phone_core::fallback::conversations(),
        }
    }

    #[test]
    fn request_is_posted_flat_with_source_and_action() {
        let (client, transport) = client_with(vec![Ok(json!({}))]);
        let request = BackendRequest::new(Endpoint::Messages, ActionTag::SendMessage)
            .with("recipient", "Bank Manager")
            .with("message", "hi");

        assert_eq!(client.send(&request), Ack::Delivered);
        assert_eq!(
            posted(&transport),
            vec![(
                "http://backend.test/phone/messages".to_string(),
                json!({
                    "source": "player",
                    "action": "send_message",
                    "recipient": "Bank Manager",
                    "message": "hi",
                })
            )]
        );
    }

    #[test]
    fn live_response_is_not_degraded() {
        let (client, _) = client_with(vec![Ok(json!({
            "conversations": [
                { "id": 7, "contact": "Dispatch", "lastMessage": "10-4", "timestamp": "now", "unread": 2 }
            ]
        }))]);
        let request = BackendRequest::new(Endpoint::Messages, ActionTag::GetConversations);
        let fetched = client.call(&request, fallback_conversations);

        assert!(!fetched.degraded);
        assert_eq!(fetched.data.conversations.len(), 1);
        assert_eq!(fetched.data.conversations[0].unread, 2);
    }

    #[test]
    fn missing_field_is_live_and_empty() {
        let (client, _) = client_with(vec![Ok(json!({ "status": "ok" }))]);
        let request = BackendRequest::new(Endpoint::Messages, ActionTag::GetConversations);
        let fetched = client.call(&request, fallback_conversations);
        assert_eq!(fetched, Fetched {
            data: ConversationsEnvelope::default(),
            degraded: false,
        });
    }

    #[test]
    fn every_failure_serves_the_fallback() {
        let failures = vec![
            Err(TransportError::Offline),
            Err(TransportError::Status(500)),
            Ok(json!(["not", "an", "object"])),
            Ok(json!({ "conversations": [{ "id": "x" }] })),
        ];
        let count = failures.len();
        let (client, _) = client_with(failures);
        let request = BackendRequest::new(Endpoint::Messages, ActionTag::GetConversations);

        for _ in 0..count {
            let fetched = client.call(&request, fallback_conversations);
            assert!(fetched.degraded);
            assert_eq!(fetched.data, fallback_conversations());
        }
    }

    #[test]
    fn failed_write_is_dropped() {
        let (client, _) = client_with(vec![Err(TransportError::Status(503))]);
        let request = BackendRequest::new(Endpoint::Mail, ActionTag::MarkRead).with("emailId", 1);
        assert_eq!(client.send(&request), Ack::Dropped);
    }

    #[test]
    fn offline_transport_always_fails() {
        let backend = BackendConfig {
            offline: true,
            ..BackendConfig::default()
        };
        let client = RemoteDataClient::from_config(&backend).unwrap();
        let request = BackendRequest::new(Endpoint::Contacts, ActionTag::GetContacts);
        assert_eq!(client.send(&request), Ack::Dropped);
    }
}
