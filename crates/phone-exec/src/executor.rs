use phone_core::actions::RuntimeAction;
use phone_core::fallback;
use phone_core::remote::BackendRequest;
use phone_core::remote::DatasetKey;
use phone_core::remote::FetchPayload;
use phone_core::remote::FetchRequest;

use crate::client::RemoteDataClient;
use crate::contracts::Ack;
use crate::contracts::CallLogEnvelope;
use crate::contracts::CaptureEnvelope;
use crate::contracts::ContactsEnvelope;
use crate::contracts::ConversationsEnvelope;
use crate::contracts::EmailsEnvelope;
use crate::contracts::Fetched;
use crate::contracts::MessagesEnvelope;
use crate::contracts::SettingsEnvelope;

/// Outcome of reading one dataset outside of any app session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    pub dataset: &'static str,
    pub degraded: bool,
    pub items: usize,
}

/// Runs reducer effects against the backend.
#[derive(Debug)]
pub struct EffectExecutor {
    client: RemoteDataClient,
}

impl EffectExecutor {
    pub fn new(client: RemoteDataClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &RemoteDataClient {
        &self.client
    }

    /// Always resolves: a failed read carries the dataset's fallback.
    pub fn resolve_fetch(&self, fetch: FetchRequest) -> RuntimeAction {
        let Fetched { data, degraded } =
            self.read(&fetch.ticket.key, &fetch.request, fetch.ticket.request_id);
        RuntimeAction::FetchResolved {
            ticket: fetch.ticket,
            payload: data,
            degraded,
        }
    }

    /// `Some` only when the write was dropped.
    pub fn dispatch_write(&self, request: BackendRequest) -> Option<RuntimeAction> {
        match self.client.send(&request) {
            Ack::Delivered => None,
            Ack::Dropped => Some(RuntimeAction::WriteDropped {
                endpoint: request.endpoint,
                action: request.action,
            }),
        }
    }

    fn read(&self, key: &DatasetKey, request: &BackendRequest, nonce: u64) -> Fetched<FetchPayload> {
        match key {
            DatasetKey::CallLog => self
                .client
                .call(request, || CallLogEnvelope {
                    logs: fallback::call_log(),
                })
                .map(|envelope| FetchPayload::CallLog(envelope.logs)),
            DatasetKey::Contacts => self
                .client
                .call(request, || ContactsEnvelope {
                    contacts: fallback::contacts(),
                })
                .map(|envelope| FetchPayload::Contacts(envelope.contacts)),
            DatasetKey::Conversations => self
                .client
                .call(request, || ConversationsEnvelope {
                    conversations: fallback::conversations(),
                })
                .map(|envelope| FetchPayload::Conversations(envelope.conversations)),
            DatasetKey::Thread { contact, .. } => self
                .client
                .call(request, || MessagesEnvelope {
                    messages: fallback::thread(contact),
                })
                .map(|envelope| FetchPayload::Thread(envelope.messages)),
            DatasetKey::Inbox => self
                .client
                .call(request, || EmailsEnvelope {
                    emails: fallback::inbox(),
                })
                .map(|envelope| FetchPayload::Inbox(envelope.emails)),
            // Defaults are merged in by the settings view, so the fallback adds no overrides.
            DatasetKey::Settings => self
                .client
                .call(request, SettingsEnvelope::default)
                .map(|envelope| FetchPayload::Settings(envelope.settings)),
            DatasetKey::Capture => self
                .client
                .call(request, || CaptureEnvelope {
                    success: true,
                    photo_url: fallback::capture(nonce),
                })
                .map(|envelope| FetchPayload::Capture(envelope.into_photo())),
        }
    }

    /// Reads every list dataset once, the way the apps would on first open.
    pub fn probe(&self) -> Vec<ProbeReport> {
        let keys = [
            DatasetKey::CallLog,
            DatasetKey::Contacts,
            DatasetKey::Conversations,
            DatasetKey::Inbox,
            DatasetKey::Settings,
        ];
        keys.iter()
            .map(|key| {
                let fetched = self.read(key, &key.request(), 0);
                ProbeReport {
                    dataset: key.label(),
                    degraded: fetched.degraded,
                    items: fetched.data.len(),
                }
            })
            .collect()
    }
}
