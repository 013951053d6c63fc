use std::collections::BTreeMap;

use serde_json::Map;
use serde_json::Value;

use crate::entities::CallLogEntry;
use crate::entities::Contact;
use crate::entities::Conversation;
use crate::entities::Email;
use crate::entities::Message;
use crate::entities::SettingValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Contacts,
    CallLog,
    Call,
    Messages,
    Mail,
    Camera,
    Settings,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Self::Contacts => "/phone/contacts",
            Self::CallLog => "/phone/calllogs",
            Self::Call => "/phone/call",
            Self::Messages => "/phone/messages",
            Self::Mail => "/phone/mail",
            Self::Camera => "/phone/camera",
            Self::Settings => "/phone/settings",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Contacts => "contacts",
            Self::CallLog => "call-log",
            Self::Call => "call",
            Self::Messages => "messages",
            Self::Mail => "mail",
            Self::Camera => "camera",
            Self::Settings => "settings",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionTag {
    GetContacts,
    AddContact,
    GetCallLog,
    StartCall,
    GetConversations,
    GetMessages,
    SendMessage,
    GetEmails,
    SendEmail,
    MarkRead,
    TakePhoto,
    StartRecording,
    StopRecording,
    SwitchCamera,
    GetSettings,
    UpdateSetting,
}

impl ActionTag {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GetContacts => "get_contacts",
            Self::AddContact => "add_contact",
            Self::GetCallLog => "get_call_log",
            Self::StartCall => "start_call",
            Self::GetConversations => "get_conversations",
            Self::GetMessages => "get_messages",
            Self::SendMessage => "send_message",
            Self::GetEmails => "get_emails",
            Self::SendEmail => "send_email",
            Self::MarkRead => "mark_read",
            Self::TakePhoto => "take_photo",
            Self::StartRecording => "start_recording",
            Self::StopRecording => "stop_recording",
            Self::SwitchCamera => "switch_camera",
            Self::GetSettings => "get_settings",
            Self::UpdateSetting => "update_setting",
        }
    }
}

/// One request/acknowledgement exchange with the backend. The payload is flat;
/// the client adds `source` and `action` when it goes on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendRequest {
    pub endpoint: Endpoint,
    pub action: ActionTag,
    pub payload: Map<String, Value>,
}

impl BackendRequest {
    pub fn new(endpoint: Endpoint, action: ActionTag) -> Self {
        Self {
            endpoint,
            action,
            payload: Map::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.payload.insert(key.to_string(), value.into());
        self
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }
}

/// Which app-local dataset a fetch populates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DatasetKey {
    CallLog,
    Contacts,
    Conversations,
    Thread { conversation_id: u64, contact: String },
    Inbox,
    Settings,
    Capture,
}

impl DatasetKey {
    pub fn label(&self) -> &'static str {
        match self {
            Self::CallLog => "call-log",
            Self::Contacts => "contacts",
            Self::Conversations => "conversations",
            Self::Thread { .. } => "thread",
            Self::Inbox => "inbox",
            Self::Settings => "settings",
            Self::Capture => "capture",
        }
    }

    /// The request that populates this dataset.
    pub fn request(&self) -> BackendRequest {
        match self {
            Self::CallLog => BackendRequest::new(Endpoint::CallLog, ActionTag::GetCallLog),
            Self::Contacts => BackendRequest::new(Endpoint::Contacts, ActionTag::GetContacts),
            Self::Conversations => {
                BackendRequest::new(Endpoint::Messages, ActionTag::GetConversations)
            }
            Self::Thread { contact, .. } => {
                BackendRequest::new(Endpoint::Messages, ActionTag::GetMessages)
                    .with("contact", contact.as_str())
            }
            Self::Inbox => BackendRequest::new(Endpoint::Mail, ActionTag::GetEmails),
            Self::Settings => BackendRequest::new(Endpoint::Settings, ActionTag::GetSettings),
            Self::Capture => BackendRequest::new(Endpoint::Camera, ActionTag::TakePhoto),
        }
    }
}

/// Identifies one in-flight fetch. A result is only committed while the
/// ticket's session is still active and the dataset still waits on `request_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub session: u64,
    pub request_id: u64,
    pub key: DatasetKey,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub ticket: FetchTicket,
    pub request: BackendRequest,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchPayload {
    CallLog(Vec<CallLogEntry>),
    Contacts(Vec<Contact>),
    Conversations(Vec<Conversation>),
    Thread(Vec<Message>),
    Inbox(Vec<Email>),
    /// Overrides merged onto the default settings list.
    Settings(BTreeMap<String, SettingValue>),
    /// `None` when the backend acknowledged the capture without a photo.
    Capture(Option<String>),
}

impl FetchPayload {
    pub fn len(&self) -> usize {
        match self {
            Self::CallLog(items) => items.len(),
            Self::Contacts(items) => items.len(),
            Self::Conversations(items) => items.len(),
            Self::Thread(items) => items.len(),
            Self::Inbox(items) => items.len(),
            Self::Settings(items) => items.len(),
            Self::Capture(photo) => usize::from(photo.is_some()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    PlaybackTick,
    PageLoad,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerTicket {
    pub session: u64,
    pub timer_id: u64,
    pub kind: TimerKind,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn thread_request_carries_contact() {
        let key = DatasetKey::Thread {
            conversation_id: 2,
            contact: "Mechanic Shop".to_string(),
        };
        let request = key.request();
        assert_eq!(request.endpoint, Endpoint::Messages);
        assert_eq!(request.action, ActionTag::GetMessages);
        assert_eq!(
            request.field("contact"),
            Some(&Value::from("Mechanic Shop"))
        );
    }

    #[test]
    fn endpoint_paths_are_stable() {
        let paths: Vec<&'static str> = [
            Endpoint::Contacts,
            Endpoint::CallLog,
            Endpoint::Call,
            Endpoint::Messages,
            Endpoint::Mail,
            Endpoint::Camera,
            Endpoint::Settings,
        ]
        .into_iter()
        .map(Endpoint::path)
        .collect();
        assert_eq!(
            paths,
            vec![
                "/phone/contacts",
                "/phone/calllogs",
                "/phone/call",
                "/phone/messages",
                "/phone/mail",
                "/phone/camera",
                "/phone/settings",
            ]
        );
    }
}
