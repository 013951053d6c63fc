//! Response shapes the backend answers with.
//!
//! Every envelope is a JSON object whose list field may be absent; an absent
//! field decodes to an empty (live) list.

use std::collections::BTreeMap;

use phone_core::entities::CallLogEntry;
use phone_core::entities::Contact;
use phone_core::entities::Conversation;
use phone_core::entities::Email;
use phone_core::entities::Message;
use phone_core::entities::SettingValue;
use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactsEnvelope {
    pub contacts: Vec<Contact>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CallLogEnvelope {
    pub logs: Vec<CallLogEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationsEnvelope {
    pub conversations: Vec<Conversation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessagesEnvelope {
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailsEnvelope {
    pub emails: Vec<Email>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsEnvelope {
    pub settings: BTreeMap<String, SettingValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CaptureEnvelope {
    pub success: bool,
    pub photo_url: Option<String>,
}

impl CaptureEnvelope {
    /// The photo to keep, if the backend took one.
    pub fn into_photo(self) -> Option<String> {
        if self.success {
            self.photo_url
        } else {
            None
        }
    }
}

/// A dataset read; `degraded` marks data served from fallbacks.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub data: T,
    pub degraded: bool,
}

impl<T> Fetched<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
        Fetched {
            data: f(self.data),
            degraded: self.degraded,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ack {
    Delivered,
    Dropped,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn missing_list_field_is_an_empty_list() {
        let envelope: EmailsEnvelope = serde_json::from_value(json!({ "ok": true })).unwrap();
        assert_eq!(envelope, EmailsEnvelope::default());
    }

    #[test]
    fn declined_capture_keeps_no_photo() {
        let declined: CaptureEnvelope =
            serde_json::from_value(json!({ "success": false, "photoUrl": "x" })).unwrap();
        assert_eq!(declined.into_photo(), None);

        let taken: CaptureEnvelope =
            serde_json::from_value(json!({ "success": true, "photoUrl": "x" })).unwrap();
        assert_eq!(taken.into_photo(), Some("x".to_string()));
    }

    #[test]
    fn settings_map_accepts_flags_and_levels() {
        let envelope: SettingsEnvelope = serde_json::from_value(json!({
            "settings": { "wifi": false, "volume": 40 }
        }))
        .unwrap();
        assert_eq!(envelope.settings.get("wifi"), Some(&SettingValue::Flag(false)));
        assert_eq!(envelope.settings.get("volume"), Some(&SettingValue::Level(40)));
    }

    #[test]
    fn over_range_level_keeps_the_rest_of_the_map() {
        let envelope: SettingsEnvelope = serde_json::from_value(json!({
            "settings": { "volume": 300, "wifi": false }
        }))
        .unwrap();
        assert_eq!(envelope.settings.get("wifi"), Some(&SettingValue::Flag(false)));
        assert_eq!(envelope.settings.get("volume"), Some(&SettingValue::Level(u8::MAX)));
    }
}
