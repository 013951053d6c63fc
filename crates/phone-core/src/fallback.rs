//! Synthetic datasets served when the backend cannot be reached.

use crate::entities::CallDirection;
use crate::entities::CallLogEntry;
use crate::entities::Contact;
use crate::entities::Conversation;
use crate::entities::Email;
use crate::entities::Message;
use crate::entities::Setting;
use crate::entities::SettingKind;
use crate::entities::SettingValue;

pub fn contacts() -> Vec<Contact> {
    vec![
        contact(1, "Police Department", "911"),
        contact(2, "EMS", "912"),
        contact(3, "Mechanic", "555-0123"),
    ]
}

pub fn call_log() -> Vec<CallLogEntry> {
    vec![
        CallLogEntry {
            id: 1,
            contact: "Police Department".to_string(),
            number: "911".to_string(),
            direction: CallDirection::Outgoing,
            timestamp: "2 min ago".to_string(),
            duration: Some("1:23".to_string()),
        },
        CallLogEntry {
            id: 2,
            contact: "Unknown".to_string(),
            number: "555-0199".to_string(),
            direction: CallDirection::Missed,
            timestamp: "1 hour ago".to_string(),
            duration: None,
        },
    ]
}

pub fn conversations() -> Vec<Conversation> {
    vec![
        conversation(1, "Police Department", "We received your report", "2 min ago", 0),
        conversation(2, "Mechanic Shop", "Your car is ready for pickup", "1 hour ago", 1),
        conversation(3, "Bank Manager", "Loan approved", "3 hours ago", 0),
    ]
}

pub fn thread(contact: &str) -> Vec<Message> {
    vec![
        message(1, contact, "Hello, how can I help you?", "10:30 AM", false),
        message(2, "You", "I need assistance with my vehicle", "10:32 AM", true),
        message(3, contact, "Sure, bring it to our shop", "10:35 AM", false),
    ]
}

pub fn inbox() -> Vec<Email> {
    vec![
        Email {
            id: 1,
            sender: "City Hall".to_string(),
            subject: "Vehicle Registration Renewal".to_string(),
            preview: "Your vehicle registration expires soon...".to_string(),
            timestamp: "2 hours ago".to_string(),
            is_read: false,
            is_important: true,
            attachments: None,
        },
        Email {
            id: 2,
            sender: "Bank of Los Santos".to_string(),
            subject: "Account Statement".to_string(),
            preview: "Your monthly statement is ready...".to_string(),
            timestamp: "1 day ago".to_string(),
            is_read: true,
            is_important: false,
            attachments: Some(1),
        },
        Email {
            id: 3,
            sender: "Job Center".to_string(),
            subject: "New Job Opportunities".to_string(),
            preview: "We have found matching positions...".to_string(),
            timestamp: "3 days ago".to_string(),
            is_read: true,
            is_important: false,
            attachments: None,
        },
    ]
}

/// Defaults for the settings list; live values are merged over these.
pub fn settings() -> Vec<Setting> {
    vec![
        setting("wifi", "Wi-Fi", SettingKind::Toggle, SettingValue::Flag(true)),
        setting("bluetooth", "Bluetooth", SettingKind::Toggle, SettingValue::Flag(false)),
        setting("volume", "Volume", SettingKind::Slider, SettingValue::Level(75)),
        setting("notifications", "Notifications", SettingKind::Toggle, SettingValue::Flag(true)),
        setting("privacy", "Privacy & Security", SettingKind::Navigation, SettingValue::None),
        setting("profile", "Profile", SettingKind::Navigation, SettingValue::None),
        setting("device", "Device Info", SettingKind::Navigation, SettingValue::None),
        setting("battery", "Battery", SettingKind::Navigation, SettingValue::None),
    ]
}

pub fn capture(nonce: u64) -> Option<String> {
    Some(format!("https://picsum.photos/400/600?random={nonce}"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileField {
    pub label: &'static str,
    pub value: &'static str,
}

pub const PROFILE_FIELDS: [ProfileField; 6] = [
    ProfileField {
        label: "Phone",
        value: "555-0123",
    },
    ProfileField {
        label: "Bank",
        value: "$12,450",
    },
    ProfileField {
        label: "Job",
        value: "Taxi Driver",
    },
    ProfileField {
        label: "Playtime",
        value: "127 hours",
    },
    ProfileField {
        label: "Level",
        value: "25",
    },
    ProfileField {
        label: "Reputation",
        value: "Good Citizen",
    },
];

fn contact(id: u64, name: &str, number: &str) -> Contact {
    Contact {
        id,
        name: name.to_string(),
        number: number.to_string(),
    }
}

fn conversation(
    id: u64,
    contact: &str,
    last_message: &str,
    timestamp: &str,
    unread: u32,
) -> Conversation {
    Conversation {
        id,
        contact: contact.to_string(),
        last_message: last_message.to_string(),
        timestamp: timestamp.to_string(),
        unread,
    }
}

fn message(id: u64, sender: &str, content: &str, timestamp: &str, is_own: bool) -> Message {
    Message {
        id,
        sender: sender.to_string(),
        content: content.to_string(),
        timestamp: timestamp.to_string(),
        is_own,
    }
}

fn setting(id: &str, label: &str, kind: SettingKind, value: SettingValue) -> Setting {
    Setting {
        id: id.to_string(),
        label: label.to_string(),
        kind,
        value,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn fallback_lists_have_unique_ids() {
        let conversation_ids: BTreeSet<u64> = conversations().iter().map(|c| c.id).collect();
        assert_eq!(conversation_ids.len(), conversations().len());

        let email_ids: BTreeSet<u64> = inbox().iter().map(|e| e.id).collect();
        assert_eq!(email_ids.len(), inbox().len());

        let setting_ids: BTreeSet<String> = settings().into_iter().map(|s| s.id).collect();
        assert_eq!(setting_ids.len(), settings().len());
    }

    #[test]
    fn thread_fallback_names_the_contact() {
        let messages = thread("Bank Manager");
        assert!(messages
            .iter()
            .filter(|m| !m.is_own)
            .all(|m| m.sender == "Bank Manager"));
    }
}
