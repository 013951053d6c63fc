use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: u64,
    pub contact: String,
    pub last_message: String,
    pub timestamp: String,
    #[serde(default)]
    pub unread: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: u64,
    pub sender: String,
    pub content: String,
    pub timestamp: String,
    #[serde(default)]
    pub is_own: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Email {
    pub id: u64,
    pub sender: String,
    pub subject: String,
    pub preview: String,
    pub timestamp: String,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub is_important: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: u64,
    pub name: String,
    pub number: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallDirection {
    Incoming,
    Outgoing,
    Missed,
}

impl CallDirection {
    pub fn label(self) -> &'static str {
        match self {
            Self::Incoming => "incoming",
            Self::Outgoing => "outgoing",
            Self::Missed => "missed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallLogEntry {
    pub id: u64,
    pub contact: String,
    pub number: String,
    #[serde(rename = "type")]
    pub direction: CallDirection,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingKind {
    Toggle,
    Slider,
    Navigation,
}

/// Wire form is untagged: `true`, `75`, or absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Flag(bool),
    Level(#[serde(deserialize_with = "saturating_level")] u8),
    None,
}

/// Any JSON number decodes; out-of-range values saturate into `u8`.
fn saturating_level<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    Ok(raw.round().clamp(0.0, f64::from(u8::MAX)) as u8)
}

impl SettingValue {
    pub fn as_flag(self) -> Option<bool> {
        match self {
            Self::Flag(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_level(self) -> Option<u8> {
        match self {
            Self::Level(value) => Some(value),
            _ => None,
        }
    }

    pub fn to_json(self) -> serde_json::Value {
        match self {
            Self::Flag(value) => serde_json::Value::Bool(value),
            Self::Level(value) => serde_json::Value::from(value),
            Self::None => serde_json::Value::Null,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setting {
    pub id: String,
    pub label: String,
    pub kind: SettingKind,
    pub value: SettingValue,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn email_decodes_camel_case_wire_names() {
        let email: Email = serde_json::from_str(
            r#"{"id":7,"sender":"City Hall","subject":"S","preview":"P","timestamp":"now","isRead":false,"isImportant":true}"#,
        )
        .unwrap();
        assert!(!email.is_read);
        assert!(email.is_important);
        assert_eq!(email.attachments, None);
    }

    #[test]
    fn call_log_direction_uses_type_field() {
        let entry: CallLogEntry = serde_json::from_str(
            r#"{"id":2,"contact":"Unknown","number":"555-0199","type":"missed","timestamp":"1 hour ago"}"#,
        )
        .unwrap();
        assert_eq!(entry.direction, CallDirection::Missed);
        assert_eq!(entry.duration, None);
    }

    #[test]
    fn out_of_range_levels_saturate_instead_of_failing() {
        let values: Vec<SettingValue> =
            serde_json::from_str("[300, -4, 42.6, true, null]").unwrap();
        assert_eq!(
            values,
            vec![
                SettingValue::Level(u8::MAX),
                SettingValue::Level(0),
                SettingValue::Level(43),
                SettingValue::Flag(true),
                SettingValue::None,
            ]
        );
    }
}
