use super::BackOutcome;
use super::FetchCommit;
use super::LocalList;
use super::StackCtx;
use super::ViewFrame;
use super::ViewStack;
use crate::entities::CallLogEntry;
use crate::entities::Contact;
use crate::reducer::PhoneEffect;
use crate::remote::ActionTag;
use crate::remote::BackendRequest;
use crate::remote::DatasetKey;
use crate::remote::Endpoint;
use crate::remote::FetchPayload;

pub const KEYPAD_KEYS: [char; 12] = ['1', '2', '3', '4', '5', '6', '7', '8', '9', '*', '0', '#'];

/// Sibling tabs: switching never discards a list or abandons its fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneTab {
    Recent,
    Contacts,
    Keypad,
}

impl PhoneTab {
    pub fn label(self) -> &'static str {
        match self {
            Self::Recent => "Recent",
            Self::Contacts => "Contacts",
            Self::Keypad => "Keypad",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Recent => Self::Contacts,
            Self::Contacts => Self::Keypad,
            Self::Keypad => Self::Recent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhoneInput {
    SelectTab(PhoneTab),
    KeypadPress(char),
    KeypadDelete,
    DialKeypad,
    CallContact(u64),
    CallBack(u64),
    AddContact { name: String, number: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhoneStack {
    pub tab: PhoneTab,
    pub call_log: LocalList<CallLogEntry>,
    pub contacts: LocalList<Contact>,
    pub dial_number: String,
    pub last_dialed: Option<String>,
}

impl Default for PhoneStack {
    fn default() -> Self {
        Self::new()
    }
}

impl PhoneStack {
    pub fn new() -> Self {
        Self {
            tab: PhoneTab::Recent,
            call_log: LocalList::default(),
            contacts: LocalList::default(),
            dial_number: String::new(),
            last_dialed: None,
        }
    }

    pub fn handle(&mut self, ctx: &mut StackCtx<'_>, input: PhoneInput) -> Vec<PhoneEffect> {
        match input {
            PhoneInput::SelectTab(tab) => {
                self.tab = tab;
                let mut effects = self.activate(ctx);
                effects.push(PhoneEffect::RequestFrame);
                effects
            }
            PhoneInput::KeypadPress(key) => {
                if !KEYPAD_KEYS.contains(&key) {
                    return Vec::new();
                }
                self.dial_number.push(key);
                vec![PhoneEffect::RequestFrame]
            }
            PhoneInput::KeypadDelete => {
                self.dial_number.pop();
                vec![PhoneEffect::RequestFrame]
            }
            PhoneInput::DialKeypad => {
                if self.dial_number.is_empty() {
                    return Vec::new();
                }
                let number = self.dial_number.clone();
                self.place_call(number)
            }
            PhoneInput::CallContact(id) => match self.contacts.get(id) {
                Some(contact) => {
                    let number = contact.number.clone();
                    self.place_call(number)
                }
                None => Vec::new(),
            },
            PhoneInput::CallBack(id) => match self.call_log.get(id) {
                Some(entry) => {
                    let number = entry.number.clone();
                    self.place_call(number)
                }
                None => Vec::new(),
            },
            PhoneInput::AddContact { name, number } => {
                let (name, number) = (name.trim(), number.trim());
                if name.is_empty() || number.is_empty() {
                    return Vec::new();
                }
                self.contacts.push_local(Contact {
                    id: 0,
                    name: name.to_string(),
                    number: number.to_string(),
                });
                let request = BackendRequest::new(Endpoint::Contacts, ActionTag::AddContact)
                    .with("name", name)
                    .with("number", number);
                vec![PhoneEffect::Write(request), PhoneEffect::RequestFrame]
            }
        }
    }

    fn place_call(&mut self, number: String) -> Vec<PhoneEffect> {
        let request = BackendRequest::new(Endpoint::Call, ActionTag::StartCall)
            .with("target", number.as_str());
        self.last_dialed = Some(number);
        vec![PhoneEffect::Write(request), PhoneEffect::RequestFrame]
    }
}

impl ViewStack for PhoneStack {
    fn frame(&self) -> ViewFrame {
        let (loading, degraded) = match self.tab {
            PhoneTab::Recent => (
                self.call_log.fetched.is_loading(),
                self.call_log.fetched.is_degraded(),
            ),
            PhoneTab::Contacts => (
                self.contacts.fetched.is_loading(),
                self.contacts.fetched.is_degraded(),
            ),
            PhoneTab::Keypad => (false, false),
        };
        ViewFrame {
            title: "Phone".to_string(),
            view: self.tab.label(),
            loading,
            degraded,
            is_initial: true,
        }
    }

    fn activate(&mut self, ctx: &mut StackCtx<'_>) -> Vec<PhoneEffect> {
        match self.tab {
            PhoneTab::Recent => ctx.fetch_once(&mut self.call_log.fetched, DatasetKey::CallLog),
            PhoneTab::Contacts => ctx.fetch_once(&mut self.contacts.fetched, DatasetKey::Contacts),
            PhoneTab::Keypad => Vec::new(),
        }
    }

    fn back(&mut self, _ctx: &mut StackCtx<'_>) -> BackOutcome {
        BackOutcome::CloseApp
    }

    fn apply_fetch(
        &mut self,
        _key: &DatasetKey,
        request_id: u64,
        payload: FetchPayload,
        degraded: bool,
    ) -> FetchCommit {
        match payload {
            FetchPayload::CallLog(items) => self.call_log.accept(request_id, items, degraded),
            FetchPayload::Contacts(items) => self.contacts.accept(request_id, items, degraded),
            _ => FetchCommit::Stale,
        }
    }

    fn on_close(&mut self) {
        self.call_log.clear();
        self.contacts.clear();
        self.dial_number.clear();
        self.last_dialed = None;
    }
}
