use std::collections::BTreeMap;

use super::clock_label;
use super::BackOutcome;
use super::FetchCommit;
use super::LocalList;
use super::StackCtx;
use super::ViewFrame;
use super::ViewStack;
use crate::entities::Conversation;
use crate::entities::Message;
use crate::reducer::PhoneEffect;
use crate::remote::ActionTag;
use crate::remote::BackendRequest;
use crate::remote::DatasetKey;
use crate::remote::Endpoint;
use crate::remote::FetchPayload;

const OWN_SENDER: &str = "You";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessagesView {
    List,
    Chat { conversation_id: u64 },
    Compose,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageDraft {
    pub recipient: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessagesInput {
    OpenConversation(u64),
    StartCompose,
    EditChatDraft(String),
    SendChat,
    EditRecipient(String),
    EditComposeBody(String),
    SendCompose,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MessagesStack {
    pub view: MessagesView,
    pub conversations: LocalList<Conversation>,
    /// Threads cached per conversation id for the whole session.
    pub threads: BTreeMap<u64, LocalList<Message>>,
    pub chat_draft: String,
    pub compose: MessageDraft,
}

impl Default for MessagesStack {
    fn default() -> Self {
        Self::new()
    }
}

impl MessagesStack {
    pub fn new() -> Self {
        Self {
            view: MessagesView::List,
            conversations: LocalList::default(),
            threads: BTreeMap::new(),
            chat_draft: String::new(),
            compose: MessageDraft::default(),
        }
    }

    pub fn thread(&self, conversation_id: u64) -> Option<&LocalList<Message>> {
        self.threads.get(&conversation_id)
    }

    pub fn handle(&mut self, ctx: &mut StackCtx<'_>, input: MessagesInput) -> Vec<PhoneEffect> {
        match input {
            MessagesInput::OpenConversation(id) => {
                if self.view != MessagesView::List {
                    return Vec::new();
                }
                let Some(conversation) = self.conversations.get_mut(id) else {
                    return Vec::new();
                };
                conversation.unread = 0;
                self.conversations.fetched.abandon();
                self.view = MessagesView::Chat {
                    conversation_id: id,
                };
                let mut effects = self.activate(ctx);
                effects.push(PhoneEffect::RequestFrame);
                effects
            }
            MessagesInput::StartCompose => {
                if self.view != MessagesView::List {
                    return Vec::new();
                }
                self.conversations.fetched.abandon();
                self.view = MessagesView::Compose;
                vec![PhoneEffect::RequestFrame]
            }
            MessagesInput::EditChatDraft(text) => {
                self.chat_draft = text;
                vec![PhoneEffect::RequestFrame]
            }
            MessagesInput::SendChat => self.send_chat(),
            MessagesInput::EditRecipient(text) => {
                self.compose.recipient = text;
                vec![PhoneEffect::RequestFrame]
            }
            MessagesInput::EditComposeBody(text) => {
                self.compose.body = text;
                vec![PhoneEffect::RequestFrame]
            }
            MessagesInput::SendCompose => self.send_compose(ctx),
        }
    }

    fn send_chat(&mut self) -> Vec<PhoneEffect> {
        let MessagesView::Chat { conversation_id } = self.view else {
            return Vec::new();
        };
        let content = self.chat_draft.trim().to_string();
        if content.is_empty() {
            return Vec::new();
        }
        let Some(contact) = self
            .conversations
            .get(conversation_id)
            .map(|c| c.contact.clone())
        else {
            return Vec::new();
        };

        self.threads
            .entry(conversation_id)
            .or_default()
            .push_local(own_message(&content));
        self.chat_draft.clear();

        vec![
            PhoneEffect::Write(send_request(&contact, &content)),
            PhoneEffect::RequestFrame,
        ]
    }

    fn send_compose(&mut self, ctx: &mut StackCtx<'_>) -> Vec<PhoneEffect> {
        if self.view != MessagesView::Compose {
            return Vec::new();
        }
        let recipient = self.compose.recipient.trim().to_string();
        let content = self.compose.body.trim().to_string();
        if recipient.is_empty() || content.is_empty() {
            return Vec::new();
        }

        let existing = self
            .conversations
            .iter()
            .find(|c| c.contact == recipient)
            .map(|c| c.id);
        let conversation_id = match existing {
            Some(id) => id,
            None => self.conversations.push_local(Conversation {
                id: 0,
                contact: recipient.clone(),
                last_message: content.clone(),
                timestamp: "now".to_string(),
                unread: 0,
            }),
        };
        self.threads
            .entry(conversation_id)
            .or_default()
            .push_local(own_message(&content));

        self.compose = MessageDraft::default();
        self.view = MessagesView::List;

        let mut effects = vec![PhoneEffect::Write(send_request(&recipient, &content))];
        effects.extend(self.activate(ctx));
        effects.push(PhoneEffect::RequestFrame);
        effects
    }
}

fn own_message(content: &str) -> Message {
    Message {
        id: 0,
        sender: OWN_SENDER.to_string(),
        content: content.to_string(),
        timestamp: clock_label("%I:%M %p"),
        is_own: true,
    }
}

fn send_request(recipient: &str, content: &str) -> BackendRequest {
    BackendRequest::new(Endpoint::Messages, ActionTag::SendMessage)
        .with("recipient", recipient)
        .with("message", content)
}

impl ViewStack for MessagesStack {
    fn frame(&self) -> ViewFrame {
        match &self.view {
            MessagesView::List => ViewFrame {
                title: "Messages".to_string(),
                view: "list",
                loading: self.conversations.fetched.is_loading(),
                degraded: self.conversations.fetched.is_degraded(),
                is_initial: true,
            },
            MessagesView::Chat { conversation_id } => {
                let thread = self.threads.get(conversation_id);
                ViewFrame {
                    title: self
                        .conversations
                        .get(*conversation_id)
                        .map(|c| c.contact.clone())
                        .unwrap_or_default(),
                    view: "chat",
                    loading: thread.is_some_and(|t| t.fetched.is_loading()),
                    degraded: thread.is_some_and(|t| t.fetched.is_degraded()),
                    is_initial: false,
                }
            }
            MessagesView::Compose => ViewFrame {
                title: "New Message".to_string(),
                view: "compose",
                loading: false,
                degraded: false,
                is_initial: false,
            },
        }
    }

    fn activate(&mut self, ctx: &mut StackCtx<'_>) -> Vec<PhoneEffect> {
        match self.view {
            MessagesView::List => {
                ctx.fetch_once(&mut self.conversations.fetched, DatasetKey::Conversations)
            }
            MessagesView::Chat { conversation_id } => {
                let Some(contact) = self
                    .conversations
                    .get(conversation_id)
                    .map(|c| c.contact.clone())
                else {
                    return Vec::new();
                };
                let thread = self.threads.entry(conversation_id).or_default();
                ctx.fetch_once(
                    &mut thread.fetched,
                    DatasetKey::Thread {
                        conversation_id,
                        contact,
                    },
                )
            }
            MessagesView::Compose => Vec::new(),
        }
    }

    fn back(&mut self, ctx: &mut StackCtx<'_>) -> BackOutcome {
        match self.view {
            MessagesView::List => BackOutcome::CloseApp,
            MessagesView::Chat { conversation_id } => {
                if let Some(thread) = self.threads.get_mut(&conversation_id) {
                    thread.fetched.abandon();
                }
                self.chat_draft.clear();
                self.view = MessagesView::List;
                let mut effects = self.activate(ctx);
                effects.push(PhoneEffect::RequestFrame);
                BackOutcome::Stay(effects)
            }
            MessagesView::Compose => {
                self.view = MessagesView::List;
                let mut effects = self.activate(ctx);
                effects.push(PhoneEffect::RequestFrame);
                BackOutcome::Stay(effects)
            }
        }
    }

    fn apply_fetch(
        &mut self,
        key: &DatasetKey,
        request_id: u64,
        payload: FetchPayload,
        degraded: bool,
    ) -> FetchCommit {
        match (key, payload) {
            (DatasetKey::Conversations, FetchPayload::Conversations(items)) => {
                if self.view != MessagesView::List {
                    return FetchCommit::Stale;
                }
                let (commit, remapped) =
                    self.conversations.accept_remapped(request_id, items, degraded);
                let moved: Vec<(u64, LocalList<Message>)> = remapped
                    .iter()
                    .filter_map(|(old, new)| self.threads.remove(old).map(|thread| (*new, thread)))
                    .collect();
                self.threads.extend(moved);
                commit
            }
            (DatasetKey::Thread { conversation_id, .. }, FetchPayload::Thread(items)) => {
                let active = self.view
                    == MessagesView::Chat {
                        conversation_id: *conversation_id,
                    };
                if !active {
                    return FetchCommit::Stale;
                }
                match self.threads.get_mut(conversation_id) {
                    Some(thread) => thread.accept(request_id, items, degraded),
                    None => FetchCommit::Stale,
                }
            }
            _ => FetchCommit::Stale,
        }
    }

    fn on_close(&mut self) {
        self.view = MessagesView::List;
        self.conversations.clear();
        self.threads.clear();
        self.chat_draft.clear();
        self.compose = MessageDraft::default();
    }
}
