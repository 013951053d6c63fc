use super::clock_label;
use super::BackOutcome;
use super::FetchCommit;
use super::LocalList;
use super::StackCtx;
use super::ViewFrame;
use super::ViewStack;
use crate::entities::Email;
use crate::reducer::PhoneEffect;
use crate::remote::ActionTag;
use crate::remote::BackendRequest;
use crate::remote::DatasetKey;
use crate::remote::Endpoint;
use crate::remote::FetchPayload;

const OWN_SENDER: &str = "Me";
const PREVIEW_CHARS: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailView {
    Inbox,
    Detail { email_id: u64 },
    Compose,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MailDraft {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl MailDraft {
    pub fn is_complete(&self) -> bool {
        !self.to.trim().is_empty() && !self.subject.trim().is_empty() && !self.body.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailInput {
    OpenEmail(u64),
    StartCompose,
    EditTo(String),
    EditSubject(String),
    EditBody(String),
    Send,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MailStack {
    pub view: MailView,
    pub inbox: LocalList<Email>,
    pub draft: MailDraft,
}

impl Default for MailStack {
    fn default() -> Self {
        Self::new()
    }
}

impl MailStack {
    pub fn new() -> Self {
        Self {
            view: MailView::Inbox,
            inbox: LocalList::default(),
            draft: MailDraft::default(),
        }
    }

    pub fn current_email(&self) -> Option<&Email> {
        match self.view {
            MailView::Detail { email_id } => self.inbox.get(email_id),
            _ => None,
        }
    }

    pub fn unread_count(&self) -> usize {
        self.inbox.iter().filter(|email| !email.is_read).count()
    }

    pub fn handle(&mut self, ctx: &mut StackCtx<'_>, input: MailInput) -> Vec<PhoneEffect> {
        match input {
            MailInput::OpenEmail(id) => self.open_email(id),
            MailInput::StartCompose => {
                if self.view != MailView::Inbox {
                    return Vec::new();
                }
                self.inbox.fetched.abandon();
                self.view = MailView::Compose;
                vec![PhoneEffect::RequestFrame]
            }
            MailInput::EditTo(text) => {
                self.draft.to = text;
                vec![PhoneEffect::RequestFrame]
            }
            MailInput::EditSubject(text) => {
                self.draft.subject = text;
                vec![PhoneEffect::RequestFrame]
            }
            MailInput::EditBody(text) => {
                self.draft.body = text;
                vec![PhoneEffect::RequestFrame]
            }
            MailInput::Send => self.send(ctx),
        }
    }

    /// Flips the read flag locally before the persist call is even issued.
    fn open_email(&mut self, id: u64) -> Vec<PhoneEffect> {
        if self.view != MailView::Inbox {
            return Vec::new();
        }
        let Some(email) = self.inbox.get_mut(id) else {
            return Vec::new();
        };
        let was_unread = !email.is_read;
        email.is_read = true;
        self.inbox.fetched.abandon();
        self.view = MailView::Detail { email_id: id };

        let mut effects = Vec::new();
        if was_unread {
            effects.push(PhoneEffect::Write(
                BackendRequest::new(Endpoint::Mail, ActionTag::MarkRead).with("emailId", id),
            ));
        }
        effects.push(PhoneEffect::RequestFrame);
        effects
    }

    fn send(&mut self, ctx: &mut StackCtx<'_>) -> Vec<PhoneEffect> {
        if self.view != MailView::Compose || !self.draft.is_complete() {
            return Vec::new();
        }
        let draft = std::mem::take(&mut self.draft);
        let to = draft.to.trim().to_string();
        let subject = draft.subject.trim().to_string();
        let body = draft.body.trim().to_string();

        self.inbox.push_local(Email {
            id: 0,
            sender: OWN_SENDER.to_string(),
            subject: subject.clone(),
            preview: body.chars().take(PREVIEW_CHARS).collect(),
            timestamp: clock_label("%H:%M"),
            is_read: true,
            is_important: false,
            attachments: None,
        });
        self.view = MailView::Inbox;

        let request = BackendRequest::new(Endpoint::Mail, ActionTag::SendEmail)
            .with("to", to)
            .with("subject", subject)
            .with("body", body);
        let mut effects = vec![PhoneEffect::Write(request)];
        effects.extend(self.activate(ctx));
        effects.push(PhoneEffect::RequestFrame);
        effects
    }
}

impl ViewStack for MailStack {
    fn frame(&self) -> ViewFrame {
        match self.view {
            MailView::Inbox => ViewFrame {
                title: "Mail".to_string(),
                view: "inbox",
                loading: self.inbox.fetched.is_loading(),
                degraded: self.inbox.fetched.is_degraded(),
                is_initial: true,
            },
            MailView::Detail { .. } => ViewFrame {
                title: "Email".to_string(),
                view: "email",
                loading: false,
                degraded: self.inbox.fetched.is_degraded(),
                is_initial: false,
            },
            MailView::Compose => ViewFrame {
                title: "Compose".to_string(),
                view: "compose",
                loading: false,
                degraded: false,
                is_initial: false,
            },
        }
    }

    fn activate(&mut self, ctx: &mut StackCtx<'_>) -> Vec<PhoneEffect> {
        match self.view {
            MailView::Inbox => ctx.fetch_once(&mut self.inbox.fetched, DatasetKey::Inbox),
            MailView::Detail { .. } | MailView::Compose => Vec::new(),
        }
    }

    fn back(&mut self, ctx: &mut StackCtx<'_>) -> BackOutcome {
        match self.view {
            MailView::Inbox => BackOutcome::CloseApp,
            MailView::Detail { .. } | MailView::Compose => {
                self.view = MailView::Inbox;
                let mut effects = self.activate(ctx);
                effects.push(PhoneEffect::RequestFrame);
                BackOutcome::Stay(effects)
            }
        }
    }

    fn apply_fetch(
        &mut self,
        _key: &DatasetKey,
        request_id: u64,
        payload: FetchPayload,
        degraded: bool,
    ) -> FetchCommit {
        match payload {
            FetchPayload::Inbox(items) if self.view == MailView::Inbox => {
                self.inbox.accept(request_id, items, degraded)
            }
            _ => FetchCommit::Stale,
        }
    }

    fn on_close(&mut self) {
        self.view = MailView::Inbox;
        self.inbox.clear();
        self.draft = MailDraft::default();
    }
}
