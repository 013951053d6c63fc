//! Per-app view-stacks.
//!
//! Every mini-app is a small state machine with an initial list or summary
//! view, optional detail views and an optional compose view. The host drives
//! them only through [`ViewStack`]; app-specific input reaches them through
//! [`AppInput`], routed by [`AppStack::handle`].

pub mod browser;
pub mod calculator;
pub mod camera;
pub mod chatwave;
pub mod dataset;
pub mod mail;
pub mod media;
pub mod messages;
pub mod phone;
pub mod settings;
pub mod social;

pub use dataset::Dataset;
pub use dataset::FetchCommit;
pub use dataset::Keyed;
pub use dataset::LocalList;

use crate::reducer::PhoneEffect;
use crate::remote::BackendRequest;
use crate::remote::DatasetKey;
use crate::remote::FetchPayload;
use crate::remote::FetchRequest;
use crate::remote::FetchTicket;
use crate::remote::TimerKind;
use crate::remote::TimerTicket;
use crate::state::LogLevel;

use self::browser::BrowserInput;
use self::browser::BrowserStack;
use self::calculator::CalculatorInput;
use self::calculator::CalculatorStack;
use self::camera::CameraInput;
use self::camera::CameraStack;
use self::chatwave::ChatWaveInput;
use self::chatwave::ChatWaveStack;
use self::mail::MailInput;
use self::mail::MailStack;
use self::media::MediaInput;
use self::media::MediaStack;
use self::messages::MessagesInput;
use self::messages::MessagesStack;
use self::phone::PhoneInput;
use self::phone::PhoneStack;
use self::settings::SettingsInput;
use self::settings::SettingsStack;
use self::social::SocialInput;
use self::social::SocialStack;

/// What the rendering surface needs to draw the chrome of the current view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewFrame {
    pub title: String,
    pub view: &'static str,
    pub loading: bool,
    pub degraded: bool,
    pub is_initial: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BackOutcome {
    Stay(Vec<PhoneEffect>),
    CloseApp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackNote {
    pub level: LogLevel,
    pub message: String,
}

/// Per-call context handed to a stack: the active session plus the shared
/// request counter used to mint fetch and timer tickets.
#[derive(Debug)]
pub struct StackCtx<'a> {
    pub session: u64,
    next_id: &'a mut u64,
    notes: Vec<StackNote>,
}

impl<'a> StackCtx<'a> {
    pub fn new(session: u64, next_id: &'a mut u64) -> Self {
        Self {
            session,
            next_id,
            notes: Vec::new(),
        }
    }

    fn mint(&mut self) -> u64 {
        let id = *self.next_id;
        *self.next_id = self.next_id.saturating_add(1);
        id
    }

    /// Marks `dataset` as loading and returns the effect that populates it.
    pub fn fetch<T>(
        &mut self,
        dataset: &mut Dataset<T>,
        key: DatasetKey,
        request: BackendRequest,
    ) -> PhoneEffect {
        let request_id = self.mint();
        dataset.start(request_id);
        PhoneEffect::Fetch(FetchRequest {
            ticket: FetchTicket {
                session: self.session,
                request_id,
                key,
            },
            request,
        })
    }

    /// Fetches only if the dataset has not been fetched this session.
    pub fn fetch_once<T>(&mut self, dataset: &mut Dataset<T>, key: DatasetKey) -> Vec<PhoneEffect> {
        if !dataset.needs_fetch() {
            return Vec::new();
        }
        let request = key.request();
        vec![self.fetch(dataset, key, request)]
    }

    pub fn timer(&mut self, kind: TimerKind, delay_ms: u64) -> (TimerTicket, PhoneEffect) {
        let ticket = TimerTicket {
            session: self.session,
            timer_id: self.mint(),
            kind,
        };
        (ticket, PhoneEffect::StartTimer { ticket, delay_ms })
    }

    pub fn note(&mut self, level: LogLevel, message: impl Into<String>) {
        self.notes.push(StackNote {
            level,
            message: message.into(),
        });
    }

    pub fn into_notes(self) -> Vec<StackNote> {
        self.notes
    }
}

/// The capability the host relies on, independent of any app's input set.
pub trait ViewStack {
    fn frame(&self) -> ViewFrame;

    /// Runs first-activation fetches for the current view.
    fn activate(&mut self, ctx: &mut StackCtx<'_>) -> Vec<PhoneEffect>;

    fn back(&mut self, ctx: &mut StackCtx<'_>) -> BackOutcome;

    fn apply_fetch(
        &mut self,
        _key: &DatasetKey,
        _request_id: u64,
        _payload: FetchPayload,
        _degraded: bool,
    ) -> FetchCommit {
        FetchCommit::Stale
    }

    fn fire_timer(&mut self, _ctx: &mut StackCtx<'_>, _ticket: TimerTicket) -> Vec<PhoneEffect> {
        Vec::new()
    }

    /// Drops everything the session accumulated.
    fn on_close(&mut self);
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppStack {
    Phone(PhoneStack),
    Messages(MessagesStack),
    Mail(MailStack),
    Camera(CameraStack),
    Settings(SettingsStack),
    Social(SocialStack),
    Media(MediaStack),
    Browser(BrowserStack),
    Calculator(CalculatorStack),
    ChatWave(ChatWaveStack),
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppInput {
    Phone(PhoneInput),
    Messages(MessagesInput),
    Mail(MailInput),
    Camera(CameraInput),
    Settings(SettingsInput),
    Social(SocialInput),
    Media(MediaInput),
    Browser(BrowserInput),
    Calculator(CalculatorInput),
    ChatWave(ChatWaveInput),
}

impl AppStack {
    pub fn as_view_stack(&self) -> &dyn ViewStack {
        match self {
            Self::Phone(stack) => stack,
            Self::Messages(stack) => stack,
            Self::Mail(stack) => stack,
            Self::Camera(stack) => stack,
            Self::Settings(stack) => stack,
            Self::Social(stack) => stack,
            Self::Media(stack) => stack,
            Self::Browser(stack) => stack,
            Self::Calculator(stack) => stack,
            Self::ChatWave(stack) => stack,
        }
    }

    pub fn as_view_stack_mut(&mut self) -> &mut dyn ViewStack {
        match self {
            Self::Phone(stack) => stack,
            Self::Messages(stack) => stack,
            Self::Mail(stack) => stack,
            Self::Camera(stack) => stack,
            Self::Settings(stack) => stack,
            Self::Social(stack) => stack,
            Self::Media(stack) => stack,
            Self::Browser(stack) => stack,
            Self::Calculator(stack) => stack,
            Self::ChatWave(stack) => stack,
        }
    }

    /// Routes input to the matching stack; input meant for another app is ignored.
    pub fn handle(&mut self, ctx: &mut StackCtx<'_>, input: AppInput) -> Option<Vec<PhoneEffect>> {
        let effects = match (self, input) {
            (Self::Phone(stack), AppInput::Phone(input)) => stack.handle(ctx, input),
            (Self::Messages(stack), AppInput::Messages(input)) => stack.handle(ctx, input),
            (Self::Mail(stack), AppInput::Mail(input)) => stack.handle(ctx, input),
            (Self::Camera(stack), AppInput::Camera(input)) => stack.handle(ctx, input),
            (Self::Settings(stack), AppInput::Settings(input)) => stack.handle(ctx, input),
            (Self::Social(stack), AppInput::Social(input)) => stack.handle(input),
            (Self::Media(stack), AppInput::Media(input)) => stack.handle(ctx, input),
            (Self::Browser(stack), AppInput::Browser(input)) => stack.handle(ctx, input),
            (Self::Calculator(stack), AppInput::Calculator(input)) => stack.handle(input),
            (Self::ChatWave(stack), AppInput::ChatWave(input)) => stack.handle(input),
            _ => return None,
        };
        Some(effects)
    }
}

/// Local wall-clock label for optimistic entities.
pub(crate) fn clock_label(format: &str) -> String {
    chrono::Local::now().format(format).to_string()
}
