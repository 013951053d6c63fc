use super::apps::AppInput;
use super::remote::ActionTag;
use super::remote::Endpoint;
use super::remote::FetchPayload;
use super::remote::FetchTicket;
use super::remote::TimerTicket;
use super::state::LogLevel;

#[derive(Debug, Clone, PartialEq)]
pub enum ShellAction {
    User(UserAction),
    Runtime(RuntimeAction),
}

#[derive(Debug, Clone, PartialEq)]
pub enum UserAction {
    OpenApp(String),
    CloseApp,
    Back,
    /// Input for the active app; ignored when it targets another app.
    App(AppInput),
    ClearLogs,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeAction {
    FetchResolved {
        ticket: FetchTicket,
        payload: FetchPayload,
        degraded: bool,
    },
    TimerFired(TimerTicket),
    WriteDropped {
        endpoint: Endpoint,
        action: ActionTag,
    },
    AppendLog {
        level: LogLevel,
        message: String,
    },
}

impl From<UserAction> for ShellAction {
    fn from(action: UserAction) -> Self {
        Self::User(action)
    }
}

impl From<RuntimeAction> for ShellAction {
    fn from(action: RuntimeAction) -> Self {
        Self::Runtime(action)
    }
}
