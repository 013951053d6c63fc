use pretty_assertions::assert_eq;

pub(super) use super::reduce;
pub(super) use crate::actions::RuntimeAction;
pub(super) use crate::actions::ShellAction;
pub(super) use crate::actions::UserAction;
pub(super) use crate::apps::mail::MailInput;
pub(super) use crate::apps::mail::MailStack;
pub(super) use crate::apps::mail::MailView;
pub(super) use crate::apps::messages::MessagesInput;
pub(super) use crate::apps::messages::MessagesStack;
pub(super) use crate::apps::messages::MessagesView;
pub(super) use crate::apps::AppInput;
pub(super) use crate::apps::AppStack;
pub(super) use crate::fallback;
pub(super) use crate::reducer::PhoneEffect;
pub(super) use crate::remote::ActionTag;
pub(super) use crate::remote::BackendRequest;
pub(super) use crate::remote::DatasetKey;
pub(super) use crate::remote::FetchPayload;
pub(super) use crate::remote::FetchRequest;
pub(super) use crate::state::HostState;
pub(super) use crate::state::LogBuffer;
pub(super) use crate::state::LogLevel;
pub(super) use crate::state::LogSource;
pub(super) use crate::state::PhoneState;
pub(super) use crate::state::Surface;

mod log_buffer;
mod stale_fetch;

fn state() -> PhoneState {
    PhoneState::default()
}

fn user(state: &mut PhoneState, action: UserAction) -> Vec<PhoneEffect> {
    reduce(state, ShellAction::User(action))
}

fn open(state: &mut PhoneState, app_id: &str) -> Vec<PhoneEffect> {
    user(state, UserAction::OpenApp(app_id.to_string()))
}

fn input(state: &mut PhoneState, input: AppInput) -> Vec<PhoneEffect> {
    user(state, UserAction::App(input))
}

fn runtime(state: &mut PhoneState, action: RuntimeAction) -> Vec<PhoneEffect> {
    reduce(state, ShellAction::Runtime(action))
}

fn fetches(effects: &[PhoneEffect]) -> Vec<FetchRequest> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            PhoneEffect::Fetch(fetch) => Some(fetch.clone()),
            _ => None,
        })
        .collect()
}

fn writes(effects: &[PhoneEffect]) -> Vec<BackendRequest> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            PhoneEffect::Write(request) => Some(request.clone()),
            _ => None,
        })
        .collect()
}

fn single_fetch(effects: &[PhoneEffect]) -> FetchRequest {
    let mut all = fetches(effects);
    assert_eq!(all.len(), 1, "expected exactly one fetch in {effects:?}");
    all.remove(0)
}

/// The payload the backend-less client would serve for `key`.
fn fallback_payload(key: &DatasetKey) -> FetchPayload {
    match key {
        DatasetKey::CallLog => FetchPayload::CallLog(fallback::call_log()),
        DatasetKey::Contacts => FetchPayload::Contacts(fallback::contacts()),
        DatasetKey::Conversations => FetchPayload::Conversations(fallback::conversations()),
        DatasetKey::Thread { contact, .. } => FetchPayload::Thread(fallback::thread(contact)),
        DatasetKey::Inbox => FetchPayload::Inbox(fallback::inbox()),
        DatasetKey::Settings => FetchPayload::Settings(Default::default()),
        DatasetKey::Capture => FetchPayload::Capture(fallback::capture(0)),
    }
}

fn resolve(state: &mut PhoneState, fetch: &FetchRequest, degraded: bool) -> Vec<PhoneEffect> {
    runtime(
        state,
        RuntimeAction::FetchResolved {
            ticket: fetch.ticket.clone(),
            payload: fallback_payload(&fetch.ticket.key),
            degraded,
        },
    )
}

fn messages(state: &PhoneState) -> &MessagesStack {
    match state.active().map(|active| &active.stack) {
        Some(AppStack::Messages(stack)) => stack,
        other => panic!("messages is not active: {other:?}"),
    }
}

fn mail(state: &PhoneState) -> &MailStack {
    match state.active().map(|active| &active.stack) {
        Some(AppStack::Mail(stack)) => stack,
        other => panic!("mail is not active: {other:?}"),
    }
}
