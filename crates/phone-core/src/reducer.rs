use super::actions::RuntimeAction;
use super::actions::ShellAction;
use super::actions::UserAction;
use super::apps::AppInput;
use super::apps::BackOutcome;
use super::apps::FetchCommit;
use super::apps::StackCtx;
use super::apps::StackNote;
use super::registry::AppRegistry;
use super::remote::BackendRequest;
use super::remote::FetchPayload;
use super::remote::FetchRequest;
use super::remote::FetchTicket;
use super::remote::TimerTicket;
use super::state::ActiveApp;
use super::state::HostState;
use super::state::LogBuffer;
use super::state::LogEntry;
use super::state::LogLevel;
use super::state::LogSource;
use super::state::PhoneState;

/// Work the reducer asks the outside world to perform.
#[derive(Debug, Clone, PartialEq)]
pub enum PhoneEffect {
    RequestFrame,
    /// Read a dataset; the result re-enters as [`RuntimeAction::FetchResolved`].
    Fetch(FetchRequest),
    /// Fire-and-forget persist; the local state already reflects it.
    Write(BackendRequest),
    StartTimer {
        ticket: TimerTicket,
        delay_ms: u64,
    },
}

pub fn reduce(state: &mut PhoneState, action: ShellAction) -> Vec<PhoneEffect> {
    match action {
        ShellAction::User(user) => reduce_user(state, user),
        ShellAction::Runtime(runtime) => reduce_runtime(state, runtime),
    }
}

fn reduce_user(state: &mut PhoneState, action: UserAction) -> Vec<PhoneEffect> {
    match action {
        UserAction::OpenApp(app_id) => open_app(state, &app_id),
        UserAction::CloseApp => close_app(state),
        UserAction::Back => back(state),
        UserAction::App(input) => app_input(state, input),
        UserAction::ClearLogs => {
            state.diagnostics.clear();
            vec![PhoneEffect::RequestFrame]
        }
    }
}

fn reduce_runtime(state: &mut PhoneState, action: RuntimeAction) -> Vec<PhoneEffect> {
    match action {
        RuntimeAction::FetchResolved {
            ticket,
            payload,
            degraded,
        } => fetch_resolved(state, ticket, payload, degraded),
        RuntimeAction::TimerFired(ticket) => timer_fired(state, ticket),
        RuntimeAction::WriteDropped { endpoint, action } => {
            state.log(
                LogEntry::new(
                    LogLevel::Warn,
                    LogSource::Runtime,
                    format!("`{}` was not delivered", action.as_str()),
                )
                .with_context(endpoint.label()),
            );
            vec![PhoneEffect::RequestFrame]
        }
        RuntimeAction::AppendLog { level, message } => {
            state.log(LogEntry::new(level, LogSource::Runtime, message));
            vec![PhoneEffect::RequestFrame]
        }
    }
}

/// Replaces whatever is active with a fresh session of `app_id`.
fn open_app(state: &mut PhoneState, app_id: &str) -> Vec<PhoneEffect> {
    let Some(descriptor) = AppRegistry::get(app_id) else {
        state.log(
            LogEntry::new(LogLevel::Info, LogSource::Shell, "unknown app ignored")
                .with_context(app_id),
        );
        return Vec::new();
    };
    let Some(factory) = descriptor.factory else {
        state.log(
            LogEntry::new(
                LogLevel::Info,
                LogSource::Shell,
                format!("{} is not available yet", descriptor.label),
            )
            .with_context(descriptor.id),
        );
        return Vec::new();
    };

    close_active(state);

    let session = state.next_session;
    state.next_session = state.next_session.saturating_add(1);

    let mut stack = factory();
    let mut ctx = StackCtx::new(session, &mut state.next_request);
    let mut effects = stack.as_view_stack_mut().activate(&mut ctx);
    let notes = ctx.into_notes();
    record_notes(&mut state.diagnostics, descriptor.id, notes);

    state.host = HostState::Active(ActiveApp {
        app_id: descriptor.id,
        session,
        stack,
    });
    effects.push(PhoneEffect::RequestFrame);
    effects
}

fn close_app(state: &mut PhoneState) -> Vec<PhoneEffect> {
    if close_active(state) {
        vec![PhoneEffect::RequestFrame]
    } else {
        Vec::new()
    }
}

fn close_active(state: &mut PhoneState) -> bool {
    match std::mem::take(&mut state.host) {
        HostState::Active(mut active) => {
            active.stack.as_view_stack_mut().on_close();
            true
        }
        HostState::Idle => false,
    }
}

fn back(state: &mut PhoneState) -> Vec<PhoneEffect> {
    let PhoneState {
        host,
        next_request,
        diagnostics,
        ..
    } = &mut *state;
    let HostState::Active(active) = host else {
        return Vec::new();
    };
    let mut ctx = StackCtx::new(active.session, next_request);
    let outcome = active.stack.as_view_stack_mut().back(&mut ctx);
    let notes = ctx.into_notes();
    record_notes(diagnostics, active.app_id, notes);

    match outcome {
        BackOutcome::Stay(effects) => effects,
        BackOutcome::CloseApp => close_app(state),
    }
}

fn app_input(state: &mut PhoneState, input: AppInput) -> Vec<PhoneEffect> {
    let PhoneState {
        host,
        next_request,
        diagnostics,
        ..
    } = state;
    let HostState::Active(active) = host else {
        return Vec::new();
    };
    let mut ctx = StackCtx::new(active.session, next_request);
    let effects = active.stack.handle(&mut ctx, input);
    let notes = ctx.into_notes();
    record_notes(diagnostics, active.app_id, notes);

    effects.unwrap_or_else(|| {
        diagnostics.append(
            LogEntry::new(LogLevel::Debug, LogSource::Shell, "input for an inactive app ignored")
                .with_context(active.app_id),
        );
        Vec::new()
    })
}

/// Commits only while the ticket's session is live and its dataset still waits
/// on that request; anything else is dropped without a trace.
fn fetch_resolved(
    state: &mut PhoneState,
    ticket: FetchTicket,
    payload: FetchPayload,
    degraded: bool,
) -> Vec<PhoneEffect> {
    let HostState::Active(active) = &mut state.host else {
        return Vec::new();
    };
    if active.session != ticket.session {
        return Vec::new();
    }
    let commit = active.stack.as_view_stack_mut().apply_fetch(
        &ticket.key,
        ticket.request_id,
        payload,
        degraded,
    );
    match commit {
        FetchCommit::Applied => {
            if degraded {
                let app_id = active.app_id;
                state.log(
                    LogEntry::new(
                        LogLevel::Warn,
                        LogSource::Runtime,
                        format!("{} unavailable, showing offline data", ticket.key.label()),
                    )
                    .with_context(app_id),
                );
            }
            vec![PhoneEffect::RequestFrame]
        }
        FetchCommit::Stale => Vec::new(),
    }
}

fn timer_fired(state: &mut PhoneState, ticket: TimerTicket) -> Vec<PhoneEffect> {
    let PhoneState {
        host,
        next_request,
        diagnostics,
        ..
    } = state;
    let HostState::Active(active) = host else {
        return Vec::new();
    };
    if active.session != ticket.session {
        return Vec::new();
    }
    let mut ctx = StackCtx::new(active.session, next_request);
    let effects = active.stack.as_view_stack_mut().fire_timer(&mut ctx, ticket);
    let notes = ctx.into_notes();
    record_notes(diagnostics, active.app_id, notes);
    effects
}

fn record_notes(diagnostics: &mut LogBuffer, app_id: &str, notes: Vec<StackNote>) {
    for note in notes {
        diagnostics.append(LogEntry::new(note.level, LogSource::App, note.message).with_context(app_id));
    }
}

#[cfg(test)]
mod tests;
