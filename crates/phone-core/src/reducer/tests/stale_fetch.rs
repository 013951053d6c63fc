use super::*;
use crate::apps::phone::PhoneInput;
use crate::apps::phone::PhoneTab;
use crate::apps::settings::SettingsInput;
use crate::remote::TimerKind;
use pretty_assertions::assert_eq;

#[test]
fn response_for_abandoned_thread_is_discarded() {
    let mut state = state();
    let effects = open(&mut state, "messages");
    resolve(&mut state, &single_fetch(&effects), false);

    let effects = input(&mut state, AppInput::Messages(MessagesInput::OpenConversation(2)));
    let thread_fetch = single_fetch(&effects);
    user(&mut state, UserAction::Back);

    let effects = resolve(&mut state, &thread_fetch, false);
    assert!(effects.is_empty());
    assert!(messages(&state).thread(2).is_some_and(|t| t.is_empty()));

    let effects = input(&mut state, AppInput::Messages(MessagesInput::OpenConversation(2)));
    let refetch = single_fetch(&effects);
    assert!(refetch.ticket.request_id > thread_fetch.ticket.request_id);
}

#[test]
fn response_from_previous_session_is_discarded() {
    let mut state = state();
    let effects = open(&mut state, "mail");
    let old = single_fetch(&effects);

    user(&mut state, UserAction::CloseApp);
    open(&mut state, "mail");
    let before = state.diagnostics.len();

    assert!(resolve(&mut state, &old, false).is_empty());
    assert!(mail(&state).inbox.is_empty());
    assert_eq!(state.diagnostics.len(), before);
}

#[test]
fn response_after_close_is_discarded() {
    let mut state = state();
    let effects = open(&mut state, "phone");
    let fetch = single_fetch(&effects);
    user(&mut state, UserAction::CloseApp);

    assert!(resolve(&mut state, &fetch, true).is_empty());
    assert!(state.is_idle());
    assert!(state.diagnostics.is_empty());
}

#[test]
fn sibling_tab_response_still_lands() {
    let mut state = state();
    let effects = open(&mut state, "phone");
    let recent = single_fetch(&effects);
    let effects = input(
        &mut state,
        AppInput::Phone(PhoneInput::SelectTab(PhoneTab::Contacts)),
    );
    let contacts = single_fetch(&effects);

    assert_eq!(resolve(&mut state, &recent, false), vec![PhoneEffect::RequestFrame]);
    assert_eq!(resolve(&mut state, &contacts, false), vec![PhoneEffect::RequestFrame]);
}

#[test]
fn settings_profile_back_reuses_loaded_list() {
    let mut state = state();
    let effects = open(&mut state, "settings");
    let fetch = single_fetch(&effects);
    resolve(&mut state, &fetch, false);

    input(
        &mut state,
        AppInput::Settings(SettingsInput::Navigate("profile".to_string())),
    );
    let frame = state.active().map(|a| a.stack.as_view_stack().frame().view);
    assert_eq!(frame, Some("profile"));

    let effects = user(&mut state, UserAction::Back);
    assert!(fetches(&effects).is_empty());
}

#[test]
fn timer_from_previous_session_is_discarded() {
    let mut state = state();
    open(&mut state, "webflow");
    let effects = input(
        &mut state,
        AppInput::Browser(crate::apps::browser::BrowserInput::Refresh),
    );
    let Some(PhoneEffect::StartTimer { ticket, .. }) = effects.first().cloned() else {
        panic!("expected a page-load timer, got {effects:?}");
    };

    open(&mut state, "webflow");
    input(
        &mut state,
        AppInput::Browser(crate::apps::browser::BrowserInput::Refresh),
    );
    assert_eq!(ticket.kind, TimerKind::PageLoad);
    assert!(runtime(&mut state, RuntimeAction::TimerFired(ticket)).is_empty());
    let loading = state.active().map(|a| a.stack.as_view_stack().frame().loading);
    assert_eq!(loading, Some(true));
}

#[test]
fn opening_email_mid_refetch_lets_inbox_reload() {
    let mut state = state();
    open(&mut state, "mail");
    input(&mut state, AppInput::Mail(MailInput::StartCompose));
    input(&mut state, AppInput::Mail(MailInput::EditTo("dmv@ls.gov".to_string())));
    input(&mut state, AppInput::Mail(MailInput::EditSubject("Renewal".to_string())));
    input(&mut state, AppInput::Mail(MailInput::EditBody("Paid today.".to_string())));
    let effects = input(&mut state, AppInput::Mail(MailInput::Send));
    let refetch = single_fetch(&effects);

    input(&mut state, AppInput::Mail(MailInput::OpenEmail(1)));
    assert_eq!(mail(&state).view, MailView::Detail { email_id: 1 });
    assert!(!mail(&state).inbox.fetched.is_loading());
    assert!(resolve(&mut state, &refetch, false).is_empty());

    let effects = user(&mut state, UserAction::Back);
    let reload = single_fetch(&effects);
    assert!(reload.ticket.request_id > refetch.ticket.request_id);

    resolve(&mut state, &reload, false);
    let inbox = &mail(&state).inbox;
    assert!(!inbox.fetched.is_loading());
    assert_eq!(inbox.len(), fallback::inbox().len() + 1);
    assert!(inbox.iter().any(|email| email.subject == "Renewal"));
}
