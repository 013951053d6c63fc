use super::*;
use pretty_assertions::assert_eq;

fn append(state: &mut PhoneState, message: &str) {
    runtime(
        state,
        RuntimeAction::AppendLog {
            level: LogLevel::Info,
            message: message.to_string(),
        },
    );
}

#[test]
fn log_buffer_seq_is_monotonic() {
    let mut state = state();
    append(&mut state, "one");
    append(&mut state, "two");
    append(&mut state, "three");

    let seqs: Vec<u64> = state.diagnostics.iter().map(|entry| entry.seq).collect();
    assert_eq!(seqs, vec![1, 2, 3]);
}

#[test]
fn log_buffer_capacity_eviction_is_fifo() {
    let mut state = state();
    state.diagnostics = LogBuffer::new(3);

    for value in ["1", "2", "3", "4", "5"] {
        append(&mut state, value);
    }

    let seqs: Vec<u64> = state.diagnostics.iter().map(|entry| entry.seq).collect();
    assert_eq!(seqs, vec![3, 4, 5]);
}

#[test]
fn default_capacity_holds_five_hundred_entries() {
    let mut state = state();
    for value in 0..510 {
        append(&mut state, &value.to_string());
    }
    assert_eq!(state.diagnostics.len(), crate::state::LOG_CAPACITY);
    assert_eq!(state.diagnostics.iter().next().map(|e| e.seq), Some(11));
}

#[test]
fn clear_logs_resets_sequence_to_one() {
    let mut state = state();
    append(&mut state, "1");
    append(&mut state, "2");
    user(&mut state, UserAction::ClearLogs);
    append(&mut state, "3");

    let seqs: Vec<u64> = state.diagnostics.iter().map(|entry| entry.seq).collect();
    assert_eq!(seqs, vec![1]);
}

#[test]
fn stack_notes_are_tagged_with_their_app() {
    let mut state = state();
    let effects = open(&mut state, "settings");
    resolve(&mut state, &single_fetch(&effects), false);
    input(
        &mut state,
        AppInput::Settings(crate::apps::settings::SettingsInput::Navigate(
            "battery".to_string(),
        )),
    );

    let last = state.diagnostics.last();
    assert_eq!(last.map(|e| e.source), Some(LogSource::App));
    assert_eq!(last.and_then(|e| e.context.as_deref()), Some("settings"));
}
