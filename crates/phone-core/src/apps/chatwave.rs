use super::clock_label;
use super::BackOutcome;
use super::StackCtx;
use super::ViewFrame;
use super::ViewStack;
use crate::reducer::PhoneEffect;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatLine {
    pub id: u64,
    pub text: String,
    pub sent: bool,
    pub time: String,
}

fn seeded_thread() -> Vec<ChatLine> {
    [
        ("Hey! How are you doing?", false, "10:15"),
        ("I'm great! Just working on some new projects", true, "10:16"),
        ("That sounds awesome! What kind of projects?", false, "10:17"),
        ("Building some small apps. It's really fun!", true, "10:18"),
        ("Cool! I'd love to see them when you're done", false, "10:19"),
    ]
    .into_iter()
    .zip(1..)
    .map(|((text, sent, time), id)| ChatLine {
        id,
        text: text.to_string(),
        sent,
        time: time.to_string(),
    })
    .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatWaveInput {
    EditDraft(String),
    Send,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatWaveStack {
    pub lines: Vec<ChatLine>,
    pub draft: String,
}

impl Default for ChatWaveStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatWaveStack {
    pub fn new() -> Self {
        Self {
            lines: seeded_thread(),
            draft: String::new(),
        }
    }

    pub fn handle(&mut self, input: ChatWaveInput) -> Vec<PhoneEffect> {
        match input {
            ChatWaveInput::EditDraft(text) => self.draft = text,
            ChatWaveInput::Send => {
                let text = self.draft.trim().to_string();
                if text.is_empty() {
                    return Vec::new();
                }
                self.lines.push(ChatLine {
                    id: self.lines.len() as u64 + 1,
                    text,
                    sent: true,
                    time: clock_label("%H:%M"),
                });
                self.draft.clear();
            }
        }
        vec![PhoneEffect::RequestFrame]
    }
}

impl ViewStack for ChatWaveStack {
    fn frame(&self) -> ViewFrame {
        ViewFrame {
            title: "ChatWave".to_string(),
            view: "thread",
            loading: false,
            degraded: false,
            is_initial: true,
        }
    }

    fn activate(&mut self, _ctx: &mut StackCtx<'_>) -> Vec<PhoneEffect> {
        Vec::new()
    }

    fn back(&mut self, _ctx: &mut StackCtx<'_>) -> BackOutcome {
        BackOutcome::CloseApp
    }

    fn on_close(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn send_appends_with_next_id_and_clears_draft() {
        let mut stack = ChatWaveStack::new();
        stack.handle(ChatWaveInput::EditDraft("  see you soon ".to_string()));
        stack.handle(ChatWaveInput::Send);

        let last = stack.lines.last().cloned();
        assert_eq!(last.as_ref().map(|line| line.id), Some(6));
        assert_eq!(last.as_ref().map(|line| line.text.as_str()), Some("see you soon"));
        assert_eq!(last.map(|line| line.time.len()), Some(5));
        assert!(stack.draft.is_empty());
    }

    #[test]
    fn blank_draft_is_not_sent() {
        let mut stack = ChatWaveStack::new();
        stack.handle(ChatWaveInput::EditDraft("   ".to_string()));
        assert!(stack.handle(ChatWaveInput::Send).is_empty());
        assert_eq!(stack.lines.len(), 5);
    }
}
