use super::BackOutcome;
use super::StackCtx;
use super::ViewFrame;
use super::ViewStack;
use crate::reducer::PhoneEffect;
use crate::remote::TimerKind;
use crate::remote::TimerTicket;

pub const HOME_URL: &str = "https://techflow.dev";
pub const PAGE_LOAD_MS: u64 = 1_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserInput {
    EditUrl(String),
    Refresh,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserStack {
    pub url: String,
    pub loading: bool,
    load: Option<u64>,
}

impl Default for BrowserStack {
    fn default() -> Self {
        Self::new()
    }
}

impl BrowserStack {
    pub fn new() -> Self {
        Self {
            url: HOME_URL.to_string(),
            loading: false,
            load: None,
        }
    }

    pub fn handle(&mut self, ctx: &mut StackCtx<'_>, input: BrowserInput) -> Vec<PhoneEffect> {
        match input {
            BrowserInput::EditUrl(url) => {
                self.url = url;
                vec![PhoneEffect::RequestFrame]
            }
            BrowserInput::Refresh => {
                let (ticket, timer) = ctx.timer(TimerKind::PageLoad, PAGE_LOAD_MS);
                self.loading = true;
                self.load = Some(ticket.timer_id);
                vec![timer, PhoneEffect::RequestFrame]
            }
        }
    }
}

impl ViewStack for BrowserStack {
    fn frame(&self) -> ViewFrame {
        ViewFrame {
            title: "WebFlow".to_string(),
            view: "page",
            loading: self.loading,
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

    fn fire_timer(&mut self, _ctx: &mut StackCtx<'_>, ticket: TimerTicket) -> Vec<PhoneEffect> {
        if ticket.kind != TimerKind::PageLoad || self.load != Some(ticket.timer_id) {
            return Vec::new();
        }
        self.load = None;
        self.loading = false;
        vec![PhoneEffect::RequestFrame]
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
    fn refresh_loads_until_its_timer_fires() {
        let mut next = 1;
        let mut ctx = StackCtx::new(1, &mut next);
        let mut stack = BrowserStack::new();
        let effects = stack.handle(&mut ctx, BrowserInput::Refresh);
        assert!(stack.frame().loading);

        let Some(PhoneEffect::StartTimer { ticket, delay_ms }) = effects.first().cloned() else {
            panic!("expected a page-load timer, got {effects:?}");
        };
        assert_eq!(delay_ms, PAGE_LOAD_MS);
        stack.fire_timer(&mut ctx, ticket);
        assert!(!stack.loading);
    }

    #[test]
    fn superseded_refresh_timer_is_ignored() {
        let mut next = 1;
        let mut ctx = StackCtx::new(1, &mut next);
        let mut stack = BrowserStack::new();
        let first = stack.handle(&mut ctx, BrowserInput::Refresh);
        stack.handle(&mut ctx, BrowserInput::Refresh);

        if let Some(PhoneEffect::StartTimer { ticket, .. }) = first.first().cloned() {
            assert!(stack.fire_timer(&mut ctx, ticket).is_empty());
        }
        assert!(stack.loading);
    }
}
