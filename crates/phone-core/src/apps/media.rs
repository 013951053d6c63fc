use super::BackOutcome;
use super::StackCtx;
use super::ViewFrame;
use super::ViewStack;
use crate::reducer::PhoneEffect;
use crate::remote::TimerKind;
use crate::remote::TimerTicket;

pub const TICK_MS: u64 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Track {
    pub title: &'static str,
    pub artist: &'static str,
    pub duration_secs: u32,
}

pub const PLAYLIST: [Track; 4] = [
    Track {
        title: "Digital Dreams",
        artist: "Neon Waves",
        duration_secs: 180,
    },
    Track {
        title: "Midnight Drive",
        artist: "Retro Future",
        duration_secs: 255,
    },
    Track {
        title: "Electric Pulse",
        artist: "Cyber Sound",
        duration_secs: 225,
    },
    Track {
        title: "Neon Lights",
        artist: "Synthwave Pro",
        duration_secs: 320,
    },
];

/// `m:ss`
pub fn format_position(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaInput {
    TogglePlay,
    Next,
    Previous,
    Select(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaStack {
    pub track: usize,
    pub position_secs: u32,
    pub playing: bool,
    /// Only the most recently scheduled tick advances playback.
    tick: Option<u64>,
}

impl Default for MediaStack {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaStack {
    pub fn new() -> Self {
        Self {
            track: 0,
            position_secs: 0,
            playing: false,
            tick: None,
        }
    }

    pub fn current(&self) -> &Track {
        &PLAYLIST[self.track % PLAYLIST.len()]
    }

    pub fn handle(&mut self, ctx: &mut StackCtx<'_>, input: MediaInput) -> Vec<PhoneEffect> {
        let mut effects = Vec::new();
        match input {
            MediaInput::TogglePlay => {
                self.playing = !self.playing;
                if self.playing {
                    effects.push(self.schedule_tick(ctx));
                } else {
                    self.tick = None;
                }
            }
            MediaInput::Next => self.jump((self.track + 1) % PLAYLIST.len()),
            MediaInput::Previous => self.jump((self.track + PLAYLIST.len() - 1) % PLAYLIST.len()),
            MediaInput::Select(index) if index < PLAYLIST.len() => self.jump(index),
            MediaInput::Select(_) => return effects,
        }
        effects.push(PhoneEffect::RequestFrame);
        effects
    }

    fn jump(&mut self, track: usize) {
        self.track = track;
        self.position_secs = 0;
    }

    fn schedule_tick(&mut self, ctx: &mut StackCtx<'_>) -> PhoneEffect {
        let (ticket, effect) = ctx.timer(TimerKind::PlaybackTick, TICK_MS);
        self.tick = Some(ticket.timer_id);
        effect
    }
}

impl ViewStack for MediaStack {
    fn frame(&self) -> ViewFrame {
        ViewFrame {
            title: "SoundWave".to_string(),
            view: "player",
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

    fn fire_timer(&mut self, ctx: &mut StackCtx<'_>, ticket: TimerTicket) -> Vec<PhoneEffect> {
        if ticket.kind != TimerKind::PlaybackTick || self.tick != Some(ticket.timer_id) {
            return Vec::new();
        }
        if !self.playing {
            self.tick = None;
            return Vec::new();
        }
        let next = self.position_secs + 1;
        self.position_secs = if next >= self.current().duration_secs {
            0
        } else {
            next
        };
        vec![self.schedule_tick(ctx), PhoneEffect::RequestFrame]
    }

    fn on_close(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn tick_of(effects: &[PhoneEffect]) -> Option<TimerTicket> {
        effects.iter().find_map(|effect| match effect {
            PhoneEffect::StartTimer { ticket, .. } => Some(*ticket),
            _ => None,
        })
    }

    #[test]
    fn formats_minutes_and_padded_seconds() {
        assert_eq!(format_position(0), "0:00");
        assert_eq!(format_position(65), "1:05");
        assert_eq!(format_position(320), "5:20");
    }

    #[test]
    fn playback_advances_and_wraps_at_duration() {
        let mut next = 1;
        let mut ctx = StackCtx::new(1, &mut next);
        let mut stack = MediaStack::new();
        let mut ticket = tick_of(&stack.handle(&mut ctx, MediaInput::TogglePlay));

        stack.position_secs = PLAYLIST[0].duration_secs - 2;
        for _ in 0..2 {
            let fired = ticket.map(|t| stack.fire_timer(&mut ctx, t)).unwrap_or_default();
            ticket = tick_of(&fired);
        }
        assert_eq!(stack.position_secs, 0);
        assert!(ticket.is_some());
    }

    #[test]
    fn paused_player_ignores_old_ticks() {
        let mut next = 1;
        let mut ctx = StackCtx::new(1, &mut next);
        let mut stack = MediaStack::new();
        let first = tick_of(&stack.handle(&mut ctx, MediaInput::TogglePlay));
        stack.handle(&mut ctx, MediaInput::TogglePlay);
        stack.handle(&mut ctx, MediaInput::TogglePlay);

        let stale = first.map(|t| stack.fire_timer(&mut ctx, t)).unwrap_or_default();
        assert!(stale.is_empty());
        assert_eq!(stack.position_secs, 0);
    }

    #[test]
    fn track_change_resets_position() {
        let mut next = 1;
        let mut ctx = StackCtx::new(1, &mut next);
        let mut stack = MediaStack::new();
        stack.position_secs = 42;
        stack.handle(&mut ctx, MediaInput::Previous);
        assert_eq!(stack.track, PLAYLIST.len() - 1);
        assert_eq!(stack.position_secs, 0);
    }
}
