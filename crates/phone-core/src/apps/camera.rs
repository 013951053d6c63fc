use super::BackOutcome;
use super::Dataset;
use super::FetchCommit;
use super::StackCtx;
use super::ViewFrame;
use super::ViewStack;
use crate::reducer::PhoneEffect;
use crate::remote::ActionTag;
use crate::remote::BackendRequest;
use crate::remote::DatasetKey;
use crate::remote::Endpoint;
use crate::remote::FetchPayload;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    Photo,
    Video,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flash {
    Off,
    On,
    Auto,
}

impl Flash {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::On => "on",
            Self::Auto => "auto",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Off => Self::On,
            Self::On => Self::Auto,
            Self::Auto => Self::Off,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Back,
    Front,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraInput {
    SetMode(CameraMode),
    CycleFlash,
    SwitchFacing,
    Capture,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CameraStack {
    pub mode: CameraMode,
    pub flash: Flash,
    pub facing: Facing,
    pub recording: bool,
    /// Newest first.
    pub photos: Vec<String>,
    capture: Dataset<()>,
}

impl Default for CameraStack {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraStack {
    pub fn new() -> Self {
        Self {
            mode: CameraMode::Photo,
            flash: Flash::Off,
            facing: Facing::Back,
            recording: false,
            photos: Vec::new(),
            capture: Dataset::NotFetched,
        }
    }

    pub fn is_capturing(&self) -> bool {
        self.capture.is_loading()
    }

    pub fn handle(&mut self, ctx: &mut StackCtx<'_>, input: CameraInput) -> Vec<PhoneEffect> {
        match input {
            CameraInput::SetMode(mode) => {
                if self.recording || self.mode == mode {
                    return Vec::new();
                }
                self.mode = mode;
                vec![PhoneEffect::RequestFrame]
            }
            CameraInput::CycleFlash => {
                self.flash = self.flash.next();
                vec![PhoneEffect::RequestFrame]
            }
            CameraInput::SwitchFacing => {
                self.facing = match self.facing {
                    Facing::Back => Facing::Front,
                    Facing::Front => Facing::Back,
                };
                vec![
                    PhoneEffect::Write(BackendRequest::new(
                        Endpoint::Camera,
                        ActionTag::SwitchCamera,
                    )),
                    PhoneEffect::RequestFrame,
                ]
            }
            CameraInput::Capture => match self.mode {
                CameraMode::Photo => {
                    if self.capture.is_loading() {
                        return Vec::new();
                    }
                    let request = DatasetKey::Capture
                        .request()
                        .with("flash", self.flash.as_str());
                    let fetch = ctx.fetch(&mut self.capture, DatasetKey::Capture, request);
                    vec![fetch, PhoneEffect::RequestFrame]
                }
                CameraMode::Video => {
                    let action = if self.recording {
                        ActionTag::StopRecording
                    } else {
                        ActionTag::StartRecording
                    };
                    self.recording = !self.recording;
                    vec![
                        PhoneEffect::Write(BackendRequest::new(Endpoint::Camera, action)),
                        PhoneEffect::RequestFrame,
                    ]
                }
            },
        }
    }
}

impl ViewStack for CameraStack {
    fn frame(&self) -> ViewFrame {
        ViewFrame {
            title: "Camera".to_string(),
            view: match self.mode {
                CameraMode::Photo => "photo",
                CameraMode::Video => "video",
            },
            loading: self.capture.is_loading(),
            degraded: self.capture.is_degraded(),
            is_initial: true,
        }
    }

    fn activate(&mut self, _ctx: &mut StackCtx<'_>) -> Vec<PhoneEffect> {
        Vec::new()
    }

    fn back(&mut self, _ctx: &mut StackCtx<'_>) -> BackOutcome {
        BackOutcome::CloseApp
    }

    fn apply_fetch(
        &mut self,
        _key: &DatasetKey,
        request_id: u64,
        payload: FetchPayload,
        degraded: bool,
    ) -> FetchCommit {
        let FetchPayload::Capture(photo) = payload else {
            return FetchCommit::Stale;
        };
        let commit = self.capture.accept(request_id, (), degraded);
        if commit == FetchCommit::Applied {
            if let Some(url) = photo {
                self.photos.insert(0, url);
            }
        }
        commit
    }

    fn on_close(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn capture_ticket(effects: &[PhoneEffect]) -> Option<u64> {
        effects.iter().find_map(|effect| match effect {
            PhoneEffect::Fetch(fetch) => Some(fetch.ticket.request_id),
            _ => None,
        })
    }

    #[test]
    fn flash_cycles_through_three_modes() {
        let mut next = 1;
        let mut ctx = StackCtx::new(1, &mut next);
        let mut stack = CameraStack::new();
        let seen: Vec<Flash> = (0..3)
            .map(|_| {
                stack.handle(&mut ctx, CameraInput::CycleFlash);
                stack.flash
            })
            .collect();
        assert_eq!(seen, vec![Flash::On, Flash::Auto, Flash::Off]);
    }

    #[test]
    fn photo_capture_sends_flash_and_prepends_result() {
        let mut next = 1;
        let mut ctx = StackCtx::new(1, &mut next);
        let mut stack = CameraStack::new();
        stack.handle(&mut ctx, CameraInput::CycleFlash);

        let effects = stack.handle(&mut ctx, CameraInput::Capture);
        let Some(PhoneEffect::Fetch(fetch)) = effects.first() else {
            panic!("expected a capture fetch, got {effects:?}");
        };
        assert_eq!(fetch.request.field("flash"), Some(&serde_json::json!("on")));

        stack.photos.push("older".to_string());
        let request_id = capture_ticket(&effects).unwrap_or_default();
        let commit = stack.apply_fetch(
            &DatasetKey::Capture,
            request_id,
            FetchPayload::Capture(Some("newest".to_string())),
            false,
        );
        assert_eq!(commit, FetchCommit::Applied);
        assert_eq!(stack.photos, vec!["newest".to_string(), "older".to_string()]);
    }

    #[test]
    fn declined_capture_adds_nothing() {
        let mut next = 1;
        let mut ctx = StackCtx::new(1, &mut next);
        let mut stack = CameraStack::new();
        let effects = stack.handle(&mut ctx, CameraInput::Capture);
        let request_id = capture_ticket(&effects).unwrap_or_default();
        stack.apply_fetch(&DatasetKey::Capture, request_id, FetchPayload::Capture(None), false);
        assert!(stack.photos.is_empty());
        assert!(!stack.is_capturing());
    }

    #[test]
    fn video_capture_toggles_recording() {
        let mut next = 1;
        let mut ctx = StackCtx::new(1, &mut next);
        let mut stack = CameraStack::new();
        stack.handle(&mut ctx, CameraInput::SetMode(CameraMode::Video));

        let start = stack.handle(&mut ctx, CameraInput::Capture);
        assert!(stack.recording);
        assert!(matches!(
            start.first(),
            Some(PhoneEffect::Write(request)) if request.action == ActionTag::StartRecording
        ));

        let stop = stack.handle(&mut ctx, CameraInput::Capture);
        assert!(!stack.recording);
        assert!(matches!(
            stop.first(),
            Some(PhoneEffect::Write(request)) if request.action == ActionTag::StopRecording
        ));
    }
}
