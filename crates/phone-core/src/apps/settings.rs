use std::collections::BTreeMap;

use super::BackOutcome;
use super::Dataset;
use super::FetchCommit;
use super::StackCtx;
use super::ViewFrame;
use super::ViewStack;
use crate::entities::Setting;
use crate::entities::SettingKind;
use crate::entities::SettingValue;
use crate::fallback;
use crate::reducer::PhoneEffect;
use crate::remote::ActionTag;
use crate::remote::BackendRequest;
use crate::remote::DatasetKey;
use crate::remote::Endpoint;
use crate::remote::FetchPayload;
use crate::state::LogLevel;

pub const PROFILE_SETTING_ID: &str = "profile";
pub const SLIDER_MAX: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsView {
    Main,
    Profile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsInput {
    Toggle(String),
    SetLevel { id: String, level: u8 },
    Navigate(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SettingsStack {
    pub view: SettingsView,
    pub settings: Dataset<Vec<Setting>>,
}

impl Default for SettingsStack {
    fn default() -> Self {
        Self::new()
    }
}

/// Live values override defaults by id; unknown ids are ignored.
pub fn merge_settings(defaults: Vec<Setting>, overrides: &BTreeMap<String, SettingValue>) -> Vec<Setting> {
    defaults
        .into_iter()
        .map(|mut setting| {
            let live = overrides.get(&setting.id).copied();
            if let Some(value) = live.and_then(|value| fit_value(setting.kind, value)) {
                setting.value = value;
            }
            setting
        })
        .collect()
}

/// Mistyped values are dropped; slider levels clamp to `SLIDER_MAX`.
fn fit_value(kind: SettingKind, value: SettingValue) -> Option<SettingValue> {
    match kind {
        SettingKind::Toggle => value.as_flag().map(SettingValue::Flag),
        SettingKind::Slider => value
            .as_level()
            .map(|level| SettingValue::Level(level.min(SLIDER_MAX))),
        SettingKind::Navigation => None,
    }
}

impl SettingsStack {
    pub fn new() -> Self {
        Self {
            view: SettingsView::Main,
            settings: Dataset::NotFetched,
        }
    }

    pub fn get(&self, id: &str) -> Option<&Setting> {
        self.settings.items()?.iter().find(|setting| setting.id == id)
    }

    pub fn handle(&mut self, ctx: &mut StackCtx<'_>, input: SettingsInput) -> Vec<PhoneEffect> {
        if self.view != SettingsView::Main {
            return Vec::new();
        }
        match input {
            SettingsInput::Toggle(id) => {
                let Some(setting) = self.setting_mut(&id, SettingKind::Toggle) else {
                    return Vec::new();
                };
                let next = !setting.value.as_flag().unwrap_or(false);
                setting.value = SettingValue::Flag(next);
                vec![update_request(&id, setting.value), PhoneEffect::RequestFrame]
            }
            SettingsInput::SetLevel { id, level } => {
                let Some(setting) = self.setting_mut(&id, SettingKind::Slider) else {
                    return Vec::new();
                };
                setting.value = SettingValue::Level(level.min(SLIDER_MAX));
                vec![update_request(&id, setting.value), PhoneEffect::RequestFrame]
            }
            SettingsInput::Navigate(id) => {
                if self.get(&id).map(|s| s.kind) != Some(SettingKind::Navigation) {
                    return Vec::new();
                }
                if id == PROFILE_SETTING_ID {
                    self.settings.abandon();
                    self.view = SettingsView::Profile;
                    return vec![PhoneEffect::RequestFrame];
                }
                ctx.note(LogLevel::Info, format!("settings page `{id}` is not available"));
                Vec::new()
            }
        }
    }

    fn setting_mut(&mut self, id: &str, kind: SettingKind) -> Option<&mut Setting> {
        self.settings
            .items_mut()?
            .iter_mut()
            .find(|setting| setting.id == id && setting.kind == kind)
    }
}

fn update_request(id: &str, value: SettingValue) -> PhoneEffect {
    PhoneEffect::Write(
        BackendRequest::new(Endpoint::Settings, ActionTag::UpdateSetting)
            .with("setting", id)
            .with("value", value.to_json()),
    )
}

impl ViewStack for SettingsStack {
    fn frame(&self) -> ViewFrame {
        match self.view {
            SettingsView::Main => ViewFrame {
                title: "Settings".to_string(),
                view: "main",
                loading: self.settings.is_loading(),
                degraded: self.settings.is_degraded(),
                is_initial: true,
            },
            SettingsView::Profile => ViewFrame {
                title: "Profile".to_string(),
                view: "profile",
                loading: false,
                degraded: false,
                is_initial: false,
            },
        }
    }

    fn activate(&mut self, ctx: &mut StackCtx<'_>) -> Vec<PhoneEffect> {
        match self.view {
            SettingsView::Main => ctx.fetch_once(&mut self.settings, DatasetKey::Settings),
            SettingsView::Profile => Vec::new(),
        }
    }

    fn back(&mut self, ctx: &mut StackCtx<'_>) -> BackOutcome {
        match self.view {
            SettingsView::Main => BackOutcome::CloseApp,
            SettingsView::Profile => {
                self.view = SettingsView::Main;
                let mut effects = self.activate(ctx);
                effects.push(PhoneEffect::RequestFrame);
                BackOutcome::Stay(effects)
            }
        }
    }

    fn apply_fetch(
        &mut self,
        _key: &DatasetKey,
        request_id: u64,
        payload: FetchPayload,
        degraded: bool,
    ) -> FetchCommit {
        match payload {
            FetchPayload::Settings(overrides) if self.view == SettingsView::Main => {
                let merged = merge_settings(fallback::settings(), &overrides);
                self.settings.accept(request_id, merged, degraded)
            }
            _ => FetchCommit::Stale,
        }
    }

    fn on_close(&mut self) {
        self.view = SettingsView::Main;
        self.settings = Dataset::NotFetched;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn merge_keeps_defaults_for_missing_and_mistyped_values() {
        let overrides = BTreeMap::from([
            ("wifi".to_string(), SettingValue::Flag(false)),
            ("volume".to_string(), SettingValue::Flag(true)),
            ("unknown".to_string(), SettingValue::Level(3)),
        ]);
        let merged = merge_settings(fallback::settings(), &overrides);
        let value_of = |id: &str| merged.iter().find(|s| s.id == id).map(|s| s.value);

        assert_eq!(value_of("wifi"), Some(SettingValue::Flag(false)));
        assert_eq!(value_of("volume"), Some(SettingValue::Level(75)));
        assert_eq!(value_of("bluetooth"), Some(SettingValue::Flag(false)));
        assert_eq!(merged.len(), fallback::settings().len());
    }

    #[test]
    fn merge_clamps_slider_levels_past_the_maximum() {
        let loud = BTreeMap::from([("volume".to_string(), SettingValue::Level(u8::MAX))]);
        let merged = merge_settings(fallback::settings(), &loud);
        let volume = merged.iter().find(|s| s.id == "volume").map(|s| s.value);
        assert_eq!(volume, Some(SettingValue::Level(SLIDER_MAX)));

        let quiet = BTreeMap::from([("volume".to_string(), SettingValue::Level(30))]);
        let merged = merge_settings(fallback::settings(), &quiet);
        let volume = merged.iter().find(|s| s.id == "volume").map(|s| s.value);
        assert_eq!(volume, Some(SettingValue::Level(30)));
    }
}
