use crate::apps::browser::BrowserStack;
use crate::apps::calculator::CalculatorStack;
use crate::apps::camera::CameraStack;
use crate::apps::chatwave::ChatWaveStack;
use crate::apps::mail::MailStack;
use crate::apps::media::MediaStack;
use crate::apps::messages::MessagesStack;
use crate::apps::phone::PhoneStack;
use crate::apps::settings::SettingsStack;
use crate::apps::social::SocialStack;
use crate::apps::AppStack;

pub type AppFactory = fn() -> AppStack;

#[derive(Debug, Clone, Copy)]
pub struct AppDescriptor {
    pub id: &'static str,
    pub label: &'static str,
    pub glyph: &'static str,
    /// Start and end colour of the launcher tile.
    pub gradient: [&'static str; 2],
    /// `None` for launcher-only entries that do not open.
    pub factory: Option<AppFactory>,
}

impl AppDescriptor {
    pub fn opens(&self) -> bool {
        self.factory.is_some()
    }
}

fn phone() -> AppStack {
    AppStack::Phone(PhoneStack::new())
}

fn messages() -> AppStack {
    AppStack::Messages(MessagesStack::new())
}

fn mail() -> AppStack {
    AppStack::Mail(MailStack::new())
}

fn camera() -> AppStack {
    AppStack::Camera(CameraStack::new())
}

fn settings() -> AppStack {
    AppStack::Settings(SettingsStack::new())
}

fn social() -> AppStack {
    AppStack::Social(SocialStack::new())
}

fn browser() -> AppStack {
    AppStack::Browser(BrowserStack::new())
}

fn chatwave() -> AppStack {
    AppStack::ChatWave(ChatWaveStack::new())
}

fn media() -> AppStack {
    AppStack::Media(MediaStack::new())
}

fn calculator() -> AppStack {
    AppStack::Calculator(CalculatorStack::new())
}

const fn app(
    id: &'static str,
    label: &'static str,
    glyph: &'static str,
    gradient: [&'static str; 2],
    factory: Option<AppFactory>,
) -> AppDescriptor {
    AppDescriptor {
        id,
        label,
        glyph,
        gradient,
        factory,
    }
}

/// Grid entries first, in launcher order, then the dock-only apps.
pub const APPS: [AppDescriptor; 18] = [
    app("socialhub", "SocialHub", "SH", ["#667eea", "#764ba2"], Some(social)),
    app("webflow", "WebFlow", "WF", ["#f093fb", "#f5576c"], Some(browser)),
    app("chatwave", "ChatWave", "CW", ["#4facfe", "#00f2fe"], Some(chatwave)),
    app("mail", "MailBox", "MB", ["#43e97b", "#38f9d7"], Some(mail)),
    app("soundwave", "SoundWave", "SW", ["#fa709a", "#fee140"], Some(media)),
    app("timesync", "TimeSync", "TS", ["#a8edea", "#fed6e3"], None),
    app("navigo", "NaviGo", "NG", ["#ffecd2", "#fcb69f"], None),
    app("camera", "SnapLens", "SL", ["#667eea", "#764ba2"], Some(camera)),
    app("chronox", "ChronoX", "CX", ["#434343", "#000000"], None),
    app("calculator", "MathPro", "MP", ["#ff9a9e", "#fecfef"], Some(calculator)),
    app("settings", "ControlHub", "CH", ["#a1c4fd", "#c2e9fb"], Some(settings)),
    app("notepad", "NotePad", "NP", ["#ffecd2", "#fcb69f"], None),
    app("gallery", "Gallery", "GA", ["#667eea", "#764ba2"], None),
    app("streamflix", "StreamFlix", "SF", ["#f093fb", "#f5576c"], None),
    app("gamezone", "GameZone", "GZ", ["#4facfe", "#00f2fe"], None),
    app("shopease", "ShopEase", "SE", ["#43e97b", "#38f9d7"], None),
    app("phone", "Phone", "PH", ["#11998e", "#38ef7d"], Some(phone)),
    app("messages", "Messages", "MS", ["#4facfe", "#00f2fe"], Some(messages)),
];

const GRID_LEN: usize = 16;

pub const DOCK: [&str; 4] = ["phone", "messages", "camera", "mail"];

pub struct AppRegistry;

impl AppRegistry {
    pub fn list() -> &'static [AppDescriptor] {
        &APPS
    }

    pub fn grid() -> &'static [AppDescriptor] {
        &APPS[..GRID_LEN]
    }

    pub fn dock() -> Vec<&'static AppDescriptor> {
        DOCK.iter().filter_map(|id| Self::get(id)).collect()
    }

    pub fn get(id: &str) -> Option<&'static AppDescriptor> {
        APPS.iter().find(|descriptor| descriptor.id == id)
    }
}
