use std::collections::VecDeque;

use crate::apps::AppStack;
use crate::apps::ViewFrame;
use crate::config::ShellConfig;
use crate::registry::AppDescriptor;
use crate::registry::AppRegistry;

pub const LOG_CAPACITY: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn label(self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSource {
    /// Raised by an app view-stack.
    App,
    /// Backend results and timers.
    Runtime,
    /// Launcher and host navigation.
    Shell,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub seq: u64,
    pub level: LogLevel,
    pub source: LogSource,
    pub context: Option<String>,
    pub message: String,
}

impl LogEntry {
    pub fn new(level: LogLevel, source: LogSource, message: impl Into<String>) -> Self {
        Self {
            seq: 0,
            level,
            source,
            context: None,
            message: message.into(),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// Bounded FIFO of diagnostics; the oldest entry is evicted first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogBuffer {
    cap: usize,
    next_seq: u64,
    buf: VecDeque<LogEntry>,
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new(LOG_CAPACITY)
    }
}

impl LogBuffer {
    pub fn new(cap: usize) -> Self {
        Self {
            cap: cap.max(1),
            next_seq: 1,
            buf: VecDeque::with_capacity(cap.max(1)),
        }
    }

    pub fn append(&mut self, mut entry: LogEntry) {
        entry.seq = self.next_seq;
        self.next_seq += 1;

        if self.buf.len() == self.cap {
            self.buf.pop_front();
        }
        self.buf.push_back(entry);
    }

    pub fn clear(&mut self) {
        self.buf.clear();
        self.next_seq = 1;
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.buf.iter()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.buf.back()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActiveApp {
    pub app_id: &'static str,
    pub session: u64,
    pub stack: AppStack,
}

/// At most one app is active at a time.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum HostState {
    #[default]
    Idle,
    Active(ActiveApp),
}

/// What the rendering surface shows: the launcher or exactly one app.
#[derive(Debug, Clone)]
pub enum Surface {
    Home {
        grid: &'static [AppDescriptor],
        dock: Vec<&'static AppDescriptor>,
    },
    App {
        app_id: &'static str,
        frame: ViewFrame,
    },
}

#[derive(Debug, Clone)]
pub struct PhoneState {
    pub host: HostState,
    pub next_session: u64,
    pub next_request: u64,
    pub diagnostics: LogBuffer,
    pub config: ShellConfig,
}

impl Default for PhoneState {
    fn default() -> Self {
        Self::new(ShellConfig::default())
    }
}

impl PhoneState {
    pub fn new(config: ShellConfig) -> Self {
        Self {
            host: HostState::Idle,
            next_session: 1,
            next_request: 1,
            diagnostics: LogBuffer::default(),
            config,
        }
    }

    pub fn active(&self) -> Option<&ActiveApp> {
        match &self.host {
            HostState::Active(active) => Some(active),
            HostState::Idle => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.host, HostState::Idle)
    }

    pub fn active_app_id(&self) -> Option<&'static str> {
        self.active().map(|active| active.app_id)
    }

    pub fn surface(&self) -> Surface {
        match &self.host {
            HostState::Idle => Surface::Home {
                grid: AppRegistry::grid(),
                dock: AppRegistry::dock(),
            },
            HostState::Active(active) => Surface::App {
                app_id: active.app_id,
                frame: active.stack.as_view_stack().frame(),
            },
        }
    }

    pub fn log(&mut self, entry: LogEntry) {
        self.diagnostics.append(entry);
    }
}
