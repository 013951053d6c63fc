use std::io;
use std::sync::mpsc;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph, Tabs, Wrap};
use ratatui::Terminal;

use phone_core::actions::{RuntimeAction, ShellAction, UserAction};
use phone_core::apps::browser::{BrowserInput, BrowserStack};
use phone_core::apps::calculator::{CalculatorInput, CalculatorStack, Operator};
use phone_core::apps::camera::{CameraInput, CameraMode, CameraStack, Facing};
use phone_core::apps::chatwave::{ChatWaveInput, ChatWaveStack};
use phone_core::apps::mail::{MailInput, MailStack, MailView};
use phone_core::apps::media::{format_position, MediaInput, MediaStack, PLAYLIST};
use phone_core::apps::messages::{MessagesInput, MessagesStack, MessagesView};
use phone_core::apps::phone::{PhoneInput, PhoneStack, PhoneTab, KEYPAD_KEYS};
use phone_core::apps::settings::{SettingsInput, SettingsStack, SettingsView};
use phone_core::apps::social::{SocialInput, SocialStack, SocialTab, POSTS};
use phone_core::apps::{AppInput, AppStack, ViewFrame};
use phone_core::entities::{SettingKind, SettingValue};
use phone_core::fallback::PROFILE_FIELDS;
use phone_core::reducer::{reduce, PhoneEffect};
use phone_core::registry::{AppDescriptor, AppRegistry};
use phone_core::state::{HostState, LogLevel, PhoneState};
use phone_exec::executor::EffectExecutor;

const COLUMNS: usize = 4;
const SLIDER_STEP: u8 = 5;

struct TuiGuard;

impl Drop for TuiGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show);
    }
}

pub fn run(mut state: PhoneState, executor: EffectExecutor) -> Result<(), Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, crossterm::cursor::Hide)?;
    let _guard = TuiGuard; // Restores the terminal on exit or panic

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    run_app(&mut terminal, &mut state, Arc::new(executor)).map_err(|e| e.into())
}

/// Surface-local cursor state; everything else lives in `PhoneState`.
#[derive(Debug, Default)]
struct UiState {
    /// Launcher position: grid tiles first, then the dock.
    selected: usize,
    cursor: usize,
    /// Focused input on compose views.
    field: usize,
    /// Pending `name,number` entry on the contacts tab.
    line: String,
    view: Option<(&'static str, &'static str)>,
}

impl UiState {
    /// Resets view-local cursors whenever the visible view changes.
    fn sync(&mut self, state: &PhoneState) {
        let view = state
            .active()
            .map(|active| (active.app_id, active.stack.as_view_stack().frame().view));
        if view != self.view {
            self.view = view;
            self.cursor = 0;
            self.field = 0;
            self.line.clear();
        }
    }
}

fn launcher() -> Vec<&'static AppDescriptor> {
    AppRegistry::grid()
        .iter()
        .chain(AppRegistry::dock())
        .collect()
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    state: &mut PhoneState,
    executor: Arc<EffectExecutor>,
) -> io::Result<()> {
    let (tx, rx) = mpsc::channel();
    let mut ui = UiState::default();

    loop {
        // Results from effect workers
        while let Ok(action) = rx.try_recv() {
            let effects = reduce(state, ShellAction::Runtime(action));
            dispatch(effects, &executor, &tx);
        }

        ui.sync(state);
        terminal.draw(|f| render(f, state, &ui))?;

        if event::poll(Duration::from_millis(50))? {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match handle_key_event(key, state, &mut ui) {
                KeyHandlerResult::Continue(effects) => dispatch(effects, &executor, &tx),
                KeyHandlerResult::Exit => return Ok(()),
            }
        }
    }
}

/// One short-lived worker per effect; results re-enter through `tx`.
fn dispatch(effects: Vec<PhoneEffect>, executor: &Arc<EffectExecutor>, tx: &Sender<RuntimeAction>) {
    for effect in effects {
        match effect {
            PhoneEffect::RequestFrame => {}
            PhoneEffect::Fetch(fetch) => {
                tracing::debug!(
                    dataset = fetch.ticket.key.label(),
                    request_id = fetch.ticket.request_id,
                    "fetch dispatched"
                );
                let executor = Arc::clone(executor);
                let tx = tx.clone();
                thread::spawn(move || {
                    let _ = tx.send(executor.resolve_fetch(fetch));
                });
            }
            PhoneEffect::Write(request) => {
                let executor = Arc::clone(executor);
                let tx = tx.clone();
                thread::spawn(move || {
                    if let Some(action) = executor.dispatch_write(request) {
                        let _ = tx.send(action);
                    }
                });
            }
            PhoneEffect::StartTimer { ticket, delay_ms } => {
                let tx = tx.clone();
                thread::spawn(move || {
                    thread::sleep(Duration::from_millis(delay_ms));
                    let _ = tx.send(RuntimeAction::TimerFired(ticket));
                });
            }
        }
    }
}

enum KeyHandlerResult {
    Continue(Vec<PhoneEffect>),
    Exit,
}

fn handle_key_event(key: KeyEvent, state: &mut PhoneState, ui: &mut UiState) -> KeyHandlerResult {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => KeyHandlerResult::Exit,
            KeyCode::Char('l') => {
                KeyHandlerResult::Continue(reduce(state, ShellAction::User(UserAction::ClearLogs)))
            }
            _ => KeyHandlerResult::Continue(Vec::new()),
        };
    }

    if state.is_idle() {
        handle_home_keys(key, state, ui)
    } else {
        KeyHandlerResult::Continue(handle_app_keys(key, state, ui))
    }
}

fn handle_home_keys(key: KeyEvent, state: &mut PhoneState, ui: &mut UiState) -> KeyHandlerResult {
    let tiles = launcher();
    let effects = match key.code {
        KeyCode::Char('q') => return KeyHandlerResult::Exit,
        KeyCode::Enter => match tiles.get(ui.selected) {
            Some(app) => open_app(state, app.id),
            None => Vec::new(),
        },
        code => {
            ui.selected = move_selection(ui.selected, code, tiles.len());
            Vec::new()
        }
    };
    KeyHandlerResult::Continue(effects)
}

fn move_selection(selected: usize, code: KeyCode, len: usize) -> usize {
    let next = match code {
        KeyCode::Left if selected % COLUMNS != 0 => selected - 1,
        KeyCode::Right if selected % COLUMNS != COLUMNS - 1 => selected + 1,
        KeyCode::Up if selected >= COLUMNS => selected - COLUMNS,
        KeyCode::Down => selected + COLUMNS,
        KeyCode::Char('0') => 9,
        KeyCode::Char(c @ '1'..='9') => (c as usize) - ('1' as usize),
        _ => selected,
    };
    if next < len {
        next
    } else {
        selected
    }
}

fn open_app(state: &mut PhoneState, app_id: &'static str) -> Vec<PhoneEffect> {
    let effects = reduce(state, ShellAction::User(UserAction::OpenApp(app_id.to_string())));
    if state.active_app_id() != Some(app_id) {
        tracing::info!(app_id, "launch ignored, app has no view");
    }
    effects
}

fn handle_app_keys(key: KeyEvent, state: &mut PhoneState, ui: &mut UiState) -> Vec<PhoneEffect> {
    if key.code == KeyCode::Esc {
        return reduce(state, ShellAction::User(UserAction::Back));
    }
    let HostState::Active(active) = &state.host else {
        return Vec::new();
    };

    let rows = list_len(&active.stack);
    match key.code {
        KeyCode::Up => {
            ui.cursor = ui.cursor.saturating_sub(1);
            return Vec::new();
        }
        KeyCode::Down => {
            if ui.cursor + 1 < rows {
                ui.cursor += 1;
            }
            return Vec::new();
        }
        _ => {}
    }

    match app_input(&active.stack, key, ui) {
        Some(input) => reduce(state, ShellAction::User(UserAction::App(input))),
        None => Vec::new(),
    }
}

/// Rows the cursor can move over in the current view.
fn list_len(stack: &AppStack) -> usize {
    match stack {
        AppStack::Phone(stack) => match stack.tab {
            PhoneTab::Recent => stack.call_log.len(),
            PhoneTab::Contacts => stack.contacts.len(),
            PhoneTab::Keypad => 0,
        },
        AppStack::Messages(stack) if stack.view == MessagesView::List => stack.conversations.len(),
        AppStack::Mail(stack) if stack.view == MailView::Inbox => stack.inbox.len(),
        AppStack::Settings(stack) if stack.view == SettingsView::Main => {
            stack.settings.items().map_or(0, Vec::len)
        }
        AppStack::Media(_) => PLAYLIST.len(),
        AppStack::Social(stack) if stack.tab == SocialTab::Feed => POSTS.len(),
        _ => 0,
    }
}

/// Applies a text-editing key to `current`.
fn edited(current: &str, code: KeyCode) -> Option<String> {
    match code {
        KeyCode::Char(c) => {
            let mut next = current.to_string();
            next.push(c);
            Some(next)
        }
        KeyCode::Backspace => {
            let mut next = current.to_string();
            next.pop()?;
            Some(next)
        }
        _ => None,
    }
}

fn app_input(stack: &AppStack, key: KeyEvent, ui: &mut UiState) -> Option<AppInput> {
    match stack {
        AppStack::Phone(stack) => phone_input(stack, key.code, ui).map(AppInput::Phone),
        AppStack::Messages(stack) => messages_input(stack, key.code, ui).map(AppInput::Messages),
        AppStack::Mail(stack) => mail_input(stack, key.code, ui).map(AppInput::Mail),
        AppStack::Camera(_) => camera_input(key.code).map(AppInput::Camera),
        AppStack::Settings(stack) => settings_input(stack, key.code, ui).map(AppInput::Settings),
        AppStack::Social(stack) => social_input(stack, key.code, ui).map(AppInput::Social),
        AppStack::Media(_) => media_input(key.code, ui).map(AppInput::Media),
        AppStack::Browser(stack) => browser_input(stack, key.code).map(AppInput::Browser),
        AppStack::Calculator(_) => calculator_input(key.code).map(AppInput::Calculator),
        AppStack::ChatWave(stack) => chatwave_input(stack, key.code).map(AppInput::ChatWave),
    }
}

fn phone_input(stack: &PhoneStack, code: KeyCode, ui: &mut UiState) -> Option<PhoneInput> {
    if matches!(code, KeyCode::Tab | KeyCode::Right) {
        return Some(PhoneInput::SelectTab(stack.tab.next()));
    }
    match (stack.tab, code) {
        (PhoneTab::Recent, KeyCode::Enter) => {
            let entry = stack.call_log.iter().nth(ui.cursor)?;
            Some(PhoneInput::CallBack(entry.id))
        }
        (PhoneTab::Contacts, KeyCode::Enter) if ui.line.is_empty() => {
            let contact = stack.contacts.iter().nth(ui.cursor)?;
            Some(PhoneInput::CallContact(contact.id))
        }
        (PhoneTab::Contacts, KeyCode::Enter) => {
            let line = std::mem::take(&mut ui.line);
            let (name, number) = line.split_once(',')?;
            Some(PhoneInput::AddContact {
                name: name.to_string(),
                number: number.to_string(),
            })
        }
        (PhoneTab::Contacts, code) => {
            ui.line = edited(&ui.line, code)?;
            None
        }
        (PhoneTab::Keypad, KeyCode::Char(c)) if KEYPAD_KEYS.contains(&c) => {
            Some(PhoneInput::KeypadPress(c))
        }
        (PhoneTab::Keypad, KeyCode::Backspace) => Some(PhoneInput::KeypadDelete),
        (PhoneTab::Keypad, KeyCode::Enter) => Some(PhoneInput::DialKeypad),
        _ => None,
    }
}

fn messages_input(stack: &MessagesStack, code: KeyCode, ui: &mut UiState) -> Option<MessagesInput> {
    match &stack.view {
        MessagesView::List => match code {
            KeyCode::Enter => {
                let conversation = stack.conversations.iter().nth(ui.cursor)?;
                Some(MessagesInput::OpenConversation(conversation.id))
            }
            KeyCode::Char('n') => Some(MessagesInput::StartCompose),
            _ => None,
        },
        MessagesView::Chat { .. } => match code {
            KeyCode::Enter => Some(MessagesInput::SendChat),
            code => edited(&stack.chat_draft, code).map(MessagesInput::EditChatDraft),
        },
        MessagesView::Compose => match code {
            KeyCode::Tab => {
                ui.field = (ui.field + 1) % 2;
                None
            }
            KeyCode::Enter => Some(MessagesInput::SendCompose),
            code if ui.field == 0 => {
                edited(&stack.compose.recipient, code).map(MessagesInput::EditRecipient)
            }
            code => edited(&stack.compose.body, code).map(MessagesInput::EditComposeBody),
        },
    }
}

fn mail_input(stack: &MailStack, code: KeyCode, ui: &mut UiState) -> Option<MailInput> {
    match &stack.view {
        MailView::Inbox => match code {
            KeyCode::Enter => {
                let email = stack.inbox.iter().nth(ui.cursor)?;
                Some(MailInput::OpenEmail(email.id))
            }
            KeyCode::Char('n') => Some(MailInput::StartCompose),
            _ => None,
        },
        MailView::Detail { .. } => None,
        MailView::Compose => match code {
            KeyCode::Tab => {
                ui.field = (ui.field + 1) % 3;
                None
            }
            KeyCode::Enter => Some(MailInput::Send),
            code => match ui.field {
                0 => edited(&stack.draft.to, code).map(MailInput::EditTo),
                1 => edited(&stack.draft.subject, code).map(MailInput::EditSubject),
                _ => edited(&stack.draft.body, code).map(MailInput::EditBody),
            },
        },
    }
}

fn settings_input(stack: &SettingsStack, code: KeyCode, ui: &UiState) -> Option<SettingsInput> {
    if stack.view != SettingsView::Main {
        return None;
    }
    let setting = stack.settings.items()?.get(ui.cursor)?;
    match (setting.kind, code) {
        (SettingKind::Toggle, KeyCode::Enter | KeyCode::Char(' ')) => {
            Some(SettingsInput::Toggle(setting.id.clone()))
        }
        (SettingKind::Navigation, KeyCode::Enter) => Some(SettingsInput::Navigate(setting.id.clone())),
        (SettingKind::Slider, KeyCode::Left | KeyCode::Right) => {
            let level = setting.value.as_level().unwrap_or(0);
            let level = if code == KeyCode::Left {
                level.saturating_sub(SLIDER_STEP)
            } else {
                level.saturating_add(SLIDER_STEP)
            };
            Some(SettingsInput::SetLevel {
                id: setting.id.clone(),
                level,
            })
        }
        _ => None,
    }
}

fn camera_input(code: KeyCode) -> Option<CameraInput> {
    match code {
        KeyCode::Char('p') => Some(CameraInput::SetMode(CameraMode::Photo)),
        KeyCode::Char('v') => Some(CameraInput::SetMode(CameraMode::Video)),
        KeyCode::Char('f') => Some(CameraInput::CycleFlash),
        KeyCode::Char('s') => Some(CameraInput::SwitchFacing),
        KeyCode::Enter | KeyCode::Char(' ') => Some(CameraInput::Capture),
        _ => None,
    }
}

fn calculator_input(code: KeyCode) -> Option<CalculatorInput> {
    let KeyCode::Char(c) = code else {
        return (code == KeyCode::Enter).then_some(CalculatorInput::Equals);
    };
    match c {
        '0'..='9' => Some(CalculatorInput::Digit(c as u8 - b'0')),
        '.' => Some(CalculatorInput::Decimal),
        '+' => Some(CalculatorInput::Operator(Operator::Add)),
        '-' => Some(CalculatorInput::Operator(Operator::Subtract)),
        '*' | 'x' => Some(CalculatorInput::Operator(Operator::Multiply)),
        '/' => Some(CalculatorInput::Operator(Operator::Divide)),
        '=' => Some(CalculatorInput::Equals),
        'c' => Some(CalculatorInput::Clear),
        'n' => Some(CalculatorInput::ToggleSign),
        '%' => Some(CalculatorInput::Percent),
        _ => None,
    }
}

fn media_input(code: KeyCode, ui: &UiState) -> Option<MediaInput> {
    match code {
        KeyCode::Char(' ') => Some(MediaInput::TogglePlay),
        KeyCode::Right | KeyCode::Char('n') => Some(MediaInput::Next),
        KeyCode::Left | KeyCode::Char('p') => Some(MediaInput::Previous),
        KeyCode::Enter => Some(MediaInput::Select(ui.cursor)),
        _ => None,
    }
}

fn browser_input(stack: &BrowserStack, code: KeyCode) -> Option<BrowserInput> {
    match code {
        KeyCode::Enter => Some(BrowserInput::Refresh),
        code => edited(&stack.url, code).map(BrowserInput::EditUrl),
    }
}

fn social_input(stack: &SocialStack, code: KeyCode, ui: &UiState) -> Option<SocialInput> {
    match code {
        KeyCode::Tab | KeyCode::Left | KeyCode::Right => Some(SocialInput::SelectTab(match stack.tab {
            SocialTab::Feed => SocialTab::Discover,
            SocialTab::Discover => SocialTab::Feed,
        })),
        KeyCode::Enter | KeyCode::Char(' ') if stack.tab == SocialTab::Feed => {
            POSTS.get(ui.cursor).map(|post| SocialInput::ToggleLike(post.id))
        }
        _ => None,
    }
}

fn chatwave_input(stack: &ChatWaveStack, code: KeyCode) -> Option<ChatWaveInput> {
    match code {
        KeyCode::Enter => Some(ChatWaveInput::Send),
        code => edited(&stack.draft, code).map(ChatWaveInput::EditDraft),
    }
}

fn get_spinner() -> &'static str {
    let frames = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or(0);
    frames[(millis / 100) as usize % frames.len()]
}

/// `#rrggbb` to a terminal colour.
fn hex_color(hex: &str) -> Color {
    let digits = hex.trim_start_matches('#');
    let channel = |range: std::ops::Range<usize>| {
        digits
            .get(range)
            .and_then(|part| u8::from_str_radix(part, 16).ok())
    };
    match (channel(0..2), channel(2..4), channel(4..6)) {
        (Some(r), Some(g), Some(b)) => Color::Rgb(r, g, b),
        _ => Color::Gray,
    }
}

fn render(f: &mut ratatui::Frame, state: &PhoneState, ui: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Status bar
            Constraint::Min(0),    // Surface
            Constraint::Length(2), // Hints + last diagnostic
        ])
        .split(f.area());

    render_status(f, chunks[0], state);
    match &state.host {
        HostState::Idle => render_home(f, chunks[1], ui),
        HostState::Active(active) => {
            let frame = active.stack.as_view_stack().frame();
            render_app(f, chunks[1], &active.stack, &frame, ui);
        }
    }
    render_footer(f, chunks[2], state);
}

fn render_status(f: &mut ratatui::Frame, area: Rect, state: &PhoneState) {
    let backend = &state.config.backend;
    let link = if backend.offline {
        Span::styled("offline", Style::default().fg(Color::Yellow))
    } else {
        Span::styled(backend.url.clone(), Style::default().fg(Color::DarkGray))
    };
    let line = Line::from(vec![
        Span::styled("Pocket", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        link,
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn render_home(f: &mut ratatui::Frame, area: Rect, ui: &UiState) {
    let grid = AppRegistry::grid();
    let dock = AppRegistry::dock();
    let grid_rows = grid.len().div_ceil(COLUMNS);

    let mut constraints = vec![Constraint::Length(4); grid_rows];
    constraints.push(Constraint::Min(0));
    constraints.push(Constraint::Length(4));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (row, apps) in grid.chunks(COLUMNS).enumerate() {
        let apps: Vec<&AppDescriptor> = apps.iter().collect();
        render_tile_row(f, rows[row], &apps, row * COLUMNS, ui.selected);
    }
    render_tile_row(f, rows[grid_rows + 1], &dock, grid.len(), ui.selected);
}

fn render_tile_row(
    f: &mut ratatui::Frame,
    area: Rect,
    apps: &[&AppDescriptor],
    offset: usize,
    selected: usize,
) {
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, COLUMNS as u32); COLUMNS])
        .split(area);

    for (i, app) in apps.iter().enumerate() {
        let accent = hex_color(app.gradient[0]);
        let mut border = Style::default().fg(accent);
        if offset + i == selected {
            border = border.add_modifier(Modifier::REVERSED);
        }
        let mut label = Style::default();
        if !app.opens() {
            label = label.add_modifier(Modifier::DIM);
        }
        let tile = Paragraph::new(vec![
            Line::from(Span::styled(
                app.glyph,
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(app.label, label)),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(border));
        f.render_widget(tile, cells[i]);
    }
}

fn render_app(f: &mut ratatui::Frame, area: Rect, stack: &AppStack, frame: &ViewFrame, ui: &UiState) {
    let mut title = vec![Span::styled(
        format!(" {} ", frame.title),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if frame.loading {
        title.push(Span::raw(format!("{} loading ", get_spinner())));
    }
    if frame.degraded {
        title.push(Span::styled(
            "offline data ",
            Style::default().fg(Color::Yellow),
        ));
    }
    let block = Block::default().borders(Borders::ALL).title(Line::from(title));
    let inner = block.inner(area);
    f.render_widget(block, area);

    match stack {
        AppStack::Phone(stack) => render_phone(f, inner, stack, ui),
        AppStack::Messages(stack) => render_messages(f, inner, stack, ui),
        AppStack::Mail(stack) => render_mail(f, inner, stack, ui),
        AppStack::Camera(stack) => render_camera(f, inner, stack),
        AppStack::Settings(stack) => render_settings(f, inner, stack, ui),
        AppStack::Social(stack) => render_social(f, inner, stack, ui),
        AppStack::Media(stack) => render_media(f, inner, stack, ui),
        AppStack::Browser(stack) => render_browser(f, inner, stack),
        AppStack::Calculator(stack) => render_calculator(f, inner, stack),
        AppStack::ChatWave(stack) => render_chatwave(f, inner, stack),
    }
}

fn render_list(f: &mut ratatui::Frame, area: Rect, items: Vec<ListItem<'static>>, cursor: usize) {
    let selected = (!items.is_empty()).then(|| cursor.min(items.len() - 1));
    let mut list_state = ListState::default().with_selected(selected);
    let list = List::new(items)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    f.render_stateful_widget(list, area, &mut list_state);
}

fn split_bottom(area: Rect, height: u16) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(height)])
        .split(area);
    (chunks[0], chunks[1])
}

fn field_line(label: &str, value: &str, focused: bool) -> Line<'static> {
    let marker = if focused { "▸ " } else { "  " };
    let style = if focused {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    Line::from(vec![
        Span::raw(marker),
        Span::styled(format!("{label}: "), style),
        Span::raw(value.to_string()),
    ])
}

fn render_phone(f: &mut ratatui::Frame, area: Rect, stack: &PhoneStack, ui: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);
    let tabs = [PhoneTab::Recent, PhoneTab::Contacts, PhoneTab::Keypad];
    let selected = tabs.iter().position(|tab| *tab == stack.tab).unwrap_or(0);
    f.render_widget(
        Tabs::new(tabs.iter().map(|tab| tab.label()))
            .select(selected)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED)),
        chunks[0],
    );

    match stack.tab {
        PhoneTab::Recent => {
            let items = stack
                .call_log
                .iter()
                .map(|entry| {
                    ListItem::new(format!(
                        "{:<16} {:<10} {:<9} {}",
                        entry.contact,
                        entry.direction.label(),
                        entry.duration.as_deref().unwrap_or("-"),
                        entry.timestamp
                    ))
                })
                .collect();
            render_list(f, chunks[1], items, ui.cursor);
        }
        PhoneTab::Contacts => {
            let (list_area, input_area) = split_bottom(chunks[1], 1);
            let items = stack
                .contacts
                .iter()
                .map(|contact| ListItem::new(format!("{:<20} {}", contact.name, contact.number)))
                .collect();
            render_list(f, list_area, items, ui.cursor);
            f.render_widget(
                Paragraph::new(field_line("New contact (name,number)", &ui.line, true)),
                input_area,
            );
        }
        PhoneTab::Keypad => {
            let mut lines = vec![
                Line::from(Span::styled(
                    stack.dial_number.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::default(),
            ];
            for row in KEYPAD_KEYS.chunks(3) {
                let keys: Vec<String> = row.iter().map(|key| format!(" {key} ")).collect();
                lines.push(Line::from(keys.join(" ")));
            }
            if let Some(number) = &stack.last_dialed {
                lines.push(Line::default());
                lines.push(Line::from(format!("Calling {number}...")));
            }
            f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), chunks[1]);
        }
    }
}

fn render_messages(f: &mut ratatui::Frame, area: Rect, stack: &MessagesStack, ui: &UiState) {
    match &stack.view {
        MessagesView::List => {
            let items = stack
                .conversations
                .iter()
                .map(|conversation| {
                    let badge = if conversation.unread > 0 {
                        format!(" ({})", conversation.unread)
                    } else {
                        String::new()
                    };
                    ListItem::new(vec![
                        Line::from(vec![
                            Span::styled(
                                format!("{}{badge}", conversation.contact),
                                Style::default().add_modifier(Modifier::BOLD),
                            ),
                            Span::raw(format!("  {}", conversation.timestamp)),
                        ]),
                        Line::from(format!("  {}", conversation.last_message)),
                    ])
                })
                .collect();
            render_list(f, area, items, ui.cursor);
        }
        MessagesView::Chat { conversation_id } => {
            let (thread_area, input_area) = split_bottom(area, 1);
            let lines: Vec<Line> = stack
                .thread(*conversation_id)
                .into_iter()
                .flat_map(|thread| thread.iter())
                .map(|message| {
                    let style = if message.is_own {
                        Style::default().fg(Color::Cyan)
                    } else {
                        Style::default()
                    };
                    Line::from(vec![
                        Span::styled(format!("{}: ", message.sender), style),
                        Span::raw(message.content.clone()),
                        Span::styled(
                            format!("  {}", message.timestamp),
                            Style::default().fg(Color::DarkGray),
                        ),
                    ])
                })
                .collect();
            f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), thread_area);
            f.render_widget(
                Paragraph::new(field_line("Message", &stack.chat_draft, true)),
                input_area,
            );
        }
        MessagesView::Compose => {
            let lines = vec![
                field_line("To", &stack.compose.recipient, ui.field == 0),
                field_line("Message", &stack.compose.body, ui.field == 1),
            ];
            f.render_widget(Paragraph::new(lines), area);
        }
    }
}

fn render_mail(f: &mut ratatui::Frame, area: Rect, stack: &MailStack, ui: &UiState) {
    match &stack.view {
        MailView::Inbox => {
            let items = stack
                .inbox
                .iter()
                .map(|email| {
                    let marker = if email.is_read { "  " } else { "● " };
                    let mut subject = Style::default();
                    if !email.is_read {
                        subject = subject.add_modifier(Modifier::BOLD);
                    }
                    let mut flags = String::new();
                    if email.is_important {
                        flags.push_str(" !");
                    }
                    if let Some(count) = email.attachments {
                        flags.push_str(&format!(" [{count}]"));
                    }
                    ListItem::new(vec![
                        Line::from(vec![
                            Span::raw(marker),
                            Span::styled(email.subject.clone(), subject),
                            Span::raw(flags),
                        ]),
                        Line::from(format!("  {}  {}", email.sender, email.timestamp)),
                    ])
                })
                .collect();
            render_list(f, area, items, ui.cursor);
        }
        MailView::Detail { .. } => {
            let Some(email) = stack.current_email() else {
                return;
            };
            let lines = vec![
                Line::from(Span::styled(
                    email.subject.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(format!("From: {}", email.sender)),
                Line::from(email.timestamp.clone()),
                Line::default(),
                Line::from(email.preview.clone()),
            ];
            f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
        }
        MailView::Compose => {
            let lines = vec![
                field_line("To", &stack.draft.to, ui.field == 0),
                field_line("Subject", &stack.draft.subject, ui.field == 1),
                field_line("Body", &stack.draft.body, ui.field == 2),
            ];
            f.render_widget(Paragraph::new(lines), area);
        }
    }
}

fn render_settings(f: &mut ratatui::Frame, area: Rect, stack: &SettingsStack, ui: &UiState) {
    match stack.view {
        SettingsView::Main => {
            let Some(settings) = stack.settings.items() else {
                return;
            };
            let items = settings
                .iter()
                .map(|setting| {
                    let value = match (setting.kind, setting.value) {
                        (SettingKind::Toggle, SettingValue::Flag(true)) => "on".to_string(),
                        (SettingKind::Toggle, _) => "off".to_string(),
                        (SettingKind::Slider, SettingValue::Level(level)) => format!("{level}%"),
                        _ => ">".to_string(),
                    };
                    ListItem::new(format!("{:<22} {value}", setting.label))
                })
                .collect();
            render_list(f, area, items, ui.cursor);
        }
        SettingsView::Profile => {
            let lines: Vec<Line> = PROFILE_FIELDS
                .iter()
                .map(|field| Line::from(format!("{:<10} {}", field.label, field.value)))
                .collect();
            f.render_widget(Paragraph::new(lines), area);
        }
    }
}

fn render_camera(f: &mut ratatui::Frame, area: Rect, stack: &CameraStack) {
    let mode = match stack.mode {
        CameraMode::Photo => "photo",
        CameraMode::Video => "video",
    };
    let facing = match stack.facing {
        Facing::Back => "back",
        Facing::Front => "front",
    };
    let mut lines = vec![
        Line::from(format!("Mode: {mode}   Flash: {}   Camera: {facing}", stack.flash.as_str())),
    ];
    if stack.recording {
        lines.push(Line::from(Span::styled(
            "● REC",
            Style::default().fg(Color::Red),
        )));
    }
    if stack.is_capturing() {
        lines.push(Line::from(format!("{} capturing", get_spinner())));
    }
    lines.push(Line::default());
    lines.push(Line::from(format!("Photos ({})", stack.photos.len())));
    lines.extend(stack.photos.iter().take(5).map(|url| Line::from(format!("  {url}"))));
    f.render_widget(Paragraph::new(lines), area);
}

fn render_calculator(f: &mut ratatui::Frame, area: Rect, stack: &CalculatorStack) {
    let pending = match (stack.pending, stack.operator) {
        (Some(value), Some(operator)) => format!("{value} {}", operator.symbol()),
        _ => String::new(),
    };
    let lines = vec![
        Line::from(Span::styled(pending, Style::default().fg(Color::DarkGray))),
        Line::from(Span::styled(
            stack.display.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Right), area);
}

fn render_media(f: &mut ratatui::Frame, area: Rect, stack: &MediaStack, ui: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);
    let track = stack.current();
    let state = if stack.playing { "▶" } else { "⏸" };
    let ratio = f64::from(stack.position_secs) / f64::from(track.duration_secs.max(1));
    let gauge = Gauge::default()
        .block(Block::default().title(format!("{state} {} - {}", track.title, track.artist)))
        .ratio(ratio.clamp(0.0, 1.0))
        .label(format!(
            "{} / {}",
            format_position(stack.position_secs),
            format_position(track.duration_secs)
        ));
    f.render_widget(gauge, chunks[0]);

    let items = PLAYLIST
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let marker = if i == stack.track { "♪ " } else { "  " };
            ListItem::new(format!(
                "{marker}{:<18} {:<14} {}",
                entry.title,
                entry.artist,
                format_position(entry.duration_secs)
            ))
        })
        .collect();
    render_list(f, chunks[1], items, ui.cursor);
}

fn render_browser(f: &mut ratatui::Frame, area: Rect, stack: &BrowserStack) {
    let page = if stack.loading {
        format!("{} loading", get_spinner())
    } else {
        format!("Welcome to {}", stack.url)
    };
    let lines = vec![field_line("URL", &stack.url, true), Line::default(), Line::from(page)];
    f.render_widget(Paragraph::new(lines), area);
}

fn render_social(f: &mut ratatui::Frame, area: Rect, stack: &SocialStack, ui: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);
    let selected = match stack.tab {
        SocialTab::Feed => 0,
        SocialTab::Discover => 1,
    };
    f.render_widget(
        Tabs::new(["Feed", "Discover"])
            .select(selected)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED)),
        chunks[0],
    );

    match stack.tab {
        SocialTab::Feed => {
            let items = POSTS
                .iter()
                .map(|post| {
                    let heart = if stack.is_liked(post.id) { "♥" } else { "♡" };
                    ListItem::new(vec![
                        Line::from(vec![
                            Span::styled(post.author, Style::default().add_modifier(Modifier::BOLD)),
                            Span::raw(format!("  {}", post.age)),
                        ]),
                        Line::from(format!("  {}", post.content)),
                        Line::from(format!(
                            "  {heart} {}  💬 {}",
                            stack.like_count(post),
                            post.comments
                        )),
                    ])
                })
                .collect();
            render_list(f, chunks[1], items, ui.cursor);
        }
        SocialTab::Discover => {
            let lines: Vec<Line> = POSTS
                .iter()
                .map(|post| Line::from(format!("Follow {}", post.author)))
                .collect();
            f.render_widget(Paragraph::new(lines), chunks[1]);
        }
    }
}

fn render_chatwave(f: &mut ratatui::Frame, area: Rect, stack: &ChatWaveStack) {
    let (thread_area, input_area) = split_bottom(area, 1);
    let lines: Vec<Line> = stack
        .lines
        .iter()
        .map(|line| {
            let (who, style) = if line.sent {
                ("me", Style::default().fg(Color::Cyan))
            } else {
                ("them", Style::default())
            };
            Line::from(vec![
                Span::styled(format!("{who}: "), style),
                Span::raw(line.text.clone()),
                Span::styled(format!("  {}", line.time), Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), thread_area);
    f.render_widget(Paragraph::new(field_line("Message", &stack.draft, true)), input_area);
}

fn key_hints(state: &PhoneState) -> &'static str {
    let Some(active) = state.active() else {
        return "arrows/1-9 select · enter open · q quit";
    };
    match &active.stack {
        AppStack::Phone(stack) => match stack.tab {
            PhoneTab::Recent => "tab switch · enter call back · esc close",
            PhoneTab::Contacts => "tab switch · enter call · type name,number + enter to add · esc close",
            PhoneTab::Keypad => "tab switch · digits dial · enter call · esc close",
        },
        AppStack::Messages(stack) => match stack.view {
            MessagesView::List => "enter open · n new message · esc close",
            MessagesView::Chat { .. } => "type · enter send · esc back",
            MessagesView::Compose => "tab next field · enter send · esc back",
        },
        AppStack::Mail(stack) => match stack.view {
            MailView::Inbox => "enter open · n compose · esc close",
            MailView::Detail { .. } => "esc back",
            MailView::Compose => "tab next field · enter send · esc back",
        },
        AppStack::Settings(_) => "enter toggle/open · ←/→ adjust · esc back",
        AppStack::Camera(_) => "enter capture · p/v mode · f flash · s switch · esc close",
        AppStack::Calculator(_) => "0-9 . + - * / = · c clear · n sign · % · esc close",
        AppStack::Media(_) => "space play · ←/→ track · enter select · esc close",
        AppStack::Browser(_) => "type url · enter refresh · esc close",
        AppStack::Social(_) => "tab switch · enter like · esc close",
        AppStack::ChatWave(_) => "type · enter send · esc close",
    }
}

fn render_footer(f: &mut ratatui::Frame, area: Rect, state: &PhoneState) {
    let mut lines = vec![Line::from(Span::styled(
        key_hints(state),
        Style::default().fg(Color::DarkGray),
    ))];
    if let Some(entry) = state.diagnostics.last() {
        let color = match entry.level {
            LogLevel::Error => Color::Red,
            LogLevel::Warn => Color::Yellow,
            _ => Color::DarkGray,
        };
        let context = entry
            .context
            .as_deref()
            .map(|context| format!("{context}: "))
            .unwrap_or_default();
        lines.push(Line::from(Span::styled(
            format!("[{}] {context}{}", entry.level.label(), entry.message),
            Style::default().fg(color),
        )));
    }
    f.render_widget(Paragraph::new(lines), area);
}

#[cfg(test)]
mod tests {
    use phone_core::config::ShellConfig;
    use ratatui::backend::TestBackend;

    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn screen(state: &PhoneState, ui: &UiState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 32)).unwrap();
        terminal.draw(|f| render(f, state, ui)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn launcher_selection_stays_inside_the_grid_and_dock() {
        let len = launcher().len();
        assert_eq!(move_selection(0, KeyCode::Left, len), 0);
        assert_eq!(move_selection(0, KeyCode::Right, len), 1);
        assert_eq!(move_selection(3, KeyCode::Right, len), 3);
        assert_eq!(move_selection(1, KeyCode::Down, len), 5);
        assert_eq!(move_selection(len - 1, KeyCode::Down, len), len - 1);
        assert_eq!(move_selection(7, KeyCode::Char('3'), len), 2);
        assert_eq!(move_selection(7, KeyCode::Char('0'), len), 9);
    }

    #[test]
    fn enter_on_launcher_only_tile_stays_home() {
        let mut state = PhoneState::new(ShellConfig::default());
        let mut ui = UiState::default();
        let timesync = launcher()
            .iter()
            .position(|app| app.id == "timesync")
            .unwrap();
        ui.selected = timesync;

        let KeyHandlerResult::Continue(effects) =
            handle_key_event(press(KeyCode::Enter), &mut state, &mut ui)
        else {
            panic!("enter should not exit");
        };
        assert!(effects.is_empty());
        assert!(state.is_idle());
        assert_eq!(state.diagnostics.len(), 1);
    }

    #[test]
    fn typing_in_browser_edits_the_url() {
        let mut state = PhoneState::new(ShellConfig::default());
        let mut ui = UiState::default();
        open_app(&mut state, "webflow");
        ui.sync(&state);

        handle_key_event(press(KeyCode::Backspace), &mut state, &mut ui);
        handle_key_event(press(KeyCode::Char('x')), &mut state, &mut ui);
        let Some(AppStack::Browser(browser)) = state.active().map(|a| &a.stack) else {
            panic!("browser should be open");
        };
        assert_eq!(browser.url, "https://techflow.dex");
    }

    #[test]
    fn calculator_keys_map_to_inputs() {
        assert_eq!(calculator_input(KeyCode::Char('7')), Some(CalculatorInput::Digit(7)));
        assert_eq!(
            calculator_input(KeyCode::Char('/')),
            Some(CalculatorInput::Operator(Operator::Divide))
        );
        assert_eq!(calculator_input(KeyCode::Enter), Some(CalculatorInput::Equals));
        assert_eq!(calculator_input(KeyCode::Char('q')), None);
    }

    #[test]
    fn contacts_line_becomes_add_contact() {
        let stack = PhoneStack {
            tab: PhoneTab::Contacts,
            ..PhoneStack::new()
        };
        let mut ui = UiState {
            line: "Tow Truck,555-0199".to_string(),
            ..UiState::default()
        };
        assert_eq!(
            phone_input(&stack, KeyCode::Enter, &mut ui),
            Some(PhoneInput::AddContact {
                name: "Tow Truck".to_string(),
                number: "555-0199".to_string(),
            })
        );
        assert!(ui.line.is_empty());
    }

    #[test]
    fn escape_closes_app_back_to_launcher() {
        let mut state = PhoneState::new(ShellConfig::default());
        let mut ui = UiState::default();
        open_app(&mut state, "calculator");
        handle_key_event(press(KeyCode::Esc), &mut state, &mut ui);
        assert!(state.is_idle());
    }

    #[test]
    fn home_screen_shows_grid_and_dock_labels() {
        let state = PhoneState::new(ShellConfig::default());
        let text = screen(&state, &UiState::default());
        assert!(text.contains("SocialHub"));
        assert!(text.contains("ShopEase"));
        assert!(text.contains("Messages"));
    }

    #[test]
    fn open_app_frame_is_titled() {
        let mut state = PhoneState::new(ShellConfig::default());
        open_app(&mut state, "calculator");
        let text = screen(&state, &UiState::default());
        assert!(text.contains("Calculator"));
    }
}
