// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use joetrader_app::{
    AppCommand, AppEvent, BrowseMode, CompareError, CompareOutcome, LIST_COMPLETE_MESSAGE,
    ListingQuery, Mark, SHOP_LOCKED_MESSAGE, SaleListing, Session, SortMode, UserStateSink,
    describe_item, search_listing,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use std::collections::BTreeSet;
use std::io;
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

const STATUS_CLEAR_DELAY: Duration = Duration::from_secs(4);
const NO_MATCHES_MESSAGE: &str = "No images you want are available from this seller.";

/// I/O the front end needs beyond the session itself.
pub trait AppRuntime {
    fn load_listing(&mut self) -> Result<Vec<SaleListing>>;
    fn read_seller_list(&mut self, path: &Path) -> Result<BTreeSet<String>, CompareError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShopField {
    Name,
    MinPrice,
    MaxPrice,
}

#[derive(Debug, Clone, PartialEq, Default)]
struct ShopUiState {
    visible: bool,
    listing: Vec<SaleListing>,
    want_only: bool,
    name_query: String,
    min_price: String,
    max_price: String,
    editing: Option<ShopField>,
    cursor: usize,
    detail: Option<SaleListing>,
}

impl ShopUiState {
    fn open(listing: Vec<SaleListing>) -> Self {
        Self {
            visible: true,
            listing,
            want_only: true,
            ..Self::default()
        }
    }

    fn query(&self) -> ListingQuery {
        ListingQuery::from_inputs(&self.name_query, &self.min_price, &self.max_price)
    }

    fn field(&self, field: ShopField) -> &str {
        match field {
            ShopField::Name => &self.name_query,
            ShopField::MinPrice => &self.min_price,
            ShopField::MaxPrice => &self.max_price,
        }
    }

    fn field_mut(&mut self, field: ShopField) -> &mut String {
        match field {
            ShopField::Name => &mut self.name_query,
            ShopField::MinPrice => &mut self.min_price,
            ShopField::MaxPrice => &mut self.max_price,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ComparePromptState {
    visible: bool,
    input: String,
}

/// Modal message; any key dismisses it.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Notice {
    title: String,
    body: String,
}

impl Notice {
    fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
struct ViewData {
    help_visible: bool,
    shop: ShopUiState,
    compare: ComparePromptState,
    notice: Option<Notice>,
    status_token: u64,
}

pub fn run_app<S: UserStateSink, R: AppRuntime>(
    session: &mut Session<S>,
    runtime: &mut R,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();

    let mut result = Ok(());
    loop {
        process_internal_events(session, &view_data, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, session, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        match next_key_event() {
            Ok(Some(key)) => {
                if handle_key_event(session, runtime, &mut view_data, &internal_tx, key) {
                    break;
                }
            }
            Ok(None) => {}
            Err(error) => {
                result = Err(error);
                break;
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn next_key_event() -> Result<Option<KeyEvent>> {
    if !event::poll(Duration::from_millis(120)).context("poll event")? {
        return Ok(None);
    }
    match event::read().context("read event")? {
        Event::Key(key) => Ok(Some(key)),
        _ => Ok(None),
    }
}

fn process_internal_events<S: UserStateSink>(
    session: &mut Session<S>,
    view_data: &ViewData,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                if let Err(error) = session.dispatch(AppCommand::ClearStatus) {
                    log::warn!("clearing status failed: {error:#}");
                }
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_DELAY);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn bump_status_token(view_data: &mut ViewData, internal_tx: &Sender<InternalEvent>) {
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn emit_status<S: UserStateSink>(
    session: &mut Session<S>,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    if let Err(error) = session.dispatch(AppCommand::SetStatus(message.into())) {
        log::warn!("status update failed: {error:#}");
    }
    bump_status_token(view_data, internal_tx);
}

fn handle_key_event<S: UserStateSink, R: AppRuntime>(
    session: &mut Session<S>,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if view_data.notice.is_some() {
        view_data.notice = None;
        return false;
    }

    if view_data.help_visible {
        if key.code == KeyCode::Esc || key.code == KeyCode::Char('?') {
            view_data.help_visible = false;
        }
        return false;
    }

    if view_data.compare.visible {
        handle_compare_prompt_key(session, runtime, view_data, key);
        return false;
    }

    if view_data.shop.visible {
        handle_shop_key(session, &mut view_data.shop, key);
        return false;
    }

    let command = match (key.code, key.modifiers) {
        (KeyCode::Char('n') | KeyCode::Right, KeyModifiers::NONE) => AppCommand::Next,
        (KeyCode::Char('p') | KeyCode::Left, KeyModifiers::NONE) => AppCommand::Previous,
        (KeyCode::Char('w'), KeyModifiers::NONE) => AppCommand::Categorize(Mark::Want),
        (KeyCode::Char('h'), KeyModifiers::NONE) => AppCommand::Categorize(Mark::Have),
        (KeyCode::Char('d'), KeyModifiers::NONE) => AppCommand::Categorize(Mark::DontWant),
        (KeyCode::Char('t'), KeyModifiers::NONE) => AppCommand::ToggleMode,
        (KeyCode::Char('y'), KeyModifiers::NONE) => AppCommand::Sort(SortMode::ByYear),
        (KeyCode::Char('m'), KeyModifiers::NONE) => AppCommand::Sort(SortMode::ByName),
        (KeyCode::Char('g'), KeyModifiers::NONE) => AppCommand::Sort(SortMode::ByCategory),
        (KeyCode::Char('s'), KeyModifiers::NONE) => {
            open_shop(session, runtime, view_data);
            return false;
        }
        (KeyCode::Char('c'), KeyModifiers::NONE) => {
            view_data.compare = ComparePromptState {
                visible: true,
                input: String::new(),
            };
            return false;
        }
        (KeyCode::Char('?'), _) => {
            view_data.help_visible = true;
            return false;
        }
        _ => return false,
    };

    dispatch_command(session, view_data, internal_tx, command);
    false
}

fn dispatch_command<S: UserStateSink>(
    session: &mut Session<S>,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    command: AppCommand,
) {
    let events = match session.dispatch(command) {
        Ok(events) => events,
        Err(error) => {
            log::error!("command failed for {}: {error:#}", session.username());
            emit_status(
                session,
                view_data,
                internal_tx,
                format!("save failed: {error:#}"),
            );
            return;
        }
    };

    if events.contains(&AppEvent::ShopUnlocked) {
        view_data.notice = Some(Notice::new("list complete", LIST_COMPLETE_MESSAGE));
    }
    if events
        .iter()
        .any(|event| matches!(event, AppEvent::StatusUpdated(_)))
    {
        bump_status_token(view_data, internal_tx);
    } else if let Some(message) = describe_events(&events) {
        emit_status(session, view_data, internal_tx, message);
    }
}

fn describe_events(events: &[AppEvent]) -> Option<String> {
    events.iter().find_map(|event| match event {
        AppEvent::Categorized { item, current, .. } => {
            Some(format!("{} marked {}", item.file_name(), current.label()))
        }
        AppEvent::ModeChanged(mode) => Some(format!("showing {}", mode.label())),
        AppEvent::Sorted(sort) => Some(format!("sorted by {}", sort.label())),
        _ => None,
    })
}

fn open_shop<S: UserStateSink, R: AppRuntime>(
    session: &Session<S>,
    runtime: &mut R,
    view_data: &mut ViewData,
) {
    if !session.shop_access_permitted() {
        view_data.notice = Some(Notice::new("shop locked", SHOP_LOCKED_MESSAGE));
        return;
    }

    match runtime.load_listing() {
        Ok(listing) => {
            log::info!("opened shop with {} listings", listing.len());
            view_data.shop = ShopUiState::open(listing);
        }
        Err(error) => {
            log::warn!("loading sale listing failed: {error:#}");
            view_data.notice = Some(Notice::new(
                "shop",
                format!("Failed to load items: {error:#}"),
            ));
        }
    }
}

fn visible_shop_entries<'a, S: UserStateSink>(
    session: &Session<S>,
    shop: &'a ShopUiState,
) -> Vec<&'a SaleListing> {
    search_listing(
        session.shop_entries(&shop.listing, shop.want_only),
        &shop.query(),
    )
}

fn clamp_shop_cursor<S: UserStateSink>(session: &Session<S>, shop: &mut ShopUiState) {
    let count = visible_shop_entries(session, shop).len();
    shop.cursor = shop.cursor.min(count.saturating_sub(1));
}

fn handle_shop_key<S: UserStateSink>(session: &Session<S>, shop: &mut ShopUiState, key: KeyEvent) {
    if shop.detail.is_some() {
        shop.detail = None;
        return;
    }

    if let Some(field) = shop.editing {
        match (key.code, key.modifiers) {
            (KeyCode::Esc | KeyCode::Enter, _) => shop.editing = None,
            (KeyCode::Backspace, _) => {
                shop.field_mut(field).pop();
            }
            (KeyCode::Char(ch), modifiers)
                if modifiers.is_empty() || modifiers == KeyModifiers::SHIFT =>
            {
                shop.field_mut(field).push(ch);
            }
            _ => {}
        }
        clamp_shop_cursor(session, shop);
        return;
    }

    match key.code {
        KeyCode::Esc => {
            *shop = ShopUiState::default();
            return;
        }
        KeyCode::Char('w') => shop.want_only = !shop.want_only,
        KeyCode::Char('/') => shop.editing = Some(ShopField::Name),
        KeyCode::Char('[') => shop.editing = Some(ShopField::MinPrice),
        KeyCode::Char(']') => shop.editing = Some(ShopField::MaxPrice),
        KeyCode::Up | KeyCode::Char('k') => shop.cursor = shop.cursor.saturating_sub(1),
        KeyCode::Down | KeyCode::Char('j') => shop.cursor = shop.cursor.saturating_add(1),
        KeyCode::Enter => {
            let selected = visible_shop_entries(session, shop)
                .get(shop.cursor)
                .map(|entry| (*entry).clone());
            shop.detail = selected;
        }
        _ => {}
    }
    clamp_shop_cursor(session, shop);
}

fn handle_compare_prompt_key<S: UserStateSink, R: AppRuntime>(
    session: &Session<S>,
    runtime: &mut R,
    view_data: &mut ViewData,
    key: KeyEvent,
) {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => view_data.compare = ComparePromptState::default(),
        (KeyCode::Backspace, _) => {
            view_data.compare.input.pop();
        }
        (KeyCode::Char('u'), modifiers) if modifiers.contains(KeyModifiers::CONTROL) => {
            view_data.compare.input.clear();
        }
        (KeyCode::Char(ch), modifiers)
            if modifiers.is_empty() || modifiers == KeyModifiers::SHIFT =>
        {
            view_data.compare.input.push(ch);
        }
        (KeyCode::Enter, _) => {
            let input = view_data.compare.input.trim().to_owned();
            if input.is_empty() {
                return;
            }
            view_data.compare = ComparePromptState::default();
            view_data.notice = Some(compare_notice(session, runtime, Path::new(&input)));
        }
        _ => {}
    }
}

fn compare_notice<S: UserStateSink, R: AppRuntime>(
    session: &Session<S>,
    runtime: &mut R,
    path: &Path,
) -> Notice {
    let seller = match runtime.read_seller_list(path) {
        Ok(seller) => seller,
        Err(error) => {
            log::warn!("seller comparison aborted: {error}");
            return Notice::new("compare failed", error.to_string());
        }
    };

    match session.compare_with_seller(&seller) {
        CompareOutcome::NoMatches => Notice::new("no matches", NO_MATCHES_MESSAGE),
        outcome @ CompareOutcome::Matches(_) => Notice::new(
            "matches",
            format!(
                "Images you want from this seller:\n\n{}",
                outcome.match_names().join("\n")
            ),
        ),
    }
}

fn render<S: UserStateSink>(
    frame: &mut ratatui::Frame<'_>,
    session: &Session<S>,
    view_data: &ViewData,
) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let header = Paragraph::new(header_text(session))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().title("joetrader").borders(Borders::ALL));
    frame.render_widget(header, layout[0]);

    let body = Paragraph::new(main_view_text(session))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(session.browse().mode().label())
                .borders(Borders::ALL),
        );
    frame.render_widget(body, layout[1]);

    let status_widget = Paragraph::new(status_text(session, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status_widget, layout[2]);

    if view_data.shop.visible {
        render_overlay(
            frame,
            80,
            70,
            format!("shop - {}", session.username()),
            shop_overlay_text(session, &view_data.shop),
        );
        if let Some(detail) = &view_data.shop.detail {
            render_overlay(
                frame,
                56,
                40,
                detail.display_name().to_owned(),
                detail.detail_lines().join("\n"),
            );
        }
    }

    if view_data.compare.visible {
        render_overlay(
            frame,
            64,
            30,
            "compare with seller".to_owned(),
            compare_prompt_text(&view_data.compare),
        );
    }

    if view_data.help_visible {
        render_overlay(frame, 70, 60, "help".to_owned(), help_overlay_text().to_owned());
    }

    if let Some(notice) = &view_data.notice {
        render_overlay(frame, 60, 40, notice.title.clone(), notice.body.clone());
    }
}

fn render_overlay(
    frame: &mut ratatui::Frame<'_>,
    percent_x: u16,
    percent_y: u16,
    title: String,
    text: String,
) {
    let area = centered_rect(percent_x, percent_y, frame.area());
    frame.render_widget(Clear, area);
    let overlay = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Cyan)),
        );
    frame.render_widget(overlay, area);
}

fn header_text<S: UserStateSink>(session: &Session<S>) -> String {
    let counts = session.categories().counts();
    let shop = if session.shop_access_permitted() {
        "open"
    } else {
        "locked"
    };
    format!(
        "{} | want {} | have {} | don't want {} | shop {shop}",
        session.username(),
        counts.want,
        counts.have,
        counts.dont_want
    )
}

fn main_view_text<S: UserStateSink>(session: &Session<S>) -> String {
    let browse = session.browse();
    let Some(item) = session.active_item() else {
        return match browse.mode() {
            BrowseMode::All => "No images found in the catalog.".to_owned(),
            BrowseMode::WantOnly => {
                "Your want list is empty. Press t to browse all items.".to_owned()
            }
        };
    };

    let (position, total) = browse.position().unwrap_or((0, 0));
    let mut lines = vec![
        format!(
            "{} {position}/{total} | sort: {}",
            browse.mode().label(),
            browse.sort_mode().label()
        ),
        format!("Item: {item}"),
        String::new(),
    ];
    lines.extend(describe_item(session.metadata_of(item)));
    lines.push(String::new());
    lines.push(format!("Category: {}", session.category_of(item).label()));
    if let Some(path) = session.active_path() {
        lines.push(format!("File: {}", path.display()));
    }
    lines.join("\n")
}

fn status_text<S: UserStateSink>(session: &Session<S>, view_data: &ViewData) -> String {
    if status_hidden_by_overlay(view_data) {
        return String::new();
    }

    let shop = if session.shop_access_permitted() {
        "open"
    } else {
        "locked"
    };
    let default = format!(
        "n/p move | w/h/d mark | t mode | y/m/g sort | s shop:{shop} | c compare | ? help | ctrl+q"
    );
    match &session.status_line {
        Some(status) => format!("{status} | {default}"),
        None => default,
    }
}

fn status_hidden_by_overlay(view_data: &ViewData) -> bool {
    view_data.help_visible
        || view_data.shop.visible
        || view_data.compare.visible
        || view_data.notice.is_some()
}

fn shop_field_text(shop: &ShopUiState, field: ShopField) -> String {
    let value = shop.field(field);
    if shop.editing == Some(field) {
        format!("{value}_")
    } else if value.is_empty() {
        "any".to_owned()
    } else {
        value.to_owned()
    }
}

fn shop_overlay_text<S: UserStateSink>(session: &Session<S>, shop: &ShopUiState) -> String {
    let filter = if shop.want_only {
        "want list only"
    } else {
        "all items"
    };
    let mut lines = vec![
        format!("showing: {filter}"),
        format!("name: {}", shop_field_text(shop, ShopField::Name)),
        format!(
            "price: {} to {}",
            shop_field_text(shop, ShopField::MinPrice),
            shop_field_text(shop, ShopField::MaxPrice)
        ),
        String::new(),
    ];

    let entries = visible_shop_entries(session, shop);
    if entries.is_empty() {
        lines.push("No items match.".to_owned());
    }
    for (index, entry) in entries.iter().enumerate() {
        let marker = if index == shop.cursor { ">" } else { " " };
        lines.push(format!("{marker} {}", entry.summary_line()));
    }

    lines.push(String::new());
    lines.push(
        "w want-only | / name | [ ] min/max price | up/down | enter details | esc close"
            .to_owned(),
    );
    lines.join("\n")
}

fn compare_prompt_text(prompt: &ComparePromptState) -> String {
    format!(
        "Seller list path (.json array of item keys, or one key per line):\n\n> {}_\n\nenter compare | esc cancel",
        prompt.input
    )
}

fn help_overlay_text() -> &'static str {
    "browse: n/right next | p/left previous | t toggle want list\n\
mark: w want | h have | d don't want (marks and moves on)\n\
sort: y year | m name | g category\n\
trade: s shop (after a full pass) | c compare with a seller list\n\
shop: w want-only | / name | [ ] min/max price | up/down | enter details | esc close\n\
global: ? help | ctrl+q quit"
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::{
        AppRuntime, NO_MATCHES_MESSAGE, ShopField, ViewData, centered_rect, handle_key_event,
        header_text, help_overlay_text, main_view_text, shop_overlay_text, status_text,
        visible_shop_entries,
    };
    use anyhow::bail;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use joetrader_app::{
        BrowseMode, Category, CategoryStore, CompareError, ItemCatalog, ItemKey, ItemMetadata,
        LIST_COMPLETE_MESSAGE, Mark, MetadataIndex, SHOP_LOCKED_MESSAGE, SaleListing, ScrollGate,
        Session, SortMode, UserState, UserStateSink,
    };
    use ratatui::layout::Rect;
    use std::collections::BTreeSet;
    use std::io;
    use std::path::{Path, PathBuf};
    use std::sync::mpsc;

    #[derive(Debug, Default)]
    struct TestRuntime {
        listing: Vec<SaleListing>,
        listing_loads: usize,
        seller: BTreeSet<String>,
        seller_missing: bool,
        last_seller_path: Option<PathBuf>,
    }

    impl AppRuntime for TestRuntime {
        fn load_listing(&mut self) -> anyhow::Result<Vec<SaleListing>> {
            self.listing_loads += 1;
            Ok(self.listing.clone())
        }

        fn read_seller_list(&mut self, path: &Path) -> Result<BTreeSet<String>, CompareError> {
            self.last_seller_path = Some(path.to_path_buf());
            if self.seller_missing {
                return Err(CompareError::Read {
                    path: path.to_path_buf(),
                    source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
                });
            }
            Ok(self.seller.clone())
        }
    }

    #[derive(Debug, Default)]
    struct CountingSink {
        category_saves: usize,
        gate_saves: usize,
        read_only: bool,
    }

    impl UserStateSink for CountingSink {
        fn save_categories(&mut self, _categories: &CategoryStore) -> anyhow::Result<()> {
            if self.read_only {
                bail!("permission denied");
            }
            self.category_saves += 1;
            Ok(())
        }

        fn save_scroll_gate(&mut self, _gate: ScrollGate) -> anyhow::Result<()> {
            if self.read_only {
                bail!("permission denied");
            }
            self.gate_saves += 1;
            Ok(())
        }
    }

    fn item(value: &str) -> ItemKey {
        ItemKey::from(value)
    }

    fn session_with(
        keys: &[&str],
        wants: &[&str],
        scrolled: bool,
        sink: CountingSink,
    ) -> Session<CountingSink> {
        let mut categories = CategoryStore::new();
        for want in wants {
            categories.categorize(&item(want), Mark::Want);
        }
        Session::new(
            "tester",
            ItemCatalog::from_keys("/joes", keys.iter().copied().map(ItemKey::from)),
            MetadataIndex::default(),
            UserState {
                categories,
                gate: ScrollGate::from_persisted(scrolled),
            },
            sink,
        )
    }

    fn session(keys: &[&str]) -> Session<CountingSink> {
        session_with(keys, &[], false, CountingSink::default())
    }

    fn listing(id: &str, name: &str, price: &str) -> SaleListing {
        SaleListing {
            id: Some(id.to_owned()),
            name: name.to_owned(),
            price: Some(price.to_owned()),
            description: format!("{name} on card"),
            image: format!("{id}.jpg"),
        }
    }

    fn press(
        session: &mut Session<CountingSink>,
        runtime: &mut TestRuntime,
        view_data: &mut ViewData,
        code: KeyCode,
    ) -> bool {
        let (tx, _rx) = mpsc::channel();
        handle_key_event(
            session,
            runtime,
            view_data,
            &tx,
            KeyEvent::new(code, KeyModifiers::NONE),
        )
    }

    fn type_text(
        session: &mut Session<CountingSink>,
        runtime: &mut TestRuntime,
        view_data: &mut ViewData,
        text: &str,
    ) {
        for ch in text.chars() {
            press(session, runtime, view_data, KeyCode::Char(ch));
        }
    }

    #[test]
    fn ctrl_q_quits_and_plain_keys_do_not() {
        let mut session = session(&["A"]);
        let mut runtime = TestRuntime::default();
        let mut view_data = ViewData::default();
        let (tx, _rx) = mpsc::channel();

        assert!(!press(&mut session, &mut runtime, &mut view_data, KeyCode::Char('q')));
        assert!(handle_key_event(
            &mut session,
            &mut runtime,
            &mut view_data,
            &tx,
            KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL),
        ));
    }

    #[test]
    fn navigation_keys_move_through_the_catalog() {
        let mut session = session(&["A", "B", "C"]);
        let mut runtime = TestRuntime::default();
        let mut view_data = ViewData::default();

        press(&mut session, &mut runtime, &mut view_data, KeyCode::Right);
        press(&mut session, &mut runtime, &mut view_data, KeyCode::Char('n'));
        assert_eq!(session.active_item(), Some(&item("C")));

        press(&mut session, &mut runtime, &mut view_data, KeyCode::Left);
        assert_eq!(session.active_item(), Some(&item("B")));
        press(&mut session, &mut runtime, &mut view_data, KeyCode::Char('p'));
        assert_eq!(session.active_item(), Some(&item("A")));
    }

    #[test]
    fn marking_keys_categorize_and_advance() {
        let mut session = session(&["1982/duke.jpg", "1982/flint.jpg", "1983/scarlett.jpg"]);
        let mut runtime = TestRuntime::default();
        let mut view_data = ViewData::default();

        press(&mut session, &mut runtime, &mut view_data, KeyCode::Char('w'));
        assert_eq!(session.category_of(&item("1982/duke.jpg")), Category::Want);
        assert_eq!(session.active_item(), Some(&item("1982/flint.jpg")));
        assert_eq!(session.status_line.as_deref(), Some("duke.jpg marked want"));
        assert_eq!(session.sink().category_saves, 1);

        press(&mut session, &mut runtime, &mut view_data, KeyCode::Char('h'));
        assert_eq!(session.category_of(&item("1982/flint.jpg")), Category::Have);
        assert!(view_data.notice.is_none());

        press(&mut session, &mut runtime, &mut view_data, KeyCode::Char('d'));
        assert_eq!(
            session.category_of(&item("1983/scarlett.jpg")),
            Category::DontWant
        );
        let notice = view_data.notice.clone().expect("list complete notice");
        assert_eq!(notice.body, LIST_COMPLETE_MESSAGE);
        assert_eq!(session.sink().gate_saves, 1);

        press(&mut session, &mut runtime, &mut view_data, KeyCode::Char('n'));
        assert!(view_data.notice.is_none());
        assert_eq!(session.active_item(), Some(&item("1982/duke.jpg")));
    }

    #[test]
    fn sort_and_mode_keys_report_in_the_status_line() {
        let mut session = session(&["A", "B"]);
        let mut runtime = TestRuntime::default();
        let mut view_data = ViewData::default();

        press(&mut session, &mut runtime, &mut view_data, KeyCode::Char('y'));
        assert_eq!(session.browse().sort_mode(), SortMode::ByYear);
        assert_eq!(session.status_line.as_deref(), Some("sorted by year"));

        press(&mut session, &mut runtime, &mut view_data, KeyCode::Char('t'));
        assert_eq!(session.browse().mode(), BrowseMode::WantOnly);
        assert_eq!(session.status_line.as_deref(), Some("showing WANT LIST"));
        assert!(main_view_text(&session).contains("want list is empty"));
    }

    #[test]
    fn save_failures_are_reported_without_losing_the_mark() {
        let sink = CountingSink {
            read_only: true,
            ..CountingSink::default()
        };
        let mut session = session_with(&["A", "B"], &[], false, sink);
        let mut runtime = TestRuntime::default();
        let mut view_data = ViewData::default();

        press(&mut session, &mut runtime, &mut view_data, KeyCode::Char('w'));
        let status = session.status_line.clone().unwrap_or_default();
        assert!(status.contains("save failed"), "{status}");
        assert!(status.contains("permission denied"), "{status}");
        assert_eq!(session.category_of(&item("A")), Category::Want);
    }

    #[test]
    fn shop_is_refused_until_the_gate_opens() {
        let mut session = session(&["A", "B"]);
        let mut runtime = TestRuntime::default();
        let mut view_data = ViewData::default();

        press(&mut session, &mut runtime, &mut view_data, KeyCode::Char('s'));
        assert!(!view_data.shop.visible);
        assert_eq!(runtime.listing_loads, 0);
        assert_eq!(
            view_data.notice.as_ref().map(|notice| notice.body.as_str()),
            Some(SHOP_LOCKED_MESSAGE)
        );
    }

    #[test]
    fn shop_starts_filtered_to_wants_and_supports_search() {
        let mut session =
            session_with(&["1983/duke.jpg"], &["1983/duke.jpg"], true, CountingSink::default());
        let mut runtime = TestRuntime {
            listing: vec![
                listing("duke", "Duke", "24.99"),
                listing("104", "Flint", "18"),
                listing("105", "Zartan", "42"),
            ],
            ..TestRuntime::default()
        };
        let mut view_data = ViewData::default();

        press(&mut session, &mut runtime, &mut view_data, KeyCode::Char('s'));
        assert!(view_data.shop.visible);
        assert!(view_data.shop.want_only);
        assert_eq!(runtime.listing_loads, 1);
        let text = shop_overlay_text(&session, &view_data.shop);
        assert!(text.contains("> Duke ($24.99)"), "{text}");
        assert!(!text.contains("Flint"));

        press(&mut session, &mut runtime, &mut view_data, KeyCode::Char('w'));
        assert_eq!(visible_shop_entries(&session, &view_data.shop).len(), 3);

        press(&mut session, &mut runtime, &mut view_data, KeyCode::Char('['));
        assert_eq!(view_data.shop.editing, Some(ShopField::MinPrice));
        type_text(&mut session, &mut runtime, &mut view_data, "20");
        press(&mut session, &mut runtime, &mut view_data, KeyCode::Enter);
        let names = visible_shop_entries(&session, &view_data.shop)
            .into_iter()
            .map(|entry| entry.name.clone())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Duke", "Zartan"]);

        press(&mut session, &mut runtime, &mut view_data, KeyCode::Char('/'));
        type_text(&mut session, &mut runtime, &mut view_data, "zar");
        press(&mut session, &mut runtime, &mut view_data, KeyCode::Enter);
        press(&mut session, &mut runtime, &mut view_data, KeyCode::Enter);
        let detail = view_data.shop.detail.clone().expect("detail view");
        assert_eq!(detail.name, "Zartan");

        press(&mut session, &mut runtime, &mut view_data, KeyCode::Char('x'));
        assert!(view_data.shop.detail.is_none());
        assert!(view_data.shop.visible);

        press(&mut session, &mut runtime, &mut view_data, KeyCode::Esc);
        assert!(!view_data.shop.visible);
    }

    #[test]
    fn shop_cursor_stays_on_visible_entries() {
        let mut session = session_with(&["A"], &[], true, CountingSink::default());
        let mut runtime = TestRuntime {
            listing: vec![listing("1", "Duke", "5"), listing("2", "Flint", "6")],
            ..TestRuntime::default()
        };
        let mut view_data = ViewData::default();

        press(&mut session, &mut runtime, &mut view_data, KeyCode::Char('s'));
        assert!(shop_overlay_text(&session, &view_data.shop).contains("No items match."));

        press(&mut session, &mut runtime, &mut view_data, KeyCode::Char('w'));
        for _ in 0..5 {
            press(&mut session, &mut runtime, &mut view_data, KeyCode::Down);
        }
        assert_eq!(view_data.shop.cursor, 1);
        press(&mut session, &mut runtime, &mut view_data, KeyCode::Up);
        assert_eq!(view_data.shop.cursor, 0);
    }

    #[test]
    fn compare_reports_matches_by_file_name() {
        let mut session = session_with(
            &["1982/duke.jpg", "1983/flint.jpg"],
            &["1982/duke.jpg", "1983/flint.jpg"],
            false,
            CountingSink::default(),
        );
        let mut runtime = TestRuntime {
            seller: BTreeSet::from(["1982/duke.jpg".to_owned(), "1990/zartan.jpg".to_owned()]),
            ..TestRuntime::default()
        };
        let mut view_data = ViewData::default();

        press(&mut session, &mut runtime, &mut view_data, KeyCode::Char('c'));
        assert!(view_data.compare.visible);
        type_text(&mut session, &mut runtime, &mut view_data, "seller.json");
        press(&mut session, &mut runtime, &mut view_data, KeyCode::Enter);

        assert!(!view_data.compare.visible);
        assert_eq!(
            runtime.last_seller_path.as_deref(),
            Some(Path::new("seller.json"))
        );
        let notice = view_data.notice.clone().expect("compare notice");
        assert_eq!(notice.title, "matches");
        assert!(notice.body.ends_with("duke.jpg"), "{}", notice.body);
        assert!(!notice.body.contains("flint"));

        runtime.seller.clear();
        press(&mut session, &mut runtime, &mut view_data, KeyCode::Esc);
        press(&mut session, &mut runtime, &mut view_data, KeyCode::Char('c'));
        type_text(&mut session, &mut runtime, &mut view_data, "empty.txt");
        press(&mut session, &mut runtime, &mut view_data, KeyCode::Enter);
        assert_eq!(
            view_data.notice.as_ref().map(|notice| notice.body.as_str()),
            Some(NO_MATCHES_MESSAGE)
        );
    }

    #[test]
    fn compare_errors_are_shown_and_escape_cancels() {
        let mut session = session_with(&["A"], &["A"], false, CountingSink::default());
        let mut runtime = TestRuntime {
            seller_missing: true,
            ..TestRuntime::default()
        };
        let mut view_data = ViewData::default();

        press(&mut session, &mut runtime, &mut view_data, KeyCode::Char('c'));
        type_text(&mut session, &mut runtime, &mut view_data, "gone.csv");
        press(&mut session, &mut runtime, &mut view_data, KeyCode::Esc);
        assert!(!view_data.compare.visible);
        assert!(runtime.last_seller_path.is_none());

        press(&mut session, &mut runtime, &mut view_data, KeyCode::Char('c'));
        type_text(&mut session, &mut runtime, &mut view_data, "gone.csv");
        press(&mut session, &mut runtime, &mut view_data, KeyCode::Enter);
        let notice = view_data.notice.clone().expect("error notice");
        assert_eq!(notice.title, "compare failed");
        assert!(notice.body.contains("failed to read seller list gone.csv"));
    }

    #[test]
    fn main_view_shows_metadata_and_category() {
        let metadata = MetadataIndex::from_iter([(
            item("1983/duke.jpg"),
            ItemMetadata {
                id: Some("5".to_owned()),
                name: Some("Duke".to_owned()),
                year: Some(1983),
                weapons: vec!["M-32 Pulverizer".to_owned()],
                vehicle: None,
            },
        )]);
        let mut categories = CategoryStore::new();
        categories.categorize(&item("1983/duke.jpg"), Mark::Have);
        let session = Session::new(
            "tester",
            ItemCatalog::from_keys("/joes", [item("1983/duke.jpg"), item("1984/who.jpg")]),
            metadata,
            UserState {
                categories,
                ..UserState::default()
            },
            CountingSink::default(),
        );

        let text = main_view_text(&session);
        assert!(text.starts_with("ALL 1/2 | sort: catalog order"), "{text}");
        assert!(text.contains("Item: 1983/duke.jpg"));
        assert!(text.contains("Name: Duke"));
        assert!(text.contains("Weapons: M-32 Pulverizer"));
        assert!(text.contains("Category: have"));
        assert!(header_text(&session).contains("have 1"));
    }

    #[test]
    fn empty_catalog_renders_a_distinct_message() {
        let session = session(&[]);
        assert_eq!(main_view_text(&session), "No images found in the catalog.");
    }

    #[test]
    fn status_text_hides_hints_while_overlays_are_active() {
        let session = session(&["A"]);
        let mut view_data = ViewData::default();
        let status = status_text(&session, &view_data);
        assert!(status.contains("s shop:locked"));
        assert!(status.contains("ctrl+q"));

        view_data.help_visible = true;
        assert!(status_text(&session, &view_data).is_empty());
        view_data.help_visible = false;
        view_data.compare.visible = true;
        assert!(status_text(&session, &view_data).is_empty());
    }

    #[test]
    fn help_toggles_with_question_mark() {
        let mut session = session(&["A", "B"]);
        let mut runtime = TestRuntime::default();
        let mut view_data = ViewData::default();

        press(&mut session, &mut runtime, &mut view_data, KeyCode::Char('?'));
        assert!(view_data.help_visible);
        press(&mut session, &mut runtime, &mut view_data, KeyCode::Char('n'));
        assert!(view_data.help_visible);
        assert_eq!(session.active_item(), Some(&item("A")));
        press(&mut session, &mut runtime, &mut view_data, KeyCode::Char('?'));
        assert!(!view_data.help_visible);
        assert!(help_overlay_text().contains("ctrl+q quit"));
    }

    #[test]
    fn centered_rect_stays_inside_area() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = centered_rect(60, 50, area);
        assert!(popup.x >= area.x && popup.right() <= area.right());
        assert!(popup.y >= area.y && popup.bottom() <= area.bottom());
        assert!(popup.width <= 60);
    }
}
