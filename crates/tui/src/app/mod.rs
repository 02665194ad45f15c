mod screen;

use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use engine::{
    CategoryRow, Entity, ItemRow, LoadState, ReferenceMaps, UnitRow, VendorRow, WarehouseRow,
    created_row, edited_update, reconcile,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::{
    client::Client,
    config::AppConfig,
    error::{AppError, Result},
    ui::{
        self,
        keymap::{AppAction, map_key},
    },
};

pub use screen::{
    Completion, EditScreen, Edited, FormMode, FormState, Screen, ScreenEvent, ScreenState,
};

const TOAST_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Section {
    #[default]
    Items,
    Categories,
    Units,
    Vendors,
    Warehouses,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Self::Items,
        Self::Categories,
        Self::Units,
        Self::Vendors,
        Self::Warehouses,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Items => "Items",
            Self::Categories => "Categories",
            Self::Units => "Units",
            Self::Vendors => "Vendors",
            Self::Warehouses => "Warehouses",
        }
    }

    /// Tab key (`'1'`..`'5'`).
    pub fn key(self) -> char {
        match self {
            Self::Items => '1',
            Self::Categories => '2',
            Self::Units => '3',
            Self::Vendors => '4',
            Self::Warehouses => '5',
        }
    }

    pub fn from_key(ch: char) -> Option<Self> {
        Self::ALL.into_iter().find(|section| section.key() == ch)
    }

    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|section| section.label().eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
}

#[derive(Debug, Clone)]
pub struct ToastState {
    pub message: String,
    pub level: ToastLevel,
    pub expires_at: Instant,
}

impl ToastState {
    fn new(level: ToastLevel, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level,
            expires_at: Instant::now() + TOAST_TTL,
        }
    }
}

#[derive(Debug, Default)]
pub struct AppState {
    pub section: Section,
    pub items: ScreenState<ItemRow>,
    pub categories: ScreenState<CategoryRow>,
    pub units: ScreenState<UnitRow>,
    pub vendors: ScreenState<VendorRow>,
    pub warehouses: ScreenState<WarehouseRow>,
    pub toast: Option<ToastState>,
    /// Failure of a modal action; stays until acknowledged.
    pub alert: Option<String>,
    pub base_url: String,
    /// When the last list load landed.
    pub last_refresh: Option<DateTime<Local>>,
}

/// Intents that need an editable row kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditIntent {
    Open,
    Submit(i64),
}

pub struct App {
    client: Client,
    pub state: AppState,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = Client::new(
            &config.base_url,
            Duration::from_secs(config.request_timeout_secs),
        )?;
        let section = Section::parse(&config.start_section).unwrap_or_else(|| {
            warn!(start_section = %config.start_section, "unknown start section, showing items");
            Section::Items
        });
        let (tx, rx) = mpsc::unbounded_channel();
        let state = AppState {
            section,
            base_url: config.base_url,
            ..AppState::default()
        };

        Ok(Self {
            client,
            state,
            tx,
            rx,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        self.shutdown();
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(100);
        self.enter(self.state.section);

        while !self.should_quit {
            while let Ok(completion) = self.rx.try_recv() {
                self.on_completion(completion);
            }
            if self
                .state
                .toast
                .as_ref()
                .is_some_and(|toast| toast.expires_at <= Instant::now())
            {
                self.state.toast = None;
            }

            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
                    _ => {}
                }
            }
            tokio::task::yield_now().await;
        }

        Ok(())
    }

    fn shutdown(&mut self) {
        self.state.items.shutdown();
        self.state.categories.shutdown();
        self.state.units.shutdown();
        self.state.vendors.shutdown();
        self.state.warehouses.shutdown();
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let action = map_key(key);
        if action == AppAction::Quit {
            self.should_quit = true;
            return;
        }
        if self.state.alert.is_some() {
            if matches!(action, AppAction::Submit | AppAction::Cancel) {
                self.state.alert = None;
            }
            return;
        }

        let intent = match self.state.section {
            Section::Items => self.screen_key::<ItemRow>(action),
            Section::Categories => self.screen_key::<CategoryRow>(action),
            Section::Units => self.screen_key::<UnitRow>(action),
            Section::Vendors => self.screen_key::<VendorRow>(action),
            Section::Warehouses => self.screen_key::<WarehouseRow>(action),
        };
        if let Some(intent) = intent {
            match self.state.section {
                Section::Categories => self.edit_intent::<CategoryRow>(intent),
                Section::Units => self.edit_intent::<UnitRow>(intent),
                Section::Warehouses => self.edit_intent::<WarehouseRow>(intent),
                Section::Items | Section::Vendors => {
                    self.toast(ToastLevel::Info, "This list is create-only.");
                }
            }
        }
    }

    fn screen_key<E: Screen>(&mut self, action: AppAction) -> Option<EditIntent> {
        let screen = E::state(&self.state);
        if screen.gate.is_open() {
            self.gate_key::<E>(action);
            None
        } else if screen.form.is_some() {
            self.form_key::<E>(action)
        } else if screen.filter.editing {
            self.filter_key::<E>(action);
            None
        } else {
            self.browse_key::<E>(action)
        }
    }

    fn browse_key<E: Screen>(&mut self, action: AppAction) -> Option<EditIntent> {
        match action {
            AppAction::Up | AppAction::Input('k') => E::state_mut(&mut self.state).select_prev(),
            AppAction::Down | AppAction::Input('j') => E::state_mut(&mut self.state).select_next(),
            AppAction::Input('q') => self.should_quit = true,
            AppAction::Input('r') => self.load::<E>(),
            AppAction::Input('n') => {
                let screen = E::state_mut(&mut self.state);
                screen.form = Some(FormState::new(FormMode::Create, E::Form::default()));
            }
            AppAction::Input('e') => {
                if E::KIND.supports_edit() {
                    return Some(EditIntent::Open);
                }
                self.toast(ToastLevel::Info, format!("{} records cannot be edited.", E::KIND));
            }
            AppAction::Input('d') => self.open_gate::<E>(),
            AppAction::Input('/') if E::KIND == engine::EntityKind::Warehouse => {
                E::state_mut(&mut self.state).filter.editing = true;
            }
            AppAction::Input(ch) => {
                if let Some(section) = Section::from_key(ch) {
                    self.switch(section);
                }
            }
            _ => {}
        }
        None
    }

    fn form_key<E: Screen>(&mut self, action: AppAction) -> Option<EditIntent> {
        let screen = E::state_mut(&mut self.state);
        let locked = screen.submit.is_loading();
        let refs = &screen.refs;
        let form = screen.form.as_mut()?;
        match action {
            AppAction::Cancel if !locked => screen.form = None,
            AppAction::NextField | AppAction::Down => form.next_field(),
            AppAction::PrevField | AppAction::Up => form.prev_field(),
            AppAction::Left if !locked => form.cycle(refs, false),
            AppAction::Right if !locked => form.cycle(refs, true),
            AppAction::Backspace if !locked => form.pop(),
            AppAction::Input(ch) if !locked => form.push(ch),
            AppAction::Submit if !locked => match form.mode {
                FormMode::Create => self.submit_create::<E>(),
                FormMode::Edit(id) => return Some(EditIntent::Submit(id)),
            },
            _ => {}
        }
        None
    }

    fn filter_key<E: Screen>(&mut self, action: AppAction) {
        let filter = &mut E::state_mut(&mut self.state).filter;
        match action {
            AppAction::Cancel => {
                filter.input = filter.applied.clone();
                filter.editing = false;
            }
            AppAction::Backspace => {
                filter.input.pop();
            }
            AppAction::Input(ch) => filter.input.push(ch),
            AppAction::Submit => {
                filter.editing = false;
                let applied = filter.input.trim().to_string();
                filter.input = applied.clone();
                if applied != filter.applied {
                    filter.applied = applied;
                    self.load::<E>();
                }
            }
            _ => {}
        }
    }

    fn gate_key<E: Screen>(&mut self, action: AppAction) {
        let gate = &mut E::state_mut(&mut self.state).gate;
        match action {
            AppAction::Cancel => gate.cancel(),
            AppAction::Backspace => gate.pop(),
            AppAction::Input(ch) => gate.push(ch),
            AppAction::Submit => {
                if let Some(id) = gate.confirm() {
                    self.submit_delete::<E>(id);
                }
            }
            _ => {}
        }
    }

    fn edit_intent<E: EditScreen>(&mut self, intent: EditIntent) {
        match intent {
            EditIntent::Open => {
                let screen = E::state_mut(&mut self.state);
                if let Some(row) = screen.selected_row() {
                    let form = row.edit_form();
                    screen.form = Some(FormState::new(FormMode::Edit(row.id()), form));
                }
            }
            EditIntent::Submit(id) => self.submit_edit::<E>(id),
        }
    }

    fn open_gate<E: Screen>(&mut self) {
        if !E::KIND.supports_delete() {
            self.toast(ToastLevel::Info, format!("{} records cannot be deleted.", E::KIND));
            return;
        }
        let screen = E::state_mut(&mut self.state);
        if let Some(row) = screen.selected_row() {
            let (id, name) = (row.id(), row.display_name().to_string());
            screen.gate.open(id, name);
        }
    }

    fn switch(&mut self, section: Section) {
        if section == self.state.section {
            return;
        }
        match self.state.section {
            Section::Items => self.state.items.cancel_load(),
            Section::Categories => self.state.categories.cancel_load(),
            Section::Units => self.state.units.cancel_load(),
            Section::Vendors => self.state.vendors.cancel_load(),
            Section::Warehouses => self.state.warehouses.cancel_load(),
        }
        self.state.section = section;
        self.enter(section);
    }

    /// Loads the section unless it already holds a loaded list.
    fn enter(&mut self, section: Section) {
        match section {
            Section::Items => self.load_if_stale::<ItemRow>(),
            Section::Categories => self.load_if_stale::<CategoryRow>(),
            Section::Units => self.load_if_stale::<UnitRow>(),
            Section::Vendors => self.load_if_stale::<VendorRow>(),
            Section::Warehouses => self.load_if_stale::<WarehouseRow>(),
        }
    }

    fn load_if_stale<E: Screen>(&mut self) {
        if matches!(E::state(&self.state).list.state(), LoadState::Idle) {
            self.load::<E>();
        }
    }

    /// Starts a list fetch, superseding any fetch still in flight.
    fn load<E: Screen>(&mut self) {
        let screen = E::state_mut(&mut self.state);
        let ticket = screen.list.begin_load();
        let filter = Some(screen.filter.applied.clone()).filter(|value| !value.is_empty());
        let client = self.client.clone();
        let tx = self.tx.clone();
        debug!(kind = %E::KIND, generation = ticket.generation(), "loading list");

        let handle = tokio::spawn(async move {
            let outcome = if E::HYDRATED {
                let (body, refs) = tokio::join!(
                    client.list(E::KIND, filter.as_deref()),
                    client.reference_maps()
                );
                body.map(|body| (reconcile(&body, &refs), refs))
            } else {
                let refs = ReferenceMaps::new();
                client
                    .list(E::KIND, filter.as_deref())
                    .await
                    .map(|body| (reconcile(&body, &refs), refs))
            };
            let _ = tx.send(E::completion(ScreenEvent::Loaded { ticket, outcome }));
        });
        screen.set_load_task(handle);
    }

    fn submit_create<E: Screen>(&mut self) {
        let screen = E::state_mut(&mut self.state);
        let Some(form) = screen.form.as_mut() else {
            return;
        };
        let payload = match E::build_create(&form.form) {
            Ok(payload) => payload,
            Err(err) => {
                form.error = Some(err.to_string());
                return;
            }
        };
        form.error = None;
        let ticket = screen.submit.start();
        let refs = screen.refs.clone();
        let client = self.client.clone();
        let tx = self.tx.clone();
        info!(kind = %E::KIND, "submitting create");

        let handle = tokio::spawn(async move {
            let outcome = client
                .create(E::KIND, &payload)
                .await
                .and_then(|reply| {
                    created_row::<E>(reply.body.as_ref(), reply.location_id, &payload, &refs)
                });
            let _ = tx.send(E::completion(ScreenEvent::Created { ticket, outcome }));
        });
        screen.set_submit_task(handle);
    }

    fn submit_edit<E: EditScreen>(&mut self, id: i64) {
        let screen = E::state_mut(&mut self.state);
        let Some(form) = screen.form.as_mut() else {
            return;
        };
        let update = match E::build_update(&form.form) {
            Ok(update) => update,
            Err(err) => {
                form.error = Some(err.to_string());
                return;
            }
        };
        form.error = None;
        let ticket = screen.submit.start();
        let client = self.client.clone();
        let tx = self.tx.clone();
        info!(kind = %E::KIND, id, "submitting edit");

        let handle = tokio::spawn(async move {
            let outcome = client
                .update(E::KIND, id, &update)
                .await
                .map(|reply| edited_update::<E>(reply.body.as_ref(), &update));
            let _ = tx.send(E::edited(Edited {
                ticket,
                id,
                outcome,
            }));
        });
        screen.set_submit_task(handle);
    }

    fn submit_delete<E: Screen>(&mut self, id: i64) {
        let screen = E::state_mut(&mut self.state);
        let ticket = screen.submit.start();
        let client = self.client.clone();
        let tx = self.tx.clone();
        info!(kind = %E::KIND, id, "submitting delete");

        let handle = tokio::spawn(async move {
            let outcome = client.delete(E::KIND, id).await;
            let _ = tx.send(E::completion(ScreenEvent::Deleted {
                ticket,
                id,
                outcome,
            }));
        });
        screen.set_submit_task(handle);
    }

    fn on_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Items(event) => self.on_screen_event(event),
            Completion::Categories(event) => self.on_screen_event(event),
            Completion::Units(event) => self.on_screen_event(event),
            Completion::Vendors(event) => self.on_screen_event(event),
            Completion::Warehouses(event) => self.on_screen_event(event),
            Completion::CategoryEdited(event) => self.on_edited(event),
            Completion::UnitEdited(event) => self.on_edited(event),
            Completion::WarehouseEdited(event) => self.on_edited(event),
        }
    }

    fn on_screen_event<E: Screen>(&mut self, event: ScreenEvent<E>) {
        let screen = E::state_mut(&mut self.state);
        let toast = match event {
            ScreenEvent::Loaded { ticket, outcome } => {
                let outcome = match outcome {
                    Ok((rows, refs)) => {
                        if screen.list.is_current(ticket) {
                            screen.refs = refs;
                        }
                        Ok(rows)
                    }
                    Err(err) => Err(err),
                };
                let applied = screen.list.finish_load(ticket, outcome);
                screen.clamp_selection();
                if applied && screen.list.state() == LoadState::Ready {
                    self.state.last_refresh = Some(Local::now());
                }
                None
            }
            ScreenEvent::Created { ticket, outcome } => match screen.submit.settle(ticket, outcome) {
                None => None,
                Some(Ok(row)) => {
                    let (id, name) = (row.id(), row.display_name().to_string());
                    screen.list.confirm_create(row);
                    screen.select_id(id);
                    screen.form = None;
                    Some(ToastState::new(
                        ToastLevel::Success,
                        format!("Created {} {name}.", E::KIND),
                    ))
                }
                Some(Err(message)) => {
                    if let Some(form) = screen.form.as_mut() {
                        form.error = Some(message);
                    }
                    None
                }
            },
            ScreenEvent::Deleted {
                ticket,
                id,
                outcome,
            } => match screen.submit.settle(ticket, outcome) {
                None => None,
                Some(Ok(())) => {
                    screen.list.confirm_delete(id);
                    screen.gate.settle();
                    screen.clamp_selection();
                    Some(ToastState::new(
                        ToastLevel::Success,
                        format!("Deleted {}.", E::KIND),
                    ))
                }
                Some(Err(message)) => {
                    screen.gate.settle();
                    self.state.alert = Some(format!("Delete failed: {message}"));
                    None
                }
            },
        };
        if toast.is_some() {
            self.state.toast = toast;
        }
    }

    fn on_edited<E: EditScreen>(&mut self, event: Edited<E>) {
        let Edited {
            ticket,
            id,
            outcome,
        } = event;
        let screen = E::state_mut(&mut self.state);
        match screen.submit.settle(ticket, outcome) {
            None => {}
            Some(Ok(update)) => {
                if !screen.list.confirm_edit(id, &update) {
                    warn!(kind = %E::KIND, id, "edited row is no longer listed");
                }
                screen.form = None;
                self.toast(ToastLevel::Success, format!("Saved {}.", E::KIND));
            }
            Some(Err(message)) => {
                if let Some(form) = screen.form.as_mut() {
                    form.error = Some(message);
                }
            }
        }
    }

    fn toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.state.toast = Some(ToastState::new(level, message));
    }
}
