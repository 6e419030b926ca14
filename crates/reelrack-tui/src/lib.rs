// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use reelrack_app::{
    ActorDetail, ActorId, AppCommand, AppEvent, AppState, Customer, CustomerDetail, CustomerId,
    CustomerUpdate, DetailStatus, EDIT_AUTO_CLOSE_DELAY, EditForm, Film, FilmDetail, FilmId,
    Loadable, PANEL_SWITCH_DELAY, RentLookup, RentMode, SearchField, StatusKind, TabKind,
    TopActor, TopFilm,
};

const STATUS_CLEAR_DELAY: Duration = Duration::from_secs(4);

/// Backend seam for the UI loop. The synchronous methods do the work; the
/// spawn_* methods deliver completions over the internal channel and by
/// default run inline, which is what the tests use. The production runtime
/// overrides them with worker threads.
pub trait AppRuntime {
    fn top_rented_films(&mut self) -> Result<Vec<TopFilm>>;
    fn top_actors(&mut self) -> Result<Vec<TopActor>>;
    /// An empty term loads the default list (the top-rented films).
    fn search_films(&mut self, term: &str) -> Result<Vec<Film>>;
    fn film_detail(&mut self, film_id: FilmId) -> Result<Option<FilmDetail>>;
    fn actor_detail(&mut self, actor_id: ActorId) -> Result<Option<ActorDetail>>;
    /// An empty term loads the full roster.
    fn load_customers(&mut self, term: &str) -> Result<Vec<Customer>>;
    fn customer_detail(&mut self, customer_id: CustomerId) -> Result<Option<CustomerDetail>>;
    fn rent_film(&mut self, film_id: FilmId, lookup: &RentLookup) -> Result<String>;
    fn return_film(&mut self, customer_id: CustomerId, rental_id: &str) -> Result<String>;
    fn edit_customer(&mut self, customer_id: CustomerId, update: &CustomerUpdate)
    -> Result<String>;
    fn delete_customer(&mut self, customer_id: CustomerId) -> Result<String>;
    fn add_customer(&mut self, first_name: &str, last_name: &str, email: &str) -> Result<String>;

    fn spawn_top_films(&mut self, seq: u64, tx: Sender<InternalEvent>) {
        let result = self.top_rented_films().map_err(|error| error.to_string());
        send_command(&tx, AppCommand::FinishTopFilms { seq, result });
    }

    fn spawn_top_actors(&mut self, seq: u64, tx: Sender<InternalEvent>) {
        let result = self.top_actors().map_err(|error| error.to_string());
        send_command(&tx, AppCommand::FinishTopActors { seq, result });
    }

    fn spawn_film_search(&mut self, seq: u64, term: &str, tx: Sender<InternalEvent>) {
        let result = self.search_films(term).map_err(|error| error.to_string());
        send_command(&tx, AppCommand::FinishFilmSearch { seq, result });
    }

    fn spawn_film_detail(
        &mut self,
        ticket: reelrack_app::FetchTicket<FilmId>,
        tx: Sender<InternalEvent>,
    ) {
        let payload = self.film_detail(ticket.id).ok().flatten();
        send_command(&tx, AppCommand::FinishFilmDetail { ticket, payload });
    }

    fn spawn_actor_detail(
        &mut self,
        ticket: reelrack_app::FetchTicket<ActorId>,
        tx: Sender<InternalEvent>,
    ) {
        let payload = self.actor_detail(ticket.id).ok().flatten();
        send_command(&tx, AppCommand::FinishActorDetail { ticket, payload });
    }

    fn spawn_customers(&mut self, seq: u64, term: &str, tx: Sender<InternalEvent>) {
        let result = self.load_customers(term).map_err(|error| error.to_string());
        send_command(&tx, AppCommand::FinishCustomers { seq, result });
    }

    fn spawn_customer_detail(
        &mut self,
        ticket: reelrack_app::FetchTicket<CustomerId>,
        tx: Sender<InternalEvent>,
    ) {
        let payload = self.customer_detail(ticket.id).ok().flatten();
        send_command(&tx, AppCommand::FinishCustomerDetail { ticket, payload });
    }

    fn spawn_rent(&mut self, film_id: FilmId, lookup: RentLookup, tx: Sender<InternalEvent>) {
        let result = self
            .rent_film(film_id, &lookup)
            .map_err(|error| error.to_string());
        send_command(&tx, AppCommand::FinishRent { film_id, result });
    }

    fn spawn_return(
        &mut self,
        customer_id: CustomerId,
        rental_id: String,
        tx: Sender<InternalEvent>,
    ) {
        let result = self
            .return_film(customer_id, &rental_id)
            .map_err(|error| error.to_string());
        send_command(&tx, AppCommand::FinishReturn {
            customer_id,
            result,
        });
    }

    fn spawn_edit(
        &mut self,
        customer_id: CustomerId,
        update: CustomerUpdate,
        tx: Sender<InternalEvent>,
    ) {
        let result = self
            .edit_customer(customer_id, &update)
            .map_err(|error| error.to_string());
        send_command(&tx, AppCommand::FinishEdit {
            customer_id,
            update,
            result,
        });
    }

    fn spawn_delete(&mut self, customer_id: CustomerId, tx: Sender<InternalEvent>) {
        let result = self
            .delete_customer(customer_id)
            .map_err(|error| error.to_string());
        send_command(&tx, AppCommand::FinishDelete {
            customer_id,
            result,
        });
    }

    fn spawn_add_customer(
        &mut self,
        first_name: String,
        last_name: String,
        email: String,
        tx: Sender<InternalEvent>,
    ) {
        let result = self
            .add_customer(&first_name, &last_name, &email)
            .map_err(|error| error.to_string());
        send_command(&tx, AppCommand::FinishAddCustomer { result });
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
    Dispatch(AppCommand),
}

fn send_command(tx: &Sender<InternalEvent>, command: AppCommand) {
    let _ = tx.send(InternalEvent::Dispatch(command));
}

/// Which pane keystrokes go to on the current tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum InputFocus {
    #[default]
    List,
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LandingColumn {
    Films,
    Actors,
}

#[derive(Debug, Clone, PartialEq)]
struct ViewData {
    status_token: u64,
    films_focus: InputFocus,
    customers_focus: InputFocus,
    films_cursor: usize,
    customers_cursor: usize,
    landing_column: LandingColumn,
    landing_cursor: usize,
    /// Index of the active text field inside whichever panel is open.
    panel_field: usize,
}

impl Default for ViewData {
    fn default() -> Self {
        Self {
            status_token: 0,
            films_focus: InputFocus::List,
            customers_focus: InputFocus::List,
            films_cursor: 0,
            customers_cursor: 0,
            landing_column: LandingColumn::Films,
            landing_cursor: 0,
            panel_field: 0,
        }
    }
}

pub fn run_app<R: AppRuntime>(state: &mut AppState, runtime: &mut R) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();

    dispatch_and_run(state, runtime, &mut view_data, &internal_tx, AppCommand::Bootstrap);

    let mut result = Ok(());
    loop {
        process_internal_events(state, runtime, &mut view_data, &internal_tx, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
            InternalEvent::Dispatch(command) => {
                dispatch_and_run(state, runtime, view_data, tx, command);
            }
        }
    }
}

/// Dispatches a command and carries out whatever effects the dispatcher
/// asked for. Completions re-enter through the internal channel, so one
/// user action may fan out over several loop iterations.
fn dispatch_and_run<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    command: AppCommand,
) {
    let events = state.dispatch(command);
    for event in events {
        match event {
            AppEvent::TabChanged(_) | AppEvent::StatusCleared => {}
            AppEvent::StatusUpdated(_) => {
                view_data.status_token = view_data.status_token.saturating_add(1);
                schedule_status_clear(tx, view_data.status_token);
            }
            AppEvent::TopFilmsRequested { seq } => runtime.spawn_top_films(seq, tx.clone()),
            AppEvent::TopActorsRequested { seq } => runtime.spawn_top_actors(seq, tx.clone()),
            AppEvent::FilmSearchRequested { seq, term } => {
                runtime.spawn_film_search(seq, &term, tx.clone());
            }
            AppEvent::FilmDetailRequested(ticket) => {
                runtime.spawn_film_detail(ticket, tx.clone());
            }
            AppEvent::ActorDetailRequested(ticket) => {
                runtime.spawn_actor_detail(ticket, tx.clone());
            }
            AppEvent::CustomersRequested { seq, term } => {
                runtime.spawn_customers(seq, &term, tx.clone());
            }
            AppEvent::CustomerDetailRequested(ticket) => {
                runtime.spawn_customer_detail(ticket, tx.clone());
            }
            AppEvent::RentRequested { film_id, lookup } => {
                runtime.spawn_rent(film_id, lookup, tx.clone());
            }
            AppEvent::ReturnRequested {
                customer_id,
                rental_id,
            } => runtime.spawn_return(customer_id, rental_id, tx.clone()),
            AppEvent::EditRequested {
                customer_id,
                update,
            } => runtime.spawn_edit(customer_id, update, tx.clone()),
            AppEvent::DeleteRequested { customer_id } => {
                runtime.spawn_delete(customer_id, tx.clone());
            }
            AppEvent::AddCustomerRequested {
                first_name,
                last_name,
                email,
            } => runtime.spawn_add_customer(first_name, last_name, email, tx.clone()),
            AppEvent::RentPanelSwitchScheduled { token } => {
                schedule_command(tx, PANEL_SWITCH_DELAY, AppCommand::RentSwitchFired { token });
            }
            AppEvent::ReturnPanelSwitchScheduled { token } => {
                schedule_command(tx, PANEL_SWITCH_DELAY, AppCommand::ReturnSwitchFired {
                    token,
                });
            }
            AppEvent::EditPanelSwitchScheduled { token } => {
                schedule_command(tx, PANEL_SWITCH_DELAY, AppCommand::EditSwitchFired { token });
            }
            AppEvent::EditAutoCloseScheduled { token } => {
                schedule_command(tx, EDIT_AUTO_CLOSE_DELAY, AppCommand::EditAutoCloseFired {
                    token,
                });
            }
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

fn schedule_command(internal_tx: &Sender<InternalEvent>, delay: Duration, command: AppCommand) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(delay);
        let _ = sender.send(InternalEvent::Dispatch(command));
    });
}

fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    match state.active_tab {
        TabKind::Landing => handle_landing_key(state, runtime, view_data, tx, key),
        TabKind::Films => handle_films_key(state, runtime, view_data, tx, key),
        TabKind::Customers => handle_customers_key(state, runtime, view_data, tx, key),
    }
    false
}

fn rotate_tab<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    delta: isize,
) {
    let tabs = TabKind::ALL;
    let current = tabs
        .iter()
        .position(|tab| *tab == state.active_tab)
        .unwrap_or(0) as isize;
    let next = (current + delta).rem_euclid(tabs.len() as isize) as usize;
    dispatch_and_run(state, runtime, view_data, tx, AppCommand::SelectTab(tabs[next]));
}

fn handle_landing_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Tab => rotate_tab(state, runtime, view_data, tx, 1),
        KeyCode::BackTab => rotate_tab(state, runtime, view_data, tx, -1),
        KeyCode::Left | KeyCode::Right => {
            view_data.landing_column = match view_data.landing_column {
                LandingColumn::Films => LandingColumn::Actors,
                LandingColumn::Actors => LandingColumn::Films,
            };
            view_data.landing_cursor = 0;
        }
        KeyCode::Up => view_data.landing_cursor = view_data.landing_cursor.saturating_sub(1),
        KeyCode::Down => {
            let len = match view_data.landing_column {
                LandingColumn::Films => {
                    state.landing.top_films.ready().map_or(0, Vec::len)
                }
                LandingColumn::Actors => {
                    state.landing.top_actors.ready().map_or(0, Vec::len)
                }
            };
            view_data.landing_cursor = (view_data.landing_cursor + 1).min(len.saturating_sub(1));
        }
        KeyCode::Enter => match view_data.landing_column {
            LandingColumn::Films => {
                if let Some(film) = state
                    .landing
                    .top_films
                    .ready()
                    .and_then(|films| films.get(view_data.landing_cursor))
                {
                    let command = AppCommand::ToggleLandingFilmDetail(film.id);
                    dispatch_and_run(state, runtime, view_data, tx, command);
                }
            }
            LandingColumn::Actors => {
                if let Some(actor) = state
                    .landing
                    .top_actors
                    .ready()
                    .and_then(|actors| actors.get(view_data.landing_cursor))
                {
                    let command = AppCommand::ToggleActorDetail(actor.id);
                    dispatch_and_run(state, runtime, view_data, tx, command);
                }
            }
        },
        _ => {}
    }
}

fn handle_films_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    // An open rent panel captures text input.
    if state.films.rent_panel.open_target().is_some() {
        handle_rent_panel_key(state, runtime, view_data, tx, key);
        return;
    }

    if view_data.films_focus == InputFocus::Search {
        match key.code {
            KeyCode::Esc => view_data.films_focus = InputFocus::List,
            KeyCode::Enter => {
                view_data.films_focus = InputFocus::List;
                view_data.films_cursor = 0;
                dispatch_and_run(state, runtime, view_data, tx, AppCommand::SubmitFilmSearch);
            }
            KeyCode::Backspace => {
                let mut query = state.films.query.clone();
                query.pop();
                dispatch_and_run(state, runtime, view_data, tx, AppCommand::SetFilmQuery(query));
            }
            KeyCode::Char(c) => {
                let mut query = state.films.query.clone();
                query.push(c);
                dispatch_and_run(state, runtime, view_data, tx, AppCommand::SetFilmQuery(query));
            }
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Tab => rotate_tab(state, runtime, view_data, tx, 1),
        KeyCode::BackTab => rotate_tab(state, runtime, view_data, tx, -1),
        KeyCode::Char('/') => view_data.films_focus = InputFocus::Search,
        KeyCode::Char('t') => {
            let command = AppCommand::ToggleSearchField(SearchField::Title);
            dispatch_and_run(state, runtime, view_data, tx, command);
        }
        KeyCode::Char('a') => {
            let command = AppCommand::ToggleSearchField(SearchField::Actor);
            dispatch_and_run(state, runtime, view_data, tx, command);
        }
        KeyCode::Char('g') => {
            let command = AppCommand::ToggleSearchField(SearchField::Genre);
            dispatch_and_run(state, runtime, view_data, tx, command);
        }
        KeyCode::Up => view_data.films_cursor = view_data.films_cursor.saturating_sub(1),
        KeyCode::Down => {
            let len = state.films.visible_films().len();
            view_data.films_cursor = (view_data.films_cursor + 1).min(len.saturating_sub(1));
        }
        KeyCode::Enter => {
            if let Some(film) = state.films.visible_films().get(view_data.films_cursor) {
                let command = AppCommand::ToggleFilmDetail(film.id);
                dispatch_and_run(state, runtime, view_data, tx, command);
            }
        }
        KeyCode::Char('r') => {
            if let Some(film) = state.films.visible_films().get(view_data.films_cursor) {
                view_data.panel_field = 0;
                let command = AppCommand::ToggleRentPanel(film.id);
                dispatch_and_run(state, runtime, view_data, tx, command);
            }
        }
        _ => {}
    }
}

fn handle_rent_panel_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let Some(target) = state.films.rent_panel.open_target() else {
        return;
    };
    let mode = state.films.rent_panel.form().mode;

    match key.code {
        KeyCode::Esc => {
            let command = AppCommand::ToggleRentPanel(target);
            dispatch_and_run(state, runtime, view_data, tx, command);
        }
        KeyCode::Enter => dispatch_and_run(state, runtime, view_data, tx, AppCommand::SubmitRent),
        KeyCode::Char('m') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            view_data.panel_field = 0;
            let next = match mode {
                RentMode::ById => RentMode::ByName,
                RentMode::ByName => RentMode::ById,
            };
            dispatch_and_run(state, runtime, view_data, tx, AppCommand::SetRentMode(next));
        }
        KeyCode::Tab => {
            let fields = match mode {
                RentMode::ById => 1,
                RentMode::ByName => 2,
            };
            view_data.panel_field = (view_data.panel_field + 1) % fields;
        }
        KeyCode::Backspace => edit_rent_field(state, runtime, view_data, tx, mode, None),
        KeyCode::Char(c) => edit_rent_field(state, runtime, view_data, tx, mode, Some(c)),
        _ => {}
    }
}

fn edit_rent_field<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    mode: RentMode,
    input: Option<char>,
) {
    let form = state.films.rent_panel.form();
    let command = match (mode, view_data.panel_field) {
        (RentMode::ById, _) => {
            AppCommand::SetRentCustomerId(edited(&form.customer_id, input))
        }
        (RentMode::ByName, 0) => {
            AppCommand::SetRentFirstName(edited(&form.first_name, input))
        }
        (RentMode::ByName, _) => AppCommand::SetRentLastName(edited(&form.last_name, input)),
    };
    dispatch_and_run(state, runtime, view_data, tx, command);
}

fn edited(current: &str, input: Option<char>) -> String {
    let mut value = current.to_owned();
    match input {
        Some(c) => value.push(c),
        None => {
            value.pop();
        }
    }
    value
}

fn handle_customers_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    if state.customers.add_open {
        handle_three_field_panel_key(state, runtime, view_data, tx, key, ThreeFieldPanel::Add);
        return;
    }
    if state.customers.edit_panel.open_target().is_some() {
        handle_three_field_panel_key(state, runtime, view_data, tx, key, ThreeFieldPanel::Edit);
        return;
    }
    if state.customers.return_panel.open_target().is_some() {
        handle_return_panel_key(state, runtime, view_data, tx, key);
        return;
    }

    if view_data.customers_focus == InputFocus::Search {
        match key.code {
            KeyCode::Esc => view_data.customers_focus = InputFocus::List,
            KeyCode::Enter => {
                view_data.customers_focus = InputFocus::List;
                view_data.customers_cursor = 0;
                dispatch_and_run(state, runtime, view_data, tx, AppCommand::SubmitCustomerSearch);
            }
            KeyCode::Backspace => {
                let mut query = state.customers.query.clone();
                query.pop();
                let command = AppCommand::SetCustomerQuery(query);
                dispatch_and_run(state, runtime, view_data, tx, command);
            }
            KeyCode::Char(c) => {
                let mut query = state.customers.query.clone();
                query.push(c);
                let command = AppCommand::SetCustomerQuery(query);
                dispatch_and_run(state, runtime, view_data, tx, command);
            }
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Tab => rotate_tab(state, runtime, view_data, tx, 1),
        KeyCode::BackTab => rotate_tab(state, runtime, view_data, tx, -1),
        KeyCode::Char('/') => view_data.customers_focus = InputFocus::Search,
        KeyCode::Left | KeyCode::Char('p') => {
            view_data.customers_cursor = 0;
            dispatch_and_run(state, runtime, view_data, tx, AppCommand::PrevPage);
        }
        KeyCode::Right | KeyCode::Char('n') => {
            view_data.customers_cursor = 0;
            dispatch_and_run(state, runtime, view_data, tx, AppCommand::NextPage);
        }
        KeyCode::Up => view_data.customers_cursor = view_data.customers_cursor.saturating_sub(1),
        KeyCode::Down => {
            let len = state.customers.visible_customers().len();
            view_data.customers_cursor =
                (view_data.customers_cursor + 1).min(len.saturating_sub(1));
        }
        KeyCode::Enter => {
            if let Some(id) = cursor_customer(state, view_data) {
                let command = AppCommand::ToggleCustomerDetail(id);
                dispatch_and_run(state, runtime, view_data, tx, command);
            }
        }
        KeyCode::Char('r') => {
            if let Some(id) = cursor_customer(state, view_data) {
                view_data.panel_field = 0;
                let command = AppCommand::ToggleReturnPanel(id);
                dispatch_and_run(state, runtime, view_data, tx, command);
            }
        }
        KeyCode::Char('e') => {
            if let Some(id) = cursor_customer(state, view_data) {
                view_data.panel_field = 0;
                let command = AppCommand::ToggleEditPanel(id);
                dispatch_and_run(state, runtime, view_data, tx, command);
            }
        }
        KeyCode::Char('d') => {
            if let Some(id) = cursor_customer(state, view_data) {
                dispatch_and_run(state, runtime, view_data, tx, AppCommand::RequestDelete(id));
            }
        }
        KeyCode::Char('a') => {
            view_data.panel_field = 0;
            dispatch_and_run(state, runtime, view_data, tx, AppCommand::ToggleAddCustomer);
        }
        _ => {}
    }
}

fn cursor_customer(state: &AppState, view_data: &ViewData) -> Option<CustomerId> {
    state
        .customers
        .visible_customers()
        .get(view_data.customers_cursor)
        .map(|customer| customer.id)
}

fn handle_return_panel_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let Some(target) = state.customers.return_panel.open_target() else {
        return;
    };
    match key.code {
        KeyCode::Esc => {
            let command = AppCommand::ToggleReturnPanel(target);
            dispatch_and_run(state, runtime, view_data, tx, command);
        }
        KeyCode::Enter => {
            dispatch_and_run(state, runtime, view_data, tx, AppCommand::SubmitReturn);
        }
        KeyCode::Backspace => {
            let value = edited(&state.customers.return_panel.form().rental_id, None);
            let command = AppCommand::SetReturnRentalId(value);
            dispatch_and_run(state, runtime, view_data, tx, command);
        }
        KeyCode::Char(c) => {
            let value = edited(&state.customers.return_panel.form().rental_id, Some(c));
            let command = AppCommand::SetReturnRentalId(value);
            dispatch_and_run(state, runtime, view_data, tx, command);
        }
        _ => {}
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ThreeFieldPanel {
    Edit,
    Add,
}

/// Edit and add-customer panels share a first/last/email field layout.
fn handle_three_field_panel_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    key: KeyEvent,
    panel: ThreeFieldPanel,
) {
    match key.code {
        KeyCode::Esc => {
            let command = match panel {
                ThreeFieldPanel::Add => AppCommand::ToggleAddCustomer,
                ThreeFieldPanel::Edit => {
                    let Some(target) = state.customers.edit_panel.open_target() else {
                        return;
                    };
                    AppCommand::ToggleEditPanel(target)
                }
            };
            dispatch_and_run(state, runtime, view_data, tx, command);
        }
        KeyCode::Enter => {
            let command = match panel {
                ThreeFieldPanel::Add => AppCommand::SubmitAddCustomer,
                ThreeFieldPanel::Edit => AppCommand::SubmitEdit,
            };
            dispatch_and_run(state, runtime, view_data, tx, command);
        }
        KeyCode::Tab => view_data.panel_field = (view_data.panel_field + 1) % 3,
        KeyCode::Backspace => edit_three_field(state, runtime, view_data, tx, panel, None),
        KeyCode::Char(c) => edit_three_field(state, runtime, view_data, tx, panel, Some(c)),
        _ => {}
    }
}

fn edit_three_field<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    panel: ThreeFieldPanel,
    input: Option<char>,
) {
    let (first, last, email) = match panel {
        ThreeFieldPanel::Add => {
            let form = &state.customers.add_form;
            (
                form.first_name.clone(),
                form.last_name.clone(),
                form.email.clone(),
            )
        }
        ThreeFieldPanel::Edit => {
            let form = state.customers.edit_panel.form();
            (
                form.first_name.clone(),
                form.last_name.clone(),
                form.email.clone(),
            )
        }
    };

    let command = match (panel, view_data.panel_field) {
        (ThreeFieldPanel::Add, 0) => AppCommand::SetAddFirstName(edited(&first, input)),
        (ThreeFieldPanel::Add, 1) => AppCommand::SetAddLastName(edited(&last, input)),
        (ThreeFieldPanel::Add, _) => AppCommand::SetAddEmail(edited(&email, input)),
        (ThreeFieldPanel::Edit, 0) => AppCommand::SetEditFirstName(edited(&first, input)),
        (ThreeFieldPanel::Edit, 1) => AppCommand::SetEditLastName(edited(&last, input)),
        (ThreeFieldPanel::Edit, _) => AppCommand::SetEditEmail(edited(&email, input)),
    };
    dispatch_and_run(state, runtime, view_data, tx, command);
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let titles: Vec<String> = TabKind::ALL
        .iter()
        .map(|tab| tab.label().to_owned())
        .collect();
    let selected = TabKind::ALL
        .iter()
        .position(|tab| *tab == state.active_tab)
        .unwrap_or(0);
    let tabs = Tabs::new(titles).select(selected).block(
        Block::default()
            .borders(Borders::ALL)
            .title("reelrack - media rental storefront"),
    );
    frame.render_widget(tabs, chunks[0]);

    let body = match state.active_tab {
        TabKind::Landing => render_landing_text(state, view_data),
        TabKind::Films => render_films_text(state, view_data),
        TabKind::Customers => render_customers_text(state, view_data),
    };
    let content = Paragraph::new(body).block(Block::default().borders(Borders::ALL));
    frame.render_widget(content, chunks[1]);

    let status = Paragraph::new(state.status_line.clone().unwrap_or_default());
    frame.render_widget(status, chunks[2]);
}

fn loadable_header<T>(list: &Loadable<Vec<T>>, label: &str) -> Option<String> {
    match list {
        Loadable::Idle => Some(format!("{label}: not loaded")),
        Loadable::Loading => Some(format!("{label}: loading...")),
        Loadable::Failed(message) => Some(format!("{label}: {message}")),
        Loadable::Ready(_) => None,
    }
}

fn render_landing_text(state: &AppState, view_data: &ViewData) -> String {
    let mut out = String::new();

    out.push_str("Top 5 Rented Films\n");
    match loadable_header(&state.landing.top_films, "films") {
        Some(line) => {
            out.push_str(&format!("  {line}\n"));
        }
        None => {
            if let Some(films) = state.landing.top_films.ready() {
                for (index, film) in films.iter().enumerate() {
                    let cursor = landing_cursor_mark(view_data, LandingColumn::Films, index);
                    out.push_str(&format!(
                        "{cursor}{} ({} rentals)\n",
                        film.title, film.rental_count
                    ));
                    if state.landing.expanded_film == Some(film.id) {
                        push_film_detail_lines(&mut out, state, film.id);
                    }
                }
            }
        }
    }

    out.push_str("\nTop 5 Actors\n");
    match loadable_header(&state.landing.top_actors, "actors") {
        Some(line) => {
            out.push_str(&format!("  {line}\n"));
        }
        None => {
            if let Some(actors) = state.landing.top_actors.ready() {
                for (index, actor) in actors.iter().enumerate() {
                    let cursor = landing_cursor_mark(view_data, LandingColumn::Actors, index);
                    out.push_str(&format!("{cursor}{} ({} films)\n", actor.name, actor.movies));
                    if state.landing.expanded_actor == Some(actor.id) {
                        push_actor_detail_lines(&mut out, state, actor.id);
                    }
                }
            }
        }
    }

    out
}

fn landing_cursor_mark(view_data: &ViewData, column: LandingColumn, index: usize) -> &'static str {
    if view_data.landing_column == column && view_data.landing_cursor == index {
        "> "
    } else {
        "  "
    }
}

fn push_film_detail_lines(out: &mut String, state: &AppState, film_id: FilmId) {
    match state.films.details.status(film_id) {
        DetailStatus::Loading => out.push_str("    Loading details...\n"),
        DetailStatus::Error => out.push_str("    Details unavailable\n"),
        DetailStatus::Idle => {}
        DetailStatus::Success => {
            if let Some(detail) = state.films.details.payload(film_id) {
                for (label, value) in detail.attributes() {
                    out.push_str(&format!("    {label}: {value}\n"));
                }
            }
        }
    }
}

fn push_actor_detail_lines(out: &mut String, state: &AppState, actor_id: ActorId) {
    match state.landing.actor_details.status(actor_id) {
        DetailStatus::Loading => out.push_str("    Loading details...\n"),
        DetailStatus::Error => out.push_str("    Details unavailable\n"),
        DetailStatus::Idle => {}
        DetailStatus::Success => {
            if let Some(detail) = state.landing.actor_details.payload(actor_id) {
                for title in detail.films.iter().take(5) {
                    out.push_str(&format!("    {title}\n"));
                }
            }
        }
    }
}

fn filter_marker(enabled: bool, label: &str) -> String {
    if enabled {
        format!("[{label}]")
    } else {
        format!(" {} ", label.to_ascii_lowercase())
    }
}

fn render_films_text(state: &AppState, view_data: &ViewData) -> String {
    let mut out = String::new();
    let filters = state.films.filters;
    let focus = if view_data.films_focus == InputFocus::Search {
        "_"
    } else {
        ""
    };
    out.push_str(&format!(
        "Search: {}{focus}  {} {} {}\n\n",
        state.films.query,
        filter_marker(filters.title, "T"),
        filter_marker(filters.actor, "A"),
        filter_marker(filters.genre, "G"),
    ));

    if let Some(line) = loadable_header(&state.films.films, "films") {
        out.push_str(&line);
        out.push('\n');
        return out;
    }

    let films = state.films.visible_films();
    if films.is_empty() {
        out.push_str("No films to show.\n");
        return out;
    }

    for (index, film) in films.iter().enumerate() {
        let cursor = if view_data.films_cursor == index {
            "> "
        } else {
            "  "
        };
        let mut line = format!("{cursor}{} -- {}", film.title, film.availability_badge());
        if !state.films.submitted_query.trim().is_empty() {
            line.push_str(&format!(" ({})", state.films.match_label(film)));
        }
        out.push_str(&line);
        out.push('\n');

        if state.films.expanded == Some(film.id) {
            push_film_detail_lines(&mut out, state, film.id);
        }
        if state.films.rent_panel.is_open(film.id) {
            push_rent_panel_lines(&mut out, state, view_data, film);
        }
    }

    out
}

fn push_rent_panel_lines(out: &mut String, state: &AppState, view_data: &ViewData, film: &Film) {
    let form = state.films.rent_panel.form();
    out.push_str(&format!("    Rent {}\n", film.title));
    match form.mode {
        RentMode::ById => {
            out.push_str(&format!(
                "    {}Customer ID: {}\n",
                field_mark(view_data, 0),
                form.customer_id
            ));
        }
        RentMode::ByName => {
            out.push_str(&format!(
                "    {}First name: {}\n",
                field_mark(view_data, 0),
                form.first_name
            ));
            out.push_str(&format!(
                "    {}Last name: {}\n",
                field_mark(view_data, 1),
                form.last_name
            ));
        }
    }
    if state.films.rent_panel.is_submitting(film.id) {
        out.push_str("    Submitting...\n");
    }
    push_panel_status_lines(out, state.films.rent_panel.status());
}

fn field_mark(view_data: &ViewData, index: usize) -> &'static str {
    if view_data.panel_field == index {
        "* "
    } else {
        "  "
    }
}

fn push_panel_status_lines(out: &mut String, status: Option<&reelrack_app::PanelStatus>) {
    if let Some(status) = status {
        let prefix = match status.kind {
            StatusKind::Success => "ok",
            StatusKind::Error => "error",
        };
        out.push_str(&format!("    [{prefix}] {}\n", status.message));
    }
}

fn render_customers_text(state: &AppState, view_data: &ViewData) -> String {
    let mut out = String::new();
    let focus = if view_data.customers_focus == InputFocus::Search {
        "_"
    } else {
        ""
    };
    out.push_str(&format!("Search: {}{focus}\n\n", state.customers.query));

    if state.customers.add_open {
        push_add_customer_lines(&mut out, state, view_data);
        out.push('\n');
    }

    if let Some(line) = loadable_header(&state.customers.customers, "customers") {
        out.push_str(&line);
        out.push('\n');
        return out;
    }

    let visible = state.customers.visible_customers();
    if visible.is_empty() {
        out.push_str("No customers to show.\n");
        return out;
    }

    for (index, customer) in visible.iter().enumerate() {
        let cursor = if view_data.customers_cursor == index {
            "> "
        } else {
            "  "
        };
        out.push_str(&format!(
            "{cursor}#{} {} {} <{}>\n",
            customer.id.get(),
            customer.first_name,
            customer.last_name,
            customer.email,
        ));

        if state.customers.expanded == Some(customer.id) {
            push_customer_detail_lines(&mut out, state, customer.id);
        }
        if state.customers.return_panel.is_open(customer.id) {
            push_return_panel_lines(&mut out, state);
        }
        if state.customers.edit_panel.is_open(customer.id) {
            push_edit_panel_lines(&mut out, state, view_data);
        }
        if state.customers.deletes.is_deleting(customer.id) {
            out.push_str("    Deleting...\n");
        }
    }

    let pager = &state.customers.pager;
    out.push_str(&format!(
        "\npage {} of {} ({} customers)\n",
        pager.page(),
        pager.total_pages().max(1),
        pager.count(),
    ));

    out
}

fn push_customer_detail_lines(out: &mut String, state: &AppState, customer_id: CustomerId) {
    match state.customers.details.status(customer_id) {
        DetailStatus::Loading => out.push_str("    Loading details...\n"),
        DetailStatus::Error => out.push_str("    Details unavailable\n"),
        DetailStatus::Idle => {}
        DetailStatus::Success => {
            if let Some(detail) = state.customers.details.payload(customer_id) {
                out.push_str(&format!(
                    "    Email: {}\n    Active: {}\n",
                    detail.email,
                    if detail.active { "yes" } else { "no" },
                ));
                match detail.active_rentals {
                    Some(count) => {
                        out.push_str(&format!("    Active rentals: {count}\n"));
                    }
                    None => out.push_str("    Active rentals: unknown\n"),
                }
            }
        }
    }
}

fn push_return_panel_lines(out: &mut String, state: &AppState) {
    let form = state.customers.return_panel.form();
    out.push_str(&format!("    Return rental ID: {}\n", form.rental_id));
    if state
        .customers
        .return_panel
        .open_target()
        .is_some_and(|id| state.customers.return_panel.is_submitting(id))
    {
        out.push_str("    Submitting...\n");
    }
    push_panel_status_lines(out, state.customers.return_panel.status());
}

fn push_edit_panel_lines(out: &mut String, state: &AppState, view_data: &ViewData) {
    let form: &EditForm = state.customers.edit_panel.form();
    out.push_str(&format!(
        "    {}First name: {}\n",
        field_mark(view_data, 0),
        form.first_name
    ));
    out.push_str(&format!(
        "    {}Last name: {}\n",
        field_mark(view_data, 1),
        form.last_name
    ));
    out.push_str(&format!(
        "    {}Email: {}\n",
        field_mark(view_data, 2),
        form.email
    ));
    push_panel_status_lines(out, state.customers.edit_panel.status());
}

fn push_add_customer_lines(out: &mut String, state: &AppState, view_data: &ViewData) {
    let form = &state.customers.add_form;
    out.push_str("Add customer\n");
    out.push_str(&format!(
        "  {}First name: {}\n",
        field_mark(view_data, 0),
        form.first_name
    ));
    out.push_str(&format!(
        "  {}Last name: {}\n",
        field_mark(view_data, 1),
        form.last_name
    ));
    out.push_str(&format!(
        "  {}Email: {}\n",
        field_mark(view_data, 2),
        form.email
    ));
    if state.customers.add_submitting {
        out.push_str("  Submitting...\n");
    }
    if let Some(status) = &state.customers.add_status {
        let prefix = match status.kind {
            StatusKind::Success => "ok",
            StatusKind::Error => "error",
        };
        out.push_str(&format!("  [{prefix}] {}\n", status.message));
    }
}
