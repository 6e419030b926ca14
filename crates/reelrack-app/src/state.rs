// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::apply::{CustomerUpdate, apply_delete_success, apply_edit_success, apply_rent_success};
use crate::cache::{DetailCache, FetchTicket};
use crate::ids::{ActorId, CustomerId, FilmId};
use crate::model::{
    ActorDetail, Customer, CustomerDetail, Film, FilmDetail, TabKind, TopActor, TopFilm,
};
use crate::pager::{CUSTOMER_PAGE_SIZE, Pager};
use crate::search::{SearchFilters, filter_films, primary_match_label, validate_search};
use crate::workflow::{
    AddCustomerForm, DeleteGuard, EditForm, PanelAction, PanelController, PanelForm, PanelStatus,
    RentForm, RentLookup, RentMode, ReturnForm,
};

/// Lifecycle of a server-backed list.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Loadable<T> {
    #[default]
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Loadable<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Idle and failed lists are (re)loaded when their tab is visited.
    pub const fn needs_load(&self) -> bool {
        matches!(self, Self::Idle | Self::Failed(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Title,
    Actor,
    Genre,
}

#[derive(Debug, Clone, Default)]
pub struct LandingBrowse {
    pub top_films: Loadable<Vec<TopFilm>>,
    pub top_actors: Loadable<Vec<TopActor>>,
    pub expanded_actor: Option<ActorId>,
    /// Film rows on the landing list expand too; their details live in the
    /// shared film detail cache.
    pub expanded_film: Option<FilmId>,
    pub actor_details: DetailCache<ActorId, ActorDetail>,
    top_films_seq: u64,
    top_actors_seq: u64,
}

#[derive(Debug, Clone, Default)]
pub struct FilmBrowse {
    pub query: String,
    pub submitted_query: String,
    pub filters: SearchFilters,
    pub films: Loadable<Vec<Film>>,
    pub expanded: Option<FilmId>,
    pub details: DetailCache<FilmId, FilmDetail>,
    pub rent_panel: PanelController<FilmId, RentForm>,
    seq: u64,
}

impl FilmBrowse {
    /// The fetched list narrowed by the per-field toggles. An empty
    /// submitted term shows the list as fetched.
    pub fn visible_films(&self) -> Vec<Film> {
        self.films
            .ready()
            .map(|films| filter_films(films, &self.submitted_query, self.filters))
            .unwrap_or_default()
    }

    pub fn match_label(&self, film: &Film) -> String {
        primary_match_label(film, &self.submitted_query, self.filters)
    }
}

#[derive(Debug, Clone)]
pub struct CustomerBrowse {
    pub query: String,
    pub submitted_query: String,
    pub customers: Loadable<Vec<Customer>>,
    pub pager: Pager,
    pub expanded: Option<CustomerId>,
    pub details: DetailCache<CustomerId, CustomerDetail>,
    pub return_panel: PanelController<CustomerId, ReturnForm>,
    pub edit_panel: PanelController<CustomerId, EditForm>,
    pub deletes: DeleteGuard<CustomerId>,
    pub add_open: bool,
    pub add_form: AddCustomerForm,
    pub add_submitting: bool,
    pub add_status: Option<PanelStatus>,
    seq: u64,
}

impl Default for CustomerBrowse {
    fn default() -> Self {
        Self {
            query: String::new(),
            submitted_query: String::new(),
            customers: Loadable::Idle,
            pager: Pager::new(CUSTOMER_PAGE_SIZE),
            expanded: None,
            details: DetailCache::new(),
            return_panel: PanelController::new(),
            edit_panel: PanelController::new(),
            deletes: DeleteGuard::default(),
            add_open: false,
            add_form: AddCustomerForm::default(),
            add_submitting: false,
            add_status: None,
            seq: 0,
        }
    }
}

impl CustomerBrowse {
    pub fn visible_customers(&self) -> &[Customer] {
        self.customers
            .ready()
            .map(|customers| self.pager.slice(customers))
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub active_tab: TabKind,
    pub landing: LandingBrowse,
    pub films: FilmBrowse,
    pub customers: CustomerBrowse,
    pub status_line: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Bootstrap,
    SelectTab(TabKind),
    ClearStatus,

    ToggleActorDetail(ActorId),
    ToggleLandingFilmDetail(FilmId),
    FinishTopFilms {
        seq: u64,
        result: Result<Vec<TopFilm>, String>,
    },
    FinishTopActors {
        seq: u64,
        result: Result<Vec<TopActor>, String>,
    },
    FinishActorDetail {
        ticket: FetchTicket<ActorId>,
        payload: Option<ActorDetail>,
    },

    SetFilmQuery(String),
    ToggleSearchField(SearchField),
    SubmitFilmSearch,
    FinishFilmSearch {
        seq: u64,
        result: Result<Vec<Film>, String>,
    },
    ToggleFilmDetail(FilmId),
    FinishFilmDetail {
        ticket: FetchTicket<FilmId>,
        payload: Option<FilmDetail>,
    },
    ToggleRentPanel(FilmId),
    RentSwitchFired {
        token: u64,
    },
    SetRentMode(RentMode),
    SetRentCustomerId(String),
    SetRentFirstName(String),
    SetRentLastName(String),
    SubmitRent,
    FinishRent {
        film_id: FilmId,
        result: Result<String, String>,
    },

    SetCustomerQuery(String),
    SubmitCustomerSearch,
    FinishCustomers {
        seq: u64,
        result: Result<Vec<Customer>, String>,
    },
    ChangePage(usize),
    NextPage,
    PrevPage,
    ToggleCustomerDetail(CustomerId),
    FinishCustomerDetail {
        ticket: FetchTicket<CustomerId>,
        payload: Option<CustomerDetail>,
    },
    ToggleReturnPanel(CustomerId),
    ReturnSwitchFired {
        token: u64,
    },
    SetReturnRentalId(String),
    SubmitReturn,
    FinishReturn {
        customer_id: CustomerId,
        result: Result<String, String>,
    },
    ToggleEditPanel(CustomerId),
    EditSwitchFired {
        token: u64,
    },
    SetEditFirstName(String),
    SetEditLastName(String),
    SetEditEmail(String),
    SubmitEdit,
    FinishEdit {
        customer_id: CustomerId,
        update: CustomerUpdate,
        result: Result<String, String>,
    },
    EditAutoCloseFired {
        token: u64,
    },
    RequestDelete(CustomerId),
    FinishDelete {
        customer_id: CustomerId,
        result: Result<String, String>,
    },
    ToggleAddCustomer,
    SetAddFirstName(String),
    SetAddLastName(String),
    SetAddEmail(String),
    SubmitAddCustomer,
    FinishAddCustomer {
        result: Result<String, String>,
    },
}

/// Effects the runtime layer must carry out in response to a dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    TabChanged(TabKind),
    StatusUpdated(String),
    StatusCleared,
    TopFilmsRequested {
        seq: u64,
    },
    TopActorsRequested {
        seq: u64,
    },
    ActorDetailRequested(FetchTicket<ActorId>),
    FilmSearchRequested {
        seq: u64,
        term: String,
    },
    FilmDetailRequested(FetchTicket<FilmId>),
    RentPanelSwitchScheduled {
        token: u64,
    },
    RentRequested {
        film_id: FilmId,
        lookup: RentLookup,
    },
    CustomersRequested {
        seq: u64,
        term: String,
    },
    CustomerDetailRequested(FetchTicket<CustomerId>),
    ReturnPanelSwitchScheduled {
        token: u64,
    },
    ReturnRequested {
        customer_id: CustomerId,
        rental_id: String,
    },
    EditPanelSwitchScheduled {
        token: u64,
    },
    EditRequested {
        customer_id: CustomerId,
        update: CustomerUpdate,
    },
    EditAutoCloseScheduled {
        token: u64,
    },
    DeleteRequested {
        customer_id: CustomerId,
    },
    AddCustomerRequested {
        first_name: String,
        last_name: String,
        email: String,
    },
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::Bootstrap => self.load_landing(),
            AppCommand::SelectTab(tab) => {
                self.active_tab = tab;
                let mut events = vec![AppEvent::TabChanged(tab)];
                match tab {
                    TabKind::Landing => events.extend(self.load_landing()),
                    TabKind::Films => {
                        if self.films.films.needs_load() {
                            events.push(self.request_film_search(String::new()));
                        }
                    }
                    TabKind::Customers => {
                        if self.customers.customers.needs_load() {
                            events.push(self.request_customers(String::new()));
                        }
                    }
                }
                events
            }
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }

            AppCommand::ToggleActorDetail(actor_id) => {
                let landing = &mut self.landing;
                if landing.expanded_actor == Some(actor_id) {
                    landing.expanded_actor = None;
                    return Vec::new();
                }
                landing.expanded_actor = Some(actor_id);
                landing
                    .actor_details
                    .begin_fetch(actor_id)
                    .map(AppEvent::ActorDetailRequested)
                    .into_iter()
                    .collect()
            }
            AppCommand::ToggleLandingFilmDetail(film_id) => {
                if self.landing.expanded_film == Some(film_id) {
                    self.landing.expanded_film = None;
                    return Vec::new();
                }
                self.landing.expanded_film = Some(film_id);
                self.films
                    .details
                    .begin_fetch(film_id)
                    .map(AppEvent::FilmDetailRequested)
                    .into_iter()
                    .collect()
            }
            AppCommand::FinishTopFilms { seq, result } => {
                if seq != self.landing.top_films_seq {
                    return Vec::new();
                }
                match result {
                    Ok(films) => {
                        self.landing.top_films = Loadable::Ready(films);
                        Vec::new()
                    }
                    Err(message) => {
                        self.landing.top_films = Loadable::Failed(message.clone());
                        vec![self.set_status(&message)]
                    }
                }
            }
            AppCommand::FinishTopActors { seq, result } => {
                if seq != self.landing.top_actors_seq {
                    return Vec::new();
                }
                match result {
                    Ok(actors) => {
                        self.landing.top_actors = Loadable::Ready(actors);
                        Vec::new()
                    }
                    Err(message) => {
                        self.landing.top_actors = Loadable::Failed(message.clone());
                        vec![self.set_status(&message)]
                    }
                }
            }
            AppCommand::FinishActorDetail { ticket, payload } => {
                self.landing.actor_details.complete_fetch(ticket, payload);
                Vec::new()
            }

            AppCommand::SetFilmQuery(query) => {
                self.films.query = query;
                Vec::new()
            }
            AppCommand::ToggleSearchField(field) => {
                let filters = &mut self.films.filters;
                match field {
                    SearchField::Title => filters.title = !filters.title,
                    SearchField::Actor => filters.actor = !filters.actor,
                    SearchField::Genre => filters.genre = !filters.genre,
                }
                Vec::new()
            }
            AppCommand::SubmitFilmSearch => {
                let term = self.films.query.trim().to_owned();
                if term.is_empty() {
                    return Vec::new();
                }
                if let Err(error) = validate_search(self.films.filters) {
                    return vec![self.set_status(&error.to_string())];
                }
                vec![self.request_film_search(term)]
            }
            AppCommand::FinishFilmSearch { seq, result } => {
                if seq != self.films.seq {
                    return Vec::new();
                }
                match result {
                    Ok(films) => {
                        self.films.films = Loadable::Ready(films);
                        self.films.expanded = None;
                        self.films.rent_panel.close();
                        Vec::new()
                    }
                    Err(message) => {
                        self.films.films = Loadable::Failed(message.clone());
                        vec![self.set_status(&message)]
                    }
                }
            }
            AppCommand::ToggleFilmDetail(film_id) => {
                if self.films.expanded == Some(film_id) {
                    self.films.expanded = None;
                    return Vec::new();
                }
                self.films.expanded = Some(film_id);
                self.films
                    .details
                    .begin_fetch(film_id)
                    .map(AppEvent::FilmDetailRequested)
                    .into_iter()
                    .collect()
            }
            AppCommand::FinishFilmDetail { ticket, payload } => {
                self.films.details.complete_fetch(ticket, payload);
                Vec::new()
            }
            AppCommand::ToggleRentPanel(film_id) => {
                match self.films.rent_panel.toggle(film_id) {
                    PanelAction::SwitchScheduled { token, .. } => {
                        vec![AppEvent::RentPanelSwitchScheduled { token }]
                    }
                    PanelAction::Opened(_) | PanelAction::Closed => Vec::new(),
                }
            }
            AppCommand::RentSwitchFired { token } => {
                self.films.rent_panel.switch_fired(token);
                Vec::new()
            }
            AppCommand::SetRentMode(mode) => {
                self.films.rent_panel.form_mut().mode = mode;
                Vec::new()
            }
            AppCommand::SetRentCustomerId(value) => {
                self.films.rent_panel.form_mut().customer_id = value;
                Vec::new()
            }
            AppCommand::SetRentFirstName(value) => {
                self.films.rent_panel.form_mut().first_name = value;
                Vec::new()
            }
            AppCommand::SetRentLastName(value) => {
                self.films.rent_panel.form_mut().last_name = value;
                Vec::new()
            }
            AppCommand::SubmitRent => {
                let Some(film_id) = self.films.rent_panel.open_target() else {
                    return Vec::new();
                };
                match self.films.rent_panel.form().validate() {
                    Err(error) => {
                        self.films.rent_panel.reject(film_id, error.to_string());
                        Vec::new()
                    }
                    Ok(lookup) => {
                        if !self.films.rent_panel.begin_submit(film_id) {
                            return Vec::new();
                        }
                        vec![AppEvent::RentRequested { film_id, lookup }]
                    }
                }
            }
            AppCommand::FinishRent { film_id, result } => {
                match result {
                    Ok(message) => {
                        self.films.rent_panel.submit_succeeded(film_id, message);
                        if let Loadable::Ready(films) = &mut self.films.films {
                            apply_rent_success(films, film_id);
                        }
                    }
                    Err(message) => self.films.rent_panel.submit_failed(film_id, message),
                }
                Vec::new()
            }

            AppCommand::SetCustomerQuery(query) => {
                self.customers.query = query;
                Vec::new()
            }
            AppCommand::SubmitCustomerSearch => {
                let term = self.customers.query.trim().to_owned();
                vec![self.request_customers(term)]
            }
            AppCommand::FinishCustomers { seq, result } => {
                if seq != self.customers.seq {
                    return Vec::new();
                }
                match result {
                    Ok(customers) => {
                        self.customers.pager.reset(customers.len());
                        self.customers.expanded = None;
                        self.customers.customers = Loadable::Ready(customers);
                        Vec::new()
                    }
                    Err(message) => {
                        self.customers.customers = Loadable::Failed(message.clone());
                        vec![self.set_status(&message)]
                    }
                }
            }
            AppCommand::ChangePage(page) => {
                self.customers.pager.change_page(page);
                Vec::new()
            }
            AppCommand::NextPage => {
                self.customers.pager.next_page();
                Vec::new()
            }
            AppCommand::PrevPage => {
                self.customers.pager.prev_page();
                Vec::new()
            }
            AppCommand::ToggleCustomerDetail(customer_id) => {
                if self.customers.expanded == Some(customer_id) {
                    self.customers.expanded = None;
                    return Vec::new();
                }
                self.customers.expanded = Some(customer_id);
                self.customers
                    .details
                    .begin_fetch(customer_id)
                    .map(AppEvent::CustomerDetailRequested)
                    .into_iter()
                    .collect()
            }
            AppCommand::FinishCustomerDetail { ticket, payload } => {
                self.customers.details.complete_fetch(ticket, payload);
                Vec::new()
            }
            AppCommand::ToggleReturnPanel(customer_id) => {
                match self.customers.return_panel.toggle(customer_id) {
                    PanelAction::SwitchScheduled { token, .. } => {
                        vec![AppEvent::ReturnPanelSwitchScheduled { token }]
                    }
                    PanelAction::Opened(_) | PanelAction::Closed => Vec::new(),
                }
            }
            AppCommand::ReturnSwitchFired { token } => {
                self.customers.return_panel.switch_fired(token);
                Vec::new()
            }
            AppCommand::SetReturnRentalId(value) => {
                self.customers.return_panel.form_mut().rental_id = value;
                Vec::new()
            }
            AppCommand::SubmitReturn => {
                let Some(customer_id) = self.customers.return_panel.open_target() else {
                    return Vec::new();
                };
                match self.customers.return_panel.form().validate() {
                    Err(error) => {
                        self.customers
                            .return_panel
                            .reject(customer_id, error.to_string());
                        Vec::new()
                    }
                    Ok(rental_id) => {
                        if !self.customers.return_panel.begin_submit(customer_id) {
                            return Vec::new();
                        }
                        vec![AppEvent::ReturnRequested {
                            customer_id,
                            rental_id,
                        }]
                    }
                }
            }
            AppCommand::FinishReturn {
                customer_id,
                result,
            } => match result {
                Ok(message) => {
                    self.customers
                        .return_panel
                        .submit_succeeded(customer_id, message);
                    // The active-rental count changed server-side; refresh
                    // the detail instead of guessing. The cached record
                    // stays usable if the refresh fails.
                    self.customers
                        .details
                        .begin_refresh(customer_id)
                        .map(AppEvent::CustomerDetailRequested)
                        .into_iter()
                        .collect()
                }
                Err(message) => {
                    self.customers
                        .return_panel
                        .submit_failed(customer_id, message);
                    Vec::new()
                }
            },
            AppCommand::ToggleEditPanel(customer_id) => {
                match self.customers.edit_panel.toggle(customer_id) {
                    PanelAction::Opened(target) => {
                        self.prefill_edit_form(target);
                        Vec::new()
                    }
                    PanelAction::SwitchScheduled { token, .. } => {
                        vec![AppEvent::EditPanelSwitchScheduled { token }]
                    }
                    PanelAction::Closed => Vec::new(),
                }
            }
            AppCommand::EditSwitchFired { token } => {
                if let Some(target) = self.customers.edit_panel.switch_fired(token) {
                    self.prefill_edit_form(target);
                }
                Vec::new()
            }
            AppCommand::SetEditFirstName(value) => {
                self.customers.edit_panel.form_mut().first_name = value;
                Vec::new()
            }
            AppCommand::SetEditLastName(value) => {
                self.customers.edit_panel.form_mut().last_name = value;
                Vec::new()
            }
            AppCommand::SetEditEmail(value) => {
                self.customers.edit_panel.form_mut().email = value;
                Vec::new()
            }
            AppCommand::SubmitEdit => {
                let Some(customer_id) = self.customers.edit_panel.open_target() else {
                    return Vec::new();
                };
                let form = self.customers.edit_panel.form();
                match form.validate() {
                    Err(error) => {
                        self.customers
                            .edit_panel
                            .reject(customer_id, error.to_string());
                        Vec::new()
                    }
                    Ok(()) => {
                        let update = CustomerUpdate {
                            first_name: form.first_name.trim().to_owned(),
                            last_name: form.last_name.trim().to_owned(),
                            email: form.email.trim().to_owned(),
                        };
                        if !self.customers.edit_panel.begin_submit(customer_id) {
                            return Vec::new();
                        }
                        vec![AppEvent::EditRequested {
                            customer_id,
                            update,
                        }]
                    }
                }
            }
            AppCommand::FinishEdit {
                customer_id,
                update,
                result,
            } => match result {
                Ok(message) => {
                    self.customers
                        .edit_panel
                        .submit_succeeded(customer_id, message);
                    if let Loadable::Ready(customers) = &mut self.customers.customers {
                        apply_edit_success(
                            customers,
                            &mut self.customers.details,
                            customer_id,
                            &update,
                        );
                    }
                    self.customers
                        .edit_panel
                        .schedule_auto_close(customer_id)
                        .map(|token| AppEvent::EditAutoCloseScheduled { token })
                        .into_iter()
                        .collect()
                }
                Err(message) => {
                    self.customers
                        .edit_panel
                        .submit_failed(customer_id, message);
                    Vec::new()
                }
            },
            AppCommand::EditAutoCloseFired { token } => {
                self.customers.edit_panel.auto_close_fired(token);
                Vec::new()
            }
            AppCommand::RequestDelete(customer_id) => {
                if !self.customers.deletes.begin(customer_id) {
                    return Vec::new();
                }
                vec![AppEvent::DeleteRequested { customer_id }]
            }
            AppCommand::FinishDelete {
                customer_id,
                result,
            } => {
                self.customers.deletes.finish(customer_id);
                match result {
                    Ok(message) => {
                        if let Loadable::Ready(customers) = &mut self.customers.customers {
                            apply_delete_success(
                                customers,
                                &mut self.customers.details,
                                customer_id,
                            );
                            let page = self.customers.pager.page();
                            self.customers.pager.reset(customers.len());
                            let last = self.customers.pager.total_pages().max(1);
                            self.customers.pager.change_page(page.min(last));
                        }
                        self.customers.return_panel.close_if_target(customer_id);
                        self.customers.edit_panel.close_if_target(customer_id);
                        if self.customers.expanded == Some(customer_id) {
                            self.customers.expanded = None;
                        }
                        vec![self.set_status(&message)]
                    }
                    Err(message) => vec![self.set_status(&message)],
                }
            }
            AppCommand::ToggleAddCustomer => {
                self.customers.add_open = !self.customers.add_open;
                self.customers.add_form.reset();
                self.customers.add_status = None;
                Vec::new()
            }
            AppCommand::SetAddFirstName(value) => {
                self.customers.add_form.first_name = value;
                Vec::new()
            }
            AppCommand::SetAddLastName(value) => {
                self.customers.add_form.last_name = value;
                Vec::new()
            }
            AppCommand::SetAddEmail(value) => {
                self.customers.add_form.email = value;
                Vec::new()
            }
            AppCommand::SubmitAddCustomer => {
                if self.customers.add_submitting {
                    return Vec::new();
                }
                match self.customers.add_form.validate() {
                    Err(error) => {
                        self.customers.add_status = Some(PanelStatus::error(error.to_string()));
                        Vec::new()
                    }
                    Ok(()) => {
                        self.customers.add_submitting = true;
                        let form = &self.customers.add_form;
                        vec![AppEvent::AddCustomerRequested {
                            first_name: form.first_name.trim().to_owned(),
                            last_name: form.last_name.trim().to_owned(),
                            email: form.email.trim().to_owned(),
                        }]
                    }
                }
            }
            AppCommand::FinishAddCustomer { result } => {
                self.customers.add_submitting = false;
                match result {
                    Ok(message) => {
                        self.customers.add_status = Some(PanelStatus::success(message));
                        self.customers.add_form.reset();
                        // New rows come from the server, not optimistically.
                        let term = self.customers.submitted_query.clone();
                        vec![self.request_customers(term)]
                    }
                    Err(message) => {
                        self.customers.add_status = Some(PanelStatus::error(message));
                        Vec::new()
                    }
                }
            }
        }
    }

    fn load_landing(&mut self) -> Vec<AppEvent> {
        let mut events = Vec::new();
        if self.landing.top_films.needs_load() {
            self.landing.top_films = Loadable::Loading;
            self.landing.top_films_seq += 1;
            events.push(AppEvent::TopFilmsRequested {
                seq: self.landing.top_films_seq,
            });
        }
        if self.landing.top_actors.needs_load() {
            self.landing.top_actors = Loadable::Loading;
            self.landing.top_actors_seq += 1;
            events.push(AppEvent::TopActorsRequested {
                seq: self.landing.top_actors_seq,
            });
        }
        events
    }

    fn request_film_search(&mut self, term: String) -> AppEvent {
        self.films.films = Loadable::Loading;
        self.films.submitted_query = term.clone();
        self.films.seq += 1;
        AppEvent::FilmSearchRequested {
            seq: self.films.seq,
            term,
        }
    }

    fn request_customers(&mut self, term: String) -> AppEvent {
        self.customers.customers = Loadable::Loading;
        self.customers.submitted_query = term.clone();
        self.customers.seq += 1;
        AppEvent::CustomersRequested {
            seq: self.customers.seq,
            term,
        }
    }

    fn prefill_edit_form(&mut self, customer_id: CustomerId) {
        if let Some(detail) = self.customers.details.payload(customer_id) {
            let form = EditForm::prefill(detail);
            self.customers.edit_panel.set_form(form);
        }
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}
