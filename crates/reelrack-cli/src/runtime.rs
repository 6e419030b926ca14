// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use reelrack_api::Client;
use reelrack_app::{
    ActorDetail, ActorId, AppCommand, Customer, CustomerDetail, CustomerId, CustomerUpdate,
    FetchTicket, Film, FilmDetail, FilmId, RentLookup, TopActor, TopFilm, normalize_films,
};
use reelrack_tui::InternalEvent;
use std::sync::mpsc::Sender;
use std::thread;
use time::OffsetDateTime;

/// Runtime backed by the rental data service. The synchronous methods are
/// used directly by tests; the UI goes through the spawn_* overrides, which
/// run each request on its own thread against a cloned client so the event
/// loop never blocks on the network.
pub struct ApiRuntime {
    client: Client,
}

impl ApiRuntime {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

/// Empty term means the default catalog: the top-rented list reshaped into
/// catalog rows and run through the same normalizer as search results.
fn fetch_films(client: &Client, term: &str) -> Result<Vec<Film>> {
    let rows = if term.trim().is_empty() {
        reelrack_api::rows_from_top_films(&client.top_rented_films()?)
    } else {
        client.search_films(term)?
    };
    Ok(normalize_films(&rows))
}

fn fetch_customers(client: &Client, term: &str) -> Result<Vec<Customer>> {
    if term.trim().is_empty() {
        client.all_customers()
    } else {
        client.search_customers(term)
    }
}

fn rent(client: &Client, film_id: FilmId, lookup: &RentLookup) -> Result<String> {
    let rental_date = reelrack_api::format_rental_date(OffsetDateTime::now_utc())?;
    client.rent_film(film_id, lookup, &rental_date)
}

fn send_command(tx: &Sender<InternalEvent>, command: AppCommand) {
    let _ = tx.send(InternalEvent::Dispatch(command));
}

impl reelrack_tui::AppRuntime for ApiRuntime {
    fn top_rented_films(&mut self) -> Result<Vec<TopFilm>> {
        self.client.top_rented_films()
    }

    fn top_actors(&mut self) -> Result<Vec<TopActor>> {
        self.client.top_actors()
    }

    fn search_films(&mut self, term: &str) -> Result<Vec<Film>> {
        fetch_films(&self.client, term)
    }

    fn film_detail(&mut self, film_id: FilmId) -> Result<Option<FilmDetail>> {
        self.client.film_detail(film_id)
    }

    fn actor_detail(&mut self, actor_id: ActorId) -> Result<Option<ActorDetail>> {
        self.client.actor_detail(actor_id)
    }

    fn load_customers(&mut self, term: &str) -> Result<Vec<Customer>> {
        fetch_customers(&self.client, term)
    }

    fn customer_detail(&mut self, customer_id: CustomerId) -> Result<Option<CustomerDetail>> {
        self.client.customer_detail(customer_id)
    }

    fn rent_film(&mut self, film_id: FilmId, lookup: &RentLookup) -> Result<String> {
        rent(&self.client, film_id, lookup)
    }

    fn return_film(&mut self, customer_id: CustomerId, rental_id: &str) -> Result<String> {
        self.client.return_film(customer_id, rental_id)
    }

    fn edit_customer(
        &mut self,
        customer_id: CustomerId,
        update: &CustomerUpdate,
    ) -> Result<String> {
        self.client.edit_customer(customer_id, update)
    }

    fn delete_customer(&mut self, customer_id: CustomerId) -> Result<String> {
        self.client.delete_customer(customer_id)
    }

    fn add_customer(&mut self, first_name: &str, last_name: &str, email: &str) -> Result<String> {
        self.client.add_customer(first_name, last_name, email)
    }

    fn spawn_top_films(&mut self, seq: u64, tx: Sender<InternalEvent>) {
        let client = self.client.clone();
        thread::spawn(move || {
            let result = client.top_rented_films().map_err(|error| error.to_string());
            send_command(&tx, AppCommand::FinishTopFilms { seq, result });
        });
    }

    fn spawn_top_actors(&mut self, seq: u64, tx: Sender<InternalEvent>) {
        let client = self.client.clone();
        thread::spawn(move || {
            let result = client.top_actors().map_err(|error| error.to_string());
            send_command(&tx, AppCommand::FinishTopActors { seq, result });
        });
    }

    fn spawn_film_search(&mut self, seq: u64, term: &str, tx: Sender<InternalEvent>) {
        let client = self.client.clone();
        let term = term.to_owned();
        thread::spawn(move || {
            let result = fetch_films(&client, &term).map_err(|error| error.to_string());
            send_command(&tx, AppCommand::FinishFilmSearch { seq, result });
        });
    }

    fn spawn_film_detail(&mut self, ticket: FetchTicket<FilmId>, tx: Sender<InternalEvent>) {
        let client = self.client.clone();
        thread::spawn(move || {
            let payload = client.film_detail(ticket.id).ok().flatten();
            send_command(&tx, AppCommand::FinishFilmDetail { ticket, payload });
        });
    }

    fn spawn_actor_detail(&mut self, ticket: FetchTicket<ActorId>, tx: Sender<InternalEvent>) {
        let client = self.client.clone();
        thread::spawn(move || {
            let payload = client.actor_detail(ticket.id).ok().flatten();
            send_command(&tx, AppCommand::FinishActorDetail { ticket, payload });
        });
    }

    fn spawn_customers(&mut self, seq: u64, term: &str, tx: Sender<InternalEvent>) {
        let client = self.client.clone();
        let term = term.to_owned();
        thread::spawn(move || {
            let result = fetch_customers(&client, &term).map_err(|error| error.to_string());
            send_command(&tx, AppCommand::FinishCustomers { seq, result });
        });
    }

    fn spawn_customer_detail(
        &mut self,
        ticket: FetchTicket<CustomerId>,
        tx: Sender<InternalEvent>,
    ) {
        let client = self.client.clone();
        thread::spawn(move || {
            let payload = client.customer_detail(ticket.id).ok().flatten();
            send_command(&tx, AppCommand::FinishCustomerDetail { ticket, payload });
        });
    }

    fn spawn_rent(&mut self, film_id: FilmId, lookup: RentLookup, tx: Sender<InternalEvent>) {
        let client = self.client.clone();
        thread::spawn(move || {
            let result = rent(&client, film_id, &lookup).map_err(|error| error.to_string());
            send_command(&tx, AppCommand::FinishRent { film_id, result });
        });
    }

    fn spawn_return(
        &mut self,
        customer_id: CustomerId,
        rental_id: String,
        tx: Sender<InternalEvent>,
    ) {
        let client = self.client.clone();
        thread::spawn(move || {
            let result = client
                .return_film(customer_id, &rental_id)
                .map_err(|error| error.to_string());
            send_command(&tx, AppCommand::FinishReturn {
                customer_id,
                result,
            });
        });
    }

    fn spawn_edit(
        &mut self,
        customer_id: CustomerId,
        update: CustomerUpdate,
        tx: Sender<InternalEvent>,
    ) {
        let client = self.client.clone();
        thread::spawn(move || {
            let result = client
                .edit_customer(customer_id, &update)
                .map_err(|error| error.to_string());
            send_command(&tx, AppCommand::FinishEdit {
                customer_id,
                update,
                result,
            });
        });
    }

    fn spawn_delete(&mut self, customer_id: CustomerId, tx: Sender<InternalEvent>) {
        let client = self.client.clone();
        thread::spawn(move || {
            let result = client
                .delete_customer(customer_id)
                .map_err(|error| error.to_string());
            send_command(&tx, AppCommand::FinishDelete {
                customer_id,
                result,
            });
        });
    }

    fn spawn_add_customer(
        &mut self,
        first_name: String,
        last_name: String,
        email: String,
        tx: Sender<InternalEvent>,
    ) {
        let client = self.client.clone();
        thread::spawn(move || {
            let result = client
                .add_customer(&first_name, &last_name, &email)
                .map_err(|error| error.to_string());
            send_command(&tx, AppCommand::FinishAddCustomer { result });
        });
    }
}
