// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use reelrack_api::Client;
use reelrack_app::{ActorId, CustomerId, FilmId, RentLookup, normalize_films};
use std::io::Read;
use std::thread;
use std::time::Duration;
use tiny_http::{Header, Response, Server};

fn json_response(body: &str) -> Response<std::io::Cursor<Vec<u8>>> {
    Response::from_string(body)
        .with_status_code(200)
        .with_header(
            Header::from_bytes("Content-Type", "application/json")
                .expect("valid content type header"),
        )
}

#[test]
fn connection_error_names_the_endpoint() {
    let client =
        Client::new("http://127.0.0.1:1/api", Duration::from_millis(50)).expect("client builds");
    let error = client
        .all_customers()
        .expect_err("unreachable endpoint must fail");
    assert!(error.to_string().contains("is the rental API running?"));
}

#[test]
fn search_films_encodes_term_and_decodes_rows() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}/api", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(request.url(), "/api/searchfilms?search=space+oddity");
        let body = r#"[
            {"film_id": 1, "title": "Space Oddity", "categories": "Sci-Fi, Drama",
             "actors": "Grace Smith", "available_copies": "3"},
            {"film_id": 1, "title": "Space Oddity", "actors": "Jo Chase"}
        ]"#;
        request.respond(json_response(body)).expect("respond");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let rows = client.search_films("space oddity")?;
    assert_eq!(rows.len(), 2);

    let films = normalize_films(&rows);
    assert_eq!(films.len(), 1);
    assert_eq!(films[0].id, FilmId::new(1));
    assert_eq!(films[0].actors.len(), 2);
    assert_eq!(films[0].available_copies, Some(3));

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn film_detail_accepts_object_or_single_element_array() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}/api", server.server_addr());

    let handle = thread::spawn(move || {
        let bodies = [
            r#"[{"rating": "PG", "release_year": 2006, "length": 110}]"#,
            r#"{"rating": "R", "length": 95}"#,
            r#"[]"#,
        ];
        for body in bodies {
            let request = server.recv().expect("request expected");
            assert!(request.url().starts_with("/api/get_filmdetails?film_id="));
            request.respond(json_response(body)).expect("respond");
        }
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;

    let detail = client.film_detail(FilmId::new(1))?.expect("detail exists");
    assert_eq!(detail.rating.as_deref(), Some("PG"));
    assert_eq!(detail.release_year, Some(2006));

    let detail = client.film_detail(FilmId::new(2))?.expect("detail exists");
    assert_eq!(detail.rating.as_deref(), Some("R"));

    assert!(client.film_detail(FilmId::new(3))?.is_none());

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn actor_detail_reads_both_row_shapes() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}/api", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(request.url(), "/api/get_actordetails?actor_id=9");
        let body = r#"[
            {"title": "Academy Dinosaur"},
            [9, "Grace", "Smith", "Alamo Videotape"]
        ]"#;
        request.respond(json_response(body)).expect("respond");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let detail = client.actor_detail(ActorId::new(9))?.expect("detail exists");
    assert_eq!(
        detail.films,
        vec!["Academy Dinosaur".to_owned(), "Alamo Videotape".to_owned()],
    );

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn rent_film_sends_lookup_fields_and_reads_message() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}/api", server.server_addr());

    let handle = thread::spawn(move || {
        let mut request = server.recv().expect("request expected");
        assert_eq!(request.url(), "/api/rentfilm");
        assert_eq!(request.method().as_str(), "PUT");

        let mut body = String::new();
        request
            .as_reader()
            .read_to_string(&mut body)
            .expect("read body");
        let payload: serde_json::Value = serde_json::from_str(&body).expect("json body");
        assert_eq!(payload["film_id"], 7);
        assert_eq!(payload["customer_id"], "42");
        assert_eq!(payload["rental_date"], "2026-02-19 12:34:56");

        request
            .respond(json_response(r#"{"message": "Film rented to customer 42."}"#))
            .expect("respond");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let message = client.rent_film(
        FilmId::new(7),
        &RentLookup::ById("42".to_owned()),
        "2026-02-19 12:34:56",
    )?;
    assert_eq!(message, "Film rented to customer 42.");

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn mutation_without_message_body_falls_back() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}/api", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(request.url(), "/api/deletecustomer?customer_id=5");
        request.respond(json_response("{}")).expect("respond");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let message = client.delete_customer(CustomerId::new(5))?;
    assert_eq!(message, "Customer deleted.");

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn server_error_envelope_is_surfaced() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}/api", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        let response = Response::from_string(r#"{"error": "No available copies."}"#)
            .with_status_code(409)
            .with_header(
                Header::from_bytes("Content-Type", "application/json")
                    .expect("valid content type header"),
            );
        request.respond(response).expect("respond");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let error = client
        .rent_film(
            FilmId::new(1),
            &RentLookup::ByName {
                first: "Mary".to_owned(),
                last: "Smith".to_owned(),
            },
            "2026-02-19 12:34:56",
        )
        .expect_err("conflict must fail");
    assert_eq!(error.to_string(), "server error (409): No available copies.");

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn customer_roster_decodes_numeric_active_flag() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}/api", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(request.url(), "/api/allcustomers");
        let body = r#"[
            {"customer_id": 1, "first_name": "Mary", "last_name": "Smith",
             "email": "mary@example.com", "active": 1, "active_rentals": 2},
            {"customer_id": 2, "first_name": "Jo", "last_name": "Chase",
             "email": "jo@example.com", "active": false}
        ]"#;
        request.respond(json_response(body)).expect("respond");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let customers = client.all_customers()?;
    assert_eq!(customers.len(), 2);
    assert!(customers[0].active);
    assert_eq!(customers[0].active_rentals, Some(2));
    assert!(!customers[1].active);
    assert_eq!(customers[1].active_rentals, None);

    handle.join().expect("server thread should join");
    Ok(())
}
