// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use time::OffsetDateTime;
use url::Url;

use reelrack_app::{
    ActorDetail, ActorId, Customer, CustomerDetail, CustomerId, CustomerUpdate, FilmDetail,
    FilmId, RawFilmRow, RentLookup, TopActor, TopFilm,
};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000/api";

/// Blocking client for the rental data service. Cheap to clone; worker
/// threads each hold their own copy.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            bail!("api.base_url must not be empty");
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            timeout,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn all_customers(&self) -> Result<Vec<Customer>> {
        let rows: Vec<CustomerRow> = self.get_json(self.endpoint("allcustomers", &[])?)?;
        Ok(rows.into_iter().map(CustomerRow::into_customer).collect())
    }

    pub fn search_customers(&self, term: &str) -> Result<Vec<Customer>> {
        let url = self.endpoint("searchcustomers", &[("search", term)])?;
        let rows: Vec<CustomerRow> = self.get_json(url)?;
        Ok(rows.into_iter().map(CustomerRow::into_customer).collect())
    }

    pub fn add_customer(&self, first_name: &str, last_name: &str, email: &str) -> Result<String> {
        let body = serde_json::json!({
            "first_name": first_name,
            "last_name": last_name,
            "email": email,
        });
        let response = self
            .http
            .post(format!("{}/addcustomer", self.base_url))
            .json(&body)
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;
        self.success_message(response, "Customer added.")
    }

    pub fn edit_customer(&self, customer_id: CustomerId, update: &CustomerUpdate) -> Result<String> {
        let body = serde_json::json!({
            "customer_id": customer_id,
            "first_name": update.first_name,
            "last_name": update.last_name,
            "email": update.email,
        });
        let response = self
            .http
            .put(format!("{}/editcustomer", self.base_url))
            .json(&body)
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;
        self.success_message(response, "Customer updated.")
    }

    pub fn delete_customer(&self, customer_id: CustomerId) -> Result<String> {
        let url = self.endpoint(
            "deletecustomer",
            &[("customer_id", &customer_id.get().to_string())],
        )?;
        let response = self
            .http
            .put(url)
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;
        self.success_message(response, "Customer deleted.")
    }

    /// None when the service reports no such customer (empty array body).
    pub fn customer_detail(&self, customer_id: CustomerId) -> Result<Option<CustomerDetail>> {
        let url = self.endpoint(
            "get_customerdetails",
            &[("customer_id", &customer_id.get().to_string())],
        )?;
        let value: Value = self.get_json(url)?;
        let Some(row) = one_or_first(value) else {
            return Ok(None);
        };
        let row: CustomerDetailRow =
            serde_json::from_value(row).context("decode customer detail")?;
        Ok(Some(row.into_detail()))
    }

    pub fn return_film(&self, customer_id: CustomerId, rental_id: &str) -> Result<String> {
        let body = serde_json::json!({
            "customer_id": customer_id,
            "rental_id": rental_id,
        });
        let response = self
            .http
            .put(format!("{}/returnfilm", self.base_url))
            .json(&body)
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;
        self.success_message(response, "Film returned.")
    }

    pub fn top_rented_films(&self) -> Result<Vec<TopFilm>> {
        let rows: Vec<TopFilmRow> = self.get_json(self.endpoint("top5rented", &[])?)?;
        Ok(rows.into_iter().map(TopFilmRow::into_top_film).collect())
    }

    pub fn top_actors(&self) -> Result<Vec<TopActor>> {
        let rows: Vec<TopActorRow> = self.get_json(self.endpoint("top5actors", &[])?)?;
        Ok(rows.into_iter().map(TopActorRow::into_top_actor).collect())
    }

    /// None when no filmography rows come back. The service serves these
    /// rows in two shapes: objects with a `title` field, or positional
    /// arrays with the title at index 3.
    pub fn actor_detail(&self, actor_id: ActorId) -> Result<Option<ActorDetail>> {
        let url = self.endpoint(
            "get_actordetails",
            &[("actor_id", &actor_id.get().to_string())],
        )?;
        let value: Value = self.get_json(url)?;
        let rows = match value {
            Value::Array(rows) => rows,
            Value::Null => Vec::new(),
            other => vec![other],
        };
        let films = actor_film_titles(&rows);
        if films.is_empty() {
            return Ok(None);
        }
        Ok(Some(ActorDetail { films }))
    }

    /// None when the service has no detail row for the film. The body may
    /// be a bare object or a one-element array.
    pub fn film_detail(&self, film_id: FilmId) -> Result<Option<FilmDetail>> {
        let url = self.endpoint("get_filmdetails", &[("film_id", &film_id.get().to_string())])?;
        let value: Value = self.get_json(url)?;
        let Some(row) = one_or_first(value) else {
            return Ok(None);
        };
        let detail: FilmDetail = serde_json::from_value(row).context("decode film detail")?;
        Ok(Some(detail))
    }

    pub fn search_films(&self, term: &str) -> Result<Vec<RawFilmRow>> {
        let url = self.endpoint("searchfilms", &[("search", term)])?;
        self.get_json(url)
    }

    pub fn rent_film(
        &self,
        film_id: FilmId,
        lookup: &RentLookup,
        rental_date: &str,
    ) -> Result<String> {
        let mut body = serde_json::json!({
            "film_id": film_id,
            "rental_date": rental_date,
        });
        let object = body
            .as_object_mut()
            .ok_or_else(|| anyhow!("rent payload must be an object"))?;
        match lookup {
            RentLookup::ById(customer_id) => {
                object.insert("customer_id".to_owned(), Value::String(customer_id.clone()));
            }
            RentLookup::ByName { first, last } => {
                object.insert("first_name".to_owned(), Value::String(first.clone()));
                object.insert("last_name".to_owned(), Value::String(last.clone()));
            }
        }

        let response = self
            .http
            .put(format!("{}/rentfilm", self.base_url))
            .json(&body)
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;
        self.success_message(response, "Successfully rented.")
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/{path}", self.base_url))
            .with_context(|| format!("build url for {path}"))?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        Ok(url)
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T> {
        let path = url.path().to_owned();
        let response = self
            .http
            .get(url)
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        response
            .json()
            .with_context(|| format!("decode response from {path}"))
    }

    fn success_message(
        &self,
        response: reqwest::blocking::Response,
        fallback: &str,
    ) -> Result<String> {
        let status = response.status();
        let body = response.text().unwrap_or_default();
        if !status.is_success() {
            return Err(clean_error_response(status, &body));
        }

        let message = serde_json::from_str::<MessageEnvelope>(&body)
            .ok()
            .and_then(|envelope| envelope.message)
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| fallback.to_owned());
        Ok(message)
    }
}

/// Default film list rows synthesized from the top-rented ranking; they
/// carry no category/actor/availability data.
pub fn rows_from_top_films(films: &[TopFilm]) -> Vec<RawFilmRow> {
    films
        .iter()
        .map(|film| RawFilmRow {
            film_id: film.id.get(),
            title: film.title.clone(),
            categories: None,
            category: None,
            actors: None,
            available_copies: None,
        })
        .collect()
}

/// Rental timestamp in the service's `YYYY-MM-DD HH:MM:SS` format.
pub fn format_rental_date(now: OffsetDateTime) -> Result<String> {
    now.format(&time::macros::format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second]"
    ))
    .context("format rental date")
}

fn actor_film_titles(rows: &[Value]) -> Vec<String> {
    rows.iter()
        .filter_map(|row| match row {
            Value::Object(object) => object
                .get("title")
                .and_then(Value::as_str)
                .map(str::to_owned),
            Value::Array(fields) => fields
                .get(3)
                .and_then(Value::as_str)
                .map(str::to_owned),
            _ => None,
        })
        .filter(|title| !title.trim().is_empty())
        .collect()
}

fn one_or_first(value: Value) -> Option<Value> {
    match value {
        Value::Array(mut rows) => {
            if rows.is_empty() {
                None
            } else {
                Some(rows.remove(0))
            }
        }
        Value::Null => None,
        other => Some(other),
    }
}

fn connection_error(base_url: &str, error: reqwest::Error) -> anyhow::Error {
    anyhow!(
        "cannot reach {} -- is the rental API running? ({} )",
        base_url,
        error
    )
}

fn clean_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    if let Ok(parsed) = serde_json::from_str::<ErrorEnvelope>(body) {
        if let Some(error) = parsed.error.filter(|error| !error.is_empty()) {
            return anyhow!("server error ({}): {}", status.as_u16(), error);
        }
        if let Some(message) = parsed.message.filter(|message| !message.is_empty()) {
            return anyhow!("server error ({}): {}", status.as_u16(), message);
        }
    }

    if body.len() < 100 && !body.contains('{') && !body.trim().is_empty() {
        return anyhow!("server error ({}): {}", status.as_u16(), body.trim());
    }

    anyhow!("server returned {}", status.as_u16())
}

#[derive(Debug, Deserialize)]
struct CustomerRow {
    customer_id: i64,
    first_name: String,
    last_name: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    active: Option<ActiveFlag>,
    #[serde(default)]
    active_rentals: Option<i64>,
}

impl CustomerRow {
    fn into_customer(self) -> Customer {
        Customer {
            id: CustomerId::new(self.customer_id),
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email.unwrap_or_default(),
            active: self.active.is_none_or(ActiveFlag::as_bool),
            active_rentals: self.active_rentals,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CustomerDetailRow {
    customer_id: i64,
    first_name: String,
    last_name: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    active: Option<ActiveFlag>,
    #[serde(default)]
    active_rentals: Option<i64>,
}

impl CustomerDetailRow {
    fn into_detail(self) -> CustomerDetail {
        CustomerDetail {
            id: CustomerId::new(self.customer_id),
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email.unwrap_or_default(),
            active: self.active.is_none_or(ActiveFlag::as_bool),
            active_rentals: self.active_rentals,
        }
    }
}

/// The service encodes the active flag as a bool or a 0/1 integer
/// depending on the endpoint.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
enum ActiveFlag {
    Bool(bool),
    Int(i64),
}

impl ActiveFlag {
    fn as_bool(self) -> bool {
        match self {
            Self::Bool(value) => value,
            Self::Int(value) => value != 0,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TopFilmRow {
    film_id: i64,
    title: String,
    #[serde(default)]
    rental_count: i64,
}

impl TopFilmRow {
    fn into_top_film(self) -> TopFilm {
        TopFilm {
            id: FilmId::new(self.film_id),
            title: self.title,
            rental_count: self.rental_count,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TopActorRow {
    actor_id: i64,
    name: String,
    #[serde(default)]
    movies: i64,
}

impl TopActorRow {
    fn into_top_actor(self) -> TopActor {
        TopActor {
            id: ActorId::new(self.actor_id),
            name: self.name,
            movies: self.movies,
        }
    }
}

#[derive(Debug, Deserialize)]
struct MessageEnvelope {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<String>,
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{
        actor_film_titles, clean_error_response, format_rental_date, one_or_first,
        rows_from_top_films,
    };
    use reelrack_app::{FilmId, TopFilm};
    use reqwest::StatusCode;
    use serde_json::json;
    use time::macros::datetime;

    #[test]
    fn one_or_first_unwraps_single_element_arrays() {
        assert_eq!(
            one_or_first(json!([{"rating": "PG"}])),
            Some(json!({"rating": "PG"})),
        );
        assert_eq!(one_or_first(json!({"rating": "R"})), Some(json!({"rating": "R"})));
        assert_eq!(one_or_first(json!([])), None);
        assert_eq!(one_or_first(serde_json::Value::Null), None);
    }

    #[test]
    fn actor_titles_come_from_objects_or_positional_rows() {
        let rows = vec![
            json!({"title": "Academy Dinosaur"}),
            json!([1, 2, 3, "Alamo Videotape", 5]),
            json!({"title": "   "}),
            json!([1, 2, 3]),
            json!(42),
        ];
        assert_eq!(
            actor_film_titles(&rows),
            vec!["Academy Dinosaur".to_owned(), "Alamo Videotape".to_owned()],
        );
    }

    #[test]
    fn error_envelope_prefers_error_key() {
        let error = clean_error_response(
            StatusCode::BAD_REQUEST,
            r#"{"error":"Customer not found","message":"ignored"}"#,
        );
        assert_eq!(error.to_string(), "server error (400): Customer not found");

        let error =
            clean_error_response(StatusCode::NOT_FOUND, r#"{"message":"No such rental"}"#);
        assert_eq!(error.to_string(), "server error (404): No such rental");

        let error = clean_error_response(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(error.to_string(), "server error (502): upstream down");

        let error = clean_error_response(StatusCode::INTERNAL_SERVER_ERROR, "{\"odd\": true}");
        assert_eq!(error.to_string(), "server returned 500");
    }

    #[test]
    fn rental_date_uses_the_service_format() {
        let formatted =
            format_rental_date(datetime!(2026-02-19 12:34:56 UTC)).expect("formats");
        assert_eq!(formatted, "2026-02-19 12:34:56");
    }

    #[test]
    fn top_film_rows_have_no_catalog_fields() {
        let rows = rows_from_top_films(&[TopFilm {
            id: FilmId::new(7),
            title: "Airplane Sierra".to_owned(),
            rental_count: 33,
        }]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].film_id, 7);
        assert!(rows[0].categories.is_none());
        assert!(rows[0].available_copies.is_none());
    }
}
