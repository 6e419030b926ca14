// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::collections::HashMap;

use crate::ids::FilmId;
use crate::model::Film;

/// A catalog row as served by the data service. Multi-value fields arrive
/// as one comma-separated string, under either `categories` or the older
/// `category` name; the availability count may be a number or a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFilmRow {
    pub film_id: i64,
    pub title: String,
    #[serde(default)]
    pub categories: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub actors: Option<String>,
    #[serde(default)]
    pub available_copies: Option<RawCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCount {
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawCount {
    /// The finite numeric value, if there is one. Non-numeric text and
    /// non-finite floats yield None, which keeps any prior value.
    pub fn as_finite(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            Self::Float(value) if value.is_finite() => Some(*value as i64),
            Self::Float(_) => None,
            Self::Text(value) => {
                let parsed: f64 = value.trim().parse().ok()?;
                parsed.is_finite().then_some(parsed as i64)
            }
        }
    }
}

pub fn split_csv_values(value: Option<&str>) -> BTreeSet<String> {
    let Some(value) = value else {
        return BTreeSet::new();
    };
    value
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Collapses raw rows into one [`Film`] per id. Duplicate rows for an id
/// union their category/actor tokens; the availability count is replaced
/// only when the incoming value parses as a finite number.
pub fn normalize_films(rows: &[RawFilmRow]) -> Vec<Film> {
    let mut films: Vec<Film> = Vec::new();
    let mut index_by_id: HashMap<FilmId, usize> = HashMap::new();

    for row in rows {
        let id = FilmId::new(row.film_id);
        let categories =
            split_csv_values(row.categories.as_deref().or(row.category.as_deref()));
        let actors = split_csv_values(row.actors.as_deref());
        let incoming_copies = row.available_copies.as_ref().and_then(RawCount::as_finite);

        match index_by_id.get(&id) {
            Some(&index) => {
                let film = &mut films[index];
                film.categories.extend(categories);
                film.actors.extend(actors);
                if incoming_copies.is_some() {
                    film.available_copies = incoming_copies;
                }
            }
            None => {
                index_by_id.insert(id, films.len());
                films.push(Film {
                    id,
                    title: row.title.clone(),
                    categories,
                    actors,
                    available_copies: incoming_copies,
                });
            }
        }
    }

    films
}

/// Re-encodes a normalized film as a raw row. Used to show that
/// normalization is idempotent: a normalized list survives a second pass.
pub fn raw_row_from_film(film: &Film) -> RawFilmRow {
    let join = |tokens: &BTreeSet<String>| -> Option<String> {
        (!tokens.is_empty()).then(|| tokens.iter().cloned().collect::<Vec<_>>().join(", "))
    };
    RawFilmRow {
        film_id: film.id.get(),
        title: film.title.clone(),
        categories: join(&film.categories),
        category: None,
        actors: join(&film.actors),
        available_copies: film.available_copies.map(RawCount::Int),
    }
}
