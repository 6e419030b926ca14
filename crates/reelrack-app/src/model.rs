// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::ids::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TabKind {
    Landing,
    Films,
    Customers,
}

impl Default for TabKind {
    fn default() -> Self {
        Self::Landing
    }
}

impl TabKind {
    pub const ALL: [Self; 3] = [Self::Landing, Self::Films, Self::Customers];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Landing => "landing",
            Self::Films => "films",
            Self::Customers => "customers",
        }
    }
}

/// A catalog entry after normalization. Token sets are deduplicated;
/// insertion order is not preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Film {
    pub id: FilmId,
    pub title: String,
    pub categories: BTreeSet<String>,
    pub actors: BTreeSet<String>,
    pub available_copies: Option<i64>,
}

impl Film {
    pub fn availability_badge(&self) -> String {
        match self.available_copies {
            Some(0) => "Not available".to_owned(),
            Some(count) => format!("Availability: {count}"),
            None => "Availability: --".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub active: bool,
    pub active_rentals: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopFilm {
    pub id: FilmId,
    pub title: String,
    pub rental_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopActor {
    pub id: ActorId,
    pub name: String,
    pub movies: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FilmDetail {
    pub rating: Option<String>,
    pub release_year: Option<i64>,
    pub length: Option<i64>,
    pub description: Option<String>,
    pub language: Option<String>,
    pub rental_duration: Option<i64>,
    pub rental_rate: Option<f64>,
    pub replacement_cost: Option<f64>,
}

impl FilmDetail {
    /// Label/value pairs for the expanded detail panel, with "N/A"
    /// standing in for absent fields.
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        fn or_na<T: ToString>(value: &Option<T>) -> String {
            value
                .as_ref()
                .map_or_else(|| "N/A".to_owned(), ToString::to_string)
        }

        vec![
            ("Rating", or_na(&self.rating)),
            ("Release Year", or_na(&self.release_year)),
            ("Length", format!("{} min", or_na(&self.length))),
            ("Description", or_na(&self.description)),
            ("Language", or_na(&self.language)),
            (
                "Rental Duration",
                format!("{} days", or_na(&self.rental_duration)),
            ),
            ("Rental Rate", format!("${}", or_na(&self.rental_rate))),
            (
                "Replacement Cost",
                format!("${}", or_na(&self.replacement_cost)),
            ),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ActorDetail {
    pub films: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetail {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub active: bool,
    pub active_rentals: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::{Film, FilmDetail, TabKind};
    use crate::ids::FilmId;
    use std::collections::BTreeSet;

    fn film(available: Option<i64>) -> Film {
        Film {
            id: FilmId::new(1),
            title: "Alien Center".to_owned(),
            categories: BTreeSet::new(),
            actors: BTreeSet::new(),
            available_copies: available,
        }
    }

    #[test]
    fn availability_badge_variants() {
        assert_eq!(film(Some(0)).availability_badge(), "Not available");
        assert_eq!(film(Some(3)).availability_badge(), "Availability: 3");
        assert_eq!(film(None).availability_badge(), "Availability: --");
    }

    #[test]
    fn film_detail_attributes_fall_back_to_na() {
        let attributes = FilmDetail::default().attributes();
        assert_eq!(attributes[0], ("Rating", "N/A".to_owned()));
        assert_eq!(attributes[2], ("Length", "N/A min".to_owned()));
        assert_eq!(attributes[6], ("Rental Rate", "$N/A".to_owned()));
    }

    #[test]
    fn film_detail_attributes_render_values() {
        let detail = FilmDetail {
            rating: Some("PG".to_owned()),
            release_year: Some(2006),
            length: Some(110),
            rental_rate: Some(4.99),
            ..FilmDetail::default()
        };
        let attributes = detail.attributes();
        assert_eq!(attributes[0].1, "PG");
        assert_eq!(attributes[1].1, "2006");
        assert_eq!(attributes[2].1, "110 min");
        assert_eq!(attributes[6].1, "$4.99");
    }

    #[test]
    fn tab_labels_are_stable() {
        assert_eq!(TabKind::Landing.label(), "landing");
        assert_eq!(TabKind::ALL.len(), 3);
    }
}
