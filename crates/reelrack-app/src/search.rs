// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::model::Film;

pub const NO_MATCH_LABEL: &str = "No match context";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    pub title: bool,
    pub actor: bool,
    pub genre: bool,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            title: true,
            actor: true,
            genre: true,
        }
    }
}

impl SearchFilters {
    pub const fn any_enabled(self) -> bool {
        self.title || self.actor || self.genre
    }
}

/// Guard evaluated before a search submission hits the data service.
pub fn validate_search(filters: SearchFilters) -> Result<()> {
    if !filters.any_enabled() {
        bail!("Select at least one search filter: title, actor, or genre.");
    }
    Ok(())
}

/// One context per enabled field whose value contains the trimmed,
/// case-insensitive term. An empty term produces no contexts.
pub fn match_contexts(film: &Film, term: &str, filters: SearchFilters) -> Vec<String> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return Vec::new();
    }

    let mut contexts = Vec::new();

    if filters.title && film.title.to_lowercase().contains(&term) {
        contexts.push(format!("Title: {}", film.title));
    }

    if filters.actor
        && let Some(actor) = film
            .actors
            .iter()
            .find(|name| name.to_lowercase().contains(&term))
    {
        contexts.push(format!("Actor: {actor}"));
    }

    if filters.genre
        && let Some(genre) = film
            .categories
            .iter()
            .find(|name| name.to_lowercase().contains(&term))
    {
        contexts.push(format!("Genre: {genre}"));
    }

    contexts
}

/// Picks one context by fixed precedence: actor, then genre, then title,
/// then whatever came first.
pub fn primary_match_label(film: &Film, term: &str, filters: SearchFilters) -> String {
    let contexts = match_contexts(film, term, filters);
    if contexts.is_empty() {
        return NO_MATCH_LABEL.to_owned();
    }

    if let Some(actor) = contexts.iter().find(|c| c.starts_with("Actor:")) {
        return actor.replacen("Actor:", "Actors:", 1);
    }
    if let Some(genre) = contexts.iter().find(|c| c.starts_with("Genre:")) {
        return genre.clone();
    }
    if let Some(title) = contexts.iter().find(|c| c.starts_with("Title:")) {
        return title.clone();
    }

    contexts[0].clone()
}

/// Keeps the films with at least one match context. An empty term returns
/// the input unchanged.
pub fn filter_films(films: &[Film], term: &str, filters: SearchFilters) -> Vec<Film> {
    if term.trim().is_empty() {
        return films.to_vec();
    }

    films
        .iter()
        .filter(|film| !match_contexts(film, term, filters).is_empty())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{
        NO_MATCH_LABEL, SearchFilters, filter_films, match_contexts, primary_match_label,
        validate_search,
    };
    use crate::ids::FilmId;
    use crate::model::Film;
    use std::collections::BTreeSet;

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| (*v).to_owned()).collect()
    }

    fn sample_film(id: i64, title: &str, actors: &[&str], categories: &[&str]) -> Film {
        Film {
            id: FilmId::new(id),
            title: title.to_owned(),
            categories: set(categories),
            actors: set(actors),
            available_copies: Some(1),
        }
    }

    #[test]
    fn zero_enabled_filters_fail_validation() {
        let none = SearchFilters {
            title: false,
            actor: false,
            genre: false,
        };
        let error = validate_search(none).expect_err("no filters should fail");
        assert!(error.to_string().contains("at least one search filter"));
        assert!(validate_search(SearchFilters::default()).is_ok());
    }

    #[test]
    fn empty_term_returns_input_unchanged() {
        let films = vec![sample_film(1, "Alamo Videotape", &[], &[])];
        assert_eq!(filter_films(&films, "   ", SearchFilters::default()), films);
    }

    #[test]
    fn contexts_are_scoped_to_enabled_fields() {
        let film = sample_film(
            1,
            "Smith Chronicles",
            &["Grace Smith"],
            &["Documentary"],
        );
        let title_only = SearchFilters {
            title: true,
            actor: false,
            genre: false,
        };
        let contexts = match_contexts(&film, "smith", title_only);
        assert_eq!(contexts, vec!["Title: Smith Chronicles".to_owned()]);
    }

    #[test]
    fn actor_filter_matches_case_insensitive_substring() {
        let films = vec![
            sample_film(1, "Alpha", &["Sandra Smith"], &["Action"]),
            sample_film(2, "Beta", &["Tom Hardy"], &["Action"]),
        ];
        let actor_only = SearchFilters {
            title: false,
            actor: true,
            genre: false,
        };

        let matched = filter_films(&films, "SMITH", actor_only);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, FilmId::new(1));
        assert_eq!(
            primary_match_label(&matched[0], "SMITH", actor_only),
            "Actors: Sandra Smith"
        );
    }

    #[test]
    fn primary_label_precedence_is_actor_genre_title() {
        let film = sample_film(3, "Drama Queen", &["Dan Drama"], &["Drama"]);
        let all = SearchFilters::default();

        assert_eq!(primary_match_label(&film, "drama", all), "Actors: Dan Drama");

        let no_actor = SearchFilters {
            actor: false,
            ..all
        };
        assert_eq!(primary_match_label(&film, "drama", no_actor), "Genre: Drama");

        let title_only = SearchFilters {
            title: true,
            actor: false,
            genre: false,
        };
        assert_eq!(
            primary_match_label(&film, "drama", title_only),
            "Title: Drama Queen"
        );
    }

    #[test]
    fn no_context_yields_sentinel_label() {
        let film = sample_film(4, "Quiet", &[], &[]);
        assert_eq!(
            primary_match_label(&film, "", SearchFilters::default()),
            NO_MATCH_LABEL
        );
        assert_eq!(
            primary_match_label(&film, "zzz", SearchFilters::default()),
            NO_MATCH_LABEL
        );
    }

    #[test]
    fn filtered_output_is_subset_with_contexts() {
        let films = vec![
            sample_film(1, "Alpha Smith", &[], &[]),
            sample_film(2, "Beta", &["Jo Smith"], &[]),
            sample_film(3, "Gamma", &[], &["Smithsonian"]),
            sample_film(4, "Delta", &[], &[]),
        ];
        let all = SearchFilters::default();
        let matched = filter_films(&films, "smith", all);
        assert_eq!(matched.len(), 3);
        for film in &matched {
            assert!(films.contains(film));
            assert!(!match_contexts(film, "smith", all).is_empty());
        }
    }
}
