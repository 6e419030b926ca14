// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use reelrack_app::{
    ActorDetail, ActorId, Customer, CustomerDetail, CustomerId, Film, FilmDetail, FilmId,
    RawCount, RawFilmRow, TopActor, TopFilm, normalize_films,
};
use serde_json::{Value, json};
use std::collections::BTreeSet;

const FILM_ADJECTIVES: [&str; 14] = [
    "Academy", "Airplane", "Alamo", "Amber", "Bright", "Crimson", "Desert", "Electric", "Frozen",
    "Golden", "Midnight", "Quiet", "Rusty", "Silver",
];
const FILM_NOUNS: [&str; 14] = [
    "Dinosaur", "Sierra", "Videotape", "Harbor", "Chronicles", "Holiday", "Lantern", "Monsoon",
    "Orchard", "Parade", "Quartet", "Station", "Voyage", "Window",
];
const GENRES: [&str; 10] = [
    "Action",
    "Animation",
    "Comedy",
    "Documentary",
    "Drama",
    "Family",
    "Horror",
    "Music",
    "Sci-Fi",
    "Travel",
];
const FIRST_NAMES: [&str; 16] = [
    "Penelope", "Nick", "Ed", "Jennifer", "Johnny", "Bette", "Grace", "Joe", "Christian", "Zero",
    "Karl", "Uma", "Woody", "Spencer", "Sandra", "Judy",
];
const LAST_NAMES: [&str; 16] = [
    "Guiness",
    "Wahlberg",
    "Chase",
    "Davis",
    "Lollobrigida",
    "Nicholson",
    "Mostel",
    "Swank",
    "Gable",
    "Cage",
    "Berry",
    "Wood",
    "Hoffman",
    "Depp",
    "Kilmer",
    "Dean",
];
const EMAIL_DOMAINS: [&str; 4] = [
    "example.com",
    "mail.example.org",
    "inbox.example.net",
    "post.example.io",
];
const RATINGS: [&str; 5] = ["G", "PG", "PG-13", "R", "NC-17"];
const LANGUAGES: [&str; 4] = ["English", "Italian", "Japanese", "French"];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0xD1B5_4A32_D192_ED03;
        if state == 0 {
            state = 0x8CB9_2BA7_2F3D_8DD7;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// Deterministic fixture builder for the storefront domain. The same seed
/// always produces the same catalog, roster, and detail payloads.
#[derive(Debug, Clone)]
pub struct StoreFaker {
    rng: DeterministicRng,
}

impl StoreFaker {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: DeterministicRng::new(if seed == 0 { 1 } else { seed }),
        }
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn film(&mut self, id: i64) -> Film {
        let title = self.film_title();
        let genre_count = 1 + self.rng.int_n(2);
        let categories = self.pick_set(&GENRES, genre_count);
        let actors: BTreeSet<String> = (0..1 + self.rng.int_n(3))
            .map(|_| self.person_name())
            .collect();
        Film {
            id: FilmId::new(id),
            title,
            categories,
            actors,
            available_copies: self.rng.bool().then(|| self.int_range(0, 8)),
        }
    }

    pub fn films(&mut self, count: usize) -> Vec<Film> {
        (1..=count as i64).map(|id| self.film(id)).collect()
    }

    /// A raw catalog row the way the data service serves it: multi-value
    /// fields joined with commas, the count sometimes arriving as text,
    /// and genres sometimes under the legacy `category` name.
    pub fn raw_film_row(&mut self, id: i64) -> RawFilmRow {
        let film = self.film(id);
        self.raw_rows_for(&film).remove(0)
    }

    /// Splits one film over multiple raw rows sharing its id, the shape a
    /// join-backed endpoint produces. Normalizing the rows reassembles the
    /// film.
    pub fn raw_rows_for(&mut self, film: &Film) -> Vec<RawFilmRow> {
        let join = |tokens: &BTreeSet<String>| -> Option<String> {
            (!tokens.is_empty()).then(|| tokens.iter().cloned().collect::<Vec<_>>().join(", "))
        };
        let count = film.available_copies.map(|copies| {
            if self.rng.bool() {
                RawCount::Int(copies)
            } else {
                RawCount::Text(copies.to_string())
            }
        });

        let mut first = RawFilmRow {
            film_id: film.id.get(),
            title: film.title.clone(),
            categories: join(&film.categories),
            category: None,
            actors: join(&film.actors),
            available_copies: count,
        };
        if self.rng.bool() {
            first.category = first.categories.take();
        }

        if film.actors.len() < 2 || self.rng.bool() {
            return vec![first];
        }

        // Split the actor list over a duplicate row.
        let actors: Vec<String> = film.actors.iter().cloned().collect();
        let (head, tail) = actors.split_at(actors.len() / 2);
        first.actors = Some(head.join(", "));
        let second = RawFilmRow {
            actors: Some(tail.join(", ")),
            available_copies: None,
            ..first.clone()
        };
        vec![first, second]
    }

    pub fn catalog_rows(&mut self, count: usize) -> Vec<RawFilmRow> {
        let films = self.films(count);
        films
            .iter()
            .flat_map(|film| self.raw_rows_for(film))
            .collect()
    }

    pub fn customer(&mut self, id: i64) -> Customer {
        let first = self.pick(&FIRST_NAMES).to_owned();
        let last = self.pick(&LAST_NAMES).to_owned();
        let domain = self.pick(&EMAIL_DOMAINS);
        Customer {
            email: format!(
                "{}.{}{id}@{domain}",
                first.to_ascii_lowercase(),
                last.to_ascii_lowercase(),
            ),
            first_name: first,
            last_name: last,
            id: CustomerId::new(id),
            active: self.rng.int_n(10) != 0,
            active_rentals: self.rng.bool().then(|| self.int_range(0, 5)),
        }
    }

    pub fn roster(&mut self, count: usize) -> Vec<Customer> {
        (1..=count as i64).map(|id| self.customer(id)).collect()
    }

    pub fn film_detail(&mut self) -> FilmDetail {
        FilmDetail {
            rating: Some(self.pick(&RATINGS).to_owned()),
            release_year: Some(self.int_range(1990, 2026)),
            length: Some(self.int_range(60, 180)),
            description: Some(format!(
                "A {} story about a {}.",
                self.pick(&GENRES).to_ascii_lowercase(),
                self.pick(&FILM_NOUNS).to_ascii_lowercase(),
            )),
            language: Some(self.pick(&LANGUAGES).to_owned()),
            rental_duration: Some(self.int_range(3, 7)),
            rental_rate: Some(self.int_range(99, 499) as f64 / 100.0),
            replacement_cost: Some(self.int_range(999, 2999) as f64 / 100.0),
        }
    }

    pub fn actor_detail(&mut self, film_count: usize) -> ActorDetail {
        ActorDetail {
            films: (0..film_count).map(|_| self.film_title()).collect(),
        }
    }

    pub fn customer_detail(&mut self, customer: &Customer) -> CustomerDetail {
        CustomerDetail {
            id: customer.id,
            first_name: customer.first_name.clone(),
            last_name: customer.last_name.clone(),
            email: customer.email.clone(),
            active: customer.active,
            active_rentals: Some(customer.active_rentals.unwrap_or(0)),
        }
    }

    pub fn top_films(&mut self, count: usize) -> Vec<TopFilm> {
        (1..=count as i64)
            .map(|rank| TopFilm {
                id: FilmId::new(rank),
                title: self.film_title(),
                rental_count: self.int_range(20, 90) - rank,
            })
            .collect()
    }

    pub fn top_actors(&mut self, count: usize) -> Vec<TopActor> {
        (1..=count as i64)
            .map(|rank| TopActor {
                id: ActorId::new(rank),
                name: self.person_name(),
                movies: self.int_range(10, 45) - rank,
            })
            .collect()
    }

    pub fn film_title(&mut self) -> String {
        format!("{} {}", self.pick(&FILM_ADJECTIVES), self.pick(&FILM_NOUNS))
    }

    pub fn person_name(&mut self) -> String {
        format!("{} {}", self.pick(&FIRST_NAMES), self.pick(&LAST_NAMES))
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    /// Draws until the set holds `count` distinct entries (capped at the
    /// pool size, which keeps the loop finite).
    fn pick_set(&mut self, items: &[&str], count: usize) -> BTreeSet<String> {
        let target = count.min(items.len());
        let mut picked = BTreeSet::new();
        while picked.len() < target {
            picked.insert(self.pick(items).to_owned());
        }
        picked
    }

    fn int_range(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = max - min + 1;
        min + (self.rng.next_u64() % (span as u64)) as i64
    }
}

/// JSON body for one raw catalog row, matching the data service's wire
/// shape field for field.
pub fn film_row_json(row: &RawFilmRow) -> Value {
    let mut body = json!({
        "film_id": row.film_id,
        "title": row.title,
    });
    let object = body.as_object_mut().expect("json object");
    if let Some(categories) = &row.categories {
        object.insert("categories".to_owned(), json!(categories));
    }
    if let Some(category) = &row.category {
        object.insert("category".to_owned(), json!(category));
    }
    if let Some(actors) = &row.actors {
        object.insert("actors".to_owned(), json!(actors));
    }
    match &row.available_copies {
        Some(RawCount::Int(count)) => {
            object.insert("available_copies".to_owned(), json!(count));
        }
        Some(RawCount::Float(count)) => {
            object.insert("available_copies".to_owned(), json!(count));
        }
        Some(RawCount::Text(count)) => {
            object.insert("available_copies".to_owned(), json!(count));
        }
        None => {}
    }
    body
}

pub fn customer_json(customer: &Customer) -> Value {
    json!({
        "customer_id": customer.id.get(),
        "first_name": customer.first_name,
        "last_name": customer.last_name,
        "email": customer.email,
        "active": i64::from(customer.active),
        "active_rentals": customer.active_rentals,
    })
}

/// Sanity check used by a few tests: rows produced for a film normalize
/// back into that film.
pub fn assert_rows_reassemble(film: &Film, rows: &[RawFilmRow]) {
    let films = normalize_films(rows);
    assert_eq!(films.len(), 1, "expected one film from {} rows", rows.len());
    assert_eq!(&films[0], film);
}

#[cfg(test)]
mod tests {
    use super::{StoreFaker, assert_rows_reassemble};

    #[test]
    fn same_seed_same_catalog() {
        let mut a = StoreFaker::new(7);
        let mut b = StoreFaker::new(7);
        assert_eq!(a.films(10), b.films(10));
        assert_eq!(a.roster(10), b.roster(10));
    }

    #[test]
    fn raw_rows_reassemble_into_their_film() {
        let mut faker = StoreFaker::new(11);
        for id in 1..=50 {
            let film = faker.film(id);
            let rows = faker.raw_rows_for(&film);
            assert_rows_reassemble(&film, &rows);
        }
    }

    #[test]
    fn film_token_sets_are_distinct_and_bounded() {
        let mut faker = StoreFaker::new(5);
        for id in 1..=30 {
            let film = faker.film(id);
            assert!((1..=2).contains(&film.categories.len()), "{film:?}");
            assert!((1..=3).contains(&film.actors.len()), "{film:?}");
            for genre in &film.categories {
                assert!(super::GENRES.contains(&genre.as_str()));
            }
        }
    }

    #[test]
    fn roster_ids_are_sequential() {
        let mut faker = StoreFaker::new(3);
        let roster = faker.roster(85);
        assert_eq!(roster.len(), 85);
        assert_eq!(roster[0].id.get(), 1);
        assert_eq!(roster[84].id.get(), 85);
    }
}
