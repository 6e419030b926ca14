// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::cache::DetailCache;
use crate::ids::{CustomerId, FilmId};
use crate::model::{Customer, CustomerDetail, Film};

/// Fields a successful edit submission writes back locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerUpdate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Decrements the film's availability after a confirmed rental. Counts
/// floor at zero, and an unknown count stays unknown rather than being
/// invented client-side. Returns true when a count actually changed.
pub fn apply_rent_success(films: &mut [Film], film_id: FilmId) -> bool {
    let Some(film) = films.iter_mut().find(|film| film.id == film_id) else {
        return false;
    };
    match film.available_copies {
        Some(count) if count > 0 => {
            film.available_copies = Some(count - 1);
            true
        }
        _ => false,
    }
}

/// Patches the roster row and any cached detail record after a confirmed
/// edit. Detail fields the form does not carry (active flag, rental count)
/// are left alone.
pub fn apply_edit_success(
    customers: &mut [Customer],
    details: &mut DetailCache<CustomerId, CustomerDetail>,
    customer_id: CustomerId,
    update: &CustomerUpdate,
) -> bool {
    let row = customers
        .iter_mut()
        .find(|customer| customer.id == customer_id);
    let found = row.is_some();
    if let Some(customer) = row {
        customer.first_name = update.first_name.clone();
        customer.last_name = update.last_name.clone();
        customer.email = update.email.clone();
    }

    details.patch(customer_id, |detail| {
        detail.first_name = update.first_name.clone();
        detail.last_name = update.last_name.clone();
        detail.email = update.email.clone();
    });

    found
}

/// Removes the roster row and purges its cached detail after a confirmed
/// delete. Returns true when a row was removed.
pub fn apply_delete_success(
    customers: &mut Vec<Customer>,
    details: &mut DetailCache<CustomerId, CustomerDetail>,
    customer_id: CustomerId,
) -> bool {
    let before = customers.len();
    customers.retain(|customer| customer.id != customer_id);
    details.invalidate(customer_id);
    customers.len() != before
}

#[cfg(test)]
mod tests {
    use super::{CustomerUpdate, apply_delete_success, apply_edit_success, apply_rent_success};
    use crate::cache::{DetailCache, DetailStatus};
    use crate::ids::{CustomerId, FilmId};
    use crate::model::{Customer, CustomerDetail, Film};
    use std::collections::BTreeSet;

    fn film(id: i64, available: Option<i64>) -> Film {
        Film {
            id: FilmId::new(id),
            title: format!("Film {id}"),
            categories: BTreeSet::new(),
            actors: BTreeSet::new(),
            available_copies: available,
        }
    }

    fn customer(id: i64) -> Customer {
        Customer {
            id: CustomerId::new(id),
            first_name: "Mary".to_owned(),
            last_name: "Smith".to_owned(),
            email: "mary@example.com".to_owned(),
            active: true,
            active_rentals: Some(1),
        }
    }

    fn detail(id: i64) -> CustomerDetail {
        CustomerDetail {
            id: CustomerId::new(id),
            first_name: "Mary".to_owned(),
            last_name: "Smith".to_owned(),
            email: "mary@example.com".to_owned(),
            active: true,
            active_rentals: Some(1),
        }
    }

    #[test]
    fn rent_decrements_available_copies() {
        let mut films = vec![film(1, Some(3)), film(2, Some(5))];
        assert!(apply_rent_success(&mut films, FilmId::new(1)));
        assert_eq!(films[0].available_copies, Some(2));
        assert_eq!(films[1].available_copies, Some(5));
    }

    #[test]
    fn rent_floors_at_zero() {
        let mut films = vec![film(1, Some(0))];
        assert!(!apply_rent_success(&mut films, FilmId::new(1)));
        assert_eq!(films[0].available_copies, Some(0));
    }

    #[test]
    fn rent_leaves_unknown_counts_unknown() {
        let mut films = vec![film(1, None)];
        assert!(!apply_rent_success(&mut films, FilmId::new(1)));
        assert_eq!(films[0].available_copies, None);
    }

    #[test]
    fn rent_on_missing_film_is_a_no_op() {
        let mut films = vec![film(1, Some(2))];
        assert!(!apply_rent_success(&mut films, FilmId::new(99)));
        assert_eq!(films[0].available_copies, Some(2));
    }

    #[test]
    fn edit_patches_row_and_cached_detail() {
        let mut customers = vec![customer(1), customer(2)];
        let mut cache = DetailCache::new();
        cache.overwrite(CustomerId::new(1), detail(1));

        let update = CustomerUpdate {
            first_name: "Maria".to_owned(),
            last_name: "Smithson".to_owned(),
            email: "maria@example.com".to_owned(),
        };
        assert!(apply_edit_success(
            &mut customers,
            &mut cache,
            CustomerId::new(1),
            &update,
        ));

        assert_eq!(customers[0].first_name, "Maria");
        assert_eq!(customers[1].first_name, "Mary");

        let patched = cache.payload(CustomerId::new(1)).expect("cached detail");
        assert_eq!(patched.email, "maria@example.com");
        assert_eq!(patched.active_rentals, Some(1));
    }

    #[test]
    fn edit_without_cached_detail_still_patches_row() {
        let mut customers = vec![customer(3)];
        let mut cache: DetailCache<CustomerId, CustomerDetail> = DetailCache::new();

        let update = CustomerUpdate {
            first_name: "Ann".to_owned(),
            last_name: "Lee".to_owned(),
            email: "ann@example.com".to_owned(),
        };
        assert!(apply_edit_success(
            &mut customers,
            &mut cache,
            CustomerId::new(3),
            &update,
        ));
        assert_eq!(customers[0].last_name, "Lee");
        assert!(cache.is_empty());
    }

    #[test]
    fn delete_removes_row_and_purges_detail() {
        let mut customers = vec![customer(1), customer(2)];
        let mut cache = DetailCache::new();
        cache.overwrite(CustomerId::new(1), detail(1));

        assert!(apply_delete_success(
            &mut customers,
            &mut cache,
            CustomerId::new(1),
        ));
        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].id, CustomerId::new(2));
        assert_eq!(cache.status(CustomerId::new(1)), DetailStatus::Idle);

        assert!(!apply_delete_success(
            &mut customers,
            &mut cache,
            CustomerId::new(1),
        ));
    }
}
