// Classification and lookup over cargo snapshots

use crate::cargo::{Cargo, CargoId};

// Stable sort, so cargo sharing an id keeps its relative order
pub fn sort_by_id(mut cargo: Vec<Cargo>) -> Vec<Cargo> {
    cargo.sort_by_key(|c| c.id);
    cargo
}

pub fn filter_delivered(cargo: &[Cargo]) -> Vec<Cargo> {
    sort_by_id(
        cargo
            .iter()
            .filter(|c| c.status.is_delivered())
            .cloned()
            .collect(),
    )
}

pub fn filter_undelivered(cargo: &[Cargo]) -> Vec<Cargo> {
    sort_by_id(
        cargo
            .iter()
            .filter(|c| !c.status.is_delivered())
            .cloned()
            .collect(),
    )
}

/// Binary search by id. `sorted` must be ascending by id, as produced by
/// [`sort_by_id`], [`filter_delivered`] or [`filter_undelivered`].
pub fn find_by_id(sorted: &[Cargo], id: CargoId) -> Option<&Cargo> {
    sorted
        .binary_search_by_key(&id, |c| c.id)
        .ok()
        .map(|idx| &sorted[idx])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cargo::{CityId, ClientId, Status};
    use chrono::NaiveDate;
    use rand::seq::SliceRandom;

    fn cargo(id: u32, status: Status) -> Cargo {
        Cargo::new(
            CargoId(id),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            status,
            ClientId(1),
            CityId(1),
        )
    }

    fn ids(cargo: &[Cargo]) -> Vec<u32> {
        cargo.iter().map(|c| c.id.0).collect()
    }

    fn mixed() -> Vec<Cargo> {
        vec![
            cargo(40, Status::Delivered),
            cargo(7, Status::Processing),
            cargo(25, Status::OnDelivery),
            cargo(3, Status::Delivered),
            cargo(18, Status::Delivered),
            cargo(11, Status::OnDelivery),
        ]
    }

    #[test]
    fn test_filter_delivered_sorted() {
        let delivered = filter_delivered(&mixed());
        assert_eq!(ids(&delivered), vec![3, 18, 40]);
        assert!(delivered.iter().all(|c| c.status == Status::Delivered));
    }

    #[test]
    fn test_filter_undelivered_sorted() {
        let undelivered = filter_undelivered(&mixed());
        assert_eq!(ids(&undelivered), vec![7, 11, 25]);
        assert!(undelivered.iter().all(|c| c.status != Status::Delivered));
    }

    #[test]
    fn test_filters_on_shuffled_input_are_sorted() {
        let mut rng = rand::thread_rng();
        let statuses = [Status::Processing, Status::OnDelivery, Status::Delivered];
        let mut all: Vec<Cargo> = (0..200)
            .map(|i| cargo(i, statuses[i as usize % 3]))
            .collect();
        all.shuffle(&mut rng);

        for out in [filter_delivered(&all), filter_undelivered(&all)] {
            assert!(out.windows(2).all(|w| w[0].id <= w[1].id));
        }
        assert_eq!(
            filter_delivered(&all).len() + filter_undelivered(&all).len(),
            all.len()
        );
    }

    #[test]
    fn test_find_by_id_edges() {
        let sorted = sort_by_id(mixed());

        assert_eq!(find_by_id(&sorted, CargoId(3)).map(|c| c.id.0), Some(3));
        assert_eq!(find_by_id(&sorted, CargoId(40)).map(|c| c.id.0), Some(40));
        assert_eq!(find_by_id(&sorted, CargoId(18)).map(|c| c.id.0), Some(18));
        assert!(find_by_id(&sorted, CargoId(0)).is_none());
        assert!(find_by_id(&sorted, CargoId(19)).is_none());
        assert!(find_by_id(&sorted, CargoId(99)).is_none());
        assert!(find_by_id(&[], CargoId(1)).is_none());
    }

    #[test]
    fn test_find_by_id_single_element() {
        let one = vec![cargo(5, Status::Processing)];
        assert!(find_by_id(&one, CargoId(5)).is_some());
        assert!(find_by_id(&one, CargoId(4)).is_none());
        assert!(find_by_id(&one, CargoId(6)).is_none());
    }
}
