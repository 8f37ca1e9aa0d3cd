use proptest::prelude::*;
use std::collections::HashSet;
use tastelist_core::{
    project, CollectionCommand, CollectionError, Rating, Restaurant, RestaurantCollection,
    RestaurantId, SortMode,
};

fn restaurant(id: &str, name: &str, cuisine: &str) -> Restaurant {
    Restaurant::with_id(RestaurantId::from(id), name, cuisine)
}

#[test]
fn add_then_project_by_name_query() {
    let collection = RestaurantCollection::initialize(Vec::new())
        .add(restaurant("1", "Cafe A", "French"))
        .unwrap()
        .add(restaurant("2", "Bistro B", "Italian"))
        .unwrap();

    let found = project(&collection, "bistro", SortMode::Name);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, RestaurantId::from("2"));
}

#[test]
fn rating_sort_puts_higher_rating_first() {
    let mut cafe = restaurant("1", "Cafe A", "French");
    cafe.rating = Some(Rating::new(4).unwrap());
    let mut bistro = restaurant("2", "Bistro B", "Italian");
    bistro.rating = Some(Rating::new(5).unwrap());
    let collection = RestaurantCollection::initialize(vec![cafe, bistro]);

    let ordered: Vec<_> = project(&collection, "", SortMode::Rating)
        .into_iter()
        .map(|item| item.id)
        .collect();
    assert_eq!(ordered, vec![RestaurantId::from("2"), RestaurantId::from("1")]);
}

#[test]
fn update_replaces_record_in_place() {
    let collection = RestaurantCollection::initialize(vec![
        restaurant("1", "Cafe A", "French"),
        restaurant("2", "Bistro B", "Italian"),
    ]);
    let mut renamed = collection.get(&RestaurantId::from("1")).unwrap().clone();
    renamed.name = "Cafe A+".to_string();

    let updated = collection
        .apply(CollectionCommand::Update(renamed))
        .unwrap();
    assert_eq!(updated.as_slice()[0].name, "Cafe A+");
    assert_eq!(updated.as_slice()[1].name, "Bistro B");
    assert_eq!(collection.as_slice()[0].name, "Cafe A");
}

#[test]
fn update_of_unknown_id_never_inserts() {
    let collection = RestaurantCollection::initialize(vec![restaurant("1", "Cafe A", "French")]);
    let err = collection
        .update(restaurant("9", "Ghost", "None"))
        .unwrap_err();
    assert_eq!(err, CollectionError::NotFound(RestaurantId::from("9")));
    assert_eq!(collection.len(), 1);
}

#[test]
fn duplicate_add_is_rejected() {
    let collection = RestaurantCollection::initialize(vec![restaurant("1", "Cafe A", "French")]);
    let err = collection
        .add(restaurant("1", "Other", "Thai"))
        .unwrap_err();
    assert_eq!(err, CollectionError::DuplicateId(RestaurantId::from("1")));
}

#[test]
fn removing_absent_id_keeps_revision() {
    let collection = RestaurantCollection::initialize(vec![
        restaurant("1", "Cafe A", "French"),
        restaurant("2", "Bistro B", "Italian"),
    ]);
    let next = collection.remove(&RestaurantId::from("99"));
    assert!(next.same_revision(&collection));
    assert_eq!(next.to_vec(), collection.to_vec());
}

#[test]
fn initialize_keeps_first_of_duplicate_ids() {
    let collection = RestaurantCollection::initialize(vec![
        restaurant("1", "First", "French"),
        restaurant("1", "Second", "French"),
    ]);
    assert_eq!(collection.len(), 1);
    assert_eq!(collection.as_slice()[0].name, "First");
}

#[derive(Debug, Clone)]
enum Op {
    Add(String, String),
    Update(String, String),
    Remove(String),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let id = "[0-5]";
    let name = "[A-Z][a-z]{0,6}";
    prop_oneof![
        (id, name).prop_map(|(id, name)| Op::Add(id, name)),
        (id, name).prop_map(|(id, name)| Op::Update(id, name)),
        id.prop_map(Op::Remove),
    ]
}

proptest! {
    #[test]
    fn ids_stay_unique_over_any_sequence(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let mut collection = RestaurantCollection::new();
        for op in ops {
            let next = match op {
                Op::Add(id, name) => collection.add(restaurant(&id, &name, "Thai")),
                Op::Update(id, name) => collection.update(restaurant(&id, &name, "Thai")),
                Op::Remove(id) => Ok(collection.remove(&RestaurantId::from(id))),
            };
            if let Ok(next) = next {
                collection = next;
            }

            let ids: HashSet<_> = collection.iter().map(|item| item.id.clone()).collect();
            prop_assert_eq!(ids.len(), collection.len());
        }
    }

    #[test]
    fn remove_is_idempotent(ids in prop::collection::hash_set("[0-9]{1,2}", 0..12), target in "[0-9]{1,2}") {
        let collection = RestaurantCollection::initialize(
            ids.iter().map(|id| restaurant(id, "Name", "Thai")).collect(),
        );
        let target = RestaurantId::from(target);
        let once = collection.remove(&target);
        let twice = once.remove(&target);
        prop_assert_eq!(once.to_vec(), twice.to_vec());
        prop_assert!(!twice.contains(&target));
    }
}
