
use super::*;
use crate::{
    engine::PropertyContext,
    model::entity::EntityModel,
    test_support::{
        ANIMAL_PATH, CAR, CAR_PATH, DAY_KEEPER_PATH, DRIVER_PATH, ENCLOSURE_PATH, GARAGE,
        GARAGE_PATH, ITEM, ITEM_PATH, KEEPER_PATH, NIGHT_KEEPER_PATH, ORDER_PATH, PADDOCK_PATH,
        TRUCK_PATH, VEHICLE, VEHICLE_PATH, fleet_catalog, full_catalog, shop_catalog,
        zoo_catalog,
    },
};

const SHELF_PATH: &str = "store::Shelf";
const BOOK_PATH: &str = "store::Book";
const ROOM_PATH: &str = "store::Room";

const SHELF_FIELDS: &[EntityFieldModel] = &[
    EntityFieldModel::many("books", BOOK_PATH).mapped_by(""),
    EntityFieldModel::one("room", ROOM_PATH).mapped_by("shelves"),
];
const BOOK_FIELDS: &[EntityFieldModel] = &[EntityFieldModel::one("shelf", SHELF_PATH)];

static SHELF: EntityModel = EntityModel::new(SHELF_PATH, "shelf", SHELF_FIELDS);
static BOOK: EntityModel = EntityModel::new(BOOK_PATH, "book", BOOK_FIELDS);

fn resolver(catalog: Arc<Catalog>) -> DirectionResolver {
    DirectionResolver::new(catalog)
}

#[test]
fn owning_collection_is_managed() {
    let resolver = resolver(shop_catalog());

    assert_eq!(
        resolver.classify(ORDER_PATH, "items"),
        ReferenceDirection::Managed { inverse: "order" }
    );
}

#[test]
fn inverse_reference_is_back_with_owner_name() {
    let resolver = resolver(shop_catalog());

    assert_eq!(
        resolver.classify(ITEM_PATH, "order"),
        ReferenceDirection::Back { owner: "items" }
    );
}

#[test]
fn plain_fields_are_none() {
    let resolver = resolver(shop_catalog());

    assert_eq!(resolver.classify(ORDER_PATH, "number"), ReferenceDirection::None);
    assert_eq!(resolver.classify(ITEM_PATH, "sku"), ReferenceDirection::None);
    // unidirectional reference
    assert_eq!(resolver.classify(ORDER_PATH, "customer"), ReferenceDirection::None);
}

#[test]
fn metadata_misses_are_none() {
    let resolver = resolver(shop_catalog());

    assert_eq!(resolver.classify("shop::Refund", "order"), ReferenceDirection::None);
    assert_eq!(resolver.classify(ORDER_PATH, "missing"), ReferenceDirection::None);
}

#[test]
fn back_reference_into_abstract_owner_searches_subclasses() {
    let resolver = resolver(fleet_catalog());

    assert_eq!(
        resolver.classify(GARAGE_PATH, "vehicles"),
        ReferenceDirection::Managed { inverse: "garage" }
    );
    assert_eq!(
        resolver.classify(VEHICLE_PATH, "garage"),
        ReferenceDirection::Back { owner: "vehicles" }
    );
    // inherited field seen through a concrete subclass
    assert_eq!(
        resolver.classify(CAR_PATH, "garage"),
        ReferenceDirection::Back { owner: "vehicles" }
    );
}

#[test]
fn abstract_owner_takes_inverse_from_first_registered_subclass() {
    let resolver = resolver(zoo_catalog());

    // DayKeeper and NightKeeper both map Keeper.animals; DayKeeper is
    // registered first
    assert_eq!(
        resolver.classify(KEEPER_PATH, "animals"),
        ReferenceDirection::Managed {
            inverse: "day_keeper"
        }
    );
    assert_eq!(
        resolver.classify(NIGHT_KEEPER_PATH, "animals"),
        ReferenceDirection::Managed {
            inverse: "night_keeper"
        }
    );
    assert_eq!(
        resolver.classify(DAY_KEEPER_PATH, "animals"),
        ReferenceDirection::Managed {
            inverse: "day_keeper"
        }
    );
}

#[test]
fn abstract_owner_without_mapped_subclass_is_none() {
    let resolver = resolver(zoo_catalog());

    assert_eq!(
        resolver.classify(ENCLOSURE_PATH, "residents"),
        ReferenceDirection::None
    );
    assert_eq!(
        resolver.classify(PADDOCK_PATH, "residents"),
        ReferenceDirection::None
    );
}

#[test]
fn back_reference_into_abstract_owner_finds_each_subclass_owner() {
    let resolver = resolver(zoo_catalog());

    assert_eq!(
        resolver.classify(ANIMAL_PATH, "night_keeper"),
        ReferenceDirection::Back { owner: "animals" }
    );
    assert_eq!(
        resolver.classify(ANIMAL_PATH, "day_keeper"),
        ReferenceDirection::Back { owner: "animals" }
    );
    assert_eq!(resolver.classify(ANIMAL_PATH, "name"), ReferenceDirection::None);
}

#[test]
fn unmapped_relations_under_abstract_entities_are_none() {
    let resolver = resolver(fleet_catalog());

    assert_eq!(resolver.classify(TRUCK_PATH, "drivers"), ReferenceDirection::None);
    assert_eq!(resolver.classify(DRIVER_PATH, "vehicle"), ReferenceDirection::None);
}

#[test]
fn empty_mapped_by_is_not_an_inverse() {
    let catalog = Catalog::builder()
        .register(&SHELF)
        .register(&BOOK)
        .build()
        .expect("store catalog builds");
    let resolver = resolver(Arc::new(catalog));

    assert_eq!(resolver.classify(SHELF_PATH, "books"), ReferenceDirection::None);
    assert_eq!(resolver.classify(BOOK_PATH, "shelf"), ReferenceDirection::None);
}

#[test]
fn managed_wins_over_back() {
    let catalog = Catalog::builder()
        .register(&SHELF)
        .register(&BOOK)
        .build()
        .expect("store catalog builds");
    let resolver = resolver(Arc::new(catalog));

    // a single-valued field carrying mapped_by is managed, whatever else
    // points at it
    assert_eq!(
        resolver.classify(SHELF_PATH, "room"),
        ReferenceDirection::Managed { inverse: "shelves" }
    );
}

#[test]
fn direction_helpers() {
    let managed = ReferenceDirection::Managed { inverse: "order" };
    let back = ReferenceDirection::Back { owner: "items" };

    assert!(managed.is_managed() && !managed.is_back());
    assert!(back.is_back() && !back.is_none());
    assert!(ReferenceDirection::default().is_none());
    assert_eq!(managed.name(), Some("order"));
    assert_eq!(back.name(), Some("items"));
    assert_eq!(ReferenceDirection::None.name(), None);
}

#[test]
fn introspector_uses_declaring_entity() {
    let catalog = full_catalog();
    let introspector = RelationIntrospector::new(resolver(Arc::clone(&catalog)));

    let garage_field = VEHICLE.declared_field("garage").expect("declared");
    let property = PropertyContext::new(&CAR, &VEHICLE, garage_field);

    assert_eq!(
        introspector.reference_direction(&property),
        ReferenceDirection::Back { owner: "vehicles" }
    );

    let vehicles = GARAGE.declared_field("vehicles").expect("declared");
    let property = PropertyContext::new(&GARAGE, &GARAGE, vehicles);
    assert_eq!(
        introspector.reference_direction(&property),
        ReferenceDirection::Managed { inverse: "garage" }
    );
}

#[test]
fn introspector_ignores_transient_fields_only_when_enabled() {
    let introspector = RelationIntrospector::new(resolver(shop_catalog()));

    let cached = ITEM.declared_field("cached_total").expect("declared");
    let sku = ITEM.declared_field("sku").expect("declared");
    let transient = PropertyContext::new(&ITEM, &ITEM, cached);
    let plain = PropertyContext::new(&ITEM, &ITEM, sku);

    let on = Features::defaults();
    let off = on.without(crate::module::Feature::UseTransientMarker);

    assert!(introspector.is_ignored(&transient, on));
    assert!(!introspector.is_ignored(&transient, off));
    assert!(!introspector.is_ignored(&plain, on));
}
