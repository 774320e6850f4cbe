//! Shared fixtures for unit and integration tests.
//!
//! Two small domains are modelled here:
//! - a shop, where `Order.items` owns the `Item.order` back-reference
//! - a garage of vehicles, where the related side is an abstract entity
//!   and relationships have to be found through concrete subclasses
//! - a zoo, where the owning side is abstract and each keeper subclass
//!   names a different inverse on `Animal`

use crate::{
    catalog::Catalog,
    model::{
        entity::{EntityKind, EntityModel},
        field::EntityFieldModel,
    },
    proxy::{LazyCollection, LazyRef, LoadError},
    value::{EntityValue, Value},
};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

pub const ORDER_PATH: &str = "shop::Order";
pub const ITEM_PATH: &str = "shop::Item";
pub const CUSTOMER_PATH: &str = "shop::Customer";

pub const GARAGE_PATH: &str = "fleet::Garage";
pub const VEHICLE_PATH: &str = "fleet::Vehicle";
pub const CAR_PATH: &str = "fleet::Car";
pub const TRUCK_PATH: &str = "fleet::Truck";
pub const DRIVER_PATH: &str = "fleet::Driver";

pub const KEEPER_PATH: &str = "zoo::Keeper";
pub const DAY_KEEPER_PATH: &str = "zoo::DayKeeper";
pub const NIGHT_KEEPER_PATH: &str = "zoo::NightKeeper";
pub const ANIMAL_PATH: &str = "zoo::Animal";
pub const ENCLOSURE_PATH: &str = "zoo::Enclosure";
pub const PADDOCK_PATH: &str = "zoo::Paddock";

const ORDER_FIELDS: &[EntityFieldModel] = &[
    EntityFieldModel::value("id"),
    EntityFieldModel::value("number"),
    EntityFieldModel::many("items", ITEM_PATH).mapped_by("order"),
    EntityFieldModel::one("customer", CUSTOMER_PATH),
];

const ITEM_FIELDS: &[EntityFieldModel] = &[
    EntityFieldModel::value("id"),
    EntityFieldModel::value("sku"),
    EntityFieldModel::one("order", ORDER_PATH),
    EntityFieldModel::value("cached_total").transient(),
];

const CUSTOMER_FIELDS: &[EntityFieldModel] = &[
    EntityFieldModel::value("id"),
    EntityFieldModel::value("name"),
    EntityFieldModel::list("tags"),
];

const GARAGE_FIELDS: &[EntityFieldModel] = &[
    EntityFieldModel::value("id"),
    EntityFieldModel::many("vehicles", VEHICLE_PATH).mapped_by("garage"),
];

const VEHICLE_FIELDS: &[EntityFieldModel] = &[
    EntityFieldModel::value("id"),
    EntityFieldModel::one("garage", GARAGE_PATH),
];

const CAR_FIELDS: &[EntityFieldModel] = &[EntityFieldModel::value("doors")];

const TRUCK_FIELDS: &[EntityFieldModel] = &[
    EntityFieldModel::value("payload"),
    EntityFieldModel::many("drivers", DRIVER_PATH).lazy(false),
];

const DRIVER_FIELDS: &[EntityFieldModel] = &[
    EntityFieldModel::value("name"),
    EntityFieldModel::one("vehicle", VEHICLE_PATH),
];

const KEEPER_FIELDS: &[EntityFieldModel] = &[EntityFieldModel::many("animals", ANIMAL_PATH)];

const DAY_KEEPER_FIELDS: &[EntityFieldModel] =
    &[EntityFieldModel::many("animals", ANIMAL_PATH).mapped_by("day_keeper")];

const NIGHT_KEEPER_FIELDS: &[EntityFieldModel] =
    &[EntityFieldModel::many("animals", ANIMAL_PATH).mapped_by("night_keeper")];

const ANIMAL_FIELDS: &[EntityFieldModel] = &[
    EntityFieldModel::value("name"),
    EntityFieldModel::one("day_keeper", KEEPER_PATH),
    EntityFieldModel::one("night_keeper", KEEPER_PATH),
];

// abstract owner whose relation no subclass maps
const ENCLOSURE_FIELDS: &[EntityFieldModel] =
    &[EntityFieldModel::many("residents", ANIMAL_PATH)];

const PADDOCK_FIELDS: &[EntityFieldModel] = &[EntityFieldModel::value("acres")];

pub static ORDER: EntityModel = EntityModel::new(ORDER_PATH, "order", ORDER_FIELDS);
pub static ITEM: EntityModel = EntityModel::new(ITEM_PATH, "item", ITEM_FIELDS);
pub static CUSTOMER: EntityModel = EntityModel::new(CUSTOMER_PATH, "customer", CUSTOMER_FIELDS);

pub static GARAGE: EntityModel = EntityModel::new(GARAGE_PATH, "garage", GARAGE_FIELDS);
pub static VEHICLE: EntityModel =
    EntityModel::new(VEHICLE_PATH, "vehicle", VEHICLE_FIELDS).with_abstract();
pub static CAR: EntityModel = EntityModel::new(CAR_PATH, "car", CAR_FIELDS).extends(VEHICLE_PATH);
pub static TRUCK: EntityModel =
    EntityModel::new(TRUCK_PATH, "truck", TRUCK_FIELDS).extends(VEHICLE_PATH);
pub static DRIVER: EntityModel = EntityModel::new(DRIVER_PATH, "driver", DRIVER_FIELDS);

pub static KEEPER: EntityModel =
    EntityModel::new(KEEPER_PATH, "keeper", KEEPER_FIELDS).with_abstract();
pub static DAY_KEEPER: EntityModel =
    EntityModel::new(DAY_KEEPER_PATH, "day_keeper", DAY_KEEPER_FIELDS).extends(KEEPER_PATH);
pub static NIGHT_KEEPER: EntityModel =
    EntityModel::new(NIGHT_KEEPER_PATH, "night_keeper", NIGHT_KEEPER_FIELDS)
        .extends(KEEPER_PATH);
pub static ANIMAL: EntityModel = EntityModel::new(ANIMAL_PATH, "animal", ANIMAL_FIELDS);
pub static ENCLOSURE: EntityModel =
    EntityModel::new(ENCLOSURE_PATH, "enclosure", ENCLOSURE_FIELDS).with_abstract();
pub static PADDOCK: EntityModel =
    EntityModel::new(PADDOCK_PATH, "paddock", PADDOCK_FIELDS).extends(ENCLOSURE_PATH);

///
/// Order
///

pub struct Order;

impl EntityKind for Order {
    const MODEL: &'static EntityModel = &ORDER;
}

///
/// Item
///

pub struct Item;

impl EntityKind for Item {
    const MODEL: &'static EntityModel = &ITEM;
}

/// Catalog over the shop entities.
#[must_use]
pub fn shop_catalog() -> Arc<Catalog> {
    let catalog = Catalog::builder()
        .register_kind::<Order>()
        .register_kind::<Item>()
        .register(&CUSTOMER)
        .build();

    match catalog {
        Ok(catalog) => Arc::new(catalog),
        Err(err) => panic!("shop catalog: {err}"),
    }
}

/// Catalog over the fleet entities, abstract `Vehicle` included.
#[must_use]
pub fn fleet_catalog() -> Arc<Catalog> {
    let catalog = Catalog::builder()
        .register_all([&GARAGE, &VEHICLE, &CAR, &TRUCK, &DRIVER])
        .build();

    match catalog {
        Ok(catalog) => Arc::new(catalog),
        Err(err) => panic!("fleet catalog: {err}"),
    }
}

/// Catalog over the zoo entities. `DayKeeper` is registered before
/// `NightKeeper`, so it wins first-match resolution.
#[must_use]
pub fn zoo_catalog() -> Arc<Catalog> {
    let catalog = Catalog::builder()
        .register_all([&KEEPER, &DAY_KEEPER, &NIGHT_KEEPER, &ANIMAL])
        .register_all([&ENCLOSURE, &PADDOCK])
        .build();

    match catalog {
        Ok(catalog) => Arc::new(catalog),
        Err(err) => panic!("zoo catalog: {err}"),
    }
}

/// Catalog over both domains.
#[must_use]
pub fn full_catalog() -> Arc<Catalog> {
    let catalog = Catalog::builder()
        .register_all([&ORDER, &ITEM, &CUSTOMER])
        .register_all([&GARAGE, &VEHICLE, &CAR, &TRUCK, &DRIVER])
        .build();

    match catalog {
        Ok(catalog) => Arc::new(catalog),
        Err(err) => panic!("full catalog: {err}"),
    }
}

///
/// LoadCounter
/// Counts how many times lazy loaders actually ran.
///

#[derive(Clone, Debug, Default)]
pub struct LoadCounter(Arc<AtomicUsize>);

impl LoadCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    /// Uninitialized reference proxy that loads a clone of `target`.
    #[must_use]
    pub fn proxy(&self, target: Value) -> Value {
        let counter = Arc::clone(&self.0);
        Value::Proxy(Arc::new(LazyRef::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Some(target.clone()))
        })))
    }

    /// Uninitialized collection that loads clones of `items`.
    #[must_use]
    pub fn collection(&self, items: Vec<Value>) -> Value {
        let counter = Arc::clone(&self.0);
        Value::Collection(Arc::new(LazyCollection::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(items.clone())
        })))
    }
}

/// Uninitialized reference proxy whose loader always fails.
#[must_use]
pub fn failing_proxy(message: &'static str) -> Value {
    Value::Proxy(Arc::new(LazyRef::new(move || Err(LoadError::msg(message)))))
}

/// Uninitialized collection whose loader always fails.
#[must_use]
pub fn failing_collection(message: &'static str) -> Value {
    Value::Collection(Arc::new(LazyCollection::new(move || {
        Err(LoadError::msg(message))
    })))
}

#[must_use]
pub fn customer(id: u64, name: &str) -> EntityValue {
    EntityValue::new(&CUSTOMER)
        .with("id", id)
        .with("name", name)
        .with("tags", Value::List(vec![Value::from("vip")]))
}

#[must_use]
pub fn item(id: u64, sku: &str) -> EntityValue {
    EntityValue::new(&ITEM)
        .with("id", id)
        .with("sku", sku)
        .with("cached_total", 99_u64)
}

#[must_use]
pub fn car(id: u64, doors: u64) -> EntityValue {
    EntityValue::new(&CAR).with("id", id).with("doors", doors)
}

#[must_use]
pub fn truck(id: u64, payload: u64) -> EntityValue {
    EntityValue::new(&TRUCK)
        .with("id", id)
        .with("payload", payload)
}
