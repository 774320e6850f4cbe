//! Property tests over lazy collections and owned children.

use proptest::prelude::*;
use relserde::prelude::*;
use serde_json::{Value as JsonValue, json};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

const SHELF_PATH: &str = "library::Shelf";
const BOOK_PATH: &str = "library::Book";

const SHELF_FIELDS: &[EntityFieldModel] = &[
    EntityFieldModel::value("id"),
    EntityFieldModel::many("books", BOOK_PATH).mapped_by("shelf"),
];

const BOOK_FIELDS: &[EntityFieldModel] = &[
    EntityFieldModel::value("isbn"),
    EntityFieldModel::one("shelf", SHELF_PATH),
];

static SHELF: EntityModel = EntityModel::new(SHELF_PATH, "shelf", SHELF_FIELDS);
static BOOK: EntityModel = EntityModel::new(BOOK_PATH, "book", BOOK_FIELDS);

fn mapper(features: Features) -> EntityMapper {
    let catalog = Catalog::builder()
        .register_all([&SHELF, &BOOK])
        .build()
        .expect("library catalog builds");

    EntityMapper::with_module(PersistenceModule::with_features(Arc::new(catalog), features))
}

fn book(isbn: u64) -> Value {
    let shelf = EntityValue::new(&SHELF).with("id", 0_u64).into_value();

    EntityValue::new(&BOOK)
        .with("isbn", isbn)
        .with("shelf", shelf)
        .into_value()
}

fn features(force: bool, explicit: bool) -> Features {
    Features::defaults()
        .set(Feature::ForceLazyLoading, force)
        .set(Feature::RequireExplicitLazyMarker, explicit)
}

proptest! {
    #[test]
    fn lazy_books_load_only_when_allowed(
        isbns in prop::collection::vec(any::<u64>(), 0..6),
        force in any::<bool>(),
        explicit in any::<bool>(),
        preloaded in any::<bool>(),
    ) {
        let loads = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&loads);
        let items = isbns.iter().copied().map(book).collect::<Vec<_>>();
        let books = Value::lazy_collection(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(items.clone())
        });
        if preloaded && let Value::Collection(collection) = &books {
            collection.initialize().expect("preload");
        }

        let shelf = EntityValue::new(&SHELF)
            .with("id", 1_u64)
            .with("books", books)
            .into_value();

        let json = to_json(&mapper(features(force, explicit)), &shelf).expect("write");

        // unmarked collections are eager when explicit markers are required
        let materialized = force || explicit || preloaded;
        let expected = if materialized {
            JsonValue::Array(isbns.iter().map(|isbn| json!({"isbn": isbn})).collect())
        } else {
            JsonValue::Null
        };

        prop_assert_eq!(&json["books"], &expected);
        prop_assert_eq!(loads.load(Ordering::SeqCst), usize::from(materialized));
    }

    #[test]
    fn owned_books_never_repeat_their_shelf(
        isbns in prop::collection::vec(any::<u64>(), 0..6),
        force in any::<bool>(),
    ) {
        let shelf = EntityValue::new(&SHELF)
            .with("id", 1_u64)
            .with("books", isbns.iter().copied().map(book).collect::<Vec<_>>())
            .into_value();

        let json = to_json(&mapper(features(force, false)), &shelf).expect("write");

        let books = json["books"].as_array().expect("books written");
        prop_assert_eq!(books.len(), isbns.len());
        prop_assert!(books.iter().all(|book| book.get("shelf").is_none()));
    }
}
