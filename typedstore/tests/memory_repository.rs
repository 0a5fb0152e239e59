//! End-to-end tests of the repository and typed query API over the
//! in-memory backend.

use bson::doc;
use serde::{Deserialize, Serialize};

use typedstore::{memory::MemoryStore, prelude::*};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
#[record(collection = "users")]
struct User {
    id: String,
    created_at: bson::DateTime,
    updated_at: bson::DateTime,
    name: String,
    age: i64,
    tags: Vec<String>,
}

impl User {
    fn new(name: &str, age: i64) -> Self {
        Self {
            id: auto_id(),
            created_at: bson::DateTime::now(),
            updated_at: bson::DateTime::now(),
            name: name.to_string(),
            age,
            tags: vec![],
        }
    }
}

fn repo() -> Repository<MemoryStore, User> {
    Repository::new(MemoryStore::new())
}

async fn seeded() -> Repository<MemoryStore, User> {
    let repo = repo();
    for (name, age) in [
        ("Alice", 30),
        ("Bob", 17),
        ("Carol", 41),
        ("Dave", 25),
        ("Eve", 16),
    ] {
        repo.create(&User::new(name, age)).await.unwrap();
    }

    repo
}

#[test]
fn derived_field_table_matches_declared_schema() {
    assert_eq!(User::collection_name(), "users");

    let fields = FieldRef::<User>::new();
    assert_eq!(fields.get("name").unwrap().kind, FieldKind::Str);
    assert_eq!(fields.get("age").unwrap().kind, FieldKind::Int);
    assert_eq!(fields.get("created_at").unwrap().kind, FieldKind::DateTime);
    // Container fields fall back to the unchecked tag.
    assert_eq!(fields.get("tags").unwrap().kind, FieldKind::Any);

    assert!(matches!(
        fields.get("nope"),
        Err(DataError::UnknownField { .. })
    ));
}

#[tokio::test]
async fn create_assigns_a_store_id() {
    let repo = repo();
    let draft = User::new("Alice", 30);

    let created = repo.create(&draft).await.unwrap();
    assert_ne!(created.id, draft.id);
    assert_eq!(created.name, draft.name);
    assert_eq!(created.created_at, draft.created_at);

    let found = repo.get_by_id(&created.id).await.unwrap();
    assert_eq!(found, Some(created));
}

#[tokio::test]
async fn get_by_id_missing_is_none_not_an_error() {
    let repo = repo();

    let found = repo.get_by_id("does-not-exist").await.unwrap();
    assert_eq!(found, None);
}

#[tokio::test]
async fn update_stamps_updated_at() {
    let repo = repo();
    let created = repo.create(&User::new("Alice", 30)).await.unwrap();

    let mut changed = created.clone();
    changed.name = "Alicia".to_string();

    let updated = repo.update(&created.id, &changed).await.unwrap();
    assert_eq!(updated.name, "Alicia");
    assert!(updated.updated_at >= created.updated_at);

    let found = repo.get_by_id(&created.id).await.unwrap();
    assert_eq!(found, Some(updated));
}

#[tokio::test]
async fn update_missing_surfaces_the_store_error() {
    let repo = repo();

    let err = repo
        .update("does-not-exist", &User::new("Ghost", 0))
        .await
        .unwrap_err();
    assert!(matches!(err, DataError::CollectionNotFound(_) | DataError::NotFound(..)));
}

#[tokio::test]
async fn delete_removes_the_document() {
    let repo = repo();
    let created = repo.create(&User::new("Alice", 30)).await.unwrap();

    repo.delete(&created.id).await.unwrap();
    assert_eq!(repo.get_by_id(&created.id).await.unwrap(), None);

    let err = repo.delete(&created.id).await.unwrap_err();
    assert!(matches!(err, DataError::NotFound(..)));
}

#[tokio::test]
async fn list_all_respects_the_cap() {
    let repo = seeded().await;

    assert_eq!(repo.list_all(None).await.unwrap().len(), 5);
    assert_eq!(repo.list_all(Some(2)).await.unwrap().len(), 2);
}

#[tokio::test]
async fn find_by_field_and_fields() {
    let repo = seeded().await;

    let carols = repo.find_by_field("name", "Carol").await.unwrap();
    assert_eq!(carols.len(), 1);
    assert_eq!(carols[0].age, 41);

    let matches = repo
        .find_by_fields([("name", bson::Bson::from("Carol")), ("age", 41i64.into())])
        .await
        .unwrap();
    assert_eq!(matches.len(), 1);

    let none = repo
        .find_by_fields([("name", bson::Bson::from("Carol")), ("age", 17i64.into())])
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn typed_query_checks_values_and_executes() {
    let repo = seeded().await;

    let mut query = repo.builder();
    let fields = query.fields();
    let age = fields.get("age").unwrap();
    let name = fields.get("name").unwrap();

    // Mistyped values fail before any I/O.
    assert!(matches!(
        query.filter(age, FilterOp::Gte, "18"),
        Err(DataError::TypeMismatch { field: "age", .. })
    ));
    assert!(matches!(
        query.filter(name, FilterOp::Eq, 42),
        Err(DataError::TypeMismatch { field: "name", .. })
    ));

    query
        .filter(age, FilterOp::Gte, 18)
        .unwrap()
        .order_by(age, SortDirection::Asc)
        .limit(2);

    let descriptor = query.build();
    assert_eq!(descriptor.filters.len(), 1);
    assert_eq!(descriptor.order_by.len(), 1);
    assert_eq!(descriptor.limit, Some(2));

    let adults = repo.query(&query).await.unwrap();
    assert_eq!(
        adults.iter().map(|u| u.age).collect::<Vec<_>>(),
        vec![25, 30]
    );
}

#[tokio::test]
async fn execute_skips_documents_without_a_field_map() {
    let store = MemoryStore::new();
    let repo: Repository<MemoryStore, User> = Repository::new(store.clone());
    repo.create(&User::new("Alice", 30)).await.unwrap();

    // A document with an empty field map, planted behind the repository's
    // back.
    store
        .create_document("users", Some("hollow"), doc! {})
        .await
        .unwrap();

    let query = repo.builder();
    let users = query.execute().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].name, "Alice");

    // The untyped scans share the same decode contract.
    assert_eq!(repo.list_all(None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn array_fields_are_queryable_through_the_any_tag() {
    let repo = repo();

    let mut admin = User::new("Alice", 30);
    admin.tags = vec!["admin".to_string(), "ops".to_string()];
    repo.create(&admin).await.unwrap();
    repo.create(&User::new("Bob", 25)).await.unwrap();

    let mut query = repo.builder();
    let tags = query.fields().get("tags").unwrap();
    query.filter(tags, FilterOp::Contains, "admin").unwrap();

    let admins = repo.query(&query).await.unwrap();
    assert_eq!(admins.len(), 1);
    assert_eq!(admins[0].name, "Alice");
}
