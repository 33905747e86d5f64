//! End-to-end tests: router → query builder → SQLite FTS5 store.

use std::cmp::Ordering;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use advocate_directory::api::{routes, ApiState};
use advocate_directory::db::{seed, Advocate, AdvocateStore, NewAdvocate, SqliteAdvocateStore};
use advocate_directory::search::SortField;

fn new_advocate(
    first: &str,
    last: &str,
    city: &str,
    degree: &str,
    specialties: &[&str],
    years: u32,
    phone: i64,
) -> NewAdvocate {
    NewAdvocate {
        first_name: first.into(),
        last_name: last.into(),
        city: city.into(),
        degree: degree.into(),
        specialties: specialties.iter().map(|s| s.to_string()).collect(),
        years_of_experience: years,
        phone_number: phone,
    }
}

fn fixtures() -> Vec<NewAdvocate> {
    vec![
        new_advocate("John", "Doe", "New York", "MD", &["Bipolar", "LGBTQ"], 10, 5551234567),
        new_advocate("Jane", "Smith", "San Francisco", "PhD", &["Software engineering burnout"], 8, 5559876543),
        new_advocate("Alice", "Brown", "Austin", "MSW", &["Trauma & PTSD", "Eating disorders"], 3, 5555555555),
        new_advocate("Bob", "Adams", "Boston", "MD", &[], 21, 15551112222),
        new_advocate("Carol", "Brown", "Denver", "PhD", &["Sleep issues"], 3, 5553334444),
    ]
}

struct Harness {
    _dir: TempDir,
    db_path: std::path::PathBuf,
    store: SqliteAdvocateStore,
}

async fn harness() -> Harness {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("advocates.db");
    let store = SqliteAdvocateStore::open(&db_path, 2).unwrap();
    store.insert_advocates(&fixtures()).await.unwrap();
    Harness {
        _dir: dir,
        db_path,
        store,
    }
}

async fn get(store: &SqliteAdvocateStore, uri: &str) -> (StatusCode, Value) {
    let state = ApiState::new(Some(Arc::new(store.clone()) as Arc<dyn AdvocateStore>));
    let response = routes::build_routes(state)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get_rows(store: &SqliteAdvocateStore, uri: &str) -> Vec<Advocate> {
    let (status, body) = get(store, uri).await;
    assert_eq!(status, StatusCode::OK, "body: {body}");
    serde_json::from_value(body["data"].clone()).unwrap()
}

fn last_names(rows: &[Advocate]) -> Vec<&str> {
    rows.iter().map(|a| a.last_name.as_str()).collect()
}

fn first_names(rows: &[Advocate]) -> Vec<&str> {
    rows.iter().map(|a| a.first_name.as_str()).collect()
}

// =========================================================================
// Listing and ordering
// =========================================================================

#[tokio::test]
async fn lists_everything_by_last_name() {
    let h = harness().await;
    let rows = get_rows(&h.store, "/api/advocates").await;
    assert_eq!(last_names(&rows), ["Adams", "Brown", "Brown", "Doe", "Smith"]);
    // Ties on last name keep insertion (id) order.
    assert_eq!(first_names(&rows)[1..3], ["Alice", "Carol"]);
}

fn compare_by(field: SortField, a: &Advocate, b: &Advocate) -> Ordering {
    match field {
        SortField::FirstName => a.first_name.cmp(&b.first_name),
        SortField::LastName => a.last_name.cmp(&b.last_name),
        SortField::City => a.city.cmp(&b.city),
        SortField::Degree => a.degree.cmp(&b.degree),
        SortField::YearsOfExperience => a.years_of_experience.cmp(&b.years_of_experience),
        SortField::PhoneNumber => a.phone_number.cmp(&b.phone_number),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
    }
}

#[tokio::test]
async fn orders_by_every_field_in_both_directions() {
    let h = harness().await;
    let all = get_rows(&h.store, "/api/advocates").await;

    for field in SortField::ALL {
        for sort in ["asc", "desc"] {
            let uri = format!("/api/advocates?orderBy={field}&sort={sort}");
            let rows = get_rows(&h.store, &uri).await;

            let mut expected = all.clone();
            expected.sort_by(|a, b| {
                let primary = compare_by(field, a, b);
                let primary = if sort == "desc" { primary.reverse() } else { primary };
                primary.then(a.id.cmp(&b.id))
            });

            let ids: Vec<i64> = rows.iter().map(|a| a.id).collect();
            let expected_ids: Vec<i64> = expected.iter().map(|a| a.id).collect();
            assert_eq!(ids, expected_ids, "orderBy={field} sort={sort}");
        }
    }
}

#[tokio::test]
async fn descending_experience() {
    let h = harness().await;
    let rows = get_rows(&h.store, "/api/advocates?orderBy=yearsOfExperience&sort=desc").await;
    let years: Vec<u32> = rows.iter().map(|a| a.years_of_experience).collect();
    assert_eq!(years, [21, 10, 8, 3, 3]);
}

// =========================================================================
// Full-text search
// =========================================================================

#[tokio::test]
async fn searches_names() {
    let h = harness().await;
    let rows = get_rows(&h.store, "/api/advocates?q=John").await;
    assert_eq!(first_names(&rows), ["John"]);
}

#[tokio::test]
async fn search_is_case_insensitive_and_token_based() {
    let h = harness().await;
    assert_eq!(last_names(&get_rows(&h.store, "/api/advocates?q=brown").await), ["Brown", "Brown"]);
    // "Jo" is not a token of any record; there is no substring matching.
    assert!(get_rows(&h.store, "/api/advocates?q=Jo").await.is_empty());
}

#[tokio::test]
async fn search_matches_stemmed_variants() {
    let h = harness().await;
    let rows = get_rows(&h.store, "/api/advocates?q=engineers").await;
    assert_eq!(first_names(&rows), ["Jane"]);
}

#[tokio::test]
async fn search_covers_specialties_numbers_and_degree() {
    let h = harness().await;
    assert_eq!(first_names(&get_rows(&h.store, "/api/advocates?q=PTSD").await), ["Alice"]);
    assert_eq!(first_names(&get_rows(&h.store, "/api/advocates?q=5551234567").await), ["John"]);
    assert_eq!(first_names(&get_rows(&h.store, "/api/advocates?q=21").await), ["Bob"]);
    assert_eq!(
        first_names(&get_rows(&h.store, "/api/advocates?q=phd&orderBy=firstName").await),
        ["Carol", "Jane"]
    );
}

#[tokio::test]
async fn every_token_must_match() {
    let h = harness().await;
    let rows = get_rows(&h.store, "/api/advocates?q=new%20york%20bipolar").await;
    assert_eq!(first_names(&rows), ["John"]);
    assert!(get_rows(&h.store, "/api/advocates?q=new%20york%20sleep").await.is_empty());
}

#[tokio::test]
async fn search_combines_with_ordering() {
    let h = harness().await;
    let rows = get_rows(&h.store, "/api/advocates?q=brown&orderBy=firstName&sort=desc").await;
    assert_eq!(first_names(&rows), ["Carol", "Alice"]);
}

#[tokio::test]
async fn operator_characters_are_plain_text() {
    let h = harness().await;
    let rows = get_rows(&h.store, "/api/advocates?q=Trauma%20%26%20PTSD").await;
    assert_eq!(first_names(&rows), ["Alice"]);

    let rows = get_rows(&h.store, "/api/advocates?q=%22doe%22%20NEAR%20*").await;
    assert!(rows.is_empty(), "NEAR is a literal token, not an operator");

    let rows = get_rows(&h.store, "/api/advocates?q=%22doe%22%20OR%20*").await;
    assert_eq!(first_names(&rows), ["John"]);
}

#[tokio::test]
async fn stopwords_in_the_term_are_ignored() {
    let h = harness().await;
    assert_eq!(first_names(&get_rows(&h.store, "/api/advocates?q=John%20Doe").await), ["John"]);
    assert_eq!(first_names(&get_rows(&h.store, "/api/advocates?q=John%20and%20Doe").await), ["John"]);
    assert_eq!(
        first_names(&get_rows(&h.store, "/api/advocates?q=John%20in%20New%20York").await),
        ["John"]
    );
}

#[tokio::test]
async fn stopword_only_query_matches_nothing() {
    let h = harness().await;
    assert!(get_rows(&h.store, "/api/advocates?q=the%20and%20of").await.is_empty());
}

#[tokio::test]
async fn decomposed_accents_match_precomposed_records() {
    let h = harness().await;
    h.store
        .insert_advocates(&[new_advocate("Zo\u{eb}y", "Martin", "Lyon", "MD", &[], 4, 5552223333)])
        .await
        .unwrap();

    // "Zoe" followed by U+0308 COMBINING DIAERESIS.
    let rows = get_rows(&h.store, "/api/advocates?q=Zoe%CC%88y").await;
    assert_eq!(last_names(&rows), ["Martin"]);
}

#[tokio::test]
async fn punctuation_only_query_matches_nothing() {
    let h = harness().await;
    assert!(get_rows(&h.store, "/api/advocates?q=%26%26%26").await.is_empty());
}

#[tokio::test]
async fn whitespace_query_returns_everything() {
    let h = harness().await;
    assert_eq!(get_rows(&h.store, "/api/advocates?q=%20%20%20").await.len(), 5);
}

// =========================================================================
// Failures
// =========================================================================

#[tokio::test]
async fn execution_failure_returns_generic_error() {
    let h = harness().await;
    let conn = rusqlite::Connection::open(&h.db_path).unwrap();
    conn.execute_batch("DROP TABLE advocates_fts;").unwrap();

    let (status, body) = get(&h.store, "/api/advocates?q=John").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, serde_json::json!({ "error": "Failed to fetch advocates" }));
}

// =========================================================================
// Seed data
// =========================================================================

#[tokio::test]
async fn seeded_directory_is_searchable() {
    let dir = TempDir::new().unwrap();
    let store = SqliteAdvocateStore::open(&dir.path().join("seeded.db"), 2).unwrap();
    let inserted = seed::seed(&store, false).await.unwrap();

    let rows = get_rows(&store, "/api/advocates").await;
    assert_eq!(rows.len(), inserted);
    let names = last_names(&rows);
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);

    let rows = get_rows(&store, "/api/advocates?q=John").await;
    assert_eq!(last_names(&rows), ["Doe"]);
}
