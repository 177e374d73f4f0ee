//! Pagination against a scripted store: count snapshot, derived offset,
//! and the fetch that follows.

mod common;

use common::{registry, row, MemStore};
use pretty_assertions::assert_eq;
use weft::prelude::*;

#[tokio::test]
async fn pagination_derives_offset_and_page_count() {
    let store = MemStore::new().respond(vec![row(&[("total", Value::Int(25))])]);
    let registry = registry();

    let mut query = Query::new();
    query.where_("id", ">", 1).limit(10);

    let users = Model::new(&registry, "User", &store).unwrap();
    let paginate = Paginate::new(&users, &mut query, 3).await.unwrap();

    assert_eq!(paginate.offset(), 20);
    assert_eq!(paginate.pages(), 3);
    assert_eq!(paginate.total(), 25);

    // The count ran over the same filters, nothing else.
    assert_eq!(
        store.calls()[0].0,
        "select count(*) as total from users where id > :id"
    );

    // The derived offset landed back in the clause set.
    assert_eq!(query.fragment(Part::Offset), Some(" offset 20".to_string()));
}

#[tokio::test]
async fn paginated_fetch_carries_limit_and_offset() {
    let store = MemStore::new()
        .respond(vec![row(&[("total", Value::Int(25))])])
        .respond(vec![row(&[("id", Value::Int(21))])]);
    let registry = registry();

    let mut query = Query::new();
    query.limit(10);

    let mut users = Model::new(&registry, "User", &store).unwrap();
    let paginate = Paginate::new(&users, &mut query, 3).await.unwrap();
    users.execute(query).all().await.unwrap();

    assert_eq!(paginate.current_page(), 3);
    assert_eq!(
        store.calls()[1].0,
        "select * from users limit 10 offset 20"
    );
}

#[tokio::test]
async fn pagination_without_limit_fails_before_counting() {
    let store = MemStore::new();
    let registry = registry();

    let users = Model::new(&registry, "User", &store).unwrap();
    let err = Paginate::new(&users, &mut Query::new(), 1).await.unwrap_err();
    assert!(matches!(err, WeftError::MissingLimit));
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn zero_total_means_zero_pages_and_no_links() {
    let store = MemStore::new().respond(vec![row(&[("total", Value::Int(0))])]);
    let registry = registry();

    let mut query = Query::new();
    query.limit(10);

    let users = Model::new(&registry, "User", &store).unwrap();
    let paginate = Paginate::new(&users, &mut query, 1).await.unwrap();
    assert_eq!(paginate.pages(), 0);
    assert!(paginate.links(5).is_empty());
}

#[tokio::test]
async fn page_defaults_to_first_when_zero() {
    let store = MemStore::new().respond(vec![row(&[("total", Value::Int(30))])]);
    let registry = registry();

    let mut query = Query::new();
    query.limit(10);

    let users = Model::new(&registry, "User", &store).unwrap();
    let paginate = Paginate::new(&users, &mut query, 0).await.unwrap();
    assert_eq!(paginate.current_page(), 1);
    assert_eq!(paginate.offset(), 0);
}

#[tokio::test]
async fn links_window_is_centered_and_clipped() {
    let store = MemStore::new().respond(vec![row(&[("total", Value::Int(100))])]);
    let registry = registry();

    let mut query = Query::new();
    query.limit(10);

    let users = Model::new(&registry, "User", &store).unwrap();
    let paginate = Paginate::new(&users, &mut query, 9).await.unwrap();

    let pages: Vec<u64> = paginate.links(5).iter().map(|l| l.page).collect();
    assert_eq!(pages, vec![7, 8, 9, 10]);
    let current: Vec<bool> = paginate.links(5).iter().map(|l| l.current).collect();
    assert_eq!(current, vec![false, false, true, false]);
}
