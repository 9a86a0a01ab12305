// tests/catalog_tests.rs
mod common;

use common::*;
use feastly::cache::QueryKey;
use feastly::catalog::{Coordinates, SearchFilters, SortOrder, MAX_REVIEW_COMMENT_CHARS};
use feastly::models::NewReview;
use feastly::StoreError;

#[test]
fn test_filters_round_trip_through_query_string() {
  let filters = SearchFilters::new()
    .with_search("nasi goreng")
    .with_category("indonesian")
    .with_sort(SortOrder::DeliveryTime)
    .near(-6.9175, 107.6191)
    .open_now(true)
    .with_page(3);

  let query = filters.to_query_string();
  assert_eq!(
    query,
    "search=nasi+goreng&category=indonesian&sort=delivery_time&lat=-6.9175&lng=107.6191&openNow=true&page=3"
  );
  assert_eq!(SearchFilters::from_query_string(&query), filters);
  assert_eq!(SearchFilters::from_query_string(&format!("?{}", query)), filters);
}

#[test]
fn test_defaults_are_omitted_and_garbage_is_ignored() {
  assert_eq!(SearchFilters::new().to_query_string(), "");
  assert_eq!(SearchFilters::new().with_search("   ").with_page(1).to_query_string(), "");

  let parsed = SearchFilters::from_query_string("page=2&sort=cheapest&lat=-6.2&foo=bar&search=bakso");
  assert_eq!(parsed.search.as_deref(), Some("bakso"));
  assert_eq!(parsed.page, Some(2), "page survives keys that come after it");
  assert_eq!(parsed.sort, None);
  assert_eq!(parsed.location, None, "a lone lat is dropped");

  let out_of_range = SearchFilters::from_query_string("lat=123&lng=10");
  assert_eq!(out_of_range.location, None);

  let both = SearchFilters::from_query_string("lat=-6.2&lng=106.8");
  assert_eq!(both.location, Some(Coordinates { lat: -6.2, lng: 106.8 }));
}

#[test]
fn test_changing_search_resets_the_page() {
  let filters = SearchFilters::new().with_page(4).with_search("mie");
  assert_eq!(filters.page, None);
  assert_ne!(filters.cache_key(), SearchFilters::new().cache_key());
}

#[tokio::test]
async fn test_listing_is_cached_per_filter_set() {
  let h = Harness::signed_out();
  let all = SearchFilters::new();
  let soup = SearchFilters::new().with_category("soup");

  assert_eq!(h.store.catalog.restaurants(&all).await.unwrap().len(), 2);
  assert_eq!(h.store.catalog.restaurants(&all).await.unwrap().len(), 2);
  assert_eq!(h.store.catalog.restaurants(&soup).await.unwrap().len(), 1);

  assert_eq!(h.api.calls("list_restaurants"), 2);
  assert_eq!(h.api.restaurant_queries(), vec!["".to_string(), "category=soup".to_string()]);
}

#[tokio::test]
async fn test_menu_lists_available_items_first() {
  let h = Harness::signed_out();
  let menu = h.store.catalog.menu(WARUNG_A).await.unwrap();
  let ids: Vec<_> = menu.iter().map(|m| m.id).collect();
  assert_eq!(ids, vec![NASI_GORENG, ES_TEH]);

  h.store.catalog.menu(WARUNG_A).await.unwrap();
  assert_eq!(h.api.calls("get_menu"), 1);
}

#[tokio::test]
async fn test_review_rating_and_comment_are_validated_locally() {
  let h = Harness::signed_in();

  for rating in [0u8, 6] {
    let err = h
      .store
      .catalog
      .submit_review(NewReview {
        restaurant_id: WARUNG_A,
        order_id: None,
        rating,
        comment: None,
      })
      .await
      .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)), "rating {} must be rejected", rating);
  }

  let too_long = "a".repeat(MAX_REVIEW_COMMENT_CHARS + 1);
  let err = h
    .store
    .catalog
    .submit_review(NewReview {
      restaurant_id: WARUNG_A,
      order_id: None,
      rating: 4,
      comment: Some(too_long),
    })
    .await
    .unwrap_err();
  assert!(matches!(err, StoreError::Validation(_)));
  assert_eq!(h.api.calls("create_review"), 0);
}

#[tokio::test]
async fn test_review_submission_invalidates_restaurant_views() {
  let h = Harness::signed_in();
  let all = SearchFilters::new();
  h.store.catalog.restaurants(&all).await.unwrap();
  h.store.catalog.restaurant(WARUNG_A).await.unwrap();
  assert!(h.store.catalog.reviews(WARUNG_A).await.unwrap().is_empty());

  let review = h
    .store
    .catalog
    .submit_review(NewReview {
      restaurant_id: WARUNG_A,
      order_id: Some(100),
      rating: 5,
      comment: Some("   Enak sekali!  ".to_string()),
    })
    .await
    .expect("review");
  assert_eq!(review.comment.as_deref(), Some("Enak sekali!"));

  assert!(h.store.cache().is_stale(&QueryKey::Reviews(WARUNG_A)));
  assert!(h.store.cache().is_stale(&QueryKey::Restaurant(WARUNG_A)));
  assert!(h.store.cache().is_stale(&all.cache_key()));

  assert_eq!(h.store.catalog.reviews(WARUNG_A).await.unwrap().len(), 1);
  assert_eq!(h.api.calls("list_reviews"), 2);
}
