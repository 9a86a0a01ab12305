// feastly/src/catalog/mod.rs

//! Read-mostly storefront resources: restaurants, menus and reviews.
//!
//! Every read goes through the shared [`QueryCache`]; a fresh entry is served
//! without a network call.

pub mod filters;

pub use filters::{Coordinates, SearchFilters, SortOrder};

use crate::api::StorefrontApi;
use crate::cache::{QueryCache, QueryKey};
use crate::error::{Result, StoreError};
use crate::models::{MenuItem, NewReview, Restaurant, RestaurantId, Review};
use std::any::Any;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, instrument};

pub const MAX_REVIEW_COMMENT_CHARS: usize = 500;

pub struct Catalog {
  api: Arc<dyn StorefrontApi>,
  cache: Arc<QueryCache>,
}

impl Catalog {
  pub fn new(api: Arc<dyn StorefrontApi>, cache: Arc<QueryCache>) -> Self {
    Self { api, cache }
  }

  pub async fn restaurants(&self, filters: &SearchFilters) -> Result<Arc<Vec<Restaurant>>> {
    self.cached(filters.cache_key(), self.api.list_restaurants(filters)).await
  }

  pub async fn restaurant(&self, restaurant_id: RestaurantId) -> Result<Arc<Restaurant>> {
    self
      .cached(QueryKey::Restaurant(restaurant_id), self.api.get_restaurant(restaurant_id))
      .await
  }

  /// Menu items of one restaurant, available ones first, otherwise in server order.
  pub async fn menu(&self, restaurant_id: RestaurantId) -> Result<Arc<Vec<MenuItem>>> {
    let fetch = async {
      let mut items = self.api.get_menu(restaurant_id).await?;
      items.sort_by_key(|m| !m.is_available);
      Ok::<_, StoreError>(items)
    };
    self.cached(QueryKey::Menu(restaurant_id), fetch).await
  }

  pub async fn reviews(&self, restaurant_id: RestaurantId) -> Result<Arc<Vec<Review>>> {
    self
      .cached(QueryKey::Reviews(restaurant_id), self.api.list_reviews(restaurant_id))
      .await
  }

  /// Posts a review and invalidates everything that shows the restaurant's rating.
  #[instrument(name = "Catalog::submit_review", skip(self, review), fields(restaurant_id = review.restaurant_id), err)]
  pub async fn submit_review(&self, mut review: NewReview) -> Result<Review> {
    if !(1..=5).contains(&review.rating) {
      return Err(StoreError::Validation("Rating must be between 1 and 5.".to_string()));
    }
    review.comment = review
      .comment
      .map(|c| c.trim().to_string())
      .filter(|c| !c.is_empty());
    if review
      .comment
      .as_ref()
      .is_some_and(|c| c.chars().count() > MAX_REVIEW_COMMENT_CHARS)
    {
      return Err(StoreError::Validation(format!(
        "Review comment must be at most {} characters.",
        MAX_REVIEW_COMMENT_CHARS
      )));
    }

    let created = self.api.create_review(&review).await?;
    let restaurant_id = review.restaurant_id;
    self.cache.invalidate(&QueryKey::Reviews(restaurant_id));
    self.cache.invalidate(&QueryKey::Restaurant(restaurant_id));
    let listings = self
      .cache
      .invalidate_where(|k| matches!(k, QueryKey::Restaurants(_)));
    info!(review_id = created.id, listings, "Review submitted.");
    Ok(created)
  }

  async fn cached<T, Fut>(&self, key: QueryKey, fetch: Fut) -> Result<Arc<T>>
  where
    T: Any + Send + Sync,
    Fut: Future<Output = Result<T>>,
  {
    if let Some(hit) = self.cache.get_fresh::<T>(&key) {
      debug!(?key, "Cache hit.");
      return Ok(hit);
    }
    let value = fetch.await?;
    Ok(self.cache.set(key, value))
  }
}
