// feastly/src/catalog/filters.rs

//! Restaurant search filters that round-trip through a URL query string, so the
//! current listing can be bookmarked, shared and restored.

use crate::cache::QueryKey;
use url::form_urlencoded;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
  Rating,
  Distance,
  DeliveryTime,
  Name,
}

impl SortOrder {
  pub fn as_str(self) -> &'static str {
    match self {
      SortOrder::Rating => "rating",
      SortOrder::Distance => "distance",
      SortOrder::DeliveryTime => "delivery_time",
      SortOrder::Name => "name",
    }
  }
}

impl std::str::FromStr for SortOrder {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "rating" => Ok(SortOrder::Rating),
      "distance" => Ok(SortOrder::Distance),
      "delivery_time" => Ok(SortOrder::DeliveryTime),
      "name" => Ok(SortOrder::Name),
      other => Err(format!("unknown sort order '{}'", other)),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
  pub lat: f64,
  pub lng: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilters {
  pub search: Option<String>,
  pub category: Option<String>,
  pub sort: Option<SortOrder>,
  pub location: Option<Coordinates>,
  pub open_now: bool,
  pub page: Option<u32>,
}

impl SearchFilters {
  pub fn new() -> Self {
    Self::default()
  }

  /// Changing the search text starts over from the first page.
  pub fn with_search(mut self, text: impl Into<String>) -> Self {
    let text = text.into();
    let trimmed = text.trim();
    self.search = (!trimmed.is_empty()).then(|| trimmed.to_string());
    self.page = None;
    self
  }

  pub fn with_category(mut self, category: impl Into<String>) -> Self {
    let category = category.into();
    self.category = (!category.trim().is_empty()).then(|| category.trim().to_string());
    self.page = None;
    self
  }

  pub fn with_sort(mut self, sort: SortOrder) -> Self {
    self.sort = Some(sort);
    self
  }

  pub fn near(mut self, lat: f64, lng: f64) -> Self {
    self.location = Some(Coordinates { lat, lng });
    self
  }

  pub fn open_now(mut self, open_now: bool) -> Self {
    self.open_now = open_now;
    self
  }

  /// Page 1 is the default and is not written to the query string.
  pub fn with_page(mut self, page: u32) -> Self {
    self.page = (page > 1).then_some(page);
    self
  }

  /// Query parameters in a fixed order; defaults are omitted.
  pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
    let mut pairs = Vec::new();
    if let Some(search) = &self.search {
      pairs.push(("search", search.clone()));
    }
    if let Some(category) = &self.category {
      pairs.push(("category", category.clone()));
    }
    if let Some(sort) = self.sort {
      pairs.push(("sort", sort.as_str().to_string()));
    }
    if let Some(loc) = self.location {
      pairs.push(("lat", loc.lat.to_string()));
      pairs.push(("lng", loc.lng.to_string()));
    }
    if self.open_now {
      pairs.push(("openNow", "true".to_string()));
    }
    if let Some(page) = self.page {
      pairs.push(("page", page.to_string()));
    }
    pairs
  }

  pub fn to_query_string(&self) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in self.to_query_pairs() {
      serializer.append_pair(key, &value);
    }
    serializer.finish()
  }

  /// Parses a query string (with or without a leading `?`). Unknown keys and
  /// malformed values are ignored; a lone `lat` or `lng` is dropped.
  pub fn from_query_string(query: &str) -> Self {
    let mut filters = SearchFilters::default();
    let (mut lat, mut lng, mut page) = (None, None, None);

    for (key, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
      match key.as_ref() {
        "search" => filters = filters.with_search(value.into_owned()),
        "category" => filters = filters.with_category(value.into_owned()),
        "sort" => match value.parse::<SortOrder>() {
          Ok(sort) => filters.sort = Some(sort),
          Err(e) => tracing::debug!(error = %e, "Ignoring sort parameter."),
        },
        "lat" => lat = value.parse::<f64>().ok().filter(|v| (-90.0..=90.0).contains(v)),
        "lng" => lng = value.parse::<f64>().ok().filter(|v| (-180.0..=180.0).contains(v)),
        "openNow" => filters.open_now = value == "true" || value == "1",
        "page" => page = value.parse::<u32>().ok().filter(|p| *p > 1),
        _ => {}
      }
    }

    if let (Some(lat), Some(lng)) = (lat, lng) {
      filters.location = Some(Coordinates { lat, lng });
    }
    filters.page = page;
    filters
  }

  pub fn cache_key(&self) -> QueryKey {
    QueryKey::Restaurants(self.to_query_string())
  }
}
