// feastly/src/lib.rs

//! Feastly: a headless client for a food-ordering storefront.
//!
//! All business rules (pricing, stock, order states, payment) live behind the
//! remote REST API. What this crate owns is the client-side consistency of the
//! cart and the checkout sequence:
//!  - [`cart::CartStore`] mirrors the server cart as a grouped [`models::CartSnapshot`].
//!  - [`cart::CartMutations`] writes, then invalidates and refetches. No optimistic edits.
//!  - [`cart::CartController`] guards decrement-to-zero behind a delete confirmation.
//!  - [`checkout::CheckoutOrchestrator`] validates delivery details and submits the
//!    cart's per-restaurant grouping as one checkout.
//!
//! The front end supplies the [`api::StorefrontApi`], [`storage::KeyValueStore`],
//! [`notify::Notifier`] and [`navigation::Navigator`] implementations, or uses the
//! bundled ones through [`Storefront::from_config`].

pub mod api;
pub mod cache;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod flow;
pub mod models;
pub mod navigation;
pub mod notify;
pub mod orders;
pub mod session;
pub mod state;
pub mod storage;
pub mod storefront;

pub use crate::config::ClientConfig;
pub use crate::error::{Result, StoreError};
pub use crate::storefront::Storefront;
