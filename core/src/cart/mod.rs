// feastly/src/cart/mod.rs

//! The cart consistency model.
//!
//! - [`CartStore`] holds the last snapshot fetched from the server, plus
//!   loading/updating flags, and refetches whenever the cart cache is invalidated.
//! - [`CartMutations`] performs writes against the API and invalidates the cart
//!   on success. It never edits the snapshot itself.
//! - [`CartController`] turns increment/decrement/delete intents into mutations
//!   and owns the delete-confirmation dialog.

pub mod controller;
pub mod mutations;
pub mod state;
pub mod store;

pub use controller::{CartController, DeleteDialog, IntentOutcome};
pub use mutations::{CartMutations, ADDED_TO_CART_MESSAGE};
pub use state::{reduce_cart, CartAction, CartState, FetchTicket};
pub use store::CartStore;
