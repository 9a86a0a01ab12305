// tests/session_orders_tests.rs
mod common;

use common::*;
use feastly::cache::QueryKey;
use feastly::models::{CartSnapshot, OrderStatus, PaymentMethod, ProfileUpdate, RegisterRequest};
use feastly::checkout::{CheckoutForm, CheckoutOutcome};
use feastly::storage::{KeyValueStore, TOKEN_KEY};
use feastly::StoreError;

#[tokio::test]
async fn test_login_persists_token_and_enables_cart() {
  let h = Harness::signed_out();
  assert!(!h.store.session.is_authenticated());

  let user = h.store.session.login(" sari@example.com ", "secret").await.expect("login");

  assert_eq!(user, test_user());
  assert!(h.store.session.is_authenticated());
  assert!(h.store.cart.is_enabled());
  assert_eq!(h.storage.get(TOKEN_KEY).unwrap().as_deref(), Some(TEST_TOKEN));
  assert_eq!(h.store.session.user(), Some(test_user()));
}

#[tokio::test]
async fn test_bad_credentials_keep_session_signed_out() {
  let h = Harness::signed_out();

  let err = h.store.session.login("sari@example.com", "wrong").await.unwrap_err();
  assert_eq!(err.user_message(), "Invalid email or password");
  assert!(!h.store.session.is_authenticated());

  assert!(matches!(
    h.store.session.login("", "secret").await,
    Err(StoreError::Validation(_))
  ));
  assert_eq!(h.api.calls("login"), 1);
}

#[tokio::test]
async fn test_register_checks_password_length() {
  let h = Harness::signed_out();
  let short = RegisterRequest {
    name: "Budi".to_string(),
    email: "budi@example.com".to_string(),
    password: "12345".to_string(),
    phone: None,
  };
  assert!(matches!(
    h.store.session.register(short.clone()).await,
    Err(StoreError::Validation(_))
  ));
  assert_eq!(h.api.calls("register"), 0);

  let user = h
    .store
    .session
    .register(RegisterRequest {
      password: "123456".to_string(),
      ..short
    })
    .await
    .expect("register");
  assert_eq!(user.name, "Budi");
  assert!(h.store.session.is_authenticated());
}

#[tokio::test]
async fn test_restored_token_loads_user_once() {
  let h = Harness::signed_in();
  assert!(h.store.session.is_authenticated());
  assert!(h.store.session.user().is_none());

  h.store.session.load_user().await.unwrap();
  h.store.session.load_user().await.unwrap();
  assert_eq!(h.api.calls("current_user"), 1);
  assert_eq!(h.store.session.user(), Some(test_user()));
}

#[tokio::test]
async fn test_rejected_token_signs_out() {
  let h = Harness::signed_in();
  h.api.seed_cart(&[(NASI_GORENG, 2)]);
  let mounted = h.store.cart.mount().await.unwrap().expect("enabled");
  assert_eq!(mounted.grand_total(), 100_000);
  h.api.fail("current_user", 401, "Token expired");

  let err = h.store.session.load_user().await.unwrap_err();

  assert!(matches!(err, StoreError::Unauthenticated));
  assert!(!h.store.session.is_authenticated());
  assert!(h.storage.get(TOKEN_KEY).unwrap().is_none());
  assert!(!h.store.cart.is_enabled());
  assert!(h.store.cart.snapshot().is_none());
  assert!(h.store.cache().get::<CartSnapshot>(&QueryKey::Cart).is_none());
}

#[tokio::test]
async fn test_profile_update_refreshes_user() {
  let h = Harness::signed_in();

  let empty_name = ProfileUpdate {
    name: Some("  ".to_string()),
    ..ProfileUpdate::default()
  };
  assert!(matches!(
    h.store.session.update_profile(empty_name).await,
    Err(StoreError::Validation(_))
  ));

  let user = h
    .store
    .session
    .update_profile(ProfileUpdate {
      phone: Some("0811111111".to_string()),
      address: Some("Jl. Dago 12".to_string()),
      ..ProfileUpdate::default()
    })
    .await
    .expect("update");

  assert_eq!(user.phone.as_deref(), Some("0811111111"));
  assert_eq!(h.store.session.user(), Some(user));
  assert!(!h.store.cache().is_stale(&QueryKey::Profile));
}

#[tokio::test]
async fn test_logout_forgets_cart_and_cache() {
  let h = Harness::signed_in();
  h.api.seed_cart(&[(SOTO, 1)]);
  h.store.cart.mount().await.unwrap();

  h.store.logout().expect("logout");

  assert!(!h.store.session.is_authenticated());
  assert!(h.store.cart.snapshot().is_none());
  assert!(h.store.cache().is_stale(&QueryKey::Cart));
  assert!(h.store.cart.mount().await.unwrap().is_none());
}

#[tokio::test]
async fn test_order_tracking_sees_status_changes() {
  let h = Harness::signed_in();
  h.api.seed_cart(&[(SOTO, 1), (NASI_GORENG, 1)]);
  let mut form = CheckoutForm::new();
  form.set_address("Jl. Braga No. 99, Bandung");
  form.set_phone("081298765432");
  form.set_payment_method(PaymentMethod::BankTransfer);
  let CheckoutOutcome::Placed(summary) = h.store.checkout.submit(&mut form).await.unwrap() else {
    panic!("expected Placed");
  };
  let order_id = summary.order_ids[0];

  let history = h.store.orders.history().await.unwrap();
  assert_eq!(history.len(), 2);
  assert_eq!(h.store.orders.track(order_id).await.unwrap().status, OrderStatus::Pending);

  h.api.set_order_status(order_id, OrderStatus::OnTheWay);
  let tracked = h.store.orders.track(order_id).await.unwrap();
  assert_eq!(tracked.status, OrderStatus::OnTheWay);
  assert_eq!(tracked.payment_method, Some(PaymentMethod::BankTransfer));
  assert!(h.store.cache().is_stale(&QueryKey::Orders), "listing refetches after a status change");

  assert!(matches!(
    h.store.orders.track(9_999).await,
    Err(StoreError::Api { status: 404, .. })
  ));
}
