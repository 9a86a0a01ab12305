// feastly/src/checkout/form.rs

use crate::models::{CartSnapshot, CheckoutRequest, PaymentMethod};
use std::collections::BTreeMap;

pub const MIN_ADDRESS_CHARS: usize = 10;
pub const MIN_PHONE_CHARS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
  Address,
  Phone,
}

impl Field {
  pub fn label(self) -> &'static str {
    match self {
      Field::Address => "address",
      Field::Phone => "phone",
    }
  }
}

pub type FieldErrors = BTreeMap<Field, String>;

/// Delivery details entered at checkout. Lives for the session only.
///
/// A flagged field's error disappears as soon as the field is edited to a
/// non-empty value; full re-validation happens on the next submit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckoutForm {
  address: String,
  phone: String,
  notes: String,
  payment_method: PaymentMethod,
  errors: FieldErrors,
}

impl CheckoutForm {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn address(&self) -> &str {
    &self.address
  }

  pub fn phone(&self) -> &str {
    &self.phone
  }

  pub fn notes(&self) -> &str {
    &self.notes
  }

  pub fn payment_method(&self) -> PaymentMethod {
    self.payment_method
  }

  pub fn set_address(&mut self, value: impl Into<String>) {
    self.address = value.into();
    self.clear_error_if_filled(Field::Address);
  }

  pub fn set_phone(&mut self, value: impl Into<String>) {
    self.phone = value.into();
    self.clear_error_if_filled(Field::Phone);
  }

  pub fn set_notes(&mut self, value: impl Into<String>) {
    self.notes = value.into();
  }

  pub fn set_payment_method(&mut self, method: PaymentMethod) {
    self.payment_method = method;
  }

  fn clear_error_if_filled(&mut self, field: Field) {
    let value = match field {
      Field::Address => &self.address,
      Field::Phone => &self.phone,
    };
    if !value.trim().is_empty() {
      self.errors.remove(&field);
    }
  }

  pub fn errors(&self) -> &FieldErrors {
    &self.errors
  }

  pub fn error(&self, field: Field) -> Option<&str> {
    self.errors.get(&field).map(String::as_str)
  }

  /// Checks every field without touching the stored errors.
  pub fn check(&self) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if let Some(msg) = check_min_chars(&self.address, MIN_ADDRESS_CHARS, "Delivery address") {
      errors.insert(Field::Address, msg);
    }
    if let Some(msg) = check_min_chars(&self.phone, MIN_PHONE_CHARS, "Phone number") {
      errors.insert(Field::Phone, msg);
    }
    errors
  }

  /// Re-validates and stores the result. Returns `true` when the form may be submitted.
  pub fn validate(&mut self) -> bool {
    self.errors = self.check();
    self.errors.is_empty()
  }

  /// Builds the checkout body: one sub-order per cart group, in cart order.
  pub fn to_request(&self, snapshot: &CartSnapshot) -> CheckoutRequest {
    let notes = self.notes.trim();
    CheckoutRequest {
      delivery_address: self.address.trim().to_string(),
      phone: self.phone.trim().to_string(),
      notes: (!notes.is_empty()).then(|| notes.to_string()),
      payment_method: self.payment_method,
      restaurants: CheckoutRequest::restaurant_orders(snapshot),
    }
  }

  pub fn reset(&mut self) {
    *self = CheckoutForm::default();
  }
}

fn check_min_chars(value: &str, min: usize, label: &str) -> Option<String> {
  let len = value.trim().chars().count();
  if len == 0 {
    Some(format!("{} is required", label))
  } else if len < min {
    Some(format!("{} must be at least {} characters", label, min))
  } else {
    None
  }
}
