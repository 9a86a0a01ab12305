// feastly/src/notify.rs

//! User-visible notifications ("toasts").

use parking_lot::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
  Success,
  Info,
  Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
  pub level: ToastLevel,
  pub message: String,
}

impl Toast {
  pub fn success(message: impl Into<String>) -> Self {
    Self {
      level: ToastLevel::Success,
      message: message.into(),
    }
  }

  pub fn info(message: impl Into<String>) -> Self {
    Self {
      level: ToastLevel::Info,
      message: message.into(),
    }
  }

  pub fn error(message: impl Into<String>) -> Self {
    Self {
      level: ToastLevel::Error,
      message: message.into(),
    }
  }
}

/// Where toasts go. The front end decides how they are displayed.
pub trait Notifier: Send + Sync {
  fn notify(&self, toast: Toast);
}

/// Emits toasts as tracing events only.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
  fn notify(&self, toast: Toast) {
    match toast.level {
      ToastLevel::Error => tracing::warn!(toast = %toast.message, "Error toast."),
      _ => tracing::info!(toast = %toast.message, level = ?toast.level, "Toast."),
    }
  }
}

/// Keeps every toast in memory until drained.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
  toasts: Mutex<Vec<Toast>>,
}

impl RecordingNotifier {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn toasts(&self) -> Vec<Toast> {
    self.toasts.lock().clone()
  }

  pub fn drain(&self) -> Vec<Toast> {
    std::mem::take(&mut *self.toasts.lock())
  }
}

impl Notifier for RecordingNotifier {
  fn notify(&self, toast: Toast) {
    self.toasts.lock().push(toast);
  }
}
