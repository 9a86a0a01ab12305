// feastly/apps/storefront_cli/src/console.rs

use feastly::models::{CartSnapshot, MenuItem, Order, Price, Restaurant};
use feastly::navigation::{Navigator, Route};
use feastly::notify::{Notifier, Toast, ToastLevel};
use std::io::{self, BufRead, Write};

/// Prints toasts to stderr so stdout stays clean for listings.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
  fn notify(&self, toast: Toast) {
    let tag = match toast.level {
      ToastLevel::Success => "ok",
      ToastLevel::Info => "info",
      ToastLevel::Error => "error",
    };
    eprintln!("[{}] {}", tag, toast.message);
  }
}

/// A terminal has no router; route changes are only reported.
pub struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
  fn navigate(&self, route: Route) {
    tracing::debug!(path = %route.path(), "Navigation requested.");
  }
}

/// `130000` -> `Rp 130.000`
pub fn format_price(amount: Price) -> String {
  let digits = amount.to_string();
  let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
  for (i, ch) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      grouped.push('.');
    }
    grouped.push(ch);
  }
  format!("Rp {}", grouped)
}

pub fn print_cart(snapshot: &CartSnapshot) {
  if snapshot.is_empty() {
    println!("Your cart is empty.");
    return;
  }
  for group in snapshot.groups() {
    println!("{} (#{})", group.restaurant().name, group.restaurant().id);
    for item in group.items() {
      println!(
        "  [{}] {} x{} @ {} = {}",
        item.id,
        item.menu.name,
        item.quantity,
        format_price(item.menu.price),
        format_price(item.line_total())
      );
    }
    println!("  Subtotal: {}", format_price(group.subtotal()));
  }
  println!("Items: {}", snapshot.item_count());
  println!("Total: {}", format_price(snapshot.grand_total()));
}

pub fn print_restaurants(restaurants: &[Restaurant]) {
  if restaurants.is_empty() {
    println!("No restaurants found.");
  }
  for r in restaurants {
    let rating = r.rating.map(|v| format!("{:.1}", v)).unwrap_or_else(|| "-".to_string());
    let status = if r.is_open { "open" } else { "closed" };
    println!(
      "[{}] {} ({}) rating {} {}",
      r.id,
      r.name,
      r.category.as_deref().unwrap_or("uncategorized"),
      rating,
      status
    );
  }
}

pub fn print_menu(items: &[MenuItem]) {
  for m in items {
    let marker = if m.is_available { "" } else { " (sold out)" };
    println!("[{}] {} {}{}", m.id, m.name, format_price(m.price), marker);
  }
}

pub fn print_order(order: &Order) {
  let placed = order
    .created_at
    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
    .unwrap_or_default();
  let restaurant = order.restaurant.as_ref().map(|r| r.name.as_str()).unwrap_or("");
  println!(
    "#{} {:?} {} {} {}",
    order.id,
    order.status,
    format_price(order.total),
    restaurant,
    placed
  );
}

/// Asks a yes/no question on stdin. Anything but `y`/`yes` is a no.
pub fn confirm(question: &str) -> io::Result<bool> {
  print!("{} [y/N] ", question);
  io::stdout().flush()?;
  let mut answer = String::new();
  io::stdin().lock().read_line(&mut answer)?;
  Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

#[cfg(test)]
mod tests {
  use super::format_price;

  #[test]
  fn groups_thousands() {
    assert_eq!(format_price(0), "Rp 0");
    assert_eq!(format_price(999), "Rp 999");
    assert_eq!(format_price(30_000), "Rp 30.000");
    assert_eq!(format_price(130_000), "Rp 130.000");
    assert_eq!(format_price(1_250_000), "Rp 1.250.000");
  }
}
