// feastly/apps/storefront_cli/src/commands.rs

use crate::console::{self, format_price};

use anyhow::{anyhow, bail, Context};
use clap::Subcommand;
use feastly::cart::IntentOutcome;
use feastly::catalog::{SearchFilters, SortOrder};
use feastly::checkout::{CheckoutForm, CheckoutOutcome};
use feastly::models::{CartItem, CartItemId, MenuId, NewReview, OrderId, PaymentMethod, RestaurantId};
use feastly::Storefront;

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Sign in and remember the session.
  Login {
    #[arg(long)]
    email: String,
    #[arg(long)]
    password: String,
  },
  /// Forget the stored session.
  Logout,
  /// Show the signed-in user.
  Whoami,
  /// List restaurants.
  Restaurants {
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    category: Option<String>,
    /// rating, distance, delivery_time or name.
    #[arg(long)]
    sort: Option<SortOrder>,
    #[arg(long, requires = "lng")]
    lat: Option<f64>,
    #[arg(long, requires = "lat")]
    lng: Option<f64>,
    #[arg(long)]
    open_now: bool,
    #[arg(long)]
    page: Option<u32>,
    /// A saved query string such as `search=soto&sort=rating`. Other filter flags are ignored.
    #[arg(long, conflicts_with_all = ["search", "category", "sort", "lat", "lng", "open_now", "page"])]
    query: Option<String>,
  },
  /// Show a restaurant's menu.
  Menu { restaurant_id: RestaurantId },
  /// Show a restaurant's reviews.
  Reviews { restaurant_id: RestaurantId },
  /// Review a restaurant.
  Review {
    restaurant_id: RestaurantId,
    #[arg(long)]
    rating: u8,
    #[arg(long)]
    comment: Option<String>,
    #[arg(long)]
    order: Option<OrderId>,
  },
  /// Show the cart.
  Cart,
  /// Add a menu item to the cart.
  Add {
    menu_id: MenuId,
    #[arg(long)]
    restaurant: RestaurantId,
    #[arg(long, default_value_t = 1)]
    quantity: u32,
  },
  /// Add one unit to a cart line.
  Inc { item_id: CartItemId },
  /// Remove one unit from a cart line; the last unit asks for confirmation.
  Dec {
    item_id: CartItemId,
    #[arg(long, short)]
    yes: bool,
  },
  /// Remove a cart line.
  Remove {
    item_id: CartItemId,
    #[arg(long, short)]
    yes: bool,
  },
  /// Empty the cart.
  Clear {
    #[arg(long, short)]
    yes: bool,
  },
  /// Place one order per restaurant in the cart.
  Checkout {
    #[arg(long)]
    address: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    notes: Option<String>,
    /// cash, bank_transfer or e_wallet.
    #[arg(long, default_value = "cash")]
    payment: PaymentMethod,
  },
  /// List past orders, newest first.
  Orders,
  /// Track one order.
  Order { order_id: OrderId },
  /// Show the summary of the last order placed from this machine.
  LastOrder,
}

pub async fn run(store: &Storefront, command: Command) -> anyhow::Result<()> {
  match command {
    Command::Login { email, password } => {
      let user = store.session.login(&email, &password).await?;
      println!("Signed in as {} <{}>", user.name, user.email);
    }
    Command::Logout => {
      store.logout()?;
      println!("Signed out.");
    }
    Command::Whoami => {
      let user = store.session.load_user().await?;
      println!("{} <{}>", user.name, user.email);
    }
    Command::Restaurants {
      search,
      category,
      sort,
      lat,
      lng,
      open_now,
      page,
      query,
    } => {
      let filters = match query {
        Some(q) => SearchFilters::from_query_string(&q),
        None => {
          let mut f = SearchFilters::new()
            .with_search(search.unwrap_or_default())
            .with_category(category.unwrap_or_default())
            .open_now(open_now);
          if let Some(sort) = sort {
            f = f.with_sort(sort);
          }
          if let (Some(lat), Some(lng)) = (lat, lng) {
            f = f.near(lat, lng);
          }
          if let Some(page) = page {
            f = f.with_page(page);
          }
          f
        }
      };
      tracing::debug!(query = %filters.to_query_string(), "Listing restaurants.");
      let restaurants = store.catalog.restaurants(&filters).await?;
      console::print_restaurants(&restaurants);
    }
    Command::Menu { restaurant_id } => {
      let restaurant = store.catalog.restaurant(restaurant_id).await?;
      println!("{}", restaurant.name);
      let menu = store.catalog.menu(restaurant_id).await?;
      console::print_menu(&menu);
    }
    Command::Reviews { restaurant_id } => {
      let reviews = store.catalog.reviews(restaurant_id).await?;
      if reviews.is_empty() {
        println!("No reviews yet.");
      }
      for r in reviews.iter() {
        println!(
          "{}/5 {}: {}",
          r.rating,
          r.user_name.as_deref().unwrap_or("anonymous"),
          r.comment.as_deref().unwrap_or("")
        );
      }
    }
    Command::Review {
      restaurant_id,
      rating,
      comment,
      order,
    } => {
      store
        .catalog
        .submit_review(NewReview {
          restaurant_id,
          order_id: order,
          rating,
          comment,
        })
        .await?;
      println!("Review submitted.");
    }
    Command::Cart => {
      let snapshot = require_cart(store).await?;
      console::print_cart(&snapshot);
    }
    Command::Add {
      menu_id,
      restaurant,
      quantity,
    } => {
      store.mutations.add_to_cart(menu_id, quantity, restaurant).await?;
      if let Some(snapshot) = store.cart.snapshot() {
        println!("Cart: {} items, {}", snapshot.item_count(), format_price(snapshot.grand_total()));
      }
    }
    Command::Inc { item_id } => {
      let item = cart_line(store, item_id).await?;
      report(store.controller.increment(&item).await?);
    }
    Command::Dec { item_id, yes } => {
      let item = cart_line(store, item_id).await?;
      let outcome = store.controller.decrement(&item).await?;
      if let IntentOutcome::ConfirmationRequested { .. } = outcome {
        settle_delete(store, &item, yes).await?;
      } else {
        report(outcome);
      }
    }
    Command::Remove { item_id, yes } => {
      let item = cart_line(store, item_id).await?;
      store.controller.request_delete(item.id);
      settle_delete(store, &item, yes).await?;
    }
    Command::Clear { yes } => {
      let snapshot = require_cart(store).await?;
      if snapshot.is_empty() {
        println!("Your cart is already empty.");
        return Ok(());
      }
      if !yes && !console::confirm("Remove every item from the cart?")? {
        println!("Kept the cart.");
        return Ok(());
      }
      store.mutations.clear_cart().await?;
      println!("Cart cleared.");
    }
    Command::Checkout {
      address,
      phone,
      notes,
      payment,
    } => {
      require_cart(store).await?;
      let mut form = CheckoutForm::new();
      form.set_address(address);
      form.set_phone(phone);
      form.set_notes(notes.unwrap_or_default());
      form.set_payment_method(payment);

      match store.checkout.submit(&mut form).await? {
        CheckoutOutcome::Placed(summary) => {
          println!(
            "Placed {} order(s) for {} item(s), total {}.",
            summary.order_ids.len(),
            summary.item_count,
            format_price(summary.grand_total)
          );
          for id in &summary.order_ids {
            println!("  order #{}", id);
          }
        }
        CheckoutOutcome::Invalid(errors) => {
          for (field, message) in &errors {
            eprintln!("{}: {}", field.label(), message);
          }
          bail!("delivery details are incomplete");
        }
        CheckoutOutcome::AlreadySubmitting => bail!("a checkout is already in progress"),
      }
    }
    Command::Orders => {
      let orders = store.orders.history().await?;
      if orders.is_empty() {
        println!("No orders yet.");
      }
      for order in orders.iter() {
        console::print_order(order);
      }
    }
    Command::Order { order_id } => {
      let order = store.orders.track(order_id).await?;
      console::print_order(&order);
      for item in &order.items {
        println!(
          "  {} x{} @ {}",
          item.name.as_deref().unwrap_or("item"),
          item.quantity,
          format_price(item.price)
        );
      }
    }
    Command::LastOrder => match store.orders.last_order()? {
      Some(summary) => println!(
        "{} order(s), {} item(s), {} to {} ({})",
        summary.order_ids.len(),
        summary.item_count,
        format_price(summary.grand_total),
        summary.delivery_address,
        summary.placed_at.format("%Y-%m-%d %H:%M")
      ),
      None => println!("No order placed yet."),
    },
  }
  Ok(())
}

async fn require_cart(store: &Storefront) -> anyhow::Result<std::sync::Arc<feastly::models::CartSnapshot>> {
  store
    .cart
    .mount()
    .await?
    .ok_or_else(|| anyhow!("sign in first with `feastly login`"))
}

async fn cart_line(store: &Storefront, item_id: CartItemId) -> anyhow::Result<CartItem> {
  let snapshot = require_cart(store).await?;
  snapshot
    .find_item(item_id)
    .cloned()
    .with_context(|| format!("no cart line with id {}", item_id))
}

async fn settle_delete(store: &Storefront, item: &CartItem, yes: bool) -> anyhow::Result<()> {
  let question = format!("Remove {} from the cart?", item.menu.name);
  if yes || console::confirm(&question)? {
    report(store.controller.confirm_delete().await?);
  } else {
    report(store.controller.cancel_delete());
  }
  Ok(())
}

fn report(outcome: IntentOutcome) {
  match outcome {
    IntentOutcome::Updated { item_id, quantity } => println!("Line {} now has {} unit(s).", item_id, quantity),
    IntentOutcome::Removed { item_id } => println!("Line {} removed.", item_id),
    IntentOutcome::Cancelled => println!("Kept the item."),
    IntentOutcome::ConfirmationRequested { item_id } => println!("Line {} needs confirmation.", item_id),
    IntentOutcome::Ignored => println!("Nothing to do."),
  }
}
