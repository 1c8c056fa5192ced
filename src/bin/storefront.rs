//! Storefront Demo
//!
//! Seeds a storefront, runs a short shopping session and prints the catalog
//! and order summary.
//!
//! Use `-d` to persist state to a directory of JSON files
//! Use `-c` to choose the coupon applied at checkout
//! Use `-a` to render prices the way the admin view does

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use tabled::{builder::Builder, settings::Style};

use cartwheel::prelude::*;

/// Arguments for the storefront demo
#[derive(Debug, Parser)]
struct DemoArgs {
    /// Directory for persisted JSON state; runs in memory when omitted
    #[clap(short, long)]
    data_dir: Option<PathBuf>,

    /// Coupon code to apply at checkout
    #[clap(short, long, default_value = "AMOUNT5000")]
    coupon: String,

    /// Render prices the way the admin view does
    #[clap(short, long)]
    admin: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = DemoArgs::parse();

    let view = if args.admin {
        PriceView::Admin
    } else {
        PriceView::Customer
    };

    match args.data_dir {
        Some(dir) => run(
            Storefront::open(JsonFileStorage::new(dir)),
            &args.coupon,
            view,
        ),
        None => run(Storefront::open(MemoryStorage::new()), &args.coupon, view),
    }
}

#[expect(clippy::print_stdout, reason = "Demo binary")]
fn run<S: Storage>(
    mut shop: Storefront<S>,
    coupon: &str,
    view: PriceView,
) -> Result<(), Box<dyn Error>> {
    // A short session: one line deep enough to unlock a bulk tier, plus a
    // single unit of the next product.
    let ids: Vec<ProductId> = shop.catalog().iter().map(|p| p.id.clone()).collect();

    if let Some(first) = ids.first() {
        shop.add_to_cart(first);
        shop.update_quantity(first, 15);
    }

    if let Some(second) = ids.get(1) {
        shop.add_to_cart(second);
    }

    shop.apply_coupon(coupon);

    let mut builder = Builder::default();

    builder.push_record(["Id", "Name", "Price", "In cart", "Left"]);

    for product in shop.catalog().iter() {
        builder.push_record([
            product.id.to_string(),
            product.name.clone(),
            product_price_label(product, shop.cart(), view),
            shop.cart().quantity_of(&product.id).to_string(),
            shop.remaining_stock(&product.id).unwrap_or(0).max(0).to_string(),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::rounded());

    println!("{table}");

    let totals = shop.totals()?;

    println!();
    println!(
        "Subtotal: {}",
        total_label(totals.total_before_discount(), view)
    );
    println!(
        "Total:    {}",
        total_label(totals.total_after_discount(), view)
    );
    println!("Saved:    {}", total_label(totals.savings(), view));

    let order_number = shop.complete_order();

    println!();

    for (_, notification) in shop.notifications().iter() {
        println!("[{:?}] {}", notification.kind(), notification.message());
    }

    println!();
    println!("Order {order_number} complete");

    Ok(())
}
