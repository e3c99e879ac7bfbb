//! Basket Demo
//!
//! Prices a fixture basket and prints the receipt.
//!
//! Use `-f` to load a fixture set by name
//! Use `-o` to choose the `exhaustive` or `knapsack` optimizer
//! Use `-l` to set the log filter when `RUST_LOG` is unset

use std::{io, time::Instant};

use anyhow::Result;
use basket_pricer::{fixtures::Fixture, receipt::Receipt, utils::ExampleBasketArgs};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Basket Demo
#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    let args = ExampleBasketArgs::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .with_writer(io::stderr)
        .init();

    let fixture = Fixture::from_set(&args.fixture)?;
    let offers = fixture.offer_index();
    let basket = fixture.basket()?;

    let start = Instant::now();

    let result = args.optimizer.calculate(&basket, fixture.catalog()?, &offers)?;

    let elapsed = start.elapsed().as_secs_f32();

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    Receipt::from_price_result(&result).write_to(&mut handle)?;

    println!("\nPriced with {:?} optimizer in {elapsed}s", args.optimizer);

    Ok(())
}
