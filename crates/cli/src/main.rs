//! Kopernik CLI - drive the client-local cart from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Add a pizza by id, or any item by "<type>-<id>" reference
//! kopernik add 7
//! kopernik add drink-2
//!
//! # Adjust and remove lines
//! kopernik incr 7
//! kopernik decr 2 --type drink
//! kopernik remove 7
//!
//! # Inspect the cart
//! kopernik show
//! kopernik mini
//!
//! # Save order-form fields, then place the order
//! kopernik customer set name "Ada Lovelace"
//! kopernik checkout
//! ```
//!
//! # Environment Variables
//!
//! See [`kopernik_cart::config`]. Logs go to stderr and honour `RUST_LOG`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use kopernik_cart::{CartConfig, CustomerField};
use kopernik_core::ItemType;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

use commands::Context;

#[derive(Parser)]
#[command(name = "kopernik")]
#[command(author, version, about = "Kopernik cart tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add one unit of an item (`7`, `drink-2`)
    Add {
        /// Item reference: a bare id or `<type>-<id>`
        reference: String,

        /// Item type, overriding any type in the reference
        #[arg(short = 't', long = "type")]
        item_type: Option<String>,
    },
    /// Increase a line's quantity by one
    Incr {
        /// Item id
        id: i32,

        /// Item type (`pizza`, `drink`, `dessert`)
        #[arg(short = 't', long = "type", default_value_t = ItemType::Pizza)]
        item_type: ItemType,
    },
    /// Decrease a line's quantity by one, removing it at zero
    Decr {
        /// Item id
        id: i32,

        /// Item type (`pizza`, `drink`, `dessert`)
        #[arg(short = 't', long = "type", default_value_t = ItemType::Pizza)]
        item_type: ItemType,
    },
    /// Remove a line
    Remove {
        /// Item id
        id: i32,

        /// Item type (`pizza`, `drink`, `dessert`)
        #[arg(short = 't', long = "type", default_value_t = ItemType::Pizza)]
        item_type: ItemType,
    },
    /// Show the checkout cart with prices and the estimated total
    Show,
    /// Show the mini-cart dropdown and badge count
    Mini,
    /// Print the cart badge count
    Count,
    /// Manage saved order-form fields
    Customer {
        #[command(subcommand)]
        action: CustomerAction,
    },
    /// Submit the cart as an order
    Checkout,
}

#[derive(Subcommand)]
enum CustomerAction {
    /// Save one field (`name`, `email`, `phone`, `address`, `birthday`, `discount_code`)
    Set { field: CustomerField, value: String },
    /// Print the saved fields
    Show,
    /// Forget all saved fields
    Clear,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &CartConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match CartConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            output::error(&e);
            std::process::exit(2);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "kopernik=warn,kopernik_cart=warn".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let ctx = Context::load(config);

    if let Err(e) = run(cli, &ctx).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, ctx: &Context) -> kopernik_cart::Result<()> {
    match cli.command {
        Commands::Add {
            reference,
            item_type,
        } => commands::cart::add(ctx, &reference, item_type.as_deref())?,
        Commands::Incr { id, item_type } => commands::cart::change(ctx, id, item_type, 1)?,
        Commands::Decr { id, item_type } => commands::cart::change(ctx, id, item_type, -1)?,
        Commands::Remove { id, item_type } => commands::cart::remove(ctx, id, item_type)?,
        Commands::Show => commands::cart::show(ctx),
        Commands::Mini => commands::cart::mini(ctx),
        Commands::Count => commands::cart::count(ctx),
        Commands::Customer { action } => match action {
            CustomerAction::Set { field, value } => commands::customer::set(ctx, field, &value)?,
            CustomerAction::Show => commands::customer::show(ctx),
            CustomerAction::Clear => commands::customer::clear(ctx)?,
        },
        Commands::Checkout => commands::checkout::run(ctx).await?,
    }
    Ok(())
}
