//! Telshop CLI - browse the phone catalog, manage the cart and place orders.
//!
//! # Usage
//!
//! ```bash
//! # List the catalog
//! telshop catalog list
//!
//! # Filter by brand and maximum price
//! telshop catalog filter --brand apple --max-price 900
//!
//! # Put two units of telephone 5 in the cart and check out
//! telshop cart add 5
//! telshop cart set-quantity 1 2
//! telshop checkout --full-name "Ivan Ivanov" --phone +375291234567 --address "Minsk"
//!
//! # Interactive session
//! telshop shell
//! ```
//!
//! # Commands
//!
//! - `catalog` - List, show and filter telephones
//! - `cart` - Inspect and change the saved cart
//! - `checkout` - Submit the cart as an order
//! - `admin` - Manage telephones and orders
//! - `shell` - Interactive storefront session

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use sentry::integrations::tracing as sentry_tracing;
use telshop_core::{OrderId, OrderStatus, TelephoneId, TelephoneStatus};
use telshop_storefront::catalog::CatalogFilter;
use telshop_storefront::config::ShopConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "telshop")]
#[command(author, version, about = "Telshop phone storefront")]
struct Cli {
    /// Backend REST base URL (overrides `TELSHOP_API_BASE`)
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// File holding the saved cart (overrides `TELSHOP_CART_PATH`)
    #[arg(long, global = true)]
    cart_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Inspect and change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Submit the cart as an order
    Checkout(DeliveryArgs),
    /// Manage telephones and orders
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Start an interactive storefront session
    Shell,
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List every telephone
    List,
    /// Show one telephone
    Show { id: TelephoneId },
    /// Filter telephones
    Filter(FilterArgs),
}

#[derive(Args)]
struct FilterArgs {
    #[arg(long)]
    model: Option<String>,
    #[arg(long)]
    brand: Option<String>,
    #[arg(long)]
    color: Option<String>,
    /// `Available`, `OutOfStock` or `ComingSoon`
    #[arg(long)]
    status: Option<TelephoneStatus>,
    /// Inclusive upper price bound
    #[arg(long)]
    max_price: Option<Decimal>,
    #[arg(long)]
    storage: Option<String>,
    #[arg(long)]
    processor: Option<String>,
    /// Free text matched against brand, model and description
    #[arg(long)]
    search: Option<String>,
}

impl From<FilterArgs> for CatalogFilter {
    fn from(args: FilterArgs) -> Self {
        Self {
            model: args.model,
            brand: args.brand,
            color: args.color,
            status: args.status,
            max_price: args.max_price,
            storage: args.storage,
            processor: args.processor,
            search_term: args.search,
        }
    }
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart
    Show,
    /// Add one unit of a telephone
    Add { id: TelephoneId },
    /// Remove a line (position in `cart show`, or its cart ID)
    Remove { line: String },
    /// Set a line's quantity; 0 or less removes it
    SetQuantity {
        line: String,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
    /// Replace the cart with one unit of a telephone
    BuyNow { id: TelephoneId },
}

#[derive(Args)]
struct DeliveryArgs {
    #[arg(long)]
    full_name: String,
    /// Phone number in the format +375XXXXXXXXX
    #[arg(long)]
    phone: String,
    #[arg(long)]
    address: String,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Manage telephones
    Telephones {
        #[command(subcommand)]
        action: TelephoneAction,
    },
    /// Manage orders
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
}

#[derive(Subcommand)]
enum TelephoneAction {
    /// List telephones, optionally matching a search term
    List {
        #[arg(long)]
        search: Option<String>,
    },
    /// Create a telephone
    Create(TelephoneArgs),
    /// Update a telephone
    Update {
        id: TelephoneId,
        #[command(flatten)]
        fields: TelephoneArgs,
    },
    /// Delete a telephone
    Delete { id: TelephoneId },
}

#[derive(Args)]
struct TelephoneArgs {
    #[arg(long, default_value = "")]
    model: String,
    #[arg(long, default_value = "")]
    brand: String,
    #[arg(long, default_value = "")]
    price: String,
    #[arg(long, default_value = "")]
    color: String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long, default_value = "")]
    size: String,
    #[arg(long, default_value = "")]
    weight: String,
    #[arg(long, default_value = "")]
    display: String,
    #[arg(long, default_value = "")]
    camera: String,
    #[arg(long, default_value = "")]
    storage: String,
    #[arg(long, default_value = "")]
    connection: String,
    #[arg(long, default_value = "")]
    processor: String,
    #[arg(long, default_value = "Available")]
    status: TelephoneStatus,
    /// First image file
    #[arg(long)]
    image1: Option<PathBuf>,
    /// Second image file
    #[arg(long)]
    image2: Option<PathBuf>,
}

#[derive(Subcommand)]
enum OrderAction {
    /// List orders, optionally only those with one status
    List {
        #[arg(long)]
        status: Option<OrderStatus>,
    },
    /// Change an order's status
    SetStatus { id: OrderId, status: OrderStatus },
    /// Delete an order
    Delete { id: OrderId },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ShopConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

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

fn load_config(cli: &Cli) -> Result<ShopConfig, Box<dyn std::error::Error>> {
    let mut config = ShopConfig::from_env()?;
    if let Some(api_base) = &cli.api_base {
        config = config.with_api_base(api_base)?;
    }
    if let Some(cart_path) = &cli.cart_path {
        config = config.with_cart_path(cart_path.clone());
    }
    Ok(config)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries rendered views
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "telshop_cli=info,telshop_storefront=info,telshop_admin=info".into());

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: ShopConfig) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::List => commands::catalog::list(&config).await?,
            CatalogAction::Show { id } => commands::catalog::show(&config, id).await?,
            CatalogAction::Filter(args) => {
                commands::catalog::filter(&config, &args.into()).await?;
            }
        },
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&config)?,
            CartAction::Add { id } => commands::cart::add(&config, id).await?,
            CartAction::Remove { line } => commands::cart::remove(&config, &line)?,
            CartAction::SetQuantity { line, quantity } => {
                commands::cart::set_quantity(&config, &line, quantity)?;
            }
            CartAction::Clear => commands::cart::clear(&config)?,
            CartAction::BuyNow { id } => commands::cart::buy_now(&config, id).await?,
        },
        Commands::Checkout(args) => {
            let form = commands::checkout::delivery_form(&args.full_name, &args.phone, &args.address);
            commands::checkout::submit(&config, &form).await?;
        }
        Commands::Admin { action } => match action {
            AdminAction::Telephones { action } => match action {
                TelephoneAction::List { search } => {
                    commands::admin::list_telephones(&config, search.as_deref()).await?;
                }
                TelephoneAction::Create(args) => {
                    let (form, images) = args.into_form();
                    commands::admin::save_telephone(&config, None, &form, &images).await?;
                }
                TelephoneAction::Update { id, fields } => {
                    let (form, images) = fields.into_form();
                    commands::admin::save_telephone(&config, Some(id), &form, &images).await?;
                }
                TelephoneAction::Delete { id } => {
                    commands::admin::delete_telephone(&config, id).await?;
                }
            },
            AdminAction::Orders { action } => match action {
                OrderAction::List { status } => commands::admin::list_orders(&config, status).await?,
                OrderAction::SetStatus { id, status } => {
                    commands::admin::set_order_status(&config, id, status).await?;
                }
                OrderAction::Delete { id } => commands::admin::delete_order(&config, id).await?,
            },
        },
        Commands::Shell => commands::shell::run(&config).await?,
    }
    Ok(())
}

impl TelephoneArgs {
    fn into_form(self) -> (telshop_admin::TelephoneForm, [Option<PathBuf>; 2]) {
        let form = telshop_admin::TelephoneForm {
            model: self.model,
            brand: self.brand,
            color: self.color,
            description: self.description,
            price: self.price,
            size: self.size,
            weight: self.weight,
            display: self.display,
            camera: self.camera,
            storage: self.storage,
            connection: self.connection,
            processor: self.processor,
            status: self.status,
        };
        (form, [self.image1, self.image2])
    }
}
