//! Emporium CLI - Shop from the terminal and run the admin console.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! emporium products list --category electronics
//!
//! # Log in (password from EMPORIUM_PASSWORD or --password)
//! emporium auth login -e asha@example.com
//!
//! # Fill the cart and check out
//! emporium cart add 665f2a9c --quantity 2
//! emporium checkout --full-name "Asha Rao" --email asha@example.com \
//!     --phone 9876543210 --address "12 MG Road" --city Bengaluru \
//!     --state Karnataka --zip-code 560001 --payment upi
//!
//! # Admin dashboard
//! emporium admin orders --status pending --search asha
//! ```
//!
//! # Environment Variables
//!
//! - `EMPORIUM_API_URL` - Backend base URL (required)
//! - `EMPORIUM_TIMEOUT_SECS` - Request timeout (default: 30)
//! - `EMPORIUM_SESSION_FILE` - Login token file (default: `.emporium-session`)
//! - `RUST_LOG` - Log filter (default: `emporium=info`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Args, Parser, Subcommand};
use emporium_core::accounts::RoleFilter;
use emporium_core::catalog::CategoryFilter;
use emporium_core::orders::StatusFilter;
use emporium_core::{AddressType, OrderId, PaymentMethod, ProductId};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::Context;

#[derive(Parser)]
#[command(name = "emporium")]
#[command(author, version, about = "Emporium shop CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the catalog
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place an order for everything in the cart
    Checkout(CheckoutArgs),
    /// View and cancel your orders
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Log in, register or log out
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
    /// View or edit your profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Admin console
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// List products
    List {
        /// Only show this category (`all` for everything)
        #[arg(short, long, default_value = "all")]
        category: CategoryFilter,
    },
    /// Show one product in detail
    Show {
        /// Product ID
        id: ProductId,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents and totals
    Show,
    /// Add a product to the cart
    Add {
        /// Product ID
        product_id: ProductId,

        /// Number of units (adjusted to the product's purchase limit)
        #[arg(short, long, default_value_t = 1)]
        quantity: i64,
    },
    /// Remove a product from the cart
    Remove {
        /// Product ID
        product_id: ProductId,
    },
    /// Remove everything from the cart
    Clear,
}

#[derive(Args)]
struct CheckoutArgs {
    /// Recipient name
    #[arg(long)]
    full_name: String,

    /// Contact email
    #[arg(long)]
    email: String,

    /// 10-digit phone number
    #[arg(long)]
    phone: String,

    /// Street address
    #[arg(long)]
    address: String,

    #[arg(long)]
    city: String,

    #[arg(long)]
    state: String,

    /// Postal code
    #[arg(long)]
    zip_code: String,

    #[arg(long, default_value = "India")]
    country: String,

    /// `home` or `office`
    #[arg(long, default_value = "home")]
    address_type: AddressType,

    /// `cod`, `card` or `upi`
    #[arg(short, long, default_value = "cod")]
    payment: PaymentMethod,

    /// Delivery instructions
    #[arg(long)]
    notes: Option<String>,
}

#[derive(Subcommand)]
enum OrderAction {
    /// List your orders
    List {
        /// Only show this status (`all` for everything)
        #[arg(short, long, default_value = "all")]
        status: StatusFilter,
    },
    /// Show an order with its delivery progress
    Show {
        /// Order ID
        id: OrderId,
    },
    /// Cancel an order that has not shipped yet
    Cancel {
        /// Order ID
        id: OrderId,
    },
}

#[derive(Subcommand)]
enum AuthAction {
    /// Log in and remember the session
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "EMPORIUM_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "EMPORIUM_PASSWORD", hide_env_values = true)]
        password: String,

        /// Repeat the password
        #[arg(long, env = "EMPORIUM_CONFIRM_PASSWORD", hide_env_values = true)]
        confirm_password: String,
    },
    /// Forget the stored session
    Logout,
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Show your profile
    Show,
    /// Change profile fields (unset flags keep their current value)
    Update {
        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        email: Option<String>,

        #[arg(short, long)]
        phone: Option<String>,

        #[arg(short, long)]
        address: Option<String>,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// List all orders with shop-wide figures
    Orders {
        /// Only show this status (`all` for everything)
        #[arg(short, long, default_value = "all")]
        status: StatusFilter,

        /// Match order or user ID
        #[arg(long, default_value = "")]
        search: String,
    },
    /// List all users with account figures
    Users {
        /// `admin`, `user` or `all`
        #[arg(short, long, default_value = "all")]
        role: RoleFilter,

        /// Match name or email
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Add a product to the catalog
    CreateProduct {
        #[arg(short, long)]
        name: String,

        #[arg(short, long, default_value = "")]
        description: String,

        /// Price in rupees
        #[arg(short, long)]
        price: Decimal,

        /// One of: electronics, fashion, home, beauty, sports, books
        #[arg(short, long)]
        category: String,

        /// Units in stock
        #[arg(short, long, default_value_t = 0)]
        stock: i64,

        #[arg(long, default_value = "")]
        image_url: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("emporium=info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::load()?;

    match cli.command {
        Commands::Products { action } => match action {
            ProductAction::List { category } => commands::products::list(&ctx, &category).await?,
            ProductAction::Show { id } => commands::products::show(&ctx, &id).await?,
        },
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&ctx).await?,
            CartAction::Add {
                product_id,
                quantity,
            } => commands::cart::add(&ctx, &product_id, quantity).await?,
            CartAction::Remove { product_id } => commands::cart::remove(&ctx, &product_id).await?,
            CartAction::Clear => commands::cart::clear(&ctx).await?,
        },
        Commands::Checkout(args) => commands::checkout::run(&ctx, args.into()).await?,
        Commands::Orders { action } => match action {
            OrderAction::List { status } => commands::orders::list(&ctx, &status).await?,
            OrderAction::Show { id } => commands::orders::show(&ctx, &id).await?,
            OrderAction::Cancel { id } => commands::orders::cancel(&ctx, &id).await?,
        },
        Commands::Auth { action } => match action {
            AuthAction::Login { email, password } => {
                commands::auth::login(&ctx, &email, password).await?;
            }
            AuthAction::Register {
                name,
                email,
                password,
                confirm_password,
            } => {
                commands::auth::register(&ctx, name, email, password, confirm_password).await?;
            }
            AuthAction::Logout => commands::auth::logout(&ctx)?,
        },
        Commands::Profile { action } => match action {
            ProfileAction::Show => commands::profile::show(&ctx).await?,
            ProfileAction::Update {
                name,
                email,
                phone,
                address,
            } => {
                let changes = commands::profile::Changes {
                    name,
                    email,
                    phone,
                    address,
                };
                commands::profile::update(&ctx, changes).await?;
            }
        },
        Commands::Admin { action } => match action {
            AdminAction::Orders { status, search } => {
                commands::admin::orders(&ctx, &status, &search).await?;
            }
            AdminAction::Users { role, search } => {
                commands::admin::users(&ctx, &role, &search).await?;
            }
            AdminAction::CreateProduct {
                name,
                description,
                price,
                category,
                stock,
                image_url,
            } => {
                let product = emporium_core::catalog::NewProduct {
                    product_name: name,
                    description,
                    price: emporium_core::Money::new(price),
                    category,
                    stock_quantity: stock,
                    image_url,
                };
                commands::admin::create_product(&ctx, &product).await?;
            }
        },
    }
    Ok(())
}

impl From<CheckoutArgs> for emporium_storefront::CheckoutRequest {
    fn from(args: CheckoutArgs) -> Self {
        Self {
            address: emporium_core::orders::ShippingAddress {
                full_name: args.full_name,
                email: args.email,
                phone: args.phone,
                address: args.address,
                city: args.city,
                state: args.state,
                zip_code: args.zip_code,
                country: args.country,
                address_type: args.address_type,
            },
            payment_method: args.payment,
            notes: args.notes,
        }
    }
}
