use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use shelflife_cache::CacheManager;
use shelflife_core::{
    aggregate, derive_rows,
    providers::GeminiProvider,
    scan::simulate_scan,
    AdviceSession, Advisor, Category, CategoryFilter, Config, NewProduct, ProductStore,
    StorageLocation,
};
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod render;

#[derive(Parser)]
#[command(name = "shelflife")]
#[command(version, about = "Keep track of what's expiring in the medicine cabinet", long_about = None)]
struct Cli {
    /// SQLite database holding the product list (overrides config)
    #[arg(long, global = true, env = "SHELFLIFE_DB")]
    db: Option<PathBuf>,

    /// Gemini API key for advice (falls back to API_KEY, then the config file)
    #[arg(long, global = true, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Summary counts and status breakdown (default)
    Overview,
    /// List products, earliest expiry first
    List {
        /// Category to show, or "All"
        #[arg(short, long, default_value = "All")]
        category: CategoryFilter,
        /// Only products whose name contains this text
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// Add a product
    Add {
        #[arg(short, long)]
        name: String,
        /// Expiry date, YYYY-MM-DD
        #[arg(short, long)]
        expiry: String,
        #[arg(short, long, default_value = "Medicine")]
        category: Category,
        #[arg(short, long, default_value = "Medicine Cabinet")]
        location: StorageLocation,
        /// Date the product was opened, YYYY-MM-DD
        #[arg(long)]
        opened: Option<String>,
        /// Thumbnail URL (a placeholder is used otherwise)
        #[arg(long)]
        image: Option<String>,
    },
    /// Remove a product by id
    Remove {
        id: String,
        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Ask for safety and disposal advice
    Advise {
        /// Product id to ask about
        #[arg(required_unless_present = "ask")]
        id: Option<String>,
        /// Free-form question instead of a tracked product
        #[arg(long, conflicts_with = "id")]
        ask: Option<String>,
    },
    /// Simulate a barcode scan, optionally adding the result
    Scan {
        /// Add the scanned product with this expiry date (YYYY-MM-DD)
        #[arg(short, long)]
        expiry: Option<String>,
        #[arg(short, long, default_value = "Medicine Cabinet")]
        location: StorageLocation,
    },
    /// Show the effective configuration
    Config {
        /// Write a default config file if there isn't one yet
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never mix with command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shelflife=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = effective_config(&cli)?;

    // One clock read per run, shared by everything derived from it
    let now = chrono::Local::now().naive_local();

    match cli.command.unwrap_or(Commands::Overview) {
        Commands::Overview => {
            let store = open_store(&config, now.date())?;
            let stats = aggregate(store.all(), now);
            render::overview(&stats);
        }
        Commands::List { category, search } => {
            let store = open_store(&config, now.date())?;
            let rows = derive_rows(store.all(), category, &search, now);
            render::product_rows(&rows);
        }
        Commands::Add {
            name,
            expiry,
            category,
            location,
            opened,
            image,
        } => {
            let mut store = open_store(&config, now.date())?;
            let mut draft = NewProduct::new(name, expiry)
                .with_category(category)
                .with_location(location);
            draft.opened_date = opened;
            draft.image = image;

            match store.add(draft)? {
                Some(product) => render::added(&product, now),
                None => println!("Nothing added: a name and a valid YYYY-MM-DD expiry date are required."),
            }
        }
        Commands::Remove { id, yes } => {
            let mut store = open_store(&config, now.date())?;
            let Some(product) = store.get(&id) else {
                println!("No product with id {}", id);
                return Ok(());
            };

            if !yes && !confirm(&format!("Delete {}? This can't be undone.", product.name))? {
                println!("Kept it.");
                return Ok(());
            }

            if let Some(removed) = store.remove(&id)? {
                println!("Removed {}", removed.name);
            }
        }
        Commands::Advise { id, ask } => {
            let advisor = build_advisor(&config)?;

            if let Some(question) = ask {
                let outcome = advisor.ask(&question).await;
                render::advice(outcome.message());
                return Ok(());
            }

            let id = id.context("a product id or --ask is required")?;
            let store = open_store(&config, now.date())?;
            let product = store
                .get(&id)
                .ok_or_else(|| shelflife_core::Error::NotFound(id.clone()))?;

            let expiry = product.expiry(now);
            println!("{} - {}", product.name, render::status_badge(&expiry));
            println!("Asking for advice...");

            let mut session = AdviceSession::new();
            let state = session.run(&advisor, product, expiry.is_expired()).await;
            if let Some(message) = state.message() {
                render::advice(message);
            }
        }
        Commands::Scan { expiry, location } => {
            println!("Scanning...");
            let item = simulate_scan().await;
            println!("Identified: {} ({})", item.name, item.category);

            if let Some(expiry) = expiry {
                let mut store = open_store(&config, now.date())?;
                match store.add(item.into_draft(expiry).with_location(location))? {
                    Some(product) => render::added(&product, now),
                    None => println!("Not added: expiry date must be YYYY-MM-DD."),
                }
            }
        }
        Commands::Config { init } => {
            let path = Config::config_path()?;
            if init && !path.exists() {
                Config::default().save()?;
                println!("Wrote default config to {}", path.display());
            }
            render::config(&config, &path)?;
        }
    }

    Ok(())
}

/// File config with env vars and flags layered on top
fn effective_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = Config::load().context("failed to load config")?;

    if let Some(db) = &cli.db {
        config.storage.db_path = Some(db.clone());
    }

    let api_key = cli
        .api_key
        .clone()
        .or_else(|| std::env::var("API_KEY").ok());
    if let Some(key) = api_key {
        config.advice.api_key = Some(key);
    }

    Ok(config)
}

fn open_store(config: &Config, today: NaiveDate) -> anyhow::Result<ProductStore<CacheManager>> {
    let db_path = config.storage.resolved_db_path()?;
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    tracing::debug!("Opening product store at {}", db_path.display());
    let cache = CacheManager::new(&db_path)
        .with_context(|| format!("failed to open {}", db_path.display()))?;

    Ok(ProductStore::open(cache, today))
}

fn build_advisor(config: &Config) -> anyhow::Result<Advisor> {
    Ok(match GeminiProvider::from_config(&config.advice)? {
        Some(provider) => Advisor::new(Box::new(provider)),
        None => Advisor::unconfigured(),
    })
}

fn confirm(question: &str) -> anyhow::Result<bool> {
    print!("{} [y/N] ", question);
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
