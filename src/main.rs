use anyhow::{Context, Result};
use clap::Parser;
use secrecy::SecretString;
use std::path::PathBuf;
use tokio::sync::mpsc;

use plume::api::ApiClient;
use plume::app::{App, AppEvent};
use plume::catalog::{flatten, CategoryCatalog};
use plume::config::Config;
use plume::theme::ThemeVariant;
use plume::ui;

/// Get the config directory path (~/.config/plume/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    let config_dir = PathBuf::from(home).join(".config").join("plume");
    Ok(config_dir)
}

#[derive(Parser, Debug)]
#[command(name = "plume", about = "Terminal reader for a personal blog backend")]
struct Args {
    /// Backend base URL (overrides api_base_url from the config file)
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Print the category tree as a flat list with breadcrumbs and exit
    #[arg(long)]
    dump_categories: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing for debug logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    // Set up config directory
    let config_dir = get_config_dir()?;
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
        println!("Created config directory: {}", config_dir.display());
    }

    // Keep the config private on Unix: it may contain an API token
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        match std::fs::metadata(&config_dir) {
            Ok(metadata) => {
                let mut perms = metadata.permissions();
                perms.set_mode(0o700);
                if let Err(e) = std::fs::set_permissions(&config_dir, perms) {
                    tracing::warn!(
                        path = %config_dir.display(),
                        error = %e,
                        "Failed to set config directory permissions to 0700"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(
                    path = %config_dir.display(),
                    error = %e,
                    "Failed to read config directory metadata"
                );
            }
        }
    }

    let config_path = config_dir.join("config.toml");
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;

    // CLI flag wins over the config file
    let Some(base_url) = args.api_url.or_else(|| config.api_base_url.clone()) else {
        eprintln!("Error: no backend configured.");
        eprintln!();
        eprintln!("Set the blog backend in {}:", config_path.display());
        eprintln!();
        eprintln!("  api_base_url = \"https://blog.example.com/api\"");
        eprintln!();
        eprintln!("Or pass it directly:");
        eprintln!("  plume --api-url https://blog.example.com/api");
        std::process::exit(1);
    };

    // Env var wins over the config file for the token
    let token = std::env::var("PLUME_API_TOKEN")
        .ok()
        .or_else(|| config.api_token.clone())
        .map(SecretString::from);

    let api = ApiClient::new(&base_url, token)
        .with_context(|| format!("Invalid backend URL '{}'", base_url))?;
    tracing::info!(base_url = %api.base_url(), "Backend configured");

    // Handle --dump-categories: print the projection and exit
    if args.dump_categories {
        return dump_categories(&api, config.root_category_id).await;
    }

    let theme = ThemeVariant::from_str_name(&config.theme).unwrap_or_else(|| {
        tracing::warn!(theme = %config.theme, "Unknown theme in config, using dark");
        ThemeVariant::Dark
    });

    let mut app = App::new(api, theme, config.page_size.max(1));
    app.root_category_id = config.root_category_id;

    // Create event channel for background tasks
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    // Run the TUI
    ui::run(&mut app, event_tx, event_rx).await?;

    println!("Goodbye!");
    Ok(())
}

/// Fetch the category tree and print every category with its breadcrumb,
/// pre-order, one per line. A quick way to inspect a backend without the
/// TUI (and to pipe categories into scripts).
async fn dump_categories(api: &ApiClient, root_id: plume::catalog::CategoryId) -> Result<()> {
    let tree = api
        .category_tree(root_id)
        .await
        .context("Failed to fetch category tree")?;

    if tree.is_empty() {
        println!("(no categories)");
        return Ok(());
    }

    let flat = flatten(&tree);
    let catalog = CategoryCatalog::from_tree(&tree);
    for cat in &flat {
        let path = catalog
            .breadcrumb(cat.category_id)
            .context("Category tree has inconsistent parent links")?;
        println!(
            "{:>6}  {}  ({} articles)",
            cat.category_id,
            path.join(" / "),
            cat.article_total
        );
    }
    Ok(())
}
