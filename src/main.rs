use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::atomic::Ordering;

use sheetdash::api::{Sheet, SheetsClient, Tab};
use sheetdash::cache::{TabCache, TabStatus};
use sheetdash::config::{get_config_path, Config};
use sheetdash::handlers::handle_api_response;
use sheetdash::listing::ListingController;
use sheetdash::logic::{filter, formatting, links};
use sheetdash::service::{spawn_api_service, ApiResponse};
use sheetdash::session::SessionContext;
use sheetdash::{log_debug, DEBUG_MODE};
use tokio::sync::mpsc;

/// Sheets dashboard client
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable debug logging to the temp dir
    #[arg(short, long)]
    debug: bool,

    /// Path to config file (default: platform-specific, see docs)
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List spreadsheets, paginated and filtered
    List {
        /// Title filter, applied server-side
        #[arg(short, long, default_value = "")]
        query: String,

        /// 1-based page number
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Items per page (default from config)
        #[arg(long)]
        page_size: Option<u32>,
    },

    /// List the inner tabs of one spreadsheet
    Tabs {
        sheet_id: String,

        /// Local title filter; wildcards supported
        #[arg(short, long, default_value = "")]
        filter: String,
    },

    /// Invalidate a sheet's server-cached preview and re-list
    Refresh { sheet_id: String },

    /// Show the signed-in account
    Whoami,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    DEBUG_MODE.store(args.debug, Ordering::Relaxed);
    if args.debug {
        log_debug("Debug mode enabled");
    }

    let config_path = get_config_path(args.config)?;
    log_debug(&format!("Loading config from: {:?}", config_path));
    let config = Config::load(&config_path)?;

    let client = SheetsClient::new(config.base_url.clone(), config.session_cookie.clone());

    match args.command {
        Command::List {
            query,
            page,
            page_size,
        } => run_list(client, &config, query, page, page_size).await,
        Command::Tabs { sheet_id, filter } => run_tabs(client, &config, sheet_id, filter).await,
        Command::Refresh { sheet_id } => run_refresh(client, &config, sheet_id).await,
        Command::Whoami => run_whoami(client).await,
    }
}

fn build_state(
    client: SheetsClient,
    page_size: u32,
) -> (
    ListingController,
    TabCache,
    mpsc::UnboundedReceiver<ApiResponse>,
) {
    let (api_tx, api_rx) = spawn_api_service(client);
    let listing = ListingController::new(api_tx.clone(), page_size);
    let cache = TabCache::new(api_tx);
    (listing, cache, api_rx)
}

/// Pump responses until the listing fetch settles.
async fn drain_listing(
    listing: &mut ListingController,
    cache: &mut TabCache,
    api_rx: &mut mpsc::UnboundedReceiver<ApiResponse>,
) {
    while listing.is_loading() {
        let Some(response) = api_rx.recv().await else {
            break;
        };
        handle_api_response(listing, cache, response);
    }
}

async fn run_list(
    client: SheetsClient,
    config: &Config,
    query: String,
    page: u32,
    page_size: Option<u32>,
) -> Result<()> {
    let (mut listing, mut cache, mut api_rx) =
        build_state(client, page_size.unwrap_or(config.page_size));

    if !query.is_empty() {
        listing.set_query(query);
    }
    if page > 1 {
        listing.set_page(page);
    }
    if !listing.is_loading() {
        listing.refresh_current_page();
    }

    drain_listing(&mut listing, &mut cache, &mut api_rx).await;

    print_listing(&listing);
    Ok(())
}

async fn run_tabs(
    client: SheetsClient,
    config: &Config,
    sheet_id: String,
    title_filter: String,
) -> Result<()> {
    let (mut listing, mut cache, mut api_rx) = build_state(client, config.page_size);

    cache.ensure_loaded(&sheet_id);
    while cache.get_tabs(&sheet_id).status == TabStatus::Loading {
        let Some(response) = api_rx.recv().await else {
            break;
        };
        handle_api_response(&mut listing, &mut cache, response);
    }

    let entry = cache.get_tabs(&sheet_id);
    match entry.status {
        TabStatus::Failed => println!("Failed to load inner sheets"),
        _ if entry.tabs.is_empty() => println!("No inner sheets"),
        _ => {
            let tabs = filter::filter_tabs(&entry.tabs, &title_filter);
            if tabs.is_empty() {
                println!("No results for \"{}\"", title_filter);
            } else {
                for tab in &tabs {
                    print_tab(&sheet_id, tab);
                }
            }
        }
    }
    Ok(())
}

async fn run_refresh(client: SheetsClient, config: &Config, sheet_id: String) -> Result<()> {
    let (mut listing, mut cache, mut api_rx) = build_state(client, config.page_size);

    listing.refresh_sheet_preview(&sheet_id);

    if let Some(response) = api_rx.recv().await {
        if let ApiResponse::RefreshResult { success: false, .. } = &response {
            println!("Preview refresh failed; listing unchanged");
        }
        handle_api_response(&mut listing, &mut cache, response);
    }

    drain_listing(&mut listing, &mut cache, &mut api_rx).await;

    print_listing(&listing);
    Ok(())
}

async fn run_whoami(client: SheetsClient) -> Result<()> {
    let session = SessionContext::fetch(&client).await;

    match session.user {
        Some(user) => {
            println!("Signed in as {}", user.name);
            if let Some(email) = user.email {
                println!("Email: {}", email);
            }
        }
        None => {
            println!("Not signed in");
            if session.oauth_configured {
                println!("OAuth client configured; sign in via the web dashboard");
            } else {
                println!("OAuth client not configured; run the setup flow first");
            }
        }
    }
    Ok(())
}

fn print_listing(listing: &ListingController) {
    println!(
        "Page {} ({} per page), {} total",
        listing.page(),
        listing.page_size(),
        listing.total()
    );

    for sheet in listing.items() {
        print_sheet(sheet);
    }
}

fn print_sheet(sheet: &Sheet) {
    println!();
    println!("{}  [{}]", sheet.name, sheet.id);
    println!(
        "  Modified: {}  Owner(s): {}",
        formatting::format_modified_time(sheet.modified_time.as_deref()),
        formatting::format_owners(&sheet.owners)
    );
    if sheet.preview.is_empty() {
        println!("  Preview unavailable");
    } else {
        for row in &sheet.preview {
            println!("  {}", formatting::preview_row(row));
        }
    }
    println!("  {}", links::sheet_url(&sheet.id));
}

fn print_tab(sheet_id: &str, tab: &Tab) {
    println!();
    println!("{}  [gid {}]", tab.title, tab.gid);
    if tab.preview.is_empty() {
        println!("  Preview unavailable");
    } else {
        for row in &tab.preview {
            println!("  {}", formatting::preview_row(row));
        }
    }
    println!("  {}", links::tab_url(sheet_id, &tab.gid));
}
