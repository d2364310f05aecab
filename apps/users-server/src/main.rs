use anyhow::{anyhow, Context, Result};
use axum::{routing::get, Json, Router};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use modkit::{with_http_stack, HttpStackOptions};
use runtime::{AppConfig, CliArgs, DatabaseConfig};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;
use users_info::{config::UsersInfoConfig, UsersInfo};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const MEMORY_DSN: &str = "sqlite::memory:";

/// Expand a sqlite DSN into an absolute-path DSN using a base directory.
/// - Keeps "sqlite::memory:" as-is.
/// - Normalizes backslashes into forward slashes (important on Windows).
fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path, create_dirs: bool) -> Result<String> {
    if dsn.eq_ignore_ascii_case(MEMORY_DSN) || dsn.eq_ignore_ascii_case("sqlite://:memory:") {
        return Ok(MEMORY_DSN.to_string());
    }
    let db_path = dsn
        .strip_prefix("sqlite://")
        .ok_or_else(|| anyhow!("DSN must start with sqlite:// (got: {})", dsn))?;

    let (path_str, query) = match db_path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (db_path, None),
    };

    let mut p = PathBuf::from(path_str);
    if p.as_os_str().is_empty() {
        return Err(anyhow!("Empty SQLite path in DSN"));
    }
    if p.is_relative() {
        p = base_dir.join(p);
    }

    if let Some(dir) = p.parent() {
        if create_dirs {
            std::fs::create_dir_all(dir)?;
        }
    }

    let mut out = String::from("sqlite://");
    out.push_str(&p.to_string_lossy().replace('\\', "/"));
    if let Some(q) = query {
        out.push('?');
        out.push_str(q);
    }
    Ok(out)
}

/// Users Server - CRUD service for the User entity
#[derive(Parser)]
#[command(name = "users-server")]
#[command(about = "Users Server - CRUD service for the User entity")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use an in-memory SQLite database
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("Users Server starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config, args).await,
        Commands::Check => check_config(config, args),
    }
}

/// Detect DB backend from URL scheme.
fn detect_from_dsn(cfg: &DatabaseConfig) -> Result<&'static str> {
    let raw = cfg.url.trim();
    if raw.is_empty() {
        return Err(anyhow!("Database URL not configured"));
    }

    let url = Url::parse(raw).map_err(|e| anyhow!("Invalid database DSN '{}': {}", raw, e))?;

    match url.scheme() {
        "sqlite" | "sqlite3" => Ok("sqlite"),
        "postgres" | "postgresql" => Ok("postgres"),
        other => Err(anyhow!("Unsupported database type: {}", other)),
    }
}

/// Final DSN for this run: in-memory when `--mock`, else the configured one
/// with sqlite paths resolved against `home_dir`.
fn resolve_dsn(config: &AppConfig, args: &CliArgs, create_dirs: bool) -> Result<String> {
    if args.mock {
        return Ok(MEMORY_DSN.to_string());
    }
    let db_config = config
        .database
        .as_ref()
        .ok_or_else(|| anyhow!("Database configuration missing (use --mock for in-memory)"))?;
    detect_from_dsn(db_config)?;

    let dsn = db_config.url.trim();
    if dsn.starts_with("sqlite:") {
        absolutize_sqlite_dsn(dsn, Path::new(&config.server.home_dir), create_dirs)
    } else {
        Ok(dsn.to_string())
    }
}

async fn connect(config: &AppConfig, dsn: &str) -> Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new(dsn.to_string());
    opts.acquire_timeout(Duration::from_secs(5)).sqlx_logging(false);
    if let Some(db) = &config.database {
        if let Some(max) = db.max_conns {
            opts.max_connections(max);
        }
        if let Some(ms) = db.busy_timeout_ms {
            let busy = Duration::from_millis(u64::from(ms));
            opts.map_sqlx_sqlite_opts(move |o| o.busy_timeout(busy));
        }
    }
    if dsn == MEMORY_DSN {
        // Every pooled connection would otherwise see its own empty database.
        opts.max_connections(1);
    }

    tracing::info!("Connecting to database: {}", dsn);
    let db = Database::connect(opts)
        .await
        .with_context(|| format!("Failed to connect to database {dsn}"))?;
    tracing::info!("Connected DB backend: {:?}", db.get_database_backend());
    Ok(db)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

fn build_router(module: &UsersInfo, config: &AppConfig) -> Router {
    let router = module.register_rest(Router::new().route("/health", get(health)));
    let opts = HttpStackOptions {
        timeout: Some(Duration::from_secs(config.server.timeout_sec)),
        cors_enabled: config.server.cors_enabled,
        ..Default::default()
    };
    with_http_stack(router, &opts)
}

async fn run_server(config: AppConfig, args: CliArgs) -> Result<()> {
    tracing::info!("Initializing modules...");

    let module_cfg: UsersInfoConfig = config.module_config("users_info")?;
    tracing::debug!(api_base_url = %module_cfg.api_base_url, "users_info config loaded");

    let dsn = resolve_dsn(&config, &args, true)?;
    let db = connect(&config, &dsn).await?;
    UsersInfo::migrate(&db).await?;
    let module = UsersInfo::new(db);

    let router = build_router(&module, &config);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind HTTP listener on address {addr}"))?;
    tracing::info!("HTTP server listening on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = modkit::shutdown::wait_for_shutdown().await {
                tracing::error!(error = %e, "signal handler failed; shutting down");
            }
        })
        .await
        .context("HTTP server failed")?;

    tracing::info!("Users Server stopped");
    Ok(())
}

fn check_config(config: AppConfig, args: CliArgs) -> Result<()> {
    tracing::info!("Checking configuration...");

    let dsn = resolve_dsn(&config, &args, false)?;
    let _: UsersInfoConfig = config.module_config("users_info")?;

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("Database: {dsn}");
    println!("Server config:");
    println!("{}", config.to_yaml()?);

    Ok(())
}
