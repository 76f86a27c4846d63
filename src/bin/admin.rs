//! CLI administration tool for tenant-router.
//!
//! Answers "what would the router do with this request?" against the live
//! database, without going through HTTP and without recording analytics.
//!
//! # Usage
//!
//! ```bash
//! # Show the routing decision for a host and path
//! cargo run --bin admin -- route --host alice.example.com --path /promo
//!
//! # Resolve a short link in a tenant scope
//! cargo run --bin admin -- link promo --subdomain alice
//! cargo run --bin admin -- link promo --domain alice.com
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server; see `tenant_router::config`. `DATABASE_URL` and
//! `BASE_DOMAINS` are the ones that matter here.

use tenant_router::application::services::{
    RoutingEngine, RoutingRequest, ShortLinkResolver, TenantResolver,
};
use tenant_router::config::{self, Config};
use tenant_router::domain::analytics_worker::EventSink;
use tenant_router::domain::decision::RoutingDecision;
use tenant_router::domain::entities::{LinkScope, VisitorInfo};
use tenant_router::domain::host::HostClassifier;
use tenant_router::error::ResolveError;
use tenant_router::infrastructure::persistence::{PgShortLinkRepository, PgTenantRepository};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;

/// CLI tool for inspecting tenant-router decisions.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Show the routing decision for a request
    Route {
        /// Host header value (e.g., "alice.example.com", "alice.com:443")
        #[arg(long)]
        host: String,

        /// Request path
        #[arg(long, default_value = "/")]
        path: String,
    },

    /// Resolve a short link without recording a click
    Link {
        /// Short code
        code: String,

        /// Tenant subdomain label scope
        #[arg(long, conflicts_with = "domain")]
        subdomain: Option<String>,

        /// Verified custom domain scope
        #[arg(long)]
        domain: Option<String>,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Route { host, path } => handle_route(&config, pool, &host, &path).await?,
        Commands::Link {
            code,
            subdomain,
            domain,
        } => {
            let scope = LinkScope::from_params(subdomain.as_deref(), domain.as_deref());
            handle_link(&config, pool, &code, scope).await?
        }
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

fn tenant_resolver(config: &Config, pool: &Arc<PgPool>) -> Arc<TenantResolver> {
    Arc::new(TenantResolver::new(
        Arc::new(PgTenantRepository::new(pool.clone())),
        config.resolver_settings(),
    ))
}

/// Prints the decision the server would make for `host` + `path`.
async fn handle_route(config: &Config, pool: PgPool, host: &str, path: &str) -> Result<()> {
    println!("{}", "🧭 Routing Decision".bright_blue().bold());
    println!();

    let pool = Arc::new(pool);
    let engine = RoutingEngine::new(
        HostClassifier::new(&config.base_domains),
        tenant_resolver(config, &pool),
        EventSink::disabled(),
        config.retry_after_seconds,
    );

    let class = engine.classifier().classify(host);
    println!("  Host:     {}", host.cyan());
    println!("  Path:     {}", path.cyan());
    println!("  Class:    {}", format!("{:?}", class).bright_white());

    let (path_only, query) = match path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (path, None),
    };

    let visitor = VisitorInfo::default();
    let decision = engine
        .decide(&RoutingRequest {
            host: Some(host),
            path: path_only,
            visitor: &visitor,
        })
        .await;

    let outcome = match &decision {
        RoutingDecision::Passthrough => "PASSTHROUGH".bright_black(),
        RoutingDecision::Rewrite(rewrite) => {
            format!("REWRITE → {}", rewrite.path_and_query(query)).green()
        }
        RoutingDecision::Redirect { location } => format!("302 → {}", location).yellow(),
        RoutingDecision::NotFound => "404 NOT FOUND".red(),
        RoutingDecision::ServiceUnavailable { retry_after_secs } => {
            format!("503 (Retry-After: {}s)", retry_after_secs).red().bold()
        }
    };
    println!("  Decision: {}", outcome);
    println!();

    Ok(())
}

/// Resolves a short link in the given scope and prints its destination.
async fn handle_link(config: &Config, pool: PgPool, code: &str, scope: LinkScope) -> Result<()> {
    println!("{}", "🔗 Short Link".bright_blue().bold());
    println!();

    let pool = Arc::new(pool);
    let resolver = ShortLinkResolver::new(
        Arc::new(PgShortLinkRepository::new(pool.clone())),
        tenant_resolver(config, &pool),
        EventSink::disabled(),
        config.lookup_timeout(),
    );

    println!("  Code:  {}", code.cyan());
    println!("  Scope: {}", format!("{:?}", scope).bright_white());

    match resolver.lookup(code, &scope).await {
        Ok(link) => {
            println!("  ID:    {}", link.id.to_string().bright_black());
            println!("  URL:   {}", link.destination_url.green());
        }
        Err(ResolveError::NotFound) => {
            println!("  {}", "❌ Not found".red());
        }
        Err(ResolveError::Unavailable(reason)) => {
            anyhow::bail!("Lookup failed: {}", reason);
        }
    }
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            let tenants: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tenants")
                .fetch_one(pool)
                .await
                .context("Schema missing; start the server once to apply migrations")?;

            println!("{}", "✅ Database connection OK".green().bold());
            println!(
                "  Tenants: {}",
                tenants.to_string().bright_white().bold()
            );
        }
    }

    Ok(())
}
