//! hms CLI - operator tooling for the hospital management database
//!
//! Applies the schema, checks connectivity, seeds the standard staff roles
//! and answers "what roles/departments does this user have?".

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hms_db::config::DATABASE_URL;
use hms_db::{load_dotenv, schema, DbConfig, PgPool, SessionProvider};
use tracing::info;

mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "hms",
    author,
    version,
    about = "Hospital management database tooling",
    long_about = "Apply the hospital schema, verify connectivity, seed staff roles and \
                  inspect user role and department assignments."
)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(long, global = true)]
    debug: bool,

    /// Postgres connection string (overrides DATABASE_URL from the environment or .env)
    #[arg(long, global = true, env = "DATABASE_URL", hide_env_values = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create all tables, indexes and triggers (idempotent)
    Migrate,
    /// Acquire a session and run a trivial query
    Check,
    /// Insert the standard staff roles that do not exist yet
    SeedRoles,
    /// Print the role names assigned to a user
    Roles(UserArgs),
    /// Print the department names a user belongs to
    Departments(UserArgs),
}

#[derive(Parser, Debug)]
struct UserArgs {
    /// Username to look up
    username: String,

    /// Print a JSON array instead of one name per line
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env first so it can supply RUST_LOG and DATABASE_URL
    load_dotenv();
    let cli = Cli::parse();

    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug }).ok();

    let config = db_config(cli.database_url.as_deref())?;
    let provider = SessionProvider::connect(&config)
        .await
        .with_context(|| format!("Failed to connect to {}", config.redacted_url()))?;

    let outcome = run(&cli.command, &provider).await;
    provider.close().await;
    outcome
}

/// Resolve config from the environment, letting `--database-url` win.
fn db_config(url_override: Option<&str>) -> Result<DbConfig> {
    let config = DbConfig::from_lookup(|key| match (key, url_override) {
        (DATABASE_URL, Some(url)) => Some(url.to_owned()),
        _ => std::env::var(key).ok(),
    })
    .context("Invalid database configuration")?;
    Ok(config)
}

async fn run(command: &Commands, provider: &SessionProvider<PgPool>) -> Result<()> {
    match command {
        Commands::Migrate => {
            schema::apply(provider.pool())
                .await
                .context("Failed to apply schema")?;
            let missing = schema::missing_tables(provider.pool()).await?;
            anyhow::ensure!(missing.is_empty(), "tables still missing: {}", missing.join(", "));
            println!("Schema ready ({} tables)", schema::TABLES.len());
        }
        Commands::Check => {
            let mut session = provider.session().await.context("Failed to acquire session")?;
            let one: i32 = hms_db::db::ping(session.pg())
                .await
                .context("Connectivity check failed")?;
            info!(result = one, "Database reachable");
            println!("ok");
        }
        Commands::SeedRoles => {
            let created = provider
                .run(|session| Box::pin(async move { session.roles().seed_standard_roles().await }))
                .await
                .context("Failed to seed roles")?;
            if created.is_empty() {
                println!("All standard roles already present");
            }
            for role in created {
                println!("created {}", role.role_name.unwrap_or_default());
            }
        }
        Commands::Roles(args) => {
            let username = args.username.clone();
            let names = provider
                .run(move |session| {
                    Box::pin(async move { session.roles().role_names_for_username(&username).await })
                })
                .await
                .with_context(|| format!("Failed to look up roles for {}", args.username))?;
            print_names(&names, args.json)?;
        }
        Commands::Departments(args) => {
            let username = args.username.clone();
            let names = provider
                .run(move |session| {
                    Box::pin(async move {
                        session
                            .departments()
                            .department_names_for_username(&username)
                            .await
                    })
                })
                .await
                .with_context(|| format!("Failed to look up departments for {}", args.username))?;
            print_names(&names, args.json)?;
        }
    }
    Ok(())
}

fn print_names(names: &[String], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(names)?);
    } else {
        for name in names {
            println!("{name}");
        }
    }
    Ok(())
}
