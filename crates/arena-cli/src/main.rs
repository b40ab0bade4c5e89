//! Arena CLI: administers users and challenges in the Postgres store.
//!
//! Reads DATABASE_URL (a `.env` file is honoured).

use std::time::Duration;

use anyhow::Context;
use arena_cli::{init_tracing, truncate_string};
use arena_core::api_key::{extract_key_prefix, generate_api_key, hash_api_key};
use arena_core::models::{CreateChallengeRequest, UserSummary};
use arena_db::{ChallengeRepository, UserRepository};
use clap::{Parser, Subcommand};
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

#[derive(Parser)]
#[command(name = "arena", about = "Arena administration CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a user and print its API key (shown only once)
    CreateUser {
        /// Display name
        #[arg(long)]
        name: String,
    },
    /// Create a challenge
    CreateChallenge {
        /// Challenge name
        #[arg(long)]
        name: String,
        /// Optional description
        #[arg(long)]
        description: Option<String>,
    },
    /// List challenges, newest first
    ListChallenges {
        /// Maximum number of items
        #[arg(long, default_value = "20")]
        limit: i64,
        /// Offset for pagination
        #[arg(long, default_value = "0")]
        offset: i64,
    },
}

#[derive(Serialize)]
struct CreatedUser {
    #[serde(flatten)]
    user: UserSummary,
    api_key: String,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

async fn connect() -> anyhow::Result<PgPool> {
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    PgPoolOptions::new()
        .max_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(&database_url)
        .await
        .context("Failed to connect to database")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let pool = connect().await?;

    match cli.command {
        Commands::CreateUser { name } => {
            let api_key = generate_api_key();
            let key_hash = hash_api_key(&api_key)?;
            let user = UserRepository::new(pool)
                .create(&name, key_hash, extract_key_prefix(&api_key))
                .await?;
            print_json(&CreatedUser {
                user: UserSummary::from(&user),
                api_key,
            })?;
        }
        Commands::CreateChallenge { name, description } => {
            let challenge = ChallengeRepository::new(pool)
                .create(&CreateChallengeRequest { name, description })
                .await?;
            print_json(&challenge)?;
        }
        Commands::ListChallenges { limit, offset } => {
            let challenges = ChallengeRepository::new(pool).list(limit, offset).await?;
            if challenges.is_empty() {
                println!("No challenges");
            }
            for challenge in challenges {
                println!(
                    "{:>6}  {:<24}  {}",
                    challenge.id,
                    truncate_string(&challenge.name, 24),
                    truncate_string(challenge.description.as_deref().unwrap_or(""), 48)
                );
            }
        }
    }

    Ok(())
}
