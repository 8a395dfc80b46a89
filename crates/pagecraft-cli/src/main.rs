use anyhow::Context;
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;

use pagecraft_cli::seeder::{self, SeedConfig};

#[derive(Parser)]
#[command(name = "pagecraft-cli")]
#[command(about = "Pagecraft CLI - Administrative tools for Pagecraft", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an admin account
    CreateAdmin {
        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed demo accounts, fake users and draft pages
    Seed {
        /// Number of fake users to create
        #[arg(short = 'u', long, default_value = "20")]
        users: usize,

        /// Number of draft pages to create
        #[arg(short = 'p', long, default_value = "10")]
        pages: usize,
    },
    /// Remove seeded users and pages (demo accounts are kept)
    ClearSeed,
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("\n❌ {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let pool = pagecraft_db::init_db_pool().await?;
    pagecraft_db::run_migrations(&pool).await?;

    match cli.command {
        Commands::CreateAdmin { email, password } => {
            handle_create_admin(&pool, email, password).await
        }
        Commands::Seed { users, pages } => {
            let config = SeedConfig::default().with_users(users).with_pages(pages);
            seeder::seed_all(&pool, config).await
        }
        Commands::ClearSeed => seeder::clear_all(&pool).await,
    }
}

async fn handle_create_admin(
    pool: &sqlx::PgPool,
    email: Option<String>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let email = match email {
        Some(email) => email,
        None => Input::new()
            .with_prompt("Email address")
            .interact_text()
            .context("Failed to read email")?,
    };

    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .context("Failed to read password")?,
    };

    if !email.contains('@') {
        anyhow::bail!("'{email}' is not a valid email address");
    }
    if password.len() < 8 {
        anyhow::bail!("Password must be at least 8 characters");
    }

    let id = seeder::create_admin(pool, &email, &password).await?;

    println!("\n✅ Admin created successfully!");
    println!("   ID: {id}");
    println!("   Email: {email}");
    Ok(())
}
