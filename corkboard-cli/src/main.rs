// Corkboard - A classic bulletin board engine rebuilt with Rust
// Copyright (C) 2025 Corkboard Project Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use corkboard_core::models::Member;
use corkboard_db::repositories::{ContentRepository, MemberRepository};
use sqlx::SqlitePool;
use std::io::Write;

#[derive(Parser)]
#[command(name = "corkboard")]
#[command(about = "Corkboard CLI tool for member and content management")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database (create tables)
    Init,

    /// Member management commands
    Member {
        #[command(subcommand)]
        command: MemberCommands,
    },

    /// Content management commands
    Content {
        #[command(subcommand)]
        command: ContentCommands,
    },
}

#[derive(Subcommand)]
enum MemberCommands {
    /// Create a new member
    Create {
        /// Username
        username: String,
        /// Email address
        email: String,
        /// Make member an admin
        #[arg(long)]
        admin: bool,
        /// Password (will prompt if not provided)
        #[arg(long)]
        password: Option<String>,
    },

    /// Change member password
    Password {
        /// Username or email
        member: String,
        /// New password (will prompt if not provided)
        #[arg(long)]
        password: Option<String>,
    },

    /// List all members
    List,
}

#[derive(Subcommand)]
enum ContentCommands {
    /// List all content pages
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Get database URL from environment
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:corkboard.db".to_string());

    match cli.command {
        Commands::Init => init_database(&database_url).await,
        Commands::Member { command } => {
            let pool = connect_database(&database_url).await?;
            handle_member_command(command, pool).await
        }
        Commands::Content { command } => {
            let pool = connect_database(&database_url).await?;
            handle_content_command(command, pool).await
        }
    }
}

async fn init_database(database_url: &str) -> Result<()> {
    println!("Initializing database at: {}", database_url);

    // Use the shared init_database function from corkboard-db
    let _pool = corkboard_db::init_database(database_url).await?;

    println!("Database initialized successfully!");
    Ok(())
}

async fn connect_database(database_url: &str) -> Result<SqlitePool> {
    // Use the shared init_database which also ensures migrations are run
    corkboard_db::init_database(database_url).await
}

async fn handle_member_command(command: MemberCommands, pool: SqlitePool) -> Result<()> {
    let member_repo = MemberRepository::new(pool);

    match command {
        MemberCommands::Create {
            username,
            email,
            admin,
            password,
        } => {
            println!("Creating member: {} ({})", username, email);

            // Get password
            let password = match password {
                Some(pwd) => pwd,
                None => {
                    print!("Password: ");
                    std::io::stdout().flush()?;

                    rpassword::read_password().context("Failed to read password")?
                }
            };

            let mut member = Member::new(username.clone(), email.clone(), &password)?;
            member.is_admin = admin;

            if let Err(e) = member.is_valid() {
                anyhow::bail!("Invalid member data: {}", e);
            }

            let member_id = member_repo
                .create(&member)
                .await
                .context("Failed to create member")?;

            println!("Member created successfully with ID: {}", member_id);
            if admin {
                println!("Member has admin privileges");
            }
            Ok(())
        }

        MemberCommands::Password { member, password } => {
            println!("Changing password for {}", member);

            // Find member by username or email
            let found = if member.contains('@') {
                member_repo.find_by_email(&member).await?
            } else {
                member_repo.find_by_username(&member).await?
            };

            let mut found = found.ok_or_else(|| anyhow!("Member not found"))?;

            // Get password
            let password = match password {
                Some(p) => p,
                None => {
                    print!("New password: ");
                    std::io::stdout().flush()?;
                    rpassword::read_password()?
                }
            };

            found.set_password(&password)?;
            member_repo.update(&found).await?;

            println!("Password changed successfully!");
            Ok(())
        }

        MemberCommands::List => {
            let members = member_repo.list_all().await?;

            if members.is_empty() {
                println!("No members found. Use 'corkboard member create' to create one.");
                return Ok(());
            }

            println!("Found {} member(s):", members.len());
            for member in members {
                let mut flags = Vec::new();
                if member.is_admin {
                    flags.push("admin");
                }
                if !member.is_active {
                    flags.push("disabled");
                }
                if flags.is_empty() {
                    println!("  • {} <{}>", member.username, member.email);
                } else {
                    println!(
                        "  • {} <{}> [{}]",
                        member.username,
                        member.email,
                        flags.join(", ")
                    );
                }
            }
            Ok(())
        }
    }
}

async fn handle_content_command(command: ContentCommands, pool: SqlitePool) -> Result<()> {
    let content_repo = ContentRepository::new(pool);

    match command {
        ContentCommands::List => {
            let contents = content_repo.list_all().await?;

            if contents.is_empty() {
                println!("No content pages found.");
                return Ok(());
            }

            println!("Found {} content page(s):", contents.len());
            for content in contents {
                println!(
                    "  • {} - {} (skin: {}, updated: {})",
                    content.co_id,
                    content.co_subject,
                    content.co_skin,
                    content.updated_at.format("%Y-%m-%d %H:%M")
                );
            }
            Ok(())
        }
    }
}
