// SPDX-FileCopyrightText: 2026 Wishlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wishlist - a shared wishlist for friends and family.
//!
//! This is the binary entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use wishlist::{Registration, UserWishes, WishService};
use wishlist_config::WishlistConfig;
use wishlist_core::{Priority, WishRecord, WishlistError};

/// Exit code when the database stayed unreachable through every retry.
const EXIT_UNAVAILABLE: u8 = 3;

/// Wishlist - a shared wishlist for friends and family.
#[derive(Parser, Debug)]
#[command(name = "wishlist", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the XDG hierarchy.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Register a new user.
    Register {
        name: String,
        /// Register even if similar names already exist.
        #[arg(long)]
        confirm: bool,
    },
    /// Add a wish. The name and thumbnail are scraped from the URL when possible.
    Add {
        #[arg(long)]
        owner: String,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        name: Option<String>,
        /// must_have, would_be_nice, or maybe.
        #[arg(long, default_value_t = Priority::WouldBeNice)]
        priority: Priority,
    },
    /// List every user's wishes.
    List,
    /// Reserve someone else's wish.
    Reserve {
        wish_id: i64,
        #[arg(long = "as")]
        as_user: String,
    },
    /// Release a reservation you hold.
    Release {
        wish_id: i64,
        #[arg(long = "as")]
        as_user: String,
    },
    /// Delete one of your wishes.
    DeleteWish {
        wish_id: i64,
        #[arg(long = "as")]
        as_user: String,
    },
    /// Delete a user and all of their wishes.
    DeleteUser { name: String },
    /// Run diagnostic checks.
    Doctor {
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => wishlist_config::load_and_validate_path(path),
        None => wishlist_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            wishlist_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config.log.level);

    match run(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_service_unavailable() => {
            eprintln!(
                "{} the wishlist database is unavailable, please try again shortly ({e})",
                "service unavailable:".red().bold()
            );
            ExitCode::from(EXIT_UNAVAILABLE)
        }
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, config: &WishlistConfig) -> Result<(), WishlistError> {
    if let Commands::Doctor { plain } = command {
        return if wishlist::doctor::run_doctor(config, plain).await {
            Ok(())
        } else {
            Err(WishlistError::Internal("doctor found failing checks".into()))
        };
    }

    let service = WishService::open(config).await?;
    match command {
        Commands::Register { name, confirm } => match service.register(&name, confirm).await? {
            Registration::Created(user) => println!("registered {} (id {})", user.name, user.id),
            Registration::NeedsConfirmation(similar) => {
                let names: Vec<_> = similar.iter().map(|u| u.name.as_str()).collect();
                println!(
                    "similar users already exist: {}. Re-run with --confirm if you are someone else.",
                    names.join(", ")
                );
            }
        },
        Commands::Add {
            owner,
            url,
            name,
            priority,
        } => {
            let wish = service.add_wish(&owner, url, name, priority).await?;
            println!("added wish {}", wish.id);
            print_wish(&wish, &[]);
        }
        Commands::List => {
            let listing = service.list().await?;
            print_listing(&listing);
        }
        Commands::Reserve { wish_id, as_user } => {
            service.reserve(wish_id, &as_user).await?;
            println!("wish {wish_id} reserved by {as_user}");
        }
        Commands::Release { wish_id, as_user } => {
            service.release(wish_id, &as_user).await?;
            println!("reservation on wish {wish_id} released");
        }
        Commands::DeleteWish { wish_id, as_user } => {
            service.delete_wish(wish_id, &as_user).await?;
            println!("wish {wish_id} deleted");
        }
        Commands::DeleteUser { name } => {
            let user = service.delete_user(&name).await?;
            println!("deleted {} and their wishes", user.name);
        }
        Commands::Doctor { .. } => {}
    }
    Ok(())
}

fn print_listing(listing: &[UserWishes]) {
    let users: Vec<_> = listing.iter().map(|entry| entry.user.clone()).collect();
    for entry in listing {
        println!("{}", entry.user.name.bold());
        if entry.wishes.is_empty() {
            println!("  (no wishes yet)");
        }
        for wish in &entry.wishes {
            print_wish(wish, &users);
        }
    }
}

fn print_wish(wish: &WishRecord, users: &[wishlist_core::User]) {
    let name = wish
        .display_name
        .as_deref()
        .or(wish.url.as_deref())
        .unwrap_or("(unnamed)");
    let reserved = match wish.reserved_by {
        Some(id) => {
            let by = users
                .iter()
                .find(|u| u.id == id)
                .map_or_else(|| format!("user {id}"), |u| u.name.clone());
            format!(" [reserved by {by}]").yellow().to_string()
        }
        None => String::new(),
    };
    println!("  #{:<4} {name} ({}){reserved}", wish.id, wish.priority);
    if let Some(url) = &wish.url {
        println!("        {}", url.dimmed());
    }
    if let Some(thumb) = &wish.thumbnail_url {
        println!("        thumbnail: {}", thumb.dimmed());
    }
}

/// Initialize the tracing subscriber. `RUST_LOG` overrides the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("wishlist={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
