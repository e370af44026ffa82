//! # Seed Data Generator
//!
//! Populates the database with a development board catalog.
//!
//! ## Usage
//! ```bash
//! # Seed ./quiver_dev.db
//! cargo run -p quiver-db --bin seed
//!
//! # Specify database path
//! cargo run -p quiver-db --bin seed -- --db ./data/quiver.db
//! ```
//!
//! ## Generated Boards
//! Each owner lists a few boards. Rates vary so the catalog covers every
//! pricing path:
//! - daily and weekly rates
//! - weekly only (shown as "Price TBD" for short rentals)
//! - daily only
//! - pickup-only boards (not delivery eligible)

use std::env;

use quiver_core::{Board, BoardExtra, Money};
use quiver_db::{Database, DbConfig};

/// (owner id, owner name, delivers)
const OWNERS: &[(&str, &str, bool)] = &[
    ("owner-kai", "Kai's Quiver", true),
    ("owner-leilani", "Leilani Surf Co", true),
    ("owner-mateo", "Mateo (pickup only)", false),
];

/// (board name, daily dollars, weekly dollars); 0 means not offered
const BOARDS: &[(&str, i64, i64)] = &[
    ("9'0 Longboard", 30, 150),
    ("5'8 Fish", 25, 120),
    ("7'2 Mid-length", 28, 0),
    ("10'0 Gun", 0, 220),
    ("6'0 Shortboard", 22, 110),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./quiver_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Quiver Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./quiver_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Quiver Seed Data Generator");
    println!("============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.boards().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} boards", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let mut generated = 0;
    for (owner_idx, (owner_id, owner_name, delivers)) in OWNERS.iter().enumerate() {
        for (board_idx, (name, daily, weekly)) in BOARDS.iter().enumerate() {
            let board = generate_board(
                owner_idx, board_idx, owner_id, owner_name, *delivers, name, *daily, *weekly,
            );

            if let Err(e) = db.boards().save(&board).await {
                eprintln!("Failed to insert {}: {}", board.id, e);
                continue;
            }
            generated += 1;
        }
    }

    println!();
    println!("✓ Generated {} boards", generated);

    let sample = db.boards().list_active(3).await?;
    for board in &sample {
        println!("  {} ({}) - {} extras", board.name, board.owner_name, board.extras.len());
    }

    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn generate_board(
    owner_idx: usize,
    board_idx: usize,
    owner_id: &str,
    owner_name: &str,
    delivers: bool,
    name: &str,
    daily: i64,
    weekly: i64,
) -> Board {
    let rate = |dollars: i64| (dollars > 0).then(|| Money::from_major(dollars + owner_idx as i64));

    let mut extras = vec![BoardExtra {
        id: "leash".to_string(),
        name: "Leash".to_string(),
        daily_rate: Money::from_major(2),
        weekly_rate: Money::from_major(8),
        sizes: Vec::new(),
    }];
    if board_idx % 2 == 0 {
        extras.push(BoardExtra {
            id: "wetsuit".to_string(),
            name: "4/3 Wetsuit".to_string(),
            daily_rate: Money::from_major(10),
            weekly_rate: Money::from_major(50),
            sizes: ["XS", "S", "M", "L", "XL"].iter().map(|s| s.to_string()).collect(),
        });
    }
    if delivers {
        extras.push(BoardExtra {
            id: "roof-rack".to_string(),
            name: "Soft Roof Rack".to_string(),
            daily_rate: Money::from_major(5),
            weekly_rate: Money::from_major(20),
            sizes: Vec::new(),
        });
    }

    Board {
        id: format!("{}-board-{}", owner_id, board_idx + 1),
        name: name.to_string(),
        owner_id: owner_id.to_string(),
        owner_name: owner_name.to_string(),
        daily_rate: rate(daily),
        weekly_rate: rate(weekly),
        delivery_eligible: delivers,
        delivery_flat_rate: if delivers {
            Money::from_major(50)
        } else {
            Money::zero()
        },
        extras,
    }
}
