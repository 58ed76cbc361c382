//! Writes every table found in a saved chat page to CSV files.
//!
//! Usage: `export_tables <page.html> <page-url> [out-dir]`
//!
//! Files are named `<table>_<YYYY-MM-DD>.csv`; the output directory defaults
//! to the current directory.

use std::path::PathBuf;
use std::{env, fs, io};

use chrono::Local;
use rs_chat_navigator::{export, find_tables};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <page.html> <page-url> [out-dir]", args[0]);
        std::process::exit(2);
    }
    let out_dir = args.get(3).map_or_else(|| PathBuf::from("."), PathBuf::from);

    let html = match fs::read_to_string(&args[1]) {
        Ok(html) => html,
        Err(err) => {
            eprintln!("Failed to read {}: {err}", args[1]);
            std::process::exit(1);
        }
    };

    let today = Local::now().date_naive();
    let tables = find_tables(&html, Some(&args[2]));
    if tables.is_empty() {
        info!("no tables found");
        return;
    }

    let mut failed = 0;
    for table in &tables {
        match export::export_to_dir(&out_dir, &table.name, &table.data, today) {
            Ok(path) => println!("{}", path.display()),
            Err(err) => {
                error!(table = %table.name, error = %err, "export failed");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        std::process::exit(1);
    }
}
