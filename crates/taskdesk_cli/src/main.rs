//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `taskdesk_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use taskdesk_core::{open_store_in_memory, AccountDirectory, SqliteKvStore};

fn main() {
    println!("taskdesk_core ping={}", taskdesk_core::ping());
    println!("taskdesk_core version={}", taskdesk_core::core_version());

    // Exercise the bootstrap path against a throwaway store so a broken
    // migration or directory payload fails loudly here.
    match smoke_bootstrap() {
        Ok(accounts) => println!("bootstrap ok, accounts={accounts}"),
        Err(err) => {
            eprintln!("bootstrap failed: {err}");
            std::process::exit(1);
        }
    }
}

fn smoke_bootstrap() -> Result<usize, Box<dyn std::error::Error>> {
    let conn = open_store_in_memory()?;
    let store = SqliteKvStore::try_new(&conn)?;
    let directory = AccountDirectory::new(&store);
    directory.bootstrap_default_admin()?;
    Ok(directory.load()?.len())
}
