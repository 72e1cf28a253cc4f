//! # CLI - CoveKV Interactive Shell
//!
//! A REPL-style command-line interface for the CoveKV storage engine.
//! Reads commands from stdin, executes them against the engine, and prints
//! results to stdout. Designed for both interactive use and scripted testing
//! (pipe commands via stdin).
//!
//! ## Commands
//!
//! ```text
//! SET key value      Insert or update a key-value pair
//! GET key            Look up a key (prints value or "(nil)")
//! DEL key            Delete a key (writes a tombstone)
//! KEYS               List live keys in ascending order
//! SYNC               fsync the active data file
//! STATS              Print engine debug info
//! EXIT / QUIT        Shut down gracefully
//! ```
//!
//! ## Configuration
//!
//! All settings are controlled via environment variables:
//!
//! ```text
//! COVE_DIR           Data directory                  (default: "covekv-data")
//! COVE_FILE_SIZE_MB  Rollover threshold in MiB       (default: 256)
//! COVE_SYNC          fsync every append              (default: "false")
//! ```

use anyhow::Result;
use engine::{Engine, IndexType, Options};
use std::io::{self, BufRead, Write};

/// Reads a configuration value from the environment, falling back to `default`.
fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let dir = env_or("COVE_DIR", "covekv-data");
    let file_size_mb: u64 = env_or("COVE_FILE_SIZE_MB", "256").parse().unwrap_or(256);
    let sync_writes: bool = env_or("COVE_SYNC", "false").parse().unwrap_or(false);

    let engine = Engine::open(Options {
        dir_path: dir.clone().into(),
        data_file_size: file_size_mb * 1024 * 1024,
        sync_writes,
        index_type: IndexType::BTree,
    })?;

    println!(
        "CoveKV started (dir={}, file_size={}MiB, sync={})",
        dir, file_size_mb, sync_writes
    );
    println!("Commands: SET key value | GET key | DEL key | KEYS | SYNC | STATS | EXIT");
    print!("> ");
    io::stdout().flush().ok();

    let stdin = io::stdin();

    for line in stdin.lock().lines() {
        let line = line?;
        let mut parts = line.split_whitespace();
        if let Some(cmd) = parts.next() {
            match cmd.to_uppercase().as_str() {
                "SET" => {
                    if let Some(k) = parts.next() {
                        let v: String = parts.collect::<Vec<&str>>().join(" ");
                        if v.is_empty() {
                            println!("ERR usage: SET key value");
                        } else {
                            match engine.put(k.as_bytes().to_vec(), v.into_bytes()) {
                                Ok(()) => println!("OK"),
                                Err(e) => println!("ERR set failed: {}", e),
                            }
                        }
                    } else {
                        println!("ERR usage: SET key value");
                    }
                }
                "GET" => {
                    if let Some(k) = parts.next() {
                        match engine.get(k.as_bytes()) {
                            Ok(v) => println!("{}", String::from_utf8_lossy(&v)),
                            Err(engine::EngineError::KeyNotFound) => println!("(nil)"),
                            Err(e) => println!("ERR read failed: {}", e),
                        }
                    } else {
                        println!("ERR usage: GET key");
                    }
                }
                "DEL" => {
                    if let Some(k) = parts.next() {
                        match engine.delete(k.as_bytes()) {
                            Ok(()) => println!("OK"),
                            Err(e) => println!("ERR delete failed: {}", e),
                        }
                    } else {
                        println!("ERR usage: DEL key");
                    }
                }
                "KEYS" => {
                    let keys = engine.list_keys();
                    for key in &keys {
                        println!("{}", String::from_utf8_lossy(key));
                    }
                    println!("({} keys)", keys.len());
                }
                "SYNC" => match engine.sync() {
                    Ok(()) => println!("OK"),
                    Err(e) => println!("ERR sync failed: {}", e),
                },
                "STATS" => {
                    println!("{:#?}", engine);
                }
                "EXIT" | "QUIT" => {
                    engine.close()?;
                    println!("bye");
                    break;
                }
                other => {
                    println!("ERR unknown command: {}", other);
                }
            }
        }
        print!("> ");
        io::stdout().flush().ok();
    }

    Ok(())
}
