//! CREATE2 Flag Address Miner CLI
//!
//! Mines salts until the CREATE2-derived address carries the required flag
//! bits (address & mask == flags), then prints the winning salt and the
//! predicted address. Hand both to your deployment transport and check the
//! address it reports comes back identical.

use std::process;
use std::time::Duration;

use clap::Parser;

use flag_miner::miner::PoolEvent;
use flag_miner::{Config, FlagPattern, MiningResult, WorkerPool};

fn main() {
    let config = Config::parse();

    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {}", e);
        process::exit(1);
    }

    let deployer = config.deployer_address();
    let flags = config.flags_bytes();
    let mask = config.mask_bytes();
    let init_code_hash = config.effective_init_code_hash();
    let pattern = FlagPattern::new(flags, mask).expect("validated flags");

    println!("CREATE2 Flag Address Miner");
    println!("===========================");
    println!("Deployer:   {}", deployer);
    println!("Flags:      0x{}", trimmed_hex(&flags));
    println!("Mask:       0x{} ({} bits)", trimmed_hex(&mask), pattern.constrained_bits());
    println!("Difficulty: {}", pattern.difficulty_description());
    println!("Workers:    {}", config.worker_count());
    println!("Bound:      {} candidate salts", format_number(config.max_attempts));
    println!();

    let pool = WorkerPool::spawn(
        config.worker_count(),
        deployer,
        flags,
        mask,
        init_code_hash,
        config.max_attempts,
    );
    let mut pool = match pool {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("Mining error: {}", e);
            process::exit(1);
        }
    };

    let stop_flag = pool.stop_flag_clone();
    ctrlc::set_handler(move || {
        stop_flag.store(true, std::sync::atomic::Ordering::Relaxed);
    })
    .expect("set Ctrl-C handler");

    println!("Searching... (Press Ctrl+C to stop)\n");

    let report_interval = Duration::from_secs(config.report_interval);

    loop {
        match pool.poll(report_interval) {
            PoolEvent::Candidate(result) => {
                // Slower partitions may still hold a lower salt
                println!(
                    "Candidate: salt {} -> {} (confirming)",
                    result.salt_decimal(),
                    result.address
                );
            }
            PoolEvent::Idle => print_progress(&pool),
            PoolEvent::Done => break,
        }
        if pool.is_stopped() {
            break;
        }
    }

    let stopped = pool.is_stopped();
    let total_salts = pool.total_salts();
    let elapsed = pool.elapsed();
    let rate = pool.salts_per_second();

    let outcome = pool.finish();

    println!("\n--- Final Statistics ---");
    println!("Total salts tried: {}", format_number(total_salts));
    println!("Time elapsed:      {:.2}s", elapsed.as_secs_f64());
    println!("Average speed:     {}/s", format_number(rate as u64));

    match outcome {
        Ok(result) => print_result(&result),
        Err(e) => {
            if stopped {
                println!("\nStopped by user.");
            } else {
                eprintln!("\nMining failed: {}", e);
            }
            process::exit(1);
        }
    }
}

fn print_result(result: &MiningResult) {
    println!("\n=== Result ===");
    println!("Address:     {}", result.address);
    println!("Salt (hex):  0x{}", result.salt_hex());
    println!("Salt (dec):  {}", result.salt_decimal());
    println!("Attempts:    {}", result.attempt() + 1);
}

fn print_progress(pool: &WorkerPool) {
    println!(
        "[{:>4}s] Tried {} salts ({}/s)",
        pool.elapsed().as_secs(),
        format_number(pool.total_salts()),
        format_number(pool.salts_per_second() as u64)
    );
}

/// Hex without leading zero bytes (last byte always shown).
fn trimmed_hex(bytes: &[u8; 20]) -> String {
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(19);
    hex::encode(&bytes[start..])
}

fn format_number(n: u64) -> String {
    if n >= 1_000_000_000 {
        format!("{:.2}B", n as f64 / 1e9)
    } else if n >= 1_000_000 {
        format!("{:.2}M", n as f64 / 1e6)
    } else if n >= 1_000 {
        format!("{:.2}K", n as f64 / 1e3)
    } else {
        n.to_string()
    }
}
