//! sim-runner: headless runner for the shop-tycoon simulation core.
//!
//! Usage:
//!   sim-runner --seed 12345 --ticks 240
//!   sim-runner --seed 12345 --ticks 240 --shared --script actions.json
//!
//! --script points at a JSON array of PlayerActions applied (in order)
//! before the tick loop starts.

use anyhow::Result;
use shopsim_core::{
    action::PlayerAction,
    catalog::Catalog,
    engine::{SessionMode, SimEngine},
    event::GameEvent,
};
use std::env;
use std::sync::Arc;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let ticks = parse_arg(&args, "--ticks", 240u64);
    let shared = args.iter().any(|a| a == "--shared");
    let data_dir = args
        .windows(2)
        .find(|w| w[0] == "--data-dir")
        .map(|w| w[1].to_string());
    let script = args
        .windows(2)
        .find(|w| w[0] == "--script")
        .map(|w| w[1].to_string());

    println!("shop-tycoon sim-runner");
    println!("  seed:   {seed}");
    println!("  ticks:  {ticks}");
    println!("  mode:   {}", if shared { "shared" } else { "single" });
    println!();

    let catalog = match data_dir {
        Some(dir) => {
            log::info!("loading catalog from {dir}");
            Arc::new(Catalog::load(&dir)?)
        }
        None => Arc::new(Catalog::builtin()),
    };

    let mode = if shared { SessionMode::Shared } else { SessionMode::Single };
    let session_id = format!("run-{seed}-{}", unix_now());
    let mut engine = SimEngine::new(session_id, seed, catalog, mode);

    if let Some(path) = script {
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let script_actions: Vec<PlayerAction> = serde_json::from_str(&content)?;
        println!("applying {} scripted action(s)", script_actions.len());
        for action in script_actions {
            engine.apply(action);
        }
    }

    let events = engine.run_ticks(ticks);
    print_summary(&engine, &events, ticks);
    Ok(())
}

fn print_summary(engine: &SimEngine, events: &[GameEvent], ticks: u64) {
    let state = engine.state();

    let (mut units_sold, mut revenue) = (0u64, 0f64);
    let mut passed_out = 0u64;
    for event in events {
        match event {
            GameEvent::SaleClosed { quantity, revenue: r, .. } => {
                units_sold += *quantity as u64;
                revenue += r;
            }
            GameEvent::PassedOut { .. } => passed_out += 1,
            _ => {}
        }
    }

    println!("=== RUN SUMMARY ===");
    println!("  ticks run:     {ticks}");
    println!("  final clock:   day {} {:02}:00", state.day, state.hour);
    println!("  money:         ${:.2}", state.money);
    println!("  bank balance:  ${:.2}", state.bank_balance);
    println!("  loan:          ${:.2}", state.loan_amount);
    println!("  shop level:    {}", state.shop_level);
    println!("  capacity:      {}/{}", state.total_stock(), state.max_inventory);
    println!("  units sold:    {units_sold}");
    println!("  revenue:       ${revenue:.2}");
    println!("  passed out:    {passed_out}x");

    println!();
    println!("=== MARKET ===");
    for stock in engine.market().stocks() {
        println!("  {:12} ${:.2}", stock.name, stock.current_price);
    }

    println!();
    println!("=== LAST MESSAGES ===");
    for msg in state.messages.iter().rev().take(10).collect::<Vec<_>>().into_iter().rev() {
        println!("  {msg}");
    }
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn unix_now() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
