//! Interactive console client.
//!
//! Demonstrates:
//! - Building a client from a page origin
//! - A terminal [`Renderer`]
//! - Issuing commands from stdin while the event loop runs
//!
//! Usage:
//!   cargo run --example console -- --origin http://192.168.4.1
//!   cargo run --example console -- --origin http://192.168.4.1 --debug
//!
//! Commands:
//!   state | run <type> | stop | preset <type> | sensor <name> <current> <+1|-1> | quit

// ============================================================================
// Imports
// ============================================================================

use stand_control::protocol::format_reading;
use stand_control::{
    ClientBuilder, ClientHandle, Command, Renderer, Result, Sensor, SensorLimits, StatusView,
    SystemType,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

// ============================================================================
// Constants
// ============================================================================

const DEFAULT_ORIGIN: &str = "http://192.168.4.1";

// ============================================================================
// Types
// ============================================================================

/// Command-line arguments.
#[derive(Debug, Clone)]
struct Args {
    debug: bool,
    origin: String,
}

impl Args {
    /// Parse command-line arguments.
    fn parse() -> Self {
        let args: Vec<String> = std::env::args().collect();
        let origin = args
            .iter()
            .position(|a| a == "--origin")
            .and_then(|i| args.get(i + 1))
            .cloned()
            .unwrap_or_else(|| DEFAULT_ORIGIN.to_string());

        Self {
            debug: args.iter().any(|a| a == "--debug"),
            origin,
        }
    }
}

/// Prints everything to stdout.
struct ConsoleRenderer;

impl Renderer for ConsoleRenderer {
    fn set_connected(&mut self, connected: bool) {
        let label = if connected { "connected" } else { "disconnected" };
        println!("[link] {label}");
    }

    fn show_notice(&mut self, message: &str) {
        println!("[notice] {message}");
    }

    fn render_status(&mut self, view: &StatusView) {
        println!(
            "[status] {} (run {}, stop {})",
            view.label,
            enabled(view.run_enabled),
            enabled(view.stop_enabled)
        );
    }

    fn render_sensor(&mut self, sensor: Sensor, reading: Option<f64>) {
        println!("        {sensor:<20} {}", format_reading(reading));
    }

    fn render_rpm(&mut self, rpm: i64) {
        println!("[rpm] {rpm}");
    }

    fn select_system_type(&mut self, system_type: &SystemType) {
        println!("[type] {}", system_type.as_str());
    }
}

fn enabled(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(args.debug);

    if let Err(e) = run(args).await {
        eprintln!("\n[ERROR] {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    println!("=== Stand Control Console ===\n");

    let client = ClientBuilder::new().origin(&args.origin).build(ConsoleRenderer)?;
    let handle = client.handle();
    let task = tokio::spawn(client.run());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.first() == Some(&"quit") {
            break;
        }
        match parse_command(&words) {
            Some(command) => submit(&handle, command).await?,
            None if words.is_empty() => {}
            None => println!("[?] state | run <type> | stop | preset <type> | sensor <name> <current> <+1|-1> | quit"),
        }
    }

    handle.shutdown();
    let _ = task.await;
    Ok(())
}

async fn submit(handle: &ClientHandle, command: Command) -> Result<()> {
    let name = command.name();
    if !handle.send(command).await? {
        println!("[!] {name} not sent: not connected");
    }
    Ok(())
}

fn parse_command(words: &[&str]) -> Option<Command> {
    match words {
        ["state"] => Some(Command::GetState),
        ["run", system_type] => Some(Command::run(SystemType::new(*system_type))),
        ["stop"] => Some(Command::Stop),
        ["preset", system_type] => Some(Command::preset(SystemType::new(*system_type))),
        ["sensor", sensor, current, adjustment] => {
            let current = current.parse().ok()?;
            let adjustment = adjustment.parse().ok()?;
            Some(Command::adjust_sensor(
                *sensor,
                current,
                adjustment,
                SensorLimits::default(),
            ))
        }
        _ => None,
    }
}

/// Initialize tracing/logging.
fn init_logging(debug: bool) {
    let filter = if debug {
        "stand_control=debug"
    } else {
        "stand_control=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();
}
