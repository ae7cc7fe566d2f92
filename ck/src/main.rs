//! cwk - send text as Morse code
//!
//! CLI entry point for keying messages and inspecting the character table.

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use colored::*;
use eyre::{Context, Result, bail};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use cwkeyer::cli::{Cli, Command};
use cwkeyer::config::{Config, SinkKind};
use cwkeyer::event::{self, Event};
use cwkeyer::timing::{event_length, unit_millis};
use cwkeyer::{AtomicSpeed, ConsoleKey, Key, Keyer, KeyerError, LogKey};

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    debug!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = match (&cli.command, cli.config.as_ref()) {
        (Command::Config { init: true, .. }, Some(path)) if !path.exists() => Config::default(),
        (_, path) => Config::load(path).context("Failed to load configuration")?,
    };
    info!(wpm = config.wpm, sink = ?config.sink, "cwk loaded config");

    match cli.command {
        Command::Send { text, wpm } => cmd_send(&config, &text.join(" "), wpm).await,
        Command::Interactive { wpm } => cmd_interactive(&config, wpm).await,
        Command::Check { text } => cmd_check(&text.join(" ")),
        Command::Timing { wpm } => cmd_timing(wpm.unwrap_or(config.wpm)),
        Command::Config { init, force } => cmd_config(&config, cli.config.as_deref(), init, force),
    }
}

/// How often interactive mode checks for an empty queue after stdin closes
const EMPTY_POLL_INTERVAL: Duration = Duration::from_millis(20);

fn make_key(kind: SinkKind) -> Arc<dyn Key> {
    match kind {
        SinkKind::Console => Arc::new(ConsoleKey::stdout()),
        SinkKind::Log => Arc::new(LogKey::new()),
    }
}

fn make_keyer(config: &Config, speed: Arc<AtomicSpeed>) -> Keyer {
    Keyer::with_capacity(speed, make_key(config.sink), config.queue_capacity)
}

async fn cmd_send(config: &Config, text: &str, wpm: Option<u32>) -> Result<()> {
    let speed = Arc::new(AtomicSpeed::new(wpm.unwrap_or(config.wpm)));
    let keyer = make_keyer(config, speed.clone());

    keyer.queue_message(text).await.context("Failed to queue message")?;
    info!(wpm = speed.get(), pending = keyer.pending(), "cmd_send: keying message");

    keyer.process_send_queue(true).await.context("Keying failed")?;
    println!();
    Ok(())
}

/// A line typed in interactive mode
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Text(String),
    Wpm(u32),
    Stop,
    Status,
    Quit,
    Invalid(String),
}

fn parse_input(line: &str) -> Input {
    let line = line.trim();
    let Some(command) = line.strip_prefix('/') else {
        return Input::Text(line.to_string());
    };

    let mut parts = command.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("wpm"), Some(value)) => match value.parse::<u32>() {
            Ok(wpm) if wpm >= cwkeyer::timing::MIN_WPM => Input::Wpm(wpm),
            _ => Input::Invalid(format!("invalid speed: {}", value)),
        },
        (Some("stop"), None) => Input::Stop,
        (Some("status"), None) => Input::Status,
        (Some("quit"), None) => Input::Quit,
        _ => Input::Invalid(format!("unknown command: /{}", command)),
    }
}

async fn cmd_interactive(config: &Config, wpm: Option<u32>) -> Result<()> {
    let speed = Arc::new(AtomicSpeed::new(wpm.unwrap_or(config.wpm)));
    let keyer = Arc::new(make_keyer(config, speed.clone()));

    let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);
    let mut processor: JoinHandle<Result<(), KeyerError>> = tokio::spawn({
        let keyer = keyer.clone();
        async move { keyer.process_until_shutdown(shutdown_rx).await }
    });

    eprintln!(
        "{} Keying at {} wpm. Commands: /wpm N, /stop, /status, /quit",
        "✓".green(),
        speed.get().to_string().cyan()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_closed = false;
    loop {
        tokio::select! {
            result = &mut processor => {
                return result.context("Keying task panicked")?.context("Keying failed");
            }
            _ = tokio::signal::ctrl_c() => {
                debug!("cmd_interactive: interrupted");
                keyer.drain_send_queue();
                break;
            }
            _ = tokio::time::sleep(EMPTY_POLL_INTERVAL), if stdin_closed => {
                if keyer.send_queue_is_empty() {
                    break;
                }
            }
            line = lines.next_line(), if !stdin_closed => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    debug!("cmd_interactive: stdin closed, waiting for queue to empty");
                    stdin_closed = true;
                    continue;
                };

                match parse_input(&line) {
                    Input::Text(text) if text.is_empty() => {}
                    Input::Text(text) => {
                        if let Err(e) = keyer.queue_message(&format!("{} ", text)).await {
                            eprintln!("{} {}", "✗".red(), e);
                        }
                    }
                    Input::Wpm(wpm) => {
                        speed.set(wpm);
                        eprintln!("{} Speed set to {} wpm", "✓".green(), wpm.to_string().cyan());
                    }
                    Input::Stop => {
                        keyer.drain_send_queue();
                        eprintln!("{} Stopped", "✓".green());
                    }
                    Input::Status => {
                        eprintln!("  Speed: {} wpm", speed.get());
                        eprintln!("  Pending events: {}", keyer.pending());
                    }
                    Input::Quit => {
                        keyer.drain_send_queue();
                        break;
                    }
                    Input::Invalid(message) => eprintln!("{} {}", "✗".red(), message),
                }
            }
        }
    }

    // The processor finishes the event in flight before it stops
    let _ = shutdown_tx.send(()).await;
    processor.await.context("Keying task panicked")?.context("Keying failed")?;

    let mut stdout = io::stdout();
    writeln!(stdout).context("Failed to write stdout")?;
    stdout.flush().context("Failed to flush stdout")?;
    Ok(())
}

fn cmd_check(text: &str) -> Result<()> {
    for c in text.chars() {
        match event::pattern(c) {
            Some(_) if c == ' ' => println!("{}", "(word space)".dimmed()),
            Some(pattern) => println!("{}  {}", c.to_uppercase().to_string().yellow(), pattern),
            None => println!("{}  {}", c.to_string().red(), "unsupported".red()),
        }
    }

    let bad = event::unkeyable(text);
    if !bad.is_empty() {
        let list: Vec<String> = bad.iter().map(|c| format!("{:?}", c)).collect();
        bail!("unsupported characters: {}", list.join(", "));
    }
    Ok(())
}

fn cmd_timing(wpm: u32) -> Result<()> {
    let Some(unit) = unit_millis(wpm) else {
        bail!("speed too slow: {} wpm (minimum {})", wpm, cwkeyer::timing::MIN_WPM);
    };

    println!("Speed: {} wpm", wpm.to_string().cyan());
    println!("  unit: {}ms", unit);
    for event in [Event::Dit, Event::Dah, Event::Space, Event::CharSpace, Event::WordSpace] {
        println!("  {:?}: {}ms", event, event_length(event, wpm).as_millis());
    }
    Ok(())
}

fn cmd_config(config: &Config, path: Option<&Path>, init: bool, force: bool) -> Result<()> {
    if !init {
        print!("{}", serde_yaml::to_string(config).context("Failed to serialize config")?);
        return Ok(());
    }

    let Some(target) = path.map(Path::to_path_buf).or_else(|| Config::default_paths().into_iter().next()) else {
        bail!("no config location available, pass --config");
    };
    if target.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", target.display());
    }

    config.save(&target).context("Failed to write config")?;
    println!("{} Wrote {}", "✓".green(), target.display().to_string().cyan());
    Ok(())
}
