//! Headless room client.
//!
//! Connects a full client engine to a running hub over a websocket and maps
//! stdin lines onto room actions. Plain lines become chat; slash commands
//! cover the rest of the palette. Inbound activity is printed as it lands,
//! which makes the binary double as a smoke-test harness for the hub.

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use events::{ClientMessage, ServerMessage, decode_server, encode_client};
use futures_util::{SinkExt, StreamExt};
use room::{
    Action, Engine, EngineConfig, FigureTicker, GifError, GifPayload, GifProvider, GiphyClient,
    Viewport,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("health check returned HTTP {0}")]
    Unhealthy(u16),
    #[error("websocket connect failed: {0}")]
    WsConnect(Box<tokio_tungstenite::tungstenite::Error>),
}

#[derive(Parser, Debug)]
#[command(name = "driftroom", about = "Driftroom hub CLI client")]
struct Cli {
    #[arg(long, env = "DRIFTROOM_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the hub is up.
    Ping,
    /// Join the room interactively.
    Join {
        /// Simulated viewport width in pixels.
        #[arg(long, default_value_t = 1280.0)]
        width: f64,
        /// Simulated viewport height in pixels.
        #[arg(long, default_value_t = 800.0)]
        height: f64,
        /// Play the onboarding sequence after connecting.
        #[arg(long, default_value_t = false)]
        tutorial: bool,
        /// Run the ambient figure ticker.
        #[arg(long, default_value_t = false)]
        figures: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Command::Ping => run_ping(&cli.base_url).await,
        Command::Join { width, height, tutorial, figures } => {
            run_join(&cli.base_url, Viewport::new(width, height), tutorial, figures).await
        }
    }
}

async fn run_ping(base_url: &str) -> Result<(), CliError> {
    let client = reqwest::Client::new();
    let url = format!("{}/healthz", base_url.trim_end_matches('/'));
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CliError::Unhealthy(status.as_u16()));
    }
    println!("ok");
    Ok(())
}

// =============================================================================
// JOIN
// =============================================================================

async fn run_join(
    base_url: &str,
    viewport: Viewport,
    tutorial: bool,
    figures: bool,
) -> Result<(), CliError> {
    let provider: Arc<dyn GifProvider> = match GiphyClient::from_env() {
        Ok(client) => Arc::new(client),
        Err(e) => {
            eprintln!("gifs disabled: {e}");
            Arc::new(NoGifs)
        }
    };

    let url = ws_url(base_url)?;
    let (stream, _) = connect_async(&url)
        .await
        .map_err(|e| CliError::WsConnect(Box::new(e)))?;
    let (mut ws_tx, mut ws_rx) = stream.split();
    eprintln!("connected to {url}");

    let (outbound_tx, mut outbound_rx) = mpsc::channel::<ClientMessage>(64);
    let config = EngineConfig { viewport, ..EngineConfig::default() };
    let mut engine = Engine::new(config, provider, outbound_tx);

    if tutorial {
        engine.play_tutorial();
    }
    let _ticker = figures.then(|| engine.start_figure_ticker(FigureTicker::new()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    // Drives cursor trailing flushes and inbox drains while input is idle.
    let mut tick = tokio::time::interval(Duration::from_millis(50));

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Ok(Some(line)) = line else { break };
                if !handle_line(&mut engine, &line) {
                    break;
                }
            }
            msg = ws_rx.next() => {
                let Some(Ok(msg)) = msg else { break };
                if let Message::Text(text) = msg {
                    match decode_server(&text) {
                        Ok(message) => {
                            print_server(&message);
                            engine.handle_server(message);
                        }
                        Err(e) => eprintln!("undecodable message dropped: {e}"),
                    }
                }
            }
            Some(out) = outbound_rx.recv() => {
                let text = encode_client(&out);
                if ws_tx.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
            _ = tick.tick() => {
                engine.flush_cursor();
            }
        }

        while let Some(internal) = engine.try_recv_internal() {
            engine.apply_internal(internal);
        }
    }

    eprintln!("disconnected");
    Ok(())
}

// =============================================================================
// INPUT
// =============================================================================

/// What one stdin line asks for.
#[derive(Debug, Clone, PartialEq)]
enum Input {
    Action(Action),
    Cursor { x: f64, y: f64 },
    Figure,
    Tutorial,
    Who,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

fn parse_line(line: &str) -> Input {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Input::Empty;
    }
    if !trimmed.starts_with('/') {
        return Input::Action(Action::Chat(trimmed.to_owned()));
    }

    let (command, rest) = trimmed.split_once(' ').unwrap_or((trimmed, ""));
    let rest = rest.trim();
    match command {
        "/emoji" if !rest.is_empty() => Input::Action(Action::Emoji(rest.to_owned())),
        "/sound" if !rest.is_empty() => Input::Action(Action::Sound(rest.to_owned())),
        "/gif" if !rest.is_empty() => Input::Action(Action::Gif(rest.to_owned())),
        "/cursor" => {
            let mut parts = rest.split_whitespace();
            match (
                parts.next().and_then(|v| v.parse().ok()),
                parts.next().and_then(|v| v.parse().ok()),
            ) {
                (Some(x), Some(y)) => Input::Cursor { x, y },
                _ => Input::Unknown(trimmed.to_owned()),
            }
        }
        "/figure" => Input::Figure,
        "/tutorial" => Input::Tutorial,
        "/who" => Input::Who,
        "/help" => Input::Help,
        "/quit" | "/exit" => Input::Quit,
        _ => Input::Unknown(trimmed.to_owned()),
    }
}

/// Apply one stdin line. Returns false when the session should end.
fn handle_line(engine: &mut Engine, line: &str) -> bool {
    match parse_line(line) {
        Input::Action(action) => engine.handle_action(&action),
        Input::Cursor { x, y } => engine.handle_pointer(x, y),
        Input::Figure => engine.spawn_figure(),
        Input::Tutorial => engine.play_tutorial(),
        Input::Who => {
            let me = engine.profile().map_or("(unassigned)", |p| p.name.as_str());
            println!("you: {me}");
            for (client_id, roommate) in engine.roster().iter() {
                println!(
                    "  {} at ({:.0}, {:.0}) [{client_id}]",
                    roommate.profile.name, roommate.x, roommate.y
                );
            }
        }
        Input::Help => print_help(),
        Input::Quit => return false,
        Input::Empty => {}
        Input::Unknown(text) => {
            eprintln!("unrecognized: {text}");
            print_help();
        }
    }
    true
}

fn print_help() {
    println!("  <text>            say it");
    println!("  /emoji <glyph>    burst an emoji");
    println!("  /sound <name>     drum | cymbal | guitar | meme");
    println!("  /gif <id>         drop a gif by id");
    println!("  /cursor <x> <y>   move the cursor (pixels)");
    println!("  /figure           spawn a figure locally");
    println!("  /tutorial         replay the onboarding script");
    println!("  /who              list roommates");
    println!("  /quit             leave");
}

// =============================================================================
// OUTPUT
// =============================================================================

fn print_server(message: &ServerMessage) {
    match message {
        // Cursor traffic is too chatty to echo line by line.
        ServerMessage::CursorMove { .. } => {}
        ServerMessage::Event { key, value } => {
            println!("<- {key:?}: {}", value.as_deref().unwrap_or(""));
        }
        ServerMessage::NewUser => println!("<- someone joined"),
        ServerMessage::RoommateDisconnect { client_id } => {
            println!("<- roommate left [{client_id}]");
        }
        ServerMessage::ProfileInfo { profile } => {
            println!("you are {} ({})", profile.name, profile.avatar);
        }
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn ws_url(base_url: &str) -> Result<String, CliError> {
    if let Some(rest) = base_url.strip_prefix("http://") {
        return Ok(format!("ws://{}/ws", rest.trim_end_matches('/')));
    }
    if let Some(rest) = base_url.strip_prefix("https://") {
        return Ok(format!("wss://{}/ws", rest.trim_end_matches('/')));
    }
    Err(CliError::InvalidBaseUrl(base_url.to_owned()))
}

/// Provider used when no API key is configured: every lookup fails, which
/// the engine treats as a dropped event.
struct NoGifs;

#[async_trait::async_trait]
impl GifProvider for NoGifs {
    async fn resolve(&self, _id: &str) -> Result<GifPayload, GifError> {
        Err(GifError::MissingApiKey { var: "GIPHY_API_KEY".into() })
    }
}
