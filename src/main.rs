use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use vehicle_replay::input::FileRouteSource;
use vehicle_replay::{RenderEvent, Session, Settings};

/// Operator commands read from stdin
#[derive(Debug, Clone, Copy, PartialEq)]
enum Command {
    Play,
    Pause,
    Toggle,
    Reset,
    Status,
    Quit,
}

impl Command {
    fn parse(line: &str) -> Option<Self> {
        match line.trim().to_lowercase().as_str() {
            "play" => Some(Command::Play),
            "pause" => Some(Command::Pause),
            "" | "p" => Some(Command::Toggle),
            "reset" | "r" => Some(Command::Reset),
            "status" | "s" => Some(Command::Status),
            "quit" | "q" | "exit" => Some(Command::Quit),
            _ => None,
        }
    }
}

fn log_status(session: &Session, vehicle_id: &str) {
    match session.snapshot() {
        Some(snapshot) => info!("[{}] {:?} | {}", vehicle_id, snapshot.state, snapshot),
        None => info!("[{}] {:?}", vehicle_id, session.load_status()),
    }
}

fn log_follow(event: &RenderEvent, session: &Session, vehicle_id: &str) {
    info!(
        "Follow ({:.6}, {:.6}) zoom {} [{:?}]",
        event.latitude, event.longitude, event.zoom, event.reason
    );
    log_status(session, vehicle_id);
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut settings = Settings::load();
    if Settings::config_path().is_some_and(|path| !path.exists()) {
        if let Err(e) = settings.save() {
            warn!("Could not write default settings: {:#}", e);
        }
    }
    if let Some(path) = std::env::args_os().nth(1) {
        settings.route_path = path.into();
    }

    let (mut session, mut events) = Session::new(settings.playback_config())?;
    let source = FileRouteSource::new(&settings.route_path);

    if let Err(e) = session.load_from(&source).await {
        error!(
            "Failed to load route data. Please ensure {} exists. ({})",
            settings.route_path.display(),
            e
        );
        return Err(e.into());
    }

    info!("Commands: play, pause, <enter> to toggle, reset, status, quit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            Some(event) = events.recv() => log_follow(&event, &session, &settings.vehicle_id),
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match Command::parse(&line) {
                    Some(Command::Play) => session.play(),
                    Some(Command::Pause) => session.pause(),
                    Some(Command::Toggle) if session.is_playing() => session.pause(),
                    Some(Command::Toggle) => session.play(),
                    Some(Command::Reset) => session.reset(),
                    Some(Command::Status) => log_status(&session, &settings.vehicle_id),
                    Some(Command::Quit) => break,
                    None => warn!("Unknown command: {:?}", line.trim()),
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    session.pause();
    info!("Playback stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("play"), Some(Command::Play));
        assert_eq!(Command::parse(" PAUSE\n"), Some(Command::Pause));
        assert_eq!(Command::parse(""), Some(Command::Toggle));
        assert_eq!(Command::parse("r"), Some(Command::Reset));
        assert_eq!(Command::parse("q"), Some(Command::Quit));
        assert_eq!(Command::parse("rewind"), None);
    }
}
