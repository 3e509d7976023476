//! Repl command handler
//!
//! Runs an interactive session on a headless map. Pointer commands take
//! geographic coordinates and are turned into the pointer events a map
//! widget would emit at that spot. Lookups run in the background, so new
//! commands are accepted while earlier clicks are still resolving.

use crate::config::Config;
use crate::controller::{InteractionController, Phase};
use crate::coord::{to_geographic, LonLat};
use crate::error::Result;
use crate::geo::ip_location::{ConfiguredLocator, NoLocator};
use crate::geo::nominatim::NominatimGeocoder;
use crate::map::headless::HeadlessMap;
use crate::notify::{ConsoleNotifier, Notifier};
use crate::popup::PopupState;
use crate::session::{Session, UiEvent};
use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Repl command arguments
#[derive(Args)]
pub struct ReplArgs {
    /// Do not try to locate the user
    #[arg(long)]
    pub no_locate: bool,
}

/// A parsed input line
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReplCommand {
    Hover(LonLat),
    Click(LonLat),
    Drag(LonLat),
    Layer(bool),
    Menu,
    Close,
    Status,
    Help,
    Quit,
}

const HELP: &str = "\
Commands:
  hover LON LAT     move the pointer
  click LON LAT     select a point and look up its address
  drag LON LAT      drag the selected marker
  layer show|hide   toggle the base map layer
  menu              toggle the navigation menu
  close             dismiss the popup
  status            show markers and popup
  help              show this help
  quit              leave";

/// Parse one input line; blank lines yield `None`
pub fn parse_command(line: &str) -> std::result::Result<Option<ReplCommand>, String> {
    let words: Vec<&str> = line.split_whitespace().collect();

    let command = match words.as_slice() {
        [] => return Ok(None),
        ["hover", lon, lat] => ReplCommand::Hover(parse_coords(lon, lat)?),
        ["click", lon, lat] => ReplCommand::Click(parse_coords(lon, lat)?),
        ["drag", lon, lat] => ReplCommand::Drag(parse_coords(lon, lat)?),
        ["layer", "show"] => ReplCommand::Layer(true),
        ["layer", "hide"] => ReplCommand::Layer(false),
        ["menu"] => ReplCommand::Menu,
        ["close"] => ReplCommand::Close,
        ["status"] => ReplCommand::Status,
        ["help"] => ReplCommand::Help,
        ["quit"] | ["exit"] => ReplCommand::Quit,
        [name, ..] => return Err(format!("Unknown or malformed command: {} (try help)", name)),
    };

    Ok(Some(command))
}

fn parse_coords(lon: &str, lat: &str) -> std::result::Result<LonLat, String> {
    let lon: f64 = lon.parse().map_err(|_| format!("Invalid longitude: {}", lon))?;
    let lat: f64 = lat.parse().map_err(|_| format!("Invalid latitude: {}", lat))?;
    let coords = LonLat::new(lon, lat);
    coords.validate().map_err(|e| e.to_string())?;
    Ok(coords)
}

/// Translate a command into the UI event it stands for
pub fn to_event(command: ReplCommand, map: &HeadlessMap) -> Option<UiEvent> {
    match command {
        ReplCommand::Hover(at) => Some(UiEvent::PointerMove(map.pointer_at_lonlat(at))),
        ReplCommand::Click(at) => Some(UiEvent::Click(map.pointer_at_lonlat(at))),
        ReplCommand::Drag(at) => Some(UiEvent::Drag(map.pointer_at_lonlat(at))),
        ReplCommand::Layer(true) => Some(UiEvent::ShowBaseLayer),
        ReplCommand::Layer(false) => Some(UiEvent::HideBaseLayer),
        ReplCommand::Menu => Some(UiEvent::ToggleMenu),
        ReplCommand::Close => Some(UiEvent::DismissPopup),
        ReplCommand::Status | ReplCommand::Help | ReplCommand::Quit => None,
    }
}

/// One-line summary of the popup
pub fn describe_popup(state: &PopupState) -> String {
    match (state.target, state.anchor) {
        (Some(target), Some(anchor)) => format!(
            "popup [{}] at {}: {}",
            target.kind,
            to_geographic(anchor),
            state.content
        ),
        _ => "popup hidden".to_string(),
    }
}

fn print_status<N: Notifier>(controller: &InteractionController<HeadlessMap, N>) {
    let phase = match controller.phase() {
        Phase::Initializing => "initializing",
        Phase::AwaitingGps => "waiting for location",
        Phase::Ready { self_located: true } => "ready (located)",
        Phase::Ready { self_located: false } => "ready (location unavailable)",
    };
    println!("phase: {}", phase);
    println!(
        "base layer: {}",
        if controller.map().base_layer_visible() { "shown" } else { "hidden" }
    );
    println!("menu: {}", if controller.nav_open() { "open" } else { "closed" });

    for marker in controller.markers().iter() {
        println!(
            "marker [{}] at {}: {}",
            marker.kind(),
            marker.position(),
            marker.address().display_text()
        );
    }
    println!("{}", describe_popup(controller.popup().state()));
}

/// Run the repl command
pub async fn run(args: ReplArgs) -> Result<()> {
    let config = Config::load()?;

    let map = HeadlessMap::from_config(&config.map);
    let controller = InteractionController::new(map, ConsoleNotifier, config.map.zoom);
    let geocoder = NominatimGeocoder::from_config(&config.geocoder)?;
    let locator = if args.no_locate {
        ConfiguredLocator::None(NoLocator)
    } else {
        ConfiguredLocator::from_config(&config.location)?
    };

    let mut session = Session::new(controller, geocoder, locator);
    session.start();
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_command(&line) {
                    Ok(None) => {}
                    Ok(Some(ReplCommand::Quit)) => break,
                    Ok(Some(ReplCommand::Help)) => println!("{}", HELP),
                    Ok(Some(ReplCommand::Status)) => print_status(session.controller()),
                    Ok(Some(command)) => {
                        if let Some(event) = to_event(command, session.controller().map()) {
                            session.dispatch(event);
                            println!("{}", describe_popup(session.controller().popup().state()));
                        }
                    }
                    Err(msg) => eprintln!("{}", msg),
                }
            }
            true = session.next_completion(), if session.has_pending() => {
                println!("{}", describe_popup(session.controller().popup().state()));
            }
        }
    }

    Ok(())
}
