pub mod broadcaster;
pub mod connection_tracker;
pub mod dispatcher;
pub mod room_error;
pub mod room_manager;
pub mod server_config;
pub mod web_server;
pub mod ws_handler;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use dispatcher::{Dispatcher, EventSender};
use room_manager::{RoomManager, RoomSettings};
use server_config::ServerConfig;
use web_server::WebServerState;

/// Starts the event loop that owns the room registry and returns the state
/// the web server hands to each connection.
pub fn start_dispatcher(config: &ServerConfig) -> (WebServerState, JoinHandle<()>) {
    let (events, event_rx): (EventSender, _) = mpsc::unbounded_channel();
    let dispatcher = Dispatcher::new(RoomManager::new(RoomSettings::from(config)));
    let handle = tokio::spawn(dispatcher.run(event_rx));
    (WebServerState::new(events, config), handle)
}
