//! Connection lifecycle: one WebSocket session per game participation.
//!
//! [`GameConnection::connect`] opens the transport and spawns three tasks:
//! a reader that parses frames into typed events, a writer that drains the
//! outbound command channel, and a dispatcher that is the sole consumer of
//! the inbound event channel and the sole writer of the session store. Link
//! state changes are broadcast via a [`watch`] channel so the owning scope
//! can react without polling.

use std::sync::Arc;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use mathtug_protocol::{ClientCommand, ServerEvent, decode_event, encode_command};
use mathtug_state::SessionStore;

use crate::dispatch::apply_event;
use crate::endpoint::game_url;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Transport link state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// No transport session exists.
    Disconnected,
    /// Handshake in flight.
    Connecting,
    /// Frames flow; outbound sends are accepted.
    Connected,
}

/// Errors surfaced by [`GameConnection::connect`].
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    /// The WebSocket handshake failed (refused, DNS, protocol error).
    #[error("websocket handshake failed: {0}")]
    Handshake(#[from] tokio_tungstenite::tungstenite::Error),
}

/// Observable link state shared between the owning scope and the I/O tasks.
struct LinkWatch {
    tx: watch::Sender<LinkState>,
    rx: watch::Receiver<LinkState>,
}

impl LinkWatch {
    fn new() -> Self {
        let (tx, rx) = watch::channel(LinkState::Disconnected);
        Self { tx, rx }
    }

    fn set(&self, state: LinkState) {
        self.tx.send_replace(state);
    }

    fn current(&self) -> LinkState {
        *self.rx.borrow()
    }
}

struct ActiveLink {
    commands: mpsc::UnboundedSender<ClientCommand>,
    shutdown: watch::Sender<bool>,
}

/// Manages exactly one live transport session tied to the store's identity.
///
/// The owning scope must call [`GameConnection::disconnect`] on every exit
/// path (dropping the connection also releases the transport, but an
/// explicit disconnect closes the socket promptly).
pub struct GameConnection {
    ws_base: String,
    store: SessionStore,
    link: Arc<LinkWatch>,
    active: Option<ActiveLink>,
}

impl GameConnection {
    /// Create a manager bound to a store. No transport is opened yet.
    pub fn new(ws_base: impl Into<String>, store: SessionStore) -> Self {
        Self {
            ws_base: ws_base.into(),
            store,
            link: Arc::new(LinkWatch::new()),
            active: None,
        }
    }

    /// Open the transport session for the store's current identity.
    ///
    /// A no-op (not an error) when the identity is incomplete — the session
    /// simply cannot be addressed yet — or when a session is already live.
    pub async fn connect(&mut self) -> Result<(), ConnectError> {
        let identity = self.store.snapshot().identity;
        if !identity.is_complete() {
            tracing::debug!("connect skipped: identity incomplete");
            return Ok(());
        }
        if self.active.is_some() {
            tracing::warn!("connect skipped: session already live");
            return Ok(());
        }

        let url = game_url(&self.ws_base, &identity);
        self.link.set(LinkState::Connecting);

        let (socket, _response) = match connect_async(&url).await {
            Ok(ok) => ok,
            Err(e) => {
                self.link.set(LinkState::Disconnected);
                return Err(e.into());
            }
        };
        tracing::info!(room = %identity.room_id, team = %identity.team, "game link open");

        let (sink, stream) = socket.split();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        // Mark the link open before the I/O tasks start: a server that
        // closes immediately must still be observed as a Connected →
        // Disconnected transition, not be overwritten by it.
        self.link.set(LinkState::Connected);

        let link = Arc::clone(&self.link);
        let mut reader_shutdown = shutdown_rx.clone();
        tokio::spawn(async move {
            read_loop(stream, event_tx, &link, &mut reader_shutdown).await;
        });

        let link = Arc::clone(&self.link);
        let mut writer_shutdown = shutdown_rx;
        tokio::spawn(async move {
            write_loop(sink, command_rx, &link, &mut writer_shutdown).await;
        });

        let store = self.store.clone();
        tokio::spawn(async move {
            dispatch_loop(event_rx, store).await;
        });

        self.active = Some(ActiveLink {
            commands: command_tx,
            shutdown: shutdown_tx,
        });
        Ok(())
    }

    /// Close the active transport session, if any. Safe to call repeatedly.
    pub fn disconnect(&mut self) {
        if let Some(active) = self.active.take() {
            let _ = active.shutdown.send(true);
            tracing::info!("game link closed");
        }
        self.link.set(LinkState::Disconnected);
    }

    /// Transmit a command if the link is open; silently drop it otherwise.
    ///
    /// Dropped-not-queued is deliberate: a stale answer or start command
    /// replayed after a reconnect could corrupt round state.
    pub fn send(&self, command: ClientCommand) {
        let Some(active) = &self.active else {
            tracing::trace!(?command, "dropping command: no session");
            return;
        };
        if self.link.current() != LinkState::Connected {
            tracing::trace!(?command, "dropping command: link not ready");
            return;
        }
        if active.commands.send(command).is_err() {
            tracing::trace!("dropping command: writer gone");
        }
    }

    /// Current link state.
    pub fn link_state(&self) -> LinkState {
        self.link.current()
    }

    /// Whether the link currently accepts outbound sends.
    pub fn is_connected(&self) -> bool {
        self.link.current() == LinkState::Connected
    }

    /// Receiver observing link state transitions.
    pub fn watch_link(&self) -> watch::Receiver<LinkState> {
        self.link.rx.clone()
    }
}

impl Drop for GameConnection {
    fn drop(&mut self) {
        self.disconnect();
    }
}

/// Parse inbound frames and push them onto the single ordered event channel.
///
/// Malformed payloads are dropped with a warning — one bad frame must not
/// kill a live game. Transport close or error marks the link disconnected;
/// no automatic reconnection is attempted.
async fn read_loop(
    mut stream: SplitStream<WsStream>,
    events: mpsc::UnboundedSender<ServerEvent>,
    link: &LinkWatch,
    shutdown: &mut watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            frame = stream.next() => match frame {
                Some(Ok(Message::Text(text))) => match decode_event(&text) {
                    Ok(ServerEvent::Unknown) => {
                        tracing::trace!("ignoring unrecognized event type");
                    }
                    Ok(event) => {
                        if events.send(event).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!("dropping malformed frame: {e}");
                    }
                },
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!("game link closed by authority");
                    link.set(LinkState::Disconnected);
                    break;
                }
                // Binary, ping and pong frames are not part of the contract.
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!("game link error: {e}");
                    link.set(LinkState::Disconnected);
                    break;
                }
            },
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    break;
                }
            }
        }
    }
}

/// Drain the outbound command channel into the socket.
async fn write_loop(
    mut sink: SplitSink<WsStream, Message>,
    mut commands: mpsc::UnboundedReceiver<ClientCommand>,
    link: &LinkWatch,
    shutdown: &mut watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(command) => {
                    let text = match encode_command(&command) {
                        Ok(text) => text,
                        Err(e) => {
                            tracing::warn!("failed to encode command: {e}");
                            continue;
                        }
                    };
                    if let Err(e) = sink.send(Message::Text(text.into())).await {
                        tracing::warn!("send failed, marking link down: {e}");
                        link.set(LinkState::Disconnected);
                        break;
                    }
                }
                None => break,
            },
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    let _ = sink.close().await;
                    break;
                }
            }
        }
    }
}

/// Sole consumer of the event channel; applies events to the store in the
/// exact order the transport delivered them.
async fn dispatch_loop(mut events: mpsc::UnboundedReceiver<ServerEvent>, store: SessionStore) {
    while let Some(event) = events.recv().await {
        apply_event(&store, event);
    }
}
