//! # Engine Service
//!
//! Async actor wrapper around [`PricingEngine`]. One service per embedded
//! pricing widget; the host side holds an [`EngineHandle`] and an outbound
//! receiver, the engine runs in its own task.
//!
//! ## Service Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        EngineService Actor                              │
//! │                                                                         │
//! │   host messages ────► host_rx ──┐                                       │
//! │   (pushed data)                 │   ┌──────────────────────┐            │
//! │                                 ├──►│    select! loop      │            │
//! │   local edits ──────► edit_rx ──┘   │                      │            │
//! │   (operator typing)                 │  PricingEngine       │            │
//! │                                     │  dispatch + quote    │            │
//! │   shutdown ────────► shutdown_rx ──►│                      │            │
//! │                                     └──────────┬───────────┘            │
//! │                                                │                        │
//! │                            outbound_tx ◄───────┘                        │
//! │                                 │                                       │
//! │   snapshots to host ◄───────────┘  (ready, ratesChanged, ratesData)     │
//! │                                                                         │
//! │  ORDERING:                                                              │
//! │  ─────────                                                              │
//! │  • messages on one channel are handled strictly in arrival order        │
//! │  • host vs edit channels race; the provenance guards absorb that        │
//! │  • ready is published before any message is consumed                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::engine::{LocalEdit, PricingEngine};
use crate::error::{EngineError, EngineResult};
use crate::protocol::{decode_host_message, EngineMessage, HostMessage};

// =============================================================================
// Engine Handle
// =============================================================================

/// Handle for driving a running engine service from the host side.
#[derive(Clone)]
pub struct EngineHandle {
    /// Sender for decoded host messages.
    host_tx: mpsc::Sender<HostMessage>,

    /// Sender for local operator edits.
    edit_tx: mpsc::Sender<LocalEdit>,

    /// Shutdown signal.
    shutdown_tx: mpsc::Sender<()>,
}

impl EngineHandle {
    /// Sends a host message to the engine.
    pub async fn send(&self, message: HostMessage) -> EngineResult<()> {
        self.host_tx
            .send(message)
            .await
            .map_err(|_| EngineError::ChannelError("host message channel closed".into()))
    }

    /// Decodes and forwards one raw JSON frame from the host.
    ///
    /// Returns `Ok(true)` if the frame was recognized and queued, `Ok(false)`
    /// if it was dropped as unknown or malformed. Unrecognized traffic is
    /// expected on this boundary and never an error.
    pub async fn send_raw(&self, raw: &str) -> EngineResult<bool> {
        match decode_host_message(raw) {
            Some(message) => {
                self.send(message).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Sends a local operator edit to the engine.
    pub async fn edit(&self, edit: LocalEdit) -> EngineResult<()> {
        self.edit_tx
            .send(edit)
            .await
            .map_err(|_| EngineError::ChannelError("local edit channel closed".into()))
    }

    /// Signals the engine to shut down gracefully.
    pub async fn shutdown(&self) -> EngineResult<()> {
        self.shutdown_tx
            .send(())
            .await
            .map_err(|_| EngineError::ChannelError("shutdown channel closed".into()))
    }
}

// =============================================================================
// Engine Service
// =============================================================================

/// The engine actor: owns a [`PricingEngine`] and its channels.
///
/// ## Usage
/// ```rust,ignore
/// let config = EngineConfig::load_or_default(None);
/// let (handle, mut outbound_rx) = EngineService::spawn(config);
///
/// handle.send(HostMessage::set_gratuity(18.0)).await?;
///
/// while let Some(msg) = outbound_rx.recv().await {
///     println!("engine says: {}", msg.type_name());
/// }
/// ```
pub struct EngineService {
    engine: PricingEngine,
    label: String,
    host_rx: mpsc::Receiver<HostMessage>,
    edit_rx: mpsc::Receiver<LocalEdit>,
    outbound_tx: mpsc::Sender<EngineMessage>,
    shutdown_rx: mpsc::Receiver<()>,
}

impl EngineService {
    /// Creates a new service and spawns its background task.
    ///
    /// Returns a handle for sending messages and the receiver for the
    /// engine's outbound stream. The first outbound message is always
    /// `ready`.
    pub fn spawn(config: EngineConfig) -> (EngineHandle, mpsc::Receiver<EngineMessage>) {
        let capacity = config.service.channel_capacity;
        let (host_tx, host_rx) = mpsc::channel::<HostMessage>(capacity);
        let (edit_tx, edit_rx) = mpsc::channel::<LocalEdit>(capacity);
        let (outbound_tx, outbound_rx) = mpsc::channel::<EngineMessage>(capacity);
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);

        let service = EngineService {
            engine: PricingEngine::from_config(&config),
            label: config.service.label,
            host_rx,
            edit_rx,
            outbound_tx,
            shutdown_rx,
        };

        tokio::spawn(service.run());

        let handle = EngineHandle {
            host_tx,
            edit_tx,
            shutdown_tx,
        };

        (handle, outbound_rx)
    }

    /// Main service loop.
    async fn run(mut self) {
        info!(service = %self.label, "pricing engine starting");

        // Announce readiness before consuming anything
        if !self.publish(EngineMessage::ready()).await {
            return;
        }

        loop {
            tokio::select! {
                Some(message) = self.host_rx.recv() => {
                    let replies = self.engine.handle(message);
                    for reply in replies {
                        if !self.publish(reply).await {
                            return;
                        }
                    }
                }

                Some(edit) = self.edit_rx.recv() => {
                    let reply = self.engine.apply_edit(edit);
                    if !self.publish(reply).await {
                        return;
                    }
                }

                _ = self.shutdown_rx.recv() => {
                    info!(service = %self.label, "pricing engine shutting down");
                    break;
                }
            }
        }

        info!(service = %self.label, "pricing engine stopped");
    }

    /// Sends one outbound message, returning false if the host side is gone.
    async fn publish(&self, message: EngineMessage) -> bool {
        debug!(message = message.type_name(), "publishing engine message");
        if self.outbound_tx.send(message).await.is_err() {
            warn!(service = %self.label, "outbound receiver dropped, stopping engine");
            return false;
        }
        true
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
