//! # fareline-engine: Pricing Engine Service for Fareline
//!
//! This crate provides the message-driven pricing engine: the wire protocol
//! spoken with the embedding host, the dispatch layer over a core
//! [`fareline_core::Quote`], and the async actor that runs it all.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Pricing Engine Architecture                        │
//! │                                                                         │
//! │   HOST (reservation system)                                             │
//! │   ────────────────────────                                              │
//! │        │ JSON frames                      ▲ JSON frames                 │
//! │        │ setRates, setRouteData, ...      │ ready, ratesChanged, ...    │
//! │        ▼                                  │                             │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                   protocol.rs (wire types)                       │  │
//! │  │                                                                  │  │
//! │  │  HostMessage / EngineMessage: tagged JSON enums                  │  │
//! │  │  decode_host_message: lenient decode, unknown frames dropped     │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │                               ▼                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                   service.rs (actor)                             │  │
//! │  │                                                                  │  │
//! │  │  EngineService: tokio task, select! over host/edit/shutdown      │  │
//! │  │  EngineHandle: cloneable sender for the host side                │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │                               ▼                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                   engine.rs (dispatch)                           │  │
//! │  │                                                                  │  │
//! │  │  PricingEngine: one message in, quote ops, one snapshot out      │  │
//! │  │  LocalEdit: operator keystrokes from the widget context          │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │                               ▼                                         │
//! │                    fareline-core (pure math)                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`config`] - Engine configuration (TOML + env overrides)
//! - [`engine`] - `PricingEngine` message dispatch
//! - [`error`] - Engine error types
//! - [`protocol`] - Host/engine wire messages
//! - [`service`] - `EngineService` actor and `EngineHandle`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fareline_engine::{EngineConfig, EngineService, HostMessage};
//!
//! let config = EngineConfig::load_or_default(None);
//! let (handle, mut outbound_rx) = EngineService::spawn(config);
//!
//! // Forward raw frames from the host
//! handle.send_raw(r#"{"type":"setGratuity","payload":{"percent":18}}"#).await?;
//!
//! // Drain snapshots back to the host
//! while let Some(msg) = outbound_rx.recv().await {
//!     println!("engine: {}", msg.to_json()?);
//! }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod engine;
pub mod error;
pub mod protocol;
pub mod service;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{EngineConfig, PricingSettings, ServiceSettings};
pub use engine::{LocalEdit, PricingEngine};
pub use error::{EngineError, EngineResult};
pub use protocol::{
    decode_host_message, EngineMessage, HostMessage, PROTOCOL_VERSION,
};
pub use service::{EngineHandle, EngineService};
