//! Chat Platform Layer
//!
//! Everything facing the chat platform: channel bindings, inbound and
//! outbound event types, the async session runner, and the registry
//! that admits and tears down sessions. This layer is
//! **non-deterministic** — all game logic runs through `game/`.

pub mod interface;
pub mod registry;
pub mod runner;

pub use interface::{
    ChannelBinding, ChannelError, ChannelId, ChannelKind, GroupId, InboundMessage, Marker,
    MessageId, OutboundEvent, Panel,
};
pub use registry::{AdmissionError, GameManager, SessionTicket};
pub use runner::{SessionRules, SessionRunner};
