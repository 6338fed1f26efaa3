//! Platform Interfaces
//!
//! The narrow surface the engine needs from the chat platform: typed
//! snowflake ids, a channel binding that can carry display updates and
//! per-message reaction markers, and the inbound text events routed to
//! a running session. The platform glue owns rendering (emoji, embeds)
//! and transport; the core only emits structured events.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

pub use crate::game::lexicon::{Lexicon, WordSet};
use crate::game::session::{SubmissionVerdict, UserId};

/// Group (guild/server) identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupId(pub u64);

/// Channel identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChannelId(pub u64);

/// Message identifier, used to target reactions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageId(pub u64);

/// What kind of channel a session would run in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelKind {
    /// Multi-party text channel: supports broadcast and per-message
    /// reactions. The only kind this game mode runs in.
    GroupText,
    /// One-on-one direct message.
    DirectMessage,
}

/// An inbound text event from a participant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Who sent it.
    pub sender: UserId,
    /// The platform message, for reaction targeting.
    pub message: MessageId,
    /// Raw text as typed.
    pub text: String,
}

/// Symbolic per-message reaction marker.
///
/// The platform glue maps these to whatever reaction emoji it likes;
/// the core only states the adjudication result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Marker {
    /// Word accepted and scored.
    Scored,
    /// Word already played this session.
    AlreadyUsed,
    /// Not in the dictionary.
    NotAWord,
    /// The pool cannot spell it.
    TilesExhausted,
}

impl From<&SubmissionVerdict> for Marker {
    fn from(verdict: &SubmissionVerdict) -> Self {
        match verdict {
            SubmissionVerdict::Scored { .. } => Marker::Scored,
            SubmissionVerdict::AlreadyUsed => Marker::AlreadyUsed,
            SubmissionVerdict::NotAWord => Marker::NotAWord,
            SubmissionVerdict::TilesExhausted => Marker::TilesExhausted,
        }
    }
}

/// A titled display panel with labeled fields. Content is opaque to the
/// platform glue; it renders the structure however it likes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Panel {
    /// Panel title.
    pub title: String,
    /// Labeled fields, in display order.
    pub fields: Vec<(String, String)>,
}

impl Panel {
    /// New panel with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            fields: Vec::new(),
        }
    }

    /// Append a labeled field.
    pub fn field(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((label.into(), value.into()));
        self
    }
}

/// Outbound effects a session asks the platform to perform.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundEvent {
    /// Post or update a display panel.
    Display(Panel),
    /// React to an inbound message with a marker.
    React {
        /// The message to react to.
        message: MessageId,
        /// The adjudication marker.
        marker: Marker,
    },
}

/// Delivery failures from the platform side.
///
/// Never fatal to a session: the runner logs and swallows these so one
/// failed display update cannot abort an in-progress game.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ChannelError {
    /// The consumer side of the channel is gone.
    #[error("outbound channel closed")]
    Closed,
}

/// A session's handle on its output channel.
#[derive(Clone, Debug)]
pub struct ChannelBinding {
    /// The channel a session displays into.
    pub channel_id: ChannelId,
    /// What kind of channel it is.
    pub kind: ChannelKind,
    /// Outbound event sink, consumed by the platform glue.
    events: mpsc::Sender<OutboundEvent>,
}

impl ChannelBinding {
    /// Bind an output channel.
    pub fn new(channel_id: ChannelId, kind: ChannelKind, events: mpsc::Sender<OutboundEvent>) -> Self {
        Self {
            channel_id,
            kind,
            events,
        }
    }

    /// Whether this channel can host a session (broadcast plus
    /// per-message reactions — a multi-party text channel).
    pub fn supports_group_play(&self) -> bool {
        self.kind == ChannelKind::GroupText
    }

    /// Queue an outbound event for the platform glue.
    pub async fn send(&self, event: OutboundEvent) -> Result<(), ChannelError> {
        self.events.send(event).await.map_err(|_| ChannelError::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_mirrors_verdict() {
        let scored = SubmissionVerdict::Scored {
            word: "bat".into(),
            score: 4,
            tiles: vec![],
        };
        assert_eq!(Marker::from(&scored), Marker::Scored);
        assert_eq!(Marker::from(&SubmissionVerdict::NotAWord), Marker::NotAWord);
        assert_eq!(
            Marker::from(&SubmissionVerdict::AlreadyUsed),
            Marker::AlreadyUsed
        );
        assert_eq!(
            Marker::from(&SubmissionVerdict::TilesExhausted),
            Marker::TilesExhausted
        );
    }

    #[test]
    fn only_group_text_supports_play() {
        let (tx, _rx) = mpsc::channel(4);
        let group = ChannelBinding::new(ChannelId(1), ChannelKind::GroupText, tx.clone());
        let dm = ChannelBinding::new(ChannelId(2), ChannelKind::DirectMessage, tx);
        assert!(group.supports_group_play());
        assert!(!dm.supports_group_play());
    }

    #[tokio::test]
    async fn send_reports_closed_consumer() {
        let (tx, rx) = mpsc::channel(1);
        let binding = ChannelBinding::new(ChannelId(1), ChannelKind::GroupText, tx);
        drop(rx);
        assert!(binding
            .send(OutboundEvent::Display(Panel::new("x")))
            .await
            .is_err());
    }

    #[test]
    fn panel_builder_keeps_field_order() {
        let panel = Panel::new("Wave 1").field("Tiles", "A B C").field("Boss", "300");
        assert_eq!(panel.fields[0].0, "Tiles");
        assert_eq!(panel.fields[1].0, "Boss");
    }
}
