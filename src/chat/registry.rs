//! Session Registry
//!
//! Admits new sessions, binds participants (at most one session per
//! participant per group), and guarantees teardown: however a session
//! ends — normal completion, early defeat, shutdown, or a panic in the
//! run loop — its participants are unbound and its resources released.
//!
//! The registry is an explicit object constructed once at process start
//! and handed to the command layer; sessions report their terminal
//! outcome back through their task result, so nothing here holds a
//! back-reference from a session to its manager.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, Notify, RwLock};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::chat::interface::{
    ChannelBinding, ChannelId, GroupId, InboundMessage, OutboundEvent, Panel,
};
use crate::chat::runner::{SessionRules, SessionRunner};
use crate::game::lexicon::Lexicon;
use crate::game::session::{SessionReport, SiegeState, UserId};

/// Why a session could not be created.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdmissionError {
    /// A participant is already bound to a session in this group.
    #[error("participant {0} is already in a session")]
    AlreadyInSession(UserId),

    /// The output channel cannot host this game mode.
    #[error("channel does not support group play")]
    InvalidChannel,

    /// More participants than the configured maximum.
    #[error("too many players ({count} > {max})")]
    TooManyPlayers {
        /// Requested participant count.
        count: usize,
        /// Configured maximum.
        max: usize,
    },

    /// An empty participant list.
    #[error("no participants")]
    NoParticipants,
}

/// Caller's handle on a running session.
#[derive(Debug)]
pub struct SessionTicket {
    session_id: Uuid,
    group: GroupId,
    participants: Vec<UserId>,
    channel_id: ChannelId,
    inbound: mpsc::Sender<InboundMessage>,
    stop: Arc<Notify>,
    outcome: oneshot::Receiver<SessionReport>,
}

impl SessionTicket {
    /// Unique id of the session.
    pub fn id(&self) -> Uuid {
        self.session_id
    }

    /// The group the session runs in.
    pub fn group(&self) -> GroupId {
        self.group
    }

    /// The bound participants.
    pub fn participants(&self) -> &[UserId] {
        &self.participants
    }

    /// The output channel, for routing error notifications.
    pub fn channel_id(&self) -> ChannelId {
        self.channel_id
    }

    /// Sender for routing participant messages into the session. The
    /// command layer is expected to pre-filter to bound participants,
    /// though the engine ignores strangers anyway.
    pub fn inbound(&self) -> mpsc::Sender<InboundMessage> {
        self.inbound.clone()
    }

    /// Request teardown. Idempotent: stopping an already-stopped
    /// session is a no-op.
    pub fn stop(&self) {
        self.stop.notify_one();
    }

    /// Await the end-of-session report. `None` if the run loop crashed.
    pub async fn outcome(self) -> Option<SessionReport> {
        self.outcome.await.ok()
    }
}

/// Per-group binding state.
#[derive(Default)]
struct GroupState {
    /// Which session each bound participant belongs to.
    bound: BTreeMap<UserId, Uuid>,
    /// Stop handles for the group's live sessions.
    sessions: BTreeMap<Uuid, Arc<Notify>>,
}

/// Tracks which participants are bound to live sessions and owns
/// session creation and teardown.
pub struct GameManager {
    rules: SessionRules,
    lexicon: Arc<dyn Lexicon>,
    /// Shared with each session's monitor task, which unbinds on exit.
    groups: Arc<RwLock<BTreeMap<GroupId, GroupState>>>,
}

impl GameManager {
    /// New manager over a loaded lexicon.
    pub fn new(rules: SessionRules, lexicon: Arc<dyn Lexicon>) -> Self {
        Self {
            rules,
            lexicon,
            groups: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Try to create and start a session.
    ///
    /// The whole check-then-bind runs under one write lock, so two
    /// concurrent calls for overlapping participants cannot both pass
    /// the "not already bound" check. On success the session is already
    /// running; a monitor task unbinds everyone when it ends, no matter
    /// how it ends.
    pub async fn try_new_game(
        &self,
        group: GroupId,
        participants: &[UserId],
        channel: ChannelBinding,
        seed: i32,
    ) -> Result<SessionTicket, AdmissionError> {
        if participants.is_empty() {
            return Err(AdmissionError::NoParticipants);
        }
        if !channel.supports_group_play() {
            return Err(AdmissionError::InvalidChannel);
        }
        if participants.len() > self.rules.max_players {
            return Err(AdmissionError::TooManyPlayers {
                count: participants.len(),
                max: self.rules.max_players,
            });
        }

        let session_id = Uuid::new_v4();
        let stop = Arc::new(Notify::new());
        {
            let mut groups = self.groups.write().await;
            let state = groups.entry(group).or_default();
            if let Some(&user) = participants.iter().find(|p| state.bound.contains_key(p)) {
                return Err(AdmissionError::AlreadyInSession(user));
            }
            for &user in participants {
                state.bound.insert(user, session_id);
            }
            state.sessions.insert(session_id, Arc::clone(&stop));
        }

        let (inbound_tx, inbound_rx) = mpsc::channel(64);
        let siege = SiegeState::new(seed, participants.iter().copied(), self.rules.siege.clone());
        let runner = SessionRunner::new(
            siege,
            Arc::clone(&self.lexicon),
            channel.clone(),
            inbound_rx,
            Arc::clone(&stop),
            self.rules.clone(),
        );

        let (outcome_tx, outcome_rx) = oneshot::channel();
        let groups = Arc::clone(&self.groups);
        let bound: Vec<UserId> = participants.to_vec();
        let channel_id = channel.channel_id;
        let run_handle = tokio::spawn(runner.run());
        tokio::spawn(async move {
            let result = run_handle.await;

            // Unbind first, unconditionally: a crashed session must not
            // leave its participants stuck.
            release(&groups, group, session_id, &bound).await;

            match result {
                Ok(report) => {
                    info!(%session_id, outcome = ?report.outcome, "session released");
                    let _ = outcome_tx.send(report);
                }
                Err(join_error) => {
                    error!(%session_id, %join_error, "session run loop crashed");
                    let notice = Panel::new("Session error")
                        .field("Status", "The session ended unexpectedly.");
                    if let Err(e) = channel.send(OutboundEvent::Display(notice)).await {
                        warn!(%session_id, "failure notice not delivered: {e}");
                    }
                }
            }
        });

        info!(%session_id, ?group, players = participants.len(), "session created");
        Ok(SessionTicket {
            session_id,
            group,
            participants: participants.to_vec(),
            channel_id,
            inbound: inbound_tx,
            stop,
            outcome: outcome_rx,
        })
    }

    /// Whether `user` is currently bound to a session in `group`.
    pub async fn is_bound(&self, group: GroupId, user: UserId) -> bool {
        let groups = self.groups.read().await;
        groups
            .get(&group)
            .map(|state| state.bound.contains_key(&user))
            .unwrap_or(false)
    }

    /// Number of live sessions across all groups.
    pub async fn session_count(&self) -> usize {
        let groups = self.groups.read().await;
        groups.values().map(|state| state.sessions.len()).sum()
    }

    /// Stop every live session (process shutdown). Idempotent; the
    /// monitor tasks take care of the actual unbinding.
    pub async fn shutdown(&self) {
        let groups = self.groups.read().await;
        for state in groups.values() {
            for stop in state.sessions.values() {
                stop.notify_one();
            }
        }
    }
}

/// Drop a finished session's bindings.
async fn release(
    groups: &RwLock<BTreeMap<GroupId, GroupState>>,
    group: GroupId,
    session_id: Uuid,
    participants: &[UserId],
) {
    let mut groups = groups.write().await;
    let mut drained = false;
    if let Some(state) = groups.get_mut(&group) {
        for user in participants {
            if state.bound.get(user) == Some(&session_id) {
                state.bound.remove(user);
            }
        }
        state.sessions.remove(&session_id);
        drained = state.bound.is_empty() && state.sessions.is_empty();
    }
    if drained {
        groups.remove(&group);
    }
}
