//! Session Run Loop
//!
//! Drives one siege from its first wave to a terminal outcome on the
//! tokio event loop: timed submission windows with countdown display
//! ticks, inbound adjudication, intermissions between waves, and a hard
//! session ceiling. Everything deterministic stays inside
//! [`SiegeState`]; this loop only decides *when* the engine's methods
//! run and relays the results to the platform.
//!
//! Delivery failures are logged and swallowed — one failed display
//! update must never abort an in-progress game.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Notify};
use tokio::time::{interval, sleep_until, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::chat::interface::{ChannelBinding, InboundMessage, Marker, OutboundEvent, Panel};
use crate::game::lexicon::Lexicon;
use crate::game::session::{
    SessionReport, SiegeConfig, SiegeOutcome, SiegePhase, SiegeState, WaveReport, WaveStart,
    WAVE_COUNT,
};

/// Timing and admission rules for running sessions.
#[derive(Clone, Debug)]
pub struct SessionRules {
    /// Maximum participants per session.
    pub max_players: usize,
    /// Length of each wave's submission window.
    pub wave_duration: Duration,
    /// Pause between waves.
    pub intermission: Duration,
    /// How often the countdown display refreshes during a wave.
    pub countdown_interval: Duration,
    /// Hard ceiling on total wave time for one session.
    pub session_ceiling: Duration,
    /// Deterministic engine knobs.
    pub siege: SiegeConfig,
}

impl Default for SessionRules {
    fn default() -> Self {
        Self {
            max_players: 8,
            wave_duration: Duration::from_secs(90),
            intermission: Duration::from_secs(15),
            countdown_interval: Duration::from_secs(15),
            session_ceiling: Duration::from_secs(600),
            siege: SiegeConfig::default(),
        }
    }
}

/// How a wave window closed.
enum WindowEnd {
    /// The clock ran out normally.
    Elapsed,
    /// Shutdown was requested or the intake closed.
    Aborted,
}

/// Runs one siege to completion.
pub struct SessionRunner {
    siege: SiegeState,
    lexicon: Arc<dyn Lexicon>,
    channel: ChannelBinding,
    inbound: mpsc::Receiver<InboundMessage>,
    shutdown: Arc<Notify>,
    rules: SessionRules,
}

impl SessionRunner {
    /// Assemble a runner around an engine and its plumbing.
    pub fn new(
        siege: SiegeState,
        lexicon: Arc<dyn Lexicon>,
        channel: ChannelBinding,
        inbound: mpsc::Receiver<InboundMessage>,
        shutdown: Arc<Notify>,
        rules: SessionRules,
    ) -> Self {
        Self {
            siege,
            lexicon,
            channel,
            inbound,
            shutdown,
            rules,
        }
    }

    /// Drive the session to its terminal outcome.
    ///
    /// Returns the end-of-session report once the phase reaches `End` —
    /// after wave 3, on early team defeat, or on shutdown (which
    /// forward-jumps the engine to `End` and reports whatever the
    /// healths say).
    pub async fn run(mut self) -> SessionReport {
        let ceiling = Instant::now() + self.rules.session_ceiling;

        let start = self.siege.begin();
        self.display_wave_start(&start).await;

        loop {
            if let WindowEnd::Aborted = self.wave_window(ceiling).await {
                info!("session aborted during wave window");
                self.siege.abort();
                break;
            }

            let report = self.siege.finish_wave();
            self.display_wave_report(&report).await;

            match self.siege.phase() {
                SiegePhase::End => break,
                SiegePhase::Intermission3 => {
                    self.siege.conclude();
                    break;
                }
                _ => {}
            }

            if self.intermission().await.is_err() {
                info!("session aborted during intermission");
                self.siege.abort();
                break;
            }

            let start = self.siege.next_wave();
            self.display_wave_start(&start).await;
        }

        let report = self.siege.report();
        self.display_outcome(report.outcome).await;
        info!(outcome = ?report.outcome, "session complete");
        report
    }

    /// One wave's submission window.
    async fn wave_window(&mut self, ceiling: Instant) -> WindowEnd {
        enum Step {
            Elapsed,
            Aborted,
            Tick,
            Message(InboundMessage),
        }

        let deadline = Instant::now()
            .checked_add(self.rules.wave_duration)
            .map(|d| d.min(ceiling))
            .unwrap_or(ceiling);
        let window = sleep_until(deadline);
        tokio::pin!(window);

        let shutdown = Arc::clone(&self.shutdown);
        let mut countdown = interval(self.rules.countdown_interval);
        countdown.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick fires immediately; it doubles as the
        // wave-opened countdown display.

        loop {
            let step = tokio::select! {
                _ = &mut window => Step::Elapsed,
                _ = shutdown.notified() => Step::Aborted,
                _ = countdown.tick() => Step::Tick,
                msg = self.inbound.recv() => match msg {
                    Some(msg) => Step::Message(msg),
                    // Intake gone means the owner is tearing us down.
                    None => Step::Aborted,
                },
            };

            match step {
                Step::Elapsed => return WindowEnd::Elapsed,
                Step::Aborted => return WindowEnd::Aborted,
                Step::Tick => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    self.display_countdown(remaining).await;
                }
                Step::Message(msg) => self.adjudicate(msg).await,
            }
        }
    }

    /// Route one inbound message through the engine and react to it.
    async fn adjudicate(&mut self, msg: InboundMessage) {
        let verdict = match self
            .siege
            .submit_word(msg.sender, &msg.text, self.lexicon.as_ref())
        {
            Some(verdict) => verdict,
            // Out-of-phase or unbound sender: silently ignored.
            None => return,
        };

        debug!(sender = %msg.sender, text = %msg.text, ?verdict, "adjudicated");
        self.post(OutboundEvent::React {
            message: msg.message,
            marker: Marker::from(&verdict),
        })
        .await;
    }

    /// Pause between waves; `Err` means shutdown was requested.
    async fn intermission(&mut self) -> Result<(), ()> {
        tokio::select! {
            _ = tokio::time::sleep(self.rules.intermission) => Ok(()),
            _ = self.shutdown.notified() => Err(()),
        }
    }

    async fn display_wave_start(&self, start: &WaveStart) {
        let tiles = tile_line(&start.new_tiles);
        let objectives = if start.objectives.is_empty() {
            "none".to_string()
        } else {
            start
                .objectives
                .iter()
                .map(|o| format!("• {o}"))
                .collect::<Vec<_>>()
                .join("\n")
        };
        let panel = Panel::new(format!("Wave {} of {}", start.wave, WAVE_COUNT))
            .field("New tiles", tiles)
            .field("Pool", tile_line(self.siege.pool()))
            .field("Objectives", objectives)
            .field("Boss", self.siege.boss_health_display().to_string())
            .field("Team", self.siege.team_health_display().to_string());
        self.post(OutboundEvent::Display(panel)).await;
    }

    async fn display_countdown(&self, remaining: Duration) {
        let panel = Panel::new("Time remaining")
            .field("Seconds", remaining.as_secs().to_string());
        self.post(OutboundEvent::Display(panel)).await;
    }

    async fn display_wave_report(&self, report: &WaveReport) {
        let objectives = report
            .objectives
            .iter()
            .map(|o| match o.defended_by {
                Some(user) => format!("• {} — defended by {user}", o.objective),
                None => format!("• {} — failed", o.objective),
            })
            .collect::<Vec<_>>()
            .join("\n");
        let panel = Panel::new(format!("Wave {} results", report.wave))
            .field("Damage dealt", report.boss_damage.to_string())
            .field("Damage taken", report.team_damage.to_string())
            .field(
                "Objectives",
                if objectives.is_empty() {
                    "none".to_string()
                } else {
                    objectives
                },
            )
            .field("Boss", self.siege.boss_health_display().to_string())
            .field("Team", self.siege.team_health_display().to_string());
        self.post(OutboundEvent::Display(panel)).await;
    }

    async fn display_outcome(&self, outcome: SiegeOutcome) {
        let headline = match outcome {
            SiegeOutcome::Victory => "The boss falls. Victory!",
            SiegeOutcome::Defeat => "The team is wiped out. Defeat.",
            SiegeOutcome::Escape => "The boss escapes...",
        };
        let mut panel = Panel::new(headline)
            .field("Boss", self.siege.boss_health_display().to_string())
            .field("Team", self.siege.team_health_display().to_string());
        for (user, ledger) in self.siege.players() {
            panel = panel.field(
                format!("Player {user}"),
                format!(
                    "{} damage, {} words, {} objectives defended",
                    ledger.total_damage,
                    ledger.all_words.len(),
                    ledger.objectives_completed
                ),
            );
        }
        self.post(OutboundEvent::Display(panel)).await;
    }

    /// Send an outbound event; failures are logged and swallowed.
    async fn post(&self, event: OutboundEvent) {
        if let Err(e) = self.channel.send(event).await {
            warn!("outbound delivery failed: {e}");
        }
    }
}

/// Space-separated tile symbols.
fn tile_line(tiles: &[crate::core::tile::Tile]) -> String {
    tiles
        .iter()
        .map(|t| t.symbol())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::interface::{ChannelId, ChannelKind, MessageId};
    use crate::game::lexicon::WordSet;
    use crate::game::session::UserId;

    fn quick_rules() -> SessionRules {
        SessionRules {
            wave_duration: Duration::from_millis(120),
            intermission: Duration::from_millis(10),
            countdown_interval: Duration::from_millis(40),
            session_ceiling: Duration::from_secs(5),
            ..SessionRules::default()
        }
    }

    fn empty_pool_rules() -> SessionRules {
        SessionRules {
            siege: SiegeConfig {
                wave_vowels: 0,
                wave_consonants: 0,
                wave_randoms: 0,
                objective_tiers: vec![vec![], vec![], vec![]],
                ..SiegeConfig::default()
            },
            ..quick_rules()
        }
    }

    struct Harness {
        inbound: mpsc::Sender<InboundMessage>,
        events: mpsc::Receiver<OutboundEvent>,
        shutdown: Arc<Notify>,
        task: tokio::task::JoinHandle<SessionReport>,
    }

    fn spawn_runner(rules: SessionRules, players: &[UserId]) -> Harness {
        let (out_tx, out_rx) = mpsc::channel(256);
        let (in_tx, in_rx) = mpsc::channel(64);
        let shutdown = Arc::new(Notify::new());
        let channel = ChannelBinding::new(ChannelId(10), ChannelKind::GroupText, out_tx);
        let lexicon: Arc<dyn Lexicon> = Arc::new(WordSet::from_words(["bat", "ox", "quiz"]));
        let siege = SiegeState::new(7, players.iter().copied(), rules.siege.clone());
        let runner = SessionRunner::new(
            siege,
            lexicon,
            channel,
            in_rx,
            Arc::clone(&shutdown),
            rules,
        );
        Harness {
            inbound: in_tx,
            events: out_rx,
            shutdown,
            task: tokio::spawn(runner.run()),
        }
    }

    async fn drain(mut events: mpsc::Receiver<OutboundEvent>) -> Vec<OutboundEvent> {
        let mut all = Vec::new();
        while let Some(e) = events.recv().await {
            all.push(e);
        }
        all
    }

    #[tokio::test]
    async fn quiet_session_runs_to_escape() {
        let harness = spawn_runner(empty_pool_rules(), &[UserId(1)]);
        let report = harness.task.await.unwrap();
        assert_eq!(report.outcome, SiegeOutcome::Escape);
        assert_eq!(report.waves.len(), 3);

        let events = drain(harness.events).await;
        let titles: Vec<String> = events
            .iter()
            .filter_map(|e| match e {
                OutboundEvent::Display(p) => Some(p.title.clone()),
                _ => None,
            })
            .collect();

        // Three wave openings, three reports, one outcome panel.
        for wave in 1..=3 {
            assert!(titles.iter().any(|t| t == &format!("Wave {wave} of 3")));
            assert!(titles.iter().any(|t| t == &format!("Wave {wave} results")));
        }
        assert!(titles.iter().any(|t| t.contains("escapes")));
    }

    #[tokio::test]
    async fn rejected_words_get_reaction_markers() {
        let harness = spawn_runner(empty_pool_rules(), &[UserId(1)]);

        harness
            .inbound
            .send(InboundMessage {
                sender: UserId(1),
                message: MessageId(100),
                text: "zzz".into(),
            })
            .await
            .unwrap();
        harness
            .inbound
            .send(InboundMessage {
                sender: UserId(1),
                message: MessageId(101),
                text: "quiz".into(),
            })
            .await
            .unwrap();

        harness.task.await.unwrap();
        let events = drain(harness.events).await;

        let reactions: Vec<(MessageId, Marker)> = events
            .iter()
            .filter_map(|e| match e {
                OutboundEvent::React { message, marker } => Some((*message, *marker)),
                _ => None,
            })
            .collect();
        assert!(reactions.contains(&(MessageId(100), Marker::NotAWord)));
        assert!(reactions.contains(&(MessageId(101), Marker::TilesExhausted)));
    }

    #[tokio::test]
    async fn strangers_are_ignored_without_reaction() {
        let harness = spawn_runner(empty_pool_rules(), &[UserId(1)]);

        harness
            .inbound
            .send(InboundMessage {
                sender: UserId(999),
                message: MessageId(7),
                text: "quiz".into(),
            })
            .await
            .unwrap();

        harness.task.await.unwrap();
        let events = drain(harness.events).await;
        assert!(!events
            .iter()
            .any(|e| matches!(e, OutboundEvent::React { .. })));
    }

    #[tokio::test]
    async fn stop_aborts_promptly_and_is_idempotent() {
        let rules = SessionRules {
            wave_duration: Duration::from_secs(60),
            ..empty_pool_rules()
        };
        let harness = spawn_runner(rules, &[UserId(1)]);

        // Let the runner reach its first window, then stop it twice.
        tokio::time::sleep(Duration::from_millis(20)).await;
        harness.shutdown.notify_one();
        harness.shutdown.notify_one();

        let report = tokio::time::timeout(Duration::from_secs(2), harness.task)
            .await
            .expect("runner did not stop")
            .unwrap();
        assert_eq!(report.outcome, SiegeOutcome::Escape);
    }

    #[tokio::test]
    async fn closed_outbound_channel_does_not_kill_the_session() {
        let harness = spawn_runner(empty_pool_rules(), &[UserId(1)]);
        drop(harness.events);
        let report = harness.task.await.unwrap();
        assert_eq!(report.outcome, SiegeOutcome::Escape);
    }
}
