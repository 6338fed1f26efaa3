//! Word Siege Demo Driver
//!
//! Runs one scripted siege end to end: a small embedded word list, two
//! simulated participants, and a console consumer for the outbound
//! display events. Platform bootstrap (credentials, gateway, command
//! registration) lives with the platform glue, not here.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use word_siege::chat::{
    ChannelBinding, ChannelId, ChannelKind, GroupId, InboundMessage, MessageId, OutboundEvent,
};
use word_siege::{GameManager, Lexicon, SessionRules, UserId, WordSet, VERSION};

/// Just enough dictionary for a demo round.
const DEMO_WORDS: &[&str] = &[
    "tea", "ant", "rain", "note", "notes", "stone", "siege", "rose", "tone", "rate", "near",
    "lane", "steal", "toes", "ties", "oats", "iron", "once", "acre", "ore", "ear", "eat", "tan",
    "ten", "tin", "ton", "net", "not", "rat", "tar", "art", "son", "sun", "nose", "date", "dare",
    "read", "lead", "deal", "dice", "ride", "side", "site", "rise", "raid", "said", "idea",
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    info!("Word Siege v{}", VERSION);
    demo_session().await
}

/// Run a single scripted session and dump its report.
async fn demo_session() -> anyhow::Result<()> {
    let lexicon: Arc<dyn Lexicon> = Arc::new(WordSet::from_words(DEMO_WORDS.iter().copied()));

    // Demo-scaled timing; production rules use the defaults.
    let rules = SessionRules {
        wave_duration: Duration::from_secs(3),
        intermission: Duration::from_millis(500),
        countdown_interval: Duration::from_secs(1),
        session_ceiling: Duration::from_secs(30),
        ..SessionRules::default()
    };
    let manager = Arc::new(GameManager::new(rules, lexicon));

    // Console consumer standing in for the platform glue.
    let (out_tx, mut out_rx) = mpsc::channel(256);
    let display = tokio::spawn(async move {
        while let Some(event) = out_rx.recv().await {
            match event {
                OutboundEvent::Display(panel) => {
                    info!("┌ {}", panel.title);
                    for (label, value) in &panel.fields {
                        for (i, line) in value.lines().enumerate() {
                            if i == 0 {
                                info!("│ {label}: {line}");
                            } else {
                                info!("│   {line}");
                            }
                        }
                    }
                }
                OutboundEvent::React { message, marker } => {
                    info!("reaction on message {}: {marker:?}", message.0);
                }
            }
        }
    });
    let channel = ChannelBinding::new(ChannelId(1), ChannelKind::GroupText, out_tx);

    // Seed from the day number so reruns within a day replay the same
    // tile sequence.
    let seed = (SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("clock before epoch")?
        .as_secs()
        / 86_400) as i32;
    info!("seed: {seed}");

    let players = [UserId(1), UserId(2)];
    let ticket = manager
        .try_new_game(GroupId(1), &players, channel, seed)
        .await
        .context("admission failed")?;

    // Scripted submissions: a few hits, a duplicate, a non-word.
    let inbound = ticket.inbound();
    tokio::spawn(async move {
        let script: &[(u64, &str)] = &[
            (1, "tea"),
            (2, "rose"),
            (1, "tea"),
            (2, "xylophone"),
            (1, "rain"),
            (2, "stone"),
            (1, "note"),
            (2, "siege"),
            (1, "iron"),
            (2, "steal"),
        ];
        for (i, &(user, word)) in script.iter().enumerate() {
            tokio::time::sleep(Duration::from_millis(700)).await;
            let message = InboundMessage {
                sender: UserId(user),
                message: MessageId(i as u64 + 1),
                text: word.to_string(),
            };
            if inbound.send(message).await.is_err() {
                break;
            }
        }
    });

    let report = ticket.outcome().await.context("session crashed")?;
    info!("outcome: {:?}", report.outcome);
    println!("{}", serde_json::to_string_pretty(&report)?);

    drop(manager);
    display.await?;
    Ok(())
}
