//! Synthetic event sets for demos: a well-connected org, three siloed
//! teams, and one overloaded connector.

use chrono::{DateTime, Utc};
use orgpulse_core::{InteractionEvent, OrgPulseError, UserId};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use tracing::info;

const SCENARIOS: [&str; 3] = ["healthy", "siloed", "overloaded"];
const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;
const EMOJI: &str = "thumbsup";

pub fn available_scenarios() -> &'static [&'static str] {
    &SCENARIOS
}

/// Events generated for one scenario.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoSeed {
    pub scenario: String,
    pub users: Vec<UserId>,
    pub channels: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hub_user: Option<UserId>,
    #[serde(skip)]
    pub events: Vec<InteractionEvent>,
}

impl DemoSeed {
    pub fn message_count(&self) -> usize {
        self.events.len()
    }
}

/// Generate the named scenario. Names are matched case-insensitively.
///
/// Event times fall within the last few days before `now` and are stored as
/// Unix seconds, the way the chat platform sends them.
pub fn seed_scenario<R: Rng + ?Sized>(
    name: &str,
    rng: &mut R,
    now: DateTime<Utc>,
) -> Result<DemoSeed, OrgPulseError> {
    let mut gen = Generator {
        rng,
        now_millis: now.timestamp_millis(),
        sequence: 0,
    };

    let seed = match name.trim().to_lowercase().as_str() {
        "healthy" => gen.healthy(),
        "siloed" => gen.siloed(),
        "overloaded" => gen.overloaded(),
        _ => {
            return Err(OrgPulseError::UnknownScenario {
                name: name.to_string(),
                available: SCENARIOS.join(", "),
            })
        }
    };

    info!(
        scenario = %seed.scenario,
        messages = seed.message_count(),
        users = seed.users.len(),
        channels = seed.channels.len(),
        "demo scenario seeded"
    );
    Ok(seed)
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

struct Generator<'r, R: Rng + ?Sized> {
    rng: &'r mut R,
    now_millis: i64,
    sequence: usize,
}

impl<R: Rng + ?Sized> Generator<'_, R> {
    fn next_id(&mut self) -> String {
        self.sequence += 1;
        format!("demo_msg_{}_{:04}", self.now_millis, self.sequence)
    }

    /// Unix seconds at a random time within the last `max_days_ago` days.
    fn timestamp(&mut self, max_days_ago: i64) -> i64 {
        let days_ago = self.rng.gen_range(0..max_days_ago);
        let offset = self.rng.gen_range(0..DAY_MILLIS);
        (self.now_millis - days_ago * DAY_MILLIS - offset) / 1000
    }

    fn pick<'a>(&mut self, from: &'a [String]) -> &'a str {
        from.choose(&mut *self.rng).map(String::as_str).unwrap_or_default()
    }

    fn chance(&mut self, p: f64) -> bool {
        self.rng.gen_bool(p)
    }

    fn message(&mut self, channel: &str, sender: &str, max_days_ago: i64) -> InteractionEvent {
        let id = self.next_id();
        let at = self.timestamp(max_days_ago);
        InteractionEvent::message(id, channel, sender).at(at)
    }

    fn healthy(&mut self) -> DemoSeed {
        let users = names(&[
            "alice", "bob", "charlie", "diana", "eve", "frank", "grace", "henry", "ivy", "jack",
        ]);
        let channels = names(&["general", "team_sales", "team_eng"]);
        let mut events = Vec::new();

        for _ in 0..60 {
            let sender = self.pick(&users);
            let channel = self.pick(&channels);
            let mut event = self.message(channel, sender, 3);
            if self.chance(0.4) {
                let mentioned = self.pick(&users);
                if mentioned != sender {
                    event = event.with_mentions([mentioned]);
                }
            }
            if self.chance(0.3) {
                let reactor = self.pick(&users);
                event = event.with_reaction(reactor, EMOJI);
            }
            events.push(event);
        }

        // cross-channel mentions
        for _ in 0..20 {
            let sender = self.pick(&users);
            let channel = self.pick(&channels);
            let mentioned = self.pick(&users);
            if sender != mentioned {
                let event = self.message(channel, sender, 2).with_mentions([mentioned]);
                events.push(event);
            }
        }

        DemoSeed {
            scenario: "healthy".into(),
            users,
            channels,
            hub_user: None,
            events,
        }
    }

    fn siloed(&mut self) -> DemoSeed {
        let teams = [
            (names(&["alice", "bob", "charlie", "diana"]), "sales"),
            (names(&["eve", "frank", "grace", "henry"]), "engineering"),
            (names(&["ivy", "jack", "kate", "lucas"]), "marketing"),
        ];
        let mut events = Vec::new();

        for (members, channel) in &teams {
            for _ in 0..80 {
                let sender = self.pick(members);
                let mut event = self.message(channel, sender, 4);
                if self.chance(0.5) {
                    let mentioned = self.pick(members);
                    if mentioned != sender {
                        event = event.with_mentions([mentioned]);
                    }
                }
                if self.chance(0.3) {
                    let reactor = self.pick(members);
                    event = event.with_reaction(reactor, EMOJI);
                }
                events.push(event);
            }
        }

        // a few bridge messages between sales and engineering
        let (sales, sales_channel) = &teams[0];
        let (engineering, engineering_channel) = &teams[1];
        for _ in 0..5 {
            let (bridge, target, channel) = if self.chance(0.5) {
                (sales[0].as_str(), engineering, *engineering_channel)
            } else {
                (engineering[0].as_str(), sales, *sales_channel)
            };
            let mentioned = self.pick(target);
            let event = self.message(channel, bridge, 4).with_mentions([mentioned]);
            events.push(event);
        }

        DemoSeed {
            scenario: "siloed".into(),
            users: teams.iter().flat_map(|(members, _)| members.clone()).collect(),
            channels: teams.iter().map(|(_, channel)| channel.to_string()).collect(),
            hub_user: None,
            events,
        }
    }

    fn overloaded(&mut self) -> DemoSeed {
        let users = names(&["alex", "bob", "charlie", "diana", "eve", "frank", "grace"]);
        let hub = users[0].clone();
        let others: Vec<String> = users[1..].to_vec();
        let channels = names(&["general", "team_discussions"]);
        let mut events = Vec::new();

        // the hub mentions everyone
        for _ in 0..30 {
            let target = self.pick(&users);
            if target != hub {
                let channel = self.pick(&channels);
                let event = self.message(channel, &hub, 3).with_mentions([target]);
                events.push(event);
            }
        }

        // everyone mentions the hub
        for _ in 0..20 {
            let sender = self.pick(&users);
            if sender != hub {
                let channel = self.pick(&channels);
                let event = self.message(channel, sender, 3).with_mentions([hub.as_str()]);
                events.push(event);
            }
        }

        // hub messages collecting reactions
        for _ in 0..25 {
            let wanted = if self.chance(0.3) { 2 } else { 1 };
            let mut reactors: Vec<&str> = Vec::with_capacity(wanted);
            for _ in 0..wanted {
                let reactor = self.pick(&others);
                if !reactors.contains(&reactor) {
                    reactors.push(reactor);
                }
            }
            let channel = self.pick(&channels);
            let mut event = self.message(channel, &hub, 3);
            for reactor in reactors {
                event = event.with_reaction(reactor, EMOJI);
            }
            events.push(event);
        }

        // little traffic that bypasses the hub
        for _ in 0..5 {
            let sender = self.pick(&others);
            let receivers: Vec<String> = others.iter().filter(|u| *u != sender).cloned().collect();
            let mentioned = self.pick(&receivers).to_string();
            let channel = self.pick(&channels);
            let event = self.message(channel, sender, 3).with_mentions([mentioned]);
            events.push(event);
        }

        DemoSeed {
            scenario: "overloaded".into(),
            users,
            channels,
            hub_user: Some(hub),
            events,
        }
    }
}
