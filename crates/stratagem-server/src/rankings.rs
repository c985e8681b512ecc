//! Elo rankings and match history, persisted as JSON files.
//!
//! Multiplayer Elo: each placement is scored as a virtual match against
//! every other placement. Profiles are auto-created at the starting rating
//! on first sighting, and ratings never drop below the floor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Elo K factor.
pub const K_FACTOR: f64 = 32.0;

/// Rating for a freshly seen agent.
pub const STARTING_RATING: i64 = 1000;

/// Ratings never drop below this.
pub const RATING_FLOOR: i64 = 100;

/// Persistent rating profile for one agent.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AgentProfile {
    pub agent_id: String,
    pub rating: i64,
    pub peak_rating: i64,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub games_played: u32,
    pub rating_history: Vec<RatingPoint>,
}

/// One point in an agent's rating history.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RatingPoint {
    pub rating: i64,
    pub time: DateTime<Utc>,
}

impl AgentProfile {
    fn new(agent_id: &str) -> Self {
        Self {
            agent_id: agent_id.to_string(),
            rating: STARTING_RATING,
            peak_rating: STARTING_RATING,
            wins: 0,
            losses: 0,
            draws: 0,
            games_played: 0,
            rating_history: Vec::new(),
        }
    }

    /// Fraction of games won.
    pub fn win_rate(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            f64::from(self.wins) / f64::from(self.games_played)
        }
    }
}

/// A completed match.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: String,
    pub players: Vec<String>,
    /// Best to worst.
    pub placements: Vec<String>,
    pub winner: Option<String>,
    pub turn_count: u32,
    pub date: DateTime<Utc>,
    pub replay_file: Option<String>,
}

/// Expected score of a rated player against one opponent.
fn expected_score(rating: i64, opponent: i64) -> f64 {
    1.0 / (1.0 + 10f64.powf((opponent - rating) as f64 / 400.0))
}

/// Compute new ratings for an ordered placement list (best first).
///
/// Each player scores one virtual win against every player placed below and
/// a loss against every player above; the adjustment is averaged over the
/// `n - 1` opponents and floored at the rating floor.
pub fn updated_ratings(
    placements: &[String],
    ratings: &BTreeMap<String, i64>,
) -> BTreeMap<String, i64> {
    let n = placements.len();
    if n < 2 {
        return ratings.clone();
    }
    let mut updated = BTreeMap::new();
    for (i, pid) in placements.iter().enumerate() {
        let rating = ratings[pid];
        let mut expected = 0.0;
        for (j, opponent) in placements.iter().enumerate() {
            if i != j {
                expected += expected_score(rating, ratings[opponent]);
            }
        }
        let actual = (n - 1 - i) as f64;
        let adjustment = K_FACTOR * (actual - expected) / (n - 1) as f64;
        let new_rating = (rating as f64 + adjustment).round() as i64;
        updated.insert(pid.clone(), new_rating.max(RATING_FLOOR));
    }
    updated
}

/// File-backed store for profiles and match records. The mutex serializes
/// every read-modify-write cycle against the two JSON files.
pub struct RatingStore {
    data_dir: PathBuf,
    lock: Mutex<()>,
}

impl RatingStore {
    /// Open (creating the directory if needed).
    pub fn new(data_dir: impl Into<PathBuf>) -> io::Result<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;
        Ok(Self {
            data_dir,
            lock: Mutex::new(()),
        })
    }

    fn rankings_path(&self) -> PathBuf {
        self.data_dir.join("rankings.json")
    }

    fn matches_path(&self) -> PathBuf {
        self.data_dir.join("matches.json")
    }

    fn load_rankings(&self) -> BTreeMap<String, AgentProfile> {
        load_json(&self.rankings_path()).unwrap_or_default()
    }

    fn load_matches(&self) -> Vec<MatchRecord> {
        load_json(&self.matches_path()).unwrap_or_default()
    }

    /// Record a finished match: update Elo, wins/losses, and history, and
    /// append the match record. Returns the stored record.
    pub fn record_match(
        &self,
        placements: &[String],
        winner: Option<&str>,
        turn_count: u32,
        replay_file: Option<String>,
    ) -> io::Result<MatchRecord> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());

        let mut rankings = self.load_rankings();
        for pid in placements {
            rankings
                .entry(pid.clone())
                .or_insert_with(|| AgentProfile::new(pid));
        }

        let ratings: BTreeMap<String, i64> = placements
            .iter()
            .map(|pid| (pid.clone(), rankings[pid].rating))
            .collect();
        let new_ratings = updated_ratings(placements, &ratings);

        let now = Utc::now();
        for pid in placements {
            let Some(profile) = rankings.get_mut(pid) else {
                continue;
            };
            profile.rating = new_ratings[pid];
            profile.peak_rating = profile.peak_rating.max(profile.rating);
            profile.games_played += 1;
            profile.rating_history.push(RatingPoint {
                rating: profile.rating,
                time: now,
            });
            if winner == Some(pid.as_str()) {
                profile.wins += 1;
            } else {
                profile.losses += 1;
            }
        }
        save_json(&self.rankings_path(), &rankings)?;

        let record = MatchRecord {
            match_id: uuid::Uuid::new_v4().simple().to_string()[..8].to_string(),
            players: placements.to_vec(),
            placements: placements.to_vec(),
            winner: winner.map(String::from),
            turn_count,
            date: now,
            replay_file,
        };
        let mut matches = self.load_matches();
        matches.push(record.clone());
        save_json(&self.matches_path(), &matches)?;
        Ok(record)
    }

    /// Profiles sorted by rating, descending.
    pub fn leaderboard(&self, limit: usize) -> Vec<AgentProfile> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut profiles: Vec<_> = self.load_rankings().into_values().collect();
        profiles.sort_by(|a, b| b.rating.cmp(&a.rating).then(a.agent_id.cmp(&b.agent_id)));
        profiles.truncate(limit);
        profiles
    }

    /// Look up one agent's profile.
    pub fn profile(&self, agent_id: &str) -> Option<AgentProfile> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        self.load_rankings().remove(agent_id)
    }

    /// Match history, newest first.
    pub fn matches(&self, limit: usize, offset: usize) -> Vec<MatchRecord> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut matches = self.load_matches();
        matches.reverse();
        matches.into_iter().skip(offset).take(limit).collect()
    }

    /// Look up one match by id.
    pub fn match_by_id(&self, match_id: &str) -> Option<MatchRecord> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        self.load_matches().into_iter().find(|m| m.match_id == match_id)
    }
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Option<T> {
    let text = fs::read_to_string(path).ok()?;
    serde_json::from_str(&text).ok()
}

fn save_json<T: Serialize>(path: &Path, value: &T) -> io::Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    fs::write(path, text)
}
