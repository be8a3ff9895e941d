//! Folds a tournament's raw game list into a leaderboard and a recent results feed.

use {
    std::cmp::Reverse,
    chrono::NaiveDateTime,
    crate::{
        matchplay::{
            Game,
            Id,
            Marker,
            Tournament,
        },
        prelude::*,
    },
};

/// Number of entries kept in [`Dashboard::recent_games`].
pub(crate) const RECENT_GAMES: usize = 20;

const LAST_UPDATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Win,
    Loss,
    Tie,
}

impl Outcome {
    /// Any marker other than an exact `"1.00"` or `"0.00"` string is a tie.
    fn from_marker(marker: &Marker) -> Self {
        match marker.as_str() {
            Some("1.00") => Self::Win,
            Some("0.00") => Self::Loss,
            _ => Self::Tie,
        }
    }

    fn points(self) -> i64 {
        match self {
            Self::Win => 1,
            Self::Loss => -1,
            Self::Tie => 0,
        }
    }
}

#[derive(Debug, Default)]
struct Tally {
    name: String,
    wins: u32,
    losses: u32,
    ties: u32,
    points: i64,
}

impl Tally {
    fn record(&mut self, outcome: Outcome) {
        self.points += outcome.points();
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Loss => self.losses += 1,
            Outcome::Tie => self.ties += 1,
        }
    }

    fn total_games(&self) -> u32 {
        self.wins + self.losses + self.ties
    }
}

/// Per-player tallies in the order the players were first seen.
#[derive(Default)]
struct Tallies {
    index: HashMap<Id, usize>,
    entries: Vec<Tally>,
}

impl Tallies {
    fn entry(&mut self, player: &Id) -> &mut Tally {
        let idx = if let Some(&idx) = self.index.get(player) {
            idx
        } else {
            let idx = self.entries.len();
            self.entries.push(Tally::default());
            self.index.insert(player.clone(), idx);
            idx
        };
        &mut self.entries[idx]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct Standing {
    pub(crate) name: String,
    pub(crate) wins: u32,
    pub(crate) losses: u32,
    pub(crate) ties: u32,
    pub(crate) points: i64,
    pub(crate) total_games: u32,
}

impl From<Tally> for Standing {
    fn from(tally: Tally) -> Self {
        Self {
            total_games: tally.total_games(),
            name: tally.name,
            wins: tally.wins,
            losses: tally.losses,
            ties: tally.ties,
            points: tally.points,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct RecentResult {
    pub(crate) winner: String,
    pub(crate) loser: String,
    pub(crate) machine: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Dashboard {
    /// Sorted by points, then by number of games played, both descending.
    pub(crate) players: Vec<Standing>,
    /// Most recent first.
    pub(crate) recent_games: Vec<RecentResult>,
    pub(crate) last_update: String,
}

fn machine_name(machines: &HashMap<&Id, &str>, arena: Option<&Id>) -> String {
    match arena {
        Some(arena) => machines.get(arena).map_or_else(|| format!("Machine {arena}"), |&name| name.to_owned()),
        None => "Machine None".to_owned(),
    }
}

pub(crate) fn aggregate(games: &[Game], tournament: &Tournament, now: NaiveDateTime) -> Dashboard {
    let machines = tournament.arenas.iter()
        .filter(|arena| arena.is_active())
        .map(|arena| (&arena.arena_id, &*arena.name))
        .collect::<HashMap<_, _>>();
    let mut tallies = Tallies::default();
    for player in &tournament.players {
        tallies.entry(&player.player_id).name.clone_from(&player.name);
    }
    let mut recent_games = Vec::default();
    let mut skipped = 0;
    for game in games {
        let machine = machine_name(&machines, game.arena_id.as_ref());
        let Some(result_points) = game.result_points.as_deref().filter(|points| points.iter().any(Option::is_some)) else {
            skipped += 1;
            continue
        };
        let mut winner = None::<String>;
        let mut loser = None::<String>;
        for (player, marker) in game.player_ids.iter().zip(result_points) {
            let Some(marker) = marker else { continue };
            let outcome = Outcome::from_marker(marker);
            let tally = tallies.entry(player);
            tally.record(outcome);
            match outcome {
                Outcome::Win => { winner.get_or_insert_with(|| tally.name.clone()); }
                Outcome::Loss => { loser.get_or_insert_with(|| tally.name.clone()); }
                Outcome::Tie => {}
            }
        }
        if let (Some(winner), Some(loser)) = (winner, loser) {
            // players missing from the roster have no name to display
            if !winner.is_empty() && !loser.is_empty() {
                recent_games.push(RecentResult { winner, loser, machine });
            }
        }
    }
    recent_games.reverse();
    recent_games.truncate(RECENT_GAMES);
    let mut players = tallies.entries.into_iter()
        .filter(|tally| tally.total_games() > 0)
        .map(Standing::from)
        .collect::<Vec<_>>();
    players.sort_by_key(|standing| (Reverse(standing.points), Reverse(standing.total_games)));
    log::debug!("aggregated {} games ({skipped} unscored) into {} standings", games.len(), players.len());
    Dashboard {
        players,
        recent_games,
        last_update: now.format(LAST_UPDATE_FORMAT).to_string(),
    }
}
