//! Weekly standings derived from game results

use crate::{
    storage::{Game, StandingsWeek, StreakType},
    LeagueId, RosterId, Season, Week,
};
use std::collections::BTreeMap;

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Default, Clone)]
struct Tally {
    wins: u32,
    losses: u32,
    ties: u32,
    points_for: f64,
    points_against: f64,
    streak: Option<(StreakType, u32)>,
}

impl Tally {
    fn record(&mut self, scored: f64, allowed: f64, result: Option<StreakType>) {
        self.points_for += scored;
        self.points_against += allowed;
        match result {
            Some(StreakType::W) => self.wins += 1,
            Some(StreakType::L) => self.losses += 1,
            None => self.ties += 1,
        }
        self.streak = match (result, self.streak) {
            (None, _) => None,
            (Some(r), Some((current, len))) if current == r => Some((r, len + 1)),
            (Some(r), _) => Some((r, 1)),
        };
    }
}

/// Standings for every roster after all regular-season games through `week`.
///
/// Rank is dense over `(wins desc, points_for desc)`: rosters share a rank
/// only when both are exactly equal. Rows are ordered by rank, then roster id.
pub fn standings_at(
    games: &[Game],
    rosters: &[RosterId],
    league_id: &LeagueId,
    season: Season,
    week: Week,
) -> Vec<StandingsWeek> {
    let mut tallies: BTreeMap<RosterId, Tally> =
        rosters.iter().map(|r| (*r, Tally::default())).collect();

    let mut played: Vec<&Game> = games
        .iter()
        .filter(|g| !g.is_playoffs && g.week <= week)
        .collect();
    played.sort_by_key(|g| (g.week, g.matchup_id));

    for game in played {
        let (result_a, result_b) = match game.winner_roster_id {
            Some(w) if w == game.roster_id_a => (Some(StreakType::W), Some(StreakType::L)),
            Some(_) => (Some(StreakType::L), Some(StreakType::W)),
            None => (None, None),
        };
        tallies
            .entry(game.roster_id_a)
            .or_default()
            .record(game.points_a, game.points_b, result_a);
        tallies
            .entry(game.roster_id_b)
            .or_default()
            .record(game.points_b, game.points_a, result_b);
    }

    let mut ordered: Vec<(RosterId, Tally)> = tallies.into_iter().collect();
    for (_, tally) in ordered.iter_mut() {
        tally.points_for = round2(tally.points_for);
        tally.points_against = round2(tally.points_against);
    }
    ordered.sort_by(|(ra, a), (rb, b)| {
        b.wins
            .cmp(&a.wins)
            .then(b.points_for.total_cmp(&a.points_for))
            .then(ra.cmp(rb))
    });

    let mut rank = 0u32;
    let mut previous: Option<(u32, f64)> = None;
    ordered
        .into_iter()
        .map(|(roster_id, tally)| {
            if previous != Some((tally.wins, tally.points_for)) {
                rank += 1;
                previous = Some((tally.wins, tally.points_for));
            }
            StandingsWeek {
                league_id: league_id.clone(),
                season,
                week,
                roster_id,
                wins: tally.wins,
                losses: tally.losses,
                ties: tally.ties,
                points_for: tally.points_for,
                points_against: tally.points_against,
                rank: Some(rank),
                streak_type: tally.streak.map(|(t, _)| t),
                streak_len: tally.streak.map(|(_, n)| n),
            }
        })
        .collect()
}

/// Standings rows for every week `1..=through_week`.
///
/// Playoff games never count, so weeks from the playoff start onward repeat
/// the final regular-season table.
pub fn derive_standings(
    games: &[Game],
    rosters: &[RosterId],
    league_id: &LeagueId,
    season: Season,
    through_week: Week,
) -> Vec<StandingsWeek> {
    (1..=through_week.as_u16())
        .flat_map(|w| standings_at(games, rosters, league_id, season, Week::new(w)))
        .collect()
}
