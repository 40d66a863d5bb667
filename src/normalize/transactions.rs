//! Transactions and the assets each one moves

use crate::{
    sleeper::types::{RawDraftPick, RawTransaction},
    storage::{AssetType, MoveDirection, Transaction, TransactionMove},
    LeagueId, PlayerId, RosterId, Season, Week,
};
use std::collections::{BTreeMap, HashSet};
use tracing::warn;

/// Keep the first occurrence of each transaction id.
///
/// Sleeper occasionally repeats a transaction in the feed of a later week;
/// `seen` carries ids across weeks so only the first copy is loaded.
pub fn dedupe_transactions(
    raw: Vec<RawTransaction>,
    seen: &mut HashSet<String>,
    week: Week,
) -> Vec<RawTransaction> {
    raw.into_iter()
        .filter(|tx| {
            let fresh = seen.insert(tx.transaction_id.clone());
            if !fresh {
                warn!(
                    transaction_id = %tx.transaction_id,
                    week = %week,
                    "Duplicate transaction id, keeping first"
                );
            }
            fresh
        })
        .collect()
}

pub fn normalize_transactions(
    raw: &[RawTransaction],
    league_id: &LeagueId,
    season: Season,
    week: Week,
) -> Vec<Transaction> {
    raw.iter()
        .map(|tx| Transaction {
            league_id: league_id.clone(),
            season,
            week,
            transaction_id: tx.transaction_id.clone(),
            kind: tx.kind.clone().unwrap_or_default(),
            status: tx.status.clone(),
            created_ts: tx.created,
            settings_json: tx.settings.as_ref().map(|v| v.to_string()),
            metadata_json: tx.metadata.as_ref().map(|v| v.to_string()),
        })
        .collect()
}

fn player_moves(
    tx: &RawTransaction,
    moves: &BTreeMap<String, Option<u32>>,
    direction: MoveDirection,
    bid_amount: Option<i64>,
) -> Vec<TransactionMove> {
    // In a trade the same player shows up as a drop on one side and an add on the other
    let counterpart = match direction {
        MoveDirection::Add => &tx.drops,
        _ => &tx.adds,
    };

    moves
        .iter()
        .map(|(player_id, roster_id)| {
            let roster_id = roster_id.map(RosterId::new);
            let other = counterpart.get(player_id).copied().flatten().map(RosterId::new);
            let (from_roster_id, to_roster_id) = match direction {
                MoveDirection::Add => (other, roster_id),
                _ => (roster_id, other),
            };
            TransactionMove {
                transaction_id: tx.transaction_id.clone(),
                roster_id,
                player_id: Some(PlayerId::new(player_id.as_str())),
                asset_type: AssetType::Player,
                direction,
                bid_amount,
                from_roster_id,
                to_roster_id,
                pick_season: None,
                pick_round: None,
                pick_original_roster_id: None,
                pick_id: None,
            }
        })
        .collect()
}

fn pick_move(
    transaction_id: &str,
    pick: &RawDraftPick,
    direction: MoveDirection,
    bid_amount: Option<i64>,
) -> TransactionMove {
    let from_roster_id = pick.previous_owner_id.map(RosterId::new);
    let to_roster_id = pick.owner_id.map(RosterId::new);
    TransactionMove {
        transaction_id: transaction_id.to_string(),
        roster_id: match direction {
            MoveDirection::PickOut => from_roster_id,
            _ => to_roster_id,
        },
        player_id: None,
        asset_type: AssetType::Pick,
        direction,
        bid_amount,
        from_roster_id,
        to_roster_id,
        pick_season: pick.season.clone(),
        pick_round: pick.round,
        pick_original_roster_id: pick.roster_id.map(RosterId::new),
        pick_id: pick.draft_pick_id.clone(),
    }
}

/// Flatten each transaction into one row per moved asset.
///
/// Player adds and drops produce one row each. A traded pick produces two
/// rows, `pick_out` from the previous owner's side and `pick_in` from the
/// new owner's, so a roster filter sees both halves of the trade.
pub fn normalize_transaction_moves(raw: &[RawTransaction]) -> Vec<TransactionMove> {
    let mut rows = Vec::new();

    for tx in raw {
        let bid_amount = tx.bid_amount();
        rows.extend(player_moves(tx, &tx.adds, MoveDirection::Add, bid_amount));
        rows.extend(player_moves(tx, &tx.drops, MoveDirection::Drop, bid_amount));

        for pick in tx.draft_picks.iter().flatten() {
            rows.push(pick_move(&tx.transaction_id, pick, MoveDirection::PickOut, bid_amount));
            rows.push(pick_move(&tx.transaction_id, pick, MoveDirection::PickIn, bid_amount));
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sleeper::types::parse_list;
    use serde_json::json;

    fn raw() -> Vec<RawTransaction> {
        parse_list(
            "transaction",
            &json!([
                {
                    "transaction_id": "900",
                    "type": "waiver",
                    "status": "complete",
                    "created": 1730000000000i64,
                    "settings": { "waiver_bid": 17 },
                    "adds": { "4046": 1 },
                    "drops": { "5000": 1 }
                },
                {
                    "transaction_id": 901,
                    "type": "trade",
                    "status": "complete",
                    "adds": { "6000": 2, "7000": 1 },
                    "drops": { "6000": 1, "7000": 2 },
                    "draft_picks": [{
                        "season": "2025",
                        "round": 2,
                        "roster_id": 1,
                        "owner_id": 2,
                        "previous_owner_id": 1
                    }]
                },
                { "transaction_id": "902", "adds": null, "drops": null }
            ]),
        )
        .unwrap()
    }

    #[test]
    fn test_normalize_transactions() {
        let rows =
            normalize_transactions(&raw(), &LeagueId::new("L1"), Season::new(2024), Week::new(5));
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].kind, "waiver");
        assert_eq!(rows[0].created_ts, Some(1730000000000));
        assert_eq!(rows[1].transaction_id, "901");
        assert_eq!(rows[2].kind, "");
        assert!(rows.iter().all(|r| r.week == Week::new(5)));
    }

    #[test]
    fn test_waiver_moves_carry_bid() {
        let moves = normalize_transaction_moves(&raw());
        let waiver: Vec<_> = moves.iter().filter(|m| m.transaction_id == "900").collect();
        assert_eq!(waiver.len(), 2);

        let add = waiver.iter().find(|m| m.direction == MoveDirection::Add).unwrap();
        assert_eq!(add.player_id, Some(PlayerId::new("4046")));
        assert_eq!(add.roster_id, Some(RosterId::new(1)));
        assert_eq!(add.bid_amount, Some(17));
        assert_eq!(add.from_roster_id, None);
    }

    #[test]
    fn test_trade_moves_link_both_sides() {
        let moves = normalize_transaction_moves(&raw());
        let trade: Vec<_> = moves.iter().filter(|m| m.transaction_id == "901").collect();
        // two adds, two drops, one pick producing two rows
        assert_eq!(trade.len(), 6);

        let add = trade
            .iter()
            .find(|m| {
                m.direction == MoveDirection::Add && m.player_id == Some(PlayerId::new("6000"))
            })
            .unwrap();
        assert_eq!(add.from_roster_id, Some(RosterId::new(1)));
        assert_eq!(add.to_roster_id, Some(RosterId::new(2)));
        assert_eq!(add.bid_amount, None);

        let out = trade.iter().find(|m| m.direction == MoveDirection::PickOut).unwrap();
        let inn = trade.iter().find(|m| m.direction == MoveDirection::PickIn).unwrap();
        assert_eq!(out.roster_id, Some(RosterId::new(1)));
        assert_eq!(inn.roster_id, Some(RosterId::new(2)));
        for pick in [out, inn] {
            assert_eq!(pick.asset_type, AssetType::Pick);
            assert_eq!(pick.from_roster_id, Some(RosterId::new(1)));
            assert_eq!(pick.to_roster_id, Some(RosterId::new(2)));
            assert_eq!(pick.pick_season.as_deref(), Some("2025"));
            assert_eq!(pick.pick_round, Some(2));
            assert_eq!(pick.pick_original_roster_id, Some(RosterId::new(1)));
        }
    }

    #[test]
    fn test_dedupe_across_weeks() {
        let mut seen = HashSet::new();
        let first = dedupe_transactions(raw(), &mut seen, Week::new(1));
        let second = dedupe_transactions(raw(), &mut seen, Week::new(2));
        assert_eq!(first.len(), 3);
        assert!(second.is_empty());
    }
}
