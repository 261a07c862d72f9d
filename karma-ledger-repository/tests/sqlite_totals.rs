//! Integration tests for the SQLite totals cache: rankings, positions and repair.
//!
//! Run with: `cargo test --test sqlite_totals`

use karma_ledger_repository::{
    LedgerRepository, SchemaRepository, SqliteLedgerRepository, SqliteSchemaRepository,
    SqliteStore, SqliteTotalsRepository, TotalsRepository,
};
use karma_ledger_shared::types::{VoteKey, VoteRecord, VoteTotals};

const ROOM: &str = "!room:example.org";

async fn setup() -> (SqliteStore, SqliteLedgerRepository, SqliteTotalsRepository) {
    let store = SqliteStore::in_memory().await.unwrap();
    SqliteSchemaRepository::new(store.clone())
        .ensure_schema()
        .await
        .unwrap();
    (
        store.clone(),
        SqliteLedgerRepository::new(store.clone()),
        SqliteTotalsRepository::new(store),
    )
}

fn make_vote(recipient: &str, voter: &str, subject: &str, value: i64) -> VoteRecord {
    VoteRecord::new(
        VoteKey::new(recipient, voter, ROOM, subject),
        format!("$vote-{voter}-{subject}"),
        value,
        "",
    )
}

/// Gives `recipient` a total of `total` using distinct voters on one message.
async fn give(ledger: &SqliteLedgerRepository, recipient: &str, total: i64) {
    let value = if total < 0 { -1 } else { 1 };
    for index in 0..total.abs() {
        let voter = format!("@voter{index}:example.org");
        ledger
            .insert(&make_vote(recipient, &voter, &format!("$msg-{recipient}"), value))
            .await
            .unwrap();
    }
}

fn recipients(ranking: &[VoteTotals]) -> Vec<&str> {
    ranking.iter().map(|totals| totals.recipient.as_str()).collect()
}

// ============================================================================
// Ranking Tests
// ============================================================================

#[tokio::test]
async fn test_ranked_descending_and_ascending() {
    let (_, ledger, totals) = setup().await;
    give(&ledger, "@alice:example.org", 3).await;
    give(&ledger, "@bob:example.org", -2).await;
    give(&ledger, "@carol:example.org", 1).await;

    let top = totals.ranked_descending(10).await.unwrap();
    assert_eq!(
        recipients(&top),
        vec!["@alice:example.org", "@carol:example.org", "@bob:example.org"]
    );
    assert_eq!(top[0].total, 3);
    assert_eq!(top[0].positive, 3);

    let bottom = totals.ranked_ascending(2).await.unwrap();
    assert_eq!(recipients(&bottom), vec!["@bob:example.org", "@carol:example.org"]);
    assert_eq!(bottom[0].negative, 2);
}

#[tokio::test]
async fn test_ranked_ties_keep_insertion_order() {
    let (_, ledger, totals) = setup().await;
    give(&ledger, "@bob:example.org", 1).await;
    give(&ledger, "@alice:example.org", 1).await;

    let top = totals.ranked_descending(10).await.unwrap();
    assert_eq!(recipients(&top), vec!["@bob:example.org", "@alice:example.org"]);
    let bottom = totals.ranked_ascending(10).await.unwrap();
    assert_eq!(recipients(&bottom), vec!["@bob:example.org", "@alice:example.org"]);
}

#[tokio::test]
async fn test_ranked_empty_and_zero_limit() {
    let (_, ledger, totals) = setup().await;
    assert!(totals.ranked_descending(10).await.unwrap().is_empty());

    give(&ledger, "@alice:example.org", 1).await;
    assert!(totals.ranked_descending(0).await.unwrap().is_empty());
}

// ============================================================================
// Position Tests
// ============================================================================

#[tokio::test]
async fn test_position_from_top() {
    let (_, ledger, totals) = setup().await;
    give(&ledger, "@alice:example.org", 3).await;
    give(&ledger, "@bob:example.org", -2).await;
    give(&ledger, "@carol:example.org", 1).await;

    assert_eq!(totals.position_from_top("@alice:example.org").await.unwrap(), Some(1));
    assert_eq!(totals.position_from_top("@carol:example.org").await.unwrap(), Some(2));
    assert_eq!(totals.position_from_top("@bob:example.org").await.unwrap(), Some(3));
    assert_eq!(totals.position_from_top("@nobody:example.org").await.unwrap(), None);
}

#[tokio::test]
async fn test_position_follows_vote_changes() {
    let (_, ledger, totals) = setup().await;
    // Two recipients, the second author overtakes the first with one extra vote.
    give(&ledger, "@alice:example.org", 1).await;
    give(&ledger, "@bob:example.org", 1).await;
    assert_eq!(totals.position_from_top("@bob:example.org").await.unwrap(), Some(2));

    ledger
        .insert(&make_vote("@bob:example.org", "@extra:example.org", "$other", 1))
        .await
        .unwrap();
    assert_eq!(totals.position_from_top("@bob:example.org").await.unwrap(), Some(1));
}

// ============================================================================
// Recalculate / Divergence Tests
// ============================================================================

#[tokio::test]
async fn test_recalculate_without_votes_or_row() {
    let (_, _, totals) = setup().await;
    assert_eq!(totals.recalculate("@nobody:example.org").await.unwrap(), None);
    assert!(totals.get_totals("@nobody:example.org").await.unwrap().is_none());
}

#[tokio::test]
async fn test_recalculate_matches_ledger_after_mixed_sequence() {
    let (_, ledger, totals) = setup().await;
    let recipient = "@alice:example.org";

    // Deterministic pseudo-random walk over voters and values.
    let mut seed: u64 = 0x2545_f491;
    for step in 0..40 {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let voter = format!("@voter{}:example.org", (seed >> 33) % 6);
        let subject = format!("$m{}", (seed >> 40) % 3);
        let value = if (seed >> 50) % 2 == 0 { 1 } else { -1 };
        let record = VoteRecord::new(
            VoteKey::new(recipient, &voter, ROOM, &subject),
            format!("$step{step}"),
            value,
            "",
        );
        if (seed >> 55) % 5 == 0 {
            if let Some(existing) = ledger.get(&record.key).await.unwrap() {
                ledger.delete_by_origin(&existing.origin).await.unwrap();
                continue;
            }
        }
        ledger.apply_vote(&record).await.unwrap();
    }

    let cached = totals.get_totals(recipient).await.unwrap().unwrap();
    let recalculated = totals.recalculate(recipient).await.unwrap().unwrap();
    assert_eq!(cached, recalculated);

    let values = ledger.all_for(recipient).await.unwrap().into_iter().map(|v| v.value);
    assert_eq!(recalculated, VoteTotals::from_values(recipient, values));
    assert!(totals.find_divergent().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_find_divergent_detects_and_recalculate_repairs() {
    let (store, ledger, totals) = setup().await;
    give(&ledger, "@alice:example.org", 2).await;
    give(&ledger, "@bob:example.org", 1).await;
    assert!(totals.find_divergent().await.unwrap().is_empty());

    sqlx::query("UPDATE vote_totals SET total = 40, positive = 7 WHERE recipient = ?")
        .bind("@alice:example.org")
        .execute(store.pool())
        .await
        .unwrap();
    sqlx::query("DELETE FROM vote_totals WHERE recipient = ?")
        .bind("@bob:example.org")
        .execute(store.pool())
        .await
        .unwrap();
    sqlx::query("INSERT INTO vote_totals (recipient, total, positive, negative) VALUES (?, 5, 5, 0)")
        .bind("@ghost:example.org")
        .execute(store.pool())
        .await
        .unwrap();

    let divergent = totals.find_divergent().await.unwrap();
    assert_eq!(divergent.len(), 3);

    let alice = &divergent[0];
    assert_eq!(alice.recipient, "@alice:example.org");
    assert_eq!(alice.cached.as_ref().map(|t| t.total), Some(40));
    assert_eq!(alice.computed.total, 2);

    let bob = &divergent[1];
    assert_eq!(bob.recipient, "@bob:example.org");
    assert!(bob.cached.is_none());
    assert_eq!(bob.computed.total, 1);

    let ghost = &divergent[2];
    assert_eq!(ghost.recipient, "@ghost:example.org");
    assert_eq!(ghost.computed, VoteTotals::from_values("@ghost:example.org", []));

    for divergence in &divergent {
        totals.recalculate(&divergence.recipient).await.unwrap();
    }
    assert!(totals.find_divergent().await.unwrap().is_empty());
    assert_eq!(
        totals.get_totals("@ghost:example.org").await.unwrap(),
        Some(VoteTotals::from_values("@ghost:example.org", []))
    );
}

// ============================================================================
// Walkthrough
// ============================================================================

#[tokio::test]
async fn test_cast_revote_and_retract_walkthrough() {
    let (_, ledger, totals) = setup().await;
    let author = "@a:example.org";
    let subject = "$m";

    for (voter, value) in [("@b:example.org", 1), ("@c:example.org", 1), ("@d:example.org", -1)] {
        let record = VoteRecord::new(
            VoteKey::new(author, voter, ROOM, subject),
            format!("$from-{voter}"),
            value,
            "hello",
        );
        ledger.apply_vote(&record).await.unwrap();
    }
    let after_votes = totals.get_totals(author).await.unwrap().unwrap();
    assert_eq!((after_votes.total, after_votes.positive, after_votes.negative), (1, 2, 1));
    assert_eq!(totals.position_from_top(author).await.unwrap(), Some(1));

    let revote = VoteRecord::new(
        VoteKey::new(author, "@b:example.org", ROOM, subject),
        "$b-again",
        -1,
        "hello",
    );
    ledger.apply_vote(&revote).await.unwrap();
    let after_revote = totals.get_totals(author).await.unwrap().unwrap();
    assert_eq!((after_revote.total, after_revote.positive, after_revote.negative), (-1, 1, 2));

    ledger.delete_by_origin("$from-@d:example.org").await.unwrap().unwrap();
    let after_retract = totals.get_totals(author).await.unwrap().unwrap();
    assert_eq!((after_retract.total, after_retract.positive, after_retract.negative), (0, 1, 1));
}
