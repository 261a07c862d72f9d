//! SQLite implementation of the per-recipient totals cache.
use crate::errors::LedgerRepositoryError;
use crate::interfaces::TotalsRepository;
use crate::sqlite::SqliteStore;
use crate::sqlite::ledger_repository::fetch_votes_for;
use crate::sqlite::rows::{DivergenceRow, TotalsRow};
use async_trait::async_trait;
use futures::TryStreamExt;
use karma_ledger_shared::types::{Divergence, TallyDelta, VoteTotals};
use sqlx::SqliteConnection;
use tracing::info;

/// What `apply_delta` does when the recipient has no totals row yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaMode {
    /// Start a new row holding exactly the delta. Used by inserts and revotes.
    CreateIfMissing,
    /// Leave the cache untouched. Used by deletions, which must never create a row.
    SkipIfMissing,
}

/// SQLite implementation of the totals cache.
pub struct SqliteTotalsRepository {
    store: SqliteStore,
}

impl SqliteTotalsRepository {
    /// Creates a new totals repository on top of `store`.
    pub fn new(store: SqliteStore) -> Self {
        Self { store }
    }

    /// Adds `delta` to the totals of `recipient`.
    ///
    /// Runs on the caller's connection so it joins the transaction of the
    /// ledger mutation that produced the delta.
    ///
    /// # Arguments
    ///
    /// * `conn` - Connection of the active unit of work
    /// * `recipient` - Recipient whose totals change
    /// * `delta` - Change to apply
    /// * `mode` - Behavior when the recipient has no row yet
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - A row was created or updated
    /// * `Ok(false)` - No row existed and `mode` was `SkipIfMissing`
    pub async fn apply_delta(
        conn: &mut SqliteConnection,
        recipient: &str,
        delta: TallyDelta,
        mode: DeltaMode,
    ) -> Result<bool, LedgerRepositoryError> {
        let result = match mode {
            DeltaMode::CreateIfMissing => {
                sqlx::query(
                    r#"
                    INSERT INTO vote_totals (recipient, total, positive, negative)
                    VALUES (?, ?, ?, ?)
                    ON CONFLICT (recipient)
                    DO UPDATE SET
                        total = total + excluded.total,
                        positive = positive + excluded.positive,
                        negative = negative + excluded.negative
                    "#,
                )
                .bind(recipient)
                .bind(delta.total)
                .bind(delta.positive)
                .bind(delta.negative)
                .execute(&mut *conn)
                .await?
            }
            DeltaMode::SkipIfMissing => {
                sqlx::query(
                    r#"
                    UPDATE vote_totals SET
                        total = total + ?,
                        positive = positive + ?,
                        negative = negative + ?
                    WHERE recipient = ?
                    "#,
                )
                .bind(delta.total)
                .bind(delta.positive)
                .bind(delta.negative)
                .bind(recipient)
                .execute(&mut *conn)
                .await?
            }
        };
        Ok(result.rows_affected() > 0)
    }

    async fn ranked(&self, limit: u32, descending: bool) -> Result<Vec<VoteTotals>, LedgerRepositoryError> {
        let sql = format!(
            r#"
            SELECT recipient, total, positive, negative
            FROM vote_totals
            WHERE recipient != ''
            ORDER BY total {}, rowid ASC
            LIMIT ?
            "#,
            if descending { "DESC" } else { "ASC" }
        );
        let rows = sqlx::query_as::<_, TotalsRow>(&sql)
            .bind(i64::from(limit))
            .fetch_all(self.store.pool())
            .await?;
        Ok(rows.into_iter().map(VoteTotals::from).collect())
    }
}

async fn fetch_totals(
    conn: &mut SqliteConnection,
    recipient: &str,
) -> Result<Option<VoteTotals>, LedgerRepositoryError> {
    let row = sqlx::query_as::<_, TotalsRow>(
        "SELECT recipient, total, positive, negative FROM vote_totals WHERE recipient = ?",
    )
    .bind(recipient)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(row.map(VoteTotals::from))
}

async fn recalculate_totals(
    conn: &mut SqliteConnection,
    recipient: String,
) -> Result<Option<VoteTotals>, LedgerRepositoryError> {
    let votes = fetch_votes_for(conn, &recipient).await?;
    let cached = fetch_totals(conn, &recipient).await?;
    if votes.is_empty() && cached.is_none() {
        return Ok(None);
    }

    let computed = VoteTotals::from_values(recipient, votes.iter().map(|vote| vote.value));
    sqlx::query(
        r#"
        INSERT INTO vote_totals (recipient, total, positive, negative)
        VALUES (?, ?, ?, ?)
        ON CONFLICT (recipient)
        DO UPDATE SET
            total = excluded.total,
            positive = excluded.positive,
            negative = excluded.negative
        "#,
    )
    .bind(&computed.recipient)
    .bind(computed.total)
    .bind(computed.positive)
    .bind(computed.negative)
    .execute(&mut *conn)
    .await?;

    if cached.as_ref() != Some(&computed) {
        info!(
            recipient = %computed.recipient,
            total = computed.total,
            positive = computed.positive,
            negative = computed.negative,
            "Recalculated vote totals"
        );
    }
    Ok(Some(computed))
}

#[async_trait]
impl TotalsRepository for SqliteTotalsRepository {
    async fn get_totals(&self, recipient: &str) -> Result<Option<VoteTotals>, LedgerRepositoryError> {
        let mut conn = self.store.pool().acquire().await?;
        fetch_totals(&mut conn, recipient).await
    }

    async fn ranked_descending(&self, limit: u32) -> Result<Vec<VoteTotals>, LedgerRepositoryError> {
        self.ranked(limit, true).await
    }

    async fn ranked_ascending(&self, limit: u32) -> Result<Vec<VoteTotals>, LedgerRepositoryError> {
        self.ranked(limit, false).await
    }

    /// Walks the descending ranking until `recipient` shows up.
    ///
    /// Linear in the number of distinct recipients.
    async fn position_from_top(&self, recipient: &str) -> Result<Option<u64>, LedgerRepositoryError> {
        let mut recipients = sqlx::query_scalar::<_, String>(
            "SELECT recipient FROM vote_totals WHERE recipient != '' ORDER BY total DESC, rowid ASC",
        )
        .fetch(self.store.pool());

        let mut position = 0u64;
        while let Some(found) = recipients.try_next().await? {
            position += 1;
            if found == recipient {
                return Ok(Some(position));
            }
        }
        Ok(None)
    }

    async fn recalculate(&self, recipient: &str) -> Result<Option<VoteTotals>, LedgerRepositoryError> {
        let recipient = recipient.to_string();
        self.store
            .unit_of_work(move |conn| Box::pin(recalculate_totals(conn, recipient)))
            .await
    }

    async fn find_divergent(&self) -> Result<Vec<Divergence>, LedgerRepositoryError> {
        let rows = sqlx::query_as::<_, DivergenceRow>(
            r#"
            WITH computed AS (
                SELECT recipient,
                       SUM(value) AS total,
                       SUM(value > 0) AS positive,
                       SUM(value < 0) AS negative
                FROM votes
                GROUP BY recipient
            )
            SELECT c.recipient AS recipient,
                   t.total AS cached_total,
                   t.positive AS cached_positive,
                   t.negative AS cached_negative,
                   c.total AS total,
                   c.positive AS positive,
                   c.negative AS negative
            FROM computed c
            LEFT JOIN vote_totals t ON t.recipient = c.recipient
            WHERE t.recipient IS NULL
               OR t.total != c.total
               OR t.positive != c.positive
               OR t.negative != c.negative
            UNION ALL
            SELECT t.recipient, t.total, t.positive, t.negative, 0, 0, 0
            FROM vote_totals t
            WHERE NOT EXISTS (SELECT 1 FROM votes v WHERE v.recipient = t.recipient)
              AND (t.total != 0 OR t.positive != 0 OR t.negative != 0)
            ORDER BY recipient
            "#,
        )
        .fetch_all(self.store.pool())
        .await?;
        Ok(rows.into_iter().map(Divergence::from).collect())
    }
}
