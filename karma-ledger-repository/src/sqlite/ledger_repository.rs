//! SQLite implementation of the vote ledger.
//!
//! Every mutation runs through `SqliteStore::unit_of_work` and adjusts
//! `vote_totals` on the same connection before the transaction commits, so a
//! record change and its totals change are never observed apart.
use crate::errors::LedgerRepositoryError;
use crate::interfaces::LedgerRepository;
use crate::sqlite::rows::{MessageTallyRow, VoteRow};
use crate::sqlite::totals_repository::{DeltaMode, SqliteTotalsRepository};
use crate::sqlite::{SqliteStore, now_millis};
use async_trait::async_trait;
use karma_ledger_shared::types::{
    ApplyOutcome, MessageTally, TallyDelta, UpdateOutcome, VoteKey, VoteRecord,
};
use sqlx::SqliteConnection;
use tracing::debug;

const SELECT_VOTE: &str =
    "SELECT recipient, voter, scope, subject, origin, voted_at, value, content FROM votes";

/// SQLite implementation of the vote ledger.
pub struct SqliteLedgerRepository {
    store: SqliteStore,
}

impl SqliteLedgerRepository {
    /// Creates a new ledger repository on top of `store`.
    ///
    /// The schema must already be in place, see `SqliteSchemaRepository::ensure_schema`.
    pub fn new(store: SqliteStore) -> Self {
        Self { store }
    }

    async fn message_tallies(
        &self,
        limit: u32,
        descending: bool,
    ) -> Result<Vec<MessageTally>, LedgerRepositoryError> {
        let sql = format!(
            r#"
            SELECT scope, subject, recipient AS author,
                   SUM(value) AS total,
                   SUM(value > 0) AS positive,
                   SUM(value < 0) AS negative,
                   MAX(content) AS content
            FROM votes
            WHERE recipient != ''
            GROUP BY scope, subject, recipient
            ORDER BY total {}, MIN(rowid) ASC
            LIMIT ?
            "#,
            if descending { "DESC" } else { "ASC" }
        );

        let rows = sqlx::query_as::<_, MessageTallyRow>(&sql)
            .bind(i64::from(limit))
            .fetch_all(self.store.pool())
            .await?;
        Ok(rows.into_iter().map(MessageTally::from).collect())
    }
}

fn validate(record: &VoteRecord) -> Result<(), LedgerRepositoryError> {
    let key = &record.key;
    for (field, value) in [
        ("voter", &key.voter),
        ("scope", &key.scope),
        ("subject", &key.subject),
        ("origin", &record.origin),
    ] {
        if value.is_empty() {
            return Err(LedgerRepositoryError::InvalidRecord(format!(
                "{field} must not be empty"
            )));
        }
    }
    check_value(record.value)
}

/// Votes count one either way; anything else would let the totals overflow.
fn check_value(value: i64) -> Result<(), LedgerRepositoryError> {
    if value == 1 || value == -1 {
        return Ok(());
    }
    Err(LedgerRepositoryError::InvalidRecord(format!(
        "value must be 1 or -1, got {value}"
    )))
}

pub(crate) async fn fetch_vote(
    conn: &mut SqliteConnection,
    key: &VoteKey,
) -> Result<Option<VoteRecord>, LedgerRepositoryError> {
    let row = sqlx::query_as::<_, VoteRow>(&format!(
        "{SELECT_VOTE} WHERE recipient = ? AND voter = ? AND scope = ? AND subject = ?"
    ))
    .bind(&key.recipient)
    .bind(&key.voter)
    .bind(&key.scope)
    .bind(&key.subject)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(row.map(VoteRecord::from))
}

pub(crate) async fn fetch_votes_for(
    conn: &mut SqliteConnection,
    recipient: &str,
) -> Result<Vec<VoteRecord>, LedgerRepositoryError> {
    let rows = sqlx::query_as::<_, VoteRow>(&format!(
        "{SELECT_VOTE} WHERE recipient = ? ORDER BY voted_at ASC, rowid ASC"
    ))
    .bind(recipient)
    .fetch_all(&mut *conn)
    .await?;
    Ok(rows.into_iter().map(VoteRecord::from).collect())
}

async fn insert_vote(
    conn: &mut SqliteConnection,
    record: VoteRecord,
) -> Result<VoteRecord, LedgerRepositoryError> {
    validate(&record)?;
    let record = VoteRecord {
        timestamp: now_millis(),
        ..record
    };

    sqlx::query(
        r#"
        INSERT INTO votes (recipient, voter, scope, subject, origin, voted_at, value, content)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&record.key.recipient)
    .bind(&record.key.voter)
    .bind(&record.key.scope)
    .bind(&record.key.subject)
    .bind(&record.origin)
    .bind(record.timestamp)
    .bind(record.value)
    .bind(&record.content)
    .execute(&mut *conn)
    .await?;

    SqliteTotalsRepository::apply_delta(
        conn,
        record.recipient(),
        record.contribution(),
        DeltaMode::CreateIfMissing,
    )
    .await?;

    debug!(
        recipient = %record.key.recipient,
        voter = %record.key.voter,
        subject = %record.key.subject,
        value = record.value,
        "Inserted vote"
    );
    Ok(record)
}

async fn update_vote(
    conn: &mut SqliteConnection,
    key: VoteKey,
    new_value: i64,
) -> Result<UpdateOutcome, LedgerRepositoryError> {
    check_value(new_value)?;
    let Some(stored) = fetch_vote(conn, &key).await? else {
        return Ok(UpdateOutcome::Missing);
    };
    if stored.value == new_value {
        return Ok(UpdateOutcome::Duplicate);
    }

    // The origin stays the event that first cast the vote.
    let updated = VoteRecord {
        timestamp: now_millis(),
        value: new_value,
        ..stored
    };

    sqlx::query(
        r#"
        UPDATE votes SET voted_at = ?, value = ?
        WHERE recipient = ? AND voter = ? AND scope = ? AND subject = ?
        "#,
    )
    .bind(updated.timestamp)
    .bind(updated.value)
    .bind(&updated.key.recipient)
    .bind(&updated.key.voter)
    .bind(&updated.key.scope)
    .bind(&updated.key.subject)
    .execute(&mut *conn)
    .await?;

    SqliteTotalsRepository::apply_delta(
        conn,
        updated.recipient(),
        TallyDelta::between(Some(stored.value), Some(new_value)),
        DeltaMode::CreateIfMissing,
    )
    .await?;

    debug!(
        recipient = %updated.key.recipient,
        voter = %updated.key.voter,
        subject = %updated.key.subject,
        previous_value = stored.value,
        value = new_value,
        "Updated vote"
    );
    Ok(UpdateOutcome::Updated {
        record: updated,
        previous_value: stored.value,
    })
}

async fn delete_vote_by_origin(
    conn: &mut SqliteConnection,
    origin: String,
) -> Result<Option<VoteRecord>, LedgerRepositoryError> {
    let row = sqlx::query_as::<_, VoteRow>(&format!(
        "{SELECT_VOTE} WHERE origin = ? ORDER BY rowid ASC LIMIT 1"
    ))
    .bind(&origin)
    .fetch_optional(&mut *conn)
    .await?;
    let Some(record) = row.map(VoteRecord::from) else {
        return Ok(None);
    };

    sqlx::query(
        "DELETE FROM votes WHERE recipient = ? AND voter = ? AND scope = ? AND subject = ?",
    )
    .bind(&record.key.recipient)
    .bind(&record.key.voter)
    .bind(&record.key.scope)
    .bind(&record.key.subject)
    .execute(&mut *conn)
    .await?;

    SqliteTotalsRepository::apply_delta(
        conn,
        record.recipient(),
        -record.contribution(),
        DeltaMode::SkipIfMissing,
    )
    .await?;

    debug!(
        recipient = %record.key.recipient,
        origin = %record.origin,
        value = record.value,
        "Deleted vote"
    );
    Ok(Some(record))
}

async fn apply_vote_record(
    conn: &mut SqliteConnection,
    record: VoteRecord,
) -> Result<ApplyOutcome, LedgerRepositoryError> {
    let Some(stored) = fetch_vote(conn, &record.key).await? else {
        let inserted = insert_vote(conn, record).await?;
        return Ok(ApplyOutcome::Inserted(inserted));
    };
    if stored.value == record.value {
        return Ok(ApplyOutcome::Duplicate(stored));
    }

    let new_value = record.value;
    match update_vote(conn, record.key, new_value).await? {
        UpdateOutcome::Updated {
            record,
            previous_value,
        } => Ok(ApplyOutcome::Updated {
            record,
            previous_value,
        }),
        // Both cases were ruled out above on the same connection.
        UpdateOutcome::Duplicate | UpdateOutcome::Missing => Ok(ApplyOutcome::Duplicate(stored)),
    }
}

#[async_trait]
impl LedgerRepository for SqliteLedgerRepository {
    async fn get(&self, key: &VoteKey) -> Result<Option<VoteRecord>, LedgerRepositoryError> {
        let mut conn = self.store.pool().acquire().await?;
        fetch_vote(&mut conn, key).await
    }

    async fn get_by_origin(&self, origin: &str) -> Result<Option<VoteRecord>, LedgerRepositoryError> {
        let row = sqlx::query_as::<_, VoteRow>(&format!(
            "{SELECT_VOTE} WHERE origin = ? ORDER BY rowid ASC LIMIT 1"
        ))
        .bind(origin)
        .fetch_optional(self.store.pool())
        .await?;
        Ok(row.map(VoteRecord::from))
    }

    async fn all_for(&self, recipient: &str) -> Result<Vec<VoteRecord>, LedgerRepositoryError> {
        let mut conn = self.store.pool().acquire().await?;
        fetch_votes_for(&mut conn, recipient).await
    }

    async fn is_vote_subject(&self, event_id: &str) -> Result<bool, LedgerRepositoryError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM votes WHERE origin = ?)")
            .bind(event_id)
            .fetch_one(self.store.pool())
            .await?;
        Ok(exists)
    }

    async fn insert(&self, record: &VoteRecord) -> Result<VoteRecord, LedgerRepositoryError> {
        let record = record.clone();
        self.store
            .unit_of_work(move |conn| Box::pin(insert_vote(conn, record)))
            .await
    }

    async fn update_value(
        &self,
        record: &VoteRecord,
        new_value: i64,
    ) -> Result<UpdateOutcome, LedgerRepositoryError> {
        let key = record.key.clone();
        self.store
            .unit_of_work(move |conn| Box::pin(update_vote(conn, key, new_value)))
            .await
    }

    async fn delete_by_origin(
        &self,
        origin: &str,
    ) -> Result<Option<VoteRecord>, LedgerRepositoryError> {
        let origin = origin.to_string();
        self.store
            .unit_of_work(move |conn| Box::pin(delete_vote_by_origin(conn, origin)))
            .await
    }

    async fn apply_vote(&self, record: &VoteRecord) -> Result<ApplyOutcome, LedgerRepositoryError> {
        let record = record.clone();
        self.store
            .unit_of_work(move |conn| Box::pin(apply_vote_record(conn, record)))
            .await
    }

    async fn best_messages(&self, limit: u32) -> Result<Vec<MessageTally>, LedgerRepositoryError> {
        self.message_tallies(limit, true).await
    }

    async fn worst_messages(&self, limit: u32) -> Result<Vec<MessageTally>, LedgerRepositoryError> {
        self.message_tallies(limit, false).await
    }
}
