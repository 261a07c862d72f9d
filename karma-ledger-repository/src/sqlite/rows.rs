use karma_ledger_shared::types::{Divergence, MessageTally, VoteKey, VoteRecord, VoteTotals};

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct VoteRow {
    pub recipient: String,
    pub voter: String,
    pub scope: String,
    pub subject: String,
    pub origin: String,
    pub voted_at: i64,
    pub value: i64,
    pub content: String,
}

impl From<VoteRow> for VoteRecord {
    fn from(row: VoteRow) -> Self {
        VoteRecord {
            key: VoteKey {
                recipient: row.recipient,
                voter: row.voter,
                scope: row.scope,
                subject: row.subject,
            },
            origin: row.origin,
            timestamp: row.voted_at,
            value: row.value,
            content: row.content,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct TotalsRow {
    pub recipient: String,
    pub total: i64,
    pub positive: i64,
    pub negative: i64,
}

impl From<TotalsRow> for VoteTotals {
    fn from(row: TotalsRow) -> Self {
        VoteTotals {
            recipient: row.recipient,
            total: row.total,
            positive: row.positive,
            negative: row.negative,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct MessageTallyRow {
    pub scope: String,
    pub subject: String,
    pub author: String,
    pub total: i64,
    pub positive: i64,
    pub negative: i64,
    pub content: String,
}

impl From<MessageTallyRow> for MessageTally {
    fn from(row: MessageTallyRow) -> Self {
        MessageTally {
            scope: row.scope,
            subject: row.subject,
            author: row.author,
            total: row.total,
            positive: row.positive,
            negative: row.negative,
            content: row.content,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct DivergenceRow {
    pub recipient: String,
    pub cached_total: Option<i64>,
    pub cached_positive: Option<i64>,
    pub cached_negative: Option<i64>,
    pub total: i64,
    pub positive: i64,
    pub negative: i64,
}

impl From<DivergenceRow> for Divergence {
    fn from(row: DivergenceRow) -> Self {
        let cached = match (row.cached_total, row.cached_positive, row.cached_negative) {
            (Some(total), Some(positive), Some(negative)) => Some(VoteTotals {
                recipient: row.recipient.clone(),
                total,
                positive,
                negative,
            }),
            _ => None,
        };
        Divergence {
            computed: VoteTotals {
                recipient: row.recipient.clone(),
                total: row.total,
                positive: row.positive,
                negative: row.negative,
            },
            recipient: row.recipient,
            cached,
        }
    }
}
