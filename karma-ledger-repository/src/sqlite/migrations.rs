/// Schema generation written by this build.
pub const CURRENT_SCHEMA_VERSION: i64 = 2;

/// One schema step. Statements run in order inside a single transaction,
/// together with the marker update.
pub(crate) struct Migration {
    pub version: i64,
    pub description: &'static str,
    pub statements: &'static [&'static str],
}

/// Generation 1 matches databases written before the version marker was
/// stamped, hence `IF NOT EXISTS` everywhere.
pub(crate) const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "create votes, vote_totals and schema_version",
        statements: &[
            r#"
            CREATE TABLE IF NOT EXISTS votes (
                recipient TEXT NOT NULL,
                voter TEXT NOT NULL,
                scope TEXT NOT NULL,
                subject TEXT NOT NULL,
                origin TEXT NOT NULL,
                voted_at INTEGER NOT NULL,
                value INTEGER NOT NULL,
                content TEXT NOT NULL DEFAULT '',
                PRIMARY KEY (recipient, voter, scope, subject)
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS vote_totals (
                recipient TEXT NOT NULL PRIMARY KEY,
                total INTEGER NOT NULL
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER NOT NULL PRIMARY KEY
            )
            "#,
        ],
    },
    Migration {
        version: 2,
        description: "track positive and negative counts, index vote origins",
        statements: &[
            "ALTER TABLE vote_totals ADD COLUMN positive INTEGER NOT NULL DEFAULT 0",
            "ALTER TABLE vote_totals ADD COLUMN negative INTEGER NOT NULL DEFAULT 0",
            r#"
            UPDATE vote_totals SET
                positive = (SELECT COUNT(*) FROM votes
                            WHERE votes.recipient = vote_totals.recipient AND votes.value > 0),
                negative = (SELECT COUNT(*) FROM votes
                            WHERE votes.recipient = vote_totals.recipient AND votes.value < 0)
            "#,
            "CREATE INDEX IF NOT EXISTS idx_votes_origin ON votes (origin)",
        ],
    },
];
