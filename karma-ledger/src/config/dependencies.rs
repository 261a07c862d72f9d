use crate::config::Settings;
use crate::errors::KarmaLedgerError;
use karma_ledger_pipeline::loader::VoteLoader;
use karma_ledger_pipeline::orchestrator::VoteOrchestrator;
use karma_ledger_pipeline::processor::VoteProcessor;
use karma_ledger_pipeline::query::LedgerQueries;
use karma_ledger_pipeline::resolver::EventResolver;
use karma_ledger_repository::{
    LedgerRepository, SchemaRepository, SchemaStatus, SqliteLedgerRepository,
    SqliteSchemaRepository, SqliteStore, SqliteTotalsRepository, TotalsRepository,
};
use std::sync::Arc;
use tracing::info;

/// `Dependencies` struct holds the components of the karma ledger, all sharing
/// one SQLite store.
///
/// The vote orchestrator needs a chat-protocol client, so it is built on
/// demand with [`Dependencies::orchestrator`].
pub struct Dependencies {
    pub store: SqliteStore,
    pub schema_status: SchemaStatus,
    pub ledger_repository: Arc<dyn LedgerRepository>,
    pub totals_repository: Arc<dyn TotalsRepository>,
    pub queries: LedgerQueries,
    settings: Settings,
}

impl Dependencies {
    /// Creates a new `Dependencies` instance.
    ///
    /// Opens the database named by `settings.database_url` and brings its
    /// schema up to date before any repository is handed out.
    ///
    /// # Returns
    ///
    /// A `Result` which is `Ok(Self)` on successful initialization or a
    /// `KarmaLedgerError` if the store cannot be opened or migrated.
    pub async fn new(settings: &Settings) -> Result<Self, KarmaLedgerError> {
        let store = open_store(&settings.database_url).await?;

        let schema_status = SqliteSchemaRepository::new(store.clone())
            .ensure_schema()
            .await?;
        info!(
            database_url = %settings.database_url,
            schema = ?schema_status,
            "Ledger store ready"
        );

        let ledger_repository: Arc<dyn LedgerRepository> =
            Arc::new(SqliteLedgerRepository::new(store.clone()));
        let totals_repository: Arc<dyn TotalsRepository> =
            Arc::new(SqliteTotalsRepository::new(store.clone()));
        let queries = LedgerQueries::new(
            ledger_repository.clone(),
            totals_repository.clone(),
            settings.policy.show_content,
        );

        Ok(Self {
            store,
            schema_status,
            ledger_repository,
            totals_repository,
            queries,
            settings: settings.clone(),
        })
    }

    /// Builds a vote orchestrator that resolves events through `resolver`.
    pub fn orchestrator(&self, resolver: Arc<dyn EventResolver>) -> VoteOrchestrator {
        VoteOrchestrator::new(
            resolver,
            VoteProcessor::new(self.settings.policy.clone()),
            VoteLoader::new(self.ledger_repository.clone()),
        )
    }
}

async fn open_store(database_url: &str) -> Result<SqliteStore, KarmaLedgerError> {
    let location = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .unwrap_or(database_url);

    let store = if location == ":memory:" {
        SqliteStore::in_memory().await?
    } else {
        SqliteStore::open(location).await?
    };
    Ok(store)
}
