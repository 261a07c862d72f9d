mod processor;
mod orchestrator;
mod loader;
mod resolver;
mod query;

pub use processor::ProcessorError;
pub use orchestrator::OrchestratorError;
pub use loader::LoaderError;
pub use resolver::ResolverError;
pub use query::QueryError;
