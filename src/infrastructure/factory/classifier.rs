//! Title classifier factory.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use super::llm::build_llm_client;
use crate::adapter::outbound::classifier::{CachedClassifier, LlmClassifier, PatternClassifier};
use crate::adapter::outbound::sqlite::database::connection;
use crate::adapter::outbound::sqlite::SqliteClassificationCache;
use crate::domain::AssetRegistry;
use crate::error::Result;
use crate::infrastructure::config::collection::Strategy;
use crate::infrastructure::config::llm::LlmConfig;
use crate::port::outbound::classifier::TitleClassifier;

/// Build the classifier for `strategy`.
///
/// The `llm` strategy opens (and migrates) the SQLite cache at `database`;
/// the `pattern` strategy touches neither the network nor the disk.
///
/// # Errors
///
/// Returns an error if a pattern fails to compile, the LLM API key is
/// missing, or the cache database cannot be opened.
pub fn build_classifier(
    strategy: Strategy,
    registry: &Arc<AssetRegistry>,
    llm: &LlmConfig,
    database: &Path,
) -> Result<Arc<dyn TitleClassifier>> {
    let classifier: Arc<dyn TitleClassifier> = match strategy {
        Strategy::Pattern => Arc::new(PatternClassifier::new(registry)?),
        Strategy::Llm => {
            let client = build_llm_client(llm)?;
            let pool = connection::open(database)?;
            let inner = Arc::new(LlmClassifier::new(client, Arc::clone(registry)));
            Arc::new(CachedClassifier::new(
                inner,
                Arc::new(SqliteClassificationCache::new(pool)),
            ))
        }
    };
    info!(classifier = classifier.name(), "Classifier initialized");
    Ok(classifier)
}
