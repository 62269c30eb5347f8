pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod server;
pub mod utils;

pub use api::*;
pub use config::*;
pub use error::*;
pub use models::*;
pub use server::*;
pub use utils::*;

use std::path::Path;
use std::sync::Arc;

use api::explain_api::ExplanationService;
use config::AppConfig;
use error::{AnalyzeError, AnalyzeResult};
use models::EnrichedProp;
use utils::data::load_props;
use utils::enrich::enrich_props;

/// Everything the query endpoints read, captured once at startup
#[derive(Clone)]
pub struct AppState {
    /// Enriched dataset, or the load/enrich failure kept around so every
    /// request can report the same error.
    pub snapshot: Arc<Result<Vec<EnrichedProp>, AnalyzeError>>,
    pub explainer: Arc<ExplanationService>,
}

impl AppState {
    /// Load the dataset and set up the explanation capability. A failed
    /// load does not abort startup; the error is held in the snapshot.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            snapshot: Arc::new(load_enriched_props(&config.props_path())),
            explainer: Arc::new(ExplanationService::from_config(config)),
        }
    }
}

/// Load the props CSV and compute the derived metrics for every row
pub fn load_enriched_props(path: &Path) -> AnalyzeResult<Vec<EnrichedProp>> {
    let props = load_props(path)?;
    enrich_props(&props)
}
