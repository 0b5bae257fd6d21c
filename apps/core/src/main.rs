// MediAssist Backend Entry Point
// Symptom-triage chatbot: triage, intent routing, knowledge lookup.

mod brain;
mod config;
mod error;
mod models;
mod preflight;
mod rate_limiter;
mod server;
mod session;

#[cfg(test)]
mod tests;

use anyhow::Result;
use brain::{Coordinator, KnowledgeBase, SymptomClassifier, SymptomModel};
use config::AppConfig;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("MediAssist core v{} starting", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::from_env()?;
    preflight::run_preflight_checks(&config);

    // Startup dependencies degrade, never crash: a missing knowledge source
    // means every lookup is absent, a missing model means the symptom
    // classifier stays in a permanent error state.
    let knowledge = match KnowledgeBase::load(
        &config.description_path(),
        &config.precaution_path(),
        config.fuzzy_cutoff,
    ) {
        Ok(base) => base,
        Err(e) => {
            warn!("Knowledge base unavailable, lookups disabled: {}", e);
            KnowledgeBase::empty(config.fuzzy_cutoff)
        }
    };

    let model = match SymptomModel::from_file(&config.model_path) {
        Ok(model) => Some(model),
        Err(e) => {
            warn!("Symptom model unavailable, predictions disabled: {}", e);
            None
        }
    };
    let symptoms = SymptomClassifier::new(model, config.confidence_floor);

    let coordinator = Coordinator::new(knowledge, symptoms);
    let state = server::AppState::new(coordinator, &config);

    server::run(state, &config.bind_addr).await
}
