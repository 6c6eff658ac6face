use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use storage::ResultCache;
use tracing::info;

use crate::{
    api::AnalysisClient,
    config::{Deployment, Settings},
    demo::DemoAnalyzer,
    source::{ClauseSource, DocumentSubmitter, ResultSource},
};

/// The strategy set for one deployment. Screens receive these trait objects
/// and never learn which deployment is active.
#[derive(Clone)]
pub struct AnalysisServices {
    pub deployment: Deployment,
    pub submitter: Arc<dyn DocumentSubmitter>,
    pub results: Arc<dyn ResultSource>,
    pub clauses: Arc<dyn ClauseSource>,
}

impl AnalysisServices {
    pub fn remote(client: AnalysisClient) -> Self {
        let client = Arc::new(client);
        Self {
            deployment: Deployment::Remote,
            submitter: client.clone(),
            results: client.clone(),
            clauses: client,
        }
    }

    pub fn local(cache: ResultCache, demo_delay: Duration) -> Self {
        let cache = Arc::new(cache);
        Self {
            deployment: Deployment::Local,
            submitter: Arc::new(DemoAnalyzer::new((*cache).clone(), demo_delay)),
            results: cache.clone(),
            clauses: cache,
        }
    }

    pub async fn from_settings(settings: &Settings) -> Result<Self> {
        info!(deployment = %settings.deployment, "services: wiring analysis strategy");
        match settings.deployment {
            Deployment::Remote => {
                let client = AnalysisClient::new(&settings.api_base_url, settings.request_timeout)
                    .context("failed to configure analysis api client")?;
                Ok(Self::remote(client))
            }
            Deployment::Local => {
                let cache = ResultCache::new(&settings.cache_database_url)
                    .await
                    .context("failed to open local result cache")?;
                Ok(Self::local(cache, settings.demo_delay))
            }
        }
    }
}
