use anyhow::{bail, Context, Result};
use graph_search::GraphSearchClient;
use sp_search::SharePointClient;
use std::sync::Arc;
use typeahead::{MergedFetcher, StaticAugmentedFetcher, StaticSuggestionProvider, SuggestionFetcher};

use crate::config::AppConfig;

/// Assemble the fetcher the controller queries: enabled live sources merged in
/// order, with static suggestions in front when configured.
pub fn build_fetcher(config: &AppConfig) -> Result<Arc<dyn SuggestionFetcher>> {
    let mut sources: Vec<Arc<dyn SuggestionFetcher>> = Vec::new();

    if config.sharepoint.enabled {
        if config.site_url.trim().is_empty() {
            bail!(
                "site_url is not set. Add it to the config file or set SP_TYPEAHEAD_SITE_URL"
            );
        }
        let mut client = SharePointClient::new(&config.site_url)
            .context("Invalid SharePoint site_url")?
            .with_select_properties(config.sharepoint.select_properties.clone())
            .surfacing_errors(config.sharepoint.surface_errors);
        if let Some(token) = config.access_token() {
            client = client.with_access_token(token);
        }
        sources.push(Arc::new(client));
    }

    if config.graph.enabled {
        let mut client = GraphSearchClient::new(&config.graph.base_url)
            .context("Invalid Graph base_url")?
            .with_entity_types(config.graph.entity_types.clone())
            .surfacing_errors(config.graph.surface_errors);
        if let Some(token) = config.access_token() {
            client = client.with_access_token(token);
        }
        sources.push(Arc::new(client));
    }

    if sources.is_empty() {
        tracing::info!("No suggestion source enabled, live suggestions are off");
    }
    let merged = MergedFetcher::new(sources);

    if config.typeahead.static_suggestions.trim().is_empty() {
        return Ok(Arc::new(merged));
    }
    let provider = StaticSuggestionProvider::new(
        &config.typeahead.static_suggestions,
        &config.typeahead.zero_term_suggestions,
    );
    Ok(Arc::new(StaticAugmentedFetcher::new(provider, merged)))
}
