//! Mounting the archive page: load the catalog, then start browsing.

use std::sync::Arc;

use archive_core::{AccessGateway, Catalog, CatalogError, CatalogSource, CategoryTag};
use thiserror::Error;

use crate::browse::BrowseState;
use crate::viewer::ViewerWidget;

/// The catalog listing could not be loaded. The page shows an error state
/// instead of an index.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("archive catalog '{category}' could not be loaded: {source}")]
pub struct CatalogLoadError {
    pub category: CategoryTag,
    #[source]
    pub source: CatalogError,
}

async fn load<S: CatalogSource>(
    source: &S,
    category: &CategoryTag,
) -> Result<Catalog, CatalogLoadError> {
    match source.list_documents(category).await {
        Ok(documents) => {
            tracing::info!(%category, documents = documents.len(), "catalog loaded");
            Ok(Catalog::new(documents))
        }
        Err(source) => {
            tracing::error!(%category, error = %source, "catalog load failed");
            Err(CatalogLoadError {
                category: category.clone(),
                source,
            })
        }
    }
}

/// Entry points of the archive page.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchivePage;

impl ArchivePage {
    /// Fetch the `category` listing once and build the initial browse state.
    pub async fn mount<S, G, V>(
        source: &S,
        category: &CategoryTag,
        viewer: V,
        gateway: Arc<G>,
    ) -> Result<BrowseState<G, V>, CatalogLoadError>
    where
        S: CatalogSource,
        G: AccessGateway,
        V: ViewerWidget,
    {
        let catalog = load(source, category).await?;
        let state = BrowseState::new(catalog, gateway, viewer);
        if state.index().skipped() > 0 {
            tracing::debug!(
                %category,
                skipped = state.index().skipped(),
                "documents without a usable date left out of the index"
            );
        }
        Ok(state)
    }

    /// Re-fetch the listing and swap it into `state`. On failure the current
    /// catalog stays in place.
    pub async fn refresh<S, G, V>(
        state: &mut BrowseState<G, V>,
        source: &S,
        category: &CategoryTag,
    ) -> Result<(), CatalogLoadError>
    where
        S: CatalogSource,
        G: AccessGateway,
        V: ViewerWidget,
    {
        let catalog = load(source, category).await?;
        state.replace_catalog(catalog);
        Ok(())
    }
}
