//! Cached CRUD façade over a [`LinkService`].
//!
//! `list()` is served from a local cache once fetched. Every successful write
//! invalidates it, so the next read reflects the write. Failed writes leave
//! the cache alone. Nothing is merged locally; the service stays the only
//! source of truth.

use tokio::sync::RwLock;

use linkshelf_shared::{
    generate_link_id, validate_id, validate_link, Link, LinkRecord, ValidationError,
};

use crate::error::Result;
use crate::service::LinkService;

#[derive(Default)]
struct ListCache {
    /// Bumped on every invalidation.
    generation: u64,
    links: Option<Vec<LinkRecord>>,
}

pub struct LinkStore<S> {
    service: S,
    cache: RwLock<ListCache>,
}

impl<S: LinkService> LinkStore<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            cache: RwLock::new(ListCache::default()),
        }
    }

    /// The wrapped service, for the calls this façade does not cover
    /// (profiles, roles).
    pub fn service(&self) -> &S {
        &self.service
    }

    /// All links of the caller, from cache when possible.
    pub async fn list(&self) -> Result<Vec<LinkRecord>> {
        let generation = {
            let cache = self.cache.read().await;
            if let Some(links) = &cache.links {
                return Ok(links.clone());
            }
            cache.generation
        };

        let links = self.service.get_all_links().await?;

        let mut cache = self.cache.write().await;
        // a write landed while we were fetching; our copy may predate it
        if cache.generation == generation {
            cache.links = Some(links.clone());
        }
        Ok(links)
    }

    /// Fetch a single link. Not cached.
    pub async fn get(&self, id: &str) -> Result<Link> {
        validate_id(id)?;
        self.service.get_link(id).await
    }

    /// Store `link` under `id` after validating it locally.
    pub async fn add(&self, id: &str, link: &Link) -> Result<()> {
        let link = prepare(id, link)?;
        self.service.add_link(id, &link).await?;
        tracing::debug!(id, "link added");
        self.invalidate().await;
        Ok(())
    }

    /// Store `link` under a freshly generated id and return that id.
    pub async fn create(&self, link: &Link) -> Result<String> {
        let id = generate_link_id();
        self.add(&id, link).await?;
        Ok(id)
    }

    /// Replace the link stored under `id`.
    pub async fn update(&self, id: &str, link: &Link) -> Result<()> {
        let link = prepare(id, link)?;
        self.service.update_link(id, &link).await?;
        tracing::debug!(id, "link updated");
        self.invalidate().await;
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        validate_id(id)?;
        self.service.delete_link(id).await?;
        tracing::debug!(id, "link deleted");
        self.invalidate().await;
        Ok(())
    }

    /// Drop the cached list; the next `list()` goes to the service.
    pub async fn invalidate(&self) {
        let mut cache = self.cache.write().await;
        cache.generation += 1;
        cache.links = None;
    }

    pub async fn is_cached(&self) -> bool {
        self.cache.read().await.links.is_some()
    }
}

fn prepare(id: &str, link: &Link) -> std::result::Result<Link, ValidationError> {
    validate_id(id)?;
    validate_link(link)
}
