use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;

use crate::models::*;

/// Registry operation failures. None of them leaves the store modified.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("element not found: {0}")]
    NotFound(String),

    #[error("element ID already exists: {0}")]
    Conflict(String),

    #[error("no elements processed")]
    NoElementsProcessed,
}

/// ElementStore is the in-memory element registry, keyed by element id.
///
/// Cloning is cheap and every clone shares the same map. Each operation holds the
/// lock for its whole read-modify-write, so operations are atomic with respect to
/// each other; a bulk upsert is applied as one step.
#[derive(Clone, Default)]
pub struct ElementStore {
    elements: Arc<RwLock<HashMap<String, Element>>>,
}

impl ElementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All current elements, in no particular order
    pub async fn list(&self) -> Vec<Element> {
        self.elements.read().await.values().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.elements.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.elements.read().await.is_empty()
    }

    pub async fn get(&self, id: &str) -> Result<Element, StoreError> {
        self.elements
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Insert a new element, returning its resource path
    pub async fn create(&self, element: Element) -> Result<String, StoreError> {
        let mut elements = self.elements.write().await;
        if elements.contains_key(&element.id) {
            return Err(StoreError::Conflict(element.id));
        }
        let path = element.resource_path();
        tracing::debug!("Created {} element {}", element.elem_type(), element.id);
        elements.insert(element.id.clone(), element);
        Ok(path)
    }

    /// Overwrite an existing element in full, returning the previous value
    pub async fn replace(&self, element: Element) -> Result<Element, StoreError> {
        let mut elements = self.elements.write().await;
        match elements.get_mut(&element.id) {
            Some(slot) => {
                tracing::debug!("Replaced element {}", element.id);
                Ok(std::mem::replace(slot, element))
            }
            None => Err(StoreError::NotFound(element.id)),
        }
    }

    /// Remove an element, returning the removed value
    pub async fn delete(&self, id: &str) -> Result<Element, StoreError> {
        let removed = self
            .elements
            .write()
            .await
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        tracing::debug!("Deleted element {}", id);
        Ok(removed)
    }

    /// Remove every element
    pub async fn clear(&self) {
        let mut elements = self.elements.write().await;
        let count = elements.len();
        elements.clear();
        tracing::debug!("Cleared {} elements", count);
    }

    /// Insert or overwrite each element in input order.
    ///
    /// When an id repeats, the last occurrence wins. The result maps every distinct
    /// input id to its resource path, whether it was created or overwritten.
    pub async fn bulk_upsert(
        &self,
        batch: Vec<Element>,
    ) -> Result<BTreeMap<String, String>, StoreError> {
        if batch.is_empty() {
            return Err(StoreError::NoElementsProcessed);
        }

        let mut paths = BTreeMap::new();
        let mut elements = self.elements.write().await;
        let before = elements.len();
        for element in batch {
            paths.insert(element.id.clone(), element.resource_path());
            elements.insert(element.id.clone(), element);
        }
        tracing::debug!(
            "Bulk upsert: {} ids, {} new",
            paths.len(),
            elements.len() - before
        );
        Ok(paths)
    }
}
