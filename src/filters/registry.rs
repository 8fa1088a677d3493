//! Filter registry for managing available filter types.

use crate::core::error::{ImagingError, ImagingResult};
use crate::core::filter::{Category, Filter, FilterMetadata};
use crate::core::params::FilterParams;
use crate::core::types::FilterSpec;
use indexmap::IndexMap;
use std::sync::Arc;

/// Factory function for creating configured filter instances.
pub type FilterFactory =
    Arc<dyn Fn(&FilterParams) -> ImagingResult<Box<dyn Filter>> + Send + Sync>;

/// Registry entry containing metadata and factory.
#[derive(Clone)]
pub struct RegistryEntry {
    /// Factory function to create instances.
    pub factory: FilterFactory,
    /// Cached metadata (avoids creating instance just to get metadata).
    pub metadata: FilterMetadata,
}

/// Registry for all available filter types.
///
/// Filters are kept in registration order. A filter is requested by id with
/// a [`FilterSpec`]; missing parameters take the defaults published in its
/// metadata.
pub struct FilterRegistry {
    /// Filters indexed by their unique ID.
    filters: IndexMap<String, RegistryEntry>,
    /// Filters grouped by category.
    categories: IndexMap<Category, Vec<String>>,
}

impl FilterRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            filters: IndexMap::new(),
            categories: IndexMap::new(),
        }
    }

    /// Create a registry pre-populated with built-in filters.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::filters::builtin::register_all(&mut registry);
        log::debug!("registered {} built-in filters", registry.len());
        registry
    }

    /// Register a filter type.
    ///
    /// Metadata is taken from `T::default()`. The factory receives the
    /// resolved parameters and performs the filter's own validation.
    pub fn register<T, F>(&mut self, factory: F)
    where
        T: Filter + Default + 'static,
        F: Fn(&FilterParams) -> ImagingResult<T> + Send + Sync + 'static,
    {
        let metadata = T::default().metadata();
        let id = metadata.id.clone();
        let category = metadata.category;

        let entry = RegistryEntry {
            factory: Arc::new(move |params: &FilterParams| {
                factory(params).map(|filter| Box::new(filter) as Box<dyn Filter>)
            }),
            metadata,
        };

        if self.filters.insert(id.clone(), entry).is_none() {
            self.categories.entry(category).or_default().push(id);
        } else {
            log::warn!("filter '{}' registered twice; keeping the latest", id);
        }
    }

    /// Create a filter with its default parameters.
    pub fn create(&self, id: &str) -> ImagingResult<Box<dyn Filter>> {
        self.build(&FilterSpec::new(id))
    }

    /// Create a filter from a request.
    pub fn build(&self, spec: &FilterSpec) -> ImagingResult<Box<dyn Filter>> {
        let entry = self
            .filters
            .get(&spec.filter)
            .ok_or_else(|| ImagingError::UnknownFilter(spec.filter.clone()))?;

        FilterParams::resolve(&entry.metadata.parameters, &spec.params)
            .and_then(|params| (entry.factory)(&params))
            .map_err(|e| {
                log::warn!("rejected '{}' request: {}", spec.filter, e);
                e
            })
    }

    /// Decode a JSON request and create the filter.
    pub fn build_from_json(&self, json: &str) -> ImagingResult<Box<dyn Filter>> {
        self.build(&FilterSpec::from_json(json)?)
    }

    /// Get metadata for a filter without creating an instance.
    pub fn get_metadata(&self, id: &str) -> Option<&FilterMetadata> {
        self.filters.get(id).map(|e| &e.metadata)
    }

    /// Check if a filter is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.filters.contains_key(id)
    }

    /// Get all registered filter IDs.
    pub fn filter_ids(&self) -> impl Iterator<Item = &str> {
        self.filters.keys().map(|s| s.as_str())
    }

    /// Get filters by category.
    pub fn filters_by_category(&self, category: &Category) -> Vec<&str> {
        self.categories
            .get(category)
            .map(|ids| ids.iter().map(|s| s.as_str()).collect())
            .unwrap_or_default()
    }

    /// Get all categories.
    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.categories.keys()
    }

    /// Search filters by id, name, description or tag.
    pub fn search(&self, query: &str) -> Vec<&str> {
        let query = query.to_lowercase();

        self.filters
            .iter()
            .filter(|(_, entry)| {
                let meta = &entry.metadata;
                meta.id.to_lowercase().contains(&query)
                    || meta.name.to_lowercase().contains(&query)
                    || meta.description.to_lowercase().contains(&query)
                    || meta.tags.iter().any(|t| t.to_lowercase().contains(&query))
            })
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Unregister a filter.
    pub fn unregister(&mut self, id: &str) -> bool {
        if let Some(entry) = self.filters.shift_remove(id) {
            if let Some(ids) = self.categories.get_mut(&entry.metadata.category) {
                ids.retain(|i| i != id);
            }
            true
        } else {
            false
        }
    }

    /// Get the total number of registered filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Get filters grouped by category, each group sorted by name.
    pub fn grouped_by_category(&self) -> IndexMap<Category, Vec<&FilterMetadata>> {
        let mut grouped: IndexMap<Category, Vec<&FilterMetadata>> = IndexMap::new();

        for entry in self.filters.values() {
            grouped
                .entry(entry.metadata.category)
                .or_default()
                .push(&entry.metadata);
        }

        for filters in grouped.values_mut() {
            filters.sort_by(|a, b| a.name.cmp(&b.name));
        }

        grouped
    }

    /// Metadata of every filter, in registration order, as pretty JSON.
    pub fn catalog_json(&self) -> ImagingResult<String> {
        let catalog: Vec<&FilterMetadata> = self.filters.values().map(|e| &e.metadata).collect();
        Ok(serde_json::to_string_pretty(&catalog)?)
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
