use crate::errors::FilterError;
use crate::filter::{FilterDescriptor, FilterValues, MultiselectFilter};
use crate::types::OptionsPayload;

/// Filters available on a page, addressed by key.
///
/// Registration order is preserved; registering a second filter under an
/// existing key replaces the first in place.
#[derive(Debug, Default)]
pub struct FilterRegistry {
    filters: Vec<MultiselectFilter>,
}

impl FilterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, filter: MultiselectFilter) -> &mut Self {
        match self.filters.iter().position(|existing| existing.key() == filter.key()) {
            Some(index) => {
                log::debug!("replacing filter registered under '{}'", filter.key());
                self.filters[index] = filter;
            }
            None => self.filters.push(filter),
        }
        self
    }

    pub fn with(mut self, filter: MultiselectFilter) -> Self {
        self.register(filter);
        self
    }

    pub fn get(&self, key: &str) -> Result<&MultiselectFilter, FilterError> {
        self.filters
            .iter()
            .find(|filter| filter.key() == key)
            .ok_or_else(|| FilterError::UnknownFilter { key: key.to_string() })
    }

    /// Formatted options for one filter, given the page's other filter values.
    pub fn options_for(
        &self,
        key: &str,
        filter_values: &FilterValues,
    ) -> Result<OptionsPayload, FilterError> {
        Ok(self.get(key)?.formatted_options(filter_values))
    }

    pub fn descriptors(&self) -> Vec<FilterDescriptor> {
        self.filters.iter().map(MultiselectFilter::descriptor).collect()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.filters.iter().map(MultiselectFilter::key)
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::RawOptions;

    #[test]
    fn unknown_keys_are_reported() {
        let registry = FilterRegistry::new();
        match registry.get("missing") {
            Err(FilterError::UnknownFilter { key }) => assert_eq!(key, "missing"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn re_registering_a_key_replaces_in_place() {
        let registry = FilterRegistry::new()
            .with(MultiselectFilter::new("Status", RawOptions::new().label(1, "Old")))
            .with(MultiselectFilter::new("Owner", RawOptions::new()))
            .with(MultiselectFilter::new("Status", RawOptions::new().label(1, "New")));
        assert_eq!(registry.keys().collect::<Vec<_>>(), vec!["status", "owner"]);
        let options = registry.options_for("status", &FilterValues::new()).unwrap();
        assert_eq!(options.iter_options().next().map(|o| o.label.as_str()), Some("New"));
    }

    #[test]
    fn non_latin_names_get_distinct_keys() {
        let registry = FilterRegistry::new()
            .with(MultiselectFilter::new("Статус", RawOptions::new().label(1, "Активен")))
            .with(MultiselectFilter::new("Город", RawOptions::new().label(2, "Москва")));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.keys().collect::<Vec<_>>(), vec!["статус", "город"]);
        let options = registry.options_for("город", &FilterValues::new()).unwrap();
        assert_eq!(options.iter_options().next().map(|o| o.label.as_str()), Some("Москва"));
    }
}
