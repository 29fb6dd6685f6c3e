//! Static, bidirectional mapping between series names and provider ids.

use std::collections::HashMap;

use crate::{SeriesId, SeriesName, ValidationError};

/// Default central-bank series served by `/tipo-cambio`.
pub const DEFAULT_SERIES: [(&str, &str); 9] = [
    ("USD_FIX", "SF43718"),
    ("USD_APER_COMPRA", "SF43787"),
    ("USD_APER_VENTA", "SF43784"),
    ("USD_LIQ", "SF60653"),
    ("UDI", "SP68257"),
    ("EUR", "SF46410"),
    ("GBP", "SF46407"),
    ("JPY", "SF46406"),
    ("CNY", "SF290383"),
];

/// One-to-one catalog of series names and ids. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesCatalog {
    entries: Vec<(SeriesName, SeriesId)>,
    by_id: HashMap<SeriesId, SeriesName>,
    by_name: HashMap<SeriesName, SeriesId>,
}

impl SeriesCatalog {
    pub fn new(entries: Vec<(SeriesName, SeriesId)>) -> Result<Self, ValidationError> {
        let mut by_id = HashMap::with_capacity(entries.len());
        let mut by_name = HashMap::with_capacity(entries.len());

        for (name, id) in &entries {
            if by_name.insert(name.clone(), id.clone()).is_some() {
                return Err(ValidationError::DuplicateSeriesName {
                    name: name.to_string(),
                });
            }
            if by_id.insert(id.clone(), name.clone()).is_some() {
                return Err(ValidationError::DuplicateSeriesId { id: id.to_string() });
            }
        }

        Ok(Self {
            entries,
            by_id,
            by_name,
        })
    }

    /// Builds a catalog from `NAME=ID` pairs, e.g. `USD_FIX=SF43718`.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = pairs
            .into_iter()
            .map(|pair| parse_pair(pair.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(entries)
    }

    /// Name for an id, falling back to the raw id when it is not catalogued.
    pub fn resolve(&self, raw_id: &str) -> SeriesName {
        SeriesId::parse(raw_id)
            .ok()
            .and_then(|id| self.by_id.get(&id).cloned())
            .unwrap_or_else(|| SeriesName::from_unresolved(raw_id))
    }

    pub fn id_for(&self, name: &SeriesName) -> Option<&SeriesId> {
        self.by_name.get(name)
    }

    /// All ids in catalog order.
    pub fn ids(&self) -> Vec<SeriesId> {
        self.entries.iter().map(|(_, id)| id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SeriesCatalog {
    /// The built-in series list. An invalid built-in table yields an empty
    /// catalog, which [`AggregatorConfig::validate`](crate::AggregatorConfig::validate) rejects.
    fn default() -> Self {
        let entries = DEFAULT_SERIES
            .iter()
            .filter_map(|(name, id)| Some((SeriesName::parse(name).ok()?, SeriesId::parse(id).ok()?)))
            .collect::<Vec<_>>();
        Self::new(entries).unwrap_or_else(|_| Self {
            entries: Vec::new(),
            by_id: HashMap::new(),
            by_name: HashMap::new(),
        })
    }
}

fn parse_pair(value: &str) -> Result<(SeriesName, SeriesId), ValidationError> {
    let Some((name, id)) = value.split_once('=') else {
        return Err(ValidationError::InvalidCatalogEntry {
            value: value.to_owned(),
        });
    };
    Ok((SeriesName::parse(name)?, SeriesId::parse(id)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_is_complete() {
        let catalog = SeriesCatalog::default();
        assert_eq!(catalog.len(), DEFAULT_SERIES.len());
        assert_eq!(catalog.resolve("SF43718").as_str(), "USD_FIX");
        assert_eq!(catalog.resolve("SP68257").as_str(), "UDI");
    }

    #[test]
    fn default_catalog_matches_its_validated_pairs() {
        let pairs = DEFAULT_SERIES.iter().map(|(name, id)| format!("{name}={id}"));
        let validated = SeriesCatalog::from_pairs(pairs).expect("built-in table is one-to-one");
        assert_eq!(SeriesCatalog::default(), validated);
    }

    #[test]
    fn resolves_both_directions() {
        let catalog = SeriesCatalog::default();
        let name = SeriesName::parse("EUR").expect("name");
        let id = catalog.id_for(&name).expect("EUR is catalogued");
        assert_eq!(catalog.resolve(id.as_str()), name);
    }

    #[test]
    fn unknown_id_falls_back_to_itself() {
        let catalog = SeriesCatalog::default();
        assert_eq!(catalog.resolve("SF000001").as_str(), "SF000001");
        assert_eq!(catalog.resolve("not an id").as_str(), "not an id");
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = SeriesCatalog::from_pairs(["USD_FIX=SF43718", "DOLAR=SF43718"])
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::DuplicateSeriesId { .. }));
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = SeriesCatalog::from_pairs(["usd_fix=SF43718", "USD_FIX=SF60653"])
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::DuplicateSeriesName { .. }));
    }

    #[test]
    fn rejects_pair_without_separator() {
        let err = SeriesCatalog::from_pairs(["USD_FIX"]).expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidCatalogEntry { .. }));
    }
}
