use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::{
    DataPoint, RawObservation, RawSeriesBlock, SeriesCatalog, SeriesName, RESERVED_SECTION_KEYS,
};

const COLLISION_PREFIX: &str = "ID_";

/// Latest value per series name.
pub type SeriesSnapshot = BTreeMap<SeriesName, DataPoint>;

/// Resolves each block to its catalog name and keeps its most recent entry.
///
/// Unknown ids keep the raw id as their name; a raw id that equals a
/// section key is published as `ID_<raw id>` instead. Empty blocks are
/// skipped, and so is a block whose most recent entry is not numeric.
pub fn merge(blocks: &[RawSeriesBlock], catalog: &SeriesCatalog) -> SeriesSnapshot {
    let mut snapshot = SeriesSnapshot::new();

    for block in blocks {
        let mut name = catalog.resolve(&block.id);
        if RESERVED_SECTION_KEYS.contains(&name.as_str()) {
            name = SeriesName::from_unresolved(&format!("{COLLISION_PREFIX}{}", block.id));
            warn!(
                series_id = %block.id,
                series = %name,
                "series id collides with a section key; renamed"
            );
        }

        let Some(latest) = most_recent(&block.observations) else {
            debug!(series = %name, "series returned no observations");
            continue;
        };

        match (latest.parsed_date(), latest.numeric_value()) {
            (Some(date), Some(value)) => {
                snapshot.insert(name, DataPoint::new(date, value));
            }
            _ => {
                warn!(
                    series = %name,
                    date = %latest.date,
                    value = %latest.value,
                    "latest observation is not a valid number; series omitted"
                );
            }
        }
    }

    snapshot
}

/// Tail element, after a stable date sort when every date parses.
fn most_recent(observations: &[RawObservation]) -> Option<&RawObservation> {
    let dated: Option<Vec<_>> = observations
        .iter()
        .map(|observation| observation.parsed_date().map(|date| (date, observation)))
        .collect();

    match dated {
        Some(mut dated) => {
            dated.sort_by_key(|(date, _)| *date);
            dated.last().map(|(_, observation)| *observation)
        }
        None => observations.last(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(id: &str, pairs: &[(&str, &str)]) -> RawSeriesBlock {
        RawSeriesBlock::new(
            id,
            pairs
                .iter()
                .map(|(date, value)| RawObservation::new(*date, *value))
                .collect(),
        )
    }

    #[test]
    fn takes_last_entry_per_series() {
        let catalog = SeriesCatalog::default();
        let blocks = vec![
            block("SF43718", &[("14/10/2026", "18.40"), ("15/10/2026", "18.45")]),
            block("SF46410", &[("15/10/2026", "21.30")]),
        ];

        let snapshot = merge(&blocks, &catalog);
        let fix = SeriesName::parse("USD_FIX").expect("name");
        let eur = SeriesName::parse("EUR").expect("name");
        assert_eq!(snapshot[&fix].value, 18.45);
        assert_eq!(snapshot[&fix].date.format_iso(), "2026-10-15");
        assert_eq!(snapshot[&eur].value, 21.30);
    }

    #[test]
    fn unknown_id_is_kept_under_raw_id() {
        let snapshot = merge(&[block("SF999", &[("15/10/2026", "1.5")])], &SeriesCatalog::default());
        assert_eq!(snapshot[&SeriesName::from_unresolved("SF999")].value, 1.5);
    }

    #[test]
    fn raw_id_matching_a_section_key_is_kept_under_prefixed_name() {
        let snapshot = merge(
            &[block("MONITOR", &[("15/10/2026", "2.5")])],
            &SeriesCatalog::default(),
        );
        assert_eq!(snapshot.len(), 1);
        assert!(!snapshot.contains_key(&SeriesName::from_unresolved("MONITOR")));
        assert_eq!(snapshot[&SeriesName::from_unresolved("ID_MONITOR")].value, 2.5);
    }

    #[test]
    fn empty_block_is_absent() {
        let snapshot = merge(&[block("SF43718", &[])], &SeriesCatalog::default());
        assert!(snapshot.is_empty());
    }

    #[test]
    fn sentinel_tail_omits_series() {
        let snapshot = merge(
            &[block("SF43718", &[("14/10/2026", "18.40"), ("15/10/2026", "N/E")])],
            &SeriesCatalog::default(),
        );
        assert!(snapshot.is_empty());
    }

    #[test]
    fn descending_provider_order_still_picks_newest() {
        let snapshot = merge(
            &[block("SF43718", &[("15/10/2026", "18.45"), ("14/10/2026", "18.40")])],
            &SeriesCatalog::default(),
        );
        let fix = SeriesName::parse("USD_FIX").expect("name");
        assert_eq!(snapshot[&fix].value, 18.45);
    }
}
