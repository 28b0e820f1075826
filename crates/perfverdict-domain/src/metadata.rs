//! Side-by-side comparison of BASE and TEST run metadata.

use perfverdict_types::{MetadataComparison, MetadataConfig, MetadataRow, Value};
use serde_json::{Map, Value as Json};
use std::collections::BTreeSet;

/// Configured entries first, in order; then, when `show_undefined` is set,
/// every remaining key of either side, sorted.
pub fn compare_metadata(
    base: &Map<String, Json>,
    test: &Map<String, Json>,
    config: &MetadataConfig,
) -> MetadataComparison {
    let lookup = |m: &Map<String, Json>, key: &str| m.get(key).map_or(Value::Missing, Value::from_json);

    let mut rows = Vec::with_capacity(config.entries.len());
    let mut seen_base = BTreeSet::new();
    let mut seen_test = BTreeSet::new();

    for entry in &config.entries {
        let key = if entry.base_key == entry.test_key {
            entry.test_key.clone()
        } else {
            format!("{}/{}", entry.test_key, entry.base_key)
        };
        rows.push(MetadataRow {
            name: entry.name.clone(),
            key,
            base: lookup(base, &entry.base_key),
            test: lookup(test, &entry.test_key),
        });
        seen_base.insert(entry.base_key.as_str());
        seen_test.insert(entry.test_key.as_str());
    }

    if config.show_undefined {
        let undefined: BTreeSet<&str> = test
            .keys()
            .map(String::as_str)
            .filter(|k| !seen_test.contains(k))
            .chain(
                base.keys()
                    .map(String::as_str)
                    .filter(|k| !seen_base.contains(k)),
            )
            .collect();

        for key in undefined {
            rows.push(MetadataRow {
                name: key.to_string(),
                key: key.to_string(),
                base: lookup(base, key),
                test: lookup(test, key),
            });
        }
    }

    MetadataComparison {
        show_keys: config.show_keys,
        rows,
    }
}
