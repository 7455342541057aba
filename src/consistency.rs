//! Cross-language interpolation consistency check.
//!
//! Every translation of a key should reference the same ICU arguments. A
//! variable used by one language but missing from another language's
//! (non-empty) translation of the same key is an outlier. Untranslated keys
//! are not outliers.

use crate::icu::{extract_arguments, IcuError};
use crate::resources::{Message, Messages, ResourceTree};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, warn};

/// Flattened key → variables missing from at least one other language
pub type Outliers = BTreeMap<String, BTreeSet<String>>;

/// A message that could not be scanned. Its variables count as empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    pub language: String,
    pub key: String,
    pub message: String,
    pub error: IcuError,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsistencyReport {
    pub outliers: Outliers,
    pub parse_failures: Vec<ParseFailure>,
}

impl ConsistencyReport {
    pub fn is_consistent(&self) -> bool {
        self.outliers.is_empty()
    }

    /// Diagnostic summary. Never affects the outcome of a run.
    pub fn log_summary(&self) {
        if self.outliers.is_empty() {
            info!("✓ No interpolation inconsistencies found");
            return;
        }

        warn!(
            "Found inconsistent interpolation variables in {} keys: {:?}",
            self.outliers.len(),
            self.outliers
        );
    }
}

/// Flatten nested messages into dot-joined keys (`a.b.c`) mapped to text
pub fn flatten_messages(messages: &Messages) -> BTreeMap<String, String> {
    let mut result = BTreeMap::new();
    flatten_into(messages, None, &mut result);
    result
}

fn flatten_into(messages: &Messages, prefix: Option<&str>, result: &mut BTreeMap<String, String>) {
    for (key, message) in messages {
        let full_key = prefix.map_or_else(|| key.clone(), |p| format!("{}.{}", p, key));
        match message {
            Message::Text(text) => {
                result.insert(full_key, text.clone());
            }
            Message::Nested(nested) => flatten_into(nested, Some(&full_key), result),
            Message::Other(_) => {}
        }
    }
}

/// A translation and the arguments it references
struct Scanned {
    text: String,
    variables: BTreeSet<String>,
}

/// Compare argument usage of every key across `languages`.
///
/// With an empty `languages` slice, all languages in the tree are checked.
pub fn detect_inconsistencies(languages: &[String], tree: &ResourceTree) -> ConsistencyReport {
    let languages: BTreeSet<&str> = if languages.is_empty() {
        tree.languages().collect()
    } else {
        languages.iter().map(String::as_str).collect()
    };

    let mut report = ConsistencyReport::default();
    let mut scanned: BTreeMap<&str, BTreeMap<String, Scanned>> = BTreeMap::new();

    for language in languages {
        let Some(messages) = tree.language(language) else {
            continue;
        };

        let entries = flatten_messages(messages)
            .into_iter()
            .map(|(key, text)| {
                let variables = match extract_arguments(&text) {
                    Ok(variables) => variables,
                    Err(error) => {
                        warn!(
                            "Failed to parse message '{}' ({}.{}): {}",
                            text, language, key, error
                        );
                        report.parse_failures.push(ParseFailure {
                            language: language.to_string(),
                            key: key.clone(),
                            message: text.clone(),
                            error,
                        });
                        BTreeSet::new()
                    }
                };
                (key, Scanned { text, variables })
            })
            .collect();

        scanned.insert(language, entries);
    }

    for (language, entries) in &scanned {
        for (key, entry) in entries {
            if entry.variables.is_empty() {
                continue;
            }

            for (other_language, other_entries) in &scanned {
                if other_language == language {
                    continue;
                }
                // Untranslated in the other language
                let Some(other) = other_entries.get(key).filter(|o| !o.text.is_empty()) else {
                    continue;
                };

                for variable in entry.variables.difference(&other.variables) {
                    report
                        .outliers
                        .entry(key.clone())
                        .or_default()
                        .insert(variable.clone());
                }
            }
        }
    }

    report
}
