//! The in-memory resource tree and the merge of exported files into it.

use crate::archive::VirtualFile;
use crate::error::{PullError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// Messages keyed by message key (or namespace, at the language root)
pub type Messages = BTreeMap<String, Message>;

/// A translation, or a nested group of translations.
///
/// Any other JSON value (number, bool, null, array) is carried through
/// untouched as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Message {
    Text(String),
    Nested(Messages),
    Other(serde_json::Value),
}

impl Message {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Message::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_nested(&self) -> Option<&Messages> {
        match self {
            Message::Nested(messages) => Some(messages),
            _ => None,
        }
    }
}

/// Language tag → messages.
///
/// Non-default namespaces appear as nested groups under the language,
/// while the default namespace's keys sit directly at the language root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceTree(BTreeMap<String, Messages>);

impl ResourceTree {
    /// A tree with one empty entry per language
    pub fn seeded(languages: &[String]) -> Self {
        Self(
            languages
                .iter()
                .map(|lang| (lang.clone(), Messages::new()))
                .collect(),
        )
    }

    pub fn language(&self, tag: &str) -> Option<&Messages> {
        self.0.get(tag)
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Messages)> {
        self.0.iter().map(|(tag, messages)| (tag.as_str(), messages))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn language_mut(&mut self, tag: &str) -> &mut Messages {
        self.0.entry(tag.to_string()).or_default()
    }
}

/// Namespace and language encoded in an archive path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePath<'a> {
    pub namespace: &'a str,
    pub language: &'a str,
}

impl<'a> ResourcePath<'a> {
    /// Split `<namespace>/<language>.<ext>`.
    ///
    /// The language is the file name up to its first dot. Anything other
    /// than exactly two non-empty segments is rejected.
    pub fn parse(path: &'a str) -> Option<Self> {
        let mut segments = path.split('/');
        let namespace = segments.next()?;
        let file_name = segments.next()?;
        if segments.next().is_some() || namespace.is_empty() {
            return None;
        }

        let language = file_name.split('.').next()?;
        if language.is_empty() {
            return None;
        }

        Some(Self {
            namespace,
            language,
        })
    }
}

/// Merge exported files into a tree seeded with `languages`.
///
/// Files of `default_namespace` are shallow-merged into the language root
/// (later files win on key collisions). Every other file replaces
/// `tree[language][namespace]` wholesale.
pub fn merge(
    languages: &[String],
    files: Vec<VirtualFile>,
    default_namespace: Option<&str>,
) -> Result<ResourceTree> {
    let mut tree = ResourceTree::seeded(languages);
    let default_namespace = default_namespace.filter(|ns| !ns.is_empty());

    for file in files {
        let Some(resource) = ResourcePath::parse(&file.path) else {
            warn!(
                "Skipping archive entry '{}': expected <namespace>/<language>.<ext>",
                file.path
            );
            continue;
        };

        let messages: Messages = serde_json::from_slice(&file.content).map_err(|source| {
            PullError::InvalidResourceFile {
                path: file.path.clone(),
                source,
            }
        })?;

        if !languages.is_empty() && !languages.iter().any(|l| l == resource.language) {
            warn!(
                "Export contains language '{}' ({}) which was not requested",
                resource.language, file.path
            );
        }

        let root = tree.language_mut(resource.language);
        if default_namespace == Some(resource.namespace) {
            root.extend(messages);
        } else {
            root.insert(resource.namespace.to_string(), Message::Nested(messages));
        }
    }

    Ok(tree)
}
