//! Generation of the TypeScript resource module.

use crate::error::{PullError, Result};
use crate::resources::ResourceTree;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

pub const GENERATED_HEADER: &str = "// THIS FILE IS GENERATED, DO NOT EDIT!";
pub const CONSTANT_NAME: &str = "resources";
pub const TYPE_NAME: &str = "Resources";

const DEFAULT_EXTENSION: &str = "ts";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// Every language in one module at the output path
    #[default]
    Single,
    /// One module per language next to the output path
    Split,
}

impl OutputMode {
    pub fn from_split_flag(split: bool) -> Self {
        if split {
            OutputMode::Split
        } else {
            OutputMode::Single
        }
    }
}

/// Render `data` as a module exporting the constant and its type
pub fn render<T: Serialize + ?Sized>(data: &T) -> Result<String> {
    let json = serde_json::to_string_pretty(data)?;
    Ok(format!(
        "{header}\nconst {constant} = {json};\n\ntype {ty} = typeof {constant};\n\nexport {{ {constant}, type {ty} }};\n",
        header = GENERATED_HEADER,
        constant = CONSTANT_NAME,
        ty = TYPE_NAME,
        json = json,
    ))
}

/// Per-language path in split mode: `<dir of output>/<language>.<ext>`
pub fn split_path(output_path: &Path, language: &str) -> PathBuf {
    let extension = output_path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or(DEFAULT_EXTENSION);
    output_path.with_file_name(format!("{}.{}", language, extension))
}

/// Write the tree and return the paths written. Existing files are
/// overwritten.
pub async fn write(tree: &ResourceTree, output_path: &Path, mode: OutputMode) -> Result<Vec<PathBuf>> {
    match mode {
        OutputMode::Single => {
            write_artifact(output_path, &render(tree)?).await?;
            Ok(vec![output_path.to_path_buf()])
        }
        OutputMode::Split => {
            let mut written = Vec::with_capacity(tree.len());
            for (language, messages) in tree.iter() {
                let path = split_path(output_path, language);
                write_artifact(&path, &render(messages)?).await?;
                written.push(path);
            }
            Ok(written)
        }
    }
}

async fn write_artifact(path: &Path, contents: &str) -> Result<()> {
    let to_write_error = |source| PullError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(to_write_error)?;
    }
    tokio::fs::write(path, contents)
        .await
        .map_err(to_write_error)?;

    info!("✓ Wrote {}", path.display());
    Ok(())
}
