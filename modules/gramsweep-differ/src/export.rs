//! Typed schema for the data export's relationship files, and the
//! following-minus-followers computation over them.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{DifferError, Result};

/// Folder inside the export that holds the relationship files.
pub const EXPORT_DIR: &str = "connections/followers_and_following";

/// One exported relationship entry. `string_list_data` may be empty; an
/// entry without it carries no profile reference and is skipped.
#[derive(Debug, Deserialize)]
pub struct ExportEntry {
    #[serde(default)]
    pub string_list_data: Vec<ProfileRef>,
}

/// The per-profile payload nested in every relationship entry. A record
/// without `href` is malformed, not empty.
#[derive(Debug, Deserialize)]
pub struct ProfileRef {
    pub href: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

/// Top-level shape of `following.json`.
#[derive(Debug, Deserialize)]
struct FollowingDoc {
    relationships_following: Vec<ExportEntry>,
}

/// `following*.json` wraps its entries in a `relationships_following` key.
pub fn parse_following(path: &Path, json: &str) -> Result<Vec<String>> {
    let doc: FollowingDoc = serde_json::from_str(json).map_err(|e| malformed(path, e))?;
    Ok(hrefs(doc.relationships_following))
}

/// `followers*.json` is a bare list of entries.
pub fn parse_followers(path: &Path, json: &str) -> Result<Vec<String>> {
    let entries: Vec<ExportEntry> = serde_json::from_str(json).map_err(|e| malformed(path, e))?;
    Ok(hrefs(entries))
}

fn malformed(path: &Path, err: serde_json::Error) -> DifferError {
    DifferError::MalformedExport {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

fn hrefs(entries: Vec<ExportEntry>) -> Vec<String> {
    entries
        .into_iter()
        .flat_map(|entry| entry.string_list_data)
        .map(|profile| profile.href)
        .collect()
}

/// Relationship sets pulled out of an extracted archive.
#[derive(Debug, Default)]
pub struct RelationshipSets {
    pub following: HashSet<String>,
    pub followers: HashSet<String>,
}

impl RelationshipSets {
    /// Accounts followed that do not follow back, sorted for deterministic
    /// queue writes and logs.
    pub fn unfollowers(&self) -> Vec<String> {
        let mut links: Vec<String> = self.following.difference(&self.followers).cloned().collect();
        links.sort();
        links
    }
}

/// Walk an extracted archive and collect both relationship sets. Exports
/// usually nest everything under one wrapper directory, so the export
/// folder is searched for rather than addressed directly.
pub fn collect_sets(root: &Path) -> Result<RelationshipSets> {
    let export_dir = find_export_dir(root)?.ok_or_else(|| DifferError::ArchiveLayout {
        expected: EXPORT_DIR.to_string(),
    })?;

    let mut sets = RelationshipSets::default();
    for entry in fs::read_dir(&export_dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        if name.starts_with("following") {
            let json = fs::read_to_string(&path)?;
            sets.following.extend(parse_following(&path, &json)?);
        } else if name.starts_with("followers") {
            let json = fs::read_to_string(&path)?;
            sets.followers.extend(parse_followers(&path, &json)?);
        }
    }
    Ok(sets)
}

fn find_export_dir(root: &Path) -> Result<Option<PathBuf>> {
    let direct = root.join(EXPORT_DIR);
    if direct.is_dir() {
        return Ok(Some(direct));
    }
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            let nested = entry.path().join(EXPORT_DIR);
            if nested.is_dir() {
                return Ok(Some(nested));
            }
        }
    }
    Ok(None)
}
