use crate::error::CrawlError;
use crate::model::RecipeRecord;
use log::{info, warn};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

/// A record written by [`RecordStore::persist`].
#[derive(Debug, Clone)]
pub struct StoredRecipe {
    pub id: String,
    /// Absolute location of the JSON document
    pub path: PathBuf,
    pub record: RecipeRecord,
}

/// Writes one JSON document per recipe into a fixed directory.
///
/// The store never updates or deletes; persisting the same page twice yields
/// two documents with different identifiers.
#[derive(Debug, Clone)]
pub struct RecordStore {
    dir: PathBuf,
}

impl RecordStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Assigns a fresh identifier and the source URL, then writes the record.
    pub async fn persist(
        &self,
        mut record: RecipeRecord,
        source_url: Option<&str>,
    ) -> Result<StoredRecipe, CrawlError> {
        let id = Uuid::new_v4().to_string();
        record.id = Some(id.clone());
        record.source_url = source_url.map(String::from);

        fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(format!("{id}.json"));
        fs::write(&path, to_document(&record)?).await?;

        let path = fs::canonicalize(&path).await?;
        info!("Recipe saved to {}", path.display());

        Ok(StoredRecipe { id, path, record })
    }

    /// Reads back every stored record, skipping files that do not parse.
    pub async fn records(&self) -> Result<Vec<RecipeRecord>, CrawlError> {
        let mut records = Vec::new();
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(records),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }

            let contents = fs::read_to_string(&path).await?;
            match serde_json::from_str::<RecipeRecord>(&contents) {
                Ok(record) => records.push(record),
                Err(e) => warn!("Skipping unreadable record {}: {}", path.display(), e),
            }
        }

        Ok(records)
    }
}

/// Four-space indented JSON with non-ASCII text kept as-is.
fn to_document(record: &RecipeRecord) -> Result<Vec<u8>, CrawlError> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    record.serialize(&mut serializer)?;
    Ok(buf)
}
