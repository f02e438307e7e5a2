//! Static command reference table
//!
//! Help strings keyed by (owner context, longname). A copy is packaged into
//! the binary; a file on disk can replace it.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::{MetaError, Result};

/// Packaged command reference (tab separated, one header line)
pub const PACKAGED_REFERENCE: &str = include_str!("commands.tsv");

const HEADER: [&str; 3] = ["sheet", "longname", "helpstr"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceEntry {
    pub sheet: String,
    pub longname: String,
    pub helpstr: String,
}

#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    entries: HashMap<(String, String), ReferenceEntry>,
}

impl ReferenceTable {
    /// Parse tab separated text. Columns are located by header name, so
    /// extra columns are allowed.
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text.lines().filter(|line| !line.trim().is_empty());
        let header: Vec<&str> = lines
            .next()
            .ok_or_else(|| MetaError::ReferenceLoad("empty command reference".to_string()))?
            .split('\t')
            .map(str::trim)
            .collect();

        let mut positions = [0usize; 3];
        for (slot, name) in positions.iter_mut().zip(HEADER) {
            *slot = header
                .iter()
                .position(|column| *column == name)
                .ok_or_else(|| MetaError::ReferenceLoad(format!("missing column {}", name)))?;
        }

        let mut entries = HashMap::new();
        for (lineno, line) in lines.enumerate() {
            let cells: Vec<&str> = line.split('\t').collect();
            let cell = |i: usize| -> Result<String> {
                cells
                    .get(positions[i])
                    .map(|c| c.trim().to_string())
                    .ok_or_else(|| {
                        MetaError::ReferenceLoad(format!("short row at line {}", lineno + 2))
                    })
            };
            let entry = ReferenceEntry {
                sheet: cell(0)?,
                longname: cell(1)?,
                helpstr: cell(2)?,
            };
            entries.insert((entry.sheet.clone(), entry.longname.clone()), entry);
        }
        Ok(Self { entries })
    }

    pub fn get(&self, sheet: &str, longname: &str) -> Option<&ReferenceEntry> {
        self.entries.get(&(sheet.to_string(), longname.to_string()))
    }

    pub fn helpstr(&self, sheet: &str, longname: &str) -> Option<&str> {
        self.get(sheet, longname).map(|entry| entry.helpstr.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Where the catalog reads its reference table from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ReferenceSource {
    #[default]
    Embedded,
    File(PathBuf),
    /// Literal text, mostly for tests and embedding hosts
    Text(String),
}

impl ReferenceSource {
    pub async fn load(&self) -> Result<ReferenceTable> {
        match self {
            ReferenceSource::Embedded => ReferenceTable::parse(PACKAGED_REFERENCE),
            ReferenceSource::Text(text) => ReferenceTable::parse(text),
            ReferenceSource::File(path) => {
                let text = tokio::fs::read_to_string(path)
                    .await
                    .map_err(|e| MetaError::ReferenceLoad(format!("{}: {}", path.display(), e)))?;
                ReferenceTable::parse(&text)
            }
        }
    }
}
