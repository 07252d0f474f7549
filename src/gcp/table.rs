use std::collections::HashMap;
use std::path::Path;

use crate::error::{Error, Result};

const COMMENT_PREFIX: char = '#';

/// One surveyed marker: its name and the opaque world-coordinate payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GcpEntry {
    pub name: String,
    /// Remaining fields of the definition line, single-space joined.
    pub world_coordinate: String,
}

/// Known marker locations, in definition-file order.
///
/// Iteration order is the order names first appear in the file; lookups by
/// name go through a side index.
#[derive(Clone, Debug, Default)]
pub struct GcpTable {
    header: String,
    entries: Vec<GcpEntry>,
    index: HashMap<String, usize>,
}

impl GcpTable {
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text.lines().map(str::trim);
        let header = lines.next().ok_or(Error::EmptyDefinitions)?.to_string();

        let mut table = Self {
            header,
            ..Self::default()
        };
        for line in lines {
            if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
                continue;
            }
            let mut fields = line.split_whitespace();
            let Some(name) = fields.next() else {
                continue;
            };
            let world_coordinate = fields.collect::<Vec<_>>().join(" ");
            table.insert(GcpEntry {
                name: name.to_string(),
                world_coordinate,
            })?;
        }
        Ok(table)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::MissingInputFile {
                what: "gcp locations file",
                path: path.to_path_buf(),
            });
        }
        let table = Self::parse(&std::fs::read_to_string(path)?)?;
        log::info!(
            "loaded {} gcp locations from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    fn insert(&mut self, entry: GcpEntry) -> Result<()> {
        if self.index.contains_key(&entry.name) {
            return Err(Error::DuplicateMarker(entry.name));
        }
        self.index.insert(entry.name.clone(), self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    /// First line of the definitions file, passed through verbatim.
    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn entries(&self) -> &[GcpEntry] {
        &self.entries
    }

    /// Position of `name` in iteration order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn get(&self, name: &str) -> Option<&GcpEntry> {
        self.position(name).map(|i| &self.entries[i])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
