//! Zone container for neutral records

use serde::Serialize;

use crate::error::{Error, Result};
use crate::record::Record;

/// A DNS zone and the records populated into it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Zone {
    name: String,
    records: Vec<Record>,
}

impl Zone {
    /// Create an empty zone
    ///
    /// Zone names are absolute and must end with a dot (`example.com.`).
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.len() < 2 || !name.ends_with('.') {
            return Err(Error::invalid_input(format!(
                "Zone name must be absolute (end with '.'): {:?}",
                name
            )));
        }

        Ok(Self {
            name,
            records: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Add a record, rejecting a second record with the same (name, type)
    pub fn add_record(&mut self, record: Record) -> Result<()> {
        let duplicate = self
            .records
            .iter()
            .any(|r| r.name == record.name && r.record_type() == record.record_type());
        if duplicate {
            return Err(Error::invalid_input(format!(
                "Duplicate {} record for {:?} in {}",
                record.record_type(),
                record.name,
                self.name
            )));
        }

        self.records.push(record);
        Ok(())
    }

    /// Strip this zone's suffix from an absolute name
    ///
    /// Returns `""` for the apex. Names outside the zone are returned
    /// without their trailing dot.
    pub fn hostname_from_fqdn(&self, fqdn: &str) -> String {
        let zone = self.name.trim_end_matches('.');
        let fqdn = fqdn.trim_end_matches('.');

        if fqdn.eq_ignore_ascii_case(zone) {
            return String::new();
        }

        if let Some(cut) = fqdn.len().checked_sub(zone.len() + 1)
            && let Some(suffix) = fqdn.get(cut..)
            && suffix.starts_with('.')
            && suffix[1..].eq_ignore_ascii_case(zone)
        {
            return fqdn[..cut].to_string();
        }

        fqdn.to_string()
    }
}
