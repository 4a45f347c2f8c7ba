// # Neutral Record Model
//
// The provider-agnostic representation of a DNS record. Providers translate
// their wire formats into these types on populate and back out on apply.
//
// Serialized form mirrors the usual zone-file data dict:
//
// ```json
// { "name": "www", "ttl": 300, "type": "A", "values": ["1.2.3.4"] }
// { "name": "alias", "ttl": 300, "type": "CNAME", "value": "www.example.com." }
// ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// The closed set of record types zonesync manages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    A,
    Aaaa,
    Caa,
    Cname,
    Mx,
    Naptr,
    Ns,
    Ptr,
    Spf,
    Srv,
    Txt,
}

impl RecordType {
    /// Every supported type, in wire-name order
    pub const ALL: [RecordType; 11] = [
        RecordType::A,
        RecordType::Aaaa,
        RecordType::Caa,
        RecordType::Cname,
        RecordType::Mx,
        RecordType::Naptr,
        RecordType::Ns,
        RecordType::Ptr,
        RecordType::Spf,
        RecordType::Srv,
        RecordType::Txt,
    ];

    /// The type's name as it appears on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Caa => "CAA",
            RecordType::Cname => "CNAME",
            RecordType::Mx => "MX",
            RecordType::Naptr => "NAPTR",
            RecordType::Ns => "NS",
            RecordType::Ptr => "PTR",
            RecordType::Spf => "SPF",
            RecordType::Srv => "SRV",
            RecordType::Txt => "TXT",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::invalid_input(format!("Unsupported record type: {}", s)))
    }
}

/// One MX value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MxValue {
    /// Lower is preferred
    pub preference: u16,
    /// Mail exchange host
    pub exchange: String,
}

impl MxValue {
    pub fn new(preference: u16, exchange: impl Into<String>) -> Self {
        Self {
            preference,
            exchange: exchange.into(),
        }
    }
}

/// One CAA value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaaValue {
    #[serde(default)]
    pub flags: u8,
    pub tag: String,
    pub value: String,
}

impl CaaValue {
    pub fn new(flags: u8, tag: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            flags,
            tag: tag.into(),
            value: value.into(),
        }
    }
}

/// Type-specific record data
///
/// Singleton types (CNAME, PTR) carry `value`; everything else carries an
/// ordered `values` list. Order is significant and is preserved end to end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum RecordData {
    A { values: Vec<String> },
    Aaaa { values: Vec<String> },
    Caa { values: Vec<CaaValue> },
    Cname { value: String },
    Mx { values: Vec<MxValue> },
    Naptr { values: Vec<String> },
    Ns { values: Vec<String> },
    Ptr { value: String },
    Spf { values: Vec<String> },
    Srv { values: Vec<String> },
    Txt { values: Vec<String> },
}

impl RecordData {
    /// The record type this data belongs to
    pub fn record_type(&self) -> RecordType {
        match self {
            RecordData::A { .. } => RecordType::A,
            RecordData::Aaaa { .. } => RecordType::Aaaa,
            RecordData::Caa { .. } => RecordType::Caa,
            RecordData::Cname { .. } => RecordType::Cname,
            RecordData::Mx { .. } => RecordType::Mx,
            RecordData::Naptr { .. } => RecordType::Naptr,
            RecordData::Ns { .. } => RecordType::Ns,
            RecordData::Ptr { .. } => RecordType::Ptr,
            RecordData::Spf { .. } => RecordType::Spf,
            RecordData::Srv { .. } => RecordType::Srv,
            RecordData::Txt { .. } => RecordType::Txt,
        }
    }

    /// Number of individual values held
    pub fn value_count(&self) -> usize {
        match self {
            RecordData::Cname { .. } | RecordData::Ptr { .. } => 1,
            RecordData::Caa { values } => values.len(),
            RecordData::Mx { values } => values.len(),
            RecordData::A { values }
            | RecordData::Aaaa { values }
            | RecordData::Naptr { values }
            | RecordData::Ns { values }
            | RecordData::Spf { values }
            | RecordData::Srv { values }
            | RecordData::Txt { values } => values.len(),
        }
    }
}

/// A DNS record in the neutral model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Name relative to the zone, empty for the apex
    pub name: String,
    pub ttl: u32,
    #[serde(flatten)]
    pub data: RecordData,
}

impl Record {
    /// Create a new record
    pub fn new(name: impl Into<String>, ttl: u32, data: RecordData) -> Self {
        Self {
            name: name.into(),
            ttl,
            data,
        }
    }

    pub fn record_type(&self) -> RecordType {
        self.data.record_type()
    }

    /// Absolute name of this record within `zone_name` (which ends with a dot)
    pub fn fqdn(&self, zone_name: &str) -> String {
        if self.name.is_empty() {
            zone_name.to_string()
        } else {
            format!("{}.{}", self.name, zone_name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_type_wire_names() {
        for t in RecordType::ALL {
            assert_eq!(t.as_str().parse::<RecordType>().unwrap(), t);
        }
        assert!("SOA".parse::<RecordType>().is_err());
        assert!("aaaa".parse::<RecordType>().is_err());
    }

    #[test]
    fn test_fqdn() {
        let www = Record::new("www", 300, RecordData::A { values: vec![] });
        let apex = Record::new("", 300, RecordData::A { values: vec![] });

        assert_eq!(www.fqdn("example.com."), "www.example.com.");
        assert_eq!(apex.fqdn("example.com."), "example.com.");
    }

    #[test]
    fn test_serialized_shape() {
        let record = Record::new(
            "mail",
            3600,
            RecordData::Mx {
                values: vec![MxValue::new(10, "mx1.example.com.")],
            },
        );

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "mail",
                "ttl": 3600,
                "type": "MX",
                "values": [{ "preference": 10, "exchange": "mx1.example.com." }]
            })
        );

        let back: Record = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_singleton_shape() {
        let json = serde_json::json!({
            "name": "alias",
            "ttl": 60,
            "type": "CNAME",
            "value": "www.example.com."
        });

        let record: Record = serde_json::from_value(json).unwrap();
        assert_eq!(record.record_type(), RecordType::Cname);
        assert_eq!(record.data.value_count(), 1);
    }
}
