//! Cloud DNS v1 wire types
//!
//! Only the fields zonesync reads or writes are modelled; everything else
//! in the API's responses is ignored on deserialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `kind` value the API expects on change bodies
pub const CHANGE_KIND: &str = "dns#change";

/// One managed zone as returned by `managedZones.list`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedZone {
    /// Opaque remote identifier used in zone-scoped URLs
    pub id: String,
    /// Absolute DNS name, e.g. `example.com.`
    pub dns_name: String,
}

/// One page of `managedZones.list`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedZonesPage {
    #[serde(default)]
    pub managed_zones: Vec<ManagedZone>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// The service's native record representation
///
/// Also used as the body entry of a change: one addition or deletion is one
/// `ResourceRecordSet` carrying a single rdata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecordSet {
    /// Absolute owner name
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub ttl: u32,
    #[serde(default)]
    pub rrdatas: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
}

/// One page of `resourceRecordSets.list`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSetsPage {
    #[serde(default)]
    pub rrsets: Vec<ResourceRecordSet>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Body of `changes.create`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeRequest {
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub additions: Vec<ResourceRecordSet>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub deletions: Vec<ResourceRecordSet>,
}

impl ChangeRequest {
    /// A change declaring exactly one addition
    pub fn addition(rrset: ResourceRecordSet) -> Self {
        Self {
            kind: CHANGE_KIND,
            additions: vec![rrset],
            deletions: Vec::new(),
        }
    }

    /// A change declaring exactly one deletion
    pub fn deletion(rrset: ResourceRecordSet) -> Self {
        Self {
            kind: CHANGE_KIND,
            additions: Vec::new(),
            deletions: vec![rrset],
        }
    }
}

/// Response of `changes.create`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeResponse {
    #[serde(default)]
    pub id: Option<String>,
    /// "pending" or "done"
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
}
