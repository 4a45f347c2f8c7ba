//! Test doubles and common utilities for adapter contract tests
//!
//! `MockCloudDns` serves canned, paginated listings and records every
//! change it receives. Clones share state, so a test can hand one clone to
//! the provider and inspect another.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use zonesync_core::{Error, Result};
use zonesync_provider_googledns::GoogleDnsProvider;
use zonesync_provider_googledns::api::CloudDnsApi;
use zonesync_provider_googledns::wire::{
    ChangeRequest, ChangeResponse, ManagedZone, ManagedZonesPage, RecordSetsPage,
    ResourceRecordSet,
};

#[derive(Default)]
struct MockState {
    /// Managed zone listing, one inner Vec per page
    zone_pages: Vec<Vec<ManagedZone>>,
    /// Record set listing per zone id, one inner Vec per page
    record_pages: HashMap<String, Vec<Vec<ResourceRecordSet>>>,
    zone_list_calls: usize,
    record_list_calls: usize,
    /// Every change received, in order, with its zone id
    changes: Vec<(String, ChangeRequest)>,
    /// Fail the change with this 0-based index
    fail_change_at: Option<usize>,
    fail_record_lists: bool,
    /// When set, every listing page is empty and hands out these
    /// continuation tokens in a loop
    token_cycle: Vec<String>,
}

/// A paginated in-memory Cloud DNS
#[derive(Clone, Default)]
pub struct MockCloudDns {
    state: Arc<Mutex<MockState>>,
}

impl MockCloudDns {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    /// Serve managed zones as `(dns_name, id)`, one Vec per page
    pub fn with_zone_pages(self, pages: Vec<Vec<(&str, &str)>>) -> Self {
        self.state().zone_pages = pages
            .into_iter()
            .map(|page| {
                page.into_iter()
                    .map(|(dns_name, id)| ManagedZone {
                        id: id.to_string(),
                        dns_name: dns_name.to_string(),
                    })
                    .collect()
            })
            .collect();
        self
    }

    /// Single-page zone listing
    pub fn with_zones(self, zones: Vec<(&str, &str)>) -> Self {
        self.with_zone_pages(vec![zones])
    }

    /// Serve `zone_id`'s record sets, one Vec per page
    pub fn with_record_pages(self, zone_id: &str, pages: Vec<Vec<ResourceRecordSet>>) -> Self {
        self.state().record_pages.insert(zone_id.to_string(), pages);
        self
    }

    /// Append a managed zone to the last listing page
    pub fn add_zone(&self, dns_name: &str, id: &str) {
        let mut state = self.state();
        let zone = ManagedZone {
            id: id.to_string(),
            dns_name: dns_name.to_string(),
        };
        match state.zone_pages.last_mut() {
            Some(page) => page.push(zone),
            None => state.zone_pages.push(vec![zone]),
        }
    }

    pub fn fail_change_at(&self, index: usize) {
        self.state().fail_change_at = Some(index);
    }

    /// Serve listings whose continuation tokens cycle forever
    pub fn with_token_cycle(self, tokens: &[&str]) -> Self {
        self.state().token_cycle = tokens.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn fail_record_lists(&self) {
        self.state().fail_record_lists = true;
    }

    pub fn zone_list_calls(&self) -> usize {
        self.state().zone_list_calls
    }

    pub fn record_list_calls(&self) -> usize {
        self.state().record_list_calls
    }

    pub fn changes(&self) -> Vec<(String, ChangeRequest)> {
        self.state().changes.clone()
    }

    /// A live provider over a clone of this mock
    pub fn provider(&self) -> GoogleDnsProvider {
        GoogleDnsProvider::with_api("test-project", Box::new(self.clone()), false)
    }

    /// A dry-run provider over a clone of this mock
    pub fn dry_run_provider(&self) -> GoogleDnsProvider {
        GoogleDnsProvider::with_api("test-project", Box::new(self.clone()), true)
    }
}

/// Index of the page a token points at; tokens are stringified indexes
fn page_index(page_token: Option<&str>) -> usize {
    page_token.map(|t| t.parse().unwrap()).unwrap_or(0)
}

fn next_token(index: usize, pages: usize) -> Option<String> {
    (index + 1 < pages).then(|| (index + 1).to_string())
}

/// Token for the `calls`-th request of a cycling listing
fn cycled_token(tokens: &[String], calls: usize) -> String {
    assert!(calls < 100, "listing never stopped following tokens");
    tokens[(calls - 1) % tokens.len()].clone()
}

#[async_trait::async_trait]
impl CloudDnsApi for MockCloudDns {
    async fn list_managed_zones(&self, page_token: Option<&str>) -> Result<ManagedZonesPage> {
        let mut state = self.state();
        state.zone_list_calls += 1;

        if !state.token_cycle.is_empty() {
            return Ok(ManagedZonesPage {
                managed_zones: Vec::new(),
                next_page_token: Some(cycled_token(&state.token_cycle, state.zone_list_calls)),
            });
        }

        let index = page_index(page_token);
        Ok(ManagedZonesPage {
            managed_zones: state.zone_pages.get(index).cloned().unwrap_or_default(),
            next_page_token: next_token(index, state.zone_pages.len()),
        })
    }

    async fn list_record_sets(
        &self,
        zone_id: &str,
        page_token: Option<&str>,
    ) -> Result<RecordSetsPage> {
        let mut state = self.state();
        state.record_list_calls += 1;

        if state.fail_record_lists {
            return Err(Error::http("connection reset by peer"));
        }

        if !state.token_cycle.is_empty() {
            return Ok(RecordSetsPage {
                rrsets: Vec::new(),
                next_page_token: Some(cycled_token(&state.token_cycle, state.record_list_calls)),
            });
        }

        let index = page_index(page_token);
        let pages = state.record_pages.get(zone_id).cloned().unwrap_or_default();
        Ok(RecordSetsPage {
            rrsets: pages.get(index).cloned().unwrap_or_default(),
            next_page_token: next_token(index, pages.len()),
        })
    }

    async fn create_change(&self, zone_id: &str, change: &ChangeRequest) -> Result<ChangeResponse> {
        let mut state = self.state();

        if state.fail_change_at == Some(state.changes.len()) {
            return Err(Error::provider("googledns", "server error (transient): 503"));
        }

        state.changes.push((zone_id.to_string(), change.clone()));
        Ok(ChangeResponse {
            id: Some(state.changes.len().to_string()),
            status: Some("pending".to_string()),
            start_time: None,
        })
    }
}

/// A wire record set with a single rdata
pub fn rrset(name: &str, record_type: &str, ttl: u32, rdata: &str) -> ResourceRecordSet {
    ResourceRecordSet {
        name: name.to_string(),
        record_type: record_type.to_string(),
        ttl,
        rrdatas: vec![rdata.to_string()],
        priority: None,
    }
}

/// An MX wire record set using the priority field
pub fn mx_rrset(name: &str, ttl: u32, priority: u16, exchange: &str) -> ResourceRecordSet {
    ResourceRecordSet {
        priority: Some(priority),
        ..rrset(name, "MX", ttl, exchange)
    }
}

/// The single entry a change carries, and whether it is an addition
pub fn single_entry(change: &ChangeRequest) -> (bool, &ResourceRecordSet) {
    match (change.additions.as_slice(), change.deletions.as_slice()) {
        ([entry], []) => (true, entry),
        ([], [entry]) => (false, entry),
        _ => panic!("change must carry exactly one entry: {:?}", change),
    }
}
