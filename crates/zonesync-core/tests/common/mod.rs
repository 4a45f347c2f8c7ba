//! Test doubles for provider boundary contract tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use zonesync_core::config::ProviderConfig;
use zonesync_core::{
    ApplyReport, Plan, Record, RecordType, Result, StepKind, Zone, ZoneProvider,
    ZoneProviderFactory,
};

/// In-memory provider that keeps one remote zone and records every step
#[derive(Default)]
pub struct RecordingProvider {
    remote: Vec<Record>,
    steps: Arc<Mutex<Vec<(StepKind, String)>>>,
}

impl RecordingProvider {
    pub fn new(remote: Vec<Record>) -> Self {
        Self {
            remote,
            steps: Arc::default(),
        }
    }

    /// Handle on the steps log that outlives the boxed provider
    pub fn steps(&self) -> Arc<Mutex<Vec<(StepKind, String)>>> {
        Arc::clone(&self.steps)
    }
}

#[async_trait]
impl ZoneProvider for RecordingProvider {
    async fn populate(&mut self, zone: &mut Zone) -> Result<usize> {
        for record in &self.remote {
            zone.add_record(record.clone())?;
        }
        Ok(self.remote.len())
    }

    async fn apply(&mut self, plan: &Plan) -> Result<ApplyReport> {
        let mut report = ApplyReport::default();
        for change in &plan.changes {
            for step in change.steps() {
                let key = format!("{} {}", step.record.name, step.record.record_type());
                self.steps.lock().unwrap().push((step.kind, key));
                report.writes += 1;
            }
            report.changes += 1;
        }
        Ok(report)
    }

    fn supports(&self, record_type: RecordType) -> bool {
        record_type != RecordType::Naptr
    }

    fn provider_name(&self) -> &'static str {
        "recording"
    }
}

/// Factory reading the remote records from `ProviderConfig::Custom`
pub struct RecordingFactory;

impl ZoneProviderFactory for RecordingFactory {
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn ZoneProvider>> {
        let ProviderConfig::Custom { config, .. } = config else {
            return Err(zonesync_core::Error::config("recording provider needs a custom config"));
        };
        let remote: Vec<Record> = serde_json::from_value(config["records"].clone())?;
        Ok(Box::new(RecordingProvider::new(remote)))
    }
}

pub fn custom_config(records: serde_json::Value) -> ProviderConfig {
    ProviderConfig::Custom {
        factory: "recording".to_string(),
        config: serde_json::json!({ "records": records }),
    }
}
