// # Planner Boundary
//
// A `Plan` is the already-decided list of changes for one zone. Deciding
// *what* changes is the planner's job; providers only execute them, in
// order.
//
// ## Update contract
//
// Providers whose write API only knows additions and deletions execute an
// `Update` as a deletion of `existing` followed by a creation of `new`.
// `Change::steps()` yields exactly that expansion so every provider applies
// updates the same way.

use serde::{Deserialize, Serialize};

use crate::record::Record;

/// A single decided change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Change {
    /// Record does not exist remotely and must be created
    Create { new: Record },
    /// Record exists remotely and must be replaced
    Update { existing: Record, new: Record },
    /// Record exists remotely and must be removed
    Delete { existing: Record },
}

/// Direction of one write step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    Create,
    Delete,
}

/// One create or delete of a whole record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step<'a> {
    pub kind: StepKind,
    pub record: &'a Record,
}

impl Change {
    /// Create/delete steps needed to execute this change, in order
    pub fn steps(&self) -> Vec<Step<'_>> {
        match self {
            Change::Create { new } => vec![Step {
                kind: StepKind::Create,
                record: new,
            }],
            Change::Delete { existing } => vec![Step {
                kind: StepKind::Delete,
                record: existing,
            }],
            Change::Update { existing, new } => vec![
                Step {
                    kind: StepKind::Delete,
                    record: existing,
                },
                Step {
                    kind: StepKind::Create,
                    record: new,
                },
            ],
        }
    }
}

/// Ordered changes for one zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Absolute zone name, e.g. `example.com.`
    pub zone: String,
    pub changes: Vec<Change>,
}

impl Plan {
    pub fn new(zone: impl Into<String>, changes: Vec<Change>) -> Self {
        Self {
            zone: zone.into(),
            changes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordData;

    fn a(ip: &str) -> Record {
        Record::new("www", 300, RecordData::A { values: vec![ip.to_string()] })
    }

    #[test]
    fn test_update_expands_to_delete_then_create() {
        let change = Change::Update {
            existing: a("1.1.1.1"),
            new: a("2.2.2.2"),
        };

        let steps = change.steps();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].kind, StepKind::Delete);
        assert_eq!(steps[0].record, &a("1.1.1.1"));
        assert_eq!(steps[1].kind, StepKind::Create);
        assert_eq!(steps[1].record, &a("2.2.2.2"));
    }

    #[test]
    fn test_plan_from_json() {
        let plan: Plan = serde_json::from_value(serde_json::json!({
            "zone": "example.com.",
            "changes": [
                { "kind": "create", "new": { "name": "www", "ttl": 300, "type": "A", "values": ["1.2.3.4"] } },
                { "kind": "delete", "existing": { "name": "old", "ttl": 300, "type": "CNAME", "value": "www.example.com." } }
            ]
        }))
        .unwrap();

        assert_eq!(plan.zone, "example.com.");
        assert_eq!(plan.changes.len(), 2);
        assert_eq!(plan.changes[0].steps()[0].kind, StepKind::Create);
        assert_eq!(plan.changes[1].steps()[0].kind, StepKind::Delete);
    }
}
