//! Scope-down policy documents
//!
//! A policy narrows the broader user role to the resources a single user may
//! touch. Field names follow the IAM JSON grammar so the serialized form can
//! be handed to the transfer endpoint unchanged.

use crate::policy::arn::Buckets;
use serde::{Deserialize, Serialize};

/// IAM policy language version
pub const POLICY_VERSION: &str = "2012-10-17";

pub const LIST_BUCKET: &str = "s3:ListBucket";
pub const GET_OBJECT: &str = "s3:GetObject";
pub const GET_OBJECT_VERSION: &str = "s3:GetObjectVersion";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Allow,
    Deny,
}

/// One policy statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    pub effect: Effect,
    pub action: Vec<String>,
    pub resource: Vec<String>,
}

impl Statement {
    pub fn allow(sid: &str, actions: &[&str], resources: Vec<String>) -> Self {
        Self {
            sid: Some(sid.to_string()),
            effect: Effect::Allow,
            action: actions.iter().map(|a| a.to_string()).collect(),
            resource: resources,
        }
    }
}

/// A versioned list of statements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: String,
    pub statement: Vec<Statement>,
}

impl PolicyDocument {
    pub fn new(statement: Vec<Statement>) -> Self {
        Self {
            version: POLICY_VERSION.to_string(),
            statement,
        }
    }

    /// All resources across every statement, in document order.
    pub fn resources(&self) -> impl Iterator<Item = &str> {
        self.statement
            .iter()
            .flat_map(|s| s.resource.iter().map(String::as_str))
    }

    /// Returns the first resource that does not belong to `buckets`, if any.
    pub fn foreign_resource(&self, buckets: &Buckets) -> Option<&str> {
        self.resources().find(|r| !buckets.owns_resource(r))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
