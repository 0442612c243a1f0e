//! Farmer audit trail
//!
//! Every insert, update and delete of a farmer record leaves an entry here.
//! Entries are written by the farmer repository in the same transaction as
//! the change they describe, so the log never disagrees with the data.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::domain::farmer::FarmerId;
use crate::domain::DomainError;

/// What happened to a farmer record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditAction {
    #[serde(rename = "FARMER INSERTED")]
    Inserted,
    #[serde(rename = "FARMER UPDATED")]
    Updated,
    #[serde(rename = "FARMER DELETED")]
    Deleted,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inserted => "FARMER INSERTED",
            Self::Updated => "FARMER UPDATED",
            Self::Deleted => "FARMER DELETED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "FARMER INSERTED" => Some(Self::Inserted),
            "FARMER UPDATED" => Some(Self::Updated),
            "FARMER DELETED" => Some(Self::Deleted),
            _ => None,
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One audit log row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    id: i64,
    rid: FarmerId,
    action: AuditAction,
    timestamp: DateTime<Utc>,
}

impl AuditEntry {
    pub fn new(id: i64, rid: FarmerId, action: AuditAction, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            rid,
            action,
            timestamp,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn rid(&self) -> FarmerId {
        self.rid
    }

    pub fn action(&self) -> AuditAction {
        self.action
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Read side of the audit trail
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AuditRepository: Send + Sync {
    /// All entries, newest first
    async fn list(&self) -> Result<Vec<AuditEntry>, DomainError>;

    /// Entries for one farmer, oldest first
    async fn list_for_farmer(&self, rid: FarmerId) -> Result<Vec<AuditEntry>, DomainError>;
}
