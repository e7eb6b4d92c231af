//! Append-only audit trail of mutating actions.
//!
//! Writing the trail never fails the action being audited: a store error is
//! logged and swallowed.

use chrono::{DateTime, Utc};
use cogniflow_shared::types::{AuditLogId, UserId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::ErpStore;

/// Audited action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    /// Entity created.
    Create,
    /// Entity changed.
    Update,
    /// Ledger entry posted.
    Post,
    /// Insight analysis run.
    Analyze,
}

impl AuditAction {
    /// Stored name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Post => "POST",
            Self::Analyze => "ANALYZE",
        }
    }
}

/// One audit record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    /// Record ID.
    pub id: AuditLogId,
    /// Acting user.
    pub user_id: UserId,
    /// Action.
    pub action: AuditAction,
    /// Entity kind (`account`, `ledger_entry`, `transaction`, ...).
    pub entity_type: String,
    /// Entity id or key.
    pub entity_id: String,
    /// Action-specific payload.
    pub details: Value,
    /// Timestamp.
    pub created_at: DateTime<Utc>,
}

/// Audit list filter.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditFilter {
    /// Only this entity kind.
    pub entity_type: Option<String>,
    /// Only this entity.
    pub entity_id: Option<String>,
    /// Maximum number of rows, newest first.
    pub limit: Option<u64>,
}

impl AuditFilter {
    /// Whether a record passes the equality filters.
    #[must_use]
    pub fn matches(&self, log: &AuditLog) -> bool {
        self.entity_type
            .as_deref()
            .is_none_or(|t| t == log.entity_type)
            && self.entity_id.as_deref().is_none_or(|i| i == log.entity_id)
    }
}

/// Appends an audit record, logging instead of failing.
pub async fn record(
    store: &dyn ErpStore,
    user_id: UserId,
    action: AuditAction,
    entity_type: &str,
    entity_id: impl ToString,
    details: Value,
) {
    let log = AuditLog {
        id: AuditLogId::new(),
        user_id,
        action,
        entity_type: entity_type.to_string(),
        entity_id: entity_id.to_string(),
        details,
        created_at: Utc::now(),
    };

    if let Err(e) = store.append_audit(log).await {
        tracing::warn!(
            error = %e,
            action = action.as_str(),
            entity_type,
            "Failed to append audit log"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_record_and_filter() {
        let store = MemoryStore::new();
        let user = UserId::new();

        record(&store, user, AuditAction::Create, "account", "Cash", json!({"type": "asset"})).await;
        record(&store, user, AuditAction::Post, "ledger_entry", "JE-1", json!({})).await;
        record(&store, user, AuditAction::Update, "account", "Cash", json!({"isActive": false})).await;

        let all = store.list_audit_logs(&AuditFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].action, AuditAction::Update);

        let accounts = store
            .list_audit_logs(&AuditFilter {
                entity_type: Some("account".into()),
                entity_id: Some("Cash".into()),
                limit: Some(1),
            })
            .await
            .unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].details, json!({"isActive": false}));
    }

    #[test]
    fn test_action_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&AuditAction::Create).unwrap(), "\"CREATE\"");
        assert_eq!(AuditAction::Analyze.as_str(), "ANALYZE");
    }
}
