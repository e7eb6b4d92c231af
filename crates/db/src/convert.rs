//! Mapping between table rows and domain types.
//!
//! Enumerations are stored as their serde names in `VARCHAR`
//! columns guarded by `CHECK` constraints.

use chrono::Utc;
use cogniflow_core::audit::AuditLog;
use cogniflow_core::insights::AiInsight;
use cogniflow_core::ledger::{Account, LedgerEntry};
use cogniflow_core::records::{Invoice, Transaction};
use cogniflow_core::store::StoreError;
use cogniflow_shared::types::{
    AccountId, AuditLogId, CurrencyCode, InsightId, InvoiceId, LedgerEntryId, TransactionId, UserId,
};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{DbErr, Set, SqlErr};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::entities::{accounts, ai_insights, audit_logs, invoices, ledger_entries, transactions};

fn parse_label<T: DeserializeOwned>(column: &'static str, raw: &str) -> Result<T, StoreError> {
    serde_json::from_value(Value::String(raw.to_string()))
        .map_err(|_| StoreError::backend(format!("unexpected {column} value '{raw}'")))
}

fn parse_currency(raw: &str) -> Result<CurrencyCode, StoreError> {
    CurrencyCode::parse(raw).map_err(|e| StoreError::backend(e.to_string()))
}

fn utc(at: DateTimeWithTimeZone) -> chrono::DateTime<Utc> {
    at.with_timezone(&Utc)
}

/// Wraps a driver error.
pub(crate) fn backend(err: DbErr) -> StoreError {
    StoreError::backend(err.to_string())
}

/// Maps a unique-constraint violation to `Duplicate`, anything else to `Backend`.
pub(crate) fn on_insert(entity: &'static str, key: &str) -> impl FnOnce(DbErr) -> StoreError {
    move |err| match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => StoreError::duplicate(entity, key),
        _ => backend(err),
    }
}

/// Whether an insert was skipped by `ON CONFLICT DO NOTHING`.
pub(crate) fn is_not_inserted(err: &DbErr) -> bool {
    matches!(err, DbErr::RecordNotInserted)
}

// ========== Accounts ==========

impl TryFrom<accounts::Model> for Account {
    type Error = StoreError;

    fn try_from(m: accounts::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: AccountId::from_uuid(m.id),
            account_type: m
                .account_type
                .parse()
                .map_err(|e: String| StoreError::backend(e))?,
            name: m.name,
            balance: m.balance,
            currency: parse_currency(&m.currency)?,
            is_active: m.is_active,
            created_at: utc(m.created_at),
        })
    }
}

pub(crate) fn account_row(a: &Account) -> accounts::ActiveModel {
    accounts::ActiveModel {
        id: Set(a.id.into_inner()),
        name: Set(a.name.clone()),
        account_type: Set(a.account_type.as_str().to_string()),
        balance: Set(a.balance),
        currency: Set(a.currency.to_string()),
        is_active: Set(a.is_active),
        created_at: Set(a.created_at.into()),
    }
}

// ========== Ledger entries ==========

impl From<ledger_entries::Model> for LedgerEntry {
    fn from(m: ledger_entries::Model) -> Self {
        Self {
            id: LedgerEntryId::from_uuid(m.id),
            entry_number: m.entry_number,
            description: m.description,
            debit: m.debit,
            credit: m.credit,
            account_name: m.account_name,
            date: utc(m.entry_date),
            transaction_id: m.transaction_id.map(TransactionId::from_uuid),
            created_by: UserId::from_uuid(m.created_by),
            created_at: utc(m.created_at),
        }
    }
}

pub(crate) fn entry_row(e: &LedgerEntry) -> ledger_entries::ActiveModel {
    ledger_entries::ActiveModel {
        id: Set(e.id.into_inner()),
        entry_number: Set(e.entry_number.clone()),
        description: Set(e.description.clone()),
        debit: Set(e.debit),
        credit: Set(e.credit),
        account_name: Set(e.account_name.clone()),
        entry_date: Set(e.date.into()),
        transaction_id: Set(e.transaction_id.map(TransactionId::into_inner)),
        created_by: Set(e.created_by.into_inner()),
        created_at: Set(e.created_at.into()),
    }
}

// ========== Transactions ==========

impl TryFrom<transactions::Model> for Transaction {
    type Error = StoreError;

    fn try_from(m: transactions::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: TransactionId::from_uuid(m.id),
            transaction_type: parse_label("transaction_type", &m.transaction_type)?,
            status: parse_label("status", &m.status)?,
            currency: parse_currency(&m.currency)?,
            transaction_number: m.transaction_number,
            description: m.description,
            amount: m.amount,
            category: m.category,
            date: utc(m.transaction_date),
            created_by: UserId::from_uuid(m.created_by),
            created_at: utc(m.created_at),
        })
    }
}

pub(crate) fn transaction_row(t: &Transaction) -> transactions::ActiveModel {
    transactions::ActiveModel {
        id: Set(t.id.into_inner()),
        transaction_number: Set(t.transaction_number.clone()),
        description: Set(t.description.clone()),
        amount: Set(t.amount),
        currency: Set(t.currency.to_string()),
        transaction_type: Set(t.transaction_type.as_str().to_string()),
        category: Set(t.category.clone()),
        status: Set(t.status.as_str().to_string()),
        transaction_date: Set(t.date.into()),
        created_by: Set(t.created_by.into_inner()),
        created_at: Set(t.created_at.into()),
    }
}

// ========== Invoices ==========

impl TryFrom<invoices::Model> for Invoice {
    type Error = StoreError;

    fn try_from(m: invoices::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: InvoiceId::from_uuid(m.id),
            status: parse_label("status", &m.status)?,
            invoice_type: parse_label("invoice_type", &m.invoice_type)?,
            currency: parse_currency(&m.currency)?,
            invoice_number: m.invoice_number,
            client_name: m.client_name,
            amount: m.amount,
            issue_date: utc(m.issue_date),
            due_date: utc(m.due_date),
            notes: m.notes,
            created_by: UserId::from_uuid(m.created_by),
            created_at: utc(m.created_at),
        })
    }
}

pub(crate) fn invoice_row(i: &Invoice) -> invoices::ActiveModel {
    invoices::ActiveModel {
        id: Set(i.id.into_inner()),
        invoice_number: Set(i.invoice_number.clone()),
        client_name: Set(i.client_name.clone()),
        amount: Set(i.amount),
        currency: Set(i.currency.to_string()),
        issue_date: Set(i.issue_date.into()),
        due_date: Set(i.due_date.into()),
        status: Set(i.status.as_str().to_string()),
        invoice_type: Set(i.invoice_type.as_str().to_string()),
        notes: Set(i.notes.clone()),
        created_by: Set(i.created_by.into_inner()),
        created_at: Set(i.created_at.into()),
    }
}

// ========== Insights ==========

impl TryFrom<ai_insights::Model> for AiInsight {
    type Error = StoreError;

    fn try_from(m: ai_insights::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: InsightId::from_uuid(m.id),
            insight_type: parse_label("insight_type", &m.insight_type)?,
            severity: parse_label("severity", &m.severity)?,
            title: m.title,
            description: m.description,
            data: m.data,
            is_read: m.is_read,
            dedup_key: m.dedup_key,
            created_at: utc(m.created_at),
        })
    }
}

pub(crate) fn insight_row(i: &AiInsight) -> ai_insights::ActiveModel {
    ai_insights::ActiveModel {
        id: Set(i.id.into_inner()),
        insight_type: Set(i.insight_type.as_str().to_string()),
        title: Set(i.title.clone()),
        description: Set(i.description.clone()),
        severity: Set(i.severity.as_str().to_string()),
        data: Set(i.data.clone()),
        is_read: Set(i.is_read),
        dedup_key: Set(i.dedup_key.clone()),
        created_at: Set(i.created_at.into()),
    }
}

// ========== Audit ==========

impl TryFrom<audit_logs::Model> for AuditLog {
    type Error = StoreError;

    fn try_from(m: audit_logs::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: AuditLogId::from_uuid(m.id),
            user_id: UserId::from_uuid(m.user_id),
            action: parse_label("action", &m.action)?,
            entity_type: m.entity_type,
            entity_id: m.entity_id,
            details: m.details,
            created_at: utc(m.created_at),
        })
    }
}

pub(crate) fn audit_row(l: &AuditLog) -> audit_logs::ActiveModel {
    audit_logs::ActiveModel {
        id: Set(l.id.into_inner()),
        user_id: Set(l.user_id.into_inner()),
        action: Set(l.action.as_str().to_string()),
        entity_type: Set(l.entity_type.clone()),
        entity_id: Set(l.entity_id.clone()),
        details: Set(l.details.clone()),
        created_at: Set(l.created_at.into()),
    }
}
