//! Recorder for business transactions and invoices.

use chrono::{NaiveDate, Utc};
use cogniflow_shared::types::{InvoiceId, TransactionId, UserId};
use serde_json::json;

use super::error::RecordError;
use super::types::{
    Invoice, InvoiceFilter, InvoiceStatus, InvoiceUpdate, NewInvoice, NewTransaction, Transaction,
    TransactionFilter, TransactionStatus, TransactionUpdate,
};
use super::validation::{
    validate_invoice_update, validate_new_invoice, validate_new_transaction,
    validate_transaction_update,
};
use crate::audit::{self, AuditAction};
use crate::insights::InsightService;
use crate::numbering;
use crate::store::{SharedStore, StoreError};

/// Transaction and invoice recorder.
///
/// Recording a transaction never touches the ledger; postings are made
/// separately through the ledger service.
#[derive(Clone)]
pub struct RecordService {
    store: SharedStore,
    insights: InsightService,
}

impl RecordService {
    /// Creates a recorder. New transactions are screened by `insights`.
    #[must_use]
    pub fn new(store: SharedStore, insights: InsightService) -> Self {
        Self { store, insights }
    }

    // ========== Transactions ==========

    /// Records a transaction, then runs anomaly detection for it.
    ///
    /// Anomaly detection failures are logged and never fail the call.
    ///
    /// # Errors
    ///
    /// Validation errors or `DuplicateNumber`.
    pub async fn create_transaction(
        &self,
        actor: UserId,
        input: NewTransaction,
    ) -> Result<Transaction, RecordError> {
        validate_new_transaction(&input)?;

        let now = Utc::now();
        let date = input.date.unwrap_or(now);
        let mut attempt = 0;

        let transaction = loop {
            attempt += 1;
            let transaction_number = match &input.transaction_number {
                Some(number) => number.trim().to_string(),
                None => {
                    numbering::next_number(self.store.as_ref(), numbering::TRANSACTION_PREFIX, date)
                        .await?
                }
            };

            let candidate = Transaction {
                id: TransactionId::new(),
                transaction_number,
                description: input.description.trim().to_string(),
                amount: input.amount,
                currency: input.currency.clone(),
                transaction_type: input.transaction_type,
                category: input.category.trim().to_string(),
                status: input.status.unwrap_or(TransactionStatus::Pending),
                date,
                created_by: actor,
                created_at: now,
            };

            match self.store.insert_transaction(candidate).await {
                Ok(stored) => break stored,
                Err(e) if should_retry(&e, "transaction", input.transaction_number.is_none(), attempt) => {
                    tracing::warn!(attempt, "Generated transaction number collided, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        };

        tracing::info!(
            transaction_number = %transaction.transaction_number,
            transaction_type = transaction.transaction_type.as_str(),
            amount = %transaction.amount,
            "Transaction recorded"
        );
        audit::record(
            self.store.as_ref(),
            actor,
            AuditAction::Create,
            "transaction",
            transaction.id,
            json!({
                "transactionNumber": transaction.transaction_number,
                "type": transaction.transaction_type,
                "amount": transaction.amount,
                "category": transaction.category,
            }),
        )
        .await;

        if let Err(e) = self.insights.detect_anomalies(&transaction).await {
            tracing::warn!(
                error = %e,
                transaction_number = %transaction.transaction_number,
                "Anomaly detection failed"
            );
        }

        Ok(transaction)
    }

    /// Applies a partial update. Status changes follow the lifecycle rules.
    ///
    /// # Errors
    ///
    /// `TransactionNotFound`, blank fields or `InvalidTransition`.
    pub async fn update_transaction(
        &self,
        actor: UserId,
        id: TransactionId,
        update: TransactionUpdate,
    ) -> Result<Transaction, RecordError> {
        let mut transaction = self.get_transaction(id).await?;
        validate_transaction_update(transaction.status, &update)?;

        let previous_status = transaction.status;
        if let Some(description) = &update.description {
            transaction.description = description.trim().to_string();
        }
        if let Some(category) = &update.category {
            transaction.category = category.trim().to_string();
        }
        if let Some(status) = update.status {
            transaction.status = status;
        }
        if let Some(date) = update.date {
            transaction.date = date;
        }

        let transaction = self.store.update_transaction(transaction).await?;

        if transaction.status != previous_status {
            tracing::info!(
                transaction_number = %transaction.transaction_number,
                from = previous_status.as_str(),
                to = transaction.status.as_str(),
                "Transaction status changed"
            );
        }
        audit::record(
            self.store.as_ref(),
            actor,
            AuditAction::Update,
            "transaction",
            transaction.id,
            json!({
                "description": update.description,
                "category": update.category,
                "status": update.status,
                "date": update.date,
            }),
        )
        .await;

        Ok(transaction)
    }

    /// Looks up a transaction.
    ///
    /// # Errors
    ///
    /// `TransactionNotFound` if absent.
    pub async fn get_transaction(&self, id: TransactionId) -> Result<Transaction, RecordError> {
        self.store
            .find_transaction(id)
            .await?
            .ok_or(RecordError::TransactionNotFound(id))
    }

    /// Lists transactions, newest first.
    ///
    /// # Errors
    ///
    /// Store failures only.
    pub async fn list_transactions(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, RecordError> {
        Ok(self.store.list_transactions(filter).await?)
    }

    // ========== Invoices ==========

    /// Records an invoice in `pending` status.
    ///
    /// # Errors
    ///
    /// Validation errors or `DuplicateNumber`.
    pub async fn create_invoice(
        &self,
        actor: UserId,
        input: NewInvoice,
    ) -> Result<Invoice, RecordError> {
        let now = Utc::now();
        let issue_date = input.issue_date.unwrap_or(now);
        validate_new_invoice(&input, issue_date)?;

        let prefix = input.invoice_type.number_prefix();
        let mut attempt = 0;

        let invoice = loop {
            attempt += 1;
            let invoice_number = match &input.invoice_number {
                Some(number) => number.trim().to_string(),
                None => numbering::next_number(self.store.as_ref(), prefix, issue_date).await?,
            };

            let candidate = Invoice {
                id: InvoiceId::new(),
                invoice_number,
                client_name: input.client_name.trim().to_string(),
                amount: input.amount,
                currency: input.currency.clone(),
                issue_date,
                due_date: input.due_date,
                status: InvoiceStatus::Pending,
                invoice_type: input.invoice_type,
                notes: input.notes.clone(),
                created_by: actor,
                created_at: now,
            };

            match self.store.insert_invoice(candidate).await {
                Ok(stored) => break stored,
                Err(e) if should_retry(&e, "invoice", input.invoice_number.is_none(), attempt) => {
                    tracing::warn!(attempt, "Generated invoice number collided, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        };

        tracing::info!(
            invoice_number = %invoice.invoice_number,
            invoice_type = invoice.invoice_type.as_str(),
            amount = %invoice.amount,
            "Invoice recorded"
        );
        audit::record(
            self.store.as_ref(),
            actor,
            AuditAction::Create,
            "invoice",
            invoice.id,
            json!({
                "invoiceNumber": invoice.invoice_number,
                "type": invoice.invoice_type,
                "clientName": invoice.client_name,
                "amount": invoice.amount,
            }),
        )
        .await;

        Ok(invoice.as_of(today()))
    }

    /// Applies a partial update. Paid and cancelled invoices are final.
    ///
    /// Marking an invoice paid does not post to the ledger.
    ///
    /// # Errors
    ///
    /// `InvoiceNotFound`, validation errors or `InvalidTransition`.
    pub async fn update_invoice(
        &self,
        actor: UserId,
        id: InvoiceId,
        update: InvoiceUpdate,
    ) -> Result<Invoice, RecordError> {
        let mut invoice = self
            .store
            .find_invoice(id)
            .await?
            .ok_or(RecordError::InvoiceNotFound(id))?;
        validate_invoice_update(invoice.status, invoice.issue_date, &update)?;

        if let Some(client_name) = &update.client_name {
            invoice.client_name = client_name.trim().to_string();
        }
        if let Some(due_date) = update.due_date {
            invoice.due_date = due_date;
        }
        if let Some(status) = update.status {
            invoice.status = status;
        }
        if update.notes.is_some() {
            invoice.notes.clone_from(&update.notes);
        }

        let invoice = self.store.update_invoice(invoice).await?;

        tracing::info!(
            invoice_number = %invoice.invoice_number,
            status = invoice.status.as_str(),
            "Invoice updated"
        );
        audit::record(
            self.store.as_ref(),
            actor,
            AuditAction::Update,
            "invoice",
            invoice.id,
            json!({
                "clientName": update.client_name,
                "dueDate": update.due_date,
                "status": update.status,
                "notes": update.notes,
            }),
        )
        .await;

        Ok(invoice.as_of(today()))
    }

    /// Looks up an invoice, reporting its effective status.
    ///
    /// # Errors
    ///
    /// `InvoiceNotFound` if absent.
    pub async fn get_invoice(&self, id: InvoiceId) -> Result<Invoice, RecordError> {
        self.store
            .find_invoice(id)
            .await?
            .map(|invoice| invoice.as_of(today()))
            .ok_or(RecordError::InvoiceNotFound(id))
    }

    /// Lists invoices by issue date, newest first, with effective statuses.
    ///
    /// Filtering on `pending` or `overdue` matches the effective status, so a
    /// stored pending invoice past its due date is listed as overdue.
    ///
    /// # Errors
    ///
    /// Store failures only.
    pub async fn list_invoices(&self, filter: &InvoiceFilter) -> Result<Vec<Invoice>, RecordError> {
        let today = today();
        match filter.status {
            Some(wanted @ (InvoiceStatus::Pending | InvoiceStatus::Overdue)) => {
                let open = InvoiceFilter {
                    invoice_type: filter.invoice_type,
                    status: None,
                    limit: None,
                };
                let limit = filter
                    .limit
                    .map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(usize::MAX));
                Ok(self
                    .store
                    .list_invoices(&open)
                    .await?
                    .into_iter()
                    .map(|invoice| invoice.as_of(today))
                    .filter(|invoice| invoice.status == wanted)
                    .take(limit)
                    .collect())
            }
            _ => Ok(self
                .store
                .list_invoices(filter)
                .await?
                .into_iter()
                .map(|invoice| invoice.as_of(today))
                .collect()),
        }
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Only generated numbers are retried, and only a bounded number of times.
fn should_retry(err: &StoreError, entity: &str, generated: bool, attempt: u32) -> bool {
    generated && err.is_duplicate_of(entity) && attempt < numbering::MAX_ATTEMPTS
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
