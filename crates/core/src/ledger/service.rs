//! Ledger service: chart of accounts and entry posting.

use chrono::Utc;
use cogniflow_shared::types::{AccountId, LedgerEntryId, UserId};
use serde_json::json;

use super::error::LedgerError;
use super::types::{
    Account, AccountFilter, AccountUpdate, EntryFilter, LedgerEntry, NewAccount, NewLedgerEntry,
};
use super::validation::{validate_account_update, validate_entry, validate_new_account};
use crate::audit::{self, AuditAction};
use crate::numbering;
use crate::store::SharedStore;

/// Result of a successful posting.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostedEntry {
    /// The recorded entry.
    pub entry: LedgerEntry,
    /// The account after the entry's effect was applied.
    pub account: Account,
}

/// Ledger service.
///
/// The account balance is only ever written by [`LedgerService::post_entry`],
/// through the store's atomic posting primitive.
#[derive(Clone)]
pub struct LedgerService {
    store: SharedStore,
}

impl LedgerService {
    /// Creates a ledger service over `store`.
    #[must_use]
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Creates an account with `balance = opening_balance`.
    ///
    /// # Errors
    ///
    /// `EmptyAccountName` or `DuplicateAccountName`.
    pub async fn create_account(
        &self,
        actor: UserId,
        input: NewAccount,
    ) -> Result<Account, LedgerError> {
        validate_new_account(&input)?;

        let account = Account {
            id: AccountId::new(),
            name: input.name.trim().to_string(),
            account_type: input.account_type,
            balance: input.opening_balance,
            currency: input.currency,
            is_active: true,
            created_at: Utc::now(),
        };
        let account = self.store.insert_account(account).await?;

        tracing::info!(
            account_id = %account.id,
            name = %account.name,
            account_type = %account.account_type,
            "Account created"
        );
        audit::record(
            self.store.as_ref(),
            actor,
            AuditAction::Create,
            "account",
            account.id,
            json!({
                "name": account.name,
                "type": account.account_type,
                "openingBalance": account.balance,
            }),
        )
        .await;

        Ok(account)
    }

    /// Renames, re-currencies, or (de)activates an account.
    ///
    /// # Errors
    ///
    /// `AccountIdNotFound`, `EmptyAccountName` or `DuplicateAccountName`.
    pub async fn update_account(
        &self,
        actor: UserId,
        id: AccountId,
        mut update: AccountUpdate,
    ) -> Result<Account, LedgerError> {
        validate_account_update(&update)?;
        update.name = update.name.map(|n| n.trim().to_string());

        let account = self
            .store
            .update_account(id, &update)
            .await
            .map_err(|e| match LedgerError::from(e) {
                LedgerError::AccountNotFound(_) => LedgerError::AccountIdNotFound(id),
                other => other,
            })?;

        audit::record(
            self.store.as_ref(),
            actor,
            AuditAction::Update,
            "account",
            account.id,
            json!({
                "name": update.name,
                "currency": update.currency,
                "isActive": update.is_active,
            }),
        )
        .await;

        Ok(account)
    }

    /// Looks up an account by name.
    ///
    /// # Errors
    ///
    /// `AccountNotFound` if no account has that name.
    pub async fn get_account(&self, name: &str) -> Result<Account, LedgerError> {
        self.store
            .find_account_by_name(name)
            .await?
            .ok_or_else(|| LedgerError::AccountNotFound(name.to_string()))
    }

    /// Looks up an account by id.
    ///
    /// # Errors
    ///
    /// `AccountIdNotFound` if absent.
    pub async fn get_account_by_id(&self, id: AccountId) -> Result<Account, LedgerError> {
        self.store
            .find_account(id)
            .await?
            .ok_or(LedgerError::AccountIdNotFound(id))
    }

    /// Lists accounts ordered by name.
    ///
    /// # Errors
    ///
    /// Store failures only.
    pub async fn list_accounts(&self, filter: &AccountFilter) -> Result<Vec<Account>, LedgerError> {
        Ok(self.store.list_accounts(filter).await?)
    }

    /// Posts an entry and applies its balance change atomically.
    ///
    /// Posting against an unknown or inactive account records nothing.
    /// Generated entry numbers are retried on a uniqueness conflict;
    /// caller-supplied ones are not.
    ///
    /// # Errors
    ///
    /// Validation errors, `AccountNotFound`, `AccountInactive` or
    /// `DuplicateEntryNumber`.
    pub async fn post_entry(
        &self,
        actor: UserId,
        input: NewLedgerEntry,
    ) -> Result<PostedEntry, LedgerError> {
        validate_entry(&input)?;

        let now = Utc::now();
        let date = input.date.unwrap_or(now);
        let mut attempt = 0;

        let (entry, account) = loop {
            attempt += 1;
            let generated = input.entry_number.is_none();
            let entry_number = match &input.entry_number {
                Some(number) => number.trim().to_string(),
                None => numbering::next_number(self.store.as_ref(), numbering::ENTRY_PREFIX, date)
                    .await?,
            };

            let entry = LedgerEntry {
                id: LedgerEntryId::new(),
                entry_number,
                description: input.description.trim().to_string(),
                debit: input.debit,
                credit: input.credit,
                account_name: input.account_name.trim().to_string(),
                date,
                transaction_id: input.transaction_id,
                created_by: actor,
                created_at: now,
            };

            match self.store.post_entry(entry).await {
                Ok(posted) => break posted,
                Err(e)
                    if generated
                        && e.is_duplicate_of("ledger entry")
                        && attempt < numbering::MAX_ATTEMPTS =>
                {
                    tracing::warn!(attempt, "Generated entry number collided, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        };

        tracing::info!(
            entry_number = %entry.entry_number,
            account = %account.name,
            debit = %entry.debit,
            credit = %entry.credit,
            balance = %account.balance,
            "Ledger entry posted"
        );
        audit::record(
            self.store.as_ref(),
            actor,
            AuditAction::Post,
            "ledger_entry",
            entry.id,
            json!({
                "entryNumber": entry.entry_number,
                "accountName": entry.account_name,
                "debit": entry.debit,
                "credit": entry.credit,
            }),
        )
        .await;

        Ok(PostedEntry { entry, account })
    }

    /// Looks up a ledger entry.
    ///
    /// # Errors
    ///
    /// `EntryNotFound` if absent.
    pub async fn get_entry(&self, id: LedgerEntryId) -> Result<LedgerEntry, LedgerError> {
        self.store
            .find_entry(id)
            .await?
            .ok_or(LedgerError::EntryNotFound(id))
    }

    /// Lists ledger entries, newest first.
    ///
    /// # Errors
    ///
    /// Store failures only.
    pub async fn list_entries(&self, filter: &EntryFilter) -> Result<Vec<LedgerEntry>, LedgerError> {
        Ok(self.store.list_entries(filter).await?)
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
