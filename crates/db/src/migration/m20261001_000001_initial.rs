//! Initial schema: accounts, ledger, transactions, invoices, insights and the
//! audit trail.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(ACCOUNTS_SQL).await?;
        db.execute_unprepared(LEDGER_ENTRIES_SQL).await?;
        db.execute_unprepared(TRANSACTIONS_SQL).await?;
        db.execute_unprepared(INVOICES_SQL).await?;
        db.execute_unprepared(AI_INSIGHTS_SQL).await?;
        db.execute_unprepared(AUDIT_LOGS_SQL).await?;
        db.execute_unprepared(NUMBER_SEQUENCES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL UNIQUE,
    account_type VARCHAR(20) NOT NULL
        CHECK (account_type IN ('asset', 'liability', 'equity', 'revenue', 'expense')),
    balance NUMERIC(19, 4) NOT NULL DEFAULT 0,
    currency CHAR(3) NOT NULL DEFAULT 'USD',
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_accounts_type ON accounts(account_type);
";

const LEDGER_ENTRIES_SQL: &str = r"
-- Entries are immutable; exactly one side carries a positive amount
CREATE TABLE ledger_entries (
    id UUID PRIMARY KEY,
    entry_number VARCHAR(50) NOT NULL UNIQUE,
    description TEXT NOT NULL,
    debit NUMERIC(19, 4) NOT NULL DEFAULT 0,
    credit NUMERIC(19, 4) NOT NULL DEFAULT 0,
    account_name VARCHAR(255) NOT NULL
        REFERENCES accounts(name) ON UPDATE CASCADE ON DELETE RESTRICT,
    entry_date TIMESTAMPTZ NOT NULL,
    transaction_id UUID,
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_entry_non_negative CHECK (debit >= 0 AND credit >= 0),
    CONSTRAINT chk_entry_one_side CHECK ((debit > 0) <> (credit > 0))
);

CREATE INDEX idx_ledger_entries_account ON ledger_entries(account_name, entry_date DESC);
CREATE INDEX idx_ledger_entries_transaction ON ledger_entries(transaction_id)
    WHERE transaction_id IS NOT NULL;
";

const TRANSACTIONS_SQL: &str = r"
CREATE TABLE transactions (
    id UUID PRIMARY KEY,
    transaction_number VARCHAR(50) NOT NULL UNIQUE,
    description TEXT NOT NULL,
    amount NUMERIC(19, 4) NOT NULL,
    currency CHAR(3) NOT NULL DEFAULT 'USD',
    transaction_type VARCHAR(20) NOT NULL
        CHECK (transaction_type IN ('income', 'expense', 'transfer', 'adjustment')),
    category VARCHAR(255) NOT NULL,
    status VARCHAR(20) NOT NULL DEFAULT 'pending'
        CHECK (status IN ('pending', 'completed', 'cancelled')),
    transaction_date TIMESTAMPTZ NOT NULL,
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_transactions_date ON transactions(transaction_date DESC);
CREATE INDEX idx_transactions_category ON transactions(category);
";

const INVOICES_SQL: &str = r"
CREATE TABLE invoices (
    id UUID PRIMARY KEY,
    invoice_number VARCHAR(50) NOT NULL UNIQUE,
    client_name VARCHAR(255) NOT NULL,
    amount NUMERIC(19, 4) NOT NULL CHECK (amount > 0),
    currency CHAR(3) NOT NULL DEFAULT 'USD',
    issue_date TIMESTAMPTZ NOT NULL,
    due_date TIMESTAMPTZ NOT NULL,
    status VARCHAR(20) NOT NULL DEFAULT 'pending'
        CHECK (status IN ('pending', 'paid', 'overdue', 'cancelled')),
    invoice_type VARCHAR(30) NOT NULL
        CHECK (invoice_type IN ('accounts_receivable', 'accounts_payable')),
    notes TEXT,
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_due_after_issue CHECK (due_date >= issue_date)
);

CREATE INDEX idx_invoices_issue_date ON invoices(issue_date DESC);
CREATE INDEX idx_invoices_open ON invoices(due_date) WHERE status IN ('pending', 'overdue');
";

const AI_INSIGHTS_SQL: &str = r"
CREATE TABLE ai_insights (
    id UUID PRIMARY KEY,
    insight_type VARCHAR(20) NOT NULL
        CHECK (insight_type IN ('anomaly', 'prediction', 'recommendation', 'optimization')),
    title VARCHAR(255) NOT NULL,
    description TEXT NOT NULL,
    severity VARCHAR(20) NOT NULL DEFAULT 'info'
        CHECK (severity IN ('info', 'warning', 'critical')),
    data JSONB NOT NULL DEFAULT '{}'::jsonb,
    is_read BOOLEAN NOT NULL DEFAULT false,
    dedup_key VARCHAR(64) NOT NULL UNIQUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_ai_insights_created ON ai_insights(created_at DESC);
CREATE INDEX idx_ai_insights_unread ON ai_insights(created_at DESC) WHERE is_read = false;
";

const AUDIT_LOGS_SQL: &str = r"
CREATE TABLE audit_logs (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL,
    action VARCHAR(20) NOT NULL,
    entity_type VARCHAR(50) NOT NULL,
    entity_id VARCHAR(100) NOT NULL,
    details JSONB NOT NULL DEFAULT '{}'::jsonb,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_audit_logs_entity ON audit_logs(entity_type, entity_id, created_at DESC);
";

const NUMBER_SEQUENCES_SQL: &str = r"
CREATE TABLE number_sequences (
    prefix VARCHAR(10) NOT NULL,
    period CHAR(6) NOT NULL,
    last_value INTEGER NOT NULL,
    PRIMARY KEY (prefix, period)
);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS number_sequences CASCADE;
DROP TABLE IF EXISTS audit_logs CASCADE;
DROP TABLE IF EXISTS ai_insights CASCADE;
DROP TABLE IF EXISTS invoices CASCADE;
DROP TABLE IF EXISTS transactions CASCADE;
DROP TABLE IF EXISTS ledger_entries CASCADE;
DROP TABLE IF EXISTS accounts CASCADE;
";
