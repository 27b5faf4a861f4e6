use crate::domain::{InventoryCode, Transaction, TransactionRow};
use crate::engine::{
    build_dashboard, compute_inventory_prices, compute_open_positions, existing_codes,
    validate_and_build_rows, Dashboard, EngineError, InventoryPrice, Position, PositionFilter,
};
use crate::store::LedgerStore;
use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{info, warn};

/// Entry point for every caller-facing ledger operation.
///
/// Submissions are serialized: the ledger read used for validation and the
/// append of the resulting rows happen under one lock, so two submissions
/// through the same desk cannot both spend the same open lots. An append
/// that outlives the store timeout keeps that lock until it settles.
#[derive(Debug)]
pub struct HedgeDesk {
    store: Arc<dyn LedgerStore>,
    submit_lock: Arc<Mutex<()>>,
    store_timeout: Duration,
}

#[derive(Debug, Error)]
pub enum DeskError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("Ledger store unavailable: {0}")]
    StoreUnavailable(String),
    /// The append was still running when the caller stopped waiting. The
    /// rows may or may not be recorded; check the entries before resending.
    #[error("Ledger append did not finish in time: {0}")]
    AppendOutcomeUnknown(String),
}

impl DeskError {
    pub fn kind(&self) -> &'static str {
        match self {
            DeskError::Engine(e) => e.kind(),
            DeskError::StoreUnavailable(_) => "StoreUnavailable",
            DeskError::AppendOutcomeUnknown(_) => "AppendOutcomeUnknown",
        }
    }

    /// True when resubmitting the same input unchanged may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DeskError::StoreUnavailable(_))
    }
}

impl HedgeDesk {
    pub fn new(store: Arc<dyn LedgerStore>, store_timeout: Duration) -> Self {
        Self {
            store,
            submit_lock: Arc::new(Mutex::new(())),
            store_timeout,
        }
    }

    async fn with_timeout<T, F>(&self, op: &'static str, fut: F) -> Result<T, DeskError>
    where
        F: Future<Output = Result<T, crate::store::StoreError>>,
    {
        match tokio::time::timeout(self.store_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                warn!(op, error = %e, "Ledger store call failed");
                Err(DeskError::StoreUnavailable(e.to_string()))
            }
            Err(_) => {
                warn!(op, timeout_ms = self.store_timeout.as_millis() as u64, "Ledger store call timed out");
                Err(DeskError::StoreUnavailable(format!(
                    "{} timed out after {}ms",
                    op,
                    self.store_timeout.as_millis()
                )))
            }
        }
    }

    async fn read_ledger(&self) -> Result<Vec<TransactionRow>, DeskError> {
        self.with_timeout("read_all", self.store.read_all()).await
    }

    /// Open positions, optionally restricted to one commodity and contract.
    pub async fn get_open_positions(
        &self,
        commodity: Option<&str>,
        contract: Option<&str>,
    ) -> Result<Vec<Position>, DeskError> {
        let rows = self.read_ledger().await?;
        Ok(compute_open_positions(
            &rows,
            &PositionFilter::new(commodity, contract),
        ))
    }

    pub async fn get_inventory_prices(
        &self,
        codes: &HashSet<InventoryCode>,
    ) -> Result<Vec<InventoryPrice>, DeskError> {
        if codes.is_empty() {
            return Ok(Vec::new());
        }
        let rows = self.read_ledger().await?;
        Ok(compute_inventory_prices(&rows, codes))
    }

    /// Validate a transaction against a fresh ledger read and append its rows.
    ///
    /// Returns the rows that were appended. On a validation or read error
    /// nothing is written.
    pub async fn submit_transaction(
        &self,
        tx: &Transaction,
    ) -> Result<Vec<TransactionRow>, DeskError> {
        let guard = Arc::clone(&self.submit_lock).lock_owned().await;

        let ledger = self.read_ledger().await?;
        let filter = PositionFilter::new(Some(tx.commodity.as_str()), Some(tx.contract.as_str()));
        let positions = compute_open_positions(&ledger, &filter);
        let codes = existing_codes(&ledger);

        let rows = validate_and_build_rows(tx, &positions, &codes).map_err(|e| {
            info!(
                reason = %tx.reason,
                lots = %tx.lots,
                kind = e.kind(),
                error = %e,
                "Transaction rejected"
            );
            e
        })?;

        self.append_rows(rows.clone(), guard).await?;

        info!(
            reason = %tx.reason,
            commodity = %tx.commodity,
            contract = %tx.contract,
            lots = %tx.lots,
            rows = rows.len(),
            "Transaction recorded"
        );
        Ok(rows)
    }

    /// Append on a task of its own so a timeout never abandons a write
    /// halfway. If the caller stops waiting, `guard` moves to a watcher that
    /// holds it until the write settles, and the next submission reads a
    /// ledger that already includes these rows.
    async fn append_rows(
        &self,
        rows: Vec<TransactionRow>,
        guard: OwnedMutexGuard<()>,
    ) -> Result<(), DeskError> {
        let store = Arc::clone(&self.store);
        let mut append = tokio::spawn(async move { store.append_batch(&rows).await });

        match tokio::time::timeout(self.store_timeout, &mut append).await {
            Ok(Ok(Ok(()))) => Ok(()),
            Ok(Ok(Err(e))) => {
                warn!(op = "append_batch", error = %e, "Ledger store call failed");
                Err(DeskError::StoreUnavailable(e.to_string()))
            }
            Ok(Err(e)) => {
                warn!(op = "append_batch", error = %e, "Ledger append task failed");
                Err(DeskError::AppendOutcomeUnknown(e.to_string()))
            }
            Err(_) => {
                let timeout_ms = self.store_timeout.as_millis() as u64;
                warn!(op = "append_batch", timeout_ms, "Ledger append still running");
                tokio::spawn(async move {
                    let _guard = guard;
                    match append.await {
                        Ok(Ok(())) => info!("Late ledger append completed"),
                        Ok(Err(e)) => warn!(error = %e, "Late ledger append failed"),
                        Err(e) => warn!(error = %e, "Late ledger append task failed"),
                    }
                });
                Err(DeskError::AppendOutcomeUnknown(format!(
                    "append_batch still running after {}ms",
                    timeout_ms
                )))
            }
        }
    }

    /// Every ledger row in append order.
    pub async fn get_entries(&self) -> Result<Vec<TransactionRow>, DeskError> {
        self.read_ledger().await
    }

    pub async fn get_dashboard(&self) -> Result<Dashboard, DeskError> {
        let rows = self.read_ledger().await?;
        Ok(build_dashboard(&rows))
    }
}
