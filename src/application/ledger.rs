use crate::domain::money::round_money;
use crate::domain::transaction::{LedgerEntry, TransactionRecord};
use crate::error::Result;
use rust_decimal::Decimal;

/// Computes the running-balance ledger for an unordered transaction history.
///
/// Every record is validated up front; the first schema violation aborts the
/// whole computation and no partial ledger is returned. Valid records are
/// ordered by ascending date (stable, so equal dates keep input order), then
/// folded with a running total that starts at zero: each entry's balance is
/// the rounded cumulative signed sum up to and including itself, and the
/// rounded value is what carries forward.
///
/// The result is newest-first; among equal dates, latest-inserted-first.
/// Pure and idempotent: same input, same output, no I/O.
pub fn compute_ledger(records: Vec<TransactionRecord>) -> Result<Vec<LedgerEntry>> {
    for record in &records {
        record.validate()?;
    }

    let mut sorted = records;
    sorted.sort_by(|a, b| a.date.cmp(&b.date));

    let mut running = Decimal::ZERO;
    let mut entries = Vec::with_capacity(sorted.len());
    for record in sorted {
        running = round_money(running + record.kind.signed_delta());
        entries.push(LedgerEntry {
            record,
            balance: running,
        });
    }

    entries.reverse();
    Ok(entries)
}
