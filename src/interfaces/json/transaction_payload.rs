use crate::domain::transaction::{NewTransaction, TransactionRecord};
use crate::error::{Result, TrackerError};

/// Parses the transaction store's GET payload: a JSON array of records.
/// Every record must satisfy its per-kind schema or the whole payload is
/// rejected.
pub fn parse_transaction_list(body: &str) -> Result<Vec<TransactionRecord>> {
    let records: Vec<TransactionRecord> = serde_json::from_str(body)
        .map_err(|err| TrackerError::schema("transactions", err.to_string()))?;
    for record in &records {
        record.validate()?;
    }
    Ok(records)
}

/// Parses the record returned by a POST, now carrying its assigned id.
pub fn parse_stored_transaction(body: &str) -> Result<TransactionRecord> {
    let record: TransactionRecord = serde_json::from_str(body)
        .map_err(|err| TrackerError::schema("transaction", err.to_string()))?;
    record.validate()?;
    Ok(record)
}

/// Encodes a POST body for a new transaction, validating it first.
pub fn encode_new_transaction(input: &NewTransaction) -> Result<String> {
    input.validate()?;
    Ok(serde_json::to_string(input)?)
}
