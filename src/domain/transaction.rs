use crate::domain::money::{check_amount, check_name};
use crate::error::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The closed set of transaction kinds, tagged by `type` on the wire.
///
/// An unrecognized discriminant cannot reach domain code: it is rejected at
/// deserialization, so no runtime "unreachable variant" fallback exists.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum TransactionKind {
    Income {
        amount: Decimal,
    },
    Buy {
        amount: Decimal,
        boardgame: String,
    },
    Sell {
        amount: Decimal,
        boardgame: String,
    },
    Swap {
        amount: Decimal,
        boardgame: String,
        boardgame_sent: String,
        amount_sent: Decimal,
    },
}

impl TransactionKind {
    /// Signed contribution of this transaction to the account balance.
    pub fn signed_delta(&self) -> Decimal {
        match self {
            TransactionKind::Income { amount } => *amount,
            TransactionKind::Buy { amount, .. } => -*amount,
            TransactionKind::Sell { amount, .. } => *amount,
            TransactionKind::Swap {
                amount,
                amount_sent,
                ..
            } => *amount - *amount_sent,
        }
    }

    /// Validates the per-kind field schema: non-negative amounts, boardgame
    /// names between 1 and 255 characters.
    pub fn validate(&self) -> Result<()> {
        match self {
            TransactionKind::Income { amount } => check_amount("amount", *amount),
            TransactionKind::Buy { amount, boardgame }
            | TransactionKind::Sell { amount, boardgame } => {
                check_amount("amount", *amount)?;
                check_name("boardgame", boardgame)
            }
            TransactionKind::Swap {
                amount,
                boardgame,
                boardgame_sent,
                amount_sent,
            } => {
                check_amount("amount", *amount)?;
                check_name("boardgame", boardgame)?;
                check_name("boardgame_sent", boardgame_sent)?;
                check_amount("amount_sent", *amount_sent)
            }
        }
    }
}

/// A transaction as stored by the backend. Immutable once created; the
/// ledger never mutates these, it only decorates copies.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct TransactionRecord {
    /// Opaque identifier assigned by the backend.
    pub id: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(flatten)]
    pub kind: TransactionKind,
}

impl TransactionRecord {
    pub fn validate(&self) -> Result<()> {
        self.kind.validate()
    }
}

/// Input for creating a transaction; the backend assigns the `id`.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct NewTransaction {
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(flatten)]
    pub kind: TransactionKind,
}

impl NewTransaction {
    pub fn validate(&self) -> Result<()> {
        self.kind.validate()
    }
}

/// A transaction decorated with the running account balance up to and
/// including itself.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct LedgerEntry {
    #[serde(flatten)]
    pub record: TransactionRecord,
    pub balance: Decimal,
}
