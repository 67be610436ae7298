use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Cents, MAX_AMOUNT, Taxonomy, TaxonomyError};

pub type TransactionId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "income" | "in" => Some(TransactionKind::Income),
            "expense" | "out" => Some(TransactionKind::Expense),
            _ => None,
        }
    }

    /// Sign applied to an entered amount when the record is created.
    fn sign(&self) -> Cents {
        match self {
            TransactionKind::Income => 1,
            TransactionKind::Expense => -1,
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single income or expense entry. Records are never edited once created.
///
/// `value` carries the sign: positive for income, negative for expenses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub description: String,
    /// Signed amount in cents
    pub value: Cents,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub date: NaiveDate,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
}

impl Transaction {
    pub fn new(
        id: impl Into<TransactionId>,
        description: impl Into<String>,
        value: Cents,
        kind: TransactionKind,
        date: NaiveDate,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            value,
            kind,
            date,
            category: category.into(),
            subcategory: None,
        }
    }

    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// Unsigned magnitude of the record.
    pub fn amount(&self) -> Cents {
        self.value.saturating_abs()
    }

    /// Producer-side checks for a record arriving from outside (imports, stores).
    pub fn validate(&self, taxonomy: &Taxonomy) -> Result<(), RecordError> {
        if self.value == 0 {
            return Err(RecordError::NonPositiveAmount);
        }
        if self.value.unsigned_abs() > MAX_AMOUNT.unsigned_abs() {
            return Err(RecordError::AmountTooLarge(self.value));
        }
        if self.value.signum() != self.kind.sign() {
            return Err(RecordError::SignMismatch {
                kind: self.kind,
                value: self.value,
            });
        }
        check_labels(&self.description, &self.category)?;
        taxonomy.check(&self.category, self.subcategory.as_deref())?;
        Ok(())
    }
}

/// Draft of a transaction as entered by the user: unsigned amount plus a kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub amount: Cents,
    pub kind: TransactionKind,
    pub date: NaiveDate,
    pub description: String,
    pub category: String,
    pub subcategory: Option<String>,
}

impl NewTransaction {
    pub fn validate(&self, taxonomy: &Taxonomy) -> Result<(), RecordError> {
        if self.amount <= 0 {
            return Err(RecordError::NonPositiveAmount);
        }
        if self.amount > MAX_AMOUNT {
            return Err(RecordError::AmountTooLarge(self.amount));
        }
        check_labels(&self.description, &self.category)?;
        taxonomy.check(&self.category, self.subcategory.as_deref())?;
        Ok(())
    }

    /// Turn the draft into a record, applying the sign for the kind.
    pub fn into_transaction(self) -> Transaction {
        let value = self.amount.saturating_abs() * self.kind.sign();
        Transaction {
            id: Uuid::new_v4().to_string(),
            description: self.description.trim().to_string(),
            value,
            kind: self.kind,
            date: self.date,
            category: self.category,
            subcategory: self.subcategory,
        }
    }
}

fn check_labels(description: &str, category: &str) -> Result<(), RecordError> {
    if description.trim().is_empty() {
        return Err(RecordError::EmptyDescription);
    }
    if category.trim().is_empty() {
        return Err(RecordError::EmptyCategory);
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    NonPositiveAmount,
    AmountTooLarge(Cents),
    EmptyDescription,
    EmptyCategory,
    SignMismatch { kind: TransactionKind, value: Cents },
    Taxonomy(TaxonomyError),
}

impl From<TaxonomyError> for RecordError {
    fn from(err: TaxonomyError) -> Self {
        RecordError::Taxonomy(err)
    }
}

impl std::fmt::Display for RecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordError::NonPositiveAmount => write!(f, "amount must be greater than zero"),
            RecordError::AmountTooLarge(value) => {
                write!(f, "amount {} exceeds the limit of {}", value, MAX_AMOUNT)
            }
            RecordError::EmptyDescription => write!(f, "description is required"),
            RecordError::EmptyCategory => write!(f, "category is required"),
            RecordError::SignMismatch { kind, value } => {
                write!(f, "{} record has value {} with the wrong sign", kind, value)
            }
            RecordError::Taxonomy(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for RecordError {}
