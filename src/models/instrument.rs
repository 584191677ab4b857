//! Instrument reference record model
//!
//! One flattened description of a financial instrument. Every record carries
//! all six fields; fields absent from the source are empty strings.

use serde::{Deserialize, Serialize};

/// Column of an [`InstrumentRecord`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentField {
    /// Instrument identifier (ISIN)
    Id,
    /// Full instrument name
    FullName,
    /// CFI classification code
    ClassificationType,
    /// Commodity derivative indicator, kept verbatim ("true"/"false")
    CommodityDerivativeFlag,
    /// Notional currency
    NotionalCurrency,
    /// Issuer LEI
    Issuer,
}

impl InstrumentField {
    /// All fields in output column order
    pub const ALL: [Self; 6] = [
        Self::Id,
        Self::FullName,
        Self::ClassificationType,
        Self::CommodityDerivativeFlag,
        Self::NotionalCurrency,
        Self::Issuer,
    ];

    /// Column name used in serialized output
    #[must_use]
    pub const fn column_name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::FullName => "full_name",
            Self::ClassificationType => "classification_type",
            Self::CommodityDerivativeFlag => "commodity_derivative_flag",
            Self::NotionalCurrency => "notional_currency",
            Self::Issuer => "issuer",
        }
    }
}

/// Flat instrument reference record.
///
/// Field declaration order is the serialized column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstrumentRecord {
    pub id: String,
    pub full_name: String,
    pub classification_type: String,
    pub commodity_derivative_flag: String,
    pub notional_currency: String,
    pub issuer: String,
}

impl InstrumentRecord {
    /// Record with every field set to the empty string
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, field: InstrumentField) -> &str {
        match field {
            InstrumentField::Id => &self.id,
            InstrumentField::FullName => &self.full_name,
            InstrumentField::ClassificationType => &self.classification_type,
            InstrumentField::CommodityDerivativeFlag => &self.commodity_derivative_flag,
            InstrumentField::NotionalCurrency => &self.notional_currency,
            InstrumentField::Issuer => &self.issuer,
        }
    }

    pub fn set(&mut self, field: InstrumentField, value: impl Into<String>) {
        let slot = match field {
            InstrumentField::Id => &mut self.id,
            InstrumentField::FullName => &mut self.full_name,
            InstrumentField::ClassificationType => &mut self.classification_type,
            InstrumentField::CommodityDerivativeFlag => &mut self.commodity_derivative_flag,
            InstrumentField::NotionalCurrency => &mut self.notional_currency,
            InstrumentField::Issuer => &mut self.issuer,
        };
        *slot = value.into();
    }

    /// Values in output column order
    #[must_use]
    pub fn values(&self) -> [&str; 6] {
        InstrumentField::ALL.map(|field| self.get(field))
    }
}
