//! Extraction schema
//!
//! Names the fixed navigation path to the instrument list and the tags that
//! map onto [`InstrumentField`]s, so a new publication schema version is a
//! configuration change rather than a code change.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::models::InstrumentField;

/// Mapping of one general-attributes tag onto a record field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeMapping {
    pub key: String,
    pub field: InstrumentField,
}

impl AttributeMapping {
    #[must_use]
    pub fn new(key: impl Into<String>, field: InstrumentField) -> Self {
        Self {
            key: key.into(),
            field,
        }
    }
}

/// Structure of the source documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionSchema {
    /// Free-form schema version label
    pub version: String,
    /// Keys navigated from the document root to the instrument list
    pub record_path: Vec<String>,
    /// Key carrying the issuer, read from each record section
    pub issuer_key: String,
    /// Key of the general-attributes block within each record section
    pub attributes_key: String,
    /// General-attributes tags that populate record fields
    pub attribute_fields: Vec<AttributeMapping>,
}

impl Default for ExtractionSchema {
    fn default() -> Self {
        Self {
            version: "DLTINS".to_string(),
            record_path: ["BizData", "Pyld", "Document", "FinInstrmRptgRefDataDltaRpt", "FinInstrm"]
                .into_iter()
                .map(String::from)
                .collect(),
            issuer_key: "Issr".to_string(),
            attributes_key: "FinInstrmGnlAttrbts".to_string(),
            attribute_fields: vec![
                AttributeMapping::new("Id", InstrumentField::Id),
                AttributeMapping::new("ClssfctnTp", InstrumentField::ClassificationType),
                AttributeMapping::new("CmmdtyDerivInd", InstrumentField::CommodityDerivativeFlag),
                AttributeMapping::new("FullNm", InstrumentField::FullName),
                AttributeMapping::new("NtnlCcy", InstrumentField::NotionalCurrency),
            ],
        }
    }
}

impl ExtractionSchema {
    /// Field populated by general-attributes tag `key`, if any
    #[must_use]
    pub fn field_for_attribute(&self, key: &str) -> Option<InstrumentField> {
        self.attribute_fields
            .iter()
            .find(|mapping| mapping.key == key)
            .map(|mapping| mapping.field)
    }

    /// Parse a schema from JSON; omitted keys take their default values
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }
}
