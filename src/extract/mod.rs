//! Record extraction
//!
//! Projects a parsed publication onto flat [`InstrumentRecord`]s. Extraction
//! is pure: the same document always yields the same records.
//!
//! The instrument list is reached through the schema's fixed navigation path.
//! Each entry of that list is a mapping of record sections (`NewRcrd`,
//! `ModfdRcrd`, ...), and each section contributes the issuer and the general
//! attributes it carries. One record is emitted per section of an entry, and
//! every copy carries the entry's fully populated values.

use std::path::Path;

use crate::config::ExtractionSchema;
use crate::document::{Node, RawDocument};
use crate::error::ExtractionError;
use crate::models::{InstrumentField, InstrumentRecord};

/// Extracts instrument records from documents following an [`ExtractionSchema`]
#[derive(Debug, Clone, Default)]
pub struct RecordExtractor {
    schema: ExtractionSchema,
}

impl RecordExtractor {
    #[must_use]
    pub fn new(schema: ExtractionSchema) -> Self {
        Self { schema }
    }

    /// Extract every instrument record of `doc`
    ///
    /// An instrument list that is present but empty yields an empty vector.
    ///
    /// # Errors
    /// Returns [`ExtractionError::SchemaMismatch`] if the navigation path is
    /// absent and [`ExtractionError::Malformed`] if an entry has an
    /// unexpected shape.
    pub fn extract(&self, doc: &RawDocument) -> Result<Vec<InstrumentRecord>, ExtractionError> {
        let file = doc.source();
        let list = self.navigate(doc)?;

        let entries = list.items().ok_or_else(|| {
            malformed(
                file,
                format!(
                    "expected a sequence of instrument entries at '{}', found {}",
                    self.schema.record_path.join("/"),
                    list.kind()
                ),
            )
        })?;

        let mut records = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            let (record, sections) = self.project_entry(file, index, entry)?;
            records.extend(std::iter::repeat_n(record, sections));
        }

        log::debug!(
            "Extracted {} records from {}",
            records.len(),
            file.display()
        );
        Ok(records)
    }

    /// Follow the fixed navigation path down to the instrument list
    fn navigate<'a>(&self, doc: &'a RawDocument) -> Result<&'a Node, ExtractionError> {
        let mut current = doc.root();
        for segment in &self.schema.record_path {
            current = current
                .get(segment)
                .ok_or_else(|| ExtractionError::SchemaMismatch {
                    file: doc.source().to_path_buf(),
                    segment: segment.clone(),
                })?;
        }
        Ok(current)
    }

    /// Populate one record from an entry; returns it with the number of
    /// sections it must be emitted for
    fn project_entry(
        &self,
        file: &Path,
        index: usize,
        entry: &Node,
    ) -> Result<(InstrumentRecord, usize), ExtractionError> {
        let sections = entry.as_map().ok_or_else(|| {
            malformed(
                file,
                format!("instrument entry {index} is {}, expected a mapping", entry.kind()),
            )
        })?;

        let mut record = InstrumentRecord::empty();
        for (name, section) in sections.iter() {
            let fields = section.as_map().ok_or_else(|| {
                malformed(
                    file,
                    format!(
                        "section '{name}' of instrument entry {index} is {}, expected a mapping",
                        section.kind()
                    ),
                )
            })?;

            for (key, value) in fields.iter() {
                if key == self.schema.issuer_key {
                    record.set(InstrumentField::Issuer, field_text(value));
                } else if key == self.schema.attributes_key {
                    self.apply_attributes(file, &mut record, value)?;
                }
            }
        }

        Ok((record, sections.len()))
    }

    fn apply_attributes(
        &self,
        file: &Path,
        record: &mut InstrumentRecord,
        attributes: &Node,
    ) -> Result<(), ExtractionError> {
        let attributes = attributes.as_map().ok_or_else(|| {
            malformed(
                file,
                format!(
                    "'{}' is {}, expected a mapping",
                    self.schema.attributes_key,
                    attributes.kind()
                ),
            )
        })?;

        for (key, value) in attributes.iter() {
            if let Some(field) = self.schema.field_for_attribute(key) {
                record.set(field, field_text(value));
            }
        }
        Ok(())
    }
}

/// String value of a mapped field: its text, or empty when the element
/// carries none (attribute-only or nested elements)
fn field_text(value: &Node) -> &str {
    value.scalar().unwrap_or_default()
}

fn malformed(file: &Path, detail: String) -> ExtractionError {
    ExtractionError::Malformed {
        file: file.to_path_buf(),
        detail,
    }
}
