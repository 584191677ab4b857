//! Consolidated dataset model

use super::instrument::InstrumentRecord;

/// All records of a batch, in input-file order then within-file order.
///
/// Built once by the batch coordinator and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsolidatedDataset {
    records: Vec<InstrumentRecord>,
}

impl ConsolidatedDataset {
    #[must_use]
    pub fn new(records: Vec<InstrumentRecord>) -> Self {
        Self { records }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, InstrumentRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a ConsolidatedDataset {
    type Item = &'a InstrumentRecord;
    type IntoIter = std::slice::Iter<'a, InstrumentRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
