use crate::model::DimensionId;

/// Dimensions reported for each visit, in column order.
///
/// Defaults to the time, distance, load and landing tracks; the visit counter
/// is left out.
///
/// # Examples
/// ```
/// use sortie_core::{DimensionId, ReportColumns};
///
/// let columns = ReportColumns::new([DimensionId::Load, DimensionId::GlobalTime]);
/// assert_eq!(columns.as_slice(), &[DimensionId::Load, DimensionId::GlobalTime]);
/// assert_eq!(ReportColumns::default().as_slice().len(), 6);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportColumns {
    columns: Vec<DimensionId>,
}

impl ReportColumns {
    /// Report `columns`, dropping repeats.
    pub fn new(columns: impl IntoIterator<Item = DimensionId>) -> Self {
        let mut unique = Vec::new();
        for id in columns {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        Self { columns: unique }
    }

    /// Selected dimensions.
    #[must_use]
    pub fn as_slice(&self) -> &[DimensionId] {
        &self.columns
    }

    /// Selected dimensions, by value.
    pub fn iter(&self) -> impl Iterator<Item = DimensionId> + '_ {
        self.columns.iter().copied()
    }
}

impl Default for ReportColumns {
    fn default() -> Self {
        Self::new([
            DimensionId::GlobalTime,
            DimensionId::GlobalDistance,
            DimensionId::ReloadTime,
            DimensionId::ReloadDistance,
            DimensionId::Load,
            DimensionId::Landing,
        ])
    }
}
