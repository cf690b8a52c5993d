//! Tables and datasets in the warehouse.

/// Tables and views that may be read through the generic table endpoints.
///
/// This list is an audited restriction. It is matched exactly and case-sensitively, and is
/// never derived from the warehouse's own metadata.
pub const ALLOWED_TABLES: [&str; 5] = [
    "FAT_ARMADILHA_PSILIDEO",
    "DIM_EMPERP",
    "DIM_TALHAO_PIMS",
    "V_INDICADORES_MERCADO_DIARIO",
    "indicadores_mercado_ultima",
];

/// The requested table is not in [`ALLOWED_TABLES`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("table not allowed or missing")]
pub struct TableNotAllowed;

/// The name of an allow-listed table or view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableName(&'static str);

impl TableName {
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl TryFrom<&str> for TableName {
    type Error = TableNotAllowed;

    /// Surrounding whitespace is ignored. An empty name is never allowed.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let value = value.trim();
        ALLOWED_TABLES
            .into_iter()
            .find(|allowed| *allowed == value)
            .map(TableName)
            .ok_or(TableNotAllowed)
    }
}

impl std::fmt::Display for TableName {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A BigQuery dataset, addressed as `project.dataset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pub project_id: String,
    pub dataset_id: String,
}

impl Dataset {
    pub fn new(project_id: impl Into<String>, dataset_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            dataset_id: dataset_id.into(),
        }
    }

    /// The fully-qualified, backtick-quoted reference to a table or view in this dataset.
    pub fn qualify(&self, table: &str) -> String {
        format!("`{}.{}.{}`", self.project_id, self.dataset_id, table)
    }
}
