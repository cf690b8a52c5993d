//! Type definitions of a low-level SQL string representation.
//!
//! Syntax only ever comes from fixed templates and table references that have been checked
//! against the catalog. Values supplied by a caller are bound as named parameters.

use query_engine_metadata::metadata::{Dataset, TableName};

/// A SQL statement and the parameters bound to it, in order of appearance.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SQL {
    pub sql: String,
    pub params: Vec<(&'static str, Param)>,
}

/// A parameter for a parameterized query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    /// A `STRING` value.
    String(String),
    /// A `DATE` value in `YYYY-MM-DD` form, or a typed `NULL`.
    Date(Option<String>),
}

impl Param {
    /// The warehouse type the parameter is bound as.
    pub fn type_name(&self) -> &'static str {
        match self {
            Param::String(_) => "STRING",
            Param::Date(_) => "DATE",
        }
    }

    /// The bound value, `None` for `NULL`.
    pub fn value(&self) -> Option<&str> {
        match self {
            Param::String(value) => Some(value),
            Param::Date(value) => value.as_deref(),
        }
    }
}

/// A table or view that may appear in a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableReference {
    /// A table from the allow-list.
    Allowed(TableName),
    /// One of the fixed catalog views.
    View(&'static str),
}

impl TableReference {
    pub fn name(&self) -> &'static str {
        match self {
            TableReference::Allowed(table) => table.as_str(),
            TableReference::View(view) => view,
        }
    }
}

impl SQL {
    pub fn new() -> SQL {
        SQL {
            sql: String::new(),
            params: vec![],
        }
    }

    pub fn append_syntax(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }

    /// Append the fully-qualified name of a table in the dataset.
    pub fn append_table(&mut self, dataset: &Dataset, table: TableReference) {
        self.sql.push_str(&dataset.qualify(table.name()));
    }

    /// Append a reference to a named parameter and bind its value.
    ///
    /// Binding the same name twice reuses the first binding, so a parameter can be
    /// referenced more than once in a statement.
    pub fn append_param(&mut self, name: &'static str, param: Param) {
        self.sql.push('@');
        self.sql.push_str(name);
        if !self.params.iter().any(|(bound, _)| *bound == name) {
            self.params.push((name, param));
        }
    }

    /// Append a reference to a parameter that has already been bound.
    pub fn append_param_reference(&mut self, name: &'static str) {
        debug_assert!(
            self.params.iter().any(|(bound, _)| *bound == name),
            "parameter {name} referenced before being bound"
        );
        self.sql.push('@');
        self.sql.push_str(name);
    }

    pub fn param_names(&self) -> Vec<&'static str> {
        self.params.iter().map(|(name, _)| *name).collect()
    }
}
