//! Compatibility checks between a discovered table and a required schema.

use crate::{
    Column, IncompatibleColumns, IncompatibleIndices, Index, IndicesError, MissingColumns,
    MissingIndices, Table, TableColumnsError,
};

impl Table {
    /// Check that every required column exists and is compatible.
    ///
    /// All problems are collected; the reported name lists are sorted.
    pub fn check_columns(&self, required: &[Column]) -> Result<(), TableColumnsError> {
        let have = self.column_mapping();
        let mut missing = Vec::new();
        let mut incompatible = Vec::new();
        for want in required {
            match have.get(want.name.as_str()) {
                None => missing.push(want.name.clone()),
                Some(col) if !col.compatible_to(want) => incompatible.push(want.name.clone()),
                Some(_) => {}
            }
        }
        if missing.is_empty() && incompatible.is_empty() {
            return Ok(());
        }
        missing.sort();
        incompatible.sort();
        Err(TableColumnsError {
            missing: MissingColumns(missing),
            incompatible: IncompatibleColumns(incompatible),
        })
    }

    /// Check that every required index exists and is compatible.
    pub fn check_indices(&self, required: &[Index]) -> Result<(), IndicesError> {
        let mut missing = Vec::new();
        let mut incompatible = Vec::new();
        for want in required {
            match self.find_index(&want.name) {
                None => missing.push(want.name.clone()),
                Some(idx) if !idx.compatible_to(want) => incompatible.push(want.name.clone()),
                Some(_) => {}
            }
        }
        if missing.is_empty() && incompatible.is_empty() {
            return Ok(());
        }
        missing.sort();
        incompatible.sort();
        Err(IndicesError {
            missing: MissingIndices(missing),
            incompatible: IncompatibleIndices(incompatible),
        })
    }

    /// Resolve a projection list against the table's columns.
    ///
    /// A `?` prefix marks a column optional: when absent it is projected as
    /// `NULL` instead. The literal `NULL` passes through untouched. Empty
    /// entries are skipped.
    pub fn validate_columns<I, S>(&self, names: I) -> ColumnValidation
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let have = self.column_names();
        let mut out = ColumnValidation::default();
        for n in names {
            let n = n.as_ref();
            if n.is_empty() {
                continue;
            }
            if n == "NULL" {
                out.validated.push(n.to_string());
                continue;
            }
            let (name, optional) = match n.strip_prefix('?') {
                Some(rest) => (rest, true),
                None => (n, false),
            };
            if have.contains(name) {
                out.validated.push(name.to_string());
            } else if optional {
                out.validated.push("NULL".to_string());
                out.optional_missing.push(name.to_string());
            } else {
                out.missing.0.push(name.to_string());
            }
        }
        out
    }
}

/// Outcome of [`Table::validate_columns`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnValidation {
    /// Projection list, with absent optional columns replaced by `NULL`.
    pub validated: Vec<String>,
    /// Optional columns that were absent.
    pub optional_missing: Vec<String>,
    /// Mandatory columns that were absent.
    pub missing: MissingColumns,
}

impl ColumnValidation {
    /// The projection list, or the mandatory columns that were absent.
    pub fn into_result(self) -> Result<Vec<String>, MissingColumns> {
        if self.missing.is_empty() {
            Ok(self.validated)
        } else {
            Err(self.missing)
        }
    }
}
