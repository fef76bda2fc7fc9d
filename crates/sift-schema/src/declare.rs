//! `CREATE TABLE` / `CREATE INDEX` rendering for declared tables.

use crate::{Index, Table};

/// Options for [`Table::create_statements`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CreateFlags {
    /// Emit `create temporary table`.
    pub temporary: bool,
}

impl CreateFlags {
    pub const TEMPORARY: CreateFlags = CreateFlags { temporary: true };
}

impl Table {
    /// Render the table definition followed by one statement per index.
    ///
    /// Column names, types and attributes are laid out as aligned cells.
    pub fn create_statements(&self, flags: CreateFlags) -> String {
        let temporary = if flags.temporary { "temporary " } else { "" };
        let mut out = format!("create {}table {} (", temporary, self.name);

        let mut grid: Vec<Vec<String>> = Vec::with_capacity(self.columns.len());
        let mut widths: Vec<usize> = Vec::new();
        for col in &self.columns {
            let mut row = vec![col.name.clone()];
            if !col.column_type.is_untyped() {
                row.push(col.column_type.to_string());
            }

            let mut attrs = Vec::new();
            if !col.nullable {
                attrs.push("not null".to_string());
            }
            if let Some(default) = &col.default {
                attrs.push(format!("default {}", default.sql_literal()));
            }
            if !attrs.is_empty() {
                // keep the attribute cell in the third column for untyped columns
                if row.len() < 2 {
                    row.push(String::new());
                }
                row.push(attrs.join(" "));
            }

            measure_cells(&row, &mut widths);
            grid.push(row);
        }

        let mut first = true;
        let mut next_line = |out: &mut String| {
            if !first {
                out.push(',');
            }
            first = false;
            out.push_str("\n    ");
        };

        for row in &grid {
            next_line(&mut out);
            for (i, cell) in row.iter().enumerate() {
                if i > 0 {
                    out.push_str("  ");
                }
                let adv = measure_cell(cell);
                let width = widths.get(i).copied().unwrap_or(0).max(adv);
                out.push_str(cell);
                if width > adv && i + 1 < row.len() {
                    out.push_str(&" ".repeat(width - adv));
                }
            }
        }

        if !self.pk.is_empty() {
            next_line(&mut out);
            out.push_str(&format!("primary key ({})", self.pk.join(",")));
        }

        out.push_str("\n)");
        let mut options = Vec::new();
        if self.without_rowid {
            options.push("without rowid");
        }
        if self.strict {
            options.push("strict");
        }
        if !options.is_empty() {
            out.push(' ');
            out.push_str(&options.join(", "));
        }
        out.push_str(";\n");

        for idx in &self.indices {
            out.push_str(&self.create_index_statement(idx));
            out.push('\n');
        }
        out
    }

    /// Render a single `create index` statement for `idx` on this table.
    ///
    /// An index without a name gets `<table>_<col1>_..._index`.
    pub fn create_index_statement(&self, idx: &Index) -> String {
        let name = if idx.name.is_empty() {
            format!("{}_{}_index", self.name, idx.columns.join("_"))
        } else {
            idx.name.clone()
        };
        let unique = if idx.unique { "unique " } else { "" };
        format!(
            "create {}index {} on {}({});",
            unique,
            name,
            self.name,
            idx.columns.join(",")
        )
    }
}

/// Printable width of a cell.
fn measure_cell(s: &str) -> usize {
    s.chars().count()
}

fn measure_cells(row: &[String], widths: &mut Vec<usize>) {
    for (i, cell) in row.iter().enumerate() {
        let w = measure_cell(cell);
        if i < widths.len() {
            widths[i] = widths[i].max(w);
        } else {
            widths.push(w);
        }
    }
}
