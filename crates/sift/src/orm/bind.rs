//! Declarative binding of record fields to table columns.
//!
//! A record lists its fields once, in order, each with a directive:
//!
//! | directive | meaning                                                  |
//! |-----------|----------------------------------------------------------|
//! | `""`      | not bound                                                |
//! | `name`    | mandatory column                                         |
//! | `?name`   | optional column                                          |
//! | `a\|b`    | first of the alternatives present in the table           |
//! | `!`       | embedded record, descend with its own directives         |
//! | `?`       | embedded record, every field below it becomes optional   |
//!
//! ```ignore
//! #[derive(Default)]
//! struct User {
//!     id: i64,
//!     email: Option<String>,
//!     audit: Audit,
//! }
//!
//! impl Record for User {
//!     fn fields(fields: &mut Fields<Self>) {
//!         fields
//!             .field("id", |u| &mut u.id)
//!             .field("?email|mail", |u| &mut u.email)
//!             .group("?", |u| &mut u.audit);
//!     }
//! }
//! ```
//!
//! Binding a record against a table yields the column selectors for the
//! `select` statement and, in the same order, the receivers that store each
//! selected value into the record.

use super::TableColumns;
use crate::BindError;
use rusqlite::Row;
use rusqlite::types::FromSql;
use sift_schema::MissingColumns;
use std::sync::Arc;
use tracing::trace;

/// Stores the value at a column index of a row into a record.
pub type Receiver<T> = Box<dyn Fn(&mut T, &Row<'_>, usize) -> rusqlite::Result<()>>;

/// A type that can be filled from table rows.
pub trait Record: Default + 'static {
    /// Register the bindable fields, in declaration order.
    fn fields(fields: &mut Fields<Self>);
}

/// The ordered field registrations of a record type.
pub struct Fields<T> {
    nodes: Vec<Node<T>>,
}

enum Node<T> {
    Leaf {
        directive: &'static str,
        receiver: Receiver<T>,
    },
    Group {
        directive: &'static str,
        fields: Fields<T>,
    },
}

impl<T: 'static> Fields<T> {
    fn empty() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Collect the registrations of a record type.
    pub fn of() -> Self
    where
        T: Record,
    {
        let mut fields = Self::empty();
        T::fields(&mut fields);
        fields
    }

    /// Register a leaf field.
    pub fn field<V, F>(&mut self, directive: &'static str, access: F) -> &mut Self
    where
        V: FromSql + 'static,
        F: Fn(&mut T) -> &mut V + 'static,
    {
        let receiver: Receiver<T> = Box::new(
            move |record: &mut T, row: &Row<'_>, idx: usize| -> rusqlite::Result<()> {
                *access(record) = row.get(idx)?;
                Ok(())
            },
        );
        self.nodes.push(Node::Leaf {
            directive,
            receiver,
        });
        self
    }

    /// Register an embedded record.
    pub fn group<C, F>(&mut self, directive: &'static str, access: F) -> &mut Self
    where
        C: Record,
        F: Fn(&mut T) -> &mut C + 'static,
    {
        let project: Arc<dyn Fn(&mut T) -> &mut C> = Arc::new(access);
        let fields = Fields::<C>::of().lift(&project);
        self.nodes.push(Node::Group { directive, fields });
        self
    }

    /// Re-target the receivers of an embedded record at its parent.
    fn lift<P: 'static>(self, project: &Arc<dyn Fn(&mut P) -> &mut T>) -> Fields<P> {
        let nodes = self
            .nodes
            .into_iter()
            .map(|node| match node {
                Node::Leaf {
                    directive,
                    receiver,
                } => {
                    let project = Arc::clone(project);
                    let receiver: Receiver<P> =
                        Box::new(move |parent: &mut P, row: &Row<'_>, idx: usize| {
                            receiver(project(parent), row, idx)
                        });
                    Node::Leaf {
                        directive,
                        receiver,
                    }
                }
                Node::Group { directive, fields } => Node::Group {
                    directive,
                    fields: fields.lift(project),
                },
            })
            .collect();
        Fields { nodes }
    }
}

/// The outcome of binding a record type to a table.
pub struct Bindings<T> {
    selectors: Vec<String>,
    receivers: Vec<Receiver<T>>,
    missing: Vec<String>,
}

impl<T> Bindings<T> {
    /// Column names to select, in binding order.
    pub fn selectors(&self) -> &[String] {
        &self.selectors
    }

    /// Mandatory columns that were not found.
    pub fn missing(&self) -> &[String] {
        &self.missing
    }

    pub fn len(&self) -> usize {
        self.receivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receivers.is_empty()
    }

    /// Store every selected column of `row` into `record`.
    pub fn scan(&self, record: &mut T, row: &Row<'_>) -> rusqlite::Result<()> {
        for (idx, receiver) in self.receivers.iter().enumerate() {
            receiver(record, row, idx)?;
        }
        Ok(())
    }
}

/// Bind the fields of `T` against the columns of `table`.
pub fn bind<T: Record>(table: &TableColumns) -> Result<Bindings<T>, BindError> {
    let mut bindings = Bindings {
        selectors: Vec::new(),
        receivers: Vec::new(),
        missing: Vec::new(),
    };
    bind_fields(Fields::<T>::of(), table, false, &mut bindings)?;

    if !bindings.missing.is_empty() {
        return Err(MissingColumns(bindings.missing).into());
    }
    if bindings.selectors.is_empty() {
        return Err(BindError::NoBindingsProduced);
    }
    Ok(bindings)
}

fn bind_fields<T>(
    fields: Fields<T>,
    table: &TableColumns,
    all_optional: bool,
    out: &mut Bindings<T>,
) -> Result<(), BindError> {
    for node in fields.nodes {
        match node {
            Node::Group { directive, fields } => match directive {
                "" => {}
                "!" => bind_fields(fields, table, all_optional, out)?,
                "?" => bind_fields(fields, table, true, out)?,
                _ => return Err(invalid(directive)),
            },
            Node::Leaf {
                directive,
                receiver,
            } => {
                if directive.is_empty() {
                    continue;
                }
                let (terms, optional) = match directive.strip_prefix('?') {
                    Some(rest) => (rest, true),
                    None => (directive, false),
                };
                if terms.is_empty() || terms == "!" {
                    return Err(invalid(directive));
                }

                match terms.split('|').find(|term| table.has_column(term)) {
                    Some(column) => {
                        trace!(directive, column, table = %table.name, "bound field");
                        out.selectors.push(column.to_string());
                        out.receivers.push(receiver);
                    }
                    None if optional || all_optional => {
                        trace!(directive, table = %table.name, "optional field left unbound");
                    }
                    None => {
                        let first = terms.split('|').next().unwrap_or(terms);
                        out.missing.push(first.to_string());
                    }
                }
            }
        }
    }
    Ok(())
}

fn invalid(directive: &str) -> BindError {
    BindError::InvalidDirective {
        directive: directive.to_string(),
    }
}
