//! Ticket store - a JSON array of tickets, newest first
//!
//! The file layout matches what the browser form kept under its local
//! storage key, so a store exported from the browser can be dropped into a
//! project as-is.

use miette::{Diagnostic, NamedSource, SourceSpan};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::project::Project;
use crate::entities::ticket::Ticket;

/// Errors from reading, writing or querying the ticket store
#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("failed to read ticket store {path:?}: {message}")]
    #[diagnostic(code(glazier::store::io))]
    Io { path: PathBuf, message: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Corrupt(Box<CorruptStore>),

    #[error("no ticket matches '{0}'")]
    #[diagnostic(
        code(glazier::store::not_found),
        help("Use a ticket number or numeric id from 'glazier ticket list'")
    )]
    NotFound(String),

    #[error("'{reference}' matches {count} tickets")]
    #[diagnostic(
        code(glazier::store::ambiguous),
        help("Use the numeric id instead of the ticket number")
    )]
    Ambiguous { reference: String, count: usize },

    #[error("no free ticket id after {0}")]
    #[diagnostic(
        code(glazier::store::id_exhausted),
        help("An id in the store is at the largest possible value; renumber it by hand")
    )]
    IdExhausted(i64),
}

/// A store file that is not a JSON array of tickets
#[derive(Debug, Error, Diagnostic)]
#[error("ticket store is not valid: {message}")]
#[diagnostic(
    code(glazier::store::corrupt),
    help("The store must be a JSON array of ticket records; run 'glazier validate' for details")
)]
pub struct CorruptStore {
    #[source_code]
    src: NamedSource<String>,

    #[label("here")]
    span: SourceSpan,

    message: String,
}

impl CorruptStore {
    fn from_serde_error(err: &serde_json::Error, source: &str, filename: &str) -> Self {
        let offset = line_col_to_offset(source, err.line(), err.column());
        Self {
            src: NamedSource::new(filename, source.to_string()),
            span: SourceSpan::from(offset..offset.saturating_add(1).min(source.len().max(1))),
            message: err.to_string(),
        }
    }
}

/// Convert a 1-based line/column pair to a byte offset
pub(crate) fn line_col_to_offset(source: &str, line: usize, column: usize) -> usize {
    let mut offset = 0;
    for (i, text) in source.split_inclusive('\n').enumerate() {
        if i + 1 == line {
            let col = column.saturating_sub(1).min(text.len());
            return offset + col;
        }
        offset += text.len();
    }
    source.len().saturating_sub(1)
}

/// The loaded ticket store
#[derive(Debug)]
pub struct TicketStore {
    path: PathBuf,
    tickets: Vec<Ticket>,
}

impl TicketStore {
    /// Open the store of a project
    pub fn open(project: &Project) -> Result<Self, StoreError> {
        Self::open_path(&project.store_path())
    }

    /// Open a store file; a missing file is an empty store
    pub fn open_path(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "ticket store missing, starting empty");
            return Ok(Self {
                path: path.to_path_buf(),
                tickets: Vec::new(),
            });
        }

        let source = std::fs::read_to_string(path).map_err(|e| StoreError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let tickets = if source.trim().is_empty() {
            Vec::new()
        } else {
            serde_json::from_str::<Vec<Ticket>>(&source).map_err(|e| {
                let filename = path
                    .file_name()
                    .map(|f| f.to_string_lossy().to_string())
                    .unwrap_or_default();
                StoreError::Corrupt(Box::new(CorruptStore::from_serde_error(
                    &e, &source, &filename,
                )))
            })?
        };

        tracing::debug!(path = %path.display(), count = tickets.len(), "loaded ticket store");
        Ok(Self {
            path: path.to_path_buf(),
            tickets,
        })
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    /// Add a ticket at the front of the store, returning its id.
    ///
    /// The id is bumped until it is unique.
    pub fn insert(&mut self, mut ticket: Ticket) -> Result<i64, StoreError> {
        while self.tickets.iter().any(|t| t.id == ticket.id) {
            ticket.id = ticket
                .id
                .checked_add(1)
                .ok_or(StoreError::IdExhausted(ticket.id))?;
        }
        let id = ticket.id;
        self.tickets.insert(0, ticket);
        Ok(id)
    }

    fn position(&self, reference: &str) -> Result<usize, StoreError> {
        let reference = reference.trim();

        if let Ok(id) = reference.parse::<i64>() {
            if let Some(pos) = self.tickets.iter().position(|t| t.id == id) {
                return Ok(pos);
            }
        }

        let matches: Vec<usize> = self
            .tickets
            .iter()
            .enumerate()
            .filter(|(_, t)| t.ticket_number.eq_ignore_ascii_case(reference))
            .map(|(i, _)| i)
            .collect();

        match matches.as_slice() {
            [] => Err(StoreError::NotFound(reference.to_string())),
            [pos] => Ok(*pos),
            _ => Err(StoreError::Ambiguous {
                reference: reference.to_string(),
                count: matches.len(),
            }),
        }
    }

    /// Find a ticket by numeric id or ticket number
    pub fn find(&self, reference: &str) -> Result<&Ticket, StoreError> {
        let pos = self.position(reference)?;
        Ok(&self.tickets[pos])
    }

    pub fn find_mut(&mut self, reference: &str) -> Result<&mut Ticket, StoreError> {
        let pos = self.position(reference)?;
        Ok(&mut self.tickets[pos])
    }

    pub fn remove(&mut self, reference: &str) -> Result<Ticket, StoreError> {
        let pos = self.position(reference)?;
        Ok(self.tickets.remove(pos))
    }

    /// Tickets assigned to a field tech, in store order
    pub fn assigned_to(&self, name: &str) -> Vec<&Ticket> {
        self.tickets
            .iter()
            .filter(|t| t.is_assigned_to(name))
            .collect()
    }

    /// Re-check every ticket, returning how many stored results changed
    pub fn recheck_all(&mut self, tolerance: f64) -> usize {
        let mut changed = 0;
        for ticket in &mut self.tickets {
            let check = ticket.check(tolerance);
            if ticket.is_check_stale(&check) {
                ticket.valid = check.valid;
                ticket.valid_message = Some(check.message);
                changed += 1;
            }
        }
        changed
    }

    /// Write the store back as pretty-printed JSON
    pub fn save(&self) -> Result<(), StoreError> {
        let io_err = |message: String| StoreError::Io {
            path: self.path.clone(),
            message,
        };

        let mut json = serde_json::to_string_pretty(&self.tickets).map_err(|e| io_err(e.to_string()))?;
        json.push('\n');
        std::fs::write(&self.path, json).map_err(|e| io_err(e.to_string()))?;

        tracing::debug!(path = %self.path.display(), count = self.tickets.len(), "saved ticket store");
        Ok(())
    }
}
