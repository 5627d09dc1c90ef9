//! Read-only search over the employee directory.
//!
//! # Responsibility
//! - Run last-name prefix searches on an auto-commit connection.
//! - Shape results for the boundary without touching persisted state.
//!
//! # Invariants
//! - Searches never join the transactional coordinator; nothing is mutated.
//! - Zero matches is an ordinary outcome, not an error.

use crate::db::{DataSource, DbError};
use crate::model::employee::Employee;
use crate::model::list_item::EmployeeListItem;
use crate::repo::employee_repo::{EmployeeRepository, RepoError, SqliteEmployeeRepository};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SearchResult<T> = Result<T, SearchError>;

#[derive(Debug)]
pub enum SearchError {
    /// The data source could not lease a connection.
    ResourceUnavailable(DbError),
    Repo(RepoError),
}

impl Display for SearchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ResourceUnavailable(err) => write!(f, "data source unavailable: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SearchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ResourceUnavailable(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for SearchError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Ordered search result plus the no-results indicator the boundary shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Matches ordered by last name, then employee number.
    pub matches: Vec<Employee>,
}

impl SearchOutcome {
    /// True when the search matched nothing; callers render this as a
    /// "no results" state rather than an error.
    pub fn no_results(&self) -> bool {
        self.matches.is_empty()
    }

    /// Wraps every match in the boundary view model with row actions
    /// disabled.
    pub fn into_list_items(self) -> Vec<EmployeeListItem> {
        self.matches.into_iter().map(EmployeeListItem::new).collect()
    }
}

/// Read-only search service over a leased auto-commit connection.
pub struct QueryService<D: DataSource> {
    data_source: D,
}

impl<D: DataSource> QueryService<D> {
    pub fn new(data_source: D) -> Self {
        Self { data_source }
    }

    /// Finds employees whose last name starts with the given prefix,
    /// case-insensitively.
    pub fn search(&self, last_name_prefix: &str) -> SearchResult<SearchOutcome> {
        let conn = self
            .data_source
            .acquire()
            .map_err(SearchError::ResourceUnavailable)?;

        let repo = SqliteEmployeeRepository::new(&conn);
        let matches = repo.find_by_last_name(last_name_prefix)?;

        info!(
            "event=search module=service status=ok prefix_len={} matches={}",
            last_name_prefix.len(),
            matches.len()
        );

        Ok(SearchOutcome { matches })
    }
}
