//! Persistent theme preference.
//!
//! One `redb` file with a single table holding the key `"theme"`. A missing
//! table or key means the user never chose.

use std::path::Path;

use redb::{Database, ReadableTable, TableDefinition, TableError};
use slidelock_app::{ParseThemeError, Theme, ThemeStore};
use thiserror::Error;
use tracing::debug;

const PREFERENCES: TableDefinition<&str, &str> = TableDefinition::new("preferences");
const THEME_KEY: &str = "theme";

/// Theme store failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database could not be opened, read or written.
    #[error("theme store: {0}")]
    Database(#[from] redb::Error),

    /// Stored value is not a theme.
    #[error("theme store holds an unknown value: {0}")]
    Corrupt(#[from] ParseThemeError),
}

/// `redb`-backed [`ThemeStore`].
pub struct RedbThemeStore {
    db: Database,
}

impl std::fmt::Debug for RedbThemeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbThemeStore").finish_non_exhaustive()
    }
}

impl RedbThemeStore {
    /// Open (or create) the store at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened as a database.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let db = Database::create(path).map_err(redb::Error::from)?;
        debug!(path = %path.display(), "theme store opened");
        Ok(Self { db })
    }
}

impl ThemeStore for RedbThemeStore {
    type Error = StoreError;

    fn load(&self) -> Result<Option<Theme>, StoreError> {
        let txn = self.db.begin_read().map_err(redb::Error::from)?;
        let table = match txn.open_table(PREFERENCES) {
            Ok(table) => table,
            Err(TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(e) => return Err(redb::Error::from(e).into()),
        };
        let Some(value) = table.get(THEME_KEY).map_err(redb::Error::from)? else {
            return Ok(None);
        };
        Ok(Some(value.value().parse()?))
    }

    fn save(&mut self, theme: Theme) -> Result<(), StoreError> {
        let txn = self.db.begin_write().map_err(redb::Error::from)?;
        {
            let mut table = txn.open_table(PREFERENCES).map_err(redb::Error::from)?;
            table.insert(THEME_KEY, theme.as_str()).map_err(redb::Error::from)?;
        }
        txn.commit().map_err(redb::Error::from)?;
        debug!(%theme, "theme saved");
        Ok(())
    }
}
