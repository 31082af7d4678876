//! Hymn repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist an imported hymn collection and read it back unchanged.
//! - Persist the favorite flag across restarts.
//!
//! # Invariants
//! - Import replaces the stored collection atomically.
//! - Re-import keeps the stored favorite flag of hymns whose id survives;
//!   new ids take the flag from the dataset.
//! - When ids repeat, id lookups and favorite updates touch only the first
//!   occurrence, matching `HymnIndex`.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::hymn::{HymnRecord, VERSE_COUNT};
use crate::model::section::{Section, SectionId};
use log::info;
use rusqlite::{params, Connection, Row};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

const HYMN_SELECT_SQL: &str = "SELECT
    id,
    number,
    title,
    section,
    refrain,
    verse_1,
    verse_2,
    verse_3,
    verse_4,
    verse_5,
    verse_6,
    verse_7,
    favorited
FROM hymns";

const VERSE_COLUMNS: [&str; VERSE_COUNT] = [
    "verse_1", "verse_2", "verse_3", "verse_4", "verse_5", "verse_6", "verse_7",
];

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(String),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "hymn not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid stored hymn data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence contract for the hymn store.
pub trait HymnRepository {
    fn import_collection(&self, hymns: &[HymnRecord], sections: &[Section]) -> RepoResult<()>;
    fn list_hymns(&self) -> RepoResult<Vec<HymnRecord>>;
    fn list_sections(&self) -> RepoResult<Vec<Section>>;
    fn get_hymn(&self, id: &str) -> RepoResult<Option<HymnRecord>>;
    fn set_favorited(&self, id: &str, favorited: bool) -> RepoResult<()>;
}

/// SQLite-backed hymn repository.
pub struct SqliteHymnRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteHymnRepository<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl HymnRepository for SqliteHymnRepository<'_> {
    fn import_collection(&self, hymns: &[HymnRecord], sections: &[Section]) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;

        // Descending order so the first occurrence of a repeated id wins.
        let mut stored_favorites = {
            let mut stmt =
                tx.prepare("SELECT id, favorited FROM hymns ORDER BY position DESC;")?;
            let flags = stmt
                .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? == 1)))?
                .collect::<Result<HashMap<_, _>, _>>()?;
            flags
        };

        let previously_stored = stored_favorites.len();
        tx.execute_batch("DELETE FROM hymns; DELETE FROM sections;")?;

        {
            let mut insert_section = tx.prepare(
                "INSERT INTO sections (position, id, title, description)
                 VALUES (?1, ?2, ?3, ?4);",
            )?;
            for (position, section) in sections.iter().enumerate() {
                insert_section.execute(params![
                    position_to_db(position),
                    section.id.as_str(),
                    section.title.as_str(),
                    section.description.as_str(),
                ])?;
            }

            let mut insert_hymn = tx.prepare(
                "INSERT INTO hymns (
                    position, id, number, title, section, refrain,
                    verse_1, verse_2, verse_3, verse_4, verse_5, verse_6, verse_7,
                    favorited
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14);",
            )?;
            for (position, hymn) in hymns.iter().enumerate() {
                let favorited = stored_favorites.remove(&hymn.id).unwrap_or(hymn.favorited);
                let [v1, v2, v3, v4, v5, v6, v7] = &hymn.verses;
                insert_hymn.execute(params![
                    position_to_db(position),
                    hymn.id.as_str(),
                    hymn.number,
                    hymn.title.as_str(),
                    hymn.section.as_str(),
                    hymn.refrain.as_deref(),
                    v1,
                    v2,
                    v3,
                    v4,
                    v5,
                    v6,
                    v7,
                    bool_to_int(favorited),
                ])?;
            }
        }

        tx.commit()?;
        info!(
            "event=hymn_import module=repo status=ok hymns={} sections={} previously_stored={}",
            hymns.len(),
            sections.len(),
            previously_stored
        );
        Ok(())
    }

    fn list_hymns(&self) -> RepoResult<Vec<HymnRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{HYMN_SELECT_SQL} ORDER BY position ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut hymns = Vec::new();

        while let Some(row) = rows.next()? {
            hymns.push(parse_hymn_row(row)?);
        }

        Ok(hymns)
    }

    fn list_sections(&self) -> RepoResult<Vec<Section>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, description FROM sections ORDER BY position ASC;",
        )?;
        let sections = stmt
            .query_map([], |row| {
                Ok(Section {
                    id: SectionId::new(row.get::<_, String>("id")?),
                    title: row.get("title")?,
                    description: row.get("description")?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(sections)
    }

    fn get_hymn(&self, id: &str) -> RepoResult<Option<HymnRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{HYMN_SELECT_SQL} WHERE id = ?1 ORDER BY position ASC LIMIT 1;"
        ))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_hymn_row(row)?));
        }
        Ok(None)
    }

    fn set_favorited(&self, id: &str, favorited: bool) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE hymns SET favorited = ?1
             WHERE position = (SELECT MIN(position) FROM hymns WHERE id = ?2);",
            params![bool_to_int(favorited), id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

fn parse_hymn_row(row: &Row<'_>) -> RepoResult<HymnRecord> {
    let id: String = row.get("id")?;

    let number_value: i64 = row.get("number")?;
    let number = u32::try_from(number_value)
        .ok()
        .filter(|number| *number > 0)
        .ok_or_else(|| {
            RepoError::InvalidData(format!("invalid number `{number_value}` for hymn `{id}`"))
        })?;

    let favorited = match row.get::<_, i64>("favorited")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid favorited value `{other}` for hymn `{id}`"
            )));
        }
    };

    let mut verses: [String; VERSE_COUNT] = Default::default();
    for (slot, column) in VERSE_COLUMNS.iter().enumerate() {
        verses[slot] = row.get(*column)?;
    }

    Ok(HymnRecord {
        number,
        title: row.get("title")?,
        section: SectionId::new(row.get::<_, String>("section")?),
        refrain: row
            .get::<_, Option<String>>("refrain")?
            .filter(|refrain| !refrain.is_empty()),
        verses,
        favorited,
        id,
    })
}

fn position_to_db(position: usize) -> i64 {
    i64::try_from(position).unwrap_or(i64::MAX)
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
