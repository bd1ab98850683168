//! Storage handle for the academic records database.
//!
//! [`Store`] owns the SQLite connection and is the only way to obtain one, so
//! every connection has foreign-key enforcement switched on (the cascade
//! rules in the schema are inert without it). Insert and delete helpers map
//! SQLite constraint failures onto the crate's error kinds.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use crate::error::{Error, Result};
use crate::model::Grade;
use crate::schema::{generate_create_table, generate_indexes, ALL_TABLES};

pub struct Store {
    pub(crate) conn: Connection,
}

impl Store {
    /// Open (creating if missing) a database file.
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        Self::from_connection(conn)
    }

    /// Open a private in-memory database, mainly for tests.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;

        Ok(Self { conn })
    }

    /// Create all tables and indexes that do not exist yet.
    pub fn init_schema(&self) -> Result<()> {
        for table in ALL_TABLES {
            self.conn.execute(&generate_create_table(table), [])?;

            for index_sql in generate_indexes(table) {
                self.conn.execute(&index_sql, [])?;
            }
        }

        debug!(tables = ALL_TABLES.len(), "schema initialized");
        Ok(())
    }

    /// Begin a transaction spanning arbitrary store operations.
    ///
    /// The free insert/delete functions in this module accept the
    /// transaction directly (it derefs to a connection); dropping it
    /// without `commit` rolls everything back.
    pub fn transaction(&mut self) -> Result<rusqlite::Transaction<'_>> {
        Ok(self.conn.transaction()?)
    }

    pub fn insert_group(&self, name: &str) -> Result<i64> {
        insert_group(&self.conn, name)
    }

    pub fn insert_teacher(&self, name: &str, email: &str) -> Result<i64> {
        insert_teacher(&self.conn, name, email)
    }

    pub fn insert_subject(&self, name: &str, teacher_id: i64) -> Result<i64> {
        insert_subject(&self.conn, name, teacher_id)
    }

    pub fn insert_student(&self, name: &str, email: &str, group_id: i64) -> Result<i64> {
        insert_student(&self.conn, name, email, group_id)
    }

    pub fn insert_grade(
        &self,
        student_id: i64,
        subject_id: i64,
        value: i64,
        created_at: DateTime<Utc>,
    ) -> Result<i64> {
        insert_grade(&self.conn, student_id, subject_id, value, created_at)
    }

    /// Delete a group; its students and their grades go with it.
    pub fn delete_group(&self, id: i64) -> Result<usize> {
        Ok(self
            .conn
            .execute("DELETE FROM groups WHERE id = ?1", params![id])
            .map_err(Error::from_sqlite)?)
    }

    /// Delete a teacher; their subjects and those subjects' grades go with it.
    pub fn delete_teacher(&self, id: i64) -> Result<usize> {
        Ok(self
            .conn
            .execute("DELETE FROM teachers WHERE id = ?1", params![id])
            .map_err(Error::from_sqlite)?)
    }

    pub fn delete_student(&self, id: i64) -> Result<usize> {
        Ok(self
            .conn
            .execute("DELETE FROM students WHERE id = ?1", params![id])
            .map_err(Error::from_sqlite)?)
    }

    pub fn delete_subject(&self, id: i64) -> Result<usize> {
        Ok(self
            .conn
            .execute("DELETE FROM subjects WHERE id = ?1", params![id])
            .map_err(Error::from_sqlite)?)
    }

    /// Fetch a single grade row by id.
    pub fn grade(&self, id: i64) -> Result<Option<Grade>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, student_id, subject_id, value, created_at
                 FROM grades WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Grade {
                        id: row.get(0)?,
                        student_id: row.get(1)?,
                        subject_id: row.get(2)?,
                        value: row.get(3)?,
                        created_at: row.get(4)?,
                    })
                },
            )
            .optional()?;

        Ok(row)
    }

    /// Row count for one of the schema's tables.
    pub fn count(&self, table: &str) -> Result<i64> {
        let count = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                row.get(0)
            })?;
        Ok(count)
    }
}

// =============================================================================
// Insert and purge primitives
//
// Free functions over &Connection so they compose with a transaction
// (rusqlite::Transaction derefs to Connection).
// =============================================================================

pub(crate) fn insert_group(conn: &Connection, name: &str) -> Result<i64> {
    conn.execute("INSERT INTO groups (name) VALUES (?1)", params![name])
        .map_err(Error::from_sqlite)?;
    Ok(conn.last_insert_rowid())
}

pub(crate) fn insert_teacher(conn: &Connection, name: &str, email: &str) -> Result<i64> {
    conn.execute(
        "INSERT INTO teachers (name, email) VALUES (?1, ?2)",
        params![name, email],
    )
    .map_err(Error::from_sqlite)?;
    Ok(conn.last_insert_rowid())
}

pub(crate) fn insert_subject(conn: &Connection, name: &str, teacher_id: i64) -> Result<i64> {
    conn.execute(
        "INSERT INTO subjects (name, teacher_id) VALUES (?1, ?2)",
        params![name, teacher_id],
    )
    .map_err(Error::from_sqlite)?;
    Ok(conn.last_insert_rowid())
}

pub(crate) fn insert_student(
    conn: &Connection,
    name: &str,
    email: &str,
    group_id: i64,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO students (name, email, group_id) VALUES (?1, ?2, ?3)",
        params![name, email, group_id],
    )
    .map_err(Error::from_sqlite)?;
    Ok(conn.last_insert_rowid())
}

pub(crate) fn insert_grade(
    conn: &Connection,
    student_id: i64,
    subject_id: i64,
    value: i64,
    created_at: DateTime<Utc>,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO grades (student_id, subject_id, value, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![student_id, subject_id, value, created_at],
    )
    .map_err(Error::from_sqlite)?;
    Ok(conn.last_insert_rowid())
}

/// Delete every row from every table, children before parents.
pub(crate) fn purge_all(conn: &Connection) -> Result<()> {
    for table in ALL_TABLES.iter().rev() {
        let deleted = conn
            .execute(&format!("DELETE FROM {}", table.name), [])
            .map_err(Error::from_sqlite)?;
        debug!(table = table.name, deleted, "purged table");
    }
    Ok(())
}
