mod schema;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::Utc;
use rusqlite::Connection;
use uuid::Uuid;

use crate::models::*;

/// SQLite store for submissions.
///
/// The `submissions` table is append-only: this type inserts rows and reads
/// them back, it never updates or deletes.
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn default_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "vibe-check")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Ok(dirs.data_dir().join("vibe-check.db"))
    }

    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path()?)
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        schema::run_migrations(&conn)
    }

    // ============================================================
    // Submission operations
    // ============================================================

    /// Appends a submission, stamping it with the current time.
    pub fn insert_submission(&self, identity: &str, answers: &AnswerSet) -> Result<Submission> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let id = Uuid::new_v4();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO submissions (id, identity, answers, submitted_at)
             VALUES (?, ?, ?, ?)",
            (
                id.to_string(),
                identity,
                serde_json::to_string(answers)?,
                now.to_rfc3339(),
            ),
        )?;

        Ok(Submission {
            id,
            identity: identity.to_string(),
            answers: answers.clone(),
            submitted_at: now,
        })
    }

    /// All submissions, oldest first.
    pub fn list_submissions(&self) -> Result<Vec<Submission>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, identity, answers, submitted_at
             FROM submissions ORDER BY submitted_at, rowid",
        )?;

        let submissions = stmt
            .query_map([], |row| {
                let answers_json: String = row.get(2)?;
                Ok(Submission {
                    id: parse_uuid(row.get::<_, String>(0)?),
                    identity: row.get(1)?,
                    answers: serde_json::from_str(&answers_json).unwrap_or_default(),
                    submitted_at: parse_datetime(row.get::<_, String>(3)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(submissions)
    }

    pub fn count_submissions(&self) -> Result<usize> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM submissions", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}

fn parse_uuid(s: String) -> Uuid {
    Uuid::parse_str(&s).unwrap_or_else(|_| Uuid::nil())
}

fn parse_datetime(s: String) -> chrono::DateTime<Utc> {
    chrono::DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
