//! Database module for Luna chat
//!
//! Provides persistence for visitor session records.

mod schema;

pub use schema::*;

use crate::sniff::DeviceClass;
use crate::state_machine::Plan;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Stored JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Session not found: {0}")]
    SessionNotFound(String),
    #[error("Session already exists: {0}")]
    SessionExists(String),
    #[error("Database lock poisoned")]
    Poisoned,
}

pub type DbResult<T> = Result<T, DbError>;

/// Thread-safe database handle
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    fn conn(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| DbError::Poisoned)
    }

    fn run_migrations(&self) -> DbResult<()> {
        self.conn()?.execute_batch(SCHEMA)?;
        Ok(())
    }

    // ==================== Session Operations ====================

    /// Insert a new session record
    pub fn create_session(&self, session: &VisitorSession) -> DbResult<()> {
        let conn = self.conn()?;
        let clicks = serde_json::to_string(&session.all_clicks)?;

        conn.execute(
            "INSERT INTO chat_sessions (session_id, visitor_name, device_type, browser, plan_selected,
                                        clicked_payment, all_clicks, time_in_chat_seconds, started_at, last_activity)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                session.session_id,
                session.visitor_name,
                session.device_type.as_str(),
                session.browser,
                session.plan_selected.map(Plan::display_name),
                session.clicked_payment,
                clicks,
                session.time_in_chat_seconds,
                session.started_at.to_rfc3339(),
                session.last_activity.to_rfc3339(),
            ],
        )
        .map_err(|e| match e.sqlite_error_code() {
            Some(ErrorCode::ConstraintViolation) => {
                DbError::SessionExists(session.session_id.clone())
            }
            _ => DbError::Sqlite(e),
        })?;

        Ok(())
    }

    /// Get session by ID
    #[cfg(test)]
    pub fn get_session(&self, session_id: &str) -> DbResult<VisitorSession> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("{SELECT_SESSION} WHERE session_id = ?1"))?;
        let row = stmt
            .query_row(params![session_id], parse_session_row)
            .optional()?
            .ok_or_else(|| DbError::SessionNotFound(session_id.to_string()))?;
        row.into_session()
    }

    /// List all sessions, newest first
    pub fn list_sessions(&self) -> DbResult<Vec<VisitorSession>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("{SELECT_SESSION} ORDER BY started_at DESC"))?;
        let rows = stmt
            .query_map([], parse_session_row)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(SessionRow::into_session).collect()
    }

    /// Apply an additive update to a session record
    pub fn update_session(&self, session_id: &str, update: &SessionUpdate) -> DbResult<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let clicks: Option<String> = tx
            .query_row(
                "SELECT all_clicks FROM chat_sessions WHERE session_id = ?1",
                params![session_id],
                |row| row.get(0),
            )
            .optional()?;
        let Some(clicks) = clicks else {
            return Err(DbError::SessionNotFound(session_id.to_string()));
        };

        let mut clicks: Vec<String> = serde_json::from_str(&clicks)?;
        if let Some(click) = &update.append_click {
            clicks.push(click.clone());
        }

        tx.execute(
            "UPDATE chat_sessions
             SET plan_selected = COALESCE(?1, plan_selected),
                 clicked_payment = clicked_payment OR ?2,
                 all_clicks = ?3,
                 time_in_chat_seconds = ?4,
                 last_activity = ?5
             WHERE session_id = ?6",
            params![
                update.plan_selected.map(Plan::display_name),
                update.clicked_payment == Some(true),
                serde_json::to_string(&clicks)?,
                update.elapsed_seconds,
                Utc::now().to_rfc3339(),
                session_id,
            ],
        )?;
        tx.commit()?;
        Ok(())
    }
}

const SELECT_SESSION: &str = "SELECT session_id, visitor_name, device_type, browser, plan_selected,
        clicked_payment, all_clicks, time_in_chat_seconds, started_at, last_activity
 FROM chat_sessions";

/// Raw row; JSON columns are decoded outside the rusqlite closure
struct SessionRow {
    session_id: String,
    visitor_name: String,
    device_type: String,
    browser: String,
    plan_selected: Option<String>,
    clicked_payment: bool,
    all_clicks: String,
    time_in_chat_seconds: u64,
    started_at: String,
    last_activity: String,
}

impl SessionRow {
    fn into_session(self) -> DbResult<VisitorSession> {
        Ok(VisitorSession {
            session_id: self.session_id,
            visitor_name: self.visitor_name,
            device_type: DeviceClass::parse(&self.device_type),
            browser: self.browser,
            plan_selected: self.plan_selected.as_deref().and_then(Plan::from_display_name),
            clicked_payment: self.clicked_payment,
            all_clicks: serde_json::from_str(&self.all_clicks)?,
            time_in_chat_seconds: self.time_in_chat_seconds,
            started_at: parse_datetime(&self.started_at),
            last_activity: parse_datetime(&self.last_activity),
        })
    }
}

fn parse_session_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<SessionRow> {
    Ok(SessionRow {
        session_id: row.get(0)?,
        visitor_name: row.get(1)?,
        device_type: row.get(2)?,
        browser: row.get(3)?,
        plan_selected: row.get(4)?,
        clicked_payment: row.get(5)?,
        all_clicks: row.get(6)?,
        time_in_chat_seconds: row.get(7)?,
        started_at: row.get(8)?,
        last_activity: row.get(9)?,
    })
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc))
}
