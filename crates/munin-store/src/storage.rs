//! Meeting storage: `meetings` + `action_items` tables.
//!
//! Derived insight (participants, action items, decisions, topics) is stored
//! as JSON-array TEXT columns on the meeting row; queryable action items are
//! additionally persisted as child rows. `commit_processed` applies both in
//! one transaction so a meeting is either fully committed or untouched.

use munin_core::types::{ActionItemDraft, ActionItemRow, Meeting, Priority};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::path::{Path, PathBuf};

fn now_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

fn to_json<T: serde::Serialize>(v: &T) -> String {
    serde_json::to_string(v).unwrap_or_else(|_| "[]".to_string())
}

fn from_json<T: serde::de::DeserializeOwned + Default>(v: Option<String>) -> T {
    v.and_then(|s| serde_json::from_str(&s).ok()).unwrap_or_default()
}

/// Storage for meetings and their action items.
pub struct MeetingStorage {
    db_path: PathBuf,
}

impl MeetingStorage {
    /// Open or create the database and ensure the tables exist.
    pub fn new(db_path: PathBuf) -> Result<Self, rusqlite::Error> {
        let this = Self { db_path };
        this.init()?;
        Ok(this)
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn open(&self) -> Result<Connection, rusqlite::Error> {
        let conn = Connection::open_with_flags(
            &self.db_path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE,
        )?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(conn)
    }

    fn init(&self) -> Result<(), rusqlite::Error> {
        if let Some(parent) = self.db_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let conn = self.open()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS meetings (
                id TEXT PRIMARY KEY,
                filename TEXT NOT NULL,
                title TEXT NULL,
                duration_secs INTEGER NULL,
                transcript TEXT NULL,
                participants TEXT NULL,
                action_items TEXT NULL,
                decisions TEXT NULL,
                key_topics TEXT NULL,
                processed INTEGER NOT NULL DEFAULT 0,
                created_at_ms INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_meetings_created_at ON meetings(created_at_ms);

            CREATE TABLE IF NOT EXISTS action_items (
                id TEXT PRIMARY KEY,
                meeting_id TEXT NOT NULL,
                description TEXT NOT NULL,
                assignee TEXT NULL,
                due_date TEXT NULL,
                priority TEXT NOT NULL DEFAULT 'medium',
                completed INTEGER NOT NULL DEFAULT 0,
                created_at_ms INTEGER NOT NULL,
                FOREIGN KEY(meeting_id) REFERENCES meetings(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_action_items_meeting_id ON action_items(meeting_id);
            "#,
        )?;
        Ok(())
    }

    /// Create a queued meeting record: derived fields NULL, processed=0.
    pub fn create_meeting(&self, id: &str, filename: &str) -> Result<Meeting, rusqlite::Error> {
        let ts = now_ms();
        let conn = self.open()?;
        conn.execute(
            r#"
            INSERT INTO meetings (id, filename, processed, created_at_ms)
            VALUES (?1, ?2, 0, ?3)
            "#,
            params![id, filename, ts],
        )?;
        Ok(Meeting::queued(id.to_string(), filename.to_string(), ts))
    }

    /// Get a meeting by id.
    pub fn get_meeting(&self, id: &str) -> Result<Option<Meeting>, rusqlite::Error> {
        let conn = self.open()?;
        let row = conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_MEETING),
                params![id],
                row_to_meeting,
            )
            .optional()?;
        Ok(row)
    }

    /// List all meetings, newest first.
    pub fn list_meetings(&self) -> Result<Vec<Meeting>, rusqlite::Error> {
        let conn = self.open()?;
        let mut stmt =
            conn.prepare(&format!("{} ORDER BY created_at_ms DESC", SELECT_MEETING))?;
        let rows = stmt
            .query_map([], row_to_meeting)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Fetch the subset of `ids` that still exist. Order is unspecified.
    pub fn meetings_by_ids(&self, ids: &[String]) -> Result<Vec<Meeting>, rusqlite::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let conn = self.open()?;
        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!("{} WHERE id IN ({})", SELECT_MEETING, placeholders);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(ids.iter()), row_to_meeting)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Terminal success: write every derived field plus processed=1 on the
    /// meeting row and insert one child row per action item, atomically.
    pub fn commit_processed(&self, meeting: &Meeting) -> Result<(), rusqlite::Error> {
        let mut conn = self.open()?;
        let tx = conn.transaction()?;
        let updated = tx.execute(
            r#"
            UPDATE meetings
            SET title = ?1, duration_secs = ?2, transcript = ?3, participants = ?4,
                action_items = ?5, decisions = ?6, key_topics = ?7, processed = 1
            WHERE id = ?8
            "#,
            params![
                meeting.title,
                meeting.duration_secs,
                meeting.transcript,
                to_json(&meeting.participants),
                to_json(&meeting.action_items),
                to_json(&meeting.decisions),
                to_json(&meeting.key_topics),
                meeting.id,
            ],
        )?;
        if updated == 0 {
            return Err(rusqlite::Error::QueryReturnedNoRows);
        }
        for item in &meeting.action_items {
            insert_action_item(&tx, &meeting.id, item)?;
        }
        tx.commit()
    }

    /// Terminal failure: reaffirm processed=0, touch nothing else.
    pub fn mark_failed(&self, id: &str) -> Result<(), rusqlite::Error> {
        let conn = self.open()?;
        conn.execute("UPDATE meetings SET processed = 0 WHERE id = ?1", params![id])?;
        Ok(())
    }

    /// Insert a single action-item child row outside a commit.
    pub fn add_action_item(
        &self,
        meeting_id: &str,
        item: &ActionItemDraft,
    ) -> Result<ActionItemRow, rusqlite::Error> {
        let conn = self.open()?;
        insert_action_item(&conn, meeting_id, item)
    }

    /// Child rows for one meeting, oldest first.
    pub fn list_action_items(
        &self,
        meeting_id: &str,
    ) -> Result<Vec<ActionItemRow>, rusqlite::Error> {
        let conn = self.open()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, meeting_id, description, assignee, due_date, priority, completed, created_at_ms
            FROM action_items WHERE meeting_id = ?1 ORDER BY created_at_ms ASC
            "#,
        )?;
        let rows = stmt
            .query_map(params![meeting_id], |r| {
                Ok(ActionItemRow {
                    id: r.get(0)?,
                    meeting_id: r.get(1)?,
                    description: r.get(2)?,
                    assignee: r.get(3)?,
                    due_date: r.get(4)?,
                    priority: Priority::parse_lenient(&r.get::<_, String>(5)?),
                    completed: r.get::<_, i64>(6)? != 0,
                    created_at_ms: r.get(7)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

const SELECT_MEETING: &str = r#"
    SELECT id, filename, title, duration_secs, transcript, participants,
           action_items, decisions, key_topics, processed, created_at_ms
    FROM meetings
"#;

fn row_to_meeting(r: &rusqlite::Row<'_>) -> Result<Meeting, rusqlite::Error> {
    Ok(Meeting {
        id: r.get(0)?,
        filename: r.get(1)?,
        title: r.get(2)?,
        duration_secs: r.get(3)?,
        transcript: r.get(4)?,
        participants: from_json(r.get(5)?),
        action_items: from_json(r.get(6)?),
        decisions: from_json(r.get(7)?),
        key_topics: from_json(r.get(8)?),
        processed: r.get::<_, i64>(9)? != 0,
        created_at_ms: r.get(10)?,
    })
}

fn insert_action_item(
    conn: &Connection,
    meeting_id: &str,
    item: &ActionItemDraft,
) -> Result<ActionItemRow, rusqlite::Error> {
    let id = uuid::Uuid::new_v4().to_string();
    let ts = now_ms();
    conn.execute(
        r#"
        INSERT INTO action_items (id, meeting_id, description, assignee, due_date, priority, completed, created_at_ms)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7)
        "#,
        params![
            id,
            meeting_id,
            item.description,
            item.assignee,
            item.due_date,
            item.priority.as_str(),
            ts
        ],
    )?;
    Ok(ActionItemRow {
        id,
        meeting_id: meeting_id.to_string(),
        description: item.description.clone(),
        assignee: item.assignee.clone(),
        due_date: item.due_date.clone(),
        priority: item.priority,
        completed: false,
        created_at_ms: ts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use munin_core::types::Decision;

    fn temp_storage() -> (tempfile::TempDir, MeetingStorage) {
        let dir = tempfile::tempdir().unwrap();
        let storage = MeetingStorage::new(dir.path().join("munin.sqlite")).unwrap();
        (dir, storage)
    }

    fn processed_meeting(id: &str) -> Meeting {
        let mut m = Meeting::queued(id.to_string(), "standup.mp4".to_string(), 0);
        m.transcript = Some("Alice will send the report by Friday.".to_string());
        m.participants = vec!["Alice".to_string(), "Bob".to_string()];
        m.action_items = vec![ActionItemDraft {
            description: "send the report".to_string(),
            assignee: Some("Alice".to_string()),
            due_date: Some("Friday".to_string()),
            priority: Priority::High,
        }];
        m.decisions = vec![Decision {
            decision: "Bob reviews the report".to_string(),
            context: None,
            impact: None,
        }];
        m.key_topics = vec!["reporting".to_string()];
        m.processed = true;
        m
    }

    #[test]
    fn create_then_get_round_trips_queued_state() {
        let (_dir, storage) = temp_storage();
        storage.create_meeting("m1", "standup.mp4").unwrap();
        let m = storage.get_meeting("m1").unwrap().unwrap();
        assert_eq!(m.filename, "standup.mp4");
        assert!(!m.processed);
        assert!(m.transcript.is_none());
        assert!(m.participants.is_empty());
    }

    #[test]
    fn missing_meeting_is_none() {
        let (_dir, storage) = temp_storage();
        assert!(storage.get_meeting("nope").unwrap().is_none());
    }

    #[test]
    fn commit_processed_writes_fields_and_child_rows() {
        let (_dir, storage) = temp_storage();
        storage.create_meeting("m1", "standup.mp4").unwrap();
        storage.commit_processed(&processed_meeting("m1")).unwrap();

        let m = storage.get_meeting("m1").unwrap().unwrap();
        assert!(m.processed);
        assert_eq!(m.participants, ["Alice", "Bob"]);
        assert_eq!(m.action_items.len(), 1);
        assert_eq!(m.decisions.len(), 1);

        let rows = storage.list_action_items("m1").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].assignee.as_deref(), Some("Alice"));
        assert_eq!(rows[0].priority, Priority::High);
        assert!(!rows[0].completed);
    }

    #[test]
    fn commit_for_unknown_meeting_fails_without_orphan_rows() {
        let (_dir, storage) = temp_storage();
        assert!(storage.commit_processed(&processed_meeting("ghost")).is_err());
        assert!(storage.list_action_items("ghost").unwrap().is_empty());
    }

    #[test]
    fn mark_failed_touches_only_processed() {
        let (_dir, storage) = temp_storage();
        storage.create_meeting("m1", "call.wav").unwrap();
        storage.mark_failed("m1").unwrap();
        let m = storage.get_meeting("m1").unwrap().unwrap();
        assert!(!m.processed);
        assert!(m.transcript.is_none());
        assert_eq!(m.filename, "call.wav");
    }

    #[test]
    fn add_action_item_appends_outside_a_commit() {
        let (_dir, storage) = temp_storage();
        storage.create_meeting("m1", "standup.mp4").unwrap();

        let row = storage
            .add_action_item(
                "m1",
                &ActionItemDraft {
                    description: "book the room".to_string(),
                    assignee: None,
                    due_date: None,
                    priority: Priority::Low,
                },
            )
            .unwrap();
        assert_eq!(row.meeting_id, "m1");
        assert!(!row.completed);

        let rows = storage.list_action_items("m1").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, row.id);
        assert_eq!(rows[0].description, "book the room");
        assert_eq!(rows[0].priority, Priority::Low);
        assert!(rows[0].assignee.is_none());
    }

    #[test]
    fn list_is_newest_first() {
        let (_dir, storage) = temp_storage();
        storage.create_meeting("a", "one.mp3").unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        storage.create_meeting("b", "two.mp3").unwrap();
        let all = storage.list_meetings().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, "b");
        assert_eq!(all[1].id, "a");
    }

    #[test]
    fn meetings_by_ids_skips_missing() {
        let (_dir, storage) = temp_storage();
        storage.create_meeting("a", "one.mp3").unwrap();
        let got = storage
            .meetings_by_ids(&["a".to_string(), "gone".to_string()])
            .unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].id, "a");
        assert!(storage.meetings_by_ids(&[]).unwrap().is_empty());
    }
}
