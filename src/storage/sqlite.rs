/// SQLite implementation of the habit storage interface
///
/// This module provides the concrete SQLite implementation for storing
/// and retrieving habit data. It handles all SQL queries and data conversion.

use std::path::Path;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection, OptionalExtension, Row};
use chrono::NaiveDateTime;

use crate::domain::{Completion, CompletionId, Habit, HabitId, NewHabit, Periodicity};
use crate::storage::{migrations, HabitStorage, StorageError};

const HABIT_COLUMNS: &str = "id, name, description, periodicity, created_at";

/// SQLite-based storage implementation
///
/// This struct holds a connection to the SQLite database and implements
/// all the storage operations defined in the HabitStorage trait.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Open (or create) a database file
    ///
    /// This opens the database file and runs any necessary migrations
    /// to ensure the schema is up to date.
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self, StorageError> {
        let db_path = db_path.as_ref();
        let conn = Connection::open(db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        let storage = Self::with_connection(conn)?;
        tracing::info!("SQLite storage initialized at: {:?}", db_path);
        Ok(storage)
    }

    /// A throwaway database that lives as long as this value
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open in-memory database: {}", e)))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, StorageError> {
        // Enable foreign key constraints
        conn.execute("PRAGMA foreign_keys = ON", [])
            .map_err(|e| StorageError::Connection(format!("Failed to enable foreign keys: {}", e)))?;

        migrations::initialize_database(&conn)?;

        Ok(Self { conn })
    }

    fn habit_from_row(row: &Row<'_>) -> rusqlite::Result<Habit> {
        Ok(Habit::from_existing(
            row.get(0)?,
            row.get(1)?,
            row.get(2)?,
            row.get(3)?,
            row.get(4)?,
        ))
    }

    fn completion_from_row(row: &Row<'_>) -> rusqlite::Result<Completion> {
        Ok(Completion::from_existing(
            CompletionId(row.get(0)?),
            row.get(1)?,
            row.get(2)?,
        ))
    }
}

impl ToSql for HabitId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0))
    }
}

impl FromSql for HabitId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).map(HabitId)
    }
}

impl ToSql for Periodicity {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Periodicity {
    /// A stored value outside daily/weekly/monthly fails the row instead of
    /// being coerced
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse::<Periodicity>()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

impl HabitStorage for SqliteStorage {
    fn create_habit(&self, habit: &NewHabit) -> Result<Habit, StorageError> {
        self.conn.execute(
            "INSERT INTO habits (name, description, periodicity, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![habit.name, habit.description, habit.periodicity, habit.created_at],
        )?;
        let id = HabitId(self.conn.last_insert_rowid());

        tracing::debug!("Created habit: {} ({})", habit.name, id);
        Ok(Habit::from_existing(
            id,
            habit.name.clone(),
            habit.description.clone(),
            habit.periodicity,
            habit.created_at,
        ))
    }

    fn get_habit(&self, habit_id: HabitId) -> Result<Option<Habit>, StorageError> {
        let sql = format!("SELECT {} FROM habits WHERE id = ?1", HABIT_COLUMNS);
        let habit = self
            .conn
            .query_row(&sql, params![habit_id], Self::habit_from_row)
            .optional()?;
        Ok(habit)
    }

    fn find_by_name(&self, name: &str) -> Result<Vec<Habit>, StorageError> {
        let sql = format!("SELECT {} FROM habits WHERE name = ?1 ORDER BY id", HABIT_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let habits = stmt
            .query_map(params![name], Self::habit_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(habits)
    }

    fn update_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "UPDATE habits SET
                name = ?2,
                description = ?3,
                periodicity = ?4
             WHERE id = ?1",
            params![habit.id, habit.name, habit.description, habit.periodicity],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                habit_id: habit.id.to_string(),
            });
        }

        tracing::debug!("Updated habit: {} ({})", habit.name, habit.id);
        Ok(())
    }

    /// Delete the habit and its completions in one transaction
    ///
    /// Completions are removed explicitly rather than relying on the foreign
    /// key cascade alone, so the count of removed rows is known.
    fn delete_habit(&self, habit_id: HabitId) -> Result<usize, StorageError> {
        let tx = self.conn.unchecked_transaction()?;

        let removed = tx.execute(
            "DELETE FROM completions WHERE habit_id = ?1",
            params![habit_id],
        )?;
        let rows_affected = tx.execute("DELETE FROM habits WHERE id = ?1", params![habit_id])?;

        if rows_affected == 0 {
            // Dropping `tx` rolls back
            return Err(StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            });
        }
        tx.commit()?;

        tracing::debug!("Deleted habit {} with {} completions", habit_id, removed);
        Ok(removed)
    }

    fn list_habits(&self, periodicity: Option<Periodicity>) -> Result<Vec<Habit>, StorageError> {
        let habits = match periodicity {
            Some(periodicity) => {
                let sql = format!(
                    "SELECT {} FROM habits WHERE periodicity = ?1 ORDER BY id",
                    HABIT_COLUMNS
                );
                let mut stmt = self.conn.prepare(&sql)?;
                let rows = stmt.query_map(params![periodicity], Self::habit_from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            None => {
                let sql = format!("SELECT {} FROM habits ORDER BY id", HABIT_COLUMNS);
                let mut stmt = self.conn.prepare(&sql)?;
                let rows = stmt.query_map([], Self::habit_from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };

        Ok(habits)
    }

    fn add_completion(&self, habit_id: HabitId, completed_at: NaiveDateTime) -> Result<Completion, StorageError> {
        if self.get_habit(habit_id)?.is_none() {
            return Err(StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            });
        }

        self.conn.execute(
            "INSERT INTO completions (habit_id, completed_at) VALUES (?1, ?2)",
            params![habit_id, completed_at],
        )?;
        let id = CompletionId(self.conn.last_insert_rowid());

        tracing::debug!("Recorded completion {} for habit {}", id, habit_id);
        Ok(Completion::from_existing(id, habit_id, completed_at))
    }

    fn list_completion_records(&self, habit_id: HabitId) -> Result<Vec<Completion>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, habit_id, completed_at
             FROM completions WHERE habit_id = ?1
             ORDER BY completed_at, id",
        )?;
        let completions = stmt
            .query_map(params![habit_id], Self::completion_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(completions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HabitIdentifier;
    use crate::storage::HabitLookup;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap().and_hms_opt(hour, 0, 0).unwrap()
    }

    fn new_habit(name: &str, periodicity: &str) -> NewHabit {
        NewHabit::new(name, Some("Test Desc".to_string()), periodicity, at(1, 8)).unwrap()
    }

    #[test]
    fn test_create_and_get_habit() {
        let storage = SqliteStorage::in_memory().unwrap();
        let created = storage.create_habit(&new_habit("Read", "daily")).unwrap();

        let loaded = storage.get_habit(created.id).unwrap().unwrap();
        assert_eq!(loaded, created);
        assert_eq!(loaded.created_at, at(1, 8));
        assert!(storage.get_habit(HabitId(999)).unwrap().is_none());
    }

    #[test]
    fn test_filter_by_periodicity() {
        let storage = SqliteStorage::in_memory().unwrap();
        storage.create_habit(&new_habit("Daily Habit", "daily")).unwrap();
        storage.create_habit(&new_habit("Weekly One", "weekly")).unwrap();
        storage.create_habit(&new_habit("Weekly Two", "weekly")).unwrap();

        let daily = storage.list_habits(Some(Periodicity::Daily)).unwrap();
        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].name, "Daily Habit");
        assert_eq!(storage.list_habits(Some(Periodicity::Weekly)).unwrap().len(), 2);
        assert!(storage.list_habits(Some(Periodicity::Monthly)).unwrap().is_empty());
        assert_eq!(storage.list_habits(None).unwrap().len(), 3);
    }

    #[test]
    fn test_find_habit_by_name_handles_duplicates() {
        let storage = SqliteStorage::in_memory().unwrap();
        let first = storage.create_habit(&new_habit("Stretch", "daily")).unwrap();

        let lookup = storage.find_habit(&HabitIdentifier::Name("Stretch".to_string())).unwrap();
        assert_eq!(lookup, HabitLookup::Found(first));

        storage.create_habit(&new_habit("Stretch", "weekly")).unwrap();
        let lookup = storage.find_habit(&HabitIdentifier::Name("Stretch".to_string())).unwrap();
        assert_eq!(
            lookup,
            HabitLookup::Ambiguous { name: "Stretch".to_string(), matches: 2 }
        );

        let lookup = storage.find_habit(&HabitIdentifier::Name("Ghost".to_string())).unwrap();
        assert_eq!(lookup, HabitLookup::NotFound);
    }

    #[test]
    fn test_completions_are_returned_in_order() {
        let storage = SqliteStorage::in_memory().unwrap();
        let habit = storage.create_habit(&new_habit("Read", "daily")).unwrap();

        storage.add_completion(habit.id, at(5, 17)).unwrap();
        storage.add_completion(habit.id, at(3, 9)).unwrap();
        storage.add_completion(habit.id, at(5, 9)).unwrap();

        let completions = storage.list_completions(habit.id).unwrap();
        assert_eq!(completions, vec![at(3, 9), at(5, 9), at(5, 17)]);
    }

    #[test]
    fn test_completion_for_missing_habit_fails() {
        let storage = SqliteStorage::in_memory().unwrap();
        let result = storage.add_completion(HabitId(42), at(3, 9));
        assert!(matches!(result, Err(StorageError::HabitNotFound { .. })));
    }

    #[test]
    fn test_delete_cascades_to_completions() {
        let storage = SqliteStorage::in_memory().unwrap();
        let habit = storage.create_habit(&new_habit("Read", "daily")).unwrap();
        let other = storage.create_habit(&new_habit("Walk", "daily")).unwrap();
        storage.add_completion(habit.id, at(3, 9)).unwrap();
        storage.add_completion(habit.id, at(4, 9)).unwrap();
        storage.add_completion(other.id, at(4, 9)).unwrap();

        assert_eq!(storage.delete_habit(habit.id).unwrap(), 2);
        assert!(storage.get_habit(habit.id).unwrap().is_none());
        assert!(storage.list_completions(habit.id).unwrap().is_empty());
        assert_eq!(storage.list_completions(other.id).unwrap().len(), 1);

        assert!(matches!(
            storage.delete_habit(habit.id),
            Err(StorageError::HabitNotFound { .. })
        ));
    }

    #[test]
    fn test_update_habit() {
        let storage = SqliteStorage::in_memory().unwrap();
        let mut habit = storage.create_habit(&new_habit("Read", "daily")).unwrap();
        habit.name = "Read More".to_string();
        habit.periodicity = Periodicity::Monthly;
        storage.update_habit(&habit).unwrap();

        let loaded = storage.get_habit(habit.id).unwrap().unwrap();
        assert_eq!(loaded.name, "Read More");
        assert_eq!(loaded.periodicity, Periodicity::Monthly);
    }

    #[test]
    fn test_unknown_stored_periodicity_is_rejected() {
        let storage = SqliteStorage::in_memory().unwrap();
        let habit = storage.create_habit(&new_habit("Read", "daily")).unwrap();
        storage
            .conn
            .execute("PRAGMA ignore_check_constraints = ON", [])
            .unwrap();
        storage
            .conn
            .execute("UPDATE habits SET periodicity = 'hourly' WHERE id = ?1", params![habit.id])
            .unwrap();

        assert!(storage.get_habit(habit.id).is_err());
    }
}
