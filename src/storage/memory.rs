/// In-memory implementation of the habit storage interface
///
/// Each habit record owns its completions, so removing the record removes
/// them with it. Useful for tests and for computing analytics over data that
/// never touches disk.

use std::cell::RefCell;
use std::collections::BTreeMap;
use chrono::NaiveDateTime;

use crate::domain::{Completion, CompletionId, Habit, HabitId, NewHabit, Periodicity};
use crate::storage::{HabitStorage, StorageError};

#[derive(Debug)]
struct HabitRecord {
    habit: Habit,
    completions: Vec<Completion>,
}

#[derive(Debug, Default)]
struct MemoryState {
    last_habit_id: i64,
    last_completion_id: i64,
    habits: BTreeMap<HabitId, HabitRecord>,
}

/// Storage backed by plain collections; not shared across threads
#[derive(Debug, Default)]
pub struct MemoryStorage {
    state: RefCell<MemoryState>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_found(habit_id: HabitId) -> StorageError {
    StorageError::HabitNotFound {
        habit_id: habit_id.to_string(),
    }
}

impl HabitStorage for MemoryStorage {
    fn create_habit(&self, habit: &NewHabit) -> Result<Habit, StorageError> {
        let mut state = self.state.borrow_mut();
        state.last_habit_id += 1;
        let id = HabitId(state.last_habit_id);

        let stored = Habit::from_existing(
            id,
            habit.name.clone(),
            habit.description.clone(),
            habit.periodicity,
            habit.created_at,
        );
        state.habits.insert(
            id,
            HabitRecord {
                habit: stored.clone(),
                completions: Vec::new(),
            },
        );
        Ok(stored)
    }

    fn get_habit(&self, habit_id: HabitId) -> Result<Option<Habit>, StorageError> {
        let state = self.state.borrow();
        Ok(state.habits.get(&habit_id).map(|r| r.habit.clone()))
    }

    fn find_by_name(&self, name: &str) -> Result<Vec<Habit>, StorageError> {
        let state = self.state.borrow();
        Ok(state
            .habits
            .values()
            .filter(|r| r.habit.name == name)
            .map(|r| r.habit.clone())
            .collect())
    }

    fn update_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        let mut state = self.state.borrow_mut();
        let record = state.habits.get_mut(&habit.id).ok_or_else(|| not_found(habit.id))?;
        record.habit = habit.clone();
        Ok(())
    }

    fn delete_habit(&self, habit_id: HabitId) -> Result<usize, StorageError> {
        let mut state = self.state.borrow_mut();
        let record = state.habits.remove(&habit_id).ok_or_else(|| not_found(habit_id))?;
        Ok(record.completions.len())
    }

    fn list_habits(&self, periodicity: Option<Periodicity>) -> Result<Vec<Habit>, StorageError> {
        let state = self.state.borrow();
        Ok(state
            .habits
            .values()
            .filter(|r| periodicity.map_or(true, |p| r.habit.periodicity == p))
            .map(|r| r.habit.clone())
            .collect())
    }

    fn add_completion(&self, habit_id: HabitId, completed_at: NaiveDateTime) -> Result<Completion, StorageError> {
        let mut state = self.state.borrow_mut();
        let id = CompletionId(state.last_completion_id + 1);
        let record = state.habits.get_mut(&habit_id).ok_or_else(|| not_found(habit_id))?;

        let completion = Completion::from_existing(id, habit_id, completed_at);
        record.completions.push(completion.clone());
        state.last_completion_id = id.0;
        Ok(completion)
    }

    fn list_completion_records(&self, habit_id: HabitId) -> Result<Vec<Completion>, StorageError> {
        let state = self.state.borrow();
        let mut completions = state
            .habits
            .get(&habit_id)
            .map(|r| r.completions.clone())
            .unwrap_or_default();
        completions.sort_by_key(|c| (c.completed_at, c.id.0));
        Ok(completions)
    }
}
