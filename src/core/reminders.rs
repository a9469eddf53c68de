use crate::errors::{AppError, AppResult};
use crate::models::reminder::Reminder;
use crate::storage::kv::{KeyValueStore, keys, load_json, save_json};
use chrono::{NaiveDate, Utc};

/// Personal reminders kept under `app_reminders` on the device.
pub struct ReminderBook<'s, S: KeyValueStore + ?Sized> {
    store: &'s mut S,
}

impl<'s, S: KeyValueStore + ?Sized> ReminderBook<'s, S> {
    pub fn new(store: &'s mut S) -> Self {
        Self { store }
    }

    fn load(&self) -> AppResult<Vec<Reminder>> {
        Ok(load_json(&*self.store, keys::REMINDERS)?.unwrap_or_default())
    }

    fn save(&mut self, items: &[Reminder]) -> AppResult<()> {
        save_json(&mut *self.store, keys::REMINDERS, items)
    }

    /// `date` must be `YYYY-MM-DD`.
    pub fn add(&mut self, note: &str, date: &str) -> AppResult<Reminder> {
        let note = note.trim();
        if note.is_empty() {
            return Err(AppError::validation("Reminder note is required"));
        }
        let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
            .map_err(|_| AppError::InvalidDate(date.to_string()))?;

        let mut items = self.load()?;
        let id = items.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let reminder = Reminder {
            id,
            note: note.to_string(),
            date,
            created_at: Utc::now(),
        };
        items.push(reminder.clone());
        self.save(&items)?;
        Ok(reminder)
    }

    /// Sorted by date, then by creation order.
    pub fn list(&self) -> AppResult<Vec<Reminder>> {
        let mut items = self.load()?;
        items.sort_by_key(|r| (r.date, r.id));
        Ok(items)
    }

    pub fn remove(&mut self, id: u32) -> AppResult<Reminder> {
        let mut items = self.load()?;
        let pos = items
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| AppError::NotFound(format!("reminder {id}")))?;
        let removed = items.remove(pos);
        self.save(&items)?;
        Ok(removed)
    }
}
