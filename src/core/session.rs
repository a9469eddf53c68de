//! Login and the foreman's working day.

use crate::core::service::FieldService;
use crate::core::validate;
use crate::errors::{AppError, AppResult};
use crate::models::user::User;
use crate::storage::kv::{KeyValueStore, keys, load_json, save_json};
use crate::storage::repository::JobRepository;

impl<R: JobRepository, S: KeyValueStore> FieldService<R, S> {
    /// Any non-empty username/password pair signs in as the crew foreman.
    pub fn login(&mut self, username: &str, password: &str) -> AppResult<User> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(AppError::InvalidCredentials);
        }

        let user = User::foreman();
        save_json(&mut self.store, keys::USER, &user)?;
        tracing::info!(user = %user.id, "logged in");
        Ok(user)
    }

    pub fn current_user(&self) -> AppResult<Option<User>> {
        load_json(&self.store, keys::USER)
    }

    /// The signed-in user, or `NotLoggedIn`.
    pub fn require_user(&self) -> AppResult<User> {
        self.current_user()?.ok_or(AppError::NotLoggedIn)
    }

    pub fn truck_number(&self) -> AppResult<Option<String>> {
        self.store.get(keys::TRUCK_NUMBER)
    }

    /// Record the truck for the day and stamp it on the schedule.
    pub fn start_day(&mut self, truck_number: &str) -> AppResult<usize> {
        let truck = validate::truck_number(truck_number)?;
        self.store.set(keys::TRUCK_NUMBER, truck)?;
        let stamped = self.repo.assign_truck(truck)?;
        tracing::info!(truck, stamped, "day started");
        Ok(stamped)
    }

    pub fn end_day(&mut self) -> AppResult<()> {
        self.clear_session()
    }

    pub fn logout(&mut self) -> AppResult<()> {
        self.clear_session()
    }

    /// Reset the schedule and forget who is driving what. Drafts, reminders
    /// and queued writes stay on the device.
    fn clear_session(&mut self) -> AppResult<()> {
        self.repo.reset_all()?;
        self.store.remove(keys::USER)?;
        self.store.remove(keys::TRUCK_NUMBER)?;
        tracing::info!("session cleared");
        Ok(())
    }
}
