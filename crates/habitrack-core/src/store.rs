//! Habit lifecycle store.
//!
//! Holds the three lifecycle partitions, the category registry and the most
//! recent backend error. Every mutation goes through the [`HabitService`]
//! and is followed by a fresh [`HabitStore::load`], so the partitions always
//! mirror what the backend last reported.
//!
//! Operations take `&self`. Overlapping calls may interleave; whichever
//! `load()` completes last defines the visible state.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::category::CategoryRegistry;
use crate::error::{CoreError, Result, TransportError, ValidationError};
use crate::events::Event;
use crate::habit::form::{DEFAULT_DURATION_MINUTES, DEFAULT_TARGET_COUNT};
use crate::habit::mapper::habit_from_wire;
use crate::habit::wire::{CounterWire, TimerWire};
use crate::habit::{Habit, HabitForm, LifecycleState, Progress};
use crate::service::HabitService;

/// Store settings supplied by the embedding application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Owner of created habits and of the category listing.
    pub user_id: i64,
    /// Start the registry with the stock categories.
    pub seed_default_categories: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            user_id: 1,
            seed_default_categories: true,
        }
    }
}

/// Habits split by lifecycle state. Ids are unique across all three.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Partitions {
    pub active: Vec<Habit>,
    pub completed: Vec<Habit>,
    pub skipped: Vec<Habit>,
}

impl Partitions {
    /// Partition habits by lifecycle. Later duplicates of an id are dropped.
    pub fn from_habits(habits: impl IntoIterator<Item = Habit>) -> Self {
        let mut seen = HashSet::new();
        let mut partitions = Self::default();
        for habit in habits {
            if !seen.insert(habit.id) {
                debug!(id = habit.id, "dropping duplicate habit id");
                continue;
            }
            match habit.lifecycle {
                LifecycleState::Active => partitions.active.push(habit),
                LifecycleState::Completed => partitions.completed.push(habit),
                LifecycleState::Skipped => partitions.skipped.push(habit),
            }
        }
        partitions
    }

    pub fn find(&self, id: i64) -> Option<&Habit> {
        self.iter().find(|h| h.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Habit> {
        self.active
            .iter()
            .chain(self.completed.iter())
            .chain(self.skipped.iter())
    }

    pub fn len(&self) -> usize {
        self.active.len() + self.completed.len() + self.skipped.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Default)]
struct StoreState {
    partitions: Partitions,
    categories: CategoryRegistry,
    last_error: Option<String>,
}

pub struct HabitStore<S: HabitService> {
    service: S,
    config: StoreConfig,
    state: RwLock<StoreState>,
    torn_down: AtomicBool,
}

impl<S: HabitService> HabitStore<S> {
    pub fn new(service: S, config: StoreConfig) -> Self {
        let categories = if config.seed_default_categories {
            CategoryRegistry::with_defaults()
        } else {
            CategoryRegistry::new()
        };
        Self {
            service,
            config,
            state: RwLock::new(StoreState {
                categories,
                ..StoreState::default()
            }),
            torn_down: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub async fn find(&self, id: i64) -> Option<Habit> {
        self.state.read().await.partitions.find(id).cloned()
    }

    pub async fn partitions(&self) -> Partitions {
        self.state.read().await.partitions.clone()
    }

    pub async fn active(&self) -> Vec<Habit> {
        self.state.read().await.partitions.active.clone()
    }

    pub async fn completed(&self) -> Vec<Habit> {
        self.state.read().await.partitions.completed.clone()
    }

    pub async fn skipped(&self) -> Vec<Habit> {
        self.state.read().await.partitions.skipped.clone()
    }

    pub async fn categories(&self) -> CategoryRegistry {
        self.state.read().await.categories.clone()
    }

    /// Message of the most recent backend failure, if not yet cleared.
    pub async fn last_error(&self) -> Option<String> {
        self.state.read().await.last_error.clone()
    }

    pub async fn dismiss_error(&self) {
        self.state.write().await.last_error = None;
    }

    /// Detach the store from its owner. Results arriving afterwards are
    /// dropped instead of applied.
    pub fn teardown(&self) {
        if !self.torn_down.swap(true, Ordering::SeqCst) {
            debug!("habit store torn down");
        }
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down.load(Ordering::SeqCst)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Fetch all habits and replace the partitions.
    ///
    /// Returns `None` when the store was torn down before the response
    /// arrived.
    pub async fn load(&self) -> Result<Option<Event>> {
        let wires = match self.service.list_habits().await {
            Ok(wires) => wires,
            Err(err) => return self.fail(err).await,
        };
        let partitions = Partitions::from_habits(wires.into_iter().map(habit_from_wire));

        if self.is_torn_down() {
            debug!("discarding habit list received after teardown");
            return Ok(None);
        }

        let event = Event::HabitsLoaded {
            active: partitions.active.len(),
            completed: partitions.completed.len(),
            skipped: partitions.skipped.len(),
            at: Utc::now(),
        };
        let mut state = self.state.write().await;
        state.partitions = partitions;
        state.last_error = None;
        info!(total = state.partitions.len(), "habits loaded");
        Ok(Some(event))
    }

    /// Merge the user's backend categories into the registry.
    /// Returns the slugs that were newly added.
    pub async fn load_categories(&self) -> Result<Vec<String>> {
        let remote = match self
            .service
            .list_categories_for_user(self.config.user_id)
            .await
        {
            Ok(remote) => remote,
            Err(err) => return self.fail(err).await,
        };
        if self.is_torn_down() {
            return Ok(Vec::new());
        }
        let mut state = self.state.write().await;
        let added = state.categories.merge_remote(remote);
        state.last_error = None;
        debug!(added = added.len(), "categories merged");
        Ok(added)
    }

    pub async fn complete(&self, id: i64) -> Result<Option<Event>> {
        self.transition(id, LifecycleState::Completed).await
    }

    pub async fn skip(&self, id: i64) -> Result<Option<Event>> {
        self.transition(id, LifecycleState::Skipped).await
    }

    pub async fn remove(&self, id: i64) -> Result<Option<Event>> {
        if self.find(id).await.is_none() {
            debug!(id, "remove: habit not loaded, ignoring");
            return Ok(None);
        }
        if let Err(err) = self.service.delete_habit(id).await {
            return self.fail(err).await;
        }
        self.load().await?;
        Ok(Some(Event::HabitDeleted { id, at: Utc::now() }))
    }

    /// Create a habit (`existing_id == None`) or update a loaded one.
    ///
    /// The form is validated before any request is made; validation errors
    /// are returned but not recorded as the store error. Editing an id that
    /// is not loaded is a no-op.
    pub async fn upsert(&self, form: &HabitForm, existing_id: Option<i64>) -> Result<Option<Event>> {
        let today = Local::now().date_naive();
        let (payload, existing) = {
            let state = self.state.read().await;
            let existing = match existing_id {
                Some(id) => match state.partitions.find(id) {
                    Some(habit) => Some(habit.clone()),
                    None => {
                        debug!(id, "upsert: habit not loaded, ignoring");
                        return Ok(None);
                    }
                },
                None => None,
            };
            let payload = form.to_payload(&state.categories, existing.as_ref(), today)?;
            (payload, existing)
        };

        if let Some(habit) = &existing {
            if habit.kind != form.kind {
                warn!(
                    id = habit.id,
                    from = %habit.kind,
                    to = %form.kind,
                    "habit kind changed on edit; carrying progress for the new kind only"
                );
            }
        }

        let user_id = self.config.user_id;
        let saved = match &existing {
            Some(habit) => self.service.update_habit(habit.id, user_id, &payload).await,
            None => self.service.create_habit(user_id, &payload).await,
        };
        let saved = match saved {
            Ok(saved) => saved,
            Err(err) => return self.fail(err).await,
        };
        info!(id = saved.id, created = existing.is_none(), "habit saved");

        self.load().await?;
        Ok(Some(Event::HabitSaved {
            id: saved.id,
            created: existing.is_none(),
            at: Utc::now(),
        }))
    }

    /// Register a new local category and return its slug.
    pub async fn register_category(&self, name: &str, color: &str) -> String {
        let slug = self.state.write().await.categories.register(name, color);
        debug!(%slug, "category registered");
        slug
    }

    /// Persist counter or timer progress for a loaded habit.
    ///
    /// The amount is clamped to the habit's target. A habit without a
    /// target is measured against the form defaults.
    pub async fn record_progress(&self, id: i64, progress: Progress) -> Result<Option<Event>> {
        let Some(habit) = self.find(id).await else {
            debug!(id, "record_progress: habit not loaded, ignoring");
            return Ok(None);
        };
        if habit.kind != progress.kind() {
            return Err(ValidationError::ProgressKindMismatch {
                id,
                kind: habit.kind.to_string(),
                progress: progress.kind().to_string(),
            }
            .into());
        }

        let (sent, achieved) = match progress {
            Progress::Count(count) => {
                let target = habit.target_count.unwrap_or(DEFAULT_TARGET_COUNT).max(1);
                let achieved = count.min(target);
                let wire = CounterWire {
                    repeticiones_objetivo: target,
                    repeticiones_logradas: achieved,
                };
                (self.service.update_counter_progress(id, wire).await, u64::from(achieved))
            }
            Progress::Seconds(secs) => {
                let target = habit
                    .target_seconds
                    .unwrap_or(DEFAULT_DURATION_MINUTES * 60);
                let achieved = secs.min(target);
                let wire = TimerWire {
                    duracion_objetivo: target,
                    tiempo_logrado: achieved,
                };
                (self.service.update_timer_progress(id, wire).await, achieved)
            }
        };
        if let Err(err) = sent {
            return self.fail(err).await;
        }

        self.load().await?;
        Ok(Some(Event::ProgressRecorded {
            id,
            achieved,
            at: Utc::now(),
        }))
    }

    async fn transition(&self, id: i64, target: LifecycleState) -> Result<Option<Event>> {
        if self.find(id).await.is_none() {
            debug!(id, state = %target, "transition: habit not loaded, ignoring");
            return Ok(None);
        }
        if let Err(err) = self.service.set_habit_state(id, target.code()).await {
            return self.fail(err).await;
        }
        self.load().await?;
        Ok(Some(Event::HabitStateChanged {
            id,
            state: target,
            at: Utc::now(),
        }))
    }

    async fn fail<T>(&self, err: TransportError) -> Result<T> {
        warn!(error = %err, "habit service call failed");
        if !self.is_torn_down() {
            self.state.write().await.last_error = Some(err.to_string());
        }
        Err(CoreError::Transport(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habit::{CategoryRef, HabitKind};

    fn habit(id: i64, lifecycle: LifecycleState) -> Habit {
        Habit {
            id,
            name: format!("habit {id}"),
            description: String::new(),
            kind: HabitKind::Plain,
            category: CategoryRef::uncategorized(),
            start_date: None,
            end_date: None,
            reminder: None,
            target_count: None,
            achieved_count: None,
            target_seconds: None,
            achieved_seconds: None,
            lifecycle,
        }
    }

    #[test]
    fn partitions_keep_first_occurrence() {
        let partitions = Partitions::from_habits(vec![
            habit(1, LifecycleState::Active),
            habit(2, LifecycleState::Completed),
            habit(1, LifecycleState::Skipped),
        ]);
        assert_eq!(partitions.len(), 2);
        assert_eq!(partitions.active.len(), 1);
        assert!(partitions.skipped.is_empty());
        assert_eq!(
            partitions.find(1).map(|h| h.lifecycle),
            Some(LifecycleState::Active)
        );
    }

    #[test]
    fn default_config_seeds_categories() {
        let config = StoreConfig::default();
        assert_eq!(config.user_id, 1);
        assert!(config.seed_default_categories);
    }
}
