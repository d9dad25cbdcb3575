//! In-process [`HabitService`] backed by a shared vector.
//!
//! Clones share state, so a test can keep one handle for inspection while
//! the store owns another.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use super::HabitService;
use crate::error::TransportError;
use crate::habit::wire::{CategoryWire, CounterWire, HabitPayload, HabitWire, TimerWire};
use crate::habit::HabitKind;

#[derive(Debug, Default)]
struct Backend {
    habits: Vec<HabitWire>,
    categories: BTreeMap<i64, Vec<CategoryWire>>,
    next_id: i64,
    fail_next: Option<String>,
    failing: Option<String>,
    calls: Vec<String>,
}

impl Backend {
    fn position(&self, id: i64) -> Result<usize, TransportError> {
        self.habits
            .iter()
            .position(|h| h.id == id)
            .ok_or_else(|| not_found(id))
    }

    fn allocate_id(&mut self) -> i64 {
        let floor = self.habits.iter().map(|h| h.id).max().unwrap_or(0);
        self.next_id = self.next_id.max(floor) + 1;
        self.next_id
    }
}

fn not_found(id: i64) -> TransportError {
    TransportError::Status {
        status: 404,
        message: format!("habit {id} not found"),
    }
}

fn wire_from_payload(id: i64, payload: &HabitPayload) -> HabitWire {
    let kind = HabitKind::from_type_code(payload.id_tipo).unwrap_or_default();
    HabitWire {
        id,
        nombre: payload.nombre.clone(),
        descripcion: payload.descripcion.clone(),
        tipo: kind.wire_tag().to_string(),
        fecha_inicio: Some(payload.fecha_inicio.clone()),
        fecha_fin: payload.fecha_fin.clone(),
        recordatorio: payload.recordatorio.clone(),
        categorias: payload.categorias.clone(),
        repeticiones: payload.repeticiones,
        duracion: payload.duracion,
        id_estado: Some(i64::from(payload.id_estado)),
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryHabitService {
    inner: Arc<Mutex<Backend>>,
}

impl InMemoryHabitService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the habit list. Order and duplicates are kept as given.
    pub fn with_habits(self, habits: Vec<HabitWire>) -> Self {
        self.lock().habits = habits;
        self
    }

    pub fn with_categories(self, user_id: i64, categories: Vec<CategoryWire>) -> Self {
        self.lock().categories.insert(user_id, categories);
        self
    }

    pub fn insert(&self, habit: HabitWire) {
        self.lock().habits.push(habit);
    }

    /// Current backend contents.
    pub fn habits(&self) -> Vec<HabitWire> {
        self.lock().habits.clone()
    }

    /// Make the next call fail with `message`.
    pub fn fail_next(&self, message: impl Into<String>) {
        self.lock().fail_next = Some(message.into());
    }

    /// Make every call fail until cleared with `None`.
    pub fn set_failing(&self, message: Option<String>) {
        self.lock().failing = message;
    }

    /// Calls received so far, e.g. `set_habit_state(4, 2)`.
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    fn lock(&self) -> MutexGuard<'_, Backend> {
        // A panic while holding the lock leaves plain data behind; keep using it.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn enter(&self, call: String) -> Result<MutexGuard<'_, Backend>, TransportError> {
        let mut backend = self.lock();
        debug!(%call, "in-memory habit service");
        backend.calls.push(call);
        if let Some(message) = backend.fail_next.take() {
            return Err(TransportError::Backend(message));
        }
        if let Some(message) = &backend.failing {
            return Err(TransportError::Backend(message.clone()));
        }
        Ok(backend)
    }
}

impl HabitService for InMemoryHabitService {
    async fn list_habits(&self) -> Result<Vec<HabitWire>, TransportError> {
        let backend = self.enter("list_habits".to_string())?;
        Ok(backend.habits.clone())
    }

    async fn get_habit(&self, id: i64) -> Result<HabitWire, TransportError> {
        let backend = self.enter(format!("get_habit({id})"))?;
        let index = backend.position(id)?;
        Ok(backend.habits[index].clone())
    }

    async fn create_habit(
        &self,
        user_id: i64,
        payload: &HabitPayload,
    ) -> Result<HabitWire, TransportError> {
        let mut backend = self.enter(format!("create_habit({user_id})"))?;
        let id = backend.allocate_id();
        let wire = wire_from_payload(id, payload);
        backend.habits.push(wire.clone());
        Ok(wire)
    }

    async fn update_habit(
        &self,
        id: i64,
        user_id: i64,
        payload: &HabitPayload,
    ) -> Result<HabitWire, TransportError> {
        let mut backend = self.enter(format!("update_habit({id}, {user_id})"))?;
        let index = backend.position(id)?;
        let wire = wire_from_payload(id, payload);
        backend.habits[index] = wire.clone();
        Ok(wire)
    }

    async fn delete_habit(&self, id: i64) -> Result<(), TransportError> {
        let mut backend = self.enter(format!("delete_habit({id})"))?;
        let index = backend.position(id)?;
        backend.habits.remove(index);
        Ok(())
    }

    async fn set_habit_state(&self, id: i64, state_code: u8) -> Result<(), TransportError> {
        let mut backend = self.enter(format!("set_habit_state({id}, {state_code})"))?;
        let index = backend.position(id)?;
        backend.habits[index].id_estado = Some(i64::from(state_code));
        Ok(())
    }

    async fn list_categories_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<CategoryWire>, TransportError> {
        let backend = self.enter(format!("list_categories_for_user({user_id})"))?;
        Ok(backend
            .categories
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn update_counter_progress(
        &self,
        id: i64,
        progress: CounterWire,
    ) -> Result<(), TransportError> {
        let mut backend = self.enter(format!(
            "update_counter_progress({id}, {})",
            progress.repeticiones_logradas
        ))?;
        let index = backend.position(id)?;
        backend.habits[index].repeticiones = Some(progress);
        Ok(())
    }

    async fn update_timer_progress(
        &self,
        id: i64,
        progress: TimerWire,
    ) -> Result<(), TransportError> {
        let mut backend = self.enter(format!(
            "update_timer_progress({id}, {})",
            progress.tiempo_logrado
        ))?;
        let index = backend.position(id)?;
        backend.habits[index].duracion = Some(progress);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(name: &str) -> HabitPayload {
        HabitPayload {
            nombre: name.into(),
            descripcion: String::new(),
            id_tipo: 2,
            id_estado: 1,
            fecha_inicio: "2025-03-01".into(),
            fecha_fin: None,
            recordatorio: None,
            categorias: vec![],
            repeticiones: Some(CounterWire {
                repeticiones_objetivo: 4,
                repeticiones_logradas: 0,
            }),
            duracion: None,
        }
    }

    #[tokio::test]
    async fn create_assigns_sequential_ids() {
        let service = InMemoryHabitService::new();
        let a = service.create_habit(1, &payload("a")).await.unwrap();
        let b = service.create_habit(1, &payload("b")).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));
        assert_eq!(a.tipo, "Contadora");
        assert_eq!(service.habits().len(), 2);
    }

    #[tokio::test]
    async fn fail_next_fails_exactly_once() {
        let service = InMemoryHabitService::new();
        service.fail_next("down");
        assert!(matches!(
            service.list_habits().await,
            Err(TransportError::Backend(m)) if m == "down"
        ));
        assert!(service.list_habits().await.is_ok());
        assert_eq!(service.call_count(), 2);
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let service = InMemoryHabitService::new();
        let err = service.set_habit_state(9, 2).await.unwrap_err();
        assert!(matches!(err, TransportError::Status { status: 404, .. }));
        assert_eq!(service.calls(), vec!["set_habit_state(9, 2)".to_string()]);
    }
}
