//! Create/edit form values and their translation into a wire payload.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::wire::{CategoryTag, CounterWire, HabitPayload, TimerWire};
use super::{Habit, HabitKind, LifecycleState};
use crate::calendar::parse_iso;
use crate::category::CategoryRegistry;
use crate::error::ValidationError;

pub const DEFAULT_REMINDER: &str = "07:30";
pub const DEFAULT_TARGET_COUNT: u32 = 1;
pub const DEFAULT_DURATION_MINUTES: u64 = 25;
/// Shortest countdown a timed habit may be saved with.
pub const MIN_DURATION_SECS: u64 = 60;

/// Raw values of the create/edit form.
///
/// Numeric fields are kept as the text the user typed so malformed input
/// can be reported as a form-level [`ValidationError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitForm {
    pub name: String,
    pub description: String,
    pub kind: HabitKind,
    /// Slug of the selected category.
    pub category: Option<String>,
    /// ISO date; blank means today.
    pub start_date: String,
    pub end_date: Option<String>,
    pub reminder: Option<String>,
    pub target_count: Option<String>,
    pub duration_minutes: Option<String>,
}

impl Default for HabitForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            kind: HabitKind::Plain,
            category: None,
            start_date: String::new(),
            end_date: None,
            reminder: Some(DEFAULT_REMINDER.to_string()),
            target_count: Some(DEFAULT_TARGET_COUNT.to_string()),
            duration_minutes: Some(DEFAULT_DURATION_MINUTES.to_string()),
        }
    }
}

/// Progress reported by a counter or timer widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Progress {
    Count(u32),
    Seconds(u64),
}

impl Progress {
    pub fn kind(&self) -> HabitKind {
        match self {
            Progress::Count(_) => HabitKind::Counter,
            Progress::Seconds(_) => HabitKind::Timed,
        }
    }

    pub fn amount(&self) -> u64 {
        match *self {
            Progress::Count(n) => u64::from(n),
            Progress::Seconds(s) => s,
        }
    }
}

impl HabitForm {
    /// Prefill the form from an existing habit for editing.
    ///
    /// The category is matched by name; when no registered category matches,
    /// the first one in the registry is preselected.
    pub fn from_habit(habit: &Habit, registry: &CategoryRegistry) -> Self {
        let category = registry
            .find_by_name(&habit.category.name)
            .or_else(|| registry.iter().next())
            .map(|c| c.slug.clone());
        let minutes = habit
            .target_seconds
            .map(|secs| (secs / 60).max(1))
            .unwrap_or(DEFAULT_DURATION_MINUTES);

        Self {
            name: habit.name.clone(),
            description: habit.description.clone(),
            kind: habit.kind,
            category,
            start_date: habit.start_date.clone().unwrap_or_default(),
            end_date: habit.end_date.clone(),
            reminder: Some(
                habit
                    .reminder
                    .clone()
                    .unwrap_or_else(|| DEFAULT_REMINDER.to_string()),
            ),
            target_count: Some(habit.target_count.unwrap_or(DEFAULT_TARGET_COUNT).to_string()),
            duration_minutes: Some(minutes.to_string()),
        }
    }

    /// Validate the form and build the request body.
    ///
    /// `existing` is the habit being edited: its lifecycle code is kept and
    /// its achieved progress is carried forward. No I/O happens here, so a
    /// validation failure never reaches the backend.
    pub fn to_payload(
        &self,
        registry: &CategoryRegistry,
        existing: Option<&Habit>,
        today: NaiveDate,
    ) -> Result<HabitPayload, ValidationError> {
        let slug = self
            .category
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ValidationError::MissingCategory)?;
        let category = registry
            .get(slug)
            .ok_or_else(|| ValidationError::UnknownCategory(slug.to_string()))?;

        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingName);
        }

        let carried = existing.map(|h| h.carried_progress(self.kind)).unwrap_or(0);

        let repeticiones = match self.kind {
            HabitKind::Counter => {
                let target = parse_number(
                    "target_count",
                    self.target_count.as_deref(),
                    u64::from(DEFAULT_TARGET_COUNT),
                )?;
                let target = u32::try_from(target).map_err(|_| ValidationError::MalformedNumber {
                    field: "target_count".into(),
                    value: target.to_string(),
                })?;
                let target = target.max(1);
                let carried = u32::try_from(carried).unwrap_or(u32::MAX);
                Some(CounterWire {
                    repeticiones_objetivo: target,
                    repeticiones_logradas: carried.min(target),
                })
            }
            _ => None,
        };

        let duracion = match self.kind {
            HabitKind::Timed => {
                let minutes = parse_number(
                    "duration_minutes",
                    self.duration_minutes.as_deref(),
                    DEFAULT_DURATION_MINUTES,
                )?;
                let duracion_objetivo = minutes.saturating_mul(60).max(MIN_DURATION_SECS);
                Some(TimerWire {
                    duracion_objetivo,
                    tiempo_logrado: carried.min(duracion_objetivo),
                })
            }
            _ => None,
        };

        let fecha_inicio = match self.start_date.trim() {
            "" => today.format("%Y-%m-%d").to_string(),
            raw => normalize_date(raw),
        };

        Ok(HabitPayload {
            nombre: name.to_string(),
            descripcion: self.description.clone(),
            id_tipo: self.kind.type_code(),
            id_estado: existing
                .map(|h| h.lifecycle)
                .unwrap_or(LifecycleState::Active)
                .code(),
            fecha_inicio,
            fecha_fin: self
                .end_date
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(normalize_date),
            recordatorio: self
                .reminder
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            categorias: vec![CategoryTag {
                nombre: category.name.clone(),
                color: category.color.clone(),
            }],
            repeticiones,
            duracion,
        })
    }
}

fn parse_number(field: &str, raw: Option<&str>, default: u64) -> Result<u64, ValidationError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(text) => text.parse::<u64>().map_err(|_| ValidationError::MalformedNumber {
            field: field.to_string(),
            value: text.to_string(),
        }),
    }
}

/// Pad `Y-M-D` to `YYYY-MM-DD`; anything unparseable is passed through.
fn normalize_date(raw: &str) -> String {
    parse_iso(raw)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habit::CategoryRef;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn registry() -> (CategoryRegistry, String) {
        let mut registry = CategoryRegistry::new();
        let slug = registry.register("Salud Física", "#4CAF50");
        (registry, slug)
    }

    fn existing(kind: HabitKind) -> Habit {
        Habit {
            id: 10,
            name: "Correr".into(),
            description: String::new(),
            kind,
            category: CategoryRef {
                name: "Salud Física".into(),
                color: "#4CAF50".into(),
            },
            start_date: Some("2025-01-01".into()),
            end_date: None,
            reminder: None,
            target_count: Some(8),
            achieved_count: Some(3),
            target_seconds: Some(900),
            achieved_seconds: Some(120),
            lifecycle: LifecycleState::Completed,
        }
    }

    #[test]
    fn missing_category_is_rejected() {
        let (registry, _) = registry();
        let form = HabitForm {
            name: "Leer".into(),
            kind: HabitKind::Counter,
            target_count: Some("5".into()),
            ..HabitForm::default()
        };
        assert_eq!(
            form.to_payload(&registry, None, today()),
            Err(ValidationError::MissingCategory)
        );
    }

    #[test]
    fn unknown_category_and_blank_name_are_rejected() {
        let (registry, slug) = registry();
        let form = HabitForm {
            name: "Leer".into(),
            category: Some("nope".into()),
            ..HabitForm::default()
        };
        assert_eq!(
            form.to_payload(&registry, None, today()),
            Err(ValidationError::UnknownCategory("nope".into()))
        );

        let form = HabitForm {
            name: "   ".into(),
            category: Some(slug),
            ..HabitForm::default()
        };
        assert_eq!(
            form.to_payload(&registry, None, today()),
            Err(ValidationError::MissingName)
        );
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        let (registry, slug) = registry();
        let form = HabitForm {
            name: "Leer".into(),
            kind: HabitKind::Timed,
            category: Some(slug),
            duration_minutes: Some("25m".into()),
            ..HabitForm::default()
        };
        assert!(matches!(
            form.to_payload(&registry, None, today()),
            Err(ValidationError::MalformedNumber { .. })
        ));
    }

    #[test]
    fn plain_habit_sends_neither_sub_object() {
        let (registry, slug) = registry();
        let form = HabitForm {
            name: " Meditar ".into(),
            category: Some(slug),
            ..HabitForm::default()
        };
        let payload = form.to_payload(&registry, None, today()).unwrap();
        assert_eq!(payload.nombre, "Meditar");
        assert_eq!(payload.id_tipo, 1);
        assert_eq!(payload.id_estado, 1);
        assert_eq!(payload.fecha_inicio, "2025-06-15");
        assert_eq!(payload.recordatorio.as_deref(), Some("07:30"));
        assert!(payload.repeticiones.is_none());
        assert!(payload.duracion.is_none());
        assert_eq!(payload.categorias[0].nombre, "Salud Física");
    }

    #[test]
    fn counter_and_timer_bounds_are_applied() {
        let (registry, slug) = registry();
        let counter = HabitForm {
            name: "Agua".into(),
            kind: HabitKind::Counter,
            category: Some(slug.clone()),
            target_count: Some("0".into()),
            ..HabitForm::default()
        };
        let payload = counter.to_payload(&registry, None, today()).unwrap();
        assert_eq!(payload.repeticiones.unwrap().repeticiones_objetivo, 1);
        assert!(payload.duracion.is_none());

        let timer = HabitForm {
            name: "Foco".into(),
            kind: HabitKind::Timed,
            category: Some(slug),
            duration_minutes: Some("0".into()),
            ..HabitForm::default()
        };
        let payload = timer.to_payload(&registry, None, today()).unwrap();
        assert_eq!(payload.duracion.unwrap().duracion_objetivo, 60);
        assert!(payload.repeticiones.is_none());
    }

    #[test]
    fn edit_carries_progress_and_state_forward() {
        let (registry, slug) = registry();
        let habit = existing(HabitKind::Counter);
        let form = HabitForm {
            category: Some(slug),
            target_count: Some("10".into()),
            start_date: "2025-1-2".into(),
            ..HabitForm::from_habit(&habit, &registry)
        };
        let payload = form.to_payload(&registry, Some(&habit), today()).unwrap();
        let counter = payload.repeticiones.unwrap();
        assert_eq!(counter.repeticiones_objetivo, 10);
        assert_eq!(counter.repeticiones_logradas, 3);
        assert_eq!(payload.id_estado, 2);
        assert_eq!(payload.fecha_inicio, "2025-01-02");
    }

    #[test]
    fn lowered_target_clamps_carried_progress() {
        let (registry, slug) = registry();
        let counter = Habit {
            target_count: Some(10),
            achieved_count: Some(8),
            ..existing(HabitKind::Counter)
        };
        let form = HabitForm {
            category: Some(slug.clone()),
            target_count: Some("3".into()),
            ..HabitForm::from_habit(&counter, &registry)
        };
        let payload = form.to_payload(&registry, Some(&counter), today()).unwrap();
        let wire = payload.repeticiones.unwrap();
        assert_eq!(wire.repeticiones_objetivo, 3);
        assert_eq!(wire.repeticiones_logradas, 3);

        let timer = Habit {
            target_seconds: Some(1500),
            achieved_seconds: Some(1200),
            ..existing(HabitKind::Timed)
        };
        let form = HabitForm {
            category: Some(slug),
            duration_minutes: Some("5".into()),
            ..HabitForm::from_habit(&timer, &registry)
        };
        let payload = form.to_payload(&registry, Some(&timer), today()).unwrap();
        let wire = payload.duracion.unwrap();
        assert_eq!(wire.duracion_objetivo, 300);
        assert_eq!(wire.tiempo_logrado, 300);
    }

    #[test]
    fn kind_change_carries_matching_progress() {
        let (registry, slug) = registry();
        let habit = existing(HabitKind::Counter);
        let form = HabitForm {
            kind: HabitKind::Timed,
            category: Some(slug),
            ..HabitForm::from_habit(&habit, &registry)
        };
        let payload = form.to_payload(&registry, Some(&habit), today()).unwrap();
        assert_eq!(payload.duracion.unwrap().tiempo_logrado, 120);
        assert!(payload.repeticiones.is_none());
    }

    #[test]
    fn from_habit_prefills_category_and_duration() {
        let (registry, slug) = registry();
        let form = HabitForm::from_habit(&existing(HabitKind::Timed), &registry);
        assert_eq!(form.category, Some(slug));
        assert_eq!(form.duration_minutes.as_deref(), Some("15"));
        assert_eq!(form.reminder.as_deref(), Some("07:30"));
    }
}
