//! Wire-to-domain mapping.

use tracing::warn;

use super::wire::{CategoryTag, HabitWire};
use super::{CategoryRef, Habit, HabitKind, LifecycleState};

/// Map a backend habit to the domain model.
///
/// The effective category is the first tag; an empty tag list maps to the
/// "Uncategorized" sentinel. Kind-specific progress is only kept when it
/// matches the habit's kind.
pub fn habit_from_wire(wire: HabitWire) -> Habit {
    let kind = HabitKind::from_tag(&wire.tipo).unwrap_or_else(|| {
        warn!(id = wire.id, tipo = %wire.tipo, "unknown habit kind tag, treating as plain");
        HabitKind::Plain
    });

    let category = wire
        .categorias
        .into_iter()
        .next()
        .map(category_ref_from_tag)
        .unwrap_or_else(CategoryRef::uncategorized);

    let (target_count, achieved_count) = match (kind, wire.repeticiones) {
        (HabitKind::Counter, Some(c)) => (
            Some(c.repeticiones_objetivo),
            Some(c.repeticiones_logradas),
        ),
        (HabitKind::Counter, None) => (None, Some(0)),
        _ => (None, None),
    };

    let (target_seconds, achieved_seconds) = match (kind, wire.duracion) {
        (HabitKind::Timed, Some(t)) => (Some(t.duracion_objetivo), Some(t.tiempo_logrado)),
        (HabitKind::Timed, None) => (None, Some(0)),
        _ => (None, None),
    };

    Habit {
        id: wire.id,
        name: wire.nombre,
        description: wire.descripcion,
        kind,
        category,
        start_date: non_empty(wire.fecha_inicio),
        end_date: non_empty(wire.fecha_fin),
        reminder: non_empty(wire.recordatorio),
        target_count,
        achieved_count,
        target_seconds,
        achieved_seconds,
        lifecycle: LifecycleState::from_code(wire.id_estado),
    }
}

fn category_ref_from_tag(tag: CategoryTag) -> CategoryRef {
    if tag.nombre.trim().is_empty() {
        return CategoryRef::uncategorized();
    }
    CategoryRef {
        name: tag.nombre,
        color: tag.color,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habit::wire::{CounterWire, TimerWire};

    fn wire(tipo: &str) -> HabitWire {
        HabitWire {
            id: 1,
            nombre: "Caminar".into(),
            descripcion: String::new(),
            tipo: tipo.into(),
            fecha_inicio: Some("2025-03-01".into()),
            fecha_fin: Some(String::new()),
            recordatorio: None,
            categorias: vec![],
            repeticiones: None,
            duracion: None,
            id_estado: None,
        }
    }

    #[test]
    fn empty_tag_list_maps_to_uncategorized() {
        let habit = habit_from_wire(wire("Normal"));
        assert!(habit.category.is_uncategorized());
        assert_eq!(habit.lifecycle, LifecycleState::Active);
        assert_eq!(habit.end_date, None);
    }

    #[test]
    fn first_tag_wins() {
        let mut w = wire("Normal");
        w.categorias = vec![
            CategoryTag {
                nombre: "Salud Física".into(),
                color: "#4CAF50".into(),
            },
            CategoryTag {
                nombre: "Social".into(),
                color: "#FF7043".into(),
            },
        ];
        let habit = habit_from_wire(w);
        assert_eq!(habit.category.name, "Salud Física");
        assert_eq!(habit.category.color, "#4CAF50");
    }

    #[test]
    fn counter_progress_only_for_counter_kind() {
        let mut w = wire("Normal");
        w.repeticiones = Some(CounterWire {
            repeticiones_objetivo: 3,
            repeticiones_logradas: 1,
        });
        let plain = habit_from_wire(w.clone());
        assert_eq!(plain.target_count, None);

        w.tipo = "Contadora".into();
        let counter = habit_from_wire(w);
        assert_eq!(counter.kind, HabitKind::Counter);
        assert_eq!(counter.target_count, Some(3));
        assert_eq!(counter.achieved_count, Some(1));
    }

    #[test]
    fn timed_habit_maps_seconds() {
        let mut w = wire("Cronometrada");
        w.duracion = Some(TimerWire {
            duracion_objetivo: 1500,
            tiempo_logrado: 300,
        });
        w.id_estado = Some(3);
        let habit = habit_from_wire(w);
        assert_eq!(habit.kind, HabitKind::Timed);
        assert_eq!(habit.target_seconds, Some(1500));
        assert_eq!(habit.achieved_seconds, Some(300));
        assert_eq!(habit.lifecycle, LifecycleState::Skipped);
    }

    #[test]
    fn unknown_kind_degrades_to_plain() {
        let habit = habit_from_wire(wire("Semanal"));
        assert_eq!(habit.kind, HabitKind::Plain);
    }
}
