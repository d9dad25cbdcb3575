//! Wire representation exchanged with the habit-persistence service.
//!
//! Field names follow the backend's JSON (camelCase, Spanish). Two
//! generations of the response shape exist in the wild (`id` vs `idHabito`,
//! `repeticiones` vs `habitoContador`, `duracion` vs `habitoTemporizado`);
//! both are accepted on input, the newer names are emitted on output.

use serde::{Deserialize, Deserializer, Serialize};

/// Treat an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `{nombre, color}` category tag attached to a habit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTag {
    pub nombre: String,
    pub color: String,
}

/// Category as listed for a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryWire {
    pub id_categoria: i64,
    pub nombre: String,
    pub color: String,
}

/// Counter sub-object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterWire {
    pub repeticiones_objetivo: u32,
    #[serde(default)]
    pub repeticiones_logradas: u32,
}

/// Timer sub-object, both values in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerWire {
    pub duracion_objetivo: u64,
    #[serde(default)]
    pub tiempo_logrado: u64,
}

/// Habit as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitWire {
    #[serde(alias = "idHabito")]
    pub id: i64,
    pub nombre: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub descripcion: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tipo: String,
    #[serde(default)]
    pub fecha_inicio: Option<String>,
    #[serde(default)]
    pub fecha_fin: Option<String>,
    #[serde(default)]
    pub recordatorio: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub categorias: Vec<CategoryTag>,
    #[serde(default, alias = "habitoContador")]
    pub repeticiones: Option<CounterWire>,
    #[serde(default, alias = "habitoTemporizado")]
    pub duracion: Option<TimerWire>,
    #[serde(default)]
    pub id_estado: Option<i64>,
}

/// Body of create and update requests.
///
/// `repeticiones` and `duracion` are mutually exclusive and serialize as
/// explicit `null` when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitPayload {
    pub nombre: String,
    pub descripcion: String,
    pub id_tipo: u8,
    pub id_estado: u8,
    pub fecha_inicio: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fecha_fin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recordatorio: Option<String>,
    pub categorias: Vec<CategoryTag>,
    pub repeticiones: Option<CounterWire>,
    pub duracion: Option<TimerWire>,
}
