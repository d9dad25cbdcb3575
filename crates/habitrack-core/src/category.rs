//! Category registry with unique slug allocation.
//!
//! Slugs are derived from the display name: lower-cased, Latin diacritics
//! folded to ASCII, runs of non-alphanumeric characters collapsed into a
//! single `-`. Collisions get `-1`, `-2`, ... appended until unique.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::habit::wire::CategoryWire;

/// Stock categories offered before the user defines their own.
pub const DEFAULT_CATEGORIES: [(&str, &str); 6] = [
    ("Salud Física", "#4CAF50"),
    ("Salud Mental y Emocional", "#2196F3"),
    ("Productividad y Organización", "#FFC107"),
    ("Relaciones y Vida Social", "#FF7043"),
    ("Crecimiento Personal", "#9C27B0"),
    ("Bienestar General / Otros", "#607D8B"),
];

const SEPARATOR: char = '-';

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub slug: String,
    pub name: String,
    pub color: String,
    /// Backend id, when the category came from the user's remote list.
    #[serde(default)]
    pub remote_id: Option<i64>,
}

/// Flat slug -> category mapping. Additive only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRegistry {
    entries: BTreeMap<String, Category>,
}

impl CategoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with [`DEFAULT_CATEGORIES`].
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for (name, color) in DEFAULT_CATEGORIES {
            registry.register(name, color);
        }
        registry
    }

    /// Allocate a unique slug for `name`, store the category and return
    /// the slug so the caller can preselect it.
    pub fn register(&mut self, name: &str, color: &str) -> String {
        self.insert(name, color, None)
    }

    /// Merge categories listed by the backend.
    ///
    /// A remote category whose name and color already exist only gets its
    /// remote id attached. Returns the slugs that were newly added.
    pub fn merge_remote(&mut self, remote: Vec<CategoryWire>) -> Vec<String> {
        let mut added = Vec::new();
        for wire in remote {
            let existing = self
                .entries
                .values_mut()
                .find(|c| c.name == wire.nombre && c.color.eq_ignore_ascii_case(&wire.color));
            match existing {
                Some(category) => {
                    category.remote_id.get_or_insert(wire.id_categoria);
                }
                None => {
                    added.push(self.insert(&wire.nombre, &wire.color, Some(wire.id_categoria)));
                }
            }
        }
        added
    }

    pub fn get(&self, slug: &str) -> Option<&Category> {
        self.entries.get(slug)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Category> {
        self.entries.values().find(|c| c.name == name)
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.entries.contains_key(slug)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Categories ordered by slug.
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.entries.values()
    }

    fn insert(&mut self, name: &str, color: &str, remote_id: Option<i64>) -> String {
        let slug = self.unique_slug(&slugify(name));
        self.entries.insert(
            slug.clone(),
            Category {
                slug: slug.clone(),
                name: name.trim().to_string(),
                color: color.trim().to_string(),
                remote_id,
            },
        );
        slug
    }

    fn unique_slug(&self, base: &str) -> String {
        if !self.entries.contains_key(base) {
            return base.to_string();
        }
        let mut n = 1u32;
        loop {
            let candidate = format!("{base}{SEPARATOR}{n}");
            if !self.entries.contains_key(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// Derive the base slug for a category name.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;

    for ch in name.chars().flat_map(char::to_lowercase) {
        let ch = fold_diacritic(ch);
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push(SEPARATOR);
            }
            pending_separator = false;
            slug.push(ch);
        } else {
            pending_separator = true;
        }
    }

    if slug.is_empty() {
        "category".to_string()
    } else {
        slug
    }
}

fn fold_diacritic(ch: char) -> char {
    match ch {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}
