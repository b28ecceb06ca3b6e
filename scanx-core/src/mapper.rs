use crate::{Destination, FieldDef, FieldKind, Traversal, Traversals};
use std::{
    any::{self, TypeId},
    borrow::Cow,
    collections::{HashMap, hash_map::Entry},
    fmt::{self, Debug, Formatter},
    sync::{Arc, LazyLock, PoisonError, RwLock},
};

/// Mapper used by iterators created without an explicit one.
pub static DEFAULT_MAPPER: LazyLock<Arc<Mapper>> = LazyLock::new(|| Arc::new(Mapper::new()));

/// A column reachable inside a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
    /// Canonical column name, dotted when reached through nested records.
    pub name: String,
    /// Position in the depth first order of [`Destination::field_slots`].
    pub slot: usize,
    /// Number of embedded or nested records crossed to reach the field.
    pub depth: usize,
}

/// Every column of a record type, with the name lookup already settled.
#[derive(Debug)]
pub struct TypeMap {
    pub type_name: &'static str,
    pub fields: Box<[FieldInfo]>,
    names: HashMap<String, usize>,
}

impl TypeMap {
    /// The field answering to `name`.
    ///
    /// When several fields share a name the shallowest one wins, at the same
    /// depth the one declared first.
    pub fn get(&self, name: &str) -> Option<&FieldInfo> {
        self.names.get(name).map(|i| &self.fields[*i])
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// The naming convention collaborator.
///
/// Turns the field table registered by a record into canonical column names
/// and resolves result columns into traversals. Names given explicitly with
/// `#[scanx(name = "..")]` are used verbatim, every other name goes through
/// the mapper's name function. Type maps are computed once per type and
/// shared by every iterator using the same mapper.
pub struct Mapper {
    name_fn: Box<dyn Fn(&str) -> Cow<'_, str> + Send + Sync>,
    cache: RwLock<HashMap<TypeId, Arc<TypeMap>>>,
}

impl Mapper {
    /// Field names are used as they are.
    pub fn new() -> Self {
        Self::with_name_fn(|name| Cow::Borrowed(name))
    }

    /// Field names are lowercased, matching stores that fold column names.
    pub fn lowercase() -> Self {
        Self::with_name_fn(|name| {
            if name.chars().any(char::is_uppercase) {
                Cow::Owned(name.to_lowercase())
            } else {
                Cow::Borrowed(name)
            }
        })
    }

    pub fn with_name_fn<F>(name_fn: F) -> Self
    where
        F: Fn(&str) -> Cow<'_, str> + Send + Sync + 'static,
    {
        Self {
            name_fn: Box::new(name_fn),
            cache: Default::default(),
        }
    }

    /// The type map of `T`, computed on first use.
    pub fn type_map<T: Destination + 'static>(&self) -> Arc<TypeMap> {
        let id = TypeId::of::<T>();
        if let Some(map) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
        {
            return map.clone();
        }
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        match cache.entry(id) {
            Entry::Occupied(entry) => entry.get().clone(),
            Entry::Vacant(entry) => {
                let map = Arc::new(self.build(any::type_name::<T>(), T::field_defs()));
                log::debug!(
                    "Mapped {} columns for type {}",
                    map.len(),
                    map.type_name
                );
                entry.insert(map).clone()
            }
        }
    }

    /// One traversal per column, in column order, empty when no field of `T`
    /// answers to the column name.
    pub fn traversals_by_name<T, S>(&self, columns: &[S]) -> Traversals
    where
        T: Destination + 'static,
        S: AsRef<str>,
    {
        let map = self.type_map::<T>();
        columns
            .iter()
            .map(|column| match map.get(column.as_ref()) {
                Some(field) => Traversal::new(field.slot),
                None => Traversal::default(),
            })
            .collect()
    }

    fn build(&self, type_name: &'static str, defs: &'static [FieldDef]) -> TypeMap {
        let mut fields = Vec::new();
        self.collect(defs, "", 0, &mut fields);
        let mut by_depth: Vec<usize> = (0..fields.len()).collect();
        // Stable: within the same depth the declaration order is kept
        by_depth.sort_by_key(|i| fields[*i].depth);
        let mut names = HashMap::with_capacity(fields.len());
        for i in by_depth {
            names.entry(fields[i].name.clone()).or_insert(i);
        }
        TypeMap {
            type_name,
            fields: fields.into_boxed_slice(),
            names,
        }
    }

    fn collect(
        &self,
        defs: &'static [FieldDef],
        prefix: &str,
        depth: usize,
        out: &mut Vec<FieldInfo>,
    ) {
        for def in defs {
            match def.kind {
                FieldKind::Column => out.push(FieldInfo {
                    name: format!("{prefix}{}", self.name(def)),
                    slot: out.len(),
                    depth,
                }),
                FieldKind::Embedded(inner) => self.collect(inner(), prefix, depth + 1, out),
                FieldKind::Nested(inner) => {
                    let prefix = format!("{prefix}{}.", self.name(def));
                    self.collect(inner(), &prefix, depth + 1, out)
                }
            }
        }
    }

    fn name<'a>(&self, def: &'a FieldDef) -> Cow<'a, str> {
        if def.renamed {
            Cow::Borrowed(def.name)
        } else {
            (self.name_fn)(def.name)
        }
    }
}

impl Default for Mapper {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Mapper {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mapper")
            .field("name_fn", &"..")
            .field(
                "cached",
                &self.cache.read().unwrap_or_else(PoisonError::into_inner).len(),
            )
            .finish()
    }
}
