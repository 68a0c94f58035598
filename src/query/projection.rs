//! Field projection for response records.
//!
//! `fields` selects, `fields_exclude`/`omit` remove, and exclusion always
//! wins. Names may be dotted (`start_station.name`) to reach into nested
//! records; a plain name keeps or drops the whole value.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::params::{QueryParams, split_list};

/// A serialized response record: field name to JSON value.
pub type Record = Map<String, Value>;

/// Set of (possibly dotted) field names, stored as a prefix tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldTree {
    /// The path ending here was named in full.
    whole: bool,
    children: BTreeMap<String, FieldTree>,
}

impl FieldTree {
    pub fn parse<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut tree = Self::default();
        for name in names {
            let segments: Vec<&str> = name.split('.').map(str::trim).collect();
            if segments.iter().any(|s| s.is_empty()) {
                continue;
            }
            tree.insert(&segments);
        }
        tree
    }

    fn insert(&mut self, path: &[&str]) {
        match path.split_first() {
            None => self.whole = true,
            Some((head, rest)) => self
                .children
                .entry((*head).to_string())
                .or_default()
                .insert(rest),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    fn child(&self, name: &str) -> Option<&FieldTree> {
        self.children.get(name)
    }

    fn merge(&mut self, other: FieldTree) {
        self.whole |= other.whole;
        for (name, subtree) in other.children {
            self.children.entry(name).or_default().merge(subtree);
        }
    }
}

/// Field selection driven solely by query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
    include: Option<FieldTree>,
    exclude: FieldTree,
}

impl Projection {
    #[must_use]
    pub fn new(include: Option<FieldTree>, exclude: FieldTree) -> Self {
        Self { include, exclude }
    }

    /// Reads `fields`, `fields_exclude` and `omit`.
    ///
    /// `fields=` (present but empty) selects nothing, which is different from
    /// leaving `fields` out.
    #[must_use]
    pub fn from_params(params: &QueryParams) -> Self {
        let include = params
            .get("fields")
            .map(|value| FieldTree::parse(split_list(value)));

        let mut exclude = FieldTree::default();
        for name in ["fields_exclude", "omit"] {
            if let Some(names) = params.list(name) {
                exclude.merge(FieldTree::parse(names));
            }
        }

        Self { include, exclude }
    }

    /// True when applying the projection cannot change any record.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.include.is_none() && self.exclude.is_empty()
    }

    #[must_use]
    pub fn apply(&self, record: Record) -> Record {
        if self.is_identity() {
            return record;
        }
        project(record, self.include.as_ref(), Some(&self.exclude))
    }

    pub fn apply_all(&self, records: Vec<Record>) -> Vec<Record> {
        records.into_iter().map(|record| self.apply(record)).collect()
    }
}

fn project(record: Record, include: Option<&FieldTree>, exclude: Option<&FieldTree>) -> Record {
    record
        .into_iter()
        .filter_map(|(key, value)| {
            let included = match include {
                Some(tree) => Some(tree.child(&key)?),
                None => None,
            };
            let excluded = exclude.and_then(|tree| tree.child(&key));

            if excluded.is_some_and(|node| node.whole) {
                return None;
            }

            // Only narrow into the value when a dotted path asked for it.
            let nested_include = included.filter(|node| !node.whole);
            let nested_exclude = excluded.filter(|node| !node.is_empty());

            let value = match value {
                Value::Object(nested) if nested_include.is_some() || nested_exclude.is_some() => {
                    Value::Object(project(nested, nested_include, nested_exclude))
                }
                other => other,
            };
            Some((key, value))
        })
        .collect()
}
