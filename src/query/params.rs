use serde::Deserialize;

/// Parameter names consumed by projection, ordering, pagination, search and
/// aggregation. They are never interpreted as attribute filters.
pub const RESERVED: &[&str] = &[
    "fields",
    "fields_exclude",
    "omit",
    "ordering",
    "page",
    "search",
    "group_by",
    "agg",
    "field",
];

/// Query string parameters in request order.
///
/// Repeated names are kept; lookups return the last occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    #[must_use]
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|(key, _)| key == name)
    }

    /// Distinct parameter names in first-appearance order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .enumerate()
            .filter(|(i, (key, _))| !self.0[..*i].iter().any(|(prev, _)| prev == key))
            .map(|(_, (key, _))| key.as_str())
    }

    /// Comma-separated list value of `name`, trimmed, empty items dropped.
    ///
    /// `None` when the parameter is absent; `Some(vec![])` for `name=`.
    #[must_use]
    pub fn list(&self, name: &str) -> Option<Vec<&str>> {
        self.get(name).map(split_list)
    }

    #[must_use]
    pub fn is_reserved(name: &str) -> bool {
        RESERVED.contains(&name)
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

pub(crate) fn split_list(value: &str) -> Vec<&str> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect()
}
