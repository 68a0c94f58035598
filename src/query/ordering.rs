use super::filter::{Attribute, AttributeSchema};
use super::params::QueryParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderKey {
    pub attribute: &'static Attribute,
    pub direction: Direction,
}

/// Requested sort keys, e.g. `ordering=start_date,-duration`.
///
/// Unknown names are ignored and a repeated attribute keeps its first
/// position. The store always appends the primary key as a tiebreaker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ordering {
    pub keys: Vec<OrderKey>,
}

impl Ordering {
    #[must_use]
    pub fn from_params(schema: &AttributeSchema, params: &QueryParams) -> Self {
        let mut keys: Vec<OrderKey> = Vec::new();

        for item in params.list("ordering").unwrap_or_default() {
            let (name, direction) = match item.strip_prefix('-') {
                Some(name) => (name, Direction::Desc),
                None => (item.strip_prefix('+').unwrap_or(item), Direction::Asc),
            };
            let Some(attribute) = schema.attribute(name) else {
                continue;
            };
            if keys.iter().any(|k| k.attribute.name == attribute.name) {
                continue;
            }
            keys.push(OrderKey {
                attribute,
                direction,
            });
        }

        Self { keys }
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.keys.iter().any(|k| k.attribute.name == name)
    }
}
