//! Filter composer: structured criteria → composable predicates.
//!
//! Each entity has a filter struct whose fields are all optional (absent = no
//! constraint). `predicate()` turns the present fields into a [`Predicate`],
//! a conjunction of criteria. Building is pure: the same filter always yields
//! an equal predicate, and criteria carry owned, pre-normalized values.

pub mod customers;
pub mod orders;
pub mod products;

pub use customers::{CustomerCriterion, CustomerFilter};
pub use orders::{OrderCriterion, OrderFilter, OrderRow};
pub use products::{ProductCriterion, ProductFilter};

/// A single condition over a row type.
pub trait Criterion<Row: ?Sized> {
    fn matches(&self, row: &Row) -> bool;
}

/// Logical AND of criteria. An empty predicate matches everything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate<C> {
    criteria: Vec<C>,
}

impl<C> Default for Predicate<C> {
    fn default() -> Self {
        Self::all()
    }
}

impl<C> Predicate<C> {
    /// The unconstrained predicate.
    pub fn all() -> Self {
        Self {
            criteria: Vec::new(),
        }
    }

    pub fn and(mut self, criterion: C) -> Self {
        self.criteria.push(criterion);
        self
    }

    pub fn criteria(&self) -> &[C] {
        &self.criteria
    }

    pub fn is_unconstrained(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn matches<R: ?Sized>(&self, row: &R) -> bool
    where
        C: Criterion<R>,
    {
        self.criteria.iter().all(|c| c.matches(row))
    }
}

/// Lowercased needle for case-insensitive `contains`; `None` when empty.
pub(crate) fn needle(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(str::to_lowercase)
}

pub(crate) fn contains_ci(haystack: &str, lowered_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowered_needle)
}

/// Inclusive range check; a missing bound is open.
pub(crate) fn within<T: PartialOrd>(value: &T, min: &Option<T>, max: &Option<T>) -> bool {
    min.as_ref().is_none_or(|m| value >= m) && max.as_ref().is_none_or(|m| value <= m)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Even;
    struct Below(i32);

    impl Criterion<i32> for Even {
        fn matches(&self, row: &i32) -> bool {
            row % 2 == 0
        }
    }

    impl Criterion<i32> for Below {
        fn matches(&self, row: &i32) -> bool {
            *row < self.0
        }
    }

    #[test]
    fn empty_predicate_matches_everything() {
        let p: Predicate<Below> = Predicate::all();
        assert!(p.is_unconstrained());
        assert!(p.matches(&i32::MAX));
    }

    #[test]
    fn criteria_combine_with_and() {
        let p = Predicate::all().and(Below(10)).and(Below(5));
        assert!(p.matches(&4));
        assert!(!p.matches(&7));

        let evens = Predicate::all().and(Even);
        assert!(evens.matches(&4));
        assert!(!evens.matches(&3));
    }

    #[test]
    fn range_bounds_are_inclusive_and_optional() {
        assert!(within(&10, &Some(10), &Some(20)));
        assert!(within(&20, &Some(10), &Some(20)));
        assert!(!within(&21, &Some(10), &Some(20)));
        assert!(within(&-5, &None, &Some(0)));
        assert!(within(&99, &None, &None));
    }

    #[test]
    fn needle_ignores_empty_values() {
        assert_eq!(needle(&Some(String::new())), None);
        assert_eq!(needle(&Some("JaNe".to_string())), Some("jane".to_string()));
    }
}
