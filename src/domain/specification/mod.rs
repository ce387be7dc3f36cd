//! # Specifications
//!
//! A specification is a named boolean rule over a candidate. Rules compose
//! with [`SpecificationExt::and`], [`SpecificationExt::or`] and
//! [`SpecificationExt::not`], and the composite keeps a readable
//! description so policy violations can be reported to callers.

mod listing;

pub use listing::*;

/// A boolean business rule over `T`.
pub trait Specification<T: ?Sized> {
    fn is_satisfied_by(&self, candidate: &T) -> bool;

    /// Human readable statement of what the rule requires.
    fn description(&self) -> String;
}

impl<T: ?Sized, S: Specification<T> + ?Sized> Specification<T> for Box<S> {
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        (**self).is_satisfied_by(candidate)
    }

    fn description(&self) -> String {
        (**self).description()
    }
}

/// Both rules hold.
#[derive(Debug, Clone)]
pub struct And<A, B>(pub A, pub B);

/// At least one rule holds.
#[derive(Debug, Clone)]
pub struct Or<A, B>(pub A, pub B);

/// The rule does not hold.
#[derive(Debug, Clone)]
pub struct Not<A>(pub A);

impl<T: ?Sized, A: Specification<T>, B: Specification<T>> Specification<T> for And<A, B> {
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        self.0.is_satisfied_by(candidate) && self.1.is_satisfied_by(candidate)
    }

    fn description(&self) -> String {
        format!("({} and {})", self.0.description(), self.1.description())
    }
}

impl<T: ?Sized, A: Specification<T>, B: Specification<T>> Specification<T> for Or<A, B> {
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        self.0.is_satisfied_by(candidate) || self.1.is_satisfied_by(candidate)
    }

    fn description(&self) -> String {
        format!("({} or {})", self.0.description(), self.1.description())
    }
}

impl<T: ?Sized, A: Specification<T>> Specification<T> for Not<A> {
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        !self.0.is_satisfied_by(candidate)
    }

    fn description(&self) -> String {
        format!("not {}", self.0.description())
    }
}

/// Combinator methods available on every specification.
pub trait SpecificationExt<T: ?Sized>: Specification<T> + Sized {
    fn and<S: Specification<T>>(self, other: S) -> And<Self, S> {
        And(self, other)
    }

    fn or<S: Specification<T>>(self, other: S) -> Or<Self, S> {
        Or(self, other)
    }

    fn not(self) -> Not<Self> {
        Not(self)
    }
}

impl<T: ?Sized, S: Specification<T>> SpecificationExt<T> for S {}

/// Ad hoc specification backed by a closure.
pub struct Predicate<F> {
    description: String,
    predicate: F,
}

impl<F> Predicate<F> {
    pub fn new(description: impl Into<String>, predicate: F) -> Self {
        Self {
            description: description.into(),
            predicate,
        }
    }
}

impl<T: ?Sized, F: Fn(&T) -> bool> Specification<T> for Predicate<F> {
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        (self.predicate)(candidate)
    }

    fn description(&self) -> String {
        self.description.clone()
    }
}

/// Descriptions of the rules in `rules` that `candidate` fails.
pub fn unmet<T: ?Sized>(rules: &[&dyn Specification<T>], candidate: &T) -> Vec<String> {
    rules
        .iter()
        .filter(|rule| !rule.is_satisfied_by(candidate))
        .map(|rule| rule.description())
        .collect()
}
