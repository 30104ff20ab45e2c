//! Component builders
//!
//! A builder is a mutable draft of a component's fields. It either collapses to
//! nothing (every field blank) or commits through the component's raw
//! constructor, so a committed builder validates exactly like a parsed element.
//!
//! List fields are [`DraftList`]s. Reading slot `i` of a short list pads it with
//! blank entries, which lets an editing surface bind to slot `i` before any
//! value exists there.

use crate::config::Context;
use crate::error::Result;
use std::ops::Index;

/// Anything that can be blank
pub trait Blank {
    /// True when the value carries no content
    fn is_blank(&self) -> bool;
}

impl Blank for String {
    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

/// Mutable staging area for one component or attribute group
pub trait Builder: Default {
    /// What a successful commit produces
    type Target;

    /// True when every field is blank and every nested builder is empty
    fn is_empty(&self) -> bool;

    /// Build the target without the emptiness short-circuit
    fn build(&self, ctx: &Context) -> Result<Self::Target>;

    /// `Ok(None)` when empty, otherwise build and validate
    fn commit(&self, ctx: &Context) -> Result<Option<Self::Target>> {
        if self.is_empty() {
            return Ok(None);
        }
        self.build(ctx).map(Some)
    }
}

/// Implement [`Blank`] for builders in terms of [`Builder::is_empty`]
macro_rules! blank_builder {
    ($($builder:ty),+ $(,)?) => {
        $(
            impl $crate::validators::builders::Blank for $builder {
                fn is_blank(&self) -> bool {
                    $crate::validators::builders::Builder::is_empty(self)
                }
            }
        )+
    };
}
pub(crate) use blank_builder;

/// Growable list of draft values with auto-padding slots
#[derive(Debug, Clone, PartialEq)]
pub struct DraftList<T> {
    items: Vec<T>,
}

impl<T> Default for DraftList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Default + Blank> DraftList<T> {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Pad with blank entries until the list holds at least `len` items
    pub fn ensure_len(&mut self, len: usize) {
        if self.items.len() < len {
            self.items.resize_with(len, T::default);
        }
    }

    /// Mutable access to slot `index`, padding as needed
    pub fn slot(&mut self, index: usize) -> &mut T {
        self.ensure_len(index + 1);
        &mut self.items[index]
    }

    /// Read-only access without padding
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Append an entry
    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Number of slots, blank ones included
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if there are no slots at all
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True if every slot is blank
    pub fn is_blank(&self) -> bool {
        self.items.iter().all(Blank::is_blank)
    }

    /// Iterate over every slot
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Iterate over the non-blank slots
    pub fn filled(&self) -> impl Iterator<Item = &T> {
        self.items.iter().filter(|item| !item.is_blank())
    }
}

impl DraftList<String> {
    /// The non-blank values, in order
    pub fn values(&self) -> Vec<String> {
        self.filled().cloned().collect()
    }
}

impl<T> Index<usize> for DraftList<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<T> From<Vec<T>> for DraftList<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl From<&[String]> for DraftList<String> {
    fn from(items: &[String]) -> Self {
        Self {
            items: items.to_vec(),
        }
    }
}

impl<T> FromIterator<T> for DraftList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a, T> IntoIterator for &'a DraftList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Commit every non-empty builder in a list, in order
pub fn commit_all<B: Builder + Blank>(list: &DraftList<B>, ctx: &Context) -> Result<Vec<B::Target>> {
    let mut committed = Vec::new();
    for builder in list.iter() {
        if let Some(target) = builder.commit(ctx)? {
            committed.push(target);
        }
    }
    Ok(committed)
}
