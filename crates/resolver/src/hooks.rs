//! Explicit, ordered hook registration.
//!
//! A tap list is a plain ordered collection of named callbacks: registration
//! order is execution order, with no event-emitter machinery behind it.

pub struct TapList<F> {
    taps: Vec<(String, F)>,
}

impl<F> Default for TapList<F> {
    fn default() -> Self {
        TapList { taps: Vec::new() }
    }
}

impl<F> TapList<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a named tap. Taps fire in the order they were registered.
    pub fn tap(&mut self, name: impl Into<String>, f: F) {
        self.taps.push((name.into(), f));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &F)> {
        self.taps.iter().map(|(name, f)| (name.as_str(), f))
    }

    pub fn len(&self) -> usize {
        self.taps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }
}
