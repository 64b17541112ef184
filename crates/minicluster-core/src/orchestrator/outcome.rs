use crate::component::id::ComponentId;

/// Per-identity results of a batch, in the order they were processed.
#[derive(Debug)]
pub struct Outcomes<T, E> {
    entries: Vec<(ComponentId, Result<T, E>)>,
}

impl<T, E> Outcomes<T, E> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record the result for `id`, replacing an earlier one in place.
    pub fn record(&mut self, id: ComponentId, result: Result<T, E>) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == id) {
            Some(entry) => entry.1 = result,
            None => self.entries.push((id, result)),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Result<T, E>> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.as_str() == id)
            .map(|(_, result)| result)
    }

    pub fn is_success(&self) -> bool {
        self.entries.iter().all(|(_, result)| result.is_ok())
    }

    pub fn successes(&self) -> impl Iterator<Item = (&ComponentId, &T)> {
        self.entries
            .iter()
            .filter_map(|(id, result)| result.as_ref().ok().map(|value| (id, value)))
    }

    pub fn failures(&self) -> impl Iterator<Item = (&ComponentId, &E)> {
        self.entries
            .iter()
            .filter_map(|(id, result)| result.as_ref().err().map(|err| (id, err)))
    }

    /// Identities in processing order
    pub fn ids(&self) -> impl Iterator<Item = &ComponentId> {
        self.entries.iter().map(|(id, _)| id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ComponentId, &Result<T, E>)> {
        self.entries.iter().map(|(id, result)| (id, result))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T, E> Default for Outcomes<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> IntoIterator for Outcomes<T, E> {
    type Item = (ComponentId, Result<T, E>);
    type IntoIter = std::vec::IntoIter<(ComponentId, Result<T, E>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
