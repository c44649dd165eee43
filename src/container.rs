use crate::terminator::E2NodeTerminator;

/// An ordered collection of E2 node terminators, one per managed node.
#[derive(Default)]
pub struct TerminatorContainer {
    terminators: Vec<Box<dyn E2NodeTerminator>>,
}

impl TerminatorContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a terminator and returns its index.
    pub fn add(&mut self, terminator: Box<dyn E2NodeTerminator>) -> usize {
        self.terminators.push(terminator);
        self.terminators.len() - 1
    }

    /// Moves all terminators of `other` into this container.
    pub fn extend(&mut self, other: TerminatorContainer) {
        self.terminators.extend(other.terminators);
    }

    pub fn get(&self, i: usize) -> Option<&dyn E2NodeTerminator> {
        self.terminators.get(i).map(|t| t.as_ref())
    }

    pub fn get_mut(&mut self, i: usize) -> Option<&mut (dyn E2NodeTerminator + 'static)> {
        self.terminators.get_mut(i).map(|t| t.as_mut())
    }

    pub fn len(&self) -> usize {
        self.terminators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terminators.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn E2NodeTerminator> {
        self.terminators.iter().map(|t| t.as_ref())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn E2NodeTerminator>> {
        self.terminators.iter_mut()
    }
}

impl FromIterator<Box<dyn E2NodeTerminator>> for TerminatorContainer {
    fn from_iter<I: IntoIterator<Item = Box<dyn E2NodeTerminator>>>(iter: I) -> Self {
        Self {
            terminators: iter.into_iter().collect(),
        }
    }
}
