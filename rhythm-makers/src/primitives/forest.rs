use serde::{Deserialize, Serialize};

use super::{Division, Duration, Leaf};

/// Output of the maker: divisions in order of targets.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Forest {
    divisions: Vec<Division>,
}
impl Forest {
    pub fn new(divisions: Vec<Division>) -> Self {
        Self { divisions }
    }
    pub fn divisions(&self) -> &[Division] {
        &self.divisions
    }
    pub fn divisions_mut(&mut self) -> &mut Vec<Division> {
        &mut self.divisions
    }
    pub fn len(&self) -> usize {
        self.divisions.len()
    }
    pub fn is_empty(&self) -> bool {
        self.divisions.is_empty()
    }
    pub fn iter(&self) -> std::slice::Iter<'_, Division> {
        self.divisions.iter()
    }
    pub fn leaves(&self) -> impl Iterator<Item = &Leaf> {
        self.divisions.iter().flat_map(|div| div.leaves.iter())
    }
    pub fn leaves_mut(&mut self) -> impl Iterator<Item = &mut Leaf> {
        self.divisions.iter_mut().flat_map(|div| div.leaves.iter_mut())
    }
    /// Sum of sounding durations.
    pub fn duration(&self) -> Duration {
        self.divisions.iter().map(|div| div.sounding_duration()).sum()
    }
    /// Concatenate with forest of the following call.
    pub fn extend(&mut self, other: Forest) {
        self.divisions.extend(other.divisions)
    }
}
impl IntoIterator for Forest {
    type Item = Division;
    type IntoIter = std::vec::IntoIter<Division>;
    fn into_iter(self) -> Self::IntoIter {
        self.divisions.into_iter()
    }
}
impl<'a> IntoIterator for &'a Forest {
    type Item = &'a Division;
    type IntoIter = std::slice::Iter<'a, Division>;
    fn into_iter(self) -> Self::IntoIter {
        self.divisions.iter()
    }
}
