use super::WorkingSetError;

/// Ordered membership set over the indices `0..capacity`.
///
/// Members are kept in insertion order.  Membership tests and position
/// lookups are O(1) through a reverse map.  [`remove`](IndexList::remove)
/// preserves the order of the remaining members (needed where positions
/// are coupled to factor columns); [`swap_remove`](IndexList::swap_remove)
/// is O(1) and moves the last member into the vacated slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexList {
    members: Vec<usize>,
    position: Vec<Option<usize>>,
}

impl IndexList {
    pub fn new(capacity: usize) -> Self {
        Self {
            members: Vec::with_capacity(capacity),
            position: vec![None; capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.position.len()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn clear(&mut self) {
        for &i in &self.members {
            self.position[i] = None;
        }
        self.members.clear();
    }

    fn check_range(&self, index: usize) -> Result<(), WorkingSetError> {
        if index >= self.capacity() {
            return Err(WorkingSetError::OutOfRange {
                index,
                capacity: self.capacity(),
            });
        }
        Ok(())
    }

    /// Appends `index` at the end of the list.
    pub fn add(&mut self, index: usize) -> Result<(), WorkingSetError> {
        self.check_range(index)?;
        if self.position[index].is_some() {
            return Err(WorkingSetError::AlreadyPresent(index));
        }
        self.position[index] = Some(self.members.len());
        self.members.push(index);
        Ok(())
    }

    /// Removes `index`, shifting later members forward by one.
    pub fn remove(&mut self, index: usize) -> Result<(), WorkingSetError> {
        let pos = self.take_position(index)?;
        self.members.remove(pos);
        for (p, &i) in self.members.iter().enumerate().skip(pos) {
            self.position[i] = Some(p);
        }
        Ok(())
    }

    /// Removes `index`, moving the last member into its slot.
    pub fn swap_remove(&mut self, index: usize) -> Result<(), WorkingSetError> {
        let pos = self.take_position(index)?;
        self.members.swap_remove(pos);
        if let Some(&moved) = self.members.get(pos) {
            self.position[moved] = Some(pos);
        }
        Ok(())
    }

    fn take_position(&mut self, index: usize) -> Result<usize, WorkingSetError> {
        self.check_range(index)?;
        self.position[index]
            .take()
            .ok_or(WorkingSetError::NotPresent(index))
    }

    pub fn contains(&self, index: usize) -> bool {
        index < self.capacity() && self.position[index].is_some()
    }

    /// Position of `index` within the list, if present
    pub fn get_index(&self, index: usize) -> Option<usize> {
        self.position.get(index).copied().flatten()
    }

    /// Member at position `pos`
    pub fn number(&self, pos: usize) -> usize {
        self.members[pos]
    }

    /// Members in list order
    pub fn as_slice(&self) -> &[usize] {
        &self.members
    }

    pub fn iter(&self) -> std::slice::Iter<'_, usize> {
        self.members.iter()
    }

    /// Exchanges the positions of two members.
    pub fn swap(&mut self, a: usize, b: usize) -> Result<(), WorkingSetError> {
        let pa = self.get_index(a).ok_or(WorkingSetError::NotPresent(a))?;
        let pb = self.get_index(b).ok_or(WorkingSetError::NotPresent(b))?;
        self.members.swap(pa, pb);
        self.position[a] = Some(pb);
        self.position[b] = Some(pa);
        Ok(())
    }
}

impl<'a> IntoIterator for &'a IndexList {
    type Item = &'a usize;
    type IntoIter = std::slice::Iter<'a, usize>;
    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}
