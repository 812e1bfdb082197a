/// Per-scan record of pixels already attributed to a component.
///
/// One byte per pixel, indexed `y * width + x`. Lives exactly as long as the
/// scan that created it.
pub(crate) struct VisitedSet {
    width: usize,
    cells: Vec<bool>,
}

impl VisitedSet {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as usize,
            cells: vec![false; width as usize * height as usize],
        }
    }

    pub(crate) fn contains(&self, x: u32, y: u32) -> bool {
        self.cells[self.index(x, y)]
    }

    /// Mark `(x, y)` visited. Returns `false` if it already was.
    pub(crate) fn insert(&mut self, x: u32, y: u32) -> bool {
        let index = self.index(x, y);
        !std::mem::replace(&mut self.cells[index], true)
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width + x as usize
    }
}
