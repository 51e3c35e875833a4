/// A bounded 2D grid stored row-major in a flat buffer.
///
/// Cells are addressed as `(x, y)` = (column, row). Unlike a world map the
/// terraformer plane does not wrap at any edge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tilemap<T> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Tilemap<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height],
        }
    }
}

impl<T: Clone> Tilemap<T> {
    pub fn new_with(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Build a map from rows. All rows must have the same length.
    pub fn from_rows(rows: &[Vec<T>]) -> Option<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        if rows.iter().any(|r| r.len() != width) {
            return None;
        }
        let data = rows.iter().flat_map(|r| r.iter().cloned()).collect();
        Some(Self { width, height, data })
    }
}

impl<T> Tilemap<T> {
    fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "cell ({}, {}) outside {}x{} map",
            x,
            y,
            self.width,
            self.height
        );
        y * self.width + x
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// True when signed coordinates address a cell of this map.
    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as u64) < self.width as u64 && (y as u64) < self.height as u64
    }

    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.data[self.index(x, y)]
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut T {
        let idx = self.index(x, y);
        &mut self.data[idx]
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    /// Bounds-checked lookup with signed coordinates.
    pub fn get_checked(&self, x: i64, y: i64) -> Option<&T> {
        if self.in_bounds(x, y) {
            Some(self.get(x as usize, y as usize))
        } else {
            None
        }
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let width = self.width;
        self.data.iter().enumerate().map(move |(idx, val)| {
            let x = idx % width;
            let y = idx / width;
            (x, y, val)
        })
    }

    /// Iterate mutably over all cells with their coordinates.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, usize, &mut T)> {
        let width = self.width;
        self.data.iter_mut().enumerate().map(move |(idx, val)| {
            let x = idx % width;
            let y = idx / width;
            (x, y, val)
        })
    }

    /// Iterate over cell values in row-major order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    /// Iterate over rows as slices, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        // chunks() panics on a zero chunk size
        self.data.chunks(self.width.max(1))
    }

    /// Build a map of the same size by applying `f` to every cell.
    pub fn map<U, F: FnMut(&T) -> U>(&self, f: F) -> Tilemap<U> {
        Tilemap {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(f).collect(),
        }
    }
}
