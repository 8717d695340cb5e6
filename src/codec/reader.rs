/// Splits raw asset files (tile sets, blocksets, map block grids) into
/// fixed-size records
pub struct BinaryReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BinaryReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Read up to `n` bytes. The final record of a file may come back short.
    pub fn read_record(&mut self, n: usize) -> Option<&'a [u8]> {
        if self.is_empty() {
            return None;
        }
        let end = (self.pos + n).min(self.data.len());
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Some(slice)
    }

    /// Split the rest of the data into `n`-byte records, keeping a short tail
    pub fn records(&mut self, n: usize) -> Vec<&'a [u8]> {
        let n = n.max(1);
        let mut out = Vec::with_capacity(self.remaining().div_ceil(n));
        while let Some(record) = self.read_record(n) {
            out.push(record);
        }
        out
    }
}
