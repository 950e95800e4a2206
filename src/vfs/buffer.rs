//! Write Buffer: in-memory staging area for one open file.
//!
//! The object store only accepts whole-object PUTs, so while a file is open
//! for writing every kernel write lands here. The kernel issues writes in
//! arbitrary offset order and arbitrary sizes (mmap and block-aligned I/O in
//! particular), so `write_at` must accept any non-negative offset, growing
//! the region and zero-filling gaps as needed. The buffer is committed as a
//! single PUT on release and discarded.

use crate::error::{FsError, Result};

/// Append/overwrite-capable byte accumulator with an optional maximum size.
#[derive(Debug, Default)]
pub struct WriteBuffer {
    data: Vec<u8>,
    max: usize,
    dirty: bool,
}

impl WriteBuffer {
    /// Create a buffer with `size` initial zero bytes and a maximum capacity.
    /// A maximum below `size` is raised to `size`; `0` means unlimited.
    pub fn new(size: usize, max: usize) -> Self {
        let max = if max < size && max > 0 { size } else { max };
        Self {
            data: vec![0; size],
            max,
            dirty: false,
        }
    }

    /// Buffer seeded with existing content (a non-truncating write open).
    /// Starts clean: closing without writing must not re-commit the object.
    pub fn from_bytes(data: Vec<u8>, max: usize) -> Self {
        let max = if max < data.len() && max > 0 {
            data.len()
        } else {
            max
        };
        Self {
            data,
            max,
            dirty: false,
        }
    }

    /// Whether the buffer holds uncommitted changes: any successful write,
    /// or an explicit truncate.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Force a flush on release even with no writes (truncate-to-zero must
    /// commit the empty object).
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Adjust the maximum capacity. A maximum below the current length but
    /// above zero is clamped to the current length; zero means unlimited.
    pub fn set_max(&mut self, max: usize) {
        self.max = if max < self.data.len() && max > 0 {
            self.data.len()
        } else {
            max
        };
    }

    /// Current contents, for flushing.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// `(current length, maximum)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.data.len(), self.max)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Write `data` at `offset`, growing the buffer as needed.
    ///
    /// - `offset == len`: plain append.
    /// - `offset + data.len() >= len`: grow to `offset + data.len()`,
    ///   zero-filling any gap past the old length, then copy into place.
    /// - otherwise: overwrite in place without resizing.
    ///
    /// Fails with `OutOfRange` for a negative offset, or when a maximum is
    /// configured and `offset + data.len()` would reach it; the buffer is
    /// left untouched on failure.
    pub fn write_at(&mut self, data: &[u8], offset: i64) -> Result<usize> {
        if offset < 0 {
            return Err(FsError::OutOfRange(format!("offset {offset} is negative")));
        }
        let offset = offset as usize;
        if self.max > 0 && offset + data.len() >= self.max {
            return Err(FsError::OutOfRange(format!(
                "offset {} + len {} exceeds maximum {}",
                offset,
                data.len(),
                self.max
            )));
        }

        self.dirty = true;

        // Fast path: exact append.
        if offset == self.data.len() {
            self.data.extend_from_slice(data);
            return Ok(data.len());
        }

        // Grow (zero-filling any hole) before copying into place.
        if offset + data.len() >= self.data.len() {
            self.data.resize(offset + data.len(), 0);
        }
        self.data[offset..offset + data.len()].copy_from_slice(data);
        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_fast_path() {
        let mut buf = WriteBuffer::new(0, 0);
        assert_eq!(buf.write_at(b"hello", 0).unwrap(), 5);
        assert_eq!(buf.write_at(b" world", 5).unwrap(), 6);
        assert_eq!(buf.bytes(), b"hello world");
    }

    #[test]
    fn sparse_write_zero_fills_gap() {
        let mut buf = WriteBuffer::new(0, 0);
        assert_eq!(buf.write_at(b"tail!", 10).unwrap(), 5);
        assert_eq!(buf.len(), 15);
        assert!(buf.bytes()[..10].iter().all(|&b| b == 0));
        assert_eq!(&buf.bytes()[10..], b"tail!");
    }

    #[test]
    fn overwrite_in_place_keeps_length() {
        let mut buf = WriteBuffer::new(0, 0);
        buf.write_at(b"aaaaaaaaaa", 0).unwrap();
        buf.write_at(b"bb", 3).unwrap();
        assert_eq!(buf.bytes(), b"aaabbaaaaa");
        assert_eq!(buf.len(), 10);
    }

    #[test]
    fn overlapping_tail_write_extends() {
        let mut buf = WriteBuffer::new(0, 0);
        buf.write_at(b"abcdef", 0).unwrap();
        buf.write_at(b"XYZ", 4).unwrap();
        assert_eq!(buf.bytes(), b"abcdXYZ");
    }

    #[test]
    fn negative_offset_rejected_without_mutation() {
        let mut buf = WriteBuffer::new(0, 0);
        buf.write_at(b"abc", 0).unwrap();
        let err = buf.write_at(b"x", -1).unwrap_err();
        assert!(matches!(err, FsError::OutOfRange(_)));
        assert_eq!(buf.bytes(), b"abc");
    }

    #[test]
    fn capacity_check_is_independent_of_length() {
        let mut buf = WriteBuffer::new(0, 8);
        // would reach the maximum even though the buffer is empty
        assert!(matches!(
            buf.write_at(b"12345678", 0),
            Err(FsError::OutOfRange(_))
        ));
        assert!(buf.is_empty());
        // below the maximum is fine
        assert_eq!(buf.write_at(b"1234567", 0).unwrap(), 7);
    }

    #[test]
    fn set_max_clamps_to_current_length() {
        let mut buf = WriteBuffer::new(0, 0);
        buf.write_at(b"0123456789", 0).unwrap();
        buf.set_max(4);
        assert_eq!(buf.shape(), (10, 10));
        buf.set_max(0);
        assert_eq!(buf.shape(), (10, 0));
    }

    #[test]
    fn dirty_tracks_successful_writes_only() {
        let mut buf = WriteBuffer::new(0, 0);
        assert!(!buf.is_dirty());
        buf.write_at(b"x", 0).unwrap();
        assert!(buf.is_dirty());

        let mut capped = WriteBuffer::new(0, 4);
        assert!(capped.write_at(b"12345", 0).is_err());
        assert!(!capped.is_dirty());

        let mut seeded = WriteBuffer::from_bytes(b"seed".to_vec(), 0);
        assert!(!seeded.is_dirty());
        assert_eq!(seeded.bytes(), b"seed");
        seeded.mark_dirty();
        assert!(seeded.is_dirty());
    }

    #[test]
    fn replay_matches_sequential_application() {
        // arbitrary out-of-order sequence equals naive replay onto a Vec
        let writes: &[(&[u8], i64)] = &[
            (b"hello", 0),
            (b"##", 2),
            (b"zz", 20),
            (b"fill", 8),
            (b"o", 4),
        ];
        let mut buf = WriteBuffer::new(0, 0);
        let mut model: Vec<u8> = Vec::new();
        for (data, off) in writes {
            buf.write_at(data, *off).unwrap();
            let off = *off as usize;
            if off + data.len() > model.len() {
                model.resize(off + data.len(), 0);
            }
            model[off..off + data.len()].copy_from_slice(data);
        }
        assert_eq!(buf.bytes(), model.as_slice());
    }
}
