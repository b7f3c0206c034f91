//! Fixed-size record fixture.
//!
//! [`Record`] mirrors a typical small heap object: a short name, a longer
//! description and an id. On 64-bit targets it is 1064 bytes, which makes
//! [`SPILL_REGION_CAPACITY`] (two records minus one byte) the smallest
//! region that holds one record but not two.

/// A plain-old-data record with a fixed layout.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Record {
    pub name: [u8; 50],
    pub desc: [u8; 1000],
    pub id: usize,
}

/// `size_of::<Record>()`.
pub const RECORD_SIZE: usize = std::mem::size_of::<Record>();

/// Region capacity that fits exactly one [`Record`], leaving one byte short
/// of a second.
pub const SPILL_REGION_CAPACITY: usize = RECORD_SIZE * 2 - 1;

impl Record {
    /// Build a record, truncating `name` and `desc` to their field widths.
    pub fn new(name: &str, desc: &str, id: usize) -> Self {
        let mut record = Self {
            name: [0; 50],
            desc: [0; 1000],
            id,
        };
        copy_truncated(&mut record.name, name.as_bytes());
        copy_truncated(&mut record.desc, desc.as_bytes());
        record
    }

    /// The name up to its first NUL byte.
    pub fn name_str(&self) -> &str {
        until_nul(&self.name)
    }

    /// The description up to its first NUL byte.
    pub fn desc_str(&self) -> &str {
        until_nul(&self.desc)
    }
}

fn copy_truncated(dst: &mut [u8], src: &[u8]) {
    let n = src.len().min(dst.len());
    dst[..n].copy_from_slice(&src[..n]);
}

fn until_nul(bytes: &[u8]) -> &str {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    std::str::from_utf8(&bytes[..end]).unwrap_or("")
}
