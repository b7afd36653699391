//! Simulated address space
//!
//! The address space is a zero-filled base region plus an append-only
//! list of overlay regions. An overlay maps an externally-owned byte
//! buffer at a start address; accesses are resolved against overlays
//! in registration order (first match wins) before falling back to
//! the base region.
//!
//! Overlap between overlays is not validated. Callers are responsible
//! for registering non-overlapping regions; if ranges do overlap, the
//! earliest-registered overlay serves the access.

use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;

#[derive(Error, Clone, Copy, PartialEq, Eq, Debug)]
pub enum MemoryError {
    #[error("address 0x{0:08x} is outside the base region and every overlay")]
    OutOfRange(u32),
    #[error("4-byte access at 0x{0:08x} crosses a region boundary")]
    CrossesRegion(u32),
}

#[derive(Error, Clone, Copy, PartialEq, Eq, Debug)]
pub enum CreationError {
    #[error("address space size must be non-zero")]
    ZeroSize,
}

/// An externally-owned buffer mapped at a fixed address range
///
/// The address space holds a shared handle to the storage, not the
/// storage itself; whoever registered the overlay keeps its own
/// handle and may read or write the buffer between steps.
#[derive(Debug, Clone)]
struct Overlay {
    start: u32,
    size: u32,
    storage: Rc<RefCell<Vec<u8>>>,
}

impl Overlay {
    fn contains(&self, address: u32) -> bool {
        address >= self.start && address - self.start < self.size
    }
}

/// Byte-addressed 32-bit memory over a base region and overlays
///
/// All reads and writes are 4 bytes, little-endian, and must lie
/// entirely within the region that resolves the address; a span that
/// runs off the end of its region is a fault, not a stitched access
/// across regions. Addresses need not be 4-byte aligned: words are
/// assembled byte-wise, so unaligned access is well defined.
#[derive(Debug, Default)]
pub struct AddressSpace {
    base: Vec<u8>,
    overlays: Vec<Overlay>,
}

fn word_from_bytes(bytes: &[u8]) -> u32 {
    let mut value = 0;
    for (n, byte) in bytes.iter().enumerate() {
        value |= u32::from(*byte) << (8 * n);
    }
    value
}

fn word_to_bytes(value: u32, bytes: &mut [u8]) {
    for (n, byte) in bytes.iter_mut().enumerate() {
        *byte = (value >> (8 * n)) as u8;
    }
}

impl AddressSpace {
    /// Allocate a zero-filled base region of size bytes, no overlays
    pub fn new(size: u32) -> Result<Self, CreationError> {
        if size == 0 {
            return Err(CreationError::ZeroSize);
        }
        Ok(Self {
            base: vec![0; size as usize],
            overlays: Vec::new(),
        })
    }

    /// Map an externally-owned buffer at [start, start+size)
    ///
    /// Appends to the overlay list; resolution order is registration
    /// order. No overlap checking is performed (see module docs). A
    /// size larger than the storage's actual length leaves a phantom
    /// tail whose accesses fault.
    pub fn add_overlay(&mut self, start: u32, size: u32, storage: Rc<RefCell<Vec<u8>>>) {
        self.overlays.push(Overlay {
            start,
            size,
            storage,
        });
    }

    /// Check [address, address+4) lies inside a region of region_size
    /// bytes starting at region_start, and return the byte offset
    fn span_offset(address: u32, region_start: u32, region_size: u32) -> Result<usize, MemoryError> {
        let offset = u64::from(address - region_start);
        if offset + 4 > u64::from(region_size) {
            Err(MemoryError::CrossesRegion(address))
        } else {
            Ok(offset as usize)
        }
    }

    /// Read the little-endian u32 at address
    pub fn read32(&self, address: u32) -> Result<u32, MemoryError> {
        for overlay in &self.overlays {
            if overlay.contains(address) {
                let offset = Self::span_offset(address, overlay.start, overlay.size)?;
                let storage = overlay.storage.borrow();
                let bytes = storage
                    .get(offset..offset + 4)
                    .ok_or(MemoryError::CrossesRegion(address))?;
                return Ok(word_from_bytes(bytes));
            }
        }
        if (address as usize) >= self.base.len() {
            return Err(MemoryError::OutOfRange(address));
        }
        let offset = Self::span_offset(address, 0, self.base.len() as u32)?;
        Ok(word_from_bytes(&self.base[offset..offset + 4]))
    }

    /// Write a u32 at address, little-endian
    pub fn write32(&mut self, address: u32, value: u32) -> Result<(), MemoryError> {
        for overlay in &self.overlays {
            if overlay.contains(address) {
                let offset = Self::span_offset(address, overlay.start, overlay.size)?;
                let mut storage = overlay.storage.borrow_mut();
                let bytes = storage
                    .get_mut(offset..offset + 4)
                    .ok_or(MemoryError::CrossesRegion(address))?;
                word_to_bytes(value, bytes);
                return Ok(());
            }
        }
        if (address as usize) >= self.base.len() {
            return Err(MemoryError::OutOfRange(address));
        }
        let offset = Self::span_offset(address, 0, self.base.len() as u32)?;
        word_to_bytes(value, &mut self.base[offset..offset + 4]);
        Ok(())
    }
}
