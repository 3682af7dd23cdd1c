/// A block of physically contiguous, device-visible memory.
///
/// Blocks are handed out by [`NativeMemory::alloc_contiguous`] and must be
/// given back through [`NativeMemory::free_contiguous`]. The type is not
/// `Clone` so a block cannot be freed twice.
#[derive(Debug, PartialEq, Eq)]
pub struct MemoryBlock {
    physical: u32,
    len: usize,
}

impl MemoryBlock {
    /// For device implementations: wraps an allocation they made.
    pub fn new(physical: u32, len: usize) -> Self {
        Self { physical, len }
    }

    /// Address the GPU uses to reach the block.
    #[inline]
    pub fn physical_address(&self) -> u32 {
        self.physical
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Contiguous-memory allocator of the platform.
pub trait NativeMemory {
    /// Allocates `size` bytes of write-combined contiguous memory.
    fn alloc_contiguous(&mut self, size: usize) -> Option<MemoryBlock>;

    fn free_contiguous(&mut self, block: MemoryBlock);

    /// CPU view of a block this allocator produced.
    fn bytes(&self, block: &MemoryBlock) -> &[u8];

    fn bytes_mut(&mut self, block: &MemoryBlock) -> &mut [u8];
}
