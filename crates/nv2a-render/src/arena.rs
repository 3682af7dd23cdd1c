//! Frame-synchronized vertex ring buffer.
//!
//! The GPU reads vertex data straight out of the arena up to
//! [`FRAMES_IN_FLIGHT`] frames after the CPU wrote it. Instead of fences, the
//! arena keeps one byte counter per in-flight frame and refuses any
//! allocation that would push the sum of all counters past the capacity, so
//! the write cursor can never lap data that a pending frame still reads.

use std::fmt;

use crate::error::{RenderError, Result};

/// Number of frames the device may have queued (the display is triple buffered).
pub const FRAMES_IN_FLIGHT: usize = 3;

/// Every allocation is rounded up to this many bytes.
pub const VERTEX_ALIGNMENT: usize = 32;

/// Rounds `value` up to the nearest multiple of `alignment` (a power of two).
#[inline]
pub(crate) fn align_up(value: usize, alignment: usize) -> usize {
    debug_assert!(alignment.is_power_of_two());
    match value.checked_add(alignment - 1) {
        Some(v) => v & !(alignment - 1),
        None => usize::MAX & !(alignment - 1),
    }
}

/// Byte range handed out by [`VertexArena::allocate`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ArenaSpan {
    /// Offset from the start of the arena.
    pub offset: usize,
    /// Aligned length.
    pub len: usize,
}

impl ArenaSpan {
    #[inline]
    pub fn range(self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.len
    }
}

/// Offset bookkeeping for the vertex ring buffer.
///
/// The backing memory lives with the renderer; this type only decides where
/// each allocation goes and whether it is safe.
#[derive(Clone)]
pub struct VertexArena {
    capacity: usize,
    cursor: usize,
    slots: [usize; FRAMES_IN_FLIGHT],
    frame_index: usize,
}

impl VertexArena {
    /// Creates an arena over `capacity` bytes.
    ///
    /// The current slot starts at 1: slot 0 stands for the frame the display
    /// is already scanning out when rendering begins.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity & !(VERTEX_ALIGNMENT - 1),
            cursor: 0,
            slots: [0; FRAMES_IN_FLIGHT],
            frame_index: 1,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    /// Bytes charged to each frame slot.
    #[inline]
    pub fn slots(&self) -> &[usize; FRAMES_IN_FLIGHT] {
        &self.slots
    }

    /// Bytes that pending frames may still read.
    #[inline]
    pub fn in_flight(&self) -> usize {
        self.slots.iter().sum()
    }

    /// Reserves `size` bytes (rounded up to [`VERTEX_ALIGNMENT`]).
    ///
    /// An allocation never straddles the end of the ring: when it would, the
    /// cursor restarts at zero and the skipped tail is charged to the current
    /// frame. On failure nothing changes.
    pub fn allocate(&mut self, size: usize) -> Result<ArenaSpan> {
        let len = align_up(size.max(1), VERTEX_ALIGNMENT);

        let (offset, padding) = match self.cursor.checked_add(len) {
            Some(end) if end <= self.capacity => (self.cursor, 0),
            _ => (0, self.capacity - self.cursor),
        };

        let in_flight = self.in_flight();
        let charged = padding.saturating_add(len);
        if len > self.capacity || in_flight.saturating_add(charged) > self.capacity {
            log::warn!(
                "vertex arena exhausted: {len} bytes requested, {in_flight}/{} in flight; \
                 increase the vertex buffer size",
                self.capacity
            );
            return Err(RenderError::ArenaExhausted {
                requested: len,
                in_flight,
                capacity: self.capacity,
            });
        }

        self.cursor = offset + len;
        self.slots[self.frame_index] += charged;
        Ok(ArenaSpan { offset, len })
    }

    /// Moves to the next frame slot and forgets what it held.
    ///
    /// Call only once the device has finished the frame that last used that
    /// slot.
    pub fn advance_frame(&mut self) {
        self.frame_index = (self.frame_index + 1) % FRAMES_IN_FLIGHT;
        self.slots[self.frame_index] = 0;
    }
}

impl fmt::Debug for VertexArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VertexArena")
            .field("capacity", &self.capacity)
            .field("cursor", &self.cursor)
            .field("slots", &self.slots)
            .field("frame_index", &self.frame_index)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ── align_up ──────────────────────────────────────────────────────────

    #[test]
    fn align_up_rounds_to_multiple() {
        assert_eq!(align_up(0, 32), 0);
        assert_eq!(align_up(1, 32), 32);
        assert_eq!(align_up(32, 32), 32);
        assert_eq!(align_up(33, 32), 64);
        assert_eq!(align_up(usize::MAX, 32), usize::MAX & !31);
    }

    // ── allocate ──────────────────────────────────────────────────────────

    #[test]
    fn allocations_are_aligned_and_sequential() {
        let mut arena = VertexArena::new(1024);
        assert_eq!(arena.allocate(12).unwrap(), ArenaSpan { offset: 0, len: 32 });
        assert_eq!(arena.allocate(40).unwrap(), ArenaSpan { offset: 32, len: 64 });
        assert_eq!(arena.cursor(), 96);
        assert_eq!(arena.slots()[1], 96);
    }

    #[test]
    fn wrap_restarts_at_zero_and_charges_tail() {
        let mut arena = VertexArena::new(256);
        arena.allocate(192).unwrap();
        arena.advance_frame();
        arena.advance_frame();
        arena.advance_frame();
        // Back on slot 1, which was cleared on the way round.
        assert_eq!(arena.in_flight(), 0);

        let span = arena.allocate(128).unwrap();
        assert_eq!(span.offset, 0);
        // The 64 bytes between 192 and the end were skipped.
        assert_eq!(arena.slots()[1], 64 + 128);
    }

    #[test]
    fn over_capacity_fails_without_mutation() {
        let mut arena = VertexArena::new(256);
        arena.allocate(160).unwrap();
        let before = arena.clone();

        let err = arena.allocate(128).unwrap_err();
        assert!(matches!(err, RenderError::ArenaExhausted { requested: 128, .. }));
        assert_eq!(arena.cursor(), before.cursor());
        assert_eq!(arena.slots(), before.slots());
    }

    #[test]
    fn oversized_request_fails() {
        let mut arena = VertexArena::new(256);
        assert!(arena.allocate(257).is_err());
    }

    #[test]
    fn advance_frame_releases_oldest_slot() {
        let mut arena = VertexArena::new(300);
        // capacity rounds down to 288
        assert_eq!(arena.capacity(), 288);
        for _ in 0..FRAMES_IN_FLIGHT {
            arena.allocate(96).unwrap();
            arena.advance_frame();
        }
        // All three slots were used; the last advance cleared the first one.
        assert_eq!(arena.in_flight(), 192);
        assert!(arena.allocate(96).is_ok());
    }

    #[test]
    fn eighty_percent_frames_need_rotation() {
        let capacity = 96 * 1024;
        let per_frame = (capacity / FRAMES_IN_FLIGHT) * 8 / 10;
        let mut arena = VertexArena::new(capacity);

        for frame in 0..FRAMES_IN_FLIGHT {
            arena.allocate(per_frame).unwrap_or_else(|e| panic!("frame {frame}: {e}"));
            if frame + 1 < FRAMES_IN_FLIGHT {
                arena.advance_frame();
            }
        }

        // A fourth frame without a present reuses the third frame's slot and
        // would overlap frame one's data.
        assert!(matches!(arena.allocate(per_frame), Err(RenderError::ArenaExhausted { .. })));

        arena.advance_frame();
        arena.allocate(per_frame).unwrap();
    }

    proptest! {
        #[test]
        fn in_flight_never_exceeds_capacity(
            frames in prop::collection::vec(prop::collection::vec(1usize..600, 0..8), 1..20),
        ) {
            let mut arena = VertexArena::new(2048);
            // (frame number, span) of every live allocation
            let mut live: Vec<(usize, ArenaSpan)> = Vec::new();

            for (frame, sizes) in frames.iter().enumerate() {
                for &size in sizes {
                    if let Ok(span) = arena.allocate(size) {
                        prop_assert!(span.offset + span.len <= arena.capacity());
                        for (other_frame, other) in &live {
                            // Frames within the in-flight window must not overlap.
                            if frame - other_frame < FRAMES_IN_FLIGHT {
                                let disjoint = span.offset + span.len <= other.offset
                                    || other.offset + other.len <= span.offset;
                                prop_assert!(disjoint, "{span:?} overlaps {other:?}");
                            }
                        }
                        live.push((frame, span));
                    }
                    prop_assert!(arena.in_flight() <= arena.capacity());
                }
                arena.advance_frame();
                live.retain(|(f, _)| frame + 1 - f < FRAMES_IN_FLIGHT);
            }
        }
    }
}
