//! History buffer for temporal accumulation
//!
//! Holds the resolved image of the previous frame. The render pass borrows it
//! shared, the resolve step borrows it exclusively, so a single pass can never
//! both read and write it.

use crate::jitter::FrameIndex;

/// Pixel dimensions of a history image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryExtent {
    pub width: u32,
    pub height: u32,
}

/// Previous-frame image plus the index of the frame it holds.
///
/// `S` is the backend's storage (a GPU texture for the wgpu backend).
#[derive(Debug)]
pub struct HistoryBuffer<S> {
    storage: S,
    extent: HistoryExtent,
    resolved: Option<FrameIndex>,
}

impl<S> HistoryBuffer<S> {
    /// Wrap freshly created storage. Nothing has been resolved into it yet.
    pub fn new(storage: S, width: u32, height: u32) -> Self {
        Self {
            storage,
            extent: HistoryExtent { width, height },
            resolved: None,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn extent(&self) -> HistoryExtent {
        self.extent
    }

    /// Frame whose resolved output the buffer currently holds
    pub fn resolved_frame(&self) -> Option<FrameIndex> {
        self.resolved
    }

    /// Overwrite the contents with `frame`'s resolved output
    pub fn overwrite<R>(&mut self, frame: FrameIndex, write: impl FnOnce(&mut S) -> R) -> R {
        debug_assert!(
            self.resolved.map_or(true, |prev| prev <= frame),
            "history overwritten out of order: {:?} after {:?}",
            frame,
            self.resolved,
        );
        let out = write(&mut self.storage);
        self.resolved = Some(frame);
        out
    }

    /// Replace the storage after a resize. The old contents are gone.
    pub fn recreate(&mut self, storage: S, width: u32, height: u32) -> S {
        log::debug!("Recreating history buffer at {}x{}", width, height);
        self.extent = HistoryExtent { width, height };
        self.resolved = None;
        std::mem::replace(&mut self.storage, storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let history = HistoryBuffer::new(vec![0u8; 4], 1, 1);
        assert_eq!(history.resolved_frame(), None);
        assert_eq!(history.extent(), HistoryExtent { width: 1, height: 1 });
    }

    #[test]
    fn overwrite_tags_the_frame() {
        let mut history = HistoryBuffer::new(0u32, 4, 4);
        let frame = FrameIndex::new(3).unwrap();
        history.overwrite(frame, |s| *s = 3);
        assert_eq!(*history.storage(), 3);
        assert_eq!(history.resolved_frame(), Some(frame));
    }

    #[test]
    fn saturated_frame_may_overwrite_itself() {
        let mut history = HistoryBuffer::new(0u32, 4, 4);
        let last = FrameIndex::new(u32::MAX).unwrap();
        history.overwrite(last, |s| *s = 1);
        history.overwrite(last.next(), |s| *s = 2);
        assert_eq!(*history.storage(), 2);
        assert_eq!(history.resolved_frame(), Some(last));
    }

    #[test]
    fn recreate_resets_tag_and_extent() {
        let mut history = HistoryBuffer::new("old", 4, 4);
        history.overwrite(FrameIndex::FIRST, |_| ());
        let old = history.recreate("new", 8, 2);
        assert_eq!(old, "old");
        assert_eq!(*history.storage(), "new");
        assert_eq!(history.extent(), HistoryExtent { width: 8, height: 2 });
        assert_eq!(history.resolved_frame(), None);
    }
}
