use std::collections::HashMap;

use crate::types::{FrameNumber, PageNumber};

/// Maps resident pages to the frame holding them.
#[derive(Debug, Default)]
pub struct PageTable {
    table: HashMap<PageNumber, FrameNumber>,
}

impl PageTable {
    pub fn with_capacity(capacity: usize) -> Self {
        PageTable {
            table: HashMap::with_capacity(capacity),
        }
    }

    pub fn set(&mut self, page_number: PageNumber, frame_index: FrameNumber) {
        self.table.insert(page_number, frame_index);
    }

    pub fn get(&self, page_number: PageNumber) -> Option<FrameNumber> {
        self.table.get(&page_number).copied()
    }

    pub fn remove(&mut self, page_number: PageNumber) -> Option<FrameNumber> {
        self.table.remove(&page_number)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn pages(&self) -> impl Iterator<Item = PageNumber> + '_ {
        self.table.keys().copied()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FrameTableEntry {
    pub page_number: PageNumber,
    pub dirty: bool,
}

/// One slot per physical frame; `None` while the frame is free.
#[derive(Debug)]
pub struct FrameTable {
    frames: Vec<Option<FrameTableEntry>>,
}

impl FrameTable {
    pub fn new(frame_count: usize) -> Self {
        FrameTable {
            frames: vec![None; frame_count],
        }
    }

    pub fn get(&self, frame_index: FrameNumber) -> Option<FrameTableEntry> {
        self.frames[frame_index]
    }

    pub fn set(&mut self, frame_index: FrameNumber, page_number: PageNumber, dirty: bool) {
        self.frames[frame_index] = Some(FrameTableEntry { page_number, dirty });
    }

    pub fn take(&mut self, frame_index: FrameNumber) -> Option<FrameTableEntry> {
        self.frames[frame_index].take()
    }

    pub fn mark_dirty(&mut self, frame_index: FrameNumber) {
        if let Some(entry) = self.frames[frame_index].as_mut() {
            entry.dirty = true;
        }
    }

    pub fn occupied(&self) -> usize {
        self.frames.iter().filter(|f| f.is_some()).count()
    }
}
