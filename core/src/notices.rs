//! User-visible notices raised while navigating.
//!
//! The gateway never shows anything itself. The navigator forwards the notice
//! attached to each denial into a [`NoticeSink`]; hosts either drain the
//! bundled [`NoticeQueue`] or plug in their own sink (toast layer, status
//! line, log).

use std::mem;

use clinic_types::Notice;

pub trait NoticeSink {
    fn push(&mut self, notice: Notice);
}

/// Queue for pending notices.
///
/// Every pushed notice is kept, one per denial, until the host drains them
/// with [`NoticeQueue::take`].
#[derive(Debug, Default)]
pub struct NoticeQueue {
    pending: Vec<Notice>,
}

impl NoticeQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all pending notices, clearing the queue.
    ///
    /// Returns the notices in the order they were raised.
    pub fn take(&mut self) -> Vec<Notice> {
        mem::take(&mut self.pending)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.pending.iter()
    }
}

impl NoticeSink for NoticeQueue {
    fn push(&mut self, notice: Notice) {
        self.pending.push(notice);
    }
}

impl NoticeSink for Vec<Notice> {
    fn push(&mut self, notice: Notice) {
        Vec::push(self, notice);
    }
}
