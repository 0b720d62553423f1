/// Keyboard selection over the current result list.
///
/// The index is only ever changed by [`next`](Self::next), [`prev`](Self::prev),
/// [`clamp`](Self::clamp) and [`reset`](Self::reset). Until the first clamp the
/// result count is unknown and `next` is unbounded; after it, `next` stops at
/// the last result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionCursor {
    index: usize,
    bound: Option<usize>,
}

impl SelectionCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn next(&mut self) {
        let next = self.index.saturating_add(1);
        self.index = match self.bound {
            Some(count) => next.min(count.saturating_sub(1)),
            None => next,
        };
    }

    pub fn prev(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    /// Force the index into `[0, count - 1]`, or 0 for an empty result set
    pub fn clamp(&mut self, count: usize) -> usize {
        self.bound = Some(count);
        self.index = self.index.min(count.saturating_sub(1));
        self.index
    }

    /// Back to the first result; called whenever the query changes
    pub fn reset(&mut self) {
        self.index = 0;
    }
}
