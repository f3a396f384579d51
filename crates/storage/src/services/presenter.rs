//! Incremental "load more" display of an already fetched ranking.

pub const RANKING_BATCH_SIZE: usize = 5;

/// How much of the ranking is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState {
    /// Only the first batch is shown.
    Collapsed { shown: usize },
    /// A "load more" was requested and is settling.
    LoadingMore { shown: usize },
    /// More than the first batch is shown.
    Expanded { shown: usize },
}

impl DisplayState {
    pub fn shown(&self) -> usize {
        match *self {
            Self::Collapsed { shown } | Self::LoadingMore { shown } | Self::Expanded { shown } => {
                shown
            }
        }
    }
}

/// Pure state machine over a ranked list. Transitions consume the view and
/// return the next one; nothing here fetches data.
#[derive(Debug, Clone)]
pub struct RankingView<T> {
    entries: Vec<T>,
    state: DisplayState,
    batch: usize,
}

impl<T> RankingView<T> {
    pub fn new(entries: Vec<T>) -> Self {
        Self::with_batch(entries, RANKING_BATCH_SIZE)
    }

    pub fn with_batch(entries: Vec<T>, batch: usize) -> Self {
        let batch = batch.max(1);
        let shown = batch.min(entries.len());
        Self {
            entries,
            state: DisplayState::Collapsed { shown },
            batch,
        }
    }

    pub fn state(&self) -> DisplayState {
        self.state
    }

    pub fn total(&self) -> usize {
        self.entries.len()
    }

    pub fn visible(&self) -> &[T] {
        &self.entries[..self.state.shown()]
    }

    pub fn can_load_more(&self) -> bool {
        matches!(self.state, DisplayState::Collapsed { .. } | DisplayState::Expanded { .. })
            && self.state.shown() < self.entries.len()
    }

    pub fn can_show_less(&self) -> bool {
        matches!(self.state, DisplayState::Expanded { .. })
    }

    /// Starts loading the next batch. Ignored while loading or when
    /// everything is already visible.
    pub fn request_more(mut self) -> Self {
        if self.can_load_more() {
            self.state = DisplayState::LoadingMore {
                shown: self.state.shown(),
            };
        }
        self
    }

    /// Reveals up to one more batch, capped at the list length.
    pub fn finish_loading(mut self) -> Self {
        if let DisplayState::LoadingMore { shown } = self.state {
            let shown = (shown + self.batch).min(self.entries.len());
            self.state = if shown > self.batch {
                DisplayState::Expanded { shown }
            } else {
                DisplayState::Collapsed { shown }
            };
        }
        self
    }

    pub fn load_more(self) -> Self {
        self.request_more().finish_loading()
    }

    /// Back to the first batch, without refetching.
    pub fn show_less(mut self) -> Self {
        self.state = DisplayState::Collapsed {
            shown: self.batch.min(self.entries.len()),
        };
        self
    }

    pub fn into_visible(mut self) -> Vec<T> {
        self.entries.truncate(self.state.shown());
        self.entries
    }
}
