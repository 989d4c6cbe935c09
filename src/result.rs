//! Transient holder for the most recent submission.

use crate::models::ResultView;

/// At most one result; replaced wholesale, never persisted.
#[derive(Debug, Clone, Default)]
pub struct ResultSession {
    current: Option<ResultView>,
}

impl ResultSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, view: ResultView) {
        self.current = Some(view);
    }

    pub fn current(&self) -> Option<&ResultView> {
        self.current.as_ref()
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}
