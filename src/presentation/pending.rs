use std::collections::BTreeSet;
use std::sync::{Mutex, PoisonError};

use crate::application::posts::{View, ViewInvalidator};

/// Collects stale views so the front end can redraw them once a command finishes.
#[derive(Debug, Default)]
pub struct PendingViews {
    stale: Mutex<BTreeSet<View>>,
}

impl PendingViews {
    /// Stale views in display order, clearing the set.
    pub fn take(&self) -> Vec<View> {
        let mut stale = self.stale.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *stale).into_iter().collect()
    }
}

impl ViewInvalidator for PendingViews {
    fn invalidate(&self, views: &[View]) {
        self.stale
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(views.iter().copied());
    }
}
