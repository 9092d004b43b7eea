//! Busy scope shared between the pipeline and the UI.
//!
//! A rebuild runs inside a scope; the UI reads the state to show feedback.
//! Callers doing bulk work can hold their own scope so that rebuild requests
//! arriving meanwhile are deferred rather than interleaved.

use std::cell::RefCell;
use std::rc::Rc;

use crate::state::BusyState;

#[derive(Debug, Default)]
struct BusyInner {
    depth: usize,
    label: Option<String>,
}

/// Cloneable handle to one busy flag
#[derive(Clone, Debug, Default)]
pub struct BusyIndicator {
    inner: Rc<RefCell<BusyInner>>,
}

impl BusyIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a busy scope that lasts until the guard is dropped.
    /// Nested scopes keep the outermost label.
    pub fn enter(&self, label: impl Into<String>) -> BusyGuard {
        let mut inner = self.inner.borrow_mut();
        if inner.depth == 0 {
            inner.label = Some(label.into());
        }
        inner.depth += 1;
        BusyGuard {
            inner: Rc::clone(&self.inner),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.inner.borrow().depth > 0
    }

    pub fn state(&self) -> BusyState {
        let inner = self.inner.borrow();
        match (&inner.label, inner.depth) {
            (Some(label), depth) if depth > 0 => BusyState::Busy(label.clone()),
            _ => BusyState::Idle,
        }
    }
}

/// Leaves the busy scope on drop
#[derive(Debug)]
#[must_use = "the busy scope ends when the guard is dropped"]
pub struct BusyGuard {
    inner: Rc<RefCell<BusyInner>>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        let mut inner = self.inner.borrow_mut();
        inner.depth = inner.depth.saturating_sub(1);
        if inner.depth == 0 {
            inner.label = None;
        }
    }
}
