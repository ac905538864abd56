//! Per-window lifetime tokens owned by the desktop shell.
//!
//! Each open window gets a [`CancellationToken`] when its app mounts. Closing the window or
//! ending the session cancels it, which stops paced terminal scripts and drops late chat replies.

use std::collections::HashMap;

use system_shell_contract::CancellationToken;

use crate::model::{WindowId, WindowRecord};

#[derive(Debug, Default)]
/// Lifetime tokens for mounted windows.
pub struct AppRuntimeState {
    lifetimes: HashMap<WindowId, CancellationToken>,
}

impl AppRuntimeState {
    /// Returns the window's token, creating a live one on first use.
    pub fn ensure_lifetime(&mut self, window_id: WindowId) -> CancellationToken {
        self.lifetimes.entry(window_id).or_default().clone()
    }

    /// Cancels and forgets the window's token. Returns `false` if it had none.
    pub fn end_window(&mut self, window_id: WindowId) -> bool {
        match self.lifetimes.remove(&window_id) {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancels every token.
    pub fn end_all(&mut self) {
        for (_, token) in self.lifetimes.drain() {
            token.cancel();
        }
    }

    /// Cancels tokens whose window no longer exists.
    pub fn sync(&mut self, windows: &[WindowRecord]) {
        let stale: Vec<WindowId> = self
            .lifetimes
            .keys()
            .copied()
            .filter(|id| windows.iter().all(|w| w.id != *id))
            .collect();
        for window_id in stale {
            self.end_window(window_id);
        }
    }

    /// Number of live tokens.
    pub fn len(&self) -> usize {
        self.lifetimes.len()
    }

    /// Returns `true` when no window holds a token.
    pub fn is_empty(&self) -> bool {
        self.lifetimes.is_empty()
    }
}
