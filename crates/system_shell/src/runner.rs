//! Pending-line queue with pause state.

use std::collections::VecDeque;

use system_shell_contract::PendingLine;

/// Observable runner phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    /// Nothing queued.
    Idle,
    /// Lines are waiting for the next paced tick.
    Running,
    /// Consumption is suspended until an external resume.
    Paused,
}

/// Queue of script lines consumed one per tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptRunner {
    pending: VecDeque<PendingLine>,
    paused: bool,
    auto_close: bool,
}

impl ScriptRunner {
    /// Replaces the queue with a script.
    ///
    /// `auto_close` marks a run started by opening the script directly; the terminal closes once
    /// such a run drains.
    pub fn load(&mut self, lines: Vec<PendingLine>, auto_close: bool) {
        self.pending = lines.into();
        self.paused = false;
        self.auto_close = auto_close;
    }

    /// Inserts lines ahead of everything queued, keeping their relative order.
    pub fn enqueue_front(&mut self, lines: Vec<PendingLine>) {
        for line in lines.into_iter().rev() {
            self.pending.push_front(line);
        }
    }

    /// Pops the next line unless paused.
    pub fn next_line(&mut self) -> Option<PendingLine> {
        if self.paused {
            return None;
        }
        self.pending.pop_front()
    }

    /// Suspends consumption.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Clears the pause flag, returning whether the runner was paused.
    pub fn resume(&mut self) -> bool {
        std::mem::replace(&mut self.paused, false)
    }

    /// Drops every queued line.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.paused = false;
    }

    /// Current phase.
    pub fn state(&self) -> RunnerState {
        if self.paused {
            RunnerState::Paused
        } else if self.pending.is_empty() {
            RunnerState::Idle
        } else {
            RunnerState::Running
        }
    }

    /// Returns `true` while suspended.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Returns `true` when nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of queued lines.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Whether the current run closes the window when drained.
    pub fn auto_close(&self) -> bool {
        self.auto_close
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn command(text: &str) -> PendingLine {
        PendingLine::Command(text.to_string())
    }

    #[test]
    fn front_insertion_keeps_nested_lines_ahead_of_the_rest() {
        let mut runner = ScriptRunner::default();
        runner.load(vec![command("outer-1"), command("outer-2")], false);
        assert_eq!(runner.next_line(), Some(command("outer-1")));

        runner.enqueue_front(vec![command("inner-1"), command("inner-2")]);
        let order: Vec<PendingLine> = std::iter::from_fn(|| runner.next_line()).collect();
        assert_eq!(
            order,
            vec![command("inner-1"), command("inner-2"), command("outer-2")]
        );
    }

    #[test]
    fn paused_runner_withholds_lines_until_resumed() {
        let mut runner = ScriptRunner::default();
        runner.load(vec![command("echo next")], true);
        runner.pause();

        assert_eq!(runner.state(), RunnerState::Paused);
        assert_eq!(runner.next_line(), None);
        assert_eq!(runner.pending_len(), 1);

        assert!(runner.resume());
        assert!(!runner.resume());
        assert_eq!(runner.state(), RunnerState::Running);
        assert_eq!(runner.next_line(), Some(command("echo next")));
        assert_eq!(runner.state(), RunnerState::Idle);
        assert!(runner.auto_close());
    }
}
