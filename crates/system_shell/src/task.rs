//! Paced background consumption of a terminal's pending lines.
//!
//! One [`ScriptTask`] runs per terminal window on the UI thread's executor. It sleeps the pacing
//! delay between lines, parks on its signal channel while the runner is idle or paused, and stops
//! as soon as the window's [`CancellationToken`] fires.

use std::{
    cell::RefCell,
    future::Future,
    pin::Pin,
    rc::Rc,
    task::{Context, Poll},
    time::Duration,
};

use futures::{
    channel::{mpsc, oneshot},
    future::LocalBoxFuture,
    StreamExt,
};
use leptos::{leptos_dom::helpers::TimeoutHandle, logging};
use system_shell_contract::CancellationToken;

use crate::{
    runner::RunnerState,
    session::{drive, ShellHost, ShellSession, StepOutcome},
};

/// Delay between consecutive queued lines.
pub const DEFAULT_PACING: Duration = Duration::from_millis(200);

/// Source of the delay awaited between lines.
pub trait PacingTimer {
    /// Resolves after `duration`.
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()>;
}

/// Browser timer built on `setTimeout`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeoutPacingTimer;

impl PacingTimer for TimeoutPacingTimer {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        let (tx, rx) = oneshot::channel::<()>();
        match leptos::set_timeout_with_handle(
            move || {
                let _ = tx.send(());
            },
            duration,
        ) {
            Ok(handle) => Box::pin(TimeoutSleep {
                rx,
                handle: Some(handle),
            }),
            Err(err) => {
                logging::warn!("terminal pacing timer unavailable: {err:?}");
                Box::pin(futures::future::ready(()))
            }
        }
    }
}

struct TimeoutSleep {
    rx: oneshot::Receiver<()>,
    handle: Option<TimeoutHandle>,
}

impl Future for TimeoutSleep {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(_) => {
                self.handle = None;
                Poll::Ready(())
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for TimeoutSleep {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.clear();
        }
    }
}

/// Message delivered to a parked task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptSignal {
    /// New lines were queued.
    Wake,
    /// The user pressed a key while paused.
    Resume,
}

/// Sending half of a task's signal channel.
#[derive(Debug, Clone)]
pub struct ScriptSignals {
    tx: mpsc::UnboundedSender<ScriptSignal>,
}

impl ScriptSignals {
    /// Tells the task to look at the queue again. Returns `false` once the task is gone.
    pub fn wake(&self) -> bool {
        self.tx.unbounded_send(ScriptSignal::Wake).is_ok()
    }

    /// Forwards a keypress that ends a pause. Returns `false` once the task is gone.
    pub fn resume(&self) -> bool {
        self.tx.unbounded_send(ScriptSignal::Resume).is_ok()
    }
}

/// Creates a signal channel for one task.
pub fn script_channel() -> (ScriptSignals, mpsc::UnboundedReceiver<ScriptSignal>) {
    let (tx, rx) = mpsc::unbounded();
    (ScriptSignals { tx }, rx)
}

/// Why a task stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskExit {
    /// The window's token was cancelled.
    Cancelled,
    /// The session closed its own window.
    WindowClosed,
    /// Every signal sender was dropped.
    Disconnected,
}

/// Background loop feeding queued lines to a session.
pub struct ScriptTask {
    session: Rc<RefCell<ShellSession>>,
    host: Rc<dyn ShellHost>,
    timer: Rc<dyn PacingTimer>,
    pacing: Duration,
    cancel: CancellationToken,
    signals: mpsc::UnboundedReceiver<ScriptSignal>,
}

impl ScriptTask {
    /// Creates a task with browser pacing and a fresh token.
    pub fn new(
        session: Rc<RefCell<ShellSession>>,
        host: Rc<dyn ShellHost>,
        signals: mpsc::UnboundedReceiver<ScriptSignal>,
    ) -> Self {
        Self {
            session,
            host,
            timer: Rc::new(TimeoutPacingTimer),
            pacing: DEFAULT_PACING,
            cancel: CancellationToken::new(),
            signals,
        }
    }

    /// Replaces the pacing delay.
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Replaces the timer.
    pub fn with_timer(mut self, timer: Rc<dyn PacingTimer>) -> Self {
        self.timer = timer;
        self
    }

    /// Binds the task to a window's lifetime token.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Runs until cancelled, closed, or disconnected.
    pub async fn run(mut self) -> TaskExit {
        loop {
            if self.cancel.is_cancelled() {
                return TaskExit::Cancelled;
            }
            let (state, closed) = {
                let session = self.session.borrow();
                (session.runner_state(), session.is_closed())
            };
            if closed {
                return TaskExit::WindowClosed;
            }

            let outcome = match state {
                RunnerState::Running => {
                    self.timer.sleep(self.pacing).await;
                    if self.cancel.is_cancelled() {
                        return TaskExit::Cancelled;
                    }
                    drive(&self.session, &*self.host, |session, env| session.tick(env))
                }
                RunnerState::Idle | RunnerState::Paused => match self.signals.next().await {
                    None if self.cancel.is_cancelled() => return TaskExit::Cancelled,
                    None => return TaskExit::Disconnected,
                    Some(ScriptSignal::Wake) => continue,
                    Some(ScriptSignal::Resume) => {
                        if self.cancel.is_cancelled() {
                            return TaskExit::Cancelled;
                        }
                        drive(&self.session, &*self.host, |session, _| session.resume())
                    }
                },
            };

            if outcome == StepOutcome::Closed {
                return TaskExit::WindowClosed;
            }
        }
    }
}

/// Spawns `task` on the local executor.
pub fn spawn_script_task(task: ScriptTask) {
    leptos::spawn_local(async move {
        if task.run().await == TaskExit::Disconnected {
            logging::warn!("terminal script task lost its signal channel");
        }
    });
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use chrono::{NaiveDate, NaiveDateTime};
    use futures::{executor::LocalPool, task::LocalSpawnExt};
    use platform_host::{FileDraft, RootFolder, VirtualFile, VirtualFileStore};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::session::{HostRequest, SessionView};

    struct InstantTimer;

    impl PacingTimer for InstantTimer {
        fn sleep(&self, _duration: Duration) -> LocalBoxFuture<'static, ()> {
            Box::pin(futures::future::ready(()))
        }
    }

    struct CancellingTimer(CancellationToken);

    impl PacingTimer for CancellingTimer {
        fn sleep(&self, _duration: Duration) -> LocalBoxFuture<'static, ()> {
            self.0.cancel();
            Box::pin(futures::future::ready(()))
        }
    }

    #[derive(Default)]
    struct RecordingHost {
        files: VirtualFileStore,
        requests: RefCell<Vec<HostRequest>>,
        renders: Cell<usize>,
    }

    impl ShellHost for RecordingHost {
        fn files(&self) -> VirtualFileStore {
            self.files.clone()
        }

        fn now(&self) -> NaiveDateTime {
            NaiveDate::from_ymd_opt(2024, 5, 23)
                .and_then(|date| date.and_hms_opt(9, 0, 0))
                .expect("valid timestamp")
        }

        fn perform(&self, request: HostRequest) {
            self.requests.borrow_mut().push(request);
        }

        fn render(&self, _view: SessionView) {
            self.renders.set(self.renders.get() + 1);
        }
    }

    struct Harness {
        pool: LocalPool,
        host: Rc<RecordingHost>,
        session: Rc<RefCell<ShellSession>>,
        signals: ScriptSignals,
        exit: Rc<Cell<Option<TaskExit>>>,
    }

    fn harness(
        script: Option<(&str, &str)>,
        timer: Rc<dyn PacingTimer>,
        cancel: CancellationToken,
    ) -> Harness {
        let mut files = VirtualFileStore::new();
        let launched: Option<VirtualFile> = script.map(|(name, body)| {
            files.save(FileDraft::text(name, "bat", RootFolder::Documents, body))
        });
        let host = Rc::new(RecordingHost {
            files,
            ..RecordingHost::default()
        });
        let session = Rc::new(RefCell::new(ShellSession::new("Alice")));
        if let Some(file) = launched {
            let env = host.environment();
            session.borrow_mut().launch_script(&file, &env);
        }

        let (signals, rx) = script_channel();
        let task = ScriptTask::new(session.clone(), host.clone(), rx)
            .with_timer(timer)
            .with_cancellation(cancel);
        let exit = Rc::new(Cell::new(None));
        let exit_slot = exit.clone();
        let pool = LocalPool::new();
        pool.spawner()
            .spawn_local(async move { exit_slot.set(Some(task.run().await)) })
            .expect("spawn task");

        Harness {
            pool,
            host,
            session,
            signals,
            exit,
        }
    }

    #[test]
    fn launched_script_runs_to_completion_and_closes() {
        let mut h = harness(
            Some(("hello", "echo one\necho two")),
            Rc::new(InstantTimer),
            CancellationToken::new(),
        );
        h.pool.run_until_stalled();

        assert_eq!(h.exit.get(), Some(TaskExit::WindowClosed));
        assert_eq!(*h.host.requests.borrow(), vec![HostRequest::CloseWindow]);
        assert_eq!(h.host.renders.get(), 2);
        assert!(h.session.borrow().transcript().contains(&"two".to_string()));
    }

    #[test]
    fn paused_task_waits_for_resume_signal() {
        let mut h = harness(
            Some(("hold", "pause\necho after")),
            Rc::new(InstantTimer),
            CancellationToken::new(),
        );
        h.pool.run_until_stalled();
        assert_eq!(h.exit.get(), None);
        assert_eq!(h.session.borrow().runner_state(), RunnerState::Paused);

        h.signals.wake();
        h.pool.run_until_stalled();
        assert_eq!(h.session.borrow().runner_state(), RunnerState::Paused);

        assert!(h.signals.resume());
        h.pool.run_until_stalled();
        assert_eq!(h.exit.get(), Some(TaskExit::WindowClosed));
        assert_eq!(
            h.session.borrow().transcript().last(),
            Some(&"after".to_string())
        );
    }

    #[test]
    fn cancellation_during_sleep_skips_the_pending_line() {
        let cancel = CancellationToken::new();
        let mut h = harness(
            Some(("never", "echo unseen")),
            Rc::new(CancellingTimer(cancel.clone())),
            cancel,
        );
        h.pool.run_until_stalled();

        assert_eq!(h.exit.get(), Some(TaskExit::Cancelled));
        assert_eq!(h.host.renders.get(), 0);
        assert!(!h
            .session
            .borrow()
            .transcript()
            .contains(&"unseen".to_string()));
    }

    #[test]
    fn idle_task_wakes_for_interactive_queue_and_stops_on_disconnect() {
        let mut h = harness(None, Rc::new(InstantTimer), CancellationToken::new());
        h.pool.run_until_stalled();
        assert_eq!(h.exit.get(), None);

        let env = h.host.environment();
        h.session.borrow_mut().submit("ping", &env);
        h.signals.wake();
        h.pool.run_until_stalled();
        assert_eq!(h.host.renders.get(), 6);
        assert_eq!(h.session.borrow().runner_state(), RunnerState::Idle);

        drop(h.signals);
        h.pool.run_until_stalled();
        assert_eq!(h.exit.get(), Some(TaskExit::Disconnected));
        assert!(h.host.requests.borrow().is_empty());
    }

    #[test]
    fn cancelled_token_stops_a_parked_task() {
        let cancel = CancellationToken::new();
        let mut h = harness(None, Rc::new(InstantTimer), cancel.clone());
        h.pool.run_until_stalled();

        cancel.cancel();
        h.signals.wake();
        h.pool.run_until_stalled();
        assert_eq!(h.exit.get(), Some(TaskExit::Cancelled));
    }
}
