//! Reading screen lifecycle: one backend request per screen, guarded by a
//! liveness flag so a result arriving after unmount is discarded.

use std::future::Future;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use shinai_client::{FortuneClient, GongsuOptions};
use shinai_core::{FortuneRequest, FortuneResponse};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub const FORTUNE_FAILED: &str = "점사를 불러오는 데 실패했습니다.";
pub const GONGSU_FAILED: &str = "공수를 불러오는 데 실패했습니다.";

/// What the screen was opened with.
#[derive(Debug, Clone, Default)]
pub struct ReadingRoute {
    /// The concern as the user typed it (trimmed, without the branch note).
    pub user_input: String,
    /// Structured request; when present the analysis endpoint is used.
    pub payload: Option<FortuneRequest>,
    /// Reading computed elsewhere (`shinai show` loads one saved with
    /// `--json`); shown without any request.
    pub preloaded: Option<FortuneResponse>,
    pub gongsu: GongsuOptions,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Reading {
    Fortune(FortuneResponse),
    Message(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScreenState {
    Loading,
    Ready(Reading),
    /// The request task panicked or was cancelled before producing a reading.
    Crashed,
}

#[derive(Debug, Clone)]
struct Liveness(Arc<AtomicBool>);

impl Liveness {
    fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    fn is_alive(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn kill(&self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct ReadingScreen {
    state: watch::Receiver<ScreenState>,
    alive: Liveness,
    task: Option<JoinHandle<()>>,
    crashed: bool,
}

impl ReadingScreen {
    /// Open the screen and start its request. Must be called inside a Tokio
    /// runtime.
    pub fn mount(client: FortuneClient, route: ReadingRoute) -> Self {
        if let Some(fortune) = route.preloaded {
            let (_tx, state) = watch::channel(ScreenState::Ready(Reading::Fortune(fortune)));
            return Self {
                state,
                alive: Liveness::new(),
                task: None,
                crashed: false,
            };
        }

        Self::spawn(async move { load(&client, route).await })
    }

    /// Run `reading` as the screen's request task.
    fn spawn(reading: impl Future<Output = Reading> + Send + 'static) -> Self {
        let alive = Liveness::new();
        let (tx, state) = watch::channel(ScreenState::Loading);
        let guard = alive.clone();
        let task = tokio::spawn(async move {
            let reading = reading.await;
            if guard.is_alive() {
                tx.send_replace(ScreenState::Ready(reading));
            } else {
                debug!("screen unmounted; discarding reading");
            }
        });

        Self {
            state,
            alive,
            task: Some(task),
            crashed: false,
        }
    }

    pub fn state(&self) -> ScreenState {
        if self.crashed {
            return ScreenState::Crashed;
        }
        self.state.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        !self.crashed && matches!(*self.state.borrow(), ScreenState::Loading)
    }

    /// Stop applying results. A request already in flight still completes
    /// but leaves the state untouched.
    pub fn unmount(&self) {
        self.alive.kill();
    }

    /// Wait for the in-flight request, if any, and return the final state.
    ///
    /// Cancel-safe: dropping the future leaves the request running.
    pub async fn settled(&mut self) -> ScreenState {
        if let Some(task) = self.task.as_mut() {
            if let Err(e) = task.await {
                warn!(error = %e, "reading task failed");
                self.crashed = true;
            }
            self.task = None;
        }
        self.state()
    }

    /// Wait for the reading, calling `on_tick` every `every` meanwhile.
    ///
    /// If `interrupt` completes first the screen is unmounted and `None` is
    /// returned. `interrupt` is polled across ticks, not restarted.
    pub async fn settle_unless(
        &mut self,
        interrupt: impl Future,
        every: Duration,
        mut on_tick: impl FnMut() -> io::Result<()>,
    ) -> io::Result<Option<ScreenState>> {
        tokio::pin!(interrupt);
        let mut ticker = tokio::time::interval(every);

        let settled = loop {
            tokio::select! {
                state = self.settled() => break Some(state),
                _ = &mut interrupt => break None,
                _ = ticker.tick() => on_tick()?,
            }
        };
        if settled.is_none() {
            debug!("interrupted while loading; unmounting");
            self.unmount();
        }
        Ok(settled)
    }
}

impl Drop for ReadingScreen {
    fn drop(&mut self) {
        self.alive.kill();
    }
}

async fn load(client: &FortuneClient, route: ReadingRoute) -> Reading {
    match route.payload {
        Some(payload) => match client.analyze_fortune(&payload).await {
            Ok(fortune) => Reading::Fortune(fortune),
            Err(e) => {
                warn!(error = %e, "fortune analysis failed");
                Reading::Message(FORTUNE_FAILED.to_string())
            }
        },
        None => match client.fetch_gongsu(&route.user_input, &route.gongsu).await {
            Ok(reply) => Reading::Message(reply.into_message()),
            Err(e) => {
                warn!(error = %e, "gongsu request failed");
                Reading::Message(GONGSU_FAILED.to_string())
            }
        },
    }
}
