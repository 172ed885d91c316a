use crate::core::{Route, Sample};
use crate::error::{LoadError, LoadFailureKind, SessionError};
use crate::input::RouteSource;
use crate::playback::{
    FollowReason, PlaybackClock, PlaybackConfig, PlaybackEngine, PlaybackSnapshot, PlaybackState,
    RenderEvent,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Where the session is in its one-shot route load
#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    /// Still waiting for route data
    NotLoaded,
    Loaded,
    /// Load failed; the session stays uninitialized for good
    Failed {
        kind: LoadFailureKind,
        message: String,
    },
}

struct Shared {
    status: LoadStatus,
    engine: Option<PlaybackEngine>,
    /// Bumped whenever the clock is started or cancelled so stale ticks can be recognised
    epoch: u64,
    events: mpsc::UnboundedSender<RenderEvent>,
    follow_zoom: u8,
}

impl Shared {
    fn notify(&self, sample: &Sample, reason: FollowReason) {
        let event = RenderEvent::follow(sample, self.follow_zoom, reason);
        if self.events.send(event).is_err() {
            debug!("Render event dropped, no surface attached");
        }
    }

    /// Clock callback: advance once if this clock generation is still current
    fn tick(&mut self, epoch: u64) -> bool {
        if self.epoch != epoch {
            return false;
        }
        let Some(engine) = self.engine.as_mut() else {
            return false;
        };

        let next = engine.tick().cloned();
        match next {
            Some(next) => {
                self.notify(&next, FollowReason::Tick);
                true
            }
            None => false,
        }
    }
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Command interface for one playback session.
///
/// Accepts `play`/`pause`/`reset` and exposes read-only views of the trip for a
/// rendering surface. Recenter notifications arrive on the receiver returned by
/// [`Session::new`].
pub struct Session {
    shared: Arc<Mutex<Shared>>,
    clock: PlaybackClock,
    runtime: Handle,
    config: PlaybackConfig,
}

impl Session {
    /// Create an uninitialized session. Must be called from within a Tokio runtime.
    ///
    /// The render event channel is unbounded: a surface that never drains the
    /// receiver accumulates one event per tick, like the traveled path does.
    pub fn new(
        config: PlaybackConfig,
    ) -> Result<(Self, mpsc::UnboundedReceiver<RenderEvent>), SessionError> {
        let runtime = Handle::try_current().map_err(|_| SessionError::NoRuntime)?;
        let (events, receiver) = mpsc::unbounded_channel();

        let shared = Shared {
            status: LoadStatus::NotLoaded,
            engine: None,
            epoch: 0,
            events,
            follow_zoom: config.follow_zoom,
        };

        let session = Self {
            shared: Arc::new(Mutex::new(shared)),
            clock: PlaybackClock::new(config.effective_tick_interval()),
            runtime,
            config,
        };
        Ok((session, receiver))
    }

    /// Fetch the route from `source` and install it
    pub async fn load_from<S>(&mut self, source: &S) -> Result<(), SessionError>
    where
        S: RouteSource + ?Sized,
    {
        if lock(&self.shared).status != LoadStatus::NotLoaded {
            return Err(SessionError::RouteAlreadyLoaded);
        }

        info!("Loading route from {}", source.describe());
        let result = source.fetch().await;
        self.install(result)
    }

    /// Install already decoded samples
    pub fn load_samples(&mut self, samples: Vec<Sample>) -> Result<(), SessionError> {
        self.install(Route::new(samples))
    }

    /// Record the outcome of the one route load this session gets
    pub fn install(&mut self, result: Result<Route, LoadError>) -> Result<(), SessionError> {
        {
            let mut shared = lock(&self.shared);
            if shared.status != LoadStatus::NotLoaded {
                return Err(SessionError::RouteAlreadyLoaded);
            }

            let route = match result {
                Ok(route) => route,
                Err(err) => {
                    error!("Error loading route: {}", err);
                    shared.status = LoadStatus::Failed {
                        kind: err.kind(),
                        message: err.to_string(),
                    };
                    return Err(err.into());
                }
            };

            info!("Route loaded: {} samples (timed: {})", route.len(), route.is_timed());
            let engine = PlaybackEngine::new(route);
            shared.notify(engine.route().first(), FollowReason::Initialized);
            shared.engine = Some(engine);
            shared.status = LoadStatus::Loaded;
        }

        if self.config.autoplay {
            self.play();
        }
        Ok(())
    }

    /// Start or resume automatic playback. No-op if already playing or no route is loaded.
    pub fn play(&mut self) {
        let epoch = {
            let mut shared = lock(&self.shared);
            let Some(engine) = shared.engine.as_mut() else {
                warn!("play() ignored, no route loaded");
                return;
            };
            if !engine.play() {
                return;
            }
            shared.epoch += 1;
            shared.epoch
        };

        let shared = Arc::clone(&self.shared);
        self.clock
            .start(&self.runtime, move || lock(&shared).tick(epoch));
    }

    /// Pause playback and cancel the pending tick. Keeps position and traveled path.
    pub fn pause(&mut self) {
        {
            let mut shared = lock(&self.shared);
            let Some(engine) = shared.engine.as_mut() else {
                warn!("pause() ignored, no route loaded");
                return;
            };
            engine.pause();
            shared.epoch += 1;
        }
        self.clock.stop();
    }

    /// Return to the trip start, pause, and recenter the surface on it
    pub fn reset(&mut self) {
        {
            let mut shared = lock(&self.shared);
            let Some(engine) = shared.engine.as_mut() else {
                warn!("reset() ignored, no route loaded");
                return;
            };
            let start = engine.reset().clone();
            shared.epoch += 1;
            shared.notify(&start, FollowReason::Reset);
        }
        self.clock.stop();
    }

    pub fn load_status(&self) -> LoadStatus {
        lock(&self.shared).status.clone()
    }

    pub fn state(&self) -> PlaybackState {
        lock(&self.shared)
            .engine
            .as_ref()
            .map_or(PlaybackState::Uninitialized, PlaybackEngine::state)
    }

    pub fn is_playing(&self) -> bool {
        self.state() == PlaybackState::Playing
    }

    /// Whether the tick task is currently scheduled
    pub fn clock_running(&self) -> bool {
        self.clock.is_running()
    }

    pub fn current_position(&self) -> Option<Sample> {
        self.with_engine(|engine| engine.current_position().clone())
    }

    pub fn current_index(&self) -> Option<usize> {
        self.with_engine(PlaybackEngine::current_index)
    }

    /// Speed in km/h; 0 before a route is loaded
    pub fn current_speed(&self) -> f64 {
        self.with_engine(PlaybackEngine::current_speed)
            .unwrap_or(0.0)
    }

    pub fn elapsed_time(&self) -> Duration {
        self.with_engine(PlaybackEngine::elapsed_time)
            .unwrap_or(Duration::ZERO)
    }

    pub fn traveled_path(&self) -> Vec<Sample> {
        self.with_engine(|engine| engine.traveled_path().to_vec())
            .unwrap_or_default()
    }

    /// The full planned path, for an overlay
    pub fn route(&self) -> Option<Route> {
        self.with_engine(|engine| engine.route().clone())
    }

    pub fn snapshot(&self) -> Option<PlaybackSnapshot> {
        self.with_engine(PlaybackEngine::snapshot)
    }

    fn with_engine<T>(&self, f: impl FnOnce(&PlaybackEngine) -> T) -> Option<T> {
        lock(&self.shared).engine.as_ref().map(f)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        lock(&self.shared).epoch += 1;
        self.clock.stop();
    }
}
