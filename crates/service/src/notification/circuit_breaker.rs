use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    /// Failing fast until the recovery timeout elapses.
    Open,
    /// Letting a few probe calls through.
    HalfOpen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Admission {
    Denied,
    Normal,
    /// Probe slot taken in the half-open window with this number.
    Probe(u64),
}

#[derive(Debug)]
struct Inner {
    state: CircuitState,
    failure_count: u64,
    probes_allowed: u64,
    probes_succeeded: u64,
    opened_at: Option<Instant>,
    half_opened_at: Option<Instant>,
    window: u64,
    failure_threshold: u64,
    recovery_timeout: Duration,
    half_open_max_calls: u64,
}

impl Inner {
    fn new(failure_threshold: u64, recovery_timeout: Duration, half_open_max_calls: u64) -> Self {
        Self {
            state: CircuitState::Closed,
            failure_count: 0,
            probes_allowed: 0,
            probes_succeeded: 0,
            opened_at: None,
            half_opened_at: None,
            window: 0,
            failure_threshold: failure_threshold.max(1),
            recovery_timeout,
            half_open_max_calls: half_open_max_calls.max(1),
        }
    }

    fn open(&mut self) {
        self.state = CircuitState::Open;
        self.opened_at = Some(Instant::now());
        self.half_opened_at = None;
        self.probes_allowed = 0;
        self.probes_succeeded = 0;
    }

    fn close(&mut self) {
        self.state = CircuitState::Closed;
        self.failure_count = 0;
        self.probes_allowed = 0;
        self.probes_succeeded = 0;
        self.opened_at = None;
        self.half_opened_at = None;
    }

    fn begin_half_open(&mut self) -> Admission {
        self.state = CircuitState::HalfOpen;
        self.half_opened_at = Some(Instant::now());
        self.window += 1;
        self.probes_allowed = 1;
        self.probes_succeeded = 0;
        Admission::Probe(self.window)
    }

    fn try_acquire(&mut self) -> Admission {
        match self.state {
            CircuitState::Closed => Admission::Normal,
            CircuitState::Open => {
                let elapsed = self.opened_at.map_or(true, |t| t.elapsed() >= self.recovery_timeout);
                if !elapsed {
                    debug!("notification circuit open, short-circuiting call");
                    return Admission::Denied;
                }
                info!("notification circuit half-open, probing remote");
                self.begin_half_open()
            }
            CircuitState::HalfOpen => {
                if self.probes_allowed < self.half_open_max_calls {
                    self.probes_allowed += 1;
                    return Admission::Probe(self.window);
                }
                // probes that never reported back hold their slots; give up on them
                let stale = self.half_opened_at.map_or(true, |t| t.elapsed() >= self.recovery_timeout);
                if stale {
                    warn!("notification probes unanswered, starting a new probe window");
                    return self.begin_half_open();
                }
                Admission::Denied
            }
        }
    }

    /// Hand back a probe slot whose call ended without an outcome.
    fn release_probe(&mut self, window: u64) {
        if self.state == CircuitState::HalfOpen && self.window == window && self.probes_allowed > 0 {
            self.probes_allowed -= 1;
            debug!("notification probe abandoned, slot released");
        }
    }

    fn on_success(&mut self) {
        match self.state {
            CircuitState::Closed => self.failure_count = 0,
            CircuitState::HalfOpen => {
                self.probes_succeeded += 1;
                if self.probes_succeeded >= self.half_open_max_calls {
                    info!("notification circuit closed after successful probes");
                    self.close();
                }
            }
            CircuitState::Open => self.close(),
        }
    }

    fn on_failure(&mut self) {
        self.failure_count += 1;
        match self.state {
            CircuitState::Closed => {
                if self.failure_count >= self.failure_threshold {
                    warn!(failures = self.failure_count, "notification circuit opened");
                    self.open();
                }
            }
            CircuitState::HalfOpen => {
                warn!("notification probe failed, circuit re-opened");
                self.open();
            }
            CircuitState::Open => self.opened_at = Some(Instant::now()),
        }
    }
}

/// Shared breaker guarding calls to the notification service.
#[derive(Clone)]
pub struct CircuitBreaker {
    inner: Arc<Mutex<Inner>>,
    enabled: bool,
}

impl CircuitBreaker {
    pub fn new(failure_threshold: u64, recovery_timeout: Duration, half_open_max_calls: u64, enabled: bool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::new(failure_threshold, recovery_timeout, half_open_max_calls))),
            enabled,
        }
    }

    pub fn from_config(cfg: &configs::CircuitBreakerConfig) -> Self {
        Self::new(
            cfg.failure_threshold,
            Duration::from_millis(cfg.recovery_timeout_ms),
            cfg.half_open_max_calls,
            cfg.enabled,
        )
    }

    /// Ask to place a call. `None` means the circuit is open.
    ///
    /// The permit must be settled with [`Permit::success`] or [`Permit::failure`];
    /// a permit dropped unsettled (cancelled call) frees its probe slot.
    pub async fn try_acquire(&self) -> Option<Permit> {
        if !self.enabled {
            return Some(Permit { breaker: None, probe: None, settled: false });
        }
        match self.inner.lock().await.try_acquire() {
            Admission::Denied => None,
            Admission::Normal => Some(Permit { breaker: Some(self.clone()), probe: None, settled: false }),
            Admission::Probe(window) => Some(Permit { breaker: Some(self.clone()), probe: Some(window), settled: false }),
        }
    }

    pub async fn state(&self) -> CircuitState {
        if !self.enabled {
            return CircuitState::Closed;
        }
        self.inner.lock().await.state
    }
}

/// Admission for one call through the breaker.
#[must_use = "settle the permit with success() or failure()"]
pub struct Permit {
    breaker: Option<CircuitBreaker>,
    probe: Option<u64>,
    settled: bool,
}

impl Permit {
    pub async fn success(mut self) {
        self.settled = true;
        if let Some(b) = &self.breaker {
            b.inner.lock().await.on_success();
        }
    }

    pub async fn failure(mut self) {
        self.settled = true;
        if let Some(b) = &self.breaker {
            b.inner.lock().await.on_failure();
        }
    }
}

impl Drop for Permit {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let (Some(b), Some(window)) = (&self.breaker, self.probe) else { return };
        match b.inner.try_lock() {
            Ok(mut inner) => inner.release_probe(window),
            // contended; the stale-window check reclaims the slot later
            Err(_) => debug!("notification probe slot left for the stale-window check"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    async fn fail_once(cb: &CircuitBreaker) {
        cb.try_acquire().await.expect("permit").failure().await;
    }

    #[tokio::test]
    async fn opens_after_threshold_failures() {
        let cb = CircuitBreaker::new(3, Duration::from_millis(100), 1, true);
        fail_once(&cb).await;
        fail_once(&cb).await;
        assert_eq!(cb.state().await, CircuitState::Closed);
        fail_once(&cb).await;
        assert_eq!(cb.state().await, CircuitState::Open);
        assert!(cb.try_acquire().await.is_none());
    }

    #[tokio::test]
    async fn success_resets_failure_count() {
        let cb = CircuitBreaker::new(2, Duration::from_millis(100), 1, true);
        fail_once(&cb).await;
        cb.try_acquire().await.expect("permit").success().await;
        fail_once(&cb).await;
        assert_eq!(cb.state().await, CircuitState::Closed);
    }

    #[tokio::test]
    async fn half_open_probe_closes_on_success() {
        let cb = CircuitBreaker::new(1, Duration::from_millis(30), 1, true);
        fail_once(&cb).await;
        assert_eq!(cb.state().await, CircuitState::Open);

        sleep(Duration::from_millis(50)).await;
        let probe = cb.try_acquire().await.expect("probe");
        assert_eq!(cb.state().await, CircuitState::HalfOpen);
        // only one probe in flight
        assert!(cb.try_acquire().await.is_none());

        probe.success().await;
        assert_eq!(cb.state().await, CircuitState::Closed);
        assert!(cb.try_acquire().await.is_some());
    }

    #[tokio::test]
    async fn half_open_probe_failure_reopens() {
        let cb = CircuitBreaker::new(1, Duration::from_millis(30), 1, true);
        fail_once(&cb).await;
        sleep(Duration::from_millis(50)).await;
        cb.try_acquire().await.expect("probe").failure().await;
        assert_eq!(cb.state().await, CircuitState::Open);
        assert!(cb.try_acquire().await.is_none());
    }

    #[tokio::test]
    async fn dropped_probe_frees_its_slot() {
        let cb = CircuitBreaker::new(1, Duration::from_secs(30), 1, true);
        {
            let mut inner = cb.inner.lock().await;
            inner.on_failure();
            inner.opened_at = Instant::now().checked_sub(Duration::from_secs(60));
        }
        let probe = cb.try_acquire().await.expect("probe");
        assert!(cb.try_acquire().await.is_none());
        drop(probe);

        assert_eq!(cb.state().await, CircuitState::HalfOpen);
        let retry = cb.try_acquire().await.expect("slot released");
        retry.success().await;
        assert_eq!(cb.state().await, CircuitState::Closed);
    }

    #[tokio::test]
    async fn unanswered_probes_expire_after_recovery_timeout() {
        let cb = CircuitBreaker::new(1, Duration::from_millis(30), 1, true);
        fail_once(&cb).await;
        sleep(Duration::from_millis(50)).await;
        let stuck = cb.try_acquire().await.expect("probe");
        assert!(cb.try_acquire().await.is_none());

        sleep(Duration::from_millis(50)).await;
        let fresh = cb.try_acquire().await.expect("new probe window");
        // the old probe belongs to an earlier window and cannot release the new slot
        drop(stuck);
        assert!(cb.try_acquire().await.is_none());
        fresh.success().await;
        assert_eq!(cb.state().await, CircuitState::Closed);
    }

    #[tokio::test]
    async fn disabled_breaker_never_opens() {
        let cb = CircuitBreaker::new(1, Duration::from_millis(100), 1, false);
        for _ in 0..10 {
            fail_once(&cb).await;
        }
        assert_eq!(cb.state().await, CircuitState::Closed);
    }
}
