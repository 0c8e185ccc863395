use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> { Utc::now() }
}

/// Clock that only moves when told to. Used to drive TTL expiry in tests.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self { Self { now: Mutex::new(start) } }

    pub fn advance_secs(&self, secs: i64) {
        let mut now = self.now.lock();
        if let Some(next) = TimeDelta::try_seconds(secs).and_then(|d| now.checked_add_signed(d)) {
            *now = next;
        }
    }
}

impl Default for ManualClock {
    fn default() -> Self { Self::new(Utc::now()) }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> { *self.now.lock() }
}

/// `now + ttl_seconds`, saturating at the largest representable instant.
pub fn expires_at(now: DateTime<Utc>, ttl_seconds: u64) -> DateTime<Utc> {
    let secs = i64::try_from(ttl_seconds).unwrap_or(i64::MAX);
    TimeDelta::try_seconds(secs)
        .and_then(|d| now.checked_add_signed(d))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::default();
        let t0 = clock.now();
        clock.advance_secs(90);
        assert_eq!((clock.now() - t0).num_seconds(), 90);
    }

    #[test]
    fn expiry_saturates() {
        let now = Utc::now();
        assert_eq!((expires_at(now, 600) - now).num_seconds(), 600);
        assert_eq!(expires_at(now, u64::MAX), DateTime::<Utc>::MAX_UTC);
    }
}
