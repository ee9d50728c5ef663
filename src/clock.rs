/*
Source of "now" for every date calculation.
Classifiers take an explicit instant; handlers ask the clock once per request.
*/

use chrono::{DateTime, FixedOffset, Utc};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

// Local time with the current system offset frozen into a FixedOffset
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        let local = chrono::Local::now();
        let offset_seconds = local.offset().local_minus_utc();
        match FixedOffset::east_opt(offset_seconds) {
            Some(fixed) => local.with_timezone(&fixed),
            None => Utc::now().fixed_offset(),
        }
    }
}

/// Clock pinned to a single instant, for tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

// Any zero-argument function returning an instant is a clock
impl<F> Clock for F
where
    F: Fn() -> DateTime<FixedOffset> + Send + Sync,
{
    fn now(&self) -> DateTime<FixedOffset> {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_never_moves() {
        let t = DateTime::parse_from_rfc3339("2025-06-03T08:00:00Z").unwrap();
        let clock = FixedClock(t);
        assert_eq!(clock.now(), t);
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn closures_act_as_clocks() {
        let t = DateTime::parse_from_rfc3339("2025-01-01T00:00:00+09:00").unwrap();
        let clock = move || t;
        assert_eq!(Clock::now(&clock), t);
    }
}
