//! Wall clock lease timestamps.

use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
/// Absolute point in time, as seconds and nanoseconds relative to the unix epoch.
///
/// Field order matters: the derived ordering compares `seconds` first.
pub struct Timestamp {
    pub seconds: i64,
    pub nanos: u32,
}

impl Timestamp {
    /// Latest representable timestamp, used when `now + ttl` overflows.
    pub const MAX: Timestamp = Timestamp {
        seconds: i64::MAX,
        nanos: 999_999_999,
    };

    /// Current wall clock time.
    pub fn now() -> Self {
        SystemTime::now().into()
    }

    /// `now + ttl`, saturating at [Timestamp::MAX].
    pub fn after(ttl: Duration) -> Self {
        SystemTime::now()
            .checked_add(ttl)
            .map_or(Timestamp::MAX, Timestamp::from)
    }

    /// Returns `None` if this timestamp is out of the platform's [SystemTime] range.
    pub fn to_system_time(&self) -> Option<SystemTime> {
        let nanos = Duration::from_nanos(self.nanos.into());

        let time = if self.seconds >= 0 {
            UNIX_EPOCH.checked_add(Duration::from_secs(self.seconds.unsigned_abs()))?
        } else {
            UNIX_EPOCH.checked_sub(Duration::from_secs(self.seconds.unsigned_abs()))?
        };

        time.checked_add(nanos)
    }
}

impl From<SystemTime> for Timestamp {
    fn from(time: SystemTime) -> Self {
        match time.duration_since(UNIX_EPOCH) {
            Ok(since) => match i64::try_from(since.as_secs()) {
                Ok(seconds) => Timestamp {
                    seconds,
                    nanos: since.subsec_nanos(),
                },
                Err(_) => Timestamp::MAX,
            },
            Err(before) => {
                // Normalize so that nanos always counts forward.
                let before = before.duration();
                let mut seconds = i64::try_from(before.as_secs()).map_or(i64::MIN, |s| -s);
                let mut nanos = before.subsec_nanos();
                if nanos > 0 && seconds > i64::MIN {
                    seconds -= 1;
                    nanos = 1_000_000_000 - nanos;
                }

                Timestamp { seconds, nanos }
            }
        }
    }
}
