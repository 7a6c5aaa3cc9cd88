//! Timestamp extension (type −1).
//!
//! | Layout       | When                              | Payload                                 |
//! |--------------|-----------------------------------|-----------------------------------------|
//! | timestamp32  | `nanos == 0`, `0 <= s < 2^32`     | `s` as u32                              |
//! | timestamp64  | `0 <= s < 2^34`                   | `(nanos << 34) \| s` as u64             |
//! | timestamp96  | otherwise                         | `nanos` as u32, then `s` as i64         |
//!
//! All fields are big-endian. The payload is framed like any other extension
//! (fixext4, fixext8, ext8 with length 12).

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::MsgPackError;

/// Extension type code reserved for timestamps.
pub const TIMESTAMP_EXT_TYPE: i8 = -1;

const NANOS_PER_SEC: u32 = 1_000_000_000;
const SECONDS_34_BITS: u64 = (1 << 34) - 1;

/// A point in time as signed seconds since the Unix epoch plus a nanosecond
/// fraction in `0..1_000_000_000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    seconds: i64,
    nanos: u32,
}

impl Timestamp {
    pub const UNIX_EPOCH: Timestamp = Timestamp {
        seconds: 0,
        nanos: 0,
    };

    /// Whole seconds in `nanos` carry into `seconds`. The carry saturates at
    /// `i64::MAX`; use [`Timestamp::checked_new`] to detect that.
    pub fn new(seconds: i64, nanos: u32) -> Self {
        Self {
            seconds: seconds.saturating_add((nanos / NANOS_PER_SEC) as i64),
            nanos: nanos % NANOS_PER_SEC,
        }
    }

    /// Like [`Timestamp::new`], but `None` when the carry overflows `seconds`.
    pub fn checked_new(seconds: i64, nanos: u32) -> Option<Self> {
        Some(Self {
            seconds: seconds.checked_add((nanos / NANOS_PER_SEC) as i64)?,
            nanos: nanos % NANOS_PER_SEC,
        })
    }

    /// Builds a timestamp from milliseconds since the epoch.
    pub fn from_millis(millis: i64) -> Self {
        Self {
            seconds: millis.div_euclid(1000),
            nanos: millis.rem_euclid(1000) as u32 * 1_000_000,
        }
    }

    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    pub fn nanos(&self) -> u32 {
        self.nanos
    }

    /// `None` when the instant is outside what [`SystemTime`] can represent.
    pub fn to_system_time(&self) -> Option<SystemTime> {
        if self.seconds >= 0 {
            UNIX_EPOCH.checked_add(Duration::new(self.seconds as u64, self.nanos))
        } else {
            UNIX_EPOCH
                .checked_sub(Duration::from_secs(self.seconds.unsigned_abs()))?
                .checked_add(Duration::from_nanos(self.nanos as u64))
        }
    }

    #[cfg(feature = "chrono")]
    pub fn to_datetime(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::from_timestamp(self.seconds, self.nanos)
    }
}

impl From<SystemTime> for Timestamp {
    fn from(time: SystemTime) -> Self {
        match time.duration_since(UNIX_EPOCH) {
            Ok(after) => Self::new(
                i64::try_from(after.as_secs()).unwrap_or(i64::MAX),
                after.subsec_nanos(),
            ),
            Err(err) => {
                let before = err.duration();
                let seconds = i64::try_from(before.as_secs()).unwrap_or(i64::MAX);
                match before.subsec_nanos() {
                    0 => Self::new(-seconds, 0),
                    nanos => Self::new(-seconds - 1, NANOS_PER_SEC - nanos),
                }
            }
        }
    }
}

#[cfg(feature = "chrono")]
impl From<chrono::DateTime<chrono::Utc>> for Timestamp {
    fn from(time: chrono::DateTime<chrono::Utc>) -> Self {
        // Leap seconds report nanos >= 1e9; `new` carries them.
        Self::new(time.timestamp(), time.timestamp_subsec_nanos())
    }
}

/// A packed timestamp payload, 4, 8 or 12 bytes long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packed {
    bytes: [u8; 12],
    len: usize,
}

impl Packed {
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

/// Whether an extension payload of `len` bytes has a timestamp layout.
pub fn is_packed_len(len: usize) -> bool {
    matches!(len, 4 | 8 | 12)
}

/// Packs `ts` into the narrowest layout that represents it exactly.
pub fn pack(ts: Timestamp) -> Packed {
    let mut bytes = [0u8; 12];
    let (seconds, nanos) = (ts.seconds, ts.nanos);
    let len = if seconds >= 0 && seconds as u64 <= SECONDS_34_BITS {
        if nanos == 0 && seconds <= u32::MAX as i64 {
            bytes[..4].copy_from_slice(&(seconds as u32).to_be_bytes());
            4
        } else {
            let packed = ((nanos as u64) << 34) | seconds as u64;
            bytes[..8].copy_from_slice(&packed.to_be_bytes());
            8
        }
    } else {
        bytes[..4].copy_from_slice(&nanos.to_be_bytes());
        bytes[4..].copy_from_slice(&seconds.to_be_bytes());
        12
    };
    Packed { bytes, len }
}

/// Unpacks a timestamp payload. Returns `Ok(None)` when the payload length is
/// not one of the three timestamp layouts.
pub fn unpack(payload: &[u8]) -> Result<Option<Timestamp>, MsgPackError> {
    let (seconds, nanos) = match *payload {
        [a, b, c, d] => (u32::from_be_bytes([a, b, c, d]) as i64, 0),
        [a, b, c, d, e, f, g, h] => {
            let packed = u64::from_be_bytes([a, b, c, d, e, f, g, h]);
            ((packed & SECONDS_34_BITS) as i64, (packed >> 34) as u32)
        }
        [a, b, c, d, e, f, g, h, i, j, k, l] => (
            i64::from_be_bytes([e, f, g, h, i, j, k, l]),
            u32::from_be_bytes([a, b, c, d]),
        ),
        _ => return Ok(None),
    };
    if nanos >= NANOS_PER_SEC {
        return Err(MsgPackError::InvalidTimestamp { nanos });
    }
    Ok(Some(Timestamp { seconds, nanos }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    #[test]
    fn new_carries_whole_seconds() {
        let ts = Timestamp::new(10, 2_500_000_000);
        assert_eq!(ts.seconds(), 12);
        assert_eq!(ts.nanos(), 500_000_000);
    }

    #[test]
    fn carry_at_max_seconds() {
        let saturated = Timestamp::new(i64::MAX, 1_500_000_000);
        assert_eq!(saturated.seconds(), i64::MAX);
        assert_eq!(saturated.nanos(), 500_000_000);
        assert_eq!(Timestamp::checked_new(i64::MAX, 1_500_000_000), None);
        assert_eq!(
            Timestamp::checked_new(i64::MAX, 999_999_999).map(|ts| ts.nanos()),
            Some(999_999_999)
        );
        assert_eq!(
            Timestamp::checked_new(10, 2_500_000_000),
            Some(Timestamp::new(12, 500_000_000))
        );
    }

    #[test]
    fn from_millis_before_epoch() {
        let ts = Timestamp::from_millis(-1);
        assert_eq!(ts.seconds(), -1);
        assert_eq!(ts.nanos(), 999_000_000);
    }

    #[test]
    fn layout_selection() {
        assert_eq!(hex(pack(Timestamp::UNIX_EPOCH).as_slice()), "00000000");
        assert_eq!(pack(Timestamp::new(u32::MAX as i64, 0)).as_slice().len(), 4);
        assert_eq!(pack(Timestamp::new(u32::MAX as i64 + 1, 0)).as_slice().len(), 8);
        assert_eq!(pack(Timestamp::new(0, 1)).as_slice().len(), 8);
        assert_eq!(pack(Timestamp::new((1 << 34) - 1, 5)).as_slice().len(), 8);
        assert_eq!(pack(Timestamp::new(1 << 34, 0)).as_slice().len(), 12);
        assert_eq!(pack(Timestamp::new(-1, 0)).as_slice().len(), 12);
    }

    #[test]
    fn timestamp64_bit_layout() {
        let packed = pack(Timestamp::new(1_136_073_599, 999_000_000));
        assert_eq!(hex(packed.as_slice()), "ee2e1f0043b71b7f");
    }

    #[test]
    fn timestamp96_bit_layout() {
        let packed = pack(Timestamp::new(-427_334_400, 0));
        assert_eq!(hex(packed.as_slice()), "00000000ffffffffe6876500");
    }

    #[test]
    fn unpack_inverts_pack() {
        for ts in [
            Timestamp::UNIX_EPOCH,
            Timestamp::new(960_854_400, 0),
            Timestamp::new(5_364_710_055, 678_000_000),
            Timestamp::new(-1, 999_999_999),
            Timestamp::new(i64::MIN, 0),
            Timestamp::new(i64::MAX, 999_999_999),
        ] {
            assert_eq!(unpack(pack(ts).as_slice()), Ok(Some(ts)));
        }
    }

    #[test]
    fn unpack_rejects_nanos_overflow() {
        let packed = (1_000_000_000u64 << 34).to_be_bytes();
        assert_eq!(
            unpack(&packed),
            Err(MsgPackError::InvalidTimestamp {
                nanos: 1_000_000_000
            })
        );
    }

    #[test]
    fn unpack_other_lengths_is_none() {
        assert_eq!(unpack(&[0u8; 1]), Ok(None));
        assert_eq!(unpack(&[0u8; 16]), Ok(None));
    }

    #[test]
    fn system_time_round_trip() {
        let before = UNIX_EPOCH - Duration::new(5, 250_000_000);
        let ts = Timestamp::from(before);
        assert_eq!(ts.seconds(), -6);
        assert_eq!(ts.nanos(), 750_000_000);
        assert_eq!(ts.to_system_time(), Some(before));

        let after = UNIX_EPOCH + Duration::new(1_700_000_000, 42);
        assert_eq!(Timestamp::from(after).to_system_time(), Some(after));
    }

    #[cfg(feature = "chrono")]
    #[test]
    fn chrono_round_trip() {
        let dt = chrono::DateTime::from_timestamp(1_136_073_599, 999_000_000).unwrap();
        let ts = Timestamp::from(dt);
        assert_eq!(ts, Timestamp::new(1_136_073_599, 999_000_000));
        assert_eq!(ts.to_datetime(), Some(dt));
    }
}
