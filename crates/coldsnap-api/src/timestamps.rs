//! Conversions between `DateTime<Utc>` and Unix epoch offsets.

use chrono::{DateTime, Utc};

use crate::error::{ApiError, ApiResult};

/// Milliseconds elapsed since 1970-01-01T00:00:00Z.
#[must_use]
pub fn to_epoch_millis(value: DateTime<Utc>) -> i64 {
    value.timestamp_millis()
}

/// Whole seconds elapsed since the epoch, as the 32-bit value the API expects.
///
/// # Errors
///
/// Returns [`ApiError::TimestampOutOfRange`] past 2038-01-19.
pub fn to_epoch_seconds(value: DateTime<Utc>) -> ApiResult<i32> {
    let seconds = value.timestamp();
    i32::try_from(seconds).map_err(|_| ApiError::TimestampOutOfRange { value: seconds })
}

/// Instant `millis` milliseconds after the epoch.
///
/// # Errors
///
/// Returns [`ApiError::TimestampOutOfRange`] outside chrono's range.
pub fn from_epoch_millis(millis: i64) -> ApiResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis).ok_or(ApiError::TimestampOutOfRange { value: millis })
}

/// Instant `seconds` seconds after the epoch.
///
/// # Errors
///
/// Returns [`ApiError::TimestampOutOfRange`] if chrono cannot represent it.
pub fn from_epoch_seconds(seconds: i32) -> ApiResult<DateTime<Utc>> {
    DateTime::from_timestamp(i64::from(seconds), 0).ok_or(ApiError::TimestampOutOfRange {
        value: i64::from(seconds),
    })
}

/// Current time in epoch milliseconds.
#[must_use]
pub fn now_millis() -> i64 {
    to_epoch_millis(Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn epoch_maps_to_zero() -> anyhow::Result<()> {
        let epoch = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(to_epoch_millis(epoch), 0);
        assert_eq!(to_epoch_seconds(epoch)?, 0);
        assert_eq!(from_epoch_millis(0)?, epoch);
        assert_eq!(from_epoch_seconds(0)?, epoch);
        Ok(())
    }

    #[test]
    fn millis_keep_sub_second_precision() -> anyhow::Result<()> {
        let instant = from_epoch_millis(1_700_000_000_123)?;
        assert_eq!(to_epoch_millis(instant), 1_700_000_000_123);
        assert_eq!(to_epoch_seconds(instant)?, 1_700_000_000);
        Ok(())
    }

    #[test]
    fn seconds_beyond_i32_are_rejected() {
        let late = Utc.with_ymd_and_hms(2040, 1, 1, 0, 0, 0).unwrap();
        assert!(matches!(
            to_epoch_seconds(late),
            Err(ApiError::TimestampOutOfRange { .. })
        ));
    }

    #[test]
    fn pre_epoch_instants_are_negative() -> anyhow::Result<()> {
        let instant = from_epoch_seconds(-86_400)?;
        assert_eq!(to_epoch_millis(instant), -86_400_000);
        Ok(())
    }

    #[test]
    fn now_is_after_2020() {
        assert!(now_millis() > 1_577_836_800_000);
    }
}
