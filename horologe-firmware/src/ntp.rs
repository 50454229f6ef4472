//! SNTP time source adapter
//!
//! The radio module runs the SNTP client. A sync is asynchronous: the
//! first call posts a request and fails, a later call picks up the answer
//! the modem task stored in the meantime.

use embassy_time::Instant;

use horologe_core::traits::TimeSource;

use crate::channels::{SNTP_ANSWER, SYNC_REQUEST};

/// One completed SNTP query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SntpAnswer {
    /// UTC epoch seconds reported by the module
    pub epoch: i64,
    /// When the answer arrived
    pub received: Instant,
}

impl SntpAnswer {
    /// UTC epoch seconds now, assuming the answer was exact on arrival
    pub fn epoch_now(&self) -> i64 {
        self.epoch + self.received.elapsed().as_secs() as i64
    }
}

/// [`TimeSource`] over the modem task's SNTP queries
#[derive(Debug, Default)]
pub struct ModemTimeSource;

impl TimeSource for ModemTimeSource {
    fn try_sync(&mut self, tz_offset_s: i32, dst_offset_s: i32) -> Option<i64> {
        match SNTP_ANSWER.try_take() {
            Some(answer) => {
                Some(answer.epoch_now() + i64::from(tz_offset_s) + i64::from(dst_offset_s))
            }
            None => {
                SYNC_REQUEST.signal(());
                None
            }
        }
    }
}
