//! Daily update timer.
//!
//! Only one person should run a timer per presentation, so setting one up
//! requires an explicit confirmation phrase.

use chrono::{Days, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{AnnounceError, Result};

pub const CONFIRMATION_PHRASE: &str = "yes, i'm sure";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTimer {
    pub hour: u32,
}

impl DailyTimer {
    /// Validates a timer request as typed by a person.
    pub fn confirm(confirmation: &str, hour_text: &str) -> Result<Self> {
        if confirmation.trim().to_lowercase() != CONFIRMATION_PHRASE {
            return Err(AnnounceError::TimerNotConfirmed);
        }
        let hour = hour_text
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|hour| *hour < 24)
            .ok_or_else(|| AnnounceError::InvalidHour(hour_text.to_string()))?;
        Ok(Self { hour })
    }

    /// First firing strictly after `now`.
    pub fn next_run_after(&self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        let time = NaiveTime::from_hms_opt(self.hour, 0, 0)?;
        let today = now.date().and_time(time);
        if today > now {
            Some(today)
        } else {
            today.checked_add_days(Days::new(1))
        }
    }

    pub fn is_due(&self, last_run: Option<NaiveDateTime>, now: NaiveDateTime) -> bool {
        match last_run {
            Some(last) => self.next_run_after(last).is_some_and(|next| next <= now),
            None => now.hour() >= self.hour,
        }
    }
}
