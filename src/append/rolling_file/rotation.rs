// Copyright 2024 BlancLog Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use jiff::Span;
use jiff::Zoned;

/// Defines a fixed period for rolling of a log file.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum Rotation {
    /// Roll over once every minute.
    Minutely,
    /// Roll over once every hour.
    Hourly,
    /// Roll over once every day.
    Daily,
    /// Never roll over based on time.
    Never,
}

impl Rotation {
    /// Returns the timestamp in milliseconds at which the next time-based
    /// rollover happens, or `None` for [`Rotation::Never`].
    pub(crate) fn next_date_timestamp(&self, current_date: &Zoned) -> Option<usize> {
        let span = match self {
            Rotation::Minutely => Span::new().minutes(1),
            Rotation::Hourly => Span::new().hours(1),
            Rotation::Daily => Span::new().days(1),
            Rotation::Never => return None,
        };

        let next_date = current_date.checked_add(span).ok()?;
        let next_date = self.round_date(&next_date)?;
        Some(next_date.timestamp().as_millisecond() as usize)
    }

    fn round_date(&self, date: &Zoned) -> Option<Zoned> {
        let rounded = match self {
            Rotation::Minutely => date.with().second(0).subsec_nanosecond(0).build(),
            Rotation::Hourly => date.with().minute(0).second(0).subsec_nanosecond(0).build(),
            Rotation::Daily => date
                .with()
                .hour(0)
                .minute(0)
                .second(0)
                .subsec_nanosecond(0)
                .build(),
            Rotation::Never => return Some(date.clone()),
        };
        rounded.ok()
    }

    pub(crate) fn date_format(&self) -> &'static str {
        match self {
            Rotation::Minutely => "%Y-%m-%d-%H-%M",
            Rotation::Hourly => "%Y-%m-%d-%H",
            Rotation::Daily => "%Y-%m-%d",
            Rotation::Never => "%Y-%m-%d",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn zoned(s: &str) -> Zoned {
        Zoned::from_str(s).unwrap()
    }

    fn millis(s: &str) -> usize {
        zoned(s).timestamp().as_millisecond() as usize
    }

    #[test]
    fn test_next_date_timestamp() {
        let current_date = zoned("2024-08-10T17:12:52[UTC]");

        assert_eq!(
            Rotation::Minutely.next_date_timestamp(&current_date),
            Some(millis("2024-08-10T17:13:00[UTC]"))
        );
        assert_eq!(
            Rotation::Hourly.next_date_timestamp(&current_date),
            Some(millis("2024-08-10T18:00:00[UTC]"))
        );
        assert_eq!(
            Rotation::Daily.next_date_timestamp(&current_date),
            Some(millis("2024-08-11T00:00:00[UTC]"))
        );
        assert_eq!(Rotation::Never.next_date_timestamp(&current_date), None);
    }

    #[test]
    fn test_date_format() {
        let date = zoned("2024-08-10T17:12:52[UTC]");
        assert_eq!(
            date.strftime(Rotation::Daily.date_format()).to_string(),
            "2024-08-10"
        );
        assert_eq!(
            date.strftime(Rotation::Hourly.date_format()).to_string(),
            "2024-08-10-17"
        );
        assert_eq!(
            date.strftime(Rotation::Minutely.date_format()).to_string(),
            "2024-08-10-17-12"
        );
    }
}
