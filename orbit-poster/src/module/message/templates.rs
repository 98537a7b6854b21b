//! Weekday-keyed narrative lines.
//!
//! Every weekday template shares the same slots; only this sentence differs.

use chrono::Weekday;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayFlourish {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl DayFlourish {
    pub const ALL: [DayFlourish; 7] = [
        DayFlourish::Sunday,
        DayFlourish::Monday,
        DayFlourish::Tuesday,
        DayFlourish::Wednesday,
        DayFlourish::Thursday,
        DayFlourish::Friday,
        DayFlourish::Saturday,
    ];

    /// Match an English weekday name as produced by `%A`.
    /// Anything else has no flourish and gets the generic template.
    pub fn from_day_name(name: &str) -> Option<Self> {
        match name {
            "Sunday" => Some(DayFlourish::Sunday),
            "Monday" => Some(DayFlourish::Monday),
            "Tuesday" => Some(DayFlourish::Tuesday),
            "Wednesday" => Some(DayFlourish::Wednesday),
            "Thursday" => Some(DayFlourish::Thursday),
            "Friday" => Some(DayFlourish::Friday),
            "Saturday" => Some(DayFlourish::Saturday),
            _ => None,
        }
    }

    pub fn day_name(&self) -> &'static str {
        match self {
            DayFlourish::Sunday => "Sunday",
            DayFlourish::Monday => "Monday",
            DayFlourish::Tuesday => "Tuesday",
            DayFlourish::Wednesday => "Wednesday",
            DayFlourish::Thursday => "Thursday",
            DayFlourish::Friday => "Friday",
            DayFlourish::Saturday => "Saturday",
        }
    }

    pub fn weekday(&self) -> Weekday {
        match self {
            DayFlourish::Sunday => Weekday::Sun,
            DayFlourish::Monday => Weekday::Mon,
            DayFlourish::Tuesday => Weekday::Tue,
            DayFlourish::Wednesday => Weekday::Wed,
            DayFlourish::Thursday => Weekday::Thu,
            DayFlourish::Friday => Weekday::Fri,
            DayFlourish::Saturday => Weekday::Sat,
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            DayFlourish::Sunday => {
                "Sunday reading: the crew sees about sixteen sunrises a day, so there is always another one on the way."
            }
            DayFlourish::Monday => {
                "Monday motivation: at this speed the station laps the whole planet in roughly ninety minutes."
            }
            DayFlourish::Tuesday => {
                "Tuesday trivia: people have lived aboard the station without a break since November 2000."
            }
            DayFlourish::Wednesday => {
                "Midweek check-in: another few hundred thousand kilometers of orbit since Monday."
            }
            DayFlourish::Thursday => {
                "Thursday thought: from up there the entire planet fits in a single frame, just like below."
            }
            DayFlourish::Friday => {
                "Friday feeling: in orbit the weekend technically starts about sixteen times a day."
            }
            DayFlourish::Saturday => {
                "Saturday spotlight: look up after dusk, the station is often bright enough to see with the naked eye."
            }
        }
    }
}
