//! Built-in engagement tables used whenever the model path is unavailable.
//!
//! The tables are opinionated but deliberately small: four ranked slots per
//! platform and one timing row per industry. They are rebuilt per call so
//! callers can hold owned values without a global registry.

use chrono::NaiveTime;

pub const DEFAULT_PLATFORM: &str = "Instagram";

/// One ranked posting slot. `score` doubles as the fallback confidence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSlot {
    pub time: NaiveTime,
    pub label: &'static str,
    pub score: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformTimes {
    pub platform: &'static str,
    /// Ranked best-first; always four entries.
    pub slots: Vec<TimeSlot>,
    pub best_days: Vec<&'static str>,
    pub tip: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndustryTiming {
    pub industry: &'static str,
    pub peak_hours: Vec<NaiveTime>,
    pub audience_type: &'static str,
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

fn slot(hour: u32, minute: u32, label: &'static str, score: u8) -> TimeSlot {
    TimeSlot {
        time: hm(hour, minute),
        label,
        score,
    }
}

/// Ranked slots for a platform. The match is case-sensitive on the display
/// names the planner uses; anything unrecognized gets the Instagram table.
pub fn best_times_for(platform: &str) -> PlatformTimes {
    match platform {
        "TikTok" => PlatformTimes {
            platform: "TikTok",
            slots: vec![
                slot(19, 0, "Prime evening", 96),
                slot(12, 0, "Lunchtime break", 90),
                slot(21, 0, "Late-night scroll", 87),
                slot(15, 0, "Afternoon slump", 83),
            ],
            best_days: vec!["Tuesday", "Thursday", "Friday"],
            tip: "Completion rate decides reach; the evening window gives short clips the most full watches.",
        },
        "X (Twitter)" => PlatformTimes {
            platform: "X (Twitter)",
            slots: vec![
                slot(9, 0, "Morning commute", 94),
                slot(12, 0, "Lunch check-in", 89),
                slot(17, 0, "End of workday", 85),
                slot(20, 0, "Evening chatter", 80),
            ],
            best_days: vec!["Monday", "Tuesday", "Wednesday"],
            tip: "Conversation peaks while people commute; questions travel furthest before noon.",
        },
        "Facebook" => PlatformTimes {
            platform: "Facebook",
            slots: vec![
                slot(13, 0, "Midday browse", 93),
                slot(9, 0, "Morning coffee", 87),
                slot(15, 0, "Afternoon lull", 83),
                slot(19, 0, "After dinner", 78),
            ],
            best_days: vec!["Wednesday", "Thursday", "Friday"],
            tip: "Shares climb midweek around lunch; link posts do best with a one-line setup.",
        },
        "YouTube" => PlatformTimes {
            platform: "YouTube",
            slots: vec![
                slot(17, 0, "After work and school", 95),
                slot(20, 0, "Evening viewing", 91),
                slot(12, 0, "Lunch break", 86),
                slot(15, 0, "Weekend afternoon", 82),
            ],
            best_days: vec!["Thursday", "Friday", "Saturday"],
            tip: "Publish a few hours before the evening watch window so recommendations have time to warm up.",
        },
        _ => PlatformTimes {
            platform: DEFAULT_PLATFORM,
            slots: vec![
                slot(11, 0, "Lunch break scroll", 95),
                slot(13, 0, "Early afternoon lull", 90),
                slot(19, 0, "Evening wind-down", 88),
                slot(8, 0, "Commute scroll", 82),
            ],
            best_days: vec!["Tuesday", "Wednesday", "Thursday"],
            tip: "Feed posts just before lunch catch the midday scroll; keep the first caption line tight.",
        },
    }
}

/// Per-industry peak hours for the prompt and the fallback reasoning. The
/// lookup is case-insensitive; unknown industries get a generic row.
pub fn timing_for(industry: &str) -> IndustryTiming {
    match industry.trim().to_lowercase().as_str() {
        "fitness" => IndustryTiming {
            industry: "fitness",
            peak_hours: vec![hm(6, 0), hm(12, 0), hm(18, 0)],
            audience_type: "early risers and after-work gym-goers",
        },
        "food" => IndustryTiming {
            industry: "food",
            peak_hours: vec![hm(11, 30), hm(17, 30), hm(20, 0)],
            audience_type: "meal planners and evening browsers",
        },
        "fashion" => IndustryTiming {
            industry: "fashion",
            peak_hours: vec![hm(12, 0), hm(15, 0), hm(20, 0)],
            audience_type: "lunch-hour and late-evening shoppers",
        },
        "beauty" => IndustryTiming {
            industry: "beauty",
            peak_hours: vec![hm(10, 0), hm(14, 0), hm(19, 0)],
            audience_type: "daytime tutorial watchers",
        },
        "tech" | "technology" => IndustryTiming {
            industry: "tech",
            peak_hours: vec![hm(9, 0), hm(13, 0), hm(21, 0)],
            audience_type: "desk-hours professionals and late-night readers",
        },
        "travel" => IndustryTiming {
            industry: "travel",
            peak_hours: vec![hm(8, 0), hm(12, 30), hm(21, 0)],
            audience_type: "commute daydreamers and weekend planners",
        },
        "education" => IndustryTiming {
            industry: "education",
            peak_hours: vec![hm(7, 30), hm(16, 0), hm(19, 30)],
            audience_type: "students and after-class learners",
        },
        "finance" => IndustryTiming {
            industry: "finance",
            peak_hours: vec![hm(7, 0), hm(12, 0), hm(17, 30)],
            audience_type: "market-hours readers catching up on the commute",
        },
        _ => IndustryTiming {
            industry: "default",
            peak_hours: vec![hm(9, 0), hm(12, 0), hm(19, 0)],
            audience_type: "a broad daytime audience",
        },
    }
}
