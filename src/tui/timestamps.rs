use chrono::{DateTime, Utc};

/// Compact age column for result rows: "now", "12m", "5h", "3d", falling
/// back to a plain date once a note is older than two weeks.
pub fn format_age(mod_time: &DateTime<Utc>) -> String {
    let age = Utc::now().signed_duration_since(*mod_time);

    let minutes = age.num_minutes();
    if minutes < 1 {
        return "now".to_string();
    }
    if minutes < 60 {
        return format!("{minutes}m");
    }

    let hours = age.num_hours();
    if hours < 24 {
        return format!("{hours}h");
    }

    let days = age.num_days();
    if days <= 14 {
        return format!("{days}d");
    }

    mod_time.format("%Y-%m-%d").to_string()
}
