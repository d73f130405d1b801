//! Human readable durations

/// Render whole minutes as "N minute(s)", anything else as "N seconds"
pub fn duration_label(seconds: u64) -> String {
    let minutes = seconds / 60;
    if seconds % 60 == 0 && minutes > 0 {
        if minutes == 1 {
            "1 minute".to_string()
        } else {
            format!("{} minutes", minutes)
        }
    } else if seconds == 1 {
        "1 second".to_string()
    } else {
        format!("{} seconds", seconds)
    }
}
