use chrono::{DateTime, Utc};

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// "May 6, 2025". Unparseable input is returned unchanged.
pub fn format_publish_date(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(dt) => dt.format("%B %-d, %Y").to_string(),
        None => raw.to_string(),
    }
}

/// "May 2025", as shown on the profile header.
pub fn format_member_since(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(dt) => dt.format("%b %Y").to_string(),
        None => raw.to_string(),
    }
}

/// Five-slot star bar, e.g. `★★★☆☆`.
pub fn rating_stars(rating: u8) -> String {
    let filled = usize::from(rating.min(5));
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_date_is_long_form() {
        assert_eq!(format_publish_date("2025-05-06T10:00:00.000Z"), "May 6, 2025");
        assert_eq!(format_publish_date("2024-12-25T23:59:59Z"), "December 25, 2024");
    }

    #[test]
    fn member_since_is_short_month_and_year() {
        assert_eq!(format_member_since("2025-05-01T00:00:00.000Z"), "May 2025");
    }

    #[test]
    fn garbage_passes_through() {
        assert_eq!(format_publish_date("yesterday"), "yesterday");
        assert_eq!(format_member_since(""), "");
    }

    #[test]
    fn stars_clamp_to_five() {
        assert_eq!(rating_stars(3), "★★★☆☆");
        assert_eq!(rating_stars(0), "☆☆☆☆☆");
        assert_eq!(rating_stars(9), "★★★★★");
    }
}
