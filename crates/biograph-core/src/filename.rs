//! Timestamped names for generated artifacts.

use chrono::{DateTime, SecondsFormat, Utc};

/// Build `<basename>-<timestamp>.<extension>` using the current UTC time.
///
/// The timestamp is ISO 8601 with millisecond precision, with `:` and `.`
/// replaced by `-` so the name is safe on every filesystem,
/// e.g. `story-2024-05-01T10-20-30-123Z.wav`.
pub fn generate_filename(basename: &str, extension: &str) -> String {
    filename_at(basename, extension, Utc::now())
}

/// Same as [`generate_filename`] with an explicit instant.
pub fn filename_at(basename: &str, extension: &str, at: DateTime<Utc>) -> String {
    let timestamp = at
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("{}-{}.{}", basename, timestamp, extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_filename_pattern() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 10, 20, 30).unwrap()
            + chrono::Duration::milliseconds(123);
        assert_eq!(
            filename_at("story", "wav", at),
            "story-2024-05-01T10-20-30-123Z.wav"
        );
    }

    #[test]
    fn test_filename_has_no_separators() {
        let name = generate_filename("story", "wav");
        assert!(name.starts_with("story-"));
        assert!(name.ends_with(".wav"));
        let stem = name.trim_end_matches(".wav");
        assert!(!stem.contains(':'));
        assert!(!stem.contains('.'));
    }
}
