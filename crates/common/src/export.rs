//! Filename rules for exported artifacts

/// Number of prompt characters considered before sanitizing
pub const PROMPT_SEGMENT_CHARS: usize = 50;

/// Used when a prompt has no alphanumeric characters at all
const FALLBACK_SEGMENT: &str = "artifact";

/// Reduce a prompt to a filesystem-safe segment.
///
/// The first 50 characters of the prompt are kept; every run of
/// non-alphanumeric characters collapses to one `-`, leading and trailing
/// separators are dropped and the result is lowercased.
pub fn sanitize_prompt(prompt: &str) -> String {
    let mut segment = String::new();
    let mut pending_separator = false;

    for c in prompt.chars().take(PROMPT_SEGMENT_CHARS) {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !segment.is_empty() {
                segment.push('-');
            }
            pending_separator = false;
            segment.push(c.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }

    segment
}

/// Build the download filename for an artifact
pub fn export_filename(prompt: &str, timestamp_millis: i64, extension: &str) -> String {
    let segment = sanitize_prompt(prompt);
    let segment = if segment.is_empty() {
        FALLBACK_SEGMENT
    } else {
        segment.as_str()
    };

    format!("{}-{}.{}", segment, timestamp_millis, extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_punctuation_collapses_to_single_separator() {
        assert_eq!(sanitize_prompt("A: B? C!"), "a-b-c");
    }

    #[test]
    fn test_prompt_truncated_before_sanitizing() {
        let prompt = format!("{}{}", "a".repeat(49), " tail words");
        // 49 letters + one space survive truncation; the trailing separator is dropped
        assert_eq!(sanitize_prompt(&prompt), "a".repeat(49));
    }

    #[test]
    fn test_non_ascii_is_treated_as_separator() {
        assert_eq!(sanitize_prompt("Café au lait"), "caf-au-lait");
    }

    #[test]
    fn test_export_filename() {
        assert_eq!(
            export_filename("A futuristic cityscape", 1700000000000, "png"),
            "a-futuristic-cityscape-1700000000000.png"
        );
        assert_eq!(export_filename("?!", 42, "txt"), "artifact-42.txt");
    }
}
