use ptac_core::ResultSet;

use crate::cli::OutputFormat;

const BANNER_WIDTH: usize = 80;
const SEPARATOR_WIDTH: usize = 40;
pub const FAILURE_MARK: &str = "❌";

/// Results in key order: a banner, then one block per image.
pub fn format_text(results: &ResultSet) -> String {
    let banner = "=".repeat(BANNER_WIDTH);
    let separator = "-".repeat(SEPARATOR_WIDTH);

    let mut out = format!("\n{banner}\nOCR RESULTS\n{banner}\n");
    for (key, outcome) in results.iter() {
        out.push_str(&format!("\n--- {key} ---\n"));
        if outcome.is_error() {
            out.push_str(&format!("{FAILURE_MARK} {outcome}\n"));
        } else {
            for line in outcome.text_or_empty().lines().map(str::trim).filter(|l| !l.is_empty()) {
                out.push_str(line);
                out.push('\n');
            }
        }
        out.push_str(&separator);
        out.push('\n');
    }
    out
}

pub fn format_json(results: &ResultSet) -> serde_json::Result<String> {
    serde_json::to_string_pretty(results)
}

pub fn render(results: &ResultSet, format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Text => Ok(format_text(results)),
        OutputFormat::Json => format_json(results),
    }
}

pub fn summary(results: &ResultSet) -> String {
    format!(
        "📊 Summary: {}/{} images processed successfully",
        results.success_count(),
        results.len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ptac_core::OcrOutcome;

    fn sample() -> ResultSet {
        let mut set = ResultSet::new();
        set.insert("q2.png", OcrOutcome::failed("cannot identify image file"));
        set.insert("q1.png", OcrOutcome::Text("What is lift?\n\n  Upward force  ".into()));
        set
    }

    #[test]
    fn text_lists_entries_in_key_order() {
        let out = format_text(&sample());
        let expected = format!(
            "\n{b}\nOCR RESULTS\n{b}\n\
             \n--- q1.png ---\nWhat is lift?\nUpward force\n{s}\n\
             \n--- q2.png ---\n❌ ERROR: cannot identify image file\n{s}\n",
            b = "=".repeat(80),
            s = "-".repeat(40),
        );
        assert_eq!(out, expected);
    }

    #[test]
    fn empty_text_still_gets_a_block() {
        let mut set = ResultSet::new();
        set.insert("blank.png", OcrOutcome::Text(String::new()));
        let out = format_text(&set);
        assert!(out.ends_with(&format!("\n--- blank.png ---\n{}\n", "-".repeat(40))));
    }

    #[test]
    fn summary_counts_successes() {
        assert_eq!(summary(&sample()), "📊 Summary: 1/2 images processed successfully");
        assert_eq!(summary(&ResultSet::new()), "📊 Summary: 0/0 images processed successfully");
    }

    #[test]
    fn json_maps_keys_to_rendered_outcomes() {
        let out = render(&sample(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["q1.png"], "What is lift?\n\n  Upward force  ");
        assert_eq!(value["q2.png"], "ERROR: cannot identify image file");
    }
}
