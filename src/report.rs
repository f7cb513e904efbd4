//! Human-readable error reports

use crate::location::Location;

/// Format an error message under the source line it applies to
///
/// ```text
/// ERROR: At line 2, column 7:
///
/// 2 | sum = digit+ "+" digit+
///           ^^^^^
///           Rule "digit" is not defined.
/// ```
pub fn pretty_format(source: &str, location: Location, message: &str, tip: Option<&str>) -> String {
    let line = location.start.line;
    let column = location.start.column;
    let line_content = source.split('\n').nth(line - 1).unwrap_or("");
    let line_content = line_content.strip_suffix('\r').unwrap_or(line_content);

    let padding = " ".repeat(column - 1 + line.to_string().len() + 3);

    // Underline the span, limited to the reported line
    let underline_len = if location.end.line == location.start.line {
        location.end.column.saturating_sub(column).max(1)
    } else {
        line_content.chars().count().saturating_sub(column - 1).max(1)
    };

    let tip = tip.map(|tip| format!("\n{}Tip: {}", padding, tip));

    format!(
        "ERROR: At line {}, column {}:\n\n{} | {}\n{}{}{}{}",
        line,
        column,
        line,
        line_content,
        padding,
        "^".repeat(underline_len),
        message
            .lines()
            .map(|line| format!("\n{}{}", padding, line))
            .collect::<String>(),
        tip.unwrap_or_default()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::LineIndex;

    #[test]
    fn underlines_the_reported_span() {
        let source = "start = a\nsum = digit+";
        let index = LineIndex::new(source);
        let location = index.location(source, 16, 21);

        let report = pretty_format(source, location, "Rule \"digit\" is not defined.", None);

        assert_eq!(
            report,
            "ERROR: At line 2, column 7:\n\n2 | sum = digit+\n          ^^^^^\n          Rule \"digit\" is not defined."
        );
    }
}
