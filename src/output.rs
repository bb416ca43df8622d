// Output helpers shared by both binaries: JSON goes to stdout pretty
// printed, section banners frame the workflow steps.

use std::io::Write;

use serde::Serialize;

use crate::error::Result;

const BANNER_WIDTH: usize = 80;

/// Format JSON data for display.
pub fn format_json_output<T: Serialize + ?Sized>(data: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

pub fn print_json<T: Serialize + ?Sized>(out: &mut dyn Write, data: &T) -> Result<()> {
    writeln!(out, "{}", format_json_output(data)?)?;
    Ok(())
}

/// Print a formatted section title.
pub fn print_section(out: &mut dyn Write, title: &str) -> Result<()> {
    let rule = "=".repeat(BANNER_WIDTH);
    writeln!(out)?;
    writeln!(out, "{rule}")?;
    writeln!(out, "  {title}")?;
    writeln!(out, "{rule}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_is_indented() {
        let text = format_json_output(&json!({"data": {"id": 1}})).unwrap();
        assert_eq!(text, "{\n  \"data\": {\n    \"id\": 1\n  }\n}");
    }

    #[test]
    fn section_is_framed_by_rules() {
        let mut out = Vec::new();
        print_section(&mut out, "STEP 1").unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "");
        assert_eq!(lines[1].len(), BANNER_WIDTH);
        assert_eq!(lines[2], "  STEP 1");
        assert_eq!(lines[1], lines[3]);
    }
}
