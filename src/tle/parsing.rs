use crate::tle::TleError;

/// Element lines out of a catalog response: the last two trimmed non-blank
/// lines, so an optional leading name line is ignored.
pub fn parse_tle_lines(text: &str) -> Result<(String, String), TleError> {
    let lines: Vec<&str> = text
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    let [.., line1, line2] = lines.as_slice() else {
        return Err(TleError::Parse(format!(
            "expected two element lines, got {}",
            lines.len()
        )));
    };

    sgp4::Elements::from_tle(None, line1.as_bytes(), line2.as_bytes())
        .map_err(|e| TleError::Parse(e.to_string()))?;

    Ok((line1.to_string(), line2.to_string()))
}
