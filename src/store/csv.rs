//! Line-oriented delimited codec for the backing collections.
//!
//! Rows are bounded by line breaks; quoted fields may carry commas, and a
//! doubled quote inside a quoted field decodes to one literal quote.
//! Malformed quoting (say, an odd number of quotes) is deliberately not an
//! error: parsing degrades to best-effort field splitting so hand-edited
//! files stay readable. Structural damage is the schema validator's job.

/// Parses delimited text into rows of fields. Blank lines are dropped.
pub fn parse_csv(text: &str) -> Vec<Vec<String>> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(parse_line)
        .collect()
}

fn parse_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                // escaped quote
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

/// Serializes one row. Only fields containing a comma, quote, or line break
/// get wrapped in quotes; interior quotes are doubled.
pub fn serialize_row<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|f| escape_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
