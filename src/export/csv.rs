//! CSV encoding.
//!
//! A field is quoted, with inner quotes doubled, only when it contains a comma, a double
//! quote or a newline. Lines are joined with `\n` and there is no trailing newline.
//! `csv::Writer` is not used here: its `QuoteStyle::Necessary` also quotes `\r` and a lone
//! empty field, and it terminates every record.

use std::borrow::Cow;

/// Escape one field.
pub fn encode_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

fn encode_line<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|f| encode_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Encode a header line followed by the body rows.
pub fn encode<H, R>(headers: &[H], rows: &[R]) -> String
where
    H: AsRef<str>,
    R: AsRef<[String]>,
{
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(encode_line(headers));
    lines.extend(rows.iter().map(|row| encode_line(row.as_ref())));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Vec<Vec<String>> {
        let mut reader = ::csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(text.as_bytes());
        reader
            .records()
            .map(|record| record.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn test_minimal_quoting() {
        assert_eq!(encode_field("Service"), "Service");
        assert_eq!(encode_field("12.50"), "12.50");
        assert_eq!(encode_field(""), "");
        assert_eq!(encode_field("it's fine; really"), "it's fine; really");
        assert!(matches!(encode_field("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_quotes_special_fields() {
        assert_eq!(encode_field("Camp, Retreat"), "\"Camp, Retreat\"");
        assert_eq!(encode_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(encode_field("line one\nline two"), "\"line one\nline two\"");
    }

    #[test]
    fn test_encode_layout() {
        let rows = vec![
            vec!["Service".to_string(), "income".to_string(), "50".to_string()],
            vec!["Camp, Retreat".to_string(), "expense".to_string(), "12.50".to_string()],
        ];
        let text = encode(&["title", "type", "amount"], &rows);
        assert_eq!(
            text,
            "title,type,amount\nService,income,50\n\"Camp, Retreat\",expense,12.50"
        );
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn test_carriage_return_and_lone_empty_field_stay_bare() {
        assert_eq!(encode_field("a\rb"), "a\rb");

        let rows = vec![vec![String::new()]];
        assert_eq!(encode(&[""], &rows), "\n");
        assert_eq!(encode(&["notes"], &[vec!["a\rb".to_string()]]), "notes\na\rb");
    }

    #[test]
    fn test_header_only() {
        let rows: Vec<Vec<String>> = Vec::new();
        assert_eq!(encode(&["a", "b"], &rows), "a,b");
    }

    #[test]
    fn test_round_trip_through_csv_parser() {
        let headers = vec!["title".to_string(), "notes".to_string(), "amount".to_string()];
        let rows = vec![
            vec![
                "Youth \"Lock-in\"".to_string(),
                "Bring: sleeping bag, pillow".to_string(),
                "30".to_string(),
            ],
            vec![
                "Carols".to_string(),
                "Meet at 6\nLeave at 7".to_string(),
                "0".to_string(),
            ],
            vec!["Plain".to_string(), "nothing special".to_string(), "1.5".to_string()],
        ];

        let text = encode(&headers, &rows);
        let parsed = parse(&text);

        let mut expected = vec![headers];
        expected.extend(rows);
        assert_eq!(parsed, expected);
    }
}
