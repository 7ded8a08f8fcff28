use crate::types::Headers;

/// Parse the `Key: Value` lines stored in a header entry's `msgstr`.
///
/// Each line is split on its first colon; lines without a colon or with an
/// empty key are ignored.
///
/// # Example
///
/// ```
/// use pocat::parser::parse_headers;
///
/// let headers = parse_headers("Language: zh_CN\nPlural-Forms: nplurals=1; plural=0;\n");
/// assert_eq!(headers.get("language"), Some("zh_CN"));
/// assert_eq!(headers.get("Plural-Forms"), Some("nplurals=1; plural=0;"));
/// ```
pub fn parse_headers(raw: &str) -> Headers {
    raw.lines()
        .filter_map(|line| {
            let (key, value) = line.split_once(':')?;
            let key = key.trim();
            (!key.is_empty()).then(|| (key, value.trim()))
        })
        .collect()
}
