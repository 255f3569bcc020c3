//! Entry name grammar: `<order><space><label>`.

/// Order and label parsed from a file or directory name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryName {
    /// Position among siblings.
    pub order: u64,
    /// Display label.
    pub label: String,
}

/// Why an entry name does not match `<order><space><label>`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    /// No order prefix before the first space.
    #[error("must add the order before the name")]
    MissingOrder,
    /// The prefix is not a non-negative integer that fits in 64 bits.
    #[error("order {0:?} must be a non-negative integer")]
    InvalidOrder(String),
    /// Nothing left after the order prefix.
    #[error("label after the order is empty")]
    EmptyLabel,
}

/// Parse an entry name.
///
/// When `extension` is given (files), a trailing `.{extension}` is removed
/// from the label. Directory names keep any dots they contain.
///
/// # Examples
///
/// ```
/// use kb_storage::{EntryName, parse_entry_name};
///
/// let name = parse_entry_name("2 Getting Started.md", Some("md")).unwrap();
/// assert_eq!(name, EntryName { order: 2, label: "Getting Started".to_owned() });
/// ```
pub fn parse_entry_name(name: &str, extension: Option<&str>) -> Result<EntryName, NameError> {
    let Some((order, rest)) = name.split_once(' ') else {
        return Err(NameError::MissingOrder);
    };
    if order.is_empty() {
        return Err(NameError::MissingOrder);
    }
    // `u64::from_str` accepts a leading `+`; the grammar does not.
    if !order.bytes().all(|b| b.is_ascii_digit()) {
        return Err(NameError::InvalidOrder(order.to_owned()));
    }
    let order = order
        .parse::<u64>()
        .map_err(|_| NameError::InvalidOrder(order.to_owned()))?;

    let label = match extension {
        Some(ext) => strip_extension(rest, ext),
        None => rest,
    }
    .trim();
    if label.is_empty() {
        return Err(NameError::EmptyLabel);
    }

    Ok(EntryName {
        order,
        label: label.to_owned(),
    })
}

/// Label for a path segment, falling back to the bare name when the segment
/// does not follow the grammar.
///
/// ```
/// use kb_storage::segment_label;
///
/// assert_eq!(segment_label("2 Guides", None), "Guides");
/// assert_eq!(segment_label("index.md", Some("md")), "index");
/// ```
pub fn segment_label(segment: &str, extension: Option<&str>) -> String {
    parse_entry_name(segment, extension).map_or_else(
        |_| {
            extension
                .map_or(segment, |ext| strip_extension(segment, ext))
                .to_owned()
        },
        |name| name.label,
    )
}

/// Remove `.{ext}` from the end of `name`, if present.
pub fn strip_extension<'a>(name: &'a str, ext: &str) -> &'a str {
    name.strip_suffix(ext)
        .and_then(|s| s.strip_suffix('.'))
        .unwrap_or(name)
}

/// True when `name` ends with `.{ext}`.
pub fn has_extension(name: &str, ext: &str) -> bool {
    strip_extension(name, ext).len() < name.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_file_name() {
        let name = parse_entry_name("1 Intro.md", Some("md")).unwrap();

        assert_eq!(name.order, 1);
        assert_eq!(name.label, "Intro");
    }

    #[test]
    fn test_parse_dir_name_keeps_dots() {
        let name = parse_entry_name("3 Release v1.2", None).unwrap();

        assert_eq!(name.order, 3);
        assert_eq!(name.label, "Release v1.2");
    }

    #[test]
    fn test_parse_multi_word_label() {
        let name = parse_entry_name("10 Getting  Started Guide.md", Some("md")).unwrap();

        assert_eq!(name.order, 10);
        assert_eq!(name.label, "Getting  Started Guide");
    }

    #[test]
    fn test_parse_zero_order() {
        assert_eq!(parse_entry_name("0 First.md", Some("md")).unwrap().order, 0);
    }

    #[test]
    fn test_parse_missing_order() {
        assert_eq!(
            parse_entry_name("Notes2.md", Some("md")),
            Err(NameError::MissingOrder)
        );
        assert_eq!(
            parse_entry_name(" Notes.md", Some("md")),
            Err(NameError::MissingOrder)
        );
    }

    #[test]
    fn test_parse_invalid_order() {
        assert_eq!(
            parse_entry_name("two Notes.md", Some("md")),
            Err(NameError::InvalidOrder("two".to_owned()))
        );
        assert_eq!(
            parse_entry_name("-1 Notes.md", Some("md")),
            Err(NameError::InvalidOrder("-1".to_owned()))
        );
        assert_eq!(
            parse_entry_name("+1 Notes.md", Some("md")),
            Err(NameError::InvalidOrder("+1".to_owned()))
        );
        assert_eq!(
            parse_entry_name("99999999999999999999 Big.md", Some("md")),
            Err(NameError::InvalidOrder("99999999999999999999".to_owned()))
        );
    }

    #[test]
    fn test_parse_empty_label() {
        assert_eq!(
            parse_entry_name("4 .md", Some("md")),
            Err(NameError::EmptyLabel)
        );
        assert_eq!(parse_entry_name("4 ", None), Err(NameError::EmptyLabel));
    }

    #[test]
    fn test_segment_label() {
        assert_eq!(segment_label("2 Guides", None), "Guides");
        assert_eq!(segment_label("1 Setup.md", Some("md")), "Setup");
        assert_eq!(segment_label("index.md", Some("md")), "index");
    }

    #[test]
    fn test_has_extension() {
        assert!(has_extension("1 Intro.md", "md"));
        assert!(!has_extension("1 Intro.mdx", "md"));
        assert!(!has_extension("md", "md"));
        assert!(!has_extension("diagram.png", "md"));
    }
}
