//! Source-file record parser
//!
//! The textual format is line-oriented and byte-exact. `#` starts a
//! comment line, a blank line ends the current record, the first line of
//! a record is the match pattern, and every property line starts with a
//! single space and carries `KEY=VALUE` split at the first `=`. Anything
//! else is skipped without failing the build; keys and values are stored
//! verbatim, trailing whitespace included.

use std::fs;
use std::path::Path;

use hwdb_trie::Trie;

use crate::error::Result;

/// Read one source file and feed its records into `trie`.
///
/// Returns the number of properties inserted.
pub fn import_file(trie: &mut Trie, path: &Path) -> Result<usize> {
    let buf = fs::read(path)?;
    import_buf(trie, &buf, path)
}

/// Feed the records in `buf` into `trie`. `path` is only used for log
/// context.
pub fn import_buf(trie: &mut Trie, buf: &[u8], path: &Path) -> Result<usize> {
    let mut pattern: Option<&[u8]> = None;
    let mut inserted = 0;

    for (idx, line) in buf.split(|b| *b == b'\n').enumerate() {
        let lineno = idx + 1;

        if line.first() == Some(&b'#') {
            continue;
        }
        if line.is_empty() {
            pattern = None;
            continue;
        }

        let Some(pat) = pattern else {
            if line[0] == b' ' {
                tracing::debug!(
                    file = %path.display(),
                    line = lineno,
                    "property line outside a record, skipped"
                );
                continue;
            }
            pattern = Some(line);
            continue;
        };

        if line[0] != b' ' {
            tracing::debug!(
                file = %path.display(),
                line = lineno,
                "secondary match line, skipped"
            );
            continue;
        }

        let body = &line[1..];
        let Some(eq) = body.iter().position(|b| *b == b'=') else {
            tracing::debug!(
                file = %path.display(),
                line = lineno,
                "property line without '=', skipped"
            );
            continue;
        };

        trie.insert(pat, &body[..eq], &body[eq + 1..])?;
        inserted += 1;
    }

    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn import(input: &str) -> Trie {
        let mut trie = Trie::new();
        import_buf(&mut trie, input.as_bytes(), Path::new("test.hwdb")).unwrap();
        trie
    }

    #[test]
    fn test_single_record() {
        let trie = import("usb:v046DpC077*\n ID_VENDOR=Logitech\n ID_MODEL=Mouse\n");

        assert_eq!(
            trie.get(b"usb:v046DpC077*", b"ID_VENDOR"),
            Some(&b"Logitech"[..])
        );
        assert_eq!(
            trie.get(b"usb:v046DpC077*", b"ID_MODEL"),
            Some(&b"Mouse"[..])
        );
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let trie = import("#comment\n\npat1\n KEY=v1\n\n#c\npat2\n KEY=v2\n");

        assert_eq!(trie.get(b"pat1", b"KEY"), Some(&b"v1"[..]));
        assert_eq!(trie.get(b"pat2", b"KEY"), Some(&b"v2"[..]));
    }

    #[test]
    fn test_blank_line_ends_record() {
        // without a new pattern line, properties after a blank are skipped
        let trie = import("pat1\n KEY=v1\n\n OTHER=v2\n");

        assert_eq!(trie.get(b"pat1", b"KEY"), Some(&b"v1"[..]));
        assert_eq!(trie.get(b"pat1", b"OTHER"), None);
        assert_eq!(trie.counts().values, 1);
    }

    #[test]
    fn test_property_without_equals_skipped() {
        let trie = import("pat\n KEY=v1\n garbage\n OTHER=v2\n");

        assert_eq!(trie.get(b"pat", b"KEY"), Some(&b"v1"[..]));
        assert_eq!(trie.get(b"pat", b"OTHER"), Some(&b"v2"[..]));
        assert_eq!(trie.counts().values, 2);
    }

    #[test]
    fn test_secondary_match_line_discarded() {
        let trie = import("pat1\npat2\n KEY=v\n");

        assert_eq!(trie.get(b"pat1", b"KEY"), Some(&b"v"[..]));
        assert_eq!(trie.get(b"pat2", b"KEY"), None);
    }

    #[test]
    fn test_value_stored_verbatim() {
        let trie = import("pat\n KEY=  spaced value \n E=\n");

        assert_eq!(trie.get(b"pat", b"KEY"), Some(&b"  spaced value "[..]));
        assert_eq!(trie.get(b"pat", b"E"), Some(&b""[..]));
    }

    #[test]
    fn test_value_split_at_first_equals() {
        let trie = import("pat\n KEY=a=b=c\n");

        assert_eq!(trie.get(b"pat", b"KEY"), Some(&b"a=b=c"[..]));
    }

    #[test]
    fn test_missing_trailing_newline() {
        let trie = import("pat\n KEY=value");

        assert_eq!(trie.get(b"pat", b"KEY"), Some(&b"value"[..]));
    }

    #[test]
    fn test_duplicate_pattern_overwrites_in_file_order() {
        let trie = import("pat\n KEY=first\n\npat\n KEY=second\n");

        assert_eq!(trie.get(b"pat", b"KEY"), Some(&b"second"[..]));
        assert_eq!(trie.counts().values, 1);
    }

    #[test]
    fn test_leading_property_line_skipped() {
        let trie = import(" KEY=orphan\npat\n KEY=v\n");

        assert_eq!(trie.get(b"pat", b"KEY"), Some(&b"v"[..]));
        assert_eq!(trie.counts().values, 1);
    }
}
