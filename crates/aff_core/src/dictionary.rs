//! Dictionary reading: a word-count header followed by `stem[/flags]` lines.

use std::io::{BufRead, Lines};

use crate::error::{AffError, Result};

/// One dictionary line split into stem and flag string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry<'a> {
    pub stem: &'a str,
    /// Still encoded; `None` when absent or empty
    pub flags: Option<&'a str>,
}

impl<'a> Entry<'a> {
    /// Split on the first `/`.
    pub fn parse(line: &'a str) -> Self {
        match line.split_once('/') {
            Some((stem, flags)) if !flags.is_empty() => Entry {
                stem,
                flags: Some(flags),
            },
            Some((stem, _)) => Entry { stem, flags: None },
            None => Entry {
                stem: line,
                flags: None,
            },
        }
    }
}

pub struct DictionaryReader<R> {
    lines: Lines<R>,
    line_no: usize,
    declared: usize,
}

impl<R: BufRead> DictionaryReader<R> {
    /// Read the word-count header. A missing or non-numeric header is fatal.
    pub fn new(reader: R) -> Result<Self> {
        let mut lines = reader.lines();
        let mut line_no = 0;
        let header = loop {
            let Some(line) = lines.next() else {
                return Err(AffError::MissingWordCount);
            };
            let line = line?;
            line_no += 1;
            let trimmed = line.trim_start_matches('\u{feff}').trim();
            if !trimmed.is_empty() {
                break trimmed.to_string();
            }
        };
        let declared = header.parse::<usize>().map_err(|_| AffError::BadWordCount {
            line: line_no,
            value: header.clone(),
        })?;

        Ok(Self {
            lines,
            line_no,
            declared,
        })
    }

    /// Word count the header declares.
    pub fn declared(&self) -> usize {
        self.declared
    }

    pub fn line_no(&self) -> usize {
        self.line_no
    }

    /// Next entry line, trimmed, without any tab-separated trailing fields.
    /// Blank lines are skipped.
    pub fn next_entry(&mut self) -> Result<Option<String>> {
        for line in self.lines.by_ref() {
            let line = line?;
            self.line_no += 1;
            let entry = line.split('\t').next().unwrap_or_default().trim();
            if !entry.is_empty() {
                return Ok(Some(entry.to_string()));
            }
        }
        Ok(None)
    }

    /// Drain the remaining entries.
    pub fn entries(mut self) -> Result<Vec<String>> {
        let mut out = Vec::with_capacity(self.declared);
        while let Some(entry) = self.next_entry()? {
            out.push(entry);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_split() {
        assert_eq!(
            Entry::parse("cat/AB"),
            Entry {
                stem: "cat",
                flags: Some("AB")
            }
        );
        assert_eq!(Entry::parse("cat"), Entry { stem: "cat", flags: None });
        assert_eq!(Entry::parse("cat/"), Entry { stem: "cat", flags: None });
        assert_eq!(Entry::parse("a/b/c").flags, Some("b/c"));
    }

    #[test]
    fn test_reader_header_and_entries() {
        let text = "\u{feff}3\r\ncat/A\r\n\r\ndog\tpo:noun\n  bird  \n";
        let mut reader = DictionaryReader::new(text.as_bytes()).unwrap();
        assert_eq!(reader.declared(), 3);
        assert_eq!(reader.next_entry().unwrap().as_deref(), Some("cat/A"));
        assert_eq!(reader.next_entry().unwrap().as_deref(), Some("dog"));
        assert_eq!(reader.next_entry().unwrap().as_deref(), Some("bird"));
        assert_eq!(reader.next_entry().unwrap(), None);
        assert_eq!(reader.line_no(), 5);
    }

    #[test]
    fn test_non_numeric_header_is_fatal() {
        let err = DictionaryReader::new("cat/A\n".as_bytes()).err().unwrap();
        match err {
            AffError::BadWordCount { line, value } => {
                assert_eq!(line, 1);
                assert_eq!(value, "cat/A");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_empty_dictionary_is_fatal() {
        let err = DictionaryReader::new("\n\n".as_bytes()).err().unwrap();
        assert!(matches!(err, AffError::MissingWordCount));
    }

    #[test]
    fn test_entries_drains_reader() {
        let reader = DictionaryReader::new("2\na\nb\n".as_bytes()).unwrap();
        assert_eq!(reader.entries().unwrap(), vec!["a", "b"]);
    }
}
