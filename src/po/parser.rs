//! Line-oriented parser for the gettext `.po` text format.
//!
//! Each line of the stream is classified by fixed-prefix token into a
//! [`Line`] variant, then folded into [`PoEntry`] values. State carries
//! strictly line to line: literal continuations append to whichever field
//! the preceding token line started.

use std::collections::HashMap;
use std::collections::hash_map::Entry as MapEntry;
use std::fs::File;
use std::io::{BufRead, Cursor, Read};
use std::path::Path;

use crate::error::Error;
use crate::po::entry::PoEntry;

/// One classified PO line.
///
/// Classification tries prefixes in this order: `msgid_plural `, `msgid `,
/// `msgstr `, `msgstr[`, `msgctxt `, `#,`, `#|`, `#:`, `#~`, `#`, a quoted
/// literal continuation, a blank line. Anything else is a format error.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    PluralOriginal(String),
    Original(String),
    Translation(String),
    PluralTranslation { index: usize, value: String },
    Context(String),
    Flags(Vec<String>),
    Untranslated(String),
    References(Vec<String>),
    Obsolete,
    Comment(String),
    Literal(String),
    Blank,
}

/// Which field the most recent token line started, for literal continuations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Original,
    PluralOriginal,
    Translation,
    PluralTranslation(usize),
}

fn classify(line: &str, line_number: usize) -> Result<Line, Error> {
    if let Some(rest) = line.strip_prefix("msgid_plural ") {
        return Ok(Line::PluralOriginal(parse_quoted(rest, line_number)?));
    }
    if let Some(rest) = line.strip_prefix("msgid ") {
        return Ok(Line::Original(parse_quoted(rest, line_number)?));
    }
    if let Some(rest) = line.strip_prefix("msgstr ") {
        return Ok(Line::Translation(parse_quoted(rest, line_number)?));
    }
    if let Some(rest) = line.strip_prefix("msgstr[") {
        return parse_plural_translation(rest, line_number);
    }
    if let Some(rest) = line.strip_prefix("msgctxt ") {
        return Ok(Line::Context(parse_quoted(rest, line_number)?));
    }
    if let Some(rest) = line.strip_prefix("#,") {
        let flags = rest
            .split(',')
            .map(str::trim)
            .filter(|flag| !flag.is_empty())
            .map(str::to_string)
            .collect();
        return Ok(Line::Flags(flags));
    }
    if let Some(rest) = line.strip_prefix("#|") {
        return Ok(Line::Untranslated(rest.trim().to_string()));
    }
    if let Some(rest) = line.strip_prefix("#:") {
        let references = rest.split_whitespace().map(str::to_string).collect();
        return Ok(Line::References(references));
    }
    if line.starts_with("#~") {
        return Ok(Line::Obsolete);
    }
    if let Some(rest) = line.strip_prefix('#') {
        return Ok(Line::Comment(rest.trim().to_string()));
    }
    if line.starts_with('"') || line.starts_with('\'') {
        return Ok(Line::Literal(parse_quoted(line, line_number)?));
    }
    if line.is_empty() {
        return Ok(Line::Blank);
    }

    Err(Error::po_format(line_number, "unrecognized line"))
}

/// Scans a quoted value: the first unescaped occurrence of the opening quote
/// character closes it, and nothing may follow the closing quote.
fn parse_quoted(value: &str, line_number: usize) -> Result<String, Error> {
    let value = value.trim();
    let mut chars = value.chars();
    let quote = match chars.next() {
        Some(c @ ('"' | '\'')) => c,
        _ => return Err(Error::po_format(line_number, "expected a quoted literal")),
    };

    let mut unquoted = String::with_capacity(value.len());
    let mut escaped = false;
    let mut closed = false;
    for c in chars.by_ref() {
        if escaped {
            unquoted.push(match c {
                'n' => '\n',
                'r' => '\r',
                't' => '\t',
                other => other,
            });
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            closed = true;
            break;
        } else {
            unquoted.push(c);
        }
    }

    if !closed {
        return Err(Error::po_format(line_number, "unterminated quoted literal"));
    }
    if chars.next().is_some() {
        return Err(Error::po_format(
            line_number,
            "unexpected characters after the closing quote",
        ));
    }

    Ok(unquoted)
}

/// Parses the tail of a `msgstr[N] "..."` line; `rest` starts after the `[`.
fn parse_plural_translation(rest: &str, line_number: usize) -> Result<Line, Error> {
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Err(Error::po_format(
            line_number,
            "expected a plural index after `msgstr[`",
        ));
    }

    let Some(value) = rest[digits.len()..].strip_prefix("] ") else {
        return Err(Error::po_format(
            line_number,
            "expected `] ` after the plural index",
        ));
    };

    let index: usize = digits
        .parse()
        .map_err(|_| Error::po_format(line_number, "plural index out of range"))?;

    Ok(Line::PluralTranslation {
        index,
        value: parse_quoted(value, line_number)?,
    })
}

/// A new `msgid` or any comment-class line terminates an in-progress entry.
fn starts_new_entry(line: &Line) -> bool {
    matches!(
        line,
        Line::Original(_)
            | Line::Flags(_)
            | Line::Untranslated(_)
            | Line::References(_)
            | Line::Obsolete
            | Line::Comment(_)
    )
}

fn finalize(
    entries: &mut HashMap<String, PoEntry>,
    entry: PoEntry,
    line_number: usize,
) -> Result<(), Error> {
    let Some(key) = entry.original.clone() else {
        return Ok(());
    };

    match entries.entry(key) {
        MapEntry::Occupied(occupied) => Err(Error::DuplicateKey {
            key: occupied.key().clone(),
            line: line_number,
        }),
        MapEntry::Vacant(vacant) => {
            vacant.insert(entry);
            Ok(())
        }
    }
}

/// Parses PO text from any buffered reader into a catalog map keyed by the
/// untranslated `msgid`.
///
/// Fails with [`Error::PoFormat`] on malformed input and
/// [`Error::DuplicateKey`] when one stream defines the same `msgid` twice.
pub fn parse_reader<R: BufRead>(reader: R) -> Result<HashMap<String, PoEntry>, Error> {
    let mut entries = HashMap::new();
    let mut entry = PoEntry::default();
    let mut last_field: Option<Field> = None;
    let mut line_number = 0;

    for line in reader.lines() {
        let line = line?;
        line_number += 1;

        let parsed = classify(line.trim(), line_number)?;

        if entry.original.is_some() && starts_new_entry(&parsed) {
            finalize(&mut entries, std::mem::take(&mut entry), line_number)?;
            last_field = None;
        }

        match parsed {
            Line::Original(value) => {
                entry.original = Some(value);
                last_field = Some(Field::Original);
            }
            Line::PluralOriginal(value) => {
                entry.original_plural = Some(value);
                last_field = Some(Field::PluralOriginal);
            }
            Line::Translation(value) => {
                if entry.original.is_none() {
                    return Err(Error::po_format(
                        line_number,
                        "`msgid` must come before `msgstr`",
                    ));
                }
                if entry.translation.is_some() {
                    return Err(Error::po_format(
                        line_number,
                        "duplicate `msgstr` for one entry",
                    ));
                }
                entry.translation = Some(value);
                last_field = Some(Field::Translation);
            }
            Line::PluralTranslation { index, value } => {
                if entry.original.is_none() {
                    return Err(Error::po_format(
                        line_number,
                        "`msgid` must come before `msgstr[`",
                    ));
                }
                if entry.translation_plurals.insert(index, value).is_some() {
                    return Err(Error::po_format(
                        line_number,
                        format!("duplicate plural translation for index {index}"),
                    ));
                }
                last_field = Some(Field::PluralTranslation(index));
            }
            Line::Context(value) => {
                entry.contexts.push(value);
                last_field = None;
            }
            Line::Flags(flags) => {
                entry.flags.extend(flags);
                last_field = None;
            }
            Line::Untranslated(value) => {
                entry.untranslated = Some(value);
                last_field = None;
            }
            Line::References(references) => {
                entry.references.extend(references);
                last_field = None;
            }
            Line::Obsolete => {
                last_field = None;
            }
            Line::Comment(value) => {
                entry.comment = Some(value);
                last_field = None;
            }
            Line::Literal(value) => match last_field {
                Some(Field::Original) => {
                    if let Some(original) = entry.original.as_mut() {
                        original.push_str(&value);
                    }
                }
                Some(Field::PluralOriginal) => {
                    if let Some(plural) = entry.original_plural.as_mut() {
                        plural.push_str(&value);
                    }
                }
                Some(Field::Translation) => {
                    if let Some(translation) = entry.translation.as_mut() {
                        translation.push_str(&value);
                    }
                }
                Some(Field::PluralTranslation(index)) => {
                    if let Some(plural) = entry.translation_plurals.get_mut(&index) {
                        plural.push_str(&value);
                    }
                }
                None => {
                    return Err(Error::po_format(
                        line_number,
                        "continuation line without a preceding `msgid` or `msgstr`",
                    ));
                }
            },
            Line::Blank => {}
        }
    }

    if entry.original.is_some() {
        finalize(&mut entries, entry, line_number)?;
    }

    Ok(entries)
}

/// Parses PO text from a string.
pub fn parse_str(text: &str) -> Result<HashMap<String, PoEntry>, Error> {
    parse_reader(Cursor::new(text))
}

/// Parses a PO file from disk with BOM-aware decoding (UTF-8 assumed when no
/// BOM is present).
pub fn read_from<P: AsRef<Path>>(path: P) -> Result<HashMap<String, PoEntry>, Error> {
    let file = File::open(path).map_err(Error::Io)?;
    let mut decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
        .encoding(Some(encoding_rs::UTF_8))
        .bom_override(true)
        .build(file);

    let mut decoded = String::new();
    decoder.read_to_string(&mut decoded).map_err(Error::Io)?;

    parse_str(&decoded)
}
