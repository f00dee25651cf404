//! Import of translator deliverables.
//!
//! A deliverable is the worksheet coming back with the `Translation` column
//! filled in, either exported as an HTML table or saved as TSV. Each row is
//! turned into entries for two locales: the template locale (the English
//! text) and the deliverable's own locale (the translation).

use std::{collections::BTreeMap, path::Path};

use lazy_static::lazy_static;
use regex::Regex;
use scraper::{Html, Selector};

use crate::{
    error::Error,
    formats::FileFormat,
    placeholder::mobile_to_ios,
    types::{FileIdentifier, NO_TRANSLATION, StringEntry},
    worksheet::{COMMENT_HEADER, ENGLISH_HEADER, TRANSLATION_HEADER},
};

/// Entries to merge into each output file.
pub type Deliverable = BTreeMap<FileIdentifier, Vec<StringEntry>>;

/// Header of the comment column in translator exports.
pub const COMMENTS_HEADER: &str = "Comments";

lazy_static! {
    static ref BR_REGEX: Regex = Regex::new(r"(?i)<br\s*/?>").unwrap();
}

struct Columns {
    english: usize,
    translation: usize,
    comment: usize,
    keys: Vec<(usize, FileFormat)>,
}

impl Columns {
    fn from_header(header: &[String]) -> Result<Self, Error> {
        let find = |names: &[&str]| {
            header
                .iter()
                .position(|cell| names.contains(&cell.trim()))
        };
        let (Some(english), Some(translation), Some(comment)) = (
            find(&[ENGLISH_HEADER]),
            find(&[TRANSLATION_HEADER]),
            find(&[COMMENTS_HEADER, COMMENT_HEADER]),
        ) else {
            return Err(Error::structure(format!(
                "header row is missing English, Translation or Comments: {header:?}"
            )));
        };

        if english % 2 != 0 {
            return Err(Error::structure(format!(
                "path and name columns must come in pairs before English: {header:?}"
            )));
        }
        let keys = (0..english)
            .step_by(2)
            .map(|idx| {
                FileFormat::from_header_cell(&header[idx])
                    .map(|format| (idx, format))
                    .ok_or_else(|| {
                        Error::structure(format!(
                            "unrecognized column `{}` in header {header:?}",
                            header[idx]
                        ))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            english,
            translation,
            comment,
            keys,
        })
    }

    fn min_len(&self) -> usize {
        self.english.max(self.translation).max(self.comment) + 1
    }
}

/// Turns tabulated deliverable rows (header first) into per-file entries.
pub fn parse_rows(
    rows: &[Vec<String>],
    locale: &str,
    template_locale: &str,
) -> Result<Deliverable, Error> {
    let Some((header, data)) = rows.split_first() else {
        return Err(Error::structure("document has no header row"));
    };
    let columns = Columns::from_header(header)?;

    let mut out = Deliverable::new();
    for (row_idx, row) in data.iter().enumerate() {
        if row.len() < columns.min_len() {
            return Err(Error::structure(format!(
                "row {} has {} of {} expected cells: {row:?}",
                row_idx + 1,
                row.len(),
                columns.min_len()
            )));
        }

        let english = row[columns.english].as_str();
        if english.is_empty() {
            continue;
        }
        let translation = row[columns.translation].as_str();
        let comment = row[columns.comment].as_str();

        for &(idx, format) in &columns.keys {
            let path = row[idx].as_str();
            let mut name = row[idx + 1].clone();
            if name.is_empty() && format == FileFormat::Ios {
                name = mobile_to_ios(english);
            }
            if path.is_empty() || name.is_empty() {
                continue;
            }

            for (target, text) in [(template_locale, english), (locale, translation)] {
                let mut value = if text.is_empty() {
                    NO_TRANSLATION.to_string()
                } else {
                    text.to_string()
                };
                if format == FileFormat::Ios {
                    value = mobile_to_ios(&value);
                }
                let mut entry = StringEntry::new(name.clone(), value);
                if !comment.is_empty() {
                    entry.comment = Some(comment.to_string());
                }
                out.entry(FileIdentifier::new(path, format, target))
                    .or_default()
                    .push(entry);
            }
        }
    }

    tracing::debug!(
        locale,
        files = out.len(),
        rows = data.len(),
        "parsed deliverable"
    );
    Ok(out)
}

/// Extracts the rows of the first table in an HTML document.
///
/// `<br>` inside a cell becomes the two-character escape `\n`.
pub fn html_rows(document: &str) -> Vec<Vec<String>> {
    let table = match (document.find("<table"), document.find("</table>")) {
        (Some(start), Some(end)) if start < end => &document[start..end + "</table>".len()],
        _ => document,
    };
    let table = BR_REGEX.replace_all(table, "\\n");
    let html = Html::parse_fragment(&table);

    let (Ok(tr_sel), Ok(cell_sel)) = (Selector::parse("tr"), Selector::parse("td, th")) else {
        return Vec::new();
    };
    html.select(&tr_sel)
        .map(|tr| {
            tr.select(&cell_sel)
                .map(|cell| cell.text().collect::<String>().trim().to_string())
                .collect()
        })
        .collect()
}

/// Parses an HTML table deliverable for `locale`.
pub fn parse_html(document: &str, locale: &str, template_locale: &str) -> Result<Deliverable, Error> {
    parse_rows(&html_rows(document), locale, template_locale)
}

/// Reads the rows of a tab-separated worksheet.
pub fn tsv_rows(text: &str) -> Result<Vec<Vec<String>>, Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(b'\t')
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

/// Parses a filled-in TSV worksheet for `locale`.
pub fn parse_tsv(text: &str, locale: &str, template_locale: &str) -> Result<Deliverable, Error> {
    parse_rows(&tsv_rows(text)?, locale, template_locale)
}

/// The locale a deliverable file is for: its file stem (`es.html` → `es`).
pub fn locale_from_path<P: AsRef<Path>>(path: P) -> Result<String, Error> {
    let path = path.as_ref();
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            Error::InvalidResource(format!(
                "cannot infer a locale from {}",
                path.display()
            ))
        })
}

/// Reads a deliverable file, as TSV when its extension is `tsv` and as
/// HTML otherwise. `locale` overrides the locale taken from the file name.
pub fn read_deliverable<P: AsRef<Path>>(
    path: P,
    locale: Option<&str>,
    template_locale: &str,
) -> Result<(String, Deliverable), Error> {
    let path = path.as_ref();
    let locale = match locale {
        Some(locale) => locale.to_string(),
        None => locale_from_path(path)?,
    };
    let in_file = |e: Error| e.in_file(path.display().to_string());

    let text = std::fs::read_to_string(path).map_err(|e| in_file(Error::Io(e)))?;
    let is_tsv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("tsv"));
    let deliverable = if is_tsv {
        parse_tsv(&text, &locale, template_locale)
    } else {
        parse_html(&text, &locale, template_locale)
    }
    .map_err(in_file)?;
    Ok((locale, deliverable))
}
