//! Read-only record store
//!
//! The store is re-read on every call to [`RecordStore::load`]; nothing is
//! cached between requests.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::num::ParseIntError;
use std::path::PathBuf;
use thiserror::Error;

use crate::models::Record;

/// Failure to produce the record sequence
#[derive(Debug, Error)]
pub enum StoreError {
    /// The dataset file could not be read
    #[error("cannot read dataset {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The dataset file is not well-formed XML
    #[error("cannot parse dataset {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: quick_xml::Error,
    },

    /// A numeric field of a row does not hold an integer
    #[error("cannot parse dataset {}: row {row}: <{field}>: {source}", path.display())]
    Field {
        path: PathBuf,
        row: usize,
        field: &'static str,
        #[source]
        source: ParseIntError,
    },
}

/// Source of person records
pub trait RecordStore: Send + Sync {
    /// Load every record in store order
    fn load(&self) -> Result<Vec<Record>, StoreError>;
}

/// Row child elements that map onto [`Record`] fields
#[derive(Debug, Clone, Copy)]
enum RowField {
    Id,
    Age,
    FirstName,
    LastName,
    Gender,
    About,
}

impl RowField {
    fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"id" => Some(Self::Id),
            b"age" => Some(Self::Age),
            b"first_name" => Some(Self::FirstName),
            b"last_name" => Some(Self::LastName),
            b"gender" => Some(Self::Gender),
            b"about" => Some(Self::About),
            _ => None,
        }
    }

    fn tag(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Age => "age",
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Gender => "gender",
            Self::About => "about",
        }
    }
}

/// Integer field value; surrounding whitespace is ignored and empty means zero
fn parse_int(text: &str) -> Result<i64, ParseIntError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(0);
    }
    text.parse()
}

/// Store backed by an XML file on disk
///
/// Reads `<root><row>...</row>...</root>`. Only direct children of a row
/// named after a [`Record`] field are used; every other element is skipped.
/// Text values are kept exactly as written, whitespace included. A missing
/// field leaves the empty string or zero.
#[derive(Debug, Clone)]
pub struct XmlFileStore {
    path: PathBuf,
}

impl XmlFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn parse(&self, input: &str) -> Result<Vec<Record>, StoreError> {
        let xml_error = |source: quick_xml::Error| StoreError::Parse {
            path: self.path.clone(),
            source,
        };

        let mut reader = Reader::from_str(input);
        let mut records = Vec::new();
        let mut row: Option<Record> = None;
        // Element depth below the current <row>
        let mut depth = 0usize;
        let mut field: Option<RowField> = None;
        let mut text = String::new();

        loop {
            match reader.read_event().map_err(xml_error)? {
                Event::Start(e) => {
                    if row.is_some() {
                        depth += 1;
                        if depth == 1 {
                            field = RowField::from_tag(e.name().as_ref());
                            text.clear();
                        }
                    } else if e.name().as_ref() == b"row" {
                        row = Some(Record::default());
                        depth = 0;
                    }
                }
                Event::Empty(e) => {
                    if let (Some(record), 0) = (row.as_mut(), depth) {
                        if let Some(empty) = RowField::from_tag(e.name().as_ref()) {
                            self.assign(record, records.len(), empty, "")?;
                        }
                    }
                }
                Event::Text(t) if depth == 1 && field.is_some() => {
                    text.push_str(&t.unescape().map_err(xml_error)?);
                }
                Event::CData(c) if depth == 1 && field.is_some() => {
                    text.push_str(&String::from_utf8_lossy(&c));
                }
                Event::End(_) => match depth {
                    0 => {
                        if let Some(record) = row.take() {
                            records.push(record);
                        }
                    }
                    _ => {
                        if depth == 1 {
                            if let (Some(record), Some(done)) = (row.as_mut(), field.take()) {
                                self.assign(record, records.len(), done, &text)?;
                            }
                        }
                        depth -= 1;
                    }
                },
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(records)
    }

    fn assign(
        &self,
        record: &mut Record,
        row: usize,
        field: RowField,
        text: &str,
    ) -> Result<(), StoreError> {
        let int = |text: &str| {
            parse_int(text).map_err(|source| StoreError::Field {
                path: self.path.clone(),
                row,
                field: field.tag(),
                source,
            })
        };

        match field {
            RowField::Id => record.id = int(text)?,
            RowField::Age => record.age = int(text)?,
            RowField::FirstName => record.first_name = text.to_string(),
            RowField::LastName => record.last_name = text.to_string(),
            RowField::Gender => record.gender = text.to_string(),
            RowField::About => record.about = text.to_string(),
        }
        Ok(())
    }
}

impl RecordStore for XmlFileStore {
    fn load(&self) -> Result<Vec<Record>, StoreError> {
        let input = std::fs::read_to_string(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;

        let records = self.parse(&input)?;

        tracing::debug!(path = %self.path.display(), rows = records.len(), "Dataset loaded");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_dataset(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn load(contents: &str) -> Result<Vec<Record>, StoreError> {
        let file = write_dataset(contents);
        XmlFileStore::new(file.path()).load()
    }

    #[test]
    fn test_load_rows_in_order_ignoring_extra_elements() {
        let records = load(
            r#"<?xml version="1.0" encoding="UTF-8" ?>
<root>
  <row>
    <id>0</id>
    <guid>1a6fa827-62f1-45f6-b579-aaead2b47169</guid>
    <isActive>false</isActive>
    <age>22</age>
    <first_name>Boyd</first_name>
    <last_name>Wolf</last_name>
    <gender>male</gender>
    <about>Nulla cillum enim voluptate.</about>
  </row>
  <row>
    <id>1</id>
    <age>21</age>
    <first_name>Hilda</first_name>
    <last_name>Mayer</last_name>
    <gender>female</gender>
    <about>Sit commodo consectetur minim.</about>
  </row>
</root>"#,
        )
        .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, 0);
        assert_eq!(records[0].full_name(), "Boyd Wolf");
        assert_eq!(records[1].id, 1);
        assert_eq!(records[1].gender, "female");
        assert_eq!(records[1].about, "Sit commodo consectetur minim.");
    }

    #[test]
    fn test_text_keeps_surrounding_whitespace() {
        let records = load(
            "<root><row><id> 7 </id><first_name> Boyd</first_name>\
             <about>Nulla cillum.\n</about></row></root>",
        )
        .unwrap();

        assert_eq!(records[0].id, 7);
        assert_eq!(records[0].first_name, " Boyd");
        assert_eq!(records[0].about, "Nulla cillum.\n");
    }

    #[test]
    fn test_entities_are_unescaped() {
        let records = load("<root><row><about>Tom &amp; Jerry &lt;3</about></row></root>").unwrap();
        assert_eq!(records[0].about, "Tom & Jerry <3");
    }

    #[test]
    fn test_nested_elements_do_not_leak_into_fields() {
        let records = load(
            "<root><row><id>3</id><friends><friend><id>9</id><about>nested</about></friend>\
             </friends><about>top</about></row></root>",
        )
        .unwrap();

        assert_eq!(records[0].id, 3);
        assert_eq!(records[0].about, "top");
    }

    #[test]
    fn test_missing_fields_default() {
        let records = load("<root><row><first_name>Boyd</first_name><age/></row></root>").unwrap();
        assert_eq!(records[0].id, 0);
        assert_eq!(records[0].age, 0);
        assert_eq!(records[0].about, "");
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let store = XmlFileStore::new("/nonexistent/dataset.xml");
        let err = store.load().unwrap_err();
        assert!(matches!(err, StoreError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/dataset.xml"));
    }

    #[test]
    fn test_non_integer_id_is_field_error() {
        let err = load("<root><row><id>0</id></row><row><id>zero</id><age>1</age></row></root>")
            .unwrap_err();
        assert!(
            matches!(err, StoreError::Field { row: 1, field: "id", .. }),
            "{err}"
        );
    }

    #[test]
    fn test_mismatched_tags_are_parse_error() {
        let err = load("<root><row><id>0</age></row></root>").unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }), "{err}");
    }

    #[test]
    fn test_bundled_dataset_has_35_sequential_ids() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("dataset.xml");
        let records = XmlFileStore::new(path).load().unwrap();
        let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, (0..35).collect::<Vec<_>>());
        assert!(records.iter().all(|r| r.about.ends_with('\n')));
    }
}
