//! Reading and writing datasets as CSV.
//!
//! The first row names the columns. The class column is nominal, with its
//! labels in the order they are first seen. Any other column is numeric if
//! every non-missing cell parses as a finite number, and nominal otherwise.
//! An empty cell or `?` is a missing value.

use std::{io, path::Path};

use knn_undersampling::core::{Attribute, Dataset, Header, Instance, Value};

/// How missing values are written.
const MISSING: &str = "?";

/// Whether a cell holds a missing value.
fn is_missing(cell: &str) -> bool {
    cell.is_empty() || cell == MISSING
}

/// Parses a numeric cell.
fn parse_number(cell: &str) -> Option<f64> {
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Reads a dataset from the CSV file at `path`.
///
/// The dataset is named after the file stem. The class is the column at
/// `class_column`, or the last column if `None`.
///
/// # Errors
///
/// - If the file cannot be read or is not valid CSV.
/// - If the class column is out of bounds or has no labels.
pub fn read_csv<P: AsRef<Path>>(path: P, class_column: Option<usize>) -> Result<Dataset, String> {
    let path = path.as_ref();
    let name = path
        .file_stem()
        .map_or_else(|| "dataset".to_string(), |s| s.to_string_lossy().to_string());
    let file = std::fs::File::open(path).map_err(|e| format!("{}: {e}", path.display()))?;
    read(&name, file, class_column)
}

/// Reads a dataset from CSV text.
///
/// # Errors
///
/// See [`read_csv`].
pub fn read<R: io::Read>(name: &str, reader: R, class_column: Option<usize>) -> Result<Dataset, String> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let names = reader
        .headers()
        .map_err(|e| e.to_string())?
        .iter()
        .map(str::to_string)
        .collect::<Vec<_>>();
    if names.is_empty() {
        return Err(format!("`{name}` has no columns"));
    }

    let class_index = class_column.unwrap_or(names.len() - 1);
    if class_index >= names.len() {
        return Err(format!(
            "class column {class_index} is out of bounds for {} columns",
            names.len()
        ));
    }

    let rows = reader
        .records()
        .map(|record| {
            record
                .map(|r| r.iter().map(str::to_string).collect::<Vec<_>>())
                .map_err(|e| e.to_string())
        })
        .collect::<Result<Vec<_>, _>>()?;

    let attributes = names
        .into_iter()
        .enumerate()
        .map(|(j, name)| {
            let cells = rows.iter().map(|row| row[j].as_str()).filter(|c| !is_missing(c));
            if j != class_index && cells.clone().all(|c| parse_number(c).is_some()) {
                Attribute::numeric(name)
            } else {
                let mut labels = Vec::<&str>::new();
                for c in cells {
                    if !labels.contains(&c) {
                        labels.push(c);
                    }
                }
                Attribute::nominal(name, labels)
            }
        })
        .collect::<Vec<_>>();

    let instances = rows
        .iter()
        .map(|row| {
            let values = row
                .iter()
                .zip(&attributes)
                .map(|(cell, attribute)| to_value(attribute, cell))
                .collect();
            Instance::new(values)
        })
        .collect();

    let header = Header::new(name, attributes, class_index).map_err(|e| e.to_string())?;
    Dataset::new(header, instances).map_err(|e| e.to_string())
}

/// Converts a cell to a value of the given attribute.
fn to_value(attribute: &Attribute, cell: &str) -> Value {
    if is_missing(cell) {
        return Value::Missing;
    }
    if attribute.is_nominal() {
        attribute.label_index(cell).map_or(Value::Missing, Value::Nominal)
    } else {
        parse_number(cell).map_or(Value::Missing, Value::Numeric)
    }
}

/// Converts a value of the given attribute to a cell.
fn to_cell(attribute: &Attribute, value: &Value) -> String {
    match value {
        Value::Numeric(v) => v.to_string(),
        Value::Nominal(i) => attribute
            .labels()
            .and_then(|labels| labels.get(*i))
            .map_or_else(|| MISSING.to_string(), Clone::clone),
        Value::Missing => MISSING.to_string(),
    }
}

/// Writes a dataset to a CSV file at `path`.
///
/// # Errors
///
/// - If the file cannot be created or written.
pub fn write_csv<P: AsRef<Path>>(path: P, data: &Dataset) -> Result<(), String> {
    let path = path.as_ref();
    let file = std::fs::File::create(path).map_err(|e| format!("{}: {e}", path.display()))?;
    write(data, file)
}

/// Writes a dataset as CSV text.
///
/// # Errors
///
/// - If the writer fails.
pub fn write<W: io::Write>(data: &Dataset, writer: W) -> Result<(), String> {
    let mut writer = csv::Writer::from_writer(writer);
    let attributes = data.header().attributes();

    writer
        .write_record(attributes.iter().map(Attribute::name))
        .map_err(|e| e.to_string())?;
    for instance in data.instances() {
        writer
            .write_record(
                attributes
                    .iter()
                    .zip(instance.values())
                    .map(|(attribute, value)| to_cell(attribute, value)),
            )
            .map_err(|e| e.to_string())?;
    }
    writer.flush().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use knn_undersampling::core::AttributeKind;

    use super::*;

    const CSV: &str = "x, colour, class\n1.5, red, yes\n?, blue, no\n3, , yes\n-2, red, ?\n";

    #[test]
    fn infers_kinds() {
        let data = read("d", CSV.as_bytes(), None).unwrap();
        let header = data.header();

        assert_eq!(header.name(), "d");
        assert_eq!(header.class_index(), 2);
        assert_eq!(header.class_labels(), ["yes", "no"]);
        assert_eq!(header.attributes()[0].kind(), &AttributeKind::Numeric);
        assert_eq!(header.attributes()[1].labels().unwrap(), ["red", "blue"]);

        assert_eq!(data.cardinality(), 4);
        assert_eq!(
            data.get(1).values(),
            [Value::Missing, Value::Nominal(1), Value::Nominal(1)]
        );
        assert_eq!(
            data.get(2).values(),
            [Value::Numeric(3.0), Value::Missing, Value::Nominal(0)]
        );
        assert_eq!(data.class_label(3), None);
    }

    #[test]
    fn class_column() {
        let data = read("d", CSV.as_bytes(), Some(1)).unwrap();
        assert_eq!(data.header().class_labels(), ["red", "blue"]);
        assert!(data.header().attributes()[2].is_nominal());

        assert!(read("d", CSV.as_bytes(), Some(3)).is_err());
    }

    #[test]
    fn numeric_class_is_nominal() {
        let data = read("d", "x,y\n0.5,1\n0.7,0\n".as_bytes(), None).unwrap();
        assert_eq!(data.header().class_labels(), ["1", "0"]);
    }

    #[test]
    fn ragged_rows() {
        assert!(read("d", "x,y\n1,a\n2\n".as_bytes(), None).is_err());
    }

    #[test]
    fn writes_what_it_reads() {
        let data = read("d", CSV.as_bytes(), None).unwrap();
        let mut out = Vec::new();
        write(&data, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "x,colour,class\n1.5,red,yes\n?,blue,no\n3,?,yes\n-2,red,?\n");

        let back = read("d", text.as_bytes(), None).unwrap();
        assert_eq!(back, data);
    }
}
