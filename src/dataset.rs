//! loading of labeled datapoints from a csv file
//!
//! every record is expected to be a list of numeric columns followed by a
//! single label column. the records are kept in file order and can be
//! grouped by label with [`Dataset::classes`].
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Error, bail};
use csv::{Reader, ReaderBuilder, StringRecord, Trim};

use crate::error;

/// a single labeled datapoint
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    data: Vec<f64>,
    label: String,
}

impl Instance {
    pub fn new(data: Vec<f64>, label: impl Into<String>) -> Self {
        Self {
            data,
            label: label.into(),
        }
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

/// the full list of instances loaded from a csv file
#[derive(Debug, Clone)]
pub struct Dataset {
    instances: Vec<Instance>,
    features: usize,
}

impl Dataset {
    /// creates a dataset, checking that every instance has the same number
    /// of features as the first one
    pub fn new(instances: Vec<Instance>) -> error::Result<Self> {
        let features = instances.first().map(|i| i.data.len()).unwrap_or(0);

        for instance in &instances {
            if instance.data.len() != features {
                return Err(error::Error::DimensionMismatch {
                    expected: features,
                    found: instance.data.len(),
                });
            }
        }

        Ok(Self {
            instances,
            features,
        })
    }

    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    /// the number of numeric columns each instance has
    pub fn features(&self) -> usize {
        self.features
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// groups the instances by label. labels are sorted and the instances
    /// for each label stay in file order.
    pub fn classes(&self) -> BTreeMap<&str, Vec<&Instance>> {
        let mut groups: BTreeMap<&str, Vec<&Instance>> = BTreeMap::new();

        for instance in &self.instances {
            groups
                .entry(instance.label.as_str())
                .or_default()
                .push(instance);
        }

        groups
    }

    /// the sorted list of unique labels
    pub fn labels(&self) -> Vec<&str> {
        self.classes().into_keys().collect()
    }
}

/// opens the csv file at the given path and loads all of its records
pub fn open_dataset(path: &Path, has_headers: bool) -> anyhow::Result<Dataset> {
    let result = OpenOptions::new().read(true).open(path);

    let file = match result {
        Ok(f) => f,
        Err(err) => match err.kind() {
            ErrorKind::NotFound => {
                bail!("the requested csv file was not found. path: {}", path.display())
            }
            _ => {
                return Err(Error::new(err)
                    .context(format!("failed to load csv file. path: {}", path.display())));
            }
        },
    };

    let reader = csv_reader(BufReader::new(file), has_headers);

    read_dataset(reader).with_context(|| format!("invalid dataset. path: {}", path.display()))
}

/// creates the csv reader used for loading datasets
pub fn csv_reader<R>(reader: R, has_headers: bool) -> Reader<R>
where
    R: Read,
{
    ReaderBuilder::new()
        .has_headers(has_headers)
        // field counts are checked when mapping so the error can name the line
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader)
}

/// collects every record from the csv reader into a [`Dataset`]
pub fn read_dataset<R>(mut reader: Reader<R>) -> anyhow::Result<Dataset>
where
    R: Read,
{
    let mut instances = Vec::new();
    let mut width = None;

    for (index, maybe) in reader.records().enumerate() {
        let record = maybe.with_context(|| format!("failed to parse csv record. row: {index}"))?;
        let line = record.position().map(|pos| pos.line()).unwrap_or(index as u64 + 1);

        let expected = *width.get_or_insert(record.len());

        instances.push(map_record(expected, line, &record)?);
    }

    if instances.is_empty() {
        bail!("the csv file contains no records");
    }

    Ok(Dataset::new(instances)?)
}

/// maps a csv record into an [`Instance`]. all but the last column are
/// parsed as numbers and the last column is the label.
fn map_record(expected: usize, line: u64, record: &StringRecord) -> anyhow::Result<Instance> {
    if record.len() < 2 {
        bail!(
            "record must have at least one numeric column and a label. line: {line} columns: {}",
            record.len()
        );
    }

    if record.len() != expected {
        bail!(
            "record has an unexpected number of columns. line: {line} expected: {expected} found: {}",
            record.len()
        );
    }

    let mut data = Vec::with_capacity(record.len() - 1);
    let mut fields = record.iter();

    let Some(label) = fields.next_back() else {
        bail!("failed to find label. line: {line}");
    };

    if label.is_empty() {
        bail!("record is missing a label. line: {line}");
    }

    for (col, value) in fields.enumerate() {
        let Ok(v) = f64::from_str(value) else {
            bail!(
                "failed to parse column data. line: {line} column index: {} value: {value:?}",
                col + 1
            );
        };

        data.push(v);
    }

    Ok(Instance::new(data, label))
}

#[cfg(test)]
mod test {
    use super::*;

    const IRIS: &str = "\
sepal_length,sepal_width,petal_length,petal_width,species
5.1,3.5,1.4,0.2,setosa
7.0,3.2,4.7,1.4,versicolor
4.9,3.0,1.4,0.2,setosa
6.3,3.3,6.0,2.5,virginica
6.4,3.2,4.5,1.5,versicolor
";

    fn load(given: &str, has_headers: bool) -> anyhow::Result<Dataset> {
        read_dataset(csv_reader(given.as_bytes(), has_headers))
    }

    #[test]
    fn loads_records_in_file_order() {
        let dataset = load(IRIS, true).unwrap();

        assert_eq!(dataset.len(), 5);
        assert_eq!(dataset.features(), 4);
        assert_eq!(dataset.instances()[0].data(), &[5.1, 3.5, 1.4, 0.2]);
        assert_eq!(dataset.instances()[0].label(), "setosa");
        assert_eq!(dataset.instances()[4].label(), "versicolor");
    }

    #[test]
    fn groups_by_sorted_label() {
        let dataset = load(IRIS, true).unwrap();
        let classes = dataset.classes();

        assert_eq!(dataset.labels(), vec!["setosa", "versicolor", "virginica"]);
        assert_eq!(classes["setosa"].len(), 2);
        assert_eq!(classes["setosa"][1].data(), &[4.9, 3.0, 1.4, 0.2]);
        assert_eq!(classes["versicolor"].len(), 2);
        assert_eq!(classes["virginica"].len(), 1);
    }

    #[test]
    fn no_header_keeps_first_line() {
        let dataset = load("1.0,2.0,a\n3.0,4.0,b\n", false).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.instances()[0].label(), "a");
    }

    #[test]
    fn trims_whitespace_and_skips_blank_lines() {
        let dataset = load("x,y,label\n 1.0 , 2.0 , a \n\n3.0,4.0,b\n", true).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.instances()[0].data(), &[1.0, 2.0]);
        assert_eq!(dataset.instances()[0].label(), "a");
    }

    #[test]
    fn non_numeric_field_fails_with_line() {
        let err = load("x,y,label\n1.0,2.0,a\n1.0,abc,b\n", true).unwrap_err();
        let msg = format!("{err:#}");

        assert!(msg.contains("failed to parse column data"), "{msg}");
        assert!(msg.contains("line: 3"), "{msg}");
        assert!(msg.contains("column index: 2"), "{msg}");
    }

    #[test]
    fn wrong_field_count_fails_with_line() {
        let err = load("x,y,label\n1.0,2.0,a\n1.0,b\n", true).unwrap_err();
        let msg = format!("{err:#}");

        assert!(msg.contains("unexpected number of columns"), "{msg}");
        assert!(msg.contains("line: 3"), "{msg}");
    }

    #[test]
    fn label_only_record_fails() {
        let err = load("label\na\n", true).unwrap_err();

        assert!(format!("{err:#}").contains("at least one numeric column"));
    }

    #[test]
    fn empty_file_fails() {
        let err = load("x,y,label\n", true).unwrap_err();

        assert!(format!("{err:#}").contains("no records"));
    }

    #[test]
    fn missing_file_fails() {
        let err = open_dataset(Path::new("does/not/exist.csv"), true).unwrap_err();

        assert!(format!("{err:#}").contains("was not found"));
    }

    #[test]
    fn dataset_rejects_mixed_dimensions() {
        let result = Dataset::new(vec![
            Instance::new(vec![1.0, 2.0], "a"),
            Instance::new(vec![1.0], "b"),
        ]);

        assert!(matches!(
            result,
            Err(error::Error::DimensionMismatch {
                expected: 2,
                found: 1
            })
        ));
    }
}
