//! Taxonomy statistics keyed by family name.
//!
//! - [TaxonRecord]: One record of the external taxonomy dataset.
//! - [LookupTable]: Family name to record mapping, built once and read by the parser.

use crate::parser::parsing_error::ParsingError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::hash_map;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

// =#========================================================================#=
// TAXON RECORD
// =#========================================================================#=
/// One record of the taxonomy dataset: a family key with optional statistics.
///
/// In serialized form, the family is stored under the key `fam`
/// (`family` is accepted as well); missing or `null` values are `None`.
///
/// # Example
/// ```
/// use taxatree::model::TaxonRecord;
///
/// let record: TaxonRecord =
///     serde_json::from_str(r#"{"fam": "Hominidae", "estimate": 5.0}"#).unwrap();
/// assert_eq!(record.family, "Hominidae");
/// assert_eq!(record.estimate, Some(5.0));
/// assert_eq!(record.lwr_95, None);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TaxonRecord {
    /// Family name, the join key to tree node names
    #[serde(rename = "fam", alias = "family")]
    pub family: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaled_estimate: Option<f64>,
    /// Lower bound of the 95% interval
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lwr_95: Option<f64>,
    /// Upper bound of the 95% interval
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upr_95: Option<f64>,
}

impl TaxonRecord {
    /// Creates a record for `family` without any statistics.
    pub fn new<S: Into<String>>(family: S) -> Self {
        TaxonRecord {
            family: family.into(),
            ..Default::default()
        }
    }

    pub fn with_estimate(mut self, estimate: f64) -> Self {
        self.estimate = Some(estimate);
        self
    }

    pub fn with_scaled_estimate(mut self, scaled_estimate: f64) -> Self {
        self.scaled_estimate = Some(scaled_estimate);
        self
    }

    /// Sets both bounds of the 95% interval.
    pub fn with_interval(mut self, lwr_95: f64, upr_95: f64) -> Self {
        self.lwr_95 = Some(lwr_95);
        self.upr_95 = Some(upr_95);
        self
    }
}

// =#========================================================================#=
// LOOKUP TABLE
// =#========================================================================#=
/// Maps family names to their [TaxonRecord].
///
/// Built once from an ordered sequence of records and only read afterwards.
/// If several records share a family, the last one in the sequence wins.
///
/// # Example
/// ```
/// use taxatree::model::{LookupTable, TaxonRecord};
///
/// let table = LookupTable::build(vec![
///     TaxonRecord::new("Hominidae").with_estimate(1.0),
///     TaxonRecord::new("Hominidae").with_estimate(2.0),
/// ]);
///
/// assert_eq!(table.len(), 1);
/// assert_eq!(table.get("Hominidae").unwrap().estimate, Some(2.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct LookupTable {
    records: HashMap<String, TaxonRecord>,
}

impl LookupTable {
    /// Creates an empty table, e.g. to parse trees without annotation.
    pub fn new() -> Self {
        LookupTable {
            records: HashMap::new(),
        }
    }

    /// Builds the table from an ordered sequence of records.
    ///
    /// Records are inserted in order, so for duplicate families the last
    /// record seen shadows all earlier ones. Records with missing statistics
    /// are kept as they are.
    pub fn build<I: IntoIterator<Item = TaxonRecord>>(records: I) -> Self {
        let mut num_records = 0usize;
        let records = records
            .into_iter()
            .fold(HashMap::new(), |mut map, record| {
                num_records += 1;
                map.insert(record.family.clone(), record);
                map
            });

        debug!(
            "Built lookup table from {} records: {} families, {} shadowed duplicates",
            num_records,
            records.len(),
            num_records - records.len()
        );

        LookupTable { records }
    }

    /// Builds the table from a JSON array of records.
    ///
    /// # Returns
    /// * [LookupTable] - Table built with [build](Self::build) semantics
    /// * [ParsingError] - If the JSON is not an array of valid records
    pub fn from_json_str(json: &str) -> Result<Self, ParsingError> {
        let records: Vec<TaxonRecord> = serde_json::from_str(json)?;
        Ok(Self::build(records))
    }

    /// Builds the table from a reader providing a JSON array of records.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, ParsingError> {
        let records: Vec<TaxonRecord> = serde_json::from_reader(reader)?;
        Ok(Self::build(records))
    }

    /// Builds the table from a JSON file containing an array of records.
    ///
    /// # Arguments
    /// * `path` - Path to the file (accepting `&str`, `String`, `Path`, or `PathBuf`)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ParsingError> {
        let file = File::open(path)?;
        Self::from_json_reader(BufReader::new(file))
    }

    /// Returns the record stored for `family`, if any.
    pub fn get(&self, family: &str) -> Option<&TaxonRecord> {
        self.records.get(family)
    }

    /// Checks if a record for `family` exists.
    pub fn contains(&self, family: &str) -> bool {
        self.records.contains_key(family)
    }

    /// Returns the number of distinct families.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over `(family, record)` pairs in arbitrary order.
    pub fn iter(&self) -> hash_map::Iter<'_, String, TaxonRecord> {
        self.records.iter()
    }

    /// Returns all family names, sorted.
    pub fn families(&self) -> Vec<&str> {
        let mut families: Vec<&str> = self.records.keys().map(|f| f.as_str()).collect();
        families.sort_unstable();
        families
    }
}

impl FromIterator<TaxonRecord> for LookupTable {
    fn from_iter<I: IntoIterator<Item = TaxonRecord>>(iter: I) -> Self {
        Self::build(iter)
    }
}

impl<'a> IntoIterator for &'a LookupTable {
    type Item = (&'a String, &'a TaxonRecord);
    type IntoIter = hash_map::Iter<'a, String, TaxonRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for LookupTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "LookupTable ({} families):", self.len())?;
        for family in self.families() {
            let record = &self.records[family];
            writeln!(
                f,
                "  {} estimate={:?} scaled={:?} 95%=[{:?}, {:?}]",
                family, record.estimate, record.scaled_estimate, record.lwr_95, record.upr_95
            )?;
        }
        Ok(())
    }
}
