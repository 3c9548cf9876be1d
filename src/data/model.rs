//! Dataset Model
//! Typed, column-major view of one measurement table.

use std::cmp::Ordering;
use std::fmt;

/// Value of the grouping column for one row, in the column's natural type.
#[derive(Debug, Clone)]
pub enum GroupKey {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl GroupKey {
    /// Build a float key. `-0.0` and `0.0` share one group.
    pub fn float(value: f64) -> Self {
        GroupKey::Float(value + 0.0)
    }

    fn rank(&self) -> u8 {
        match self {
            GroupKey::Bool(_) => 0,
            GroupKey::Int(_) => 1,
            GroupKey::Float(_) => 2,
            GroupKey::Text(_) => 3,
        }
    }
}

impl Ord for GroupKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (GroupKey::Bool(a), GroupKey::Bool(b)) => a.cmp(b),
            (GroupKey::Int(a), GroupKey::Int(b)) => a.cmp(b),
            (GroupKey::Float(a), GroupKey::Float(b)) => a.total_cmp(b),
            (GroupKey::Text(a), GroupKey::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for GroupKey {}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Bool(true) => f.write_str("True"),
            GroupKey::Bool(false) => f.write_str("False"),
            GroupKey::Int(v) => write!(f, "{v}"),
            GroupKey::Float(v) => f.write_str(&format_float(*v)),
            GroupKey::Text(s) => f.write_str(s),
        }
    }
}

/// Shortest round-trip representation, laid out like Python's `repr`:
/// plain decimal with a fractional part (`15.0`) for magnitudes in
/// `[1e-4, 1e16)`, otherwise scientific with a signed two-digit exponent
/// (`3e-05`, `2.5e+17`). NaN renders as an empty string.
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return String::new();
    }

    let magnitude = value.abs();
    if value.is_finite() && magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let sci = format!("{value:e}");
        let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
        let (sign, digits) = match exponent.strip_prefix('-') {
            Some(digits) => ('-', digits),
            None => ('+', exponent),
        };
        return format!("{mantissa}e{sign}{digits:0>2}");
    }

    let text = format!("{value}");
    if value.is_finite() && !text.contains('.') {
        format!("{text}.0")
    } else {
        text
    }
}

/// A measurement table: one key per row plus one numeric column per field.
///
/// Missing cells are `None`. A row whose key is `None` belongs to no group.
#[derive(Debug, Clone)]
pub struct Dataset {
    key_column: String,
    fields: Vec<String>,
    keys: Vec<Option<GroupKey>>,
    columns: Vec<Vec<Option<f64>>>,
}

impl Dataset {
    /// Assemble a dataset. Every column must be as long as `keys`.
    pub fn new(
        key_column: impl Into<String>,
        fields: Vec<String>,
        keys: Vec<Option<GroupKey>>,
        columns: Vec<Vec<Option<f64>>>,
    ) -> Self {
        debug_assert_eq!(fields.len(), columns.len());
        debug_assert!(columns.iter().all(|c| c.len() == keys.len()));

        Self {
            key_column: key_column.into(),
            fields,
            keys,
            columns,
        }
    }

    pub fn key_column(&self) -> &str {
        &self.key_column
    }

    /// Numeric field names, in file order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn key(&self, row: usize) -> Option<&GroupKey> {
        self.keys.get(row).and_then(Option::as_ref)
    }

    pub fn value(&self, row: usize, field: usize) -> Option<f64> {
        self.columns.get(field).and_then(|c| c.get(row).copied().flatten())
    }
}
