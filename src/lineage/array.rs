//! Lineage — a cell × lineage probability matrix with named, coloured columns
//!
//! The numeric grid is a plain `DMatrix<f64>`; column metadata lives in a
//! [`Registry`]. Every subset is built from one set of resolved positions, so
//! the grid and its names/colours cannot drift apart.

use super::index::{resolve, AxisIndex};
use super::registry::Registry;
use super::{LineageError, Result};
use crate::color::{ColorSpec, PaletteConfig};
use log::debug;
use nalgebra::{DMatrix, DVector};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::ops::{Index, Mul};

/// Fate probabilities of each cell (row) towards each lineage (column)
#[derive(Debug, Clone, PartialEq)]
pub struct Lineage {
    values: DMatrix<f64>,
    registry: Registry,
}

impl Lineage {
    /// Create a lineage matrix. Colours default to the categorical palette.
    pub fn new<S: Into<String>>(
        values: DMatrix<f64>,
        names: impl IntoIterator<Item = S>,
        colors: Option<Vec<ColorSpec>>,
    ) -> Result<Self> {
        Self::build(values, collect_names(names), colors, &PaletteConfig::default())
    }

    /// Create a lineage matrix with automatically assigned colours drawn
    /// according to `palette`.
    pub fn with_palette<S: Into<String>>(
        values: DMatrix<f64>,
        names: impl IntoIterator<Item = S>,
        palette: &PaletteConfig,
    ) -> Result<Self> {
        Self::build(values, collect_names(names), None, palette)
    }

    /// Create from row vectors; all rows must have the same length.
    pub fn from_rows<S: Into<String>>(
        rows: &[Vec<f64>],
        names: impl IntoIterator<Item = S>,
        colors: Option<Vec<ColorSpec>>,
    ) -> Result<Self> {
        let values = grid_from_rows(rows)?;
        Self::new(values, names, colors)
    }

    /// Create from row-major data with an explicit shape, which must be 2-D.
    pub fn from_shape_vec<S: Into<String>>(
        shape: &[usize],
        data: Vec<f64>,
        names: impl IntoIterator<Item = S>,
        colors: Option<Vec<ColorSpec>>,
    ) -> Result<Self> {
        let [n_rows, n_cols] = *shape else {
            return Err(LineageError::Dimensionality(shape.len()));
        };
        if n_rows.checked_mul(n_cols) != Some(data.len()) {
            return Err(LineageError::InvalidValue(format!(
                "{} values do not fit shape ({}, {})",
                data.len(),
                n_rows,
                n_cols
            )));
        }
        Self::new(DMatrix::from_row_slice(n_rows, n_cols, &data), names, colors)
    }

    /// Create from a JSON document `{ "values": [[..]], "names": [..], "colors": [..] }`.
    ///
    /// `colors` may be omitted. Names must be strings; colours may be strings
    /// or 3/4-element float arrays.
    pub fn from_json(doc: &Value) -> Result<Self> {
        let field = |key: &str| {
            doc.get(key)
                .ok_or_else(|| LineageError::InvalidValue(format!("missing field '{}'", key)))
        };
        let values = grid_from_json(field("values")?)?;
        let names = field("names")?
            .as_array()
            .ok_or_else(|| LineageError::InvalidValue("'names' must be an array".into()))?;
        let names = super::registry::names_from_json(names)?;
        let colors = match doc.get("colors") {
            None | Some(Value::Null) => None,
            Some(Value::Array(items)) => Some(
                items
                    .iter()
                    .map(ColorSpec::try_from)
                    .collect::<Result<Vec<_>>>()?,
            ),
            Some(other) => return Err(LineageError::InvalidColor(other.to_string())),
        };
        Self::new(values, names, colors)
    }

    fn build(
        values: DMatrix<f64>,
        names: Vec<String>,
        colors: Option<Vec<ColorSpec>>,
        palette: &PaletteConfig,
    ) -> Result<Self> {
        let registry = Registry::new(values.ncols(), names, colors, palette)?;
        debug!(
            "Created lineage matrix {}x{} with lineages {:?}",
            values.nrows(),
            values.ncols(),
            registry.names()
        );
        Ok(Self { values, registry })
    }

    pub fn values(&self) -> &DMatrix<f64> {
        &self.values
    }

    pub fn into_values(self) -> DMatrix<f64> {
        self.values
    }

    pub fn names(&self) -> &[String] {
        self.registry.names()
    }

    /// Colours as `#rrggbb`, aligned with [`names`](Self::names)
    pub fn colors(&self) -> &[String] {
        self.registry.colors()
    }

    /// `(n_rows, n_cols)`
    pub fn shape(&self) -> (usize, usize) {
        self.values.shape()
    }

    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    pub fn n_cols(&self) -> usize {
        self.values.ncols()
    }

    pub fn set_names<S: Into<String>>(&mut self, names: impl IntoIterator<Item = S>) -> Result<()> {
        self.registry.set_names(collect_names(names))
    }

    /// Like [`set_names`](Self::set_names) for loosely typed input.
    pub fn set_names_from_json(&mut self, names: &[Value]) -> Result<()> {
        self.registry.set_names_from_json(names)
    }

    pub fn set_colors<C: Into<ColorSpec>>(&mut self, colors: impl IntoIterator<Item = C>) -> Result<()> {
        let colors: Vec<ColorSpec> = colors.into_iter().map(Into::into).collect();
        self.registry.set_colors(&colors)
    }

    /// Column position of the lineage called `name`
    pub fn lookup(&self, name: &str) -> Result<usize> {
        self.registry.lookup(name)
    }

    /// Select rows and columns independently.
    ///
    /// This is an outer selection: every resolved row is paired with every
    /// resolved column, so `subset(vec![0, 1], vec![1, 2])` is a 2×2 block,
    /// not the two elements `(0, 1)` and `(1, 2)`. The result is always 2-D.
    pub fn subset(&self, rows: impl Into<AxisIndex>, cols: impl Into<AxisIndex>) -> Result<Self> {
        let rows = resolve(&rows.into(), self.n_rows(), None)?;
        let cols = resolve(&cols.into(), self.n_cols(), Some(self.names()))?;
        Ok(self.take(&rows, &cols))
    }

    /// Select with a single expression.
    ///
    /// Expressions that name a lineage (a label, or a list containing at least
    /// one label) select columns over all rows; anything else selects rows
    /// over all columns.
    pub fn get(&self, index: impl Into<AxisIndex>) -> Result<Self> {
        let index = index.into();
        if index.has_label() {
            self.subset(AxisIndex::Full, index)
        } else {
            self.subset(index, AxisIndex::Full)
        }
    }

    fn take(&self, rows: &[usize], cols: &[usize]) -> Self {
        let values = self.values.select_rows(rows).select_columns(cols);
        Self {
            values,
            registry: self.registry.select(cols),
        }
    }

    /// Apply `f` element-wise, keeping names and colours.
    pub fn map(&self, f: impl FnMut(f64) -> f64) -> Self {
        Self {
            values: self.values.map(f),
            registry: self.registry.clone(),
        }
    }

    /// Combine element-wise with another matrix of the same shape, keeping
    /// this matrix' names and colours.
    pub fn zip_map(&self, other: &DMatrix<f64>, f: impl FnMut(f64, f64) -> f64) -> Result<Self> {
        if self.values.shape() != other.shape() {
            return Err(LineageError::ShapeMismatch {
                left: self.values.shape(),
                right: other.shape(),
            });
        }
        Ok(Self {
            values: self.values.zip_map(other, f),
            registry: self.registry.clone(),
        })
    }

    /// Total probability mass per cell
    pub fn row_sums(&self) -> DVector<f64> {
        self.values.column_sum()
    }

    /// Rows rescaled to sum to one; rows summing to zero are left unchanged.
    pub fn normalized(&self) -> Self {
        let mut values = self.values.clone();
        for mut row in values.row_iter_mut() {
            let total = row.sum();
            if total > 0.0 {
                row /= total;
            }
        }
        Self {
            values,
            registry: self.registry.clone(),
        }
    }

    /// Shannon entropy (natural log) of each row
    pub fn entropy(&self) -> DVector<f64> {
        DVector::from_iterator(
            self.n_rows(),
            self.values.row_iter().map(|row| {
                -row.iter()
                    .filter(|&&p| p > 0.0)
                    .map(|&p| p * p.ln())
                    .sum::<f64>()
            }),
        )
    }

    pub fn summary(&self) -> String {
        format!(
            "Lineage | {} cells x {} lineages | names={:?} | colors={:?}",
            self.n_rows(),
            self.n_cols(),
            self.names(),
            self.colors()
        )
    }
}

impl Index<(usize, usize)> for Lineage {
    type Output = f64;

    fn index(&self, index: (usize, usize)) -> &f64 {
        &self.values[index]
    }
}

impl Mul<f64> for &Lineage {
    type Output = Lineage;

    fn mul(self, rhs: f64) -> Lineage {
        self.map(|x| x * rhs)
    }
}

/// Serialised as `{ "values": [[..]], "names": [..], "colors": [..] }`, rows first.
impl Serialize for Lineage {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let rows: Vec<Vec<f64>> = self
            .values
            .row_iter()
            .map(|row| row.iter().copied().collect())
            .collect();
        let mut state = serializer.serialize_struct("Lineage", 3)?;
        state.serialize_field("values", &rows)?;
        state.serialize_field("names", self.names())?;
        state.serialize_field("colors", self.colors())?;
        state.end()
    }
}

/// Deserialisation goes through [`Lineage::from_json`], so every construction
/// check applies.
impl<'de> Deserialize<'de> for Lineage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let doc = Value::deserialize(deserializer)?;
        Lineage::from_json(&doc).map_err(serde::de::Error::custom)
    }
}

fn collect_names<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Vec<String> {
    names.into_iter().map(Into::into).collect()
}

fn grid_from_rows(rows: &[Vec<f64>]) -> Result<DMatrix<f64>> {
    let n_cols = rows.first().map_or(0, Vec::len);
    if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != n_cols) {
        return Err(LineageError::RaggedRows {
            row,
            expected: n_cols,
            found: r.len(),
        });
    }
    Ok(DMatrix::from_fn(rows.len(), n_cols, |i, j| rows[i][j]))
}

/// Nesting depth of a JSON value, following first elements
fn json_ndim(value: &Value) -> usize {
    match value {
        Value::Array(items) => 1 + items.first().map_or(0, json_ndim),
        _ => 0,
    }
}

fn grid_from_json(value: &Value) -> Result<DMatrix<f64>> {
    let ndim = json_ndim(value);
    if ndim != 2 {
        return Err(LineageError::Dimensionality(ndim));
    }
    let rows = value
        .as_array()
        .into_iter()
        .flatten()
        .enumerate()
        .map(|(i, row)| {
            let row = row
                .as_array()
                .ok_or_else(|| LineageError::InvalidValue(format!("row {} is not an array", i)))?;
            row.iter()
                .map(|v| match v {
                    Value::Array(_) => Err(LineageError::Dimensionality(3)),
                    other => other.as_f64().ok_or_else(|| {
                        LineageError::InvalidValue(format!("non-numeric entry {} in row {}", other, i))
                    }),
                })
                .collect::<Result<Vec<f64>>>()
        })
        .collect::<Result<Vec<_>>>()?;
    grid_from_rows(&rows)
}
