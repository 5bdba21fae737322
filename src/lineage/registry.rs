//! Registry — ordered, validated column metadata
//!
//! Holds one name and one colour per lineage column. Every replacement is
//! validated in full before anything is written, so a rejected update leaves
//! the previous metadata in place.

use super::{LineageError, Result};
use crate::color::{categorical_colors_with, ColorSpec, PaletteConfig};
use log::debug;
use serde_json::Value;
use std::collections::HashSet;

/// Names and colours for the columns of a lineage matrix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    n_cols: usize,
    names: Vec<String>,
    /// Canonical `#rrggbb`
    colors: Vec<String>,
}

impl Registry {
    /// Build a registry for `n_cols` columns.
    ///
    /// Checks run in order: names length, colours length, name uniqueness,
    /// colour validity. Missing colours are drawn from the default palette.
    pub fn new(
        n_cols: usize,
        names: Vec<String>,
        colors: Option<Vec<ColorSpec>>,
        palette: &PaletteConfig,
    ) -> Result<Self> {
        check_len("names", n_cols, names.len())?;
        if let Some(colors) = &colors {
            check_len("colors", n_cols, colors.len())?;
        }
        check_unique(&names)?;

        let colors = match colors {
            Some(colors) => normalize_colors(&colors)?,
            None => {
                debug!("No colors supplied, assigning {} default colors", n_cols);
                categorical_colors_with(n_cols, palette)
            }
        };
        Ok(Self { n_cols, names, colors })
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    /// Replace all names at once.
    pub fn set_names(&mut self, names: Vec<String>) -> Result<()> {
        check_len("names", self.n_cols, names.len())?;
        check_unique(&names)?;
        debug!("Renaming lineages {:?} -> {:?}", self.names, names);
        self.names = names;
        Ok(())
    }

    /// Replace all names from loosely typed values; non-strings are a type error.
    pub fn set_names_from_json(&mut self, names: &[Value]) -> Result<()> {
        let names = names_from_json(names)?;
        self.set_names(names)
    }

    /// Replace all colours at once, storing them normalised.
    pub fn set_colors(&mut self, colors: &[ColorSpec]) -> Result<()> {
        check_len("colors", self.n_cols, colors.len())?;
        let colors = normalize_colors(colors)?;
        debug!("Recoloring lineages {:?}", self.names);
        self.colors = colors;
        Ok(())
    }

    /// Column position of `name`
    pub fn lookup(&self, name: &str) -> Result<usize> {
        self.names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| LineageError::NameNotFound(name.to_string()))
    }

    /// Metadata for the given column positions, in that order.
    ///
    /// Positions must already be in range. Repeated positions are allowed, so
    /// the result may contain the same name more than once.
    pub(crate) fn select(&self, positions: &[usize]) -> Self {
        Self {
            n_cols: positions.len(),
            names: positions.iter().map(|&i| self.names[i].clone()).collect(),
            colors: positions.iter().map(|&i| self.colors[i].clone()).collect(),
        }
    }
}

/// Names from loosely typed values, rejecting anything that is not a string
pub(crate) fn names_from_json(values: &[Value]) -> Result<Vec<String>> {
    values
        .iter()
        .enumerate()
        .map(|(position, v)| match v {
            Value::String(s) => Ok(s.clone()),
            other => Err(LineageError::NameType {
                position,
                found: other.to_string(),
            }),
        })
        .collect()
}

fn check_len(what: &'static str, expected: usize, found: usize) -> Result<()> {
    if expected != found {
        return Err(LineageError::LengthMismatch { what, expected, found });
    }
    Ok(())
}

fn check_unique(names: &[String]) -> Result<()> {
    let mut seen = HashSet::with_capacity(names.len());
    match names.iter().find(|n| !seen.insert(n.as_str())) {
        Some(dup) => Err(LineageError::DuplicateName(dup.clone())),
        None => Ok(()),
    }
}

fn normalize_colors(colors: &[ColorSpec]) -> Result<Vec<String>> {
    colors.iter().map(ColorSpec::to_hex).collect()
}
