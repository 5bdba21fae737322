//! Per-axis index expressions and their resolution to positions
//!
//! An [`AxisIndex`] describes a selection along one axis. [`resolve`] turns it
//! into an ordered list of positions: the caller's order is kept, repeats are
//! allowed, and nothing is sorted.

use super::{LineageError, Result};
use serde_json::Value;
use std::ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo};
use std::str::FromStr;

/// Python-style slice `start:stop:step`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slice {
    pub start: Option<isize>,
    pub stop: Option<isize>,
    pub step: isize,
}

impl Slice {
    pub fn new(start: Option<isize>, stop: Option<isize>, step: isize) -> Self {
        Self { start, stop, step }
    }

    /// Expand over an axis of length `len`.
    pub fn positions(&self, len: usize) -> Result<Vec<usize>> {
        if self.step == 0 {
            return Err(LineageError::UnsupportedIndex("slice step cannot be zero".into()));
        }
        let len = len as isize;
        let adjust = |bound: isize, lower: isize, upper: isize| {
            let bound = if bound < 0 { bound + len } else { bound };
            bound.clamp(lower, upper)
        };

        let mut positions = Vec::new();
        if self.step > 0 {
            let start = self.start.map_or(0, |s| adjust(s, 0, len));
            let stop = self.stop.map_or(len, |s| adjust(s, 0, len));
            let mut i = start;
            while i < stop {
                positions.push(i as usize);
                match i.checked_add(self.step) {
                    Some(next) => i = next,
                    None => break,
                }
            }
        } else {
            let start = self.start.map_or(len - 1, |s| adjust(s, -1, len - 1));
            let stop = self.stop.map_or(-1, |s| adjust(s, -1, len - 1));
            let mut i = start;
            while i > stop {
                positions.push(i as usize);
                match i.checked_add(self.step) {
                    Some(next) => i = next,
                    None => break,
                }
            }
        }
        Ok(positions)
    }
}

/// One element of a mixed index list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexItem {
    Position(isize),
    Label(String),
}

impl From<isize> for IndexItem {
    fn from(i: isize) -> Self {
        IndexItem::Position(i)
    }
}

impl From<i32> for IndexItem {
    fn from(i: i32) -> Self {
        IndexItem::Position(i as isize)
    }
}

impl From<usize> for IndexItem {
    fn from(i: usize) -> Self {
        IndexItem::Position(saturating_isize(i))
    }
}

impl From<&str> for IndexItem {
    fn from(s: &str) -> Self {
        IndexItem::Label(s.to_string())
    }
}

impl From<String> for IndexItem {
    fn from(s: String) -> Self {
        IndexItem::Label(s)
    }
}

/// Selection along a single axis
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AxisIndex {
    /// Every position, in order
    Full,
    /// A single position; negative values count from the end
    Position(isize),
    Slice(Slice),
    /// Boolean mask, one entry per position
    Mask(Vec<bool>),
    /// A single lineage name
    Label(String),
    /// Positions and/or names, in the requested order
    List(Vec<IndexItem>),
}

impl AxisIndex {
    /// True for expressions that refer to lineages by name.
    pub fn has_label(&self) -> bool {
        match self {
            AxisIndex::Label(_) => true,
            AxisIndex::List(items) => items.iter().any(|i| matches!(i, IndexItem::Label(_))),
            _ => false,
        }
    }
}

/// Resolve `index` against an axis of length `len`.
///
/// `labels` are the axis' names; `None` means the axis is unlabeled and any
/// label in `index` is rejected.
pub fn resolve(index: &AxisIndex, len: usize, labels: Option<&[String]>) -> Result<Vec<usize>> {
    match index {
        AxisIndex::Full => Ok((0..len).collect()),
        AxisIndex::Position(i) => Ok(vec![position(*i, len)?]),
        AxisIndex::Slice(slice) => slice.positions(len),
        AxisIndex::Mask(mask) => {
            if mask.len() != len {
                return Err(LineageError::UnsupportedIndex(format!(
                    "boolean mask of length {} does not match axis of size {}",
                    mask.len(),
                    len
                )));
            }
            Ok(mask
                .iter()
                .enumerate()
                .filter_map(|(i, &keep)| keep.then_some(i))
                .collect())
        }
        AxisIndex::Label(name) => Ok(vec![label(name, labels)?]),
        AxisIndex::List(items) => items
            .iter()
            .map(|item| match item {
                IndexItem::Position(i) => position(*i, len),
                IndexItem::Label(name) => label(name, labels),
            })
            .collect(),
    }
}

/// Positions past `isize::MAX` stay out of range instead of wrapping negative.
fn saturating_isize(i: usize) -> isize {
    isize::try_from(i).unwrap_or(isize::MAX)
}

/// Integer JSON numbers as positions; floats are rejected.
fn json_position(n: &serde_json::Number) -> Option<isize> {
    if let Some(i) = n.as_i64() {
        return Some(isize::try_from(i).unwrap_or(if i < 0 { isize::MIN } else { isize::MAX }));
    }
    n.as_u64().map(|_| isize::MAX)
}

fn position(i: isize, len: usize) -> Result<usize> {
    let signed_len = len as isize;
    let resolved = if i < 0 { i + signed_len } else { i };
    if resolved < 0 || resolved >= signed_len {
        return Err(LineageError::IndexOutOfRange { index: i, len });
    }
    Ok(resolved as usize)
}

fn label(name: &str, labels: Option<&[String]>) -> Result<usize> {
    let labels = labels.ok_or_else(|| {
        LineageError::UnsupportedIndex(format!("label '{}' used on an unlabeled axis", name))
    })?;
    labels
        .iter()
        .position(|l| l == name)
        .ok_or_else(|| LineageError::NameNotFound(name.to_string()))
}

impl From<RangeFull> for AxisIndex {
    fn from(_: RangeFull) -> Self {
        AxisIndex::Full
    }
}

impl From<Range<usize>> for AxisIndex {
    fn from(r: Range<usize>) -> Self {
        AxisIndex::Slice(Slice::new(
            Some(saturating_isize(r.start)),
            Some(saturating_isize(r.end)),
            1,
        ))
    }
}

impl From<RangeInclusive<usize>> for AxisIndex {
    fn from(r: RangeInclusive<usize>) -> Self {
        AxisIndex::Slice(Slice::new(
            Some(saturating_isize(*r.start())),
            Some(saturating_isize(*r.end()).saturating_add(1)),
            1,
        ))
    }
}

impl From<RangeFrom<usize>> for AxisIndex {
    fn from(r: RangeFrom<usize>) -> Self {
        AxisIndex::Slice(Slice::new(Some(saturating_isize(r.start)), None, 1))
    }
}

impl From<RangeTo<usize>> for AxisIndex {
    fn from(r: RangeTo<usize>) -> Self {
        AxisIndex::Slice(Slice::new(None, Some(saturating_isize(r.end)), 1))
    }
}

impl From<Slice> for AxisIndex {
    fn from(s: Slice) -> Self {
        AxisIndex::Slice(s)
    }
}

impl From<isize> for AxisIndex {
    fn from(i: isize) -> Self {
        AxisIndex::Position(i)
    }
}

impl From<i32> for AxisIndex {
    fn from(i: i32) -> Self {
        AxisIndex::Position(i as isize)
    }
}

impl From<usize> for AxisIndex {
    fn from(i: usize) -> Self {
        AxisIndex::Position(saturating_isize(i))
    }
}

impl From<&str> for AxisIndex {
    fn from(s: &str) -> Self {
        AxisIndex::Label(s.to_string())
    }
}

impl From<String> for AxisIndex {
    fn from(s: String) -> Self {
        AxisIndex::Label(s)
    }
}

impl From<Vec<bool>> for AxisIndex {
    fn from(mask: Vec<bool>) -> Self {
        AxisIndex::Mask(mask)
    }
}

impl From<&[bool]> for AxisIndex {
    fn from(mask: &[bool]) -> Self {
        AxisIndex::Mask(mask.to_vec())
    }
}

macro_rules! impl_from_item_vec {
    ($($t:ty),*) => {
        $(
            impl From<Vec<$t>> for AxisIndex {
                fn from(items: Vec<$t>) -> Self {
                    AxisIndex::List(items.into_iter().map(IndexItem::from).collect())
                }
            }
        )*
    };
}

impl_from_item_vec!(i32, isize, usize, &str, String);

impl From<Vec<IndexItem>> for AxisIndex {
    fn from(items: Vec<IndexItem>) -> Self {
        AxisIndex::List(items)
    }
}

impl TryFrom<&Value> for AxisIndex {
    type Error = LineageError;

    /// JSON form: `null` for all, an integer, a string, a boolean array or an
    /// array of integers and strings.
    fn try_from(value: &Value) -> Result<Self> {
        let unsupported = || LineageError::UnsupportedIndex(value.to_string());
        match value {
            Value::Null => Ok(AxisIndex::Full),
            Value::Number(n) => json_position(n)
                .map(AxisIndex::Position)
                .ok_or_else(unsupported),
            Value::String(s) => Ok(AxisIndex::Label(s.clone())),
            Value::Array(items) if !items.is_empty() && items.iter().all(Value::is_boolean) => {
                Ok(AxisIndex::Mask(items.iter().filter_map(Value::as_bool).collect()))
            }
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(IndexItem::Label(s.clone())),
                    Value::Number(n) => json_position(n)
                        .map(IndexItem::Position)
                        .ok_or_else(|| LineageError::UnsupportedIndex(item.to_string())),
                    other => Err(LineageError::UnsupportedIndex(other.to_string())),
                })
                .collect::<Result<Vec<_>>>()
                .map(AxisIndex::List),
            _ => Err(unsupported()),
        }
    }
}

impl FromStr for AxisIndex {
    type Err = LineageError;

    /// Textual form: `:` for all, `start:stop[:step]`, `mask=0110`, a
    /// comma-separated list of integers and names, a lone integer, or a name.
    /// A `name=` prefix on an expression or a list item reads the rest as a
    /// name, so `name=0` or `name=a:b` address lineages that would otherwise
    /// parse as a position or a slice. Names containing `,` have no textual form.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() || s == ":" {
            return Ok(AxisIndex::Full);
        }
        if let Some(label) = s.strip_prefix("name=").filter(|l| !l.contains(',')) {
            return Ok(AxisIndex::Label(label.to_string()));
        }
        if let Some(bits) = s.strip_prefix("mask=") {
            return bits
                .chars()
                .map(|c| match c {
                    '1' | 'T' | 't' => Ok(true),
                    '0' | 'F' | 'f' => Ok(false),
                    _ => Err(LineageError::UnsupportedIndex(s.to_string())),
                })
                .collect::<Result<Vec<_>>>()
                .map(AxisIndex::Mask);
        }
        if s.contains(',') {
            return Ok(AxisIndex::List(s.split(',').map(parse_item).collect()));
        }
        if s.contains(':') {
            return parse_slice(s).map(AxisIndex::Slice);
        }
        Ok(match parse_item(s) {
            IndexItem::Position(i) => AxisIndex::Position(i),
            IndexItem::Label(l) => AxisIndex::Label(l),
        })
    }
}

fn parse_item(raw: &str) -> IndexItem {
    let raw = raw.trim();
    if let Some(label) = raw.strip_prefix("name=") {
        return IndexItem::Label(label.to_string());
    }
    raw.parse::<isize>()
        .map(IndexItem::Position)
        .unwrap_or_else(|_| IndexItem::Label(raw.to_string()))
}

fn parse_slice(s: &str) -> Result<Slice> {
    let parts: Vec<&str> = s.split(':').map(str::trim).collect();
    if parts.len() > 3 {
        return Err(LineageError::UnsupportedIndex(s.to_string()));
    }
    let bound = |part: &str| -> Result<Option<isize>> {
        if part.is_empty() {
            return Ok(None);
        }
        part.parse::<isize>()
            .map(Some)
            .map_err(|_| LineageError::UnsupportedIndex(s.to_string()))
    };
    let step = match parts.get(2) {
        Some(p) => bound(p)?.unwrap_or(1),
        None => 1,
    };
    Ok(Slice::new(bound(parts[0])?, bound(parts[1])?, step))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> Vec<String> {
        vec!["foo".into(), "bar".into(), "baz".into()]
    }

    #[test]
    fn test_positions_and_negatives() {
        assert_eq!(resolve(&AxisIndex::Position(1), 3, None).unwrap(), vec![1]);
        assert_eq!(resolve(&AxisIndex::Position(-1), 3, None).unwrap(), vec![2]);
        assert_eq!(
            resolve(&AxisIndex::Position(3), 3, None).unwrap_err(),
            LineageError::IndexOutOfRange { index: 3, len: 3 }
        );
        assert!(resolve(&AxisIndex::Position(-4), 3, None).is_err());
    }

    #[test]
    fn test_slices() {
        let s = |start, stop, step| AxisIndex::Slice(Slice::new(start, stop, step));
        assert_eq!(resolve(&s(None, None, 1), 4, None).unwrap(), vec![0, 1, 2, 3]);
        assert_eq!(resolve(&s(Some(1), Some(3), 1), 4, None).unwrap(), vec![1, 2]);
        assert_eq!(resolve(&s(None, None, -1), 4, None).unwrap(), vec![3, 2, 1, 0]);
        assert_eq!(resolve(&s(Some(-2), None, 1), 4, None).unwrap(), vec![2, 3]);
        assert_eq!(resolve(&s(Some(0), Some(100), 2), 5, None).unwrap(), vec![0, 2, 4]);
        assert!(resolve(&s(Some(3), Some(1), 1), 4, None).unwrap().is_empty());
        assert!(resolve(&s(None, None, 0), 4, None).is_err());
        assert_eq!(resolve(&AxisIndex::from(1..3usize), 4, None).unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_mask() {
        let mask = AxisIndex::Mask(vec![true, false, true]);
        assert_eq!(resolve(&mask, 3, None).unwrap(), vec![0, 2]);
        let err = resolve(&AxisIndex::Mask(vec![true]), 3, None).unwrap_err();
        assert!(matches!(err, LineageError::UnsupportedIndex(_)));
    }

    #[test]
    fn test_int_list_keeps_order_and_repeats() {
        let idx = AxisIndex::from(vec![2, 0, 2]);
        assert_eq!(resolve(&idx, 3, None).unwrap(), vec![2, 0, 2]);
        assert!(resolve(&AxisIndex::from(vec![0, 5]), 3, None).is_err());
    }

    #[test]
    fn test_mixed_labels_and_positions() {
        let labels = labels();
        let idx = AxisIndex::List(vec!["foo".into(), 2.into(), "bar".into(), 0.into()]);
        assert_eq!(resolve(&idx, 3, Some(&labels)).unwrap(), vec![0, 2, 1, 0]);
        assert_eq!(resolve(&AxisIndex::from("baz"), 3, Some(&labels)).unwrap(), vec![2]);
    }

    #[test]
    fn test_label_errors() {
        let labels = labels();
        assert_eq!(
            resolve(&AxisIndex::from("quux"), 3, Some(&labels)).unwrap_err(),
            LineageError::NameNotFound("quux".into())
        );
        let err = resolve(&AxisIndex::from("foo"), 3, None).unwrap_err();
        assert!(matches!(err, LineageError::UnsupportedIndex(_)));
    }

    #[test]
    fn test_parse_text() {
        assert_eq!("".parse::<AxisIndex>().unwrap(), AxisIndex::Full);
        assert_eq!(":".parse::<AxisIndex>().unwrap(), AxisIndex::Full);
        assert_eq!("-1".parse::<AxisIndex>().unwrap(), AxisIndex::Position(-1));
        assert_eq!("baz".parse::<AxisIndex>().unwrap(), AxisIndex::Label("baz".into()));
        assert_eq!(
            "1:5:2".parse::<AxisIndex>().unwrap(),
            AxisIndex::Slice(Slice::new(Some(1), Some(5), 2))
        );
        assert_eq!(
            "::-1".parse::<AxisIndex>().unwrap(),
            AxisIndex::Slice(Slice::new(None, None, -1))
        );
        assert_eq!(
            "mask=101".parse::<AxisIndex>().unwrap(),
            AxisIndex::Mask(vec![true, false, true])
        );
        assert_eq!(
            "foo, 2,bar".parse::<AxisIndex>().unwrap(),
            AxisIndex::List(vec!["foo".into(), 2.into(), "bar".into()])
        );
        assert!("1:2:3:4".parse::<AxisIndex>().is_err());
        assert!("mask=10x".parse::<AxisIndex>().is_err());
    }

    #[test]
    fn test_parse_json() {
        use serde_json::json;
        assert_eq!(AxisIndex::try_from(&json!(null)).unwrap(), AxisIndex::Full);
        assert_eq!(AxisIndex::try_from(&json!(-2)).unwrap(), AxisIndex::Position(-2));
        assert_eq!(
            AxisIndex::try_from(&json!([true, false])).unwrap(),
            AxisIndex::Mask(vec![true, false])
        );
        assert_eq!(
            AxisIndex::try_from(&json!(["foo", 1])).unwrap(),
            AxisIndex::List(vec!["foo".into(), 1.into()])
        );
        for bad in [json!(1.5), json!({"a": 1}), json!([true, 1]), json!(true)] {
            let err = AxisIndex::try_from(&bad).unwrap_err();
            assert!(err.is_type_error(), "{}", bad);
        }
    }

    #[test]
    fn test_has_label() {
        assert!(AxisIndex::from("foo").has_label());
        assert!(AxisIndex::List(vec![0.into(), "foo".into()]).has_label());
        assert!(!AxisIndex::from(vec![0, 1]).has_label());
        assert!(!AxisIndex::Full.has_label());
    }

    #[test]
    fn test_large_step_stops_at_axis_end() {
        let forward = AxisIndex::Slice(Slice::new(Some(1), None, isize::MAX));
        assert_eq!(resolve(&forward, 4, None).unwrap(), vec![1]);
        let backward = AxisIndex::Slice(Slice::new(None, None, isize::MIN));
        assert_eq!(resolve(&backward, 4, None).unwrap(), vec![3]);
        let text: AxisIndex = "1::9223372036854775807".parse().unwrap();
        assert_eq!(resolve(&text, 4, None).unwrap(), vec![1]);
    }

    #[test]
    fn test_huge_unsigned_positions_are_out_of_range() {
        let err = resolve(&AxisIndex::from(usize::MAX), 10, None).unwrap_err();
        assert!(matches!(err, LineageError::IndexOutOfRange { len: 10, .. }));
        let err = resolve(&AxisIndex::from(vec![0usize, usize::MAX]), 10, None).unwrap_err();
        assert!(matches!(err, LineageError::IndexOutOfRange { .. }));

        assert_eq!(resolve(&AxisIndex::from(8..usize::MAX), 10, None).unwrap(), vec![8, 9]);
        assert_eq!(resolve(&AxisIndex::from(8..=usize::MAX), 10, None).unwrap(), vec![8, 9]);

        let idx = AxisIndex::try_from(&serde_json::json!(u64::MAX)).unwrap();
        let err = resolve(&idx, 10, None).unwrap_err();
        assert!(matches!(err, LineageError::IndexOutOfRange { .. }));
        let idx = AxisIndex::try_from(&serde_json::json!([u64::MAX])).unwrap();
        assert!(matches!(
            resolve(&idx, 10, None).unwrap_err(),
            LineageError::IndexOutOfRange { .. }
        ));
    }

    #[test]
    fn test_parse_name_escape() {
        assert_eq!("name=0".parse::<AxisIndex>().unwrap(), AxisIndex::Label("0".into()));
        assert_eq!("name=a:b".parse::<AxisIndex>().unwrap(), AxisIndex::Label("a:b".into()));
        assert_eq!(
            "name=1,2".parse::<AxisIndex>().unwrap(),
            AxisIndex::List(vec!["1".into(), 2.into()])
        );
        assert_eq!(
            "foo,name=2,2".parse::<AxisIndex>().unwrap(),
            AxisIndex::List(vec!["foo".into(), "2".into(), 2.into()])
        );

        let labels = vec!["0".to_string(), "1".to_string()];
        let idx: AxisIndex = "name=1,0".parse().unwrap();
        assert_eq!(resolve(&idx, 2, Some(&labels)).unwrap(), vec![1, 0]);
    }
}
