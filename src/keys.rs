//! Storage keys for lineage data
//!
//! Lineage matrices are stored by callers in annotated-data containers under
//! direction-qualified keys such as `to_final_cells_names`. The tags here are
//! a closed set; the builders only format strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of the underlying Markov chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Backward,
}

/// Key under which the root/final cells are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RcKey {
    Forward,
    Backward,
}

/// Key under which the lineage matrix is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinKey {
    Forward,
    Backward,
}

/// Human-readable prefix for lineage names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Prefix {
    Forward,
    Backward,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Forward => "fwd",
            Direction::Backward => "bwd",
        }
    }

    pub fn rc_key(self) -> RcKey {
        match self {
            Direction::Forward => RcKey::Forward,
            Direction::Backward => RcKey::Backward,
        }
    }

    pub fn lin_key(self) -> LinKey {
        match self {
            Direction::Forward => LinKey::Forward,
            Direction::Backward => LinKey::Backward,
        }
    }

    pub fn prefix(self) -> Prefix {
        match self {
            Direction::Forward => Prefix::Forward,
            Direction::Backward => Prefix::Backward,
        }
    }
}

impl RcKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            RcKey::Forward => "final_cells",
            RcKey::Backward => "root_cells",
        }
    }
}

impl LinKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinKey::Forward => "to_final_cells",
            LinKey::Backward => "from_root_cells",
        }
    }
}

impl Prefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            Prefix::Forward => "to",
            Prefix::Backward => "from",
        }
    }
}

macro_rules! display_as_str {
    ($($t:ty),*) => {
        $(
            impl fmt::Display for $t {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

display_as_str!(Direction, RcKey, LinKey, Prefix);

/// Transition matrix key, e.g. `T_fwd`
pub fn transition_key(direction: impl fmt::Display) -> String {
    format!("T_{}", direction)
}

/// Lineage names key, e.g. `to_final_cells_names`
pub fn lin_names_key(key: impl fmt::Display) -> String {
    format!("{}_names", key)
}

/// Lineage colours key, e.g. `to_final_cells_colors`
pub fn colors_key(key: impl fmt::Display) -> String {
    format!("{}_colors", key)
}

/// Probabilities key, e.g. `final_cells_probs`
pub fn probs_key(key: impl fmt::Display) -> String {
    format!("{}_probs", key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Direction::Forward.to_string(), "fwd");
        assert_eq!(RcKey::Backward.to_string(), "root_cells");
        assert_eq!(LinKey::Forward.to_string(), "to_final_cells");
        assert_eq!(Prefix::Backward.to_string(), "from");
    }

    #[test]
    fn test_key_builders() {
        assert_eq!(transition_key(Direction::Backward), "T_bwd");
        assert_eq!(lin_names_key(LinKey::Forward), "to_final_cells_names");
        assert_eq!(colors_key(LinKey::Backward), "from_root_cells_colors");
        assert_eq!(probs_key(RcKey::Forward), "final_cells_probs");
        assert_eq!(probs_key("custom"), "custom_probs");
    }

    #[test]
    fn test_direction_mapping() {
        let d = Direction::Backward;
        assert_eq!(colors_key(d.lin_key()), "from_root_cells_colors");
        assert_eq!(probs_key(d.rc_key()), "root_cells_probs");
        assert_eq!(d.prefix(), Prefix::Backward);
    }
}
