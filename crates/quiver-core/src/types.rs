//! # Domain Types
//!
//! Catalog types consumed by the pricing engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐        ┌─────────────────────┐                │
//! │  │       Board         │ 1    * │     BoardExtra      │                │
//! │  │  ─────────────────  │───────►│  ─────────────────  │                │
//! │  │  id                 │        │  id                 │                │
//! │  │  owner_id/name      │        │  daily_rate         │                │
//! │  │  daily_rate?        │        │  weekly_rate        │                │
//! │  │  weekly_rate?       │        │  sizes              │                │
//! │  │  delivery_eligible  │        └─────────────────────┘                │
//! │  │  delivery_flat_rate │                                               │
//! │  └─────────────────────┘        ┌─────────────────────┐                │
//! │                                 │ RateClassification  │                │
//! │                                 │  Weekly / Daily /   │                │
//! │                                 │  Unavailable        │                │
//! │                                 └─────────────────────┘                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Boards carry nullable rates (owners may list only a weekly price). Extras
//! always carry both rates.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Board
// =============================================================================

/// A surfboard listed for rent, as supplied by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    /// Catalog identifier.
    pub id: String,

    /// Display name ("7'2 Firewire Seaside").
    pub name: String,

    /// Owner the board is rented from. Delivery is grouped by this id.
    pub owner_id: String,

    /// Owner display name for the delivery breakdown.
    pub owner_name: String,

    /// Price per day, if the owner offers daily rentals.
    pub daily_rate: Option<Money>,

    /// Price per full week, if the owner offers weekly rentals.
    pub weekly_rate: Option<Money>,

    /// Whether the owner delivers this board.
    pub delivery_eligible: bool,

    /// Advertised delivery price shown on the board page.
    /// The cart charges delivery per owner through `DeliveryPolicy`.
    pub delivery_flat_rate: Money,

    /// Add-ons the owner offers with this board.
    #[serde(default)]
    pub extras: Vec<BoardExtra>,
}

impl Board {
    /// Looks up an offered extra by id.
    pub fn extra(&self, extra_id: &str) -> Option<&BoardExtra> {
        self.extras.iter().find(|e| e.id == extra_id)
    }
}

// =============================================================================
// Board Extra
// =============================================================================

/// An add-on offered with a board (wetsuit, leash, rash guard, roof rack).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BoardExtra {
    pub id: String,
    pub name: String,
    pub daily_rate: Money,
    pub weekly_rate: Money,
    /// Sizes the owner stocks. Empty for one-size extras.
    #[serde(default)]
    pub sizes: Vec<String>,
}

// =============================================================================
// Rate Classification
// =============================================================================

/// Which rule priced a rental line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RateClassification {
    /// Full weeks at the weekly rate, leftover days at the daily rate.
    Weekly,
    /// Every day at the daily rate.
    Daily,
    /// No usable rate. The UI shows "Price TBD".
    Unavailable,
}

impl RateClassification {
    /// Returns true when the line has a real price.
    pub fn is_priced(&self) -> bool {
        !matches!(self, RateClassification::Unavailable)
    }
}

impl std::fmt::Display for RateClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RateClassification::Weekly => write!(f, "weekly"),
            RateClassification::Daily => write!(f, "daily"),
            RateClassification::Unavailable => write!(f, "unavailable"),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Boards shared by the unit tests of this crate.

    use super::*;

    /// $30/day, $150/week, delivered by owner-a, offers a wetsuit.
    pub fn longboard() -> Board {
        Board {
            id: "board-long".to_string(),
            name: "9'0 Longboard".to_string(),
            owner_id: "owner-a".to_string(),
            owner_name: "Kai".to_string(),
            daily_rate: Some(Money::from_major(30)),
            weekly_rate: Some(Money::from_major(150)),
            delivery_eligible: true,
            delivery_flat_rate: Money::from_major(50),
            extras: vec![wetsuit(), leash()],
        }
    }

    pub fn board_for(id: &str, owner_id: &str) -> Board {
        Board {
            id: id.to_string(),
            owner_id: owner_id.to_string(),
            owner_name: format!("Owner {}", owner_id),
            ..longboard()
        }
    }

    pub fn wetsuit() -> BoardExtra {
        BoardExtra {
            id: "wetsuit".to_string(),
            name: "4/3 Wetsuit".to_string(),
            daily_rate: Money::from_major(10),
            weekly_rate: Money::from_major(50),
            sizes: vec!["S".to_string(), "M".to_string(), "L".to_string()],
        }
    }

    pub fn leash() -> BoardExtra {
        BoardExtra {
            id: "leash".to_string(),
            name: "Leash".to_string(),
            daily_rate: Money::from_major(2),
            weekly_rate: Money::from_major(8),
            sizes: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_board_extra_lookup() {
        let board = longboard();
        assert_eq!(board.extra("wetsuit").map(|e| e.sizes.len()), Some(3));
        assert_eq!(board.extra("leash").map(|e| e.sizes.is_empty()), Some(true));
        assert!(board.extra("roof-rack").is_none());
    }

    #[test]
    fn test_board_json_shape() {
        let json = serde_json::to_value(longboard()).unwrap();
        assert_eq!(json["ownerId"], "owner-a");
        assert_eq!(json["dailyRate"], 3000);
        assert_eq!(json["deliveryEligible"], true);
    }

    #[test]
    fn test_rate_classification_serialization() {
        let json = serde_json::to_string(&RateClassification::Unavailable).unwrap();
        assert_eq!(json, "\"unavailable\"");
        assert!(!RateClassification::Unavailable.is_priced());
        assert!(RateClassification::Weekly.is_priced());
    }
}
