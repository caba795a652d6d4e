use serde::Serialize;
use std::fmt;

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClubType {
    Driver,
    Wood,
    Hybrid,
    Iron,
    Wedge,
    Putter,
}

impl fmt::Display for ClubType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ClubType::Driver => "driver",
            ClubType::Wood => "wood",
            ClubType::Hybrid => "hybrid",
            ClubType::Iron => "iron",
            ClubType::Wedge => "wedge",
            ClubType::Putter => "putter",
        };
        write!(f, "{s}")
    }
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub struct ClubData {
    pub name: &'static str,
    pub club_type: ClubType,
    pub loft: f32,
    pub typical_carry: i32,
    pub typical_total: i32,
}

const fn club(
    name: &'static str,
    club_type: ClubType,
    loft: f32,
    typical_carry: i32,
    typical_total: i32,
) -> ClubData {
    ClubData {
        name,
        club_type,
        loft,
        typical_carry,
        typical_total,
    }
}

/// Longest to shortest. Selection and alternatives both rely on this order.
pub static CLUB_CATALOG: [ClubData; 15] = [
    club("Driver", ClubType::Driver, 10.5, 230, 250),
    club("3-Wood", ClubType::Wood, 15.0, 215, 230),
    club("5-Wood", ClubType::Wood, 18.0, 200, 215),
    club("4-Hybrid", ClubType::Hybrid, 21.0, 190, 200),
    club("4-Iron", ClubType::Iron, 24.0, 180, 190),
    club("5-Iron", ClubType::Iron, 27.0, 170, 180),
    club("6-Iron", ClubType::Iron, 30.0, 160, 170),
    club("7-Iron", ClubType::Iron, 34.0, 150, 160),
    club("8-Iron", ClubType::Iron, 38.0, 140, 148),
    club("9-Iron", ClubType::Iron, 42.0, 130, 136),
    club("Pitching Wedge", ClubType::Wedge, 46.0, 120, 125),
    club("Gap Wedge", ClubType::Wedge, 50.0, 105, 110),
    club("Sand Wedge", ClubType::Wedge, 56.0, 90, 95),
    club("Lob Wedge", ClubType::Wedge, 60.0, 75, 78),
    club("Putter", ClubType::Putter, 3.0, 0, 0),
];

/// Every club that can be hit at a target, i.e. the catalog minus the putter.
pub fn full_swing_clubs() -> impl Iterator<Item = &'static ClubData> {
    CLUB_CATALOG
        .iter()
        .filter(|c| c.club_type != ClubType::Putter)
}

#[must_use]
pub fn find_club(name: &str) -> Option<&'static ClubData> {
    CLUB_CATALOG
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(name.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_ordered_by_carry() {
        let carries: Vec<i32> = CLUB_CATALOG.iter().map(|c| c.typical_carry).collect();
        assert!(carries.windows(2).all(|w| w[0] > w[1]));
        assert_eq!(CLUB_CATALOG[0].name, "Driver");
        assert_eq!(CLUB_CATALOG[14].name, "Putter");
    }

    #[test]
    fn find_club_ignores_case() {
        assert_eq!(find_club("7-iron").map(|c| c.typical_carry), Some(150));
        assert!(find_club("Chipper").is_none());
    }
}
