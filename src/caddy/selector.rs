use crate::model::{CLUB_CATALOG, ClubData, full_swing_clubs};

const ALTERNATIVE_WINDOW_YARDS: i32 = 15;

/// Club whose typical carry is closest to `distance`. On a tie the earlier
/// (longer) club in the catalog wins. Never returns the putter.
#[must_use]
pub fn select_by_distance(distance: f64) -> &'static ClubData {
    let mut best = &CLUB_CATALOG[0];
    let mut best_diff = f64::INFINITY;
    for club in full_swing_clubs() {
        let diff = (f64::from(club.typical_carry) - distance).abs();
        if diff < best_diff {
            best = club;
            best_diff = diff;
        }
    }
    best
}

/// Nearest shorter and nearest longer club within 15 yards of `club`'s carry, shorter first.
#[must_use]
pub fn alternatives_for(club: &ClubData) -> Vec<&'static ClubData> {
    let carry = club.typical_carry;
    let shorter = full_swing_clubs()
        .filter(|c| c.typical_carry < carry && carry - c.typical_carry <= ALTERNATIVE_WINDOW_YARDS)
        .max_by_key(|c| c.typical_carry);
    let longer = full_swing_clubs()
        .filter(|c| c.typical_carry > carry && c.typical_carry - carry <= ALTERNATIVE_WINDOW_YARDS)
        .min_by_key(|c| c.typical_carry);
    shorter.into_iter().chain(longer).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ClubType;

    #[test]
    fn exact_and_tied_distances() {
        assert_eq!(select_by_distance(150.0).name, "7-Iron");
        // 195 sits between 5-Wood (200) and 4-Hybrid (190); the earlier club wins
        assert_eq!(select_by_distance(195.0).name, "5-Wood");
        assert_eq!(select_by_distance(0.0).name, "Lob Wedge");
        assert_eq!(select_by_distance(400.0).name, "Driver");
    }

    #[test]
    fn never_the_putter() {
        for d in 0..=300 {
            assert_ne!(select_by_distance(f64::from(d)).club_type, ClubType::Putter);
        }
    }

    #[test]
    fn alternatives_bracket_the_club() {
        let seven = select_by_distance(150.0);
        let names: Vec<&str> = alternatives_for(seven).iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["8-Iron", "6-Iron"]);

        let driver = &CLUB_CATALOG[0];
        let names: Vec<&str> = alternatives_for(driver).iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["3-Wood"]);

        let lob = select_by_distance(75.0);
        let names: Vec<&str> = alternatives_for(lob).iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Sand Wedge"]);
    }
}
