//! Chi-Squared Test of Independence
//!
//! Pearson statistic over the 2x2 group x outcome table. The continuity
//! correction is opt-in; when enabled each `|O - E|` is shrunk by at most 0.5.

use crate::distribution::chi_squared_sf;
use crate::error::StatsError;
use serde::{Deserialize, Serialize};
use splitstat_data::{ContingencyTable, Group};

/// Degrees of freedom of a 2x2 table
pub const TWO_BY_TWO_DOF: u32 = 1;

/// Statistic and p-value of a chi-squared test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChiSquareTest {
    /// Pearson chi-squared statistic
    pub statistic: f64,
    /// Upper-tail p-value
    pub p_value: f64,
    /// Degrees of freedom
    pub dof: u32,
    /// Expected counts under independence, same layout as the table
    pub expected: [[f64; 2]; 2],
    /// Whether Yates' continuity correction was applied
    pub yates_correction: bool,
}

/// Test whether conversion is independent of group membership
pub fn chi_square_independence(
    table: &ContingencyTable,
    yates_correction: bool,
) -> Result<ChiSquareTest, StatsError> {
    for group in Group::ALL {
        if table.row_total(group) == 0 {
            return Err(StatsError::insufficient(format!(
                "contingency table has no {group} observations"
            )));
        }
    }
    for converted in [false, true] {
        if table.column_total(converted) == 0 {
            return Err(StatsError::insufficient(format!(
                "contingency table has no observations with converted = {}",
                u8::from(converted)
            )));
        }
    }

    let total = table.total() as f64;
    let mut expected = [[0.0; 2]; 2];
    let mut statistic = 0.0;

    for group in Group::ALL {
        let row = group.index();
        for converted in [false, true] {
            let col = usize::from(converted);
            let e = table.row_total(group) as f64 * table.column_total(converted) as f64 / total;
            let mut deviation = (table.counts[row][col] as f64 - e).abs();
            if yates_correction {
                deviation = (deviation - 0.5).max(0.0);
            }
            expected[row][col] = e;
            statistic += deviation * deviation / e;
        }
    }

    Ok(ChiSquareTest {
        statistic,
        p_value: chi_squared_sf(statistic, TWO_BY_TWO_DOF)?,
        dof: TWO_BY_TWO_DOF,
        expected,
        yates_correction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_association() {
        let table = ContingencyTable::new([[10, 0], [0, 10]]);
        let test = chi_square_independence(&table, false).unwrap();

        assert!((test.statistic - 20.0).abs() < 1e-9);
        assert!(test.statistic > 15.0);
        assert!(test.p_value < 1e-4);
        assert_eq!(test.dof, 1);
        assert_eq!(test.expected, [[5.0, 5.0], [5.0, 5.0]]);
    }

    #[test]
    fn test_yates_correction() {
        let table = ContingencyTable::new([[10, 0], [0, 10]]);
        let corrected = chi_square_independence(&table, true).unwrap();
        assert!((corrected.statistic - 16.2).abs() < 1e-9);
        assert!(corrected.yates_correction);
    }

    #[test]
    fn test_yates_never_overcorrects() {
        // |O - E| = 0.5 in every cell, so the corrected deviation floors at zero
        let table = ContingencyTable::new([[3, 2], [2, 3]]);
        let test = chi_square_independence(&table, true).unwrap();
        assert_eq!(test.statistic, 0.0);
        assert!((test.p_value - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_independent_table() {
        let table = ContingencyTable::new([[90, 10], [180, 20]]);
        let test = chi_square_independence(&table, false).unwrap();
        assert!(test.statistic.abs() < 1e-9);
        assert!(test.p_value > 0.99);
    }

    #[test]
    fn test_matches_squared_ztest() {
        // Without correction, the 2x2 statistic equals z^2 of the pooled z-test
        let table = ContingencyTable::new([[800, 200], [750, 250]]);
        let chi = chi_square_independence(&table, false).unwrap();
        let z = crate::two_proportion_ztest([200, 250], [1000, 1000]).unwrap();
        assert!((chi.statistic - z.z_statistic.powi(2)).abs() < 1e-9);
        assert!((chi.p_value - z.p_value).abs() < 1e-8);
    }

    #[test]
    fn test_degenerate_tables() {
        let missing_group = ContingencyTable::new([[10, 5], [0, 0]]);
        assert!(matches!(
            chi_square_independence(&missing_group, false),
            Err(StatsError::InsufficientData { .. })
        ));

        let no_conversions = ContingencyTable::new([[10, 0], [12, 0]]);
        assert!(matches!(
            chi_square_independence(&no_conversions, false),
            Err(StatsError::InsufficientData { .. })
        ));
    }
}
