//! Pairwise Pearson correlation matrix

use serde::{Deserialize, Serialize};
use tabstat_stats::correlation::{pearson, pearson_p_value};

use crate::{alignment::Alignment, variable::NumericView};

/// Square correlation matrix over the numerical variables.
///
/// Row and column `i` belong to `variables[i]`. The diagonal holds r = 1 and
/// p = 0; `sample_sizes[i][j]` is the number of pairs behind cell `(i, j)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub variables: Vec<String>,
    pub r: Vec<Vec<f64>>,
    pub p_values: Vec<Vec<f64>>,
    pub sample_sizes: Vec<Vec<usize>>,
}

impl CorrelationMatrix {
    /// Correlates every pair of numerical variables.
    ///
    /// Returns `None` with fewer than two numerical variables.
    #[must_use]
    pub fn new(variables: &[NumericView<'_>], alignment: Alignment) -> Option<Self> {
        let k = variables.len();
        if k < 2 {
            return None;
        }

        let mut r = vec![vec![0.0; k]; k];
        let mut p_values = vec![vec![0.0; k]; k];
        let mut sample_sizes = vec![vec![0; k]; k];

        for i in 0..k {
            r[i][i] = 1.0;
            p_values[i][i] = 0.0;
            sample_sizes[i][i] = variables[i].values.len();
            for j in (i + 1)..k {
                let (x, y) = alignment.pair(&variables[i], &variables[j]);
                let n = x.len();
                // fewer than two pairs carry no linear association
                let rij = pearson(&x, &y).unwrap_or(0.0);
                let pij = pearson_p_value(rij, n);
                r[i][j] = rij;
                r[j][i] = rij;
                p_values[i][j] = pij;
                p_values[j][i] = pij;
                sample_sizes[i][j] = n;
                sample_sizes[j][i] = n;
            }
        }

        Some(Self {
            variables: variables.iter().map(|v| v.name.to_owned()).collect(),
            r,
            p_values,
            sample_sizes,
        })
    }

    /// Off-diagonal pairs `(i, j)` with `i < j`, strongest correlation first.
    #[must_use]
    pub fn ranked_pairs(&self) -> Vec<(usize, usize)> {
        let k = self.variables.len();
        let mut pairs = (0..k)
            .flat_map(|i| ((i + 1)..k).map(move |j| (i, j)))
            .collect::<Vec<_>>();
        pairs.sort_by(|&(a, b), &(c, d)| self.r[c][d].abs().total_cmp(&self.r[a][b].abs()));
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view<'a>(name: &'a str, values: &'a [f64], rows: &'a [usize]) -> NumericView<'a> {
        NumericView { name, values, rows }
    }

    const ROWS: [usize; 8] = [0, 1, 2, 3, 4, 5, 6, 7];

    #[test]
    fn test_fewer_than_two_variables() {
        let a = [1.0, 2.0, 3.0];
        assert!(CorrelationMatrix::new(&[view("a", &a, &ROWS[..3])], Alignment::Truncate).is_none());
    }

    #[test]
    fn test_matrix_shape_and_diagonal() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let b = [2.0, 1.0, 4.0, 3.0, 6.0, 5.0];
        let c = [5.0, 5.0, 5.0, 5.0, 5.0, 5.0];
        let vars = [
            view("a", &a, &ROWS[..6]),
            view("b", &b, &ROWS[..6]),
            view("c", &c, &ROWS[..6]),
        ];
        let m = CorrelationMatrix::new(&vars, Alignment::Truncate).unwrap();
        assert_eq!(m.variables, vec!["a", "b", "c"]);
        for i in 0..3 {
            assert_eq!(m.r[i][i], 1.0);
            assert_eq!(m.p_values[i][i], 0.0);
            for j in 0..3 {
                assert_eq!(m.r[i][j], m.r[j][i]);
                assert_eq!(m.p_values[i][j], m.p_values[j][i]);
                assert!((0.0..=1.0).contains(&m.p_values[i][j]));
            }
        }
        assert!(m.r[0][1] > 0.5);
        // zero variance
        assert_eq!(m.r[0][2], 0.0);
        assert_eq!(m.p_values[0][2], 1.0);
        assert_eq!(m.ranked_pairs()[0], (0, 1));
    }

    #[test]
    fn test_two_pairs_have_p_one() {
        let a = [1.0, 2.0];
        let b = [3.0, 7.0];
        let vars = [view("a", &a, &ROWS[..2]), view("b", &b, &ROWS[..2])];
        let m = CorrelationMatrix::new(&vars, Alignment::Truncate).unwrap();
        assert_eq!(m.sample_sizes[0][1], 2);
        assert_eq!(m.p_values[0][1], 1.0);
    }

    #[test]
    fn test_truncation_uses_shorter_length() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [2.0, 4.0, 6.0];
        let vars = [view("a", &a, &ROWS[..5]), view("b", &b, &[0, 3, 4])];
        let truncated = CorrelationMatrix::new(&vars, Alignment::Truncate).unwrap();
        assert_eq!(truncated.sample_sizes[0][1], 3);
        assert!((truncated.r[0][1] - 1.0).abs() < 1e-12);

        let by_row = CorrelationMatrix::new(&vars, Alignment::RowIndex).unwrap();
        // pairs (1, 2), (4, 4), (5, 6)
        assert_eq!(by_row.sample_sizes[0][1], 3);
        assert!(by_row.r[0][1] < 1.0 - 1e-6);
    }
}
