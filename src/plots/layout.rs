//! Panel grids and default figure sizes.

/// Rows and columns of a multi-panel figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub rows: usize,
    pub columns: usize,
}

impl GridLayout {
    #[must_use]
    pub const fn panels(&self) -> usize {
        self.rows * self.columns
    }
}

/// Parameter count above which histogram grids switch from three columns
/// to four.
pub const WIDE_GRID_THRESHOLD: usize = 9;

/// Grid used by the marginal-histogram figure: three columns up to
/// [`WIDE_GRID_THRESHOLD`] parameters, four beyond, rows as needed.
#[must_use]
pub const fn histogram_grid(n_parameters: usize) -> GridLayout {
    let columns = if n_parameters > WIDE_GRID_THRESHOLD {
        4
    } else {
        3
    };
    let rows = if n_parameters == 0 {
        1
    } else {
        n_parameters.div_ceil(columns)
    };
    GridLayout { rows, columns }
}

/// Number of below-diagonal parameter pairs.
#[must_use]
pub const fn pairwise_panel_count(n_parameters: usize) -> usize {
    n_parameters * (n_parameters - 1) / 2
}

pub const TRACE_FIGURE_SIZE: (u32, u32) = (800, 800);
pub const PAIRWISE_FIGURE_SIZE: (u32, u32) = (800, 800);
pub const RMS_FIGURE_SIZE: (u32, u32) = (800, 600);
pub const MODELFIT_FIGURE_SIZE: (u32, u32) = (800, 600);

/// Histogram figure size grows with the number of rows, capped at the
/// trace figure height.
#[must_use]
pub fn histogram_figure_size(rows: usize) -> (u32, u32) {
    let height = 200 + 200 * u32::try_from(rows).unwrap_or(3);
    (800, height.min(800))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_parameter_sets_use_three_columns() {
        assert_eq!(histogram_grid(1), GridLayout { rows: 1, columns: 3 });
        assert_eq!(histogram_grid(6), GridLayout { rows: 2, columns: 3 });
        assert_eq!(histogram_grid(9), GridLayout { rows: 3, columns: 3 });
    }

    #[test]
    fn large_parameter_sets_use_four_columns() {
        assert_eq!(histogram_grid(10), GridLayout { rows: 3, columns: 4 });
        assert_eq!(histogram_grid(16), GridLayout { rows: 4, columns: 4 });
        assert_eq!(histogram_grid(17), GridLayout { rows: 5, columns: 4 });
    }

    #[test]
    fn pairwise_count_is_below_diagonal() {
        assert_eq!(pairwise_panel_count(1), 0);
        assert_eq!(pairwise_panel_count(2), 1);
        assert_eq!(pairwise_panel_count(5), 10);
    }

    #[test]
    fn histogram_height_caps_at_the_trace_height() {
        assert_eq!(histogram_figure_size(1), (800, 400));
        assert_eq!(histogram_figure_size(2), (800, 600));
        assert_eq!(histogram_figure_size(5), (800, 800));
    }
}
