//! Single-sample filters: each colour channel picks exactly one wavelength with unit weight.

use crate::error::{CocoError, Result};
use crate::filters::filter::FilterSpec;
use ndarray::Array2;

pub(super) fn default_spec(n: usize) -> FilterSpec {
    FilterSpec::Single {
        r: n - 1,
        g: n / 2,
        b: 0,
    }
}

/// Unit weight at one wavelength index per channel.
pub(super) fn single_filter(n: usize, indices: [usize; 3]) -> Result<Array2<f64>> {
    let mut weights = Array2::zeros((n, 3));
    for (channel, &index) in indices.iter().enumerate() {
        if index >= n {
            return Err(CocoError::invalid(format!(
                "index {index} is outside the wavelength axis of length {n}"
            )));
        }
        weights[[index, channel]] = 1.0;
    }
    Ok(weights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::build_filter;
    use ndarray::{Array1, Axis};

    #[test]
    fn test_single_filter_has_one_unit_entry_per_channel() {
        let weights = single_filter(7, [5, 3, 1]).unwrap();
        assert_eq!(weights.dim(), (7, 3));
        for (channel, column) in weights.axis_iter(Axis(1)).enumerate() {
            assert_eq!(column.iter().filter(|&&v| v == 1.0).count(), 1);
            assert_eq!(column.iter().filter(|&&v| v == 0.0).count(), 6);
            assert_eq!(column[[5, 3, 1][channel]], 1.0);
        }
    }

    #[test]
    fn test_single_filter_allows_shared_index() {
        let weights = single_filter(3, [1, 1, 1]).unwrap();
        assert_eq!(weights.row(1).to_vec(), vec![1.0, 1.0, 1.0]);
        assert_eq!(weights.sum(), 3.0);
    }

    #[test]
    fn test_single_filter_rejects_index_out_of_range() {
        assert!(matches!(
            single_filter(4, [4, 1, 0]),
            Err(CocoError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_default_single_filter_uses_last_middle_first() {
        let wavelengths = Array1::linspace(500.0, 600.0, 9);
        let spec = default_spec(wavelengths.len());
        assert_eq!(spec, FilterSpec::Single { r: 8, g: 4, b: 0 });
        let weights = build_filter(wavelengths.view(), &spec).unwrap();
        assert_eq!(weights[[8, 0]], 1.0);
        assert_eq!(weights[[4, 1]], 1.0);
        assert_eq!(weights[[0, 2]], 1.0);
    }

    #[test]
    fn test_default_single_filter_on_single_sample_axis() {
        let weights = single_filter(1, [0, 0, 0]).unwrap();
        assert_eq!(default_spec(1), FilterSpec::Single { r: 0, g: 0, b: 0 });
        assert_eq!(weights.row(0).to_vec(), vec![1.0, 1.0, 1.0]);
    }
}
