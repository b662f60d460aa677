use crate::data::linear_algebra::SparseTuple;
use crate::data::linear_algebra::vector::DenseVector;

/// Update column or "file".
///
/// Represents the matrix `E`, which is the identity with column `pivot` replaced by `eta`. After a
/// column change, the basis matrix equals the previous one multiplied from the right by `E`.
#[derive(PartialEq, Clone, Debug)]
pub struct EtaFile {
    /// Values of `eta` other than the pivot value.
    values: Vec<SparseTuple<f64>>,
    pivot: usize,
    pivot_value: f64,
    len: usize,
}

impl EtaFile {
    /// Create a new instance.
    ///
    /// # Arguments
    ///
    /// * `values`: Entries of the column, excluding the one at index `pivot`.
    /// * `pivot`: Column of the identity that is replaced.
    /// * `pivot_value`: Value at `pivot`, nonzero.
    /// * `len`: Dimension of the matrix.
    pub fn new(values: Vec<SparseTuple<f64>>, pivot: usize, pivot_value: f64, len: usize) -> Self {
        debug_assert!(values.iter().all(|&(i, _)| i != pivot && i < len));
        debug_assert!(pivot < len);
        debug_assert_ne!(pivot_value, 0.0);

        Self {
            values,
            pivot,
            pivot_value,
            len,
        }
    }

    /// Solve `E x = vector` in place.
    pub fn apply_inverse_right(&self, vector: &mut DenseVector<f64>) {
        debug_assert_eq!(vector.len(), self.len);

        let x_pivot = vector[self.pivot] / self.pivot_value;
        vector[self.pivot] = x_pivot;
        vector.mult_add(-x_pivot, &self.values);
    }

    /// Solve `E^T x = vector` in place.
    pub fn apply_inverse_left(&self, vector: &mut DenseVector<f64>) {
        debug_assert_eq!(vector.len(), self.len);

        let rest = vector.inner_product_with_sparse(&self.values);
        vector[self.pivot] = (vector[self.pivot] - rest) / self.pivot_value;
    }

    /// Number of values stored.
    pub fn nonzeros(&self) -> usize {
        self.values.len() + 1
    }
}

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;

    use crate::algorithm::basis::factorization::lower_upper::eta_file::EtaFile;
    use crate::data::linear_algebra::vector::DenseVector;

    #[test]
    fn identity_column() {
        let eta = EtaFile::new(vec![], 1, 1.0, 3);
        let mut vector = DenseVector::new(vec![1.0, 2.0, 3.0]);
        eta.apply_inverse_right(&mut vector);
        assert_eq!(vector, DenseVector::new(vec![1.0, 2.0, 3.0]));
        eta.apply_inverse_left(&mut vector);
        assert_eq!(vector, DenseVector::new(vec![1.0, 2.0, 3.0]));
        assert_eq!(eta.nonzeros(), 1);
    }

    #[test]
    fn right() {
        // E = [[2, 0], [3, 1]], E x = (4, 7) gives x = (2, 1)
        let eta = EtaFile::new(vec![(1, 3.0)], 0, 2.0, 2);
        let mut vector = DenseVector::new(vec![4.0, 7.0]);
        eta.apply_inverse_right(&mut vector);
        assert_relative_eq!(vector[0], 2.0);
        assert_relative_eq!(vector[1], 1.0);
    }

    #[test]
    fn left() {
        // E^T = [[2, 3], [0, 1]], E^T x = (7, 1) gives x = (2, 1)
        let eta = EtaFile::new(vec![(1, 3.0)], 0, 2.0, 2);
        let mut vector = DenseVector::new(vec![7.0, 1.0]);
        eta.apply_inverse_left(&mut vector);
        assert_relative_eq!(vector[0], 2.0);
        assert_relative_eq!(vector[1], 1.0);
    }
}
