//! Free/fixed parameter bookkeeping.
//!
//! Optimizers work on the free coefficients only. `FreeParameters` records
//! which indices of the full vector are free so values can be packed for the
//! optimizer and written back without touching fixed entries.

use crate::error::RateError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreeParameters {
    indices: Vec<usize>,
    n_params: usize,
}

impl FreeParameters {
    /// `mask[i] == true` marks index `i` as fixed.
    pub fn from_mask(mask: &[bool]) -> Self {
        let indices = mask
            .iter()
            .enumerate()
            .filter_map(|(i, fixed)| (!fixed).then_some(i))
            .collect();
        Self {
            indices,
            n_params: mask.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Free values of `full`, in index order.
    pub fn pack(&self, full: &[f64]) -> Vec<f64> {
        self.indices.iter().map(|&i| full[i]).collect()
    }

    /// Write `free` into the free slots of `full`.
    pub fn unpack(&self, free: &[f64], full: &mut [f64]) -> Result<(), RateError> {
        if full.len() != self.n_params {
            return Err(RateError::ParameterLength {
                expected: self.n_params,
                actual: full.len(),
            });
        }
        if free.len() != self.indices.len() {
            return Err(RateError::ParameterLength {
                expected: self.indices.len(),
                actual: free.len(),
            });
        }
        for (&i, &v) in self.indices.iter().zip(free) {
            full[i] = v;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_and_unpack_touch_only_free_slots() {
        let mask = [false, true, true, false, false, false, true];
        let free = FreeParameters::from_mask(&mask);
        assert_eq!(free.indices(), &[0, 3, 4, 5]);

        let mut full = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        assert_eq!(free.pack(&full), vec![1.0, 4.0, 5.0, 6.0]);

        free.unpack(&[10.0, 40.0, 50.0, 60.0], &mut full).unwrap();
        assert_eq!(full, vec![10.0, 2.0, 3.0, 40.0, 50.0, 60.0, 7.0]);
    }

    #[test]
    fn unpack_checks_lengths() {
        let free = FreeParameters::from_mask(&[false, true]);
        let mut full = vec![0.0; 2];
        assert!(free.unpack(&[1.0, 2.0], &mut full).is_err());
        let mut short = vec![0.0; 1];
        assert!(free.unpack(&[1.0], &mut short).is_err());
    }

    #[test]
    fn all_fixed_mask_is_empty() {
        let free = FreeParameters::from_mask(&[true; 7]);
        assert!(free.is_empty());
        assert!(free.pack(&[0.0; 7]).is_empty());
    }
}
