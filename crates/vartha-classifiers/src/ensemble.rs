//! Ensemble aggregation over per-model probability vectors

/// Element-wise mean of equally sized probability vectors.
///
/// Returns `None` when `vectors` is empty or the widths disagree.
pub fn average(vectors: &[Vec<f32>]) -> Option<Vec<f32>> {
    let width = vectors.first()?.len();
    if vectors.iter().any(|v| v.len() != width) {
        return None;
    }

    let mut sums = vec![0.0_f32; width];
    for vector in vectors {
        for (sum, value) in sums.iter_mut().zip(vector) {
            *sum += value;
        }
    }

    let count = vectors.len() as f32;
    Some(sums.into_iter().map(|sum| sum / count).collect())
}

/// Index of the largest non-NaN entry; the first one wins ties
pub fn argmax(values: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (idx, &value) in values.iter().enumerate() {
        if value.is_nan() {
            continue;
        }
        match best {
            Some((_, current)) if value <= current => {}
            _ => best = Some((idx, value)),
        }
    }
    best.map(|(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: &[f32], expected: &[f32]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-6, "{:?} != {:?}", actual, expected);
        }
    }

    #[test]
    fn test_mean_of_two_models() {
        let mean = average(&[
            vec![0.1, 0.1, 0.1, 0.1, 0.6],
            vec![0.2, 0.2, 0.2, 0.2, 0.2],
        ])
        .unwrap();

        assert_close(&mean, &[0.15, 0.15, 0.15, 0.15, 0.4]);
        assert_eq!(argmax(&mean), Some(4));
        assert!((mean[4] - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_single_vector_is_identity() {
        let mean = average(&[vec![0.3, 0.7]]).unwrap();
        assert_close(&mean, &[0.3, 0.7]);
    }

    #[test]
    fn test_empty_and_ragged() {
        assert!(average(&[]).is_none());
        assert!(average(&[vec![0.5, 0.5], vec![1.0]]).is_none());
    }

    #[test]
    fn test_argmax_first_on_ties() {
        assert_eq!(argmax(&[0.2, 0.4, 0.4]), Some(1));
        assert_eq!(argmax(&[0.2; 5]), Some(0));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn test_argmax_skips_nan() {
        assert_eq!(argmax(&[f32::NAN, 0.1, 0.3]), Some(2));
        assert_eq!(argmax(&[0.3, f32::NAN]), Some(0));
        assert_eq!(argmax(&[f32::NAN]), None);
    }
}
