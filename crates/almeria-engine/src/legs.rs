//! Leg aggregation.

use crate::filter::Candidate;

/// Equal-weighted mean forward return of a leg.
///
/// An empty leg has no return. This is not the same as a zero-return day
/// and must not be reported as one.
pub fn leg_return(leg: &[&Candidate]) -> Option<f64> {
    if leg.is_empty() {
        return None;
    }

    Some(leg.iter().map(|c| c.forward_return).sum::<f64>() / leg.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn candidate(ret: f64) -> Candidate {
        Candidate {
            asset_id: "A".to_string(),
            score: 0.0,
            forward_return: ret,
        }
    }

    #[test]
    fn test_leg_return_mean() {
        let a = candidate(0.01);
        let b = candidate(0.03);
        let c = candidate(-0.01);
        assert_relative_eq!(leg_return(&[&a, &b, &c]).unwrap(), 0.01, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_leg_has_no_return() {
        assert_eq!(leg_return(&[]), None);
    }
}
