/// Shifts charges so they sum to zero, moving each charge in proportion to its magnitude.
///
/// `q_i' = q_i - |q_i| * (sum(q) / sum(|q|))`. Returns the input unchanged when every
/// charge is zero. Order is preserved.
pub fn neutralize(charges: &[f64]) -> Vec<f64> {
    let net: f64 = charges.iter().sum();
    let total_magnitude: f64 = charges.iter().map(|q| q.abs()).sum();
    if total_magnitude == 0.0 {
        return charges.to_vec();
    }
    let ratio = net / total_magnitude;
    charges.iter().map(|q| q - q.abs() * ratio).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutralize_makes_net_charge_zero() {
        let charges = [0.5, -0.2, 0.3, -0.4];
        let neutral = neutralize(&charges);
        assert_eq!(neutral.len(), charges.len());
        assert!(neutral.iter().sum::<f64>().abs() < 1e-12);
    }

    #[test]
    fn neutralize_preserves_order_and_signs_of_small_offsets() {
        let charges = [0.41, -0.8, 0.4];
        let neutral = neutralize(&charges);
        assert!(neutral[0] > 0.0 && neutral[2] > 0.0);
        assert!(neutral[1] < 0.0);
        assert!(neutral[0] > neutral[2]);
    }

    #[test]
    fn neutralize_keeps_already_neutral_charges() {
        let charges = [0.4, -0.8, 0.4];
        assert_eq!(neutralize(&charges), charges.to_vec());
    }

    #[test]
    fn neutralize_handles_all_zero_and_empty_input() {
        assert_eq!(neutralize(&[0.0, 0.0]), vec![0.0, 0.0]);
        assert!(neutralize(&[]).is_empty());
    }
}
