use rust_decimal::Decimal;

use super::dilution_model::{DilutionSeverity, SeverityBands};

/// Rates a relative dilution percent against the canonical 5/15/30 bands.
pub fn get_dilution_severity(dilution_percent: Decimal) -> DilutionSeverity {
    SeverityBands::default().classify(dilution_percent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dilution::dilution_model::SeverityLevel;
    use rust_decimal_macros::dec;

    #[test]
    fn test_band_boundaries() {
        assert_eq!(get_dilution_severity(dec!(0)).level, SeverityLevel::Low);
        assert_eq!(get_dilution_severity(dec!(4.99)).level, SeverityLevel::Low);
        assert_eq!(get_dilution_severity(dec!(5)).level, SeverityLevel::Medium);
        assert_eq!(get_dilution_severity(dec!(14.99)).level, SeverityLevel::Medium);
        assert_eq!(get_dilution_severity(dec!(15)).level, SeverityLevel::High);
        assert_eq!(get_dilution_severity(dec!(29.99)).level, SeverityLevel::High);
        assert_eq!(get_dilution_severity(dec!(30)).level, SeverityLevel::Severe);
        assert_eq!(get_dilution_severity(dec!(100)).level, SeverityLevel::Severe);
    }

    #[test]
    fn test_severity_carries_description_and_color() {
        let severity = get_dilution_severity(dec!(31));
        assert_eq!(severity.color, "red");
        assert!(severity.description.starts_with("Severe"));

        let severity = get_dilution_severity(dec!(1));
        assert_eq!(severity.color, "green");
    }
}
