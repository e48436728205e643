//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos.

use chrono::NaiveDate;
use validator::ValidationError;

/// Validar que el rango de fechas esté bien ordenado (pickup <= return)
pub fn validate_date_range(pickup: NaiveDate, ret: NaiveDate) -> Result<(), ValidationError> {
    if pickup > ret {
        let mut error = ValidationError::new("date_range");
        error.add_param("pickup_date".into(), &pickup.to_string());
        error.add_param("return_date".into(), &ret.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_range_requires_pickup_before_or_equal_return() {
        let jan_10 = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let jan_15 = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();

        assert!(validate_date_range(jan_10, jan_15).is_ok());
        // mismo día es válido (cargo mínimo de 1 día)
        assert!(validate_date_range(jan_10, jan_10).is_ok());
        assert!(validate_date_range(jan_15, jan_10).is_err());
    }

    #[test]
    fn not_empty_rejects_whitespace() {
        assert!(validate_not_empty("Madrid").is_ok());
        assert!(validate_not_empty("   ").is_err());
    }
}
