use rust_decimal::Decimal;
use validator::ValidationError;

// ---
// Validações customizadas usadas pelos payloads (validator `custom`)
// ---

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(invalid("blank", "O campo não pode ficar em branco."));
    }
    Ok(())
}

pub fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() {
        let mut err = invalid("range", "O valor não pode ser negativo.");
        err.add_param("min".into(), &0.0);
        return Err(err);
    }
    Ok(())
}

pub fn positive(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        return Err(invalid("range", "O valor deve ser maior que zero."));
    }
    Ok(())
}

pub fn percentage(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() || *value > Decimal::ONE_HUNDRED {
        return Err(invalid("range", "O percentual deve estar entre 0 e 100."));
    }
    Ok(())
}

pub fn non_zero(value: i32) -> Result<(), ValidationError> {
    if value == 0 {
        return Err(invalid("non_zero", "A quantidade não pode ser zero."));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn blank_strings_fail() {
        assert!(not_blank("   ").is_err());
        assert!(not_blank(" ok ").is_ok());
    }

    #[test]
    fn decimal_bounds() {
        assert!(positive(&Decimal::ZERO).is_err());
        assert!(non_negative(&Decimal::ZERO).is_ok());
        assert!(percentage(&Decimal::from_str("100.01").unwrap()).is_err());
        assert!(percentage(&Decimal::from_str("12.5").unwrap()).is_ok());
    }

    #[test]
    fn zero_delta_fails() {
        assert!(non_zero(0).is_err());
        assert!(non_zero(-3).is_ok());
    }
}
