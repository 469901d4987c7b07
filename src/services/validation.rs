//! Pure field validators for the registration and profile forms. Each one
//! returns the normalized value (digits only, lowercased email) or a
//! user-facing message for inline display.

pub fn strip_digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// CPF: 11 digits, not a repeated sequence, both mod-11 check digits valid.
/// Accepts masked ("123.456.789-09") and bare input.
pub fn validate_cpf(raw: &str) -> Result<String, &'static str> {
    let digits = strip_digits(raw);
    if digits.len() != 11 {
        return Err("CPF deve ter 11 dígitos");
    }
    let d: Vec<u32> = digits.chars().filter_map(|c| c.to_digit(10)).collect();
    if d.iter().all(|&x| x == d[0]) {
        return Err("CPF inválido");
    }

    let check = |len: usize| -> u32 {
        let sum: u32 = d[..len]
            .iter()
            .enumerate()
            .map(|(i, &digit)| digit * (len as u32 + 1 - i as u32))
            .sum();
        let rem = (sum * 10) % 11;
        if rem == 10 {
            0
        } else {
            rem
        }
    };

    if check(9) != d[9] || check(10) != d[10] {
        return Err("CPF inválido");
    }
    Ok(digits)
}

/// CEP: 8 digits after stripping the mask ("01310-100").
pub fn validate_cep(raw: &str) -> Result<String, &'static str> {
    let digits = strip_digits(raw);
    if digits.len() != 8 {
        return Err("CEP deve ter 8 dígitos");
    }
    Ok(digits)
}

/// Phone: 10 or 11 digits (DDD + number), DDD from 11 up.
pub fn validate_phone(raw: &str) -> Result<String, &'static str> {
    let digits = strip_digits(raw);
    if digits.len() != 10 && digits.len() != 11 {
        return Err("Telefone deve ter DDD + 8 ou 9 dígitos");
    }
    let ddd: u32 = digits[..2].parse().unwrap_or(0);
    if ddd < 11 {
        return Err("DDD inválido");
    }
    Ok(digits)
}

pub fn validate_email(raw: &str) -> Result<String, &'static str> {
    let email = raw.trim().to_lowercase();
    let Some((local, domain)) = email.split_once('@') else {
        return Err("E-mail inválido");
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') || !domain.contains('.') {
        return Err("E-mail inválido");
    }
    Ok(email)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordStrength {
    Weak,
    Medium,
    Strong,
}

impl PasswordStrength {
    pub fn as_str(self) -> &'static str {
        match self {
            PasswordStrength::Weak => "fraca",
            PasswordStrength::Medium => "média",
            PasswordStrength::Strong => "forte",
        }
    }
}

/// Length plus character-class mix. Under 8 chars is always weak; 3 of the 4
/// classes make it acceptable, all 4 plus 12 chars make it strong.
pub fn password_strength(password: &str) -> PasswordStrength {
    if password.chars().count() < 8 {
        return PasswordStrength::Weak;
    }
    let has_lower = password.chars().any(|c| c.is_lowercase());
    let has_upper = password.chars().any(|c| c.is_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_other = password
        .chars()
        .any(|c| !c.is_alphanumeric() && !c.is_whitespace());
    let classes = [has_lower, has_upper, has_digit, has_other]
        .iter()
        .filter(|&&b| b)
        .count();

    if classes == 4 && password.chars().count() >= 12 {
        PasswordStrength::Strong
    } else if classes >= 3 {
        PasswordStrength::Medium
    } else {
        PasswordStrength::Weak
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpf_accepts_masked_and_bare_valid_numbers() {
        assert_eq!(validate_cpf("529.982.247-25").unwrap(), "52998224725");
        assert_eq!(validate_cpf("52998224725").unwrap(), "52998224725");
    }

    #[test]
    fn cpf_rejects_bad_check_digits_and_repeats() {
        assert!(validate_cpf("529.982.247-26").is_err());
        assert!(validate_cpf("111.111.111-11").is_err());
        assert!(validate_cpf("123").is_err());
    }

    #[test]
    fn cep_wants_exactly_eight_digits() {
        assert_eq!(validate_cep("01310-100").unwrap(), "01310100");
        assert!(validate_cep("0131").is_err());
        assert!(validate_cep("01310-1000").is_err());
    }

    #[test]
    fn phone_accepts_landline_and_mobile_lengths() {
        assert_eq!(validate_phone("(11) 98765-4321").unwrap(), "11987654321");
        assert_eq!(validate_phone("1133334444").unwrap(), "1133334444");
        assert!(validate_phone("987654321").is_err());
        assert!(validate_phone("(01) 98765-4321").is_err());
    }

    #[test]
    fn email_requires_local_and_dotted_domain() {
        assert_eq!(validate_email(" Atleta@Example.COM ").unwrap(), "atleta@example.com");
        assert!(validate_email("sem-arroba").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("a@semponto").is_err());
    }

    #[test]
    fn password_strength_tiers() {
        assert_eq!(password_strength("curta1!"), PasswordStrength::Weak);
        assert_eq!(password_strength("somenteletras"), PasswordStrength::Weak);
        assert_eq!(password_strength("Senha123"), PasswordStrength::Medium);
        assert_eq!(password_strength("Senha123!Forte"), PasswordStrength::Strong);
    }
}
