pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PASSWORD_LEN: usize = 128;

#[derive(Debug, Clone, PartialEq)]
pub enum PasswordPolicyError {
    TooShort,
    TooLong,
    MissingUppercase,
    MissingLowercase,
    MissingDigit,
}

impl std::fmt::Display for PasswordPolicyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PasswordPolicyError::TooShort => {
                write!(f, "Password must be at least {} characters", MIN_PASSWORD_LEN)
            }
            PasswordPolicyError::TooLong => {
                write!(f, "Password must be at most {} characters", MAX_PASSWORD_LEN)
            }
            PasswordPolicyError::MissingUppercase => {
                write!(f, "Password must contain an uppercase letter")
            }
            PasswordPolicyError::MissingLowercase => {
                write!(f, "Password must contain a lowercase letter")
            }
            PasswordPolicyError::MissingDigit => write!(f, "Password must contain a digit"),
        }
    }
}

impl std::error::Error for PasswordPolicyError {}

/// Minimum strength requirements for new passwords (register and reset).
/// Login deliberately accepts anything non-empty, so accounts created
/// under an older policy can still sign in.
pub fn validate_password(password: &str) -> Result<(), PasswordPolicyError> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LEN {
        return Err(PasswordPolicyError::TooShort);
    }
    if len > MAX_PASSWORD_LEN {
        return Err(PasswordPolicyError::TooLong);
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(PasswordPolicyError::MissingUppercase);
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(PasswordPolicyError::MissingLowercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(PasswordPolicyError::MissingDigit);
    }
    Ok(())
}
