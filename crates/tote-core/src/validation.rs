//! # Validation Module
//!
//! Input checks applied before a request leaves the device.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: State holder                                                 │
//! │  └── Cart quantity guard (1..=10)                                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Data source (Rust)                                           │
//! │  └── THIS MODULE: email, password, phone, code, quantity               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Store / service                                              │
//! │  ├── SQLite PRIMARY KEY and CHECK constraints                          │
//! │  └── Identity service rules                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::{MAX_CART_QUANTITY, MIN_CART_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Minimum password length accepted by the identity service.
pub const MIN_PASSWORD_LENGTH: usize = 6;

const MAX_DISPLAY_NAME_LENGTH: usize = 50;

/// Validates an email address.
///
/// ## Rules
/// - Not empty, no whitespace
/// - Exactly one `@` with a non-empty local part
/// - Domain contains a dot that is neither first nor last
///
/// ```rust
/// use tote_core::validation::validate_email;
///
/// assert!(validate_email("ada@example.com").is_ok());
/// assert!(validate_email("ada@example").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();
    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: reason.to_string(),
    };

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }
    if email.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain spaces"));
    }

    let (local, domain) = email.split_once('@').ok_or_else(|| invalid("missing @"))?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid("must contain a single @ after the name"));
    }
    match domain.rfind('.') {
        Some(dot) if dot > 0 && dot < domain.len() - 1 => Ok(()),
        _ => Err(invalid("domain must look like example.com")),
    }
}

/// Validates a password against the identity service minimum.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LENGTH,
        });
    }
    Ok(())
}

/// Validates a display name: non-empty after trimming, at most 50 chars.
pub fn validate_display_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "display_name".to_string(),
        });
    }
    if name.chars().count() > MAX_DISPLAY_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "display_name".to_string(),
            max: MAX_DISPLAY_NAME_LENGTH,
        });
    }
    Ok(())
}

/// Validates an E.164 phone number (`+` followed by 8 to 15 digits).
///
/// ```rust
/// use tote_core::validation::validate_phone_number;
///
/// assert!(validate_phone_number("+905551112233").is_ok());
/// assert!(validate_phone_number("5551112233").is_err());
/// ```
pub fn validate_phone_number(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();

    if phone.is_empty() {
        return Err(ValidationError::Required {
            field: "phone_number".to_string(),
        });
    }

    let digits = phone
        .strip_prefix('+')
        .ok_or_else(|| ValidationError::InvalidFormat {
            field: "phone_number".to_string(),
            reason: "must start with + and the country code".to_string(),
        })?;

    if !(8..=15).contains(&digits.len()) || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "phone_number".to_string(),
            reason: "must contain 8 to 15 digits".to_string(),
        });
    }
    Ok(())
}

/// Validates an SMS verification code (exactly six digits).
pub fn validate_verification_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.len() != 6 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "verification_code".to_string(),
            reason: "must be 6 digits".to_string(),
        });
    }
    Ok(())
}

/// Validates a cart quantity.
///
/// ## Rules
/// - Must be between `MIN_CART_QUANTITY` and `MAX_CART_QUANTITY` (1 and 10)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if !(MIN_CART_QUANTITY..=MAX_CART_QUANTITY).contains(&qty) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: MIN_CART_QUANTITY,
            max: MAX_CART_QUANTITY,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
