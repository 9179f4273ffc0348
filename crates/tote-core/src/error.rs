//! # Error Types
//!
//! The closed error taxonomy shared by every layer, plus the domain errors
//! raised inside tote-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  What the UI sees (this file)                                          │
//! │  └── ErrorKind        - closed set, one localized template each        │
//! │                                                                         │
//! │  What data sources raise (never crosses the boundary)                  │
//! │  ├── CoreError / ValidationError   (tote-core)                         │
//! │  ├── DbError                       (tote-db)                           │
//! │  └── RemoteError / VendorError     (tote-remote)                       │
//! │                                                                         │
//! │  Flow: crate error ──FailureCause──► ErrorKind ──► Response::Failure   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (id, field, etc.)
//! 3. The UI branches on `ErrorKind` only, never on crate errors
//! 4. Each `ErrorKind` maps to exactly one user-facing template per locale

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// Locale
// =============================================================================

/// Languages the message templates are available in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Es,
}

impl FromStr for Locale {
    type Err = ValidationError;

    /// Accepts bare language codes and region-qualified tags
    /// (`es`, `es-MX`, `en_US`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let language = s
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        match language.as_str() {
            "en" => Ok(Locale::En),
            "es" => Ok(Locale::Es),
            _ => Err(ValidationError::NotAllowed {
                field: "locale".to_string(),
                allowed: vec!["en".to_string(), "es".to_string()],
            }),
        }
    }
}

// =============================================================================
// Error Kind
// =============================================================================

/// The user-facing failure identifier carried by `Response::Failure`.
///
/// ## User Workflow
/// ```text
/// Tap "Add to cart"
///      │
///      ▼
/// CartSource::add ──► sqlx error ──► guard() logs it
///      │
///      ▼
/// Response::Failure(ErrorKind::Unknown)
///      │
///      ▼
/// Toast: "Something went wrong. Please try again."
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Connectivity or transport failure.
    Network,
    /// Anything not classified more precisely. The cause is only logged.
    Unknown,
    /// Wrong email/password pair.
    InvalidCredentials,
    /// An account already exists for that email.
    AccountExists,
    /// Password rejected by the identity service or local rules.
    WeakPassword,
    InvalidEmail,
    InvalidPhoneNumber,
    /// Sensitive mutation attempted without a fresh sign-in.
    RecentLoginRequired,
    InvalidVerificationCode,
    NotSignedIn,
    TooManyRequests,
    /// Cart quantity outside the allowed range.
    QuantityOutOfRange,
    /// Input rejected by local validation.
    InvalidInput,
}

impl ErrorKind {
    /// Stable key used to look the message up in a resource bundle.
    pub const fn message_key(&self) -> &'static str {
        match self {
            ErrorKind::Network => "error_network",
            ErrorKind::Unknown => "error_unknown",
            ErrorKind::InvalidCredentials => "error_invalid_credentials",
            ErrorKind::AccountExists => "error_account_exists",
            ErrorKind::WeakPassword => "error_weak_password",
            ErrorKind::InvalidEmail => "error_invalid_email",
            ErrorKind::InvalidPhoneNumber => "error_invalid_phone_number",
            ErrorKind::RecentLoginRequired => "error_recent_login_required",
            ErrorKind::InvalidVerificationCode => "error_invalid_verification_code",
            ErrorKind::NotSignedIn => "error_not_signed_in",
            ErrorKind::TooManyRequests => "error_too_many_requests",
            ErrorKind::QuantityOutOfRange => "error_quantity_out_of_range",
            ErrorKind::InvalidInput => "error_invalid_input",
        }
    }

    /// Human-readable template for the given locale.
    pub const fn message(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::En => match self {
                ErrorKind::Network => "No internet connection. Check your network and try again.",
                ErrorKind::Unknown => "Something went wrong. Please try again.",
                ErrorKind::InvalidCredentials => "Email or password is incorrect.",
                ErrorKind::AccountExists => "An account with this email already exists.",
                ErrorKind::WeakPassword => "Password must be at least 6 characters.",
                ErrorKind::InvalidEmail => "Please enter a valid email address.",
                ErrorKind::InvalidPhoneNumber => "Please enter a valid phone number.",
                ErrorKind::RecentLoginRequired => "Please sign in again to continue.",
                ErrorKind::InvalidVerificationCode => "The verification code is not valid.",
                ErrorKind::NotSignedIn => "You need to sign in first.",
                ErrorKind::TooManyRequests => "Too many attempts. Please wait and try again.",
                ErrorKind::QuantityOutOfRange => "Quantity must be between 1 and 10.",
                ErrorKind::InvalidInput => "Please check the information you entered.",
            },
            Locale::Es => match self {
                ErrorKind::Network => "Sin conexión a internet. Revisa tu red e inténtalo de nuevo.",
                ErrorKind::Unknown => "Algo salió mal. Inténtalo de nuevo.",
                ErrorKind::InvalidCredentials => "El correo o la contraseña no son correctos.",
                ErrorKind::AccountExists => "Ya existe una cuenta con este correo.",
                ErrorKind::WeakPassword => "La contraseña debe tener al menos 6 caracteres.",
                ErrorKind::InvalidEmail => "Introduce un correo electrónico válido.",
                ErrorKind::InvalidPhoneNumber => "Introduce un número de teléfono válido.",
                ErrorKind::RecentLoginRequired => "Vuelve a iniciar sesión para continuar.",
                ErrorKind::InvalidVerificationCode => "El código de verificación no es válido.",
                ErrorKind::NotSignedIn => "Primero tienes que iniciar sesión.",
                ErrorKind::TooManyRequests => "Demasiados intentos. Espera e inténtalo de nuevo.",
                ErrorKind::QuantityOutOfRange => "La cantidad debe estar entre 1 y 10.",
                ErrorKind::InvalidInput => "Revisa los datos que has introducido.",
            },
        }
    }

    /// Returns true for connectivity failures.
    pub const fn is_network(&self) -> bool {
        matches!(self, ErrorKind::Network)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message_key())
    }
}

// =============================================================================
// Failure Cause
// =============================================================================

/// An error that knows which `ErrorKind` it surfaces as.
///
/// Implemented by every crate error so `guard` can classify it without
/// the caller ever matching on error types.
pub trait FailureCause: fmt::Display {
    fn error_kind(&self) -> ErrorKind;
}

impl FailureCause for ErrorKind {
    fn error_kind(&self) -> ErrorKind {
        *self
    }
}

// =============================================================================
// Core Error
// =============================================================================

/// Domain errors raised by tote-core itself.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Price text could not be turned into money.
    ///
    /// ## When This Occurs
    /// - Catalog returns `"12.999"` (more than two decimals)
    /// - Catalog returns `"-3"` or `"free"`
    #[error("Invalid price '{value}': {reason}")]
    InvalidPrice { value: String, reason: String },

    /// A total does not fit in `Money`.
    #[error("Amount overflow while computing {what}")]
    AmountOverflow { what: &'static str },

    /// Cart quantity outside `MIN_CART_QUANTITY..=MAX_CART_QUANTITY`.
    #[error("Quantity {requested} must be between {min} and {max}")]
    QuantityOutOfRange { requested: i64, min: i64, max: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl FailureCause for CoreError {
    fn error_kind(&self) -> ErrorKind {
        match self {
            CoreError::InvalidPrice { .. } | CoreError::AmountOverflow { .. } => ErrorKind::Unknown,
            CoreError::QuantityOutOfRange { .. } => ErrorKind::QuantityOutOfRange,
            CoreError::Validation(e) => e.error_kind(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before a request leaves the device, so the identity service
/// never sees obviously malformed input.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., malformed email, phone number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

impl ValidationError {
    fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooShort { field, .. }
            | ValidationError::TooLong { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::NotAllowed { field, .. } => field,
        }
    }
}

impl FailureCause for ValidationError {
    fn error_kind(&self) -> ErrorKind {
        match self.field() {
            "email" => ErrorKind::InvalidEmail,
            "password" => ErrorKind::WeakPassword,
            "phone_number" => ErrorKind::InvalidPhoneNumber,
            "verification_code" => ErrorKind::InvalidVerificationCode,
            "quantity" => ErrorKind::QuantityOutOfRange,
            _ => ErrorKind::InvalidInput,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
