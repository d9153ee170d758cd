//! Redacting wrapper for credential material
//!
//! Access tokens handed to the object store must never end up in a log line
//! or an error message. `Sensitive<T>` prints as a fixed marker and only
//! yields its content through an explicit `expose()` call.

use std::fmt;

const REDACTED: &str = "***REDACTED***";

/// Wrapper for secret values that redacts itself in Debug and Display
///
/// ```
/// use delproof_core_types::Sensitive;
///
/// let token = Sensitive::new("ya29.secret".to_string());
/// assert_eq!(format!("{:?}", token), "***REDACTED***");
/// assert_eq!(token.expose(), "ya29.secret");
/// ```
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Borrow the secret. Call sites should pass the value straight to the
    /// consumer (an HTTP header, say) and not keep it around.
    pub fn expose(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }

    /// Transform the secret without exposing it to a formatter
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Sensitive<U> {
        Sensitive(f(self.0))
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T: Clone> Clone for Sensitive<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}
