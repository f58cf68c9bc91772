use chrono::Local;
use secrecy::{ExposeSecret as _, SecretString};

use crate::xml::Element;

/// Immutable account credentials for the integrator endpoints.
///
/// Held for the lifetime of one client instance; there is no rotation or
/// refresh. The calculator endpoint does not use them at all.
#[derive(Clone, Debug)]
pub struct Credentials {
    account: String,
    secret: SecretString,
}

impl Credentials {
    pub fn new(account: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            secret: SecretString::from(secret.into()),
        }
    }

    #[must_use]
    pub fn account(&self) -> &str {
        &self.account
    }

    /// Hex MD5 digest of `"{date}&{secret}"`, the provider's per-request
    /// authentication token. Pure function of its two inputs.
    #[must_use]
    pub fn make_secure(&self, date: &str) -> String {
        let digest = md5::compute(format!("{date}&{}", self.secret.expose_secret()));
        format!("{digest:x}")
    }

    /// Stamps `Date`, `Account` and `Secure` onto a request root using the
    /// current local time.
    ///
    /// Shared by the wrapped XML path and the inline print path so the two
    /// never diverge. Malformed credentials are not an error here; they
    /// simply produce a digest the remote service rejects.
    pub fn sign(&self, element: &mut Element) {
        self.sign_with_date(element, &local_timestamp());
    }

    /// Like [`Credentials::sign`] with a caller-supplied timestamp.
    ///
    /// The same date string must feed both the `Date` attribute and the
    /// digest input; a mismatch invalidates the signature.
    pub fn sign_with_date(&self, element: &mut Element, date: &str) {
        element.set_attr("Date", date);
        element.set_attr("Account", self.account.clone());
        element.set_attr("Secure", self.make_secure(date));
    }
}

/// Current local time as an ISO-8601 timestamp, the form the provider
/// expects in `Date` attributes and digest inputs.
pub(crate) fn local_timestamp() -> String {
    Local::now()
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}
