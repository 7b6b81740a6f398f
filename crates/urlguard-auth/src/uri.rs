//! Target URIs for signing and validation.
//!
//! A [`TargetUri`] is either absolute (`https://host/path?q`) or relative
//! (`/path?q`). Both are held internally in resolved absolute form: absolute
//! inputs are normalized by a single parse/serialize pass, relative inputs are
//! resolved against a private placeholder base so that only their path and
//! query matter. The placeholder never appears in any output.

use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;

use url::{Position, Url};

use crate::canonical::{EXPIRES_PARAM, SIGNATURE_PARAM};
use crate::error::UriError;

/// Base used to resolve relative references.
const PLACEHOLDER_BASE: &str = "https://domain.invalid";

static PLACEHOLDER_BASE_URL: LazyLock<Url> =
    LazyLock::new(|| Url::parse(PLACEHOLDER_BASE).expect("placeholder base is a valid URL"));

/// A URI that can be signed or validated.
///
/// Displays in the same form it was parsed from: absolute inputs as full URLs,
/// relative inputs as path and query only. Fragments of relative inputs are
/// dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetUri {
    url: Url,
    relative: bool,
}

impl TargetUri {
    /// Parse an absolute URL or a relative reference.
    ///
    /// # Errors
    ///
    /// Returns [`UriError::Parse`] if the input cannot be parsed either way, or
    /// [`UriError::NotHierarchical`] for absolute URLs without a path (such as
    /// `mailto:` addresses).
    pub fn parse(input: &str) -> Result<Self, UriError> {
        match Url::parse(input) {
            Ok(url) => Self::from_url(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => Ok(Self {
                url: PLACEHOLDER_BASE_URL.join(input)?,
                relative: true,
            }),
            Err(e) => Err(UriError::Parse(e)),
        }
    }

    /// Wrap an already parsed absolute URL, refusing ones without a path.
    fn from_url(url: Url) -> Result<Self, UriError> {
        if url.cannot_be_a_base() {
            return Err(UriError::NotHierarchical(url.into()));
        }
        Ok(Self {
            url,
            relative: false,
        })
    }

    /// Whether the URI was given in absolute form.
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        !self.relative
    }

    /// The percent-encoded absolute path, without the query.
    #[must_use]
    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// The raw query string, if any.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.url.query()
    }

    /// The decoded value of the first query parameter named `name`.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<Cow<'_, str>> {
        self.url
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Return a copy carrying the given `sig` and `exp` parameters.
    ///
    /// Existing `sig` and `exp` pairs are removed; all other pairs keep their
    /// order and the two parameters are appended at the end.
    pub(crate) fn with_signature(&self, signature: &str, expires: i64) -> Self {
        let retained: Vec<(String, String)> = self
            .url
            .query_pairs()
            .filter(|(key, _)| key != SIGNATURE_PARAM && key != EXPIRES_PARAM)
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        let mut url = self.url.clone();
        url.query_pairs_mut()
            .clear()
            .extend_pairs(retained)
            .append_pair(SIGNATURE_PARAM, signature)
            .append_pair(EXPIRES_PARAM, &expires.to_string());

        Self {
            url,
            relative: self.relative,
        }
    }
}

impl fmt::Display for TargetUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.relative {
            f.write_str(&self.url[Position::BeforePath..Position::AfterQuery])
        } else {
            f.write_str(self.url.as_str())
        }
    }
}
