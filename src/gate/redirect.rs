//! Login redirect construction.
//!
//! The return path is always the path of the request being gated. No
//! client-supplied return URL is ever read, and the login path is checked at
//! config load to be a local absolute path, so the result stays same-origin.

use url::form_urlencoded;

pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_REDIRECT_PARAM: &str = "redirect";

/// Builds `<login_path>?<param>=<encoded original path>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectBuilder {
    login_path: String,
    param: String,
}

impl RedirectBuilder {
    pub fn new(login_path: impl Into<String>, param: impl Into<String>) -> Self {
        Self {
            login_path: login_path.into(),
            param: param.into(),
        }
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn param(&self) -> &str {
        &self.param
    }

    /// Location for a visitor who asked for `original` (path plus query).
    pub fn location_for(&self, original: &str) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair(&self.param, original)
            .finish();
        format!("{}?{}", self.login_path, query)
    }

    /// Recover the return path from a location built by [`location_for`].
    ///
    /// [`location_for`]: RedirectBuilder::location_for
    pub fn return_path(&self, location: &str) -> Option<String> {
        let (_, query) = location.split_once('?')?;
        form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == self.param.as_str())
            .map(|(_, value)| value.into_owned())
    }
}

impl Default for RedirectBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_LOGIN_PATH, DEFAULT_REDIRECT_PARAM)
    }
}
