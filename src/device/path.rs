//! Slash-joined path handling for files on the target device.
//!
//! Remote paths always use `/` separators regardless of the host platform,
//! so they are kept as a dedicated newtype rather than reusing host path
//! types whose separator behaviour is platform dependent.

use core::fmt::{self, Display};
use core::str::FromStr;

/// Owned, `/`-separated path on the target device.
///
/// Joining follows POSIX semantics: joining an absolute component discards
/// the base, and a single separator is inserted otherwise.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RemotePathBuf(String);

impl RemotePathBuf {
    /// Creates a remote path from the given string, trimming any trailing
    /// separators (the root path `/` is preserved).
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        let mut inner: String = path.into();
        while inner.len() > 1 && inner.ends_with('/') {
            inner.pop();
        }
        Self(inner)
    }

    /// Returns the path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Joins `component` onto this path.
    ///
    /// An absolute `component` replaces the base entirely, matching POSIX
    /// join semantics.
    #[must_use]
    pub fn join(&self, component: &str) -> Self {
        if component.starts_with('/') || self.0.is_empty() {
            return Self::new(component);
        }
        if self.0.ends_with('/') {
            return Self::new(format!("{}{component}", self.0));
        }
        Self::new(format!("{}/{component}", self.0))
    }

    /// Returns the final path component, if any.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        let name = self.0.rsplit('/').next()?;
        if name.is_empty() { None } else { Some(name) }
    }

    /// Returns the path with the final component removed.
    ///
    /// The root path and single-component relative paths have no parent.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let (base, name) = self.0.rsplit_once('/')?;
        if name.is_empty() {
            return None;
        }
        if base.is_empty() {
            return Some(Self(String::from("/")));
        }
        Some(Self::new(base))
    }

    /// Returns `true` when the path starts at the device root.
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        self.0.starts_with('/')
    }
}

impl Display for RemotePathBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RemotePathBuf {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for RemotePathBuf {
    fn from(path: String) -> Self {
        Self::new(path)
    }
}

impl FromStr for RemotePathBuf {
    type Err = core::convert::Infallible;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(path))
    }
}

impl AsRef<str> for RemotePathBuf {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
