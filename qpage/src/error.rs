/// Failure to open or map a page.
#[derive(Debug)]
pub enum OpenError {
    Io(std::io::Error),
    /// The requested capacity does not leave room for the offset field to
    /// address it; see [`header::UNIT`](crate::header::UNIT).
    CapacityTooLarge { capacity: usize },
}

impl From<std::io::Error> for OpenError {
    fn from(err: std::io::Error) -> Self {
        OpenError::Io(err)
    }
}

impl std::fmt::Display for OpenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OpenError::Io(err) => write!(f, "failed to open shared page: {err}"),
            OpenError::CapacityTooLarge { capacity } => {
                write!(f, "requested capacity {capacity} does not fit the offset field")
            }
        }
    }
}

impl std::error::Error for OpenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OpenError::Io(err) => Some(err),
            OpenError::CapacityTooLarge { .. } => None,
        }
    }
}

/// The page has no room left for the requested message. Terminal for the page.
pub struct PageFull {
    pub(crate) _inner: (),
}

impl std::fmt::Debug for PageFull {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageFull").finish()
    }
}

impl std::fmt::Display for PageFull {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "page has no room left for this message")
    }
}

impl std::error::Error for PageFull {}
