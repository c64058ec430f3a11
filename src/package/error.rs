/// Fatal errors raised by sniffer management.
///
/// These terminate the current command; they are never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnifferError {
    /// The sniffer name is not listed in the remote index
    NotFound(String),
    /// A package declared a phpcs branch other than the supported ones
    UnsupportedBranch(String),
}

impl std::fmt::Display for SnifferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnifferError::NotFound(name) => {
                write!(f, "The sniffer name \"{}\" is not exists!", name)
            }
            SnifferError::UnsupportedBranch(branch) => {
                write!(
                    f,
                    "Unsupported phpcs branch \"{}\" (supported: 1.x, 2.x)",
                    branch
                )
            }
        }
    }
}

impl std::error::Error for SnifferError {}
