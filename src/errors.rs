use std::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsErrorType {
    MissingArgument,
    RootAlreadyExists,
    CannotDeleteRoot,
    CannotRenameRoot,
    NoPathBeyondRoot,
    ParentNotFound,
    TargetNotFound,
    PathNotFound,
    FileNotFound,
    NameTaken,
    RenameConflict,
    NotADirectory,
    NotAFile,
    InvalidName,
    InvalidArgument,
    InvalidDestination,
    CommandNotFound,
    IOError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsError {
    pub error_type: FsErrorType,
    pub message: String,
}

impl FsError {
    pub fn new(error_type: FsErrorType, message: String) -> Self {
        Self {
            error_type,
            message,
        }
    }

    pub fn missing_argument(name: &str) -> Self {
        Self::new(
            FsErrorType::MissingArgument,
            format!("Missing argument: {}", name),
        )
    }

    pub fn kind(&self) -> FsErrorType {
        self.error_type
    }
}

impl std::fmt::Display for FsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.error_type, self.message)
    }
}

impl From<std::io::Error> for FsError {
    fn from(error: std::io::Error) -> Self {
        Self {
            error_type: FsErrorType::IOError,
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for FsError {
    fn from(error: serde_json::Error) -> Self {
        Self {
            error_type: FsErrorType::IOError,
            message: error.to_string(),
        }
    }
}

impl Error for FsError {}

pub type Result<T> = std::result::Result<T, FsError>;
