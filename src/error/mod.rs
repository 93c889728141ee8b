mod app_error;

pub use app_error::{AppError, DUPLICATE_NAME, ErrorBody};

pub type Result<T> = std::result::Result<T, AppError>;
