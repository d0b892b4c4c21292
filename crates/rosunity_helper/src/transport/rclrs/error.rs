use rosunity_core::error::CoreError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("rclrs error: {0}")]
    Rclrs(#[from] ::rclrs::RclrsError),
    #[error("core error: {0}")]
    Core(#[from] CoreError),
}
