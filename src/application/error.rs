use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0} name is required")]
    NameRequired(&'static str),

    #[error("A customer must be selected for the service")]
    CustomerRequired,

    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    #[error("Material not found: {0}")]
    MaterialNotFound(String),

    #[error("Service type not found: {0}")]
    ServiceTypeNotFound(String),

    #[error("Service record not found: {0}")]
    ServiceNotFound(String),

    #[error("Line item quantity must be at least 1")]
    InvalidQuantity,

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}
