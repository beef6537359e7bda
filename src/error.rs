use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed credential record")]
    InvalidRecord,
    #[error("username already registered: {0}")]
    AlreadyExists(String),
    #[error("random source failure")]
    Rng(#[from] rand::Error),
}
