// Error types shared by the network, queue, ledger and service

use thiserror::Error;

use crate::cargo::{CargoId, CityId, ClientId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("City not found: {0}")]
    CityNotFound(CityId),

    #[error("Client not found: {0}")]
    ClientNotFound(ClientId),

    #[error("Cargo not found: {0}")]
    CargoNotFound(CargoId),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Cargo id already in use: {0}")]
    DuplicateCargo(CargoId),

    #[error("City id already in network: {0}")]
    DuplicateCity(CityId),

    #[error("Client id already registered: {0}")]
    DuplicateClient(ClientId),

    #[error("Dispatch desk is shut down")]
    DeskClosed,
}

impl DispatchError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DispatchError::CityNotFound(_)
                | DispatchError::ClientNotFound(_)
                | DispatchError::CargoNotFound(_)
        )
    }

    // Duplicate ids are rejected input as far as callers are concerned
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            DispatchError::InvalidInput(_)
                | DispatchError::DuplicateCargo(_)
                | DispatchError::DuplicateCity(_)
                | DispatchError::DuplicateClient(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, DispatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(DispatchError::CityNotFound(CityId(9)).is_not_found());
        assert!(DispatchError::CargoNotFound(CargoId(1)).is_not_found());
        assert!(!DispatchError::CityNotFound(CityId(9)).is_invalid_input());

        assert!(DispatchError::InvalidInput("bad date".into()).is_invalid_input());
        assert!(DispatchError::DuplicateCargo(CargoId(3)).is_invalid_input());
        assert!(!DispatchError::DeskClosed.is_not_found());
        assert!(!DispatchError::DeskClosed.is_invalid_input());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            DispatchError::CityNotFound(CityId(42)).to_string(),
            "City not found: 42"
        );
        assert_eq!(
            DispatchError::InvalidInput("status ordinal 7".into()).to_string(),
            "Invalid input: status ordinal 7"
        );
    }
}
