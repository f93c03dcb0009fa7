//! # Framework Errors

/// Errors raised by the actor plumbing, plus a carrier for entity errors.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Entity error: {0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
}

impl FrameworkError {
    /// Recovers the typed entity error carried by [`FrameworkError::EntityError`].
    ///
    /// Returns `Err(self)` for plumbing errors or when the carried error is of another type.
    pub fn into_entity_error<E>(self) -> Result<E, FrameworkError>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        match self {
            FrameworkError::EntityError(inner) => match inner.downcast::<E>() {
                Ok(typed) => Ok(*typed),
                Err(other) => Err(FrameworkError::EntityError(other)),
            },
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, thiserror::Error)]
    #[error("out of stock")]
    struct OutOfStock;

    #[test]
    fn test_into_entity_error_recovers_typed_error() {
        let err = FrameworkError::EntityError(Box::new(OutOfStock));
        assert_eq!(err.into_entity_error::<OutOfStock>().unwrap(), OutOfStock);
    }

    #[test]
    fn test_into_entity_error_keeps_plumbing_errors() {
        let err = FrameworkError::ActorClosed;
        assert!(matches!(
            err.into_entity_error::<OutOfStock>(),
            Err(FrameworkError::ActorClosed)
        ));
    }

    #[test]
    fn test_into_entity_error_keeps_foreign_entity_errors() {
        let err = FrameworkError::EntityError(Box::new(std::io::Error::other("disk")));
        match err.into_entity_error::<OutOfStock>() {
            Err(FrameworkError::EntityError(inner)) => assert_eq!(inner.to_string(), "disk"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
