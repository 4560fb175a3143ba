use std::fmt;

#[derive(Debug)]
pub enum EngineError {
    /// The field held all four cards of a month after every allowed redeal.
    InvalidDeal { attempts: u32 },
    /// A decision was rejected: wrong phase, wrong actor, card not present.
    /// No state was mutated; the caller should re-prompt.
    IllegalAction { message: String },
    /// The engine was asked for something its current state cannot provide.
    InvalidState { message: String },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidDeal { attempts } => {
                write!(f, "no valid deal after {} attempts", attempts)
            }
            EngineError::IllegalAction { message } => {
                write!(f, "illegal action: {}", message)
            }
            EngineError::InvalidState { message } => {
                write!(f, "invalid state: {}", message)
            }
        }
    }
}

impl std::error::Error for EngineError {}

pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    pub(crate) fn illegal(message: impl Into<String>) -> Self {
        EngineError::IllegalAction {
            message: message.into(),
        }
    }
}
