use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Invalid TodoId: {0}")]
    InvalidTodoId(String),

    #[error("Invalid AssigneeId: {0}")]
    InvalidAssigneeId(String),

    #[error("Validation error: {0}")]
    Validation(String),
}
