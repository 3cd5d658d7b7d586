use thiserror::Error;
use ulid::Ulid;

use crate::model::{BookingStatus, Minutes};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("not found: {0}")]
    NotFound(Ulid),
    #[error("invalid range [{start}, {end}): end must be after start and within the day")]
    InvalidRange { start: Minutes, end: Minutes },
    #[error("invalid time of day: {0:?}")]
    InvalidTime(String),
    #[error("invalid slot grid: {0}")]
    InvalidGrid(&'static str),
    #[error("invalid date window: {0}")]
    InvalidWindow(&'static str),
    #[error("duration must be positive")]
    InvalidDuration,
    #[error("unsupported subscription type: {0:?}")]
    UnsupportedSubscriptionType(String),
    #[error("date out of range")]
    DateOutOfRange,
    #[error("cannot move booking from {from} to {to}")]
    InvalidTransition { from: BookingStatus, to: BookingStatus },
    #[error("booking {id} is {status} and cannot be converted to a subscription")]
    NotConvertible { id: Ulid, status: BookingStatus },
    #[error("limit exceeded: {0}")]
    LimitExceeded(&'static str),
    #[error("booking source error: {0}")]
    Source(String),
}
