//! Connection state machine.
//!
//! ```text
//! pending -> active | declined
//! active  -> paused | complete
//! paused  -> active | complete
//! ```
//! `complete` and `declined` are terminal. Who may fire a transition is decided
//! by [`crate::domain::services::policy`]; this module only knows the graph.

use crate::domain::models::connection::{Connection, ConnectionEventKind, ConnectionStatus};
use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Accept,
    Decline,
    Pause,
    Resume,
    Complete,
}

impl Transition {
    pub const ALL: [Transition; 5] = [
        Transition::Accept,
        Transition::Decline,
        Transition::Pause,
        Transition::Resume,
        Transition::Complete,
    ];

    pub fn verb(self) -> &'static str {
        match self {
            Transition::Accept => "accept",
            Transition::Decline => "decline",
            Transition::Pause => "pause",
            Transition::Resume => "resume",
            Transition::Complete => "complete",
        }
    }

    pub fn event_kind(self) -> ConnectionEventKind {
        match self {
            Transition::Accept => ConnectionEventKind::Accepted,
            Transition::Decline => ConnectionEventKind::Declined,
            Transition::Pause => ConnectionEventKind::Paused,
            Transition::Resume => ConnectionEventKind::Resumed,
            Transition::Complete => ConnectionEventKind::Completed,
        }
    }

    /// Accept and decline are the helper's answer to a pending request.
    pub fn is_response(self) -> bool {
        matches!(self, Transition::Accept | Transition::Decline)
    }

    /// Translates a requested status from `PATCH /connections/:id/status`.
    /// Only `active`, `paused` and `complete` can be requested this way.
    pub fn for_requested_status(
        requested: ConnectionStatus,
    ) -> Result<Transition, TransitionError> {
        match requested {
            ConnectionStatus::Active => Ok(Transition::Resume),
            ConnectionStatus::Paused => Ok(Transition::Pause),
            ConnectionStatus::Complete => Ok(Transition::Complete),
            ConnectionStatus::Pending | ConnectionStatus::Declined => {
                Err(TransitionError::UnsupportedTarget(requested))
            }
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Cannot {transition} a connection that is {from}")]
    NotAllowed {
        from: ConnectionStatus,
        transition: Transition,
    },
    #[error("Status cannot be set to {0}")]
    UnsupportedTarget(ConnectionStatus),
}

pub fn next_status(
    from: ConnectionStatus,
    transition: Transition,
) -> Result<ConnectionStatus, TransitionError> {
    use ConnectionStatus::*;

    if from.is_terminal() {
        return Err(TransitionError::NotAllowed { from, transition });
    }

    match (from, transition) {
        (Pending, Transition::Accept) => Ok(Active),
        (Pending, Transition::Decline) => Ok(Declined),
        (Active, Transition::Pause) => Ok(Paused),
        (Paused, Transition::Resume) => Ok(Active),
        (Active | Paused, Transition::Complete) => Ok(Complete),
        _ => Err(TransitionError::NotAllowed { from, transition }),
    }
}

/// Returns the connection after `transition`, with the matching timestamp stamped.
pub fn apply(
    connection: &Connection,
    transition: Transition,
    at: DateTime<Utc>,
) -> Result<Connection, TransitionError> {
    let status = next_status(connection.status, transition)?;

    let mut next = connection.clone();
    next.status = status;
    match transition {
        Transition::Accept => next.accepted_at = Some(at),
        Transition::Decline => next.declined_at = Some(at),
        Transition::Pause => next.paused_at = Some(at),
        Transition::Resume => {}
        Transition::Complete => next.completed_at = Some(at),
    }
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ConnectionStatus::*;

    const ALL_STATUSES: [ConnectionStatus; 5] = [Pending, Active, Paused, Complete, Declined];

    fn pending() -> Connection {
        Connection::new("org".into(), "client".into(), "helper".into(), "admin".into())
    }

    #[test]
    fn test_transition_table_is_exhaustive() {
        let allowed = [
            (Pending, Transition::Accept, Active),
            (Pending, Transition::Decline, Declined),
            (Active, Transition::Pause, Paused),
            (Active, Transition::Complete, Complete),
            (Paused, Transition::Resume, Active),
            (Paused, Transition::Complete, Complete),
        ];

        for from in ALL_STATUSES {
            for transition in Transition::ALL {
                let expected = allowed
                    .iter()
                    .find(|(f, t, _)| *f == from && *t == transition)
                    .map(|(_, _, to)| *to);

                let actual = next_status(from, transition);
                match expected {
                    Some(to) => assert_eq!(actual, Ok(to), "{from} --{transition}-->"),
                    None => assert!(actual.is_err(), "{from} --{transition}--> should fail"),
                }
            }
        }
    }

    #[test]
    fn test_pending_cannot_be_paused() {
        let err = next_status(Pending, Transition::Pause).unwrap_err();
        assert_eq!(err, TransitionError::NotAllowed { from: Pending, transition: Transition::Pause });
        assert_eq!(err.to_string(), "Cannot pause a connection that is pending");
    }

    #[test]
    fn test_terminal_states_accept_nothing() {
        for from in [Complete, Declined] {
            assert!(from.is_terminal());
            for transition in Transition::ALL {
                assert!(next_status(from, transition).is_err());
            }
        }
    }

    #[test]
    fn test_apply_stamps_timestamps() {
        let at = Utc::now();
        let accepted = apply(&pending(), Transition::Accept, at).unwrap();
        assert_eq!(accepted.status, Active);
        assert_eq!(accepted.accepted_at, Some(at));

        let paused = apply(&accepted, Transition::Pause, at).unwrap();
        assert_eq!(paused.paused_at, Some(at));

        let resumed = apply(&paused, Transition::Resume, at).unwrap();
        assert_eq!(resumed.status, Active);

        let completed = apply(&resumed, Transition::Complete, at).unwrap();
        assert_eq!(completed.completed_at, Some(at));
        assert!(apply(&completed, Transition::Complete, at).is_err());
    }

    #[test]
    fn test_decline_stamps_declined_at() {
        let at = Utc::now();
        let declined = apply(&pending(), Transition::Decline, at).unwrap();
        assert_eq!(declined.status, Declined);
        assert_eq!(declined.declined_at, Some(at));
        assert!(declined.accepted_at.is_none());
    }

    #[test]
    fn test_requested_status_mapping() {
        assert_eq!(Transition::for_requested_status(Paused), Ok(Transition::Pause));
        assert_eq!(Transition::for_requested_status(Active), Ok(Transition::Resume));
        assert_eq!(Transition::for_requested_status(Complete), Ok(Transition::Complete));
        assert!(Transition::for_requested_status(Pending).is_err());
        assert!(Transition::for_requested_status(Declined).is_err());

        // "active" on an already-active connection is not a resume.
        let resume = Transition::for_requested_status(Active).unwrap();
        assert!(next_status(Active, resume).is_err());
    }
}
