use thiserror::Error;

use crate::game::Position;

/// Errors surfaced by the navigation core.
///
/// `Died` short-circuits every long operation. The movement loop consumes
/// `MonstersInPath`, `PlayerStuck`, `PlayerRoundTrip` and (with a partial
/// path) `NoPath` internally; everything else aborts the current call.
#[derive(Error, Debug)]
pub enum NavError {
    #[error("player died")]
    Died,

    #[error("arcane sanctuary dead end")]
    ArcaneDeadEnd,

    #[error("monsters blocking the path")]
    MonstersInPath,

    #[error("player is stuck")]
    PlayerStuck,

    #[error("player walked a round trip")]
    PlayerRoundTrip,

    #[error("path could not be calculated in {area} to ({}, {})", target.x, target.y)]
    NoPath { area: &'static str, target: Position },

    #[error("area sync timeout - expected: {expected}, current: {current}")]
    AreaSyncTimeout { expected: &'static str, current: &'static str },

    #[error("destination area not found: {0}")]
    RouteNotFound(&'static str),

    #[error("failed to reach {area} after {hops} hops")]
    HopLimit { area: &'static str, hops: u32 },

    #[error("no waypoint object found in {0}")]
    NoWaypointObject(&'static str),

    #[error("failed to select waypoint destination")]
    WaypointSelection,

    #[error("failed to locate a waypoint reachable from {0}")]
    NoWaypointNear(&'static str),

    #[error("no static route found from {from} to {to}")]
    NoStaticRoute { from: &'static str, to: &'static str },

    #[error("area {0} could not be interacted")]
    EntranceNotInteracted(&'static str),

    #[error("area {0} not found in adjacent levels")]
    EntranceNotFound(&'static str),

    #[error("area {0} is not an entrance")]
    NotAnEntrance(&'static str),

    #[error("entrance too far away (distance: {0})")]
    EntranceTooFar(i32),

    #[error("failed to move to area {0}: missing cached data")]
    MissingCachedData(&'static str),

    #[error("failed to interact with {object} in {area}")]
    ObjectInteraction { object: &'static str, area: &'static str },

    #[error("{object} not found in {area}")]
    ObjectNotFound { object: &'static str, area: &'static str },

    #[error("failed to reach {area} using waypoint: {source}")]
    WaypointTravel { area: &'static str, #[source] source: Box<NavError> },

    #[error("failed to move to area {area}: {source}")]
    AreaTravel { area: &'static str, #[source] source: Box<NavError> },

    #[error("unknown act {0}")]
    UnknownAct(u8),

    #[error("failed to find the real Tal Rasha tomb")]
    RealTombNotFound,
}

impl NavError {
    /// True for the errors that end the whole run rather than one call.
    pub fn is_fatal_to_run(&self) -> bool {
        matches!(self, NavError::Died)
    }
}

pub type NavResult<T> = Result<T, NavError>;

/// True when `err` (possibly wrapped) is the death signal.
pub fn is_death(err: &NavError) -> bool {
    match err {
        NavError::Died => true,
        NavError::WaypointTravel { source, .. } | NavError::AreaTravel { source, .. } => {
            is_death(source)
        }
        _ => false,
    }
}
