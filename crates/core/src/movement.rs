//! Movement sources: manual one-cell steps or an external position feed.
//! Exactly one source drives the player at a time. Switching always stops
//! the outgoing source before the incoming one starts.

use std::collections::VecDeque;

use thiserror::Error;

use crate::types::{LatLng, MovementMode};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("location is unavailable: {0}")]
    Unavailable(String),
    #[error("location feed failed: {0}")]
    Failed(String),
}

/// External stream of player positions, polled once per frame.
pub trait PositionSource {
    fn activate(&mut self) -> Result<(), PositionError>;
    fn deactivate(&mut self);
    /// The next update since the last poll, if any.
    fn poll(&mut self) -> Option<Result<LatLng, PositionError>>;
}

pub struct MovementController {
    mode: MovementMode,
    feed: Option<Box<dyn PositionSource>>,
}

impl MovementController {
    pub fn new(feed: Option<Box<dyn PositionSource>>) -> Self {
        Self { mode: MovementMode::Buttons, feed }
    }

    pub fn mode(&self) -> MovementMode {
        self.mode
    }

    pub fn accepts_steps(&self) -> bool {
        self.mode == MovementMode::Buttons
    }

    /// Returns whether the mode changed. On error the controller stays in
    /// manual mode.
    pub fn set_mode(&mut self, mode: MovementMode) -> Result<bool, PositionError> {
        if mode == self.mode {
            return Ok(false);
        }
        match mode {
            MovementMode::Buttons => {
                self.stop_feed();
                Ok(true)
            }
            MovementMode::Geolocation => {
                let Some(feed) = self.feed.as_mut() else {
                    return Err(PositionError::Unavailable("no position feed configured".to_string()));
                };
                // Manual steps stop being accepted before the feed starts.
                self.mode = MovementMode::Geolocation;
                if let Err(err) = feed.activate() {
                    feed.deactivate();
                    self.mode = MovementMode::Buttons;
                    return Err(err);
                }
                Ok(true)
            }
        }
    }

    /// Polls the feed while it drives the player. A feed error drops back to
    /// manual mode before it is returned.
    pub fn poll(&mut self) -> Option<Result<LatLng, PositionError>> {
        if self.mode != MovementMode::Geolocation {
            return None;
        }
        let update = self.feed.as_mut()?.poll()?;
        if update.is_err() {
            self.stop_feed();
        }
        Some(update)
    }

    fn stop_feed(&mut self) {
        if let Some(feed) = self.feed.as_mut() {
            feed.deactivate();
        }
        self.mode = MovementMode::Buttons;
    }
}

/// Feed that plays back a fixed list of updates, one every `interval` polls.
#[derive(Clone, Debug)]
pub struct ScriptedFeed {
    updates: VecDeque<Result<LatLng, PositionError>>,
    interval: u32,
    countdown: u32,
    active: bool,
    unavailable: Option<String>,
}

impl ScriptedFeed {
    pub fn new(points: impl IntoIterator<Item = LatLng>, interval: u32) -> Self {
        Self::from_updates(points.into_iter().map(Ok), interval)
    }

    pub fn from_updates(
        updates: impl IntoIterator<Item = Result<LatLng, PositionError>>,
        interval: u32,
    ) -> Self {
        let interval = interval.max(1);
        Self {
            updates: updates.into_iter().collect(),
            interval,
            countdown: interval,
            active: false,
            unavailable: None,
        }
    }

    /// A feed that refuses to start.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self { unavailable: Some(reason.into()), ..Self::new([], 1) }
    }
}

impl PositionSource for ScriptedFeed {
    fn activate(&mut self) -> Result<(), PositionError> {
        if let Some(reason) = &self.unavailable {
            return Err(PositionError::Unavailable(reason.clone()));
        }
        self.active = true;
        self.countdown = self.interval;
        Ok(())
    }

    fn deactivate(&mut self) {
        self.active = false;
    }

    fn poll(&mut self) -> Option<Result<LatLng, PositionError>> {
        if !self.active {
            return None;
        }
        self.countdown -= 1;
        if self.countdown > 0 {
            return None;
        }
        self.countdown = self.interval;
        self.updates.pop_front()
    }
}
