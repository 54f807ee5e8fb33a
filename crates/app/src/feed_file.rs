//! Replay position feed read from a JSON file of `[lat, lng]` points.

use std::fs;
use std::io;
use std::path::Path;

use cellcraft_core::{LatLng, ScriptedFeed};

/// Frames between two replayed positions (about one second at 60 fps).
pub const DEFAULT_FEED_INTERVAL: u32 = 60;

pub fn load_points(path: &Path) -> io::Result<Vec<LatLng>> {
    let content = fs::read_to_string(path)?;
    let raw: Vec<[f64; 2]> = serde_json::from_str(&content)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    if let Some([lat, lng]) = raw.iter().find(|[lat, lng]| !(lat.is_finite() && lng.is_finite())) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("point [{lat}, {lng}] is not a finite position"),
        ));
    }
    Ok(raw.into_iter().map(|[lat, lng]| LatLng::new(lat, lng)).collect())
}

/// A feed replaying `path`. When the file cannot be read the feed refuses to
/// start, so selecting geolocation falls back to manual movement.
pub fn open_replay_feed(path: &Path, interval: u32) -> ScriptedFeed {
    match load_points(path) {
        Ok(points) => {
            log::info!("replaying {} positions from {}", points.len(), path.display());
            ScriptedFeed::new(points, interval)
        }
        Err(err) => {
            log::warn!("position feed {} is unusable: {err}", path.display());
            ScriptedFeed::unavailable(format!("{}: {err}", path.display()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellcraft_core::PositionSource;
    use tempfile::tempdir;

    #[test]
    fn points_are_replayed_in_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("walk.json");
        fs::write(&path, "[[36.9916, -122.0583], [36.9917, -122.0583]]").unwrap();

        let mut feed = open_replay_feed(&path, 1);
        feed.activate().expect("readable feed starts");
        assert_eq!(feed.poll(), Some(Ok(LatLng::new(36.9916, -122.0583))));
        assert_eq!(feed.poll(), Some(Ok(LatLng::new(36.9917, -122.0583))));
        assert_eq!(feed.poll(), None);
    }

    #[test]
    fn unreadable_files_give_a_feed_that_refuses_to_start() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("walk.json");
        fs::write(&path, "{\"lat\": 1}").unwrap();

        assert!(open_replay_feed(&path, 1).activate().is_err());
        assert!(open_replay_feed(&dir.path().join("missing.json"), 1).activate().is_err());
    }

    #[test]
    fn non_finite_points_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("walk.json");
        fs::write(&path, "[[1.0, 2.0], [1e999, 0.0]]").unwrap();
        assert_eq!(load_points(&path).unwrap_err().kind(), io::ErrorKind::InvalidData);
    }
}
