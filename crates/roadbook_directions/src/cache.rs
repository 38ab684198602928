use std::{
    hash::{Hash, Hasher},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use fxhash::FxHasher64;
use geo_types::Point;
use tracing::{debug, warn};

use roadbook_tour::slice::TourSlice;

use crate::provider::{DirectionsError, DirectionsProvider, RouteSegment, TravelMode};

/// Memoizes routed segments as JSON files keyed by provider, travel mode
/// and waypoint coordinates. Unreadable entries count as misses; write
/// failures are logged and the segment is still returned.
pub struct CachedDirections<P> {
    inner: P,
    cache_dir: PathBuf,
}

impl<P: DirectionsProvider> CachedDirections<P> {
    pub fn new(inner: P, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            inner,
            cache_dir: cache_dir.into(),
        }
    }

    fn cache_filename(&self, slice: &TourSlice<'_>, mode: TravelMode) -> String {
        let mut hasher = FxHasher64::default();

        self.inner.name().hash(&mut hasher);
        mode.hash(&mut hasher);
        hasher.write_usize(slice.waypoint_count());
        for waypoint in slice.waypoints() {
            let point = Point::from(waypoint);
            hasher.write_u64(point.x().to_bits());
            hasher.write_u64(point.y().to_bits());
        }

        format!("{:016x}.json", hasher.finish())
    }

    fn read_cached(&self, path: &Path) -> Option<RouteSegment> {
        if !path.is_file() {
            return None;
        }

        let file = std::fs::File::open(path).ok()?;
        serde_json::from_reader(file).ok()
    }

    fn write_cached(&self, path: &Path, segment: &RouteSegment) -> Result<(), std::io::Error> {
        std::fs::create_dir_all(&self.cache_dir)?;

        let file = std::fs::File::create(path)?;
        let mut writer = BufWriter::with_capacity(64 * 1024, file);
        serde_json::to_writer(&mut writer, segment)?;
        writer.flush()?;

        Ok(())
    }
}

impl<P: DirectionsProvider + Sync> DirectionsProvider for CachedDirections<P> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn fetch_route(
        &self,
        slice: &TourSlice<'_>,
        mode: TravelMode,
    ) -> Result<RouteSegment, DirectionsError> {
        let path = self.cache_dir.join(self.cache_filename(slice, mode));

        if let Some(segment) = self.read_cached(&path) {
            debug!(
                "Cache hit for segment {}..{}",
                slice.start_index(),
                slice.end_index()
            );
            return Ok(segment);
        }

        let segment = self.inner.fetch_route(slice, mode).await?;

        if let Err(err) = self.write_cached(&path, &segment) {
            warn!("Failed to cache segment: {err}");
        }

        Ok(segment)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use roadbook_tour::{tour::TourRoute, waypoint::Waypoint};

    use crate::crow_flies::CrowFliesDirections;

    use super::*;

    struct CountingProvider {
        inner: CrowFliesDirections,
        calls: AtomicUsize,
    }

    impl CountingProvider {
        fn new() -> Self {
            Self {
                inner: CrowFliesDirections::default(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl DirectionsProvider for CountingProvider {
        fn name(&self) -> &str {
            "counting"
        }

        async fn fetch_route(
            &self,
            slice: &TourSlice<'_>,
            mode: TravelMode,
        ) -> Result<RouteSegment, DirectionsError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.fetch_route(slice, mode).await
        }
    }

    fn sample_tour() -> TourRoute {
        TourRoute::new(vec![
            Waypoint::new("Boulder", 40.015, -105.2705),
            Waypoint::new("Moab", 38.5733, -109.5498),
            Waypoint::new("Page", 36.9147, -111.4558),
        ])
        .unwrap()
    }

    #[test]
    fn test_filename_is_deterministic() {
        let tour = sample_tour();
        let cached = CachedDirections::new(CrowFliesDirections::default(), "/tmp/roadbook");

        let slice = tour.slice_from(0, 10).unwrap();
        let first = cached.cache_filename(&slice, TravelMode::Driving);
        let again = cached.cache_filename(&slice, TravelMode::Driving);

        assert_eq!(first, again);
        assert!(first.ends_with(".json"));
    }

    #[test]
    fn test_filename_depends_on_inputs() {
        let tour = sample_tour();
        let cached = CachedDirections::new(CrowFliesDirections::default(), "/tmp/roadbook");

        let full = tour.slice_from(0, 10).unwrap();
        let tail = tour.slice_from(1, 10).unwrap();

        assert_ne!(
            cached.cache_filename(&full, TravelMode::Driving),
            cached.cache_filename(&tail, TravelMode::Driving)
        );
        assert_ne!(
            cached.cache_filename(&full, TravelMode::Driving),
            cached.cache_filename(&full, TravelMode::Walking)
        );
    }

    #[tokio::test]
    async fn test_second_fetch_hits_cache() {
        let tour = sample_tour();
        let cache_dir = tempfile::tempdir().unwrap();
        let cached = CachedDirections::new(CountingProvider::new(), cache_dir.path());

        let slice = tour.slice_from(0, 10).unwrap();

        let first = cached
            .fetch_route(&slice, TravelMode::Driving)
            .await
            .unwrap();
        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 1);

        let second = cached
            .fetch_route(&slice, TravelMode::Driving)
            .await
            .unwrap();
        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 1);

        assert_eq!(first, second);
    }
}
