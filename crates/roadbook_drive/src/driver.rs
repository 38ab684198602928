use thiserror::Error;
use tracing::{debug, warn};

use roadbook_directions::provider::{DirectionsError, DirectionsProvider, RouteSegment};
use roadbook_tour::{slice::TourSlice, tour::TourRoute};

use crate::{
    cancel::CancelToken,
    params::DriveParams,
    progress::progress_text,
    render::{self, TourRenderer},
    state::{DriveState, FailureKind, SegmentFailure},
    summary::TourSummary,
};

#[derive(Debug, Error)]
pub enum DriveError {
    #[error("Drive cancelled")]
    Cancelled,

    #[error("Rate limited {attempts} times in a row, giving up")]
    RetriesExhausted { attempts: u32 },
}

/// Drives a tour batch by batch: waits out the current delay, requests
/// one slice from the provider, folds the outcome into the run state,
/// and repeats until the tour is consumed. Never more than one request
/// is in flight.
pub struct TourDriver<P> {
    provider: P,
    params: DriveParams,
    cancel: CancelToken,
}

impl<P: DirectionsProvider> TourDriver<P> {
    pub fn new(provider: P, params: DriveParams) -> Self {
        Self {
            provider,
            params,
            cancel: CancelToken::new(),
        }
    }

    /// Token for callers that need to abort the drive, e.g. on Ctrl-C.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub async fn drive<R: TourRenderer>(
        &self,
        tour: &TourRoute,
        renderer: &mut R,
    ) -> Result<TourSummary, DriveError> {
        let batch_size = self.params.batch_size;
        let total_batches = tour.batch_count(batch_size);
        let mut state = DriveState::new(self.params.backoff.starting_delay());

        debug!(
            "Driving {} waypoints in {} batches of up to {}",
            tour.len(),
            total_batches,
            batch_size
        );

        while let Some(slice) = tour.slice_from(state.cursor, batch_size) {
            if self.cancel.is_cancelled() {
                return Err(DriveError::Cancelled);
            }

            // Advance eagerly; a rate limit rolls it back below.
            state.cursor = slice.end_index();
            let is_final = slice.end_index() == tour.last_index();

            tokio::select! {
                _ = self.cancel.cancelled() => return Err(DriveError::Cancelled),
                _ = tokio::time::sleep(state.delay) => {}
            }

            let result = tokio::select! {
                _ = self.cancel.cancelled() => return Err(DriveError::Cancelled),
                result = self.provider.fetch_route(&slice, self.params.mode) => result,
            };

            match result {
                Ok(segment) => {
                    state.rate_limit_streak = 0;
                    if self.params.backoff.reset_on_success {
                        state.delay = self.params.backoff.starting_delay();
                    }

                    apply_segment(&mut state, &slice, &segment, is_final, renderer);
                    state.batches_resolved += 1;
                }
                Err(DirectionsError::RateLimited) => {
                    state.cursor = slice.start_index();
                    state.rate_limit_streak += 1;

                    if let Some(max) = self.params.backoff.max_consecutive_retries {
                        if state.rate_limit_streak > max {
                            return Err(DriveError::RetriesExhausted {
                                attempts: state.rate_limit_streak,
                            });
                        }
                    }

                    state.delay = state.delay.mul_f64(self.params.backoff.growth_factor);
                    warn!(
                        "Rate limited on segment {}..{}, next attempt in {:?}",
                        slice.start_index(),
                        slice.end_index(),
                        state.delay
                    );
                    continue;
                }
                Err(DirectionsError::NoRoute) => {
                    state.rate_limit_streak = 0;
                    warn!(
                        "No route found for segment {}..{}, skipping",
                        slice.start_index(),
                        slice.end_index()
                    );
                    state.error_log.push(SegmentFailure::from_slice(
                        &slice,
                        state.batches_resolved,
                        FailureKind::NoRoute,
                    ));
                    state.batches_resolved += 1;
                }
                Err(err) => {
                    state.rate_limit_streak = 0;
                    let message = err.to_string();
                    warn!(
                        "Segment {}..{} failed: {}",
                        slice.start_index(),
                        slice.end_index(),
                        message
                    );
                    renderer.show_error(&message);
                    state.error_log.push(SegmentFailure::from_slice(
                        &slice,
                        state.batches_resolved,
                        FailureKind::Provider { message },
                    ));
                    state.batches_resolved += 1;
                }
            }

            renderer.update_progress(&progress_text(
                state.batches_resolved,
                total_batches,
                self.params.progress_ticks,
            ));
        }

        // Completion report, full by contract even though the last
        // resolution already said so.
        renderer.update_progress(&progress_text(
            total_batches,
            total_batches,
            self.params.progress_ticks,
        ));

        let summary = TourSummary {
            total_distance: state.total_distance,
            total_duration: state.total_duration,
            marker_positions: state.marker_positions,
            error_log: state.error_log,
            batches: state.batches_resolved,
        };

        renderer.update_summary(
            &tour.origin().label(),
            &tour.destination().label(),
            summary.distance_km(),
            &summary.duration_text(),
        );

        debug!(
            "Drive complete: {} batches, {:.1} km, {} failed segments",
            summary.batches,
            summary.distance_km(),
            summary.error_log.len()
        );

        Ok(summary)
    }
}

/// Folds one successful segment into the run state and the renderer.
///
/// The tour's start position is pushed exactly once across all batches;
/// every other leg start duplicates an already-pushed position and is
/// skipped.
fn apply_segment<R: TourRenderer>(
    state: &mut DriveState,
    slice: &TourSlice<'_>,
    segment: &RouteSegment,
    is_final: bool,
    renderer: &mut R,
) {
    let color = render::ROUTE_COLORS[state.batches_resolved % render::ROUTE_COLORS.len()];
    renderer.display_route(&segment.geometry, color);

    // Markers carry waypoint labels only when the reported positions
    // line up one-to-one with the requested waypoints.
    let reported: usize = segment.legs.iter().map(|leg| leg.vias.len() + 1).sum();
    let aligned = reported + 1 == slice.waypoint_count();

    let last_leg = segment.legs.len().saturating_sub(1);
    let mut offset = 1;

    for (index, leg) in segment.legs.iter().enumerate() {
        state.total_distance += leg.distance;
        state.total_duration += leg.duration;

        if !state.origin_placed {
            state.origin_placed = true;
            let label = slice.waypoint(0).map(|waypoint| waypoint.label());
            renderer.place_marker(leg.start, label.as_deref(), render::START_COLOR);
            state.marker_positions.push(leg.start);
        }

        for via in &leg.vias {
            let label = waypoint_label(slice, offset, aligned);
            renderer.place_marker(*via, label.as_deref(), render::STOP_COLOR);
            state.marker_positions.push(*via);
            offset += 1;
        }

        let marker_color = if is_final && index == last_leg {
            render::FINISH_COLOR
        } else {
            render::STOP_COLOR
        };
        let label = waypoint_label(slice, offset, aligned);
        renderer.place_marker(leg.end, label.as_deref(), marker_color);
        state.marker_positions.push(leg.end);
        offset += 1;
    }
}

fn waypoint_label(slice: &TourSlice<'_>, offset: usize, aligned: bool) -> Option<String> {
    if !aligned {
        return None;
    }

    slice.waypoint(offset).map(|waypoint| waypoint.label())
}
