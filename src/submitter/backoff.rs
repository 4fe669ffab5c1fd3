use std::time::Duration;

use rand::Rng;

/// Ceiling for the exponential component of a retry delay.
const MAX_BACKOFF_SECS: f64 = 60.0;

/// Upper bound (exclusive) of the uniform jitter added to every delay.
const JITTER_SECS: f64 = 0.5;

/// Calculate an exponential backoff delay for the given attempt number.
///
/// The delay is `base_delay * 2^attempt_number`, capped at 60 seconds, plus a
/// uniformly random jitter in `[0, 0.5)` so that callers backing off at the
/// same moment do not retry in lockstep.
pub fn calculate_backoff_delay(base_delay: f64, attempt_number: u32) -> Duration {
    let exponent = i32::try_from(attempt_number).unwrap_or(i32::MAX);
    let exponential = base_delay * 2f64.powi(exponent);
    let jitter: f64 = rand::thread_rng().gen_range(0.0..JITTER_SECS);
    Duration::from_secs_f64(exponential.min(MAX_BACKOFF_SECS) + jitter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_doubles_per_attempt() {
        for attempt in 0..4 {
            let expected = 2.0 * 2f64.powi(attempt as i32);
            let delay = calculate_backoff_delay(2.0, attempt).as_secs_f64();
            assert!(
                delay >= expected && delay < expected + JITTER_SECS,
                "attempt {attempt}: delay {delay} outside [{expected}, {})",
                expected + JITTER_SECS
            );
        }
    }

    #[test]
    fn delay_is_capped_at_sixty_seconds() {
        // 10 * 2^10 = 10240s without the cap
        let delay = calculate_backoff_delay(10.0, 10).as_secs_f64();
        assert!(delay >= MAX_BACKOFF_SECS);
        assert!(delay < MAX_BACKOFF_SECS + JITTER_SECS);
    }

    #[test]
    fn zero_base_delay_leaves_only_jitter() {
        for _ in 0..100 {
            let delay = calculate_backoff_delay(0.0, 5).as_secs_f64();
            assert!(delay >= 0.0);
            assert!(delay < JITTER_SECS);
        }
    }

    #[test]
    fn jitter_stays_within_bounds_over_many_iterations() {
        // Run enough iterations that a bounds violation would almost certainly surface
        for i in 0..200 {
            let delay = calculate_backoff_delay(1.0, 0).as_secs_f64();
            assert!(
                (1.0..1.0 + JITTER_SECS).contains(&delay),
                "iteration {i}: delay {delay} outside [1.0, {})",
                1.0 + JITTER_SECS
            );
        }
    }
}
