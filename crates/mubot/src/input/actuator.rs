use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::Result;
use crate::input::{KeyCode, KeySink};
use crate::shutdown::ShutdownSignal;

/// How long a tapped key stays down unless configured otherwise.
pub const DEFAULT_HOLD: Duration = Duration::from_millis(50);

/// One key of a timed sequence and the pause that follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComboStep {
    pub key: KeyCode,
    pub delay: Duration,
}

impl ComboStep {
    pub fn new(key: KeyCode, delay: Duration) -> Self {
        Self { key, delay }
    }
}

/// Serial keyboard device.
///
/// Every tap and sequence holds the device lock for its whole duration, so
/// concurrent callers queue instead of interleaving key events.
pub struct InputActuator {
    sink: Mutex<Box<dyn KeySink>>,
    hold: Duration,
    abort: Option<Arc<ShutdownSignal>>,
}

impl InputActuator {
    pub fn new(sink: Box<dyn KeySink>) -> Self {
        Self {
            sink: Mutex::new(sink),
            hold: DEFAULT_HOLD,
            abort: None,
        }
    }

    pub fn with_hold(mut self, hold: Duration) -> Self {
        self.hold = hold;
        self
    }

    /// Stop sequences early once `signal` fires.
    pub fn with_abort(mut self, signal: Arc<ShutdownSignal>) -> Self {
        self.abort = Some(signal);
        self
    }

    pub fn hold(&self) -> Duration {
        self.hold
    }

    /// Press, hold, release.
    pub fn tap(&self, key: KeyCode) -> Result<()> {
        let sink = self.lock();
        self.tap_locked(&**sink, key)
    }

    /// Tap each step's key in order, waiting its delay afterwards.
    ///
    /// A shutdown cuts the sequence short between keys; the key being tapped
    /// is always released first.
    pub fn sequence(&self, steps: &[ComboStep]) -> Result<()> {
        let sink = self.lock();
        for (index, step) in steps.iter().enumerate() {
            if self.aborted() {
                debug!("Sequence aborted after {} of {} steps", index, steps.len());
                break;
            }
            self.tap_locked(&**sink, step.key)?;
            if self.pause(step.delay) {
                debug!("Sequence aborted after {} of {} steps", index + 1, steps.len());
                break;
            }
        }
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Box<dyn KeySink>> {
        self.sink.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn tap_locked(&self, sink: &dyn KeySink, key: KeyCode) -> Result<()> {
        sink.key_down(key)?;
        let release = Release {
            sink,
            key,
            armed: true,
        };
        self.pause(self.hold);
        release.finish()
    }

    fn aborted(&self) -> bool {
        self.abort.as_ref().is_some_and(|signal| signal.is_shutdown())
    }

    /// Returns `true` if the pause was cut short by a shutdown.
    fn pause(&self, duration: Duration) -> bool {
        if duration.is_zero() {
            return self.aborted();
        }
        match &self.abort {
            Some(signal) => signal.wait(duration),
            None => {
                thread::sleep(duration);
                false
            }
        }
    }
}

/// Releases a pressed key on every exit path.
struct Release<'a> {
    sink: &'a dyn KeySink,
    key: KeyCode,
    armed: bool,
}

impl Release<'_> {
    fn finish(mut self) -> Result<()> {
        self.armed = false;
        self.sink.key_up(self.key)
    }
}

impl Drop for Release<'_> {
    fn drop(&mut self) {
        if self.armed {
            if let Err(e) = self.sink.key_up(self.key) {
                warn!("Failed to release {}: {}", self.key, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::input::{KeyEvent, RecordingSink};
    use std::time::Instant;

    fn actuator(sink: &RecordingSink) -> InputActuator {
        InputActuator::new(Box::new(sink.clone())).with_hold(Duration::from_millis(1))
    }

    #[test]
    fn tap_presses_then_releases() {
        let sink = RecordingSink::new();
        actuator(&sink).tap(KeyCode::F1).unwrap();

        assert_eq!(
            sink.events(),
            vec![KeyEvent::Down(KeyCode::F1), KeyEvent::Up(KeyCode::F1)]
        );
    }

    #[test]
    fn tap_holds_for_configured_duration() {
        let sink = RecordingSink::new();
        let actuator =
            InputActuator::new(Box::new(sink.clone())).with_hold(Duration::from_millis(30));

        let start = Instant::now();
        actuator.tap(KeyCode::SPACE).unwrap();
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn default_hold_is_fifty_millis() {
        let actuator = InputActuator::new(Box::new(RecordingSink::new()));
        assert_eq!(actuator.hold(), Duration::from_millis(50));
    }

    #[test]
    fn rejected_press_is_actuation_failure_without_release() {
        let sink = RecordingSink::new();
        sink.reject_presses(true);

        let err = actuator(&sink).tap(KeyCode::F2).unwrap_err();
        assert!(matches!(err, Error::ActuationFailed(_)));
        assert!(sink.events().is_empty());
    }

    #[test]
    fn sequence_taps_in_order() {
        let sink = RecordingSink::new();
        let steps = [
            ComboStep::new(KeyCode::F10, Duration::from_millis(5)),
            ComboStep::new(KeyCode::ENTER, Duration::ZERO),
        ];

        actuator(&sink).sequence(&steps).unwrap();
        assert_eq!(sink.taps(), vec![KeyCode::F10, KeyCode::ENTER]);
    }

    #[test]
    fn sequence_waits_step_delays() {
        let sink = RecordingSink::new();
        let steps = [
            ComboStep::new(KeyCode::F4, Duration::from_millis(20)),
            ComboStep::new(KeyCode::F5, Duration::from_millis(20)),
        ];

        let start = Instant::now();
        actuator(&sink).sequence(&steps).unwrap();
        assert!(start.elapsed() >= Duration::from_millis(40));
    }

    #[test]
    fn shutdown_before_sequence_taps_nothing() {
        let sink = RecordingSink::new();
        let signal = Arc::new(ShutdownSignal::new());
        signal.trigger();

        actuator(&sink)
            .with_abort(signal)
            .sequence(&[ComboStep::new(KeyCode::F4, Duration::ZERO)])
            .unwrap();
        assert!(sink.events().is_empty());
    }

    #[test]
    fn shutdown_during_delay_stops_remaining_steps() {
        let sink = RecordingSink::new();
        let signal = Arc::new(ShutdownSignal::new());
        let actuator = actuator(&sink).with_abort(Arc::clone(&signal));
        let steps = [
            ComboStep::new(KeyCode::F9, Duration::from_secs(10)),
            ComboStep::new(KeyCode::F10, Duration::ZERO),
        ];

        let trigger = {
            let signal = Arc::clone(&signal);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(30));
                signal.trigger();
            })
        };

        let start = Instant::now();
        actuator.sequence(&steps).unwrap();
        trigger.join().unwrap();

        assert!(start.elapsed() < Duration::from_secs(2));
        assert_eq!(sink.taps(), vec![KeyCode::F9]);
        // Nothing left pressed.
        assert_eq!(sink.events().last(), Some(&KeyEvent::Up(KeyCode::F9)));
    }

    #[test]
    fn concurrent_callers_never_interleave() {
        let sink = RecordingSink::new();
        let actuator = Arc::new(
            InputActuator::new(Box::new(sink.clone())).with_hold(Duration::from_millis(5)),
        );

        let workers: Vec<_> = [KeyCode::F1, KeyCode::F2, KeyCode::F3]
            .into_iter()
            .map(|key| {
                let actuator = Arc::clone(&actuator);
                thread::spawn(move || {
                    for _ in 0..3 {
                        actuator.tap(key).unwrap();
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        let events = sink.events();
        assert_eq!(events.len(), 18);
        for pair in events.chunks(2) {
            match pair {
                [KeyEvent::Down(down), KeyEvent::Up(up)] => assert_eq!(down, up),
                other => panic!("interleaved events: {other:?}"),
            }
        }
    }
}
