//! Break alerts: synthesized tones and desktop notifications.
//!
//! Everything here is fire-and-forget. A missing audio device or a
//! denied notification permission is logged at debug level and ignored;
//! the reminder pipeline must keep running either way.

use notify_rust::{Notification, Urgency};
use rodio::source::{SineWave, Source};
use rodio::{OutputStream, Sink};
use std::thread;
use std::time::Duration;
use tracing::debug;

const APP_NAME: &str = "okulo";
const ALERT_FREQ_HZ: f32 = 800.0;
const ALERT_GAIN: f32 = 0.3;

#[derive(Debug, Clone, Copy)]
pub struct Alerter {
    desktop: bool,
    sound: bool,
}

impl Alerter {
    pub fn new(desktop: bool, sound: bool) -> Self {
        Self { desktop, sound }
    }

    /// Silent, notification-free alerter for non-interactive contexts.
    pub fn muted() -> Self {
        Self::new(false, false)
    }

    /// A break prompt just became due: ding twice, and raise a desktop
    /// notification for the case where the terminal is not in view.
    pub fn break_due(&self, minutes_elapsed: u64) {
        if self.sound {
            play_tones(vec![(ALERT_FREQ_HZ, 200), (ALERT_FREQ_HZ, 200)]);
        }
        if self.desktop {
            let result = Notification::new()
                .summary("🧘 Time for an eye break!")
                .body(&format!("Rest your eyes ({} minutes elapsed)", minutes_elapsed))
                .appname(APP_NAME)
                .urgency(Urgency::Critical)
                .show();
            if let Err(err) = result {
                debug!(error = %err, "desktop notification failed");
            }
        }
    }

    /// Single low tone marking the start of a guided activity.
    pub fn activity_start(&self) {
        if self.sound {
            play_tones(vec![(600.0, 200)]);
        }
    }

    /// Rising pair marking "open your eyes" between exercise moves.
    pub fn open_eyes(&self) {
        if self.sound {
            play_tones(vec![(900.0, 100), (1100.0, 150)]);
        }
    }

    /// Rising pair marking the end of an activity.
    pub fn activity_end(&self) {
        if self.sound {
            play_tones(vec![(800.0, 150), (1000.0, 200)]);
        }
    }
}

/// Plays a sequence of `(frequency_hz, duration_ms)` tones on a
/// dedicated thread; audio handles are not `Send` and must not block
/// the caller.
fn play_tones(tones: Vec<(f32, u64)>) {
    thread::spawn(move || {
        let Ok((_stream, handle)) = OutputStream::try_default() else {
            debug!("no audio output available");
            return;
        };
        let Ok(sink) = Sink::try_new(&handle) else {
            debug!("audio sink unavailable");
            return;
        };
        for (freq, millis) in tones {
            let source = SineWave::new(freq)
                .take_duration(Duration::from_millis(millis))
                .amplify(ALERT_GAIN);
            sink.append(source);
        }
        sink.sleep_until_end();
    });
}
