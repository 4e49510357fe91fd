//! Audio cues for the countdown.
//!
//! The sequencer only ever talks to [`AudioCue`]; the browser implementation
//! synthesizes short blips with the Web Audio API. Every failure is logged
//! and swallowed, silence being an acceptable degraded mode.

use crate::config::{
    ATTACK_SECS, BEEP_FREQUENCY_HZ, BEEP_LENGTH_SECS, BEEP_PEAK_GAIN, TICK_FREQUENCY_HZ,
    TICK_LENGTH_SECS, TICK_PEAK_GAIN,
};
use log::{debug, error, info, warn};
use std::cell::RefCell;
use wasm_bindgen::JsValue;
use web_sys::{AudioContext, AudioContextState, OscillatorType};

/// Fire-and-forget sound side effects.
pub trait AudioCue {
    /// Short tick for the last seconds of an exercise.
    fn play_tick(&self);
    fn stop_tick(&self);
    /// Completion cue once the whole list has run.
    fn beep(&self) {}
}

/// One synthesized note.
#[derive(Debug, Clone, Copy)]
struct Tone {
    kind: OscillatorType,
    frequency: f32,
    peak: f32,
    length: f64,
}

const TICK: Tone = Tone {
    kind: OscillatorType::Sine,
    frequency: TICK_FREQUENCY_HZ,
    peak: TICK_PEAK_GAIN,
    length: TICK_LENGTH_SECS,
};

const BEEP: Tone = Tone {
    kind: OscillatorType::Square,
    frequency: BEEP_FREQUENCY_HZ,
    peak: BEEP_PEAK_GAIN,
    length: BEEP_LENGTH_SECS,
};

/// Web Audio backed cues.
///
/// The `AudioContext` is created lazily on first use, since browsers only
/// allow audible contexts after a user gesture, and is owned by this value
/// rather than shared globally.
#[derive(Default)]
pub struct WebAudio {
    context: RefCell<Option<AudioContext>>,
}

impl WebAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the context up front. Safe to call repeatedly.
    pub fn init(&self) {
        if self.context.borrow().is_some() {
            return;
        }
        match AudioContext::new() {
            Ok(ctx) => {
                info!("Audio context initialized successfully");
                *self.context.borrow_mut() = Some(ctx);
            }
            Err(e) => error!("Error initializing audio: {:?}", e),
        }
    }

    /// Close the context and forget it; the next cue re-initializes.
    pub fn teardown(&self) {
        if let Some(ctx) = self.context.borrow_mut().take() {
            if let Err(e) = ctx.close() {
                warn!("Error closing audio context: {:?}", e);
            }
        }
    }

    fn play(&self, tone: Tone) {
        if self.context.borrow().is_none() {
            warn!("Audio context not initialized");
            self.init();
        }
        let guard = self.context.borrow();
        let Some(ctx) = guard.as_ref() else {
            return;
        };
        if let Err(e) = render(ctx, tone) {
            error!("Error playing {:?} tone: {:?}", tone.kind, e);
        }
    }
}

fn render(ctx: &AudioContext, tone: Tone) -> Result<(), JsValue> {
    if ctx.state() == AudioContextState::Suspended {
        // The returned promise only tells us when it is resumed; nothing to wait for.
        let _ = ctx.resume()?;
    }

    let oscillator = ctx.create_oscillator()?;
    let gain = ctx.create_gain()?;

    oscillator.set_type(tone.kind);
    oscillator.frequency().set_value(tone.frequency);

    let now = ctx.current_time();
    let envelope = gain.gain();
    envelope.set_value_at_time(0.0, now)?;
    envelope.linear_ramp_to_value_at_time(tone.peak, now + ATTACK_SECS)?;
    envelope.linear_ramp_to_value_at_time(0.0, now + tone.length)?;

    oscillator.connect_with_audio_node(&gain)?;
    gain.connect_with_audio_node(&ctx.destination())?;

    oscillator.start()?;
    oscillator.stop_with_when(now + tone.length)?;
    Ok(())
}

impl AudioCue for WebAudio {
    fn play_tick(&self) {
        self.play(TICK);
        debug!("Tick sound played");
    }

    fn stop_tick(&self) {
        // Blips stop themselves after TICK_LENGTH_SECS.
    }

    fn beep(&self) {
        self.play(BEEP);
        debug!("Beep sound played");
    }
}

impl Drop for WebAudio {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::AudioCue;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Cue {
        Tick,
        Stop,
        Beep,
    }

    /// Records every cue; clones share the same log.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingAudio {
        log: Rc<RefCell<Vec<Cue>>>,
    }

    impl RecordingAudio {
        pub fn count(&self, cue: Cue) -> usize {
            self.log.borrow().iter().filter(|c| **c == cue).count()
        }

        pub fn clear(&self) {
            self.log.borrow_mut().clear();
        }

        pub fn cues(&self) -> Vec<Cue> {
            self.log.borrow().clone()
        }
    }

    impl AudioCue for RecordingAudio {
        fn play_tick(&self) {
            self.log.borrow_mut().push(Cue::Tick);
        }

        fn stop_tick(&self) {
            self.log.borrow_mut().push(Cue::Stop);
        }

        fn beep(&self) {
            self.log.borrow_mut().push(Cue::Beep);
        }
    }
}
