//! Flight audio
//!
//! The simulation only decides *when* things sound: the engine loop, the
//! warp loop and one-shot cues. [`AudioSink`] implementations decide how.
//! On the web that is procedural Web Audio synthesis, natively it is silence.

use crate::sim::{FlightEvent, FlightState};

/// One-shot sound cues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Scanner sweep
    Scan,
    /// UI blip for autopilot engage/abort
    Click,
    /// Autopilot parked at its target
    Arrival,
}

impl SoundCue {
    /// Cue for a flight event, if it has one
    pub fn for_event(event: &FlightEvent) -> Option<Self> {
        match event {
            FlightEvent::Scanned { .. } => Some(SoundCue::Scan),
            FlightEvent::AutopilotEngaged { .. } | FlightEvent::AutopilotAborted { .. } => {
                Some(SoundCue::Click)
            }
            FlightEvent::AutopilotArrived { .. } => Some(SoundCue::Arrival),
            FlightEvent::Paused | FlightEvent::Resumed => None,
        }
    }
}

/// Something that can make the flight's noises
pub trait AudioSink {
    /// Engine rumble loop on/off
    fn set_engine_thrust(&mut self, active: bool);
    /// Warp drone loop on/off
    fn set_warp(&mut self, active: bool);
    fn play(&mut self, cue: SoundCue);

    /// Stop every loop (pause, teardown)
    fn release(&mut self) {
        self.set_engine_thrust(false);
        self.set_warp(false);
    }

    /// Mirror the loops onto the current flight state
    fn sync(&mut self, state: &FlightState) {
        self.set_engine_thrust(state.engine_sound());
        self.set_warp(state.warp_sound());
    }
}

/// Native / muted sink
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn set_engine_thrust(&mut self, _active: bool) {}
    fn set_warp(&mut self, _active: bool) {}
    fn play(&mut self, _cue: SoundCue) {}
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, SoundCue};

    /// A looping voice: oscillator into its own gain
    struct Voice {
        osc: OscillatorNode,
        gain: GainNode,
    }

    /// Web Audio sink with procedurally generated sounds
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        volume: f32,
        muted: bool,
        engine: Option<Voice>,
        warp: Option<Voice>,
    }

    impl WebAudio {
        pub fn new(volume: f32) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: volume.clamp(0.0, 1.0),
                muted: false,
                engine: None,
                warp: None,
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                if ctx.state() == web_sys::AudioContextState::Suspended {
                    let _ = ctx.resume();
                }
            }
        }

        pub fn set_volume(&mut self, volume: f32) {
            self.volume = volume.clamp(0.0, 1.0);
        }

        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
            if muted {
                self.release();
            }
        }

        fn effective_volume(&self) -> f32 {
            if self.muted { 0.0 } else { self.volume }
        }

        fn create_osc(
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Fade a loop in from silence
        fn start_loop(&self, freq: f32, osc_type: OscillatorType, level: f32, fade: f64) -> Option<Voice> {
            let ctx = self.ctx.as_ref()?;
            let (osc, gain) = Self::create_osc(ctx, freq, osc_type)?;
            let t = ctx.current_time();
            gain.gain().set_value_at_time(0.0, t).ok()?;
            gain.gain().linear_ramp_to_value_at_time(level, t + fade).ok()?;
            osc.start().ok()?;
            Some(Voice { osc, gain })
        }

        /// Fade a loop out and schedule its stop
        fn stop_loop(&self, voice: Voice, fade: f64) {
            let Some(ctx) = &self.ctx else { return };
            let t = ctx.current_time();
            let _ = voice.gain.gain().cancel_scheduled_values(t);
            let _ = voice.gain.gain().linear_ramp_to_value_at_time(0.0, t + fade);
            let _ = voice.osc.stop_with_when(t + fade + 0.05);
        }

        fn play_scan(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = Self::create_osc(ctx, 800.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.5)
                .ok();
            osc.frequency().set_value_at_time(800.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(1200.0, t + 0.1)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.5).ok();
        }

        fn play_click(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = Self::create_osc(ctx, 1200.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.05)
                .ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(800.0, t + 0.05)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.06).ok();
        }

        /// Two rising notes
        fn play_arrival(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [660.0f32, 990.0].into_iter().enumerate() {
                let Some((osc, gain)) = Self::create_osc(ctx, freq, OscillatorType::Triangle) else {
                    continue;
                };
                let t = ctx.current_time() + i as f64 * 0.12;
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.22).ok();
            }
        }
    }

    impl AudioSink for WebAudio {
        fn set_engine_thrust(&mut self, active: bool) {
            let vol = self.effective_volume();
            match (active && vol > 0.0, self.engine.is_some()) {
                (true, false) => {
                    self.resume();
                    self.engine = self.start_loop(55.0, OscillatorType::Sawtooth, vol * 0.15, 0.1);
                }
                (false, true) => {
                    if let Some(voice) = self.engine.take() {
                        self.stop_loop(voice, 0.2);
                    }
                }
                _ => {}
            }
        }

        fn set_warp(&mut self, active: bool) {
            let vol = self.effective_volume();
            match (active && vol > 0.0, self.warp.is_some()) {
                (true, false) => {
                    self.resume();
                    self.warp = self.start_loop(100.0, OscillatorType::Sawtooth, vol * 0.1, 1.0);
                    if let (Some(voice), Some(ctx)) = (&self.warp, &self.ctx) {
                        // Rising pitch as the drive spools up
                        let t = ctx.current_time();
                        let _ = voice.osc.frequency().linear_ramp_to_value_at_time(200.0, t + 2.0);
                    }
                }
                (false, true) => {
                    if let Some(voice) = self.warp.take() {
                        self.stop_loop(voice, 0.5);
                    }
                }
                _ => {}
            }
        }

        fn play(&mut self, cue: SoundCue) {
            let vol = self.effective_volume();
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };
            self.resume();
            match cue {
                SoundCue::Scan => self.play_scan(ctx, vol),
                SoundCue::Click => self.play_click(ctx, vol),
                SoundCue::Arrival => self.play_arrival(ctx, vol),
            }
        }
    }
}
