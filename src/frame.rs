//! Two-tier frame loop
//!
//! - Hot tier: once per display frame. Input, tick, audio, projection.
//! - Cold tier: a fixed interval copies a [`HudSnapshot`] to the UI.
//!
//! Both run on the one event thread. The platform owns the actual timers;
//! this type owns the state they drive and a liveness flag every scheduled
//! callback checks before touching it.

use std::cell::Cell;
use std::rc::Rc;

use crate::audio::{AudioSink, SoundCue};
use crate::consts::REFERENCE_DT;
use crate::hud::{HudPublisher, HudSnapshot};
use crate::platform::InputMapper;
use crate::renderer::{SceneFrame, Viewport, project};
use crate::session::Session;
use crate::sim::{CelestialBody, tick};

/// Shared "owning view still exists" flag
#[derive(Debug, Clone)]
pub struct Liveness(Rc<Cell<bool>>);

impl Default for Liveness {
    fn default() -> Self {
        Self(Rc::new(Cell::new(true)))
    }
}

impl Liveness {
    pub fn is_alive(&self) -> bool {
        self.0.get()
    }

    pub fn kill(&self) {
        self.0.set(false);
    }
}

/// Platform timer ids to cancel on teardown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimerHandles {
    pub animation_frame: Option<i32>,
    pub interval: Option<i32>,
}

/// Fixed-period gate for hosts without a native interval timer
#[derive(Debug, Clone, Copy)]
pub struct IntervalTimer {
    period_ms: f64,
    next_ms: Option<f64>,
}

impl IntervalTimer {
    pub fn new(period_ms: f64) -> Self {
        Self {
            period_ms,
            next_ms: None,
        }
    }

    /// True at most once per period
    pub fn due(&mut self, now_ms: f64) -> bool {
        match self.next_ms {
            Some(next) if now_ms < next => false,
            _ => {
                self.next_ms = Some(now_ms + self.period_ms);
                true
            }
        }
    }
}

type ScanHandler = Box<dyn FnMut(&CelestialBody)>;

/// Owns the session and drives both tiers
pub struct FrameLoop<A: AudioSink> {
    session: Session,
    input: InputMapper,
    audio: A,
    hud: HudPublisher,
    viewport: Viewport,
    alive: Liveness,
    timers: TimerHandles,
    last_frame_ms: Option<f64>,
    on_scan: Option<ScanHandler>,
}

impl<A: AudioSink> FrameLoop<A> {
    pub fn new(session: Session, audio: A, hud: HudPublisher, viewport: Viewport) -> Self {
        Self {
            session,
            input: InputMapper::new(),
            audio,
            hud,
            viewport,
            alive: Liveness::default(),
            timers: TimerHandles::default(),
            last_frame_ms: None,
            on_scan: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn input(&self) -> &InputMapper {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputMapper {
        &mut self.input
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    pub fn liveness(&self) -> Liveness {
        self.alive.clone()
    }

    pub fn timers_mut(&mut self) -> &mut TimerHandles {
        &mut self.timers
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Called with the body whenever a scan opens
    pub fn set_scan_handler<F>(&mut self, handler: F)
    where
        F: FnMut(&CelestialBody) + 'static,
    {
        self.on_scan = Some(Box::new(handler));
    }

    /// Hot tier: one display frame at `now_ms`
    ///
    /// Returns the projected scene, or `None` once torn down.
    pub fn on_animation_frame(&mut self, now_ms: f64) -> Option<SceneFrame> {
        if !self.alive.is_alive() {
            return None;
        }

        let dt = match self.last_frame_ms {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => REFERENCE_DT,
        };
        self.last_frame_ms = Some(now_ms);

        let control = self.input.control_input();
        tick(&mut self.session.flight, &control, dt);

        if self.input.take_scan_request() {
            let handler = &mut self.on_scan;
            let result = self.session.scan(|body| {
                if let Some(handler) = handler.as_mut() {
                    handler(body);
                }
            });
            if let Err(e) = result {
                log::debug!("Scan refused: {}", e);
            }
        }

        for event in self.session.flight.drain_events() {
            if let Some(cue) = SoundCue::for_event(&event) {
                self.audio.play(cue);
            }
        }

        self.sync_pause();
        if self.session.flight.is_paused() {
            self.audio.release();
        } else {
            self.audio.sync(&self.session.flight);
        }

        Some(project(&self.session.flight, self.viewport))
    }

    /// Cold tier: publish a snapshot. Skipped while paused or torn down.
    pub fn on_hud_interval(&mut self) -> bool {
        if !self.alive.is_alive() || self.session.flight.is_paused() {
            return false;
        }
        let mission = self.session.missions.current_target();
        let snapshot = HudSnapshot::capture(&self.session.flight, self.viewport, mission);
        self.hud.publish(snapshot)
    }

    pub fn pause(&mut self) {
        self.session.flight.set_paused(true);
        self.sync_pause();
        self.audio.release();
    }

    pub fn resume(&mut self) {
        self.session.flight.set_paused(false);
        self.sync_pause();
        // Restart frame timing so the gap isn't simulated
        self.last_frame_ms = None;
    }

    /// Close an open scan report and resume flight
    pub fn close_scan(&mut self) -> Option<u32> {
        let completed = self.session.close_scan();
        self.resume();
        completed
    }

    /// Stop both tiers for good; returns the timers the platform must cancel
    pub fn teardown(&mut self) -> TimerHandles {
        self.alive.kill();
        self.audio.release();
        log::info!("Flight loop torn down");
        std::mem::take(&mut self.timers)
    }

    fn sync_pause(&mut self) {
        self.input.set_paused(self.session.flight.is_paused());
    }
}
