//! Cosmo Voyager entry point
//!
//! Browser: wires DOM events and timers into the frame loop.
//! Native: headless autopilot demo that logs HUD snapshots.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlElement, HtmlInputElement, KeyboardEvent, TouchEvent, Window};

    use cosmo_voyager::Settings;
    use cosmo_voyager::audio::WebAudio;
    use cosmo_voyager::consts::HUD_INTERVAL_MS;
    use cosmo_voyager::frame::FrameLoop;
    use cosmo_voyager::hud::{HudReceiver, HudSnapshot, hud_channel};
    use cosmo_voyager::renderer::{SceneFrame, Viewport, particle_sprites};
    use cosmo_voyager::session::{MissionLog, Session};
    use cosmo_voyager::sim::{BodyIndex, CelestialBody, FlightState};

    type Game = Rc<RefCell<FrameLoop<WebAudio>>>;
    type Prefs = Rc<RefCell<Settings>>;

    fn js_err(e: impl std::fmt::Display) -> JsValue {
        JsValue::from_str(&e.to_string())
    }

    fn viewport(window: &Window) -> Viewport {
        let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(1280.0);
        let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(720.0);
        Viewport::new(w as f32, h as f32)
    }

    fn html(document: &Document, id: &str) -> Option<HtmlElement> {
        document.get_element_by_id(id)?.dyn_into::<HtmlElement>().ok()
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if hidden { "hidden" } else { "" });
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Cosmo Voyager starting...");

        let window = web_sys::window().ok_or_else(|| js_err("no window"))?;
        let document = window.document().ok_or_else(|| js_err("no document"))?;

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let flight = FlightState::from_settings(&settings, seed).map_err(js_err)?;
        let session = Session::new(flight, MissionLog::default()).map_err(js_err)?;
        let (hud_tx, hud_rx) = hud_channel();

        let mut audio = WebAudio::new(settings.effective_volume());
        audio.set_muted(settings.muted);
        let game: Game = Rc::new(RefCell::new(FrameLoop::new(
            session,
            audio,
            hud_tx,
            viewport(&window),
        )));
        let mute_on_blur = settings.mute_on_blur;
        let prefs: Prefs = Rc::new(RefCell::new(settings));

        {
            let document = document.clone();
            let prefs = prefs.clone();
            game.borrow_mut().set_scan_handler(move |body| {
                show_scan_report(&document, body, &prefs.borrow().locale)
            });
        }

        setup_keyboard(&window, game.clone());
        setup_touch(&document, game.clone());
        setup_buttons(&document, game.clone());
        setup_auto_pause(&document, game.clone());
        setup_preferences(&document, game.clone(), prefs.clone());
        if mute_on_blur {
            setup_mute_on_blur(&window, game.clone(), prefs);
        }
        setup_resize(&window, game.clone());
        start_hud_interval(&window, &document, game.clone(), hud_rx)?;
        setup_teardown(&window, game.clone());

        set_hidden(&document, "loading", true);
        request_animation_frame(game);

        log::info!("Cosmo Voyager running (seed {})", seed);
        Ok(())
    }

    // === Hot tier ===

    fn request_animation_frame(game: Game) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let next = game.clone();
        let closure = Closure::once(move |time: f64| frame(next, time));
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(id) => game.borrow_mut().timers_mut().animation_frame = Some(id),
            Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
        }
        closure.forget();
    }

    fn frame(game: Game, time: f64) {
        if !game.borrow().liveness().is_alive() {
            return;
        }
        let scene = game.borrow_mut().on_animation_frame(time);
        if let Some(scene) = scene {
            apply_scene(&game.borrow(), &scene);
        }
        request_animation_frame(game);
    }

    /// Write transforms straight to the retained elements
    fn apply_scene(game: &FrameLoop<WebAudio>, scene: &SceneFrame) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(world) = html(&document, "world") {
            let _ = world.style().set_property("transform", &scene.view.css_transform());
        }
        if let Some(rocket) = html(&document, "rocket") {
            let style = rocket.style();
            let _ = style.set_property("transform", &scene.ship.css_transform());
            let _ = style.set_property("filter", &scene.ship.css_filter());
        }
        if let Some(layer) = document.get_element_by_id("particles") {
            let sprites = particle_sprites(game.session().flight.particles.particles(), scene.warp);
            let markup: String = sprites
                .iter()
                .map(|s| {
                    format!(
                        "<div class=\"particle\" style=\"width:{}px;height:{}px;background:{};opacity:{};transform:{}\"></div>",
                        s.length,
                        s.thickness,
                        s.color.hex(),
                        s.opacity,
                        s.css_transform()
                    )
                })
                .collect();
            layer.set_inner_html(&markup);
        }
        if let Some(knob) = html(&document, "joystick-knob") {
            let style = knob.style();
            match game.input().joystick_knob() {
                Some(k) => {
                    let _ = style.set_property("display", "block");
                    let _ = style.set_property("transform", &format!("translate({}px, {}px)", k.x, k.y));
                }
                None => {
                    let _ = style.set_property("display", "none");
                }
            }
        }
    }

    // === Cold tier ===

    fn start_hud_interval(
        window: &Window,
        document: &Document,
        game: Game,
        mut hud_rx: HudReceiver,
    ) -> Result<(), JsValue> {
        let document = document.clone();
        let tick_game = game.clone();
        let closure = Closure::<dyn FnMut()>::new(move || {
            if !tick_game.borrow_mut().on_hud_interval() {
                return;
            }
            if let Some(snapshot) = hud_rx.latest() {
                render_hud(&document, snapshot);
                render_bodies(&document, &tick_game.borrow(), snapshot);
            }
        });
        let id = window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            HUD_INTERVAL_MS as i32,
        )?;
        closure.forget();
        game.borrow_mut().timers_mut().interval = Some(id);
        Ok(())
    }

    fn render_hud(document: &Document, hud: &HudSnapshot) {
        set_text(document, "hud-speed", &format!("{:.0}", hud.speed));
        set_text(document, "hud-heading", &format!("{:.0}°", hud.heading));
        set_text(
            document,
            "hud-position",
            &format!("{:.0}, {:.0}", hud.position.x, hud.position.y),
        );
        set_text(document, "hud-zoom", &format!("{}%", hud.zoom_percent()));
        match &hud.nearest {
            Some(n) => {
                set_text(document, "hud-nearest", &format!("{} ({})", n.name, n.thai_name));
                set_text(document, "hud-distance", &format!("{:.0}", hud.distance_to_nearest));
            }
            None => {
                set_text(document, "hud-nearest", "-");
                set_text(document, "hud-distance", "-");
            }
        }
        let target = hud.autopilot_target.as_ref().map(|t| t.name.as_str()).unwrap_or("-");
        set_text(document, "hud-autopilot", target);
        set_hidden(document, "abort-btn", hud.autopilot_target.is_none());
        set_hidden(document, "scan-prompt", !hud.scan_ready);
        set_hidden(document, "warp-overlay", !hud.is_warping);
        if let Some(el) = document.get_element_by_id("hud-nearest") {
            let class = if hud.nearest_is_mission_target { "mission-target" } else { "" };
            let _ = el.set_attribute("class", class);
        }
    }

    /// Materialize bodies near the camera inside `#bodies`
    fn render_bodies(document: &Document, game: &FrameLoop<WebAudio>, hud: &HudSnapshot) {
        let Some(layer) = document.get_element_by_id("bodies") else {
            return;
        };
        let catalog = &game.session().flight.catalog;
        let markup: String = hud
            .visible_bodies
            .iter()
            .filter_map(|&i| catalog.get(i).map(|b| (i, b)))
            .map(|(i, b)| {
                let visited = if hud.visited_ids.iter().any(|v| v == &b.id) { " visited" } else { "" };
                format!(
                    "<div class=\"body{}\" data-index=\"{}\" title=\"{}\" style=\"left:{}px;top:{}px;width:{}px;height:{}px;background:{}\"></div>",
                    visited,
                    i.0,
                    b.name,
                    b.position.x - b.size,
                    b.position.y - b.size,
                    b.size * 2.0,
                    b.size * 2.0,
                    b.visual.gradient.as_deref().unwrap_or(&b.visual.color),
                )
            })
            .collect();
        layer.set_inner_html(&markup);
    }

    fn show_scan_report(document: &Document, body: &CelestialBody, locale: &str) {
        set_text(document, "scan-name", body.display_name(locale));
        set_hidden(document, "scan-report", false);
    }

    // === Input ===

    fn setup_keyboard(window: &Window, game: Game) {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                g.audio_mut().resume();
                if g.input_mut().key_down(&event.code()) {
                    event.prevent_default();
                }
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().input_mut().key_up(&event.code());
            });
            let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn first_touch(event: &TouchEvent) -> Option<Vec2> {
        let touch = event.touches().get(0)?;
        Some(Vec2::new(touch.client_x() as f32, touch.client_y() as f32))
    }

    fn setup_touch(document: &Document, game: Game) {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let Some(point) = first_touch(&event) else {
                    return;
                };
                let mut g = game.borrow_mut();
                g.audio_mut().resume();
                let viewport = g.viewport();
                if g.input_mut().touch_start(point, viewport) {
                    event.prevent_default();
                }
            });
            let _ = document.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if let Some(point) = first_touch(&event) {
                    game.borrow_mut().input_mut().touch_move(point);
                }
            });
            let _ = document.add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                game.borrow_mut().input_mut().touch_end();
            });
            let _ = document.add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn on_click<F>(document: &Document, id: &str, mut handler: F)
    where
        F: FnMut(web_sys::Event) + 'static,
    {
        let Some(el) = document.get_element_by_id(id) else {
            log::debug!("No #{} element", id);
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| handler(event));
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(document: &Document, game: Game) {
        // Clicking a body engages the autopilot
        {
            let game = game.clone();
            on_click(document, "bodies", move |event| {
                let index = event
                    .target()
                    .and_then(|t| t.dyn_into::<Element>().ok())
                    .and_then(|el| el.get_attribute("data-index"))
                    .and_then(|s| s.parse::<usize>().ok());
                if let Some(i) = index {
                    game.borrow_mut().input_mut().request_navigate(BodyIndex(i));
                }
            });
        }
        {
            let game = game.clone();
            on_click(document, "abort-btn", move |_| {
                game.borrow_mut().input_mut().request_abort();
            });
        }
        {
            let game = game.clone();
            let doc = document.clone();
            on_click(document, "scan-close-btn", move |_| {
                if let Some(id) = game.borrow_mut().close_scan() {
                    log::info!("Mission {} complete", id);
                }
                set_hidden(&doc, "scan-report", true);
            });
        }
        {
            let game = game.clone();
            on_click(document, "zoom-in", move |_| game.borrow_mut().session_mut().flight.zoom_in());
        }
        {
            let game = game.clone();
            on_click(document, "zoom-out", move |_| game.borrow_mut().session_mut().flight.zoom_out());
        }
        if let Some(input) = document
            .get_element_by_id("zoom-input")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            let field = input.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().session_mut().flight.set_zoom_percent(&field.value());
            });
            let _ = input.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(document: &Document, game: Game) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut g = game.borrow_mut();
            let hidden = cosmo_voyager::platform::page_hidden();
            // An open scan report keeps the flight paused
            if hidden {
                g.pause();
                log::info!("Auto-paused (tab hidden)");
            } else if g.session().open_scan().is_none() {
                g.resume();
            }
        });
        let _ = document.add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Mute, language and volume controls; each change is saved
    fn setup_preferences(document: &Document, game: Game, prefs: Prefs) {
        {
            let game = game.clone();
            let prefs = prefs.clone();
            on_click(document, "mute-btn", move |_| {
                let mut p = prefs.borrow_mut();
                p.muted = !p.muted;
                game.borrow_mut().audio_mut().set_muted(p.muted);
                p.save();
            });
        }
        {
            let prefs = prefs.clone();
            let doc = document.clone();
            on_click(document, "locale-btn", move |_| {
                let mut p = prefs.borrow_mut();
                let locale = p.toggle_locale().to_string();
                set_text(&doc, "locale-btn", &locale.to_uppercase());
                p.save();
            });
        }
        if let Some(input) = document
            .get_element_by_id("volume-input")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            let field = input.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut p = prefs.borrow_mut();
                p.set_master_volume_percent(&field.value());
                game.borrow_mut().audio_mut().set_volume(p.effective_volume());
                p.save();
            });
            let _ = input.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_mute_on_blur(window: &Window, game: Game, prefs: Prefs) {
        for (event, blurred) in [("blur", true), ("focus", false)] {
            let game = game.clone();
            let prefs = prefs.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                // Focus restores the user's own mute choice
                let muted = blurred || prefs.borrow().muted;
                game.borrow_mut().audio_mut().set_muted(muted);
            });
            let _ = window.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(window: &Window, game: Game) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if let Some(window) = web_sys::window() {
                game.borrow_mut().set_viewport(viewport(&window));
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Leaving the page stops both tiers
    fn setup_teardown(window: &Window, game: Game) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let handles = game.borrow_mut().teardown();
            let Some(window) = web_sys::window() else {
                return;
            };
            if let Some(id) = handles.animation_frame {
                let _ = window.cancel_animation_frame(id);
            }
            if let Some(id) = handles.interval {
                window.clear_interval_with_handle(id);
            }
        });
        let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    web_app::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Cosmo Voyager (native) starting...");
    log::info!("Native mode runs a headless flight; use `trunk serve` for the web version");

    if let Err(e) = demo::run() {
        log::error!("Demo failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::error::Error;

    use cosmo_voyager::Settings;
    use cosmo_voyager::audio::SilentAudio;
    use cosmo_voyager::consts::HUD_INTERVAL_MS;
    use cosmo_voyager::frame::{FrameLoop, IntervalTimer};
    use cosmo_voyager::hud::hud_channel;
    use cosmo_voyager::renderer::Viewport;
    use cosmo_voyager::session::{MissionLog, Session};
    use cosmo_voyager::sim::FlightState;

    const FRAME_MS: f64 = 1000.0 / 60.0;
    const MAX_FRAMES: u32 = 3600;

    /// Fly to the first mission target, scan it and close the report
    pub fn run() -> Result<(), Box<dyn Error>> {
        let settings = Settings::load();
        let flight = FlightState::from_settings(&settings, 42)?;
        let session = Session::new(flight, MissionLog::default())?;
        let (hud_tx, mut hud_rx) = hud_channel();
        let mut game = FrameLoop::new(session, SilentAudio, hud_tx, Viewport::new(1280.0, 720.0));
        let locale = settings.locale.clone();
        game.set_scan_handler(move |body| log::info!("Scanned {}", body.display_name(&locale)));

        let target_id = game
            .session()
            .missions
            .current_target()
            .ok_or("no missions")?
            .to_string();
        let target = game.session().flight.catalog.find(&target_id)?;
        game.input_mut().request_navigate(target);

        let mut hud_timer = IntervalTimer::new(HUD_INTERVAL_MS);
        let mut frame = 0;
        let mut now = 0.0;
        while frame < MAX_FRAMES {
            game.on_animation_frame(now);
            if hud_timer.due(now) && game.on_hud_interval() && frame % 60 == 0 {
                if let Some(snapshot) = hud_rx.latest() {
                    log::info!("{}", snapshot.to_json()?);
                }
            }
            let flight = &game.session().flight;
            if flight.autopilot_target().is_none() && flight.scan_eligible() {
                break;
            }
            frame += 1;
            now += FRAME_MS;
        }

        game.input_mut().key_down("KeyE");
        now += FRAME_MS;
        game.on_animation_frame(now);
        game.input_mut().key_up("KeyE");

        match game.close_scan() {
            Some(id) => log::info!("Mission {} complete after {} frames", id, frame),
            None => log::warn!("No mission completed"),
        }
        if game.on_hud_interval() {
            if let Some(snapshot) = hud_rx.latest() {
                log::info!("{}", snapshot.to_json()?);
            }
        }
        game.teardown();
        Ok(())
    }
}
