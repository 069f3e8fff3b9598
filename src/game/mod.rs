//! Browser driver for the falling-word game.
//!
//! One `Driver` lives in a thread-local for the lifetime of the page. The
//! keydown listener and the animation-frame callback both borrow it
//! synchronously on the JS thread, so a keystroke can never land in the middle
//! of a frame update. Only one frame request is ever pending: scheduling
//! cancels the previous handle, leaving Playing cancels the current one, and
//! the callback re-checks the phase before touching anything.
//!
//! Host notifications (`astro-typer:phase` events on `window`) are dispatched
//! after the driver borrow is released so host listeners may call straight
//! back into the exported API.
use std::cell::RefCell;

use log::info;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, CustomEvent, CustomEventInit, HtmlCanvasElement, window};

use crate::{GameConfig, GameError};

pub mod asteroid;
pub mod audio;
pub mod render;
pub mod session;
pub mod spawner;
pub mod typing;
pub mod words;

use audio::Mixer;
use render::CanvasSurface;
use session::{GamePhase, Session, Summary};
use words::WordMode;

pub const CANVAS_ID: &str = "astro-typer-canvas";
pub const PHASE_EVENT: &str = "astro-typer:phase";

struct Driver {
    session: Session,
    mixer: Mixer,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    frame_handle: Option<i32>,
}

/// Phase change to report to the host once the driver is released.
#[derive(Clone, Copy, Debug)]
struct PhaseNotice {
    phase: GamePhase,
    summary: Summary,
}

thread_local! {
    static DRIVER: RefCell<Option<Driver>> = const { RefCell::new(None) };
    static FRAME: RefCell<Option<Closure<dyn FnMut(f64)>>> = const { RefCell::new(None) };
    static PENDING_CONFIG: RefCell<Option<GameConfig>> = const { RefCell::new(None) };
}

impl Driver {
    fn create() -> Result<Self, GameError> {
        let canvas = acquire_canvas()?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .map_err(GameError::js)?
            .ok_or_else(|| GameError::Canvas("2d context".into()))?
            .dyn_into()
            .map_err(|_| GameError::Canvas("2d context has unexpected type".into()))?;
        let config = PENDING_CONFIG
            .with(|c| c.borrow_mut().take())
            .unwrap_or_default();
        let mixer = Mixer::new(&config);
        let driver = Self {
            session: Session::new(config),
            mixer,
            canvas,
            ctx,
            frame_handle: None,
        };
        driver.show_canvas(false);
        Ok(driver)
    }

    fn notice(&self) -> PhaseNotice {
        PhaseNotice {
            phase: self.session.phase(),
            summary: self.session.summary(),
        }
    }

    fn show_canvas(&self, visible: bool) {
        self.canvas
            .style()
            .set_property("display", if visible { "block" } else { "none" })
            .ok();
    }

    /// Match the canvas to the viewport and tell the session.
    fn fit_to_window(&mut self) -> Result<(), GameError> {
        let win = window().ok_or(GameError::NoWindow)?;
        let w = win.inner_width().map_err(GameError::js)?.as_f64().unwrap_or(800.0);
        let h = win.inner_height().map_err(GameError::js)?.as_f64().unwrap_or(600.0);
        self.canvas.set_width(w as u32);
        self.canvas.set_height(h as u32);
        self.session.resize(w, h);
        Ok(())
    }

    fn draw(&self) {
        let (width, height) = self.session.bounds();
        let mut surface = CanvasSurface {
            ctx: &self.ctx,
            width,
            height,
        };
        render::draw_frame(&self.session, &mut surface);
    }

    /// Push queued events to the mixer and sync the frame loop with the phase.
    /// Returns the notice when the phase moved away from `before`.
    fn settle(&mut self, before: GamePhase) -> Option<PhaseNotice> {
        let events = self.session.drain_events();
        self.mixer.react(&events);
        let after = self.session.phase();
        if after == before {
            return None;
        }
        match after {
            GamePhase::Menu => {
                self.cancel_frame();
                self.show_canvas(false);
            }
            GamePhase::GameOver => {
                self.cancel_frame();
                self.draw();
            }
            GamePhase::Playing => {
                self.show_canvas(true);
                self.schedule_frame();
            }
        }
        Some(self.notice())
    }

    fn schedule_frame(&mut self) {
        self.cancel_frame();
        let Some(win) = window() else {
            return;
        };
        self.frame_handle = FRAME.with(|f| {
            f.borrow()
                .as_ref()
                .and_then(|cb| win.request_animation_frame(cb.as_ref().unchecked_ref()).ok())
        });
    }

    fn cancel_frame(&mut self) {
        if let (Some(handle), Some(win)) = (self.frame_handle.take(), window()) {
            win.cancel_animation_frame(handle).ok();
        }
    }
}

/// Run `f` against the driver, creating it (canvas, audio, listeners) on first use.
fn with_driver<T>(f: impl FnOnce(&mut Driver) -> T) -> Result<T, GameError> {
    DRIVER.with(|cell| {
        init_slot(cell, Driver::create, || {
            install_frame_callback();
            install_key_listener()
        })
    })?;
    DRIVER.with(|cell| {
        let mut guard = cell.borrow_mut();
        let driver = guard.as_mut().ok_or(GameError::NoDocument)?;
        Ok(f(driver))
    })
}

/// Fill an empty `slot` with `create()`, storing the value only after
/// `install` succeeds so a failed setup is retried on the next call.
fn init_slot<D>(
    slot: &RefCell<Option<D>>,
    create: impl FnOnce() -> Result<D, GameError>,
    install: impl FnOnce() -> Result<(), GameError>,
) -> Result<(), GameError> {
    if slot.borrow().is_some() {
        return Ok(());
    }
    let value = create()?;
    install()?;
    slot.replace(Some(value));
    Ok(())
}

fn acquire_canvas() -> Result<HtmlCanvasElement, GameError> {
    let win = window().ok_or(GameError::NoWindow)?;
    let doc = win.document().ok_or(GameError::NoDocument)?;
    if let Some(el) = doc.get_element_by_id(CANVAS_ID) {
        return el
            .dyn_into()
            .map_err(|_| GameError::Canvas(format!("#{CANVAS_ID} is not a canvas")));
    }
    let canvas: HtmlCanvasElement = doc
        .create_element("canvas")
        .map_err(GameError::js)?
        .dyn_into()
        .map_err(|_| GameError::Canvas("created element is not a canvas".into()))?;
    canvas.set_id(CANVAS_ID);
    canvas
        .set_attribute(
            "style",
            "position:fixed; left:0; top:0; width:100%; height:100%; background:#000; z-index:20;",
        )
        .ok();
    doc.body()
        .ok_or(GameError::NoBody)?
        .append_child(&canvas)
        .map_err(GameError::js)?;
    Ok(canvas)
}

fn install_frame_callback() {
    let closure = Closure::wrap(Box::new(move |ts: f64| {
        let notice = DRIVER.with(|cell| {
            let mut guard = cell.borrow_mut();
            let driver = guard.as_mut()?;
            driver.frame_handle = None;
            if driver.session.phase() != GamePhase::Playing {
                return None;
            }
            driver.session.tick(ts);
            let notice = driver.settle(GamePhase::Playing);
            if driver.session.phase() == GamePhase::Playing {
                driver.draw();
                driver.schedule_frame();
            }
            notice
        });
        if let Some(n) = notice {
            notify_host(n);
        }
    }) as Box<dyn FnMut(f64)>);
    FRAME.with(|f| f.replace(Some(closure)));
}

fn install_key_listener() -> Result<(), GameError> {
    let win = window().ok_or(GameError::NoWindow)?;
    let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
        let notice = DRIVER.with(|cell| {
            let mut guard = cell.borrow_mut();
            let driver = guard.as_mut()?;
            let before = driver.session.phase();
            if before != GamePhase::Playing {
                return None;
            }
            driver.session.handle_key(&evt.key());
            driver.settle(before)
        });
        if let Some(n) = notice {
            notify_host(n);
        }
    }) as Box<dyn FnMut(_)>);
    win.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())
        .map_err(GameError::js)?;
    closure.forget();
    Ok(())
}

fn notify_host(notice: PhaseNotice) {
    let Some(win) = window() else {
        return;
    };
    let detail = js_sys::Object::new();
    let fields = [
        ("phase", JsValue::from_str(notice.phase.as_str())),
        ("score", JsValue::from_f64(notice.summary.score as f64)),
        ("level", JsValue::from_f64(f64::from(notice.summary.level))),
    ];
    for (key, value) in fields {
        js_sys::Reflect::set(&detail, &JsValue::from_str(key), &value).ok();
    }
    let init = CustomEventInit::new();
    init.set_detail(&detail);
    if let Ok(event) = CustomEvent::new_with_event_init_dict(PHASE_EVENT, &init) {
        win.dispatch_event(&event).ok();
    }
}

// --- Operations behind the exported API --------------------------------------

/// Enter Playing from any phase (also serves as "play again").
pub fn start() -> Result<(), GameError> {
    let notice = with_driver(|d| -> Result<_, GameError> {
        let before = d.session.phase();
        d.fit_to_window()?;
        let retune = d.session.has_pending_config();
        d.session.start();
        if retune {
            d.mixer.reload(d.session.config());
        }
        d.ctx.set_fill_style_str("#000");
        d.ctx.fill_rect(
            0.0,
            0.0,
            f64::from(d.canvas.width()),
            f64::from(d.canvas.height()),
        );
        let notice = d.settle(before);
        // a restart from Playing keeps the phase but still needs a fresh loop
        if notice.is_none() {
            d.schedule_frame();
        }
        Ok(notice)
    })??;
    if let Some(n) = notice {
        notify_host(n);
    }
    Ok(())
}

pub fn return_to_menu() -> Result<(), GameError> {
    let notice = with_driver(|d| {
        let before = d.session.phase();
        d.session.return_to_menu();
        d.settle(before)
    })?;
    if let Some(n) = notice {
        notify_host(n);
    }
    Ok(())
}

pub fn load_custom_text(text: &str) -> Result<usize, GameError> {
    with_driver(|d| {
        d.session.load_custom_text(text).inspect(|n| {
            info!("loaded {n} custom words");
        })
    })?
    .inspect_err(|e| log::warn!("custom text rejected: {e}"))
}

pub fn set_word_mode(mode: WordMode) -> Result<(), GameError> {
    with_driver(|d| d.session.set_word_mode(mode))
}

pub fn word_mode() -> Result<WordMode, GameError> {
    with_driver(|d| d.session.words().mode())
}

pub fn set_muted(muted: bool) -> Result<(), GameError> {
    with_driver(|d| {
        let playing = d.session.phase() == GamePhase::Playing;
        d.mixer.set_muted(muted, playing);
    })
}

pub fn is_muted() -> Result<bool, GameError> {
    with_driver(|d| d.mixer.is_muted())
}

pub fn phase() -> Result<GamePhase, GameError> {
    with_driver(|d| d.session.phase())
}

pub fn summary() -> Result<Summary, GameError> {
    with_driver(|d| d.session.summary())
}

/// Replace tuning. Applies to the next session start, audio sources included.
#[cfg(feature = "serde_json")]
pub fn configure(config: GameConfig) {
    let applied = DRIVER.with(|cell| match cell.borrow_mut().as_mut() {
        Some(d) => {
            d.session.set_config(config.clone());
            true
        }
        None => false,
    });
    if !applied {
        PENDING_CONFIG.with(|c| c.replace(Some(config)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_install_leaves_slot_empty_for_retry() {
        let slot: RefCell<Option<u32>> = RefCell::new(None);
        let err = init_slot(&slot, || Ok(7), || Err(GameError::NoWindow));
        assert!(matches!(err, Err(GameError::NoWindow)));
        assert!(slot.borrow().is_none());

        let mut installs = 0;
        init_slot(&slot, || Ok(7), || {
            installs += 1;
            Ok(())
        })
        .unwrap();
        assert_eq!(*slot.borrow(), Some(7));

        init_slot(&slot, || Ok(9), || {
            installs += 1;
            Ok(())
        })
        .unwrap();
        assert_eq!(*slot.borrow(), Some(7));
        assert_eq!(installs, 1);
    }

    #[test]
    fn failed_create_skips_install() {
        let slot: RefCell<Option<u32>> = RefCell::new(None);
        let mut installed = false;
        let err = init_slot(&slot, || Err(GameError::NoBody), || {
            installed = true;
            Ok(())
        });
        assert!(err.is_err());
        assert!(!installed);
        assert!(slot.borrow().is_none());
    }
}
