//! `GlorpDesktop` - the JS-facing desktop
//!
//! Window-manager failures are soft: they are logged to the console at
//! debug level and reported as `false`, never thrown.

use crate::dom::DomRenderer;
use crate::game::{CanvasView, GlorpyBird};
use crate::storage::LocalStorage;
use glorp_core::{
    apps::ChatMessage, AppKind, Desktop, DesktopConfig, DesktopEvent, DisplayState, Error, GameConfig,
    PointerEvent, ShellEvent, Viewport, WindowContent, WindowId,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

fn to_js(e: Error) -> JsValue {
    JsValue::from_str(&format!("{}: {}", e.error_code(), e))
}

/// `performance.now()`, the same clock the host pumps `tick` with
fn host_now() -> Option<u64> {
    let performance = web_sys::window()?.performance()?;
    Some(performance.now().max(0.0) as u64)
}

fn parse_id(id: &str) -> Result<WindowId, JsValue> {
    WindowId::parse(id).ok_or_else(|| JsValue::from_str(&format!("invalid window id: {id}")))
}

/// Event shape handed to JS from `tick`
#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum JsEvent {
    BootMessage { text: &'static str },
    BootFading,
    BootFinished,
    Clock { text: String },
    ChatMessage { window: String, message: ChatMessage },
}

impl From<DesktopEvent> for JsEvent {
    fn from(event: DesktopEvent) -> Self {
        match event {
            DesktopEvent::Shell(ShellEvent::BootMessage(text)) => JsEvent::BootMessage { text },
            DesktopEvent::Shell(ShellEvent::BootFading) => JsEvent::BootFading,
            DesktopEvent::Shell(ShellEvent::BootFinished) => JsEvent::BootFinished,
            DesktopEvent::Shell(ShellEvent::Clock(text)) => JsEvent::Clock { text },
            DesktopEvent::ChatMessage { window, message } => JsEvent::ChatMessage {
                window: window.to_string(),
                message,
            },
        }
    }
}

#[derive(Serialize)]
struct WindowView {
    id: String,
    title: String,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    z_index: usize,
    state: DisplayState,
    narrow: bool,
    active: bool,
}

#[wasm_bindgen]
pub struct GlorpDesktop {
    desktop: Desktop<LocalStorage>,
    dom: Option<DomRenderer>,
}

impl GlorpDesktop {
    /// Run a window operation, swallowing soft failures
    fn soft<T>(&mut self, op: &str, f: impl FnOnce(&mut Desktop<LocalStorage>) -> glorp_core::Result<T>) -> Option<T> {
        match f(&mut self.desktop) {
            Ok(value) => {
                self.redraw();
                Some(value)
            }
            Err(e) => {
                web_sys::console::debug_1(&format!("[Glorp WASM] {op} ignored: {e}").into());
                None
            }
        }
    }

    fn redraw(&mut self) {
        if let Some(dom) = self.dom.as_mut() {
            if let Err(e) = dom.sync(self.desktop.wm()) {
                web_sys::console::error_2(&"[Glorp WASM] DOM sync failed:".into(), &e);
            }
        }
    }
}

#[wasm_bindgen]
impl GlorpDesktop {
    /// Create a desktop for a viewport of the given size
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64) -> Result<GlorpDesktop, JsValue> {
        let desktop = Desktop::new(
            DesktopConfig::default(),
            GameConfig::default(),
            Viewport::new(width, height),
            LocalStorage::open(),
        )
        .map_err(to_js)?
        .with_seed(js_sys::Date::now() as u64);
        Ok(Self { desktop, dom: None })
    }

    /// Render into `#root_id`, mirroring the taskbar into `#taskbar_id`
    #[wasm_bindgen]
    pub fn attach(&mut self, root_id: &str, taskbar_id: &str) -> Result<(), JsValue> {
        self.dom = Some(DomRenderer::new(root_id, taskbar_id)?);
        self.redraw();
        Ok(())
    }

    /// Start the boot screen and clock at `performance.now()`; returns the
    /// first clock text
    #[wasm_bindgen]
    pub fn boot(&mut self, now_ms: f64) -> String {
        self.desktop.boot(now_ms.max(0.0) as u64)
    }

    /// Pump timers with `performance.now()`; returns the events that fired
    #[wasm_bindgen]
    pub fn tick(&mut self, now_ms: f64) -> Result<JsValue, JsValue> {
        let events: Vec<JsEvent> = self
            .desktop
            .advance(now_ms.max(0.0) as u64)
            .into_iter()
            .map(JsEvent::from)
            .collect();
        serde_wasm_bindgen::to_value(&events).map_err(Into::into)
    }

    /// Open an app by slug or title; returns the window id
    #[wasm_bindgen]
    pub fn launch(&mut self, app: &str) -> Result<String, JsValue> {
        let app: AppKind = app.parse().map_err(to_js)?;
        if let Some(now) = host_now() {
            self.desktop.sync_clock(now);
        }
        let id = self.desktop.launch(app).map_err(to_js)?;
        self.redraw();
        Ok(id.to_string())
    }

    /// Open a window with caller-supplied markup
    #[wasm_bindgen]
    pub fn open_markup(&mut self, title: &str, html: String, width: f64, height: f64) -> String {
        let id = self.desktop.open(title, WindowContent::Markup(html), width, height);
        self.redraw();
        id.to_string()
    }

    #[wasm_bindgen]
    pub fn close(&mut self, id: &str) -> Result<bool, JsValue> {
        let id = parse_id(id)?;
        Ok(self.soft("close", |d| d.close(id)).is_some())
    }

    #[wasm_bindgen]
    pub fn minimize(&mut self, id: &str) -> Result<bool, JsValue> {
        let id = parse_id(id)?;
        Ok(self.soft("minimize", |d| d.wm_mut().minimize_window(id)).is_some())
    }

    #[wasm_bindgen]
    pub fn maximize(&mut self, id: &str) -> Result<bool, JsValue> {
        let id = parse_id(id)?;
        Ok(self.soft("maximize", |d| d.wm_mut().maximize_window(id)).is_some())
    }

    /// Returns the new fullscreen flag, or `undefined` when unavailable
    #[wasm_bindgen]
    pub fn toggle_maximize(&mut self, id: &str) -> Result<Option<bool>, JsValue> {
        let id = parse_id(id)?;
        Ok(self.soft("toggle_maximize", |d| d.wm_mut().toggle_maximize(id)))
    }

    #[wasm_bindgen]
    pub fn focus(&mut self, id: &str) -> Result<bool, JsValue> {
        let id = parse_id(id)?;
        Ok(self.soft("focus", |d| d.wm_mut().focus_window(id)).is_some())
    }

    #[wasm_bindgen]
    pub fn taskbar_click(&mut self, id: &str) -> Result<bool, JsValue> {
        let id = parse_id(id)?;
        Ok(self.soft("taskbar_click", |d| d.wm_mut().taskbar_click(id)).is_some())
    }

    #[wasm_bindgen]
    pub fn resize(&mut self, id: &str, width: f64, height: f64) -> Result<bool, JsValue> {
        let id = parse_id(id)?;
        Ok(self.soft("resize", |d| d.wm_mut().resize_window(id, width, height)).is_some())
    }

    /// Pointer-down on a header (mouse or touch)
    #[wasm_bindgen]
    pub fn begin_drag(&mut self, id: &str, x: f64, y: f64, touch: bool) -> Result<bool, JsValue> {
        let id = parse_id(id)?;
        let pointer = if touch { PointerEvent::touch(x, y) } else { PointerEvent::mouse(x, y) };
        Ok(self.soft("begin_drag", |d| d.wm_mut().begin_drag(id, pointer)).is_some())
    }

    #[wasm_bindgen]
    pub fn drag_to(&mut self, x: f64, y: f64, touch: bool) -> bool {
        let pointer = if touch { PointerEvent::touch(x, y) } else { PointerEvent::mouse(x, y) };
        let moved = self.desktop.wm_mut().drag_to(pointer).is_some();
        if moved {
            self.redraw();
        }
        moved
    }

    #[wasm_bindgen]
    pub fn end_drag(&mut self) {
        self.desktop.wm_mut().end_drag();
    }

    /// Browser resized
    #[wasm_bindgen]
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.desktop.wm_mut().set_viewport(Viewport::new(width, height));
        self.redraw();
    }

    /// Windows as `[{id, title, x, y, width, height, z_index, state, narrow, active}]`
    #[wasm_bindgen]
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        let wm = self.desktop.wm();
        let views: Vec<WindowView> = wm
            .windows()
            .map(|w| WindowView {
                id: w.id.to_string(),
                title: w.title.clone(),
                x: w.position.x,
                y: w.position.y,
                width: w.size.width,
                height: w.size.height,
                z_index: wm.z_index(w.id).unwrap_or(0),
                state: w.state(),
                narrow: w.is_narrow(),
                active: wm.focused() == Some(w.id),
            })
            .collect();
        serde_wasm_bindgen::to_value(&views).map_err(Into::into)
    }

    // Apps

    /// Send from the chat input; returns the appended message or `null`
    #[wasm_bindgen]
    pub fn send_chat(&mut self, id: &str, text: &str) -> Result<JsValue, JsValue> {
        let id = parse_id(id)?;
        let message = self.desktop.send_chat(id, text).map_err(to_js)?;
        serde_wasm_bindgen::to_value(&message).map_err(Into::into)
    }

    #[wasm_bindgen]
    pub fn chat_messages(&self, id: &str) -> Result<JsValue, JsValue> {
        let id = parse_id(id)?;
        let chat = self.desktop.chat(id).ok_or_else(|| to_js(Error::NoAppState(id)))?;
        serde_wasm_bindgen::to_value(chat.messages()).map_err(Into::into)
    }

    /// Run a terminal line; returns the whole screen text
    #[wasm_bindgen]
    pub fn run_terminal(&mut self, id: &str, input: &str) -> Result<String, JsValue> {
        let id = parse_id(id)?;
        self.desktop.run_terminal(id, input).map_err(to_js)?;
        Ok(self.desktop.terminal(id).map(|t| t.screen()).unwrap_or_default())
    }

    /// Mount Glorpy Bird into a game window and start it
    #[wasm_bindgen]
    pub fn mount_game(&mut self, id: &str, canvas: Option<HtmlCanvasElement>) -> Result<GlorpyBird, JsValue> {
        let id = parse_id(id)?;
        let config = self.desktop.game_config().clone();
        let canvas = match (canvas, self.dom.as_ref()) {
            (Some(canvas), _) => {
                canvas.set_width(config.width as u32);
                canvas.set_height(config.height as u32);
                canvas
            }
            (None, Some(dom)) => dom.game_canvas(id, config.width as u32, config.height as u32)?,
            (None, None) => return Err(JsValue::from_str("no canvas given and no DOM attached")),
        };

        let game = self.desktop.mount_game(id, CanvasView::new(canvas)?).map_err(to_js)?;
        let bird = GlorpyBird::new(game);
        bird.start();
        Ok(bird)
    }

    // Settings

    #[wasm_bindgen]
    pub fn settings(&self) -> String {
        self.desktop.settings().to_json()
    }

    /// `:root { ... }` block for the current theme
    #[wasm_bindgen]
    pub fn theme_css(&self) -> String {
        self.desktop.settings().to_css()
    }

    #[wasm_bindgen]
    pub fn set_theme(&mut self, name: &str) -> Result<(), JsValue> {
        self.desktop.set_theme(name).map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn set_window_opacity(&mut self, value: f64) -> Result<(), JsValue> {
        self.desktop.set_window_opacity(value).map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn set_blur_effects(&mut self, enabled: bool) -> Result<(), JsValue> {
        self.desktop.set_blur_effects(enabled).map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn set_system_sounds(&mut self, enabled: bool) -> Result<(), JsValue> {
        self.desktop.set_system_sounds(enabled).map_err(to_js)
    }

    // Chrome

    #[wasm_bindgen]
    pub fn clock(&self) -> String {
        self.desktop.shell().clock().to_string()
    }

    #[wasm_bindgen]
    pub fn toggle_start_menu(&mut self) -> bool {
        self.desktop.shell_mut().toggle_start_menu()
    }

    #[wasm_bindgen]
    pub fn close_start_menu(&mut self) {
        self.desktop.shell_mut().close_start_menu();
    }

    #[wasm_bindgen]
    pub fn lock(&mut self) {
        self.desktop.shell_mut().lock();
    }

    #[wasm_bindgen]
    pub fn unlock(&mut self, password: &str) -> Result<(), JsValue> {
        self.desktop.unlock(password).map_err(to_js)
    }

    #[wasm_bindgen(getter)]
    pub fn locked(&self) -> bool {
        self.desktop.shell().is_locked()
    }

    #[wasm_bindgen]
    pub fn power_off(&mut self) {
        self.desktop.power_off();
        self.redraw();
    }
}
