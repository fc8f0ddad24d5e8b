//! Glorp WASM - GlorpCat OS in the browser
//!
//! Binds the core desktop to the page:
//! - `GlorpDesktop`: windows as DOM shells, taskbar mirroring, drag, timers
//! - `GlorpyBird`: the game on a `<canvas>` driven by requestAnimationFrame
//! - settings persisted to `localStorage`
//!
//! ## Usage
//!
//! ```javascript
//! import init, { GlorpDesktop } from '@glorp/wasm';
//!
//! await init();
//! const desktop = new GlorpDesktop(innerWidth, innerHeight);
//! desktop.attach('desktop', 'taskbar-items');
//! desktop.boot(performance.now());
//! const pump = (now) => { handle(desktop.tick(now)); requestAnimationFrame(pump); };
//! requestAnimationFrame(pump);
//! ```

use wasm_bindgen::prelude::*;

mod desktop;
mod dom;
mod game;
mod storage;

pub use desktop::GlorpDesktop;
pub use game::{CanvasView, GlorpyBird};
pub use storage::LocalStorage;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    web_sys::console::log_1(&format!("[Glorp WASM] Initialized (core {})", glorp_core::VERSION).into());
}

/// Library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Catalog of launchable apps as `[{slug, title, width, height}]`
#[wasm_bindgen]
pub fn app_catalog() -> Result<JsValue, JsValue> {
    #[derive(serde::Serialize)]
    struct Entry {
        slug: &'static str,
        title: &'static str,
        width: f64,
        height: f64,
    }

    let entries: Vec<Entry> = glorp_core::AppKind::ALL
        .iter()
        .map(|app| {
            let size = app.default_size();
            Entry {
                slug: app.slug(),
                title: app.title(),
                width: size.width,
                height: size.height,
            }
        })
        .collect();
    serde_wasm_bindgen::to_value(&entries).map_err(Into::into)
}
