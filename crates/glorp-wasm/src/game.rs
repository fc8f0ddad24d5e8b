//! Glorpy Bird on a `<canvas>` driven by requestAnimationFrame
//!
//! The loop checks `canvas.isConnected` before every frame, so closing the
//! hosting window stops it without any explicit teardown.

use crate::storage::LocalStorage;
use glorp_core::{
    game::InputOutcome, GameCanvas, GameLoop, GameSession, GameState, HighScoreTable, LoopControl,
};
use std::cell::{Cell, RefCell};
use std::f64::consts::PI;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

const SKY_TOP: &str = "#4DC1F9";
const SKY_BOTTOM: &str = "#87CEEB";
const PIPE_LIGHT: &str = "#75C043";
const PIPE_DARK: &str = "#4CAF50";
const PIPE_BORDER: &str = "#558B2F";
const GLORP_GREEN: &str = "#2ecc71";

/// 2D context wrapper implementing [`GameCanvas`]
pub struct CanvasView {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasView {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, ctx })
    }

    fn draw(&self, session: &GameSession, high_scores: &HighScoreTable) -> Result<(), JsValue> {
        let width = f64::from(self.canvas.width());
        let height = f64::from(self.canvas.height());
        let ctx = &self.ctx;

        let sky = ctx.create_linear_gradient(0.0, 0.0, 0.0, height);
        sky.add_color_stop(0.0, SKY_TOP)?;
        sky.add_color_stop(1.0, SKY_BOTTOM)?;
        ctx.set_fill_style_canvas_gradient(&sky);
        ctx.fill_rect(0.0, 0.0, width, height);

        for obstacle in session.obstacles() {
            let pipe = ctx.create_linear_gradient(obstacle.x, 0.0, obstacle.x + obstacle.width, 0.0);
            pipe.add_color_stop(0.0, PIPE_LIGHT)?;
            pipe.add_color_stop(1.0, PIPE_DARK)?;
            ctx.set_fill_style_canvas_gradient(&pipe);
            ctx.fill_rect(obstacle.x, 0.0, obstacle.width, obstacle.gap_top);
            ctx.fill_rect(obstacle.x, obstacle.gap_bottom, obstacle.width, height - obstacle.gap_bottom);

            ctx.set_stroke_style_str(PIPE_BORDER);
            ctx.set_line_width(2.0);
            ctx.stroke_rect(obstacle.x, 0.0, obstacle.width, obstacle.gap_top);
            ctx.stroke_rect(obstacle.x, obstacle.gap_bottom, obstacle.width, height - obstacle.gap_bottom);
        }

        self.draw_bird(session)?;

        ctx.set_text_align("center");
        ctx.set_fill_style_str("white");
        ctx.set_stroke_style_str("black");
        ctx.set_line_width(3.0);
        ctx.set_font("bold 30px Arial");
        let score = format!("Score: {}", session.score());
        ctx.stroke_text(&score, width / 2.0, 40.0)?;
        ctx.fill_text(&score, width / 2.0, 40.0)?;

        if session.state() == GameState::GameOver {
            self.draw_overlay(session, high_scores, width, height)?;
        }
        Ok(())
    }

    fn draw_bird(&self, session: &GameSession) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let bird = session.bird();
        let half = bird.size / 2.0;

        ctx.save();
        ctx.translate(bird.x + half, bird.y + half)?;
        ctx.rotate(bird.rotation())?;

        let trail: &[(f64, f64)] = if session.is_over() { &[] } else { &[(0.3, 10.0), (0.2, 20.0)] };
        ctx.set_fill_style_str(GLORP_GREEN);
        for (alpha, offset) in trail {
            ctx.set_global_alpha(*alpha);
            ctx.begin_path();
            ctx.arc(-offset, 0.0, half, 0.0, 2.0 * PI)?;
            ctx.fill();
        }
        ctx.set_global_alpha(1.0);
        ctx.begin_path();
        ctx.arc(0.0, 0.0, half, 0.0, 2.0 * PI)?;
        ctx.fill();
        ctx.restore();
        Ok(())
    }

    fn draw_overlay(
        &self,
        session: &GameSession,
        high_scores: &HighScoreTable,
        width: f64,
        height: f64,
    ) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        ctx.set_fill_style_str("rgba(0,0,0,0.7)");
        ctx.fill_rect(0.0, 0.0, width, height);

        ctx.set_fill_style_str("white");
        ctx.set_font("bold 40px Arial");
        ctx.fill_text("Game Over!", width / 2.0, height / 2.0 - 40.0)?;
        ctx.set_font("bold 30px Arial");
        ctx.fill_text(&format!("Final Score: {}", session.score()), width / 2.0, height / 2.0 + 10.0)?;
        ctx.set_font("20px Arial");
        ctx.fill_text("Tap to play again", width / 2.0, height / 2.0 + 50.0)?;

        ctx.set_font("16px Arial");
        for (rank, row) in high_scores.ranked().iter().enumerate() {
            let y = height / 2.0 + 90.0 + rank as f64 * 22.0;
            ctx.fill_text(&format!("{}. {} - {}", rank + 1, row.player, row.score), width / 2.0, y)?;
        }
        Ok(())
    }
}

impl GameCanvas for CanvasView {
    fn is_attached(&self) -> bool {
        self.canvas.is_connected()
    }

    fn render(&mut self, session: &GameSession, high_scores: &HighScoreTable) {
        if let Err(e) = self.draw(session, high_scores) {
            web_sys::console::error_2(&"[Glorp WASM] Draw failed:".into(), &e);
        }
    }
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Whether a frame is pending and whether the JS handle is still alive.
///
/// A pending `requestAnimationFrame` keeps a pointer to the closure, so the
/// closure may only be freed once no frame is outstanding.
#[derive(Debug, Default)]
struct FrameState {
    running: Cell<bool>,
    dropped: Cell<bool>,
}

impl FrameState {
    /// Claim the loop; false when frames are already being requested
    fn begin(&self) -> bool {
        !self.dropped.get() && !self.running.replace(true)
    }

    /// Top of a frame. False once the handle is gone: stop and free the closure.
    fn enter(&self) -> bool {
        if self.dropped.get() {
            self.running.set(false);
            return false;
        }
        true
    }

    fn stop(&self) {
        self.running.set(false);
    }

    /// Handle dropped. True when no frame is pending and the closure can go now.
    fn release(&self) -> bool {
        self.dropped.set(true);
        !self.running.get()
    }

    fn is_running(&self) -> bool {
        self.running.get()
    }
}

/// A mounted game, handed to JS by `GlorpDesktop.mount_game`
#[wasm_bindgen]
pub struct GlorpyBird {
    game: Rc<RefCell<GameLoop<CanvasView>>>,
    store: Rc<RefCell<LocalStorage>>,
    callback: FrameCallback,
    state: Rc<FrameState>,
}

impl GlorpyBird {
    pub(crate) fn new(game: GameLoop<CanvasView>) -> Self {
        Self {
            game: Rc::new(RefCell::new(game)),
            store: Rc::new(RefCell::new(LocalStorage::open())),
            callback: Rc::new(RefCell::new(None)),
            state: Rc::new(FrameState::default()),
        }
    }

    fn schedule(&self) {
        if !self.state.begin() {
            return;
        }

        let game = self.game.clone();
        let store = self.store.clone();
        let state = self.state.clone();
        let next = self.callback.clone();
        *self.callback.borrow_mut() = Some(Closure::new(move || {
            if !state.enter() {
                let _ = next.borrow_mut().take();
                return;
            }
            let control = game.borrow_mut().frame(&mut *store.borrow_mut());
            match control {
                LoopControl::Continue => {
                    if !request_frame(&next) {
                        state.stop();
                    }
                }
                LoopControl::Idle | LoopControl::Halt => state.stop(),
            }
        }));
        if !request_frame(&self.callback) {
            self.state.stop();
        }
    }
}

/// Ask for the next frame; false when none was scheduled
fn request_frame(callback: &FrameCallback) -> bool {
    let Some(window) = web_sys::window() else { return false };
    let callback = callback.borrow();
    let Some(cb) = callback.as_ref() else { return false };
    match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
        Ok(_) => true,
        Err(e) => {
            web_sys::console::error_2(&"[Glorp WASM] requestAnimationFrame failed:".into(), &e);
            false
        }
    }
}

#[wasm_bindgen]
impl GlorpyBird {
    /// Start requesting frames
    #[wasm_bindgen]
    pub fn start(&self) {
        self.schedule();
    }

    /// Click, tap or space. Restarts the loop after a game over.
    #[wasm_bindgen]
    pub fn jump(&self) {
        let outcome = self.game.borrow_mut().input();
        if outcome == Some(InputOutcome::Restarted) {
            self.schedule();
        }
    }

    #[wasm_bindgen(getter)]
    pub fn score(&self) -> u32 {
        self.game.borrow().session().score()
    }

    #[wasm_bindgen(getter)]
    pub fn game_over(&self) -> bool {
        self.game.borrow().session().is_over()
    }

    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.state.is_running()
    }

    /// Ranked table as `[{player, score}]`
    #[wasm_bindgen]
    pub fn high_scores(&self) -> Result<JsValue, JsValue> {
        let rows = self.game.borrow().high_scores().ranked();
        serde_wasm_bindgen::to_value(&rows).map_err(Into::into)
    }
}

impl Drop for GlorpyBird {
    fn drop(&mut self) {
        // with a frame pending, the closure frees itself when it runs
        if self.state.release() {
            self.callback.borrow_mut().take();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_claimed_once() {
        let state = FrameState::default();
        assert!(state.begin());
        assert!(!state.begin());
        assert!(state.is_running());

        state.stop();
        assert!(state.begin());
    }

    #[test]
    fn test_drop_with_pending_frame_defers_release() {
        let state = FrameState::default();
        assert!(state.begin());

        assert!(!state.release());
        assert!(state.is_running());

        // the pending frame runs, sees the handle is gone and stops
        assert!(!state.enter());
        assert!(!state.is_running());
        assert!(!state.begin());
    }

    #[test]
    fn test_drop_when_idle_releases_now() {
        let state = FrameState::default();
        assert!(state.begin());
        assert!(state.enter());
        state.stop();

        assert!(state.release());
    }
}
