//! Integration tests for Glorp Core

use glorp_core::{
    apps::CommandOutput,
    game::{GameOverCause, HighScoreTable, SubmitOutcome},
    storage::keys,
    AppKind, Desktop, DesktopConfig, DesktopEvent, Error, GameCanvas, GameConfig, GameLoop,
    GameSession, GameState, KeyValueStore, LoopControl, MemoryStore, PointerEvent, Theme, Viewport,
    WindowContent, WindowManager,
};

/// Core logs show up in failing test output
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("glorp_core=debug")
        .with_test_writer()
        .try_init();
}

fn desktop(viewport: Viewport) -> Desktop<MemoryStore> {
    init_tracing();
    Desktop::new(DesktopConfig::default(), GameConfig::default(), viewport, MemoryStore::new())
        .unwrap()
        .with_seed(11)
}

// =============================================================================
// Window Manager Tests
// =============================================================================

#[test]
fn test_taskbar_stays_in_sync() {
    let mut desktop = desktop(Viewport::DESKTOP_1080P);
    let mut open = Vec::new();
    for app in [AppKind::Chat, AppKind::Terminal, AppKind::Settings, AppKind::Game, AppKind::Chat] {
        open.push(desktop.launch(app).unwrap());
        desktop.wm().check_consistency().unwrap();
    }

    desktop.wm_mut().minimize_window(open[1]).unwrap();
    desktop.wm().check_consistency().unwrap();
    desktop.wm_mut().toggle_maximize(open[2]).unwrap();
    desktop.wm_mut().taskbar_click(open[1]).unwrap();
    desktop.wm().check_consistency().unwrap();
    desktop.close(open[0]).unwrap();
    desktop.close(open[3]).unwrap();
    desktop.wm().check_consistency().unwrap();

    assert_eq!(desktop.wm().len(), 3);
    assert_eq!(desktop.wm().taskbar().len(), 3);
}

#[test]
fn test_at_most_one_active_entry() {
    let mut wm = WindowManager::new(DesktopConfig::default(), Viewport::LAPTOP);
    let a = wm.create_window("A", WindowContent::Markup("a".into()), 400.0, 300.0);
    let b = wm.create_window("B", WindowContent::Markup("b".into()), 400.0, 300.0);

    let active = |wm: &WindowManager| wm.taskbar().entries().iter().filter(|e| e.active).count();
    assert_eq!(active(&wm), 1);
    assert_eq!(wm.focused(), Some(b));

    wm.focus_window(a).unwrap();
    assert_eq!(active(&wm), 1);
    assert_eq!(wm.topmost(), Some(a));

    wm.minimize_window(a).unwrap();
    assert_eq!(active(&wm), 0);
}

#[test]
fn test_same_title_windows_are_independent() {
    let mut desktop = desktop(Viewport::DESKTOP_1080P);
    let first = desktop.launch(AppKind::Terminal).unwrap();
    let second = desktop.launch(AppKind::Terminal).unwrap();
    assert_ne!(first, second);

    desktop.close(first).unwrap();
    assert!(desktop.wm().contains(second));
    assert!(desktop.terminal(second).is_some());
}

#[test]
fn test_drag_stays_inside_viewport() {
    let mut wm = WindowManager::new(DesktopConfig::default(), Viewport::new(1000.0, 800.0));
    let id = wm.create_window("Drag me", WindowContent::Markup(String::new()), 400.0, 300.0);
    let origin = wm.window(id).unwrap().position;

    wm.begin_drag(id, PointerEvent::mouse(origin.x + 10.0, origin.y + 10.0)).unwrap();
    for (x, y) in [(-500.0, -500.0), (5000.0, 5000.0), (420.0, 260.0)] {
        let position = wm.drag_to(PointerEvent::mouse(x, y)).unwrap();
        assert!(position.x >= 0.0 && position.x + 400.0 <= 1000.0);
        assert!(position.y >= 0.0 && position.y + 300.0 <= 800.0);
    }
    assert_eq!(wm.end_drag(), Some(id));
    assert!(wm.drag_to(PointerEvent::mouse(0.0, 0.0)).is_none());
}

#[test]
fn test_touch_drag_matches_mouse() {
    let mut wm = WindowManager::new(DesktopConfig::default(), Viewport::PHONE);
    let id = wm.create_window("Chat", WindowContent::App(AppKind::Chat), 400.0, 600.0);
    let origin = wm.window(id).unwrap().position;

    wm.begin_drag(id, PointerEvent::touch(origin.x + 5.0, origin.y + 5.0)).unwrap();
    let moved = wm.drag_to(PointerEvent::touch(origin.x + 5.0, origin.y + 55.0)).unwrap();
    assert!((moved.y - (origin.y + 50.0)).abs() < 1e-9);
    assert!((moved.x - origin.x).abs() < 1e-9);
}

#[test]
fn test_fullscreen_window_cannot_be_dragged() {
    let mut wm = WindowManager::new(DesktopConfig::default(), Viewport::DESKTOP_1080P);
    let id = wm.create_window("Game", WindowContent::App(AppKind::Game), 800.0, 600.0);
    assert!(wm.toggle_maximize(id).unwrap());

    let err = wm.begin_drag(id, PointerEvent::mouse(100.0, 100.0)).unwrap_err();
    assert!(matches!(err, Error::WindowFullscreen(_)));
    assert!(err.is_soft());
}

#[test]
fn test_oversized_request_is_clamped() {
    let mut wm = WindowManager::new(DesktopConfig::default(), Viewport::new(1024.0, 700.0));
    let id = wm.create_window("Huge", WindowContent::Markup(String::new()), 5000.0, 5000.0);
    let window = wm.window(id).unwrap();

    assert_eq!(window.size.width, 1024.0 - 40.0);
    assert_eq!(window.size.height, 700.0 - 100.0);
    assert_eq!(window.position.x, 20.0);
    assert_eq!(window.position.y, 50.0);
}

#[test]
fn test_narrow_layout() {
    let mut wm = WindowManager::new(DesktopConfig::default(), Viewport::PHONE);
    let id = wm.create_window("Donate", WindowContent::App(AppKind::Donate), 500.0, 700.0);
    let window = wm.window(id).unwrap();

    assert!(window.is_narrow());
    assert_eq!(window.size.width, 390.0 * 0.9);
    assert_eq!(window.size.height, 844.0 * 0.8);
    assert_eq!(window.position.x, (390.0 - 390.0 * 0.9) / 2.0);
    assert!(matches!(wm.toggle_maximize(id), Err(Error::FullscreenUnavailable(_))));
}

// =============================================================================
// Desktop Tests
// =============================================================================

#[test]
fn test_chat_stops_after_close() {
    let mut desktop = desktop(Viewport::DESKTOP_1080P);
    let chat = desktop.launch(AppKind::Chat).unwrap();
    let other = desktop.launch(AppKind::Chat).unwrap();

    let events = desktop.advance(3_000);
    assert_eq!(events.len(), 2);

    desktop.close(chat).unwrap();
    let events: Vec<_> = (31..=120).flat_map(|step| desktop.advance(step * 100)).collect();
    assert_eq!(events.len(), 3);
    assert!(events
        .iter()
        .all(|e| matches!(e, DesktopEvent::ChatMessage { window, .. } if *window == other)));
}

#[test]
fn test_terminal_session() {
    let mut desktop = desktop(Viewport::LAPTOP);
    let id = desktop.launch(AppKind::Terminal).unwrap();

    assert_eq!(
        desktop.run_terminal(id, "glorp").unwrap(),
        Some(CommandOutput::Text("GLORP TO THE MOON! 🚀".into()))
    );
    assert_eq!(desktop.run_terminal(id, "sudo").unwrap(), None);
    assert!(desktop
        .terminal(id)
        .unwrap()
        .lines()
        .contains(&"Command not found: sudo".to_string()));
}

#[test]
fn test_settings_survive_restart() {
    let mut desktop = desktop(Viewport::LAPTOP);
    desktop.set_theme("default").unwrap();
    desktop.set_window_opacity(0.2).unwrap();
    desktop.set_blur_effects(false).unwrap();

    let store = MemoryStore::with_values([
        (keys::THEME, desktop.store().get(keys::THEME).unwrap().unwrap()),
        (keys::WINDOW_OPACITY, desktop.store().get(keys::WINDOW_OPACITY).unwrap().unwrap()),
        (keys::BLUR_EFFECTS, desktop.store().get(keys::BLUR_EFFECTS).unwrap().unwrap()),
    ]);
    let reloaded = Desktop::new(DesktopConfig::default(), GameConfig::default(), Viewport::LAPTOP, store).unwrap();

    assert_eq!(reloaded.settings().theme, Theme::Default);
    assert_eq!(reloaded.settings().window_opacity, 0.5);
    assert!(!reloaded.settings().blur_effects);
    assert!(reloaded.settings().system_sounds);
}

#[test]
fn test_lock_screen() {
    let mut desktop = desktop(Viewport::LAPTOP);
    desktop.shell_mut().lock();
    assert!(matches!(desktop.unlock("cat"), Err(Error::IncorrectPassword)));
    desktop.unlock("glorp").unwrap();
    assert!(!desktop.shell().is_locked());
}

// =============================================================================
// Game Tests
// =============================================================================

struct NullCanvas {
    attached: bool,
}

impl GameCanvas for NullCanvas {
    fn is_attached(&self) -> bool {
        self.attached
    }

    fn render(&mut self, _session: &GameSession, _high_scores: &HighScoreTable) {}
}

#[test]
fn test_game_runs_until_window_closes() {
    let mut desktop = desktop(Viewport::DESKTOP_1080P);
    let id = desktop.launch(AppKind::Game).unwrap();
    let mut game: GameLoop<NullCanvas> = desktop.mount_game(id, NullCanvas { attached: true }).unwrap();

    assert_eq!(game.frame(desktop.store_mut()), LoopControl::Continue);
    desktop.close(id).unwrap();
    game.canvas_mut().attached = false;
    assert_eq!(game.frame(desktop.store_mut()), LoopControl::Halt);
    assert!(game.is_halted());
}

#[test]
fn test_mount_game_requires_game_window() {
    let mut desktop = desktop(Viewport::DESKTOP_1080P);
    let id = desktop.launch(AppKind::Help).unwrap();
    let result = desktop.mount_game(id, NullCanvas { attached: true });
    assert!(matches!(result, Err(Error::NoAppState(_))));
}

#[test]
fn test_speed_never_exceeds_cap() {
    let mut game = GameSession::new(GameConfig::default(), 99);
    for _ in 0..50_000 {
        // hold the bird in the middle of the next gap
        let target = game
            .obstacles()
            .iter()
            .find(|o| o.trailing_edge() >= game.bird().x)
            .map(|o| o.gap_center() - game.bird().size / 2.0)
            .unwrap_or(300.0);
        game.place_bird(target, 0.0);
        game.tick();
        assert!(game.speed() <= 3.0 + f64::EPSILON);
        if game.is_over() {
            break;
        }
    }
    assert!(game.score() >= 15);
    assert_eq!(game.speed(), 3.0);
}

#[test]
fn test_out_of_bounds_ends_once() {
    let mut game = GameSession::new(GameConfig::default(), 5);
    game.place_bird(-100.0, 0.0);
    let report = game.tick();
    assert_eq!(report.game_over, Some(GameOverCause::OutOfBounds));
    assert_eq!(game.state(), GameState::GameOver);
    assert_eq!(game.tick().game_over, None);
}

#[test]
fn test_restart_after_game_over() {
    let mut game = GameSession::new(GameConfig::default(), 5);
    while game.tick().game_over.is_none() {}
    game.jump();
    assert_eq!(game.state(), GameState::Running);
    assert_eq!(game.score(), 0);
    assert!(game.obstacles().is_empty());
}

// =============================================================================
// High Score Tests
// =============================================================================

#[test]
fn test_high_scores_bounded_and_sorted() {
    let mut store = MemoryStore::new();
    let mut table = HighScoreTable::new(3);
    for (player, score) in [("ana", 4), ("bo", 9), ("cy", 1), ("di", 6), ("ed", 2)] {
        table.submit(player, score);
        assert!(table.len() <= 3);
    }
    table.save(&mut store).unwrap();

    let loaded = HighScoreTable::load(&store, 3);
    let ranked: Vec<(String, u32)> = loaded.ranked().into_iter().map(|h| (h.player, h.score)).collect();
    assert_eq!(
        ranked,
        vec![("bo".to_string(), 9), ("di".to_string(), 6), ("ana".to_string(), 4)]
    );
}

#[test]
fn test_only_improvements_are_stored() {
    let mut table = HighScoreTable::new(5);
    assert_eq!(table.submit("Player", 7), SubmitOutcome::Added);
    assert_eq!(table.submit("Player", 3), SubmitOutcome::NotImproved { best: 7 });
    assert_eq!(table.submit("Player", 8), SubmitOutcome::Improved { previous: 7 });
    assert_eq!(table.best("Player"), Some(8));
}

#[test]
fn test_malformed_scores_load_empty() {
    let store = MemoryStore::with_values([(keys::HIGH_SCORES, "{not json")]);
    assert!(HighScoreTable::load(&store, 5).is_empty());
}
