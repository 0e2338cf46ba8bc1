//! Renderer contract tests: replay emitted escape streams against a model
//! terminal and check the visible-content guarantees.

use glint::{Color, Renderer};

/// Collect the visible contents of a model terminal row.
fn row_text(screen: &vt100::Screen, row: u16, cols: u16) -> String {
    (0..cols)
        .map(|col| {
            screen
                .cell(row, col)
                .map(|c| {
                    let s = c.contents();
                    if s.is_empty() { " ".to_string() } else { s }
                })
                .unwrap_or_else(|| " ".to_string())
        })
        .collect()
}

#[test]
fn replayed_present_matches_back_buffer() {
    let (width, height) = (20, 6);
    let mut renderer = Renderer::headless(width, height);

    renderer.draw_text(2, 1, "hello", Color::BrightGreen, Color::Black);
    renderer.draw_text(2, 2, "world", Color::Rgb(200, 10, 10), Color::Black);
    renderer.present().unwrap();

    let mut parser = vt100::Parser::new(height, width, 0);
    parser.process(&renderer.take_captured());

    let screen = parser.screen();
    assert_eq!(row_text(screen, 1, width), "  hello             ");
    assert_eq!(row_text(screen, 2, width), "  world             ");

    // Named colors arrive as indexed SGR, RGB as truecolor.
    assert_eq!(screen.cell(1, 2).unwrap().fgcolor(), vt100::Color::Idx(10));
    assert_eq!(
        screen.cell(2, 2).unwrap().fgcolor(),
        vt100::Color::Rgb(200, 10, 10)
    );
}

#[test]
fn incremental_stream_replays_to_the_new_frame() {
    let (width, height) = (16, 4);
    let mut renderer = Renderer::headless(width, height);
    let mut parser = vt100::Parser::new(height, width, 0);

    // Frame 1: establish B1 on the model terminal.
    renderer.draw_text(0, 0, "scoreboard", Color::White, Color::Black);
    renderer.draw_text(0, 2, "lives 3", Color::White, Color::Black);
    renderer.present().unwrap();
    parser.process(&renderer.take_captured());
    assert_eq!(row_text(parser.screen(), 2, width), "lives 3         ");

    // Frame 2: redraw everything, one cell differing.
    renderer.draw_text(0, 0, "scoreboard", Color::White, Color::Black);
    renderer.draw_text(0, 2, "lives 2", Color::White, Color::Black);
    renderer.present().unwrap();

    // Exactly the changed cell was emitted, and replaying the delta stream
    // over B1 yields exactly B2.
    assert_eq!(renderer.last_present_stats().cells_changed, 1);
    parser.process(&renderer.take_captured());
    assert_eq!(row_text(parser.screen(), 0, width), "scoreboard      ");
    assert_eq!(row_text(parser.screen(), 2, width), "lives 2         ");
}

#[test]
fn present_without_changes_emits_no_bytes() {
    let mut renderer = Renderer::headless(10, 3);
    renderer.draw_text(0, 0, "static", Color::White, Color::Black);
    renderer.present().unwrap();
    let _ = renderer.take_captured();

    renderer.present().unwrap();
    assert!(renderer.take_captured().is_empty());
}

#[test]
fn resize_repaints_the_full_screen() {
    let mut renderer = Renderer::headless(12, 4);
    renderer.present().unwrap();
    let _ = renderer.take_captured();

    renderer.resize(8, 3);
    renderer.draw_text(0, 0, "resized", Color::White, Color::Black);
    renderer.present().unwrap();

    assert_eq!(renderer.last_present_stats().cells_changed, 8 * 3);

    let mut parser = vt100::Parser::new(3, 8, 0);
    parser.process(&renderer.take_captured());
    assert_eq!(row_text(parser.screen(), 0, 8), "resized ");
}

#[test]
fn stale_content_is_erased_on_the_model_terminal() {
    let (width, height) = (12, 3);
    let mut renderer = Renderer::headless(width, height);
    let mut parser = vt100::Parser::new(height, width, 0);

    renderer.draw_text(0, 1, "ghost", Color::White, Color::Black);
    renderer.present().unwrap();
    parser.process(&renderer.take_captured());
    assert_eq!(row_text(parser.screen(), 1, width), "ghost       ");

    // Next frame draws nothing at (0,1); the full-clear policy erases it.
    renderer.draw_text(0, 0, "live", Color::White, Color::Black);
    renderer.present().unwrap();
    parser.process(&renderer.take_captured());

    assert_eq!(row_text(parser.screen(), 0, width), "live        ");
    assert_eq!(row_text(parser.screen(), 1, width), "            ");
}
