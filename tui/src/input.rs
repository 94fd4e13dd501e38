//! Input handling for the Civic TUI.

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use tracing::debug;

use civic_engine::{App, InputMode, Scene};

const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(50); // frame pacing
const MAX_EVENTS_PER_FRAME: usize = 64; // never starve rendering
const FINE_STEP: i32 = 1;
const COARSE_STEP: i32 = 5;

/// Drain pending terminal events into `app`. Returns whether to quit.
pub fn handle_events(app: &mut App) -> Result<bool> {
    if !event::poll(INPUT_POLL_TIMEOUT)? {
        return Ok(app.should_quit());
    }
    let mut processed = 0;
    while processed < MAX_EVENTS_PER_FRAME {
        let ev = event::read()?;
        if apply_event(app, ev) {
            return Ok(true);
        }
        processed += 1;
        if !event::poll(Duration::ZERO)? {
            break;
        }
    }
    Ok(app.should_quit())
}

/// Apply one terminal event. Returns whether to quit.
pub fn apply_event(app: &mut App, event: Event) -> bool {
    match event {
        Event::Key(key) => {
            // Handle press + repeat events (ignore releases)
            if matches!(key.kind, KeyEventKind::Release) {
                return app.should_quit();
            }
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                app.request_quit();
                return true;
            }
            if app.confirm_prompt().is_some() {
                handle_confirm(app, key);
            } else {
                handle_key(app, key);
            }
        }
        Event::Mouse(mouse) => handle_mouse(app, mouse),
        _ => {}
    }
    app.should_quit()
}

fn handle_confirm(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y' | 'Y') | KeyCode::Enter => {
            app.confirm_layer_switch();
        }
        KeyCode::Char('n' | 'N') | KeyCode::Esc => {
            app.cancel_layer_switch();
        }
        _ => {}
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    let scene = app.scene();
    let step = if key.modifiers.contains(KeyModifiers::SHIFT) {
        COARSE_STEP
    } else {
        FINE_STEP
    };

    match key.code {
        KeyCode::Char('q') => app.request_quit(),
        KeyCode::Esc => {
            if scene == Scene::Revenue {
                app.clear_focus();
            } else {
                app.cancel();
            }
        }
        KeyCode::Enter => app.continue_scene(),
        KeyCode::Tab | KeyCode::Char('l') => {
            app.toggle_layer();
        }
        KeyCode::Char('b') => app.open_debrief(),
        KeyCode::Char('R') => app.restart(),
        KeyCode::Char('v') if scene == Scene::Compare => app.cycle_compare_view(),
        KeyCode::Char('s') if scene == Scene::Debrief => app.skip(),
        KeyCode::Char('s') => {
            if let Err(e) = app.save_draft() {
                debug!("Save draft ignored: {e}");
            }
        }
        KeyCode::Char('m') => app.cycle_input_mode(),
        KeyCode::Char('r') => app.randomize(),
        KeyCode::Char(c @ '1'..='5') if scene == Scene::Blind => {
            let index = c as usize - '1' as usize;
            app.apply_preset(index);
        }
        KeyCode::Char(' ') if app.input_mode() == InputMode::Presets => {
            app.apply_selected_preset();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            if scene == Scene::Revenue {
                app.focus_prev_sector();
            } else {
                app.select_prev();
            }
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if scene == Scene::Revenue {
                app.focus_next_sector();
            } else {
                app.select_next();
            }
        }
        KeyCode::Left => app.adjust_selected(-step),
        KeyCode::Right => app.adjust_selected(step),
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.confirm_prompt().is_some() {
        return;
    }
    let MouseEvent {
        kind, column, row, ..
    } = mouse;
    match kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if app.scene() == Scene::Revenue {
                app.focus_at(column, row);
            } else {
                app.pie_pointer_down(column, row);
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => app.pie_pointer_drag(column, row),
        MouseEventKind::Up(MouseButton::Left) => app.pie_pointer_up(column, row),
        _ => {}
    }
}
