// Copyright (c) 2026 rezky_nightky

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::palette::{Rgb, BG_PRESETS, TEXT_PRESETS};
use crate::scene::{SceneConfig, SceneUpdate};

const SPEED_STEP_MS: f64 = 10.0;
const COLUMN_STEP: f64 = 5.0;
const P_STEP: f64 = 0.05;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ControlEvent {
    Quit,
    Update(SceneUpdate),
}

fn next_background(current: Rgb) -> Rgb {
    let idx = BG_PRESETS.iter().position(|&c| c == current);
    match idx {
        Some(i) => BG_PRESETS[(i + 1) % BG_PRESETS.len()],
        None => BG_PRESETS[0],
    }
}

// Each key maps 1:1 to one controller operation, delivering an absolute
// target value computed from the current configuration.
pub fn map_key(key: KeyEvent, config: &SceneConfig) -> Option<ControlEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let interval_ms = config.interval.as_millis() as f64;
    let update = match key.code {
        KeyCode::Esc | KeyCode::Char('q') => return Some(ControlEvent::Quit),
        KeyCode::Up => SceneUpdate::Speed((interval_ms - SPEED_STEP_MS).max(1.0)),
        KeyCode::Down => SceneUpdate::Speed(interval_ms + SPEED_STEP_MS),
        KeyCode::Right => SceneUpdate::ColumnCount(config.column_count as f64 + COLUMN_STEP),
        KeyCode::Left => {
            SceneUpdate::ColumnCount((config.column_count as f64 - COLUMN_STEP).max(0.0))
        }
        KeyCode::Char(']') => SceneUpdate::PZero(config.p_zero + P_STEP),
        KeyCode::Char('[') => SceneUpdate::PZero((config.p_zero - P_STEP).max(0.0)),
        KeyCode::Char('}') => SceneUpdate::POne(config.p_one + P_STEP),
        KeyCode::Char('{') => SceneUpdate::POne((config.p_one - P_STEP).max(0.0)),
        KeyCode::Char(c @ '1'..='8') => {
            let idx = (c as usize - '1' as usize).min(TEXT_PRESETS.len() - 1);
            SceneUpdate::TextColor(TEXT_PRESETS[idx])
        }
        KeyCode::Char('b') => SceneUpdate::BackgroundColor(next_background(config.background_color)),
        _ => return None,
    };

    Some(ControlEvent::Update(update))
}
