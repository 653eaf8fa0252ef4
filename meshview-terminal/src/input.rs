/// Keyboard mapping and held-key tracking on top of crossterm key events
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use meshview_core::{ControlSignal, ControlState};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Map a key to its control signal
///
/// Esc/`q` exit, `a`/`d` (or Left/Right) rotate, `w`/`s` (or Up/Down) tilt,
/// `z`/`+` zoom in, `e`/`x`/`-` zoom out.
pub fn signal_for(code: KeyCode) -> Option<ControlSignal> {
    let signal = match code {
        KeyCode::Esc => ControlSignal::Exit,
        KeyCode::Left => ControlSignal::RotateLeft,
        KeyCode::Right => ControlSignal::RotateRight,
        KeyCode::Up => ControlSignal::TiltUp,
        KeyCode::Down => ControlSignal::TiltDown,
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'q' => ControlSignal::Exit,
            'a' => ControlSignal::RotateLeft,
            'd' => ControlSignal::RotateRight,
            'w' => ControlSignal::TiltUp,
            's' => ControlSignal::TiltDown,
            'z' | '+' | '=' => ControlSignal::ZoomIn,
            'e' | 'x' | '-' => ControlSignal::ZoomOut,
            _ => return None,
        },
        _ => return None,
    };
    Some(signal)
}

/// Shift may change between press and release; track letters by one case
fn fold_case(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

/// Tracks which keys count as held in the current frame.
///
/// Terminals with keyboard enhancement report releases, so a key stays held
/// until its release event. Otherwise a key counts as held for `hold_timeout`
/// after its last press or auto-repeat. A key pressed and released between
/// two frames is still seen for one frame.
#[derive(Debug)]
pub struct HeldKeys {
    held: HashMap<KeyCode, Instant>,
    tapped: Vec<KeyCode>,
    hold_timeout: Duration,
    release_events: bool,
    interrupted: bool,
}

impl HeldKeys {
    pub fn new(hold_timeout: Duration) -> Self {
        Self {
            held: HashMap::new(),
            tapped: Vec::new(),
            hold_timeout,
            release_events: false,
            interrupted: false,
        }
    }

    pub fn set_release_events(&mut self, enabled: bool) {
        self.release_events = enabled;
    }

    pub fn handle(&mut self, event: KeyEvent, now: Instant) {
        let code = fold_case(event.code);
        if event.modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
            self.interrupted = true;
            return;
        }

        match event.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                self.held.insert(code, now);
                self.tapped.push(code);
            }
            KeyEventKind::Release => {
                self.held.remove(&code);
            }
        }
    }

    /// Signals for this frame; consumes pending taps
    pub fn controls(&mut self, now: Instant) -> ControlState {
        if !self.release_events {
            let timeout = self.hold_timeout;
            self.held
                .retain(|_, pressed| now.saturating_duration_since(*pressed) <= timeout);
        }

        let mut state: ControlState = self
            .held
            .keys()
            .chain(self.tapped.iter())
            .filter_map(|code| signal_for(*code))
            .collect();
        if self.interrupted {
            state.insert(ControlSignal::Exit);
        }
        self.tapped.clear();
        state
    }
}
