//! Fire-and-forget sound effects. Playback failure or a muted sink must
//! never affect the simulation, so sinks swallow their errors.

use std::io::{stdout, Write};

use crate::game::GameEvent;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SoundEffect {
    Move,
    Rotate,
    Drop,
    LineClear,
    LevelUp,
    GameOver,
}

/// Which effect, if any, a game event should trigger.
pub fn effect_for_event(event: &GameEvent) -> Option<SoundEffect> {
    match event {
        GameEvent::PieceMoved => Some(SoundEffect::Move),
        GameEvent::PieceRotated => Some(SoundEffect::Rotate),
        GameEvent::PieceLocked => Some(SoundEffect::Drop),
        GameEvent::LinesCleared(_) => Some(SoundEffect::LineClear),
        GameEvent::LevelUp(_) => Some(SoundEffect::LevelUp),
        GameEvent::GameOver => Some(SoundEffect::GameOver),
        _ => None,
    }
}

pub trait SoundSink {
    fn play(&mut self, effect: SoundEffect);
    fn toggle_mute(&mut self);
    fn is_muted(&self) -> bool;
}

/// Sink for environments without any audio path. Permanently muted.
pub struct NullSound;

impl SoundSink for NullSound {
    fn play(&mut self, _effect: SoundEffect) {}

    fn toggle_mute(&mut self) {}

    fn is_muted(&self) -> bool {
        true
    }
}

/// Rings the terminal bell for the big moments. Move/rotate clicks happen
/// far too often for a BEL to be anything but noise, so they are skipped.
pub struct TerminalBell {
    muted: bool,
}

impl TerminalBell {
    pub fn new() -> Self {
        Self { muted: false }
    }
}

impl Default for TerminalBell {
    fn default() -> Self {
        Self::new()
    }
}

impl SoundSink for TerminalBell {
    fn play(&mut self, effect: SoundEffect) {
        if self.muted {
            return;
        }
        match effect {
            SoundEffect::LineClear | SoundEffect::LevelUp | SoundEffect::GameOver => {
                let mut out = stdout();
                let _ = out.write_all(b"\x07");
                let _ = out.flush();
            }
            SoundEffect::Move | SoundEffect::Rotate | SoundEffect::Drop => {}
        }
    }

    fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    fn is_muted(&self) -> bool {
        self.muted
    }
}
