//! Application messages

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Messages handled by the player session loop
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    // ============ Timer ============
    /// Periodic playback tick
    Tick,

    // ============ Transport ============
    /// Start or resume playback
    Play,
    /// Pause playback
    Pause,
    /// Toggle between playing and paused
    TogglePlayback,
    /// Seek back to the beginning
    Restart,

    // ============ Lyrics ============
    /// Lyric text loaded for the current track
    LyricsLoaded(String),
    /// Lyric resource could not be loaded
    LyricsFailed(String),

    // ============ Input ============
    /// Keyboard input ended
    InputClosed,
    /// End the session
    Quit,
}

impl Message {
    /// Map a key press to a message
    ///
    /// Space, Enter or `t` toggle, `p` plays, `s` pauses, `r` restarts,
    /// `q`, Esc or Ctrl+C quit.
    pub fn from_key(key: KeyEvent) -> Option<Self> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Message::Quit)
            }
            KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Char('t') => {
                Some(Message::TogglePlayback)
            }
            KeyCode::Char('p') => Some(Message::Play),
            KeyCode::Char('s') => Some(Message::Pause),
            KeyCode::Char('r') => Some(Message::Restart),
            KeyCode::Char('q') | KeyCode::Esc => Some(Message::Quit),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_from_key() {
        assert_eq!(
            Message::from_key(press(KeyCode::Char(' '))),
            Some(Message::TogglePlayback)
        );
        assert_eq!(Message::from_key(press(KeyCode::Char('p'))), Some(Message::Play));
        assert_eq!(Message::from_key(press(KeyCode::Char('s'))), Some(Message::Pause));
        assert_eq!(Message::from_key(press(KeyCode::Char('r'))), Some(Message::Restart));
        assert_eq!(Message::from_key(press(KeyCode::Esc)), Some(Message::Quit));
        assert_eq!(
            Message::from_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Message::Quit)
        );
        assert_eq!(Message::from_key(press(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_ignores_key_release() {
        let mut key = press(KeyCode::Char('q'));
        key.kind = KeyEventKind::Release;
        assert_eq!(Message::from_key(key), None);
    }
}
