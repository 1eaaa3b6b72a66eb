/// Host key event, reduced to what the animator cares about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyPress {
    /// Character the key produced (already shifted, e.g. `'P'` for Shift+p).
    pub key: char,
    /// Shift modifier.
    pub shift: bool,
    /// Control modifier.
    pub ctrl: bool,
    /// Alt/Option modifier.
    pub alt: bool,
}

impl KeyPress {
    /// Plain key press without modifiers.
    pub fn plain(key: char) -> Self {
        Self {
            key,
            shift: false,
            ctrl: false,
            alt: false,
        }
    }

    /// Key press with shift held.
    pub fn shifted(key: char) -> Self {
        Self {
            shift: true,
            ..Self::plain(key)
        }
    }
}

/// Key combination that toggles presentation mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct KeyChord {
    /// Expected character, compared case-sensitively.
    pub key: char,
    /// Whether shift must be held.
    pub shift: bool,
    /// Whether control must be held.
    pub ctrl: bool,
    /// Whether alt must be held.
    pub alt: bool,
}

impl Default for KeyChord {
    fn default() -> Self {
        Self {
            key: 'P',
            shift: true,
            ctrl: false,
            alt: false,
        }
    }
}

impl KeyChord {
    /// Exact match on key and every modifier.
    pub fn matches(&self, press: KeyPress) -> bool {
        press.key == self.key
            && press.shift == self.shift
            && press.ctrl == self.ctrl
            && press.alt == self.alt
    }
}

/// Host intent delivered to a [`crate::playback::animator::StepAnimator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Command {
    /// The animated region became visible.
    ViewportEnter,
    /// The animated region left the viewport.
    ViewportLeave,
    /// Enter or leave presentation (manual) mode.
    TogglePresentation,
    /// Seek to the next step.
    StepForward,
    /// Seek to the previous step.
    StepBackward,
    /// Seek to a step index; out-of-range values clamp.
    JumpTo(isize),
    /// Pause or resume.
    TogglePlay,
    /// Stop and rewind to the start.
    Reset,
}

#[cfg(test)]
#[path = "../../tests/unit/playback/input.rs"]
mod tests;
