//! Timeline keyboard shortcuts.
//!
//! Every keyboard action is a [`TimelineCommand`] bound to a [`Shortcut`].
//! The controller looks commands up in a [`Keymap`]; it never inspects raw
//! keys itself.

use egui::Key;
use std::collections::HashMap;

// ── Shortcut representation ─────────────────────────────────────

/// Keyboard modifiers. `command` is ⌘ on macOS and Ctrl elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub alt: bool,
    pub command: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        alt: false,
        command: false,
    };
    pub const CMD: Self = Self {
        shift: false,
        alt: false,
        command: true,
    };
    pub const CMD_SHIFT: Self = Self {
        shift: true,
        alt: false,
        command: true,
    };
    pub const SHIFT: Self = Self {
        shift: true,
        alt: false,
        command: false,
    };

    pub fn from_egui(modifiers: egui::Modifiers) -> Self {
        Self {
            shift: modifiers.shift,
            alt: modifiers.alt,
            command: modifiers.command,
        }
    }
}

/// A keyboard shortcut (modifier + key).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shortcut {
    pub modifiers: Modifiers,
    pub key: Key,
}

impl Shortcut {
    pub const fn new(modifiers: Modifiers, key: Key) -> Self {
        Self { modifiers, key }
    }

    /// Format for display: "⌘D", "⇧⌘Z", etc.
    pub fn display(&self) -> String {
        let mut s = String::new();
        if self.modifiers.alt {
            s.push('⌥');
        }
        if self.modifiers.shift {
            s.push('⇧');
        }
        if self.modifiers.command {
            s.push('⌘');
        }
        s.push_str(self.key.name());
        s
    }
}

// ── Commands ────────────────────────────────────────────────────

/// A keyboard-triggered timeline action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimelineCommand {
    PlayPause,
    FrameBack,
    FrameForward,
    SecondBack,
    SecondForward,
    SkipToStart,
    SkipToEnd,
    SelectAll,
    /// Cancel the active gesture, or clear the selection when idle.
    Escape,
    DeleteSelected,
    SplitAtPlayhead,
    Duplicate,
    Undo,
    Redo,
    ZoomIn,
    ZoomOut,
}

impl TimelineCommand {
    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::PlayPause => "Play / Pause",
            Self::FrameBack => "Previous Frame",
            Self::FrameForward => "Next Frame",
            Self::SecondBack => "Back 1 Second",
            Self::SecondForward => "Forward 1 Second",
            Self::SkipToStart => "Go to Start",
            Self::SkipToEnd => "Go to End",
            Self::SelectAll => "Select All",
            Self::Escape => "Clear Selection",
            Self::DeleteSelected => "Delete",
            Self::SplitAtPlayhead => "Split at Playhead",
            Self::Duplicate => "Duplicate",
            Self::Undo => "Undo",
            Self::Redo => "Redo",
            Self::ZoomIn => "Zoom In",
            Self::ZoomOut => "Zoom Out",
        }
    }
}

// ── Keymap ──────────────────────────────────────────────────────

/// Shortcut -> command bindings.
#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: Vec<(Shortcut, TimelineCommand)>,
    by_shortcut: HashMap<Shortcut, TimelineCommand>,
}

impl Keymap {
    /// An empty keymap.
    pub fn empty() -> Self {
        Self {
            bindings: Vec::new(),
            by_shortcut: HashMap::new(),
        }
    }

    /// Bind a shortcut, replacing any previous binding of it.
    pub fn bind(&mut self, shortcut: Shortcut, command: TimelineCommand) {
        self.bindings.retain(|(s, _)| *s != shortcut);
        self.bindings.push((shortcut, command));
        self.by_shortcut.insert(shortcut, command);
    }

    pub fn get(&self, shortcut: &Shortcut) -> Option<TimelineCommand> {
        self.by_shortcut.get(shortcut).copied()
    }

    /// All bindings in registration order.
    pub fn bindings(&self) -> &[(Shortcut, TimelineCommand)] {
        &self.bindings
    }

    /// First shortcut bound to a command.
    pub fn shortcut_for(&self, command: TimelineCommand) -> Option<Shortcut> {
        self.bindings
            .iter()
            .find(|(_, c)| *c == command)
            .map(|(s, _)| *s)
    }

    fn register_builtins(&mut self) {
        use TimelineCommand::*;

        // ── Transport ────────────────────────────────
        self.bind(Shortcut::new(Modifiers::NONE, Key::Space), PlayPause);
        self.bind(Shortcut::new(Modifiers::NONE, Key::ArrowLeft), FrameBack);
        self.bind(Shortcut::new(Modifiers::NONE, Key::ArrowRight), FrameForward);
        self.bind(Shortcut::new(Modifiers::SHIFT, Key::ArrowLeft), SecondBack);
        self.bind(Shortcut::new(Modifiers::SHIFT, Key::ArrowRight), SecondForward);
        self.bind(Shortcut::new(Modifiers::NONE, Key::Home), SkipToStart);
        self.bind(Shortcut::new(Modifiers::NONE, Key::End), SkipToEnd);

        // ── Selection and edits ──────────────────────
        self.bind(Shortcut::new(Modifiers::CMD, Key::A), SelectAll);
        self.bind(Shortcut::new(Modifiers::NONE, Key::Escape), Escape);
        self.bind(Shortcut::new(Modifiers::NONE, Key::Delete), DeleteSelected);
        self.bind(Shortcut::new(Modifiers::NONE, Key::Backspace), DeleteSelected);
        self.bind(Shortcut::new(Modifiers::NONE, Key::S), SplitAtPlayhead);
        self.bind(Shortcut::new(Modifiers::CMD, Key::D), Duplicate);
        self.bind(Shortcut::new(Modifiers::CMD, Key::Z), Undo);
        self.bind(Shortcut::new(Modifiers::CMD_SHIFT, Key::Z), Redo);

        // ── View ─────────────────────────────────────
        self.bind(Shortcut::new(Modifiers::NONE, Key::Plus), ZoomIn);
        self.bind(Shortcut::new(Modifiers::NONE, Key::Equals), ZoomIn);
        self.bind(Shortcut::new(Modifiers::NONE, Key::Minus), ZoomOut);
    }
}

impl Default for Keymap {
    fn default() -> Self {
        let mut keymap = Self::empty();
        keymap.register_builtins();
        keymap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortcut_lookup() {
        let keymap = Keymap::default();
        let undo = Shortcut::new(Modifiers::CMD, Key::Z);
        assert_eq!(keymap.get(&undo), Some(TimelineCommand::Undo));
        let redo = Shortcut::new(Modifiers::CMD_SHIFT, Key::Z);
        assert_eq!(keymap.get(&redo), Some(TimelineCommand::Redo));
    }

    #[test]
    fn test_shift_arrows_step_seconds() {
        let keymap = Keymap::default();
        let plain = Shortcut::new(Modifiers::NONE, Key::ArrowLeft);
        let shifted = Shortcut::new(Modifiers::SHIFT, Key::ArrowLeft);
        assert_eq!(keymap.get(&plain), Some(TimelineCommand::FrameBack));
        assert_eq!(keymap.get(&shifted), Some(TimelineCommand::SecondBack));
    }

    #[test]
    fn test_both_delete_keys_bound() {
        let keymap = Keymap::default();
        for key in [Key::Delete, Key::Backspace] {
            assert_eq!(
                keymap.get(&Shortcut::new(Modifiers::NONE, key)),
                Some(TimelineCommand::DeleteSelected)
            );
        }
    }

    #[test]
    fn test_unbound_shortcut() {
        let keymap = Keymap::default();
        assert!(keymap.get(&Shortcut::new(Modifiers::CMD, Key::Q)).is_none());
    }

    #[test]
    fn test_rebind_replaces() {
        let mut keymap = Keymap::default();
        let s = Shortcut::new(Modifiers::NONE, Key::S);
        keymap.bind(s, TimelineCommand::Duplicate);
        assert_eq!(keymap.get(&s), Some(TimelineCommand::Duplicate));
        assert_eq!(keymap.bindings().iter().filter(|(b, _)| *b == s).count(), 1);
    }

    #[test]
    fn test_shortcut_display() {
        let s = Shortcut::new(Modifiers::CMD_SHIFT, Key::Z);
        assert_eq!(s.display(), "⇧⌘Z");
    }

    #[test]
    fn test_every_command_has_a_binding() {
        use TimelineCommand::*;
        let keymap = Keymap::default();
        for command in [
            PlayPause,
            FrameBack,
            FrameForward,
            SecondBack,
            SecondForward,
            SkipToStart,
            SkipToEnd,
            SelectAll,
            Escape,
            DeleteSelected,
            SplitAtPlayhead,
            Duplicate,
            Undo,
            Redo,
            ZoomIn,
            ZoomOut,
        ] {
            assert!(keymap.shortcut_for(command).is_some(), "{}", command.name());
        }
    }
}
