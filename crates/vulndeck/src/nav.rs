use eframe::egui::Key;

/// Every user intent the presentation understands, whether it came from the
/// keyboard or from an on-screen control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Next,
    Previous,
    Restart,
    ToggleFullscreen,
    ToggleHelp,
    Quit,
}

/// Map a pressed key to its command, if it has one.
pub fn command_for_key(key: Key) -> Option<Command> {
    match key {
        Key::ArrowRight | Key::Space | Key::PageDown | Key::N => Some(Command::Next),
        Key::ArrowLeft | Key::PageUp | Key::P => Some(Command::Previous),
        Key::F => Some(Command::ToggleFullscreen),
        Key::H | Key::F1 => Some(Command::ToggleHelp),
        Key::Q => Some(Command::Quit),
        _ => None,
    }
}

/// Keys scanned each frame, in the order they are checked.
pub const BOUND_KEYS: [Key; 11] = [
    Key::ArrowRight,
    Key::Space,
    Key::PageDown,
    Key::N,
    Key::ArrowLeft,
    Key::PageUp,
    Key::P,
    Key::F,
    Key::H,
    Key::F1,
    Key::Q,
];

/// The current position within a deck of `len` slides.
///
/// `index` always satisfies `index < len`; moves past either end are clamped
/// silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigator {
    index: usize,
    len: usize,
}

impl Navigator {
    /// Start at the first slide. A deck always has at least one slide, so a
    /// `len` of zero is treated as one.
    pub fn new(len: usize) -> Self {
        Self {
            index: 0,
            len: len.max(1),
        }
    }

    /// Start at `index`, clamped to the last slide.
    pub fn starting_at(len: usize, index: usize) -> Self {
        let mut nav = Self::new(len);
        nav.index = index.min(nav.len - 1);
        nav
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    fn last(&self) -> usize {
        self.len - 1
    }

    /// Move forward one slide. Returns whether the index changed.
    pub fn advance(&mut self) -> bool {
        let next = (self.index + 1).min(self.last());
        let moved = next != self.index;
        self.index = next;
        moved
    }

    /// Move back one slide. Returns whether the index changed.
    pub fn retreat(&mut self) -> bool {
        let prev = self.index.saturating_sub(1);
        let moved = prev != self.index;
        self.index = prev;
        moved
    }

    /// The forward control is enabled exactly when `advance` would move.
    pub fn can_advance(&self) -> bool {
        self.index < self.last()
    }

    /// The back control is enabled exactly when `retreat` would move.
    pub fn can_retreat(&self) -> bool {
        self.index > 0
    }

    /// Fraction of the deck shown so far, `(index + 1) / len`.
    pub fn progress(&self) -> f32 {
        (self.index + 1) as f32 / self.len as f32
    }

    pub fn counter_label(&self) -> String {
        format!("{} / {}", self.index + 1, self.len)
    }

    /// Apply a navigation command. Returns whether the index changed.
    /// Commands that don't move through the deck are ignored here.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Next => self.advance(),
            Command::Previous => self.retreat(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_starts_at_zero() {
        let nav = Navigator::new(10);
        assert_eq!(nav.index(), 0);
        assert_eq!(nav.counter_label(), "1 / 10");
        assert!(!nav.can_retreat());
        assert!(nav.can_advance());
    }

    #[test]
    fn test_advance_through_ten() {
        let mut nav = Navigator::new(10);
        for _ in 0..9 {
            assert!(nav.advance());
        }
        assert_eq!(nav.index(), 9);
        assert!(!nav.can_advance());
        assert_eq!(nav.progress(), 1.0);
        assert_eq!(nav.counter_label(), "10 / 10");
    }

    #[test]
    fn test_advance_at_last_is_noop() {
        let mut nav = Navigator::starting_at(10, 9);
        assert!(!nav.advance());
        assert_eq!(nav.index(), 9);
    }

    #[test]
    fn test_previous_key_at_first_is_noop() {
        let mut nav = Navigator::new(10);
        let cmd = command_for_key(Key::ArrowLeft).unwrap();
        assert!(!nav.apply(cmd));
        assert_eq!(nav.index(), 0);
    }

    #[test]
    fn test_single_slide_deck_is_frozen() {
        let mut nav = Navigator::new(1);
        assert!(!nav.can_advance());
        assert!(!nav.can_retreat());
        assert!(!nav.advance());
        assert!(!nav.retreat());
        assert_eq!(nav.index(), 0);
        assert_eq!(nav.progress(), 1.0);
    }

    #[test]
    fn test_zero_len_treated_as_one() {
        let nav = Navigator::new(0);
        assert_eq!(nav.len(), 1);
        assert_eq!(nav.index(), 0);
    }

    #[test]
    fn test_starting_at_clamps() {
        assert_eq!(Navigator::starting_at(4, 2).index(), 2);
        assert_eq!(Navigator::starting_at(4, 40).index(), 3);
    }

    #[test]
    fn test_key_map() {
        for key in [Key::ArrowRight, Key::Space, Key::PageDown, Key::N] {
            assert_eq!(command_for_key(key), Some(Command::Next));
        }
        for key in [Key::ArrowLeft, Key::PageUp, Key::P] {
            assert_eq!(command_for_key(key), Some(Command::Previous));
        }
        assert_eq!(command_for_key(Key::Q), Some(Command::Quit));
        assert_eq!(command_for_key(Key::F), Some(Command::ToggleFullscreen));
        assert_eq!(command_for_key(Key::H), Some(Command::ToggleHelp));
        assert_eq!(command_for_key(Key::Z), None);
    }

    #[test]
    fn test_bound_keys_all_mapped() {
        for key in BOUND_KEYS {
            assert!(command_for_key(key).is_some(), "{key:?} is unbound");
        }
    }

    #[test]
    fn test_non_navigation_commands_do_not_move() {
        let mut nav = Navigator::starting_at(5, 2);
        for cmd in [
            Command::Restart,
            Command::ToggleFullscreen,
            Command::ToggleHelp,
            Command::Quit,
        ] {
            assert!(!nav.apply(cmd));
            assert_eq!(nav.index(), 2);
        }
    }

    proptest! {
        #[test]
        fn prop_advance_clamps(len in 1usize..64, start in 0usize..64) {
            let start = start % len;
            let mut nav = Navigator::starting_at(len, start);
            nav.advance();
            prop_assert_eq!(nav.index(), (start + 1).min(len - 1));
        }

        #[test]
        fn prop_retreat_clamps(len in 1usize..64, start in 0usize..64) {
            let start = start % len;
            let mut nav = Navigator::starting_at(len, start);
            nav.retreat();
            prop_assert_eq!(nav.index(), start.saturating_sub(1));
        }

        #[test]
        fn prop_controls_disabled_iff_noop(len in 1usize..64, start in 0usize..64) {
            let start = start % len;
            let nav = Navigator::starting_at(len, start);
            prop_assert_eq!(!nav.can_retreat(), start == 0);
            prop_assert_eq!(!nav.can_advance(), start == len - 1);

            let mut probe = nav;
            prop_assert_eq!(probe.advance(), nav.can_advance());
            let mut probe = nav;
            prop_assert_eq!(probe.retreat(), nav.can_retreat());
        }

        #[test]
        fn prop_progress_exact(len in 1usize..64, start in 0usize..64) {
            let start = start % len;
            let nav = Navigator::starting_at(len, start);
            prop_assert_eq!(nav.progress(), (start + 1) as f32 / len as f32);
        }

        #[test]
        fn prop_keys_match_controls(
            len in 1usize..32,
            presses in proptest::collection::vec(
                prop_oneof![Just(Key::ArrowRight), Just(Key::Space), Just(Key::ArrowLeft)],
                0..40,
            )
        ) {
            let mut by_key = Navigator::new(len);
            let mut by_button = Navigator::new(len);
            for key in presses {
                let cmd = command_for_key(key).unwrap();
                by_key.apply(cmd);
                match cmd {
                    Command::Next => { by_button.advance(); }
                    Command::Previous => { by_button.retreat(); }
                    _ => unreachable!(),
                }
            }
            prop_assert_eq!(by_key, by_button);
            prop_assert!(by_key.index() < len);
        }
    }
}
