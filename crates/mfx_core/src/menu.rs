//! Main-menu selection model.
//!
//! Menu items carry a tagged [`MenuAction`] instead of bound callbacks, so the
//! scene state machine can dispatch transitions through one exhaustive match
//! (see [`crate::mode`]). Navigation is edge-triggered by the caller; this
//! module only moves the cursor and reports the confirmed action.
//!
//! The selected item bobs: its hover phase advances every tick and the render
//! path reads a `-5·|sin|` pixel offset from it. Deselected items sit still.

/// What a confirmed menu item does; the state machine maps these to scene
/// transitions. This is the tagged replacement for the action closures the
/// prototypes bound into their menu items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    StartGame,
    ShowCredits,
    Quit,
}

#[derive(Debug, Clone)]
pub struct MenuItem {
    pub label: &'static str,
    pub action: MenuAction,
    hover_phase_us: u64,
}

impl MenuItem {
    pub fn new(label: &'static str, action: MenuAction) -> Self {
        Self {
            label,
            action,
            hover_phase_us: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MenuSelection {
    items: Vec<MenuItem>,
    selected: usize,
}

impl MenuSelection {
    pub fn new(items: Vec<MenuItem>) -> Result<Self, String> {
        if items.is_empty() {
            return Err("Menu has no items".to_string());
        }
        Ok(Self { items, selected: 0 })
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn move_up(&mut self) {
        self.selected = (self.selected + self.items.len() - 1) % self.items.len();
        self.reset_hover();
    }

    pub fn move_down(&mut self) {
        self.selected = (self.selected + 1) % self.items.len();
        self.reset_hover();
    }

    /// Action bound to the currently selected item.
    pub fn confirm(&self) -> MenuAction {
        self.items[self.selected].action
    }

    /// Advance the selected item's hover phase by one tick.
    pub fn tick_hover(&mut self, dt_us: u64) {
        for (i, item) in self.items.iter_mut().enumerate() {
            if i == self.selected {
                item.hover_phase_us += dt_us;
            } else {
                item.hover_phase_us = 0;
            }
        }
    }

    /// Vertical bob offset in pixels for item `index` (0 when deselected).
    pub fn hover_offset(&self, index: usize) -> f32 {
        let item = &self.items[index];
        if index != self.selected {
            return 0.0;
        }
        let phase_ms = item.hover_phase_us as f32 / 1000.0;
        -5.0 * (phase_ms * 0.003).sin().abs()
    }

    fn reset_hover(&mut self) {
        for item in &mut self.items {
            item.hover_phase_us = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_menu() -> MenuSelection {
        MenuSelection::new(vec![
            MenuItem::new("Start Game", MenuAction::StartGame),
            MenuItem::new("Credits", MenuAction::ShowCredits),
            MenuItem::new("Exit", MenuAction::Quit),
        ])
        .expect("menu is non-empty")
    }

    #[test]
    fn rejects_empty_menu() {
        let err = MenuSelection::new(Vec::new()).expect_err("empty menu must fail");
        assert!(err.contains("no items"));
    }

    #[test]
    fn up_from_first_wraps_to_last() {
        let mut menu = sample_menu();
        assert_eq!(menu.selected_index(), 0);
        menu.move_up();
        assert_eq!(menu.selected_index(), 2);
    }

    #[test]
    fn down_from_last_wraps_to_first() {
        let mut menu = sample_menu();
        menu.move_up(); // -> 2
        menu.move_down();
        assert_eq!(menu.selected_index(), 0);
    }

    #[test]
    fn down_down_confirm_selects_third_action() {
        let mut menu = sample_menu();
        menu.move_down();
        menu.move_down();
        assert_eq!(menu.selected_index(), 2);

        // One confirm edge fires one action.
        let mut fired = Vec::new();
        fired.push(menu.confirm());
        assert_eq!(fired, vec![MenuAction::Quit]);
    }

    #[test]
    fn only_selected_item_bobs() {
        let mut menu = sample_menu();
        // Advance 30 ticks: selected item gains phase, others stay put.
        for _ in 0..30 {
            menu.tick_hover(16_667);
        }
        assert!(menu.hover_offset(0) < 0.0);
        assert_eq!(menu.hover_offset(1), 0.0);
        assert_eq!(menu.hover_offset(2), 0.0);
    }

    #[test]
    fn hover_offset_stays_within_bob_range() {
        let mut menu = sample_menu();
        for _ in 0..600 {
            menu.tick_hover(16_667);
            let offset = menu.hover_offset(0);
            assert!((-5.0..=0.0).contains(&offset));
        }
    }

    #[test]
    fn moving_selection_resets_hover() {
        let mut menu = sample_menu();
        for _ in 0..30 {
            menu.tick_hover(16_667);
        }
        assert!(menu.hover_offset(0) < 0.0);

        menu.move_down();
        // Newly selected item starts from phase 0.
        assert_eq!(menu.hover_offset(1), 0.0);
        assert_eq!(menu.hover_offset(0), 0.0);
    }
}
