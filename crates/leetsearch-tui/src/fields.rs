//! Editable text fields of the popup.

/// Single-line text input. `cursor` counts chars, not bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputField {
    text: String,
    cursor: usize,
}

impl InputField {
    #[must_use]
    pub fn with_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            cursor: text.chars().count(),
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn byte_index(&self) -> usize {
        self.text
            .char_indices()
            .nth(self.cursor)
            .map_or(self.text.len(), |(i, _)| i)
    }

    pub fn enter_char(&mut self, c: char) {
        let index = self.byte_index();
        self.text.insert(index, c);
        self.cursor += 1;
    }

    /// Delete the char before the cursor. Returns false if nothing changed.
    pub fn delete_char(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let index = self.byte_index();
        self.text.remove(index);
        true
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.text.chars().count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.chars().count();
    }

    /// Returns false if the field was already empty.
    pub fn clear(&mut self) -> bool {
        let changed = !self.text.is_empty();
        self.text.clear();
        self.cursor = 0;
        changed
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Query,
    Filter,
}

/// Query box, filter box and which of them has focus.
#[derive(Debug, Clone, Default)]
pub struct Fields {
    pub query: InputField,
    pub filter: InputField,
    pub focus: Focus,
}

impl Fields {
    pub fn focused_mut(&mut self) -> &mut InputField {
        match self.focus {
            Focus::Query => &mut self.query,
            Focus::Filter => &mut self.filter,
        }
    }

    /// Switch between query and filter. The filter is only reachable while visible.
    pub fn toggle_focus(&mut self, filter_visible: bool) {
        self.focus = match self.focus {
            Focus::Query if filter_visible => Focus::Filter,
            _ => Focus::Query,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_and_delete() {
        let mut field = InputField::default();
        for c in "mit".chars() {
            field.enter_char(c);
        }
        assert_eq!(field.text(), "mit");
        assert_eq!(field.cursor(), 3);

        assert!(field.delete_char());
        assert_eq!(field.text(), "mi");
    }

    #[test]
    fn test_delete_at_start_is_noop() {
        let mut field = InputField::with_text("ab");
        field.move_home();
        assert!(!field.delete_char());
        assert_eq!(field.text(), "ab");
    }

    #[test]
    fn test_insert_mid_text() {
        let mut field = InputField::with_text("MT");
        field.move_left();
        field.enter_char('I');
        assert_eq!(field.text(), "MIT");
        assert_eq!(field.cursor(), 2);
    }

    #[test]
    fn test_multibyte_chars() {
        let mut field = InputField::with_text("清华");
        field.move_left();
        field.enter_char('x');
        assert_eq!(field.text(), "清x华");

        field.move_end();
        assert!(field.delete_char());
        assert_eq!(field.text(), "清x");
    }

    #[test]
    fn test_move_right_clamps() {
        let mut field = InputField::with_text("a");
        field.move_right();
        field.move_right();
        assert_eq!(field.cursor(), 1);
    }

    #[test]
    fn test_clear() {
        let mut field = InputField::with_text("abc");
        assert!(field.clear());
        assert!(!field.clear());
        assert_eq!(field.cursor(), 0);
    }

    #[test]
    fn test_toggle_focus_requires_visible_filter() {
        let mut fields = Fields::default();

        fields.toggle_focus(false);
        assert_eq!(fields.focus, Focus::Query);

        fields.toggle_focus(true);
        assert_eq!(fields.focus, Focus::Filter);

        fields.toggle_focus(true);
        assert_eq!(fields.focus, Focus::Query);
    }

    #[test]
    fn test_focused_mut_edits_filter() {
        let mut fields = Fields {
            focus: Focus::Filter,
            ..Default::default()
        };
        fields.focused_mut().enter_char('z');
        assert_eq!(fields.filter.text(), "z");
        assert_eq!(fields.query.text(), "");
    }
}
