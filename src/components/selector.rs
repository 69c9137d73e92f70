use pitchside_api::{Fixture, Roster};
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, Paragraph, Widget};

pub const SELECT_MATCH: &str = "-- Select a Match --";
pub const NO_FIXTURES: &str = "No Fixtures Found";
pub const SELECT_PLAYER: &str = "Select a Player";
pub const NO_PLAYERS: &str = "No Players Found";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectOption {
    /// Empty for placeholders.
    pub value: String,
    pub label: String,
    pub disabled: bool,
    pub selected: bool,
}

impl SelectOption {
    fn placeholder(label: &str) -> Self {
        Self { value: String::new(), label: label.to_string(), disabled: false, selected: false }
    }

    fn disabled(label: &str) -> Self {
        Self { disabled: true, ..Self::placeholder(label) }
    }

    fn item(value: &str, label: &str) -> Self {
        Self { value: value.to_string(), label: label.to_string(), disabled: false, selected: false }
    }
}

/// A drop-down: a list of options, one committed selection and a cursor the
/// user moves before committing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    options: Vec<SelectOption>,
    cursor: usize,
}

impl Selector {
    fn new(options: Vec<SelectOption>) -> Self {
        let cursor = options.iter().position(|o| o.selected).unwrap_or(0);
        Self { options, cursor }
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    #[cfg(test)]
    pub fn labels(&self) -> Vec<&str> {
        self.options.iter().map(|o| o.label.as_str()).collect()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The committed value; placeholders and an empty selector read as `None`.
    pub fn selected_value(&self) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.selected)
            .or_else(|| self.options.first().filter(|o| !o.disabled))
            .map(|o| o.value.as_str())
            .filter(|v| !v.is_empty())
    }

    pub fn move_down(&mut self) {
        if let Some(next) = (self.cursor + 1..self.options.len()).find(|&i| !self.options[i].disabled) {
            self.cursor = next;
        }
    }

    pub fn move_up(&mut self) {
        if let Some(prev) = (0..self.cursor).rev().find(|&i| !self.options[i].disabled) {
            self.cursor = prev;
        }
    }

    /// Select the option under the cursor and return its value. `None` means
    /// nothing is chosen (disabled option or a placeholder).
    pub fn commit(&mut self) -> Option<String> {
        let option = self.options.get(self.cursor)?;
        if option.disabled {
            return None;
        }
        let cursor = self.cursor;
        for (i, o) in self.options.iter_mut().enumerate() {
            o.selected = i == cursor;
        }
        self.selected_value().map(ToOwned::to_owned)
    }
}

/// Fixture picker. Returns the selector and the id of the pre-selected
/// fixture when `default_id` names one of them.
pub fn fixture_selector(fixtures: &[Fixture], default_id: &str) -> (Selector, Option<String>) {
    if fixtures.is_empty() {
        return (Selector::new(vec![SelectOption::disabled(NO_FIXTURES)]), None);
    }

    let mut current = None;
    let mut options = Vec::with_capacity(fixtures.len() + 1);
    options.push(SelectOption::placeholder(SELECT_MATCH));
    for fixture in fixtures {
        let mut option = SelectOption::item(&fixture.match_id, &fixture.display);
        if current.is_none() && !default_id.is_empty() && fixture.match_id == default_id {
            option.selected = true;
            current = Some(fixture.match_id.clone());
        }
        options.push(option);
    }
    (Selector::new(options), current)
}

/// Player picker ordered by case-insensitive name, ties kept in roster order.
pub fn player_selector(roster: &Roster) -> Selector {
    if roster.is_empty() {
        return Selector::new(vec![SelectOption::disabled(NO_PLAYERS)]);
    }

    let mut players: Vec<(&str, &str)> = roster.iter().map(|(id, p)| (id, p.name.as_str())).collect();
    players.sort_by_cached_key(|(_, name)| name.to_lowercase());

    let mut options = Vec::with_capacity(players.len() + 1);
    options.push(SelectOption::placeholder(SELECT_PLAYER));
    options.extend(players.into_iter().map(|(id, name)| SelectOption::item(id, name)));
    Selector::new(options)
}

/// Single enabled placeholder, e.g. "Loading Fixtures..." or a cleared picker.
pub fn placeholder_selector(label: &str) -> Selector {
    Selector::new(vec![SelectOption::placeholder(label)])
}

/// Single disabled entry standing in for a failed load.
pub fn error_selector(label: &str) -> Selector {
    Selector::new(vec![SelectOption::disabled(label)])
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct SelectorView<'a> {
    pub selector: &'a Selector,
    pub block: Block<'a>,
    pub focused: bool,
}

impl Widget for SelectorView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = self.block.inner(area);
        self.block.render(area, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let options = self.selector.options();
        let rows = inner.height as usize;
        // Keep the cursor on screen.
        let first = self.selector.cursor().saturating_sub(rows.saturating_sub(1));

        let lines: Vec<Line> = options
            .iter()
            .enumerate()
            .skip(first)
            .take(rows)
            .map(|(i, option)| {
                let marker = if option.selected { "● " } else { "  " };
                let mut style = if option.disabled || option.value.is_empty() {
                    Style::default().fg(Color::DarkGray)
                } else {
                    Style::default().fg(Color::White)
                };
                if option.selected {
                    style = style.fg(Color::Green);
                }
                if self.focused && i == self.selector.cursor() {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                Line::from(vec![Span::raw(marker), Span::styled(option.label.as_str(), style)])
            })
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}
