use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use std::time::Duration;

use crate::dashboard::{FormInputs, IdEntry};

/// Text fields on the ID-entry screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateField {
    PackageId,
    MarketplaceId,
}

impl GateField {
    pub fn title(&self) -> &'static str {
        match self {
            GateField::PackageId => "Enter PackageId",
            GateField::MarketplaceId => "Enter MarketplaceId",
        }
    }

    pub fn next(&self) -> GateField {
        match self {
            GateField::PackageId => GateField::MarketplaceId,
            GateField::MarketplaceId => GateField::PackageId,
        }
    }

    pub fn value_mut<'a>(&self, entry: &'a mut IdEntry) -> &'a mut String {
        match self {
            GateField::PackageId => &mut entry.package_id,
            GateField::MarketplaceId => &mut entry.marketplace_id,
        }
    }
}

/// Input focus on the dashboard. `Commands` means keys trigger actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Commands,
    WidgetToList,
    Price,
    ItemToPurchase,
    AmountSent,
}

impl Focus {
    pub fn all() -> &'static [Focus] {
        &[
            Focus::Commands,
            Focus::WidgetToList,
            Focus::Price,
            Focus::ItemToPurchase,
            Focus::AmountSent,
        ]
    }

    pub fn title(&self) -> &'static str {
        match self {
            Focus::Commands => "Commands",
            Focus::WidgetToList => "input widgetId",
            Focus::Price => "input price",
            Focus::ItemToPurchase => "input itemId",
            Focus::AmountSent => "input transfer amount",
        }
    }

    /// Move to the next field (wraps around)
    pub fn next(&self) -> Focus {
        let all = Self::all();
        let current_index = all.iter().position(|f| f == self).unwrap_or(0);
        all[(current_index + 1) % all.len()]
    }

    /// Move to the previous field (wraps around)
    pub fn prev(&self) -> Focus {
        let all = Self::all();
        let current_index = all.iter().position(|f| f == self).unwrap_or(0);
        let prev_index = if current_index == 0 {
            all.len() - 1
        } else {
            current_index - 1
        };
        all[prev_index]
    }

    /// Numeric fields only accept digits.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Focus::Price | Focus::AmountSent)
    }

    pub fn value_mut<'a>(&self, form: &'a mut FormInputs) -> Option<&'a mut String> {
        match self {
            Focus::Commands => None,
            Focus::WidgetToList => Some(&mut form.widget_to_list),
            Focus::Price => Some(&mut form.price),
            Focus::ItemToPurchase => Some(&mut form.item_to_purchase),
            Focus::AmountSent => Some(&mut form.amount_sent),
        }
    }
}

/// Apply a key press to a text field. Returns true if the key was consumed.
pub fn edit_text(value: &mut String, code: KeyCode, numeric: bool) -> bool {
    match code {
        KeyCode::Char(c) if !numeric || c.is_ascii_digit() => {
            value.push(c);
            true
        }
        KeyCode::Backspace => {
            value.pop();
            true
        }
        _ => false,
    }
}

/// Poll for keyboard events with a timeout
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Key code of a press event, ignoring releases and repeats
pub fn pressed_key(event: &Event) -> Option<KeyCode> {
    match event {
        Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            ..
        }) => Some(*code),
        _ => None,
    }
}

/// Check if a key event matches a specific key code
pub fn is_key(event: &Event, code: KeyCode) -> bool {
    pressed_key(event) == Some(code)
}
