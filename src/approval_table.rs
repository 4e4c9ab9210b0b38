use comfy_table::Attribute;
use comfy_table::Cell;
use comfy_table::Color;
use comfy_table::Table;

use crate::account::Account;
use crate::approval::Approval;

impl Approval {
    pub fn value_cell(&self) -> Cell {
        match self.score() {
            Some(score) if score.is_positive() => Cell::new(&score.value).fg(Color::Green),
            Some(score) if score.is_negative() => Cell::new(&score.value).fg(Color::Red),
            Some(score) => Cell::new(&score.value),
            None => Cell::new(""),
        }
    }

    pub fn old_value_cell(&self) -> Cell {
        match self.old_value() {
            Some(old_value) => Cell::new(old_value).add_attribute(Attribute::Dim),
            None => Cell::new(""),
        }
    }

    pub fn changed_cell(&self) -> Cell {
        if self.is_changed() {
            Cell::new("✔").fg(Color::Yellow)
        } else {
            Cell::new("")
        }
    }

    pub fn by_cell(&self) -> Cell {
        match self.by() {
            Some(by) => Cell::new(by),
            None => Cell::new(""),
        }
    }
}

fn author_cell(author: Option<&Account>) -> Cell {
    match author {
        Some(author) => match author.name_and_email() {
            Some(name_and_email) => Cell::new(name_and_email),
            None => Cell::new(author),
        },
        None => Cell::new(""),
    }
}

/// Format approvals, and the authors of the events carrying them, as a table for humans.
pub fn approval_table<'a>(
    rows: impl IntoIterator<Item = (Option<&'a Account>, &'a Approval)>,
) -> Table {
    let mut table = Table::new();
    table
        .load_preset(comfy_table::presets::NOTHING)
        .set_header(
            ["Category", "Value", "Was", "Changed", "By", "Event author"]
                .map(|header| Cell::new(header).add_attribute(Attribute::Bold)),
        );

    for (author, approval) in rows {
        table.add_row([
            Cell::new(approval.category().unwrap_or_default()),
            approval.value_cell(),
            approval.old_value_cell(),
            approval.changed_cell(),
            approval.by_cell(),
            author_cell(author),
        ]);
    }

    table
}
