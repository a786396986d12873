//! Monthly shift grid: one shift code per employee per day, painted with an
//! armed tool by single clicks, drag gestures or explicit ranges.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use super::calendar::YearMonth;
use super::shift_code::ShiftCode;

/// A persisted `{date, shift}` pair for one employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub date: Date,
    pub shift: ShiftCode,
}

/// The paint tool currently armed in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Shift(ShiftCode),
    /// Asks for free-text hours on every apply.
    Custom,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Assigned,
    Cleared,
    /// Nothing changed: no tool armed, cell outside the grid, or the custom
    /// hours prompt came back empty.
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Drag {
    employee_id: Uuid,
    start: Date,
    current: Date,
}

#[derive(Debug, Clone)]
pub struct ShiftGrid {
    month: YearMonth,
    roster: Vec<Uuid>,
    cells: BTreeMap<Uuid, BTreeMap<Date, ShiftCode>>,
    tool: Option<Tool>,
    drag: Option<Drag>,
}

impl ShiftGrid {
    pub fn new(month: YearMonth, roster: impl IntoIterator<Item = Uuid>) -> Self {
        let roster: Vec<Uuid> = roster.into_iter().collect();
        let cells = roster.iter().map(|id| (*id, BTreeMap::new())).collect();
        Self {
            month,
            roster,
            cells,
            tool: None,
            drag: None,
        }
    }

    pub fn month(&self) -> YearMonth {
        self.month
    }

    pub fn roster(&self) -> &[Uuid] {
        &self.roster
    }

    pub fn tool(&self) -> Option<Tool> {
        self.tool
    }

    /// Arms a tool. Selecting the armed tool again disarms it.
    pub fn select_tool(&mut self, tool: Option<Tool>) {
        self.tool = if tool.is_some() && tool == self.tool {
            None
        } else {
            tool
        };
    }

    pub fn get(&self, employee_id: Uuid, date: Date) -> Option<ShiftCode> {
        self.cells.get(&employee_id)?.get(&date).copied()
    }

    /// Replaces an employee's row with persisted entries.
    pub fn load_employee(&mut self, employee_id: Uuid, entries: impl IntoIterator<Item = ScheduleEntry>) {
        let Some(row) = self.cells.get_mut(&employee_id) else {
            return;
        };
        row.clear();
        for entry in entries {
            if self.month.contains(entry.date) {
                row.insert(entry.date, entry.shift);
            }
        }
    }

    pub fn apply_to_cell<P>(&mut self, employee_id: Uuid, date: Date, prompt: P) -> Applied
    where
        P: FnOnce() -> Option<String>,
    {
        if !self.in_grid(employee_id, date) {
            return Applied::Skipped;
        }
        match self.resolve_tool(prompt) {
            Some(value) => self.paint(employee_id, date, date, value),
            None => Applied::Skipped,
        }
    }

    /// Assigns `shift` to every day of the inclusive range, in either order.
    pub fn apply_to_range(&mut self, employee_id: Uuid, start: Date, end: Date, shift: ShiftCode) -> Applied {
        self.paint(employee_id, start, end, Some(shift))
    }

    pub fn clear_range(&mut self, employee_id: Uuid, start: Date, end: Date) -> Applied {
        self.paint(employee_id, start, end, None)
    }

    pub fn begin_drag(&mut self, employee_id: Uuid, date: Date) {
        self.drag = self.in_grid(employee_id, date).then_some(Drag {
            employee_id,
            start: date,
            current: date,
        });
    }

    /// Pointer entered another cell while the button is held. Cells of other
    /// employees do not extend the gesture.
    pub fn drag_enter(&mut self, employee_id: Uuid, date: Date) {
        if let Some(drag) = self.drag.as_mut() {
            if drag.employee_id == employee_id && self.month.contains(date) {
                drag.current = date;
            }
        }
    }

    /// Pointer left the grid with the button held.
    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Button released: applies the armed tool over the dragged range.
    pub fn end_drag<P>(&mut self, prompt: P) -> Applied
    where
        P: FnOnce() -> Option<String>,
    {
        let Some(drag) = self.drag.take() else {
            return Applied::Skipped;
        };
        if drag.start == drag.current {
            return self.apply_to_cell(drag.employee_id, drag.start, prompt);
        }
        match self.resolve_tool(prompt) {
            Some(value) => self.paint(drag.employee_id, drag.start, drag.current, value),
            None => Applied::Skipped,
        }
    }

    /// Serializes one employee's row into `{date, shift}` pairs by date.
    pub fn employee_entries(&self, employee_id: Uuid) -> Vec<ScheduleEntry> {
        self.cells
            .get(&employee_id)
            .map(|row| {
                row.iter()
                    .map(|(date, shift)| ScheduleEntry {
                        date: *date,
                        shift: *shift,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn employee_shifts(&self, employee_id: Uuid) -> impl Iterator<Item = &ShiftCode> {
        self.cells.get(&employee_id).into_iter().flat_map(|row| row.values())
    }

    fn in_grid(&self, employee_id: Uuid, date: Date) -> bool {
        self.cells.contains_key(&employee_id) && self.month.contains(date)
    }

    /// `Some(None)` clears, `Some(Some(code))` assigns, `None` aborts.
    fn resolve_tool<P>(&self, prompt: P) -> Option<Option<ShiftCode>>
    where
        P: FnOnce() -> Option<String>,
    {
        match self.tool? {
            Tool::Shift(code) => Some(Some(code)),
            Tool::Delete => Some(None),
            Tool::Custom => {
                let text = prompt()?;
                let text = text.trim();
                if text.is_empty() {
                    return None;
                }
                match ShiftCode::custom(text) {
                    Ok(code) => Some(Some(code)),
                    Err(e) => {
                        tracing::debug!("Ignoring custom hours input: {}", e);
                        None
                    }
                }
            }
        }
    }

    fn paint(&mut self, employee_id: Uuid, start: Date, end: Date, value: Option<ShiftCode>) -> Applied {
        let month = self.month;
        let Some(row) = self.cells.get_mut(&employee_id) else {
            return Applied::Skipped;
        };
        let (lo, hi) = if start <= end { (start, end) } else { (end, start) };

        let mut touched = false;
        for date in month.days().filter(|d| *d >= lo && *d <= hi) {
            touched = true;
            match value {
                Some(code) => {
                    row.insert(date, code);
                }
                None => {
                    row.remove(&date);
                }
            }
        }

        match (touched, value) {
            (false, _) => Applied::Skipped,
            (true, Some(_)) => Applied::Assigned,
            (true, None) => Applied::Cleared,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::shift_code::{DutyShift, FixedShift};
    use time::macros::date;
    use time::Month;

    const MORNING: ShiftCode = ShiftCode::Fixed(FixedShift::Morning);

    fn grid() -> (ShiftGrid, Uuid) {
        let id = Uuid::new_v4();
        (ShiftGrid::new(YearMonth::new(2024, Month::March), [id]), id)
    }

    fn no_prompt() -> Option<String> {
        None
    }

    #[test]
    fn selecting_active_tool_disarms_it() {
        let (mut g, _) = grid();
        g.select_tool(Some(Tool::Shift(MORNING)));
        assert_eq!(g.tool(), Some(Tool::Shift(MORNING)));
        g.select_tool(Some(Tool::Shift(MORNING)));
        assert_eq!(g.tool(), None);
        g.select_tool(Some(Tool::Delete));
        g.select_tool(Some(Tool::Custom));
        assert_eq!(g.tool(), Some(Tool::Custom));
    }

    #[test]
    fn cell_apply_assigns_overwrites_and_deletes() {
        let (mut g, id) = grid();
        let day = date!(2024 - 03 - 04);
        assert_eq!(g.apply_to_cell(id, day, no_prompt), Applied::Skipped);

        g.select_tool(Some(Tool::Shift(MORNING)));
        assert_eq!(g.apply_to_cell(id, day, no_prompt), Applied::Assigned);
        assert_eq!(g.get(id, day), Some(MORNING));

        g.select_tool(Some(Tool::Shift(ShiftCode::Duty(DutyShift::D2))));
        g.apply_to_cell(id, day, no_prompt);
        assert_eq!(g.get(id, day), Some(ShiftCode::Duty(DutyShift::D2)));

        g.select_tool(Some(Tool::Delete));
        assert_eq!(g.apply_to_cell(id, day, no_prompt), Applied::Cleared);
        assert_eq!(g.get(id, day), None);
    }

    #[test]
    fn custom_tool_aborts_on_blank_or_cancelled_prompt() {
        let (mut g, id) = grid();
        let day = date!(2024 - 03 - 05);
        g.select_tool(Some(Tool::Shift(MORNING)));
        g.apply_to_cell(id, day, no_prompt);

        g.select_tool(Some(Tool::Custom));
        assert_eq!(g.apply_to_cell(id, day, || Some("   ".into())), Applied::Skipped);
        assert_eq!(g.apply_to_cell(id, day, no_prompt), Applied::Skipped);
        assert_eq!(g.apply_to_cell(id, day, || Some("later".into())), Applied::Skipped);
        assert_eq!(g.get(id, day), Some(MORNING));

        assert_eq!(g.apply_to_cell(id, day, || Some("7-15".into())), Applied::Assigned);
        assert_eq!(g.get(id, day).map(|c| c.to_string()), Some("7-15".to_string()));
    }

    #[test]
    fn range_apply_is_inclusive_order_free_and_idempotent() {
        let (mut g, id) = grid();
        g.apply_to_range(id, date!(2024 - 03 - 10), date!(2024 - 03 - 06), MORNING);
        let once = g.employee_entries(id);
        assert_eq!(once.len(), 5);
        assert_eq!(once[0].date, date!(2024 - 03 - 06));
        assert_eq!(once[4].date, date!(2024 - 03 - 10));

        g.apply_to_range(id, date!(2024 - 03 - 06), date!(2024 - 03 - 10), MORNING);
        assert_eq!(g.employee_entries(id), once);

        g.clear_range(id, date!(2024 - 03 - 07), date!(2024 - 03 - 08));
        assert_eq!(g.employee_entries(id).len(), 3);
    }

    #[test]
    fn range_outside_month_is_clipped() {
        let (mut g, id) = grid();
        g.apply_to_range(id, date!(2024 - 02 - 27), date!(2024 - 03 - 02), MORNING);
        assert_eq!(g.employee_entries(id).len(), 2);
        assert_eq!(
            g.apply_to_range(id, date!(2024 - 04 - 01), date!(2024 - 04 - 03), MORNING),
            Applied::Skipped
        );
    }

    #[test]
    fn drag_gesture_paints_range_and_degenerates_to_cell() {
        let (mut g, id) = grid();
        let other = Uuid::new_v4();
        g.select_tool(Some(Tool::Shift(MORNING)));

        g.begin_drag(id, date!(2024 - 03 - 12));
        g.drag_enter(id, date!(2024 - 03 - 13));
        g.drag_enter(other, date!(2024 - 03 - 20));
        g.drag_enter(id, date!(2024 - 03 - 14));
        assert_eq!(g.end_drag(no_prompt), Applied::Assigned);
        assert_eq!(g.employee_entries(id).len(), 3);
        assert!(!g.is_dragging());

        g.begin_drag(id, date!(2024 - 03 - 20));
        assert_eq!(g.end_drag(no_prompt), Applied::Assigned);
        assert_eq!(g.get(id, date!(2024 - 03 - 20)), Some(MORNING));
    }

    #[test]
    fn cancelled_drag_changes_nothing() {
        let (mut g, id) = grid();
        g.select_tool(Some(Tool::Shift(MORNING)));
        g.begin_drag(id, date!(2024 - 03 - 01));
        g.drag_enter(id, date!(2024 - 03 - 09));
        g.cancel_drag();
        assert_eq!(g.end_drag(no_prompt), Applied::Skipped);
        assert!(g.employee_entries(id).is_empty());
    }

    #[test]
    fn custom_drag_with_cancelled_prompt_leaves_range_unmodified() {
        let (mut g, id) = grid();
        g.apply_to_range(id, date!(2024 - 03 - 01), date!(2024 - 03 - 03), MORNING);
        g.select_tool(Some(Tool::Custom));
        g.begin_drag(id, date!(2024 - 03 - 01));
        g.drag_enter(id, date!(2024 - 03 - 03));
        assert_eq!(g.end_drag(|| Some(String::new())), Applied::Skipped);
        assert!(g.employee_entries(id).iter().all(|e| e.shift == MORNING));
    }
}
