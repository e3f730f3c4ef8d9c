//! Tab strip drag-and-drop state.
//!
//! Tabs are dragged horizontally. While a tab is tracked, the tabs between
//! its origin and the pointer are shifted visually; nothing moves in the
//! workspace until the drop, which yields one `(from, to)` move.
//!
//! Drags that start outside the strip (a request dragged from a list) show
//! a drop pointer between tabs and yield an insertion index instead.

/// Horizontal extent of a rendered tab.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TabGeometry {
    /// Left edge.
    pub left: f32,
    /// Width.
    pub width: f32,
}

impl TabGeometry {
    /// Horizontal midpoint.
    #[must_use]
    pub fn midpoint(&self) -> f32 {
        self.left + self.width / 2.0
    }
}

/// A node on the path from the pointer target up to the strip.
///
/// Hit paths are ordered innermost first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitNode {
    /// Tab label text.
    Label,
    /// Close icon inside a tab.
    CloseIcon,
    /// A draggable tab.
    Tab {
        /// Position of the tab in the strip.
        index: usize,
    },
    /// The "new tab" button.
    AddButton,
    /// The strip container.
    Strip,
}

/// Visual offset applied to a tab while another one is dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shift {
    /// Rendered in place.
    #[default]
    None,
    /// Shifted one slot to the left.
    Left,
    /// Shifted one slot to the right.
    Right,
}

#[derive(Debug, Default)]
struct ReorderState {
    dragged: Option<usize>,
    over: Option<usize>,
    moves: Vec<f32>,
}

/// Headless tab strip.
#[derive(Debug, Default)]
pub struct TabStrip {
    geometry: Vec<TabGeometry>,
    shifts: Vec<Shift>,
    reorder: ReorderState,
    drop_pointer: Option<usize>,
}

impl TabStrip {
    /// Creates an empty strip.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lays out tabs of the given widths from x = 0.
    pub fn layout(&mut self, widths: &[f32]) {
        let mut left = 0.0;
        self.geometry = widths
            .iter()
            .map(|&width| {
                let geometry = TabGeometry { left, width };
                left += width;
                geometry
            })
            .collect();
        self.reset();
    }

    /// Current tab geometry.
    #[must_use]
    pub fn geometry(&self) -> &[TabGeometry] {
        &self.geometry
    }

    /// Visual shift of every tab.
    #[must_use]
    pub fn shifts(&self) -> &[Shift] {
        &self.shifts
    }

    /// Index of the tab being dragged.
    #[must_use]
    pub const fn dragged(&self) -> Option<usize> {
        self.reorder.dragged
    }

    /// Position the dragged tab would drop at.
    #[must_use]
    pub const fn over(&self) -> Option<usize> {
        self.reorder.over
    }

    /// Insertion index shown for an external drag.
    #[must_use]
    pub const fn drop_pointer(&self) -> Option<usize> {
        self.drop_pointer
    }

    /// Returns true while a tab is being dragged.
    #[must_use]
    pub const fn is_tracking(&self) -> bool {
        self.reorder.dragged.is_some()
    }

    /// Finds the draggable tab on a hit path.
    ///
    /// Walks from the innermost node outwards and stops at the strip.
    #[must_use]
    pub fn find_draggable(path: &[HitNode]) -> Option<usize> {
        for node in path {
            match node {
                HitNode::Tab { index } => return Some(*index),
                HitNode::Strip => return None,
                _ => {}
            }
        }
        None
    }

    /// Horizontal delta between the last two pointer positions.
    ///
    /// Positive when moving right, zero without two samples.
    #[must_use]
    pub fn reorder_ddx(&self) -> f32 {
        match self.reorder.moves.as_slice() {
            [.., previous, last] => last - previous,
            _ => 0.0,
        }
    }

    /// Starts tracking the tab under the pointer. Returns its index.
    pub fn drag_start(&mut self, path: &[HitNode], x: f32) -> Option<usize> {
        let index = Self::find_draggable(path).filter(|i| *i < self.geometry.len())?;
        self.reorder = ReorderState {
            dragged: Some(index),
            over: Some(index),
            moves: vec![x],
        };
        self.shifts = vec![Shift::None; self.geometry.len()];
        Some(index)
    }

    /// Handles pointer movement while dragging over the strip.
    ///
    /// A tracked tab reorders when the pointer crosses the midpoint of
    /// another tab in the direction of travel. An external drag updates
    /// the drop pointer instead.
    pub fn drag_over(&mut self, path: &[HitNode], x: f32) {
        let Some(dragged) = self.reorder.dragged else {
            self.drop_pointer = Some(self.compute_drop_order(x));
            return;
        };
        self.reorder.moves.push(x);
        if self.reorder.moves.len() > 2 {
            self.reorder.moves.remove(0);
        }

        let ddx = self.reorder_ddx();
        let Some(target) = Self::find_draggable(path) else {
            return;
        };
        let Some(geometry) = self.geometry.get(target) else {
            return;
        };
        let crossed = (ddx > 0.0 && x > geometry.midpoint())
            || (ddx < 0.0 && x < geometry.midpoint());
        if !crossed {
            return;
        }

        // Crossing a tab on the side of the origin hands its slot back.
        let over = match target.cmp(&dragged) {
            std::cmp::Ordering::Equal => dragged,
            std::cmp::Ordering::Greater if ddx > 0.0 => target,
            std::cmp::Ordering::Greater => target - 1,
            std::cmp::Ordering::Less if ddx < 0.0 => target,
            std::cmp::Ordering::Less => target + 1,
        };
        self.update_tabs_reorder(dragged, over);
    }

    /// Pointer left the strip.
    pub fn drag_leave(&mut self) {
        self.drop_pointer = None;
    }

    /// Finishes a reorder. Returns the move to apply, if any.
    pub fn drop_reorder(&mut self) -> Option<(usize, usize)> {
        let result = match (self.reorder.dragged, self.reorder.over) {
            (Some(from), Some(to)) if from != to => Some((from, to)),
            _ => None,
        };
        self.reset();
        result
    }

    /// Finishes an external drag. Returns the insertion index.
    pub fn drop_external(&mut self, x: f32) -> usize {
        let index = self
            .drop_pointer
            .take()
            .unwrap_or_else(|| self.compute_drop_order(x));
        self.reset();
        index
    }

    /// Aborts any drag in progress.
    pub fn drag_end(&mut self) {
        self.reset();
    }

    /// Insertion index for a pointer at `x`: before the first tab whose
    /// midpoint is right of the pointer, else at the end.
    #[must_use]
    pub fn compute_drop_order(&self, x: f32) -> usize {
        self.geometry
            .iter()
            .position(|g| x < g.midpoint())
            .unwrap_or(self.geometry.len())
    }

    fn update_tabs_reorder(&mut self, dragged: usize, over: usize) {
        self.reorder.over = Some(over);
        for (index, shift) in self.shifts.iter_mut().enumerate() {
            *shift = if dragged < index && index <= over {
                Shift::Left
            } else if over <= index && index < dragged {
                Shift::Right
            } else {
                Shift::None
            };
        }
    }

    fn reset(&mut self) {
        self.reorder = ReorderState::default();
        self.shifts = vec![Shift::None; self.geometry.len()];
        self.drop_pointer = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strip() -> TabStrip {
        let mut strip = TabStrip::new();
        strip.layout(&[100.0, 100.0, 100.0, 100.0]);
        strip
    }

    fn over_tab(index: usize) -> [HitNode; 3] {
        [HitNode::Label, HitNode::Tab { index }, HitNode::Strip]
    }

    #[test]
    fn test_find_draggable_walks_out_of_nested_nodes() {
        assert_eq!(TabStrip::find_draggable(&over_tab(2)), Some(2));
        assert_eq!(
            TabStrip::find_draggable(&[HitNode::CloseIcon, HitNode::Tab { index: 1 }]),
            Some(1)
        );
        assert_eq!(TabStrip::find_draggable(&[HitNode::AddButton, HitNode::Strip]), None);
        assert_eq!(
            TabStrip::find_draggable(&[HitNode::Strip, HitNode::Tab { index: 0 }]),
            None
        );
    }

    #[test]
    fn test_ddx_tracks_direction() {
        let mut strip = strip();
        strip.drag_start(&over_tab(0), 50.0);
        assert!(strip.reorder_ddx().abs() < f32::EPSILON);

        strip.drag_over(&over_tab(0), 60.0);
        assert!(strip.reorder_ddx() > 0.0);
        strip.drag_over(&over_tab(0), 40.0);
        assert!(strip.reorder_ddx() < 0.0);
    }

    #[test]
    fn test_drag_right_shifts_tabs_incrementally() {
        let mut strip = strip();
        strip.drag_start(&over_tab(0), 50.0);

        strip.drag_over(&over_tab(1), 140.0);
        assert_eq!(strip.over(), Some(0));

        strip.drag_over(&over_tab(1), 160.0);
        assert_eq!(strip.over(), Some(1));
        assert_eq!(strip.shifts(), &[Shift::None, Shift::Left, Shift::None, Shift::None]);

        strip.drag_over(&over_tab(2), 260.0);
        assert_eq!(strip.over(), Some(2));
        assert_eq!(strip.shifts(), &[Shift::None, Shift::Left, Shift::Left, Shift::None]);

        assert_eq!(strip.drop_reorder(), Some((0, 2)));
        assert!(!strip.is_tracking());
        assert!(strip.shifts().iter().all(|s| *s == Shift::None));
    }

    #[test]
    fn test_drag_left_then_back() {
        let mut strip = strip();
        strip.drag_start(&over_tab(3), 350.0);

        strip.drag_over(&over_tab(2), 240.0);
        strip.drag_over(&over_tab(1), 120.0);
        assert_eq!(strip.over(), Some(1));
        assert_eq!(strip.shifts(), &[Shift::None, Shift::Right, Shift::Right, Shift::None]);

        strip.drag_over(&over_tab(1), 170.0);
        assert_eq!(strip.over(), Some(2));
        assert_eq!(strip.shifts(), &[Shift::None, Shift::None, Shift::Right, Shift::None]);

        strip.drag_over(&over_tab(2), 270.0);
        assert_eq!(strip.over(), Some(3));
        assert_eq!(strip.drop_reorder(), None);
    }

    #[test]
    fn test_drop_without_movement_is_noop() {
        let mut strip = strip();
        strip.drag_start(&over_tab(1), 150.0);
        assert_eq!(strip.drop_reorder(), None);
    }

    #[test]
    fn test_external_drag_shows_drop_pointer() {
        let mut strip = strip();
        strip.drag_over(&[HitNode::Strip], 10.0);
        assert_eq!(strip.drop_pointer(), Some(0));
        strip.drag_over(&over_tab(1), 180.0);
        assert_eq!(strip.drop_pointer(), Some(2));
        strip.drag_over(&[HitNode::Strip], 900.0);
        assert_eq!(strip.drop_pointer(), Some(4));

        assert_eq!(strip.drop_external(900.0), 4);
        assert_eq!(strip.drop_pointer(), None);
    }

    #[test]
    fn test_drag_leave_hides_pointer() {
        let mut strip = strip();
        strip.drag_over(&[HitNode::Strip], 120.0);
        strip.drag_leave();
        assert_eq!(strip.drop_pointer(), None);
        assert_eq!(strip.drop_external(120.0), 1);
    }
}
