use crate::ops::reorder::DropTarget;

/// Pointer movement (in terminal cells) required before an armed press
/// becomes a drag. Row movement is coarse, so one row is enough; column
/// jitter needs a little slack.
const ROW_THRESHOLD: u16 = 1;
const COL_THRESHOLD: u16 = 3;

/// What the pointer is over, as reported by the render layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hover {
    /// Over a card; `upper_half` picks insert-before vs insert-after.
    Card { id: String, upper_half: bool },
    /// Over empty grid space.
    Empty,
}

/// The drag gesture as an explicit state machine.
///
/// One gesture at a time: pointer-down arms on a card, movement past the
/// threshold starts the drag, pointer-up either commits a drop or (if
/// never past the threshold) reports a plain click. Cancelling at any
/// point returns to idle without touching persisted order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Armed {
        card: String,
        origin: (u16, u16),
    },
    Dragging {
        card: String,
        hover: Option<Hover>,
    },
}

/// What a completed pointer-up means for the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    /// Nothing was in flight.
    None,
    /// Press-and-release without crossing the threshold.
    Click { card: String },
    /// A real drag ended over a target.
    Drop { card: String, target: DropTarget },
    /// A real drag ended nowhere useful.
    Cancelled,
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging { .. })
    }

    /// The card the gesture started on, while one is in flight.
    pub fn dragged_card(&self) -> Option<&str> {
        match self {
            DragState::Idle => None,
            DragState::Armed { card, .. } | DragState::Dragging { card, .. } => Some(card),
        }
    }

    /// Current hover target while dragging (for render feedback).
    pub fn hover(&self) -> Option<&Hover> {
        match self {
            DragState::Dragging { hover, .. } => hover.as_ref(),
            _ => None,
        }
    }

    pub fn pointer_down(&mut self, card: &str, pos: (u16, u16)) {
        *self = DragState::Armed {
            card: card.to_string(),
            origin: pos,
        };
    }

    pub fn pointer_move(&mut self, pos: (u16, u16), over: Option<Hover>) {
        match self {
            DragState::Idle => {}
            DragState::Armed { card, origin } => {
                let dx = origin.0.abs_diff(pos.0);
                let dy = origin.1.abs_diff(pos.1);
                if dy >= ROW_THRESHOLD || dx >= COL_THRESHOLD {
                    let card = std::mem::take(card);
                    *self = DragState::Dragging { card, hover: over };
                }
            }
            DragState::Dragging { hover, .. } => {
                *hover = over;
            }
        }
    }

    pub fn pointer_up(&mut self, over: Option<Hover>) -> DragOutcome {
        match std::mem::take(self) {
            DragState::Idle => DragOutcome::None,
            DragState::Armed { card, .. } => DragOutcome::Click { card },
            DragState::Dragging { card, hover } => {
                // Release position wins over the last move.
                let last = over.or(hover);
                match last {
                    Some(Hover::Card { id, upper_half }) => {
                        let target = if upper_half {
                            DropTarget::Before(id)
                        } else {
                            DropTarget::After(id)
                        };
                        DragOutcome::Drop { card, target }
                    }
                    Some(Hover::Empty) => DragOutcome::Drop {
                        card,
                        target: DropTarget::End,
                    },
                    None => DragOutcome::Cancelled,
                }
            }
        }
    }

    /// Abort whatever is in flight.
    pub fn cancel(&mut self) {
        *self = DragState::Idle;
    }
}
