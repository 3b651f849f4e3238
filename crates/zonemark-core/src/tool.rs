use crate::geometry::Point;

/// Pointer-driven annotation tool, as seen by a session host.
///
/// All points are canvas-space. Mutators return `true` when the tool's
/// visible state changed and the overlay needs to be redrawn.
pub trait AnnotationTool {
    /// Geometry handed to the caller on confirm.
    type Output;

    fn pointer_down(&mut self, p: Point) -> bool;
    fn pointer_move(&mut self, p: Point) -> bool;
    fn pointer_up(&mut self, p: Point) -> bool;

    /// Whether `confirm` would currently do anything.
    fn can_confirm(&self) -> bool;

    /// Advance towards completion, returning the output once complete.
    fn confirm(&mut self) -> Option<Self::Output>;

    /// Finish a secondary step such as entrance marking. Tools without
    /// one ignore it.
    fn complete(&mut self) -> Option<Self::Output> {
        None
    }

    /// Discard all geometry and return to idle.
    fn reset(&mut self) -> bool;

    fn is_idle(&self) -> bool;
}
