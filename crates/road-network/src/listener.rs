use crate::types::CurveId;

/// Observer of accepted edits.
///
/// `depth` is 0 for the edited curve and 1 for curves that moved because
/// they are locked to it.
pub trait ChangeListener {
    fn on_change(&mut self, curve: CurveId, depth: u32);
}

impl<F> ChangeListener for F
where
    F: FnMut(CurveId, u32),
{
    fn on_change(&mut self, curve: CurveId, depth: u32) {
        self(curve, depth)
    }
}
