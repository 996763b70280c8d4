use super::super::domain::Slab;

/// Upper bounds (in LPA, inclusive) of slabs 0 through 3. Anything above the last bound is slab 4.
const SLAB_UPPER_BOUNDS: [f32; 4] = [8.0, 12.0, 18.0, 25.0];

/// Map an annual compensation figure in LPA to its ordinal slab.
///
/// Boundary values belong to the lower slab. The input must already be a parsed
/// number; callers without one skip classification entirely.
pub fn classify_slab(lpa: f32) -> Slab {
    let index = SLAB_UPPER_BOUNDS
        .iter()
        .position(|bound| lpa <= *bound)
        .unwrap_or(SLAB_UPPER_BOUNDS.len());

    Slab::new(index as u8).unwrap_or(Slab::MAX)
}
