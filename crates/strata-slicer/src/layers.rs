//! Layer planning: the Z height of every slice plane.

/// Z height of every layer, bottom to top.
///
/// Layer 0 sits in the middle of the initial slab. Every later layer sits in
/// the middle of its own `layer_thickness` slab, stacked directly on top of
/// the initial one. Callers validate the parameters first (see
/// [`SliceSettings::validate`](crate::SliceSettings::validate)).
pub fn layer_heights(
    layer_thickness: f64,
    layer_count: usize,
    initial_layer_thickness: f64,
) -> Vec<f64> {
    if layer_count == 0 {
        return Vec::new();
    }

    let mut heights = Vec::with_capacity(layer_count);
    heights.push(initial_layer_thickness / 2.0);

    let offset = initial_layer_thickness + layer_thickness / 2.0;
    heights.extend((1..layer_count).map(|i| offset + layer_thickness * (i - 1) as f64));

    heights
}

/// Number of layers whose slab fits within `height`, at least one.
pub fn layer_count_for_height(
    height: f64,
    layer_thickness: f64,
    initial_layer_thickness: f64,
) -> usize {
    if height <= initial_layer_thickness || layer_thickness <= 0.0 {
        return 1;
    }
    // Absorbs round-off in the division, e.g. 0.8 / 0.2.
    let above = ((height - initial_layer_thickness) / layer_thickness + 1e-9).floor();
    1 + above as usize
}
