use crate::terrain::VertexGrid;

/// Flatten a vertical swath around the middle column.
///
/// In every row, columns `mid - radius .. mid + radius` (clipped to the row)
/// take the elevation of the row's `mid = width / 2` vertex. Returns the
/// number of vertices written.
pub fn flatten_center_strip(vertices: &mut VertexGrid, radius: usize) -> usize {
    let width = vertices.width() as usize;
    let mid = width / 2;
    let start = mid.saturating_sub(radius);
    let end = (mid + radius).min(width);

    let mut written = 0;
    for y in 0..vertices.height() {
        let Some(target) = vertices.get_vertex_at(mid as u32, y).map(|v| v.y) else {
            continue;
        };
        for x in start..end {
            if let Some(elevation) = vertices.elevation_mut(x as u32, y) {
                *elevation = target;
                written += 1;
            }
        }
    }
    written
}
