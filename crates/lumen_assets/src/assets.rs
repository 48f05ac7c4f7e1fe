/// One interleaved vertex: position, normal and the first UV channel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vertex {
    pub position: [f32; 3], // Flat lists are easier for generic loaders
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    /// Floats per vertex in the interleaved layout (3 position + 3 normal + 2 UV).
    pub const STRIDE: usize = 8;
    pub const POSITION_OFFSET: usize = 0;
    pub const NORMAL_OFFSET: usize = 3;
    pub const UV_OFFSET: usize = 6;

    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }

    /// `[px, py, pz, nx, ny, nz, u, v]`
    pub fn to_array(&self) -> [f32; Self::STRIDE] {
        let [px, py, pz] = self.position;
        let [nx, ny, nz] = self.normal;
        let [u, v] = self.uv;
        [px, py, pz, nx, ny, nz, u, v]
    }
}

/// Flattens vertices into one float buffer with a fixed stride of
/// [`Vertex::STRIDE`].
pub fn interleave(vertices: &[Vertex]) -> Vec<f32> {
    let mut buffer = Vec::with_capacity(vertices.len() * Vertex::STRIDE);
    for vertex in vertices {
        buffer.extend_from_slice(&vertex.to_array());
    }
    buffer
}
