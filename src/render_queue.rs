use glam::Mat4;

/// One recorded draw of a payload during the draw pass.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub label: String,
    pub model: Mat4,
    pub model_view_projection: Mat4,
    pub color: [u8; 3],
    pub index_count: u32,
}

/// Draw calls in submission order. Cleared by the driver before each frame.
#[derive(Debug, Default)]
pub struct RenderQueue {
    calls: Vec<DrawCall>,
}

impl RenderQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit(&mut self, call: DrawCall) {
        self.calls.push(call);
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.calls.iter().map(|call| call.label.as_str())
    }
}
