//! GPU instance records for sprite batches

use bytemuck::{Pod, Zeroable};

use super::sprites::SpriteDraw;

/// One textured quad, laid out for an instance buffer
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    /// x, y, w, h in world units
    pub dest: [f32; 4],
    pub tint: [f32; 4],
    /// Degrees clockwise
    pub rotation: f32,
    /// Texture array layer
    pub layer: u32,
}

impl SpriteInstance {
    pub fn from_draw(draw: &SpriteDraw<u32>) -> Self {
        Self {
            dest: [draw.dest.x, draw.dest.y, draw.dest.w, draw.dest.h],
            tint: draw.tint,
            rotation: draw.rotation,
            layer: draw.handle,
        }
    }
}

/// Convert a batch whose handles are texture layers
pub fn instances(draws: &[SpriteDraw<u32>]) -> Vec<SpriteInstance> {
    draws.iter().map(SpriteInstance::from_draw).collect()
}

/// Raw bytes ready for a buffer upload
pub fn as_bytes(instances: &[SpriteInstance]) -> &[u8] {
    bytemuck::cast_slice(instances)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Rect;

    #[test]
    fn test_layout_has_no_padding() {
        assert_eq!(std::mem::size_of::<SpriteInstance>(), 40);
    }

    #[test]
    fn test_from_draw_and_bytes() {
        let draws = [
            SpriteDraw {
                handle: 3u32,
                dest: Rect::new(40.0, 80.0, 40.0, 40.0),
                rotation: 90.0,
                tint: [1.0; 4],
            },
            SpriteDraw {
                handle: 0u32,
                dest: Rect::new(0.0, 0.0, 8.0, 8.0),
                rotation: 0.0,
                tint: [0.5; 4],
            },
        ];
        let inst = instances(&draws);
        assert_eq!(inst[0].dest, [40.0, 80.0, 40.0, 40.0]);
        assert_eq!(inst[0].layer, 3);
        assert_eq!(as_bytes(&inst).len(), 80);
    }
}
