//! Sprite selection for tiles, the tank and projectiles

use std::collections::HashMap;

use glam::Vec2;

use crate::facing_rotation;
use crate::sim::{LevelSession, Rect};

/// Texture names the asset layer is expected to provide
pub mod names {
    pub const TANK: &str = "tank";
    pub const BULLET: &str = "bullet";
}

/// Tints for game elements
pub mod colors {
    pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    /// Enhanced projectiles
    pub const ENHANCED: [f32; 4] = [0.99, 0.98, 0.0, 1.0];
}

/// Drawn size of a projectile sprite
pub const BULLET_SPRITE_SIZE: f32 = 8.0;

/// Resolves a texture name to a backend handle
pub trait SpriteProvider {
    type Handle: Clone;

    /// `None` when the asset was never loaded; the sprite is then skipped
    fn lookup(&self, name: &str) -> Option<Self::Handle>;
}

/// A name table is the simplest provider (handles are e.g. texture ids)
impl<H: Clone> SpriteProvider for HashMap<String, H> {
    type Handle = H;

    fn lookup(&self, name: &str) -> Option<H> {
        self.get(name).cloned()
    }
}

/// One sprite to draw
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteDraw<H> {
    pub handle: H,
    /// Destination rectangle in world units
    pub dest: Rect,
    /// Degrees clockwise around the destination center
    pub rotation: f32,
    pub tint: [f32; 4],
}

/// Build the draw list for a frame: tiles row-major, then the tank, then projectiles
pub fn sprite_batch<P: SpriteProvider>(session: &LevelSession, provider: &P) -> Vec<SpriteDraw<P::Handle>> {
    let mut draws = Vec::new();

    for (_, tile) in session.grid().cells() {
        if tile.is_destroyed() {
            continue;
        }
        let Some(handle) = tile.kind.sprite_name().and_then(|name| provider.lookup(name)) else {
            continue;
        };
        // Shake is applied to the picture only, never to the collision bounds
        let dest = tile
            .bounds()
            .translate(Vec2::new(tile.animation_offset(), 0.0));
        draws.push(SpriteDraw {
            handle,
            dest,
            rotation: 0.0,
            tint: colors::WHITE,
        });
    }

    let actor = session.actor();
    if let Some(handle) = provider.lookup(names::TANK) {
        draws.push(SpriteDraw {
            handle,
            dest: actor.rect(),
            rotation: facing_rotation(actor.facing()),
            tint: colors::WHITE,
        });
    }

    if let Some(handle) = provider.lookup(names::BULLET) {
        for projectile in actor.projectiles() {
            draws.push(SpriteDraw {
                handle: handle.clone(),
                dest: Rect::centered(projectile.pos, Vec2::splat(BULLET_SPRITE_SIZE / 2.0)),
                rotation: projectile.direction.y.atan2(projectile.direction.x).to_degrees(),
                tint: if projectile.enhanced {
                    colors::ENHANCED
                } else {
                    colors::WHITE
                },
            });
        }
    }

    draws
}
