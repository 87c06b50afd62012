use crate::world::Facing;

/// Everything that, when unchanged, lets a frame be skipped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderKey {
    pub x: f32,
    pub y: f32,
    pub facing: Facing,
    pub level: u32,
    pub width: usize,
    pub height: usize,
}

/// Remembers the inputs of the last rendered frame.
///
/// Texture pool arrival is deliberately *not* part of the key; whoever
/// swaps the pool calls [`DirtyCache::invalidate`].
#[derive(Clone, Debug, Default)]
pub struct DirtyCache {
    last: Option<RenderKey>,
    epsilon: f32,
}

impl DirtyCache {
    pub fn new(epsilon: f32) -> Self {
        Self {
            last: None,
            epsilon,
        }
    }

    /// True when `key` matches the last committed frame.
    pub fn is_clean(&self, key: &RenderKey) -> bool {
        self.last.is_some_and(|last| {
            (last.x - key.x).abs() < self.epsilon
                && (last.y - key.y).abs() < self.epsilon
                && last.facing == key.facing
                && last.level == key.level
                && last.width == key.width
                && last.height == key.height
        })
    }

    pub fn commit(&mut self, key: RenderKey) {
        self.last = Some(key);
    }

    /// Force the next frame to render.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    pub fn last(&self) -> Option<&RenderKey> {
        self.last.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> RenderKey {
        RenderKey {
            x: 3.0,
            y: 4.0,
            facing: Facing::East,
            level: 2,
            width: 320,
            height: 200,
        }
    }

    #[test]
    fn empty_cache_is_dirty() {
        assert!(!DirtyCache::new(0.001).is_clean(&key()));
    }

    #[test]
    fn tiny_motion_is_clean() {
        let mut c = DirtyCache::new(0.001);
        c.commit(key());
        assert!(c.is_clean(&key()));
        assert!(c.is_clean(&RenderKey {
            x: 3.0005,
            y: 3.9995,
            ..key()
        }));
        assert!(!c.is_clean(&RenderKey { x: 3.01, ..key() }));
    }

    #[test]
    fn every_field_participates() {
        let mut c = DirtyCache::new(0.001);
        c.commit(key());
        assert!(!c.is_clean(&RenderKey {
            facing: Facing::West,
            ..key()
        }));
        assert!(!c.is_clean(&RenderKey { level: 3, ..key() }));
        assert!(!c.is_clean(&RenderKey { width: 321, ..key() }));
        assert!(!c.is_clean(&RenderKey { height: 199, ..key() }));
        assert!(!c.is_clean(&RenderKey { y: 4.5, ..key() }));
    }

    #[test]
    fn invalidate_forgets() {
        let mut c = DirtyCache::new(0.001);
        c.commit(key());
        c.invalidate();
        assert!(c.last().is_none());
        assert!(!c.is_clean(&key()));
    }
}
