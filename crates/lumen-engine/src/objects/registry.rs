use std::collections::BTreeSet;

/// Kind of a driver-allocated GPU object.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum ObjectKind {
    Program,
    Buffer,
    Framebuffer,
    Renderbuffer,
    Shader,
    Texture,
}

/// A driver-assigned id plus its kind.
///
/// Ids are only unique per kind, so the pair is the key.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct GpuObject {
    pub kind: ObjectKind,
    pub id: u32,
}

/// Set of objects a context has created and not yet deleted.
///
/// The registry is not consulted for validity checks; it exists so that
/// disposing a context can delete everything it still owns. Registering an
/// object twice and unregistering an unknown object are both no-ops.
#[derive(Debug, Default)]
pub struct ObjectRegistry {
    objects: BTreeSet<GpuObject>,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, kind: ObjectKind, id: u32) {
        self.objects.insert(GpuObject { kind, id });
    }

    pub fn unregister(&mut self, kind: ObjectKind, id: u32) {
        self.objects.remove(&GpuObject { kind, id });
    }

    #[inline]
    pub fn contains(&self, kind: ObjectKind, id: u32) -> bool {
        self.objects.contains(&GpuObject { kind, id })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Removes and returns every registered object.
    ///
    /// Order is by kind, then id, so sweeps are deterministic.
    pub fn drain(&mut self) -> Vec<GpuObject> {
        std::mem::take(&mut self.objects).into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_is_idempotent() {
        let mut r = ObjectRegistry::new();
        r.register(ObjectKind::Texture, 3);
        r.register(ObjectKind::Texture, 3);
        assert_eq!(r.len(), 1);
    }

    #[test]
    fn same_id_different_kind_are_distinct() {
        let mut r = ObjectRegistry::new();
        r.register(ObjectKind::Buffer, 1);
        r.register(ObjectKind::Texture, 1);
        assert_eq!(r.len(), 2);
        r.unregister(ObjectKind::Buffer, 1);
        assert!(r.contains(ObjectKind::Texture, 1));
        assert!(!r.contains(ObjectKind::Buffer, 1));
    }

    #[test]
    fn unregister_missing_is_noop() {
        let mut r = ObjectRegistry::new();
        r.unregister(ObjectKind::Shader, 9);
        r.register(ObjectKind::Shader, 9);
        r.unregister(ObjectKind::Shader, 9);
        r.unregister(ObjectKind::Shader, 9);
        assert!(r.is_empty());
    }

    #[test]
    fn drain_empties_and_orders() {
        let mut r = ObjectRegistry::new();
        r.register(ObjectKind::Texture, 2);
        r.register(ObjectKind::Program, 5);
        r.register(ObjectKind::Texture, 1);

        let drained = r.drain();
        assert!(r.is_empty());
        assert_eq!(
            drained,
            vec![
                GpuObject { kind: ObjectKind::Program, id: 5 },
                GpuObject { kind: ObjectKind::Texture, id: 1 },
                GpuObject { kind: ObjectKind::Texture, id: 2 },
            ]
        );
    }
}
