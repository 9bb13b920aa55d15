use std::hash::Hash;

use hashbrown::HashMap;

/// A layout plugin instance bound to a container element.
pub trait Plugin {
    fn destroy(&mut self);
}

/// Plugin instances keyed by container identity.
///
/// Rebuilding a container destroys its previous instance before the new one is
/// stored, so a container never has two live instances.
pub struct PluginRegistry<K, P> {
    instances: HashMap<K, P>,
}

impl<K, P> Default for PluginRegistry<K, P> {
    fn default() -> Self {
        Self {
            instances: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash, P: Plugin> PluginRegistry<K, P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Destroy any instance for `key`, then store the one `make` builds.
    /// A failed build leaves the key empty.
    pub fn rebuild<E, F>(&mut self, key: K, make: F) -> Result<&mut P, E>
    where
        F: FnOnce() -> Result<P, E>,
    {
        if let Some(mut old) = self.instances.remove(&key) {
            old.destroy();
        }
        let instance = make()?;
        Ok(self.instances.entry(key).insert(instance).into_mut())
    }

    pub fn remove(&mut self, key: &K) -> bool {
        match self.instances.remove(key) {
            Some(mut old) => {
                old.destroy();
                true
            }
            None => false,
        }
    }

    /// Destroy instances whose container no longer satisfies `keep`.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&K) -> bool,
    {
        self.instances.retain(|k, p| {
            if keep(k) {
                true
            } else {
                p.destroy();
                false
            }
        });
    }

    pub fn get(&self, key: &K) -> Option<&P> {
        self.instances.get(key)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}
