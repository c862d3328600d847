use std::collections::HashMap;
use std::sync::Arc;

use crate::{Fft, FftDirection};

/// Built transforms, keyed by length and split by direction since the twiddle signs differ
pub(crate) struct FftCache<T> {
    forward_cache: HashMap<usize, Arc<dyn Fft<T>>>,
    inverse_cache: HashMap<usize, Arc<dyn Fft<T>>>,
}
impl<T> FftCache<T> {
    pub fn new() -> Self {
        Self {
            forward_cache: HashMap::new(),
            inverse_cache: HashMap::new(),
        }
    }
    pub fn get(&self, len: usize, direction: FftDirection) -> Option<Arc<dyn Fft<T>>> {
        match direction {
            FftDirection::Forward => self.forward_cache.get(&len),
            FftDirection::Inverse => self.inverse_cache.get(&len),
        }
        .map(Arc::clone)
    }
    pub fn insert(&mut self, fft: &Arc<dyn Fft<T>>, len: usize, direction: FftDirection) {
        let cloned = Arc::clone(fft);
        match direction {
            FftDirection::Forward => self.forward_cache.insert(len, cloned),
            FftDirection::Inverse => self.inverse_cache.insert(len, cloned),
        };
    }
}
