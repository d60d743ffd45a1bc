//! Fixed-capacity note storage.
//!
//! All storage is reserved up front. Insertion past capacity is refused rather
//! than growing or overwriting, and removal compacts in place while keeping
//! the relative order of the remaining notes.

use crate::note::{Note, is_audible};

/// Pre-allocated pool of resident notes.
#[derive(Debug)]
pub struct NotePool {
    notes: Vec<Note>,
    capacity: usize,
}

impl NotePool {
    /// Reserve room for `capacity` notes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            notes: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Insert a note. Returns `false`, leaving the pool untouched, when the
    /// pool is full or the note has no audible frequency.
    pub fn try_insert(&mut self, note: Note) -> bool {
        if self.is_full() || !is_audible(note.frequency()) {
            return false;
        }
        self.notes.push(note);
        true
    }

    /// Keep only the notes for which `keep` returns `true`, preserving order.
    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&mut Note) -> bool,
    {
        self.notes.retain_mut(keep);
    }

    /// Resident notes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Note> {
        self.notes.iter()
    }

    /// Mutable access to resident notes.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Note> {
        self.notes.iter_mut()
    }

    /// Number of resident notes.
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Whether no notes are resident.
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Maximum number of resident notes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether another note would be refused.
    pub fn is_full(&self) -> bool {
        self.notes.len() >= self.capacity
    }

    /// Remove every note.
    pub fn clear(&mut self) {
        self.notes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::ToneRequest;
    use blip_core::Oscillator;

    fn note(freq: f32) -> Note {
        Note::new(&ToneRequest::new(freq, 0.0, 1.0), &Oscillator::new(44100.0), 100.0)
    }

    #[test]
    fn test_insert_until_full() {
        let mut pool = NotePool::with_capacity(3);
        assert!(pool.try_insert(note(220.0)));
        assert!(pool.try_insert(note(330.0)));
        assert!(pool.try_insert(note(440.0)));
        assert!(pool.is_full());
        assert!(!pool.try_insert(note(550.0)));
        assert_eq!(pool.len(), 3);

        let freqs: Vec<f32> = pool.iter().map(Note::frequency).collect();
        assert_eq!(freqs, [220.0, 330.0, 440.0]);
    }

    #[test]
    fn test_silent_notes_refused() {
        let mut pool = NotePool::with_capacity(4);
        assert!(!pool.try_insert(note(0.0)));
        assert!(!pool.try_insert(note(f32::INFINITY)));
        assert!(pool.is_empty());
    }

    #[test]
    fn test_never_reallocates() {
        let mut pool = NotePool::with_capacity(8);
        let ptr = pool.notes.as_ptr();
        for i in 0..20 {
            pool.try_insert(note(100.0 + i as f32));
        }
        assert_eq!(pool.notes.as_ptr(), ptr);
        assert_eq!(pool.len(), 8);
    }

    #[test]
    fn test_retain_is_stable() {
        let mut pool = NotePool::with_capacity(5);
        for f in [100.0, 200.0, 300.0, 400.0, 500.0] {
            pool.try_insert(note(f));
        }
        pool.retain(|n| n.frequency() != 200.0 && n.frequency() != 400.0);
        let freqs: Vec<f32> = pool.iter().map(Note::frequency).collect();
        assert_eq!(freqs, [100.0, 300.0, 500.0]);
        assert!(!pool.is_full());
    }

    #[test]
    fn test_clear() {
        let mut pool = NotePool::with_capacity(2);
        pool.try_insert(note(440.0));
        pool.clear();
        assert!(pool.is_empty());
        assert_eq!(pool.capacity(), 2);
    }
}
