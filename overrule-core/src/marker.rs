//! Markers and per-player marker pools.
//!
//! A marker is owned by exactly one of: its pool (unplaced) or a cell's
//! stack (placed). Rust move semantics enforce this — `take` moves the
//! marker out of the pool, `Cell::accept` moves it into a stack, and an
//! overruled marker is dropped (removed from play entirely, never
//! returned to any pool).

use crate::error::{MoveError, UndoError};
use crate::{Player, SizeTier};

/// One physical game piece.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Marker {
    owner: Player,
    size: SizeTier,
    placed: bool,
}

impl Marker {
    #[inline]
    pub fn owner(&self) -> Player {
        self.owner
    }

    #[inline]
    pub fn size(&self) -> SizeTier {
        self.size
    }

    /// Whether this marker has been drawn from its pool and placed.
    #[inline]
    pub fn is_placed(&self) -> bool {
        self.placed
    }
}

/// A player's finite inventory of not-yet-placed markers.
///
/// The allocation is fixed at game start; the pool never exceeds it.
/// Contents are mutated in place, no implicit copies.
#[derive(Clone, Debug)]
pub struct MarkerPool {
    owner: Player,
    available: Vec<Marker>,
    /// Markers allocated per tier at game start (index = tier).
    allocation: Vec<u8>,
}

impl MarkerPool {
    /// Create a pool holding `counts[t]` markers of tier `t` for `owner`.
    pub fn new(owner: Player, counts: &[u8]) -> MarkerPool {
        let mut available = Vec::new();
        for (tier, &count) in counts.iter().enumerate() {
            for _ in 0..count {
                available.push(Marker {
                    owner,
                    size: SizeTier(tier as u8),
                    placed: false,
                });
            }
        }
        MarkerPool {
            owner,
            available,
            allocation: counts.to_vec(),
        }
    }

    #[inline]
    pub fn owner(&self) -> Player {
        self.owner
    }

    /// Number of unplaced markers of the given size.
    pub fn remaining(&self, size: SizeTier) -> usize {
        self.available.iter().filter(|m| m.size == size).count()
    }

    /// Whether at least one unplaced marker of the given size remains.
    #[inline]
    pub fn has(&self, size: SizeTier) -> bool {
        self.available.iter().any(|m| m.size == size)
    }

    /// Total unplaced markers of any size.
    #[inline]
    pub fn markers_left(&self) -> usize {
        self.available.len()
    }

    /// Sizes of all unplaced markers, one entry per marker.
    /// Used by the AI to sample a size uniformly among remaining pieces.
    pub fn remaining_sizes(&self) -> Vec<SizeTier> {
        self.available.iter().map(|m| m.size).collect()
    }

    /// Remove and return an unplaced marker of the given size, marking
    /// it placed. Fails with `OutOfStock` without mutating if none
    /// remains.
    pub fn take(&mut self, size: SizeTier) -> Result<Marker, MoveError> {
        let idx = self
            .available
            .iter()
            .position(|m| m.size == size)
            .ok_or(MoveError::OutOfStock(size))?;
        let mut marker = self.available.swap_remove(idx);
        marker.placed = true;
        Ok(marker)
    }

    /// Return a previously taken, not-overruled marker to the pool.
    /// Used only by undo. Fails with `InvalidReturn` if the marker was
    /// never drawn from this pool or the return would exceed the
    /// initial allocation.
    pub fn give_back(&mut self, mut marker: Marker) -> Result<(), UndoError> {
        let tier = marker.size.index() as usize;
        let allocated = self.allocation.get(tier).copied().unwrap_or(0) as usize;
        if marker.owner != self.owner || !marker.placed || self.remaining(marker.size) >= allocated
        {
            return Err(UndoError::InvalidReturn);
        }
        marker.placed = false;
        self.available.push(marker);
        Ok(())
    }
}
