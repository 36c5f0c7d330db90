/// Generational slot storage for rooms, dynamic objects, visible-room sets and
/// character instances.
///
/// # Why handles carry a generation
/// Other state (character floor references, host-side ids) refers to slots by
/// handle. When a slot is freed and reused, its generation is bumped so a stale
/// handle resolves to `None` instead of silently aliasing the new occupant.
///
/// # Raw id bit layout
/// Handles cross the host boundary as a packed `u64` (least-significant bit = bit 0):
///
/// - bits 0..=31  : slot index (u32)
/// - bits 32..=63 : generation (u32, never zero for a live slot)
///
/// Treat the layout as a wire format: hosts store these ids between ticks.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle {
    pub index: u32,
    pub generation: u32,
}

impl Handle {
    /// Pack into the host-facing raw id.
    #[inline]
    pub fn to_raw(self) -> u64 {
        (self.index as u64) | ((self.generation as u64) << u32::BITS)
    }

    /// Unpack a host-facing raw id.
    ///
    /// Rejects a zero generation, which no live slot ever carries. Whether the
    /// handle still points at a live slot is checked by the arena itself.
    pub fn from_raw(raw: u64) -> Result<Self, &'static str> {
        const INDEX_MASK: u64 = u32::MAX as u64;
        let generation = (raw >> u32::BITS) as u32;
        if generation == 0 {
            return Err("Handle generation is zero");
        }
        Ok(Self {
            index: (raw & INDEX_MASK) as u32,
            generation,
        })
    }
}

#[derive(Clone, Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// A vector of slots addressed by [`Handle`].
///
/// Insertion reuses the lowest free slot before growing, so indices stay small
/// and stable for as long as their occupant lives.
#[derive(Clone, Debug)]
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    live: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            live: 0,
        }
    }

    pub fn insert(&mut self, value: T) -> Handle {
        self.live += 1;

        if let Some(index) = self.slots.iter().position(|s| s.value.is_none()) {
            let slot = &mut self.slots[index];
            slot.generation = slot.generation.wrapping_add(1).max(1);
            slot.value = Some(value);
            return Handle {
                index: index as u32,
                generation: slot.generation,
            };
        }

        self.slots.push(Slot {
            generation: 1,
            value: Some(value),
        });
        Handle {
            index: (self.slots.len() - 1) as u32,
            generation: 1,
        }
    }

    pub fn remove(&mut self, handle: Handle) -> Option<T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let value = slot.value.take()?;
        self.live -= 1;
        Some(value)
    }

    #[inline]
    pub fn get(&self, handle: Handle) -> Option<&T> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_ref()
    }

    #[inline]
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_mut()
    }

    #[inline]
    pub fn contains(&self, handle: Handle) -> bool {
        self.get(handle).is_some()
    }

    /// Live entries in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &T)> {
        self.slots.iter().enumerate().filter_map(|(i, s)| {
            s.value.as_ref().map(|v| {
                (
                    Handle {
                        index: i as u32,
                        generation: s.generation,
                    },
                    v,
                )
            })
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Handle, &mut T)> {
        self.slots.iter_mut().enumerate().filter_map(|(i, s)| {
            let generation = s.generation;
            s.value.as_mut().map(move |v| {
                (
                    Handle {
                        index: i as u32,
                        generation,
                    },
                    v,
                )
            })
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.live
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Drop every occupant. Generations survive so old handles stay stale.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.value = None;
        }
        self.live = 0;
    }
}
