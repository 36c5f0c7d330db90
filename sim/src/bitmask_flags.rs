use num_traits::{One, PrimInt};

/// Trait implemented by flag enums declared with [`define_bitmask_flags!`].
///
/// The enum's discriminant (via `#[repr(u8)]`) is the bit index inside `Storage`.
/// Input flags live in a `u16`, particle flags in a `u32`, climb faces in a `u8`.
pub trait FlagBitmask {
    type Storage: PrimInt;

    fn bit_index(&self) -> u8;

    fn mask(&self) -> Self::Storage {
        // NOTE: `bit_index()` must stay below the bit width of `Storage`.
        Self::Storage::one() << (self.bit_index() as usize)
    }
}

/// A plain bitmask container for per-tick character flags.
///
/// This is what crosses the host boundary: the host only ever sees `bits`.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BitmaskFlags<T: PrimInt> {
    pub bits: T,
}

impl<T: PrimInt> BitmaskFlags<T> {
    pub fn new(bits: T) -> Self {
        Self { bits }
    }

    /// Build a mask from a list of flags.
    pub fn from_flags<U: FlagBitmask<Storage = T> + Copy>(flags: &[U]) -> Self {
        let mut out = Self::new(T::zero());
        out.add_many(flags);
        out
    }

    pub fn add<U: FlagBitmask<Storage = T>>(&mut self, flag: U) {
        self.bits = self.bits | flag.mask();
    }

    pub fn remove<U: FlagBitmask<Storage = T>>(&mut self, flag: U) {
        self.bits = self.bits & !flag.mask();
    }

    /// Set or clear `flag` depending on `on`.
    pub fn set<U: FlagBitmask<Storage = T>>(&mut self, flag: U, on: bool) {
        if on {
            self.add(flag);
        } else {
            self.remove(flag);
        }
    }

    pub fn has<U: FlagBitmask<Storage = T>>(&self, flag: U) -> bool {
        (self.bits & flag.mask()) != T::zero()
    }

    pub fn add_many<U: FlagBitmask<Storage = T> + Copy>(&mut self, flags: &[U]) {
        for &flag in flags {
            self.add(flag);
        }
    }

    pub fn has_any<U: FlagBitmask<Storage = T> + Copy>(&self, flags: &[U]) -> bool {
        if flags.is_empty() {
            return false;
        }
        let combined = flags.iter().fold(T::zero(), |acc, f| acc | f.mask());
        (self.bits & combined) != T::zero()
    }

    pub fn is_empty(&self) -> bool {
        self.bits == T::zero()
    }

    pub fn clear(&mut self) {
        self.bits = T::zero();
    }
}

/// Declare a bitmask-backed enum and implement `FlagBitmask` for it.
///
/// Variants are assigned bit indices in declaration order, so reordering a
/// declaration changes the raw bits the host reads.
///
/// ```text
/// define_bitmask_flags!(InputFlag, u16, {
///     NonzeroAnalog,
///     APressed,
/// });
/// ```
#[macro_export]
macro_rules! define_bitmask_flags {
    ($(#[$meta:meta])* $name:ident, $storage:ty, { $($(#[$vmeta:meta])* $variant:ident),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[repr(u8)]
        pub enum $name {
            $($(#[$vmeta])* $variant),*
        }

        impl $crate::bitmask_flags::FlagBitmask for $name {
            type Storage = $storage;

            fn bit_index(&self) -> u8 {
                *self as u8
            }
        }
    };
}
