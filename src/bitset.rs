use bit_set::BitSet;

macro_rules! define_id_type {
    ($prefix:expr, $name:ident) => {
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(usize);

        impl $name {
            pub const fn new(id: usize) -> Self { $name(id) }
            pub const fn index(self) -> usize { self.0 }
        }

        impl From<usize> for $name { fn from(id: usize) -> Self { $name(id) } }
        impl From<$name> for usize { fn from(id: $name) -> Self { id.0 } }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
                write!(f, "{}{}", $prefix, self.0)
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
                write!(f, "{self}")
            }
        }
    }
}

define_id_type!("n", NodeId);

/// A set of dense ids backed by a bit vector. Iteration is always in
/// ascending id order.
#[derive(Clone)]
pub struct TypedBitSet<T> {
    set: BitSet,
    phantom: std::marker::PhantomData<T>,
}

impl<T> TypedBitSet<T> where T: From<usize>, usize: From<T> {
    pub fn new() -> Self {
        Self { set: BitSet::new(), phantom: Default::default() }
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn one(item: T) -> Self {
        let mut set = BitSet::new();
        set.insert(item.into());
        Self { set, phantom: Default::default() }
    }

    /// Returns true if `self` lost any members.
    pub fn intersect_with(&mut self, other: &Self) -> bool {
        let before = self.set.len();
        self.set.intersect_with(&other.set);
        self.set.len() != before
    }

    pub fn contains(&self, item: T) -> bool {
        self.set.contains(item.into())
    }

    pub fn insert(&mut self, item: T) -> bool {
        self.set.insert(item.into())
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.set.iter().map(|idx| idx.into())
    }
}

impl<T> Default for TypedBitSet<T> where T: From<usize>, usize: From<T> {
    fn default() -> Self {
        Self::new()
    }
}

// BitSet equality is sensitive to trailing zero blocks, so compare members.
impl<T> PartialEq for TypedBitSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.set.iter().eq(other.set.iter())
    }
}

impl<T> Eq for TypedBitSet<T> {}

impl<T> FromIterator<T> for TypedBitSet<T> where T: From<usize>, usize: From<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut result = Self::new();
        for item in iter {
            result.insert(item);
        }
        result
    }
}

impl<T> std::fmt::Debug for TypedBitSet<T> where T: From<usize> + std::fmt::Debug, usize: From<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        f.debug_set().entries(self.iter()).finish()
    }
}

pub type NodeSet = TypedBitSet<NodeId>;
