use crate::ecs::entity::Entity;

/// A block-based sparse index mapping entity ids to dense pool slots.
///
/// The id space is split into fixed-size blocks and memory is only allocated for blocks that
/// hold at least one entry. Within a block, slots are a plain vector, so lookup is two array
/// indexings.
///
/// # Design Rationale
///
/// Entity ids are allocated sequentially and recycled, so they stay dense and clustered:
/// - **Sequential allocation**: ids 0, 1, 2, 3... as entities are created
/// - **Recycling**: destroyed ids are handed out again before fresh ones
/// - **Sparse per type**: a given component type is usually attached to a subset of entities
///
/// Blocks keep memory proportional to the id ranges a component type actually touches, while
/// keeping lookups free of hashing.
///
/// | Operation | Time | Memory |
/// |-----------|------|--------|
/// | `insert()` | O(1) amortized | Allocates block on first use |
/// | `get()` | O(1) | No allocation |
/// | `remove()` | O(1) | No deallocation (leaves `None`) |
#[derive(Debug)]
pub struct SparseIndex {
    /// The number of slots per block.
    block_size: usize,

    /// Outer Vec is indexed by `entity_index / block_size`.
    /// Inner Vec is indexed by `entity_index % block_size`.
    blocks: Vec<Option<Vec<Option<usize>>>>,
}

impl SparseIndex {
    /// Default block size, sized for typical entity counts of a 2D game scene.
    pub const DEFAULT_BLOCK_SIZE: usize = 256;

    /// Create a new index with the default block size.
    #[inline]
    pub const fn new() -> Self {
        Self::new_with_block_size(Self::DEFAULT_BLOCK_SIZE)
    }

    /// Create a new index with a custom block size.
    ///
    /// # Panics
    ///
    /// Debug builds panic if block_size is 0.
    #[inline]
    pub const fn new_with_block_size(block_size: usize) -> Self {
        debug_assert!(block_size > 0, "block_size must be greater than 0");
        Self {
            block_size,
            blocks: Vec::new(),
        }
    }

    /// Calculate block and within-block indices for an entity.
    #[inline]
    fn indices(&self, entity: Entity) -> (usize, usize) {
        let index = entity.index();
        (index / self.block_size, index % self.block_size)
    }

    /// Map `entity` to `slot`, replacing any previous mapping.
    pub fn insert(&mut self, entity: Entity, slot: usize) {
        let (block_index, within_block_index) = self.indices(entity);

        if block_index >= self.blocks.len() {
            self.blocks.resize_with(block_index + 1, || None);
        }

        let block_size = self.block_size;
        let block = self.blocks[block_index].get_or_insert_with(|| vec![None; block_size]);
        block[within_block_index] = Some(slot);
    }

    /// Get the slot mapped to `entity`.
    #[inline]
    pub fn get(&self, entity: Entity) -> Option<usize> {
        let (block_index, within_block_index) = self.indices(entity);
        let block = self.blocks.get(block_index)?.as_ref()?;
        block[within_block_index]
    }

    /// Remove the mapping for `entity`, returning the slot it pointed at.
    pub fn remove(&mut self, entity: Entity) -> Option<usize> {
        let (block_index, within_block_index) = self.indices(entity);
        let block = self.blocks.get_mut(block_index)?.as_mut()?;
        block[within_block_index].take()
    }

    /// Check if `entity` is mapped.
    #[inline]
    pub fn contains(&self, entity: Entity) -> bool {
        self.get(entity).is_some()
    }

    /// Drop every mapping and release the blocks.
    pub fn clear(&mut self) {
        self.blocks.clear();
    }

    /// Get the number of block slots, allocated or not.
    #[inline]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Get the number of blocks that have been allocated.
    pub fn allocated_block_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_some()).count()
    }
}

impl Default for SparseIndex {
    /// Custom default to ensure we get the default block size.
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
