//! In-memory drawable store used by the desktop front end and by tests.

use slotmap::{SlotMap, new_key_type};

use super::{CellAppearance, CellRenderer, RenderError};
use crate::types::CellCoord;

new_key_type! {
    pub struct DrawableId;
}

#[derive(Clone, Debug)]
pub struct Drawable {
    pub coord: CellCoord,
    pub appearance: CellAppearance,
    /// Bumped on every in-place update.
    pub revision: u32,
}

#[derive(Debug, Default)]
pub struct Scene {
    drawables: SlotMap<DrawableId, Drawable>,
    created: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Drawable> {
        self.drawables.values()
    }

    pub fn len(&self) -> usize {
        self.drawables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drawables.is_empty()
    }

    pub fn created_total(&self) -> u64 {
        self.created
    }
}

impl CellRenderer for Scene {
    type Handle = DrawableId;

    fn create(
        &mut self,
        coord: CellCoord,
        appearance: &CellAppearance,
    ) -> Result<DrawableId, RenderError> {
        self.created += 1;
        Ok(self.drawables.insert(Drawable { coord, appearance: appearance.clone(), revision: 0 }))
    }

    fn update(&mut self, handle: DrawableId, appearance: &CellAppearance) -> Result<(), RenderError> {
        let drawable = self.drawables.get_mut(handle).ok_or(RenderError::StaleHandle)?;
        drawable.appearance = appearance.clone();
        drawable.revision += 1;
        Ok(())
    }

    fn remove(&mut self, handle: DrawableId) {
        self.drawables.remove(handle);
    }
}
