//! Keeps exactly the cells covering the visible bounds materialized.
//!
//! Each pass diffs the desired set (the covering rectangle) against the
//! materialized set: missing cells are created, present ones updated in
//! place, and anything outside the rectangle is culled. Memory therefore
//! scales with the viewport, never with the world.

pub mod scene;
pub mod style;

use std::collections::HashMap;

use thiserror::Error;

use crate::grid::{CellRect, GeoBounds, Lattice};
use crate::types::{CellCoord, CellValue, LatLng};
use crate::world::World;
pub use scene::{Drawable, DrawableId, Scene};
pub use style::{CellStyle, Fill, Rgb, magnitude_band, style_for};

#[derive(Clone, Debug, PartialEq)]
pub struct CellLabel {
    pub text: String,
    pub anchor: LatLng,
}

/// Everything a renderer needs to draw one cell.
#[derive(Clone, Debug, PartialEq)]
pub struct CellAppearance {
    pub bounds: GeoBounds,
    pub value: CellValue,
    pub in_range: bool,
    pub style: CellStyle,
    pub label: Option<CellLabel>,
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("drawable handle no longer exists")]
    StaleHandle,
    #[error("cell {coord} could not be drawn: {reason}")]
    Failed { coord: CellCoord, reason: String },
}

/// Drawing surface for cells. Implemented by whatever widget shows the map.
pub trait CellRenderer {
    type Handle: Copy;

    fn create(
        &mut self,
        coord: CellCoord,
        appearance: &CellAppearance,
    ) -> Result<Self::Handle, RenderError>;

    fn update(&mut self, handle: Self::Handle, appearance: &CellAppearance) -> Result<(), RenderError>;

    fn remove(&mut self, handle: Self::Handle);
}

/// Player-relative inputs to cell styling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewContext {
    pub lattice: Lattice,
    pub player: CellCoord,
    pub interact_radius: u32,
    pub label_radius: u32,
}

impl ViewContext {
    pub fn appearance(&self, coord: CellCoord, world: &World) -> CellAppearance {
        let value = world.get_cell_value(coord);
        let distance = self.player.chebyshev(coord);
        let in_range = distance <= self.interact_radius;
        let bounds = self.lattice.cell_bounds(coord);
        let label = value.filter(|_| distance <= self.label_radius).map(|token| CellLabel {
            text: token.to_string(),
            anchor: bounds.center(),
        });
        CellAppearance { bounds, value, in_range, style: style_for(value, in_range), label }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub created: usize,
    pub updated: usize,
    pub culled: usize,
    pub failed: usize,
    /// The covering rectangle exceeded the materialization cap.
    pub too_many_cells: bool,
}

pub struct ViewportCellManager<R: CellRenderer> {
    renderer: R,
    materialized: HashMap<CellCoord, R::Handle>,
    visible: Option<CellRect>,
    max_cells: usize,
}

impl<R: CellRenderer> ViewportCellManager<R> {
    pub fn new(renderer: R, max_cells: usize) -> Self {
        Self { renderer, materialized: HashMap::new(), visible: None, max_cells }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn visible_rect(&self) -> Option<CellRect> {
        self.visible
    }

    pub fn is_materialized(&self, coord: CellCoord) -> bool {
        self.materialized.contains_key(&coord)
    }

    pub fn materialized_count(&self) -> usize {
        self.materialized.len()
    }

    pub fn materialized(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.materialized.keys().copied()
    }

    /// Full pass over the cells covering `bounds`.
    pub fn reconcile(&mut self, bounds: &GeoBounds, world: &World, ctx: &ViewContext) -> ReconcileStats {
        let rect = ctx.lattice.covering_rect(bounds);
        let mut stats = ReconcileStats::default();

        if rect.cell_count() > self.max_cells as u64 {
            log::warn!(
                "viewport covers {} cells, above the cap of {}; nothing materialized",
                rect.cell_count(),
                self.max_cells
            );
            stats.culled = self.clear();
            stats.too_many_cells = true;
            return stats;
        }

        let renderer = &mut self.renderer;
        self.materialized.retain(|coord, handle| {
            let keep = rect.contains(*coord);
            if !keep {
                renderer.remove(*handle);
                stats.culled += 1;
            }
            keep
        });

        for coord in rect.iter() {
            let appearance = ctx.appearance(coord, world);
            if let Some(&handle) = self.materialized.get(&coord) {
                match self.renderer.update(handle, &appearance) {
                    Ok(()) => {
                        stats.updated += 1;
                        continue;
                    }
                    Err(RenderError::StaleHandle) => {
                        log::debug!("drawable for cell {coord} vanished; recreating");
                        self.materialized.remove(&coord);
                    }
                    Err(err) => {
                        log::warn!("failed to update cell {coord}: {err}");
                        stats.failed += 1;
                        continue;
                    }
                }
            }
            match self.renderer.create(coord, &appearance) {
                Ok(handle) => {
                    self.materialized.insert(coord, handle);
                    stats.created += 1;
                }
                Err(err) => {
                    log::warn!("failed to create cell {coord}: {err}");
                    stats.failed += 1;
                }
            }
        }

        self.visible = Some(rect);
        log::debug!(
            "viewport pass: {} created, {} updated, {} culled, {} failed",
            stats.created,
            stats.updated,
            stats.culled,
            stats.failed
        );
        stats
    }

    /// Restyles one cell in place. Returns whether the cell was on screen.
    /// A cell whose drawable vanished is forgotten so the next pass recreates it.
    pub fn refresh_cell(&mut self, coord: CellCoord, world: &World, ctx: &ViewContext) -> bool {
        let Some(&handle) = self.materialized.get(&coord) else {
            return false;
        };
        match self.renderer.update(handle, &ctx.appearance(coord, world)) {
            Ok(()) => {}
            Err(RenderError::StaleHandle) => {
                log::debug!("drawable for cell {coord} vanished; dropping it");
                self.materialized.remove(&coord);
            }
            Err(err) => log::warn!("failed to refresh cell {coord}: {err}"),
        }
        true
    }

    /// Restyles every materialized cell, e.g. after the player moved.
    pub fn refresh_all(&mut self, world: &World, ctx: &ViewContext) -> usize {
        let mut refreshed = 0;
        let mut stale = Vec::new();
        for (&coord, &handle) in &self.materialized {
            match self.renderer.update(handle, &ctx.appearance(coord, world)) {
                Ok(()) => refreshed += 1,
                Err(RenderError::StaleHandle) => stale.push(coord),
                Err(err) => log::warn!("failed to refresh cell {coord}: {err}"),
            }
        }
        for coord in stale {
            log::debug!("drawable for cell {coord} vanished; dropping it");
            self.materialized.remove(&coord);
        }
        refreshed
    }

    /// Removes every drawable. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.materialized.len();
        for (_, handle) in self.materialized.drain() {
            self.renderer.remove(handle);
        }
        self.visible = None;
        removed
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::config::{DEFAULT_SEED, SpawnTable};
    use crate::types::Token;

    fn world() -> World {
        World::new(DEFAULT_SEED, SpawnTable::default())
    }

    fn ctx(player: CellCoord) -> ViewContext {
        ViewContext {
            lattice: Lattice::new(1.0, LatLng::new(0.0, 0.0)),
            player,
            interact_radius: 1,
            label_radius: 2,
        }
    }

    fn manager() -> ViewportCellManager<Scene> {
        ViewportCellManager::new(Scene::new(), 10_000)
    }

    fn materialized_set(manager: &ViewportCellManager<Scene>) -> HashSet<CellCoord> {
        manager.materialized().collect()
    }

    /// Fails to create drawables for one cell.
    struct FlakyRenderer {
        inner: Scene,
        broken: CellCoord,
    }

    impl CellRenderer for FlakyRenderer {
        type Handle = DrawableId;

        fn create(
            &mut self,
            coord: CellCoord,
            appearance: &CellAppearance,
        ) -> Result<DrawableId, RenderError> {
            if coord == self.broken {
                return Err(RenderError::Failed { coord, reason: "widget refused".to_string() });
            }
            self.inner.create(coord, appearance)
        }

        fn update(&mut self, handle: DrawableId, appearance: &CellAppearance) -> Result<(), RenderError> {
            self.inner.update(handle, appearance)
        }

        fn remove(&mut self, handle: DrawableId) {
            self.inner.remove(handle);
        }
    }

    /// Loses the drawable for one cell the first time it is updated, the way
    /// a widget torn down behind the manager's back would.
    struct VanishingRenderer {
        inner: Scene,
        victim: CellCoord,
        victim_handle: Option<DrawableId>,
        vanished: bool,
    }

    impl VanishingRenderer {
        fn new(victim: CellCoord) -> Self {
            Self { inner: Scene::new(), victim, victim_handle: None, vanished: false }
        }
    }

    impl CellRenderer for VanishingRenderer {
        type Handle = DrawableId;

        fn create(
            &mut self,
            coord: CellCoord,
            appearance: &CellAppearance,
        ) -> Result<DrawableId, RenderError> {
            let handle = self.inner.create(coord, appearance)?;
            if coord == self.victim && !self.vanished {
                self.victim_handle = Some(handle);
            }
            Ok(handle)
        }

        fn update(&mut self, handle: DrawableId, appearance: &CellAppearance) -> Result<(), RenderError> {
            if self.victim_handle == Some(handle) {
                self.inner.remove(handle);
                self.victim_handle = None;
                self.vanished = true;
            }
            self.inner.update(handle, appearance)
        }

        fn remove(&mut self, handle: DrawableId) {
            self.inner.remove(handle);
        }
    }

    #[test]
    fn first_pass_materializes_the_covering_rectangle() {
        let mut manager = manager();
        let world = world();
        let bounds = GeoBounds::new(0.5, 0.5, 2.5, 3.5);
        let stats = manager.reconcile(&bounds, &world, &ctx(CellCoord::new(0, 0)));

        assert_eq!(stats.created, 12);
        assert_eq!(stats.updated, 0);
        let expected: HashSet<_> = CellRect { i_min: 0, i_max: 2, j_min: 0, j_max: 3 }.iter().collect();
        assert_eq!(materialized_set(&manager), expected);
        assert_eq!(manager.renderer().len(), 12);
    }

    #[test]
    fn panning_updates_overlap_and_culls_the_rest() {
        let mut manager = manager();
        let world = world();
        let context = ctx(CellCoord::new(0, 0));
        manager.reconcile(&GeoBounds::new(0.0, 0.0, 1.5, 1.5), &world, &context);
        let stats = manager.reconcile(&GeoBounds::new(1.0, 1.0, 2.5, 2.5), &world, &context);

        assert_eq!(stats.updated, 1, "only (1,1) overlaps both views");
        assert_eq!(stats.created, 3);
        assert_eq!(stats.culled, 3);
        let expected: HashSet<_> = CellRect { i_min: 1, i_max: 2, j_min: 1, j_max: 2 }.iter().collect();
        assert_eq!(materialized_set(&manager), expected);
        assert_eq!(manager.renderer().len(), 4);
        assert_eq!(manager.renderer().created_total(), 7);
    }

    #[test]
    fn existing_drawables_are_updated_not_recreated() {
        let mut manager = manager();
        let world = world();
        let context = ctx(CellCoord::new(0, 0));
        let bounds = GeoBounds::new(0.0, 0.0, 1.5, 1.5);
        manager.reconcile(&bounds, &world, &context);
        let stats = manager.reconcile(&bounds, &world, &context);

        assert_eq!((stats.created, stats.updated, stats.culled), (0, 4, 0));
        assert!(manager.renderer().iter().all(|drawable| drawable.revision == 1));
    }

    #[test]
    fn refresh_cell_reflects_mutations_in_place() {
        let mut manager = manager();
        let mut world = world();
        let context = ctx(CellCoord::new(0, 0));
        manager.reconcile(&GeoBounds::new(0.0, 0.0, 0.5, 0.5), &world, &context);

        world.set_cell_value(CellCoord::new(0, 0), Token::new(32));
        assert!(manager.refresh_cell(CellCoord::new(0, 0), &world, &context));
        assert!(!manager.refresh_cell(CellCoord::new(9, 9), &world, &context));

        let drawable = manager.renderer().iter().next().expect("one drawable");
        assert_eq!(drawable.appearance.value, Token::new(32));
        assert_eq!(drawable.revision, 1);
    }

    #[test]
    fn labels_only_appear_within_label_radius() {
        let mut world = world();
        let context = ctx(CellCoord::new(0, 0));
        world.set_cell_value(CellCoord::new(2, 0), Token::new(4));
        world.set_cell_value(CellCoord::new(3, 0), Token::new(4));
        world.set_cell_value(CellCoord::new(1, 1), None);

        let near = context.appearance(CellCoord::new(2, 0), &world);
        assert_eq!(near.label.as_ref().map(|label| label.text.as_str()), Some("4"));
        assert!(!near.in_range);
        assert_eq!(context.appearance(CellCoord::new(3, 0), &world).label, None);
        assert_eq!(context.appearance(CellCoord::new(1, 1), &world).label, None);
    }

    #[test]
    fn one_failing_cell_does_not_block_the_others() {
        let broken = CellCoord::new(0, 1);
        let mut manager =
            ViewportCellManager::new(FlakyRenderer { inner: Scene::new(), broken }, 100);
        let world = world();
        let stats =
            manager.reconcile(&GeoBounds::new(0.0, 0.0, 1.5, 1.5), &world, &ctx(CellCoord::new(0, 0)));

        assert_eq!(stats.failed, 1);
        assert_eq!(stats.created, 3);
        assert!(!manager.is_materialized(broken));
        assert_eq!(manager.materialized_count(), 3);
    }

    #[test]
    fn oversized_viewport_materializes_nothing() {
        let mut manager = ViewportCellManager::new(Scene::new(), 10);
        let world = world();
        let context = ctx(CellCoord::new(0, 0));
        manager.reconcile(&GeoBounds::new(0.0, 0.0, 1.5, 1.5), &world, &context);
        let stats = manager.reconcile(&GeoBounds::new(0.0, 0.0, 50.0, 50.0), &world, &context);

        assert!(stats.too_many_cells);
        assert_eq!(stats.culled, 4);
        assert_eq!(manager.materialized_count(), 0);
        assert!(manager.renderer().is_empty());
        assert_eq!(manager.visible_rect(), None);
    }

    #[test]
    fn refresh_all_restyles_after_player_moves() {
        let mut manager = manager();
        let world = world();
        manager.reconcile(&GeoBounds::new(0.0, 0.0, 3.5, 0.5), &world, &ctx(CellCoord::new(0, 0)));
        let refreshed = manager.refresh_all(&world, &ctx(CellCoord::new(3, 0)));

        assert_eq!(refreshed, 4);
        let in_range: HashSet<_> = manager
            .renderer()
            .iter()
            .filter(|drawable| drawable.appearance.in_range)
            .map(|drawable| drawable.coord)
            .collect();
        assert_eq!(in_range, HashSet::from([CellCoord::new(2, 0), CellCoord::new(3, 0)]));
    }

    #[test]
    fn vanished_drawable_is_recreated_by_the_next_pass() {
        let victim = CellCoord::new(1, 0);
        let mut manager = ViewportCellManager::new(VanishingRenderer::new(victim), 100);
        let world = world();
        let context = ctx(CellCoord::new(0, 0));
        let bounds = GeoBounds::new(0.0, 0.0, 1.5, 1.5);
        manager.reconcile(&bounds, &world, &context);
        let stats = manager.reconcile(&bounds, &world, &context);

        assert_eq!((stats.created, stats.updated, stats.failed), (1, 3, 0));
        assert!(manager.is_materialized(victim));
        assert_eq!(manager.renderer().inner.len(), 4);
    }

    #[test]
    fn refresh_forgets_a_vanished_drawable_until_the_next_pass() {
        let victim = CellCoord::new(0, 0);
        let mut manager = ViewportCellManager::new(VanishingRenderer::new(victim), 100);
        let world = world();
        let context = ctx(CellCoord::new(0, 0));
        let bounds = GeoBounds::new(0.0, 0.0, 1.5, 1.5);
        manager.reconcile(&bounds, &world, &context);

        assert!(manager.refresh_cell(victim, &world, &context));
        assert!(!manager.is_materialized(victim));
        assert_eq!(manager.refresh_all(&world, &context), 3);

        let stats = manager.reconcile(&bounds, &world, &context);
        assert_eq!((stats.created, stats.updated), (1, 3));
        assert_eq!(manager.materialized_count(), 4);
    }

    #[test]
    fn world_spanning_rectangle_trips_the_cap() {
        let mut manager = ViewportCellManager::new(Scene::new(), 40_000);
        let world = world();
        let context = ViewContext {
            lattice: Lattice::new(1e-9, LatLng::new(0.0, 0.0)),
            ..ctx(CellCoord::new(0, 0))
        };
        let world_bounds = GeoBounds::new(-90.0, -180.0, 90.0, 180.0);
        let stats = manager.reconcile(&world_bounds, &world, &context);

        assert!(stats.too_many_cells);
        assert_eq!(stats.created, 0);
        assert_eq!(manager.materialized_count(), 0);
    }
}
