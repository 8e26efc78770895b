//! Per-layer hitbox registry and collision queries
//!
//! The world owns every hitbox and a fixed number of layer buckets holding
//! their ids in insertion order. Queries borrow the world immutably, so a
//! bucket can never change while it is being scanned, and both sides of
//! every comparison are resolved from the current `SpaceStore`.

use slotmap::SlotMap;

use super::hitbox::{Collision, Geometry, Hitbox, HitboxId, Side};
use super::rect::CornerMask;
use crate::consts::LAYER_COUNT;
use crate::error::HitboxError;
use crate::settings::{CollisionSettings, OverlapRule};
use crate::space::{SpaceStore, Viewport};

/// Registry of live hitboxes
#[derive(Debug, Clone)]
pub struct CollisionWorld {
    hitboxes: SlotMap<HitboxId, Hitbox>,
    layers: [Vec<HitboxId>; LAYER_COUNT],
    /// Projection used to resolve hitbox geometry
    pub viewport: Viewport,
    /// Rectangle overlap test
    pub overlap_rule: OverlapRule,
}

impl Default for CollisionWorld {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

impl CollisionWorld {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            hitboxes: SlotMap::with_key(),
            layers: Default::default(),
            viewport,
            overlap_rule: OverlapRule::default(),
        }
    }

    pub fn from_settings(settings: &CollisionSettings) -> Self {
        let mut world = Self::new(settings.viewport.clone());
        world.overlap_rule = settings.overlap_rule;
        world
    }

    fn check_layer(layer: u8) -> Result<usize, HitboxError> {
        let index = layer as usize;
        if index < LAYER_COUNT {
            Ok(index)
        } else {
            Err(HitboxError::InvalidLayer {
                layer,
                max: LAYER_COUNT - 1,
            })
        }
    }

    // === Registry ===

    /// Register a hitbox on its layer
    pub fn spawn(&mut self, spaces: &SpaceStore, hitbox: Hitbox) -> Result<HitboxId, HitboxError> {
        let layer = Self::check_layer(hitbox.layer())?;
        if !spaces.contains_key(hitbox.space()) {
            return Err(HitboxError::UnknownSpace(hitbox.space()));
        }
        let shape = hitbox.shape.name();
        let id = self.hitboxes.insert(hitbox);
        self.layers[layer].push(id);
        log::debug!("Spawned {} hitbox {:?} on layer {}", shape, id, layer);
        Ok(id)
    }

    /// Register a copy of an existing hitbox (same space, tag, layer and locks)
    pub fn duplicate(&mut self, spaces: &SpaceStore, id: HitboxId) -> Result<HitboxId, HitboxError> {
        let copy = self.get(id)?.clone();
        self.spawn(spaces, copy)
    }

    /// Move a hitbox to another layer (removed from the old bucket, appended to the new one).
    /// Its current layer is a no-op.
    pub fn set_layer(&mut self, id: HitboxId, layer: u8) -> Result<(), HitboxError> {
        let new_layer = Self::check_layer(layer)?;
        let hitbox = self
            .hitboxes
            .get_mut(id)
            .ok_or(HitboxError::UnknownHitbox(id))?;
        let old_layer = hitbox.layer() as usize;
        if old_layer == new_layer {
            return Ok(());
        }
        hitbox.set_layer_unchecked(layer);

        self.layers[old_layer].retain(|&other| other != id);
        self.layers[new_layer].push(id);
        log::debug!("Hitbox {:?} moved from layer {} to {}", id, old_layer, new_layer);
        Ok(())
    }

    /// Remove a hitbox from its bucket and the world
    pub fn destroy(&mut self, id: HitboxId) -> Option<Hitbox> {
        let hitbox = self.hitboxes.remove(id)?;
        self.layers[hitbox.layer() as usize].retain(|&other| other != id);
        log::debug!("Destroyed hitbox {:?}", id);
        Some(hitbox)
    }

    /// Drop every hitbox. Call on scene transitions.
    pub fn clear_all(&mut self) {
        let count = self.hitboxes.len();
        self.hitboxes.clear();
        for bucket in &mut self.layers {
            bucket.clear();
        }
        log::info!("Cleared {} hitboxes", count);
    }

    pub fn get(&self, id: HitboxId) -> Result<&Hitbox, HitboxError> {
        self.hitboxes.get(id).ok_or(HitboxError::UnknownHitbox(id))
    }

    /// Mutable access for `active`, `tag`, offsets and locks.
    /// Layer changes go through `set_layer`.
    pub fn get_mut(&mut self, id: HitboxId) -> Result<&mut Hitbox, HitboxError> {
        self.hitboxes
            .get_mut(id)
            .ok_or(HitboxError::UnknownHitbox(id))
    }

    pub fn contains(&self, id: HitboxId) -> bool {
        self.hitboxes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.hitboxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hitboxes.is_empty()
    }

    /// Bucket contents in insertion order
    pub fn layer(&self, layer: u8) -> Result<&[HitboxId], HitboxError> {
        Ok(&self.layers[Self::check_layer(layer)?])
    }

    /// Every hitbox, layer by layer, in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (HitboxId, &Hitbox)> {
        self.layers
            .iter()
            .flatten()
            .filter_map(|&id| self.hitboxes.get(id).map(|h| (id, h)))
    }

    /// Resolved geometry of every active hitbox, for debug drawing
    pub fn debug_shapes(&self, spaces: &SpaceStore) -> Vec<(u8, Geometry)> {
        self.iter()
            .filter(|(_, h)| h.active)
            .filter_map(|(_, h)| h.resolve(spaces, &self.viewport).map(|g| (h.layer(), g)))
            .collect()
    }

    // === Queries ===

    /// The querying hitbox and its geometry
    fn subject(&self, spaces: &SpaceStore, id: HitboxId) -> Result<(&Hitbox, Geometry), HitboxError> {
        let hitbox = self.get(id)?;
        let geometry = hitbox
            .resolve(spaces, &self.viewport)
            .ok_or(HitboxError::UnknownSpace(hitbox.space()))?;
        Ok((hitbox, geometry))
    }

    /// Active, tag-matching hitboxes sharing `me`'s layer, excluding `me`
    fn partners<'a>(
        &'a self,
        spaces: &'a SpaceStore,
        me: HitboxId,
        layer: u8,
        tag: Option<&'a str>,
    ) -> impl Iterator<Item = (HitboxId, Geometry)> + 'a {
        self.layers[layer as usize]
            .iter()
            .copied()
            .filter(move |&other| other != me)
            .filter_map(move |other| {
                let hitbox = self.hitboxes.get(other)?;
                if !hitbox.active || !hitbox.matches_tag(tag) {
                    return None;
                }
                let geometry = hitbox.resolve(spaces, &self.viewport);
                if geometry.is_none() {
                    log::warn!("Skipping hitbox {:?}: its space no longer exists", other);
                }
                geometry.map(|g| (other, g))
            })
    }

    /// Whether `id` overlaps any hitbox on its layer (optionally with `tag`)
    pub fn check(&self, spaces: &SpaceStore, id: HitboxId, tag: Option<&str>) -> Result<bool, HitboxError> {
        let (me, geometry) = self.subject(spaces, id)?;
        if !me.active {
            return Ok(false);
        }
        let rule = self.overlap_rule;
        Ok(self
            .partners(spaces, id, me.layer(), tag)
            .any(|(_, other)| geometry.overlaps(&other, rule)))
    }

    /// Every collision of `id` on its layer, plus the overall side.
    ///
    /// The overall side comes from the union of all rectangle corner masks
    /// when that union names exactly one edge; otherwise it is the side of
    /// the last rectangle contact, or `Side::None` without any.
    pub fn advanced_check(
        &self,
        spaces: &SpaceStore,
        id: HitboxId,
        tag: Option<&str>,
    ) -> Result<(Vec<Collision>, Side), HitboxError> {
        let (me, geometry) = self.subject(spaces, id)?;
        if !me.active {
            return Ok((Vec::new(), Side::None));
        }

        let rule = self.overlap_rule;
        let mut collisions = Vec::new();
        let mut global = CornerMask::EMPTY;
        let mut last_side = Side::None;

        for (other, other_geometry) in self.partners(spaces, id, me.layer(), tag) {
            if let Some(contact) = geometry.contact(&other_geometry, rule) {
                global = global.union(contact.mask);
                if contact.side != Side::None {
                    last_side = contact.side;
                }
                collisions.push(Collision {
                    collider: other,
                    side: contact.side,
                });
            }
        }

        let side = global.edge_side().unwrap_or(last_side);
        Ok((collisions, side))
    }

    /// Both hitboxes active, distinct, on the same layer; geometry of both
    fn pair(
        &self,
        spaces: &SpaceStore,
        id: HitboxId,
        other: HitboxId,
    ) -> Result<Option<(Geometry, Geometry)>, HitboxError> {
        let (me, a) = self.subject(spaces, id)?;
        let (them, b) = self.subject(spaces, other)?;
        if id == other || !me.active || !them.active || me.layer() != them.layer() {
            return Ok(None);
        }
        Ok(Some((a, b)))
    }

    /// Whether `id` overlaps `other`
    pub fn check_with(&self, spaces: &SpaceStore, id: HitboxId, other: HitboxId) -> Result<bool, HitboxError> {
        Ok(self
            .pair(spaces, id, other)?
            .is_some_and(|(a, b)| a.overlaps(&b, self.overlap_rule)))
    }

    /// Side of `id` touching `other`, `Side::None` without contact
    pub fn advanced_check_with(
        &self,
        spaces: &SpaceStore,
        id: HitboxId,
        other: HitboxId,
    ) -> Result<Side, HitboxError> {
        Ok(self
            .pair(spaces, id, other)?
            .and_then(|(a, b)| a.contact(&b, self.overlap_rule))
            .map_or(Side::None, |c| c.side))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{Bounds, Vector};
    use crate::space::{Space, SpaceId};
    use proptest::prelude::*;

    /// Screen-aligned world: top-left anchors, game Y = -screen Y
    fn setup() -> (CollisionWorld, SpaceStore) {
        (CollisionWorld::new(Viewport::new(200.0, 200.0)), SpaceStore::with_key())
    }

    /// Space whose top-left corner sits at screen (x, y)
    fn screen_box(spaces: &mut SpaceStore, x: f32, y: f32, w: f32, h: f32) -> SpaceId {
        spaces.insert(Space::new(Vector::new(x, -y), Vector::new(w, h)).anchored(Bounds::TopLeft))
    }

    fn rect(world: &mut CollisionWorld, spaces: &mut SpaceStore, x: f32, y: f32, w: f32, h: f32) -> HitboxId {
        let space = screen_box(spaces, x, y, w, h);
        world.spawn(spaces, Hitbox::rectangle(space)).unwrap()
    }

    #[test]
    fn test_overlapping_squares_resolve_down() {
        let (mut world, mut spaces) = setup();
        let a = rect(&mut world, &mut spaces, 0.0, 0.0, 10.0, 10.0);
        let b = rect(&mut world, &mut spaces, 5.0, 5.0, 10.0, 10.0);

        assert!(world.check_with(&spaces, a, b).unwrap());
        assert!(world.check_with(&spaces, b, a).unwrap());
        assert_eq!(world.advanced_check_with(&spaces, a, b).unwrap(), Side::Down);
        assert_eq!(world.advanced_check_with(&spaces, b, a).unwrap(), Side::Up);
    }

    #[test]
    fn test_standing_on_floor() {
        let (mut world, mut spaces) = setup();
        let player = rect(&mut world, &mut spaces, 10.0, 0.0, 10.0, 10.0);
        let floor = rect(&mut world, &mut spaces, 0.0, 8.0, 40.0, 10.0);
        assert_eq!(world.advanced_check_with(&spaces, player, floor).unwrap(), Side::Down);
        assert_eq!(world.advanced_check_with(&spaces, floor, player).unwrap(), Side::Up);
    }

    #[test]
    fn test_check_excludes_self() {
        let (mut world, mut spaces) = setup();
        let a = rect(&mut world, &mut spaces, 0.0, 0.0, 10.0, 10.0);
        assert!(!world.check(&spaces, a, None).unwrap());
        assert!(!world.check_with(&spaces, a, a).unwrap());
        let (cols, side) = world.advanced_check(&spaces, a, None).unwrap();
        assert!(cols.is_empty());
        assert_eq!(side, Side::None);

        let b = rect(&mut world, &mut spaces, 2.0, 2.0, 4.0, 4.0);
        let (cols, _) = world.advanced_check(&spaces, a, None).unwrap();
        assert_eq!(cols.len(), 1);
        assert_eq!(cols[0].collider, b);
    }

    #[test]
    fn test_layers_are_isolated() {
        let (mut world, mut spaces) = setup();
        let a = rect(&mut world, &mut spaces, 0.0, 0.0, 10.0, 10.0);
        let b = rect(&mut world, &mut spaces, 0.0, 0.0, 10.0, 10.0);
        world.set_layer(b, 1).unwrap();

        assert!(!world.check(&spaces, a, None).unwrap());
        assert!(!world.check_with(&spaces, a, b).unwrap());
        assert_eq!(world.advanced_check_with(&spaces, a, b).unwrap(), Side::None);
        assert_eq!(world.layer(0).unwrap(), &[a]);
        assert_eq!(world.layer(1).unwrap(), &[b]);

        world.set_layer(b, 0).unwrap();
        assert!(world.check(&spaces, a, None).unwrap());
        assert_eq!(world.layer(0).unwrap(), &[a, b]);
        assert!(world.layer(1).unwrap().is_empty());
    }

    #[test]
    fn test_set_same_layer_keeps_order() {
        let (mut world, mut spaces) = setup();
        let a = rect(&mut world, &mut spaces, 0.0, 0.0, 10.0, 10.0);
        let b = rect(&mut world, &mut spaces, 0.0, 0.0, 10.0, 10.0);
        world.set_layer(a, 0).unwrap();
        assert_eq!(world.layer(0).unwrap(), &[a, b]);
    }

    #[test]
    fn test_tag_filter() {
        let (mut world, mut spaces) = setup();
        let me = rect(&mut world, &mut spaces, 0.0, 0.0, 20.0, 20.0);
        let s1 = screen_box(&mut spaces, 5.0, 5.0, 5.0, 5.0);
        let s2 = screen_box(&mut spaces, 10.0, 10.0, 5.0, 5.0);
        let coin = world.spawn(&spaces, Hitbox::rectangle(s1).with_tag("coin")).unwrap();
        let spike = world.spawn(&spaces, Hitbox::rectangle(s2).with_tag("spike")).unwrap();

        let (cols, _) = world.advanced_check(&spaces, me, Some("coin")).unwrap();
        assert_eq!(cols.iter().map(|c| c.collider).collect::<Vec<_>>(), vec![coin]);

        let (cols, _) = world.advanced_check(&spaces, me, None).unwrap();
        assert_eq!(cols.iter().map(|c| c.collider).collect::<Vec<_>>(), vec![coin, spike]);

        assert!(!world.check(&spaces, me, Some("door")).unwrap());
        assert!(!world.check(&spaces, me, Some("")).unwrap());
    }

    #[test]
    fn test_inactive_hitboxes_are_ignored() {
        let (mut world, mut spaces) = setup();
        let a = rect(&mut world, &mut spaces, 0.0, 0.0, 10.0, 10.0);
        let b = rect(&mut world, &mut spaces, 5.0, 0.0, 10.0, 10.0);
        world.get_mut(b).unwrap().active = false;
        assert!(!world.check(&spaces, a, None).unwrap());
        assert!(!world.check_with(&spaces, a, b).unwrap());
        assert!(!world.check_with(&spaces, b, a).unwrap());
        assert_eq!(world.debug_shapes(&spaces).len(), 1);
    }

    #[test]
    fn test_majority_side_over_many_tiles() {
        let (mut world, mut spaces) = setup();
        let player = rect(&mut world, &mut spaces, 12.0, 0.0, 10.0, 10.0);
        // Ground made of 16 px tiles; the player straddles two of them
        for i in 0..4 {
            rect(&mut world, &mut spaces, i as f32 * 16.0, 8.0, 16.0, 16.0);
        }
        let (cols, side) = world.advanced_check(&spaces, player, None).unwrap();
        assert_eq!(cols.len(), 2);
        assert_eq!(side, Side::Down);
    }

    #[test]
    fn test_majority_falls_back_to_last_contact() {
        let (mut world, mut spaces) = setup();
        let player = rect(&mut world, &mut spaces, 10.0, 10.0, 10.0, 10.0);
        // Floor under the player and a wall on its right
        let _floor = rect(&mut world, &mut spaces, 0.0, 18.0, 40.0, 10.0);
        let wall = rect(&mut world, &mut spaces, 18.0, -10.0, 10.0, 25.0);
        let (cols, side) = world.advanced_check(&spaces, player, None).unwrap();
        assert_eq!(cols.len(), 2);
        assert_eq!(cols[1].collider, wall);
        assert_eq!(cols[1].side, Side::Right);
        assert_eq!(side, Side::Right);
    }

    #[test]
    fn test_mixed_shapes() {
        let (mut world, mut spaces) = setup();
        let a = rect(&mut world, &mut spaces, 0.0, 0.0, 10.0, 10.0);
        let ball_space = spaces.insert(Space::new(Vector::new(100.0, 0.0), Vector::splat(10.0)));
        let ball = world.spawn(&spaces, Hitbox::circle(ball_space)).unwrap();
        // Ball center sits at screen (200, 100), far from the rectangle
        assert!(!world.check_with(&spaces, a, ball).unwrap());

        spaces[ball_space].position = Vector::new(-88.0, 95.0);
        // Center now at (12, 5), radius 5: overlaps the rectangle's right edge
        assert!(world.check_with(&spaces, a, ball).unwrap());
        assert!(world.check_with(&spaces, ball, a).unwrap());
        assert_eq!(world.advanced_check_with(&spaces, a, ball).unwrap(), Side::None);
        let (cols, _) = world.advanced_check(&spaces, ball, None).unwrap();
        assert_eq!(cols, vec![Collision { collider: a, side: Side::None }]);
    }

    #[test]
    fn test_circles_from_spaces() {
        let (mut world, mut spaces) = setup();
        let s1 = spaces.insert(Space::new(Vector::ZERO, Vector::splat(10.0)));
        let s2 = spaces.insert(Space::new(Vector::new(9.0, 0.0), Vector::splat(10.0)));
        let c1 = world.spawn(&spaces, Hitbox::circle(s1)).unwrap();
        let c2 = world.spawn(&spaces, Hitbox::circle(s2)).unwrap();
        assert!(world.check_with(&spaces, c1, c2).unwrap());

        spaces[s2].position.x = 10.0;
        assert!(!world.check_with(&spaces, c1, c2).unwrap());
    }

    #[test]
    fn test_registry_errors() {
        let (mut world, mut spaces) = setup();
        let space = screen_box(&mut spaces, 0.0, 0.0, 1.0, 1.0);
        let err = world
            .spawn(&spaces, Hitbox::rectangle(space).with_layer(LAYER_COUNT as u8))
            .unwrap_err();
        assert_eq!(
            err,
            HitboxError::InvalidLayer {
                layer: LAYER_COUNT as u8,
                max: LAYER_COUNT - 1
            }
        );

        let gone = spaces.insert(Space::default());
        spaces.remove(gone);
        assert_eq!(
            world.spawn(&spaces, Hitbox::rectangle(gone)).unwrap_err(),
            HitboxError::UnknownSpace(gone)
        );

        let id = world.spawn(&spaces, Hitbox::rectangle(space)).unwrap();
        assert!(world.set_layer(id, 200).is_err());
        assert_eq!(world.get(id).unwrap().layer(), 0);

        world.destroy(id);
        assert_eq!(world.check(&spaces, id, None).unwrap_err(), HitboxError::UnknownHitbox(id));
        assert!(world.destroy(id).is_none());
    }

    #[test]
    fn test_dangling_partner_is_skipped() {
        let (mut world, mut spaces) = setup();
        let a = rect(&mut world, &mut spaces, 0.0, 0.0, 10.0, 10.0);
        let b = rect(&mut world, &mut spaces, 0.0, 0.0, 10.0, 10.0);
        let b_space = world.get(b).unwrap().space();
        spaces.remove(b_space);
        assert!(!world.check(&spaces, a, None).unwrap());
        assert!(world.check_with(&spaces, a, b).is_err());
    }

    #[test]
    fn test_destroy_and_clear() {
        let (mut world, mut spaces) = setup();
        let a = rect(&mut world, &mut spaces, 0.0, 0.0, 10.0, 10.0);
        let b = rect(&mut world, &mut spaces, 0.0, 0.0, 10.0, 10.0);
        let c = rect(&mut world, &mut spaces, 0.0, 0.0, 10.0, 10.0);
        world.set_layer(c, 2).unwrap();

        world.destroy(a);
        assert_eq!(world.layer(0).unwrap(), &[b]);
        assert_eq!(world.iter().map(|(id, _)| id).collect::<Vec<_>>(), vec![b, c]);

        let d = world.duplicate(&spaces, c).unwrap();
        assert_eq!(world.layer(2).unwrap(), &[c, d]);

        world.clear_all();
        assert!(world.is_empty());
        for layer in 0..LAYER_COUNT as u8 {
            assert!(world.layer(layer).unwrap().is_empty());
        }
        assert!(!world.contains(b));
    }

    #[test]
    fn test_corner_rule_from_settings() {
        let settings = CollisionSettings {
            overlap_rule: OverlapRule::CornerContainment,
            viewport: Viewport::new(200.0, 200.0),
            ..Default::default()
        };
        let mut world = CollisionWorld::from_settings(&settings);
        let mut spaces = SpaceStore::with_key();
        let outer = rect(&mut world, &mut spaces, 0.0, 0.0, 100.0, 100.0);
        let inner = rect(&mut world, &mut spaces, 40.0, 40.0, 10.0, 10.0);
        assert!(world.check_with(&spaces, inner, outer).unwrap());
        assert!(!world.check_with(&spaces, outer, inner).unwrap());
    }

    proptest! {
        #[test]
        fn prop_check_with_is_symmetric(
            a in (0i32..50, 0i32..50, 1i32..30, 1i32..30),
            b in (0i32..50, 0i32..50, 1i32..30, 1i32..30),
        ) {
            let (mut world, mut spaces) = setup();
            let ha = rect(&mut world, &mut spaces, a.0 as f32, a.1 as f32, a.2 as f32, a.3 as f32);
            let hb = rect(&mut world, &mut spaces, b.0 as f32, b.1 as f32, b.2 as f32, b.3 as f32);
            prop_assert_eq!(
                world.check_with(&spaces, ha, hb).unwrap(),
                world.check_with(&spaces, hb, ha).unwrap()
            );
            prop_assert_eq!(
                world.check(&spaces, ha, None).unwrap(),
                world.check_with(&spaces, ha, hb).unwrap()
            );
        }
    }
}
