//! Selection state for one modal session.
//!
//! `size_id` / `base_id` use `0` as the "none" sentinel until defaults are
//! applied. Every effective mutation bumps `revision`, which is how a held
//! price snapshot is recognised as stale.

use dc_api_types::CalculateRequest;
use std::collections::{BTreeMap, BTreeSet};

/// Options currently rendered for a size or base group, in display order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OptionGroup {
    pub options: Vec<u32>,
    pub active: Option<u32>,
}

impl OptionGroup {
    pub fn new(options: Vec<u32>, active: Option<u32>) -> Self {
        Self { options, active }
    }

    fn first(&self) -> Option<u32> {
        self.options.first().copied()
    }
}

/// Which groups had no active choice and received their first option.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AppliedDefaults {
    pub size: Option<u32>,
    pub base: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    product_id: Option<u32>,
    size_id: u32,
    base_id: u32,
    addon_ids: BTreeSet<u32>,
    revision: u64,
}

impl Selection {
    pub fn product_id(&self) -> Option<u32> {
        self.product_id
    }

    pub fn size_id(&self) -> u32 {
        self.size_id
    }

    pub fn base_id(&self) -> u32 {
        self.base_id
    }

    pub fn addon_ids(&self) -> &BTreeSet<u32> {
        &self.addon_ids
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Start configuring `id`. Add-ons are cleared; `0` leaves the product unset.
    pub fn select_product(&mut self, id: u32) {
        self.product_id = (id != 0).then_some(id);
        self.addon_ids.clear();
        self.bump();
    }

    pub fn set_size(&mut self, id: u32) {
        self.size_id = id;
        self.bump();
    }

    pub fn set_base(&mut self, id: u32) {
        self.base_id = id;
        self.bump();
    }

    /// Flip membership of `id` and return whether it is now selected.
    ///
    /// `0` is ignored and returns `None`; callers must not reschedule pricing.
    pub fn toggle_addon(&mut self, id: u32) -> Option<bool> {
        if id == 0 {
            return None;
        }
        let selected = if self.addon_ids.remove(&id) {
            false
        } else {
            self.addon_ids.insert(id);
            true
        };
        self.bump();
        Some(selected)
    }

    /// Fill unset size/base from the rendered groups.
    ///
    /// An already active UI choice is adopted as-is; a group with no active
    /// choice gets its first option, which is reported back so the view can
    /// mark it.
    pub fn apply_defaults_if_unset(
        &mut self,
        sizes: &OptionGroup,
        bases: &OptionGroup,
    ) -> AppliedDefaults {
        let mut applied = AppliedDefaults::default();

        if self.size_id == 0 {
            match sizes.active {
                Some(id) => self.size_id = id,
                None => {
                    if let Some(first) = sizes.first() {
                        self.size_id = first;
                        applied.size = Some(first);
                    }
                }
            }
        }

        if self.base_id == 0 {
            match bases.active {
                Some(id) => self.base_id = id,
                None => {
                    if let Some(first) = bases.first() {
                        self.base_id = first;
                        applied.base = Some(first);
                    }
                }
            }
        }

        self.bump();
        applied
    }

    /// Add-on ids as sent to the pricing endpoint.
    pub fn ingredient_ids(&self) -> Vec<u32> {
        self.addon_ids.iter().copied().collect()
    }

    /// Calculation request for the current state, or `None` without a product.
    ///
    /// Add-ons are binary in this UI, so `quantities` is always empty.
    pub fn calculate_request(&self) -> Option<CalculateRequest> {
        let product_id = self.product_id?;
        Some(CalculateRequest {
            product_id,
            size_id: self.size_id,
            base_id: self.base_id,
            ingredient_ids: self.ingredient_ids(),
            quantities: BTreeMap::new(),
        })
    }

    fn bump(&mut self) {
        self.revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_keeps_ids_flipped_an_odd_number_of_times() {
        let mut sel = Selection::default();
        let toggles = [5, 42, 5, 7, 42, 42, 9, 7, 5];
        for id in toggles {
            sel.toggle_addon(id);
        }

        let mut expected = BTreeSet::new();
        for id in toggles {
            let count = toggles.iter().filter(|&&t| t == id).count();
            if count % 2 == 1 {
                expected.insert(id);
            }
        }
        assert_eq!(sel.addon_ids(), &expected);
        assert_eq!(sel.ingredient_ids(), vec![5, 9, 42]);
    }

    #[test]
    fn zero_addon_is_a_noop() {
        let mut sel = Selection::default();
        let before = sel.revision();
        assert_eq!(sel.toggle_addon(0), None);
        assert!(sel.addon_ids().is_empty());
        assert_eq!(sel.revision(), before);
    }

    #[test]
    fn select_product_clears_addons() {
        let mut sel = Selection::default();
        sel.select_product(3);
        sel.toggle_addon(11);
        sel.select_product(7);
        assert_eq!(sel.product_id(), Some(7));
        assert!(sel.addon_ids().is_empty());

        sel.select_product(0);
        assert_eq!(sel.product_id(), None);
    }

    #[test]
    fn defaults_pick_first_option_per_unset_group() {
        let mut sel = Selection::default();
        let sizes = OptionGroup::new(vec![1, 2, 3], None);
        let bases = OptionGroup::new(vec![4, 5], Some(5));

        let applied = sel.apply_defaults_if_unset(&sizes, &bases);

        assert_eq!(applied, AppliedDefaults { size: Some(1), base: None });
        assert_eq!(sel.size_id(), 1);
        assert_eq!(sel.base_id(), 5);
    }

    #[test]
    fn defaults_do_not_override_explicit_choice() {
        let mut sel = Selection::default();
        sel.set_size(3);
        let applied = sel.apply_defaults_if_unset(
            &OptionGroup::new(vec![1, 2, 3], None),
            &OptionGroup::new(vec![], None),
        );
        assert_eq!(applied, AppliedDefaults::default());
        assert_eq!(sel.size_id(), 3);
        assert_eq!(sel.base_id(), 0);
    }

    #[test]
    fn request_requires_product() {
        let mut sel = Selection::default();
        assert!(sel.calculate_request().is_none());

        sel.select_product(7);
        sel.set_size(1);
        sel.set_base(2);
        sel.toggle_addon(42);
        let req = sel.calculate_request().unwrap();
        assert_eq!(req.product_id, 7);
        assert_eq!(req.size_id, 1);
        assert_eq!(req.base_id, 2);
        assert_eq!(req.ingredient_ids, vec![42]);
        assert!(req.quantities.is_empty());
    }
}
