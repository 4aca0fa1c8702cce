//! Wizard navigation on the current order

use crate::core::error::{OrderError, WizardError};
use crate::core::events::OrderChange;
use crate::store::OrderStore;
use crate::workflow::{NavigationState, WizardStep, can_navigate};

impl OrderStore {
    pub fn get_step(&self) -> Option<WizardStep> {
        self.current_order().map(|order| order.step)
    }

    /// Record the step without consulting the gate (route sync)
    pub fn set_step(&mut self, step: WizardStep) -> Result<bool, WizardError> {
        self.mutate_current(OrderChange::Step, |order| {
            if order.step == step {
                return false;
            }
            order.step = step;
            true
        })
    }

    /// Move to `target` if the gate allows it.
    ///
    /// Going back is always allowed. A refused move leaves the order as it was.
    pub fn navigate_to(&mut self, target: WizardStep) -> Result<WizardStep, WizardError> {
        let order = self.require_current()?;
        if !can_navigate(order, target) {
            tracing::debug!(order_id = %order.id, step = target.number(), "navigation blocked");
            return Err(OrderError::StepBlocked { step: target }.into());
        }
        self.set_step(target)?;
        Ok(target)
    }

    /// Advance one step; stays put on the last step
    pub fn next_step(&mut self) -> Result<WizardStep, WizardError> {
        let current = self.require_current()?.step;
        match current.next() {
            Some(next) => self.navigate_to(next),
            None => Ok(current),
        }
    }

    /// Go back one step; stays put on the first step
    pub fn previous_step(&mut self) -> Result<WizardStep, WizardError> {
        let current = self.require_current()?.step;
        match current.previous() {
            Some(previous) => self.navigate_to(previous),
            None => Ok(current),
        }
    }

    pub fn navigation_state(&self) -> Option<NavigationState> {
        self.current_order().map(NavigationState::for_order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::{ProductCategory, ProductType};

    #[test]
    fn test_blocked_navigation_keeps_step() {
        let mut store = OrderStore::in_memory();
        store.create_order("Team A").unwrap();

        let err = store.next_step().unwrap_err();
        assert!(matches!(
            err,
            WizardError::Order(OrderError::StepBlocked {
                step: WizardStep::Artwork
            })
        ));
        assert_eq!(store.get_step(), Some(WizardStep::Product));
    }

    #[test]
    fn test_next_then_back() {
        let mut store = OrderStore::in_memory();
        store.create_order("Team A").unwrap();
        store.set_category(Some(ProductCategory::Football)).unwrap();
        store
            .set_product_type(Some(ProductType::JerseyAndPants))
            .unwrap();

        assert_eq!(store.next_step().unwrap(), WizardStep::Artwork);
        assert_eq!(store.previous_step().unwrap(), WizardStep::Product);
        assert_eq!(store.previous_step().unwrap(), WizardStep::Product);
    }

    #[test]
    fn test_set_step_skips_gate() {
        let mut store = OrderStore::in_memory();
        store.create_order("Team A").unwrap();
        assert!(store.set_step(WizardStep::Sizes).unwrap());
        assert!(!store.set_step(WizardStep::Sizes).unwrap());

        // visited steps stay reachable
        assert_eq!(
            store.navigate_to(WizardStep::Artwork).unwrap(),
            WizardStep::Artwork
        );
        let state = store.navigation_state().unwrap();
        assert_eq!(state.current, WizardStep::Artwork);
    }

    #[test]
    fn test_navigation_without_order() {
        let mut store = OrderStore::in_memory();
        assert!(store.get_step().is_none());
        assert!(store.navigation_state().is_none());
        assert!(matches!(
            store.navigate_to(WizardStep::Product),
            Err(WizardError::Order(OrderError::NoCurrentOrder))
        ));
    }
}
