//! Completeness predicates guarding forward navigation

use serde::Serialize;

use crate::core::detail::ArtworkView;
use crate::core::order::Order;
use crate::workflow::steps::WizardStep;

/// Whether `order` satisfies the entry predicate of `next`.
///
/// Each predicate looks only at what the step before it produces. Step 1 is
/// always open.
pub fn can_proceed(order: &Order, next: WizardStep) -> bool {
    match next {
        WizardStep::Product => true,
        WizardStep::Artwork => match order.product_type {
            Some(product_type) => {
                order.category.is_some()
                    && (!product_type.requires_model() || order.model.is_some())
            }
            None => false,
        },
        WizardStep::Details => {
            order.has_image(ArtworkView::Front) && order.has_image(ArtworkView::Back)
        }
        WizardStep::Sizes => !order.details.is_empty(),
        WizardStep::Pdf => !order.size_groups.is_empty(),
    }
}

/// Whether the wizard may move from the order's step to `target`.
///
/// Visited steps stay reachable even when later edits broke their predicate.
/// Jumping ahead requires every step on the way to pass.
pub fn can_navigate(order: &Order, target: WizardStep) -> bool {
    target <= order.step
        || order
            .step
            .steps_until(target)
            .all(|step| can_proceed(order, step))
}

/// One entry of a step bar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepState {
    pub step: WizardStep,
    pub route: &'static str,
    pub label: &'static str,
    pub active: bool,
    pub visited: bool,
    pub reachable: bool,
}

/// Everything a step bar needs to render
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationState {
    pub current: WizardStep,
    pub can_go_back: bool,
    pub can_go_forward: bool,
    pub steps: Vec<StepState>,
}

impl NavigationState {
    pub fn for_order(order: &Order) -> Self {
        let current = order.step;
        let steps = WizardStep::ALL
            .into_iter()
            .map(|step| StepState {
                step,
                route: step.route(),
                label: step.label(),
                active: step == current,
                visited: step <= current,
                reachable: can_navigate(order, step),
            })
            .collect();

        Self {
            current,
            can_go_back: current.previous().is_some(),
            can_go_forward: current
                .next()
                .is_some_and(|next| can_proceed(order, next)),
            steps,
        }
    }
}
