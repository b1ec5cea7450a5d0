//! Mind-ops projects: one-off purchases paid from the operations counter.

use crate::error::PurchaseError;

use super::phrases::phrase_with;
use super::schedule;
use super::state::{Currency, GameState, LogCategory, ProjectId, RecurringAction};

pub struct ProjectDef {
    pub id: ProjectId,
    pub title: &'static str,
    pub description: &'static str,
    pub cost: f64,
}

pub const PROJECTS: [ProjectDef; 2] = [
    ProjectDef {
        id: ProjectId::Efficiency,
        title: "Neural Efficiency",
        description: "Increase passive neuron generation by 10%.",
        cost: 100.0,
    },
    ProjectDef {
        id: ProjectId::Automation,
        title: "Autonomy",
        description: "Automatically generate neurons each second.",
        cost: 250.0,
    },
];

pub fn def(id: ProjectId) -> &'static ProjectDef {
    match id {
        ProjectId::Efficiency => &PROJECTS[0],
        ProjectId::Automation => &PROJECTS[1],
    }
}

pub fn is_completed(state: &GameState, id: ProjectId) -> bool {
    state.purchased_projects.contains(&id)
}

/// Trigger condition for a project to be offered.
pub fn is_available(state: &GameState, id: ProjectId) -> bool {
    match id {
        ProjectId::Efficiency => state.factory_count >= 1,
        ProjectId::Automation => state.progression.current_tier >= 1,
    }
}

/// Projects currently offered to the player.
pub fn offered(state: &GameState) -> Vec<&'static ProjectDef> {
    PROJECTS
        .iter()
        .filter(|p| !is_completed(state, p.id) && is_available(state, p.id))
        .collect()
}

pub fn purchase_project(state: &mut GameState, id: ProjectId) -> Result<(), PurchaseError> {
    let project = def(id);
    if is_completed(state, id) {
        return Err(PurchaseError::ProjectAlreadyCompleted(id));
    }
    if !is_available(state, id) {
        return Err(PurchaseError::ProjectUnavailable(id));
    }
    if let Err(e) = state.ledger.spend(Currency::MindOps, project.cost) {
        state.log_message(
            &format!("Not enough Mind Ops for {}.", project.title),
            LogCategory::Warning,
        );
        return Err(e.into());
    }
    apply(state, id);
    state.purchased_projects.push(id);
    let text = phrase_with(
        "projectCompleted",
        state.progression.current_tier,
        &[("title", project.title)],
    );
    state.log_message(&text, LogCategory::Upgrade);
    Ok(())
}

/// Buy by string id.
pub fn purchase_project_by_key(state: &mut GameState, key: &str) -> Result<(), PurchaseError> {
    let id = PROJECTS
        .iter()
        .map(|p| p.id)
        .find(|id| id.to_string() == key)
        .ok_or_else(|| PurchaseError::UnknownProject(key.to_string()))?;
    purchase_project(state, id)
}

fn apply(state: &mut GameState, id: ProjectId) {
    match id {
        ProjectId::Efficiency => state.rates.passive_neurons_per_sec *= 1.1,
        ProjectId::Automation => {
            schedule::start(state, RecurringAction::AutoClick);
        }
    }
}

/// Restart timers of completed projects after a load.
pub fn restore_runtime_effects(state: &mut GameState) {
    if is_completed(state, ProjectId::Automation) {
        schedule::start(state, RecurringAction::AutoClick);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn efficiency_requires_a_factory() {
        let mut state = GameState::new();
        state.ledger.mind_ops = 500.0;
        assert_eq!(
            purchase_project(&mut state, ProjectId::Efficiency),
            Err(PurchaseError::ProjectUnavailable(ProjectId::Efficiency))
        );
        state.factory_count = 1;
        state.rates.passive_neurons_per_sec = 1.0;
        purchase_project(&mut state, ProjectId::Efficiency).unwrap();
        assert!((state.rates.passive_neurons_per_sec - 1.1).abs() < 0.001);
        assert!((state.available_mind_ops() - 400.0).abs() < 0.001);
        assert!((state.ledger.mind_ops - 500.0).abs() < 0.001);
    }

    #[test]
    fn completed_project_cannot_repeat() {
        let mut state = GameState::new();
        state.ledger.mind_ops = 1000.0;
        state.progression.current_tier = 1;
        purchase_project(&mut state, ProjectId::Automation).unwrap();
        assert!(schedule::is_running(&state, RecurringAction::AutoClick));
        assert_eq!(
            purchase_project(&mut state, ProjectId::Automation),
            Err(PurchaseError::ProjectAlreadyCompleted(ProjectId::Automation))
        );
        assert!((state.available_mind_ops() - 750.0).abs() < 0.001);
    }

    #[test]
    fn unaffordable_project_changes_nothing() {
        let mut state = GameState::new();
        state.progression.current_tier = 1;
        state.ledger.mind_ops = 249.0;
        assert!(matches!(
            purchase_project(&mut state, ProjectId::Automation),
            Err(PurchaseError::InsufficientFunds(_))
        ));
        assert!(state.purchased_projects.is_empty());
        assert!(!schedule::is_running(&state, RecurringAction::AutoClick));
    }

    #[test]
    fn offered_hides_completed_and_locked() {
        let mut state = GameState::new();
        assert!(offered(&state).is_empty());
        state.progression.current_tier = 1;
        assert_eq!(offered(&state).len(), 1);
        state.purchased_projects.push(ProjectId::Automation);
        assert!(offered(&state).is_empty());
    }

    #[test]
    fn lookup_by_key() {
        let mut state = GameState::new();
        assert_eq!(
            purchase_project_by_key(&mut state, "teleport"),
            Err(PurchaseError::UnknownProject("teleport".into()))
        );
        assert_eq!(
            purchase_project_by_key(&mut state, "automation"),
            Err(PurchaseError::ProjectUnavailable(ProjectId::Automation))
        );
    }
}
