use std::fmt;
use std::str::FromStr;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::Serialize;
use streetwise_game::{Action, ChoiceId, ChoiceOption, SimulationState};

const MEAL_COST: i64 = 30;
const CHOCOLATE_COST: i64 = 15;
const FLOWER_STOCK_COST: i64 = 20;

/// Decision returned by a [`PlayerPolicy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyDecision<T> {
    pub pick: T,
    pub rationale: Option<String>,
}

impl<T> PolicyDecision<T> {
    #[must_use]
    pub const fn new(pick: T, rationale: Option<String>) -> Self {
        Self { pick, rationale }
    }
}

/// Policy interface for automated play strategies.
pub trait PlayerPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Select one of the offered event choices. `choices` is never empty.
    fn pick_choice(
        &mut self,
        state: &SimulationState,
        choices: &[ChoiceOption],
    ) -> PolicyDecision<ChoiceId>;

    /// Select the next action among `enabled`, or `None` to end the day.
    fn pick_action(
        &mut self,
        state: &SimulationState,
        enabled: &[Action],
    ) -> Option<PolicyDecision<Action>>;
}

/// Built-in gameplay strategies for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Cautious,
    Hustler,
    Random,
}

impl Strategy {
    pub const ALL: [Self; 3] = [Self::Cautious, Self::Hustler, Self::Random];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Cautious => "cautious",
            Self::Hustler => "hustler",
            Self::Random => "random",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Cautious => "Eats early, sleeps when hurt, avoids risky choices",
            Self::Hustler => "Chases income through work and vending, takes gambles",
            Self::Random => "Uniformly random actions and choices (seeded)",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn PlayerPolicy> {
        match self {
            Self::Cautious => Box::new(CautiousPolicy),
            Self::Hustler => Box::new(HustlerPolicy),
            Self::Random => Box::new(RandomPolicy::new(seed)),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Strategy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.key() == key)
            .ok_or(())
    }
}

struct CautiousPolicy;
struct HustlerPolicy;

struct RandomPolicy {
    rng: ChaCha20Rng,
}

impl RandomPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

/// Rough downside of a choice; higher means riskier.
const fn choice_risk(choice: ChoiceId) -> i32 {
    match choice {
        ChoiceId::TryToWarmUp | ChoiceId::StockFlowers => 3,
        ChoiceId::AskShopForHelp | ChoiceId::RecordAndReport | ChoiceId::TryMagazines => 2,
        ChoiceId::ActFine | ChoiceId::AskForLeftovers => 1,
        _ => 0,
    }
}

/// Rough upside of a choice; higher means more to gain.
const fn choice_reward(choice: ChoiceId) -> i32 {
    match choice {
        ChoiceId::StockFlowers | ChoiceId::TryMagazines => 4,
        ChoiceId::AskForLeftovers | ChoiceId::ExplainHonestly | ChoiceId::AskAboutResources => 3,
        ChoiceId::RecordAndReport | ChoiceId::TakeHotDrink | ChoiceId::FindShelter => 2,
        ChoiceId::AskShopForHelp | ChoiceId::TryToWarmUp => 1,
        _ => 0,
    }
}

fn first_enabled(enabled: &[Action], preferred: &[Action]) -> Option<Action> {
    preferred
        .iter()
        .copied()
        .find(|action| enabled.contains(action))
}

fn decided(action: Option<Action>, why: &str) -> Option<PolicyDecision<Action>> {
    action.map(|pick| PolicyDecision::new(pick, Some(why.to_string())))
}

impl PlayerPolicy for CautiousPolicy {
    fn name(&self) -> &'static str {
        "Cautious"
    }

    fn pick_choice(
        &mut self,
        _state: &SimulationState,
        choices: &[ChoiceOption],
    ) -> PolicyDecision<ChoiceId> {
        let (pick, risk) = choices
            .iter()
            .map(|option| (option.id, choice_risk(option.id)))
            .min_by_key(|(_, risk)| *risk)
            .unwrap_or((ChoiceId::Restart, 0));
        PolicyDecision::new(pick, Some(format!("risk {risk}")))
    }

    fn pick_action(
        &mut self,
        state: &SimulationState,
        enabled: &[Action],
    ) -> Option<PolicyDecision<Action>> {
        if state.hunger < 60 && state.money >= MEAL_COST {
            return decided(first_enabled(enabled, &[Action::Eat]), "hungry");
        }
        if let Some(action) = first_enabled(enabled, &[Action::Subsidy]) {
            return decided(Some(action), "subsidy ready");
        }
        if state.health < 50 {
            return decided(first_enabled(enabled, &[Action::Sleep]), "hurt");
        }
        if state.mood < 25 && state.money >= MEAL_COST + CHOCOLATE_COST {
            return decided(first_enabled(enabled, &[Action::BuyChocolate]), "low mood");
        }
        let fallback = if state.hunger < 40 {
            [Action::Scavenge, Action::Beg]
        } else {
            [Action::Beg, Action::Scavenge]
        };
        decided(first_enabled(enabled, &fallback), "steady")
    }
}

impl PlayerPolicy for HustlerPolicy {
    fn name(&self) -> &'static str {
        "Hustler"
    }

    fn pick_choice(
        &mut self,
        _state: &SimulationState,
        choices: &[ChoiceOption],
    ) -> PolicyDecision<ChoiceId> {
        let (pick, reward) = choices
            .iter()
            .map(|option| (option.id, choice_reward(option.id)))
            .max_by_key(|(_, reward)| *reward)
            .unwrap_or((ChoiceId::Restart, 0));
        PolicyDecision::new(pick, Some(format!("reward {reward}")))
    }

    fn pick_action(
        &mut self,
        state: &SimulationState,
        enabled: &[Action],
    ) -> Option<PolicyDecision<Action>> {
        if state.hunger < 45 && state.money >= MEAL_COST {
            return decided(first_enabled(enabled, &[Action::Eat]), "refuel");
        }
        if state.health < 30 {
            return decided(first_enabled(enabled, &[Action::Sleep]), "patch up");
        }
        let mut plan = vec![Action::Subsidy, Action::Work];
        if state.money >= FLOWER_STOCK_COST + MEAL_COST {
            plan.push(Action::SellFlowers);
        }
        plan.extend([Action::SellMagazines, Action::Beg]);
        decided(first_enabled(enabled, &plan), "income")
    }
}

impl PlayerPolicy for RandomPolicy {
    fn name(&self) -> &'static str {
        "Random"
    }

    fn pick_choice(
        &mut self,
        _state: &SimulationState,
        choices: &[ChoiceOption],
    ) -> PolicyDecision<ChoiceId> {
        if choices.is_empty() {
            return PolicyDecision::new(ChoiceId::Restart, Some("no choices".to_string()));
        }
        let idx = self.rng.gen_range(0..choices.len());
        PolicyDecision::new(choices[idx].id, Some(format!("index {idx}")))
    }

    fn pick_action(
        &mut self,
        _state: &SimulationState,
        enabled: &[Action],
    ) -> Option<PolicyDecision<Action>> {
        // One extra slot stands for "end the day".
        let idx = self.rng.gen_range(0..=enabled.len());
        enabled
            .get(idx)
            .map(|&pick| PolicyDecision::new(pick, Some(format!("index {idx}"))))
    }
}
