//! Tone-shifting labels. The wording gets more formal as the brain grows:
//! variant 0 is childish, variant 3 is academic.

type Variants = [&'static str; 4];

const PHRASES: &[(&str, Variants)] = &[
    ("addNeurons", ["Make Brain Bits", "Grow Neuron Buds", "Add Neurons", "Initiate Neuronal Augmentation"]),
    ("testYourKnowledge", ["Brain Test", "Quiz Time", "Test Your Knowledge", "Assess Cognitive Aptitude"]),
    ("neuroGames", ["Brain Fun", "Mind Games", "NeuroGames", "Cerebral Recreations"]),
    ("yourBrain", ["Your Brain", "Your Mind", "Your Cortex", "Your Consciousness"]),
    ("coreUpgrades", ["Brain Boosts", "Mind Upgrades", "Core Upgrades", "Cognitive Enhancements"]),
    ("proliferationFactories", ["Brain Makers", "Neuron Forges", "Proliferation Factories", "Cerebral Foundries"]),
    ("buyFactory", ["Get Brain Maker", "Buy Neuron Forge", "Buy Proliferation Factory", "Procure Cerebral Foundry"]),
    ("neuronProliferation", ["More Brain Bits", "Neuron Growth", "Neuron Proliferation", "Cerebral Multiplication"]),
    ("neurofuel", ["Brain Fuel", "Neuron Juice", "NeuroFuel", "Cognitive Fuel"]),
    ("buyFood", ["Get Food", "Buy Snacks", "Buy Food", "Procure Sustenance"]),
    ("projects", ["Brain Plans", "Big Projects", "Projects", "Grand Experiments"]),
    ("hypothalamusControls", ["Brain Buttons", "Hypothalamus Buttons", "Hypothalamus Controls", "Autonomic Interface"]),
    ("dopamine", ["Happy Juice:", "Feel-Good Chemical:", "Dopamine:", "Dopaminergic Concentration:"]),
    ("gaba", ["Calm Juice:", "Chill Chemical:", "GABA:", "Gamma-Aminobutyric Acid:"]),
    ("projectCompleted", ["Rock done! {title}", "We finished the thing! {title}", "Project completed: {title}", "Our endeavor has reached fruition: {title}"]),
    ("notEnoughPsychbucks", ["Broke: can't pay for {item}.", "We can't afford {item}.", "Not enough Psychbucks for {item}.", "Our coffers are insufficient for {item}."]),
    ("outOfNeuroFuel", ["Bone dry on NeuroFuel!", "Fuel tanks empty!", "Out of NeuroFuel!", "Our reserves of NeuroFuel have been depleted."]),
    ("anxietyAttack", ["Brain go panic!", "Freak-out mode!", "ANXIETY ATTACK! Brain regressing.", "Acute anxiety episode: cortical regression in progress."]),
    ("minigameFinished", ["Game done! +{score} PB!", "Fun time nets {score} bucks!", "{game} finished: +{score} Psychbucks!", "Our recreational pursuit yields {score} Psychbucks."]),
];

/// Label for `key` at a brain level. Unknown keys come back unchanged.
pub fn phrase(key: &str, tier: u32) -> &str {
    let idx = tier.min(3) as usize;
    PHRASES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v[idx])
        .unwrap_or(key)
}

/// `phrase` with `{name}` placeholders filled from `params`. Placeholders
/// without a value are left as written.
pub fn phrase_with(key: &str, tier: u32, params: &[(&str, &str)]) -> String {
    params
        .iter()
        .fold(phrase(key, tier).to_string(), |text, (name, value)| {
            text.replace(&format!("{{{}}}", name), value)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tone_follows_tier() {
        assert_eq!(phrase("neurofuel", 0), "Brain Fuel");
        assert_eq!(phrase("neurofuel", 2), "NeuroFuel");
        assert_eq!(phrase("neurofuel", 3), "Cognitive Fuel");
    }

    #[test]
    fn tier_is_clamped() {
        assert_eq!(phrase("gaba", 42), "Gamma-Aminobutyric Acid:");
    }

    #[test]
    fn unknown_key_echoes() {
        assert_eq!(phrase("noSuchKey", 1), "noSuchKey");
    }

    #[test]
    fn placeholders_are_filled() {
        assert_eq!(
            phrase_with("projectCompleted", 2, &[("title", "Autonomy")]),
            "Project completed: Autonomy"
        );
        assert_eq!(
            phrase_with("minigameFinished", 2, &[("score", "12")]),
            "{game} finished: +12 Psychbucks!"
        );
    }

    #[test]
    fn every_entry_has_four_distinct_variants() {
        for (key, variants) in PHRASES {
            for (i, a) in variants.iter().enumerate() {
                assert!(!a.is_empty(), "{key} has an empty variant");
                assert!(variants[i + 1..].iter().all(|b| a != b), "{key} repeats");
            }
        }
    }
}
