//! Lipinski's Rule of 5.

use std::fmt;

use serde::Serialize;

use super::descriptors::Descriptors;

pub const MAX_MOLECULAR_WEIGHT: f64 = 500.0;
pub const MAX_LOGP: f64 = 5.0;
pub const MAX_H_BOND_DONORS: usize = 5;
pub const MAX_H_BOND_ACCEPTORS: usize = 10;

/// Minimum number of satisfied rules for a molecule to count as drug-like.
pub const RULES_REQUIRED: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Rule {
    MolecularWeight,
    LogP,
    HBondDonors,
    HBondAcceptors,
}

impl Rule {
    pub const ALL: [Rule; 4] = [
        Rule::MolecularWeight,
        Rule::LogP,
        Rule::HBondDonors,
        Rule::HBondAcceptors,
    ];

    /// Short explanation shown next to each parameter.
    pub fn explanation(&self) -> &'static str {
        match self {
            Rule::MolecularWeight => {
                "A measure of mass; lower values (<500 Da) often improve absorption."
            }
            Rule::LogP => {
                "Indicates lipophilicity; values below 5 favor balanced solubility and permeability."
            }
            Rule::HBondDonors => "Fewer donors (≤5) help avoid excessive water interactions.",
            Rule::HBondAcceptors => "A limit of ≤10 promotes optimal drug-target binding.",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rule::MolecularWeight => "Molecular Weight",
            Rule::LogP => "LogP",
            Rule::HBondDonors => "H-Bond Donors",
            Rule::HBondAcceptors => "H-Bond Acceptors",
        };
        f.write_str(name)
    }
}

/// Outcome of one rule against a descriptor value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RuleCheck {
    pub rule: Rule,
    pub value: f64,
    pub passed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LipinskiReport {
    pub descriptors: Descriptors,
    pub checks: [RuleCheck; 4],
    pub compliant: bool,
}

impl LipinskiReport {
    pub fn evaluate(descriptors: Descriptors) -> Self {
        let checks = Rule::ALL.map(|rule| {
            let (value, passed) = match rule {
                Rule::MolecularWeight => (
                    descriptors.molecular_weight,
                    descriptors.molecular_weight <= MAX_MOLECULAR_WEIGHT,
                ),
                Rule::LogP => (descriptors.logp, descriptors.logp <= MAX_LOGP),
                Rule::HBondDonors => (
                    descriptors.h_bond_donors as f64,
                    descriptors.h_bond_donors <= MAX_H_BOND_DONORS,
                ),
                Rule::HBondAcceptors => (
                    descriptors.h_bond_acceptors as f64,
                    descriptors.h_bond_acceptors <= MAX_H_BOND_ACCEPTORS,
                ),
            };
            RuleCheck { rule, value, passed }
        });
        let compliant = checks.iter().filter(|c| c.passed).count() >= RULES_REQUIRED;
        Self {
            descriptors,
            checks,
            compliant,
        }
    }

    pub fn violations(&self) -> usize {
        self.checks.iter().filter(|c| !c.passed).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc(mw: f64, logp: f64, hbd: usize, hba: usize) -> Descriptors {
        Descriptors {
            molecular_weight: mw,
            logp,
            h_bond_donors: hbd,
            h_bond_acceptors: hba,
        }
    }

    #[test]
    fn weight_boundary_is_inclusive() {
        let at = LipinskiReport::evaluate(desc(500.0, 1.0, 1, 1));
        assert!(at.checks[0].passed);
        let over = LipinskiReport::evaluate(desc(500.01, 1.0, 1, 1));
        assert!(!over.checks[0].passed);
        assert!(over.compliant);
    }

    #[test]
    fn one_violation_is_tolerated_two_are_not() {
        let one = LipinskiReport::evaluate(desc(650.0, 1.0, 2, 4));
        assert_eq!(one.violations(), 1);
        assert!(one.compliant);

        let two = LipinskiReport::evaluate(desc(650.0, 6.2, 2, 4));
        assert_eq!(two.violations(), 2);
        assert!(!two.compliant);
    }

    #[test]
    fn donor_and_acceptor_limits() {
        let r = LipinskiReport::evaluate(desc(100.0, 0.0, 5, 10));
        assert!(r.checks.iter().all(|c| c.passed));
        let r = LipinskiReport::evaluate(desc(100.0, 0.0, 6, 11));
        assert_eq!(r.violations(), 2);
    }
}
