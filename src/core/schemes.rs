// src/core/schemes.rs

//! Welfare schemes and their eligibility rules. The catalog is handed to the
//! orchestrator at construction, so deployments can swap in their own rules.

use crate::models::Person;
use std::fmt;

/// A scheme a person may be enrolled in.
pub trait Scheme: fmt::Debug + Send + Sync {
    /// The display name, also stored on enrolled persons.
    fn name(&self) -> &str;

    fn is_eligible(&self, person: &Person) -> bool;
}

/// Financial Assistance Scheme: low household income, absolute or per member.
#[derive(Debug, Clone)]
pub struct FinancialAssistance {
    pub income_limit: f64,
    pub per_capita_limit: f64,
}

impl Default for FinancialAssistance {
    fn default() -> Self {
        Self {
            income_limit: 4000.0,
            per_capita_limit: 1000.0,
        }
    }
}

impl Scheme for FinancialAssistance {
    fn name(&self) -> &str {
        "Financial Assistance Scheme (FAS)"
    }

    fn is_eligible(&self, person: &Person) -> bool {
        person.income.amount() <= self.income_limit
            || person.income_per_capita() <= self.per_capita_limit
    }
}

/// Student Care Fee Assistance. Small households are judged on total income,
/// larger ones on income per member.
#[derive(Debug, Clone)]
pub struct StudentCareFeeAssistance {
    pub income_limit: f64,
    pub family_size_limit: u32,
    pub per_capita_limit: f64,
}

impl Default for StudentCareFeeAssistance {
    fn default() -> Self {
        Self {
            income_limit: 4500.0,
            family_size_limit: 4,
            per_capita_limit: 1125.0,
        }
    }
}

impl Scheme for StudentCareFeeAssistance {
    fn name(&self) -> &str {
        "Student Care Fee Assistance (SCFA)"
    }

    fn is_eligible(&self, person: &Person) -> bool {
        let members = person.family_size.members();
        if members <= self.family_size_limit {
            person.income.amount() <= self.income_limit
        } else {
            person.income_per_capita() <= self.per_capita_limit
        }
    }
}

#[derive(Debug)]
pub struct SchemeCatalog {
    schemes: Vec<Box<dyn Scheme>>,
}

impl SchemeCatalog {
    pub fn new(schemes: Vec<Box<dyn Scheme>>) -> Self {
        Self { schemes }
    }

    /// The schemes `person` qualifies for, in catalog order.
    pub fn eligible_for(&self, person: &Person) -> Vec<&dyn Scheme> {
        self.schemes
            .iter()
            .map(|s| s.as_ref())
            .filter(|s| s.is_eligible(person))
            .collect()
    }
}

impl Default for SchemeCatalog {
    fn default() -> Self {
        Self::new(vec![
            Box::new(FinancialAssistance::default()),
            Box::new(StudentCareFeeAssistance::default()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tests::person;
    use crate::models::{FamilySize, Income};

    fn household(income: f64, members: u32) -> Person {
        let mut p = person("Alex Yeoh");
        p.income = Income::new(income).unwrap();
        p.family_size = FamilySize::new(members).unwrap();
        p
    }

    #[test]
    fn test_default_catalog_eligibility() {
        let catalog = SchemeCatalog::default();

        let names = |p: &Person| -> Vec<String> {
            catalog
                .eligible_for(p)
                .iter()
                .map(|s| s.name().to_string())
                .collect()
        };

        assert_eq!(names(&household(3000.0, 2)).len(), 2);
        // Above both absolute limits, small household.
        assert!(names(&household(6000.0, 2)).is_empty());
        // Large household judged per member: 6000 / 6 = 1000.
        assert_eq!(names(&household(6000.0, 6)).len(), 2);
        // 4200 is over the FAS limit but within SCFA's for a family of 3.
        assert_eq!(
            names(&household(4200.0, 3)),
            vec!["Student Care Fee Assistance (SCFA)".to_string()]
        );
    }
}
