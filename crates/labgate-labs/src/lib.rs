//! The chapter catalog: which inputs each lab reads and which checks it
//! runs against them.
//!
//! Everything here is static data plus pure rule configuration. Loading the
//! inputs is `labgate-inputs`' job; evaluation is `labgate-domain`'s.

#![forbid(unsafe_code)]

mod ch02;
mod ch03;
mod ch04;
mod ch05;
mod ch06;
mod ch07;
mod ch08;
mod ch09;
mod ch10;

#[cfg(test)]
mod test_support;

use labgate_domain::{CheckRegistry, RegistryError};
use labgate_types::InputSpec;

/// One chapter's lab definition.
#[derive(Clone, Copy, Debug)]
pub struct Lab {
    pub chapter: &'static str,
    pub title: &'static str,
    inputs: fn() -> Vec<InputSpec>,
    build: fn() -> Result<CheckRegistry, RegistryError>,
}

impl Lab {
    /// Input declarations with their default paths.
    pub fn inputs(&self) -> Vec<InputSpec> {
        (self.inputs)()
    }

    /// A fresh registry; every call builds new checks.
    pub fn registry(&self) -> Result<CheckRegistry, RegistryError> {
        (self.build)()
    }

    /// Check ids in registration order.
    pub fn check_ids(&self) -> Result<Vec<String>, RegistryError> {
        Ok(self.registry()?.ids().map(str::to_string).collect())
    }
}

const LABS: [Lab; 9] = [
    ch02::LAB,
    ch03::LAB,
    ch04::LAB,
    ch05::LAB,
    ch06::LAB,
    ch07::LAB,
    ch08::LAB,
    ch09::LAB,
    ch10::LAB,
];

/// Every lab, in chapter order.
pub fn all() -> &'static [Lab] {
    &LABS
}

/// Case-insensitive chapter lookup (`ch05` finds `CH05`).
pub fn lab(chapter: &str) -> Option<&'static Lab> {
    LABS.iter()
        .find(|lab| lab.chapter.eq_ignore_ascii_case(chapter.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn chapters_are_unique_and_ordered() {
        let chapters: Vec<&str> = all().iter().map(|l| l.chapter).collect();
        let mut sorted = chapters.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(chapters, sorted);
        assert_eq!(chapters.first(), Some(&"CH02"));
        assert_eq!(chapters.last(), Some(&"CH10"));
    }

    #[test]
    fn every_registry_builds_with_required_checks() {
        for lab in all() {
            let registry = lab.registry().expect("static catalog builds");
            assert_eq!(registry.chapter(), lab.chapter);
            assert!(!registry.checks().is_empty(), "{} has no checks", lab.chapter);
            assert!(registry.checks().iter().any(|c| c.required()));
        }
    }

    #[test]
    fn input_names_are_unique_per_lab() {
        for lab in all() {
            let inputs = lab.inputs();
            let names: BTreeSet<&str> = inputs.iter().map(|i| i.name.as_str()).collect();
            assert_eq!(names.len(), inputs.len(), "{}", lab.chapter);
        }
    }

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(lab("ch05").map(|l| l.chapter), Some("CH05"));
        assert!(lab("CH99").is_none());
    }
}
