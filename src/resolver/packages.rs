// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Versioned package sets lowered into constraint problems.
//!
//! Each `name@version` becomes one variable. Versions of the same package
//! conflict pairwise, a dependency becomes `pkg => (v1 || v2 || ...)` over the
//! versions matching its range, and a dependency nothing matches rules the
//! depending package out.

use semver::{Version, VersionReq};
use serde::{Deserialize, Serialize};

use crate::resolver::{ConstraintProblem, Expr, ExprError, Solution};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDependency {
    pub name: String,
    pub range: VersionReq,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSpec {
    pub name: String,
    pub version: Version,
    #[serde(default)]
    pub deps: Vec<PackageDependency>,
}

impl PackageSpec {
    /// Variable name of this package version in the constraint problem.
    pub fn key(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Require at least one version of every named package (at most one always holds).
    pub exactly_one_version: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            exactly_one_version: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageResolution {
    /// The chosen package versions, in input order.
    Resolved(Vec<PackageSpec>),
    Unsatisfiable,
}

/// Choose a consistent set of package versions.
pub fn resolve_packages(
    packages: &[PackageSpec],
    options: ResolveOptions,
) -> Result<PackageResolution, ExprError> {
    // Group versions by package name, keeping first-appearance order.
    let mut grouped: Vec<(&str, Vec<&PackageSpec>)> = Vec::new();
    for package in packages {
        match grouped.iter_mut().find(|(name, _)| *name == package.name) {
            Some((_, versions)) => versions.push(package),
            None => grouped.push((package.name.as_str(), vec![package])),
        }
    }

    let mut problem = ConstraintProblem::new();
    for package in packages {
        problem = problem.package(package.key());
    }

    for (_, versions) in &grouped {
        if options.exactly_one_version {
            problem = problem.clause(Expr::or(versions.iter().map(|v| Expr::var(v.key()))));
        }
        for (i, first) in versions.iter().enumerate() {
            for second in &versions[i + 1..] {
                problem = problem.conflicts(first.key(), second.key());
            }
        }
    }

    for package in packages {
        for dep in &package.deps {
            let candidates: Vec<Expr> = grouped
                .iter()
                .find(|(name, _)| *name == dep.name)
                .map(|(_, versions)| {
                    versions
                        .iter()
                        .filter(|v| dep.range.matches(&v.version))
                        .map(|v| Expr::var(v.key()))
                        .collect()
                })
                .unwrap_or_default();

            let constraint = if candidates.is_empty() {
                Expr::not(Expr::var(package.key()))
            } else {
                Expr::implies(Expr::var(package.key()), Expr::Or(candidates))
            };
            problem = problem.clause(constraint);
        }
    }

    Ok(match problem.solve()? {
        Solution::Satisfiable(assignment) => PackageResolution::Resolved(
            packages
                .iter()
                .filter(|p| assignment.get(&p.key()).copied().unwrap_or(false))
                .cloned()
                .collect(),
        ),
        Solution::Unsatisfiable => PackageResolution::Unsatisfiable,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(name: &str, version: &str, deps: &[(&str, &str)]) -> PackageSpec {
        PackageSpec {
            name: name.to_string(),
            version: Version::parse(version).unwrap(),
            deps: deps
                .iter()
                .map(|(n, r)| PackageDependency {
                    name: n.to_string(),
                    range: VersionReq::parse(r).unwrap(),
                })
                .collect(),
        }
    }

    fn chosen(resolution: &PackageResolution) -> Vec<String> {
        match resolution {
            PackageResolution::Resolved(specs) => specs.iter().map(PackageSpec::key).collect(),
            PackageResolution::Unsatisfiable => panic!("expected a resolution"),
        }
    }

    #[test]
    fn test_one_version_per_package_and_ranges_respected() {
        let packages = vec![
            spec("foo", "1.0.0", &[("bar", "^1")]),
            spec("foo", "2.0.0", &[("bar", "^2")]),
            spec("bar", "1.0.0", &[]),
            spec("bar", "2.0.0", &[]),
        ];

        let resolution = resolve_packages(&packages, ResolveOptions::default()).unwrap();
        let keys = chosen(&resolution);

        assert_eq!(keys.iter().filter(|k| k.starts_with("foo@")).count(), 1);
        assert_eq!(keys.iter().filter(|k| k.starts_with("bar@")).count(), 1);
        if keys.contains(&"foo@1.0.0".to_string()) {
            assert!(keys.contains(&"bar@1.0.0".to_string()));
        } else {
            assert!(keys.contains(&"bar@2.0.0".to_string()));
        }
    }

    #[test]
    fn test_missing_dependency_is_unsatisfiable_when_every_package_is_required() {
        let packages = vec![spec("app", "1.0.0", &[("runtime", "^3")])];
        let resolution = resolve_packages(&packages, ResolveOptions::default()).unwrap();
        assert_eq!(resolution, PackageResolution::Unsatisfiable);
    }

    #[test]
    fn test_missing_dependency_excludes_package_when_optional() {
        let packages = vec![
            spec("app", "1.0.0", &[("runtime", "^3")]),
            spec("runtime", "2.1.0", &[]),
        ];
        let options = ResolveOptions {
            exactly_one_version: false,
        };
        let resolution = resolve_packages(&packages, options).unwrap();
        let keys = chosen(&resolution);
        assert!(!keys.contains(&"app@1.0.0".to_string()));
    }

    #[test]
    fn test_package_spec_deserializes_from_request_json() {
        let json = r#"{ "name": "A", "version": "1.0.0", "deps": [{ "name": "B", "range": "^2.0.0" }] }"#;
        let parsed: PackageSpec = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.key(), "A@1.0.0");
        assert!(parsed.deps[0].range.matches(&Version::parse("2.3.4").unwrap()));
    }
}
