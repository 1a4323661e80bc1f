//! One generation run, from universe to rendered files.
//!
//! 1. Resolve directives into policies for every type of the target packages
//! 2. Build the dependency graph over generated types and reject value cycles
//! 3. Plan each package's types in dependency order
//! 4. Withdraw packages whose code would call methods of a failed package
//! 5. Render the planned packages in parallel
//!
//! Errors are attributed to packages. A failed package produces no output,
//! and neither does any package that depends on its generated methods.

use std::collections::BTreeMap;

use deepcopy_ir::{PackageId, TypeId, Universe};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use tracing::{debug, info, instrument, warn};

use crate::context::RunContext;
use crate::emit::render_package;
use crate::graph::DependencyGraph;
use crate::output::{PackageOutput, RunReport};
use crate::strategy::{plan_type, TypePlan};
use crate::tags::{has_directives, package_default, type_policy, GenerationPolicy};
use crate::{GenConfig, GenError, PackageFailure};

/// Packages that carry any deep-copy directive, in path order.
pub fn default_targets(universe: &Universe) -> Vec<PackageId> {
    let mut targets: Vec<PackageId> = universe
        .packages()
        .map(|(id, _)| id)
        .filter(|&id| has_directives(universe, id))
        .collect();
    targets.sort_by(|a, b| universe.package(*a).path.cmp(&universe.package(*b).path));
    targets
}

/// Run the generator over packages named by import path.
///
/// Paths that are not part of the universe are reported as failures.
pub fn generate_paths(universe: &Universe, paths: &[String], config: &GenConfig) -> RunReport {
    let mut targets = Vec::new();
    let mut unknown = Vec::new();
    for path in paths {
        match universe.package_by_path(path) {
            Some(id) => targets.push(id),
            None => unknown.push(PackageFailure {
                package: path.clone(),
                error: GenError::UnknownPackage {
                    package: path.clone(),
                },
            }),
        }
    }
    let mut report = generate(universe, &targets, config);
    report.failures.extend(unknown);
    report.failures.sort_by(|a, b| a.package.cmp(&b.package));
    report
}

/// Generate deep-copy functions for `targets`.
#[instrument(level = "debug", skip_all, fields(packages = targets.len()))]
pub fn generate(universe: &Universe, targets: &[PackageId], config: &GenConfig) -> RunReport {
    let mut targets = targets.to_vec();
    targets.sort_by(|a, b| universe.package(*a).path.cmp(&universe.package(*b).path));
    targets.dedup();

    let mut ctx = RunContext::new(universe, config, &targets);
    let mut failures: BTreeMap<String, GenError> = BTreeMap::new();

    for &pkg in &targets {
        match package_policies(universe, pkg) {
            Ok(policies) => {
                for (ty, policy) in policies {
                    ctx.set_policy(ty, policy);
                }
            }
            Err(error) => fail(&mut failures, &universe.package(pkg).path, error),
        }
    }

    let live = |failures: &BTreeMap<String, GenError>, pkg: PackageId| {
        !failures.contains_key(&universe.package(pkg).path)
    };

    let generated: Vec<TypeId> = targets
        .iter()
        .filter(|&&pkg| live(&failures, pkg))
        .flat_map(|&pkg| ctx.generated_in(pkg))
        .collect();
    let graph = DependencyGraph::build(universe, generated.iter().copied());
    for cycle in graph.find_cycles() {
        let path: Vec<String> = cycle.iter().map(|&ty| universe.display(ty)).collect();
        for &ty in &cycle {
            let Some(pkg) = universe.package_of(ty).filter(|&pkg| ctx.is_target(pkg)) else {
                continue;
            };
            let package = universe.package(pkg).path.clone();
            let error = GenError::Cycle {
                package: package.clone(),
                path: path.clone(),
            };
            fail(&mut failures, &package, error);
        }
    }

    let mut planned: Vec<(PackageId, Vec<TypePlan>)> = Vec::new();
    let mut skipped = Vec::new();
    for &pkg in &targets {
        if !live(&failures, pkg) {
            continue;
        }
        let path = &universe.package(pkg).path;
        match plan_package(&mut ctx, &graph, pkg) {
            Ok(plans) if plans.is_empty() => {
                debug!(package = %path, "nothing to generate");
                skipped.push(path.clone());
            }
            Ok(plans) => planned.push((pkg, plans)),
            Err(error) => fail(&mut failures, path, error),
        }
    }
    withdraw_dependents(&ctx, &targets, &mut planned, &mut failures);

    let mut outputs: Vec<PackageOutput> = planned
        .par_iter()
        .map(|(pkg, plans)| {
            let package = universe.package(*pkg);
            let contents = render_package(universe, config, *pkg, plans);
            info!(package = %package.path, types = plans.len(), "generated deep-copy functions");
            PackageOutput {
                package: *pkg,
                path: package.path.clone(),
                dir: package.dir.clone(),
                file_name: config.output_file_name(),
                contents,
                types: plans.iter().map(|plan| universe.display(plan.ty)).collect(),
            }
        })
        .collect();
    outputs.sort_by(|a, b| a.path.cmp(&b.path));

    RunReport {
        outputs,
        failures: failures
            .into_iter()
            .map(|(package, error)| PackageFailure { package, error })
            .collect(),
        skipped,
    }
}

/// Fail every planned package whose code calls generated methods of a
/// failed package, until no such package is left.
fn withdraw_dependents(
    ctx: &RunContext<'_>,
    targets: &[PackageId],
    planned: &mut Vec<(PackageId, Vec<TypePlan>)>,
    failures: &mut BTreeMap<String, GenError>,
) {
    let universe = ctx.universe;
    loop {
        let withdrawn: FxHashMap<TypeId, &str> = targets
            .iter()
            .filter(|&&pkg| failures.contains_key(&universe.package(pkg).path))
            .flat_map(|&pkg| {
                let path = universe.package(pkg).path.as_str();
                ctx.generated_in(pkg).into_iter().map(move |ty| (ty, path))
            })
            .collect();

        let mut changed = false;
        planned.retain(|(pkg, plans)| {
            let broken = plans.iter().find_map(|plan| {
                plan.generated_callees().into_iter().find_map(|callee| {
                    withdrawn
                        .get(&callee)
                        .map(|&owner| (plan.ty, callee, owner))
                })
            });
            let Some((ty, callee, owner)) = broken else {
                return true;
            };
            let error = GenError::DependencyFailed {
                ty: universe.display(ty),
                dependency: universe.display(callee),
                package: owner.to_string(),
            };
            fail(failures, &universe.package(*pkg).path, error);
            changed = true;
            false
        });
        if !changed {
            return;
        }
    }
}

/// Keep the first error of each package.
fn fail(failures: &mut BTreeMap<String, GenError>, package: &str, error: GenError) {
    if failures.contains_key(package) {
        return;
    }
    warn!(package, %error, "package failed");
    failures.insert(package.to_string(), error);
}

fn package_policies(
    universe: &Universe,
    pkg: PackageId,
) -> Result<Vec<(TypeId, GenerationPolicy)>, GenError> {
    let package = universe.package(pkg);
    let enabled_by_default =
        package_default(&package.path, package.comments.iter().map(String::as_str))?;
    package
        .types
        .iter()
        .map(|&ty| Ok((ty, type_policy(universe, ty, enabled_by_default)?)))
        .collect()
}

#[instrument(level = "debug", skip_all, fields(package = pkg.index()))]
fn plan_package(
    ctx: &mut RunContext<'_>,
    graph: &DependencyGraph,
    pkg: PackageId,
) -> Result<Vec<TypePlan>, GenError> {
    let mut plans = Vec::new();
    for ty in graph.generation_order(&ctx.generated_in(pkg)) {
        let plan = plan_type(ctx, ty)?;
        if plan.emits_code() {
            plans.push(plan);
        } else {
            debug!(ty = %ctx.universe.display(ty), "all copy methods are hand-written");
        }
    }
    Ok(plans)
}
