//! Dependency ordering over module descriptors.
//!
//! Resolution walks an explicit work-list instead of recursing, so deep
//! dependency chains cannot exhaust the call stack and a cycle is reported as
//! soon as a module currently being resolved is reached again.

use std::collections::{BTreeMap, HashSet};

use crate::error::WorkspaceError;
use crate::module::ModuleDescriptor;

struct Frame<'a> {
    module: &'a str,
    next_dependency: usize,
}

struct ResolutionContext<'a> {
    descriptors: &'a BTreeMap<String, ModuleDescriptor>,
    stack: Vec<Frame<'a>>,
    resolving: HashSet<&'a str>,
    resolved: HashSet<&'a str>,
    order: Vec<String>,
}

impl<'a> ResolutionContext<'a> {
    fn new(descriptors: &'a BTreeMap<String, ModuleDescriptor>) -> Self {
        Self {
            descriptors,
            stack: Vec::new(),
            resolving: HashSet::new(),
            resolved: HashSet::new(),
            order: Vec::with_capacity(descriptors.len()),
        }
    }

    fn enter(&mut self, module: &'a str) -> Result<(), WorkspaceError> {
        if self.resolving.contains(module) {
            let mut cycle: Vec<String> = self
                .stack
                .iter()
                .skip_while(|frame| frame.module != module)
                .map(|frame| frame.module.to_owned())
                .collect();
            cycle.push(module.to_owned());
            return Err(WorkspaceError::cyclic(cycle));
        }
        self.resolving.insert(module);
        self.stack.push(Frame {
            module,
            next_dependency: 0,
        });
        Ok(())
    }

    fn finish(&mut self, module: &'a str) {
        self.resolving.remove(module);
        self.resolved.insert(module);
        self.order.push(module.to_owned());
    }

    /// Advances the top frame to its next dependency, returning the frame's
    /// module and that dependency, or `None` when the frame is exhausted.
    fn next_edge(&mut self) -> Option<(&'a str, Option<&'a str>)> {
        let descriptors = self.descriptors;
        let frame = self.stack.last_mut()?;
        let dependency = descriptors
            .get(frame.module)
            .and_then(|descriptor| descriptor.dependencies().get(frame.next_dependency))
            .map(String::as_str);
        frame.next_dependency += 1;
        Some((frame.module, dependency))
    }

    fn resolve_from(&mut self, root: &'a str) -> Result<(), WorkspaceError> {
        self.enter(root)?;
        while let Some((module, edge)) = self.next_edge() {
            let Some(dependency) = edge else {
                self.stack.pop();
                self.finish(module);
                continue;
            };
            let Some((name, _)) = self.descriptors.get_key_value(dependency) else {
                return Err(WorkspaceError::unknown_reference(module, dependency));
            };
            if self.resolved.contains(name.as_str()) {
                continue;
            }
            self.enter(name)?;
        }
        Ok(())
    }
}

/// Orders modules so every module follows all of its dependencies.
///
/// Roots are visited in name order and dependencies in declaration order, so
/// the result, and any reported cycle, is deterministic.
///
/// # Errors
///
/// Returns [`WorkspaceError::UnknownModuleReference`] for a dependency with no
/// descriptor and [`WorkspaceError::CyclicModuleDependency`] when the graph
/// contains a cycle.
pub(crate) fn compile_order(
    descriptors: &BTreeMap<String, ModuleDescriptor>,
) -> Result<Vec<String>, WorkspaceError> {
    let mut context = ResolutionContext::new(descriptors);
    for name in descriptors.keys() {
        if !context.resolved.contains(name.as_str()) {
            context.resolve_from(name)?;
        }
    }
    Ok(context.order)
}
