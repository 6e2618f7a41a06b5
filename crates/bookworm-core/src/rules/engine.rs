//! Rule scheduling and execution.
//!
//! The engine expands the requested rules with their declared dependencies,
//! orders them topologically (dependencies first, otherwise caller order)
//! and stores each rule's output on every entry of the keys it declares.

use std::collections::BTreeSet;

use tracing::debug;

use crate::error::{BookwormError, Result};
use crate::kb::{Backend, KnowledgeBase, SimpleHash};
use crate::rules::apply;
use crate::rules::catalog::RuleId;

pub struct InferEngine<B: Backend = SimpleHash> {
    kb: KnowledgeBase<B>,
}

impl<B: Backend> InferEngine<B> {
    pub fn new(kb: KnowledgeBase<B>) -> Self {
        Self { kb }
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase<B> {
        &self.kb
    }

    pub fn into_knowledge_base(self) -> KnowledgeBase<B> {
        self.kb
    }

    /// Run `rules` and everything they depend on.
    pub fn run(&mut self, rules: &[RuleId]) -> Result<()> {
        for rule in schedule(rules)? {
            self.process_rule(rule)?;
        }
        Ok(())
    }

    /// Run a single rule. Its dependencies must already have executed.
    pub fn process_rule(&mut self, rule: RuleId) -> Result<()> {
        if let Some(dep) = rule
            .depends_on()
            .iter()
            .find(|dep| !self.kb.has_executed(**dep))
        {
            return Err(BookwormError::MissingDependency {
                requester: rule.to_string(),
                rule: *dep,
            });
        }

        for key in rule.keys() {
            let category = self.kb.get_mut(*key);
            debug!(rule = %rule, key = %key, entries = category.len(), "applying rule");
            for entry in category.values_mut() {
                let output = apply(rule, entry)?;
                entry.set_fact(rule, output);
            }
        }

        self.kb.mark_executed(rule);
        Ok(())
    }
}

/// Dependency closure of `rules` in execution order.
pub fn schedule(rules: &[RuleId]) -> Result<Vec<RuleId>> {
    topo_order(rules, |rule| rule.depends_on().to_vec())
}

/// Depth-first topological order over `roots` and their dependencies.
///
/// Each node appears once, after all of its dependencies. Independent nodes
/// keep the order in which they were first reached from `roots`.
pub fn topo_order<T, F>(roots: &[T], deps: F) -> Result<Vec<T>>
where
    T: Copy + Ord + ToString,
    F: Fn(T) -> Vec<T>,
{
    let mut order = Vec::new();
    let mut done = BTreeSet::new();
    let mut path = Vec::new();

    for root in roots {
        visit(*root, &deps, &mut done, &mut path, &mut order)?;
    }
    Ok(order)
}

fn visit<T, F>(
    node: T,
    deps: &F,
    done: &mut BTreeSet<T>,
    path: &mut Vec<T>,
    order: &mut Vec<T>,
) -> Result<()>
where
    T: Copy + Ord + ToString,
    F: Fn(T) -> Vec<T>,
{
    if done.contains(&node) {
        return Ok(());
    }
    if let Some(start) = path.iter().position(|n| *n == node) {
        let mut rules: Vec<String> = path[start..].iter().map(ToString::to_string).collect();
        rules.push(node.to_string());
        return Err(BookwormError::DependencyCycle { rules });
    }

    path.push(node);
    for dep in deps(node) {
        visit(dep, deps, done, path, order)?;
    }
    path.pop();

    done.insert(node);
    order.push(node);
    Ok(())
}
